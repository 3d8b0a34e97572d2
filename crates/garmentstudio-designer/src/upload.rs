//! Asynchronous artwork decoding with per-slot supersession.
//!
//! Uploads decode off the editor thread so pointer handling never blocks on
//! image parsing. Each upload targets a slot (a garment part, or the base
//! texture); a newer upload to the same slot supersedes any decode still in
//! flight there - the stale result is discarded by generation check when it
//! eventually lands, never queued behind the new one.
//!
//! Results re-enter the editor thread through a non-blocking drain that the
//! session calls from its event pump.

use std::collections::HashMap;
use std::fmt;

use image::RgbaImage;
use tokio::sync::mpsc;
use uuid::Uuid;

use garmentstudio_core::error::DecodeError;

use crate::parts::PartId;

/// Where an upload's pixels end up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UploadTarget {
    /// The base diffuse texture.
    Base,
    /// An artwork element placed on a garment part.
    Part(PartId),
}

impl UploadTarget {
    /// Slot label for events and logging.
    pub fn slot_name(&self) -> String {
        match self {
            UploadTarget::Base => "base".to_string(),
            UploadTarget::Part(id) => id.to_string(),
        }
    }
}

impl fmt::Display for UploadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.slot_name())
    }
}

/// Handle identifying one submitted upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadTicket(Uuid);

impl UploadTicket {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UploadTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Upload({})", &self.0.to_string()[..8])
    }
}

/// A finished decode, delivered back on the editor thread.
#[derive(Debug)]
pub struct DecodeOutcome {
    pub ticket: UploadTicket,
    pub target: UploadTarget,
    pub generation: u64,
    /// The element created for this upload, when the target is a part.
    pub element_id: Option<u64>,
    pub result: Result<RgbaImage, DecodeError>,
}

/// In-flight decode bookkeeping for one slot.
#[derive(Debug, Clone)]
struct SlotState {
    generation: u64,
    ticket: UploadTicket,
    element_id: Option<u64>,
}

/// Decode queue with per-slot generation counters.
#[derive(Debug)]
pub struct UploadQueue {
    tx: mpsc::UnboundedSender<DecodeOutcome>,
    rx: mpsc::UnboundedReceiver<DecodeOutcome>,
    slots: HashMap<UploadTarget, SlotState>,
    /// Queue-wide monotonic counter. Generations are never reused, so a
    /// long-delayed decode from a retired slot can never collide with a
    /// fresh upload chain on the same slot.
    next_generation: u64,
}

/// What `submit` displaced, if anything.
#[derive(Debug, Clone, PartialEq)]
pub struct Superseded {
    pub ticket: UploadTicket,
    pub element_id: Option<u64>,
}

impl UploadQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            slots: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Submit bytes for decoding.
    ///
    /// Must be called from within a tokio runtime; the decode itself runs on
    /// the blocking pool. Returns the new ticket plus the in-flight upload
    /// it superseded on the same slot, if there was one.
    pub fn submit(
        &mut self,
        target: UploadTarget,
        element_id: Option<u64>,
        bytes: Vec<u8>,
    ) -> (UploadTicket, Option<Superseded>) {
        let ticket = UploadTicket::new();
        self.next_generation += 1;
        let generation = self.next_generation;

        let superseded = self.slots.get(&target).map(|slot| Superseded {
            ticket: slot.ticket,
            element_id: slot.element_id,
        });

        self.slots.insert(
            target.clone(),
            SlotState {
                generation,
                ticket,
                element_id,
            },
        );

        let tx = self.tx.clone();
        // Detach: completion is observed through the channel, not the handle.
        let _ = tokio::task::spawn_blocking(move || {
            let result = decode_image(&bytes);
            // The receiver only closes when the queue is dropped; a lost
            // result is harmless then.
            let _ = tx.send(DecodeOutcome {
                ticket,
                target,
                generation,
                element_id,
                result,
            });
        });

        tracing::debug!("{} submitted (generation {})", ticket, generation);
        (ticket, superseded)
    }

    /// Non-blocking drain of finished decodes.
    pub fn drain_completed(&mut self) -> Vec<DecodeOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.rx.try_recv() {
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Whether an outcome belongs to the newest upload on its slot.
    ///
    /// Current outcomes also retire the slot's bookkeeping, so a later
    /// upload starts a fresh supersession chain.
    pub fn accept(&mut self, outcome: &DecodeOutcome) -> bool {
        match self.slots.get(&outcome.target) {
            Some(slot) if slot.generation == outcome.generation => {
                self.slots.remove(&outcome.target);
                true
            }
            _ => false,
        }
    }

    /// The element id of the decode currently in flight for a slot.
    pub fn pending_element(&self, target: &UploadTarget) -> Option<u64> {
        self.slots.get(target).and_then(|slot| slot.element_id)
    }

    /// Number of slots with a decode in flight.
    pub fn in_flight(&self) -> usize {
        self.slots.len()
    }
}

impl Default for UploadQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode uploaded bytes into an RGBA bitmap.
///
/// Format detection is the decoder's problem; the engine only requires that
/// the bytes decode to a non-empty bitmap.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, DecodeError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| DecodeError::InvalidImage {
        reason: e.to_string(),
    })?;
    let rgba = decoded.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(DecodeError::EmptyImage);
    }
    Ok(rgba)
}
