//! Event type definitions for the event bus.
//!
//! All editor events organized by category. Events carry plain identifiers
//! rather than references into engine state so they stay cheap to clone and
//! safe to hold across edits.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Root event enum for all editor events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StudioEvent {
    /// Composite texture lifecycle
    Texture(TextureEvent),
    /// Design element changes
    Element(ElementEvent),
    /// Artwork upload/decode progress
    Upload(UploadEvent),
    /// Garment part configuration and activation
    Part(PartEvent),
    /// Non-fatal errors surfaced to observers
    Error(ErrorEvent),
}

impl StudioEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            StudioEvent::Texture(_) => EventCategory::Texture,
            StudioEvent::Element(_) => EventCategory::Element,
            StudioEvent::Upload(_) => EventCategory::Upload,
            StudioEvent::Part(_) => EventCategory::Part,
            StudioEvent::Error(_) => EventCategory::Error,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            StudioEvent::Texture(e) => e.description(),
            StudioEvent::Element(e) => e.description(),
            StudioEvent::Upload(e) => e.description(),
            StudioEvent::Part(e) => e.description(),
            StudioEvent::Error(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Composite texture lifecycle events.
    Texture,
    /// Design element change events.
    Element,
    /// Upload/decode progress events.
    Upload,
    /// Garment part events.
    Part,
    /// Error events.
    Error,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Texture => write!(f, "Texture"),
            EventCategory::Element => write!(f, "Element"),
            EventCategory::Upload => write!(f, "Upload"),
            EventCategory::Part => write!(f, "Part"),
            EventCategory::Error => write!(f, "Error"),
        }
    }
}

/// Composite texture lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TextureEvent {
    /// A full-resolution composite finished
    Composited {
        /// Monotonic revision of the snapshot.
        revision: u64,
        /// Output width in pixels.
        width: u32,
        /// Output height in pixels.
        height: u32,
    },
    /// A display-resolution preview render finished
    PreviewRendered {
        /// Output width in pixels.
        width: u32,
        /// Output height in pixels.
        height: u32,
    },
}

impl TextureEvent {
    pub fn description(&self) -> String {
        match self {
            TextureEvent::Composited { revision, .. } => {
                format!("Texture composited (revision {})", revision)
            }
            TextureEvent::PreviewRendered { width, height } => {
                format!("Preview rendered at {}x{}", width, height)
            }
        }
    }
}

/// Design element change events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ElementEvent {
    /// An element was added to the store
    Added {
        /// Element id.
        id: u64,
        /// Target garment part id.
        part: String,
    },
    /// An element was removed from the store
    Removed {
        /// Element id.
        id: u64,
    },
    /// An element's placement box moved
    Moved {
        /// Element id.
        id: u64,
    },
    /// An element's size changed
    Resized {
        /// Element id.
        id: u64,
    },
    /// An element's rotation changed
    Rotated {
        /// Element id.
        id: u64,
    },
    /// An element's opacity changed
    OpacityChanged {
        /// Element id.
        id: u64,
    },
    /// The selected element changed
    SelectionChanged {
        /// Newly selected element, if any.
        id: Option<u64>,
    },
}

impl ElementEvent {
    pub fn description(&self) -> String {
        match self {
            ElementEvent::Added { id, part } => format!("Element {} added on part {}", id, part),
            ElementEvent::Removed { id } => format!("Element {} removed", id),
            ElementEvent::Moved { id } => format!("Element {} moved", id),
            ElementEvent::Resized { id } => format!("Element {} resized", id),
            ElementEvent::Rotated { id } => format!("Element {} rotated", id),
            ElementEvent::OpacityChanged { id } => format!("Element {} opacity changed", id),
            ElementEvent::SelectionChanged { id } => match id {
                Some(id) => format!("Element {} selected", id),
                None => "Selection cleared".to_string(),
            },
        }
    }
}

/// Upload/decode progress events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UploadEvent {
    /// An upload was accepted and its decode started
    Submitted {
        /// Upload ticket.
        ticket: Uuid,
        /// Target slot (part id, or the base-texture slot).
        slot: String,
    },
    /// An upload decoded successfully and its element became visible
    Completed {
        /// Upload ticket.
        ticket: Uuid,
        /// Target slot.
        slot: String,
    },
    /// A newer upload to the same slot replaced this one
    Superseded {
        /// The superseded ticket.
        ticket: Uuid,
        /// Target slot.
        slot: String,
    },
    /// The upload's bytes could not be decoded
    Failed {
        /// Upload ticket.
        ticket: Uuid,
        /// Target slot.
        slot: String,
        /// Decoder diagnostic.
        reason: String,
    },
}

impl UploadEvent {
    pub fn description(&self) -> String {
        match self {
            UploadEvent::Submitted { slot, .. } => format!("Upload submitted for {}", slot),
            UploadEvent::Completed { slot, .. } => format!("Upload completed for {}", slot),
            UploadEvent::Superseded { slot, .. } => format!("Upload superseded for {}", slot),
            UploadEvent::Failed { slot, reason, .. } => {
                format!("Upload failed for {}: {}", slot, reason)
            }
        }
    }
}

/// Garment part events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PartEvent {
    /// A part became the active placement target
    Activated {
        /// Part id.
        id: String,
    },
    /// A part's default placement box was reconfigured
    PlacementChanged {
        /// Part id.
        id: String,
    },
}

impl PartEvent {
    pub fn description(&self) -> String {
        match self {
            PartEvent::Activated { id } => format!("Part {} activated", id),
            PartEvent::PlacementChanged { id } => format!("Part {} placement changed", id),
        }
    }
}

/// Non-fatal error events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ErrorEvent {
    /// An image failed to decode
    Decode {
        /// Decoder diagnostic.
        reason: String,
    },
    /// A mutation was rejected by geometry validation
    Geometry {
        /// Validation diagnostic.
        reason: String,
    },
}

impl ErrorEvent {
    pub fn description(&self) -> String {
        match self {
            ErrorEvent::Decode { reason } => format!("Decode error: {}", reason),
            ErrorEvent::Geometry { reason } => format!("Geometry error: {}", reason),
        }
    }
}
