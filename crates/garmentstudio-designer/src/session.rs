//! Studio session: the single owner of one design-editing workflow.
//!
//! Wires the coordinate mapper, part registry, element store, interaction
//! controller, upload queue, recomposite scheduler, and undo history into
//! one API the host UI drives. The session runs on a single thread; the
//! only asynchronous work is image decoding, whose results re-enter through
//! [`StudioSession::pump_uploads`].
//!
//! Pointer entry points take canvas-local display coordinates: the host
//! subtracts the canvas's own screen offset before calling in, and all
//! coordinate conversion happens through the one [`CoordinateMapper`] path.

use std::sync::Arc;
use std::time::Instant;

use image::RgbaImage;

use garmentstudio_core::constants::UNDO_DEPTH;
use garmentstudio_core::error::{ConfigError, Error, Result};
use garmentstudio_core::event_bus::{
    ElementEvent, ErrorEvent, EventBus, PartEvent, StudioEvent, TextureEvent, UploadEvent,
};
use garmentstudio_core::geometry::{DisplayPoint, UvPoint, UvRect, UvSize};

use crate::commands::{
    AddElement, CompositeCommand, MoveElement, RemoveElement, ResizeElement, RotateElement,
    SetOpacity, StudioCommand,
};
use crate::compositor::{composite, TextureMap, TextureSink};
use crate::element::{DesignElement, ImageSlot};
use crate::element_store::ElementStore;
use crate::interaction::{InteractionController, PointerOutcome, PointerState};
use crate::mapper::CoordinateMapper;
use crate::parts::{PartId, PartRegistry};
use crate::scheduler::RecompositeScheduler;
use crate::upload::{DecodeOutcome, UploadQueue, UploadTarget, UploadTicket};

/// One design-editing session over one garment model.
pub struct StudioSession {
    mapper: CoordinateMapper,
    registry: PartRegistry,
    store: ElementStore,
    interaction: InteractionController,
    scheduler: RecompositeScheduler,
    uploads: UploadQueue,
    events: EventBus,
    base: Option<Arc<RgbaImage>>,
    revision: u64,
    last_texture: Option<TextureMap>,
    sink: Option<Box<dyn TextureSink>>,
    undo_stack: Vec<StudioCommand>,
    redo_stack: Vec<StudioCommand>,
    /// Element position at drag start, for the undo record.
    drag_from: Option<UvPoint>,
}

impl StudioSession {
    /// Creates a session with the default part layout and resolutions.
    pub fn new() -> Self {
        Self::with_registry(PartRegistry::default())
    }

    /// Creates a session over a custom part registry.
    pub fn with_registry(registry: PartRegistry) -> Self {
        Self {
            mapper: CoordinateMapper::default(),
            registry,
            store: ElementStore::new(),
            interaction: InteractionController::new(),
            scheduler: RecompositeScheduler::default(),
            uploads: UploadQueue::new(),
            events: EventBus::new(),
            base: None,
            revision: 0,
            last_texture: None,
            sink: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            drag_from: None,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Resize the editing canvas (host window resize).
    pub fn set_display_size(&mut self, width: f64, height: f64) {
        self.mapper.set_display_size(width, height);
    }

    pub fn registry(&self) -> &PartRegistry {
        &self.registry
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn state(&self) -> PointerState {
        self.interaction.state()
    }

    pub fn selected_element(&self) -> Option<&DesignElement> {
        self.interaction
            .selected_id()
            .and_then(|id| self.store.get(id))
    }

    pub fn active_part(&self) -> Option<&PartId> {
        self.interaction.active_part()
    }

    /// Explicitly set the placement target for the next upload.
    pub fn set_active_part(&mut self, part: Option<PartId>) {
        self.interaction.set_active_part(part);
    }

    pub fn last_texture(&self) -> Option<&TextureMap> {
        self.last_texture.as_ref()
    }

    /// Install the 3D-viewer collaborator that receives each new texture
    /// snapshot.
    pub fn set_texture_sink(&mut self, sink: Box<dyn TextureSink>) {
        self.sink = Some(sink);
    }

    // ------------------------------------------------------------------
    // Part configuration
    // ------------------------------------------------------------------

    /// Reconfigure a part's default placement box.
    pub fn set_part_placement(&mut self, id: &PartId, rect: UvRect) -> Result<()> {
        self.registry.set_placement(id, rect)?;
        self.events
            .publish(StudioEvent::Part(PartEvent::PlacementChanged {
                id: id.to_string(),
            }))
            .ok();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    /// Pointer-down at a canvas-local display position.
    pub fn pointer_down(&mut self, pos: DisplayPoint) -> PointerOutcome {
        let prev_selected = self.interaction.selected_id();
        let outcome = self
            .interaction
            .pointer_down(pos, &self.store, &self.registry, &self.mapper);

        match &outcome {
            PointerOutcome::SelectedElement(id) => {
                self.drag_from = self.store.get(*id).map(|e| e.uv_position());
                if prev_selected != Some(*id) {
                    self.events
                        .publish(StudioEvent::Element(ElementEvent::SelectionChanged {
                            id: Some(*id),
                        }))
                        .ok();
                }
            }
            PointerOutcome::PartActivated(part) => {
                self.events
                    .publish(StudioEvent::Part(PartEvent::Activated {
                        id: part.to_string(),
                    }))
                    .ok();
                if prev_selected.is_some() {
                    self.events
                        .publish(StudioEvent::Element(ElementEvent::SelectionChanged {
                            id: None,
                        }))
                        .ok();
                }
            }
            PointerOutcome::SelectionCleared => {
                if prev_selected.is_some() {
                    self.events
                        .publish(StudioEvent::Element(ElementEvent::SelectionChanged {
                            id: None,
                        }))
                        .ok();
                }
            }
            _ => {}
        }

        outcome
    }

    /// Pointer movement with the button held.
    ///
    /// Drag moves update the element immediately (the preview follows), but
    /// the expensive full-resolution recomposite is deferred to the
    /// trailing edge of the move burst.
    pub fn pointer_move(&mut self, pos: DisplayPoint) -> PointerOutcome {
        let outcome = self.interaction.pointer_move(pos, &mut self.store, &self.mapper);
        match &outcome {
            PointerOutcome::DragStarted(_) | PointerOutcome::DragMoved(_) => {
                self.scheduler.mark_interactive(Instant::now());
            }
            _ => {}
        }
        outcome
    }

    /// Pointer-up, committing any drag in progress.
    pub fn pointer_up(&mut self, pos: DisplayPoint) -> PointerOutcome {
        let outcome = self.interaction.pointer_up(pos, &mut self.store, &self.mapper);
        if let PointerOutcome::DragCommitted(id) = &outcome {
            let id = *id;
            if let Some(element) = self.store.get(id) {
                let to = element.uv_position();
                let from = self.drag_from.take().unwrap_or(to);
                self.push_command(StudioCommand::MoveElement(MoveElement { id, from, to }));
            }
            self.scheduler.mark_dirty(Instant::now());
            self.events
                .publish(StudioEvent::Element(ElementEvent::Moved { id }))
                .ok();
        }
        outcome
    }

    // ------------------------------------------------------------------
    // Uploads
    // ------------------------------------------------------------------

    /// Upload artwork bytes onto a garment part.
    ///
    /// The element appears immediately at the part's default placement box
    /// (fully opaque, unrotated) with its bitmap pending; the compositor
    /// picks the pixels up once the decode lands. A newer upload to the
    /// same part supersedes an in-flight one. Must be called within a tokio
    /// runtime.
    ///
    /// With `part` unset, the active part from the last region click is the
    /// target.
    pub fn upload_artwork(&mut self, part: Option<PartId>, bytes: Vec<u8>) -> Result<UploadTicket> {
        let part = match part.or_else(|| self.interaction.active_part().cloned()) {
            Some(part) => part,
            None => return Err(Error::other("No target part selected for upload")),
        };
        let placement = self
            .registry
            .placement(&part)
            .ok_or_else(|| ConfigError::UnknownPart { id: part.to_string() })?;

        let id = self.store.generate_id();
        let (ticket, superseded) =
            self.uploads
                .submit(UploadTarget::Part(part.clone()), Some(id), bytes);

        if let Some(old) = superseded {
            if let Some(old_id) = old.element_id {
                if self.store.remove(old_id).is_some() {
                    self.interaction.notify_removed(old_id);
                    self.events
                        .publish(StudioEvent::Element(ElementEvent::Removed { id: old_id }))
                        .ok();
                }
            }
            self.events
                .publish(StudioEvent::Upload(UploadEvent::Superseded {
                    ticket: old.ticket.uuid(),
                    slot: part.to_string(),
                }))
                .ok();
            tracing::debug!("{} superseded by {}", old.ticket, ticket);
        }

        let element = DesignElement::new(
            id,
            part.clone(),
            placement,
            ImageSlot::Pending {
                ticket: ticket.uuid(),
            },
        );
        self.store.insert(element);
        self.push_command(StudioCommand::AddElement(AddElement {
            id,
            index: self.store.len().saturating_sub(1),
            element: None,
        }));

        self.events
            .publish(StudioEvent::Upload(UploadEvent::Submitted {
                ticket: ticket.uuid(),
                slot: part.to_string(),
            }))
            .ok();
        self.events
            .publish(StudioEvent::Element(ElementEvent::Added {
                id,
                part: part.to_string(),
            }))
            .ok();

        Ok(ticket)
    }

    /// Upload a new base diffuse texture. Must be called within a tokio
    /// runtime.
    pub fn upload_base(&mut self, bytes: Vec<u8>) -> Result<UploadTicket> {
        let (ticket, superseded) = self.uploads.submit(UploadTarget::Base, None, bytes);
        if let Some(old) = superseded {
            self.events
                .publish(StudioEvent::Upload(UploadEvent::Superseded {
                    ticket: old.ticket.uuid(),
                    slot: "base".to_string(),
                }))
                .ok();
        }
        self.events
            .publish(StudioEvent::Upload(UploadEvent::Submitted {
                ticket: ticket.uuid(),
                slot: "base".to_string(),
            }))
            .ok();
        Ok(ticket)
    }

    /// Set the base texture from an already decoded bitmap.
    pub fn set_base_texture(&mut self, image: RgbaImage) {
        self.base = Some(Arc::new(image));
        self.scheduler.mark_dirty(Instant::now());
    }

    /// Drain finished decodes into the session.
    ///
    /// Called from the host event pump. Returns how many uploads became
    /// visible (stale and failed decodes are absorbed without touching the
    /// last good texture).
    pub fn pump_uploads(&mut self) -> usize {
        let outcomes = self.uploads.drain_completed();
        let mut applied = 0;
        for outcome in outcomes {
            if self.apply_decode(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Apply one finished decode. Exposed for deterministic tests.
    pub fn apply_decode(&mut self, outcome: DecodeOutcome) -> bool {
        let slot = outcome.target.slot_name();

        if !self.uploads.accept(&outcome) {
            // A newer upload owns this slot; drop the stale result and make
            // sure its element is gone.
            if let Some(element_id) = outcome.element_id {
                if self.store.remove(element_id).is_some() {
                    self.interaction.notify_removed(element_id);
                }
            }
            self.events
                .publish(StudioEvent::Upload(UploadEvent::Superseded {
                    ticket: outcome.ticket.uuid(),
                    slot,
                }))
                .ok();
            return false;
        }

        match outcome.result {
            Ok(image) => {
                match &outcome.target {
                    UploadTarget::Base => {
                        self.base = Some(Arc::new(image));
                    }
                    UploadTarget::Part(_) => {
                        let Some(element_id) = outcome.element_id else {
                            return false;
                        };
                        match self.store.get_mut(element_id) {
                            Some(element) => {
                                element.set_image(ImageSlot::Ready(Arc::new(image)));
                            }
                            // Removed by the user while decoding; nothing to
                            // show.
                            None => return false,
                        }
                    }
                }
                self.scheduler.mark_dirty(Instant::now());
                self.events
                    .publish(StudioEvent::Upload(UploadEvent::Completed {
                        ticket: outcome.ticket.uuid(),
                        slot,
                    }))
                    .ok();
                true
            }
            Err(err) => {
                tracing::warn!("Decode failed for slot {}: {}", slot, err);
                if let Some(element_id) = outcome.element_id {
                    if self.store.remove(element_id).is_some() {
                        self.interaction.notify_removed(element_id);
                        self.events
                            .publish(StudioEvent::Element(ElementEvent::Removed {
                                id: element_id,
                            }))
                            .ok();
                    }
                }
                self.events
                    .publish(StudioEvent::Upload(UploadEvent::Failed {
                        ticket: outcome.ticket.uuid(),
                        slot,
                        reason: err.to_string(),
                    }))
                    .ok();
                self.events
                    .publish(StudioEvent::Error(ErrorEvent::Decode {
                        reason: err.to_string(),
                    }))
                    .ok();
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Element mutation
    // ------------------------------------------------------------------

    /// Move an element to a new UV position (clamped into the unit square).
    pub fn move_element(&mut self, id: u64, to: UvPoint) -> Result<()> {
        let from = self.element(id)?.uv_position();
        self.element_mut(id)?.set_uv_position(to)?;
        let to = self.element(id)?.uv_position();
        self.push_command(StudioCommand::MoveElement(MoveElement { id, from, to }));
        self.scheduler.mark_dirty(Instant::now());
        self.events
            .publish(StudioEvent::Element(ElementEvent::Moved { id }))
            .ok();
        Ok(())
    }

    /// Resize an element. Rejected outright when the size is out of range.
    pub fn resize_element(&mut self, id: u64, to: UvSize) -> Result<()> {
        let from = self.element(id)?.uv_size();
        let from_pos = self.element(id)?.uv_position();
        self.element_mut(id)?.set_uv_size(to)?;
        let to_pos = self.element(id)?.uv_position();

        // Growing the box may have re-clamped the position; record that as
        // part of the same undo step so undo restores the exact prior state.
        let resize = StudioCommand::ResizeElement(ResizeElement { id, from, to });
        let cmd = if to_pos == from_pos {
            resize
        } else {
            StudioCommand::Composite(CompositeCommand {
                commands: vec![
                    StudioCommand::MoveElement(MoveElement {
                        id,
                        from: from_pos,
                        to: to_pos,
                    }),
                    resize,
                ],
                name: "Resize Artwork".to_string(),
            })
        };
        self.push_command(cmd);
        self.scheduler.mark_dirty(Instant::now());
        self.events
            .publish(StudioEvent::Element(ElementEvent::Resized { id }))
            .ok();
        Ok(())
    }

    /// Rotate an element (normalized into `[0,360)`).
    pub fn rotate_element(&mut self, id: u64, degrees: f64) -> Result<()> {
        let from = self.element(id)?.rotation_degrees();
        self.element_mut(id)?.set_rotation_degrees(degrees)?;
        let to = self.element(id)?.rotation_degrees();
        self.push_command(StudioCommand::RotateElement(RotateElement { id, from, to }));
        self.scheduler.mark_dirty(Instant::now());
        self.events
            .publish(StudioEvent::Element(ElementEvent::Rotated { id }))
            .ok();
        Ok(())
    }

    /// Change an element's opacity.
    pub fn set_element_opacity(&mut self, id: u64, opacity: f64) -> Result<()> {
        let from = self.element(id)?.opacity();
        self.element_mut(id)?.set_opacity(opacity)?;
        self.push_command(StudioCommand::SetOpacity(SetOpacity {
            id,
            from,
            to: opacity,
        }));
        self.scheduler.mark_dirty(Instant::now());
        self.events
            .publish(StudioEvent::Element(ElementEvent::OpacityChanged { id }))
            .ok();
        Ok(())
    }

    /// Remove an element; if it was selected the controller returns to
    /// idle.
    pub fn remove_element(&mut self, id: u64) -> Result<()> {
        if !self.store.contains(id) {
            return Err(Error::other(format!("Unknown element id {}", id)));
        }
        self.push_command(StudioCommand::RemoveElement(RemoveElement {
            id,
            index: 0,
            element: None,
        }));
        self.interaction.notify_removed(id);
        self.scheduler.mark_dirty(Instant::now());
        self.events
            .publish(StudioEvent::Element(ElementEvent::Removed { id }))
            .ok();
        Ok(())
    }

    /// Remove the currently selected element.
    pub fn remove_selected(&mut self) -> Result<()> {
        match self.interaction.selected_id() {
            Some(id) => self.remove_element(id),
            None => Err(Error::other("No element selected")),
        }
    }

    /// Raise an element to the top of the stacking order.
    pub fn bring_to_front(&mut self, id: u64) -> bool {
        let moved = self.store.bring_to_front(id);
        if moved {
            self.scheduler.mark_dirty(Instant::now());
        }
        moved
    }

    /// Lower an element to the bottom of the stacking order.
    pub fn send_to_back(&mut self, id: u64) -> bool {
        let moved = self.store.send_to_back(id);
        if moved {
            self.scheduler.mark_dirty(Instant::now());
        }
        moved
    }

    fn element(&self, id: u64) -> Result<&DesignElement> {
        self.store
            .get(id)
            .ok_or_else(|| Error::other(format!("Unknown element id {}", id)))
    }

    fn element_mut(&mut self, id: u64) -> Result<&mut DesignElement> {
        self.store
            .get_mut(id)
            .ok_or_else(|| Error::other(format!("Unknown element id {}", id)))
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Apply a command and push it onto the undo stack.
    fn push_command(&mut self, mut cmd: StudioCommand) {
        cmd.apply(&mut self.store);
        self.undo_stack.push(cmd);
        self.redo_stack.clear();
        if self.undo_stack.len() > UNDO_DEPTH {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last edit.
    pub fn undo(&mut self) {
        if let Some(mut cmd) = self.undo_stack.pop() {
            cmd.undo(&mut self.store);
            self.redo_stack.push(cmd);
            self.sync_selection();
            self.scheduler.mark_dirty(Instant::now());
        }
    }

    /// Redo the last undone edit.
    pub fn redo(&mut self) {
        if let Some(mut cmd) = self.redo_stack.pop() {
            cmd.apply(&mut self.store);
            self.undo_stack.push(cmd);
            self.sync_selection();
            self.scheduler.mark_dirty(Instant::now());
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drop selection if its element vanished through undo/redo.
    fn sync_selection(&mut self) {
        if let Some(id) = self.interaction.selected_id() {
            if !self.store.contains(id) {
                self.interaction.notify_removed(id);
            }
        }
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Render the cheap display-resolution preview.
    ///
    /// Always immediate; this is what keeps dragging responsive while the
    /// full-resolution texture waits for the quiet period.
    pub fn render_preview(&self) -> RgbaImage {
        let width = self.mapper.display_width().max(1.0) as u32;
        let height = self.mapper.display_height().max(1.0) as u32;
        let preview = composite(self.base.as_deref(), &self.store, width, height);
        self.events
            .publish(StudioEvent::Texture(TextureEvent::PreviewRendered {
                width,
                height,
            }))
            .ok();
        preview
    }

    /// Run a full-resolution composite unconditionally and hand the
    /// snapshot to the texture sink.
    pub fn composite_now(&mut self) -> TextureMap {
        let size = self.mapper.texture_size();
        let image = composite(self.base.as_deref(), &self.store, size, size);
        self.revision += 1;
        let texture = TextureMap::new(image, self.revision);
        self.last_texture = Some(texture.clone());
        if let Some(sink) = self.sink.as_mut() {
            sink.apply_texture(&texture, None);
        }
        self.scheduler.acknowledge();
        self.events
            .publish(StudioEvent::Texture(TextureEvent::Composited {
                revision: texture.revision(),
                width: texture.width(),
                height: texture.height(),
            }))
            .ok();
        tracing::debug!("Composited texture revision {}", texture.revision());
        texture
    }

    /// Recomposite if the scheduler says the time is right.
    ///
    /// The host calls this from its tick/idle handler with the current
    /// instant.
    pub fn maybe_recomposite(&mut self, now: Instant) -> Option<TextureMap> {
        if self.scheduler.should_recomposite(now) {
            Some(self.composite_now())
        } else {
            None
        }
    }

    /// Whether edits are waiting for a full-resolution recomposite.
    pub fn has_pending_recomposite(&self) -> bool {
        self.scheduler.is_dirty()
    }

    /// Number of uploads still decoding.
    pub fn uploads_in_flight(&self) -> usize {
        self.uploads.in_flight()
    }
}

impl Default for StudioSession {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StudioSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudioSession")
            .field("elements", &self.store.len())
            .field("state", &self.interaction.state())
            .field("revision", &self.revision)
            .field("uploads_in_flight", &self.uploads.in_flight())
            .finish()
    }
}
