//! Pointer interaction state machine.
//!
//! Turns pointer input into element selection, part activation, and drag
//! mutation. The machine has three observable states (idle, selected,
//! dragging) plus press bookkeeping for the drag threshold: a press on a
//! selected element arms a potential drag, and pointer travel beyond the
//! threshold starts it.
//!
//! Element hit-testing always runs before part hit-testing: clicking an
//! element selects the element even when it overlaps a part region.

use garmentstudio_core::constants::DRAG_THRESHOLD_PX;
use garmentstudio_core::geometry::DisplayPoint;

use crate::element_store::ElementStore;
use crate::mapper::CoordinateMapper;
use crate::parts::{PartId, PartRegistry};

/// Observable interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerState {
    /// Nothing selected.
    Idle,
    /// An element is selected.
    Selected {
        /// The selected element.
        id: u64,
    },
    /// The selected element is being dragged.
    Dragging {
        /// The dragged element.
        id: u64,
    },
}

/// What a pointer event did, for the session to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    /// Pointer-down landed on an element; it is now selected.
    SelectedElement(u64),
    /// Pointer travel crossed the drag threshold.
    DragStarted(u64),
    /// The dragged element moved.
    DragMoved(u64),
    /// Pointer-up committed the drag.
    DragCommitted(u64),
    /// Pointer-down on empty space inside a part region.
    PartActivated(PartId),
    /// Pointer-down on empty space outside every region.
    SelectionCleared,
    /// Nothing happened.
    Ignored,
}

/// Bookkeeping for a press that may become a drag.
#[derive(Debug, Clone, Copy)]
struct PressInfo {
    id: u64,
    origin: DisplayPoint,
    /// Pointer position minus element display origin at press time.
    offset: (f64, f64),
}

/// Pointer state machine over the element store and part registry.
#[derive(Debug)]
pub struct InteractionController {
    state: PointerState,
    press: Option<PressInfo>,
    active_part: Option<PartId>,
    drag_threshold: f64,
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            state: PointerState::Idle,
            press: None,
            active_part: None,
            drag_threshold: DRAG_THRESHOLD_PX,
        }
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    /// The currently selected element, if any.
    pub fn selected_id(&self) -> Option<u64> {
        match self.state {
            PointerState::Idle => None,
            PointerState::Selected { id } | PointerState::Dragging { id } => Some(id),
        }
    }

    /// The part targeted by the next upload, if any.
    pub fn active_part(&self) -> Option<&PartId> {
        self.active_part.as_ref()
    }

    /// Explicitly set the active placement target.
    pub fn set_active_part(&mut self, part: Option<PartId>) {
        self.active_part = part;
    }

    pub fn set_drag_threshold(&mut self, pixels: f64) {
        if pixels.is_finite() && pixels >= 0.0 {
            self.drag_threshold = pixels;
        }
    }

    /// Clear selection and any armed press.
    pub fn clear_selection(&mut self) {
        self.state = PointerState::Idle;
        self.press = None;
    }

    /// Tell the controller an element was removed from the store.
    ///
    /// If it was the selected element, the machine drops back to idle.
    pub fn notify_removed(&mut self, id: u64) {
        if self.selected_id() == Some(id) {
            self.clear_selection();
        }
    }

    /// Handle a pointer-down at a canvas-local display position.
    ///
    /// Elements are hit-tested topmost-first against their display-space
    /// bounding boxes; only when no element is hit does the click fall
    /// through to the part regions.
    pub fn pointer_down(
        &mut self,
        pos: DisplayPoint,
        store: &ElementStore,
        registry: &PartRegistry,
        mapper: &CoordinateMapper,
    ) -> PointerOutcome {
        if !pos.is_finite() {
            return PointerOutcome::Ignored;
        }

        if let Some(id) = self.hit_element(pos, store, mapper) {
            // Safe: hit_element only returns ids present in the store
            let element = match store.get(id) {
                Some(e) => e,
                None => return PointerOutcome::Ignored,
            };
            let origin = mapper.to_display(element.uv_position());
            self.state = PointerState::Selected { id };
            self.press = Some(PressInfo {
                id,
                origin: pos,
                offset: pos.offset_from(&origin),
            });
            tracing::debug!("Element {} selected at ({:.1}, {:.1})", id, pos.x, pos.y);
            return PointerOutcome::SelectedElement(id);
        }

        // Empty space: selection is cleared either way; a region hit also
        // retargets the next upload.
        self.clear_selection();
        let uv = mapper.to_uv(pos);
        match registry.hit_test(uv) {
            Some(part) => {
                self.active_part = Some(part.id.clone());
                tracing::debug!("Part {} activated", part.id);
                PointerOutcome::PartActivated(part.id.clone())
            }
            None => PointerOutcome::SelectionCleared,
        }
    }

    /// Handle pointer movement while the button is held.
    ///
    /// Once travel from the press origin exceeds the drag threshold the
    /// machine enters `Dragging` and every subsequent move updates the
    /// element position, clamped so the element stays fully inside the unit
    /// square.
    pub fn pointer_move(
        &mut self,
        pos: DisplayPoint,
        store: &mut ElementStore,
        mapper: &CoordinateMapper,
    ) -> PointerOutcome {
        if !pos.is_finite() {
            return PointerOutcome::Ignored;
        }

        let press = match self.press {
            Some(press) => press,
            None => return PointerOutcome::Ignored,
        };

        match self.state {
            PointerState::Selected { id } if id == press.id => {
                if pos.distance_to(&press.origin) <= self.drag_threshold {
                    return PointerOutcome::Ignored;
                }
                self.state = PointerState::Dragging { id };
                self.drag_to(pos, &press, store, mapper);
                tracing::debug!("Element {} drag started", id);
                PointerOutcome::DragStarted(id)
            }
            PointerState::Dragging { id } => {
                self.drag_to(pos, &press, store, mapper);
                PointerOutcome::DragMoved(id)
            }
            _ => PointerOutcome::Ignored,
        }
    }

    /// Handle pointer-up, committing any drag in progress.
    pub fn pointer_up(
        &mut self,
        pos: DisplayPoint,
        store: &mut ElementStore,
        mapper: &CoordinateMapper,
    ) -> PointerOutcome {
        let press = self.press.take();

        match (self.state, press) {
            (PointerState::Dragging { id }, Some(press)) => {
                if pos.is_finite() {
                    self.drag_to(pos, &press, store, mapper);
                }
                self.state = PointerState::Selected { id };
                tracing::debug!("Element {} drag committed", id);
                PointerOutcome::DragCommitted(id)
            }
            _ => PointerOutcome::Ignored,
        }
    }

    /// Topmost element whose display bounding box contains the point.
    fn hit_element(
        &self,
        pos: DisplayPoint,
        store: &ElementStore,
        mapper: &CoordinateMapper,
    ) -> Option<u64> {
        let ids: Vec<u64> = store.draw_order_iter().collect();
        for id in ids.into_iter().rev() {
            if let Some(element) = store.get(id) {
                let origin = mapper.to_display(element.uv_position());
                let (w, h) = mapper.uv_size_to_display(element.uv_size());
                if pos.x >= origin.x
                    && pos.x < origin.x + w
                    && pos.y >= origin.y
                    && pos.y < origin.y + h
                {
                    return Some(id);
                }
            }
        }
        None
    }

    /// Move the pressed element so it follows the pointer, preserving the
    /// grab offset recorded at press time.
    fn drag_to(
        &self,
        pos: DisplayPoint,
        press: &PressInfo,
        store: &mut ElementStore,
        mapper: &CoordinateMapper,
    ) {
        let target = DisplayPoint::new(pos.x - press.offset.0, pos.y - press.offset.1);
        let uv = mapper.to_uv(target);
        if let Some(element) = store.get_mut(press.id) {
            // Clamping inside the setter keeps the invariant; the pointer
            // being finite makes the UV finite, so this cannot fail.
            let _ = element.set_uv_position(uv);
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}
