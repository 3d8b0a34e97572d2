//! Undoable edit commands.
//!
//! Each command captures the minimum state needed to reverse one edit to the
//! element store. Add/remove commands stow the displaced element (and its z
//! position) when undone so redo can restore it exactly.

use garmentstudio_core::geometry::{UvPoint, UvSize};

use crate::element::DesignElement;
use crate::element_store::ElementStore;

/// An edit that can be applied and undone against the store.
#[derive(Debug, Clone)]
pub enum StudioCommand {
    AddElement(AddElement),
    RemoveElement(RemoveElement),
    MoveElement(MoveElement),
    ResizeElement(ResizeElement),
    RotateElement(RotateElement),
    SetOpacity(SetOpacity),
    Composite(CompositeCommand),
}

#[derive(Debug, Clone)]
pub struct AddElement {
    pub id: u64,
    /// Z position of the element; captured when undone.
    pub index: usize,
    /// None while the element lives on the canvas, Some when undone.
    pub element: Option<DesignElement>,
}

#[derive(Debug, Clone)]
pub struct RemoveElement {
    pub id: u64,
    /// Z position the element held before removal.
    pub index: usize,
    /// Some while removed, None once restored by undo.
    pub element: Option<DesignElement>,
}

#[derive(Debug, Clone)]
pub struct MoveElement {
    pub id: u64,
    pub from: UvPoint,
    pub to: UvPoint,
}

#[derive(Debug, Clone)]
pub struct ResizeElement {
    pub id: u64,
    pub from: UvSize,
    pub to: UvSize,
}

#[derive(Debug, Clone)]
pub struct RotateElement {
    pub id: u64,
    pub from: f64,
    pub to: f64,
}

#[derive(Debug, Clone)]
pub struct SetOpacity {
    pub id: u64,
    pub from: f64,
    pub to: f64,
}

/// Several commands applied as one undo step.
#[derive(Debug, Clone)]
pub struct CompositeCommand {
    pub commands: Vec<StudioCommand>,
    pub name: String,
}

impl StudioCommand {
    pub fn apply(&mut self, store: &mut ElementStore) {
        match self {
            StudioCommand::AddElement(cmd) => {
                if let Some(element) = cmd.element.take() {
                    store.insert_at(cmd.index, element);
                }
                // None means the element was just added by the session and
                // is already on the canvas.
            }
            StudioCommand::RemoveElement(cmd) => {
                if let Some((index, element)) = store.remove(cmd.id) {
                    cmd.index = index;
                    cmd.element = Some(element);
                }
            }
            StudioCommand::MoveElement(cmd) => {
                if let Some(element) = store.get_mut(cmd.id) {
                    // Captured from a validated state; cannot fail.
                    let _ = element.set_uv_position(cmd.to);
                }
            }
            StudioCommand::ResizeElement(cmd) => {
                if let Some(element) = store.get_mut(cmd.id) {
                    let _ = element.set_uv_size(cmd.to);
                }
            }
            StudioCommand::RotateElement(cmd) => {
                if let Some(element) = store.get_mut(cmd.id) {
                    let _ = element.set_rotation_degrees(cmd.to);
                }
            }
            StudioCommand::SetOpacity(cmd) => {
                if let Some(element) = store.get_mut(cmd.id) {
                    let _ = element.set_opacity(cmd.to);
                }
            }
            StudioCommand::Composite(cmd) => {
                for sub in &mut cmd.commands {
                    sub.apply(store);
                }
            }
        }
    }

    pub fn undo(&mut self, store: &mut ElementStore) {
        match self {
            StudioCommand::AddElement(cmd) => {
                if let Some((index, element)) = store.remove(cmd.id) {
                    cmd.index = index;
                    cmd.element = Some(element);
                }
            }
            StudioCommand::RemoveElement(cmd) => {
                if let Some(element) = cmd.element.take() {
                    store.insert_at(cmd.index, element);
                }
            }
            StudioCommand::MoveElement(cmd) => {
                if let Some(element) = store.get_mut(cmd.id) {
                    let _ = element.set_uv_position(cmd.from);
                }
            }
            StudioCommand::ResizeElement(cmd) => {
                if let Some(element) = store.get_mut(cmd.id) {
                    let _ = element.set_uv_size(cmd.from);
                }
            }
            StudioCommand::RotateElement(cmd) => {
                if let Some(element) = store.get_mut(cmd.id) {
                    let _ = element.set_rotation_degrees(cmd.from);
                }
            }
            StudioCommand::SetOpacity(cmd) => {
                if let Some(element) = store.get_mut(cmd.id) {
                    let _ = element.set_opacity(cmd.from);
                }
            }
            StudioCommand::Composite(cmd) => {
                for sub in cmd.commands.iter_mut().rev() {
                    sub.undo(store);
                }
            }
        }
    }

    /// Display name for history UI.
    pub fn name(&self) -> &str {
        match self {
            StudioCommand::AddElement(_) => "Add Artwork",
            StudioCommand::RemoveElement(_) => "Remove Artwork",
            StudioCommand::MoveElement(_) => "Move Artwork",
            StudioCommand::ResizeElement(_) => "Resize Artwork",
            StudioCommand::RotateElement(_) => "Rotate Artwork",
            StudioCommand::SetOpacity(_) => "Change Opacity",
            StudioCommand::Composite(cmd) => &cmd.name,
        }
    }
}
