//! Engine-wide constants.

/// Edge length of the full-resolution output texture, in pixels.
pub const TEXTURE_SIZE: u32 = 2048;

/// Default edge length of the on-screen editing canvas, in pixels.
pub const DISPLAY_SIZE: f64 = 400.0;

/// Pointer travel (in display pixels) before a press on a selected element
/// becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// Quiet period after the last interactive edit before a full-resolution
/// recomposite fires, in milliseconds.
pub const RECOMPOSITE_QUIET_MS: u64 = 150;

/// Maximum depth of the undo/redo stacks.
pub const UNDO_DEPTH: usize = 50;
