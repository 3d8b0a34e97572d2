//! Coordinate mapping between the editor's three spaces.
//!
//! Handles conversion between display pixels (the on-screen canvas),
//! normalized UV coordinates, and texture pixels (the output raster).
//! Conversions are stateless and clamped: no input, including a degenerate
//! canvas size, ever produces NaN or infinity.

use std::fmt;

use garmentstudio_core::constants::{DISPLAY_SIZE, TEXTURE_SIZE};
use garmentstudio_core::geometry::{DisplayPoint, TexturePoint, UvPoint, UvSize};

/// Maps points and sizes between display, UV, and texture space.
///
/// Display coordinates are canvas-local pixels with (0,0) at the top-left of
/// the editing canvas. Callers are responsible for subtracting the canvas's
/// own screen offset before handing pointer positions in; this is the single
/// canonical mapping path, so that subtraction happens in exactly one place.
#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    display_width: f64,
    display_height: f64,
    texture_size: u32,
}

impl CoordinateMapper {
    /// Creates a mapper for the given canvas dimensions and texture
    /// resolution.
    pub fn new(display_width: f64, display_height: f64, texture_size: u32) -> Self {
        Self {
            display_width,
            display_height,
            texture_size,
        }
    }

    /// Gets the canvas width in display pixels.
    pub fn display_width(&self) -> f64 {
        self.display_width
    }

    /// Gets the canvas height in display pixels.
    pub fn display_height(&self) -> f64 {
        self.display_height
    }

    /// Gets the output texture edge length in pixels.
    pub fn texture_size(&self) -> u32 {
        self.texture_size
    }

    /// Sets the canvas dimensions (typically called when the host window
    /// resizes).
    pub fn set_display_size(&mut self, width: f64, height: f64) {
        self.display_width = width;
        self.display_height = height;
    }

    /// True when the canvas has a usable positive, finite size.
    fn display_is_valid(&self) -> bool {
        self.display_width.is_finite()
            && self.display_height.is_finite()
            && self.display_width > 0.0
            && self.display_height > 0.0
    }

    /// Converts a display-pixel point to UV space.
    ///
    /// ```text
    /// uv = display / display_size
    /// ```
    ///
    /// Output is clamped to `[0,1]²`. A degenerate canvas size yields the
    /// UV origin instead of a division failure.
    pub fn to_uv(&self, p: DisplayPoint) -> UvPoint {
        if !self.display_is_valid() || !p.is_finite() {
            return UvPoint::ZERO;
        }
        UvPoint::new(p.x / self.display_width, p.y / self.display_height).clamped()
    }

    /// Converts a UV point to display pixels.
    ///
    /// ```text
    /// display = uv * display_size
    /// ```
    ///
    /// The UV input is clamped into the unit square first, so the result is
    /// always on the canvas.
    pub fn to_display(&self, uv: UvPoint) -> DisplayPoint {
        if !self.display_is_valid() {
            return DisplayPoint::new(0.0, 0.0);
        }
        let uv = uv.clamped();
        DisplayPoint::new(uv.x * self.display_width, uv.y * self.display_height)
    }

    /// Converts a UV point to texture pixels.
    ///
    /// ```text
    /// texture = uv * texture_size
    /// ```
    pub fn to_texture(&self, uv: UvPoint) -> TexturePoint {
        let uv = uv.clamped();
        let size = f64::from(self.texture_size);
        TexturePoint::new(uv.x * size, uv.y * size)
    }

    /// Converts a UV extent to display pixels.
    pub fn uv_size_to_display(&self, size: UvSize) -> (f64, f64) {
        if !self.display_is_valid() {
            return (0.0, 0.0);
        }
        (
            size.width * self.display_width,
            size.height * self.display_height,
        )
    }

    /// Converts a UV extent to texture pixels.
    pub fn uv_size_to_texture(&self, size: UvSize) -> (f64, f64) {
        let t = f64::from(self.texture_size);
        (size.width * t, size.height * t)
    }
}

impl fmt::Display for CoordinateMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Display: {:.0}x{:.0} | Texture: {}x{}",
            self.display_width, self.display_height, self.texture_size, self.texture_size
        )
    }
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::new(DISPLAY_SIZE, DISPLAY_SIZE, TEXTURE_SIZE)
    }
}
