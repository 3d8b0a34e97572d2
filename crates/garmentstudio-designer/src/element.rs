//! Design elements: placed pieces of user artwork.
//!
//! An element owns a decoded bitmap (or a pending decode ticket), a
//! normalized placement box, a rotation, and an opacity. All mutation goes
//! through validated setters; a rejected mutation leaves the element in its
//! prior state with nothing partially committed.

use std::sync::Arc;

use image::RgbaImage;
use uuid::Uuid;

use garmentstudio_core::error::GeometryError;
use garmentstudio_core::geometry::{UvPoint, UvRect, UvSize};

use crate::parts::PartId;

/// The bitmap backing an element.
///
/// Uploads decode asynchronously, so an element can exist on the canvas
/// before its pixels are available. The compositor skips `Pending` and
/// `Failed` slots for the current pass only; the session recomposites when
/// the decode resolves, so the omission is always transient.
#[derive(Debug, Clone)]
pub enum ImageSlot {
    /// Decode still in flight; `ticket` identifies the upload.
    Pending { ticket: Uuid },
    /// Decoded pixels, shared immutably with the compositor.
    Ready(Arc<RgbaImage>),
    /// Decode failed; the element is normally removed right away.
    Failed,
}

impl ImageSlot {
    pub fn is_ready(&self) -> bool {
        matches!(self, ImageSlot::Ready(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ImageSlot::Pending { .. })
    }

    /// The decoded bitmap, if available.
    pub fn image(&self) -> Option<&Arc<RgbaImage>> {
        match self {
            ImageSlot::Ready(img) => Some(img),
            _ => None,
        }
    }
}

/// One placed piece of user artwork.
///
/// Invariant: the placement box always lies fully inside the unit square
/// (`position + size <= 1` on both axes). Position changes clamp to keep the
/// box inside; size changes that cannot fit are rejected outright.
#[derive(Debug, Clone)]
pub struct DesignElement {
    id: u64,
    part: PartId,
    image: ImageSlot,
    uv_position: UvPoint,
    uv_size: UvSize,
    rotation_degrees: f64,
    opacity: f64,
}

impl DesignElement {
    /// Creates an element filling the given placement box, fully opaque and
    /// unrotated.
    pub fn new(id: u64, part: PartId, placement: UvRect, image: ImageSlot) -> Self {
        Self {
            id,
            part,
            image,
            uv_position: placement.origin(),
            uv_size: placement.size(),
            rotation_degrees: 0.0,
            opacity: 1.0,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn part(&self) -> &PartId {
        &self.part
    }

    pub fn image(&self) -> &ImageSlot {
        &self.image
    }

    pub fn uv_position(&self) -> UvPoint {
        self.uv_position
    }

    pub fn uv_size(&self) -> UvSize {
        self.uv_size
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// The element's placement box.
    pub fn uv_rect(&self) -> UvRect {
        UvRect::new(
            self.uv_position.x,
            self.uv_position.y,
            self.uv_size.width,
            self.uv_size.height,
        )
    }

    /// Replace the bitmap slot (decode completion or failure).
    pub fn set_image(&mut self, image: ImageSlot) {
        self.image = image;
    }

    /// Move the element's placement box.
    ///
    /// Finite inputs are clamped so the box stays fully inside the unit
    /// square; when the proposed position would push the box past an edge,
    /// the offending axis lands exactly at `position + size == 1`.
    pub fn set_uv_position(&mut self, p: UvPoint) -> Result<(), GeometryError> {
        if !p.is_finite() {
            return Err(GeometryError::NonFinite {
                what: "position".to_string(),
            });
        }
        self.uv_position = UvPoint::new(
            p.x.clamp(0.0, 1.0 - self.uv_size.width),
            p.y.clamp(0.0, 1.0 - self.uv_size.height),
        );
        Ok(())
    }

    /// Resize the element's placement box.
    ///
    /// The size must be finite and in `(0,1]` on both axes. On success the
    /// position is re-clamped so the grown box still fits.
    pub fn set_uv_size(&mut self, s: UvSize) -> Result<(), GeometryError> {
        s.validate()?;
        self.uv_size = s;
        self.uv_position = UvPoint::new(
            self.uv_position.x.clamp(0.0, 1.0 - s.width),
            self.uv_position.y.clamp(0.0, 1.0 - s.height),
        );
        Ok(())
    }

    /// Set the rotation, normalized into `[0, 360)`.
    pub fn set_rotation_degrees(&mut self, degrees: f64) -> Result<(), GeometryError> {
        if !degrees.is_finite() {
            return Err(GeometryError::NonFinite {
                what: "rotation".to_string(),
            });
        }
        self.rotation_degrees = degrees.rem_euclid(360.0);
        Ok(())
    }

    /// Set the opacity, which must be finite and within `[0,1]`.
    pub fn set_opacity(&mut self, opacity: f64) -> Result<(), GeometryError> {
        if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
            return Err(GeometryError::OpacityOutOfRange { value: opacity });
        }
        self.opacity = opacity;
        Ok(())
    }
}
