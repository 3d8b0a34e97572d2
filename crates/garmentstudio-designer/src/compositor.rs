//! Texture compositor.
//!
//! Rasterizes the base diffuse texture plus every design element, in
//! z-order, into one output bitmap using tiny-skia for the transforms and
//! source-over blending. Composition is a pure function: identical inputs
//! always yield byte-identical output.
//!
//! Two entry points share the same routine at different resolutions: the
//! full-resolution texture for the 3D viewer and a display-resolution
//! preview for immediate on-screen feedback. They render into independent
//! buffers, never a shared resized canvas.

use std::sync::Arc;

use image::RgbaImage;
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::element_store::ElementStore;
use crate::parts::PartId;

/// Immutable snapshot of a composited texture.
///
/// The engine never hands out a live reference to an internal buffer; each
/// composite produces a fresh snapshot with a monotonically increasing
/// revision, and consumers replace their held snapshot wholesale.
#[derive(Debug, Clone)]
pub struct TextureMap {
    image: Arc<RgbaImage>,
    revision: u64,
}

impl TextureMap {
    pub fn new(image: RgbaImage, revision: u64) -> Self {
        Self {
            image: Arc::new(image),
            revision,
        }
    }

    pub fn image(&self) -> &Arc<RgbaImage> {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Collaborator interface for the 3D viewer.
///
/// Implementations apply the bitmap as a mesh material map and must support
/// rapid repeated replacement: each call supersedes the previously applied
/// snapshot rather than accumulating alongside it.
pub trait TextureSink {
    fn apply_texture(&mut self, texture: &TextureMap, part: Option<&PartId>);
}

/// Composite the base texture and all ready elements at the given output
/// resolution.
///
/// Elements draw in ascending store order. Each element's bitmap is scaled
/// into its placement box (`uv * out_size`), rotated about the box center,
/// and source-over blended scaled by the element opacity. Elements whose
/// bitmap is still decoding (or failed) are skipped for this pass only.
///
/// A missing base leaves the background transparent; a base at a different
/// resolution is scaled to fill the output.
pub fn composite(
    base: Option<&RgbaImage>,
    elements: &ElementStore,
    width: u32,
    height: u32,
) -> RgbaImage {
    let Some(mut pixmap) = Pixmap::new(width, height) else {
        return RgbaImage::new(width, height);
    };

    if let Some(base) = base {
        draw_scaled_to_fill(&mut pixmap, base);
    }

    let mut skipped = 0usize;
    for element in elements.iter() {
        let Some(bitmap) = element.image().image() else {
            skipped += 1;
            continue;
        };
        if bitmap.width() == 0 || bitmap.height() == 0 {
            skipped += 1;
            continue;
        }

        let Some(src) = pixmap_from_rgba(bitmap) else {
            skipped += 1;
            continue;
        };

        let pos = element.uv_position();
        let size = element.uv_size();
        let box_x = (pos.x * f64::from(width)) as f32;
        let box_y = (pos.y * f64::from(height)) as f32;
        let box_w = (size.width * f64::from(width)) as f32;
        let box_h = (size.height * f64::from(height)) as f32;

        let sx = box_w / bitmap.width() as f32;
        let sy = box_h / bitmap.height() as f32;

        // Scale the bitmap into its placement box, then rotate the box
        // about its center.
        let mut transform = Transform::from_row(sx, 0.0, 0.0, sy, box_x, box_y);
        let rotation = element.rotation_degrees();
        if rotation != 0.0 {
            let cx = box_x + box_w / 2.0;
            let cy = box_y + box_h / 2.0;
            transform = transform.post_concat(Transform::from_rotate_at(rotation as f32, cx, cy));
        }

        let paint = PixmapPaint {
            opacity: element.opacity() as f32,
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };

        pixmap.draw_pixmap(0, 0, src.as_ref(), &paint, transform, None);
    }

    if skipped > 0 {
        tracing::debug!("Composite skipped {} element(s) with unavailable bitmaps", skipped);
    }

    rgba_from_pixmap(&pixmap)
}

/// Draw a bitmap scaled to cover the whole pixmap.
fn draw_scaled_to_fill(pixmap: &mut Pixmap, image: &RgbaImage) {
    if image.width() == 0 || image.height() == 0 {
        return;
    }
    let Some(src) = pixmap_from_rgba(image) else {
        return;
    };
    let sx = pixmap.width() as f32 / image.width() as f32;
    let sy = pixmap.height() as f32 / image.height() as f32;
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(
        0,
        0,
        src.as_ref(),
        &paint,
        Transform::from_scale(sx, sy),
        None,
    );
}

/// Convert a straight-alpha RGBA image into a premultiplied pixmap.
pub fn pixmap_from_rgba(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (pixel, out) in image.pixels().zip(pixmap.pixels_mut()) {
        let [r, g, b, a] = pixel.0;
        *out = tiny_skia::ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Convert a premultiplied pixmap back to a straight-alpha RGBA image.
pub fn rgba_from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let pixels = pixmap.pixels();
    RgbaImage::from_fn(width, pixmap.height(), |x, y| {
        let c = pixels[(y * width + x) as usize].demultiply();
        image::Rgba([c.red(), c.green(), c.blue(), c.alpha()])
    })
}
