//! The raster pixel buffer strokes are committed into.
//!
//! Strokes are rendered by stamping a filled disc at every point of a
//! Bresenham walk along each segment, which gives line width and round
//! caps/joins in one mechanism.

use std::io::Cursor;

use image::{DynamicImage, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{SurfaceError, SurfaceResult};

/// An RGBA color, 8 bits per channel.
pub type Color = Rgba<u8>;

/// Opaque white.
pub const WHITE: Color = Rgba([255, 255, 255, 255]);

/// Opaque black.
pub const BLACK: Color = Rgba([0, 0, 0, 255]);

/// Encodings a snapshot can be produced in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// PNG, lossless. The format the classifier upload uses.
    #[default]
    Png,
    /// JPEG, lossy (alpha is flattened).
    Jpeg,
}

impl SnapshotFormat {
    /// MIME type for this encoding.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Conventional file extension for this encoding.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// A fixed-size pixel buffer owned by the stroke surface.
///
/// Not exported from the crate: consumers only ever see encoded snapshots.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Raster {
    pixels: RgbaImage,
    background: Color,
}

impl Raster {
    /// Allocate a buffer of the given size, filled with `background`.
    pub(crate) fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, background),
            background,
        }
    }

    pub(crate) fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub(crate) fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Reset every pixel to the background fill.
    pub(crate) fn clear(&mut self) {
        let background = self.background;
        for pixel in self.pixels.pixels_mut() {
            *pixel = background;
        }
    }

    /// Stamp a filled disc centered at (`cx`, `cy`).
    ///
    /// Pixels falling outside the buffer are clipped, so discs may be
    /// stamped at or beyond the edges.
    pub(crate) fn stamp_disc(&mut self, cx: f32, cy: f32, radius: f32, ink: Color) {
        #[allow(clippy::cast_possible_truncation)]
        let (cx, cy) = (cx.round() as i64, cy.round() as i64);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let r = radius.ceil() as i64;
        let r_sq = f64::from(radius) * f64::from(radius);

        for dy in -r..=r {
            for dx in -r..=r {
                #[allow(clippy::cast_precision_loss)]
                let dist_sq = (dx * dx + dy * dy) as f64;
                if dist_sq > r_sq {
                    continue;
                }
                let (x, y) = (cx + dx, cy + dy);
                if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height())
                {
                    continue;
                }
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                self.pixels.put_pixel(x as u32, y as u32, ink);
            }
        }
    }

    /// Draw a segment from (`x0`, `y0`) to (`x1`, `y1`) as a stroked line
    /// of the given half-width.
    ///
    /// Walks the segment with Bresenham and stamps a disc at every step.
    /// A zero-length segment degenerates to a single disc.
    pub(crate) fn draw_segment(
        &mut self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        radius: f32,
        ink: Color,
    ) {
        #[allow(clippy::cast_possible_truncation)]
        let (mut x, mut y) = (x0.round() as i64, y0.round() as i64);
        #[allow(clippy::cast_possible_truncation)]
        let (x1, y1) = (x1.round() as i64, y1.round() as i64);

        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            #[allow(clippy::cast_precision_loss)]
            self.stamp_disc(x as f32, y as f32, radius, ink);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Encode the current pixels into `format`.
    pub(crate) fn encode(&self, format: SnapshotFormat) -> SurfaceResult<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        match format {
            SnapshotFormat::Png => {
                self.pixels
                    .write_to(&mut buf, image::ImageFormat::Png)
                    .map_err(SurfaceError::Encode)?;
            }
            SnapshotFormat::Jpeg => {
                // The JPEG encoder has no alpha channel; flatten first.
                let rgb = DynamicImage::ImageRgba8(self.pixels.clone()).to_rgb8();
                rgb.write_to(&mut buf, image::ImageFormat::Jpeg)
                    .map_err(SurfaceError::Encode)?;
            }
        }
        Ok(buf.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_with_background() {
        let raster = Raster::new(4, 4, WHITE);
        assert!(raster.pixels.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_clear_restores_background() {
        let mut raster = Raster::new(16, 16, WHITE);
        raster.stamp_disc(8.0, 8.0, 3.0, BLACK);
        assert!(raster.pixels.pixels().any(|p| *p == BLACK));

        raster.clear();
        assert_eq!(raster, Raster::new(16, 16, WHITE));
    }

    #[test]
    fn test_stamp_disc_marks_center() {
        let mut raster = Raster::new(16, 16, WHITE);
        raster.stamp_disc(8.0, 8.0, 2.0, BLACK);
        assert_eq!(*raster.pixels.get_pixel(8, 8), BLACK);
        // A corner well outside the disc stays untouched.
        assert_eq!(*raster.pixels.get_pixel(0, 0), WHITE);
    }

    #[test]
    fn test_stamp_disc_clips_at_edges() {
        let mut raster = Raster::new(8, 8, WHITE);
        raster.stamp_disc(0.0, 0.0, 4.0, BLACK);
        raster.stamp_disc(10.0, 10.0, 4.0, BLACK);
        assert_eq!(*raster.pixels.get_pixel(0, 0), BLACK);
    }

    #[test]
    fn test_draw_segment_covers_endpoints() {
        let mut raster = Raster::new(32, 32, WHITE);
        raster.draw_segment(4.0, 4.0, 28.0, 28.0, 1.5, BLACK);
        assert_eq!(*raster.pixels.get_pixel(4, 4), BLACK);
        assert_eq!(*raster.pixels.get_pixel(28, 28), BLACK);
        assert_eq!(*raster.pixels.get_pixel(16, 16), BLACK);
    }

    #[test]
    fn test_draw_degenerate_segment_is_a_dot() {
        let mut raster = Raster::new(16, 16, WHITE);
        raster.draw_segment(8.0, 8.0, 8.0, 8.0, 2.0, BLACK);
        assert_eq!(*raster.pixels.get_pixel(8, 8), BLACK);
    }

    #[test]
    fn test_encode_png_magic_bytes() {
        let raster = Raster::new(4, 4, WHITE);
        let bytes = raster.encode(SnapshotFormat::Png).expect("encode");
        assert!(bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]));
    }

    #[test]
    fn test_encode_jpeg_magic_bytes() {
        let raster = Raster::new(4, 4, WHITE);
        let bytes = raster.encode(SnapshotFormat::Jpeg).expect("encode");
        assert!(bytes.starts_with(&[0xFF, 0xD8, 0xFF]));
    }

    #[test]
    fn test_format_mime_types() {
        assert_eq!(SnapshotFormat::Png.mime_type(), "image/png");
        assert_eq!(SnapshotFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(SnapshotFormat::Png.extension(), "png");
    }
}
