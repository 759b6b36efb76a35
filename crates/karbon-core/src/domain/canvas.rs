//! The raster canvas and its stamping primitives.
//!
//! A [`Canvas`] is an RGB pixel grid sized exactly to the active monitor with
//! its origin at local (0, 0).  It is mutated only through three primitives:
//!
//! | Primitive        | Used for                                  |
//! |------------------|-------------------------------------------|
//! | `stamp_point`    | pointer movement (1 px trail)             |
//! | `stamp_segment`  | optional connected movement (1 px line)   |
//! | `stamp_disc`     | button presses (filled circle)            |
//!
//! Every primitive is clipped to the canvas: pixels that would land outside
//! `0..width × 0..height` are skipped, everything inside is painted.

use image::{Rgb, RgbImage};

/// An opaque 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Creates a colour from its components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn to_pixel(self) -> Rgb<u8> {
        Rgb([self.r, self.g, self.b])
    }

    fn from_pixel(pixel: &Rgb<u8>) -> Self {
        let [r, g, b] = pixel.0;
        Self { r, g, b }
    }
}

/// Canvas background (black).
pub const BACKGROUND_COLOR: Color = Color::new(0, 0, 0);
/// Pointer movement trail (turquoise).
pub const TRAIL_COLOR: Color = Color::new(64, 224, 208);
/// Left-button press (yellow).
pub const PRIMARY_CLICK_COLOR: Color = Color::new(255, 255, 0);
/// Right-button press (purple).
pub const SECONDARY_CLICK_COLOR: Color = Color::new(128, 0, 128);
/// Disc radius for a left-button press.
pub const PRIMARY_CLICK_RADIUS: u32 = 4;
/// Disc radius for a right-button press.
pub const SECONDARY_CLICK_RADIUS: u32 = 6;

/// A persistent RGB raster surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// Creates a canvas filled with [`BACKGROUND_COLOR`].
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, BACKGROUND_COLOR.to_pixel()),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Returns the colour at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image.get_pixel_checked(x, y).map(Color::from_pixel)
    }

    /// Fills the whole canvas with [`BACKGROUND_COLOR`].  Idempotent.
    pub fn clear(&mut self) {
        let background = BACKGROUND_COLOR.to_pixel();
        for pixel in self.image.pixels_mut() {
            *pixel = background;
        }
    }

    /// Returns `true` when every pixel equals `color`.
    pub fn is_uniform(&self, color: Color) -> bool {
        let expected = color.to_pixel();
        self.image.pixels().all(|p| *p == expected)
    }

    /// Paints a single pixel.  Out-of-range coordinates are ignored.
    pub fn stamp_point(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        self.image.put_pixel(x as u32, y as u32, color.to_pixel());
    }

    /// Paints a 1 px line from `from` to `to` (both ends inclusive).
    ///
    /// Uses integer Bresenham so the result is identical on every platform.
    pub fn stamp_segment(&mut self, from: (u32, u32), to: (u32, u32), color: Color) {
        let (mut x0, mut y0) = (from.0 as i64, from.1 as i64);
        let (x1, y1) = (to.0 as i64, to.1 as i64);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.stamp_point(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Paints a filled disc of `radius` centred at `(cx, cy)`.
    ///
    /// A pixel belongs to the disc when `dx² + dy² <= radius²`.
    pub fn stamp_disc(&mut self, cx: u32, cy: u32, radius: u32, color: Color) {
        // Only the part of the bounding box that lies on the canvas.
        let x_end = cx.saturating_add(radius).saturating_add(1).min(self.width());
        let y_end = cy.saturating_add(radius).saturating_add(1).min(self.height());
        for y in cy.saturating_sub(radius)..y_end {
            for x in cx.saturating_sub(radius)..x_end {
                if disc_contains(cx, cy, radius, x, y) {
                    self.stamp_point(x as i64, y as i64, color);
                }
            }
        }
    }

    /// Returns a point-in-time copy of the pixels.
    pub fn snapshot(&self) -> RgbImage {
        self.image.clone()
    }

    /// Borrows the underlying image.
    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }
}

/// Returns `true` when `(x, y)` is inside the disc of `radius` around `(cx, cy)`.
pub fn disc_contains(cx: u32, cy: u32, radius: u32, x: u32, y: u32) -> bool {
    let dx = x as i64 - cx as i64;
    let dy = y as i64 - cy as i64;
    dx * dx + dy * dy <= (radius as i64) * (radius as i64)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
