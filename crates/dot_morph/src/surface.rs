//! Render surface abstraction and an in-memory RGBA implementation.
//!
//! The engine only consumes a drawing surface:
//! - Hosts plug in their own surface by implementing [`RenderSurface`].
//! - [`PixelCanvas`] is a software surface backed by an RGBA8 buffer.
use glam::Vec2;

use crate::config::Rgba;

/// Integer pixel rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole surface of the given size.
    pub fn full(size: (u32, u32)) -> Self {
        Self::new(0, 0, size.0, size.1)
    }

    /// Top-left corner as a vector.
    #[inline]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// Number of RGBA bytes needed to hold this rectangle.
    #[inline]
    pub fn byte_len(&self) -> usize {
        4 * self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Decoded RGBA8 image, row-major, `4 * width * height` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba,
        }
    }

    /// Solid image filled with one colour.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let len = width as usize * height as usize;
        let mut rgba = Vec::with_capacity(len * 4);
        for _ in 0..len {
            rgba.extend_from_slice(&color);
        }
        Self::new(width, height, rgba)
    }

    /// Pixel at `(x, y)`, transparent when out of bounds or the buffer is short.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let i = 4 * (y as usize * self.width as usize + x as usize);
        match self.rgba.get(i..i + 4) {
            Some(p) => [p[0], p[1], p[2], p[3]],
            None => [0; 4],
        }
    }
}

/// Drawing surface consumed by the engine.
pub trait RenderSurface {
    /// Surface size in pixels as `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Reset the pixels in `rect` to transparent.
    fn clear(&mut self, rect: PixelRect);

    /// Draw `image` scaled into `rect`.
    fn draw_image(&mut self, image: &DecodedImage, rect: PixelRect);

    /// Read the RGBA bytes of `rect`, row-major, `4 * width * height` bytes long.
    /// Pixels outside the surface read as transparent.
    fn read_pixels(&self, rect: PixelRect) -> Vec<u8>;

    /// Fill a circle centred at `center`.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Clear the entire surface.
    fn clear_all(&mut self) {
        let size = self.size();
        self.clear(PixelRect::full(size));
    }
}

/// Software render surface backed by an RGBA8 buffer.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelCanvas {
    /// Create a transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; 4 * width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    pub fn as_rgba(&self) -> &[u8] {
        &self.data
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.data
    }

    /// Resize the canvas, discarding its contents.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.data = vec![0; 4 * width as usize * height as usize];
    }

    /// Pixel at `(x, y)`, transparent when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        match self.index(x as i64, y as i64) {
            Some(i) => [
                self.data[i],
                self.data[i + 1],
                self.data[i + 2],
                self.data[i + 3],
            ],
            None => [0; 4],
        }
    }

    /// Composite the canvas over an opaque background colour.
    pub fn flatten_onto(&self, background: Rgba) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            let mut dst = [background[0], background[1], background[2], 0xff];
            blend_over(&mut dst, [px[0], px[1], px[2], px[3]]);
            out.extend_from_slice(&dst);
        }
        out
    }

    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(4 * (y as usize * self.width as usize + x as usize))
    }

    /// Intersection of `rect` with the canvas as `(x0, y0, x1, y1)`, exclusive end.
    fn clip(&self, rect: PixelRect) -> Option<(i64, i64, i64, i64)> {
        let x0 = (rect.x as i64).max(0);
        let y0 = (rect.y as i64).max(0);
        let x1 = (rect.x as i64 + rect.width as i64).min(self.width as i64);
        let y1 = (rect.y as i64 + rect.height as i64).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            None
        } else {
            Some((x0, y0, x1, y1))
        }
    }

    fn blend_at(&mut self, x: i64, y: i64, src: Rgba) {
        if let Some(i) = self.index(x, y) {
            let mut dst = [
                self.data[i],
                self.data[i + 1],
                self.data[i + 2],
                self.data[i + 3],
            ];
            blend_over(&mut dst, src);
            self.data[i..i + 4].copy_from_slice(&dst);
        }
    }
}

/// Source-over compositing of straight-alpha `src` onto `dst`.
fn blend_over(dst: &mut Rgba, src: Rgba) {
    let sa = src[3] as f32 / 255.0;
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let s = src[c] as f32 / 255.0;
        let d = dst[c] as f32 / 255.0;
        let v = (s * sa + d * da * (1.0 - sa)) / out_a;
        dst[c] = (v * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

impl RenderSurface for PixelCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, rect: PixelRect) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        let w = self.width as usize;
        for y in y0 as usize..y1 as usize {
            let start = 4 * (y * w + x0 as usize);
            let end = 4 * (y * w + x1 as usize);
            self.data[start..end].fill(0);
        }
    }

    fn draw_image(&mut self, image: &DecodedImage, rect: PixelRect) {
        if image.width == 0 || image.height == 0 || rect.is_empty() {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        let sx = image.width as f32 / rect.width as f32;
        let sy = image.height as f32 / rect.height as f32;
        for y in y0..y1 {
            let v = (((y - rect.y as i64) as f32 + 0.5) * sy) as u32;
            for x in x0..x1 {
                let u = (((x - rect.x as i64) as f32 + 0.5) * sx) as u32;
                let src = image.pixel(u.min(image.width - 1), v.min(image.height - 1));
                self.blend_at(x, y, src);
            }
        }
    }

    fn read_pixels(&self, rect: PixelRect) -> Vec<u8> {
        let mut out = vec![0u8; rect.byte_len()];
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return out;
        };
        let row_len = 4 * rect.width as usize;
        for y in y0..y1 {
            let dst_row = (y - rect.y as i64) as usize * row_len;
            let dst_start = dst_row + 4 * (x0 - rect.x as i64) as usize;
            let n = 4 * (x1 - x0) as usize;
            if let Some(src) = self.index(x0, y) {
                out[dst_start..dst_start + n].copy_from_slice(&self.data[src..src + n]);
            }
        }
        out
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if !(radius > 0.0) || !center.is_finite() {
            return;
        }
        let r2 = radius * radius;
        let x0 = (center.x - radius).floor() as i64;
        let x1 = (center.x + radius).ceil() as i64;
        let y0 = (center.y - radius).floor() as i64;
        let y1 = (center.y + radius).ceil() as i64;
        for y in y0.max(0)..=y1.min(self.height as i64 - 1) {
            let dy = y as f32 + 0.5 - center.y;
            for x in x0.max(0)..=x1.min(self.width as i64 - 1) {
                let dx = x as f32 + 0.5 - center.x;
                if dx * dx + dy * dy <= r2 {
                    self.blend_at(x, y, color);
                }
            }
        }
    }
}
