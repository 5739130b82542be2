//! Image sampling into dot states.
//!
//! An image is fitted into a draw area centred on the canvas, rendered, read back and
//! thresholded on alpha over a fixed pixel grid. The surviving grid points, in row-major
//! order, form a [`DotState`].
use glam::Vec2;
use tracing::debug;

use crate::config::{FitMode, GridAlignment};
use crate::error::{Error, Result};
use crate::surface::PixelRect;

/// Ordered, immutable sequence of points used as a particle assignment target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DotState {
    points: Vec<Vec2>,
}

impl DotState {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at `index % len`, or `None` for an empty state.
    #[inline]
    pub fn point_wrapped(&self, index: usize) -> Option<Vec2> {
        if self.points.is_empty() {
            None
        } else {
            Some(self.points[index % self.points.len()])
        }
    }
}

impl From<Vec<Vec2>> for DotState {
    fn from(points: Vec<Vec2>) -> Self {
        Self::new(points)
    }
}

/// Compute the rectangle an image of `image` size occupies, centred in `canvas`.
pub fn fit_draw_area(image: (u32, u32), canvas: (u32, u32), mode: FitMode) -> PixelRect {
    let (iw, ih) = image;
    let (cw, ch) = canvas;
    let (w, h) = match mode {
        FitMode::Square => {
            let side = iw.min(cw).min(ch);
            (side, side)
        }
        FitMode::Contain { max } => {
            if iw == 0 || ih == 0 {
                (0, 0)
            } else {
                let (iw_f, ih_f) = (iw as f32, ih as f32);
                let scale = (max as f32 / iw_f)
                    .min(max as f32 / ih_f)
                    .min(cw as f32 / iw_f)
                    .min(ch as f32 / ih_f)
                    .min(1.0);
                (
                    (iw_f * scale).round() as u32,
                    (ih_f * scale).round() as u32,
                )
            }
        }
    };
    let x = (0.5 * (cw as f32 - w as f32)).round() as i32;
    let y = (0.5 * (ch as f32 - h as f32)).round() as i32;
    PixelRect::new(x, y, w, h)
}

/// Thresholds alpha on a regular grid to turn pixels into dots.
#[derive(Debug, Clone)]
pub struct DotSampler {
    /// Grid spacing in pixels.
    pub gap: u32,
    pub alignment: GridAlignment,
}

impl DotSampler {
    pub fn new(gap: u32) -> Self {
        Self {
            gap,
            alignment: GridAlignment::Origin,
        }
    }

    pub fn with_alignment(mut self, alignment: GridAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Whether local coordinate `c` of an area starting at canvas coordinate `offset` lies
    /// on the sampling grid. `Origin` tests the local coordinate, `Centered` the canvas one.
    #[inline]
    fn on_grid(&self, c: u32, offset: i32) -> bool {
        let gap = self.gap as i64;
        match self.alignment {
            GridAlignment::Origin => c as i64 % gap == 0,
            GridAlignment::Centered => {
                let canvas = c as i64 + offset as i64;
                let shifted = (canvas as f32 - 0.5 * self.gap as f32).ceil() as i64;
                shifted.rem_euclid(gap) == 0
            }
        }
    }

    /// Sample a row-major RGBA buffer of `width * height` pixels whose top-left corner is
    /// the canvas origin.
    ///
    /// Returns the grid points whose alpha is non-zero in raster-scan order.
    pub fn sample(&self, rgba: &[u8], width: u32, height: u32) -> Result<DotState> {
        self.sample_in(rgba, PixelRect::new(0, 0, width, height))
    }

    /// Sample the pixels read back from `area` of the canvas.
    ///
    /// With [`GridAlignment::Centered`] the grid is laid over canvas coordinates, so `area`'s
    /// position decides which pixels are kept. Returned points are local to `area`'s
    /// top-left corner.
    pub fn sample_in(&self, rgba: &[u8], area: PixelRect) -> Result<DotState> {
        if self.gap == 0 {
            return Err(Error::InvalidConfig("dot gap must be > 0".into()));
        }
        let (width, height) = (area.width, area.height);
        let expected = area.byte_len();
        if rgba.len() != expected {
            return Err(Error::PixelBuffer {
                expected,
                actual: rgba.len(),
            });
        }

        let cols: Vec<u32> = (0..width)
            .filter(|&x| self.on_grid(x, area.x))
            .collect();
        let mut points = Vec::new();
        for y in (0..height).filter(|&y| self.on_grid(y, area.y)) {
            let row = y as usize * width as usize;
            for &x in &cols {
                let alpha = rgba[4 * (row + x as usize) + 3];
                if alpha > 0 {
                    points.push(Vec2::new(x as f32, y as f32));
                }
            }
        }

        debug!(
            "Sampled {} dots from {}x{} pixels (gap {}).",
            points.len(),
            width,
            height,
            self.gap
        );
        Ok(DotState::new(points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque(width: u32, height: u32) -> Vec<u8> {
        vec![255; 4 * width as usize * height as usize]
    }

    #[test]
    fn opaque_square_yields_regular_row_major_grid() {
        let sampler = DotSampler::new(18);
        let state = sampler.sample(&opaque(100, 100), 100, 100).unwrap();

        let per_axis = 100 / 18 + 1;
        assert_eq!(state.len(), per_axis * per_axis);
        assert_eq!(state.points()[0], Vec2::new(0.0, 0.0));
        assert_eq!(state.points()[1], Vec2::new(18.0, 0.0));
        assert_eq!(state.points()[per_axis], Vec2::new(0.0, 18.0));
        assert_eq!(state.points().last().copied(), Some(Vec2::new(90.0, 90.0)));

        for pair in state.points().windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(a.y < b.y || (a.y == b.y && a.x < b.x), "not row-major");
        }
    }

    #[test]
    fn only_grid_aligned_opaque_pixels_survive() {
        let (w, h) = (40u32, 30u32);
        let mut rgba = vec![0u8; 4 * (w * h) as usize];
        for y in 0..h {
            for x in 0..w {
                if (x + 2 * y) % 3 != 0 {
                    rgba[4 * (y * w + x) as usize + 3] = 200;
                }
            }
        }
        let gap = 5;
        let state = DotSampler::new(gap).sample(&rgba, w, h).unwrap();
        assert!(!state.is_empty());
        for p in state.points() {
            let (x, y) = (p.x as u32, p.y as u32);
            assert_eq!(x % gap, 0);
            assert_eq!(y % gap, 0);
            assert!(rgba[4 * (y * w + x) as usize + 3] > 0);
        }
    }

    #[test]
    fn transparent_image_yields_empty_state() {
        let rgba = vec![0u8; 4 * 20 * 20];
        let state = DotSampler::new(4).sample(&rgba, 20, 20).unwrap();
        assert!(state.is_empty());
        assert_eq!(state.point_wrapped(3), None);
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        let err = DotSampler::new(4).sample(&[0u8; 10], 2, 2).unwrap_err();
        assert!(matches!(
            err,
            Error::PixelBuffer {
                expected: 16,
                actual: 10
            }
        ));
    }

    #[test]
    fn centered_alignment_shifts_grid_by_half_a_cell() {
        let sampler = DotSampler::new(10).with_alignment(GridAlignment::Centered);
        let state = sampler.sample(&opaque(30, 1), 30, 1).unwrap();
        // ceil(x - 5) % 10 == 0 => x in {5, 15, 25}; y = 0 fails since ceil(-5) = -5.
        assert!(state.is_empty());

        let state = sampler.sample(&opaque(30, 6), 30, 6).unwrap();
        let xs: Vec<f32> = state.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![5.0, 15.0, 25.0]);
        assert!(state.points().iter().all(|p| p.y == 5.0));
    }

    #[test]
    fn point_wrapped_cycles_through_points() {
        let state = DotState::new(vec![Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)]);
        assert_eq!(state.point_wrapped(0), Some(Vec2::new(1.0, 0.0)));
        assert_eq!(state.point_wrapped(3), Some(Vec2::new(2.0, 0.0)));
    }

    #[test]
    fn square_fit_is_centered_and_bounded_by_canvas() {
        let rect = fit_draw_area((500, 300), (800, 400), FitMode::Square);
        assert_eq!(rect, PixelRect::new(200, 0, 400, 400));

        let rect = fit_draw_area((100, 100), (800, 400), FitMode::Square);
        assert_eq!(rect, PixelRect::new(350, 150, 100, 100));
    }

    #[test]
    fn contain_fit_preserves_aspect_ratio() {
        let rect = fit_draw_area((400, 200), (1000, 1000), FitMode::Contain { max: 640 });
        assert_eq!((rect.width, rect.height), (400, 200));
        assert_eq!((rect.x, rect.y), (300, 400));

        let rect = fit_draw_area((2000, 1000), (600, 600), FitMode::Contain { max: 640 });
        assert_eq!((rect.width, rect.height), (600, 300));
    }

    #[test]
    fn contain_fit_keeps_aspect_when_max_binds_one_side() {
        let rect = fit_draw_area((2000, 1000), (1000, 1000), FitMode::Contain { max: 640 });
        assert_eq!((rect.width, rect.height), (640, 320));
        assert_eq!((rect.x, rect.y), (180, 340));

        let rect = fit_draw_area((800, 600), (640, 640), FitMode::Contain { max: 480 });
        assert_eq!((rect.width, rect.height), (480, 360));

        let rect = fit_draw_area((300, 900), (1000, 500), FitMode::Contain { max: 640 });
        assert_eq!((rect.width, rect.height), (167, 500));
    }

    #[test]
    fn centered_grid_follows_canvas_coordinates() {
        let sampler = DotSampler::new(10).with_alignment(GridAlignment::Centered);
        // Canvas columns 5, 15, 25 are on the grid; the area starts at canvas x = 3.
        let area = PixelRect::new(3, 0, 30, 6);
        let state = sampler.sample_in(&opaque(30, 6), area).unwrap();
        let xs: Vec<f32> = state.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![2.0, 12.0, 22.0]);
        assert!(state.points().iter().all(|p| p.y == 5.0));
    }

    #[test]
    fn origin_grid_stays_local_to_the_area() {
        let sampler = DotSampler::new(4);
        let state = sampler
            .sample_in(&opaque(8, 1), PixelRect::new(-2, 3, 8, 1))
            .unwrap();
        let xs: Vec<f32> = state.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 4.0]);
    }
}
