//! Random scatter states used as transitional layouts.
//!
//! The first state is a [`RadialScatter`] around the canvas centre. Each following state is
//! a drift walk derived from the previous one: a heading that starts at ±45° and wanders a
//! little per point, with every point stepping off the point generated before it.
use std::f32::consts::PI;

use glam::Vec2;
use mint::Vector2;
use rand::RngCore;

use crate::config::MorphConfig;
use crate::sampler::DotState;
use crate::util::{random_from, random_range};

/// Trait for scatter point generation over a canvas of the given extent.
pub trait ScatterSampling {
    fn generate(&self, canvas_extent: Vector2<f32>, rng: &mut dyn RngCore) -> Vec<Vector2<f32>>;
}

/// Points thrown out from the canvas centre along jittered compass directions.
#[derive(Debug, Clone)]
pub struct RadialScatter {
    /// Number of points to generate.
    pub count: usize,
    /// Candidate directions in degrees.
    pub directions_deg: Vec<f32>,
    /// Maximum jitter in degrees added to the picked direction.
    pub direction_offset_deg: f32,
    /// Distances are drawn from `[0, hypot(reach * w, reach * h)]`.
    pub reach: f32,
}

impl RadialScatter {
    pub fn new(count: usize, directions_deg: Vec<f32>, direction_offset_deg: f32) -> Self {
        Self {
            count,
            directions_deg,
            direction_offset_deg,
            reach: 2.0,
        }
    }

    pub fn with_reach(mut self, reach: f32) -> Self {
        self.reach = reach;
        self
    }
}

impl ScatterSampling for RadialScatter {
    fn generate(&self, canvas_extent: Vector2<f32>, rng: &mut dyn RngCore) -> Vec<Vector2<f32>> {
        let extent = Vec2::from(canvas_extent);
        if self.count == 0 || self.directions_deg.is_empty() {
            return Vec::new();
        }

        let center = extent * 0.5;
        let limit = (extent * self.reach).length();

        let mut out = Vec::with_capacity(self.count);
        for _ in 0..self.count {
            let base = random_from(rng, &self.directions_deg).copied().unwrap_or(0.0);
            let angle = (base + random_range(rng, 0.0, self.direction_offset_deg)).to_radians();
            let distance = random_range(rng, 0.0, limit);
            let p = center + distance * Vec2::new(angle.cos(), angle.sin());
            out.push(p.into());
        }
        out
    }
}

/// Builds the chain of random scatter states.
#[derive(Debug, Clone)]
pub struct ScatterGenerator {
    /// Number of chained states to produce.
    pub state_count: usize,
    pub directions_deg: Vec<f32>,
    pub direction_offset_deg: f32,
    /// Headings a drift walk may start from, in degrees.
    pub walk_start_deg: Vec<f32>,
    /// Per-point heading perturbation bound, in degrees.
    pub walk_jitter_deg: f32,
    /// Minimum step as a fraction of the canvas half-diagonal.
    pub walk_min_step: f32,
}

impl ScatterGenerator {
    pub fn new(state_count: usize, directions_deg: Vec<f32>, direction_offset_deg: f32) -> Self {
        Self {
            state_count,
            directions_deg,
            direction_offset_deg,
            walk_start_deg: vec![-45.0, 45.0],
            walk_jitter_deg: 15.0,
            walk_min_step: 1.0 / 3.0,
        }
    }

    pub fn from_config(config: &MorphConfig) -> Self {
        Self::new(
            config.random_state_count,
            config.random_directions_deg.clone(),
            config.direction_offset_deg,
        )
    }

    /// Produce `state_count` chained states of `count` points each.
    pub fn generate(&self, count: usize, canvas: Vec2, rng: &mut dyn RngCore) -> Vec<DotState> {
        if self.state_count == 0 {
            return Vec::new();
        }

        let radial = RadialScatter::new(
            count,
            self.directions_deg.clone(),
            self.direction_offset_deg,
        );
        let first: Vec<Vec2> = radial
            .generate(canvas.into(), rng)
            .into_iter()
            .map(Vec2::from)
            .collect();

        let mut states = Vec::with_capacity(self.state_count);
        states.push(DotState::new(first));
        for _ in 1..self.state_count {
            let next = match states.last() {
                Some(prev) => self.drift(prev, canvas, rng),
                None => break,
            };
            states.push(next);
        }
        states
    }

    /// Derive the next state from `prev` by a directed random walk.
    ///
    /// Point `i` is point `i - 1` of the new state moved one step along the current heading;
    /// point `0` steps off `prev[0]`. The heading accumulates a perturbation per point.
    pub fn drift(&self, prev: &DotState, canvas: Vec2, rng: &mut dyn RngCore) -> DotState {
        let Some(&start) = prev.points().first() else {
            return DotState::default();
        };

        let limit = (canvas * 0.5).length();
        let min_step = limit * self.walk_min_step;
        let mut heading_deg = random_from(rng, &self.walk_start_deg)
            .copied()
            .unwrap_or(45.0);

        let mut cursor = start;
        let mut points = Vec::with_capacity(prev.len());
        for _ in 0..prev.len() {
            heading_deg += random_range(rng, -self.walk_jitter_deg, self.walk_jitter_deg);
            let angle = heading_deg * PI / 180.0;
            let distance = random_range(rng, min_step, limit);
            cursor += distance * Vec2::new(angle.cos(), angle.sin());
            points.push(cursor);
        }
        DotState::new(points)
    }
}
