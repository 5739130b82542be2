//! A single animated dot with layered motion.
//!
//! Every frame a particle:
//! 1. displaces its anchor away from the pointer ([`Particle::apply_field`]),
//! 2. adds an eased orbital wiggle ([`Particle::orbit`]),
//! 3. relaxes its drawn position toward the result ([`Particle::update`]).
//!
//! The destination radius is always either `0` (minimized) or the construction radius
//! (maximized).
use std::f32::consts::TAU;

use glam::Vec2;
use rand::RngCore;

use crate::behaviour::BehaviourTable;
use crate::config::{MorphConfig, RadiusTransition, Rgba};
use crate::surface::RenderSurface;
use crate::util::{random_from, random_int};

/// Below this difference an eased radius snaps to its destination.
const RADIUS_EPSILON: f32 = 0.01;

/// Per-frame inputs shared by every particle.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    /// Frame timestamp in milliseconds.
    pub time_ms: f64,
    /// Pointer position in canvas space, if any.
    pub pointer: Option<Vec2>,
    /// Active relaxation factor.
    pub update_speed: f32,
    pub config: &'a MorphConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Point the particle is assigned to.
    anchor: Vec2,
    /// Drawn position.
    position: Vec2,
    /// Anchor displaced by the pointer field.
    destination: Vec2,
    /// Destination plus orbital wiggle for the current frame.
    rendered: Vec2,
    /// Radius given at construction.
    base_radius: f32,
    /// Drawn radius.
    radius: f32,
    /// Either `0.0` or `base_radius`.
    target_radius: f32,
    /// Depth value in `[0, max_height]`. Not used when drawing.
    height: f32,
    behaviour: usize,
    behaviour_delay_ms: f64,
    /// `1.0` or `-1.0`.
    orbit_direction: f32,
}

impl Particle {
    pub fn new(
        position: Vec2,
        radius: f32,
        behaviour: usize,
        behaviour_delay_ms: f64,
        orbit_direction: f32,
        height: f32,
    ) -> Self {
        Self {
            anchor: position,
            position,
            destination: position,
            rendered: position,
            base_radius: radius,
            radius,
            target_radius: radius,
            height,
            behaviour,
            behaviour_delay_ms,
            orbit_direction: if orbit_direction < 0.0 { -1.0 } else { 1.0 },
        }
    }

    /// Create a particle at `position` with randomized radius, height, bucket and direction.
    pub fn spawn(
        position: Vec2,
        config: &MorphConfig,
        behaviours: &BehaviourTable,
        rng: &mut dyn RngCore,
    ) -> Self {
        let radius = random_int(rng, config.min_particle_radius, config.max_particle_radius)
            .max(config.min_particle_radius);
        let height = random_int(rng, 0.0, config.max_height);
        let behaviour = behaviours.random_bucket(rng);
        let direction = random_from(rng, &[-1.0f32, 1.0]).copied().unwrap_or(1.0);
        Self::new(
            position,
            radius,
            behaviour,
            behaviours.delay_ms(behaviour),
            direction,
            height,
        )
    }

    /// Take the orbit delay of this particle's bucket from `behaviours`.
    pub fn retime(&mut self, behaviours: &BehaviourTable) {
        self.behaviour_delay_ms = behaviours.delay_ms(self.behaviour);
    }

    /// Assign a new anchor.
    pub fn move_to(&mut self, anchor: Vec2) {
        self.anchor = anchor;
        self.destination = anchor;
    }

    /// Shrink to nothing.
    pub fn minimize(&mut self) {
        self.target_radius = 0.0;
    }

    /// Grow back to the construction radius.
    pub fn maximize(&mut self) {
        self.target_radius = self.base_radius;
    }

    #[inline]
    pub fn is_maximized(&self) -> bool {
        self.target_radius > 0.0
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn destination(&self) -> Vec2 {
        self.destination
    }

    pub fn rendered(&self) -> Vec2 {
        self.rendered
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn base_radius(&self) -> f32 {
        self.base_radius
    }

    pub fn target_radius(&self) -> f32 {
        self.target_radius
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn behaviour(&self) -> usize {
        self.behaviour
    }

    pub fn behaviour_delay_ms(&self) -> f64 {
        self.behaviour_delay_ms
    }

    pub fn orbit_direction(&self) -> f32 {
        self.orbit_direction
    }

    /// Inverse-power repulsion of the anchor away from `pointer`.
    ///
    /// `offset = v * scale / max(|v|, min_distance)^1.5` with `v = anchor - pointer`.
    pub fn field_offset(anchor: Vec2, pointer: Vec2, scale: f32, min_distance: f32) -> Vec2 {
        let v = anchor - pointer;
        let distance = v.length().max(min_distance);
        v * scale / distance.powf(1.5)
    }

    /// Recompute the field-displaced destination.
    pub fn apply_field(&mut self, pointer: Option<Vec2>, config: &MorphConfig) {
        self.destination = match pointer {
            Some(p) => {
                self.anchor
                    + Self::field_offset(
                        self.anchor,
                        p,
                        config.field_scale(),
                        config.min_field_distance,
                    )
            }
            None => self.anchor,
        };
    }

    /// Orbit angle in radians at `time_ms`.
    pub fn orbit_angle(&self, time_ms: f64, config: &MorphConfig) -> f32 {
        let duration = config.behaviour_circle_duration_ms;
        let phase = ((time_ms + self.behaviour_delay_ms).rem_euclid(duration) / duration) as f32;
        crate::util::ease_in_out_circ(phase) * TAU * self.orbit_direction
    }

    /// Recompute the rendered position from the destination and the wiggle.
    pub fn orbit(&mut self, time_ms: f64, config: &MorphConfig) {
        let angle = self.orbit_angle(time_ms, config);
        self.rendered =
            self.destination + config.wiggle_offset * Vec2::new(angle.cos(), angle.sin());
    }

    /// Advance one frame.
    pub fn update(&mut self, ctx: &FrameContext<'_>) {
        self.apply_field(ctx.pointer, ctx.config);
        self.orbit(ctx.time_ms, ctx.config);

        if self.position != self.rendered || self.radius != self.target_radius {
            self.position += (self.rendered - self.position) * ctx.update_speed;
        }

        self.radius = match ctx.config.radius_transition {
            RadiusTransition::Snap => self.target_radius,
            RadiusTransition::Eased { speed_multiplier } => {
                let step = (ctx.update_speed * speed_multiplier).min(1.0);
                let next = self.radius + (self.target_radius - self.radius) * step;
                if (self.target_radius - next).abs() < RADIUS_EPSILON {
                    self.target_radius
                } else {
                    next
                }
            }
        };
    }

    /// Draw at the current position. Zero-radius particles draw nothing.
    pub fn draw(&self, surface: &mut dyn RenderSurface, color: Rgba) {
        if self.radius > 0.0 {
            surface.fill_circle(self.position, self.radius, color);
        }
    }
}
