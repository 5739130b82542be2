//! Configuration for sampling, scattering and particle motion.
//!
//! [`MorphConfig`] is immutable once a [`crate::system::ParticleSystem`] is built. The only
//! piece of mutable simulation state, the active update speed, lives on the system as a
//! [`SpeedPreset`].
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// RGBA8 colour.
pub type Rgba = [u8; 4];

/// Relaxation factors applied per frame, selected by [`SpeedPreset`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UpdateSpeeds {
    /// Used while walking through random scatter states.
    pub slow: f32,
    /// Used while morphing into an image state.
    pub fast: f32,
}

impl Default for UpdateSpeeds {
    fn default() -> Self {
        Self {
            slow: 0.005,
            fast: 0.05,
        }
    }
}

/// Which of the [`UpdateSpeeds`] is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpeedPreset {
    Slow,
    #[default]
    Fast,
}

impl SpeedPreset {
    /// Resolve the preset against configured speeds.
    #[inline]
    pub fn value(self, speeds: &UpdateSpeeds) -> f32 {
        match self {
            SpeedPreset::Slow => speeds.slow,
            SpeedPreset::Fast => speeds.fast,
        }
    }
}

/// How an image is fitted into the canvas before it is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FitMode {
    /// Square area with side `min(image_width, canvas_width, canvas_height)`.
    #[default]
    Square,
    /// Aspect-preserving fit, never larger than `max` pixels on either side.
    Contain { max: u32 },
}

/// Which pixels of the sampling grid are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GridAlignment {
    /// Keep `x % gap == 0 && y % gap == 0`.
    #[default]
    Origin,
    /// Keep pixels where `ceil(x - gap / 2) % gap == 0` (same for `y`) in canvas
    /// coordinates, shifting the grid by half a cell.
    Centered,
}

/// How a particle's drawn radius follows its destination radius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RadiusTransition {
    /// Radius jumps to the destination radius every frame.
    #[default]
    Snap,
    /// Radius relaxes toward the destination at `update_speed * speed_multiplier` per frame.
    Eased { speed_multiplier: f32 },
}

/// Full engine configuration.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MorphConfig {
    /// Colour painted behind the particles by hosts that composite frames.
    pub canvas_background_color: Rgba,
    /// Fill colour of every dot.
    pub dot_fill_color: Rgba,
    /// Spacing of the sampling grid in pixels.
    pub dot_gap: u32,
    pub grid_alignment: GridAlignment,
    pub fit_mode: FitMode,
    /// Interval between image transitions in milliseconds.
    pub image_change_time_delay_ms: f64,
    pub update_speeds: UpdateSpeeds,
    pub min_particle_radius: f32,
    pub max_particle_radius: f32,
    /// Radius of the pointer repulsion field.
    pub field_radius: f32,
    /// Strength multiplier of the pointer repulsion field.
    pub field_strength: f32,
    /// Lower bound for the anchor-to-pointer distance used by the field.
    pub min_field_distance: f32,
    /// Number of behaviour buckets particles are spread over.
    pub behaviour_type_count: usize,
    /// Duration of a full orbital wiggle in milliseconds.
    pub behaviour_circle_duration_ms: f64,
    /// Radius of the orbital wiggle.
    pub wiggle_offset: f32,
    /// Upper bound of the per-particle height.
    pub max_height: f32,
    /// Number of chained random scatter states.
    pub random_state_count: usize,
    /// Compass directions, in degrees, the first scatter state picks from.
    pub random_directions_deg: Vec<f32>,
    /// Maximum jitter, in degrees, added to a compass direction.
    pub direction_offset_deg: f32,
    /// Scatter states hold `particle_count / scatter_density_divisor` points.
    pub scatter_density_divisor: usize,
    pub radius_transition: RadiusTransition,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            canvas_background_color: [0x18, 0x07, 0x28, 0xff],
            dot_fill_color: [0xff, 0xff, 0xff, 0xff],
            dot_gap: 18,
            grid_alignment: GridAlignment::Origin,
            fit_mode: FitMode::Square,
            image_change_time_delay_ms: 5000.0,
            update_speeds: UpdateSpeeds::default(),
            min_particle_radius: 2.0,
            max_particle_radius: 6.0,
            field_radius: 12.0,
            field_strength: 12.0,
            min_field_distance: 1.0,
            behaviour_type_count: 50,
            behaviour_circle_duration_ms: 2000.0,
            wiggle_offset: 4.0,
            max_height: 10.0,
            random_state_count: 3,
            random_directions_deg: (0..12).map(|i| i as f32 * 30.0).collect(),
            direction_offset_deg: 15.0,
            scatter_density_divisor: 3,
            radius_transition: RadiusTransition::Snap,
        }
    }
}

impl MorphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sampling grid spacing.
    pub fn with_dot_gap(mut self, dot_gap: u32) -> Self {
        self.dot_gap = dot_gap;
        self
    }

    pub fn with_grid_alignment(mut self, alignment: GridAlignment) -> Self {
        self.grid_alignment = alignment;
        self
    }

    pub fn with_fit_mode(mut self, fit_mode: FitMode) -> Self {
        self.fit_mode = fit_mode;
        self
    }

    pub fn with_colors(mut self, background: Rgba, dot_fill: Rgba) -> Self {
        self.canvas_background_color = background;
        self.dot_fill_color = dot_fill;
        self
    }

    /// Sets the interval between image transitions.
    pub fn with_image_change_time_delay_ms(mut self, delay_ms: f64) -> Self {
        self.image_change_time_delay_ms = delay_ms;
        self
    }

    pub fn with_update_speeds(mut self, slow: f32, fast: f32) -> Self {
        self.update_speeds = UpdateSpeeds { slow, fast };
        self
    }

    pub fn with_particle_radius(mut self, min: f32, max: f32) -> Self {
        self.min_particle_radius = min;
        self.max_particle_radius = max;
        self
    }

    pub fn with_field(mut self, radius: f32, strength: f32) -> Self {
        self.field_radius = radius;
        self.field_strength = strength;
        self
    }

    pub fn with_behaviour(mut self, type_count: usize, circle_duration_ms: f64) -> Self {
        self.behaviour_type_count = type_count;
        self.behaviour_circle_duration_ms = circle_duration_ms;
        self
    }

    pub fn with_wiggle_offset(mut self, wiggle_offset: f32) -> Self {
        self.wiggle_offset = wiggle_offset;
        self
    }

    pub fn with_random_states(mut self, count: usize, density_divisor: usize) -> Self {
        self.random_state_count = count;
        self.scatter_density_divisor = density_divisor;
        self
    }

    pub fn with_random_directions(mut self, directions_deg: Vec<f32>, offset_deg: f32) -> Self {
        self.random_directions_deg = directions_deg;
        self.direction_offset_deg = offset_deg;
        self
    }

    pub fn with_radius_transition(mut self, transition: RadiusTransition) -> Self {
        self.radius_transition = transition;
        self
    }

    /// Field displacement scale, `field_radius * field_strength`.
    #[inline]
    pub fn field_scale(&self) -> f32 {
        self.field_radius * self.field_strength
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.dot_gap == 0 {
            return Err(Error::InvalidConfig("dot_gap must be > 0".into()));
        }
        if !(self.min_particle_radius > 0.0) {
            return Err(Error::InvalidConfig(
                "min_particle_radius must be > 0".into(),
            ));
        }
        if self.max_particle_radius < self.min_particle_radius {
            return Err(Error::InvalidConfig(
                "max_particle_radius must be >= min_particle_radius".into(),
            ));
        }
        if !(self.image_change_time_delay_ms > 0.0) {
            return Err(Error::InvalidConfig(
                "image_change_time_delay_ms must be > 0".into(),
            ));
        }
        if !(self.behaviour_circle_duration_ms > 0.0) {
            return Err(Error::InvalidConfig(
                "behaviour_circle_duration_ms must be > 0".into(),
            ));
        }
        if self.behaviour_type_count == 0 {
            return Err(Error::InvalidConfig(
                "behaviour_type_count must be > 0".into(),
            ));
        }
        for (name, speed) in [
            ("slow", self.update_speeds.slow),
            ("fast", self.update_speeds.fast),
        ] {
            if !(speed > 0.0 && speed <= 1.0) {
                return Err(Error::InvalidConfig(format!(
                    "update_speeds.{name} must be in (0, 1]"
                )));
            }
        }
        if !(self.min_field_distance > 0.0) {
            return Err(Error::InvalidConfig(
                "min_field_distance must be > 0".into(),
            ));
        }
        if self.max_height < 0.0 {
            return Err(Error::InvalidConfig("max_height must be >= 0".into()));
        }
        if self.random_state_count > 0 && self.random_directions_deg.is_empty() {
            return Err(Error::InvalidConfig(
                "random_directions_deg must not be empty when random states are enabled".into(),
            ));
        }
        if self.scatter_density_divisor == 0 {
            return Err(Error::InvalidConfig(
                "scatter_density_divisor must be > 0".into(),
            ));
        }
        if let FitMode::Contain { max: 0 } = self.fit_mode {
            return Err(Error::InvalidConfig("fit_mode max must be > 0".into()));
        }
        if let RadiusTransition::Eased { speed_multiplier } = self.radius_transition {
            if !(speed_multiplier > 0.0) {
                return Err(Error::InvalidConfig(
                    "radius speed_multiplier must be > 0".into(),
                ));
            }
        }

        Ok(())
    }
}

/// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional) into an [`Rgba`] colour.
pub fn parse_hex_color(s: &str) -> Result<Rgba> {
    let hex = s.trim().trim_start_matches('#');
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return Err(Error::InvalidConfig(format!("invalid colour '{s}'")));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| Error::InvalidConfig(format!("invalid colour '{s}'")))
    };
    let alpha = if hex.len() == 8 { channel(6)? } else { 0xff };
    Ok([channel(0)?, channel(2)?, channel(4)?, alpha])
}
