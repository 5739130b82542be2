#![forbid(unsafe_code)]
//! dot_morph: dot-matrix particle morphing between sampled images.
//!
//! Modules:
//! - sampler: fit images into a draw area and sample them into dot states
//! - scatter: chained random scatter states
//! - particle, behaviour: per-particle motion (pointer field, orbital wiggle, relaxation)
//! - system: particle pool, permutation and state transitions
//! - loader: build image states through an image source and a render surface
//! - driver: frame loop with timed transitions, events and teardown
//!
//! The host owns the drawing surface, image decoding and input events; it plugs them in
//! through [`surface::RenderSurface`], [`loader::ImageSource`] and the [`driver::Driver`] API.
pub mod behaviour;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod loader;
pub mod particle;
pub mod sampler;
pub mod scatter;
pub mod surface;
pub mod system;
pub mod util;

/// Convenient re-exports for common types. Import with `use dot_morph::prelude::*;`.
pub mod prelude {
    pub use crate::behaviour::BehaviourTable;
    pub use crate::config::{
        parse_hex_color, FitMode, GridAlignment, MorphConfig, RadiusTransition, Rgba,
        SpeedPreset, UpdateSpeeds,
    };
    pub use crate::driver::{Driver, DriverOptions, Phase};
    pub use crate::error::{Error, Result};
    pub use crate::events::{EventSink, FnSink, LogSink, MorphEvent, MorphEventKind, VecSink};
    pub use crate::loader::{
        sample_image_states, sample_image_states_with_events, ImageInput, ImageSource,
    };
    pub use crate::particle::{FrameContext, Particle};
    pub use crate::sampler::{fit_draw_area, DotSampler, DotState};
    pub use crate::scatter::{RadialScatter, ScatterGenerator, ScatterSampling};
    pub use crate::surface::{DecodedImage, PixelCanvas, PixelRect, RenderSurface};
    pub use crate::system::{ImageState, ParticleSystem, StateRef, Transition};
    pub use crate::util::{ease_in_out_circ, shuffled_indices};
}
