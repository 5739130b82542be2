//! Frame-synchronous driver for a [`ParticleSystem`].
//!
//! The host calls [`Driver::frame`] once per display refresh with a monotonically increasing
//! timestamp. The driver fires due transitions, clears the surface, advances every particle
//! and draws the pool. Transitions follow a small state machine:
//!
//! - `Images`: every `image_change_time_delay_ms` the next image state is entered.
//! - `RandomWalk { step }`: when enabled, the driver walks through the random scatter
//!   states, one every `image_change_time_delay_ms / random_state_count`, before morphing
//!   into the next image.
use glam::Vec2;
use mint::Point2;
use rand::RngCore;
use tracing::{debug, info};

use crate::error::Result;
use crate::events::{EventSink, MorphEvent, MorphEventKind};
use crate::surface::RenderSurface;
use crate::system::{ParticleSystem, Transition};

/// Driver behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriverOptions {
    /// Walk through the random scatter states between two image states.
    pub random_walk_between_images: bool,
}

/// Transition phase of the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not started yet.
    Idle,
    Images,
    RandomWalk {
        step: usize,
    },
    Stopped,
}

pub struct Driver {
    system: ParticleSystem,
    options: DriverOptions,
    phase: Phase,
    pointer: Option<Vec2>,
    next_transition_ms: f64,
}

impl Driver {
    pub fn new(system: ParticleSystem, options: DriverOptions) -> Self {
        Self {
            system,
            options,
            phase: Phase::Idle,
            pointer: None,
            next_transition_ms: 0.0,
        }
    }

    /// Enter the first image state and schedule the next transition.
    pub fn start(&mut self, time_ms: f64, sink: &mut dyn EventSink) {
        if self.phase != Phase::Idle {
            return;
        }
        if sink.wants(MorphEventKind::Started) {
            sink.send(MorphEvent::Started {
                particle_count: self.system.particle_count(),
                image_states: self.system.image_states().len(),
                random_states: self.system.random_states().len(),
            });
        }
        info!(
            "Driver started with {} particles.",
            self.system.particle_count()
        );

        self.phase = Phase::Images;
        let transition = self.system.change_image();
        self.report(time_ms, transition, sink);
        self.next_transition_ms = time_ms + self.image_interval();
    }

    /// Render one frame at `time_ms`.
    ///
    /// Starts the driver on the first call. Does nothing once stopped.
    pub fn frame(
        &mut self,
        surface: &mut dyn RenderSurface,
        time_ms: f64,
        sink: &mut dyn EventSink,
    ) {
        match self.phase {
            Phase::Stopped => return,
            Phase::Idle => self.start(time_ms, sink),
            _ => {
                if time_ms >= self.next_transition_ms {
                    self.fire_transition(time_ms, sink);
                }
            }
        }

        surface.clear_all();
        self.system.update(time_ms, self.pointer);
        self.system.draw(surface);
    }

    /// Record the pointer position in canvas coordinates.
    pub fn set_pointer(&mut self, pointer: impl Into<Point2<f32>>) {
        let p: Point2<f32> = pointer.into();
        self.pointer = Some(Vec2::new(p.x, p.y));
    }

    /// Forget the pointer; the repulsion field is disabled until the next pointer move.
    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Adopt a new surface size and rebuild timing tables.
    pub fn resize(
        &mut self,
        size: (u32, u32),
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<()> {
        self.system.resize(size, rng)?;
        if sink.wants(MorphEventKind::Resized) {
            sink.send(MorphEvent::Resized {
                width: size.0,
                height: size.1,
            });
        }
        Ok(())
    }

    /// Toggle the random walk between image states.
    pub fn enable_random_walk(&mut self, enabled: bool) {
        self.options.random_walk_between_images = enabled;
    }

    /// Stop animating. Subsequent frames are no-ops.
    pub fn stop(&mut self, sink: &mut dyn EventSink) {
        if self.phase == Phase::Stopped {
            return;
        }
        self.phase = Phase::Stopped;
        info!("Driver stopped.");
        if sink.wants(MorphEventKind::Stopped) {
            sink.send(MorphEvent::Stopped);
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.phase, Phase::Idle | Phase::Stopped)
    }

    /// Timestamp of the next scheduled transition.
    pub fn next_transition_ms(&self) -> f64 {
        self.next_transition_ms
    }

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut ParticleSystem {
        &mut self.system
    }

    pub fn into_system(self) -> ParticleSystem {
        self.system
    }

    fn image_interval(&self) -> f64 {
        self.system.config().image_change_time_delay_ms
    }

    fn walk_interval(&self) -> f64 {
        let steps = self.system.config().random_state_count.max(1);
        self.image_interval() / steps as f64
    }

    fn walk_enabled(&self) -> bool {
        self.options.random_walk_between_images && !self.system.random_states().is_empty()
    }

    fn fire_transition(&mut self, time_ms: f64, sink: &mut dyn EventSink) {
        let random_state_count = self.system.config().random_state_count;
        let phase = self.phase;
        let (transition, next_phase, delay) = match phase {
            Phase::Images if self.walk_enabled() => (
                self.system.step_random_walk(),
                Phase::RandomWalk { step: 1 },
                self.walk_interval(),
            ),
            Phase::RandomWalk { step } if step < random_state_count && self.walk_enabled() => (
                self.system.step_random_walk(),
                Phase::RandomWalk { step: step + 1 },
                self.walk_interval(),
            ),
            _ => (
                self.system.change_image(),
                Phase::Images,
                self.image_interval(),
            ),
        };

        debug!("Phase {:?} -> {:?} at {} ms.", phase, next_phase, time_ms);
        self.phase = next_phase;
        self.report(time_ms, transition, sink);

        self.next_transition_ms += delay;
        if self.next_transition_ms <= time_ms {
            self.next_transition_ms = time_ms + delay;
        }
    }

    fn report(&self, time_ms: f64, transition: Option<Transition>, sink: &mut dyn EventSink) {
        let Some(transition) = transition else {
            if sink.wants(MorphEventKind::Warning) {
                sink.send(MorphEvent::Warning {
                    context: format!("driver:{:?}", self.phase),
                    message: "No target state available".into(),
                });
            }
            return;
        };
        if sink.wants(MorphEventKind::StateChanged) {
            sink.send(MorphEvent::StateChanged {
                time_ms,
                transition,
            });
        }
    }
}
