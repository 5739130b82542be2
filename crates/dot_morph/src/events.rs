//! Event types and sinks for observing state building and the animation driver.
//!
//! This module defines [`MorphEvent`] and a set of sinks to emit, collect, or log events
//! while sampling images via [`crate::loader::sample_image_states_with_events`] or running a
//! [`crate::driver::Driver`].
use tracing::{debug, info, warn};

use crate::surface::PixelRect;
use crate::system::Transition;

/// Describes events emitted while building states and animating.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum MorphEvent {
    /// Emitted after an image was rendered and sampled into a dot state.
    ImageSampled {
        /// Index of the state in the image state list.
        index: usize,
        /// Source path of the image.
        path: String,
        /// Number of dots found.
        dots: usize,
        /// Rectangle the image occupied on the surface.
        area: PixelRect,
    },

    /// Emitted when an image could not be loaded and its state was skipped.
    ImageSkipped {
        path: String,
        reason: String,
    },

    /// Emitted once when the driver starts.
    Started {
        particle_count: usize,
        image_states: usize,
        random_states: usize,
    },

    /// Emitted for every state transition.
    StateChanged {
        /// Frame time at which the transition fired.
        time_ms: f64,
        transition: Transition,
    },

    /// Emitted after the surface was resized.
    Resized { width: u32, height: u32 },

    /// Emitted when the driver is stopped.
    Stopped,

    /// Non-fatal warning.
    Warning {
        /// Context string (e.g. image path, driver phase).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`MorphEvent`], used by sinks to filter what they want.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MorphEventKind {
    ImageSampled,
    ImageSkipped,
    Started,
    StateChanged,
    Resized,
    Stopped,
    Warning,
}

impl MorphEvent {
    pub fn kind(&self) -> MorphEventKind {
        match self {
            MorphEvent::ImageSampled { .. } => MorphEventKind::ImageSampled,
            MorphEvent::ImageSkipped { .. } => MorphEventKind::ImageSkipped,
            MorphEvent::Started { .. } => MorphEventKind::Started,
            MorphEvent::StateChanged { .. } => MorphEventKind::StateChanged,
            MorphEvent::Resized { .. } => MorphEventKind::Resized,
            MorphEvent::Stopped => MorphEventKind::Stopped,
            MorphEvent::Warning { .. } => MorphEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`MorphEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: MorphEvent);

    /// Whether this sink cares about events of `kind`. Producers may skip building events
    /// nobody wants.
    #[inline]
    fn wants(&self, _kind: MorphEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = MorphEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: MorphEvent) {}

    #[inline]
    fn wants(&self, _kind: MorphEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(MorphEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(MorphEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(MorphEvent),
{
    #[inline]
    fn send(&mut self, event: MorphEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<MorphEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
        }
    }

    pub fn into_inner(self) -> Vec<MorphEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[MorphEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: MorphEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: MorphEvent) {
        self.events.push(event);
    }
}

/// Sink that logs every event through `tracing`.
///
/// Transitions and resizes log at `debug`, skipped images and warnings at `warn`, the rest
/// at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink {
    skip_transitions: bool,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Do not log [`MorphEvent::StateChanged`].
    pub fn without_transitions(mut self) -> Self {
        self.skip_transitions = true;
        self
    }
}

impl EventSink for LogSink {
    fn send(&mut self, event: MorphEvent) {
        match event {
            MorphEvent::ImageSampled {
                index,
                path,
                dots,
                area,
            } => info!(
                "State {} from '{}': {} dots in {}x{}.",
                index, path, dots, area.width, area.height
            ),
            MorphEvent::ImageSkipped { path, reason } => {
                warn!("Image '{}' skipped: {}.", path, reason)
            }
            MorphEvent::Started {
                particle_count,
                image_states,
                random_states,
            } => info!(
                "Started: {} particles, {} image states, {} random states.",
                particle_count, image_states, random_states
            ),
            MorphEvent::StateChanged {
                time_ms,
                transition,
            } => debug!(
                "{:.0} ms: {:?}, {} visible, {} hidden, {:?} speed.",
                time_ms,
                transition.target,
                transition.visible,
                transition.hidden,
                transition.speed
            ),
            MorphEvent::Resized { width, height } => debug!("Resized to {}x{}.", width, height),
            MorphEvent::Stopped => info!("Stopped."),
            MorphEvent::Warning { context, message } => warn!("{}: {}", context, message),
        }
    }

    fn wants(&self, kind: MorphEventKind) -> bool {
        !(self.skip_transitions && kind == MorphEventKind::StateChanged)
    }
}
