//! Particle pool and state transitions.
//!
//! A [`ParticleSystem`] owns a fixed pool of [`Particle`]s sized to the largest image state.
//! A transition walks a fixed random permutation of the pool: the particle at
//! `order[i]` is anchored to point `i % len` of the target state and stays visible only
//! while `i < len`, so surplus particles shrink to nothing instead of leaving the pool.
use glam::Vec2;
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::behaviour::BehaviourTable;
use crate::config::{MorphConfig, SpeedPreset};
use crate::error::{Error, Result};
use crate::particle::{FrameContext, Particle};
use crate::sampler::DotState;
use crate::scatter::ScatterGenerator;
use crate::surface::{PixelRect, RenderSurface};
use crate::util::{is_permutation, random_int, shuffled_indices};

/// A sampled image together with the area it was sampled from.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageState {
    /// Where the image came from, for diagnostics.
    pub label: String,
    /// Dots local to `area`'s top-left corner.
    pub dots: DotState,
    /// Draw area on the canvas at sampling time.
    pub area: PixelRect,
}

impl ImageState {
    pub fn new(label: impl Into<String>, dots: DotState, area: PixelRect) -> Self {
        Self {
            label: label.into(),
            dots,
            area,
        }
    }
}

/// Which target state a transition moved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateRef {
    Image(usize),
    Random(usize),
}

/// Summary of a completed transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub target: StateRef,
    /// Particles left maximized.
    pub visible: usize,
    /// Particles minimized.
    pub hidden: usize,
    /// Speed preset that became active.
    pub speed: SpeedPreset,
}

pub struct ParticleSystem {
    config: MorphConfig,
    canvas: (u32, u32),
    particles: Vec<Particle>,
    image_states: Vec<ImageState>,
    random_states: Vec<DotState>,
    current_state: Option<usize>,
    current_random_state: Option<usize>,
    random_order: Vec<usize>,
    behaviours: BehaviourTable,
    speed: SpeedPreset,
}

impl ParticleSystem {
    /// Build the pool, the permutation and the random scatter states.
    ///
    /// No transition is performed; call [`ParticleSystem::change_image`] to enter the first
    /// image state.
    pub fn new(
        config: MorphConfig,
        canvas: (u32, u32),
        image_states: Vec<ImageState>,
        rng: &mut dyn RngCore,
    ) -> Result<Self> {
        config.validate()?;
        check_canvas(canvas)?;

        let particle_count = image_states
            .iter()
            .map(|s| s.dots.len())
            .max()
            .unwrap_or(0);
        if particle_count == 0 {
            warn!("No image state contains any dots; the particle pool is empty.");
        }

        let random_order = shuffled_indices(particle_count, rng);

        let canvas_v = Vec2::new(canvas.0 as f32, canvas.1 as f32);
        let random_states = ScatterGenerator::from_config(&config).generate(
            particle_count / config.scatter_density_divisor,
            canvas_v,
            rng,
        );

        let behaviours = BehaviourTable::build(&config, rng);

        let particles = (0..particle_count)
            .map(|_| {
                let position = Vec2::new(
                    random_int(rng, canvas_v.x / 3.0, 2.0 * canvas_v.x / 3.0),
                    random_int(rng, canvas_v.y / 3.0, 2.0 * canvas_v.y / 3.0),
                );
                Particle::spawn(position, &config, &behaviours, rng)
            })
            .collect();

        info!(
            "Particle system ready: {} particles, {} image states, {} random states.",
            particle_count,
            image_states.len(),
            random_states.len()
        );

        Ok(Self {
            config,
            canvas,
            particles,
            image_states,
            random_states,
            current_state: None,
            current_random_state: None,
            random_order,
            behaviours,
            speed: SpeedPreset::Fast,
        })
    }

    /// Replace the particle permutation. `order` must be a permutation of the pool indices.
    pub fn set_random_order(&mut self, order: Vec<usize>) -> Result<()> {
        if order.len() != self.particles.len() {
            return Err(Error::InvalidPermutation(format!(
                "expected {} indices, got {}",
                self.particles.len(),
                order.len()
            )));
        }
        if !is_permutation(&order) {
            return Err(Error::InvalidPermutation(
                "indices must appear exactly once".into(),
            ));
        }
        self.random_order = order;
        Ok(())
    }

    /// Advance to the next image state, wrapping around, at fast speed.
    ///
    /// Returns `None` when there are no image states.
    pub fn change_image(&mut self) -> Option<Transition> {
        if self.image_states.is_empty() {
            warn!("change_image called without image states.");
            return None;
        }

        let next = self
            .current_state
            .map_or(0, |i| (i + 1) % self.image_states.len());
        self.current_state = Some(next);
        self.speed = SpeedPreset::Fast;

        let state = &self.image_states[next];
        let (visible, hidden) = assign_targets(
            &mut self.particles,
            &self.random_order,
            &state.dots,
            state.area.origin(),
        );

        debug!(
            "Image state {} ('{}'): {} visible, {} hidden.",
            next, state.label, visible, hidden
        );

        Some(Transition {
            target: StateRef::Image(next),
            visible,
            hidden,
            speed: self.speed,
        })
    }

    /// Advance to the next random scatter state, wrapping around, at slow speed.
    ///
    /// Returns `None` when there are no random states.
    pub fn step_random_walk(&mut self) -> Option<Transition> {
        if self.random_states.is_empty() {
            return None;
        }

        let next = self
            .current_random_state
            .map_or(0, |i| (i + 1) % self.random_states.len());
        self.current_random_state = Some(next);
        self.speed = SpeedPreset::Slow;

        let (visible, hidden) = assign_targets(
            &mut self.particles,
            &self.random_order,
            &self.random_states[next],
            Vec2::ZERO,
        );

        debug!(
            "Random state {}: {} visible, {} hidden.",
            next, visible, hidden
        );

        Some(Transition {
            target: StateRef::Random(next),
            visible,
            hidden,
            speed: self.speed,
        })
    }

    /// Advance every particle by one frame.
    pub fn update(&mut self, time_ms: f64, pointer: Option<Vec2>) {
        let ctx = FrameContext {
            time_ms,
            pointer,
            update_speed: self.update_speed(),
            config: &self.config,
        };
        for particle in &mut self.particles {
            particle.update(&ctx);
        }
    }

    /// Draw every particle.
    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        let color = self.config.dot_fill_color;
        for particle in &self.particles {
            particle.draw(surface, color);
        }
    }

    /// Adopt a new canvas size and rebuild the behaviour timing table.
    ///
    /// Every particle keeps its bucket, anchor and position and takes its orbit delay from
    /// the rebuilt table.
    pub fn resize(&mut self, canvas: (u32, u32), rng: &mut dyn RngCore) -> Result<()> {
        check_canvas(canvas)?;
        self.canvas = canvas;
        self.behaviours = BehaviourTable::build(&self.config, rng);
        for particle in &mut self.particles {
            particle.retime(&self.behaviours);
        }
        self.speed = SpeedPreset::Fast;
        info!("Canvas resized to {}x{}.", canvas.0, canvas.1);
        Ok(())
    }

    pub fn config(&self) -> &MorphConfig {
        &self.config
    }

    pub fn canvas(&self) -> (u32, u32) {
        self.canvas
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Number of particles currently maximized.
    pub fn visible_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_maximized()).count()
    }

    pub fn image_states(&self) -> &[ImageState] {
        &self.image_states
    }

    pub fn random_states(&self) -> &[DotState] {
        &self.random_states
    }

    pub fn current_state(&self) -> Option<usize> {
        self.current_state
    }

    pub fn current_random_state(&self) -> Option<usize> {
        self.current_random_state
    }

    pub fn random_order(&self) -> &[usize] {
        &self.random_order
    }

    pub fn behaviours(&self) -> &BehaviourTable {
        &self.behaviours
    }

    pub fn speed_preset(&self) -> SpeedPreset {
        self.speed
    }

    /// Relaxation factor of the active speed preset.
    pub fn update_speed(&self) -> f32 {
        self.speed.value(&self.config.update_speeds)
    }
}

fn check_canvas(canvas: (u32, u32)) -> Result<()> {
    if canvas.0 == 0 || canvas.1 == 0 {
        return Err(Error::SurfaceUnavailable(format!(
            "canvas size {}x{} is empty",
            canvas.0, canvas.1
        )));
    }
    Ok(())
}

/// Anchor `particles[order[i]]` to `state[i % len] + origin`; maximize iff `i < len`.
///
/// An empty state minimizes every particle and leaves anchors untouched.
fn assign_targets(
    particles: &mut [Particle],
    order: &[usize],
    state: &DotState,
    origin: Vec2,
) -> (usize, usize) {
    let len = state.len();
    let mut visible = 0;
    for (i, &pool_index) in order.iter().enumerate() {
        let Some(particle) = particles.get_mut(pool_index) else {
            continue;
        };
        if let Some(point) = state.point_wrapped(i) {
            particle.move_to(origin + point);
        }
        if i < len {
            particle.maximize();
            visible += 1;
        } else {
            particle.minimize();
        }
    }
    (visible, order.len() - visible)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn line_state(n: usize) -> DotState {
        DotState::new((0..n).map(|i| Vec2::new(i as f32 * 10.0, 0.0)).collect())
    }

    fn image(n: usize, area: PixelRect) -> ImageState {
        ImageState::new(format!("line{n}"), line_state(n), area)
    }

    fn system_with(states: Vec<ImageState>, seed: u64) -> ParticleSystem {
        let mut rng = StdRng::seed_from_u64(seed);
        ParticleSystem::new(MorphConfig::default(), (800, 600), states, &mut rng)
            .expect("system builds")
    }

    #[test]
    fn pool_is_sized_to_largest_state() {
        let area = PixelRect::new(0, 0, 100, 100);
        let system = system_with(vec![image(7, area), image(19, area), image(3, area)], 1);
        assert_eq!(system.particle_count(), 19);
        assert!(is_permutation(system.random_order()));
        assert_eq!(system.random_order().len(), 19);
    }

    #[test]
    fn particles_start_in_the_middle_third() {
        let area = PixelRect::new(0, 0, 100, 100);
        let system = system_with(vec![image(200, area)], 3);
        for p in system.particles() {
            let pos = p.position();
            assert!((800.0 / 3.0 - 0.5..=1600.0 / 3.0 + 0.5).contains(&pos.x));
            assert!((200.0 - 0.5..=400.0 + 0.5).contains(&pos.y));
        }
    }

    #[test]
    fn random_states_use_density_divisor() {
        let area = PixelRect::new(0, 0, 100, 100);
        let system = system_with(vec![image(30, area)], 2);
        assert_eq!(system.random_states().len(), 3);
        assert!(system.random_states().iter().all(|s| s.len() == 10));
    }

    #[test]
    fn change_image_with_identity_order_maximizes_all_and_offsets_by_origin() {
        let area = PixelRect::new(40, 25, 100, 100);
        let mut system = system_with(vec![image(5, area)], 5);
        system.set_random_order((0..5).collect()).unwrap();

        let t = system.change_image().expect("transition");
        assert_eq!(t.target, StateRef::Image(0));
        assert_eq!((t.visible, t.hidden), (5, 0));
        assert_eq!(system.speed_preset(), SpeedPreset::Fast);
        for (i, p) in system.particles().iter().enumerate() {
            assert!(p.is_maximized());
            assert_eq!(p.anchor(), Vec2::new(40.0 + i as f32 * 10.0, 25.0));
        }
    }

    #[test]
    fn shorter_state_wraps_points_and_hides_surplus() {
        let area = PixelRect::new(0, 0, 100, 100);
        let mut system = system_with(vec![image(10, area), image(4, area)], 9);
        let before = system.particle_count();

        system.change_image();
        assert_eq!(system.visible_count(), 10);

        let t = system.change_image().unwrap();
        assert_eq!(t.target, StateRef::Image(1));
        assert_eq!((t.visible, t.hidden), (4, 6));
        assert_eq!(system.visible_count(), 4);
        assert_eq!(system.particle_count(), before);

        let order = system.random_order().to_vec();
        let state = &system.image_states()[1].dots;
        for (i, &pool_index) in order.iter().enumerate() {
            let p = &system.particles()[pool_index];
            assert_eq!(p.anchor(), state.point_wrapped(i).unwrap());
            assert_eq!(p.is_maximized(), i < 4);
        }
    }

    #[test]
    fn cursor_wraps_over_image_states() {
        let area = PixelRect::new(0, 0, 10, 10);
        let mut system = system_with(vec![image(2, area), image(3, area)], 4);
        let targets: Vec<_> = (0..5)
            .filter_map(|_| system.change_image())
            .map(|t| t.target)
            .collect();
        assert_eq!(
            targets,
            vec![
                StateRef::Image(0),
                StateRef::Image(1),
                StateRef::Image(0),
                StateRef::Image(1),
                StateRef::Image(0)
            ]
        );
    }

    #[test]
    fn empty_state_hides_everyone_without_moving_anchors() {
        let area = PixelRect::new(0, 0, 10, 10);
        let empty = ImageState::new("blank", DotState::default(), area);
        let mut system = system_with(vec![image(6, area), empty], 8);

        system.change_image();
        let anchors: Vec<Vec2> = system.particles().iter().map(|p| p.anchor()).collect();

        let t = system.change_image().unwrap();
        assert_eq!((t.visible, t.hidden), (0, 6));
        assert_eq!(system.visible_count(), 0);
        let after: Vec<Vec2> = system.particles().iter().map(|p| p.anchor()).collect();
        assert_eq!(anchors, after);
    }

    #[test]
    fn random_walk_uses_slow_speed_and_cycles() {
        let area = PixelRect::new(0, 0, 10, 10);
        let mut system = system_with(vec![image(30, area)], 6);

        let t = system.step_random_walk().unwrap();
        assert_eq!(t.target, StateRef::Random(0));
        assert_eq!(t.speed, SpeedPreset::Slow);
        assert_eq!(system.update_speed(), system.config().update_speeds.slow);
        assert_eq!(t.visible, 10);

        system.step_random_walk();
        system.step_random_walk();
        let t = system.step_random_walk().unwrap();
        assert_eq!(t.target, StateRef::Random(0));

        system.change_image();
        assert_eq!(system.speed_preset(), SpeedPreset::Fast);
    }

    #[test]
    fn set_random_order_rejects_non_permutations() {
        let area = PixelRect::new(0, 0, 10, 10);
        let mut system = system_with(vec![image(3, area)], 1);
        assert!(system.set_random_order(vec![0, 1]).is_err());
        assert!(system.set_random_order(vec![0, 1, 1]).is_err());
        assert!(system.set_random_order(vec![2, 0, 1]).is_ok());
    }

    #[test]
    fn zero_sized_canvas_is_fatal() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = ParticleSystem::new(MorphConfig::default(), (0, 600), Vec::new(), &mut rng);
        assert!(matches!(result, Err(Error::SurfaceUnavailable(_))));
    }

    #[test]
    fn no_image_states_means_no_transition() {
        let mut system = system_with(Vec::new(), 1);
        assert_eq!(system.particle_count(), 0);
        assert!(system.change_image().is_none());
    }

    #[test]
    fn update_moves_particles_toward_anchors() {
        let area = PixelRect::new(100, 100, 100, 100);
        let mut system = system_with(vec![image(8, area)], 10);
        system.change_image();

        let distance = |s: &ParticleSystem| -> f32 {
            s.particles()
                .iter()
                .map(|p| (p.position() - p.anchor()).length())
                .sum()
        };
        let before = distance(&system);
        for frame in 0..120 {
            system.update(frame as f64 * 16.0, None);
        }
        assert!(distance(&system) < before);
    }

    #[test]
    fn resize_keeps_particles_and_rejects_empty_canvas() {
        let area = PixelRect::new(0, 0, 10, 10);
        let mut system = system_with(vec![image(4, area)], 2);
        system.change_image();
        let anchors: Vec<Vec2> = system.particles().iter().map(|p| p.anchor()).collect();

        let mut rng = StdRng::seed_from_u64(3);
        system.resize((1024, 768), &mut rng).unwrap();
        assert_eq!(system.canvas(), (1024, 768));
        let after: Vec<Vec2> = system.particles().iter().map(|p| p.anchor()).collect();
        assert_eq!(anchors, after);
        assert!(system.resize((0, 0), &mut rng).is_err());
    }

    #[test]
    fn resize_retimes_particles_from_the_rebuilt_table() {
        let area = PixelRect::new(0, 0, 10, 10);
        let mut system = system_with(vec![image(40, area)], 6);
        let before: Vec<f64> = system
            .particles()
            .iter()
            .map(|p| p.behaviour_delay_ms())
            .collect();

        let mut rng = StdRng::seed_from_u64(99);
        system.resize((640, 480), &mut rng).unwrap();

        let table = system.behaviours();
        for p in system.particles() {
            assert_eq!(p.behaviour_delay_ms(), table.delay_ms(p.behaviour()));
        }
        let after: Vec<f64> = system
            .particles()
            .iter()
            .map(|p| p.behaviour_delay_ms())
            .collect();
        assert_ne!(before, after);
    }
}
