//! Behaviour buckets and their orbital phase offsets.
use rand::RngCore;

use crate::config::MorphConfig;
use crate::util::{random_index, random_range};

/// Per-bucket time offsets that keep particles in different buckets orbiting out of phase.
///
/// Bucket `0` has no delay. Bucket `i` is delayed by `i * slot` plus a jitter of up to half a
/// slot either way, where `slot = image_change_time_delay_ms / behaviour_type_count`.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviourTable {
    delays_ms: Vec<f64>,
}

impl BehaviourTable {
    pub fn build(config: &MorphConfig, rng: &mut dyn RngCore) -> Self {
        let count = config.behaviour_type_count.max(1);
        let slot = config.image_change_time_delay_ms / count as f64;
        let half = (slot / 2.0) as f32;

        let mut delays_ms = Vec::with_capacity(count);
        delays_ms.push(0.0);
        for i in 1..count {
            delays_ms.push(slot * i as f64 + random_range(rng, -half, half) as f64);
        }
        Self { delays_ms }
    }

    /// Delay of `bucket`, `0.0` for unknown buckets.
    #[inline]
    pub fn delay_ms(&self, bucket: usize) -> f64 {
        self.delays_ms.get(bucket).copied().unwrap_or(0.0)
    }

    /// Uniformly pick a bucket.
    pub fn random_bucket(&self, rng: &mut dyn RngCore) -> usize {
        random_index(rng, self.delays_ms.len())
    }

    pub fn len(&self) -> usize {
        self.delays_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delays_ms.is_empty()
    }

    pub fn delays_ms(&self) -> &[f64] {
        &self.delays_ms
    }
}
