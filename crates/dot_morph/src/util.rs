//! Stateless math and randomness helpers shared by the sampler, scatter and particle code.
use rand::RngCore;

/// Generate a random float in the range [0, 1].
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Uniform random float in `[low, high]`.
#[inline]
pub fn random_range(rng: &mut dyn RngCore, low: f32, high: f32) -> f32 {
    low + rand01(rng) * (high - low)
}

/// Uniform random float in `[low, high]` rounded to the nearest integer.
#[inline]
pub fn random_int(rng: &mut dyn RngCore, low: f32, high: f32) -> f32 {
    random_range(rng, low, high).round()
}

/// Uniform random index in `[0, len)`. Returns `0` for `len == 0`.
#[inline]
pub fn random_index(rng: &mut dyn RngCore, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    ((rand01(rng) * len as f32) as usize).min(len - 1)
}

/// Pick a uniformly random element of `items`, or `None` when empty.
pub fn random_from<'a, T>(rng: &mut dyn RngCore, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(random_index(rng, items.len()))
}

/// Fisher-Yates shuffle of `0..len`.
pub fn shuffled_indices(len: usize, rng: &mut dyn RngCore) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    for i in (1..len).rev() {
        let j = random_index(rng, i + 1);
        order.swap(i, j);
    }
    order
}

/// Circular ease-in-out curve on `[0, 1]`.
///
/// `f(0) = 0`, `f(0.5) = 0.5`, `f(1) = 1`, monotonically increasing. Inputs are clamped.
pub fn ease_in_out_circ(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    if x < 0.5 {
        (1.0 - (1.0 - (2.0 * x).powi(2)).max(0.0).sqrt()) / 2.0
    } else {
        ((1.0 - (-2.0 * x + 2.0).powi(2)).max(0.0).sqrt() + 1.0) / 2.0
    }
}

/// Returns `true` when `order` contains every index of `0..order.len()` exactly once.
pub fn is_permutation(order: &[usize]) -> bool {
    let mut seen = vec![false; order.len()];
    for &i in order {
        match seen.get_mut(i) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    struct FixedRng {
        value: u32,
    }

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            self.value
        }

        fn next_u64(&mut self) -> u64 {
            self.value as u64
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 4];
            }
        }
    }

    #[test]
    fn random_range_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let v = random_range(&mut rng, -2.0, 5.0);
            assert!((-2.0..=5.0).contains(&v));
        }
    }

    #[test]
    fn random_index_never_reaches_len() {
        let mut rng = FixedRng { value: u32::MAX };
        assert_eq!(random_index(&mut rng, 4), 3);
        assert_eq!(random_index(&mut rng, 0), 0);
    }

    #[test]
    fn random_from_reaches_every_element() {
        let mut rng = StdRng::seed_from_u64(11);
        let items = [-1.0f32, 1.0];
        let mut seen_neg = false;
        let mut seen_pos = false;
        for _ in 0..64 {
            match random_from(&mut rng, &items) {
                Some(v) if *v < 0.0 => seen_neg = true,
                Some(_) => seen_pos = true,
                None => unreachable!(),
            }
        }
        assert!(seen_neg && seen_pos);
        assert!(random_from::<f32>(&mut rng, &[]).is_none());
    }

    #[test]
    fn shuffled_indices_is_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        for len in [0, 1, 2, 17, 500] {
            let order = shuffled_indices(len, &mut rng);
            assert_eq!(order.len(), len);
            assert!(is_permutation(&order));
        }
    }

    #[test]
    fn is_permutation_rejects_duplicates_and_gaps() {
        assert!(is_permutation(&[2, 0, 1]));
        assert!(!is_permutation(&[0, 0, 1]));
        assert!(!is_permutation(&[0, 1, 3]));
    }

    #[test]
    fn ease_in_out_circ_fixed_points() {
        assert_eq!(ease_in_out_circ(0.0), 0.0);
        assert_eq!(ease_in_out_circ(1.0), 1.0);
        assert!((ease_in_out_circ(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn ease_in_out_circ_is_monotonic() {
        let mut prev = ease_in_out_circ(0.0);
        for i in 1..=1000 {
            let v = ease_in_out_circ(i as f32 / 1000.0);
            assert!(v >= prev, "not monotonic at {i}: {v} < {prev}");
            prev = v;
        }
    }
}
