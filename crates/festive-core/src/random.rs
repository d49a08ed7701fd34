//! Injectable source of uniform random draws for particle spawning.

use rand::{Rng, RngCore};

/// Uniform draws in `[0, 1)`. Every spawn-time random field goes through here.
pub trait RandomSource {
    fn unit(&mut self) -> f32;

    /// Uniform value between `min` and `max`.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.unit()
    }

    /// Uniform index into a collection of `len` items. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        let i = (self.unit() * len as f32) as usize;
        i.min(len.saturating_sub(1))
    }
}

impl<R: RngCore> RandomSource for R {
    fn unit(&mut self) -> f32 {
        self.gen::<f32>()
    }
}

/// Cycles through a fixed list of draws. Used to make spawning deterministic in tests.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<f32>,
    cursor: usize,
}

impl FixedSequence {
    /// Values are clamped into `[0, 1)`; an empty list behaves like `[0.0]`.
    pub fn new(values: Vec<f32>) -> Self {
        let mut values: Vec<f32> = values
            .into_iter()
            .map(|v| if v.is_finite() { v.clamp(0.0, 1.0 - f32::EPSILON) } else { 0.0 })
            .collect();
        if values.is_empty() {
            values.push(0.0);
        }
        Self { values, cursor: 0 }
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for FixedSequence {
    fn unit(&mut self) -> f32 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn fixed_sequence_cycles() {
        let mut seq = FixedSequence::new(vec![0.25, 0.75]);
        assert_eq!(seq.unit(), 0.25);
        assert_eq!(seq.unit(), 0.75);
        assert_eq!(seq.unit(), 0.25);
        assert_eq!(seq.draws(), 3);
    }

    #[test]
    fn fixed_sequence_clamps_out_of_range() {
        let mut seq = FixedSequence::new(vec![-1.0, 2.0, f32::NAN]);
        assert_eq!(seq.unit(), 0.0);
        assert!(seq.unit() < 1.0);
        assert_eq!(seq.unit(), 0.0);
    }

    #[test]
    fn index_never_reaches_len() {
        let mut seq = FixedSequence::new(vec![0.999_999]);
        assert_eq!(seq.index(6), 5);
    }

    #[test]
    fn std_rng_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = rng.range(-30.0, 30.0);
            assert!((-30.0..=30.0).contains(&v));
        }
    }
}
