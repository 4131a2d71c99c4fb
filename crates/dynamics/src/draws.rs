//! Random draws used by the step stages.
//!
//! # Generator contract
//!
//! Runs are reproducible only if the sampling methods are fixed:
//!
//! - **Normal**: `mean + std_dev * z` with `z` from [`StandardNormal`]
//!   (ziggurat). Identical to `rand_distr::Normal`, but infallible to build.
//! - **Uniform**: [`StandardUniform`] over `[0, 1)`.
//!
//! The generator itself is chosen by the caller (the simulation crate uses
//! `ChaCha8Rng`).

use rand::Rng;
use rand::distr::StandardUniform;
use rand_distr::{Distribution, StandardNormal};

// =============================================================================
// Gaussian
// =============================================================================

/// Normal distribution with compile-time parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian {
    pub mean: f64,
    pub std_dev: f64,
}

impl Gaussian {
    pub const fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }
}

impl Distribution<f64> for Gaussian {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let z: f64 = StandardNormal.sample(rng);
        self.mean + self.std_dev * z
    }
}

/// Raw energy delta before hazard drain.
pub const ENERGY_DELTA: Gaussian = Gaussian::new(0.04, 0.05);

/// Cost delta for the shock (before scaling) and drift branches.
pub const COST_DELTA: Gaussian = Gaussian::new(0.03, 0.015);

/// Activity random walk step.
pub const ACTIVITY_DELTA: Gaussian = Gaussian::new(0.02, 0.01);

// =============================================================================
// Uniform
// =============================================================================

/// Uniform draw in `[0, 1)`.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardUniform.sample(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_gaussian_moments() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| ENERGY_DELTA.sample(&mut rng)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!((mean - 0.04).abs() < 0.002, "mean {mean}");
        assert!((var.sqrt() - 0.05).abs() < 0.002, "std {}", var.sqrt());
    }

    #[test]
    fn test_uniform_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let u = uniform(&mut rng);
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_same_seed_same_draws() {
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(
                COST_DELTA.sample(&mut a).to_bits(),
                COST_DELTA.sample(&mut b).to_bits()
            );
        }
    }

    #[test]
    fn test_seed_42_sampling_is_stable() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let normals: Vec<u64> = (0..3)
            .map(|_| {
                let z: f64 = StandardNormal.sample(&mut rng);
                z.to_bits()
            })
            .collect();
        let uniforms: Vec<u64> = (0..2).map(|_| uniform(&mut rng).to_bits()).collect();

        // 0.47798123835102174, 1.3340706102318078, -0.21086668327103028
        assert_eq!(
            normals,
            vec![0x3fde_973e_9eb4_6e17, 0x3ff5_585a_6c98_018c, 0xbfca_fdad_f23b_8743]
        );
        // 0.6273605211973403, 0.2885938791411826
        assert_eq!(uniforms, vec![0x3fe4_1356_5f2b_02cc, 0x3fd2_7852_762f_2d90]);
    }
}
