//! # Noise Module
//!
//! Deterministic 2D coherent noise used to drive the terrain heightmap.
//!
//! The terrain generator only depends on the [`NoiseSource`] trait, so any
//! Perlin/simplex-family function with the signature `noise2(seed, x, y) -> [-1, 1]`
//! can be swapped in without touching generation or meshing.
//!
//! ## Seeds
//!
//! World seeds are 64-bit while the `noise` crate seeds its permutation tables with
//! 32 bits. [`fold_seed`] mixes both halves so that seeds differing only in their
//! upper bits still produce different terrain.

use std::sync::Arc;

use noise::{NoiseFn, Perlin, Seedable, Simplex};
use serde::{Deserialize, Serialize};

/// A deterministic, seed-parameterized 2D coherent noise function.
///
/// Implementations must be pure: the same `(seed, x, y)` always yields the same
/// value, on every thread and across process restarts.
pub trait NoiseSource: Send + Sync {
    /// Samples the noise field. The result is expected to lie in `[-1, 1]`.
    fn noise2(&self, seed: i64, x: f64, y: f64) -> f64;
}

/// Folds a 64-bit world seed into the 32-bit seed used by the `noise` crate.
pub fn fold_seed(seed: i64) -> u32 {
    let seed = seed as u64;
    (seed ^ (seed >> 32)) as u32
}

/// A `noise` crate function whose permutation table is built once for one seed.
///
/// Building a permutation table is far more expensive than sampling it, so the
/// table for the seed given to [`SeededNoise::new`] is cached. Sampling with any
/// other seed still works, it just builds a throwaway table for that call.
#[derive(Clone, Debug)]
pub struct SeededNoise<F> {
    seed: i64,
    function: F,
}

impl<F> SeededNoise<F>
where
    F: NoiseFn<f64, 2> + Seedable + Default,
{
    /// Creates a noise source with its permutation table prepared for `seed`.
    pub fn new(seed: i64) -> Self {
        SeededNoise {
            seed,
            function: F::default().set_seed(fold_seed(seed)),
        }
    }
}

impl<F> NoiseSource for SeededNoise<F>
where
    F: NoiseFn<f64, 2> + Seedable + Default + Send + Sync,
{
    fn noise2(&self, seed: i64, x: f64, y: f64) -> f64 {
        let sample = if seed == self.seed {
            self.function.get([x, y])
        } else {
            F::default().set_seed(fold_seed(seed)).get([x, y])
        };
        sample.clamp(-1.0, 1.0)
    }
}

/// Classic gradient noise.
pub type PerlinNoise = SeededNoise<Perlin>;
/// Simplex noise, cheaper per sample and with fewer directional artifacts.
pub type SimplexNoise = SeededNoise<Simplex>;

/// A noise "field" that returns the same value everywhere.
///
/// Produces perfectly flat terrain, which makes it the reference input for
/// heightmap regression tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantNoise(pub f64);

impl NoiseSource for ConstantNoise {
    fn noise2(&self, _seed: i64, _x: f64, _y: f64) -> f64 {
        self.0
    }
}

/// Selects the noise function a world is generated with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    /// [`PerlinNoise`]
    #[default]
    Perlin,
    /// [`SimplexNoise`]
    Simplex,
    /// [`ConstantNoise`] with the given value
    Constant { value: f64 },
}

impl NoiseKind {
    /// Builds the selected noise source with its tables prepared for `seed`.
    pub fn build(self, seed: i64) -> Arc<dyn NoiseSource> {
        match self {
            NoiseKind::Perlin => Arc::new(PerlinNoise::new(seed)),
            NoiseKind::Simplex => Arc::new(SimplexNoise::new(seed)),
            NoiseKind::Constant { value } => Arc::new(ConstantNoise(value)),
        }
    }
}
