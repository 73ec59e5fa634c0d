//! # Fitness
//!
//! The objective a [`Population`](crate::population::Population) scores its
//! individuals with, plus two wrappers:
//!
//! - [`Minimize`] turns a cost into a fitness by negating it.
//! - [`LinearScaling`] shifts raw values by the extreme of the current
//!   population so the weakest individual still scores `ksi` above zero.
//!
//! ```rust
//! use genbit::fitness::{Fitness, LinearScaling, Minimize, ScalingTarget};
//! use genbit::individual::{Individual, ValueRange};
//! use genbit::population::Population;
//!
//! let cost = |indv: &Individual| indv.solution()[0].powi(2);
//! let individuals = [0.25, 0.5, 0.75]
//!     .iter()
//!     .map(|&x| Individual::broadcast(&[x], ValueRange::new(0.0, 1.0), 0.125).unwrap())
//!     .collect();
//!
//! let population = Population::new(individuals, Minimize(cost)).unwrap();
//! assert_eq!(population.best().solution(), &[0.25]);
//!
//! let scaled = LinearScaling::new(cost, ScalingTarget::Min, 0.5).unwrap();
//! assert_eq!(scaled.target(), ScalingTarget::Min);
//! ```

use std::sync::{PoisonError, RwLock};

use crate::error::{GeneticError, Result};
use crate::individual::Individual;

/// The objective scored against every individual. Higher is better.
///
/// Implementations must be deterministic between two calls to
/// [`Fitness::prepare`]: the population caches scores and may call `score`
/// again for the same individual at any point.
///
/// Any `Fn(&Individual) -> f64` closure that is `Send + Sync` is a `Fitness`.
pub trait Fitness: Send + Sync {
    fn score(&self, individual: &Individual) -> f64;

    /// Called with every individual of a population right before the
    /// population scores them.
    fn prepare(&self, _individuals: &[Individual]) {}
}

impl<F> Fitness for F
where
    F: Fn(&Individual) -> f64 + Send + Sync,
{
    fn score(&self, individual: &Individual) -> f64 {
        self(individual)
    }
}

/// Maximizes the negated inner objective, i.e. minimizes the inner one.
#[derive(Debug, Clone, Copy)]
pub struct Minimize<F>(pub F);

impl<F: Fitness> Fitness for Minimize<F> {
    fn score(&self, individual: &Individual) -> f64 {
        -self.0.score(individual)
    }

    fn prepare(&self, individuals: &[Individual]) {
        self.0.prepare(individuals);
    }
}

/// Which end of the raw objective [`LinearScaling`] rewards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalingTarget {
    /// Larger raw values are better: `f' = f - f_min + ksi`.
    Max,
    /// Smaller raw values are better: `f' = f_max - f + ksi`.
    Min,
}

/// Linear fitness scaling against the population being scored.
///
/// `f_min` and `f_max` are the extreme finite raw values seen by the last
/// [`Fitness::prepare`] call, so every prepared population scores in
/// `[ksi, f_max - f_min + ksi]`. Preparing evaluates the inner objective once
/// more per individual. Before any population was prepared an individual is
/// scored as if it were alone, i.e. `ksi`.
#[derive(Debug)]
pub struct LinearScaling<F> {
    inner: F,
    target: ScalingTarget,
    ksi: f64,
    bounds: RwLock<Option<(f64, f64)>>,
}

impl<F: Fitness> LinearScaling<F> {
    /// # Errors
    ///
    /// Returns [`GeneticError::InvalidConfiguration`] unless `ksi` is finite and positive.
    pub fn new(inner: F, target: ScalingTarget, ksi: f64) -> Result<Self> {
        if !(ksi.is_finite() && ksi > 0.0) {
            return Err(GeneticError::InvalidConfiguration(format!(
                "Linear scaling needs a finite positive ksi, got {}",
                ksi
            )));
        }

        Ok(Self {
            inner,
            target,
            ksi,
            bounds: RwLock::new(None),
        })
    }

    pub fn target(&self) -> ScalingTarget {
        self.target
    }

    pub fn ksi(&self) -> f64 {
        self.ksi
    }

    /// Raw `(f_min, f_max)` of the last prepared population.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        *self.bounds.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<F: Fitness> Fitness for LinearScaling<F> {
    fn score(&self, individual: &Individual) -> f64 {
        let raw = self.inner.score(individual);
        let (low, high) = self.bounds().unwrap_or((raw, raw));
        match self.target {
            ScalingTarget::Max => raw - low + self.ksi,
            ScalingTarget::Min => high - raw + self.ksi,
        }
    }

    fn prepare(&self, individuals: &[Individual]) {
        self.inner.prepare(individuals);
        let bounds = individuals
            .iter()
            .map(|indv| self.inner.score(indv))
            .filter(|raw| raw.is_finite())
            .fold(None, |bounds: Option<(f64, f64)>, raw| match bounds {
                None => Some((raw, raw)),
                Some((low, high)) => Some((low.min(raw), high.max(raw))),
            });
        *self.bounds.write().unwrap_or_else(PoisonError::into_inner) = bounds;
    }
}
