//! # Individual
//!
//! An `Individual` is one candidate solution together with its binary
//! chromosome. The chromosome is authoritative: the decoded `solution` is
//! always re-derivable from it through the individual's [`GeneLayout`].
//!
//! ## Example
//!
//! ```rust
//! use genbit::individual::{Individual, ValueRange};
//!
//! let ranges = [ValueRange::new(0.0, 1.0), ValueRange::new(1.0, 2.0)];
//! let indv = Individual::new(&[1.0, 1.75], &ranges, &[0.1, 0.2]).unwrap();
//!
//! assert!(indv.precision_loss());
//! assert_eq!(indv.precisions(), &[0.125, 0.25]);
//! assert_eq!(indv.chromosome(), &[true, true, true, true, false]);
//! assert_eq!(indv.solution(), &[1.0, 1.75]);
//! ```

pub mod codec;

use std::ops;
use std::sync::Arc;

use crate::error::{ensure_len, GeneticError, Result};
use crate::rng::RandomNumberGenerator;

pub use codec::{decode, derive_gene_length, encode, GeneLength, MAX_GENE_LENGTH};

const RANGE_SLACK: f64 = 1e-9;

/// The `(low, high)` bounds of one solution component.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub low: f64,
    pub high: f64,
}

impl ValueRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn span(&self) -> f64 {
        self.high - self.low
    }

    /// Whether `value` lies within the range, allowing for the rounding noise
    /// of `low + span`.
    pub fn admits(&self, value: f64) -> bool {
        let slack = self.span().abs() * RANGE_SLACK;
        value >= self.low - slack && value <= self.high + slack
    }
}

impl From<(f64, f64)> for ValueRange {
    fn from((low, high): (f64, f64)) -> Self {
        Self::new(low, high)
    }
}

/// Where one component's fragment sits in the chromosome.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneBreakpoint {
    start: usize,
    len: usize,
}

impl GeneBreakpoint {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inclusive offset of the last bit, or `None` for a zero-length fragment.
    pub fn end(&self) -> Option<usize> {
        (self.start + self.len).checked_sub(1).filter(|_| self.len > 0)
    }

    /// The fragment as a half-open range of chromosome offsets.
    pub fn bits(&self) -> ops::Range<usize> {
        self.start..self.start + self.len
    }
}

/// Ranges, precisions and fragment geometry shared by every individual built
/// from the same configuration.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GeneLayout {
    ranges: Vec<ValueRange>,
    original_precisions: Vec<f64>,
    precisions: Vec<f64>,
    gene_lengths: Vec<usize>,
    breakpoints: Vec<GeneBreakpoint>,
    precision_loss: bool,
}

impl GeneLayout {
    /// Derives gene lengths, breakpoints and effective precisions.
    ///
    /// If any component's step count is not a power of two, every component's
    /// precision is recomputed as `span / 2^length`.
    pub fn new(ranges: &[ValueRange], precisions: &[f64]) -> Result<Self> {
        ensure_len("precisions", ranges.len(), precisions.len())?;
        if ranges.is_empty() {
            return Err(GeneticError::InvalidConfiguration(
                "an individual needs at least one component".to_string(),
            ));
        }

        let mut gene_lengths = Vec::with_capacity(ranges.len());
        let mut breakpoints = Vec::with_capacity(ranges.len());
        let mut precision_loss = false;
        let mut cursor = 0;

        for (range, &precision) in ranges.iter().zip(precisions) {
            let length = derive_gene_length(range.span(), precision)?;
            precision_loss |= !length.exact;
            gene_lengths.push(length.bits);
            breakpoints.push(GeneBreakpoint {
                start: cursor,
                len: length.bits,
            });
            cursor += length.bits;
        }

        let effective = if precision_loss {
            ranges
                .iter()
                .zip(&gene_lengths)
                .map(|(range, &bits)| range.span() / 2f64.powi(bits as i32))
                .collect()
        } else {
            precisions.to_vec()
        };

        Ok(Self {
            ranges: ranges.to_vec(),
            original_precisions: precisions.to_vec(),
            precisions: effective,
            gene_lengths,
            breakpoints,
            precision_loss,
        })
    }

    /// Number of solution components.
    pub fn dimension(&self) -> usize {
        self.ranges.len()
    }

    /// Total number of bits in a chromosome.
    pub fn chromosome_len(&self) -> usize {
        self.gene_lengths.iter().sum()
    }

    pub fn ranges(&self) -> &[ValueRange] {
        &self.ranges
    }

    pub fn original_precisions(&self) -> &[f64] {
        &self.original_precisions
    }

    pub fn precisions(&self) -> &[f64] {
        &self.precisions
    }

    pub fn gene_lengths(&self) -> &[usize] {
        &self.gene_lengths
    }

    pub fn breakpoints(&self) -> &[GeneBreakpoint] {
        &self.breakpoints
    }

    pub fn precision_loss(&self) -> bool {
        self.precision_loss
    }

    fn encode(&self, solution: &[f64]) -> Vec<bool> {
        let mut chromosome = Vec::with_capacity(self.chromosome_len());
        for (i, &value) in solution.iter().enumerate() {
            codec::encode_into(
                &mut chromosome,
                value,
                self.ranges[i].low,
                self.precisions[i],
                self.gene_lengths[i],
            );
        }
        chromosome
    }

    fn decode_component(&self, chromosome: &[bool], component: usize) -> f64 {
        codec::decode(
            &chromosome[self.breakpoints[component].bits()],
            self.ranges[component].low,
            self.precisions[component],
        )
    }
}

/// One candidate solution and its chromosome.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    layout: Arc<GeneLayout>,
    original_solution: Vec<f64>,
    solution: Vec<f64>,
    chromosome: Vec<bool>,
}

impl Individual {
    /// Builds an individual from an explicit solution with per-component
    /// ranges and precisions.
    ///
    /// The solution is encoded and immediately decoded again, which snaps it
    /// onto the representable grid; [`Individual::original_solution`] keeps the
    /// input as given.
    ///
    /// # Errors
    ///
    /// - [`GeneticError::DimensionMismatch`] if the three inputs differ in length.
    /// - [`GeneticError::InvalidConfiguration`] for an unusable range or precision.
    /// - [`GeneticError::OutOfBounds`] for a component outside its range.
    pub fn new(solution: &[f64], ranges: &[ValueRange], precisions: &[f64]) -> Result<Self> {
        let layout = GeneLayout::new(ranges, precisions)?;
        Self::with_layout(solution, Arc::new(layout))
    }

    /// Builds an individual from an explicit solution, applying one range and
    /// precision to every component.
    pub fn broadcast(solution: &[f64], range: ValueRange, precision: f64) -> Result<Self> {
        let ranges = vec![range; solution.len()];
        let precisions = vec![precision; solution.len()];
        Self::new(solution, &ranges, &precisions)
    }

    /// Builds an individual whose components are drawn uniformly from their ranges.
    pub fn random(ranges: &[ValueRange], precisions: &[f64]) -> Result<Self> {
        Self::random_with_rng(ranges, precisions, &mut RandomNumberGenerator::new())
    }

    /// Like [`Individual::random`], drawing from the given generator.
    pub fn random_with_rng(
        ranges: &[ValueRange],
        precisions: &[f64],
        rng: &mut RandomNumberGenerator,
    ) -> Result<Self> {
        let layout = GeneLayout::new(ranges, precisions)?;
        let solution: Vec<f64> = ranges
            .iter()
            .map(|range| rng.uniform_in(range.low, range.high))
            .collect();
        Self::with_layout(&solution, Arc::new(layout))
    }

    /// Builds a random `dimension`-component individual sharing one range and precision.
    pub fn random_broadcast(dimension: usize, range: ValueRange, precision: f64) -> Result<Self> {
        let ranges = vec![range; dimension];
        let precisions = vec![precision; dimension];
        Self::random(&ranges, &precisions)
    }

    /// Builds an individual on an already derived layout.
    pub fn with_layout(solution: &[f64], layout: Arc<GeneLayout>) -> Result<Self> {
        ensure_len("solution", layout.dimension(), solution.len())?;
        for (i, (&value, range)) in solution.iter().zip(layout.ranges()).enumerate() {
            if !value.is_finite() || !range.admits(value) {
                return Err(GeneticError::OutOfBounds(format!(
                    "component {} = {} is outside [{}, {}]",
                    i, value, range.low, range.high
                )));
            }
        }

        let chromosome = layout.encode(solution);
        let mut individual = Self {
            original_solution: solution.to_vec(),
            solution: vec![0.0; solution.len()],
            chromosome,
            layout,
        };
        individual.refresh_solution();
        Ok(individual)
    }

    /// Toggles one chromosome bit.
    ///
    /// The decoded solution is left untouched; call
    /// [`Individual::refresh_solution`] once all flips are done.
    pub fn flip_bit(&mut self, index: usize) -> Result<()> {
        let len = self.chromosome.len();
        let bit = self
            .chromosome
            .get_mut(index)
            .ok_or(GeneticError::IndexOutOfRange { index, len })?;
        *bit = !*bit;
        Ok(())
    }

    /// Re-derives every solution component from its gene fragment.
    pub fn refresh_solution(&mut self) {
        for component in 0..self.solution.len() {
            self.solution[component] = self.layout.decode_component(&self.chromosome, component);
        }
    }

    /// The solution the chromosome currently encodes, regardless of whether
    /// [`Individual::refresh_solution`] has been called since the last flip.
    pub fn decoded_solution(&self) -> Vec<f64> {
        (0..self.solution.len())
            .map(|component| self.layout.decode_component(&self.chromosome, component))
            .collect()
    }

    pub fn layout(&self) -> &Arc<GeneLayout> {
        &self.layout
    }

    pub fn dimension(&self) -> usize {
        self.solution.len()
    }

    pub fn original_solution(&self) -> &[f64] {
        &self.original_solution
    }

    pub fn solution(&self) -> &[f64] {
        &self.solution
    }

    pub fn chromosome(&self) -> &[bool] {
        &self.chromosome
    }

    pub fn ranges(&self) -> &[ValueRange] {
        self.layout.ranges()
    }

    pub fn original_precisions(&self) -> &[f64] {
        self.layout.original_precisions()
    }

    pub fn precisions(&self) -> &[f64] {
        self.layout.precisions()
    }

    pub fn gene_lengths(&self) -> &[usize] {
        self.layout.gene_lengths()
    }

    pub fn breakpoints(&self) -> &[GeneBreakpoint] {
        self.layout.breakpoints()
    }

    pub fn precision_loss(&self) -> bool {
        self.layout.precision_loss()
    }
}
