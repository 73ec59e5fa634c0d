//! Conversion between real-valued solution components and gene fragments.
//!
//! A gene fragment of `length` bits addresses `2^length` grid points above the
//! range floor: the bit pattern holding `count` stands for
//! `low + precision * (count + 1)`. The floor itself is not on the grid, so the
//! top of the range is reachable and the bottom is approached from one step up.

use crate::error::{GeneticError, Result};

/// Longest gene fragment a component may use. Every count must stay exactly
/// representable as an `f64`.
pub const MAX_GENE_LENGTH: usize = 52;

const GRID_TOLERANCE: f64 = 1e-9;

/// The bit length derived for one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneLength {
    /// Number of bits in the fragment.
    pub bits: usize,
    /// Whether the requested step count was already a power of two.
    pub exact: bool,
}

/// Derives the fragment length for a component spanning `span` at the
/// requested `precision`.
///
/// `steps = floor(span / precision)` and the length is `floor(log2(steps))`.
/// A step count that is not a power of two cannot be addressed without loss,
/// which is reported through [`GeneLength::exact`].
///
/// # Errors
///
/// Returns [`GeneticError::InvalidConfiguration`] for a non-positive span or
/// precision, for a precision coarser than the span, and for a precision so
/// fine that the fragment would exceed [`MAX_GENE_LENGTH`] bits.
pub fn derive_gene_length(span: f64, precision: f64) -> Result<GeneLength> {
    if !span.is_finite() || span <= 0.0 {
        return Err(GeneticError::InvalidConfiguration(format!(
            "range span must be positive and finite, got {}",
            span
        )));
    }
    if !precision.is_finite() || precision <= 0.0 {
        return Err(GeneticError::InvalidConfiguration(format!(
            "precision must be positive and finite, got {}",
            precision
        )));
    }

    let steps = snap_floor(span / precision);
    if steps < 1.0 {
        return Err(GeneticError::InvalidConfiguration(format!(
            "precision {} is coarser than the range span {}",
            precision, span
        )));
    }
    if steps >= 2f64.powi(MAX_GENE_LENGTH as i32 + 1) {
        return Err(GeneticError::InvalidConfiguration(format!(
            "precision {} over span {} needs more than {} bits",
            precision, span, MAX_GENE_LENGTH
        )));
    }

    let steps = steps as u64;
    Ok(GeneLength {
        bits: steps.ilog2() as usize,
        exact: steps.is_power_of_two(),
    })
}

/// Appends the `length`-bit fragment for `value` to `bits`, most significant bit first.
///
/// The count is `floor((value - low) / precision) - 1`, clamped into
/// `[0, 2^length - 1]`. Clamping keeps the exact floor (count `-1`) on the
/// lowest grid point instead of wrapping around to the highest.
pub fn encode_into(bits: &mut Vec<bool>, value: f64, low: f64, precision: f64, length: usize) {
    let max_count = (1u64 << length) - 1;
    let steps = snap_floor((value - low) / precision);
    let count = if steps < 1.0 {
        0
    } else {
        (steps as u64 - 1).min(max_count)
    };

    bits.reserve(length);
    bits.extend((0..length).rev().map(|shift| (count >> shift) & 1 == 1));
}

/// Encodes one component into a fresh fragment. See [`encode_into`].
pub fn encode(value: f64, low: f64, precision: f64, length: usize) -> Vec<bool> {
    let mut bits = Vec::with_capacity(length);
    encode_into(&mut bits, value, low, precision, length);
    bits
}

/// Decodes a fragment (most significant bit first) into its component value.
pub fn decode(bits: &[bool], low: f64, precision: f64) -> f64 {
    let count = bits
        .iter()
        .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit));
    low + precision * (count + 1) as f64
}

/// `floor`, except that ratios within rounding noise of an integer land on it.
/// Without this `(low + p * k - low) / p` could floor to `k - 1`.
fn snap_floor(ratio: f64) -> f64 {
    let nearest = ratio.round();
    if (ratio - nearest).abs() <= GRID_TOLERANCE * nearest.abs().max(1.0) {
        nearest
    } else {
        ratio.floor()
    }
}
