//! # Process groups
//!
//! The engine can split one generation across several cooperating processes.
//! It only needs the narrow contract of [`ProcessGroup`]: how many processes
//! there are, which one this is, a contiguous share of the work, and an
//! element-wise sum over equally shaped buffers that leaves the result on
//! every process.
//!
//! Two groups ship with the crate: [`SingleProcess`] for ordinary runs and
//! [`LocalGroup`], whose ranks are threads of the current process.

pub mod local;
pub mod matrix;
pub mod runtime;
pub mod single;

pub use local::LocalGroup;
pub use matrix::SolutionMatrix;
pub use single::SingleProcess;

use crate::error::{ensure_len, Result};

/// A group of cooperating processes.
pub trait ProcessGroup: Send + Sync {
    /// Number of processes in the group. Always at least 1.
    fn process_count(&self) -> usize;

    /// This process's rank in `0..process_count()`.
    fn rank(&self) -> usize;

    /// Whether this process is rank 0.
    fn is_leader(&self) -> bool {
        self.rank() == 0
    }

    /// This process's half-open share of `0..total`. See [`partition_range`].
    fn partition_range(&self, total: usize) -> (usize, usize) {
        partition_range(total, self.process_count(), self.rank())
    }

    /// Sums every process's `rows × cols` row-major `local` buffer element-wise
    /// into `global` on every process.
    ///
    /// Blocks until every process in the group has contributed.
    ///
    /// # Errors
    ///
    /// Returns [`GeneticError::Distributed`](crate::error::GeneticError::Distributed)
    /// or a dimension error if the buffers do not match the announced shape or
    /// disagree between processes. Every process sees the failure.
    fn allreduce_sum(&self, local: &[f64], global: &mut [f64], rows: usize, cols: usize)
        -> Result<()>;

    /// Blocks until every process in the group reaches the barrier.
    fn barrier(&self) -> Result<()>;

    /// Tells every process whether any process reports `failed`.
    ///
    /// Every process must call this at the same point, including processes
    /// that had nothing to do, so a local failure can never leave a peer
    /// blocked in a later reduction.
    fn any_failed(&self, failed: bool) -> Result<bool> {
        let local = [if failed { 1.0 } else { 0.0 }];
        let mut global = [0.0];
        self.allreduce_sum(&local, &mut global, 1, 1)?;
        Ok(global[0] > 0.0)
    }
}

/// Splits `0..total` into `process_count` contiguous, size-balanced half-open
/// ranges and returns the one belonging to `rank`. The remainder goes to the
/// lowest ranks first.
pub fn partition_range(total: usize, process_count: usize, rank: usize) -> (usize, usize) {
    let process_count = process_count.max(1);
    let base = total / process_count;
    let residual = total % process_count;

    let start = rank * base + rank.min(residual);
    let end = start + base + usize::from(rank < residual);
    (start, end)
}

/// Checks both buffers against the announced `rows × cols` shape.
pub(crate) fn check_shape(local: &[f64], global: &[f64], rows: usize, cols: usize) -> Result<()> {
    ensure_len("local reduce buffer", rows * cols, local.len())?;
    ensure_len("global reduce buffer", rows * cols, global.len())
}
