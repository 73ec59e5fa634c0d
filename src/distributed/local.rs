//! An in-process [`ProcessGroup`] whose ranks are threads.
//!
//! Every rank runs its own copy of the engine on its own thread and the ranks
//! meet in [`LocalGroup::allreduce_sum`], so a run partitions and merges
//! generations exactly like a multi-process one without an external launcher.
//!
//! Ranks block on a shared barrier, so each rank needs a dedicated OS thread.
//! Spawn them with `std::thread::scope` or `std::thread::spawn`, never as
//! tasks on a bounded pool that the ranks themselves also wait on.
//!
//! ```rust
//! use genbit::distributed::{LocalGroup, ProcessGroup};
//!
//! let groups = LocalGroup::create(2).unwrap();
//! let sums: Vec<Vec<f64>> = std::thread::scope(|scope| {
//!     let handles: Vec<_> = groups
//!         .iter()
//!         .map(|group| {
//!             scope.spawn(move || {
//!                 let local = vec![group.rank() as f64 + 1.0; 3];
//!                 let mut global = vec![0.0; 3];
//!                 group.allreduce_sum(&local, &mut global, 3, 1).unwrap();
//!                 global
//!             })
//!         })
//!         .collect();
//!     handles.into_iter().map(|h| h.join().unwrap()).collect()
//! });
//! assert_eq!(sums, vec![vec![3.0; 3], vec![3.0; 3]]);
//! ```

use std::sync::{Arc, Barrier, Mutex, MutexGuard, PoisonError};

use tracing::{trace, warn};

use crate::distributed::{check_shape, runtime, ProcessGroup};
use crate::error::{GeneticError, Result};

#[derive(Debug, Default)]
struct ReduceState {
    shape: Option<(usize, usize)>,
    accum: Vec<f64>,
    failure: Option<GeneticError>,
}

#[derive(Debug)]
struct Shared {
    size: usize,
    barrier: Barrier,
    state: Mutex<ReduceState>,
}

/// One rank of a thread-backed process group.
#[derive(Debug, Clone)]
pub struct LocalGroup {
    rank: usize,
    shared: Arc<Shared>,
}

impl LocalGroup {
    /// Creates `size` connected ranks, ordered by rank.
    ///
    /// # Errors
    ///
    /// - [`GeneticError::InvalidConfiguration`] if `size` is zero.
    /// - [`GeneticError::Distributed`] if the runtime was finalized.
    pub fn create(size: usize) -> Result<Vec<LocalGroup>> {
        if size == 0 {
            return Err(GeneticError::InvalidConfiguration(
                "a process group needs at least one rank".to_string(),
            ));
        }
        runtime::init()?;

        let shared = Arc::new(Shared {
            size,
            barrier: Barrier::new(size),
            state: Mutex::new(ReduceState::default()),
        });
        Ok((0..size)
            .map(|rank| LocalGroup {
                rank,
                shared: Arc::clone(&shared),
            })
            .collect())
    }

    // A rank that panicked mid-reduction leaves the others waiting on the
    // barrier anyway, so the poisoned state is used as is.
    fn state(&self) -> MutexGuard<'_, ReduceState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn contribute(&self, local: &[f64], global: &[f64], rows: usize, cols: usize) {
        let mut state = self.state();
        if state.failure.is_some() {
            return;
        }

        let agreed = state.shape;
        match agreed {
            None => {
                state.shape = Some((rows, cols));
                state.accum = vec![0.0; rows * cols];
            }
            Some(shape) if shape != (rows, cols) => {
                state.failure = Some(GeneticError::Distributed(format!(
                    "rank {} reduces a {}x{} buffer but the group agreed on {}x{}",
                    self.rank, rows, cols, shape.0, shape.1
                )));
                return;
            }
            Some(_) => {}
        }

        if let Err(err) = check_shape(local, global, rows, cols) {
            state.failure = Some(err);
            return;
        }
        for (acc, value) in state.accum.iter_mut().zip(local) {
            *acc += value;
        }
    }
}

impl ProcessGroup for LocalGroup {
    fn process_count(&self) -> usize {
        self.shared.size
    }

    fn rank(&self) -> usize {
        self.rank
    }

    fn allreduce_sum(
        &self,
        local: &[f64],
        global: &mut [f64],
        rows: usize,
        cols: usize,
    ) -> Result<()> {
        // Every rank passes all three barriers even on failure, so one bad
        // buffer cannot strand the others.
        self.contribute(local, global, rows, cols);
        self.shared.barrier.wait();

        let outcome = {
            let state = self.state();
            match &state.failure {
                Some(err) => Err(err.clone()),
                None => {
                    global.copy_from_slice(&state.accum);
                    Ok(())
                }
            }
        };
        self.shared.barrier.wait();

        if self.is_leader() {
            *self.state() = ReduceState::default();
        }
        self.shared.barrier.wait();

        match &outcome {
            Ok(()) => trace!(rank = self.rank, rows, cols, "allreduce complete"),
            Err(err) => warn!(rank = self.rank, error = %err, "allreduce failed"),
        }
        outcome
    }

    fn barrier(&self) -> Result<()> {
        self.shared.barrier.wait();
        Ok(())
    }
}
