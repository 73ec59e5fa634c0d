//! Process-wide lifecycle of the distributed layer.
//!
//! Multi-process groups call [`init`] when they are created. Once
//! [`finalize`] has run, the layer cannot be brought back: `init` fails and
//! the engine refuses to run generations that need a merge.

use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::{GeneticError, Result};

#[derive(Debug, Clone, Copy)]
struct Lifecycle {
    initialized: bool,
    finalized: bool,
}

static LIFECYCLE: Mutex<Lifecycle> = Mutex::new(Lifecycle {
    initialized: false,
    finalized: false,
});

fn current() -> Lifecycle {
    *LIFECYCLE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Brings the distributed layer up. Idempotent.
///
/// # Errors
///
/// Returns [`GeneticError::Distributed`] after [`finalize`].
pub fn init() -> Result<()> {
    let mut state = LIFECYCLE.lock().unwrap_or_else(PoisonError::into_inner);
    if state.finalized {
        return Err(GeneticError::Distributed(
            "the distributed runtime has already been finalized".to_string(),
        ));
    }
    if !state.initialized {
        debug!("distributed runtime initialized");
        state.initialized = true;
    }
    Ok(())
}

/// Shuts the distributed layer down for the rest of the process. Idempotent,
/// and a no-op if [`init`] never ran.
pub fn finalize() {
    let mut state = LIFECYCLE.lock().unwrap_or_else(PoisonError::into_inner);
    if state.initialized && !state.finalized {
        debug!("distributed runtime finalized");
        state.finalized = true;
    }
}

pub fn is_initialized() -> bool {
    current().initialized
}

pub fn is_finalized() -> bool {
    current().finalized
}

/// Fails once the layer has been finalized.
pub(crate) fn ensure_active() -> Result<()> {
    if is_finalized() {
        return Err(GeneticError::Distributed(
            "cannot merge generations after the distributed runtime was finalized".to_string(),
        ));
    }
    Ok(())
}
