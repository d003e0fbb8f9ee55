//! Running an execution off the calling thread.
//!
//! Compilation can take arbitrarily long, so front ends that must stay
//! responsive hand the call to a worker thread and poll or wait with a
//! deadline. There is no cancellation: an abandoned worker runs to
//! completion and its result is dropped. A worker that dies without
//! reporting (a panicking toolchain) ends the execution with
//! [`ExecutionError::WorkerLost`].

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, TryRecvError};
use snip_ir::Value;
use tracing::{debug, warn};

use crate::engine::Engine;
use crate::error::EngineError;
use crate::params::ParameterSet;
use crate::toolchain::Toolchain;

/// Why a detached execution produced no value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// The worker thread exited without sending a result.
    #[error("execution worker exited without a result")]
    WorkerLost,
}

/// Outcome of one execution.
pub type ExecutionResult = Result<Value, ExecutionError>;

/// Handle to an execution running on a worker thread.
///
/// Dropping the handle abandons the worker.
#[derive(Debug)]
pub struct PendingExecution {
    receiver: Receiver<ExecutionResult>,
}

/// Start `engine.execute_method(body, params)` on a new thread.
pub fn spawn_execution<T>(
    engine: Arc<Engine<T>>,
    body: impl Into<String>,
    params: ParameterSet,
) -> PendingExecution
where
    T: Toolchain + 'static,
{
    let body = body.into();
    let (sender, receiver) = channel::bounded(1);
    thread::spawn(move || {
        let result = engine
            .execute_method(&body, &params)
            .map_err(ExecutionError::from);
        if sender.send(result).is_err() {
            debug!("execution finished after its handle was dropped");
        }
    });
    PendingExecution { receiver }
}

impl PendingExecution {
    /// The result, if the execution has finished. Never blocks.
    ///
    /// Once the worker is gone without a result every call returns
    /// `Some(Err(ExecutionError::WorkerLost))`.
    pub fn try_result(&self) -> Option<ExecutionResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("worker exited without a result");
                Some(Err(ExecutionError::WorkerLost))
            }
        }
    }

    /// Wait up to `timeout` for the result. `None` when the deadline
    /// passes first; a lost worker is reported as soon as it is noticed.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<ExecutionResult> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => {
                debug!(?timeout, "execution timed out");
                None
            }
            Err(RecvTimeoutError::Disconnected) => {
                warn!("worker exited without a result");
                Some(Err(ExecutionError::WorkerLost))
            }
        }
    }
}
