pub(crate) mod autopilot;
pub(crate) mod bootstrap;
pub(crate) mod loop_runner;

use engine::{ReplayError, TransitionError, TuningError};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Tuning(#[from] TuningError),
    #[error("failed to start run: {0}")]
    Start(#[from] TransitionError),
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error("failed to encode run summary: {0}")]
    Summary(#[source] serde_json::Error),
}
