//! Error types shared across the workspace.
//!
//! Each layer defines its own typed errors with `thiserror` and folds foreign
//! failures into boxed sources at port boundaries.

use std::time::Duration;

/// A mode name that is neither `on` nor `off`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode `{0}`")]
pub struct InvalidModeError(pub String);

/// A required control-panel interaction could not be completed.
///
/// Raised by session setup, login, navigation, or by the mode switch itself.
/// Ambiguous appliance state is **not** an actuation error.
#[derive(Debug, thiserror::Error)]
pub enum ActuationError {
    /// An element did not become visible within its allotted wait.
    #[error("{step}: not visible after {}s", timeout.as_secs())]
    NotVisible {
        /// Human-readable step name (e.g. `"login form"`).
        step: &'static str,
        /// How long the step waited.
        timeout: Duration,
    },

    /// Required configuration (credentials, URLs) is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    /// The UI-automation driver reported a failure.
    #[error("{step}: driver error")]
    Driver {
        /// Step during which the driver failed.
        step: &'static str,
        /// Underlying driver error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The run was interrupted before it finished.
    #[error("interrupted before completion")]
    Cancelled,
}

impl ActuationError {
    /// Wrap a driver failure that happened during `step`.
    pub fn driver<E>(step: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Driver {
            step,
            source: Box::new(source),
        }
    }
}

/// Render `err` and its source chain on a single line.
#[must_use]
pub fn describe(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
