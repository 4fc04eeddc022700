//! Crate error types.

use thiserror::Error;

/// Raised when instrumentation cannot be applied safely.
#[derive(Debug, Error)]
pub enum InstrumentError {
    /// A zero budget would flag every handler on every request.
    #[error("handoff budget must be greater than zero")]
    ZeroBudget,

    /// The app has no chain entries and no routes. Instrumenting at this
    /// point would silently observe nothing, so it is rejected instead.
    #[error("nothing registered on the app; instrument after handlers and routes are in place")]
    NothingRegistered,
}

/// Error value carried along the chain once a handler fails.
///
/// A handler signals failure either by returning this from its body or by
/// handing it to its continuation. Either way the traversal switches to the
/// error path and only error handlers run from that point.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ChainError {
    message: String,
}

impl ChainError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
