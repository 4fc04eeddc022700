//! Diagnostic formatting and emission.
//!
//! # Responsibilities
//! - Format the slow-handler warning line
//! - Define the sink the warning is handed to
//!
//! # Design Decisions
//! - One line per event, human-readable; the format is advisory, only the
//!   content is load-bearing (marker phrase, host, path, handler label)
//! - The sink is a trait so tests can record emissions and hosts can point
//!   the channel anywhere; the default goes to tracing at WARN

use std::time::Duration;

use crate::http::request::Request;

/// Destination for slow-handler warnings.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, line: &str);
}

/// Default sink: a WARN-level tracing event.
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, line: &str) {
        tracing::warn!(target: "stallwatch", "{line}");
    }
}

/// One line naming the stalled handler and the request it stalled on.
pub fn describe(label: &str, req: &Request, budget: Duration) -> String {
    format!(
        "A chain handler took too long to execute: {}{} (handler: {}, budget: {}ms)",
        req.host().unwrap_or_default(),
        req.path_and_query(),
        label,
        budget.as_millis(),
    )
}
