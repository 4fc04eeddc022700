//! Per-handler timeout wrapping.
//!
//! # Responsibilities
//! - Produce a drop-in replacement for a handler that races its handoff
//!   against a watchdog timer
//! - Guarantee exactly one outcome per invocation: a timely handoff disarms
//!   the watchdog, a missed budget emits one diagnostic
//!
//! # Design Decisions
//! - The watchdog is a spawned task, not a race inside the handler future:
//!   only the continuation disarms it, so a handler that sends a response
//!   without handing off is still reported, exactly like one that stalls
//! - Disarm is an abort of the watchdog task; aborting a finished or
//!   already-aborted task is a no-op, which makes disarm idempotent
//! - The wrapper never touches error propagation: a failure returned by the
//!   wrapped handler passes through unchanged, and emission neither invokes
//!   the continuation nor interrupts the handler

use std::sync::Arc;
use std::time::Duration;

use crate::app::handler::Handler;
use crate::instrument::diagnostic::{describe, DiagnosticSink};

/// Produces wrapped replacements for eligible handlers.
///
/// The scanner takes one of these by argument, so tests can substitute a
/// fake and observe what would be wrapped.
pub trait HandlerWrapper: Send + Sync {
    fn wrap(&self, handler: Handler, budget: Duration) -> Handler;
}

/// Production wrapper: watchdog timer plus diagnostic emission.
pub struct TimeoutWrapper {
    sink: Arc<dyn DiagnosticSink>,
}

impl TimeoutWrapper {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink }
    }
}

impl HandlerWrapper for TimeoutWrapper {
    fn wrap(&self, handler: Handler, budget: Duration) -> Handler {
        let sink = Arc::clone(&self.sink);
        let label: Arc<str> = Arc::from(handler.label());
        let inner = handler;

        Handler::named(label.to_string(), move |req, res, next| {
            let inner = inner.clone();
            let sink = sink.clone();
            let label = label.clone();
            async move {
                let watchdog = {
                    let sink = sink.clone();
                    let label = label.clone();
                    let req = Arc::clone(&req);
                    tokio::spawn(async move {
                        tokio::time::sleep(budget).await;
                        sink.emit(&describe(&label, &req, budget));
                    })
                };
                let disarm = watchdog.abort_handle();
                let next = next.with_hook(move || disarm.abort());

                inner.call(req, res, next).await
            }
        })
    }
}
