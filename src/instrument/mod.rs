//! Handler instrumentation subsystem.
//!
//! # Data Flow
//! ```text
//! Setup (once, before traffic):
//!     instrument(app) / instrument_with(app, budget)
//!     → scanner.rs walks the chain and the route table
//!     → wrapper.rs replaces each eligible handler in place
//!
//! Per request (inside each wrapped handler):
//!     arm watchdog → run original handler
//!     → continuation fires in time: disarm, nothing logged
//!     → budget expires first: diagnostic.rs formats one warning line
//! ```
//!
//! # Design Decisions
//! - Observation only: a stalled handler is reported, never cancelled,
//!   retried, or failed
//! - The scanner, wrapper, and sink compose by argument, not by global
//!   state, so each seam is substitutable in tests

pub mod diagnostic;
pub mod scanner;
pub mod wrapper;

pub use diagnostic::{describe, DiagnosticSink, TracingSink};
pub use scanner::{instrument, instrument_with, ChainScanner, DEFAULT_BUDGET};
pub use wrapper::{HandlerWrapper, TimeoutWrapper};
