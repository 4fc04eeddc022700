//! Stall detection for handler chains.
//!
//! Wraps every handler registered on a host [`App`] so that a handler
//! failing to hand off control within a configured budget is reported on
//! the diagnostic channel, while handlers that complete in time behave
//! exactly as before. Detection is observation only: nothing is cancelled,
//! retried, or failed on the request's behalf.
//!
//! ```text
//! Setup:    App registration → instrument(app) → wrapped chain + routes
//! Request:  chain traversal → each wrapped handler races its handoff
//!           against a watchdog → timely handoff stays silent,
//!           a missed budget logs one warning line
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod http;
pub mod instrument;

pub use app::chain::App;
pub use app::handler::{ChainHandler, ErrorHandler, Handler, Next};
pub use config::{load_config, InstrumentConfig};
pub use error::{ChainError, InstrumentError};
pub use self::http::{Request, Response, ResponseHandle};
pub use instrument::diagnostic::{describe, DiagnosticSink, TracingSink};
pub use instrument::scanner::{instrument, instrument_with, ChainScanner, DEFAULT_BUDGET};
pub use instrument::wrapper::{HandlerWrapper, TimeoutWrapper};
