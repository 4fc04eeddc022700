//! Host application subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (setup time):
//!     App::mount / App::mount_error  → ordered chain entries
//!     App::route / get / post        → route table, router joins the chain
//!
//! Dispatch (per request):
//!     App::dispatch(request)
//!     → dispatch.rs walks the chain in order
//!     → router entry matches the route table, runs route callbacks
//!     → Response snapshot
//! ```

pub mod chain;
pub mod dispatch;
pub mod handler;
pub mod routes;

pub use chain::App;
pub use handler::{ChainHandler, ErrorHandler, Handler, Next};
pub use routes::{PathPattern, Route, RouteTable};
