//! Request and response context types handed to chain handlers.
//!
//! # Data Flow
//! ```text
//! Host frontend (any HTTP server)
//!     → Request (method, uri, headers; shared read-only via Arc)
//!     → handler chain traversal
//!     → ResponseHandle (shared write access, first write wins)
//!     → Response snapshot back to the frontend
//! ```

pub mod request;
pub mod response;

pub use request::Request;
pub use response::{Response, ResponseHandle};
