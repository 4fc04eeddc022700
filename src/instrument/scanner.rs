//! Chain scanning and entry-point wiring.
//!
//! # Responsibilities
//! - Walk both registration surfaces of an app (global chain, route table)
//! - Replace every eligible handler in place with its wrapped version
//! - Refuse setups that could not be instrumented meaningfully
//!
//! # Design Decisions
//! - The router singleton is skipped by pointer identity; wrapping it would
//!   put a timer around routing control flow itself
//! - Error handlers are skipped entirely: a slow error handler wrapped here
//!   would hand its continuation an extra invocation path
//! - Route callbacks have no exclusions, every one is wrapped
//! - Scanning runs once at setup, before traffic; running it again wraps
//!   the wrappers, which is documented rather than guarded against

use std::sync::Arc;
use std::time::Duration;

use crate::app::chain::App;
use crate::app::handler::ChainHandler;
use crate::error::InstrumentError;
use crate::instrument::diagnostic::TracingSink;
use crate::instrument::wrapper::{HandlerWrapper, TimeoutWrapper};

/// Budget applied when the caller does not pick one.
pub const DEFAULT_BUDGET: Duration = Duration::from_millis(5000);

/// Walks an app's registration surfaces and wraps eligible handlers.
pub struct ChainScanner {
    budget: Duration,
    wrapper: Arc<dyn HandlerWrapper>,
}

impl ChainScanner {
    pub fn new(budget: Duration, wrapper: Arc<dyn HandlerWrapper>) -> Self {
        Self { budget, wrapper }
    }

    /// Instrument the app in place. Chain and route order are untouched;
    /// only eligible handler references change.
    pub fn scan(&self, app: &mut App) -> Result<(), InstrumentError> {
        if self.budget.is_zero() {
            return Err(InstrumentError::ZeroBudget);
        }
        if app.stack().is_empty() && app.routes().is_empty() {
            return Err(InstrumentError::NothingRegistered);
        }

        self.scan_chain(app);
        self.scan_routes(app);
        Ok(())
    }

    fn scan_chain(&self, app: &mut App) {
        let router = app.router().clone();
        for entry in app.stack_mut() {
            match entry {
                ChainHandler::Normal(handler) if !handler.ptr_eq(&router) => {
                    *handler = self.wrapper.wrap(handler.clone(), self.budget);
                }
                // The router and error handlers stay untouched.
                _ => {}
            }
        }
    }

    fn scan_routes(&self, app: &mut App) {
        let mut table = app.routes_mut();
        for route in table.iter_mut() {
            for callback in route.callbacks_mut() {
                *callback = self.wrapper.wrap(callback.clone(), self.budget);
            }
        }
    }
}

/// Instrument with the default 5 second budget.
pub fn instrument(app: &mut App) -> Result<(), InstrumentError> {
    instrument_with(app, DEFAULT_BUDGET)
}

/// Instrument every eligible handler with the given handoff budget.
pub fn instrument_with(app: &mut App, budget: Duration) -> Result<(), InstrumentError> {
    let wrapper = TimeoutWrapper::new(Arc::new(TracingSink));
    ChainScanner::new(budget, Arc::new(wrapper)).scan(app)
}
