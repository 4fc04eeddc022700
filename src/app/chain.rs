//! The host application: handler chain, router singleton, route table.
//!
//! # Design Decisions
//! - The app instance is the unit of configuration: created by the caller,
//!   instrumented once, then served. No process-wide state.
//! - The router joins the chain lazily, at the position where the first
//!   route is registered, so handlers mounted earlier run before routing.
//! - The route table sits behind a shared lock because the router closure
//!   reads it at request time while setup-time instrumentation rewrites
//!   its callbacks in place.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use http::{Method, StatusCode};

use crate::app::dispatch::{router_handler, run_chain};
use crate::app::handler::{ChainHandler, ErrorHandler, Handler};
use crate::app::routes::{PathPattern, RouteTable};
use crate::http::request::Request;
use crate::http::response::{Response, ResponseHandle};

/// A host application owning an ordered handler chain and a route table.
pub struct App {
    stack: Vec<ChainHandler>,
    router: Handler,
    router_mounted: bool,
    routes: Arc<RwLock<RouteTable>>,
}

impl App {
    pub fn new() -> Self {
        let routes = Arc::new(RwLock::new(RouteTable::new()));
        let router = router_handler(routes.clone());
        Self {
            stack: Vec::new(),
            router,
            router_mounted: false,
            routes,
        }
    }

    /// Append a general-purpose handler to the chain.
    pub fn mount(&mut self, handler: Handler) {
        self.stack.push(ChainHandler::Normal(handler));
    }

    /// Append an error handler to the chain.
    pub fn mount_error(&mut self, handler: ErrorHandler) {
        self.stack.push(ChainHandler::Error(handler));
    }

    /// Register a route with an ordered callback chain.
    pub fn route(&mut self, method: Method, path: &str, callbacks: Vec<Handler>) {
        self.ensure_router();
        self.routes
            .write()
            .unwrap()
            .add(method, PathPattern::parse(path), callbacks);
    }

    pub fn get(&mut self, path: &str, handler: Handler) {
        self.route(Method::GET, path, vec![handler]);
    }

    pub fn post(&mut self, path: &str, handler: Handler) {
        self.route(Method::POST, path, vec![handler]);
    }

    fn ensure_router(&mut self) {
        if !self.router_mounted {
            self.stack.push(ChainHandler::Normal(self.router.clone()));
            self.router_mounted = true;
        }
    }

    /// The router singleton. Chain entries are compared against this by
    /// identity to keep routing control flow out of instrumentation.
    pub fn router(&self) -> &Handler {
        &self.router
    }

    pub fn stack(&self) -> &[ChainHandler] {
        &self.stack
    }

    pub(crate) fn stack_mut(&mut self) -> &mut [ChainHandler] {
        &mut self.stack
    }

    pub fn routes(&self) -> RwLockReadGuard<'_, RouteTable> {
        self.routes.read().unwrap()
    }

    pub(crate) fn routes_mut(&self) -> RwLockWriteGuard<'_, RouteTable> {
        self.routes.write().unwrap()
    }

    /// Run one request through the chain and return the response.
    pub async fn dispatch(&self, req: Request) -> Response {
        let req = Arc::new(req);
        let res = ResponseHandle::new();
        let entries = Arc::new(self.stack.clone());

        run_chain(entries, req.clone(), res.clone()).await;

        if !res.is_sent() {
            res.send(
                StatusCode::NOT_FOUND,
                format!("no handler responded for {} {}", req.method, req.path()),
            );
        }
        res.snapshot()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
