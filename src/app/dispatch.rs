//! Per-request chain traversal.
//!
//! # Responsibilities
//! - Run chain entries in registration order
//! - Route errors to error handlers, skipping normal handlers while an
//!   error is pending
//! - Drive route callback chains from the router entry and resume the
//!   outer chain when a route falls through
//!
//! # Design Decisions
//! - Each handler gets a fresh `Next` continuing from its own position, so
//!   traversal state lives on the stack of futures rather than in the app
//! - A handler returning `Err` after it already handed off cannot re-route
//!   the traversal; the late error is logged and dropped
//! - End of chain with a pending error responds 500 if nothing was sent

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use http::StatusCode;

use crate::app::handler::{ChainHandler, Handler, Next};
use crate::app::routes::RouteTable;
use crate::error::ChainError;
use crate::http::request::Request;
use crate::http::response::ResponseHandle;

type Step = Pin<Box<dyn Future<Output = ()> + Send>>;

pub(crate) async fn run_chain(
    entries: Arc<Vec<ChainHandler>>,
    req: Arc<Request>,
    res: ResponseHandle,
) {
    advance(entries, 0, None, req, res).await;
}

/// Run the first eligible entry at or after `idx`, handing it a continuation
/// that re-enters this function one position further down.
fn advance(
    entries: Arc<Vec<ChainHandler>>,
    idx: usize,
    mut pending: Option<ChainError>,
    req: Arc<Request>,
    res: ResponseHandle,
) -> Step {
    Box::pin(async move {
        let mut i = idx;
        loop {
            let Some(entry) = entries.get(i) else {
                if let Some(err) = pending {
                    tracing::error!(error = %err, path = req.path(), "error reached end of chain");
                    res.send(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("internal error: {err}"),
                    );
                }
                return;
            };

            match (entry, pending.take()) {
                (ChainHandler::Normal(handler), None) => {
                    let next = Next::new({
                        let entries = entries.clone();
                        let req = req.clone();
                        let res = res.clone();
                        move |err| advance(entries, i + 1, err, req, res)
                    });
                    let fallback = next.clone();
                    if let Err(err) = handler.call(req.clone(), res.clone(), next).await {
                        forward_failure(handler.label(), err, fallback).await;
                    }
                    return;
                }
                (ChainHandler::Error(handler), Some(err)) => {
                    let next = Next::new({
                        let entries = entries.clone();
                        let req = req.clone();
                        let res = res.clone();
                        move |err| advance(entries, i + 1, err, req, res)
                    });
                    let fallback = next.clone();
                    if let Err(err) = handler.call(err, req.clone(), res.clone(), next).await {
                        forward_failure(handler.label(), err, fallback).await;
                    }
                    return;
                }
                (_, restored) => {
                    // Not eligible in the current traversal state.
                    pending = restored;
                    i += 1;
                }
            }
        }
    })
}

/// A handler body failed. If it never handed off, the failure becomes the
/// pending error for the rest of the chain; otherwise it is too late.
async fn forward_failure(label: &str, err: ChainError, next: Next) {
    if next.was_run() {
        tracing::error!(handler = label, error = %err, "handler failed after handing off; error dropped");
    } else {
        next.run(Some(err)).await;
    }
}

/// Build the router singleton over a shared route table.
///
/// The router is an ordinary chain handler: it finds the first matching
/// route and runs its callbacks as a sub-chain. A request with no matching
/// route falls through to the rest of the outer chain.
pub(crate) fn router_handler(routes: Arc<RwLock<RouteTable>>) -> Handler {
    Handler::named("router", move |req: Arc<Request>, res, next| {
        let routes = routes.clone();
        async move {
            let callbacks = {
                let table = routes.read().unwrap();
                table
                    .find(&req.method, req.path())
                    .map(|route| route.callbacks().to_vec())
            };
            match callbacks {
                Some(callbacks) => {
                    run_callbacks(Arc::new(callbacks), 0, req, res, next).await;
                }
                None => next.run(None).await,
            }
            Ok(())
        }
    })
}

/// Run a route's callback chain. The final continuation resumes the outer
/// chain; a route-level error bypasses the remaining callbacks and bubbles
/// straight out.
fn run_callbacks(
    callbacks: Arc<Vec<Handler>>,
    idx: usize,
    req: Arc<Request>,
    res: ResponseHandle,
    outer: Next,
) -> Step {
    Box::pin(async move {
        let Some(handler) = callbacks.get(idx) else {
            outer.run(None).await;
            return;
        };

        let next = Next::new({
            let callbacks = callbacks.clone();
            let req = req.clone();
            let res = res.clone();
            let outer = outer.clone();
            move |err| async move {
                match err {
                    Some(err) => outer.run(Some(err)).await,
                    None => run_callbacks(callbacks, idx + 1, req, res, outer).await,
                }
            }
        });
        let fallback = next.clone();
        if let Err(err) = handler.call(req.clone(), res.clone(), next).await {
            forward_failure(handler.label(), err, fallback).await;
        }
    })
}
