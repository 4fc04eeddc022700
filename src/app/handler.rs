//! Handler and continuation types.
//!
//! # Responsibilities
//! - Define the callable shape of chain handlers and error handlers
//! - Tag handler kind at registration time (normal vs error)
//! - Provide the `Next` continuation with run-at-most-once semantics
//!
//! # Design Decisions
//! - Handlers are `Arc`-shared closures compared by pointer identity, so a
//!   registration slot can be swapped for a wrapper and still be told apart
//!   from the original
//! - Every handler carries a label for diagnostics; unnamed registrations
//!   fall back to the closure's type name, which points at the source site
//! - `Next` is cloneable but runs at most once across all clones; extra
//!   invocations are safe no-ops

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use crate::error::ChainError;
use crate::http::request::Request;
use crate::http::response::ResponseHandle;

/// Boxed future returned by handler invocations.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), ChainError>> + Send>>;

type HandlerFn = dyn Fn(Arc<Request>, ResponseHandle, Next) -> HandlerFuture + Send + Sync;
type ErrorHandlerFn =
    dyn Fn(ChainError, Arc<Request>, ResponseHandle, Next) -> HandlerFuture + Send + Sync;

/// A general-purpose handler: receives the request, shared response access,
/// and the continuation to the rest of the chain.
#[derive(Clone)]
pub struct Handler {
    label: Arc<str>,
    func: Arc<HandlerFn>,
}

impl Handler {
    /// Register a handler labeled by its closure type name.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Arc<Request>, ResponseHandle, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ChainError>> + Send + 'static,
    {
        Self::named(std::any::type_name::<F>(), f)
    }

    /// Register a handler with an explicit label.
    pub fn named<F, Fut>(label: impl Into<String>, f: F) -> Self
    where
        F: Fn(Arc<Request>, ResponseHandle, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ChainError>> + Send + 'static,
    {
        Self {
            label: Arc::from(label.into()),
            func: Arc::new(move |req, res, next| Box::pin(f(req, res, next))),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// True if both handles point at the same underlying function.
    pub fn ptr_eq(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }

    pub fn call(&self, req: Arc<Request>, res: ResponseHandle, next: Next) -> HandlerFuture {
        (self.func)(req, res, next)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("label", &self.label).finish()
    }
}

/// A handler that only runs while an error is pending on the traversal.
#[derive(Clone)]
pub struct ErrorHandler {
    label: Arc<str>,
    func: Arc<ErrorHandlerFn>,
}

impl ErrorHandler {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(ChainError, Arc<Request>, ResponseHandle, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ChainError>> + Send + 'static,
    {
        Self::named(std::any::type_name::<F>(), f)
    }

    pub fn named<F, Fut>(label: impl Into<String>, f: F) -> Self
    where
        F: Fn(ChainError, Arc<Request>, ResponseHandle, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ChainError>> + Send + 'static,
    {
        Self {
            label: Arc::from(label.into()),
            func: Arc::new(move |err, req, res, next| Box::pin(f(err, req, res, next))),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn ptr_eq(&self, other: &ErrorHandler) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }

    pub fn call(
        &self,
        err: ChainError,
        req: Arc<Request>,
        res: ResponseHandle,
        next: Next,
    ) -> HandlerFuture {
        (self.func)(err, req, res, next)
    }
}

impl fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorHandler")
            .field("label", &self.label)
            .finish()
    }
}

/// Chain entry, tagged at registration time.
#[derive(Debug, Clone)]
pub enum ChainHandler {
    Normal(Handler),
    Error(ErrorHandler),
}

impl ChainHandler {
    pub fn as_normal(&self) -> Option<&Handler> {
        match self {
            ChainHandler::Normal(h) => Some(h),
            ChainHandler::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorHandler> {
        match self {
            ChainHandler::Normal(_) => None,
            ChainHandler::Error(h) => Some(h),
        }
    }
}

type NextFn =
    Box<dyn FnOnce(Option<ChainError>) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send>;

/// Continuation to the rest of the chain.
///
/// Invoking it hands control to the next eligible entry, optionally carrying
/// an error. It runs at most once; the guard is shared across clones, so a
/// second invocation from anywhere is a no-op rather than a double traversal.
#[derive(Clone)]
pub struct Next {
    slot: Arc<Mutex<Option<NextFn>>>,
}

impl Next {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: FnOnce(Option<ChainError>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            slot: Arc::new(Mutex::new(Some(Box::new(move |err| Box::pin(f(err)))))),
        }
    }

    /// Continuation that goes nowhere. Useful when driving a handler outside
    /// a chain.
    pub fn noop() -> Self {
        Self::new(|_| async {})
    }

    /// Hand control onward. No-op if this continuation already ran.
    pub async fn run(&self, err: Option<ChainError>) {
        let f = self.slot.lock().unwrap().take();
        if let Some(f) = f {
            f(err).await;
        }
    }

    pub fn was_run(&self) -> bool {
        self.slot.lock().unwrap().is_none()
    }

    /// Returns a continuation that fires `hook` on its first invocation and
    /// then forwards here with the error argument unchanged.
    pub fn with_hook<H>(self, hook: H) -> Next
    where
        H: FnOnce() + Send + 'static,
    {
        Next::new(move |err| async move {
            hook();
            self.run(err).await;
        })
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("was_run", &self.was_run())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_next_runs_at_most_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let next = Next::new(move |_| async move {
            c.fetch_add(1, Ordering::SeqCst);
        });

        next.run(None).await;
        next.run(None).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(next.was_run());
    }

    #[tokio::test]
    async fn test_once_guard_is_shared_across_clones() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let next = Next::new(move |_| async move {
            c.fetch_add(1, Ordering::SeqCst);
        });

        let clone = next.clone();
        next.run(None).await;
        clone.run(None).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hook_fires_once_and_forwards_error() {
        let hook_count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(None));

        let s = seen.clone();
        let inner = Next::new(move |err| async move {
            *s.lock().unwrap() = err;
        });

        let h = hook_count.clone();
        let hooked = inner.with_hook(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });

        hooked.run(Some(ChainError::new("boom"))).await;
        hooked.run(None).await;

        assert_eq!(hook_count.load(Ordering::SeqCst), 1);
        assert_eq!(
            seen.lock().unwrap().as_ref().map(|e| e.message().to_owned()),
            Some("boom".to_owned())
        );
    }

    #[test]
    fn test_unnamed_handlers_fall_back_to_the_closure_type_name() {
        let h = Handler::new(|_req, _res, _next| async { Ok(()) });
        assert!(h.label().contains("closure"));
    }

    #[test]
    fn test_handler_identity() {
        let a = Handler::named("a", |_req, _res, _next| async { Ok(()) });
        let b = a.clone();
        let c = Handler::named("a", |_req, _res, _next| async { Ok(()) });

        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        assert_eq!(a.label(), "a");
    }
}
