//! Navigation middleware.
//!
//! Middleware runs **before** a navigation commits. Each one inspects the
//! current route, the route being navigated to and the navigation arguments,
//! and answers with a [`MiddlewareResult`]:
//!
//! | Result | Effect |
//! |--------|--------|
//! | [`Proceed`](MiddlewareResult::Proceed) | ask the next middleware |
//! | [`Abort`](MiddlewareResult::Abort) | cancel silently, nothing changes |
//! | [`Redirect`](MiddlewareResult::Redirect) | abandon, start a fresh navigation to another route |
//! | [`AbortWithCallback`](MiddlewareResult::AbortWithCallback) | cancel, then run the side effect once |
//!
//! All methods are **synchronous**; navigation runs on a single thread.
//!
//! # Execution order
//!
//! Middleware runs in **registration order**. The first result that is not
//! `Proceed` short-circuits the pipeline: later middleware is not called.
//! Legacy boolean guards ([`legacy_fn`]) are adapted into the same sequence,
//! `true` mapping to `Proceed` and `false` to `Abort`.
//!
//! # Creating middleware
//!
//! | Approach | When to use |
//! |----------|-------------|
//! | Implement [`RouteMiddleware`] | Named, reusable, may hold state |
//! | [`middleware_fn`] | Quick one-off from a closure |
//! | [`legacy_fn`] | Existing boolean guards |
//!
//! # Example
//!
//! ```
//! use scene_navigator::{middleware_fn, MiddlewareResult};
//!
//! let logged_in = false;
//! let auth = middleware_fn(move |_current, next, _args| {
//!     if next.name() == "dashboard" && !logged_in {
//!         MiddlewareResult::redirect("login")
//!     } else {
//!         MiddlewareResult::Proceed
//!     }
//! });
//! # let _ = auth;
//! ```

use crate::args::Args;
use crate::route::Route;
use crate::trace_log;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// MiddlewareResult
// ============================================================================

/// Side effect attached to [`MiddlewareResult::AbortWithCallback`].
pub type AbortCallback = Box<dyn FnOnce() + Send + 'static>;

/// Verdict of a single middleware on a navigation attempt.
pub enum MiddlewareResult {
    /// Let the navigation continue.
    Proceed,

    /// Cancel the navigation without changing anything.
    Abort,

    /// Abandon the navigation and navigate to `to` with `args` instead.
    Redirect {
        /// Name of the route to navigate to.
        to: String,
        /// Arguments for the redirected navigation.
        args: Args,
    },

    /// Cancel the navigation, then run the callback exactly once.
    AbortWithCallback(AbortCallback),
}

impl MiddlewareResult {
    /// Let the navigation continue (alias for [`Proceed`](Self::Proceed)).
    pub fn proceed() -> Self {
        Self::Proceed
    }

    /// Cancel the navigation (alias for [`Abort`](Self::Abort)).
    pub fn abort() -> Self {
        Self::Abort
    }

    /// Redirect to `to` without arguments.
    pub fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            args: Args::none(),
        }
    }

    /// Redirect to `to` with `args`.
    pub fn redirect_with(to: impl Into<String>, args: Args) -> Self {
        Self::Redirect { to: to.into(), args }
    }

    /// Cancel the navigation and run `callback` afterwards.
    pub fn abort_with_callback<F>(callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::AbortWithCallback(Box::new(callback))
    }

    /// Check if this result lets navigation continue.
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed)
    }

    /// Check if this result cancels navigation (with or without callback).
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Abort | Self::AbortWithCallback(_))
    }

    /// Check if this result redirects navigation.
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    /// Get the redirect target, if this is a redirect.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Redirect { to, .. } => Some(to.as_str()),
            _ => None,
        }
    }
}

impl From<bool> for MiddlewareResult {
    fn from(proceed: bool) -> Self {
        if proceed {
            Self::Proceed
        } else {
            Self::Abort
        }
    }
}

impl fmt::Debug for MiddlewareResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proceed => write!(f, "Proceed"),
            Self::Abort => write!(f, "Abort"),
            Self::Redirect { to, args } => f
                .debug_struct("Redirect")
                .field("to", to)
                .field("args", args)
                .finish(),
            Self::AbortWithCallback(_) => write!(f, "AbortWithCallback(..)"),
        }
    }
}

// ============================================================================
// RouteMiddleware trait
// ============================================================================

/// Guard consulted before a navigation commits.
///
/// `current` is `None` for the very first navigation.
///
/// # Example
///
/// ```
/// use scene_navigator::{Args, MiddlewareResult, Route, RouteMiddleware};
///
/// struct Maintenance {
///     enabled: bool,
/// }
///
/// impl RouteMiddleware for Maintenance {
///     fn handle(&self, _current: Option<&Route>, next: &Route, _args: &Args) -> MiddlewareResult {
///         if self.enabled && next.name() != "maintenance" {
///             MiddlewareResult::redirect("maintenance")
///         } else {
///             MiddlewareResult::Proceed
///         }
///     }
///
///     fn name(&self) -> &'static str {
///         "Maintenance"
///     }
/// }
/// ```
pub trait RouteMiddleware: Send + Sync + 'static {
    /// Decide what happens to the navigation from `current` to `next`.
    fn handle(&self, current: Option<&Route>, next: &Route, args: &Args) -> MiddlewareResult;

    /// Middleware name for debugging.
    fn name(&self) -> &'static str {
        "RouteMiddleware"
    }
}

// ============================================================================
// Closure adapters
// ============================================================================

/// Create middleware from a closure.
pub const fn middleware_fn<F>(f: F) -> FnMiddleware<F>
where
    F: Fn(Option<&Route>, &Route, &Args) -> MiddlewareResult + Send + Sync + 'static,
{
    FnMiddleware { f }
}

/// Middleware created from a closure via [`middleware_fn`].
pub struct FnMiddleware<F> {
    f: F,
}

impl<F> RouteMiddleware for FnMiddleware<F>
where
    F: Fn(Option<&Route>, &Route, &Args) -> MiddlewareResult + Send + Sync + 'static,
{
    fn handle(&self, current: Option<&Route>, next: &Route, args: &Args) -> MiddlewareResult {
        (self.f)(current, next, args)
    }

    fn name(&self) -> &'static str {
        "FnMiddleware"
    }
}

/// Adapt a boolean guard: `true` proceeds, `false` aborts silently.
pub const fn legacy_fn<F>(f: F) -> LegacyMiddleware<F>
where
    F: Fn(Option<&Route>, &Route, &Args) -> bool + Send + Sync + 'static,
{
    LegacyMiddleware { f }
}

/// Boolean guard adapted via [`legacy_fn`].
pub struct LegacyMiddleware<F> {
    f: F,
}

impl<F> RouteMiddleware for LegacyMiddleware<F>
where
    F: Fn(Option<&Route>, &Route, &Args) -> bool + Send + Sync + 'static,
{
    fn handle(&self, current: Option<&Route>, next: &Route, args: &Args) -> MiddlewareResult {
        (self.f)(current, next, args).into()
    }

    fn name(&self) -> &'static str {
        "LegacyMiddleware"
    }
}

// ============================================================================
// MiddlewarePipeline
// ============================================================================

/// Ordered, short-circuiting sequence of middleware.
#[derive(Clone, Default)]
pub struct MiddlewarePipeline {
    middleware: Vec<Arc<dyn RouteMiddleware>>,
}

impl MiddlewarePipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append middleware; it runs after everything already registered.
    pub fn push(&mut self, middleware: impl RouteMiddleware) {
        self.middleware.push(Arc::new(middleware));
    }

    /// Append already shared middleware.
    pub fn push_shared(&mut self, middleware: Arc<dyn RouteMiddleware>) {
        self.middleware.push(middleware);
    }

    /// Run the middleware in order and return the first non-`Proceed`
    /// result, or `Proceed` if every middleware agreed.
    pub fn evaluate(&self, current: Option<&Route>, next: &Route, args: &Args) -> MiddlewareResult {
        for (index, mw) in self.middleware.iter().enumerate() {
            let result = mw.handle(current, next, args);
            trace_log!(
                "Middleware #{} '{}' on '{}' -> {:?}",
                index,
                mw.name(),
                next.name(),
                result
            );
            if !result.is_proceed() {
                return result;
            }
        }
        MiddlewareResult::Proceed
    }

    /// Number of registered middleware.
    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    /// Return `true` if no middleware is registered.
    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }
}

impl fmt::Debug for MiddlewarePipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.middleware.iter().map(|mw| mw.name()))
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
