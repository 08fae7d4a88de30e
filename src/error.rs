//! Error handling for the navigator.
//!
//! This module defines the types returned by every navigation operation:
//!
//! - [`NavigationOutcome`] — what happened when an attempt did **not** fail
//!   (`Navigated`, `Aborted`, `Unchanged`). Middleware cancellation and
//!   below-minimum `back()`/`pop()` calls are outcomes, not errors.
//! - [`NavigationError`] — engine failures (unknown route, view load
//!   failure, unregistered controller, redirect loop) and errors raised by
//!   controller lifecycle callbacks.
//! - [`ViewLoadError`] — reported by a [`ViewLoader`](crate::ViewLoader).
//! - [`TaskError`] — a background job submitted through a
//!   [`Dispatcher`](crate::Dispatcher) panicked.
//! - [`ConfigError`] — configuration-time mistakes such as registering the
//!   same transition name twice.
//!
//! Engine errors are produced **before** any state is touched. Lifecycle
//! errors are produced **after** the commit; the stack and display surface
//! already reflect the new route when the caller sees them.
//!
//! # Examples
//!
//! ```
//! use scene_navigator::{NavigationError, NavigationOutcome};
//!
//! let outcome = NavigationOutcome::Navigated { route: "home".into() };
//! assert!(outcome.is_navigated());
//! assert_eq!(outcome.route(), Some("home"));
//!
//! let err = NavigationError::RouteNotFound { name: "missing".into() };
//! assert_eq!(err.to_string(), "Route not found: missing");
//! ```

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Boxed error raised by application code inside a lifecycle callback.
pub type CallbackError = Box<dyn Error + Send + Sync + 'static>;

// ============================================================================
// Navigation outcome
// ============================================================================

/// Non-error result of a navigation operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// A new state was committed; `route` is the route now displayed
    /// (after any redirects).
    Navigated { route: String },
    /// A middleware cancelled the attempt; nothing changed.
    Aborted { route: String },
    /// The operation had nothing to do (`back()` at depth 1, `refresh()`
    /// before the first navigation).
    Unchanged,
}

impl NavigationOutcome {
    /// Check if a new state was committed
    pub fn is_navigated(&self) -> bool {
        matches!(self, NavigationOutcome::Navigated { .. })
    }

    /// Check if a middleware cancelled the navigation
    pub fn is_aborted(&self) -> bool {
        matches!(self, NavigationOutcome::Aborted { .. })
    }

    /// Check if the operation was a no-op
    pub fn is_unchanged(&self) -> bool {
        matches!(self, NavigationOutcome::Unchanged)
    }

    /// Name of the route that was committed or cancelled.
    pub fn route(&self) -> Option<&str> {
        match self {
            NavigationOutcome::Navigated { route } | NavigationOutcome::Aborted { route } => {
                Some(route)
            }
            NavigationOutcome::Unchanged => None,
        }
    }
}

// ============================================================================
// View loading
// ============================================================================

/// Failure reported by a view loader when a template cannot be located or
/// parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLoadError {
    /// Template locator that failed.
    pub template: String,
    /// Loader-specific description.
    pub message: String,
}

impl ViewLoadError {
    /// Create a load error for `template`.
    pub fn new(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ViewLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot load view '{}': {}", self.template, self.message)
    }
}

impl Error for ViewLoadError {}

// ============================================================================
// Navigation errors
// ============================================================================

/// Detailed error variants that can occur during navigation.
///
/// Implements [`std::error::Error`] and [`Display`](std::fmt::Display) for
/// idiomatic error handling.
#[derive(Debug, Clone)]
pub enum NavigationError {
    /// No route is registered under this name.
    RouteNotFound { name: String },

    /// The view loader could not produce the route's view.
    ViewLoad { route: String, source: ViewLoadError },

    /// The loaded view is bound to a controller the component registry does
    /// not know.
    ControllerNotRegistered { route: String, controller: String },

    /// Middleware kept redirecting past the configured hop limit.
    RedirectLimit { chain: Vec<String>, limit: usize },

    /// A controller lifecycle callback failed after the commit.
    Lifecycle {
        route: String,
        callback: &'static str,
        source: Arc<dyn Error + Send + Sync>,
    },
}

impl NavigationError {
    pub(crate) fn lifecycle(route: &str, callback: &'static str, source: CallbackError) -> Self {
        NavigationError::Lifecycle {
            route: route.to_string(),
            callback,
            source: Arc::from(source),
        }
    }

    /// Check if the error left the navigator untouched.
    ///
    /// Everything but [`Lifecycle`](Self::Lifecycle) is raised before the
    /// commit.
    pub fn is_pre_commit(&self) -> bool {
        !matches!(self, NavigationError::Lifecycle { .. })
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::RouteNotFound { name } => {
                write!(f, "Route not found: {}", name)
            }
            NavigationError::ViewLoad { route, source } => {
                write!(f, "Navigation to '{}' failed: {}", route, source)
            }
            NavigationError::ControllerNotRegistered { route, controller } => {
                write!(
                    f,
                    "Controller '{}' for route '{}' is not registered",
                    controller, route
                )
            }
            NavigationError::RedirectLimit { chain, limit } => {
                write!(
                    f,
                    "Redirect limit ({}) exceeded: {}",
                    limit,
                    chain.join(" -> ")
                )
            }
            NavigationError::Lifecycle {
                route,
                callback,
                source,
            } => {
                write!(f, "{} on route '{}' failed: {}", callback, route, source)
            }
        }
    }
}

impl Error for NavigationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NavigationError::ViewLoad { source, .. } => Some(source),
            NavigationError::Lifecycle { source, .. } => Some(&**source),
            _ => None,
        }
    }
}

// ============================================================================
// Background tasks
// ============================================================================

/// A background job panicked before producing its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskError {
    /// Panic message, or a placeholder when the payload was not a string.
    pub message: String,
}

impl TaskError {
    /// Create a task error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "background task panicked".to_string());
        Self { message }
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "background task failed: {}", self.message)
    }
}

impl Error for TaskError {}

// ============================================================================
// Configuration errors
// ============================================================================

/// Errors raised while building a [`RouterConfig`](crate::RouterConfig).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A transition or layout with this name was already registered.
    DuplicateKey { key: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DuplicateKey { key } => {
                write!(f, "The config key [{}] is already defined", key)
            }
        }
    }
}

impl Error for ConfigError {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_navigated() {
        let outcome = NavigationOutcome::Navigated {
            route: "home".to_string(),
        };
        assert!(outcome.is_navigated());
        assert!(!outcome.is_aborted());
        assert!(!outcome.is_unchanged());
        assert_eq!(outcome.route(), Some("home"));
    }

    #[test]
    fn test_outcome_unchanged_has_no_route() {
        let outcome = NavigationOutcome::Unchanged;
        assert!(outcome.is_unchanged());
        assert_eq!(outcome.route(), None);
    }

    #[test]
    fn test_view_load_error_display() {
        let error = NavigationError::ViewLoad {
            route: "home".to_string(),
            source: ViewLoadError::new("/views/home.fxml", "not found"),
        };
        assert_eq!(
            error.to_string(),
            "Navigation to 'home' failed: cannot load view '/views/home.fxml': not found"
        );
        assert!(error.source().is_some());
        assert!(error.is_pre_commit());
    }

    #[test]
    fn test_redirect_limit_display() {
        let error = NavigationError::RedirectLimit {
            chain: vec!["a".into(), "b".into(), "a".into()],
            limit: 2,
        };
        assert_eq!(error.to_string(), "Redirect limit (2) exceeded: a -> b -> a");
    }

    #[test]
    fn test_lifecycle_error_keeps_source() {
        let error = NavigationError::lifecycle("home", "on_navigate", "boom".into());
        assert!(!error.is_pre_commit());
        assert_eq!(error.to_string(), "on_navigate on route 'home' failed: boom");
        assert_eq!(error.source().map(ToString::to_string), Some("boom".into()));
    }

    #[test]
    fn test_task_error_from_panic_payload() {
        let text: Box<dyn std::any::Any + Send> = Box::new("worker failed");
        assert_eq!(TaskError::from_panic(text.as_ref()), TaskError::new("worker failed"));

        let owned: Box<dyn std::any::Any + Send> = Box::new(format!("code {}", 7));
        assert_eq!(TaskError::from_panic(owned.as_ref()).message, "code 7");

        let opaque: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(
            TaskError::from_panic(opaque.as_ref()).to_string(),
            "background task failed: background task panicked"
        );
    }

    #[test]
    fn test_duplicate_key_display() {
        let error = ConfigError::DuplicateKey {
            key: "fade".to_string(),
        };
        assert_eq!(error.to_string(), "The config key [fade] is already defined");
    }
}
