//! Logging abstraction layer.
//!
//! The navigator reports every step of its state machine through these
//! macros. They dispatch to either the [`log`](https://docs.rs/log) or
//! [`tracing`](https://docs.rs/tracing) crate depending on which feature is
//! enabled; with neither feature the calls compile to nothing. The two
//! features are **mutually exclusive**, enable at most one.
//!
//! All records are emitted under the [`LOG_TARGET`] target so applications
//! can filter navigator output independently of their own
//! (`RUST_LOG=scene_navigator=debug`).
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! # Available macros
//!
//! - `trace_log!` — finest-grained diagnostic output.
//! - `debug_log!` — information useful for debugging.
//! - `info_log!` — general informational messages.
//! - `warn_log!` — potentially harmful situations.
//! - `error_log!` — error events that might still allow the app to continue.
//!
//! All macros accept `format!`-style arguments:
//!
//! ```ignore
//! use scene_navigator::{trace_log, debug_log, info_log, warn_log, error_log};
//!
//! trace_log!("Middleware '{}' -> {:?}", name, verdict);
//! debug_log!("Loading view '{}' for route '{}'", template, route);
//! info_log!("Navigated to '{}' (depth {})", route, depth);
//! warn_log!("Layout '{}' is not registered, rendering bare view", layout);
//! error_log!("Deferred navigation failed: {}", err);
//! ```

/// Log target shared by every navigator record.
pub const LOG_TARGET: &str = "scene_navigator";

/// Emit a **trace**-level log message.
///
/// Used for per-middleware verdicts and phase changes.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}

/// Emit a **debug**-level log message.
///
/// Used for view loading, transition lookup and no-op operations.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}

/// Emit an **info**-level log message.
///
/// Used for route registration and committed navigations.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::info!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}

/// Emit a **warn**-level log message.
///
/// Used for aborted navigations and configuration fallbacks.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}

/// Emit an **error**-level log message.
///
/// Used for failed loads, redirect loops and failing deferred commands.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::error!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::error!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}
