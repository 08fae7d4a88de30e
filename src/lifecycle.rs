//! Controller lifecycle callbacks.
//!
//! A controller opts into navigation events by implementing [`Routable`].
//! Every method has a no-op default, so a controller only overrides the
//! events it cares about. The component registry only stores `Routable`
//! controllers, which makes the capability a compile-time property of the
//! controller type.
//!
//! # Callback order
//!
//! | Operation | Outgoing controller | Incoming controller |
//! |-----------|---------------------|---------------------|
//! | `to` / `off` / `off_all` / `pop` | — | `on_navigate(args)` |
//! | `back` | `on_return(args of the new top)` | `on_resume()` |
//! | `refresh` | `on_return(none)` | `on_navigate(args)`, `pre_refresh()`, root swap, `post_refresh()` |
//!
//! The outgoing callback always returns before the incoming one starts.
//! Callbacks run **after** the commit: an `Err` is reported to the caller
//! as [`NavigationError::Lifecycle`](crate::NavigationError::Lifecycle) but
//! the new route stays displayed.
//!
//! # Example
//!
//! ```
//! use scene_navigator::{Args, CallbackResult, Routable};
//! use std::sync::Mutex;
//!
//! #[derive(Default)]
//! struct ProfileController {
//!     user: Mutex<Option<u32>>,
//! }
//!
//! impl Routable for ProfileController {
//!     fn on_navigate(&self, args: &Args) -> CallbackResult {
//!         *self.user.lock().unwrap() = args.get::<u32>().copied();
//!         Ok(())
//!     }
//! }
//! ```

use crate::args::Args;
use crate::error::CallbackError;

/// Result returned by every lifecycle callback.
pub type CallbackResult = Result<(), CallbackError>;

/// Navigation capability of a controller.
///
/// Controllers are shared between the component registry and the navigator,
/// so callbacks take `&self`; use interior mutability for state.
pub trait Routable: Send + Sync + 'static {
    /// The controller became current through `to`, `off`, `off_all`, `pop`
    /// or a redirect.
    fn on_navigate(&self, _args: &Args) -> CallbackResult {
        Ok(())
    }

    /// The controller is being left through `back()` (receives the
    /// arguments of the state being returned to) or `refresh()` (receives
    /// no arguments).
    fn on_return(&self, _result: &Args) -> CallbackResult {
        Ok(())
    }

    /// The controller became current again through `back()`.
    fn on_resume(&self) -> CallbackResult {
        Ok(())
    }

    /// The view was reloaded by `refresh()`; the new root is not displayed
    /// yet.
    fn pre_refresh(&self) -> CallbackResult {
        Ok(())
    }

    /// The reloaded root is now displayed.
    fn post_refresh(&self) -> CallbackResult {
        Ok(())
    }
}
