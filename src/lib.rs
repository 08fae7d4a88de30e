//! # scene-navigator
//!
//! Named-route navigation for desktop UI applications.
//!
//! An application registers **routes** (a name, a view template and the
//! controller type bound to it) and navigates between them by name. Every
//! navigation passes a **middleware** pipeline that may let it through,
//! cancel it or redirect it, then the view is loaded, displayed with an
//! optional **transition** and recorded on a **history stack** that
//! supports going back, replacing and resetting. Controllers implementing
//! [`Routable`] are told when they are navigated to, returned from, resumed
//! or refreshed.
//!
//! The crate is toolkit-agnostic. The UI side is plugged in through three
//! traits (see [`view`]):
//!
//! - [`ViewLoader`] turns a template into a root node,
//! - [`ComponentRegistry`] hands out controller instances,
//! - [`DisplaySurface`] shows a root node in the window.
//!
//! # Quick start
//!
//! ```
//! use scene_navigator::*;
//! use std::sync::Arc;
//!
//! struct Home;
//! impl Routable for Home {}
//!
//! struct Settings;
//! impl Routable for Settings {}
//!
//! struct Loader;
//! impl ViewLoader<Arc<str>> for Loader {
//!     fn load(&self, context: ControllerKey, template: &str) -> Result<LoadedView<Arc<str>>, ViewLoadError> {
//!         Ok(LoadedView::new(Arc::from(template), context))
//!     }
//! }
//!
//! let mut components = ComponentStore::new();
//! components.register(Arc::new(Home)).register(Arc::new(Settings));
//!
//! let mut navigator = Navigator::new(Loader, components, RootSlot::new());
//! navigator.register_route("home", "/views/home.fxml", ControllerKey::of::<Home>(), None);
//! navigator.register_route("settings", "/views/settings.fxml", ControllerKey::of::<Settings>(), Some("fade"));
//!
//! // Settings is locked until the user unlocks it.
//! navigator.config_mut().add_route_middleware(middleware_fn(|_current, next, _args| {
//!     if next.name() == "settings" {
//!         MiddlewareResult::redirect("home")
//!     } else {
//!         MiddlewareResult::Proceed
//!     }
//! }));
//!
//! navigator.to("settings", Args::none()).unwrap();
//! assert_eq!(navigator.history(), ["home"]);
//! ```
//!
//! # Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`navigator`] | the navigation state machine |
//! | [`route`] | routes and the route registry |
//! | [`middleware`] | middleware results and the pipeline |
//! | [`lifecycle`] | controller callbacks |
//! | [`state`] | history stack |
//! | [`transition`] | transition effects and descriptors |
//! | [`config`] | router and layout configuration |
//! | [`view`] | toolkit collaborators |
//! | [`events`] | event bus and route change events |
//! | [`executor`] | deferred navigation and background work |
//! | [`error`] | outcomes and errors |
//!
//! # Features
//!
//! - `log` (default): log through the `log` crate.
//! - `tracing`: log through the `tracing` crate instead.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod logging;

pub mod args;
pub mod config;
pub mod error;
pub mod events;
pub mod executor;
pub mod lifecycle;
pub mod middleware;
pub mod navigator;
pub mod route;
pub mod state;
pub mod transition;
pub mod view;

pub use args::Args;
pub use config::{
    LayoutConfig, RouterConfig, ThemeSource, DEFAULT_CONTENT_CONTAINER, DEFAULT_DARK_MODE_KEY,
    DEFAULT_MAX_REDIRECTS,
};
pub use error::{
    CallbackError, ConfigError, NavigationError, NavigationOutcome, TaskError, ViewLoadError,
};
pub use events::{EventBus, NavigationDirection, RouteChangeEvent, SubscriptionId};
pub use executor::{
    Dispatcher, InlineExecutor, Job, NavigationCommand, NavigatorTask, TaskExecutor,
    ThreadExecutor, DEFAULT_WORKERS,
};
pub use lifecycle::{CallbackResult, Routable};
pub use middleware::{
    legacy_fn, middleware_fn, AbortCallback, FnMiddleware, LegacyMiddleware,
    MiddlewarePipeline, MiddlewareResult, RouteMiddleware,
};
pub use navigator::{NavigationPhase, Navigator};
pub use route::{ControllerKey, Route, RouteRegistry};
pub use state::{EmptyStackNoOp, NavigationStack, NavigationState};
pub use transition::{SlideDirection, Transition, TransitionEffect, TransitionRegistry};
pub use view::{ComponentRegistry, ComponentStore, DisplaySurface, LoadedView, RootSlot, ViewLoader};
