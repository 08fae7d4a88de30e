//! Route definitions and the route registry.
//!
//! A [`Route`] maps a symbolic name to a view template and the identity of
//! the controller bound to that view. Routes are configured with builder
//! methods and become immutable once handed to the [`RouteRegistry`], which
//! shares them as `Arc<Route>` with every [`NavigationState`](crate::NavigationState)
//! that displays them.
//!
//! # Example
//!
//! ```
//! use scene_navigator::{ControllerKey, Route, RouteRegistry};
//!
//! struct HomeController;
//!
//! let mut routes = RouteRegistry::new();
//! routes.register(
//!     Route::new("home", "/views/home.fxml", ControllerKey::of::<HomeController>())
//!         .with_transition("fade")
//!         .with_layout("main"),
//! );
//!
//! let home = routes.resolve("home").unwrap();
//! assert_eq!(home.template(), "/views/home.fxml");
//! assert_eq!(home.transition(), Some("fade"));
//! assert!(routes.resolve("settings").is_err());
//! ```

use crate::error::NavigationError;
use crate::{debug_log, info_log};
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// ============================================================================
// ControllerKey
// ============================================================================

/// Type identity of a controller.
///
/// Used by a [`ViewLoader`](crate::ViewLoader) to report which controller a
/// view is bound to, and by a [`ComponentRegistry`](crate::ComponentRegistry)
/// to hand out the instance. Equality and hashing use the [`TypeId`] only;
/// the type name is kept for diagnostics.
#[derive(Clone, Copy)]
pub struct ControllerKey {
    id: TypeId,
    name: &'static str,
}

impl ControllerKey {
    /// Key for controller type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Full type name of the controller.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ControllerKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ControllerKey {}

impl Hash for ControllerKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ControllerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ControllerKey({})", self.name)
    }
}

impl fmt::Display for ControllerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ============================================================================
// Route
// ============================================================================

/// Named mapping from a symbolic identifier to a view template and its
/// controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    name: String,
    template: String,
    controller: ControllerKey,
    transition: Option<String>,
    layout: Option<String>,
}

impl Route {
    /// Create a route without transition or layout.
    pub fn new(
        name: impl Into<String>,
        template: impl Into<String>,
        controller: ControllerKey,
    ) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            controller,
            transition: None,
            layout: None,
        }
    }

    /// Use the named transition when this route is displayed.
    pub fn with_transition(mut self, transition: impl Into<String>) -> Self {
        self.transition = Some(transition.into());
        self
    }

    /// Wrap this route's view in the named layout.
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    /// Unique route name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Template locator handed to the view loader.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Identity of the controller bound to the view.
    pub fn controller(&self) -> ControllerKey {
        self.controller
    }

    /// Name of the transition to apply, if any.
    pub fn transition(&self) -> Option<&str> {
        self.transition.as_deref()
    }

    /// Name of the layout to wrap the view in, if any.
    pub fn layout(&self) -> Option<&str> {
        self.layout.as_deref()
    }
}

// ============================================================================
// RouteRegistry
// ============================================================================

/// Routes keyed by name.
///
/// Registration is append/overwrite only: registering a name twice silently
/// replaces the earlier route.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: HashMap<String, Arc<Route>>,
}

impl RouteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `route`, replacing any route with the same name.
    pub fn register(&mut self, route: Route) -> Arc<Route> {
        let route = Arc::new(route);
        let previous = self
            .routes
            .insert(route.name().to_string(), Arc::clone(&route));
        if previous.is_some() {
            debug_log!("Route '{}' re-registered, previous definition replaced", route.name());
        } else {
            info_log!(
                "Registered route '{}' -> '{}' ({})",
                route.name(),
                route.template(),
                route.controller()
            );
        }
        route
    }

    /// Look a route up by name.
    pub fn resolve(&self, name: &str) -> Result<Arc<Route>, NavigationError> {
        self.routes
            .get(name)
            .cloned()
            .ok_or_else(|| NavigationError::RouteNotFound {
                name: name.to_string(),
            })
    }

    /// Check if a route with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Return `true` if no route is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterate over all registered routes in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Route>> {
        self.routes.values()
    }
}
