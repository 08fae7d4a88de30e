//! Contracts with the UI toolkit.
//!
//! The navigator never creates or draws views itself. It talks to three
//! collaborators handed to [`Navigator::new`](crate::Navigator::new):
//!
//! | Collaborator | Contract |
//! |--------------|----------|
//! | [`ViewLoader`] | turn a template locator into a root node and report its controller |
//! | [`ComponentRegistry`] | hand out the controller instance for a [`ControllerKey`] |
//! | [`DisplaySurface`] | show a root node in the window |
//!
//! `R` is the toolkit's root-node handle. It is cloned into the
//! [`NavigationState`](crate::NavigationState) so `back()` can re-display
//! the exact same node, so it should be a cheap handle (an `Rc`, an `Arc`,
//! an entity id, ...).
//!
//! [`ComponentStore`] and [`RootSlot`] are ready-made implementations for
//! applications that wire their controllers by hand.

use crate::config::LayoutConfig;
use crate::error::ViewLoadError;
use crate::lifecycle::Routable;
use crate::route::ControllerKey;
use crate::{debug_log, info_log};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// ViewLoader
// ============================================================================

/// View produced by a [`ViewLoader`].
#[derive(Debug, Clone)]
pub struct LoadedView<R> {
    /// Root node of the view.
    pub root: R,
    /// Controller the view is bound to.
    pub controller: ControllerKey,
}

impl<R> LoadedView<R> {
    /// Pair a root with its controller identity.
    pub fn new(root: R, controller: ControllerKey) -> Self {
        Self { root, controller }
    }
}

/// Builds views from template locators.
pub trait ViewLoader<R> {
    /// Load the view at `template`.
    ///
    /// `context` is the controller identity declared by the route; loaders
    /// that resolve templates relative to a type use it as the lookup base.
    fn load(&self, context: ControllerKey, template: &str) -> Result<LoadedView<R>, ViewLoadError>;

    /// Embed `content` in `layout` and return the combined root.
    ///
    /// Loaders without layout support display the bare content.
    fn load_layout(&self, layout: &LayoutConfig, content: R) -> Result<R, ViewLoadError> {
        debug_log!(
            "Loader has no layout support, '{}' not applied",
            layout.template()
        );
        Ok(content)
    }
}

// ============================================================================
// ComponentRegistry
// ============================================================================

/// Resolves controller instances by identity.
pub trait ComponentRegistry {
    /// Controller registered for `key`.
    fn resolve(&self, key: ControllerKey) -> Option<Arc<dyn Routable>>;
}

/// Controllers registered explicitly, one instance per controller type.
#[derive(Clone, Default)]
pub struct ComponentStore {
    controllers: HashMap<ControllerKey, Arc<dyn Routable>>,
}

impl ComponentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `controller` under its own type, replacing any previous
    /// instance of that type.
    pub fn register<T: Routable>(&mut self, controller: Arc<T>) -> &mut Self {
        let key = ControllerKey::of::<T>();
        info_log!("Registered controller {}", key);
        self.controllers.insert(key, controller);
        self
    }

    /// Register an instance under an explicit key.
    pub fn register_as(&mut self, key: ControllerKey, controller: Arc<dyn Routable>) -> &mut Self {
        info_log!("Registered controller {}", key);
        self.controllers.insert(key, controller);
        self
    }

    /// Check if a controller is registered for `key`.
    pub fn contains(&self, key: ControllerKey) -> bool {
        self.controllers.contains_key(&key)
    }

    /// Number of registered controllers.
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Return `true` if no controller is registered.
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

impl ComponentRegistry for ComponentStore {
    fn resolve(&self, key: ControllerKey) -> Option<Arc<dyn Routable>> {
        self.controllers.get(&key).cloned()
    }
}

impl fmt::Debug for ComponentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.controllers.keys()).finish()
    }
}

// ============================================================================
// DisplaySurface
// ============================================================================

/// The window area showing the current root.
pub trait DisplaySurface<R> {
    /// Show `root`, replacing whatever was displayed.
    fn set_root(&mut self, root: R);

    /// Root currently displayed.
    fn root(&self) -> Option<&R>;

    /// Apply the configured stylesheets; called after every root swap.
    fn apply_stylesheets(&mut self, _stylesheets: &[String]) {}

    /// Toggle the dark theme on the new root.
    ///
    /// Called after every root swap when the configured theme source knows
    /// the dark-mode flag.
    fn apply_theme(&mut self, _dark: bool) {}
}

/// In-memory surface that records what it was asked to display.
#[derive(Debug, Clone)]
pub struct RootSlot<R> {
    root: Option<R>,
    stylesheets: Vec<String>,
    dark: bool,
    swaps: usize,
}

impl<R> RootSlot<R> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self {
            root: None,
            stylesheets: Vec::new(),
            dark: false,
            swaps: 0,
        }
    }

    /// Number of times a root was set.
    pub fn swaps(&self) -> usize {
        self.swaps
    }

    /// Stylesheets applied with the last root.
    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    /// Check if the dark theme is on.
    pub fn is_dark(&self) -> bool {
        self.dark
    }
}

impl<R> Default for RootSlot<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> DisplaySurface<R> for RootSlot<R> {
    fn set_root(&mut self, root: R) {
        self.root = Some(root);
        self.swaps += 1;
    }

    fn root(&self) -> Option<&R> {
        self.root.as_ref()
    }

    fn apply_stylesheets(&mut self, stylesheets: &[String]) {
        self.stylesheets = stylesheets.to_vec();
    }

    fn apply_theme(&mut self, dark: bool) {
        self.dark = dark;
    }
}
