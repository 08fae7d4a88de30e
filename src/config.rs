//! Router configuration.
//!
//! [`RouterConfig`] is owned by the [`Navigator`](crate::Navigator) and
//! edited through [`Navigator::config_mut`](crate::Navigator::config_mut)
//! while the application is being set up. It is read on every navigation.
//!
//! | Setting | Default |
//! |---------|---------|
//! | middleware | none |
//! | transitions | none, default effect is a no-op |
//! | layouts | none |
//! | stylesheets | none |
//! | dark-mode key | `"isDarkMode"` |
//! | theme source | none, the surface's theme is left alone |
//! | max redirects | 5 |
//!
//! # Example
//!
//! ```
//! use scene_navigator::{middleware_fn, LayoutConfig, MiddlewareResult, RouterConfig};
//!
//! let mut config = RouterConfig::<String>::new();
//! config.add_route_middleware(middleware_fn(|_, _, _| MiddlewareResult::Proceed));
//! config.add_transition("fade", |_root: &String| {}).unwrap();
//! config.add_layout("main", LayoutConfig::new("/layouts/main.fxml")).unwrap();
//! config.add_stylesheet("/css/app.css");
//!
//! assert!(config.add_transition("fade", |_root: &String| {}).is_err());
//! assert_eq!(config.layout("main").unwrap().content_container_id(), "contentContainer");
//! ```

use crate::args::Args;
use crate::error::ConfigError;
use crate::middleware::{legacy_fn, MiddlewarePipeline, RouteMiddleware};
use crate::route::Route;
use crate::transition::{TransitionEffect, TransitionRegistry};
use crate::debug_log;
use std::collections::HashMap;
use std::sync::Arc;

/// Default upper bound on consecutive middleware redirects.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Default key of the application's dark-mode flag.
pub const DEFAULT_DARK_MODE_KEY: &str = "isDarkMode";

/// Default id of the node inside a layout that receives the route's view.
pub const DEFAULT_CONTENT_CONTAINER: &str = "contentContainer";

// ============================================================================
// LayoutConfig
// ============================================================================

/// Shared chrome a route's view is embedded into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    template: String,
    content_container_id: String,
    enabled: bool,
}

impl LayoutConfig {
    /// Layout loaded from `template`, content placed in `contentContainer`.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            content_container_id: DEFAULT_CONTENT_CONTAINER.to_string(),
            enabled: true,
        }
    }

    /// Place the route's view in the node with this id instead.
    pub fn with_content_container(mut self, id: impl Into<String>) -> Self {
        self.content_container_id = id.into();
        self
    }

    /// Enable or disable the layout without unregistering it.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Template locator of the layout.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Id of the node receiving the route's view.
    pub fn content_container_id(&self) -> &str {
        &self.content_container_id
    }

    /// Check if the layout is applied.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

// ============================================================================
// RouterConfig
// ============================================================================

/// Looks up an application flag by key; `None` when the flag is unset.
pub type ThemeSource = Arc<dyn Fn(&str) -> Option<bool> + Send + Sync>;

/// Navigator-scoped configuration.
pub struct RouterConfig<R: 'static> {
    middleware: MiddlewarePipeline,
    transitions: TransitionRegistry<R>,
    layouts: HashMap<String, LayoutConfig>,
    stylesheets: Vec<String>,
    dark_mode_key: String,
    theme_source: Option<ThemeSource>,
    max_redirects: usize,
}

impl<R: 'static> RouterConfig<R> {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self {
            middleware: MiddlewarePipeline::new(),
            transitions: TransitionRegistry::new(),
            layouts: HashMap::new(),
            stylesheets: Vec::new(),
            dark_mode_key: DEFAULT_DARK_MODE_KEY.to_string(),
            theme_source: None,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    // ========================================================================
    // Middleware
    // ========================================================================

    /// Append middleware to the pipeline.
    pub fn add_route_middleware(&mut self, middleware: impl RouteMiddleware) -> &mut Self {
        debug_log!("Added middleware '{}'", middleware.name());
        self.middleware.push(middleware);
        self
    }

    /// Append a boolean guard: `true` proceeds, `false` aborts silently.
    ///
    /// Boolean guards take their place in registration order next to the
    /// middleware added with [`add_route_middleware`](Self::add_route_middleware).
    pub fn add_middleware<F>(&mut self, guard: F) -> &mut Self
    where
        F: Fn(Option<&Route>, &Route, &Args) -> bool + Send + Sync + 'static,
    {
        self.add_route_middleware(legacy_fn(guard))
    }

    /// The middleware pipeline.
    pub fn middleware(&self) -> &MiddlewarePipeline {
        &self.middleware
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Register a named transition effect.
    pub fn add_transition(
        &mut self,
        name: impl Into<String>,
        effect: impl TransitionEffect<R> + 'static,
    ) -> Result<&mut Self, ConfigError> {
        self.transitions.add(name, effect)?;
        Ok(self)
    }

    /// Replace the effect used when a route names no (or an unknown)
    /// transition.
    pub fn set_default_transition(&mut self, effect: impl TransitionEffect<R> + 'static) -> &mut Self {
        self.transitions.set_default(effect);
        self
    }

    /// The transition registry.
    pub fn transitions(&self) -> &TransitionRegistry<R> {
        &self.transitions
    }

    // ========================================================================
    // Layouts
    // ========================================================================

    /// Register a named layout. Names can only be registered once.
    pub fn add_layout(
        &mut self,
        name: impl Into<String>,
        layout: LayoutConfig,
    ) -> Result<&mut Self, ConfigError> {
        let name = name.into();
        if self.layouts.contains_key(&name) {
            return Err(ConfigError::DuplicateKey { key: name });
        }
        debug_log!("Registered layout '{}' -> '{}'", name, layout.template());
        self.layouts.insert(name, layout);
        Ok(self)
    }

    /// Layout registered under `name`.
    pub fn layout(&self, name: &str) -> Option<&LayoutConfig> {
        self.layouts.get(name)
    }

    // ========================================================================
    // Styling
    // ========================================================================

    /// Add a stylesheet locator; it is handed to the display surface on
    /// every root swap.
    pub fn add_stylesheet(&mut self, path: impl Into<String>) -> &mut Self {
        self.stylesheets.push(path.into());
        self
    }

    /// Stylesheet locators in registration order.
    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    /// Key under which the application stores its dark-mode flag.
    pub fn dark_mode_key(&self) -> &str {
        &self.dark_mode_key
    }

    /// Change the dark-mode flag key.
    pub fn set_dark_mode_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.dark_mode_key = key.into();
        self
    }

    /// Read the dark-mode flag through `source` on every root swap.
    ///
    /// `source` receives [`dark_mode_key`](Self::dark_mode_key); its answer
    /// is handed to
    /// [`DisplaySurface::apply_theme`](crate::DisplaySurface::apply_theme).
    pub fn set_theme_source<F>(&mut self, source: F) -> &mut Self
    where
        F: Fn(&str) -> Option<bool> + Send + Sync + 'static,
    {
        self.theme_source = Some(Arc::new(source));
        self
    }

    /// Current value of the dark-mode flag, `None` without a theme source or
    /// when the flag is unset.
    pub fn dark_mode(&self) -> Option<bool> {
        let source = self.theme_source.as_ref()?;
        source(self.dark_mode_key.as_str())
    }

    // ========================================================================
    // Redirects
    // ========================================================================

    /// Maximum number of consecutive redirects a single navigation may take.
    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    /// Change the redirect limit.
    pub fn set_max_redirects(&mut self, limit: usize) -> &mut Self {
        self.max_redirects = limit;
        self
    }
}

impl<R: 'static> Default for RouterConfig<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: 'static> std::fmt::Debug for RouterConfig<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterConfig")
            .field("middleware", &self.middleware)
            .field("transitions", &self.transitions)
            .field("layouts", &self.layouts)
            .field("stylesheets", &self.stylesheets)
            .field("dark_mode_key", &self.dark_mode_key)
            .field("theme_source", &self.theme_source.is_some())
            .field("max_redirects", &self.max_redirects)
            .finish()
    }
}
