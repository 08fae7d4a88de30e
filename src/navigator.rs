//! The navigation state machine.
//!
//! [`Navigator`] owns the route registry, the [`RouterConfig`] and the
//! [`NavigationStack`], and drives the toolkit collaborators from
//! [`view`](crate::view). Every operation walks the same phases:
//!
//! ```text
//! Idle -> Resolving -> Guarding -> Loading -> Rendering -> Committing -> Idle
//!             ^            |
//!             +-- redirect-+
//! ```
//!
//! - **Resolving** looks the route up; unknown names fail with
//!   [`RouteNotFound`](NavigationError::RouteNotFound).
//! - **Guarding** runs the middleware pipeline. `Abort` ends the attempt
//!   with [`NavigationOutcome::Aborted`]; `Redirect` starts over at
//!   Resolving with the new target, at most
//!   [`max_redirects`](RouterConfig::max_redirects) times.
//! - **Loading** asks the [`ViewLoader`] for the view, resolves its
//!   controller and wraps it in the route's layout.
//! - **Rendering** swaps the display surface root and applies the route's
//!   transition.
//! - **Committing** updates the stack, publishes a [`RouteChangeEvent`] and
//!   fires the controller's lifecycle callbacks.
//!
//! Nothing is mutated before Rendering: a failed lookup or load leaves the
//! stack and the displayed root exactly as they were. Lifecycle callbacks
//! run after the commit and their errors are returned without rollback.
//!
//! # Example
//!
//! ```
//! use scene_navigator::*;
//! use std::sync::Arc;
//!
//! struct Home;
//! impl Routable for Home {}
//!
//! struct TemplateLoader;
//! impl ViewLoader<String> for TemplateLoader {
//!     fn load(&self, context: ControllerKey, template: &str) -> Result<LoadedView<String>, ViewLoadError> {
//!         Ok(LoadedView::new(format!("<{template}>"), context))
//!     }
//! }
//!
//! let mut components = ComponentStore::new();
//! components.register(Arc::new(Home));
//!
//! let mut navigator = Navigator::new(TemplateLoader, components, RootSlot::new());
//! navigator.register_route("home", "home.fxml", ControllerKey::of::<Home>(), None);
//!
//! let outcome = navigator.to("home", Args::none()).unwrap();
//! assert!(outcome.is_navigated());
//! assert_eq!(navigator.current_root().map(String::as_str), Some("<home.fxml>"));
//! assert_eq!(navigator.depth(), 1);
//! ```

use crate::args::Args;
use crate::config::RouterConfig;
use crate::error::{NavigationError, NavigationOutcome};
use crate::events::{EventBus, NavigationDirection, RouteChangeEvent};
use crate::executor::{Dispatcher, NavigationCommand, Pending};
use crate::lifecycle::Routable;
use crate::middleware::{AbortCallback, MiddlewareResult};
use crate::route::{ControllerKey, Route, RouteRegistry};
use crate::state::{EmptyStackNoOp, NavigationStack, NavigationState};
use crate::view::{ComponentRegistry, DisplaySurface, ViewLoader};
use crate::{debug_log, error_log, info_log, trace_log, warn_log};
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Phases and commit modes
// ============================================================================

/// Phase of the navigation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPhase {
    /// No navigation in flight.
    Idle,
    /// Looking the target route up.
    Resolving,
    /// Running middleware.
    Guarding,
    /// Waiting for the view loader.
    Loading,
    /// Swapping the displayed root and applying the transition.
    Rendering,
    /// Updating the stack and firing lifecycle callbacks.
    Committing,
}

/// How a successful navigation changes the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommitMode {
    Push,
    Replace,
    Reset,
    Pop,
}

impl CommitMode {
    fn direction(self) -> NavigationDirection {
        match self {
            CommitMode::Push => NavigationDirection::Forward,
            CommitMode::Replace => NavigationDirection::Replace,
            CommitMode::Reset => NavigationDirection::Reset,
            CommitMode::Pop => NavigationDirection::Pop,
        }
    }
}

/// Result of the Resolving/Guarding loop.
enum Verdict {
    Proceed { route: Arc<Route>, args: Args },
    Aborted {
        route: Arc<Route>,
        callback: Option<AbortCallback>,
    },
}

// ============================================================================
// Navigator
// ============================================================================

/// Orchestrates route resolution, middleware, view loading, rendering and
/// history for one window.
///
/// `R` is the toolkit's root-node handle; see [`view`](crate::view).
pub struct Navigator<R: 'static> {
    routes: RouteRegistry,
    config: RouterConfig<R>,
    stack: NavigationStack<R>,
    loader: Box<dyn ViewLoader<R>>,
    components: Box<dyn ComponentRegistry>,
    surface: Box<dyn DisplaySurface<R>>,
    events: Option<Arc<EventBus<RouteChangeEvent>>>,
    phase: NavigationPhase,
    queue_tx: Sender<Pending<R>>,
    queue_rx: Receiver<Pending<R>>,
}

impl<R: Clone + 'static> Navigator<R> {
    /// Create a navigator with an empty registry and default configuration.
    pub fn new(
        loader: impl ViewLoader<R> + 'static,
        components: impl ComponentRegistry + 'static,
        surface: impl DisplaySurface<R> + 'static,
    ) -> Self {
        let (queue_tx, queue_rx) = mpsc::channel();
        Self {
            routes: RouteRegistry::new(),
            config: RouterConfig::new(),
            stack: NavigationStack::new(),
            loader: Box::new(loader),
            components: Box::new(components),
            surface: Box::new(surface),
            events: None,
            phase: NavigationPhase::Idle,
            queue_tx,
            queue_rx,
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: RouterConfig<R>) -> Self {
        self.config = config;
        self
    }

    /// Publish a [`RouteChangeEvent`] on `bus` after every commit.
    pub fn with_event_bus(mut self, bus: Arc<EventBus<RouteChangeEvent>>) -> Self {
        self.events = Some(bus);
        self
    }

    // ========================================================================
    // Registration and configuration
    // ========================================================================

    /// Register a route from its parts, replacing any route with that name.
    pub fn register_route(
        &mut self,
        name: impl Into<String>,
        template: impl Into<String>,
        controller: ControllerKey,
        transition: Option<&str>,
    ) -> Arc<Route> {
        let mut route = Route::new(name, template, controller);
        if let Some(transition) = transition {
            route = route.with_transition(transition);
        }
        self.routes.register(route)
    }

    /// Register a fully configured route, replacing any route with that name.
    pub fn add_route(&mut self, route: Route) -> Arc<Route> {
        self.routes.register(route)
    }

    /// The route registry.
    pub fn routes(&self) -> &RouteRegistry {
        &self.routes
    }

    /// The configuration.
    pub fn config(&self) -> &RouterConfig<R> {
        &self.config
    }

    /// The configuration, for setup before the first navigation.
    pub fn config_mut(&mut self) -> &mut RouterConfig<R> {
        &mut self.config
    }

    // ========================================================================
    // Navigation operations
    // ========================================================================

    /// Navigate to `name`, pushing a new history entry.
    pub fn to(&mut self, name: &str, args: Args) -> Result<NavigationOutcome, NavigationError> {
        self.navigate(name, args, CommitMode::Push)
    }

    /// Navigate to `name`, replacing the current history entry so `back()`
    /// cannot return to it. Behaves as [`to`](Self::to) on an empty stack.
    pub fn off(&mut self, name: &str, args: Args) -> Result<NavigationOutcome, NavigationError> {
        let mode = if self.stack.is_empty() {
            CommitMode::Push
        } else {
            CommitMode::Replace
        };
        self.navigate(name, args, mode)
    }

    /// Navigate to `name` and drop the whole history.
    ///
    /// History is cleared at commit time, so a cancelled or failed attempt
    /// keeps it.
    pub fn off_all(&mut self, name: &str, args: Args) -> Result<NavigationOutcome, NavigationError> {
        self.navigate(name, args, CommitMode::Reset)
    }

    /// Return to the previous entry, re-displaying its cached root.
    ///
    /// No-op below depth 2. Fires `on_return(args of the previous entry)`
    /// on the departing controller, then `on_resume()` on the returning one.
    pub fn back(&mut self) -> Result<NavigationOutcome, NavigationError> {
        let departing = match self.stack.pop() {
            Ok(state) => state,
            Err(EmptyStackNoOp) => {
                debug_log!("back() ignored at depth {}", self.stack.len());
                return Ok(NavigationOutcome::Unchanged);
            }
        };
        let Some(top) = self.stack.peek() else {
            return Ok(NavigationOutcome::Unchanged);
        };
        let route = Arc::clone(top.route());
        let root = top.root().clone();
        let args = top.args().clone();
        let returning = top.controller();

        info_log!("back: '{}' -> '{}'", departing.route().name(), route.name());
        self.render(&route, root);
        self.enter(NavigationPhase::Committing);
        self.publish(
            Some(departing.route().name()),
            route.name(),
            NavigationDirection::Back,
        );

        let result = Self::fire_back(&departing, &route, &args, returning);
        self.finish(result, &route)
    }

    /// Return to the previous route by loading it again.
    ///
    /// No-op below depth 2. The previous route goes through the full
    /// pipeline with the arguments it was first shown with; on success the
    /// fresh state replaces both the current and the previous entry.
    pub fn pop(&mut self) -> Result<NavigationOutcome, NavigationError> {
        let Some(previous) = self.stack.peek_previous() else {
            debug_log!("pop() ignored at depth {}", self.stack.len());
            return Ok(NavigationOutcome::Unchanged);
        };
        let name = previous.route().name().to_string();
        let args = previous.args().clone();
        self.navigate(&name, args, CommitMode::Pop)
    }

    /// Reload the current route in place.
    ///
    /// `args` replaces the current arguments when given. Fires
    /// `on_return(none)` on the old controller, then `on_navigate(args)` and
    /// `pre_refresh()` on the new one before the swap, `post_refresh()`
    /// after it.
    pub fn refresh(&mut self, args: Option<Args>) -> Result<NavigationOutcome, NavigationError> {
        let Some(top) = self.stack.peek() else {
            debug_log!("refresh() ignored before the first navigation");
            return Ok(NavigationOutcome::Unchanged);
        };
        let route = Arc::clone(top.route());
        let args = args.unwrap_or_else(|| top.args().clone());
        let previous = top.controller();

        info_log!("refresh: '{}'", route.name());
        let (root, controller) = match self.load(&route) {
            Ok(view) => view,
            Err(err) => return self.fail(err),
        };

        let result = self.commit_refresh(&route, root, args, previous, &controller);
        self.finish(result, &route)
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    fn navigate(
        &mut self,
        name: &str,
        args: Args,
        mode: CommitMode,
    ) -> Result<NavigationOutcome, NavigationError> {
        info_log!("Navigation {:?} -> '{}' (depth {})", mode, name, self.stack.len());

        let (route, args) = match self.guard(name, args) {
            Ok(Verdict::Proceed { route, args }) => (route, args),
            Ok(Verdict::Aborted { route, callback }) => {
                self.enter(NavigationPhase::Idle);
                warn_log!("Navigation to '{}' aborted by middleware", route.name());
                if let Some(callback) = callback {
                    callback();
                }
                return Ok(NavigationOutcome::Aborted {
                    route: route.name().to_string(),
                });
            }
            Err(err) => return self.fail(err),
        };

        let (root, controller) = match self.load(&route) {
            Ok(view) => view,
            Err(err) => return self.fail(err),
        };

        self.render(&route, root.clone());

        self.enter(NavigationPhase::Committing);
        let from = self.stack.peek().map(|s| s.route().name().to_string());
        let state = NavigationState::new(Arc::clone(&route), root, args.clone(), &controller);
        match mode {
            CommitMode::Push => self.stack.push(state),
            CommitMode::Replace => {
                self.stack.replace_top(state);
            }
            CommitMode::Reset => {
                self.stack.clear();
                self.stack.push(state);
            }
            CommitMode::Pop => {
                self.stack.pop().ok();
                self.stack.replace_top(state);
            }
        }
        self.publish(from.as_deref(), route.name(), mode.direction());

        let result = controller
            .on_navigate(&args)
            .map_err(|err| NavigationError::lifecycle(route.name(), "on_navigate", err));
        self.finish(result, &route)
    }

    /// Resolve `name` and run the middleware, following redirects.
    fn guard(&mut self, name: &str, args: Args) -> Result<Verdict, NavigationError> {
        let mut target = name.to_string();
        let mut args = args;
        let mut chain = vec![target.clone()];

        loop {
            self.enter(NavigationPhase::Resolving);
            let next = self.routes.resolve(&target)?;

            self.enter(NavigationPhase::Guarding);
            let current = self.stack.peek().map(|s| Arc::clone(s.route()));
            match self
                .config
                .middleware()
                .evaluate(current.as_deref(), &next, &args)
            {
                MiddlewareResult::Proceed => return Ok(Verdict::Proceed { route: next, args }),
                MiddlewareResult::Abort => {
                    return Ok(Verdict::Aborted {
                        route: next,
                        callback: None,
                    })
                }
                MiddlewareResult::AbortWithCallback(callback) => {
                    return Ok(Verdict::Aborted {
                        route: next,
                        callback: Some(callback),
                    })
                }
                MiddlewareResult::Redirect { to, args: redirected } => {
                    debug_log!("Middleware redirected '{}' -> '{}'", next.name(), to);
                    chain.push(to.clone());
                    let limit = self.config.max_redirects();
                    if chain.len() - 1 > limit {
                        return Err(NavigationError::RedirectLimit { chain, limit });
                    }
                    target = to;
                    args = redirected;
                }
            }
        }
    }

    /// Load the route's view, resolve its controller and apply its layout.
    fn load(&mut self, route: &Route) -> Result<(R, Arc<dyn Routable>), NavigationError> {
        self.enter(NavigationPhase::Loading);
        debug_log!("Loading '{}' for route '{}'", route.template(), route.name());

        let view = self
            .loader
            .load(route.controller(), route.template())
            .map_err(|source| NavigationError::ViewLoad {
                route: route.name().to_string(),
                source,
            })?;
        let controller = self.components.resolve(view.controller).ok_or_else(|| {
            NavigationError::ControllerNotRegistered {
                route: route.name().to_string(),
                controller: view.controller.name().to_string(),
            }
        })?;

        let root = self.apply_layout(route, view.root)?;
        Ok((root, controller))
    }

    fn apply_layout(&self, route: &Route, content: R) -> Result<R, NavigationError> {
        let Some(name) = route.layout() else {
            return Ok(content);
        };
        match self.config.layout(name) {
            Some(layout) if layout.is_enabled() => {
                debug_log!("Wrapping '{}' in layout '{}'", route.name(), name);
                self.loader
                    .load_layout(layout, content)
                    .map_err(|source| NavigationError::ViewLoad {
                        route: route.name().to_string(),
                        source,
                    })
            }
            Some(_) => {
                debug_log!("Layout '{}' is disabled, rendering bare view", name);
                Ok(content)
            }
            None => {
                warn_log!("Layout '{}' is not registered, rendering bare view", name);
                Ok(content)
            }
        }
    }

    /// Swap the displayed root and apply the route's transition.
    fn render(&mut self, route: &Route, root: R) {
        self.enter(NavigationPhase::Rendering);
        self.surface.set_root(root.clone());
        self.surface.apply_stylesheets(self.config.stylesheets());
        if let Some(dark) = self.config.dark_mode() {
            self.surface.apply_theme(dark);
        }
        self.config
            .transitions()
            .resolve(route.transition())
            .apply(&root);
    }

    fn commit_refresh(
        &mut self,
        route: &Arc<Route>,
        root: R,
        args: Args,
        previous: Option<Arc<dyn Routable>>,
        controller: &Arc<dyn Routable>,
    ) -> Result<(), NavigationError> {
        self.enter(NavigationPhase::Committing);
        if let Some(previous) = previous {
            previous
                .on_return(&Args::none())
                .map_err(|err| NavigationError::lifecycle(route.name(), "on_return", err))?;
        }
        controller
            .on_navigate(&args)
            .map_err(|err| NavigationError::lifecycle(route.name(), "on_navigate", err))?;
        controller
            .pre_refresh()
            .map_err(|err| NavigationError::lifecycle(route.name(), "pre_refresh", err))?;

        self.render(route, root.clone());
        self.enter(NavigationPhase::Committing);
        self.stack.replace_top(NavigationState::new(
            Arc::clone(route),
            root,
            args,
            controller,
        ));
        self.publish(
            Some(route.name()),
            route.name(),
            NavigationDirection::Refresh,
        );

        controller
            .post_refresh()
            .map_err(|err| NavigationError::lifecycle(route.name(), "post_refresh", err))
    }

    fn fire_back(
        departing: &NavigationState<R>,
        route: &Route,
        args: &Args,
        returning: Option<Arc<dyn Routable>>,
    ) -> Result<(), NavigationError> {
        match departing.controller() {
            Some(controller) => controller.on_return(args).map_err(|err| {
                NavigationError::lifecycle(departing.route().name(), "on_return", err)
            })?,
            None => {
                warn_log!(
                    "Controller of '{}' is gone, on_return skipped",
                    departing.route().name()
                );
            }
        }
        match returning {
            Some(controller) => controller
                .on_resume()
                .map_err(|err| NavigationError::lifecycle(route.name(), "on_resume", err)),
            None => {
                warn_log!("Controller of '{}' is gone, on_resume skipped", route.name());
                Ok(())
            }
        }
    }

    fn publish(&self, from: Option<&str>, to: &str, direction: NavigationDirection) {
        if let Some(bus) = &self.events {
            bus.publish(&RouteChangeEvent {
                from: from.map(str::to_string),
                to: to.to_string(),
                direction,
                depth: self.stack.len(),
            });
        }
    }

    fn enter(&mut self, phase: NavigationPhase) {
        trace_log!("Phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn fail(&mut self, err: NavigationError) -> Result<NavigationOutcome, NavigationError> {
        self.enter(NavigationPhase::Idle);
        error_log!("Navigation failed: {}", err);
        Err(err)
    }

    fn finish(
        &mut self,
        result: Result<(), NavigationError>,
        route: &Route,
    ) -> Result<NavigationOutcome, NavigationError> {
        self.enter(NavigationPhase::Idle);
        match result {
            Ok(()) => {
                info_log!(
                    "Navigated to '{}' (depth {})",
                    route.name(),
                    self.stack.len()
                );
                Ok(NavigationOutcome::Navigated {
                    route: route.name().to_string(),
                })
            }
            Err(err) => {
                error_log!("Committed '{}' but {}", route.name(), err);
                Err(err)
            }
        }
    }

    // ========================================================================
    // Deferred work
    // ========================================================================

    /// Handle for queueing navigation from callbacks and other threads.
    pub fn dispatcher(&self) -> Dispatcher<R> {
        Dispatcher::new(self.queue_tx.clone())
    }

    /// Run everything queued through a [`Dispatcher`], including work queued
    /// while draining.
    ///
    /// Returns the results of queued navigation commands in queue order;
    /// queued closures contribute no result.
    pub fn process_pending(&mut self) -> Vec<Result<NavigationOutcome, NavigationError>> {
        let mut results = Vec::new();
        while let Ok(pending) = self.queue_rx.try_recv() {
            if let Some(result) = self.execute(pending) {
                results.push(result);
            }
        }
        results
    }

    /// Block until something is queued (or `timeout` passes), then drain the
    /// queue like [`process_pending`](Self::process_pending).
    pub fn wait_pending(
        &mut self,
        timeout: Duration,
    ) -> Vec<Result<NavigationOutcome, NavigationError>> {
        let Ok(first) = self.queue_rx.recv_timeout(timeout) else {
            return Vec::new();
        };
        let mut results: Vec<_> = self.execute(first).into_iter().collect();
        results.extend(self.process_pending());
        results
    }

    fn execute(
        &mut self,
        pending: Pending<R>,
    ) -> Option<Result<NavigationOutcome, NavigationError>> {
        let command = match pending {
            Pending::Task(task) => {
                trace_log!("Running queued task");
                task(self);
                return None;
            }
            Pending::Command(command) => command,
        };

        debug_log!("Running queued {:?}", command);
        let result = match command {
            NavigationCommand::To { route, args } => self.to(&route, args),
            NavigationCommand::Off { route, args } => self.off(&route, args),
            NavigationCommand::OffAll { route, args } => self.off_all(&route, args),
            NavigationCommand::Back => self.back(),
            NavigationCommand::Pop => self.pop(),
            NavigationCommand::Refresh { args } => self.refresh(args),
        };
        Some(result)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current phase; always `Idle` between operations.
    pub fn phase(&self) -> NavigationPhase {
        self.phase
    }

    /// Number of history entries.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// State currently displayed.
    pub fn current(&self) -> Option<&NavigationState<R>> {
        self.stack.peek()
    }

    /// Name of the route currently displayed.
    pub fn current_route(&self) -> Option<&str> {
        self.stack.peek().map(|s| s.route().name())
    }

    /// Check if `back()` would do anything.
    pub fn can_go_back(&self) -> bool {
        self.stack.len() >= 2
    }

    /// Route names from the oldest entry to the displayed one.
    pub fn history(&self) -> Vec<&str> {
        self.stack.iter().map(|s| s.route().name()).collect()
    }

    /// The history stack.
    pub fn stack(&self) -> &NavigationStack<R> {
        &self.stack
    }

    /// The display surface.
    pub fn surface(&self) -> &dyn DisplaySurface<R> {
        self.surface.as_ref()
    }

    /// Root shown by the display surface.
    pub fn current_root(&self) -> Option<&R> {
        self.surface.root()
    }
}

impl<R: 'static> fmt::Debug for Navigator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("phase", &self.phase)
            .field("history", &self.stack)
            .field("routes", &self.routes.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
