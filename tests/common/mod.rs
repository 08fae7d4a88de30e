//! Test utilities for navigation tests
//!
//! Provides a recording loader, surface and controllers plus a navigator
//! pre-wired with a handful of routes.

#![allow(dead_code)]

use scene_navigator::*;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Root handle used by the tests; `Arc` so identity can be checked.
pub type View = Arc<String>;

/// Shared record of lifecycle callbacks and other observable steps.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Controllers
// ============================================================================

pub struct HomeView;
pub struct SettingsView;
pub struct AView;
pub struct BView;
pub struct CView;
pub struct DashboardView;
pub struct OrphanView;

/// Controller that writes every callback into a [`CallLog`].
pub struct RecordingController {
    name: &'static str,
    log: CallLog,
    failing: Mutex<HashSet<&'static str>>,
}

impl RecordingController {
    pub fn new(name: &'static str, log: CallLog) -> Self {
        Self {
            name,
            log,
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Make `callback` return an error from now on.
    pub fn fail_on(&self, callback: &'static str) {
        self.failing.lock().unwrap().insert(callback);
    }

    fn record(&self, callback: &'static str, detail: String) -> CallbackResult {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}.{}({})", self.name, callback, detail));
        if self.failing.lock().unwrap().contains(callback) {
            return Err(format!("{}.{} failed", self.name, callback).into());
        }
        Ok(())
    }
}

/// Render args the way the call log shows them.
pub fn describe(args: &Args) -> String {
    args.get::<&'static str>()
        .map(|s| s.to_string())
        .or_else(|| args.get::<i32>().map(|n| n.to_string()))
        .unwrap_or_else(|| "none".to_string())
}

impl Routable for RecordingController {
    fn on_navigate(&self, args: &Args) -> CallbackResult {
        self.record("on_navigate", describe(args))
    }

    fn on_return(&self, args: &Args) -> CallbackResult {
        self.record("on_return", describe(args))
    }

    fn on_resume(&self) -> CallbackResult {
        self.record("on_resume", String::new())
    }

    fn pre_refresh(&self) -> CallbackResult {
        self.record("pre_refresh", String::new())
    }

    fn post_refresh(&self) -> CallbackResult {
        self.record("post_refresh", String::new())
    }
}

// ============================================================================
// Loader
// ============================================================================

/// Loader that turns a template into `Arc<String>` and can be told to fail.
#[derive(Clone, Default)]
pub struct FakeLoader {
    failing: Arc<Mutex<HashSet<String>>>,
    loads: Arc<AtomicUsize>,
}

impl FakeLoader {
    pub fn fail(&self, template: &str) {
        self.failing.lock().unwrap().insert(template.to_string());
    }

    pub fn heal(&self, template: &str) {
        self.failing.lock().unwrap().remove(template);
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ViewLoader<View> for FakeLoader {
    fn load(&self, context: ControllerKey, template: &str) -> Result<LoadedView<View>, ViewLoadError> {
        if self.failing.lock().unwrap().contains(template) {
            return Err(ViewLoadError::new(template, "template not found"));
        }
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(LoadedView::new(Arc::new(template.to_string()), context))
    }

    fn load_layout(&self, layout: &LayoutConfig, content: View) -> Result<View, ViewLoadError> {
        Ok(Arc::new(format!(
            "{}[{}#{}]",
            layout.template(),
            layout.content_container_id(),
            content
        )))
    }
}

// ============================================================================
// Surface
// ============================================================================

/// What the surface was asked to do, readable after the surface moved into
/// the navigator.
#[derive(Clone, Default)]
pub struct SurfaceProbe {
    swaps: Arc<AtomicUsize>,
    stylesheets: Arc<Mutex<Vec<Vec<String>>>>,
    themes: Arc<Mutex<Vec<bool>>>,
}

impl SurfaceProbe {
    pub fn swaps(&self) -> usize {
        self.swaps.load(Ordering::SeqCst)
    }

    /// Stylesheets passed along with each root swap.
    pub fn stylesheet_calls(&self) -> Vec<Vec<String>> {
        self.stylesheets.lock().unwrap().clone()
    }

    /// Dark-mode values passed along with each root swap.
    pub fn theme_calls(&self) -> Vec<bool> {
        self.themes.lock().unwrap().clone()
    }
}

pub struct TestSurface {
    root: Option<View>,
    probe: SurfaceProbe,
}

impl DisplaySurface<View> for TestSurface {
    fn set_root(&mut self, root: View) {
        self.root = Some(root);
        self.probe.swaps.fetch_add(1, Ordering::SeqCst);
    }

    fn root(&self) -> Option<&View> {
        self.root.as_ref()
    }

    fn apply_stylesheets(&mut self, stylesheets: &[String]) {
        self.probe.stylesheets.lock().unwrap().push(stylesheets.to_vec());
    }

    fn apply_theme(&mut self, dark: bool) {
        self.probe.themes.lock().unwrap().push(dark);
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub navigator: Navigator<View>,
    pub log: CallLog,
    pub loader: FakeLoader,
    pub surface: SurfaceProbe,
    pub controllers: HashMap<&'static str, Arc<RecordingController>>,
}

impl Harness {
    /// Callbacks recorded so far.
    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.log.lock().unwrap().clear();
    }

    pub fn controller(&self, name: &str) -> &Arc<RecordingController> {
        &self.controllers[name]
    }

    /// Template of the displayed root.
    pub fn displayed(&self) -> Option<String> {
        self.navigator.current_root().map(|root| root.to_string())
    }
}

/// Template locator of a test route.
pub fn template(name: &str) -> String {
    format!("/views/{name}.fxml")
}

/// Navigator with routes `home`, `settings`, `a`, `b`, `c` and `dashboard`,
/// each bound to its own recording controller. `settings` uses the `fade`
/// transition and `dashboard` the `main` layout; neither is configured.
pub fn harness() -> Harness {
    init_logging();

    let log: CallLog = Arc::default();
    let loader = FakeLoader::default();
    let probe = SurfaceProbe::default();

    let bindings = [
        ("home", ControllerKey::of::<HomeView>()),
        ("settings", ControllerKey::of::<SettingsView>()),
        ("a", ControllerKey::of::<AView>()),
        ("b", ControllerKey::of::<BView>()),
        ("c", ControllerKey::of::<CView>()),
        ("dashboard", ControllerKey::of::<DashboardView>()),
    ];

    let mut components = ComponentStore::new();
    let mut controllers = HashMap::new();
    for (name, key) in bindings {
        let controller = Arc::new(RecordingController::new(name, log.clone()));
        components.register_as(key, controller.clone());
        controllers.insert(name, controller);
    }

    let surface = TestSurface {
        root: None,
        probe: probe.clone(),
    };
    let mut navigator = Navigator::new(loader.clone(), components, surface);
    for (name, key) in bindings {
        let transition = (name == "settings").then_some("fade");
        navigator.register_route(name, template(name), key, transition);
    }
    navigator.add_route(
        Route::new("dashboard", template("dashboard"), ControllerKey::of::<DashboardView>())
            .with_layout("main"),
    );
    navigator.register_route("orphan", template("orphan"), ControllerKey::of::<OrphanView>(), None);

    Harness {
        navigator,
        log,
        loader,
        surface: probe,
        controllers,
    }
}
