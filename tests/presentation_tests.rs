//! Integration tests for transitions, layouts, stylesheets and route change events

mod common;

use common::*;
use scene_navigator::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn record_effect(log: &CallLog, label: &'static str) -> impl Fn(&View) + Send + Sync + 'static {
    let log = log.clone();
    move |root: &View| log.lock().unwrap().push(format!("{label}:{root}"))
}

#[test]
fn test_named_transition_applies_to_new_root() {
    let mut h = harness();
    let effects = CallLog::default();
    h.navigator
        .config_mut()
        .add_transition("fade", record_effect(&effects, "fade"))
        .unwrap()
        .set_default_transition(record_effect(&effects, "default"));

    h.navigator.to("home", Args::none()).unwrap();
    h.navigator.to("settings", Args::none()).unwrap();
    h.navigator.back().unwrap();

    assert_eq!(
        *effects.lock().unwrap(),
        [
            format!("default:{}", template("home")),
            format!("fade:{}", template("settings")),
            format!("default:{}", template("home")),
        ]
    );
}

#[test]
fn test_unknown_transition_falls_back_to_default() {
    let mut h = harness();
    let effects = CallLog::default();
    h.navigator
        .config_mut()
        .set_default_transition(record_effect(&effects, "default"));

    // "settings" names "fade", which is not registered here.
    h.navigator.to("settings", Args::none()).unwrap();

    assert_eq!(
        *effects.lock().unwrap(),
        [format!("default:{}", template("settings"))]
    );
}

#[test]
fn test_transition_without_configuration_is_silent() {
    let mut h = harness();
    assert!(h.navigator.to("settings", Args::none()).unwrap().is_navigated());
    assert!(!h.navigator.config().transitions().contains("fade"));
}

#[test]
fn test_duplicate_transition_is_rejected() {
    let mut h = harness();
    let config = h.navigator.config_mut();
    config.add_transition("fade", |_: &View| {}).unwrap();

    let err = config.add_transition("fade", |_: &View| {}).unwrap_err();
    assert_eq!(err, ConfigError::DuplicateKey { key: "fade".into() });
}

#[test]
fn test_transition_descriptor_drives_effect() {
    let mut h = harness();
    let driven = Arc::new(Mutex::new(Vec::new()));
    let sink = driven.clone();
    let effect = Transition::slide(SlideDirection::Left, 200).animate(move |root: &View, t: &Transition| {
        sink.lock().unwrap().push((root.to_string(), *t));
    });
    h.navigator.config_mut().add_transition("fade", effect).unwrap();

    h.navigator.to("settings", Args::none()).unwrap();

    let driven = driven.lock().unwrap();
    assert_eq!(driven.len(), 1);
    assert_eq!(driven[0].0, template("settings"));
    assert_eq!(driven[0].1, Transition::slide(SlideDirection::Left, 200));
    assert_eq!(driven[0].1.duration().as_millis(), 200);
}

#[test]
fn test_enabled_layout_wraps_view() {
    let mut h = harness();
    h.navigator
        .config_mut()
        .add_layout("main", LayoutConfig::new("/layouts/main.fxml"))
        .unwrap();

    h.navigator.to("dashboard", Args::none()).unwrap();

    assert_eq!(
        h.displayed(),
        Some(format!("/layouts/main.fxml[contentContainer#{}]", template("dashboard")))
    );
}

#[test]
fn test_layout_content_container_is_configurable() {
    let mut h = harness();
    h.navigator
        .config_mut()
        .add_layout(
            "main",
            LayoutConfig::new("/layouts/main.fxml").with_content_container("body"),
        )
        .unwrap();

    h.navigator.to("dashboard", Args::none()).unwrap();

    assert_eq!(
        h.displayed(),
        Some(format!("/layouts/main.fxml[body#{}]", template("dashboard")))
    );
}

#[test]
fn test_disabled_or_missing_layout_renders_bare_view() {
    let mut h = harness();
    h.navigator.to("dashboard", Args::none()).unwrap();
    assert_eq!(h.displayed(), Some(template("dashboard")));

    h.navigator
        .config_mut()
        .add_layout("main", LayoutConfig::new("/layouts/main.fxml").enabled(false))
        .unwrap();
    h.navigator.refresh(None).unwrap();
    assert_eq!(h.displayed(), Some(template("dashboard")));
}

#[test]
fn test_back_keeps_layout_wrapped_root() {
    let mut h = harness();
    h.navigator
        .config_mut()
        .add_layout("main", LayoutConfig::new("/layouts/main.fxml"))
        .unwrap();

    h.navigator.to("dashboard", Args::none()).unwrap();
    let wrapped = h.displayed();
    h.navigator.to("a", Args::none()).unwrap();
    h.navigator.back().unwrap();

    assert_eq!(h.displayed(), wrapped);
}

#[test]
fn test_stylesheets_follow_every_swap() {
    let mut h = harness();
    h.navigator
        .config_mut()
        .add_stylesheet("/css/app.css")
        .add_stylesheet("/css/dark.css");

    h.navigator.to("a", Args::none()).unwrap();
    h.navigator.to("b", Args::none()).unwrap();
    h.navigator.back().unwrap();
    h.navigator.refresh(None).unwrap();

    let calls = h.surface.stylesheet_calls();
    assert_eq!(calls.len(), 4);
    assert!(calls.iter().all(|sheets| sheets == &["/css/app.css", "/css/dark.css"]));
    assert!(h.surface.theme_calls().is_empty());
}

#[test]
fn test_dark_mode_flag_is_read_on_every_swap() {
    let mut h = harness();
    let settings: Arc<Mutex<HashMap<String, bool>>> = Arc::default();
    let store = settings.clone();
    h.navigator
        .config_mut()
        .set_theme_source(move |key| store.lock().unwrap().get(key).copied());

    h.navigator.to("a", Args::none()).unwrap();
    settings.lock().unwrap().insert(DEFAULT_DARK_MODE_KEY.to_string(), true);
    h.navigator.to("b", Args::none()).unwrap();
    settings.lock().unwrap().insert(DEFAULT_DARK_MODE_KEY.to_string(), false);
    h.navigator.back().unwrap();
    settings.lock().unwrap().insert(DEFAULT_DARK_MODE_KEY.to_string(), true);
    h.navigator.refresh(None).unwrap();

    assert_eq!(h.surface.theme_calls(), [true, false, true]);
}

#[test]
fn test_dark_mode_uses_configured_key() {
    let mut h = harness();
    h.navigator
        .config_mut()
        .set_dark_mode_key("theme.dark")
        .set_theme_source(|key| match key {
            "theme.dark" => Some(true),
            _ => Some(false),
        });

    h.navigator.to("home", Args::none()).unwrap();

    assert_eq!(h.surface.theme_calls(), [true]);
}

#[test]
fn test_route_change_events() {
    init_logging();
    let bus = Arc::new(EventBus::<RouteChangeEvent>::new());
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    bus.subscribe(move |event: &RouteChangeEvent| sink.lock().unwrap().push(event.clone()));

    let Harness { navigator, .. } = harness();
    let mut navigator = navigator.with_event_bus(bus.clone());
    navigator
        .config_mut()
        .add_route_middleware(middleware_fn(|_, next, _| {
            if next.name() == "settings" {
                MiddlewareResult::Abort
            } else {
                MiddlewareResult::Proceed
            }
        }));

    navigator.to("a", Args::none()).unwrap();
    navigator.to("b", Args::none()).unwrap();
    navigator.to("settings", Args::none()).unwrap();
    navigator.back().unwrap();
    navigator.off("c", Args::none()).unwrap();
    navigator.refresh(None).unwrap();
    navigator.off_all("home", Args::none()).unwrap();

    let summary: Vec<_> = events
        .lock()
        .unwrap()
        .iter()
        .map(|e| (e.from.clone(), e.to.clone(), e.direction, e.depth))
        .collect();
    let some = |s: &str| Some(s.to_string());
    assert_eq!(
        summary,
        [
            (None, "a".to_string(), NavigationDirection::Forward, 1),
            (some("a"), "b".to_string(), NavigationDirection::Forward, 2),
            (some("b"), "a".to_string(), NavigationDirection::Back, 1),
            (some("a"), "c".to_string(), NavigationDirection::Replace, 1),
            (some("c"), "c".to_string(), NavigationDirection::Refresh, 1),
            (some("c"), "home".to_string(), NavigationDirection::Reset, 1),
        ]
    );
}
