//! Router scenario and property tests
//!
//! Headless: the state machine is driven through the public API and checked
//! through the read-only queries, with a presenter attached where the
//! repaint contract matters.

use serde_json::{json, Value};
use tabstack::test_fixtures::*;
use tabstack::{
    CurrentScreen, MemorySurface, NavAction, NavError, NavEventKind, NavObserver, NavView,
    Presenter, Region, Repaint, Router, ScreenId, ScreenTable, SpecialKind, StackEntry,
};

fn example_router() -> Router {
    Router::configure(example_registry(), Some(TAB_HOME)).unwrap()
}

fn narrativ_router() -> Router {
    Router::configure(narrativ_registry(), Some("home")).unwrap()
}

fn entry(id: &str) -> StackEntry {
    StackEntry::bare(ScreenId::new(id).unwrap())
}

// ============================================================================
// Pop semantics
// ============================================================================

#[test]
fn test_pop_on_empty_stack_is_idempotent() {
    let mut router = example_router();
    for tab in [TAB_HOME, TAB_LIST, TAB_SETTINGS] {
        router.switch_tab(tab);
        for _ in 0..3 {
            assert!(router.pop().is_applied());
        }
        assert_eq!(router.active_tab(), tab);
        assert!(router.stack(tab).is_empty());
    }
}

#[test]
fn test_push_pop_round_trip() {
    let mut router = example_router();
    router.push(entry("seed"));
    let before = router.stack(TAB_HOME).to_vec();

    for n in 0..5 {
        router.push(entry(&format!("screen-{n}")));
        assert_eq!(router.active_tab(), TAB_HOME);
    }
    for _ in 0..5 {
        router.pop();
        assert_eq!(router.active_tab(), TAB_HOME);
    }

    assert_eq!(router.stack(TAB_HOME), before.as_slice());
}

#[test]
fn test_pop_to_root_clears_only_active_tab() {
    let mut router = example_router();
    router.push(entry("a"));
    router.switch_tab(TAB_LIST);
    router.push(entry("b"));
    router.push(entry("c"));

    router.pop_to_root();

    assert!(router.stack(TAB_LIST).is_empty());
    assert_eq!(router.stack(TAB_HOME).len(), 1);
}

// ============================================================================
// Tab isolation
// ============================================================================

#[test]
fn test_tab_isolation() {
    let mut router = example_router();
    router.switch_tab(TAB_LIST);
    router.push(entry("b"));

    router.switch_tab(TAB_HOME);
    for id in ["x", "y", "z"] {
        router.push(entry(id));
    }

    assert_eq!(router.stack(TAB_LIST).len(), 1);
    assert_eq!(router.stack(TAB_LIST)[0].screen_id, "b");
    assert!(router.stack(TAB_SETTINGS).is_empty());
}

#[test]
fn test_switching_back_resumes_depth() {
    let mut router = example_router();
    router.push(entry("a"));
    router.push(entry("b"));
    router.switch_tab(TAB_SETTINGS);
    router.switch_tab(TAB_HOME);

    assert_eq!(
        router.current_screen(),
        CurrentScreen::Detail {
            tab: TAB_HOME.into(),
            depth: 2,
            screen_id: "b".into()
        }
    );
}

// ============================================================================
// Special screens
// ============================================================================

#[test]
fn test_special_screen_hides_tab_and_detail() {
    let mut router = example_router();
    router.push(entry("a"));

    for id in [ONBOARDING_FIRST, "welcome-2", UTILITY_LOADING] {
        router.navigate_to(id, Value::Null);
        let current = router.current_screen();
        assert!(current.is_special(), "{id}: {current:?}");
        assert!(!matches!(
            current,
            CurrentScreen::Tab { .. } | CurrentScreen::Detail { .. }
        ));
        assert!(!router.view().state().tab_bar_visible());
    }
}

#[test]
fn test_exit_special_screen_resumes_prior_depth() {
    let mut router = narrativ_router();
    router.switch_tab("documents");
    router.push(entry("document-viewer"));
    router.push(entry("document-viewer"));

    router.navigate_to("welcome-3", Value::Null);
    assert_eq!(
        router.current_screen(),
        CurrentScreen::Onboarding {
            id: "welcome-3".into(),
            page: Some(3)
        }
    );

    router.exit_special_screen();
    assert_eq!(router.active_tab(), "documents");
    assert_eq!(router.stack("documents").len(), 2);
    assert!(router.special_screen().is_none());
}

#[test]
fn test_switch_tab_clears_special_screen() {
    let mut router = example_router();
    router.navigate_to(UTILITY_LOADING, Value::Null);
    router.switch_tab(TAB_SETTINGS);

    assert!(router.special_screen().is_none());
    assert_eq!(
        router.current_screen(),
        CurrentScreen::Tab {
            id: TAB_SETTINGS.into()
        }
    );
}

#[test]
fn test_detail_navigation_keeps_special_screen() {
    let mut router = example_router();
    router.navigate_to(UTILITY_LOADING, Value::Null);
    router.navigate_to(DETAIL_ITEM, json!({}));

    assert_eq!(router.active_tab(), TAB_LIST);
    assert_eq!(router.stack(TAB_LIST).len(), 1);
    assert_eq!(
        router.special_screen().map(|s| s.kind),
        Some(SpecialKind::Utility)
    );

    router.exit_special_screen();
    assert!(matches!(
        router.current_screen(),
        CurrentScreen::Detail { depth: 1, .. }
    ));
}

#[test]
fn test_far_onboarding_page_configures_and_renders() {
    let mut registry = example_registry();
    registry.onboarding[1].page = 2_000_000_000;
    let surface = MemorySurface::new();
    let mut router = Router::configure(registry, Some(TAB_HOME)).unwrap();
    router.subscribe(Presenter::new(ScreenTable::new(), surface.clone()));

    router.navigate_to("welcome-2", Value::Null);

    let html = surface.html(Region::Screen);
    assert_eq!(html.matches("onboarding-dot").count(), 2);
    assert!(html.contains("Get Started"));
    assert!(html.contains(r#"data-nav="navigate:welcome-1""#));
}

// ============================================================================
// navigate_to dispatch
// ============================================================================

#[test]
fn test_detail_navigation_switches_to_parent() {
    let mut router = narrativ_router();
    let before = router.stack("timeline").len();

    router.navigate_to("event-detail", json!({}));

    assert_eq!(router.active_tab(), "timeline");
    assert_eq!(router.stack("timeline").len(), before + 1);
}

#[test]
fn test_detail_navigation_keeps_parent_stack() {
    let mut router = narrativ_router();
    router.navigate_to("event-detail", json!({"eventId": "e1"}));
    router.switch_tab("home");
    router.navigate_to("event-detail", json!({"eventId": "e2"}));

    let stack = router.stack("timeline");
    assert_eq!(stack.len(), 2);
    assert_eq!(stack[0].params["eventId"], "e1");
    assert_eq!(stack[1].params["eventId"], "e2");
}

#[test]
fn test_navigate_to_tab_behaves_like_switch_tab() {
    let mut router = example_router();
    router.navigate_to(UTILITY_LOADING, Value::Null);
    router.navigate_to(TAB_LIST, Value::Null);

    assert_eq!(router.active_tab(), TAB_LIST);
    assert!(router.special_screen().is_none());
}

#[test]
fn test_item_detail_scenario() {
    let mut router = example_router();
    assert_eq!(router.active_tab(), TAB_HOME);
    for tab in [TAB_HOME, TAB_LIST, TAB_SETTINGS] {
        assert!(router.stack(tab).is_empty());
    }

    router.navigate_to(DETAIL_ITEM, json!({"id": "x"}));
    assert_eq!(router.active_tab(), TAB_LIST);
    assert_eq!(router.stack(TAB_LIST).len(), 1);

    router.pop();
    assert_eq!(router.active_tab(), TAB_LIST);
    assert!(router.stack(TAB_LIST).is_empty());
}

// ============================================================================
// Ignored actions
// ============================================================================

#[test]
fn test_switch_to_nonexistent_tab_changes_nothing() {
    let mut router = example_router();
    let before = router.view().to_json();

    let transition = router.switch_tab("nonexistent");

    assert!(!transition.is_applied());
    assert_eq!(router.active_tab(), TAB_HOME);
    assert_eq!(router.view().to_json(), before);
}

#[test]
fn test_unknown_screen_is_reported_on_strict_channel() {
    let mut router = example_router();
    let err = router
        .navigate_to("nope", Value::Null)
        .into_result()
        .unwrap_err();
    assert!(matches!(err, NavError::UnknownScreen { ref screen_id } if screen_id == "nope"));

    let ignored = router.event_log().ignored();
    assert_eq!(ignored.len(), 1);
    match &ignored[0].kind {
        NavEventKind::Ignored { action, reason } => {
            assert_eq!(action, "navigate:nope");
            assert!(reason.contains("NAV-021"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_non_object_params_are_rejected() {
    let mut router = example_router();
    let transition = router.navigate_to(DETAIL_ITEM, json!("x"));
    assert!(matches!(
        transition.into_result(),
        Err(NavError::InvalidParams { .. })
    ));
    assert!(router.stack(TAB_LIST).is_empty());
}

// ============================================================================
// Textual actions
// ============================================================================

#[test]
fn test_dispatch_textual_actions() {
    let mut router = narrativ_router();
    for text in [
        r#"navigate:document-viewer:{"documentId":"d1"}"#,
        "toggle-panel",
        "go:welcome-5",
        "exit",
        "back",
    ] {
        let action: NavAction = text.parse().unwrap();
        assert!(router.dispatch(action).is_applied(), "{text}");
    }

    assert_eq!(router.active_tab(), "documents");
    assert!(router.stack("documents").is_empty());
    assert!(!router.panel_open());
}

// ============================================================================
// Repaint contract
// ============================================================================

struct CountingObserver {
    full: std::rc::Rc<std::cell::Cell<usize>>,
    panel: std::rc::Rc<std::cell::Cell<usize>>,
}

impl NavObserver for CountingObserver {
    fn on_change(&mut self, repaint: Repaint, _view: &NavView<'_>) {
        let counter = match repaint {
            Repaint::Full => &self.full,
            Repaint::PanelOnly => &self.panel,
        };
        counter.set(counter.get() + 1);
    }
}

#[test]
fn test_every_applied_mutation_repaints_once() {
    let full = std::rc::Rc::new(std::cell::Cell::new(0));
    let panel = std::rc::Rc::new(std::cell::Cell::new(0));
    let mut router = example_router();
    router.subscribe(CountingObserver {
        full: full.clone(),
        panel: panel.clone(),
    });

    router.switch_tab(TAB_LIST);
    router.push(entry("a"));
    router.pop();
    router.pop();
    router.pop_to_root();
    router.navigate_to(DETAIL_ITEM, json!({}));
    router.navigate_to(ONBOARDING_FIRST, Value::Null);
    router.exit_special_screen();
    router.switch_tab("nonexistent");
    router.toggle_panel();
    router.close_panel();

    assert_eq!(full.get(), 8);
    assert_eq!(panel.get(), 2);
}

#[test]
fn test_presenter_keeps_regions_consistent() {
    let surface = MemorySurface::new();
    let table = ScreenTable::new().with_screen("event-detail", |req| {
        Some(format!(
            "<article>event {}</article>",
            req.params["eventId"].as_str().unwrap_or("?")
        ))
    });
    let mut router = narrativ_router();
    router.subscribe(Presenter::new(table, surface.clone()));
    router.refresh();

    router.toggle_panel();
    router.navigate_to("event-detail", json!({"eventId": "e7"}));

    assert_eq!(surface.batch_count(), 3);
    assert_eq!(surface.html(Region::Screen), "<article>event e7</article>");
    assert!(surface
        .html(Region::TabBar)
        .contains(r#"class="tab-item active" data-nav="switch-tab:timeline""#));
    assert!(!surface.is_visible(Region::Panel));
    assert!(!surface.is_visible(Region::PanelOverlay));

    router.navigate_to("document-viewer", json!({}));
    assert!(surface.html(Region::Screen).contains("Document Viewer"));
    assert!(surface
        .html(Region::Screen)
        .contains("Detail content would appear here"));
}
