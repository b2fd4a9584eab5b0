//! Router - owns navigation state and drives presentation sync
//!
//! - `action`: the `NavAction` vocabulary and its textual form
//! - `state`: the pure `NavState` machine (`reduce`)
//!
//! Every mutation goes through [`Router::dispatch`]: the action is reduced,
//! the resulting event is logged, and each observer is told once which
//! regions to repaint. Rejected actions change nothing and repaint nothing.

pub mod action;
pub mod state;

use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use crate::error::NavError;
use crate::event_log::{EventLog, NavEventKind, DEFAULT_EVENT_CAPACITY};
use crate::registry::{validate, RegistryFile, ScreenRegistry};

pub use action::NavAction;
pub use state::{
    reduce, CurrentScreen, NavState, Repaint, SpecialKind, SpecialScreen, StackEntry, Step,
};

/// Outcome of a mutation call
///
/// Ignoring the value keeps the lenient behavior; `into_result` is the
/// strict channel.
#[derive(Debug)]
pub enum Transition {
    Applied,
    Ignored(NavError),
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied)
    }

    pub fn into_result(self) -> Result<(), NavError> {
        match self {
            Transition::Applied => Ok(()),
            Transition::Ignored(error) => Err(error),
        }
    }
}

/// Read-only view handed to observers and render dispatchers
#[derive(Debug, Clone, Copy)]
pub struct NavView<'a> {
    registry: &'a ScreenRegistry,
    state: &'a NavState,
}

impl<'a> NavView<'a> {
    pub fn new(registry: &'a ScreenRegistry, state: &'a NavState) -> Self {
        Self { registry, state }
    }

    pub fn registry(&self) -> &'a ScreenRegistry {
        self.registry
    }

    pub fn state(&self) -> &'a NavState {
        self.state
    }

    pub fn current_screen(&self) -> CurrentScreen {
        self.state.current_screen()
    }

    pub fn active_tab(&self) -> &'a str {
        self.state.active_tab()
    }

    pub fn top_entry(&self) -> Option<&'a StackEntry> {
        self.state.top_entry()
    }

    pub fn special_screen(&self) -> Option<&'a SpecialScreen> {
        self.state.special_screen()
    }

    pub fn panel_open(&self) -> bool {
        self.state.panel_open()
    }

    /// JSON snapshot: current screen, stacks in tab order, special screen, panel
    pub fn to_json(&self) -> Value {
        let stacks: Vec<Value> = self
            .state
            .tabs()
            .map(|tab| {
                json!({
                    "tab": tab,
                    "depth": self.state.depth(tab),
                    "entries": self.state.stack(tab),
                })
            })
            .collect();

        json!({
            "current_screen": self.current_screen(),
            "active_tab": self.active_tab(),
            "stacks": stacks,
            "special_screen": self.special_screen(),
            "panel_open": self.panel_open(),
            "tab_bar_visible": self.state.tab_bar_visible(),
        })
    }
}

/// Notified after every applied transition
pub trait NavObserver {
    fn on_change(&mut self, repaint: Repaint, view: &NavView<'_>);
}

pub struct Router {
    registry: ScreenRegistry,
    state: NavState,
    events: EventLog,
    observers: Vec<Box<dyn NavObserver>>,
}

impl Router {
    /// Validate the registry and build the initial state
    ///
    /// Fails fast on dangling parents, duplicate ids, an empty tab list or
    /// an undeclared default tab. Warnings are logged and tolerated.
    pub fn configure(registry: ScreenRegistry, default_tab: Option<&str>) -> Result<Self, NavError> {
        Self::configure_named("registry", registry, default_tab)
    }

    /// Configure from a parsed registry file; `default_tab` overrides the file's
    pub fn from_file(file: RegistryFile, default_tab: Option<&str>) -> Result<Self, NavError> {
        let source_name = file.name.clone().unwrap_or_else(|| "registry".to_string());
        let default_tab = default_tab.map(String::from).or(file.default_tab);
        Self::configure_named(&source_name, file.screens, default_tab.as_deref())
    }

    fn configure_named(
        source_name: &str,
        registry: ScreenRegistry,
        default_tab: Option<&str>,
    ) -> Result<Self, NavError> {
        let result = validate::validate_registry(&registry, default_tab, source_name);
        for warning in &result.warnings {
            warn!(registry = source_name, layer = %warning.layer(), "{warning}");
        }
        if !result.is_valid() {
            return Err(NavError::InvalidRegistry {
                source_name: source_name.to_string(),
                error_count: result.errors.len(),
                summary: result.summary(),
            });
        }

        let state = NavState::initial(&registry, default_tab)?;
        let events = EventLog::bounded(DEFAULT_EVENT_CAPACITY);
        events.emit(NavEventKind::Configured {
            active_tab: state.active_tab().to_string(),
            tab_count: registry.tabs.len(),
        });
        info!(
            registry = source_name,
            active_tab = state.active_tab(),
            tabs = registry.tabs.len(),
            screens = registry.len(),
            "Router configured"
        );

        Ok(Self {
            registry,
            state,
            events,
            observers: Vec::new(),
        })
    }

    pub fn subscribe(&mut self, observer: impl NavObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Full repaint without a state change (initial paint)
    pub fn refresh(&mut self) {
        self.notify(Repaint::Full);
    }

    #[instrument(skip(self, action), fields(action = %action))]
    pub fn dispatch(&mut self, action: NavAction) -> Transition {
        match reduce(&self.state, &self.registry, &action) {
            Ok(step) => {
                debug!(event = ?step.event, repaint = ?step.repaint, "Transition applied");
                self.state = step.state;
                self.events.emit(step.event);
                self.notify(step.repaint);
                Transition::Applied
            }
            Err(error) => {
                warn!(%error, "Action ignored");
                self.events.emit(NavEventKind::Ignored {
                    action: action.to_string(),
                    reason: error.to_string(),
                });
                Transition::Ignored(error)
            }
        }
    }

    fn notify(&mut self, repaint: Repaint) {
        let view = NavView::new(&self.registry, &self.state);
        for observer in &mut self.observers {
            observer.on_change(repaint, &view);
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutation API
    // ─────────────────────────────────────────────────────────────────────

    pub fn switch_tab(&mut self, tab_id: &str) -> Transition {
        self.dispatch(NavAction::switch_tab(tab_id))
    }

    pub fn push(&mut self, entry: StackEntry) -> Transition {
        self.dispatch(NavAction::Push(entry))
    }

    pub fn pop(&mut self) -> Transition {
        self.dispatch(NavAction::Pop)
    }

    pub fn pop_to_root(&mut self) -> Transition {
        self.dispatch(NavAction::PopToRoot)
    }

    pub fn navigate_to(&mut self, screen_id: &str, params: Value) -> Transition {
        self.dispatch(NavAction::navigate_with(screen_id, params))
    }

    pub fn exit_special_screen(&mut self) -> Transition {
        self.dispatch(NavAction::ExitSpecialScreen)
    }

    pub fn toggle_panel(&mut self) -> Transition {
        self.dispatch(NavAction::TogglePanel)
    }

    pub fn close_panel(&mut self) -> Transition {
        self.dispatch(NavAction::ClosePanel)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    pub fn view(&self) -> NavView<'_> {
        NavView::new(&self.registry, &self.state)
    }

    pub fn current_screen(&self) -> CurrentScreen {
        self.state.current_screen()
    }

    pub fn active_tab(&self) -> &str {
        self.state.active_tab()
    }

    pub fn stack(&self, tab_id: &str) -> &[StackEntry] {
        self.state.stack(tab_id)
    }

    pub fn special_screen(&self) -> Option<&SpecialScreen> {
        self.state.special_screen()
    }

    pub fn panel_open(&self) -> bool {
        self.state.panel_open()
    }

    pub fn registry(&self) -> &ScreenRegistry {
        &self.registry
    }

    pub fn event_log(&self) -> &EventLog {
        &self.events
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("state", &self.state)
            .field("events", &self.events)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every notification
    #[derive(Clone, Default)]
    struct Recorder {
        calls: Rc<RefCell<Vec<(Repaint, CurrentScreen)>>>,
    }

    impl NavObserver for Recorder {
        fn on_change(&mut self, repaint: Repaint, view: &NavView<'_>) {
            self.calls
                .borrow_mut()
                .push((repaint, view.current_screen()));
        }
    }

    fn router() -> (Router, Recorder) {
        let mut router = Router::configure(example_registry(), Some(TAB_HOME)).unwrap();
        let recorder = Recorder::default();
        router.subscribe(recorder.clone());
        (router, recorder)
    }

    #[test]
    fn configure_rejects_dangling_parent() {
        let mut reg = example_registry();
        reg.details[0].parent = "timeline".into();
        let err = Router::configure(reg, None).unwrap_err();
        match err {
            NavError::InvalidRegistry { error_count, summary, .. } => {
                assert_eq!(error_count, 1);
                assert!(summary.contains("timeline"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn configure_rejects_duplicate_ids() {
        let mut reg = example_registry();
        reg.utility[0].id = TAB_HOME.into();
        assert!(matches!(
            Router::configure(reg, None),
            Err(NavError::InvalidRegistry { .. })
        ));
    }

    #[test]
    fn configure_logs_configured_event() {
        let (router, _) = router();
        let events = router.event_log().events();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].kind,
            NavEventKind::Configured {
                active_tab: TAB_HOME.into(),
                tab_count: 3
            }
        );
    }

    #[test]
    fn applied_transition_notifies_once() {
        let (mut router, recorder) = router();
        assert!(router.switch_tab(TAB_LIST).is_applied());

        let calls = recorder.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            (Repaint::Full, CurrentScreen::Tab { id: TAB_LIST.into() })
        );
    }

    #[test]
    fn ignored_transition_is_silent_but_logged() {
        let (mut router, recorder) = router();
        router.toggle_panel();
        let transition = router.switch_tab("nonexistent");

        assert!(!transition.is_applied());
        assert!(matches!(
            transition.into_result(),
            Err(NavError::UnknownTab { .. })
        ));
        assert_eq!(router.active_tab(), TAB_HOME);
        // panel untouched, only the toggle repainted
        assert!(router.panel_open());
        assert_eq!(recorder.calls.borrow().len(), 1);
        assert_eq!(router.event_log().ignored().len(), 1);
    }

    #[test]
    fn rejected_clicks_do_not_grow_the_log_without_bound() {
        let (mut router, _) = router();
        for _ in 0..DEFAULT_EVENT_CAPACITY + 50 {
            router.switch_tab("nonexistent");
        }

        let log = router.event_log();
        assert_eq!(log.len(), DEFAULT_EVENT_CAPACITY);
        assert!(log.events().iter().all(|e| matches!(e.kind, NavEventKind::Ignored { .. })));
        assert_eq!(router.active_tab(), TAB_HOME);
    }

    #[test]
    fn panel_actions_repaint_panel_only() {
        let (mut router, recorder) = router();
        router.toggle_panel();
        router.close_panel();
        let calls = recorder.calls.borrow();
        assert!(calls.iter().all(|(r, _)| *r == Repaint::PanelOnly));
        assert!(!router.panel_open());
    }

    #[test]
    fn refresh_paints_without_logging() {
        let (mut router, recorder) = router();
        router.refresh();
        assert_eq!(recorder.calls.borrow()[0].0, Repaint::Full);
        assert_eq!(router.event_log().len(), 1);
    }

    #[test]
    fn from_file_prefers_explicit_default_tab() {
        let file = RegistryFile::from_yaml(EXAMPLE_SCREENS_YAML).unwrap();
        let router = Router::from_file(file, Some(TAB_SETTINGS)).unwrap();
        assert_eq!(router.active_tab(), TAB_SETTINGS);
    }

    #[test]
    fn view_json_lists_stacks_in_tab_order() {
        let (mut router, _) = router();
        router.navigate_to(DETAIL_ITEM, json!({"id": "x"}));

        let json = router.view().to_json();
        assert_eq!(json["active_tab"], TAB_LIST);
        assert_eq!(json["current_screen"]["kind"], "detail");
        assert_eq!(json["stacks"][1]["tab"], TAB_LIST);
        assert_eq!(json["stacks"][1]["depth"], 1);
        assert_eq!(json["stacks"][1]["entries"][0]["params"]["id"], "x");
        assert_eq!(json["tab_bar_visible"], true);
    }
}
