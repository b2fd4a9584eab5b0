//! NavState - the pure navigation state machine
//!
//! `reduce` takes the current state and an action and returns the next state
//! together with the event that describes the transition and the repaint it
//! needs. No I/O happens here; the router applies the step and notifies
//! observers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::NavError;
use crate::event_log::NavEventKind;
use crate::registry::{ScreenEntry, ScreenRegistry};
use crate::types::ScreenId;

use super::action::{empty_params, NavAction};

// ─────────────────────────────────────────────────────────────────────────────
// Stack entries and special screens
// ─────────────────────────────────────────────────────────────────────────────

/// One pushed view: a screen id plus the params it was opened with
///
/// Resolved to markup lazily at render time through a screen lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackEntry {
    pub screen_id: ScreenId,
    #[serde(default = "empty_params")]
    pub params: Value,
}

impl StackEntry {
    pub fn new(screen_id: ScreenId, params: Value) -> Self {
        Self { screen_id, params }
    }

    /// Entry without params
    pub fn bare(screen_id: ScreenId) -> Self {
        Self::new(screen_id, empty_params())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialKind {
    Onboarding,
    Utility,
}

impl std::fmt::Display for SpecialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecialKind::Onboarding => write!(f, "onboarding"),
            SpecialKind::Utility => write!(f, "utility"),
        }
    }
}

/// Full-screen override; hides the tab bar while present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialScreen {
    pub kind: SpecialKind,
    pub screen_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
}

/// What is visible right now (derived, never cached)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurrentScreen {
    Tab {
        id: String,
    },
    Detail {
        tab: String,
        depth: usize,
        screen_id: String,
    },
    Onboarding {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        page: Option<i64>,
    },
    Utility {
        id: String,
    },
}

impl CurrentScreen {
    pub fn is_special(&self) -> bool {
        matches!(
            self,
            CurrentScreen::Onboarding { .. } | CurrentScreen::Utility { .. }
        )
    }
}

/// Which presentation regions a transition invalidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repaint {
    /// Screen content, tab bar and panel
    Full,
    /// Panel and its overlay only
    PanelOnly,
}

/// Output of one reduction
#[derive(Debug, Clone)]
pub struct Step {
    pub state: NavState,
    pub event: NavEventKind,
    pub repaint: Repaint,
}

// ─────────────────────────────────────────────────────────────────────────────
// NavState
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct NavState {
    active_tab: String,
    /// Declared tab order; the stack map has exactly these keys
    tab_order: Vec<String>,
    stacks: HashMap<String, Vec<StackEntry>>,
    special_screen: Option<SpecialScreen>,
    panel_open: bool,
}

impl NavState {
    /// Initial state: one empty stack per tab, default tab (or first tab) active
    pub fn initial(registry: &ScreenRegistry, default_tab: Option<&str>) -> Result<Self, NavError> {
        let first = registry.tabs.first().ok_or_else(|| NavError::UnknownTab {
            tab_id: default_tab.unwrap_or_default().to_string(),
        })?;

        let active_tab = match default_tab {
            Some(tab) if registry.tab(tab).is_some() => tab.to_string(),
            Some(tab) => {
                return Err(NavError::UnknownTab {
                    tab_id: tab.to_string(),
                })
            }
            None => first.id.clone(),
        };

        let tab_order: Vec<String> = registry.tab_ids().map(String::from).collect();
        let stacks = tab_order
            .iter()
            .map(|id| (id.clone(), Vec::new()))
            .collect();

        Ok(Self {
            active_tab,
            tab_order,
            stacks,
            special_screen: None,
            panel_open: false,
        })
    }

    pub fn active_tab(&self) -> &str {
        &self.active_tab
    }

    /// Tab ids in declaration order
    pub fn tabs(&self) -> impl Iterator<Item = &str> {
        self.tab_order.iter().map(String::as_str)
    }

    pub fn has_tab(&self, tab_id: &str) -> bool {
        self.stacks.contains_key(tab_id)
    }

    /// Stack of any tab (empty for undeclared tabs)
    pub fn stack(&self, tab_id: &str) -> &[StackEntry] {
        self.stacks.get(tab_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn current_stack(&self) -> &[StackEntry] {
        self.stack(&self.active_tab)
    }

    pub fn depth(&self, tab_id: &str) -> usize {
        self.stack(tab_id).len()
    }

    /// Top of the active tab's stack
    pub fn top_entry(&self) -> Option<&StackEntry> {
        self.current_stack().last()
    }

    pub fn special_screen(&self) -> Option<&SpecialScreen> {
        self.special_screen.as_ref()
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn tab_bar_visible(&self) -> bool {
        self.special_screen.is_none()
    }

    pub fn current_screen(&self) -> CurrentScreen {
        if let Some(special) = &self.special_screen {
            return match special.kind {
                SpecialKind::Onboarding => CurrentScreen::Onboarding {
                    id: special.screen_id.clone(),
                    page: special.page,
                },
                SpecialKind::Utility => CurrentScreen::Utility {
                    id: special.screen_id.clone(),
                },
            };
        }

        match self.top_entry() {
            Some(top) => CurrentScreen::Detail {
                tab: self.active_tab.clone(),
                depth: self.current_stack().len(),
                screen_id: top.screen_id.to_string(),
            },
            None => CurrentScreen::Tab {
                id: self.active_tab.clone(),
            },
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Transitions (mutate a scratch copy inside `reduce`)
    // ─────────────────────────────────────────────────────────────────────

    fn switch_tab(&mut self, tab_id: &str) -> Result<NavEventKind, NavError> {
        if !self.has_tab(tab_id) {
            return Err(NavError::UnknownTab {
                tab_id: tab_id.to_string(),
            });
        }
        let from = std::mem::replace(&mut self.active_tab, tab_id.to_string());
        self.special_screen = None;
        Ok(NavEventKind::TabSwitched {
            from,
            to: tab_id.to_string(),
        })
    }

    fn push(&mut self, entry: StackEntry) -> NavEventKind {
        let screen_id = entry.screen_id.to_string();
        let stack = self.stacks.entry(self.active_tab.clone()).or_default();
        stack.push(entry);
        NavEventKind::Pushed {
            tab: self.active_tab.clone(),
            screen_id,
            depth: stack.len(),
        }
    }

    fn pop(&mut self) -> NavEventKind {
        let stack = self.stacks.entry(self.active_tab.clone()).or_default();
        let popped = stack.pop();
        NavEventKind::Popped {
            tab: self.active_tab.clone(),
            screen_id: popped.map(|e| e.screen_id.to_string()),
            depth: stack.len(),
        }
    }

    fn pop_to_root(&mut self) -> NavEventKind {
        let stack = self.stacks.entry(self.active_tab.clone()).or_default();
        let cleared = stack.len();
        stack.clear();
        NavEventKind::PoppedToRoot {
            tab: self.active_tab.clone(),
            cleared,
        }
    }

    fn enter_special(&mut self, special: SpecialScreen) -> NavEventKind {
        let event = NavEventKind::SpecialEntered {
            kind: special.kind,
            screen_id: special.screen_id.clone(),
            page: special.page,
        };
        self.special_screen = Some(special);
        event
    }

    fn exit_special(&mut self) -> NavEventKind {
        NavEventKind::SpecialExited {
            screen_id: self.special_screen.take().map(|s| s.screen_id),
        }
    }

    fn navigate(
        &mut self,
        registry: &ScreenRegistry,
        screen_id: &str,
        params: &Value,
    ) -> Result<NavEventKind, NavError> {
        let params = match params {
            Value::Null => empty_params(),
            Value::Object(_) => params.clone(),
            other => {
                return Err(NavError::InvalidParams {
                    found: json_type_name(other).to_string(),
                })
            }
        };

        match registry.find(screen_id) {
            Some(ScreenEntry::Tab(_)) => self.switch_tab(screen_id),
            Some(ScreenEntry::Detail(detail)) => {
                // Parent tab becomes active; its stack is kept and grows by one
                if self.has_tab(&detail.parent) {
                    self.active_tab = detail.parent.clone();
                }
                let id = ScreenId::new(&detail.id).map_err(|e| NavError::InvalidScreenId {
                    id: detail.id.clone(),
                    reason: e.to_string(),
                })?;
                Ok(self.push(StackEntry::new(id, params)))
            }
            Some(ScreenEntry::Onboarding(page)) => Ok(self.enter_special(SpecialScreen {
                kind: SpecialKind::Onboarding,
                screen_id: page.id.clone(),
                page: Some(page.page),
            })),
            Some(ScreenEntry::Utility(utility)) => Ok(self.enter_special(SpecialScreen {
                kind: SpecialKind::Utility,
                screen_id: utility.id.clone(),
                page: None,
            })),
            None => Err(NavError::UnknownScreen {
                screen_id: screen_id.to_string(),
            }),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Apply one action to a state
///
/// Navigation actions that apply also close the panel; panel actions only
/// touch the panel. An `Err` means the action changes nothing.
pub fn reduce(
    state: &NavState,
    registry: &ScreenRegistry,
    action: &NavAction,
) -> Result<Step, NavError> {
    let mut next = state.clone();

    let event = match action {
        NavAction::SwitchTab(tab_id) => next.switch_tab(tab_id)?,
        NavAction::Push(entry) => next.push(entry.clone()),
        NavAction::Pop => next.pop(),
        NavAction::PopToRoot => next.pop_to_root(),
        NavAction::NavigateTo { screen_id, params } => next.navigate(registry, screen_id, params)?,
        NavAction::ExitSpecialScreen => next.exit_special(),
        NavAction::TogglePanel => {
            next.panel_open = !next.panel_open;
            NavEventKind::PanelToggled {
                open: next.panel_open,
            }
        }
        NavAction::ClosePanel => {
            next.panel_open = false;
            NavEventKind::PanelToggled { open: false }
        }
    };

    let repaint = if action.is_panel_action() {
        Repaint::PanelOnly
    } else {
        next.panel_open = false;
        Repaint::Full
    };

    Ok(Step {
        state: next,
        event,
        repaint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::example_registry;
    use serde_json::json;

    fn initial() -> NavState {
        NavState::initial(&example_registry(), Some("home")).unwrap()
    }

    fn apply(state: &NavState, action: NavAction) -> NavState {
        reduce(state, &example_registry(), &action).unwrap().state
    }

    fn entry(id: &str) -> StackEntry {
        StackEntry::bare(ScreenId::new(id).unwrap())
    }

    #[test]
    fn initial_state_has_one_empty_stack_per_tab() {
        let state = initial();
        assert_eq!(state.active_tab(), "home");
        assert_eq!(state.tabs().collect::<Vec<_>>(), ["home", "list", "settings"]);
        for tab in ["home", "list", "settings"] {
            assert_eq!(state.depth(tab), 0);
        }
        assert!(state.special_screen().is_none());
        assert!(!state.panel_open());
    }

    #[test]
    fn initial_defaults_to_first_tab() {
        let state = NavState::initial(&example_registry(), None).unwrap();
        assert_eq!(state.active_tab(), "home");
    }

    #[test]
    fn initial_rejects_undeclared_default() {
        let err = NavState::initial(&example_registry(), Some("profile")).unwrap_err();
        assert!(matches!(err, NavError::UnknownTab { .. }));
    }

    #[test]
    fn current_screen_reports_tab_detail_and_special() {
        let mut state = initial();
        assert_eq!(
            state.current_screen(),
            CurrentScreen::Tab { id: "home".into() }
        );

        state = apply(&state, NavAction::Push(entry("item-detail")));
        assert_eq!(
            state.current_screen(),
            CurrentScreen::Detail {
                tab: "home".into(),
                depth: 1,
                screen_id: "item-detail".into()
            }
        );

        state = apply(&state, NavAction::navigate("loading"));
        assert_eq!(
            state.current_screen(),
            CurrentScreen::Utility {
                id: "loading".into()
            }
        );
        assert!(!state.tab_bar_visible());
    }

    #[test]
    fn unknown_tab_is_an_error_and_leaves_state_alone() {
        let state = initial();
        let err = reduce(&state, &example_registry(), &NavAction::switch_tab("nope")).unwrap_err();
        assert!(matches!(err, NavError::UnknownTab { .. }));
        assert_eq!(state.active_tab(), "home");
    }

    #[test]
    fn navigate_rejects_non_object_params() {
        let state = initial();
        let err = reduce(
            &state,
            &example_registry(),
            &NavAction::navigate_with("item-detail", json!([1, 2])),
        )
        .unwrap_err();
        assert!(matches!(err, NavError::InvalidParams { .. }));
    }

    #[test]
    fn navigate_to_detail_records_push_on_parent() {
        let state = initial();
        let step = reduce(
            &state,
            &example_registry(),
            &NavAction::navigate_with("item-detail", json!({"id": "x"})),
        )
        .unwrap();
        assert_eq!(
            step.event,
            NavEventKind::Pushed {
                tab: "list".into(),
                screen_id: "item-detail".into(),
                depth: 1
            }
        );
        assert_eq!(step.state.top_entry().unwrap().params, json!({"id": "x"}));
        assert_eq!(step.repaint, Repaint::Full);
    }

    #[test]
    fn navigation_closes_panel_but_panel_actions_do_not_repaint_content() {
        let state = initial();
        let step = reduce(&state, &example_registry(), &NavAction::TogglePanel).unwrap();
        assert!(step.state.panel_open());
        assert_eq!(step.repaint, Repaint::PanelOnly);

        let closed = apply(&step.state, NavAction::switch_tab("settings"));
        assert!(!closed.panel_open());
    }

    #[test]
    fn onboarding_carries_page() {
        let state = apply(&initial(), NavAction::navigate("welcome-2"));
        assert_eq!(
            state.special_screen(),
            Some(&SpecialScreen {
                kind: SpecialKind::Onboarding,
                screen_id: "welcome-2".into(),
                page: Some(2),
            })
        );
    }

    #[test]
    fn current_screen_serializes_with_kind_tag() {
        let json = serde_json::to_value(CurrentScreen::Detail {
            tab: "list".into(),
            depth: 2,
            screen_id: "item-detail".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "detail");
        assert_eq!(json["depth"], 2);
    }
}
