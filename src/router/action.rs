//! Navigation actions - the only way to change router state
//!
//! Textual form (CLI arguments and `data-nav` attributes in generated markup):
//! `verb[:target[:json-params]]`, e.g. `switch-tab:home`, `pop`,
//! `navigate:item-detail:{"id":"x"}`.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::NavError;
use crate::types::ScreenId;

use super::state::StackEntry;

#[derive(Debug, Clone, PartialEq)]
pub enum NavAction {
    /// Make a declared tab active (clears any special screen)
    SwitchTab(String),
    /// Push an entry onto the active tab's stack
    Push(StackEntry),
    /// Drop the top entry of the active tab's stack
    Pop,
    /// Clear the active tab's stack
    PopToRoot,
    /// Go to any registry screen, dispatched by category
    NavigateTo { screen_id: String, params: Value },
    ExitSpecialScreen,
    TogglePanel,
    ClosePanel,
}

impl NavAction {
    pub fn switch_tab(tab_id: impl Into<String>) -> Self {
        NavAction::SwitchTab(tab_id.into())
    }

    pub fn navigate(screen_id: impl Into<String>) -> Self {
        NavAction::NavigateTo {
            screen_id: screen_id.into(),
            params: empty_params(),
        }
    }

    pub fn navigate_with(screen_id: impl Into<String>, params: Value) -> Self {
        NavAction::NavigateTo {
            screen_id: screen_id.into(),
            params,
        }
    }

    /// Panel actions repaint the overlay only and never close it as a side effect
    pub fn is_panel_action(&self) -> bool {
        matches!(self, NavAction::TogglePanel | NavAction::ClosePanel)
    }

    fn verb(&self) -> &'static str {
        match self {
            NavAction::SwitchTab(_) => "switch-tab",
            NavAction::Push(_) => "push",
            NavAction::Pop => "pop",
            NavAction::PopToRoot => "pop-to-root",
            NavAction::NavigateTo { .. } => "navigate",
            NavAction::ExitSpecialScreen => "exit-special",
            NavAction::TogglePanel => "toggle-panel",
            NavAction::ClosePanel => "close-panel",
        }
    }
}

pub(crate) fn empty_params() -> Value {
    Value::Object(Map::new())
}

fn has_params(params: &Value) -> bool {
    match params {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

impl fmt::Display for NavAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.verb())?;
        match self {
            NavAction::SwitchTab(tab) => write!(f, ":{tab}"),
            NavAction::Push(entry) => {
                write!(f, ":{}", entry.screen_id)?;
                if has_params(&entry.params) {
                    write!(f, ":{}", entry.params)?;
                }
                Ok(())
            }
            NavAction::NavigateTo { screen_id, params } => {
                write!(f, ":{screen_id}")?;
                if has_params(params) {
                    write!(f, ":{params}")?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl FromStr for NavAction {
    type Err = NavError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| NavError::InvalidAction {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = input.trim().splitn(3, ':');
        let verb = parts.next().unwrap_or_default();
        let target = parts.next().filter(|t| !t.is_empty());
        let raw_params = parts.next().filter(|p| !p.trim().is_empty());

        let params = match raw_params {
            None => empty_params(),
            Some(raw) => {
                let value: Value = serde_json::from_str(raw)
                    .map_err(|e| invalid(&format!("params are not valid JSON ({e})")))?;
                if !value.is_object() {
                    return Err(invalid("params must be a JSON object"));
                }
                value
            }
        };

        let no_target = |action: NavAction| match target {
            Some(_) => Err(invalid("this action takes no target")),
            None => Ok(action),
        };

        match verb {
            "switch-tab" | "tab" => target
                .map(|t| NavAction::SwitchTab(t.to_string()))
                .ok_or_else(|| invalid("missing tab id")),
            "navigate" | "go" => target
                .map(|t| NavAction::NavigateTo {
                    screen_id: t.to_string(),
                    params,
                })
                .ok_or_else(|| invalid("missing screen id")),
            "push" => {
                let target = target.ok_or_else(|| invalid("missing screen id"))?;
                let screen_id = ScreenId::new(target).map_err(|e| invalid(&e.to_string()))?;
                Ok(NavAction::Push(StackEntry::new(screen_id, params)))
            }
            "pop" | "back" => no_target(NavAction::Pop),
            "pop-to-root" | "root" => no_target(NavAction::PopToRoot),
            "exit-special" | "exit" => no_target(NavAction::ExitSpecialScreen),
            "toggle-panel" => no_target(NavAction::TogglePanel),
            "close-panel" => no_target(NavAction::ClosePanel),
            "" => Err(invalid("empty action")),
            _ => Err(invalid("unknown verb")),
        }
    }
}
