//! Render dispatch - turns navigation state into screen markup
//!
//! The router never builds markup itself. A [`RenderDispatcher`] reads the
//! [`NavView`] after each transition and returns the content for the screen
//! region. [`ScreenTable`] is the stock dispatcher: a screen id → render fn
//! lookup with built-in fallbacks from [`shell`].

pub mod shell;

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::registry::{ScreenEntry, ScreenRegistry};
use crate::router::{CurrentScreen, NavView, StackEntry};

/// Produces screen content for the current navigation state
pub trait RenderDispatcher {
    fn render(&mut self, view: &NavView<'_>) -> String;
}

impl<F> RenderDispatcher for F
where
    F: FnMut(&NavView<'_>) -> String,
{
    fn render(&mut self, view: &NavView<'_>) -> String {
        self(view)
    }
}

/// App-supplied detail renderer; `None` declines and selects the placeholder
pub trait DetailRenderer {
    fn render_detail(&self, screen_id: &str, params: &Value) -> Option<String>;
}

/// Arguments passed to a registered render fn
#[derive(Debug, Clone, Copy)]
pub struct ScreenRequest<'a> {
    pub screen_id: &'a str,
    pub params: &'a Value,
}

type RenderFn = Box<dyn Fn(&ScreenRequest<'_>) -> Option<String>>;

/// Screen id → render fn lookup table
#[derive(Default)]
pub struct ScreenTable {
    screens: HashMap<String, RenderFn>,
}

impl ScreenTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, screen_id: impl Into<String>, render: F)
    where
        F: Fn(&ScreenRequest<'_>) -> Option<String> + 'static,
    {
        self.screens.insert(screen_id.into(), Box::new(render));
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_screen<F>(mut self, screen_id: impl Into<String>, render: F) -> Self
    where
        F: Fn(&ScreenRequest<'_>) -> Option<String> + 'static,
    {
        self.register(screen_id, render);
        self
    }

    pub fn contains(&self, screen_id: &str) -> bool {
        self.screens.contains_key(screen_id)
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Registered output, if any and not blank
    fn lookup(&self, screen_id: &str, params: &Value) -> Option<String> {
        let render = self.screens.get(screen_id)?;
        render(&ScreenRequest { screen_id, params }).filter(|html| !html.trim().is_empty())
    }
}

impl std::fmt::Debug for ScreenTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&str> = self.screens.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("ScreenTable").field("screens", &ids).finish()
    }
}

impl DetailRenderer for ScreenTable {
    fn render_detail(&self, screen_id: &str, params: &Value) -> Option<String> {
        self.lookup(screen_id, params)
    }
}

impl RenderDispatcher for ScreenTable {
    fn render(&mut self, view: &NavView<'_>) -> String {
        let registry = view.registry();
        let no_params = Value::Null;

        match view.current_screen() {
            CurrentScreen::Onboarding { id, page } => {
                self.lookup(&id, &no_params).unwrap_or_else(|| {
                    let page = page
                        .or_else(|| registry.onboarding_screen(&id).map(|o| o.page))
                        .unwrap_or(1);
                    shell::onboarding_screen(registry, page)
                })
            }
            CurrentScreen::Utility { id } => self.lookup(&id, &no_params).unwrap_or_else(|| {
                registry
                    .utility_screen(&id)
                    .map(shell::utility_screen)
                    .unwrap_or_else(shell::unknown_screen)
            }),
            CurrentScreen::Detail { .. } => match view.top_entry() {
                Some(entry) => detail_content(registry, Some(&*self as &dyn DetailRenderer), entry),
                None => shell::unknown_screen(),
            },
            CurrentScreen::Tab { id } => self.lookup(&id, &no_params).unwrap_or_else(|| {
                registry
                    .tab(&id)
                    .map(|tab| shell::tab_placeholder(&tab.label, &tab.icon))
                    .unwrap_or_else(shell::unknown_screen)
            }),
        }
    }
}

/// Content for a stack entry: the delegate's markup, or a placeholder
///
/// The delegate is skipped when absent, when it returns `None` and when its
/// output is blank. The placeholder uses the registry's label and icon for
/// the id, or the generic detail title and icon for ids it does not know.
pub fn detail_content(
    registry: &ScreenRegistry,
    delegate: Option<&dyn DetailRenderer>,
    entry: &StackEntry,
) -> String {
    let screen_id = entry.screen_id.as_str();

    if let Some(html) = delegate
        .and_then(|d| d.render_detail(screen_id, &entry.params))
        .filter(|html| !html.trim().is_empty())
    {
        return html;
    }

    debug!(screen_id, "No detail renderer output, using placeholder");
    match registry.find(screen_id) {
        Some(found @ (ScreenEntry::Detail(_) | ScreenEntry::Tab(_))) => {
            shell::detail_placeholder(found.label(), found.icon())
        }
        _ => shell::detail_placeholder(shell::PLACEHOLDER_TITLE, shell::PLACEHOLDER_ICON),
    }
}
