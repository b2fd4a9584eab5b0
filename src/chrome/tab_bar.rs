//! Tab bar: one button per declared tab, hidden while a special screen shows

use serde::Serialize;

use crate::render::shell::{escape, icon, nav_attr};
use crate::router::{NavAction, NavView};

use super::{Patch, Region};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabItem {
    pub id: String,
    pub label: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility_id: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabBarView {
    pub visible: bool,
    pub items: Vec<TabItem>,
}

impl TabBarView {
    pub fn from_view(view: &NavView<'_>) -> Self {
        let items = view
            .registry()
            .tabs
            .iter()
            .map(|tab| TabItem {
                id: tab.id.clone(),
                label: tab.label.clone(),
                icon: tab.icon.clone(),
                accessibility_id: tab.accessibility_id.clone(),
                active: tab.id == view.active_tab(),
            })
            .collect();

        Self {
            visible: view.special_screen().is_none(),
            items,
        }
    }

    pub fn active(&self) -> Option<&TabItem> {
        self.items.iter().find(|item| item.active)
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for item in &self.items {
            let class = if item.active { "tab-item active" } else { "tab-item" };
            let testid = item
                .accessibility_id
                .as_deref()
                .map(|id| format!(r#" data-testid="{}""#, escape(id)))
                .unwrap_or_default();
            html.push_str(&format!(
                r#"<button class="{class}" {} aria-label="{}"{testid}>{}<span class="tab-label">{}</span></button>"#,
                nav_attr(&NavAction::switch_tab(item.id.clone())),
                escape(&item.label),
                icon(&item.icon, 22),
                escape(&item.label),
            ));
        }
        html
    }

    /// Hidden bars keep their last content; only visibility changes
    pub fn patches(&self) -> Vec<Patch> {
        let mut patches = vec![Patch::Visibility {
            region: Region::TabBar,
            visible: self.visible,
        }];
        if self.visible {
            patches.push(Patch::Content {
                region: Region::TabBar,
                html: self.to_html(),
            });
        }
        patches
    }
}
