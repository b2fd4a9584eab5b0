//! Debug screen panel: every registry screen, grouped by category
//!
//! Item highlighting:
//! - tabs: active tab while no special screen shows
//! - details: never (they open with demo params, hinted with their parent)
//! - onboarding / utility: the special screen currently showing

use serde::Serialize;
use serde_json::json;

use crate::registry::Category;
use crate::render::shell::{escape, icon, nav_attr};
use crate::router::{NavAction, NavView};

use super::{Patch, Region};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelItem {
    pub id: String,
    pub label: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub active: bool,
    /// Textual action the item triggers
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSection {
    pub category: Category,
    pub title: &'static str,
    pub items: Vec<PanelItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub open: bool,
    pub sections: Vec<PanelSection>,
}

fn section_title(category: Category) -> &'static str {
    match category {
        Category::Tab => "Main Tabs",
        Category::Detail => "Detail Screens",
        Category::Onboarding => "Onboarding",
        Category::Utility => "Utility",
    }
}

impl PanelView {
    pub fn from_view(view: &NavView<'_>) -> Self {
        let registry = view.registry();
        let special_id = view.special_screen().map(|s| s.screen_id.as_str());

        let item = |id: &str, label: &str, icon_name: &str, active: bool, action: NavAction| PanelItem {
            id: id.to_string(),
            label: label.to_string(),
            icon: icon_name.to_string(),
            hint: None,
            active,
            action: action.to_string(),
        };

        let tabs = registry
            .tabs
            .iter()
            .map(|t| {
                let active = special_id.is_none() && t.id == view.active_tab();
                item(&t.id, &t.label, &t.icon, active, NavAction::navigate(t.id.clone()))
            })
            .collect();

        let details = registry
            .details
            .iter()
            .map(|d| PanelItem {
                hint: Some(d.parent.clone()),
                ..item(
                    &d.id,
                    &d.label,
                    &d.icon,
                    false,
                    NavAction::navigate_with(d.id.clone(), json!({ "demo": true })),
                )
            })
            .collect();

        let onboarding = registry
            .onboarding
            .iter()
            .map(|o| {
                let active = special_id == Some(o.id.as_str());
                item(&o.id, &o.label, &o.icon, active, NavAction::navigate(o.id.clone()))
            })
            .collect();

        let utility = registry
            .utility
            .iter()
            .map(|u| {
                let active = special_id == Some(u.id.as_str());
                item(&u.id, &u.label, &u.icon, active, NavAction::navigate(u.id.clone()))
            })
            .collect();

        let sections = [
            (Category::Tab, tabs),
            (Category::Detail, details),
            (Category::Onboarding, onboarding),
            (Category::Utility, utility),
        ]
        .into_iter()
        .filter(|(_, items): &(Category, Vec<PanelItem>)| !items.is_empty())
        .map(|(category, items)| PanelSection {
            category,
            title: section_title(category),
            items,
        })
        .collect();

        Self {
            open: view.panel_open(),
            sections,
        }
    }

    pub fn active_items(&self) -> impl Iterator<Item = &PanelItem> {
        self.sections
            .iter()
            .flat_map(|s| s.items.iter())
            .filter(|i| i.active)
    }

    pub fn to_html(&self) -> String {
        let mut html = format!(
            concat!(
                r#"<div class="screen-panel-header">"#,
                r#"<span class="screen-panel-title">All Screens</span>"#,
                r#"<button class="screen-panel-close" {}>{}</button>"#,
                "</div>"
            ),
            nav_attr(&NavAction::ClosePanel),
            icon("xmark", 16)
        );

        if self.sections.is_empty() {
            html.push_str(
                r#"<div class="empty-state"><div class="empty-state-title">No screens configured</div></div>"#,
            );
            return html;
        }

        for section in &self.sections {
            html.push_str(&format!(
                r#"<div class="screen-panel-section"><div class="screen-panel-section-title">{}</div>"#,
                section.title
            ));
            for item in &section.items {
                let class = if item.active {
                    "screen-panel-item active"
                } else {
                    "screen-panel-item"
                };
                let hint = item
                    .hint
                    .as_deref()
                    .map(|h| format!(r#"<span class="screen-panel-item-hint">{}</span>"#, escape(h)))
                    .unwrap_or_default();
                html.push_str(&format!(
                    r#"<button class="{class}" data-nav="{}"><span class="screen-panel-item-icon">{}</span><span class="screen-panel-item-label">{}</span>{hint}</button>"#,
                    escape(&item.action),
                    icon(&item.icon, 18),
                    escape(&item.label),
                ));
            }
            html.push_str("</div>");
        }
        html
    }

    /// Closed panels keep their last content; only visibility changes
    pub fn patches(&self) -> Vec<Patch> {
        let mut patches = vec![
            Patch::Visibility {
                region: Region::Panel,
                visible: self.open,
            },
            Patch::Visibility {
                region: Region::PanelOverlay,
                visible: self.open,
            },
        ];
        if self.open {
            patches.push(Patch::Content {
                region: Region::Panel,
                html: self.to_html(),
            });
        }
        patches
    }
}
