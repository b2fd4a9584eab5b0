//! Chrome - keeps the page regions in sync with navigation state
//!
//! - `tab_bar`: `TabBarView`, one button per tab
//! - `panel`: `PanelView`, the debug screen list
//!
//! [`Presenter`] is the observer that repaints. Each notification becomes
//! one batch of [`Patch`]es handed to a [`Surface`], so content, tab bar and
//! panel never disagree.

pub mod panel;
pub mod tab_bar;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use crate::render::shell::{escape, icon, nav_attr};
use crate::render::RenderDispatcher;
use crate::router::{NavAction, NavObserver, NavView, Repaint};

pub use panel::{PanelItem, PanelSection, PanelView};
pub use tab_bar::{TabBarView, TabItem};

/// Page regions the chrome writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Screen,
    TabBar,
    Panel,
    PanelOverlay,
    PanelToggle,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Screen,
        Region::TabBar,
        Region::Panel,
        Region::PanelOverlay,
        Region::PanelToggle,
    ];

    /// DOM element id
    pub fn element_id(&self) -> &'static str {
        match self {
            Region::Screen => "screen-container",
            Region::TabBar => "tab-bar",
            Region::Panel => "screen-panel",
            Region::PanelOverlay => "screen-panel-overlay",
            Region::PanelToggle => "screen-panel-toggle",
        }
    }

    /// Panel and overlay start hidden
    fn visible_by_default(&self) -> bool {
        !matches!(self, Region::Panel | Region::PanelOverlay)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    Content { region: Region, html: String },
    Visibility { region: Region, visible: bool },
}

impl Patch {
    pub fn region(&self) -> Region {
        match self {
            Patch::Content { region, .. } | Patch::Visibility { region, .. } => *region,
        }
    }
}

/// Output medium; one `apply` call is one atomic repaint
pub trait Surface {
    fn apply(&mut self, patches: Vec<Patch>);
}

#[derive(Debug, Default)]
struct SurfaceState {
    content: HashMap<Region, String>,
    visible: HashMap<Region, bool>,
    batches: usize,
}

/// In-memory surface, shared by clone (keep one handle, give one away)
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    state: Arc<RwLock<SurfaceState>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(&self, region: Region) -> String {
        self.state
            .read()
            .content
            .get(&region)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_visible(&self, region: Region) -> bool {
        self.state
            .read()
            .visible
            .get(&region)
            .copied()
            .unwrap_or_else(|| region.visible_by_default())
    }

    /// Number of `apply` calls so far
    pub fn batch_count(&self) -> usize {
        self.state.read().batches
    }

    /// Complete HTML page with every region filled in
    pub fn to_document(&self, title: &str) -> String {
        let class = |base: &str, region: Region, shown: &str, hidden: &str| {
            let state = if self.is_visible(region) { shown } else { hidden };
            if state.is_empty() {
                base.to_string()
            } else {
                format!("{base} {state}")
            }
        };

        format!(
            concat!(
                "<!DOCTYPE html>\n",
                "<html lang=\"en\">\n",
                "<head><meta charset=\"utf-8\"><title>{title}</title></head>\n",
                "<body>\n",
                "<div class=\"device-frame\">\n",
                "<main id=\"{screen_id}\" class=\"screen-container\">{screen}</main>\n",
                "<nav id=\"{tab_bar_id}\" class=\"{tab_bar_class}\">{tab_bar}</nav>\n",
                "</div>\n",
                "<div id=\"{overlay_id}\" class=\"{overlay_class}\" {close}></div>\n",
                "<aside id=\"{panel_id}\" class=\"{panel_class}\">{panel}</aside>\n",
                "<div id=\"{toggle_id}\">{toggle}</div>\n",
                "</body>\n",
                "</html>\n"
            ),
            title = escape(title),
            screen_id = Region::Screen.element_id(),
            screen = self.html(Region::Screen),
            tab_bar_id = Region::TabBar.element_id(),
            tab_bar_class = class("tab-bar", Region::TabBar, "", "hidden"),
            tab_bar = self.html(Region::TabBar),
            overlay_id = Region::PanelOverlay.element_id(),
            overlay_class = class("screen-panel-overlay", Region::PanelOverlay, "visible", ""),
            close = nav_attr(&NavAction::ClosePanel),
            panel_id = Region::Panel.element_id(),
            panel_class = class("screen-panel", Region::Panel, "open", ""),
            panel = self.html(Region::Panel),
            toggle_id = Region::PanelToggle.element_id(),
            toggle = self.html(Region::PanelToggle),
        )
    }
}

impl Surface for MemorySurface {
    fn apply(&mut self, patches: Vec<Patch>) {
        let mut state = self.state.write();
        trace!(patches = patches.len(), "Applying patch batch");
        for patch in patches {
            match patch {
                Patch::Content { region, html } => {
                    state.content.insert(region, html);
                }
                Patch::Visibility { region, visible } => {
                    state.visible.insert(region, visible);
                }
            }
        }
        state.batches += 1;
    }
}

fn panel_toggle_html() -> String {
    format!(
        r#"<button class="screen-panel-toggle" {} aria-label="Open screen navigator" title="All Screens">{}</button>"#,
        nav_attr(&NavAction::TogglePanel),
        icon("rectangle.3.group", 18)
    )
}

/// Observer that renders content and chrome into a surface
pub struct Presenter<D, S> {
    dispatcher: D,
    surface: S,
}

impl<D: RenderDispatcher, S: Surface> Presenter<D, S> {
    pub fn new(dispatcher: D, surface: S) -> Self {
        Self {
            dispatcher,
            surface,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Patch batch for one repaint; content is rendered once on full repaints
    pub fn patches(&mut self, repaint: Repaint, view: &NavView<'_>) -> Vec<Patch> {
        let mut patches = Vec::new();
        if repaint == Repaint::Full {
            patches.push(Patch::Content {
                region: Region::Screen,
                html: self.dispatcher.render(view),
            });
            patches.extend(TabBarView::from_view(view).patches());
            patches.push(Patch::Content {
                region: Region::PanelToggle,
                html: panel_toggle_html(),
            });
        }
        patches.extend(PanelView::from_view(view).patches());
        patches
    }
}

impl<D: RenderDispatcher, S: Surface> NavObserver for Presenter<D, S> {
    fn on_change(&mut self, repaint: Repaint, view: &NavView<'_>) {
        let patches = self.patches(repaint, view);
        self.surface.apply(patches);
    }
}
