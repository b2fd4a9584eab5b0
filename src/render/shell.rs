//! Built-in screen markup
//!
//! Nav bar, placeholders, onboarding pages and the loading screen. Buttons
//! carry a `data-nav` attribute holding the textual `NavAction` they trigger.

use crate::registry::{OnboardingScreen, ScreenRegistry, UtilityScreen};
use crate::router::NavAction;

pub const PLACEHOLDER_TITLE: &str = "Detail Screen";
pub const PLACEHOLDER_ICON: &str = "doc.text";
pub const PLACEHOLDER_DESCRIPTION: &str = "Detail content would appear here";

/// Escape text and attribute values
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(&mut out, s);
    out
}

pub fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Named icon slot; glyphs are resolved by the page stylesheet
pub fn icon(name: &str, size: u32) -> String {
    format!(
        r#"<span class="icon" data-icon="{}" style="--icon-size:{size}px"></span>"#,
        escape(name)
    )
}

/// `data-nav` attribute for a button
pub fn nav_attr(action: &NavAction) -> String {
    format!(r#"data-nav="{}""#, escape(&action.to_string()))
}

pub fn nav_bar(title: &str, back: bool) -> String {
    let leading = if back {
        format!(
            r#"<button class="nav-bar-back" {}>{} Back</button>"#,
            nav_attr(&NavAction::Pop),
            icon("chevron.left", 20)
        )
    } else {
        String::from(r#"<div class="nav-bar-spacer"></div>"#)
    };
    format!(
        r#"<div class="nav-bar">{leading}<span class="nav-bar-title">{}</span><div class="nav-bar-spacer"></div></div>"#,
        escape(title)
    )
}

pub fn empty_state(icon_name: &str, title: &str, description: &str) -> String {
    let mut html = String::from(r#"<div class="empty-state">"#);
    if !icon_name.is_empty() {
        html.push_str(&format!(
            r#"<div class="empty-state-icon">{}</div>"#,
            icon(icon_name, 64)
        ));
    }
    html.push_str(&format!(
        r#"<div class="empty-state-title">{}</div>"#,
        escape(title)
    ));
    if !description.is_empty() {
        html.push_str(&format!(
            r#"<div class="empty-state-desc">{}</div>"#,
            escape(description)
        ));
    }
    html.push_str("</div>");
    html
}

/// Stand-in for a detail screen nobody renders
pub fn detail_placeholder(title: &str, icon_name: &str) -> String {
    format!(
        "{}{}",
        nav_bar(title, true),
        empty_state(icon_name, title, PLACEHOLDER_DESCRIPTION)
    )
}

/// Stand-in for a tab root without a renderer
pub fn tab_placeholder(label: &str, icon_name: &str) -> String {
    format!(
        r#"<div class="screen-header"><h1 class="screen-title">{}</h1></div>{}"#,
        escape(label),
        empty_state(icon_name, "Coming soon", "")
    )
}

pub fn unknown_screen() -> String {
    empty_state("", "Unknown screen", "")
}

// ─────────────────────────────────────────────────────────────────────────────
// Special screens
// ─────────────────────────────────────────────────────────────────────────────

/// Onboarding page with progress dots and Back / Next / Get Started
///
/// One dot per declared page. Back and Next go to the neighbouring declared
/// pages, so ids need not follow a naming pattern and numbering gaps are
/// skipped. An unknown page shows the first page instead.
pub fn onboarding_screen(registry: &ScreenRegistry, page: i64) -> String {
    let sequence = registry.onboarding_sequence();
    let Some(index) = sequence
        .iter()
        .position(|o| o.page == page)
        .or_else(|| (!sequence.is_empty()).then_some(0))
    else {
        return unknown_screen();
    };
    let current = sequence[index];

    let mut dots = String::new();
    for n in 0..sequence.len() {
        let mut class = String::from("onboarding-dot");
        if n == index {
            class.push_str(" active");
        }
        if n < index {
            class.push_str(" completed");
        }
        dots.push_str(&format!(r#"<div class="{class}"></div>"#));
    }

    let back = match index.checked_sub(1).map(|i| sequence[i]) {
        Some(prev) => format!(
            r#"<button class="onboarding-btn onboarding-btn-secondary" {}>Back</button>"#,
            nav_attr(&NavAction::navigate(prev.id.clone()))
        ),
        None => String::from("<div></div>"),
    };

    let forward = match sequence.get(index + 1) {
        Some(next) => format!(
            r#"<button class="onboarding-btn onboarding-btn-primary" {}>Next</button>"#,
            nav_attr(&NavAction::navigate(next.id.clone()))
        ),
        None => format!(
            r#"<button class="onboarding-btn onboarding-btn-primary" {}>Get Started</button>"#,
            nav_attr(&NavAction::ExitSpecialScreen)
        ),
    };

    format!(
        concat!(
            r#"<div class="onboarding-screen">"#,
            r#"<div class="onboarding-progress">{dots}</div>"#,
            r#"<div class="onboarding-content">"#,
            r#"<div class="onboarding-icon">{icon}</div>"#,
            r#"<h1 class="onboarding-title">{title}</h1>"#,
            r#"<p class="onboarding-description">{description}</p>"#,
            "</div>",
            r#"<div class="onboarding-actions">{back}{forward}</div>"#,
            "</div>"
        ),
        dots = dots,
        icon = icon(&current.icon, 80),
        title = escape(onboarding_title(current)),
        description = escape(current.description.as_deref().unwrap_or_default()),
        back = back,
        forward = forward,
    )
}

fn onboarding_title(page: &OnboardingScreen) -> &str {
    page.title.as_deref().unwrap_or(&page.label)
}

pub fn loading_screen() -> String {
    format!(
        concat!(
            r#"<div class="loading-screen">"#,
            r#"<div class="loading-spinner"></div>"#,
            r#"<div class="loading-text">Loading...</div>"#,
            r#"<button class="loading-exit-btn" {}>Exit Loading</button>"#,
            "</div>"
        ),
        nav_attr(&NavAction::ExitSpecialScreen)
    )
}

/// Utility screens other than `loading` get a titled empty state and an exit
pub fn utility_screen(screen: &UtilityScreen) -> String {
    if screen.id == "loading" {
        return loading_screen();
    }
    format!(
        r#"<div class="utility-screen">{}<button class="utility-exit-btn" {}>Close</button></div>"#,
        empty_state(&screen.icon, &screen.label, ""),
        nav_attr(&NavAction::ExitSpecialScreen)
    )
}
