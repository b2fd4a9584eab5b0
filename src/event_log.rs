//! Navigation event log
//!
//! Append-only record of every transition the router applied or ignored.
//! - Event: envelope with id + timestamp + kind
//! - NavEventKind: one variant per transition, plus `Ignored`
//! - EventLog: cheap-clone handle, shared with observers and the CLI

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::router::SpecialKind;

/// Single event in the navigation log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic sequence ID (for ordering)
    pub id: u64,
    /// Time since the router was configured (ms)
    pub timestamp_ms: u64,
    /// Event type and data
    pub kind: NavEventKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavEventKind {
    Configured {
        active_tab: String,
        tab_count: usize,
    },
    TabSwitched {
        from: String,
        to: String,
    },
    Pushed {
        tab: String,
        screen_id: String,
        depth: usize,
    },
    Popped {
        tab: String,
        screen_id: Option<String>,
        depth: usize,
    },
    PoppedToRoot {
        tab: String,
        cleared: usize,
    },
    SpecialEntered {
        kind: SpecialKind,
        screen_id: String,
        page: Option<i64>,
    },
    SpecialExited {
        screen_id: Option<String>,
    },
    PanelToggled {
        open: bool,
    },
    /// Action that changed nothing (unknown tab, unknown screen, bad params)
    Ignored {
        action: String,
        reason: String,
    },
}

impl NavEventKind {
    /// Tab the event is about, if any
    pub fn tab(&self) -> Option<&str> {
        match self {
            Self::TabSwitched { to, .. } => Some(to.as_str()),
            Self::Pushed { tab, .. } | Self::Popped { tab, .. } | Self::PoppedToRoot { tab, .. } => {
                Some(tab.as_str())
            }
            Self::Configured { .. }
            | Self::SpecialEntered { .. }
            | Self::SpecialExited { .. }
            | Self::PanelToggled { .. }
            | Self::Ignored { .. } => None,
        }
    }

    /// Whether the event records a stack change
    pub fn is_stack_event(&self) -> bool {
        matches!(
            self,
            Self::Pushed { .. } | Self::Popped { .. } | Self::PoppedToRoot { .. }
        )
    }
}

/// Events a router keeps before dropping the oldest
pub const DEFAULT_EVENT_CAPACITY: usize = 10_000;

/// Append-only event log, shared by clone
///
/// A bounded log drops its oldest events once full; ids keep counting.
#[derive(Clone)]
pub struct EventLog {
    events: Arc<RwLock<VecDeque<Event>>>,
    capacity: Option<usize>,
    start_time: Instant,
    next_id: Arc<AtomicU64>,
}

impl EventLog {
    /// Unbounded log
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(VecDeque::new())),
            capacity: None,
            start_time: Instant::now(),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Log that keeps at most `capacity` events (at least one)
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::new()
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Emit an event (returns event ID)
    pub fn emit(&self, kind: NavEventKind) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let event = Event {
            id,
            timestamp_ms: self.start_time.elapsed().as_millis() as u64,
            kind,
        };

        let mut events = self.events.write();
        if let Some(capacity) = self.capacity {
            while events.len() >= capacity {
                events.pop_front();
            }
        }
        events.push_back(event);
        id
    }

    /// Get all retained events (cloned, oldest first)
    pub fn events(&self) -> Vec<Event> {
        self.events.read().iter().cloned().collect()
    }

    /// Drop every retained event; ids are not reused
    pub fn clear(&self) {
        self.events.write().clear();
    }

    /// Events that concern one tab
    pub fn filter_tab(&self, tab: &str) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| e.kind.tab() == Some(tab))
            .collect()
    }

    /// Ignored actions only
    pub fn ignored(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e.kind, NavEventKind::Ignored { .. }))
            .collect()
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self.events()).unwrap_or(Value::Null)
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pushed(tab: &str, screen: &str, depth: usize) -> NavEventKind {
        NavEventKind::Pushed {
            tab: tab.into(),
            screen_id: screen.into(),
            depth,
        }
    }

    #[test]
    fn kind_tab_extraction() {
        assert_eq!(pushed("list", "item-detail", 1).tab(), Some("list"));
        assert_eq!(NavEventKind::PanelToggled { open: true }.tab(), None);
        assert_eq!(
            NavEventKind::TabSwitched {
                from: "home".into(),
                to: "list".into()
            }
            .tab(),
            Some("list")
        );
    }

    #[test]
    fn kind_serializes_with_type_tag() {
        let json = serde_json::to_value(pushed("list", "item-detail", 2)).unwrap();
        assert_eq!(json["type"], "pushed");
        assert_eq!(json["screen_id"], "item-detail");
        assert_eq!(json["depth"], 2);

        let special = NavEventKind::SpecialEntered {
            kind: SpecialKind::Onboarding,
            screen_id: "welcome-1".into(),
            page: Some(1),
        };
        let json = serde_json::to_value(special).unwrap();
        assert_eq!(json["type"], "special_entered");
        assert_eq!(json["kind"], "onboarding");
    }

    #[test]
    fn emit_returns_monotonic_ids() {
        let log = EventLog::new();
        assert!(log.is_empty());

        let a = log.emit(pushed("list", "a", 1));
        let b = log.emit(pushed("list", "b", 2));
        assert_eq!((a, b), (0, 1));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn filter_tab_and_ignored() {
        let log = EventLog::new();
        log.emit(pushed("list", "item-detail", 1));
        log.emit(pushed("home", "x", 1));
        log.emit(NavEventKind::Ignored {
            action: "switch-tab:nope".into(),
            reason: "NAV-020: Unknown tab 'nope'".into(),
        });

        assert_eq!(log.filter_tab("list").len(), 1);
        assert_eq!(log.ignored().len(), 1);
        assert!(log.events()[0].kind.is_stack_event());
    }

    #[test]
    fn bounded_log_drops_oldest_and_keeps_ids() {
        let log = EventLog::bounded(3);
        for open in [true, false, true, false, true] {
            log.emit(NavEventKind::PanelToggled { open });
        }

        let ids: Vec<_> = log.events().iter().map(|e| e.id).collect();
        assert_eq!(ids, [2, 3, 4]);
        assert_eq!(log.len(), 3);
        assert_eq!(log.capacity(), Some(3));
    }

    #[test]
    fn clear_empties_shared_log() {
        let log = EventLog::new();
        let cloned = log.clone();
        log.emit(NavEventKind::PanelToggled { open: true });
        cloned.clear();

        assert!(log.is_empty());
        assert_eq!(log.emit(NavEventKind::PanelToggled { open: false }), 1);
    }

    #[test]
    fn clones_share_the_same_log() {
        let log = EventLog::new();
        let cloned = log.clone();
        log.emit(NavEventKind::PanelToggled { open: true });
        assert_eq!(cloned.len(), 1);
        assert_eq!(cloned.to_json()[0]["kind"]["type"], "panel_toggled");
    }
}
