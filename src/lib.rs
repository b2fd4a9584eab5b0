//! tabstack - tab/stack navigation core for multi-screen UI playgrounds
//!
//! A [`Router`] owns the active tab, one navigation stack per tab, an
//! optional full-screen override (onboarding, utility) and the debug panel
//! flag. Screens are declared once in a [`ScreenRegistry`]; presentation is
//! kept in sync by observers such as [`chrome::Presenter`].

pub mod chrome;
pub mod error;
pub mod errors;
pub mod event_log;
pub mod registry;
pub mod render;
pub mod router;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod test_fixtures;
pub mod types;

pub use chrome::{MemorySurface, Patch, Presenter, Region, Surface};
pub use error::{FixSuggestion, NavError};
pub use event_log::{Event, EventLog, NavEventKind};
pub use registry::{Category, RegistryFile, ScreenEntry, ScreenRegistry};
pub use render::{DetailRenderer, RenderDispatcher, ScreenTable};
pub use router::{
    CurrentScreen, NavAction, NavObserver, NavState, NavView, Repaint, Router, SpecialKind,
    SpecialScreen, StackEntry, Transition,
};
pub use types::ScreenId;
