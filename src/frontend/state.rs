//! Action types for the frontend
//!
//! UI panels never mutate application state directly. They return
//! `AppAction`s, which the app applies in one place. This keeps the panel
//! code free of side effects and lets tests drive the app without a window.

use std::path::PathBuf;

use crate::config::settings::SortField;
use crate::i18n::Language;

/// Actions that any panel can emit
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    // View state
    /// Select a sort column (re-selecting flips the direction)
    SetSortField(SortField),
    /// Flip the tunnel-only filter
    ToggleHideNonTunnelEntries,

    // Backend commands
    /// Ask the source for fresh data now
    RefreshSource,
    /// Pause or resume polling
    TogglePause,
    /// Change the poll interval in milliseconds
    SetPollInterval(u64),
    /// Switch to a JSON snapshot file
    UseJsonSource(PathBuf),
    /// Switch to the synthetic source
    UseMockSource,

    // Preferences
    SetLanguage(Language),
    SetDarkMode(bool),
}
