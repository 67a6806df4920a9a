//! TUI type definitions for overlays and actions.

use crate::types::ShowId;
use crate::view::EpisodeSelection;

/// Popup drawn over the main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// Nothing open
    None,
    /// Choosing a show
    ShowPicker,
    /// Choosing an episode (or "All episodes")
    EpisodePicker,
    /// Key reference
    Help,
}

/// Actions that can be returned from the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No action, continue running
    None,
    /// Quit the application
    Quit,
    /// Load the episodes of a show
    SelectShow(ShowId),
    /// Fetch the show list again after a failure
    ReloadShows,
    /// The search box now holds this text
    Search(String),
    /// The episode selector changed
    SelectEpisode(EpisodeSelection),
    /// Open an episode page in the browser
    OpenLink(String),
}
