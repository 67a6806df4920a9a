//! Application state management and input handling.

use crate::config::Keybindings;
use crate::view::{Content, PageView};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;

use super::types::{Action, Overlay};

/// Application state for the TUI.
///
/// Everything about shows and episodes lives in `page`; the rest is purely
/// about the terminal (which popup is open, which row is highlighted).
pub struct App {
    /// Latest screen description from the controller
    pub page: PageView,
    /// Popup currently open
    pub overlay: Overlay,
    /// Whether the search box has keyboard focus
    pub search_focused: bool,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Highlighted episode card
    pub card_list_state: ListState,
    /// Highlighted entry of the show picker
    pub show_list_state: ListState,
    /// Highlighted entry of the episode picker
    pub episode_list_state: ListState,
    /// Shown instead of the content while the show list is fetched
    pub loading_message: Option<String>,
    /// Error popup text
    pub error_message: Option<String>,
    /// Custom keybindings
    pub keybindings: Keybindings,
}

impl App {
    /// Create a new App with an empty page.
    pub fn new(keybindings: Keybindings) -> Self {
        Self {
            page: PageView::default(),
            overlay: Overlay::None,
            search_focused: false,
            should_quit: false,
            card_list_state: ListState::default(),
            show_list_state: ListState::default(),
            episode_list_state: ListState::default(),
            loading_message: None,
            error_message: None,
            keybindings,
        }
    }

    /// Replace the page and keep the card highlight in range.
    pub fn set_page(&mut self, page: PageView) {
        self.page = page;
        self.loading_message = None;

        let len = self.page.cards().len();
        if len == 0 {
            self.card_list_state.select(None);
        } else {
            let i = self.card_list_state.selected().unwrap_or(0).min(len - 1);
            self.card_list_state.select(Some(i));
        }
    }

    /// Show a loading message until the next [`App::set_page`].
    pub fn set_loading(&mut self, message: &str) {
        self.loading_message = Some(message.to_string());
    }

    /// Set an error message.
    pub fn set_error(&mut self, message: &str) {
        self.error_message = Some(message.to_string());
    }

    /// Clear error message.
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Whether the main area is showing a loading message.
    pub fn is_loading(&self) -> bool {
        self.loading_message.is_some() || matches!(self.page.content, Content::Loading(_))
    }

    /// Handle keyboard input and return an action.
    pub fn handle_input(&mut self, key: KeyEvent) -> Action {
        // Global quit with Ctrl+C or Ctrl+Q
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => {
                    self.should_quit = true;
                    return Action::Quit;
                }
                _ => {}
            }
        }

        // Any key dismisses the error popup
        if self.error_message.is_some() {
            self.clear_error();
            return Action::None;
        }

        if self.search_focused {
            return self.handle_search_input(key);
        }

        match self.overlay {
            Overlay::Help => {
                if key.code == KeyCode::Esc
                    || self.keybindings.matches(&self.keybindings.help, &key)
                    || self.keybindings.matches(&self.keybindings.quit, &key)
                {
                    self.overlay = Overlay::None;
                }
                Action::None
            }
            Overlay::ShowPicker => self.handle_show_picker_input(key),
            Overlay::EpisodePicker => self.handle_episode_picker_input(key),
            Overlay::None => self.handle_main_input(key),
        }
    }

    fn handle_search_input(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.search_focused = false;
                Action::None
            }
            KeyCode::Char(c) => {
                let mut text = self.page.search_text.clone();
                text.push(c);
                self.card_list_state.select(Some(0));
                Action::Search(text)
            }
            KeyCode::Backspace => {
                let mut text = self.page.search_text.clone();
                if text.pop().is_none() {
                    return Action::None;
                }
                self.card_list_state.select(Some(0));
                Action::Search(text)
            }
            _ => Action::None,
        }
    }

    fn handle_main_input(&mut self, key: KeyEvent) -> Action {
        let card_count = self.page.cards().len();

        if self.keybindings.matches(&self.keybindings.up, &key) {
            let i = self.card_list_state.selected().unwrap_or(0);
            if i > 0 {
                self.card_list_state.select(Some(i - 1));
            }
            Action::None
        } else if self.keybindings.matches(&self.keybindings.down, &key) {
            let i = self.card_list_state.selected().unwrap_or(0);
            if i < card_count.saturating_sub(1) {
                self.card_list_state.select(Some(i + 1));
            }
            Action::None
        } else if self.keybindings.matches(&self.keybindings.search, &key) {
            self.search_focused = true;
            Action::None
        } else if self.keybindings.matches(&self.keybindings.shows, &key) {
            self.open_show_picker()
        } else if self.keybindings.matches(&self.keybindings.episodes, &key) {
            self.open_episode_picker();
            Action::None
        } else if self.keybindings.matches(&self.keybindings.open, &key)
            || self.keybindings.matches(&self.keybindings.select, &key)
        {
            match self.card_list_state.selected() {
                Some(i) if i < card_count => Action::OpenLink(self.page.cards()[i].link.clone()),
                _ => Action::None,
            }
        } else if self.keybindings.matches(&self.keybindings.help, &key) {
            self.overlay = Overlay::Help;
            Action::None
        } else if self.keybindings.matches(&self.keybindings.quit, &key) {
            self.should_quit = true;
            Action::Quit
        } else {
            Action::None
        }
    }

    fn open_show_picker(&mut self) -> Action {
        if self.page.show_options.is_empty() {
            // Nothing to pick from; fetch the list again
            return Action::ReloadShows;
        }

        let current = self
            .page
            .selected_show
            .and_then(|id| self.page.show_options.iter().position(|o| o.id == id))
            .unwrap_or(0);
        self.show_list_state.select(Some(current));
        self.overlay = Overlay::ShowPicker;
        Action::None
    }

    fn open_episode_picker(&mut self) {
        self.episode_list_state
            .select(Some(self.page.selected_episode));
        self.overlay = Overlay::EpisodePicker;
    }

    fn handle_show_picker_input(&mut self, key: KeyEvent) -> Action {
        let len = self.page.show_options.len();

        if self.keybindings.matches(&self.keybindings.up, &key) {
            let i = self.show_list_state.selected().unwrap_or(0);
            if i > 0 {
                self.show_list_state.select(Some(i - 1));
            }
            Action::None
        } else if self.keybindings.matches(&self.keybindings.down, &key) {
            let i = self.show_list_state.selected().unwrap_or(0);
            if i < len.saturating_sub(1) {
                self.show_list_state.select(Some(i + 1));
            }
            Action::None
        } else if self.keybindings.matches(&self.keybindings.select, &key) {
            self.overlay = Overlay::None;
            match self.show_list_state.selected() {
                Some(i) if i < len => {
                    self.card_list_state.select(Some(0));
                    Action::SelectShow(self.page.show_options[i].id)
                }
                _ => Action::None,
            }
        } else if self.keybindings.matches(&self.keybindings.back, &key)
            || self.keybindings.matches(&self.keybindings.shows, &key)
        {
            self.overlay = Overlay::None;
            Action::None
        } else {
            Action::None
        }
    }

    fn handle_episode_picker_input(&mut self, key: KeyEvent) -> Action {
        let len = self.page.episode_options.len();

        if self.keybindings.matches(&self.keybindings.up, &key) {
            let i = self.episode_list_state.selected().unwrap_or(0);
            if i > 0 {
                self.episode_list_state.select(Some(i - 1));
            }
            Action::None
        } else if self.keybindings.matches(&self.keybindings.down, &key) {
            let i = self.episode_list_state.selected().unwrap_or(0);
            if i < len.saturating_sub(1) {
                self.episode_list_state.select(Some(i + 1));
            }
            Action::None
        } else if self.keybindings.matches(&self.keybindings.select, &key) {
            self.overlay = Overlay::None;
            match self.episode_list_state.selected() {
                Some(i) if i < len => {
                    self.card_list_state.select(Some(0));
                    Action::SelectEpisode(self.page.episode_options[i].selection.clone())
                }
                _ => Action::None,
            }
        } else if self.keybindings.matches(&self.keybindings.back, &key)
            || self.keybindings.matches(&self.keybindings.episodes, &key)
        {
            self.overlay = Overlay::None;
            Action::None
        } else {
            Action::None
        }
    }
}
