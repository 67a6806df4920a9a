//! Show/episode browsing state machine.
//!
//! The [`Controller`] owns the session cache and everything the screen shows:
//! which show is loaded, the search text, the episode selection and the
//! episodes they leave visible. Input arrives as [`Control`] values and show
//! selections; output is a [`PageView`].

use crate::api::CatalogClient;
use crate::cache::SessionCache;
use crate::filter::{filter_indices, position_by_code};
use crate::types::{Episode, Show, ShowId};
use crate::view::{
    Content, EpisodeOption, EpisodeSelection, PageView, ShowOption, render_episode_cards,
    render_episode_options, render_show_options, render_status,
};
use log::{debug, info, warn};
use std::sync::Arc;

/// Where the controller is with the selected show.
#[derive(Debug, Clone, PartialEq)]
pub enum ShowState {
    /// Nothing requested yet
    NoShowSelected,
    /// Episodes for `show_id` are being fetched
    Loading { show_id: ShowId },
    /// Episodes for `show_id` are available
    Loaded {
        show_id: ShowId,
        episodes: Arc<[Episode]>,
    },
    /// The last attempt to load `show_id` failed
    Failed { show_id: ShowId, message: String },
}

impl ShowState {
    /// The show this state is about.
    pub fn show_id(&self) -> Option<ShowId> {
        match self {
            ShowState::NoShowSelected => None,
            ShowState::Loading { show_id }
            | ShowState::Loaded { show_id, .. }
            | ShowState::Failed { show_id, .. } => Some(*show_id),
        }
    }
}

/// A change to one of the two episode filters.
///
/// Search and selection are exclusive: applying either one resets the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// New contents of the search box
    Search(String),
    /// New value of the episode selector
    Pick(EpisodeSelection),
}

/// Session context and view state for one browsing session.
pub struct Controller<C>
where
    C: CatalogClient,
{
    cache: SessionCache<C>,
    placeholder_image: String,
    shows: Arc<[Show]>,
    show_options: Vec<ShowOption>,
    shows_error: Option<String>,
    state: ShowState,
    episode_options: Vec<EpisodeOption>,
    search: String,
    selection: EpisodeSelection,
    /// Positions into the loaded episode list
    visible: Vec<usize>,
}

impl<C> Controller<C>
where
    C: CatalogClient,
{
    /// Create a controller with nothing loaded.
    pub fn new(cache: SessionCache<C>, placeholder_image: &str) -> Self {
        Self {
            cache,
            placeholder_image: placeholder_image.to_string(),
            shows: Arc::from(Vec::new()),
            show_options: Vec::new(),
            shows_error: None,
            state: ShowState::NoShowSelected,
            episode_options: render_episode_options(&[]),
            search: String::new(),
            selection: EpisodeSelection::All,
            visible: Vec::new(),
        }
    }

    /// Fill the show selector. Returns whether the list is available.
    pub async fn load_shows(&mut self) -> bool {
        match self.cache.get_shows().await {
            Ok(shows) => {
                info!("Loaded {} shows", shows.len());
                self.show_options = render_show_options(&shows);
                self.shows = shows;
                self.shows_error = None;
                true
            }
            Err(e) => {
                warn!("Failed to load shows: {}", e);
                self.shows_error = Some(format!("Could not load shows. {}", e));
                false
            }
        }
    }

    /// Whether selecting `show_id` will hit the network.
    pub fn needs_fetch(&self, show_id: ShowId) -> bool {
        !self.cache.has_episodes(show_id)
    }

    /// Whether the show list still has to be fetched.
    pub fn needs_shows(&self) -> bool {
        !self.cache.has_shows()
    }

    /// Switch to `show_id`, fetching its episodes unless cached.
    ///
    /// Same as [`Controller::begin_select`] followed by
    /// [`Controller::finish_select`].
    pub async fn select_show(&mut self, show_id: ShowId) {
        self.begin_select(show_id);
        self.finish_select(show_id).await;
    }

    /// First half of a show switch: reset both filters and, when the
    /// episodes are not cached, enter [`ShowState::Loading`].
    ///
    /// Returns whether a fetch is needed, i.e. whether [`Controller::page`]
    /// now describes a loading screen worth drawing.
    pub fn begin_select(&mut self, show_id: ShowId) -> bool {
        self.search.clear();
        self.selection = EpisodeSelection::All;
        self.visible.clear();

        let fetch = self.needs_fetch(show_id);
        if fetch {
            debug!("Fetching episodes for show {}", show_id);
            self.state = ShowState::Loading { show_id };
        }
        fetch
    }

    /// Second half of a show switch: get the episodes and settle on
    /// [`ShowState::Loaded`] or [`ShowState::Failed`].
    ///
    /// A failed show owns the selector: its episode options shrink to the
    /// sentinel and the previous show's filters are not restored. Selecting
    /// the show again retries.
    pub async fn finish_select(&mut self, show_id: ShowId) {
        match self.cache.get_episodes(show_id).await {
            Ok(episodes) => {
                info!("Show {} has {} episodes", show_id, episodes.len());
                self.episode_options = render_episode_options(&episodes);
                self.visible = (0..episodes.len()).collect();
                self.state = ShowState::Loaded { show_id, episodes };
            }
            Err(e) => {
                warn!("Failed to load episodes for show {}: {}", show_id, e);
                self.episode_options = render_episode_options(&[]);
                self.state = ShowState::Failed {
                    show_id,
                    message: format!("Could not load episodes. {}", e),
                };
            }
        }
    }

    /// The search box changed.
    pub fn set_search(&mut self, text: &str) {
        self.apply(Control::Search(text.to_string()));
    }

    /// The episode selector changed.
    pub fn select_episode(&mut self, selection: EpisodeSelection) {
        self.apply(Control::Pick(selection));
    }

    /// Apply a filter change.
    ///
    /// | control        | search  | selection | visible               |
    /// |----------------|---------|-----------|-----------------------|
    /// | `Search(q)`    | `q`     | `All`     | `filter(all, q)`      |
    /// | `Pick(All)`    | cleared | `All`     | all                   |
    /// | `Pick(Code(c))`| cleared | `Code(c)` | the match, or nothing |
    ///
    /// Filtering always starts from the full episode list. Outside
    /// [`ShowState::Loaded`] only the control values change.
    pub fn apply(&mut self, control: Control) {
        let episodes: &[Episode] = match &self.state {
            ShowState::Loaded { episodes, .. } => episodes,
            _ => &[],
        };

        match control {
            Control::Search(text) => {
                self.visible = filter_indices(episodes, &text);
                self.selection = EpisodeSelection::All;
                self.search = text;
            }
            Control::Pick(EpisodeSelection::All) => {
                self.visible = (0..episodes.len()).collect();
                self.selection = EpisodeSelection::All;
                self.search.clear();
            }
            Control::Pick(EpisodeSelection::Code(code)) => {
                self.visible = position_by_code(episodes, &code).into_iter().collect();
                self.selection = EpisodeSelection::Code(code);
                self.search.clear();
            }
        }
    }

    pub fn state(&self) -> &ShowState {
        &self.state
    }

    pub fn search_text(&self) -> &str {
        &self.search
    }

    pub fn selection(&self) -> &EpisodeSelection {
        &self.selection
    }

    /// Shows in selector order (empty until loaded).
    pub fn shows(&self) -> &[Show] {
        &self.shows
    }

    /// Episodes currently eligible for display, in catalog order.
    pub fn visible_episodes(&self) -> Vec<&Episode> {
        match &self.state {
            ShowState::Loaded { episodes, .. } => {
                self.visible.iter().map(|&i| &episodes[i]).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Episode count of the loaded show.
    pub fn total_episodes(&self) -> usize {
        match &self.state {
            ShowState::Loaded { episodes, .. } => episodes.len(),
            _ => 0,
        }
    }

    fn show_label(&self, show_id: ShowId) -> String {
        self.shows
            .iter()
            .find(|s| s.id == show_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("show {}", show_id))
    }

    /// Describe the whole screen.
    pub fn page(&self) -> PageView {
        let content = match &self.state {
            ShowState::NoShowSelected => match &self.shows_error {
                Some(message) => Content::Error(message.clone()),
                None => Content::Empty,
            },
            ShowState::Loading { show_id } => Content::Loading(format!(
                "Loading episodes for {}...",
                self.show_label(*show_id)
            )),
            ShowState::Failed { message, .. } => Content::Error(message.clone()),
            ShowState::Loaded { .. } => Content::Cards(render_episode_cards(
                self.visible_episodes(),
                &self.placeholder_image,
            )),
        };

        let status = match &self.state {
            ShowState::Loaded { .. } => {
                Some(render_status(self.visible.len(), self.total_episodes()))
            }
            _ => None,
        };

        let selected_episode = self
            .episode_options
            .iter()
            .position(|o| o.selection == self.selection)
            .unwrap_or(0);

        PageView {
            show_options: self.show_options.clone(),
            shows_error: self.shows_error.clone(),
            selected_show: self.state.show_id(),
            search_text: self.search.clone(),
            episode_options: self.episode_options.clone(),
            selected_episode,
            content,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NetworkError, Result};
    use std::cell::Cell;

    const LOVE_SHOW: ShowId = 5;
    const BROKEN_SHOW: ShowId = 404;

    /// Twelve episodes, three of which mention "love".
    fn twelve_episodes() -> Vec<Episode> {
        (1..=12)
            .map(|n| {
                let season = if n <= 6 { 1 } else { 2 };
                let number = if n <= 6 { n } else { n - 6 };
                let (name, summary) = match n {
                    2 => ("Love Actually".to_string(), None),
                    7 => ("Departures".to_string(), Some("<p>An old LOVE returns.</p>")),
                    11 => ("Lovers' Quarrel".to_string(), Some("<p>Tension.</p>")),
                    _ => (format!("Chapter {}", n), Some("<p>Nothing much happens.</p>")),
                };
                Episode {
                    id: u64::from(n),
                    season,
                    number,
                    name,
                    summary: summary.map(str::to_string),
                    image: None,
                    url: format!("https://www.tvmaze.com/episodes/{}", n),
                    airdate: None,
                    runtime: None,
                }
            })
            .collect()
    }

    #[derive(Default)]
    struct FakeCatalog {
        episode_fetches: Cell<usize>,
        fail_shows: bool,
    }

    impl CatalogClient for FakeCatalog {
        async fn list_shows(&self) -> Result<Vec<Show>> {
            if self.fail_shows {
                return Err(NetworkError::Transport("offline".to_string()).into());
            }
            Ok(vec![Show {
                id: LOVE_SHOW,
                name: "Love Stories".to_string(),
                genres: vec![],
                premiered: None,
                rating: None,
            }])
        }

        async fn list_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>> {
            self.episode_fetches.set(self.episode_fetches.get() + 1);
            if show_id == BROKEN_SHOW {
                return Err(NetworkError::Status {
                    url: format!("http://catalog/shows/{}/episodes", show_id),
                    status: 500,
                }
                .into());
            }
            Ok(twelve_episodes())
        }
    }

    fn controller() -> Controller<FakeCatalog> {
        Controller::new(SessionCache::new(FakeCatalog::default()), "placeholder.png")
    }

    async fn loaded_controller() -> Controller<FakeCatalog> {
        let mut c = controller();
        c.load_shows().await;
        c.select_show(LOVE_SHOW).await;
        c
    }

    #[test]
    fn test_starts_with_nothing_selected() {
        let c = controller();
        assert_eq!(c.state(), &ShowState::NoShowSelected);
        let page = c.page();
        assert_eq!(page.content, Content::Empty);
        assert!(page.status.is_none());
    }

    #[tokio::test]
    async fn test_select_show_loads_everything() {
        let c = loaded_controller().await;
        let page = c.page();

        assert_eq!(page.cards().len(), 12);
        assert_eq!(page.status.as_deref(), Some("Showing 12 episodes of 12 total."));
        assert_eq!(page.selected_show_label(), Some("Love Stories"));
        assert_eq!(page.episode_options.len(), 13);
        assert_eq!(page.selected_episode, 0);
    }

    #[tokio::test]
    async fn test_search_filters_full_list() {
        let mut c = loaded_controller().await;

        c.set_search("love");
        let codes: Vec<String> = c.visible_episodes().iter().map(|e| e.code()).collect();
        assert_eq!(codes, vec!["S01E02", "S02E01", "S02E05"]);
        assert_eq!(
            c.page().status.as_deref(),
            Some("Showing 3 episodes of 12 total.")
        );

        // narrowing then widening still starts from the full list
        c.set_search("lovers");
        assert_eq!(c.visible_episodes().len(), 1);
        c.set_search("chapter");
        assert_eq!(c.visible_episodes().len(), 9);
    }

    #[tokio::test]
    async fn test_search_miss_shows_nothing() {
        let mut c = loaded_controller().await;
        c.set_search("xyznotfound");

        let page = c.page();
        assert!(page.cards().is_empty());
        assert_eq!(page.status.as_deref(), Some("Showing 0 episodes of 12 total."));
    }

    #[tokio::test]
    async fn test_picking_all_clears_search() {
        let mut c = loaded_controller().await;
        c.set_search("love");
        c.select_episode(EpisodeSelection::All);

        let page = c.page();
        assert_eq!(page.search_text, "");
        assert_eq!(page.cards().len(), 12);
        assert_eq!(page.status.as_deref(), Some("Showing 12 episodes of 12 total."));
    }

    #[tokio::test]
    async fn test_picking_code_shows_one_and_clears_search() {
        let mut c = loaded_controller().await;
        c.set_search("love");
        c.select_episode(EpisodeSelection::Code("S02E03".to_string()));

        let page = c.page();
        assert_eq!(page.search_text, "");
        assert_eq!(page.cards().len(), 1);
        assert_eq!(page.cards()[0].heading, "S02E03 - Chapter 9");
        assert_eq!(page.status.as_deref(), Some("Showing 1 episode of 12 total."));
        assert_eq!(page.episode_options[page.selected_episode].label, "S02E03 - Chapter 9");
    }

    #[tokio::test]
    async fn test_picking_unknown_code_shows_nothing() {
        let mut c = loaded_controller().await;
        c.select_episode(EpisodeSelection::Code("S09E09".to_string()));

        assert!(c.visible_episodes().is_empty());
        assert_eq!(
            c.page().status.as_deref(),
            Some("Showing 0 episodes of 12 total.")
        );
    }

    #[tokio::test]
    async fn test_typing_resets_selection() {
        let mut c = loaded_controller().await;
        c.select_episode(EpisodeSelection::Code("S01E01".to_string()));
        c.set_search("c");

        assert_eq!(c.selection(), &EpisodeSelection::All);
        assert_eq!(c.page().selected_episode, 0);
    }

    #[tokio::test]
    async fn test_reselecting_show_uses_cache_and_resets_filters() {
        let mut c = loaded_controller().await;
        c.set_search("love");

        assert!(!c.needs_fetch(LOVE_SHOW));
        c.select_show(LOVE_SHOW).await;

        assert_eq!(c.search_text(), "");
        assert_eq!(c.visible_episodes().len(), 12);
        assert_eq!(c.cache.client().episode_fetches.get(), 1);
    }

    #[tokio::test]
    async fn test_failed_show_reports_error_and_can_retry() {
        let mut c = loaded_controller().await;
        c.select_show(BROKEN_SHOW).await;

        assert!(matches!(c.state(), ShowState::Failed { show_id: BROKEN_SHOW, .. }));
        let page = c.page();
        match &page.content {
            Content::Error(message) => assert!(message.contains("HTTP 500")),
            other => panic!("expected error content, got {:?}", other),
        }
        assert!(page.status.is_none());
        assert_eq!(page.show_options.len(), 1);

        c.select_show(BROKEN_SHOW).await;
        assert_eq!(c.cache.client().episode_fetches.get(), 3);
    }

    #[tokio::test]
    async fn test_begin_select_shows_loading_until_fetched() {
        let mut c = controller();
        c.load_shows().await;

        assert!(c.begin_select(LOVE_SHOW));
        assert_eq!(c.state(), &ShowState::Loading { show_id: LOVE_SHOW });
        let page = c.page();
        assert_eq!(
            page.content,
            Content::Loading("Loading episodes for Love Stories...".to_string())
        );
        assert!(page.status.is_none());

        c.finish_select(LOVE_SHOW).await;
        assert!(matches!(c.state(), ShowState::Loaded { show_id: LOVE_SHOW, .. }));
        assert_eq!(c.page().cards().len(), 12);
    }

    #[tokio::test]
    async fn test_begin_select_of_cached_show_skips_loading() {
        let mut c = loaded_controller().await;
        c.set_search("love");

        assert!(!c.begin_select(LOVE_SHOW));
        assert!(matches!(c.state(), ShowState::Loaded { .. }));
        assert_eq!(c.search_text(), "");
    }

    #[tokio::test]
    async fn test_failed_show_owns_selector() {
        let mut c = loaded_controller().await;
        c.set_search("love");
        c.select_show(BROKEN_SHOW).await;

        let page = c.page();
        assert_eq!(page.search_text, "");
        assert_eq!(page.episode_options.len(), 1);
        assert_eq!(page.episode_options[0].selection, EpisodeSelection::All);
    }

    #[tokio::test]
    async fn test_search_ignored_while_failed() {
        let mut c = controller();
        c.select_show(BROKEN_SHOW).await;
        c.set_search("love");

        assert!(c.visible_episodes().is_empty());
        assert_eq!(c.search_text(), "love");
    }

    #[tokio::test]
    async fn test_show_list_failure_surfaces_message() {
        let catalog = FakeCatalog {
            fail_shows: true,
            ..Default::default()
        };
        let mut c = Controller::new(SessionCache::new(catalog), "placeholder.png");

        assert!(!c.load_shows().await);
        assert!(c.needs_shows());
        let page = c.page();
        assert!(page.shows_error.is_some());
        assert!(matches!(page.content, Content::Error(_)));
    }

    #[tokio::test]
    async fn test_cards_use_placeholder() {
        let c = loaded_controller().await;
        assert!(c.page().cards().iter().all(|card| card.image_url == "placeholder.png"));
    }
}
