//! Stateless projections from catalog data to view-models.
//!
//! Nothing here touches the terminal. The controller assembles a [`PageView`]
//! from these pieces and the TUI draws whatever it is handed.

use crate::types::{Episode, Show, ShowId};

/// Label of the episode option that means "no episode filter".
pub const ALL_EPISODES_LABEL: &str = "All episodes";

/// Image shown on cards for episodes without one.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str =
    "https://static.tvmaze.com/images/no-img/no-img-landscape-text.png";

/// Value of the episode selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EpisodeSelection {
    /// The sentinel: every episode of the show
    #[default]
    All,
    /// A single episode by its `S##E##` code
    Code(String),
}

/// One episode, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeCard {
    /// `S##E##`
    pub code: String,
    /// `"{code} - {name}"`
    pub heading: String,
    /// Episode image, or the placeholder
    pub image_url: String,
    /// Summary with its markup interpreted
    pub summary: String,
    /// Air date and runtime, when the catalog has them
    pub details: Option<String>,
    /// Outbound link to the episode page
    pub link: String,
}

/// An entry of the show selector.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowOption {
    pub id: ShowId,
    pub label: String,
    /// Genres, premiere and rating for the picker's detail pane
    pub details: String,
}

/// An entry of the episode selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeOption {
    pub selection: EpisodeSelection,
    pub label: String,
}

/// What fills the main area of the screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// No show chosen yet
    Empty,
    /// A fetch is in flight
    Loading(String),
    /// The last fetch failed; plain text
    Error(String),
    /// Episode cards to show
    Cards(Vec<EpisodeCard>),
}

/// Declarative description of the whole screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub show_options: Vec<ShowOption>,
    /// Why the show list is unavailable, if it is
    pub shows_error: Option<String>,
    pub selected_show: Option<ShowId>,
    pub search_text: String,
    pub episode_options: Vec<EpisodeOption>,
    /// Index into `episode_options`
    pub selected_episode: usize,
    pub content: Content,
    pub status: Option<String>,
}

impl Default for PageView {
    fn default() -> Self {
        Self {
            show_options: Vec::new(),
            shows_error: None,
            selected_show: None,
            search_text: String::new(),
            episode_options: render_episode_options(&[]),
            selected_episode: 0,
            content: Content::Empty,
            status: None,
        }
    }
}

impl PageView {
    /// Label of the show currently selected, if any.
    pub fn selected_show_label(&self) -> Option<&str> {
        let id = self.selected_show?;
        self.show_options
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.label.as_str())
    }

    /// The cards on screen, if the content area holds cards.
    pub fn cards(&self) -> &[EpisodeCard] {
        match &self.content {
            Content::Cards(cards) => cards,
            _ => &[],
        }
    }
}

/// Turn summary markup into terminal text.
///
/// Markup is interpreted rather than escaped: tags become layout and
/// entities are decoded.
pub fn summary_text(markup: &str) -> String {
    nanohtml2text::html2text(markup).trim().to_string()
}

/// Build the card for one episode.
pub fn render_episode_card(episode: &Episode, placeholder: &str) -> EpisodeCard {
    let details = match (&episode.airdate, episode.runtime) {
        (Some(date), Some(minutes)) => Some(format!("Aired {} | {} min", date, minutes)),
        (Some(date), None) => Some(format!("Aired {}", date)),
        (None, Some(minutes)) => Some(format!("{} min", minutes)),
        (None, None) => None,
    };

    EpisodeCard {
        code: episode.code(),
        heading: episode.to_display(),
        image_url: episode
            .image
            .clone()
            .unwrap_or_else(|| placeholder.to_string()),
        summary: episode
            .summary
            .as_deref()
            .map(summary_text)
            .unwrap_or_default(),
        details,
        link: episode.url.clone(),
    }
}

/// One card per episode, in order.
pub fn render_episode_cards<'a, I>(episodes: I, placeholder: &str) -> Vec<EpisodeCard>
where
    I: IntoIterator<Item = &'a Episode>,
{
    episodes
        .into_iter()
        .map(|e| render_episode_card(e, placeholder))
        .collect()
}

/// The status line under the cards.
///
/// # Examples
///
/// ```
/// use tv_browser::view::render_status;
///
/// assert_eq!(render_status(1, 73), "Showing 1 episode of 73 total.");
/// assert_eq!(render_status(0, 73), "Showing 0 episodes of 73 total.");
/// ```
pub fn render_status(shown: usize, total: usize) -> String {
    format!(
        "Showing {} episode{} of {} total.",
        shown,
        if shown == 1 { "" } else { "s" },
        total
    )
}

/// Entries of the show selector, in the order given.
pub fn render_show_options(shows: &[Show]) -> Vec<ShowOption> {
    shows
        .iter()
        .map(|show| {
            let mut details = Vec::new();
            if !show.genres.is_empty() {
                details.push(format!("Genres: {}", show.genres.join(", ")));
            }
            if let Some(premiered) = &show.premiered {
                details.push(format!("Premiered: {}", premiered));
            }
            if let Some(rating) = show.rating {
                details.push(format!("Rating: {:.1}", rating));
            }
            ShowOption {
                id: show.id,
                label: show.to_display(),
                details: details.join("\n"),
            }
        })
        .collect()
}

/// Entries of the episode selector: the sentinel, then one per episode.
pub fn render_episode_options(episodes: &[Episode]) -> Vec<EpisodeOption> {
    std::iter::once(EpisodeOption {
        selection: EpisodeSelection::All,
        label: ALL_EPISODES_LABEL.to_string(),
    })
    .chain(episodes.iter().map(|e| EpisodeOption {
        selection: EpisodeSelection::Code(e.code()),
        label: e.to_display(),
    }))
    .collect()
}
