//! Type definitions for the tv-browser application.
//!
//! This module contains the core data structures used throughout the application
//! for representing shows and their episodes.

/// Catalog identifier of a show.
pub type ShowId = u64;

/// A TV series from the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct Show {
    /// Unique identifier for the show.
    pub id: ShowId,

    /// Display name of the show.
    pub name: String,

    /// Genres as listed by the catalog.
    pub genres: Vec<String>,

    /// Premiere date (`YYYY-MM-DD`), if known.
    pub premiered: Option<String>,

    /// Average user rating, if rated.
    pub rating: Option<f64>,
}

impl Show {
    /// Format the show for display in selection menus.
    ///
    /// # Examples
    ///
    /// ```
    /// use tv_browser::types::Show;
    ///
    /// let show = Show {
    ///     id: 82,
    ///     name: "Game of Thrones".to_string(),
    ///     genres: vec![],
    ///     premiered: Some("2011-04-17".to_string()),
    ///     rating: None,
    /// };
    /// assert_eq!(show.to_display(), "Game of Thrones (2011)");
    /// ```
    pub fn to_display(&self) -> String {
        match self.premiered.as_deref().and_then(|d| d.get(..4)) {
            Some(year) => format!("{} ({})", self.name, year),
            None => self.name.clone(),
        }
    }
}

/// An episode of a show.
#[derive(Clone, Debug, PartialEq)]
pub struct Episode {
    /// Unique identifier for the episode.
    pub id: u64,

    /// Season number.
    pub season: u32,

    /// Episode number within the season.
    pub number: u32,

    /// Episode title.
    pub name: String,

    /// Summary as returned by the catalog, HTML markup included.
    pub summary: Option<String>,

    /// Medium-sized image URL.
    pub image: Option<String>,

    /// Canonical page for the episode on the catalog's site.
    pub url: String,

    /// Original air date (`YYYY-MM-DD`).
    pub airdate: Option<String>,

    /// Runtime in minutes.
    pub runtime: Option<u32>,
}

impl Episode {
    /// The `S##E##` code of this episode.
    pub fn code(&self) -> String {
        episode_code(self.season, self.number)
    }

    /// Format the episode for display in selection menus.
    ///
    /// # Examples
    ///
    /// ```
    /// use tv_browser::types::Episode;
    ///
    /// let ep = Episode {
    ///     id: 1,
    ///     season: 1,
    ///     number: 2,
    ///     name: "The Kingsroad".to_string(),
    ///     summary: None,
    ///     image: None,
    ///     url: String::new(),
    ///     airdate: None,
    ///     runtime: None,
    /// };
    /// assert_eq!(ep.to_display(), "S01E02 - The Kingsroad");
    /// ```
    pub fn to_display(&self) -> String {
        format!("{} - {}", self.code(), self.name)
    }
}

/// Format a season/episode pair as `S##E##`.
///
/// Both numbers are padded to at least two digits; wider numbers are kept
/// whole.
///
/// # Examples
///
/// ```
/// use tv_browser::types::episode_code;
///
/// assert_eq!(episode_code(1, 2), "S01E02");
/// assert_eq!(episode_code(12, 5), "S12E05");
/// assert_eq!(episode_code(2, 100), "S02E100");
/// ```
pub fn episode_code(season: u32, number: u32) -> String {
    format!("S{:02}E{:02}", season, number)
}
