//! Episode search and lookup by code.
//!
//! Both functions are pure: they never reorder their input and never look at
//! anything besides the episodes they are given.

use crate::types::Episode;

/// Whether `episode` matches an already lower-cased query.
///
/// The summary is searched as raw markup, so tag names match too.
fn matches_folded(episode: &Episode, folded_query: &str) -> bool {
    episode.name.to_lowercase().contains(folded_query)
        || episode
            .summary
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
            .contains(folded_query)
}

/// Positions in `episodes` whose name or summary contains `query`,
/// ignoring case. An empty query matches every episode.
pub fn filter_indices(episodes: &[Episode], query: &str) -> Vec<usize> {
    let folded = query.to_lowercase();
    episodes
        .iter()
        .enumerate()
        .filter(|(_, e)| matches_folded(e, &folded))
        .map(|(i, _)| i)
        .collect()
}

/// Episodes whose name or summary contains `query`, ignoring case, in input
/// order.
///
/// # Examples
///
/// ```
/// use tv_browser::filter::filter_episodes;
/// use tv_browser::types::Episode;
///
/// let ep = Episode {
///     id: 1,
///     season: 1,
///     number: 1,
///     name: "Pilot".to_string(),
///     summary: Some("<p>Walter gets the news.</p>".to_string()),
///     image: None,
///     url: String::new(),
///     airdate: None,
///     runtime: None,
/// };
/// let episodes = vec![ep];
/// assert_eq!(filter_episodes(&episodes, "WALTER").len(), 1);
/// assert!(filter_episodes(&episodes, "jesse").is_empty());
/// ```
pub fn filter_episodes<'a>(episodes: &'a [Episode], query: &str) -> Vec<&'a Episode> {
    filter_indices(episodes, query)
        .into_iter()
        .map(|i| &episodes[i])
        .collect()
}

/// Position of the first episode whose `S##E##` code equals `code`.
pub fn position_by_code(episodes: &[Episode], code: &str) -> Option<usize> {
    episodes.iter().position(|e| e.code() == code)
}

/// The first episode whose `S##E##` code equals `code` exactly.
pub fn find_by_code<'a>(episodes: &'a [Episode], code: &str) -> Option<&'a Episode> {
    position_by_code(episodes, code).map(|i| &episodes[i])
}
