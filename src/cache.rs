//! Session-lifetime memoization of catalog responses.
//!
//! [`SessionCache`] wraps a [`CatalogClient`] and remembers the show list and
//! every episode list it has fetched. Nothing is ever evicted; failed fetches
//! are not remembered, so the next call simply asks the catalog again.

use crate::api::CatalogClient;
use crate::error::Result;
use crate::types::{Episode, Show, ShowId};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// A caching wrapper around a catalog client.
pub struct SessionCache<C>
where
    C: CatalogClient,
{
    /// The underlying catalog client
    client: C,
    /// All shows, sorted by name, once fetched
    shows: Option<Arc<[Show]>>,
    /// Episode lists by show, in catalog order
    episodes: HashMap<ShowId, Arc<[Episode]>>,
}

impl<C> SessionCache<C>
where
    C: CatalogClient,
{
    /// Creates an empty cache in front of `client`.
    pub fn new(client: C) -> Self {
        Self {
            client,
            shows: None,
            episodes: HashMap::new(),
        }
    }

    /// The wrapped client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// All shows, sorted case-insensitively by name.
    ///
    /// Fetched on first use. The sort is stable, so shows whose names only
    /// differ in case keep their catalog order.
    pub async fn get_shows(&mut self) -> Result<Arc<[Show]>> {
        if let Some(shows) = &self.shows {
            debug!("Show list served from cache");
            return Ok(Arc::clone(shows));
        }

        let mut shows = self.client.list_shows().await?;
        shows.sort_by_cached_key(|show| show.name.to_lowercase());

        let shows: Arc<[Show]> = shows.into();
        self.shows = Some(Arc::clone(&shows));
        Ok(shows)
    }

    /// Episodes of `show_id`, in catalog order. Fetched on first use.
    pub async fn get_episodes(&mut self, show_id: ShowId) -> Result<Arc<[Episode]>> {
        if let Some(episodes) = self.episodes.get(&show_id) {
            debug!("Episodes for show {} served from cache", show_id);
            return Ok(Arc::clone(episodes));
        }

        let episodes: Arc<[Episode]> = self.client.list_episodes(show_id).await?.into();
        self.episodes.insert(show_id, Arc::clone(&episodes));
        Ok(episodes)
    }

    /// Whether the episodes of `show_id` can be served without a fetch.
    pub fn has_episodes(&self, show_id: ShowId) -> bool {
        self.episodes.contains_key(&show_id)
    }

    /// Whether the show list can be served without a fetch.
    pub fn has_shows(&self) -> bool {
        self.shows.is_some()
    }
}
