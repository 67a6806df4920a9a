//! API client for the TVMaze catalog.
//!
//! This module provides the [`CatalogClient`] seam used by the session cache and
//! its reqwest implementation, [`TvMazeClient`], which lists all shows and the
//! episodes of a single show.

use crate::error::{NetworkError, Result};
use crate::types::{Episode, Show, ShowId};
use log::{debug, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Public TVMaze API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.tvmaze.com";

const USER_AGENT: &str = concat!("tv-browser/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout. Requests are attempted exactly once.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Read access to a remote show catalog.
///
/// Every call is a single attempt; retrying is up to the caller.
#[allow(async_fn_in_trait)]
pub trait CatalogClient {
    /// List every show in the catalog, in catalog order.
    async fn list_shows(&self) -> Result<Vec<Show>>;

    /// List the episodes of one show, in catalog order.
    async fn list_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>>;
}

// Response types for /shows
#[derive(Debug, Deserialize)]
struct TvMazeShow {
    id: ShowId,
    name: String,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    premiered: Option<String>,
    #[serde(default)]
    rating: Option<TvMazeRating>,
}

#[derive(Debug, Deserialize)]
struct TvMazeRating {
    #[serde(default)]
    average: Option<f64>,
}

// Response types for /shows/{id}/episodes
#[derive(Debug, Deserialize)]
struct TvMazeEpisode {
    id: u64,
    season: u32,
    /// Null for specials
    #[serde(default)]
    number: Option<u32>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    image: Option<TvMazeImage>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    airdate: Option<String>,
    #[serde(default)]
    runtime: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TvMazeImage {
    #[serde(default)]
    medium: Option<String>,
    #[serde(default)]
    original: Option<String>,
}

fn convert_show(raw: TvMazeShow) -> Show {
    Show {
        id: raw.id,
        name: raw.name,
        genres: raw.genres,
        premiered: raw.premiered.filter(|d| !d.is_empty()),
        rating: raw.rating.and_then(|r| r.average),
    }
}

fn convert_episode(raw: TvMazeEpisode) -> Episode {
    Episode {
        id: raw.id,
        season: raw.season,
        number: raw.number.unwrap_or(0),
        name: raw.name.unwrap_or_else(|| "Unknown".to_string()),
        summary: raw.summary,
        image: raw.image.and_then(|img| img.medium.or(img.original)),
        url: raw.url,
        airdate: raw.airdate.filter(|d| !d.is_empty()),
        runtime: raw.runtime,
    }
}

/// Catalog client for the TVMaze REST API.
#[derive(Debug, Clone)]
pub struct TvMazeClient {
    client: reqwest::Client,
    base_url: String,
}

impl TvMazeClient {
    /// Create a client talking to `base_url` (e.g. [`DEFAULT_BASE_URL`]).
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and decode the JSON body.
    ///
    /// Non-success statuses become [`NetworkError::Status`]; bodies that do
    /// not decode become [`NetworkError::Decode`].
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} returned {}", url, status);
            return Err(NetworkError::Status {
                url,
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str(&body).map_err(|e| {
            warn!("Failed to decode response from {}: {}", url, e);
            NetworkError::Decode(format!("{}: {}", url, e))
        })?;

        Ok(parsed)
    }
}

impl CatalogClient for TvMazeClient {
    async fn list_shows(&self) -> Result<Vec<Show>> {
        let raw: Vec<TvMazeShow> = self.get_json("/shows").await?;
        let shows: Vec<Show> = raw.into_iter().map(convert_show).collect();

        debug!("Fetched {} shows", shows.len());

        Ok(shows)
    }

    async fn list_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>> {
        let raw: Vec<TvMazeEpisode> = self
            .get_json(&format!("/shows/{}/episodes", show_id))
            .await?;
        let episodes: Vec<Episode> = raw.into_iter().map(convert_episode).collect();

        debug!("Fetched {} episodes for show {}", episodes.len(), show_id);

        Ok(episodes)
    }
}
