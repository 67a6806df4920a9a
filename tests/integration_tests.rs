//! Integration tests for tv-browser.
//!
//! These tests run the real TVMaze client against a small HTTP server on
//! localhost that serves canned catalog responses.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tv_browser::api::{CatalogClient, TvMazeClient};
use tv_browser::cache::SessionCache;
use tv_browser::controller::{Controller, ShowState};
use tv_browser::error::{AppError, NetworkError};
use tv_browser::view::{Content, EpisodeSelection};

const SHOWS: &str = r#"[
    {"id": 2, "name": "archer", "genres": ["Comedy"], "premiered": "2009-09-17", "rating": {"average": 8.1}},
    {"id": 3, "name": "Bones", "genres": [], "premiered": null, "rating": {"average": null}},
    {"id": 1, "name": "Archer", "genres": ["Action"], "premiered": "2009-09-17", "rating": {"average": 8.0}}
]"#;

/// Twelve episodes; "love" appears in two names and one summary.
fn episodes_json() -> String {
    let episodes: Vec<String> = (1..=12)
        .map(|n| {
            let name = match n {
                3 => "Love Bites".to_string(),
                8 => "Lovesick".to_string(),
                _ => format!("Mission {}", n),
            };
            let summary = if n == 10 {
                "\"<p>Sterling falls in <i>love</i>.</p>\"".to_string()
            } else {
                "null".to_string()
            };
            format!(
                r#"{{"id": {id}, "url": "https://www.tvmaze.com/episodes/{id}", "name": "{name}",
                    "season": 1, "number": {n}, "airdate": "2010-01-{n:02}", "runtime": 30,
                    "image": null, "summary": {summary}}}"#,
                id = 1000 + n,
                name = name,
                n = n,
                summary = summary
            )
        })
        .collect();
    format!("[{}]", episodes.join(","))
}

/// Serve canned responses by path; counts every request it answers.
async fn spawn_catalog() -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            counter.fetch_add(1, Ordering::SeqCst);

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let request = String::from_utf8_lossy(&request);
            let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

            let (status, body) = match path.as_str() {
                "/shows" => ("200 OK", SHOWS.to_string()),
                "/shows/82/episodes" => ("200 OK", episodes_json()),
                "/shows/13/episodes" => ("200 OK", "{\"not\": \"a list\"".to_string()),
                _ => ("404 Not Found", "{\"name\":\"Not Found\",\"status\":404}".to_string()),
            };

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (addr, hits)
}

fn client_for(addr: SocketAddr) -> TvMazeClient {
    TvMazeClient::new(&format!("http://{}", addr)).unwrap()
}

#[tokio::test]
async fn test_list_shows_decodes_catalog() {
    let (addr, _) = spawn_catalog().await;
    let shows = client_for(addr).list_shows().await.unwrap();

    assert_eq!(shows.len(), 3);
    assert_eq!(shows[0].name, "archer");
    assert_eq!(shows[1].rating, None);
    assert_eq!(shows[2].genres, vec!["Action"]);
}

#[tokio::test]
async fn test_list_episodes_keeps_catalog_order() {
    let (addr, _) = spawn_catalog().await;
    let episodes = client_for(addr).list_episodes(82).await.unwrap();

    assert_eq!(episodes.len(), 12);
    assert_eq!(episodes[0].code(), "S01E01");
    assert_eq!(episodes[11].code(), "S01E12");
    assert_eq!(episodes[2].name, "Love Bites");
    assert_eq!(episodes[0].airdate.as_deref(), Some("2010-01-01"));
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let (addr, _) = spawn_catalog().await;
    let err = client_for(addr).list_episodes(999).await.unwrap_err();

    match err {
        AppError::Network(NetworkError::Status { url, status }) => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/shows/999/episodes"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let (addr, _) = spawn_catalog().await;
    let err = client_for(addr).list_episodes(13).await.unwrap_err();

    assert!(matches!(err, AppError::Network(NetworkError::Decode(_))));
}

#[tokio::test]
async fn test_refused_connection_is_transport_error() {
    // Grab a free port, then close it again
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let err = client_for(addr).list_shows().await.unwrap_err();

    assert!(matches!(err, AppError::Network(NetworkError::Transport(_))));
}

#[tokio::test]
async fn test_cache_sorts_shows_and_fetches_each_list_once() {
    let (addr, hits) = spawn_catalog().await;
    let mut cache = SessionCache::new(client_for(addr));

    let shows = cache.get_shows().await.unwrap();
    let ids: Vec<u64> = shows.iter().map(|s| s.id).collect();
    // "archer" and "Archer" tie; catalog order breaks the tie
    assert_eq!(ids, vec![2, 1, 3]);

    cache.get_shows().await.unwrap();
    cache.get_episodes(82).await.unwrap();
    cache.get_episodes(82).await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_failed_fetch_is_retried_on_next_call() {
    let (addr, hits) = spawn_catalog().await;
    let mut cache = SessionCache::new(client_for(addr));

    assert!(cache.get_episodes(999).await.is_err());
    assert!(cache.get_episodes(999).await.is_err());

    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_browsing_session() {
    let (addr, _) = spawn_catalog().await;
    let mut controller = Controller::new(SessionCache::new(client_for(addr)), "placeholder.png");

    assert!(controller.load_shows().await);
    controller.select_show(82).await;
    assert!(matches!(controller.state(), ShowState::Loaded { show_id: 82, .. }));

    // Typing "love" matches two names and a summary
    controller.set_search("love");
    let page = controller.page();
    let headings: Vec<&str> = page.cards().iter().map(|c| c.heading.as_str()).collect();
    assert_eq!(
        headings,
        vec!["S01E03 - Love Bites", "S01E08 - Lovesick", "S01E10 - Mission 10"]
    );
    assert_eq!(page.status.as_deref(), Some("Showing 3 episodes of 12 total."));

    // Picking "All episodes" clears the search box and restores everything
    controller.select_episode(EpisodeSelection::All);
    let page = controller.page();
    assert_eq!(page.search_text, "");
    assert_eq!(page.cards().len(), 12);
    assert_eq!(page.status.as_deref(), Some("Showing 12 episodes of 12 total."));

    // A search that matches nothing
    controller.set_search("xyznotfound");
    let page = controller.page();
    assert!(page.cards().is_empty());
    assert_eq!(page.status.as_deref(), Some("Showing 0 episodes of 12 total."));

    // Jumping to one episode
    controller.select_episode(EpisodeSelection::Code("S01E08".to_string()));
    let page = controller.page();
    assert_eq!(page.search_text, "");
    assert_eq!(page.cards().len(), 1);
    assert_eq!(page.cards()[0].image_url, "placeholder.png");
    assert_eq!(page.status.as_deref(), Some("Showing 1 episode of 12 total."));
}

#[tokio::test]
async fn test_failed_show_shows_error_message() {
    let (addr, _) = spawn_catalog().await;
    let mut controller = Controller::new(SessionCache::new(client_for(addr)), "placeholder.png");

    controller.select_show(999).await;
    match controller.page().content {
        Content::Error(message) => assert!(message.contains("404")),
        other => panic!("expected error content, got {:?}", other),
    }
}

/// Episode codes through the public API.
#[test]
fn test_episode_code_integration() {
    use tv_browser::types::episode_code;

    assert_eq!(episode_code(1, 2), "S01E02");
    assert_eq!(episode_code(10, 10), "S10E10");
    assert_eq!(episode_code(100, 7), "S100E07");
}

/// A partial config file keeps defaults for everything it leaves out.
#[test]
fn test_config_overrides_integration() {
    use tv_browser::api::DEFAULT_BASE_URL;
    use tv_browser::config::{Config, DEFAULT_SHOW_ID};

    let config = Config::parse("default_show_id = 169\n").unwrap();
    assert_eq!(config.default_show_id, 169);
    assert_eq!(config.base_url, DEFAULT_BASE_URL);

    let defaults = Config::parse("").unwrap();
    assert_eq!(defaults.default_show_id, DEFAULT_SHOW_ID);

    let err = Config::parse("[keybindings]\nquit = [\"NotAKey\"]\n").unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
}
