//! A terminal TV show browser written in Rust.
//!
//! tv-browser lists the shows of the public TVMaze catalog, shows the episodes
//! of the selected show as cards, filters them as you type and jumps straight
//! to a single episode by its `S##E##` code.
//!
//! # Features
//!
//! - Pick any show from the catalog, sorted by name
//! - Live, case-insensitive search over episode names and summaries
//! - Jump to a single episode from the episode selector
//! - Open an episode's page in the browser
//! - Every catalog response is fetched at most once per session
//!
//! # Usage
//!
//! ```bash
//! # Open the default show
//! cargo run
//!
//! # Open a specific show
//! cargo run -- --show 169
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod tui;
pub mod types;
pub mod view;
