//! Terminal User Interface for tv-browser using ratatui.
//!
//! This module draws the [`PageView`](crate::view::PageView) built by the
//! controller and turns key presses into [`Action`]s.

mod render;
mod state;
mod types;

pub use render::draw;
pub use state::App;
pub use types::{Action, Overlay};

use crossterm::event::{self, Event};
use std::io;
use std::time::Duration;

/// Poll for keyboard events with a timeout.
pub fn poll_event(timeout: Duration) -> io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}
