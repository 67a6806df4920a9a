//! UI rendering functions for the TUI.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use textwrap::{Options as WrapOptions, WrapAlgorithm, core::display_width, wrap};

use super::state::App;
use super::types::Overlay;
use crate::view::{Content, EpisodeCard};

/// Draw the UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();

    // Same top-to-bottom order as the controls they stand for
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Show selector
            Constraint::Length(3), // Search box
            Constraint::Length(3), // Episode selector
            Constraint::Min(0),    // Episode cards
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Key hints
        ])
        .split(size);

    draw_show_selector(frame, app, chunks[0]);
    draw_search_bar(frame, app, chunks[1]);
    draw_episode_selector(frame, app, chunks[2]);
    draw_content(frame, app, chunks[3]);
    draw_status(frame, app, chunks[4]);
    draw_footer(frame, app, chunks[5]);

    match app.overlay {
        Overlay::ShowPicker => draw_show_picker(frame, app),
        Overlay::EpisodePicker => draw_episode_picker(frame, app),
        Overlay::Help => draw_help_modal(frame),
        Overlay::None => {}
    }

    if let Some(error) = &app.error_message {
        draw_error_popup(frame, error);
    }
}

fn draw_show_selector(frame: &mut Frame, app: &App, area: Rect) {
    let label = match (app.page.selected_show_label(), app.page.selected_show) {
        (Some(label), _) => label.to_string(),
        (None, Some(id)) => format!("Show #{}", id),
        (None, None) => "No show selected".to_string(),
    };

    let hint = match &app.page.shows_error {
        Some(_) => Span::styled(
            "  (show list unavailable, press s to retry)",
            Style::default().fg(Color::Red),
        ),
        None => Span::styled(
            format!("  ({} shows)", app.page.show_options.len()),
            Style::default().fg(Color::DarkGray),
        ),
    };

    let selector = Paragraph::new(Line::from(vec![
        Span::styled(
            label,
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        hint,
    ]))
    .block(Block::default().borders(Borders::ALL).title("Show [s]"));

    frame.render_widget(selector, area);
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.search_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let search_text = if app.page.search_text.is_empty() && !app.search_focused {
        "Press '/' to search episodes..."
    } else {
        &app.page.search_text
    };

    let search = Paragraph::new(search_text)
        .style(if app.search_focused {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Search [/]")
                .border_style(border_style),
        );

    frame.render_widget(search, area);

    if app.search_focused {
        frame.set_cursor_position((search_cursor_x(area, &app.page.search_text), area.y + 1));
    }
}

/// Column of the cursor after `text`, kept inside the box borders.
fn search_cursor_x(area: Rect, text: &str) -> u16 {
    let width = u16::try_from(display_width(text)).unwrap_or(u16::MAX);
    let last = area.x + area.width.saturating_sub(2);
    area.x.saturating_add(1).saturating_add(width).min(last)
}

fn draw_episode_selector(frame: &mut Frame, app: &App, area: Rect) {
    let label = app
        .page
        .episode_options
        .get(app.page.selected_episode)
        .map(|o| o.label.as_str())
        .unwrap_or_default();

    let selector = Paragraph::new(label)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title("Episode [e]"));

    frame.render_widget(selector, area);
}

fn draw_content(frame: &mut Frame, app: &mut App, area: Rect) {
    if let Some(message) = &app.loading_message {
        draw_loading(frame, message, area);
        return;
    }

    match &app.page.content {
        Content::Empty => draw_welcome(frame, area),
        Content::Loading(message) => draw_loading(frame, message, area),
        Content::Error(message) => {
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .block(Block::default().borders(Borders::ALL).title("Episodes"))
                .wrap(Wrap { trim: true });
            frame.render_widget(error, area);
        }
        Content::Cards(cards) => {
            // Two columns for the border, three for the highlight symbol
            let width = area.width.saturating_sub(5).max(10) as usize;
            let items: Vec<ListItem> = cards.iter().map(|c| card_item(c, width)).collect();

            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title("Episodes"))
                .highlight_style(Style::default().bg(Color::DarkGray))
                .highlight_symbol("> ");

            frame.render_stateful_widget(list, area, &mut app.card_list_state);
        }
    }
}

fn card_item(card: &EpisodeCard, width: usize) -> ListItem<'static> {
    let mut lines = vec![Line::from(Span::styled(
        card.heading.clone(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))];

    if let Some(details) = &card.details {
        lines.push(Line::from(Span::styled(
            details.clone(),
            Style::default().fg(Color::Green),
        )));
    }

    lines.push(Line::from(Span::styled(
        format!("Image: {}", card.image_url),
        Style::default().fg(Color::DarkGray),
    )));

    for paragraph in card.summary.lines() {
        for line in wrap_summary(paragraph, width) {
            lines.push(Line::from(line));
        }
    }

    lines.push(Line::from(Span::styled(
        card.link.clone(),
        Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::UNDERLINED),
    )));
    lines.push(Line::from(""));

    ListItem::new(Text::from(lines))
}

/// Wrap one summary paragraph to `width` terminal columns.
///
/// Wide characters count double and words longer than a line are split.
fn wrap_summary(text: &str, width: usize) -> Vec<String> {
    let options = WrapOptions::new(width).wrap_algorithm(WrapAlgorithm::FirstFit);
    wrap(text, options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

fn draw_welcome(frame: &mut Frame, area: Rect) {
    let welcome = Paragraph::new(
        "Welcome to tv-browser!\n\n\
        - Press 's' to pick a show\n\
        - Press '/' to search its episodes\n\
        - Press 'e' to jump to a single episode\n\n\
        Keyboard shortcuts:\n\
        - j/k or arrows: Navigate\n\
        - o or Enter: Open episode page\n\
        - ?: Help\n\
        - q: Quit",
    )
    .block(Block::default().borders(Borders::ALL).title("Welcome"))
    .wrap(Wrap { trim: true });

    frame.render_widget(welcome, area);
}

fn draw_loading(frame: &mut Frame, message: &str, area: Rect) {
    let loading = Paragraph::new(message)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title("Loading"));

    frame.render_widget(loading, area);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let text = if app.is_loading() {
        ""
    } else {
        app.page.status.as_deref().unwrap_or_default()
    };
    let status = Paragraph::new(text).style(Style::default().fg(Color::White));
    frame.render_widget(status, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = if app.search_focused {
        "[type] filter  [Enter/Esc] done"
    } else {
        match app.overlay {
            Overlay::None => {
                "[s] show  [/] search  [e] episode  [↑↓] scroll  [o] open  [?] help  [q] quit"
            }
            Overlay::ShowPicker | Overlay::EpisodePicker => {
                "[↑↓] navigate  [Enter] select  [Esc] close"
            }
            Overlay::Help => "[Esc/?] close",
        }
    };

    let footer = Paragraph::new(help_text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}

fn draw_show_picker(frame: &mut Frame, app: &mut App) {
    let area = centered_rect(70, 80, frame.area());
    frame.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(area);

    let items: Vec<ListItem> = app
        .page
        .show_options
        .iter()
        .map(|o| ListItem::new(o.label.as_str()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Select Show")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], &mut app.show_list_state);

    let details = app
        .show_list_state
        .selected()
        .and_then(|i| app.page.show_options.get(i))
        .map(|o| o.details.as_str())
        .unwrap_or_default();

    let details_widget = Paragraph::new(details)
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .wrap(Wrap { trim: true });

    frame.render_widget(details_widget, chunks[1]);
}

fn draw_episode_picker(frame: &mut Frame, app: &mut App) {
    let area = centered_rect(60, 80, frame.area());
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = app
        .page
        .episode_options
        .iter()
        .map(|o| ListItem::new(o.label.as_str()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Jump to Episode")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.episode_list_state);
}

fn draw_error_popup(frame: &mut Frame, error: &str) {
    let area = centered_rect(60, 20, frame.area());
    frame.render_widget(Clear, area);

    let popup = Paragraph::new(error)
        .style(Style::default().fg(Color::Red))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Error")
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(popup, area);
}

fn draw_help_modal(frame: &mut Frame) {
    let area = centered_rect(70, 80, frame.area());
    frame.render_widget(Clear, area);

    let content = "\
Global Commands
───────────────
  ?           Show/hide this help
  Ctrl+C      Force quit
  q           Quit

Browsing
────────
  s           Choose a show
  /           Search episode names and summaries
  e           Jump to one episode (or back to all)
  j / ↓       Next card
  k / ↑       Previous card
  o / Enter   Open the episode page in a browser

Search Box
──────────
  (Type)      Filter as you type
  Backspace   Delete character
  Enter/Esc   Leave the search box

Searching resets the episode selector and picking an
episode clears the search.

Press ? to close";

    let help_text = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(help_text, area);
}

/// Helper function to create a centered rect.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
