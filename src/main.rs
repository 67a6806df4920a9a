//! Main entry point for the tv-browser CLI application.

use clap::Parser;
use crossterm::{
    event::{Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, info, warn};
use ratatui::prelude::*;
use std::io::{self, stdout};
use std::process::{Command, Stdio};
use std::time::Duration;
use tv_browser::api::{CatalogClient, TvMazeClient};
use tv_browser::cache::SessionCache;
use tv_browser::config::Config;
use tv_browser::controller::Controller;
use tv_browser::tui::{Action, App, draw, poll_event};
use tv_browser::types::ShowId;

/// Command-line arguments for the tv-browser application.
#[derive(Parser, Debug)]
#[command(
    name = "tv-browser",
    version,
    about = "Browse TV shows and episodes from TVMaze",
    long_about = "Browse, search and jump between the episodes of any show in the TVMaze catalog."
)]
struct Args {
    /// Show to open on startup (TVMaze show id)
    #[arg(short, long)]
    show: Option<ShowId>,

    /// Catalog API base URL (overrides config)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Log verbosity level: 0=error, 1=warn, 2=info, 3=debug, 4=trace
    #[arg(short, long, default_value_t = 1)]
    log: u8,

    /// Write a default config file (if missing), print its path and exit
    #[arg(long)]
    init_config: bool,
}

/// Initialize the terminal for TUI rendering.
fn init_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

/// Restore the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Open `url` in a browser without tying it to the terminal.
fn open_link(browser: &str, url: &str) -> io::Result<()> {
    debug!("Opening {} with {}", url, browser);
    Command::new(browser)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.log {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    debug!("Log level set to {:?}", log_level);

    if args.init_config {
        let path = Config::create_default_if_missing()?;
        println!("{}", path.display());
        return Ok(());
    }

    // Load config
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config: {}. Using defaults.", e);
        Config::new()
    });

    // Merge config with CLI args
    let base_url = args.base_url.unwrap_or_else(|| config.base_url.clone());
    let start_show = args.show.unwrap_or(config.default_show_id);
    let browser = config.browser_command();

    info!("Using catalog at {}", base_url);

    let client = TvMazeClient::new(&base_url)?;
    let mut controller = Controller::new(SessionCache::new(client), &config.placeholder_image);
    let mut app = App::new(config.keybindings.clone());

    // Initialize terminal
    let mut terminal = init_terminal()?;

    let result = run_app(&mut terminal, &mut app, &mut controller, start_show, &browser).await;

    // Restore terminal
    restore_terminal()?;

    result
}

async fn run_app<C: CatalogClient>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    controller: &mut Controller<C>,
    start_show: ShowId,
    browser: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    app.set_loading("Loading shows...");
    terminal.draw(|f| draw(f, app))?;
    controller.load_shows().await;

    select_show(terminal, app, controller, start_show).await?;

    loop {
        // Draw UI
        terminal.draw(|f| draw(f, app))?;

        // Poll for events
        let Some(Event::Key(key)) = poll_event(Duration::from_millis(100))? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_input(key) {
            Action::Quit => break,
            Action::SelectShow(show_id) => {
                select_show(terminal, app, controller, show_id).await?;
            }
            Action::ReloadShows => {
                if controller.needs_shows() {
                    app.set_loading("Loading shows...");
                    terminal.draw(|f| draw(f, app))?;
                    if !controller.load_shows().await {
                        app.set_error("The show list is still unavailable.");
                    }
                }
                app.set_page(controller.page());
            }
            Action::Search(text) => {
                controller.set_search(&text);
                app.set_page(controller.page());
            }
            Action::SelectEpisode(selection) => {
                controller.select_episode(selection);
                app.set_page(controller.page());
            }
            Action::OpenLink(url) => {
                if let Err(e) = open_link(browser, &url) {
                    warn!("Failed to start {}: {}", browser, e);
                    app.set_error(&format!("Could not open {} with {}: {}", url, browser, e));
                }
            }
            Action::None => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Load a show, drawing the loading page first when it has to be fetched.
async fn select_show<C: CatalogClient>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    controller: &mut Controller<C>,
    show_id: ShowId,
) -> io::Result<()> {
    if controller.begin_select(show_id) {
        app.set_page(controller.page());
        terminal.draw(|f| draw(f, app))?;
    }

    controller.finish_select(show_id).await;
    app.set_page(controller.page());
    Ok(())
}
