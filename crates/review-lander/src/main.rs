use anyhow::{bail, Context, Result};
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event, KeyEventKind},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    Terminal,
};
use review_diff_engine::{load_file_review, DiffViewState};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

mod app;
mod config;
mod fixture;
mod input;
mod keymap;
mod logger;

use app::App;
use config::AppConfig;
use fixture::FixtureSource;
use input::InputHandler;

const USAGE: &str = "usage: review-lander <fixture.json> [path]";

/// Command line arguments
#[derive(Debug, PartialEq)]
struct Args {
    fixture: PathBuf,
    path: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let Some(fixture) = args.next() else {
        bail!(USAGE);
    };
    let path = args.next();
    if args.next().is_some() {
        bail!(USAGE);
    }
    Ok(Args {
        fixture: PathBuf::from(fixture),
        path,
    })
}

fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    let log_file = logger::init()?;
    log::info!("Starting review-lander, logging to {}", log_file.display());

    let config = AppConfig::load();
    let source = FixtureSource::load(&args.fixture)?;
    let path = match args.path {
        Some(path) => path,
        None => source
            .paths()
            .first()
            .map(|p| p.to_string())
            .context("Fixture contains no files")?,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let review = runtime
        .block_on(load_file_review(&source, &config.review_target(), &path))
        .with_context(|| format!("Failed to load review for {}", path))?;

    let view = DiffViewState::new(review, config.diff.clone())
        .with_layout(config.default_layout)
        .with_blame_shown(config.show_blame);
    let mut app = App::new(view, InputHandler::new(keymap::default_keymap()));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref err) = result {
        log::error!("Terminal loop failed: {}", err);
    }
    log::info!("Exiting review-lander");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();
            app.render(area, frame.buffer_mut());
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }
    Ok(())
}
