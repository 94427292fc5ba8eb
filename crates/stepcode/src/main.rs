mod app;
mod config;
mod print;
mod terminal;
mod views;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use config::Config;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{enable_raw_mode, EnterAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::path::PathBuf;
use stepcode_core::Navigator;
use terminal::RestoreGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stepcode", version, about = "Step through code walkthroughs")]
struct Cli {
    /// JSON file shaped like {"steps": [{"code": ..., "desc": ...}]}
    file: PathBuf,

    /// Config file (defaults to <config dir>/stepcode/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// 1-based step to open at
    #[arg(long, value_name = "N")]
    start: Option<usize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Interactive viewer (default)
    View,
    /// Print every step with changed lines marked
    Print,
    /// Write the normalized steps JSON to stdout
    Export,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("loading config")?;
    let navigator = Navigator::from_path(&cli.file)
        .with_context(|| format!("loading steps from {}", cli.file.display()))?;

    if !navigator.is_available() {
        tracing::warn!(file = %cli.file.display(), "no steps found");
    }

    match cli.command.unwrap_or(Command::View) {
        Command::View => run_viewer(navigator, config, cli.file, cli.start),
        Command::Print => {
            let mut navigator = navigator;
            let mut stdout = io::stdout().lock();
            print::print_steps(&mut navigator, &config, &mut stdout)?;
            stdout.flush()?;
            Ok(())
        }
        Command::Export => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &navigator)?;
            writeln!(stdout)?;
            Ok(())
        }
    }
}

fn run_viewer(
    navigator: Navigator,
    config: Config,
    source: PathBuf,
    start: Option<usize>,
) -> Result<()> {
    let mut app = App::new(navigator, config, source);
    if let Some(number) = start {
        app.goto_step(number);
    }

    enable_raw_mode()?;
    let _restore = RestoreGuard::new(terminal::restore_terminal);
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    event_loop(&mut terminal, &mut app)
}

fn event_loop<W: Write>(
    terminal: &mut Terminal<CrosstermBackend<W>>,
    app: &mut App,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| views::render(frame, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
    }
    Ok(())
}
