use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use terminal::app::{App, AppCommand};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    // Replay directory from args or the shared default
    let replay_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/tmp/lfstats_replays"));

    if !replay_dir.exists() {
        eprintln!("Replay directory does not exist: {:?}", replay_dir);
        eprintln!("Creating directory...");
        std::fs::create_dir_all(&replay_dir)?;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(replay_dir)?;

    // The draw/poll loop blocks this thread; the clock ticker runs on the
    // other runtime workers
    let res = tokio::task::block_in_place(|| run_app(&mut terminal, &mut app));

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut last_update = std::time::Instant::now();

    loop {
        let now = std::time::Instant::now();
        let dt = now.duration_since(last_update);
        last_update = now;

        app.update(dt);

        terminal.draw(|f| app.render(f))?;

        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                if let Some(command) = app.handle_input(key) {
                    match command {
                        AppCommand::Quit => return Ok(()),
                        _ => app.handle_command(command)?,
                    }
                }
            }
        }
    }
}
