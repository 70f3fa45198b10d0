// heapwalk: pointer walk on a tracked heap, with time-travel replay

use std::io::{self, Write};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::error;
use tracing_subscriber::EnvFilter;

use heapwalk::config::{parse_args, Command, LOG_ENV, USAGE};
use heapwalk::driver::engine::{exit_status, Driver};
use heapwalk::ui::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let (config, visualize) = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Run { config, visualize }) => (config, visualize),
        Ok(Command::Help) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    let mut driver = Driver::new(config);
    let result = driver.run();
    let status = exit_status(&result);

    if visualize {
        if let Err(e) = &result {
            error!(error = %e, "run aborted, replaying partial history");
        }
        visualize_run(driver)?;
        if status != 0 {
            std::process::exit(status);
        }
        return Ok(());
    }

    // Plain run: stdout carries exactly what the program printed
    let mut stdout = io::stdout().lock();
    stdout.write_all(driver.terminal().contents().as_bytes())?;
    stdout.flush()?;

    if let Err(e) = result {
        eprintln!("Runtime error: {}", e);
        if let Some(step) = e.step().and_then(|i| driver.plan().get(i)) {
            eprintln!("  while executing: {}", step.to_string().trim_start());
        }
        std::process::exit(status);
    }

    Ok(())
}

/// Install the stderr log subscriber, filtered by `HEAPWALK_LOG`
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn visualize_run(mut driver: Driver) -> Result<(), Box<dyn std::error::Error>> {
    // Rewind to the beginning for the TUI
    if let Err(e) = driver.rewind_to_start() {
        eprintln!("Warning: Failed to rewind to start: {}", e);
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(driver);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
