//! EventDesk - a terminal desk for running a school event.
//!
//! Gate check-in, bus seating, T-shirt and meal handout on one keyboard
//! driven screen, plus a handful of one-shot command-line modes.

mod app;
mod cli;
mod ui;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use eventdesk_core::auth::{hash_passcode, Access, Operator};
use eventdesk_core::manifest::{render_html, render_text, ManifestStyle};
use eventdesk_core::seating::{AssignOptions, CandidateOrder, OverflowPolicy};
use eventdesk_core::store::{read_rows, JsonStore};
use eventdesk_core::{Config, DeskError, EventDesk};

use app::{App, AppState};
use cli::Command;
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const LOG_FILE: &str = "eventdesk.log";

/// Initialize the tracing subscriber for logging.
///
/// The full-screen desk owns the terminal, so it logs to a file in the data
/// directory. One-shot modes log to stderr.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = cli::parse_args(&args)?;
    if command == Command::Help {
        print!("{}", cli::USAGE);
        return Ok(());
    }

    let config = Config::load()?;
    let data_dir = config.data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

    let _guard = init_tracing(command.is_interactive().then_some(data_dir.as_path()));
    info!(data_dir = %data_dir.display(), "EventDesk starting");

    let store = JsonStore::new(data_dir)?;
    // With no passcodes configured the desk runs open with admin access
    let access = if config.passcodes().is_open() {
        Access::Admin
    } else {
        Access::Staff
    };
    let operator = Operator::new(config.operator(), access);
    let desk = EventDesk::open(store, config.fleet(), operator);

    match command {
        Command::Tui => run_tui(desk, config),
        command => run_command(command, desk, config),
    }
}

// ============================================================================
// Command-line modes
// ============================================================================

fn run_command(command: Command, mut desk: EventDesk<JsonStore>, mut config: Config) -> Result<()> {
    match command {
        Command::Assign {
            filter,
            start,
            seed,
            stop_when_full,
        } => {
            let start_bus = match start {
                Some(name) => desk
                    .context()
                    .fleet
                    .index_of(&name)
                    .ok_or(DeskError::UnknownBus(name))?,
                None => 0,
            };
            let options = AssignOptions {
                start_bus,
                overflow: if stop_when_full {
                    OverflowPolicy::Stop
                } else {
                    OverflowPolicy::Continue
                },
                order: match seed {
                    Some(seed) => CandidateOrder::Shuffled { seed },
                    None => CandidateOrder::InRosterOrder,
                },
            };
            let plan = desk.auto_assign(&filter, &options)?;
            println!("{}: {}", filter, plan.summary());
            for load in &plan.loads {
                println!(
                    "  {:<10} {:>3}/{}",
                    load.name, load.occupancy, load.capacity
                );
            }
            if !plan.unassigned.is_empty() {
                println!("No seat for tickets: {}", plan.unassigned.join(", "));
            }
        }
        Command::Manifest { path, signature } => {
            let style = if signature {
                ManifestStyle::SignatureSheet
            } else {
                ManifestStyle::PassengerList
            };
            let fleet = &desk.context().fleet;
            let attendees = desk.roster().attendees();
            if path.as_os_str() == "-" {
                print!("{}", render_text(fleet, attendees, style));
                return Ok(());
            }
            let html = render_html(config.event_title(), fleet, attendees, style);
            std::fs::write(&path, html)
                .with_context(|| format!("Failed to write manifest: {}", path.display()))?;
            println!("Manifest written to {}", path.display());
        }
        Command::Import { path } => {
            let rows = read_rows(&path)?;
            let report = desk.import(rows)?;
            println!(
                "Imported {} attendees, skipped {}",
                report.added, report.skipped
            );
        }
        Command::Stock { json } => {
            let summary = desk.stock_summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "{:<6} {:>8} {:>6} {:>6}",
                    "Size", "Ordered", "Given", "Left"
                );
                for line in &summary {
                    let flag = if line.is_over_issued() {
                        "  OVER-ISSUED"
                    } else {
                        ""
                    };
                    println!(
                        "{:<6} {:>8} {:>6} {:>6}{}",
                        line.size.label(),
                        line.ordered,
                        line.collected,
                        line.remaining,
                        flag
                    );
                }
            }
        }
        Command::SetPasscode { access } => set_passcode(&mut config, access)?,
        Command::Pass { ticket } => {
            for line in desk.portal_pass(&ticket)?.lines() {
                println!("{}", line);
            }
        }
        Command::ReportFault { ticket, text } => {
            desk.report_fault(&ticket, &text)?;
            println!("Report recorded for ticket {}", ticket);
        }
        Command::Tui | Command::Help => {}
    }
    Ok(())
}

/// Prompt for a new passcode and store its hash in the config.
///
/// Once an admin passcode exists, changing either passcode needs it.
fn set_passcode(config: &mut Config, access: Access) -> Result<()> {
    let passcodes = config.passcodes();
    if config.admin_passcode_hash.is_some() {
        let current = rpassword::prompt_password("Current admin passcode: ")?;
        if passcodes.authenticate(&current) != Some(Access::Admin) {
            warn!("Passcode change refused");
            bail!("Admin passcode required to change passcodes");
        }
    }

    let first = rpassword::prompt_password(format!("New {} passcode: ", access.label()))?;
    if first.trim().is_empty() {
        bail!("Passcode cannot be empty");
    }
    let second = rpassword::prompt_password("Repeat passcode: ")?;
    if first != second {
        return Err(anyhow!("Passcodes do not match"));
    }

    let hash = hash_passcode(&first)?;
    match access {
        Access::Staff => config.staff_passcode_hash = Some(hash),
        Access::Admin => config.admin_passcode_hash = Some(hash),
    }
    config.save()?;
    info!(access = %access, "Passcode updated");
    println!("{} passcode saved", access.label());
    Ok(())
}

// ============================================================================
// Interactive desk
// ============================================================================

fn run_tui(desk: EventDesk<JsonStore>, config: Config) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(desk, config);
    app.start_login();

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if app.desk.has_unsaved_changes() {
        if let Err(e) = app.desk.save_all() {
            eprintln!("Warning: changes were not saved: {}", e);
        }
    }

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("EventDesk shutting down");
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
