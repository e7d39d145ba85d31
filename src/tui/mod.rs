//! Clinic Booking TUI Module
//!
//! This module provides a Terminal User Interface for the clinic booking
//! backend: browsing doctors, signing in as a doctor or patient, requesting
//! a consultation and reviewing a doctor's consultations.

pub mod app;
pub mod components;
pub mod events;
pub mod screens;
pub mod ui;
pub mod utils;

pub use app::{App, AppState};
pub use events::{Event, EventHandler};
pub use ui::render_ui;

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use crate::client::ClinicApi;
use crate::{Error, SessionStore};

pub type TuiTerminal = Terminal<CrosstermBackend<Stdout>>;

/// How long the loop waits for an event before redrawing
const EVENT_TIMEOUT: Duration = Duration::from_millis(100);

/// Global flag to track if terminal cleanup is needed
static TERMINAL_NEEDS_CLEANUP: AtomicBool = AtomicBool::new(false);

/// Initialize the terminal for TUI mode
///
/// Sets up the terminal with alternate screen and raw mode for TUI interaction.
/// Automatically tracks that cleanup will be needed.
pub fn init_terminal() -> Result<TuiTerminal, Error> {
    enable_raw_mode().map_err(Error::Io)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(Error::Io)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(Error::Io)?;

    terminal.hide_cursor().map_err(Error::Io)?;

    TERMINAL_NEEDS_CLEANUP.store(true, Ordering::SeqCst);

    Ok(terminal)
}

/// Restore the terminal to normal mode
///
/// Disables raw mode, leaves alternate screen, and shows cursor.
/// Safe to call multiple times.
pub fn restore_terminal(terminal: &mut TuiTerminal) -> Result<(), Error> {
    if TERMINAL_NEEDS_CLEANUP.load(Ordering::SeqCst) {
        disable_raw_mode().map_err(Error::Io)?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(Error::Io)?;
        terminal.show_cursor().map_err(Error::Io)?;

        TERMINAL_NEEDS_CLEANUP.store(false, Ordering::SeqCst);
    }
    Ok(())
}

/// Emergency terminal cleanup for panic situations
fn emergency_terminal_cleanup() {
    if TERMINAL_NEEDS_CLEANUP.load(Ordering::SeqCst) {
        // Ignore errors during emergency cleanup
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = execute!(io::stdout(), cursor::Show);
        TERMINAL_NEEDS_CLEANUP.store(false, Ordering::SeqCst);
    }
}

/// Setup panic handler for graceful terminal restoration
pub fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        emergency_terminal_cleanup();
        original_hook(panic_info);
    }));
}

/// Main TUI application entry point
///
/// Initializes the terminal, reconciles the session with the backend and
/// runs the event loop until the user quits. The terminal is restored on
/// every exit path.
pub async fn run_tui(api: Arc<dyn ClinicApi>, session: SessionStore) -> Result<(), Error> {
    setup_panic_handler();

    let mut terminal = init_terminal().inspect_err(|_| emergency_terminal_cleanup())?;

    let mut event_handler = EventHandler::new();
    let mut app = App::new(api, session, event_handler.sender());
    app.start();
    info!("TUI started");

    let app_result = run_app_loop(&mut terminal, &mut app, &mut event_handler).await;

    if let Err(restore_error) = restore_terminal(&mut terminal) {
        if app_result.is_ok() {
            return Err(restore_error);
        }
        error!("Failed to restore terminal: {}", restore_error);
    }

    info!("TUI stopped");
    app_result
}

/// Internal application loop
async fn run_app_loop(
    terminal: &mut TuiTerminal,
    app: &mut App,
    event_handler: &mut EventHandler,
) -> Result<(), Error> {
    loop {
        terminal
            .draw(|frame| {
                if let Err(e) = render_ui(frame, app) {
                    app.set_error(format!("Render error: {}", e));
                }
            })
            .map_err(Error::Io)?;

        match tokio::time::timeout(EVENT_TIMEOUT, event_handler.next()).await {
            Ok(Ok(event)) => {
                if app.handle_event(event) {
                    break;
                }
            }
            Ok(Err(e)) => {
                error!("Event channel failed: {}", e);
                return Err(Error::Other(format!("Event error: {}", e)));
            }
            // Timeout: redraw so spinners and expiring notices update
            Err(_) => {}
        }

        app.tick();
    }

    Ok(())
}

/// Quick terminal check
///
/// Verifies that stdout is a terminal large enough for the layout. Called
/// before initializing the full TUI to give a readable error.
pub fn check_terminal_support() -> Result<(), Error> {
    let (width, height) = crossterm::terminal::size().map_err(|e| {
        Error::Io(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("TUI requires a terminal: {}", e),
        ))
    })?;

    if width < ui::MIN_WIDTH || height < ui::MIN_HEIGHT {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::Unsupported,
            format!(
                "Terminal too small: {}x{} (minimum: {}x{})",
                width,
                height,
                ui::MIN_WIDTH,
                ui::MIN_HEIGHT
            ),
        )));
    }

    Ok(())
}
