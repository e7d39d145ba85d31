//! Status Bar Component
//!
//! This component displays the bottom status bar with the result of the
//! last action, loading indicators and keyboard shortcuts.

use std::time::{SystemTime, UNIX_EPOCH};

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::tui::app::{AppState, LoadingState};
use crate::tui::utils::Palette;
use crate::Route;

/// Render the status bar component
pub fn render_status_bar(f: &mut Frame, app_state: &AppState, palette: &Palette, area: Rect) {
    let status_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60), // Status/message area
            Constraint::Percentage(40), // Help/shortcuts area
        ])
        .split(area);

    render_status_section(f, app_state, palette, status_chunks[0]);
    render_help_section(f, &app_state.route, palette, status_chunks[1]);
}

/// Render the status/message section
fn render_status_section(f: &mut Frame, app_state: &AppState, palette: &Palette, area: Rect) {
    let (text, color, title) = match &app_state.loading_state {
        LoadingState::Loading { message } => (
            format!("{} {}", get_loading_indicator(now_ms()), message),
            palette.warning,
            "Working",
        ),
        LoadingState::Success { message, .. } => {
            (format!("✓ {}", message), palette.success, "Success")
        }
        LoadingState::Error { message, .. } => (format!("✗ {}", message), palette.error, "Error"),
        LoadingState::Idle => (
            format!("Ready | {}", app_state.route.title()),
            palette.muted,
            "Status",
        ),
    };

    let status = Paragraph::new(text)
        .style(palette.base().fg(color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title),
        );
    f.render_widget(status, area);
}

/// Render help/shortcuts section
fn render_help_section(f: &mut Frame, route: &Route, palette: &Palette, area: Rect) {
    let help = Paragraph::new(get_context_help(route))
        .style(palette.base().fg(palette.muted))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border_style(false))
                .title("Help"),
        );
    f.render_widget(help, area);
}

/// Get context-sensitive help text based on current route
fn get_context_help(route: &Route) -> String {
    let base_help = "F1-F9:Menu | Ctrl+T:Theme | Ctrl+Q:Quit";

    let screen_help = match route {
        Route::Home => "↑↓:Select | Enter:Consult | r:Reload",
        Route::SignIn(_) | Route::SignUp(_) => "Tab:Next field | Enter:Submit | Esc:Back",
        Route::Consult(_) => "Tab:Next field | Enter:Continue | Esc:Back",
        Route::DoctorProfile(_) => "r:Reload | Esc:Home",
        Route::DoctorConsultations(_) => "↑↓:Select | r:Reload | Esc:Home",
    };

    format!("{} | {}", base_help, screen_help)
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Get loading indicator character based on time (for animation)
pub fn get_loading_indicator(time_ms: u64) -> char {
    let indicators = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
    let index = (time_ms / 100) % indicators.len() as u64;
    indicators[index as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn test_get_loading_indicator() {
        assert_eq!(get_loading_indicator(0), '⠋');
        assert_eq!(get_loading_indicator(100), '⠙');
        assert_eq!(get_loading_indicator(1000), '⠋'); // Should cycle back
    }

    #[test]
    fn test_get_context_help() {
        let help = get_context_help(&Route::Home);
        assert!(help.contains("Enter:Consult"));

        let help = get_context_help(&Route::SignIn(Role::Doctor));
        assert!(help.contains("Enter:Submit"));
        assert!(help.starts_with("F1-F9:Menu"));
    }
}
