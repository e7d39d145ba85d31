//! Header Component
//!
//! This component displays the top header bar with the application title,
//! the current page and which roles are signed in.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::session::{SessionState, Theme};
use crate::tui::utils::{truncate, Palette};
use crate::{Role, Route};

/// Render the header component
pub fn render_header(
    f: &mut Frame,
    session: &SessionState,
    route: &Route,
    palette: &Palette,
    area: Rect,
) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24), // Title section
            Constraint::Min(1),     // Current page
            Constraint::Length(44), // Auth status
            Constraint::Length(12), // Theme
        ])
        .split(area);

    let block = |title: &'static str| {
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_style(false))
            .title(title)
            .style(palette.base())
    };

    let title = Paragraph::new("✚ Clinic Booking")
        .style(palette.title())
        .block(block(""));
    f.render_widget(title, header_chunks[0]);

    let page = Paragraph::new(route.title())
        .style(Style::default().fg(palette.text))
        .block(block("Page"));
    f.render_widget(page, header_chunks[1]);

    let status = Paragraph::new(Line::from(vec![
        role_span(session, Role::Doctor, palette),
        Span::raw("  "),
        role_span(session, Role::Patient, palette),
    ]))
    .block(block("Signed in"));
    f.render_widget(status, header_chunks[2]);

    let theme = Paragraph::new(theme_label(session.theme))
        .style(Style::default().fg(palette.muted))
        .block(block("Theme"));
    f.render_widget(theme, header_chunks[3]);
}

fn role_span(session: &SessionState, role: Role, palette: &Palette) -> Span<'static> {
    let text = role_status_text(session, role);
    let color = if session.is_authenticated(role) {
        palette.success
    } else {
        palette.muted
    };
    Span::styled(text, Style::default().fg(color))
}

/// "Doctor: <id>" or "Doctor: -" when signed out
fn role_status_text(session: &SessionState, role: Role) -> String {
    let id = session.identity(role).map(|id| truncate(id, 12));
    format!(
        "{}: {}",
        role.display_name(),
        id.as_deref().unwrap_or("-")
    )
}

fn theme_label(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "☀ Light",
        Theme::Dark => "☾ Dark",
    }
}
