//! UI Rendering Logic
//!
//! This module coordinates the rendering of all UI components: the header,
//! the menu, the active route's screen and the status bar.

use ratatui::{
    prelude::*,
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::tui::app::App;
use crate::tui::components::{render_header, render_navigation, render_status_bar};
use crate::tui::screens::{
    render_consultation, render_doctor_consultations, render_doctor_profile, render_home,
    render_sign_in, render_sign_up,
};
use crate::tui::utils::Palette;
use crate::{Error, Route};

/// Smallest terminal the layout fits in
pub const MIN_WIDTH: u16 = 80;
pub const MIN_HEIGHT: u16 = 24;

/// Main UI rendering function
pub fn render_ui(frame: &mut Frame, app: &mut App) -> Result<(), Error> {
    let size = frame.area();
    let palette = app.palette();

    frame.render_widget(Block::default().style(palette.base()), size);

    if size.width < MIN_WIDTH || size.height < MIN_HEIGHT {
        render_size_warning(frame, size, &palette);
        return Ok(());
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Menu
            Constraint::Min(10),   // Screen
            Constraint::Length(3), // Status bar
        ])
        .split(size);

    render_header(
        frame,
        app.session.state(),
        &app.state.route,
        &palette,
        chunks[0],
    );
    let menu = app.menu();
    render_navigation(frame, &menu, &app.state.route, &palette, chunks[1]);

    match app.state.route {
        Route::Home => render_home(frame, app, chunks[2]),
        Route::SignIn(_) => render_sign_in(frame, app, chunks[2]),
        Route::SignUp(_) => render_sign_up(frame, app, chunks[2]),
        Route::Consult(_) => render_consultation(frame, app, chunks[2]),
        Route::DoctorProfile(_) => render_doctor_profile(frame, app, chunks[2]),
        Route::DoctorConsultations(_) => render_doctor_consultations(frame, app, chunks[2]),
    }

    render_status_bar(frame, &app.state, &palette, chunks[3]);

    Ok(())
}

fn render_size_warning(frame: &mut Frame, area: Rect, palette: &Palette) {
    let message = format!(
        "Terminal too small: {}x{}. Resize to at least {}x{}.",
        area.width, area.height, MIN_WIDTH, MIN_HEIGHT
    );
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(message)
            .style(palette.base().fg(palette.warning))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}
