//! Doctor Profile Screen
//!
//! Read-only view of the signed-in doctor's profile.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::DoctorProfile;
use crate::tui::app::{App, RemoteData};
use crate::tui::utils::{format_experience, Palette};

pub fn render_doctor_profile(f: &mut Frame, app: &mut App, area: Rect) {
    let palette = app.palette();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style(false))
        .title(" Profile ")
        .title_style(palette.title())
        .style(palette.base());

    let paragraph = match &app.state.profile {
        RemoteData::Loaded(profile) => Paragraph::new(profile_lines(profile, &palette)),
        RemoteData::Failed(error) => Paragraph::new(format!("Could not load profile: {}", error))
            .style(palette.base().fg(palette.error))
            .alignment(Alignment::Center),
        RemoteData::Idle | RemoteData::Loading => Paragraph::new("Loading profile...")
            .style(palette.base().fg(palette.warning))
            .alignment(Alignment::Center),
    };

    f.render_widget(paragraph.wrap(Wrap { trim: true }).block(block), area);
}

fn profile_lines(profile: &DoctorProfile, palette: &Palette) -> Vec<Line<'static>> {
    let label = Style::default().fg(palette.muted);
    let row = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("{:<12}", name), label), Span::raw(value)])
    };

    let mut lines = vec![
        Line::from(Span::styled(profile.name.clone(), palette.title())),
        Line::from(""),
        row("Specialty", profile.specialty.clone()),
        row("Experience", format_experience(profile.experience)),
        row("Email", profile.email.clone()),
        row("Phone", profile.phone.clone()),
    ];
    if !profile.profile_image.is_empty() {
        lines.push(row("Photo", profile.profile_image.clone()));
    }
    lines
}
