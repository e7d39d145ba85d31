//! Home Screen Implementation
//!
//! Lists the clinic's doctors with a detail panel for the highlighted one.
//! Enter opens the consultation form for a signed-in patient, patient
//! sign-in otherwise.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::models::DoctorSummary;
use crate::tui::app::{App, RemoteData};
use crate::tui::components::forms::hint_line;
use crate::tui::utils::{format_experience, truncate, Palette};

pub fn render_home(f: &mut Frame, app: &mut App, area: Rect) {
    let palette = app.palette();
    let patient_signed_in = app.session.state().patient_authenticated;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    match &app.state.doctors {
        RemoteData::Loaded(doctors) if !doctors.is_empty() => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[0]);
            let selected = app.state.selected_doctor.min(doctors.len() - 1);
            render_doctor_table(f, columns[0], doctors, selected, &palette);
            render_doctor_details(f, columns[1], &doctors[selected], patient_signed_in, &palette);
        }
        other => render_empty_listing(f, chunks[0], other, &palette),
    }

    let action = if patient_signed_in {
        "Book consultation"
    } else {
        "Sign in to book"
    };
    f.render_widget(
        Paragraph::new(hint_line(
            &[("↑/↓", "Select"), ("Enter", action), ("r", "Reload")],
            &palette,
        )),
        chunks[1],
    );
}

fn render_doctor_table(
    f: &mut Frame,
    area: Rect,
    doctors: &[DoctorSummary],
    selected: usize,
    palette: &Palette,
) {
    let header = Row::new(vec!["Name", "Specialty", "Experience"]).style(
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = doctors
        .iter()
        .map(|doctor| {
            Row::new(vec![
                Cell::from(truncate(&doctor.name, 28)),
                Cell::from(doctor.specialty.clone()),
                Cell::from(format_experience(doctor.experience)),
            ])
            .style(palette.base())
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(45),
            Constraint::Percentage(30),
            Constraint::Percentage(25),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_style(true))
            .title(format!(" Our Doctors ({}) ", doctors.len()))
            .title_style(palette.title()),
    )
    .style(palette.base())
    .row_highlight_style(palette.selected())
    .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(Some(selected));
    f.render_stateful_widget(table, area, &mut state);
}

fn render_doctor_details(
    f: &mut Frame,
    area: Rect,
    doctor: &DoctorSummary,
    patient_signed_in: bool,
    palette: &Palette,
) {
    let label = Style::default().fg(palette.muted);
    let mut lines = vec![
        Line::from(Span::styled(doctor.name.clone(), palette.title())),
        Line::from(""),
        Line::from(vec![
            Span::styled("Specialty:  ", label),
            Span::raw(doctor.specialty.clone()),
        ]),
        Line::from(vec![
            Span::styled("Experience: ", label),
            Span::raw(format_experience(doctor.experience)),
        ]),
    ];
    if !doctor.profile_image.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Photo:      ", label),
            Span::raw(doctor.profile_image.clone()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(if patient_signed_in {
        Line::from(Span::styled(
            "Press Enter to start a consultation",
            Style::default().fg(palette.success),
        ))
    } else {
        Line::from(Span::styled(
            "Sign in as a patient to book a consultation",
            Style::default().fg(palette.warning),
        ))
    });

    f.render_widget(
        Paragraph::new(lines)
            .style(palette.base())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(palette.border_style(false))
                    .title(" Doctor "),
            ),
        area,
    );
}

fn render_empty_listing(
    f: &mut Frame,
    area: Rect,
    doctors: &RemoteData<Vec<DoctorSummary>>,
    palette: &Palette,
) {
    let (message, color) = match doctors {
        RemoteData::Idle | RemoteData::Loading => {
            ("Loading doctors...".to_string(), palette.warning)
        }
        RemoteData::Failed(error) => (
            format!("Could not load doctors: {}\nPress 'r' to retry.", error),
            palette.error,
        ),
        RemoteData::Loaded(_) => ("No doctors available yet.".to_string(), palette.muted),
    };

    f.render_widget(
        Paragraph::new(message)
            .style(palette.base().fg(color))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(palette.border_style(false))
                    .title(" Our Doctors "),
            ),
        area,
    );
}
