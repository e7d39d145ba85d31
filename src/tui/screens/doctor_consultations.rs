//! Doctor Consultations Screen
//!
//! The signed-in doctor's consultation requests, newest first as the
//! backend returns them, with the intake answers of the highlighted one.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::models::Consultation;
use crate::tui::app::{App, RemoteData};
use crate::tui::components::forms::hint_line;
use crate::tui::utils::{format_timestamp, or_none, truncate, Palette};

pub fn render_doctor_consultations(f: &mut Frame, app: &mut App, area: Rect) {
    let palette = app.palette();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    match &app.state.consultations {
        RemoteData::Loaded(consultations) if !consultations.is_empty() => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
                .split(chunks[0]);
            let selected = app.state.selected_consultation.min(consultations.len() - 1);
            render_consultation_list(f, columns[0], consultations, selected, &palette);
            render_consultation_details(f, columns[1], &consultations[selected], &palette);
        }
        other => {
            let (message, color) = match other {
                RemoteData::Failed(error) => (
                    format!("Could not load consultations: {}", error),
                    palette.error,
                ),
                RemoteData::Loaded(_) => ("No consultations yet.".to_string(), palette.muted),
                RemoteData::Idle | RemoteData::Loading => {
                    ("Loading consultations...".to_string(), palette.warning)
                }
            };
            f.render_widget(
                Paragraph::new(message)
                    .style(palette.base().fg(color))
                    .alignment(Alignment::Center)
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(palette.border_style(false))
                            .title(" Consultations "),
                    ),
                chunks[0],
            );
        }
    }

    f.render_widget(
        Paragraph::new(hint_line(&[("↑/↓", "Select"), ("r", "Reload")], &palette)),
        chunks[1],
    );
}

fn patient_name(consultation: &Consultation) -> String {
    consultation
        .patient
        .as_ref()
        .map(|p| p.name.clone())
        .unwrap_or_else(|| consultation.patient_id.clone())
}

fn render_consultation_list(
    f: &mut Frame,
    area: Rect,
    consultations: &[Consultation],
    selected: usize,
    palette: &Palette,
) {
    let items: Vec<ListItem> = consultations
        .iter()
        .map(|c| {
            let marker = if c.prescription.is_some() { "✓" } else { " " };
            ListItem::new(format!(
                "{} {}  {}",
                marker,
                truncate(&patient_name(c), 20),
                format_timestamp(c.created_at.as_ref())
            ))
        })
        .collect();

    let list = List::new(items)
        .style(palette.base())
        .highlight_style(palette.selected())
        .highlight_symbol("▶ ")
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border_style(true))
                .title(format!(" Consultations ({}) ", consultations.len()))
                .title_style(palette.title()),
        );

    let mut state = ListState::default().with_selected(Some(selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_consultation_details(
    f: &mut Frame,
    area: Rect,
    consultation: &Consultation,
    palette: &Palette,
) {
    let label = Style::default().fg(palette.muted);
    let row = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("{:<16}", name), label), Span::raw(value)])
    };

    let mut lines = vec![Line::from(Span::styled(
        patient_name(consultation),
        palette.title(),
    ))];
    if let Some(patient) = &consultation.patient {
        lines.push(row("Age", patient.age.to_string()));
        lines.push(row("Email", patient.email.clone()));
        lines.push(row("Phone", patient.phone.clone()));
    }
    lines.push(Line::from(""));
    lines.push(row("Illness", consultation.step1_illness.clone()));
    lines.push(row("Surgery", consultation.step1_surgery.clone()));
    lines.push(row(
        "Diabetes",
        consultation.diabetes_status.display_name().to_string(),
    ));
    lines.push(row("Allergies", or_none(&consultation.allergies).to_string()));
    lines.push(row("Other notes", or_none(&consultation.others).to_string()));
    lines.push(row("Payment", consultation.payment_txn_id.clone()));
    lines.push(row(
        "Requested",
        format_timestamp(consultation.created_at.as_ref()),
    ));
    lines.push(Line::from(""));

    match &consultation.prescription {
        Some(prescription) => {
            lines.push(Line::from(Span::styled("Prescription", palette.title())));
            lines.push(row("Medicines", prescription.medicines.clone()));
            lines.push(row("Dosage", prescription.dosage.clone()));
            lines.push(row("Duration", prescription.duration.clone()));
        }
        None => lines.push(Line::from(Span::styled(
            "No prescription yet",
            Style::default().fg(palette.warning),
        ))),
    }

    f.render_widget(
        Paragraph::new(lines)
            .style(palette.base())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(palette.border_style(false))
                    .title(" Details "),
            ),
        area,
    );
}
