//! Consultation Wizard Screen
//!
//! Three-step intake form: medical history, family history, then a
//! simulated payment and submission. Step logic lives in
//! [`ConsultationWizard`]; this screen only mirrors it into form fields.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::consultation::{ConsultationWizard, DraftField, WizardStep, CONSULTATION_FEE};
use crate::models::DiabetesStatus;
use crate::tui::app::App;
use crate::tui::components::forms::{
    hint_line, Dropdown, DropdownOption, Form, FormField, TextInput,
};
use crate::tui::utils::Palette;

/// Wizard plus the inputs for its active step
#[derive(Debug, Clone)]
pub struct ConsultationScreenState {
    pub wizard: ConsultationWizard,
    pub doctor_name: Option<String>,
    pub form: Form,
}

impl ConsultationScreenState {
    pub fn new(
        patient_id: impl Into<String>,
        doctor_id: impl Into<String>,
        doctor_name: Option<String>,
    ) -> Self {
        let wizard = ConsultationWizard::new(patient_id, doctor_id);
        let form = step_form(&wizard);
        Self {
            wizard,
            doctor_name,
            form,
        }
    }

    fn rebuild_form(&mut self) {
        self.form = step_form(&self.wizard);
        self.form.apply_errors(self.wizard.errors());
    }

    /// Push the value of the edited input into the draft
    pub fn field_changed(&mut self, key: &str) {
        let Some(field) = draft_field(self.wizard.step(), key) else {
            return;
        };
        let value = self.form.value(key);
        self.wizard.set_field(field, &value);
        self.form.apply_errors(self.wizard.errors());
    }

    /// Next step; on failure the step's errors show inline
    pub fn advance(&mut self) -> bool {
        let moved = self.wizard.advance();
        if moved {
            self.rebuild_form();
        } else {
            self.form.apply_errors(self.wizard.errors());
        }
        moved
    }

    /// Previous step; false on the first step
    pub fn retreat(&mut self) -> bool {
        let moved = self.wizard.retreat();
        if moved {
            self.rebuild_form();
        }
        moved
    }
}

fn draft_field(step: WizardStep, key: &str) -> Option<DraftField> {
    step.fields().iter().copied().find(|f| f.key() == key)
}

/// Inputs for the wizard's active step, pre-filled from the draft
fn step_form(wizard: &ConsultationWizard) -> Form {
    let draft = wizard.draft();
    let fields = wizard
        .step()
        .fields()
        .iter()
        .map(|field| match field {
            DraftField::DiabetesStatus => {
                let mut dropdown = Dropdown::new(field.key(), field.label())
                    .with_options(
                        DiabetesStatus::all()
                            .iter()
                            .map(|s| {
                                DropdownOption::new(s.display_name(), s.wire_value().to_string())
                            })
                            .collect(),
                    )
                    .required();
                if let Some(status) = draft.diabetes_status {
                    dropdown.select_by_value(&status.wire_value().to_string());
                }
                FormField::Select(dropdown)
            }
            DraftField::IllnessHistory | DraftField::SurgeryHistory => FormField::Text(
                TextInput::new(field.key(), field.label())
                    .required()
                    .with_value(draft.value(*field)),
            ),
            DraftField::Allergies | DraftField::OtherNotes => FormField::Text(
                TextInput::new(field.key(), field.label())
                    .with_placeholder("Optional")
                    .with_value(draft.value(*field)),
            ),
        })
        .collect();
    Form::new(fields)
}

pub fn render_consultation(f: &mut Frame, app: &mut App, area: Rect) {
    let palette = app.palette();
    let Some(state) = app.state.consultation.as_mut() else {
        return;
    };

    let title = match &state.doctor_name {
        Some(name) => format!(" Consultation with {} ", name),
        None => " Doctor's Consultation Form ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(palette.title())
        .border_style(palette.border_style(false))
        .style(palette.base());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Progress
            Constraint::Min(8),    // Step body
            Constraint::Length(1), // Controls
        ])
        .split(inner);

    render_progress(f, chunks[0], state.wizard.step(), &palette);

    match state.wizard.step() {
        WizardStep::Payment => render_payment(f, chunks[1], &state.wizard, &palette),
        _ => state.form.render(f, chunks[1], &palette),
    }

    let hints: &[(&str, &str)] = match state.wizard.step() {
        WizardStep::MedicalHistory => &[
            ("Enter", "Next"),
            ("Tab", "Next field"),
            ("Esc", "Cancel"),
        ],
        WizardStep::FamilyHistory => &[
            ("Enter", "Next"),
            ("Space", "Open list"),
            ("Tab", "Next field"),
            ("Esc", "Back"),
        ],
        WizardStep::Payment if state.wizard.is_submitting() => &[("...", "Submitting")],
        WizardStep::Payment => &[("p", "Pay"), ("Enter", "Submit"), ("Esc", "Back")],
    };
    f.render_widget(Paragraph::new(hint_line(hints, &palette)), chunks[2]);
}

fn render_progress(f: &mut Frame, area: Rect, current: WizardStep, palette: &Palette) {
    let (number, total) = current.step_number();
    let mut spans = Vec::new();
    for (idx, step) in WizardStep::all().iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" ── ", Style::default().fg(palette.border)));
        }
        let (marker, style) = if *step == current {
            (
                "●",
                Style::default()
                    .fg(palette.focus)
                    .add_modifier(Modifier::BOLD),
            )
        } else if step.step_number().0 < number {
            ("✓", Style::default().fg(palette.success))
        } else {
            ("○", Style::default().fg(palette.muted))
        };
        spans.push(Span::styled(format!("{} {}", marker, step.title()), style));
    }

    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled(
            format!("Step {} of {}", number, total),
            Style::default().fg(palette.muted),
        )),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_payment(f: &mut Frame, area: Rect, wizard: &ConsultationWizard, palette: &Palette) {
    let label = Style::default().fg(palette.muted);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Consultation fee: ", label),
            Span::styled(CONSULTATION_FEE, palette.title()),
        ]),
        Line::from(vec![
            Span::styled("Payment reference: ", label),
            Span::raw(wizard.payment_reference()),
        ]),
        Line::from(""),
    ];

    match wizard.payment_transaction_id() {
        Some(txn_id) => {
            lines.push(Line::from(Span::styled(
                "✓ Payment complete",
                Style::default()
                    .fg(palette.success)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(vec![
                Span::styled("Transaction ID: ", label),
                Span::raw(txn_id.to_string()),
            ]));
        }
        None => lines.push(Line::from(Span::styled(
            "Payment pending. Press 'p' to pay the consultation fee.",
            Style::default().fg(palette.warning),
        ))),
    }

    if wizard.is_submitted() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Consultation submitted",
            Style::default().fg(palette.success),
        )));
    }

    f.render_widget(
        Paragraph::new(lines)
            .style(palette.base())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(palette.border_style(true))
                    .title(" Payment "),
            ),
        area,
    );
}
