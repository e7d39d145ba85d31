//! Sign-up Screen
//!
//! Registration form for doctors (with specialty and experience) and
//! patients (with age and optional history). Both accept an optional
//! profile image path.

use std::path::Path;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::auth::{DoctorSignUpForm, PatientSignUpForm, SPECIALTIES};
use crate::models::ProfileImage;
use crate::tui::app::App;
use crate::tui::components::forms::{
    hint_line, Dropdown, DropdownOption, Form, FormField, InputType, TextInput,
};
use crate::validation::FieldErrors;
use crate::Role;

/// Form key of the profile image path
pub const PROFILE_IMAGE_KEY: &str = "pfp";

/// Sign-up form state for one role
#[derive(Debug, Clone)]
pub struct SignUpState {
    pub role: Role,
    pub form: Form,
    pub submitting: bool,
}

fn profile_fields() -> Vec<FormField> {
    vec![
        FormField::Text(TextInput::new("name", "Full Name").required()),
        FormField::Text(
            TextInput::new("email", "Email")
                .with_type(InputType::Email)
                .required(),
        ),
        FormField::Text(
            TextInput::new("phone", "Phone")
                .with_type(InputType::Phone)
                .required(),
        ),
        FormField::Text(
            TextInput::new("password", "Password")
                .with_type(InputType::Password)
                .required()
                .with_placeholder("At least 8 characters"),
        ),
        FormField::Text(
            TextInput::new("confirmPassword", "Confirm Password")
                .with_type(InputType::Password)
                .required(),
        ),
    ]
}

fn profile_image_field() -> FormField {
    FormField::Text(
        TextInput::new(PROFILE_IMAGE_KEY, "Profile Image")
            .with_type(InputType::Path)
            .with_placeholder("Optional path to a .png or .jpg"),
    )
}

impl SignUpState {
    pub fn new(role: Role) -> Self {
        let mut fields = profile_fields();
        match role {
            Role::Doctor => {
                fields.push(FormField::Select(
                    Dropdown::new("specialty", "Specialty")
                        .with_options(
                            SPECIALTIES
                                .iter()
                                .map(|s| DropdownOption::new(*s, s.to_string()))
                                .collect(),
                        )
                        .required(),
                ));
                fields.push(FormField::Text(
                    TextInput::new("experience", "Years of Experience")
                        .with_type(InputType::Number)
                        .required(),
                ));
            }
            Role::Patient => {
                fields.push(FormField::Text(
                    TextInput::new("age", "Age")
                        .with_type(InputType::Number)
                        .required(),
                ));
                fields.push(FormField::Text(
                    TextInput::new("surgeryHistory", "Surgery History")
                        .with_placeholder("Optional"),
                ));
                fields.push(FormField::Text(
                    TextInput::new("illnessHistory", "Illness History")
                        .with_placeholder("Optional"),
                ));
            }
        }
        fields.push(profile_image_field());

        Self {
            role,
            form: Form::new(fields),
            submitting: false,
        }
    }

    /// Read the optional image, reporting a bad path as a field error
    fn profile_image(&self) -> Result<Option<ProfileImage>, String> {
        let path = self.form.value(PROFILE_IMAGE_KEY);
        let path = path.trim();
        if path.is_empty() {
            return Ok(None);
        }
        ProfileImage::from_path(Path::new(path))
            .map(Some)
            .map_err(|e| format!("Could not read image: {}", e))
    }

    /// Doctor form from the current values, or every blocking field error
    pub fn doctor_form(&self) -> Result<DoctorSignUpForm, FieldErrors> {
        let image = self.profile_image();
        let form = DoctorSignUpForm {
            name: self.form.value("name"),
            email: self.form.value("email"),
            phone: self.form.value("phone"),
            password: self.form.value("password"),
            confirm_password: self.form.value("confirmPassword"),
            specialty: self.form.value("specialty"),
            experience: self.form.value("experience"),
            profile_image: image.clone().unwrap_or(None),
        };
        let mut errors = form.validate();
        if let Err(message) = image {
            errors.insert(PROFILE_IMAGE_KEY, message);
        }
        errors.into_result().map(|()| form)
    }

    /// Patient form from the current values, or every blocking field error
    pub fn patient_form(&self) -> Result<PatientSignUpForm, FieldErrors> {
        let image = self.profile_image();
        let form = PatientSignUpForm {
            name: self.form.value("name"),
            email: self.form.value("email"),
            phone: self.form.value("phone"),
            password: self.form.value("password"),
            confirm_password: self.form.value("confirmPassword"),
            age: self.form.value("age"),
            surgery_history: self.form.value("surgeryHistory"),
            illness_history: self.form.value("illnessHistory"),
            profile_image: image.clone().unwrap_or(None),
        };
        let mut errors = form.validate();
        if let Err(message) = image {
            errors.insert(PROFILE_IMAGE_KEY, message);
        }
        errors.into_result().map(|()| form)
    }
}

pub fn render_sign_up(f: &mut Frame, app: &mut App, area: Rect) {
    let palette = app.palette();
    let state = &mut app.state.sign_up;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} Sign Up ", state.role))
        .title_style(palette.title())
        .border_style(palette.border_style(false))
        .style(palette.base());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(10), Constraint::Length(1)])
        .split(inner);

    state.form.render(f, chunks[0], &palette);

    let hints = if state.submitting {
        hint_line(&[("...", "Creating account")], &palette)
    } else {
        hint_line(
            &[
                ("Enter", "Create account"),
                ("Tab", "Next field"),
                ("Space", "Open list"),
                ("Esc", "Home"),
            ],
            &palette,
        )
    };
    f.render_widget(Paragraph::new(hints), chunks[1]);
}
