//! Sign-in Screen
//!
//! Email and password form for doctors and patients.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::auth::SignInForm;
use crate::tui::app::App;
use crate::tui::components::forms::{hint_line, Form, FormField, InputType, TextInput};
use crate::Role;

/// Sign-in form state for one role
#[derive(Debug, Clone)]
pub struct SignInState {
    pub role: Role,
    pub form: Form,
    pub submitting: bool,
}

impl SignInState {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            form: Form::new(vec![
                FormField::Text(
                    TextInput::new("email", "Email")
                        .with_type(InputType::Email)
                        .required()
                        .with_placeholder("you@example.com"),
                ),
                FormField::Text(
                    TextInput::new("password", "Password")
                        .with_type(InputType::Password)
                        .required(),
                ),
            ]),
            submitting: false,
        }
    }

    /// Current field values as a sign-in form
    pub fn to_form(&self) -> SignInForm {
        SignInForm::new(self.form.value("email"), self.form.value("password"))
    }
}

pub fn render_sign_in(f: &mut Frame, app: &mut App, area: Rect) {
    let palette = app.palette();
    let state = &mut app.state.sign_in;

    let title = format!(" {} Sign In ", state.role);
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
        .constraints([Constraint::Min(10), Constraint::Length(1)])
        .split(inner);

    state.form.render(f, chunks[0], &palette);

    let hints = if state.submitting {
        hint_line(&[("...", "Signing in")], &palette)
    } else {
        hint_line(
            &[("Enter", "Sign in"), ("Tab", "Next field"), ("Esc", "Home")],
            &palette,
        )
    };
    f.render_widget(Paragraph::new(hints), chunks[1]);
}
