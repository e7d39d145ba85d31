//! Form Input Components for the clinic TUI
//!
//! Text inputs and dropdowns that display field errors produced by the
//! library validators, plus a [`Form`] that moves focus between them.
//!
//! # Example Usage
//!
//! ```rust
//! use clinic_booking_sdk::tui::components::forms::*;
//! use clinic_booking_sdk::tui::Event;
//!
//! let mut form = Form::new(vec![
//!     FormField::Text(TextInput::new("email", "Email").with_type(InputType::Email)),
//!     FormField::Text(TextInput::new("password", "Password").with_type(InputType::Password)),
//! ]);
//!
//! form.handle_event(&Event::Char('a'));
//! form.focus_next();
//! assert_eq!(form.value("email"), "a");
//! ```

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use tui_input::{Input, InputRequest};

use crate::tui::events::Event;
use crate::tui::utils::Palette;
use crate::validation::FieldErrors;

/// Rows a text input or closed dropdown occupies
pub const FIELD_HEIGHT: u16 = 5;

/// How the typed value is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    Email,
    /// Shown masked
    Password,
    Number,
    Phone,
    /// Filesystem path, e.g. a profile image
    Path,
}

/// Single-line text input
#[derive(Debug, Clone)]
pub struct TextInput {
    input: Input,
    /// Field error key, e.g. `confirmPassword`
    key: &'static str,
    label: String,
    focused: bool,
    error: Option<String>,
    input_type: InputType,
    required: bool,
    placeholder: String,
}

impl TextInput {
    pub fn new(key: &'static str, label: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            key,
            label: label.into(),
            focused: false,
            error: None,
            input_type: InputType::Text,
            required: false,
            placeholder: String::new(),
        }
    }

    pub fn with_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    /// Mark the label with an asterisk
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.input = Input::default().with_value(value.into());
        self
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn set_value(&mut self, value: &str) {
        self.input = self.input.clone().with_value(value.to_string());
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
        self.error = None;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Apply an editing key; returns whether the value changed
    pub fn handle_event(&mut self, event: &Event) -> bool {
        let request = match event {
            Event::Char(c) => InputRequest::InsertChar(*c),
            Event::Backspace => InputRequest::DeletePrevChar,
            Event::Delete => InputRequest::DeleteNextChar,
            Event::Left => InputRequest::GoToPrevChar,
            Event::Right => InputRequest::GoToNextChar,
            Event::Home => InputRequest::GoToStart,
            Event::End => InputRequest::GoToEnd,
            _ => return false,
        };
        let before = self.input.value().to_string();
        self.input.handle(request);
        before != self.input.value()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Label
                Constraint::Length(3), // Input box
                Constraint::Length(1), // Error message
            ])
            .split(area);

        let label_text = if self.required {
            format!("{} *", self.label)
        } else {
            self.label.clone()
        };
        frame.render_widget(
            Paragraph::new(label_text).style(Style::default().fg(palette.accent)),
            chunks[0],
        );

        let border_style = if self.error.is_some() && !self.focused {
            Style::default().fg(palette.error)
        } else {
            palette.border_style(self.focused)
        };
        let block = Block::default().borders(Borders::ALL).style(border_style);

        let showing_placeholder = self.input.value().is_empty() && !self.focused;
        let display_value = if showing_placeholder {
            self.placeholder.clone()
        } else if self.input_type == InputType::Password {
            "*".repeat(self.input.value().chars().count())
        } else {
            self.input.value().to_string()
        };
        let text_style = if showing_placeholder {
            Style::default()
                .fg(palette.muted)
                .add_modifier(Modifier::ITALIC)
        } else {
            Style::default().fg(palette.text)
        };

        frame.render_widget(
            Paragraph::new(display_value).block(block).style(text_style),
            chunks[1],
        );

        if self.focused {
            let cursor_x = chunks[1].x + self.input.visual_cursor() as u16 + 1;
            let cursor_y = chunks[1].y + 1;
            frame.set_cursor_position((cursor_x, cursor_y));
        }

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(format!("⚠ {}", error)).style(
                    Style::default()
                        .fg(palette.error)
                        .add_modifier(Modifier::BOLD),
                ),
                chunks[2],
            );
        }
    }
}

/// Dropdown/Select component
#[derive(Debug, Clone)]
pub struct Dropdown<T> {
    key: &'static str,
    label: String,
    options: Vec<DropdownOption<T>>,
    selected: Option<usize>,
    open: bool,
    focused: bool,
    list_state: ListState,
    required: bool,
    highlighted: Option<usize>,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DropdownOption<T> {
    pub text: String,
    pub value: T,
}

impl<T> DropdownOption<T> {
    pub fn new(text: impl Into<String>, value: T) -> Self {
        Self {
            text: text.into(),
            value,
        }
    }
}

impl<T: Clone> Dropdown<T> {
    pub fn new(key: &'static str, label: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
            options: Vec::new(),
            selected: None,
            open: false,
            focused: false,
            list_state: ListState::default(),
            required: false,
            highlighted: None,
            error: None,
        }
    }

    pub fn with_options(mut self, options: Vec<DropdownOption<T>>) -> Self {
        self.options = options;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.open = false;
            self.highlighted = None;
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Open or close the option list
    pub fn toggle(&mut self) {
        if self.focused && !self.options.is_empty() {
            self.open = !self.open;
            if self.open {
                let initial = self.selected.unwrap_or(0);
                self.highlighted = Some(initial);
                self.list_state.select(Some(initial));
            } else {
                self.highlighted = None;
            }
        }
    }

    pub fn move_up(&mut self) {
        if self.open && !self.options.is_empty() {
            let current = self.highlighted.unwrap_or(0);
            let next = if current > 0 {
                current - 1
            } else {
                self.options.len() - 1
            };
            self.highlighted = Some(next);
            self.list_state.select(Some(next));
        }
    }

    pub fn move_down(&mut self) {
        if self.open && !self.options.is_empty() {
            let current = self.highlighted.unwrap_or(0);
            let next = if current + 1 < self.options.len() {
                current + 1
            } else {
                0
            };
            self.highlighted = Some(next);
            self.list_state.select(Some(next));
        }
    }

    /// Pick the highlighted option and close the list
    pub fn select_current(&mut self) {
        if self.open {
            if let Some(highlighted) = self.highlighted {
                if highlighted < self.options.len() {
                    self.selected = Some(highlighted);
                    self.open = false;
                    self.highlighted = None;
                    self.error = None;
                }
            }
        }
    }

    pub fn selected_value(&self) -> Option<&T> {
        self.selected
            .and_then(|idx| self.options.get(idx))
            .map(|opt| &opt.value)
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selected
            .and_then(|idx| self.options.get(idx))
            .map(|opt| opt.text.as_str())
    }

    pub fn select_by_value(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        match self.options.iter().position(|opt| &opt.value == value) {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    /// Enter opens, arrows move, Enter again selects
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Enter if self.open => {
                self.select_current();
                true
            }
            Event::Enter | Event::Char(' ') => {
                self.toggle();
                true
            }
            Event::Up if self.open => {
                self.move_up();
                true
            }
            Event::Down if self.open => {
                self.move_down();
                true
            }
            Event::Escape if self.open => {
                self.toggle();
                true
            }
            _ => false,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Label
                Constraint::Length(3), // Selected value box
                Constraint::Length(1), // Error message
            ])
            .split(area);

        let label_text = if self.required {
            format!("{} *", self.label)
        } else {
            self.label.clone()
        };
        frame.render_widget(
            Paragraph::new(label_text).style(Style::default().fg(palette.accent)),
            chunks[0],
        );

        let selected_text = self.selected_text().unwrap_or("Select an option...");
        let arrow = if self.open { "▲" } else { "▼" };
        let border_style = if self.error.is_some() && !self.focused {
            Style::default().fg(palette.error)
        } else {
            palette.border_style(self.focused)
        };

        frame.render_widget(
            Paragraph::new(format!("{} {}", selected_text, arrow))
                .block(Block::default().borders(Borders::ALL).style(border_style))
                .style(Style::default().fg(palette.text)),
            chunks[1],
        );

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(format!("⚠ {}", error)).style(
                    Style::default()
                        .fg(palette.error)
                        .add_modifier(Modifier::BOLD),
                ),
                chunks[2],
            );
        }

        if self.open && !self.options.is_empty() {
            let frame_area = frame.area();
            let below = chunks[1].y + chunks[1].height;
            let room = frame_area.height.saturating_sub(below);
            let list_area = Rect {
                x: chunks[1].x,
                y: below,
                width: chunks[1].width,
                height: (self.options.len() as u16 + 2).min(10).min(room),
            };

            frame.render_widget(Clear, list_area);

            let items: Vec<ListItem> = self
                .options
                .iter()
                .enumerate()
                .map(|(idx, opt)| {
                    let style = if Some(idx) == self.highlighted {
                        palette.selected()
                    } else {
                        palette.base()
                    };
                    let text = if Some(idx) == self.selected {
                        format!("✓ {}", opt.text)
                    } else {
                        format!("  {}", opt.text)
                    };
                    ListItem::new(text).style(style)
                })
                .collect();

            let list = List::new(items).block(
                Block::default()
                    .borders(Borders::ALL)
                    .style(palette.border_style(true)),
            );
            frame.render_stateful_widget(list, list_area, &mut self.list_state);
        }
    }
}

/// A focusable form field
#[derive(Debug, Clone)]
pub enum FormField {
    Text(TextInput),
    Select(Dropdown<String>),
}

impl FormField {
    pub fn key(&self) -> &'static str {
        match self {
            FormField::Text(input) => input.key(),
            FormField::Select(dropdown) => dropdown.key(),
        }
    }

    fn set_focused(&mut self, focused: bool) {
        match self {
            FormField::Text(input) => input.set_focused(focused),
            FormField::Select(dropdown) => dropdown.set_focused(focused),
        }
    }

    fn set_error(&mut self, error: Option<String>) {
        match self {
            FormField::Text(input) => input.set_error(error),
            FormField::Select(dropdown) => dropdown.set_error(error),
        }
    }

    fn error(&self) -> Option<&str> {
        match self {
            FormField::Text(input) => input.error(),
            FormField::Select(dropdown) => dropdown.error(),
        }
    }

    fn value(&self) -> String {
        match self {
            FormField::Text(input) => input.value().to_string(),
            FormField::Select(dropdown) => dropdown.selected_value().cloned().unwrap_or_default(),
        }
    }
}

/// Ordered fields with a single focus
#[derive(Debug, Clone)]
pub struct Form {
    fields: Vec<FormField>,
    focus: usize,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        let mut form = Self { fields, focus: 0 };
        form.sync_focus();
        form
    }

    fn sync_focus(&mut self) {
        let focus = self.focus;
        for (idx, field) in self.fields.iter_mut().enumerate() {
            field.set_focused(idx == focus);
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_key(&self) -> Option<&'static str> {
        self.fields.get(self.focus).map(FormField::key)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
            self.sync_focus();
        }
    }

    pub fn focus_previous(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
            self.sync_focus();
        }
    }

    /// Value of the field with `key`, empty when absent or unselected
    pub fn value(&self, key: &str) -> String {
        self.fields
            .iter()
            .find(|field| field.key() == key)
            .map(FormField::value)
            .unwrap_or_default()
    }

    pub fn set_value(&mut self, key: &str, value: &str) {
        for field in &mut self.fields {
            if field.key() == key {
                match field {
                    FormField::Text(input) => input.set_value(value),
                    FormField::Select(dropdown) => {
                        dropdown.select_by_value(&value.to_string());
                    }
                }
            }
        }
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.key() == key)
            .and_then(FormField::error)
    }

    /// Show exactly the errors in `errors`
    pub fn apply_errors(&mut self, errors: &FieldErrors) {
        for field in &mut self.fields {
            let message = errors.get(field.key()).map(str::to_string);
            field.set_error(message);
        }
    }

    pub fn clear_errors(&mut self) {
        self.apply_errors(&FieldErrors::new());
    }

    /// Whether the focused dropdown has its list open
    pub fn is_capturing(&self) -> bool {
        matches!(self.fields.get(self.focus), Some(FormField::Select(d)) if d.is_open())
    }

    /// Whether Enter belongs to the focused field rather than the form
    pub fn focused_is_select(&self) -> bool {
        matches!(self.fields.get(self.focus), Some(FormField::Select(_)))
    }

    /// Route an editing event to the focused field
    ///
    /// Returns the key of the field whose value changed.
    pub fn handle_event(&mut self, event: &Event) -> Option<&'static str> {
        let field = self.fields.get_mut(self.focus)?;
        let key = field.key();
        let changed = match field {
            FormField::Text(input) => input.handle_event(event),
            FormField::Select(dropdown) => {
                let before = dropdown.selected_value().cloned();
                dropdown.handle_event(event);
                before != dropdown.selected_value().cloned()
            }
        };
        changed.then_some(key)
    }

    /// Render fields top to bottom, scrolling to keep focus visible
    pub fn render(&mut self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let visible = (area.height / FIELD_HEIGHT).max(1) as usize;
        let first = if self.focus >= visible {
            self.focus + 1 - visible
        } else {
            0
        };

        let mut y = area.y;
        let mut open_dropdown = None;
        for idx in first..self.fields.len() {
            if y + FIELD_HEIGHT > area.y + area.height {
                break;
            }
            let field_area = Rect {
                x: area.x,
                y,
                width: area.width,
                height: FIELD_HEIGHT,
            };
            match &mut self.fields[idx] {
                FormField::Text(input) => input.render(frame, field_area, palette),
                FormField::Select(dropdown) if dropdown.is_open() => {
                    open_dropdown = Some((idx, field_area));
                }
                FormField::Select(dropdown) => dropdown.render(frame, field_area, palette),
            }
            y += FIELD_HEIGHT;
        }

        // Open lists draw last so they overlap the fields below
        if let Some((idx, field_area)) = open_dropdown {
            if let FormField::Select(dropdown) = &mut self.fields[idx] {
                dropdown.render(frame, field_area, palette);
            }
        }
    }
}

/// One-line key hint, e.g. `Enter submit`
pub fn key_hint<'a>(key: &'a str, action: &'a str, palette: &Palette) -> Vec<Span<'a>> {
    vec![
        Span::styled(
            key,
            Style::default()
                .fg(palette.focus)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {}  ", action), Style::default().fg(palette.muted)),
    ]
}

/// Hint line built from `(key, action)` pairs
pub fn hint_line<'a>(hints: &[(&'a str, &'a str)], palette: &Palette) -> Line<'a> {
    Line::from(
        hints
            .iter()
            .flat_map(|(key, action)| key_hint(key, action, palette))
            .collect::<Vec<_>>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_in_form() -> Form {
        Form::new(vec![
            FormField::Text(TextInput::new("email", "Email").with_type(InputType::Email)),
            FormField::Text(TextInput::new("password", "Password").with_type(InputType::Password)),
        ])
    }

    #[test]
    fn test_text_input_editing() {
        let mut input = TextInput::new("name", "Name");
        assert!(input.handle_event(&Event::Char('A')));
        assert!(input.handle_event(&Event::Char('n')));
        assert!(input.handle_event(&Event::Backspace));
        assert!(!input.handle_event(&Event::Enter));
        assert_eq!(input.value(), "A");
    }

    #[test]
    fn test_dropdown_selection() {
        let mut dropdown = Dropdown::new("specialty", "Specialty").with_options(vec![
            DropdownOption::new("Cardiology", "Cardiology".to_string()),
            DropdownOption::new("Neurology", "Neurology".to_string()),
        ]);

        dropdown.set_focused(true);
        dropdown.handle_event(&Event::Enter);
        assert!(dropdown.is_open());
        dropdown.handle_event(&Event::Down);
        dropdown.handle_event(&Event::Enter);

        assert!(!dropdown.is_open());
        assert_eq!(dropdown.selected_text(), Some("Neurology"));
    }

    #[test]
    fn test_form_focus_wraps() {
        let mut form = sign_in_form();
        assert_eq!(form.focused_key(), Some("email"));
        form.focus_next();
        assert_eq!(form.focused_key(), Some("password"));
        form.focus_next();
        assert_eq!(form.focused_key(), Some("email"));
        form.focus_previous();
        assert_eq!(form.focused_key(), Some("password"));
    }

    #[test]
    fn test_form_routes_input_to_focus() {
        let mut form = sign_in_form();
        assert_eq!(form.handle_event(&Event::Char('x')), Some("email"));
        form.focus_next();
        form.handle_event(&Event::Char('y'));
        assert_eq!(form.value("email"), "x");
        assert_eq!(form.value("password"), "y");
        assert_eq!(form.value("missing"), "");
    }

    #[test]
    fn test_form_applies_errors() {
        let mut form = sign_in_form();
        let mut errors = FieldErrors::new();
        errors.insert("password", "Password is required");
        form.apply_errors(&errors);

        assert_eq!(form.error("password"), Some("Password is required"));
        assert_eq!(form.error("email"), None);

        form.clear_errors();
        assert_eq!(form.error("password"), None);
    }
}
