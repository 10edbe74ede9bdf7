use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::controller::FormFields;

/// Internal representation of the three roster inputs.
#[derive(Default, Clone)]
pub(crate) struct StudentForm {
    pub(crate) name: String,
    pub(crate) roll: String,
    pub(crate) marks: String,
    pub(crate) active: StudentField,
}

/// Fields available within the student form, in focus order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum StudentField {
    #[default]
    Name,
    Roll,
    Marks,
}

impl StudentField {
    pub(crate) const ALL: [StudentField; 3] =
        [StudentField::Name, StudentField::Roll, StudentField::Marks];

    pub(crate) fn label(self) -> &'static str {
        match self {
            StudentField::Name => "Name",
            StudentField::Roll => "Roll No",
            StudentField::Marks => "Marks",
        }
    }

    fn next(self) -> Self {
        match self {
            StudentField::Name => StudentField::Roll,
            StudentField::Roll => StudentField::Marks,
            StudentField::Marks => StudentField::Name,
        }
    }

    fn previous(self) -> Self {
        match self {
            StudentField::Name => StudentField::Marks,
            StudentField::Roll => StudentField::Name,
            StudentField::Marks => StudentField::Roll,
        }
    }
}

impl StudentForm {
    /// Move focus to the next field, wrapping around.
    pub(crate) fn focus_next(&mut self) {
        self.active = self.active.next();
    }

    /// Move focus to the previous field, wrapping around.
    pub(crate) fn focus_previous(&mut self) {
        self.active = self.active.previous();
    }

    fn value_mut(&mut self, field: StudentField) -> &mut String {
        match field {
            StudentField::Name => &mut self.name,
            StudentField::Roll => &mut self.roll,
            StudentField::Marks => &mut self.marks,
        }
    }

    pub(crate) fn value(&self, field: StudentField) -> &str {
        match field {
            StudentField::Name => &self.name,
            StudentField::Roll => &self.roll,
            StudentField::Marks => &self.marks,
        }
    }

    /// Append a character to the active field. Control characters are
    /// ignored; whether marks are numeric is decided when an action runs.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let field = self.active;
        self.value_mut(field).push(ch);
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        let field = self.active;
        self.value_mut(field).pop();
    }

    /// Empty every field and return focus to the name input.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Snapshot handed to the controller.
    pub(crate) fn fields(&self) -> FormFields {
        FormFields::new(&self.name, &self.roll, &self.marks)
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: StudentField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{:<9}", format!("{}:", field.label()))),
            Span::styled(value.to_string(), style),
        ])
    }

    /// Column where the cursor sits for the given field.
    pub(crate) fn cursor_offset(&self, field: StudentField) -> usize {
        9 + self.value(field).chars().count()
    }
}
