//! Single-record input form shared by create and edit flows.

use std::fmt;

use shared::domain::{NewUser, UserRecord};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Email,
    Name,
    Age,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Email, FormField::Name, FormField::Age];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Email => "Email",
            FormField::Name => "Name",
            FormField::Age => "Age",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::Email => "e.g. user@example.com",
            FormField::Name => "e.g. Jane Doe",
            FormField::Age => "e.g. 30",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit,
}

/// Input constraint violated at submit time. Never reaches the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(FormField),
    #[error("Age must be a whole number of at least 0")]
    InvalidAge,
}

#[derive(Debug, Clone, Default)]
pub struct UserForm {
    email: String,
    name: String,
    age: String,
    mode: FormMode,
    last_error: Option<FormError>,
}

impl UserForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Email => &self.email,
            FormField::Name => &self.name,
            FormField::Age => &self.age,
        }
    }

    pub fn last_error(&self) -> Option<FormError> {
        self.last_error
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Register user",
            FormMode::Edit => "Edit user",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Submit",
            FormMode::Edit => "Update",
        }
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Email => self.email = value,
            FormField::Name => self.name = value,
            FormField::Age => self.age = value,
        }
    }

    /// Switches mode from the edit target. Entering edit mode pre-fills every
    /// field; leaving it keeps whatever is currently typed.
    pub fn set_edit_target(&mut self, target: Option<&UserRecord>) {
        match target {
            Some(user) => {
                self.mode = FormMode::Edit;
                self.email = user.email.clone();
                self.name = user.name.clone();
                self.age = user.age.to_string();
                self.last_error = None;
            }
            None => self.mode = FormMode::Create,
        }
    }

    pub fn validate(&self) -> Result<NewUser, FormError> {
        for field in FormField::ALL {
            if self.value(field).trim().is_empty() {
                return Err(FormError::MissingField(field));
            }
        }
        let age = self
            .age
            .trim()
            .parse::<u32>()
            .map_err(|_| FormError::InvalidAge)?;
        Ok(NewUser {
            email: self.email.clone(),
            name: self.name.clone(),
            age,
        })
    }

    /// Validates and builds the record. In create mode the fields are reset
    /// afterwards; in edit mode they are left for the caller to retire.
    pub fn submit(&mut self) -> Result<NewUser, FormError> {
        let user = match self.validate() {
            Ok(user) => user,
            Err(err) => {
                self.last_error = Some(err);
                return Err(err);
            }
        };
        self.last_error = None;
        if self.mode == FormMode::Create {
            self.email.clear();
            self.name.clear();
            self.age.clear();
        }
        Ok(user)
    }
}
