//! Domain models that mirror the `student` table and get passed between the
//! store, the registration service and the terminal front-end. These types
//! stay light-weight data holders; normalization and display mapping live
//! here so every layer agrees on what "absent" means.

use std::fmt;

/// Values offered by the sex radio group.
pub const SEXES: &[&str] = &["male", "female"];
/// Values offered by the branch combo box.
pub const BRANCHES: &[&str] = &["CSE", "MECH", "ENTC", "CIVIL"];
/// Values offered by the programming radio group.
pub const LANGUAGES: &[&str] = &["python", "java", "c"];

#[derive(Debug, Clone, PartialEq, Eq)]
/// A persisted student. Every column except the primary key may be NULL, so
/// the struct keeps them as `Option` rather than collapsing to empty strings.
pub struct Student {
    /// Primary key assigned by SQLite. Never reused after a delete because the
    /// table is declared `AUTOINCREMENT`.
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub sex: Option<String>,
    pub branch: Option<String>,
    pub programming: Option<String>,
}

/// The mutable part of a student record, exactly as it is written to the
/// store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub sex: Option<String>,
    pub branch: Option<String>,
    pub programming: Option<String>,
}

/// Raw values read off the form. Blank inputs arrive as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentInput {
    pub name: String,
    pub email: String,
    pub sex: String,
    pub branch: String,
    pub programming: String,
}

impl StudentInput {
    /// Convert form values into store values, turning every empty string into
    /// `None` so blank optional fields are stored as NULL.
    pub fn normalize(&self) -> StudentFields {
        StudentFields {
            name: absent_if_empty(&self.name),
            email: absent_if_empty(&self.email),
            sex: absent_if_empty(&self.sex),
            branch: absent_if_empty(&self.branch),
            programming: absent_if_empty(&self.programming),
        }
    }
}

fn absent_if_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Presentable version of a [`Student`]: the listing always shows six
/// non-absent values, so NULL columns become empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub sex: String,
    pub branch: String,
    pub programming: String,
}

impl From<Student> for StudentRow {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            name: student.name.unwrap_or_default(),
            email: student.email.unwrap_or_default(),
            sex: student.sex.unwrap_or_default(),
            branch: student.branch.unwrap_or_default(),
            programming: student.programming.unwrap_or_default(),
        }
    }
}

impl StudentRow {
    /// Cells in listing column order.
    pub fn cells(&self) -> [String; 6] {
        [
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.sex.clone(),
            self.branch.clone(),
            self.programming.clone(),
        ]
    }
}

/// Form fields that can carry field-level feedback.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Email,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormField::Name => write!(f, "name"),
            FormField::Email => write!(f, "email"),
        }
    }
}
