//! Registration service: the mediation layer between whatever presents the
//! form and the [`StudentStore`]. It normalizes raw input, forwards it to the
//! store and turns failures into feedback on the [`DisplaySurface`].

use log::{info, warn};
use thiserror::Error;

use crate::db::{StoreError, StudentStore};
use crate::models::{FormField, StudentFields, StudentInput, StudentRow};

pub const REQUIRED_FIELD: &str = "Required field";
pub const EMAIL_EXISTS: &str = "Email already exists";
pub const SELECT_FIRST: &str = "First select a register";

/// Callbacks the service uses to report back to the presentation layer.
pub trait DisplaySurface {
    fn clear_fields(&mut self);
    fn clear_feedback(&mut self);
    fn set_feedback(&mut self, field: FormField, message: &str);
    fn refresh_listing(&mut self, rows: Vec<StudentRow>);
    fn show_info(&mut self, title: &str, message: &str);
    fn show_warning(&mut self, title: &str, message: &str);
}

/// Outcome of a rejected operation. The surface has already been told about
/// it by the time one of these is returned.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("no student selected")]
    NoSelection,
    #[error("input rejected (name missing: {name_missing}, email taken: {email_taken})")]
    Rejected { name_missing: bool, email_taken: bool },
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct RegistrationService {
    store: StudentStore,
}

impl RegistrationService {
    pub fn new(store: StudentStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &StudentStore {
        &self.store
    }

    /// Create a student from raw form values.
    pub fn register<S: DisplaySurface>(
        &self,
        input: &StudentInput,
        surface: &mut S,
    ) -> Result<(), RegistrationError> {
        let fields = input.normalize();
        surface.clear_feedback();

        match self.store.create(&fields) {
            Ok(id) => {
                info!("registered student {id}");
                surface.clear_fields();
                self.refresh(surface);
                surface.show_info("Success", "Student has been registered.");
                Ok(())
            }
            Err(err) => Err(self.classify_failure(&fields, err, surface)),
        }
    }

    /// Overwrite the selected student with raw form values.
    pub fn update<S: DisplaySurface>(
        &self,
        id: Option<i64>,
        input: &StudentInput,
        surface: &mut S,
    ) -> Result<(), RegistrationError> {
        let Some(id) = id else {
            surface.show_warning("Wait", SELECT_FIRST);
            return Err(RegistrationError::NoSelection);
        };

        let fields = input.normalize();
        surface.clear_feedback();

        match self.store.update(id, &fields) {
            Ok(()) => {
                info!("updated student {id}");
                self.refresh(surface);
                surface.clear_fields();
                surface.show_info("Success", "Student has been updated.");
                Ok(())
            }
            Err(err) => Err(self.classify_failure(&fields, err, surface)),
        }
    }

    /// Remove the selected student.
    pub fn delete<S: DisplaySurface>(
        &self,
        id: Option<i64>,
        surface: &mut S,
    ) -> Result<(), RegistrationError> {
        let Some(id) = id else {
            surface.show_warning("Wait", SELECT_FIRST);
            return Err(RegistrationError::NoSelection);
        };

        match self.store.delete(id) {
            Ok(()) => {
                info!("deleted student {id}");
                self.refresh(surface);
                surface.clear_fields();
                surface.show_info("Success", "Student has been deleted.");
                Ok(())
            }
            Err(err) => {
                warn!("failed to delete student {id}: {err}");
                surface.show_warning("Error", &err.to_string());
                Err(err.into())
            }
        }
    }

    /// All students as presentable rows, in storage order.
    pub fn list(&self) -> Result<Vec<StudentRow>, StoreError> {
        Ok(self
            .store
            .list_all()?
            .into_iter()
            .map(StudentRow::from)
            .collect())
    }

    pub fn get(&self, id: i64) -> Result<Option<StudentRow>, StoreError> {
        Ok(self.store.find_by_id(id)?.map(StudentRow::from))
    }

    /// Push a fresh listing to the surface. A failing read is reported as a
    /// warning instead of leaving a stale table behind silently.
    pub fn refresh<S: DisplaySurface>(&self, surface: &mut S) {
        match self.list() {
            Ok(rows) => surface.refresh_listing(rows),
            Err(err) => {
                warn!("failed to load students: {err}");
                surface.show_warning("Error", &err.to_string());
            }
        }
    }

    /// Work out why a write failed. Both the missing name and the taken email
    /// are reported when they apply; only when neither does the raw error
    /// reach the user.
    fn classify_failure<S: DisplaySurface>(
        &self,
        fields: &StudentFields,
        err: StoreError,
        surface: &mut S,
    ) -> RegistrationError {
        let name_missing = fields.name.is_none();
        if name_missing {
            surface.set_feedback(FormField::Name, REQUIRED_FIELD);
        }

        let email_taken = match fields.email.as_deref() {
            Some(email) => match self.store.find_by_email(email) {
                Ok(found) => found.is_some(),
                Err(lookup_err) => {
                    warn!("email lookup failed while classifying a write error: {lookup_err}");
                    false
                }
            },
            None => false,
        };
        if email_taken {
            surface.set_feedback(FormField::Email, EMAIL_EXISTS);
        }

        if name_missing || email_taken {
            info!("write rejected (name missing: {name_missing}, email taken: {email_taken})");
            RegistrationError::Rejected {
                name_missing,
                email_taken,
            }
        } else {
            warn!("write failed: {err}");
            surface.show_warning("Error", &err.to_string());
            RegistrationError::Store(err)
        }
    }
}
