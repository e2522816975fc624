use rusqlite::ffi;
use thiserror::Error;

/// Failures raised by the record store. Uniqueness violations are kept apart
/// from every other persistence failure so the registration service can tell
/// a duplicate email from a broken database.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email {email} is already registered")]
    UniquenessViolation { email: String },
    #[error("failed to prepare data directory: {0}")]
    DataDir(#[source] std::io::Error),
    #[error(transparent)]
    Storage(#[from] rusqlite::Error),
}

impl StoreError {
    /// Classify an error raised by a write that carried `email`. Only the
    /// UNIQUE constraint maps to [`StoreError::UniquenessViolation`]; NOT NULL
    /// and every other failure stays a storage error.
    pub(crate) fn from_write(err: rusqlite::Error, email: Option<&str>) -> Self {
        let unique = matches!(
            &err,
            rusqlite::Error::SqliteFailure(code, _)
                if code.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
        );

        match (unique, email) {
            (true, Some(email)) => StoreError::UniquenessViolation {
                email: email.to_string(),
            },
            _ => StoreError::Storage(err),
        }
    }

    pub fn is_uniqueness_violation(&self) -> bool {
        matches!(self, StoreError::UniquenessViolation { .. })
    }
}
