//! Core library surface for the Student Registry TUI application.
//!
//! The record store and the registration service are usable without the
//! terminal front-end, which is how the integration tests drive them.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod service;
pub mod ui;

/// Persistence layer: the SQLite-backed record store and its error type.
pub use db::{StoreError, StudentStore};

/// Domain types passed between the layers.
pub use models::{FormField, Student, StudentFields, StudentInput, StudentRow};

pub use service::{DisplaySurface, RegistrationError, RegistrationService};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
