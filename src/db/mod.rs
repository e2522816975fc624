//! Persistence module split across logical submodules.

mod connection;
mod error;
mod students;

pub(crate) use connection::{ensure_schema, open};
pub use error::StoreError;
pub use students::StudentStore;
