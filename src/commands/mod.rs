//! Remote Data Commands
//!
//! Bindings to the remote data service, organized by domain. Views only see
//! these traits: the Supabase client implements them for the browser, an
//! in-memory fake implements them for tests.

mod auth;
mod note;
mod task;

#[cfg(test)]
pub mod memory;

pub use auth::*;
pub use note::*;
pub use task::*;

/// Failure of a table operation
pub use supabase_rest::Error as StoreError;

const TASKS_TABLE: &str = "tasks";
const NOTES_TABLE: &str = "notes";
