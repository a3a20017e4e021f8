//! Application store adapters that keep records locally.
//!
//! - **in memory**: process-local collection for tests and demos.
//! - **JSON file**: the same collection made durable in one document under
//!   the configured data directory, written through `cap_std`.
//!
//! Both adapters keep the collection newest first and stamp review dates
//! from an injected clock. They never decide whether a status change is
//! allowed.

mod application_collection;
mod in_memory_application_store;
mod json_file_application_store;

pub use in_memory_application_store::InMemoryApplicationStore;
pub use json_file_application_store::{APPLICATIONS_FILE, JsonFileApplicationStore};
