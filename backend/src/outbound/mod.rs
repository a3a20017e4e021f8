//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of the [`ApplicationStore`](crate::domain::ports::ApplicationStore)
//! port:
//!
//! - **persistence**: in-memory and JSON-file stores
//! - **http**: reqwest client for a remote loan desk server
//!
//! Adapters are thin translators between domain types and stored or
//! transmitted documents. They contain no business logic.

pub mod application_document;
pub mod http;
pub mod persistence;
