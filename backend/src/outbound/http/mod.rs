//! HTTP client adapters.

mod application_client;

pub use application_client::HttpApplicationStore;
