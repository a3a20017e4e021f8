//! Driving port for reading applications.
//!
//! Inbound adapters use this port to fetch review data without importing
//! store adapters.

use async_trait::async_trait;

use crate::domain::{Application, ApplicationId, ApplicationSummary, CustomerId, Error};

/// Use-case port for application reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationsQuery: Send + Sync {
    /// List applications, newest first.
    async fn list_applications(&self) -> Result<Vec<Application>, Error>;

    /// Fetch one application; `not_found` when absent.
    async fn get_application(&self, id: &ApplicationId) -> Result<Application, Error>;

    /// Fetch the application of a customer; `not_found` when absent.
    async fn find_by_customer(&self, customer_id: &CustomerId) -> Result<Application, Error>;

    /// Counters for the review dashboard.
    async fn summary(&self) -> Result<ApplicationSummary, Error>;
}
