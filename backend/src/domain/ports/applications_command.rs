//! Driving port for application mutations.

use async_trait::async_trait;

use crate::domain::{Application, ApplicationDraft, ApplicationId, ApplicationStatus, Error};

/// Use-case port for creating applications and recording review decisions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationsCommand: Send + Sync {
    /// Create an application in the initial status.
    async fn create_application(&self, draft: ApplicationDraft) -> Result<Application, Error>;

    /// Record a status change and return the persisted record.
    async fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, Error>;

    /// Replace the whole collection with the given drafts.
    async fn replace_applications(
        &self,
        drafts: Vec<ApplicationDraft>,
    ) -> Result<Vec<Application>, Error>;

    /// Replace the collection with the built-in sample applications.
    async fn seed_samples(&self) -> Result<Vec<Application>, Error>;
}
