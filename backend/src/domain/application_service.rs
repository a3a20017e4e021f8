//! Application review service implementing the driving ports on top of the store.
//!
//! The store accepts any status update. Whether the server also refuses
//! transitions out of a terminal status is a deployment choice captured by
//! [`TransitionPolicy`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    ApplicationStore, ApplicationStoreError, ApplicationsCommand, ApplicationsQuery,
};
use crate::domain::{
    Application, ApplicationDraft, ApplicationId, ApplicationStatus, ApplicationSummary,
    CustomerId, Error, sample_application_drafts,
};

/// Server-side handling of status transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Accept any status update; callers are trusted to gate transitions.
    #[default]
    ClientTrusted,
    /// Refuse updates to applications that already carry a terminal status.
    Enforced,
}

pub(crate) fn map_store_error(error: ApplicationStoreError) -> Error {
    match error {
        ApplicationStoreError::NotFound { id } => {
            Error::not_found(format!("application {id} not found"))
                .with_details(json!({ "id": id }))
        }
        ApplicationStoreError::CustomerNotFound { customer_id } => Error::not_found(format!(
            "no application found for customer {customer_id}"
        ))
        .with_details(json!({ "customerId": customer_id })),
        ApplicationStoreError::Connection { message } => {
            Error::service_unavailable(format!("application store unavailable: {message}"))
        }
        ApplicationStoreError::Query { message } => {
            Error::internal(format!("application store error: {message}"))
        }
        ApplicationStoreError::Decode { message } => {
            Error::internal(format!("application record malformed: {message}"))
        }
    }
}

/// Review service backed by an [`ApplicationStore`].
#[derive(Clone)]
pub struct ApplicationService {
    store: Arc<dyn ApplicationStore>,
    policy: TransitionPolicy,
}

impl ApplicationService {
    /// Create a service that trusts callers to gate transitions.
    pub fn new(store: Arc<dyn ApplicationStore>) -> Self {
        Self::with_policy(store, TransitionPolicy::default())
    }

    /// Create a service with an explicit transition policy.
    pub fn with_policy(store: Arc<dyn ApplicationStore>, policy: TransitionPolicy) -> Self {
        Self { store, policy }
    }

    async fn ensure_transition_allowed(&self, id: &ApplicationId) -> Result<(), Error> {
        if self.policy == TransitionPolicy::ClientTrusted {
            return Ok(());
        }
        let current = self.store.get_by_id(id).await.map_err(map_store_error)?;
        if current.status().is_terminal() {
            return Err(Error::conflict(format!(
                "application {id} is already {}",
                current.status()
            ))
            .with_details(json!({
                "id": id.as_ref(),
                "status": current.status().as_str(),
                "code": "terminal_status",
            })));
        }
        Ok(())
    }
}

#[async_trait]
impl ApplicationsQuery for ApplicationService {
    async fn list_applications(&self) -> Result<Vec<Application>, Error> {
        self.store.list().await.map_err(map_store_error)
    }

    async fn get_application(&self, id: &ApplicationId) -> Result<Application, Error> {
        self.store.get_by_id(id).await.map_err(map_store_error)
    }

    async fn find_by_customer(&self, customer_id: &CustomerId) -> Result<Application, Error> {
        self.store
            .get_by_customer_id(customer_id)
            .await
            .map_err(map_store_error)
    }

    async fn summary(&self) -> Result<ApplicationSummary, Error> {
        let applications = self.store.list().await.map_err(map_store_error)?;
        Ok(ApplicationSummary::from_applications(&applications))
    }
}

#[async_trait]
impl ApplicationsCommand for ApplicationService {
    async fn create_application(&self, draft: ApplicationDraft) -> Result<Application, Error> {
        let created = self.store.create(draft).await.map_err(map_store_error)?;
        info!(
            application_id = %created.id(),
            customer_id = %created.customer_id(),
            "application created"
        );
        Ok(created)
    }

    async fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, Error> {
        self.ensure_transition_allowed(id).await?;
        match self.store.update_status(id, status).await {
            Ok(updated) => {
                info!(application_id = %id, status = %status, "application status updated");
                Ok(updated)
            }
            Err(error) => {
                warn!(application_id = %id, status = %status, %error, "status update failed");
                Err(map_store_error(error))
            }
        }
    }

    async fn replace_applications(
        &self,
        drafts: Vec<ApplicationDraft>,
    ) -> Result<Vec<Application>, Error> {
        let replaced = self
            .store
            .replace_all(drafts)
            .await
            .map_err(map_store_error)?;
        info!(count = replaced.len(), "application collection replaced");
        Ok(replaced)
    }

    async fn seed_samples(&self) -> Result<Vec<Application>, Error> {
        let drafts = sample_application_drafts()
            .map_err(|err| Error::internal(format!("invalid sample application: {err}")))?;
        self.replace_applications(drafts).await
    }
}

#[cfg(test)]
#[path = "application_service_tests.rs"]
mod tests;
