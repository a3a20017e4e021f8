//! Port abstraction for application persistence adapters and their errors.
//!
//! The store is the single source of truth for application records. It is a
//! plain setter for status: it never checks whether a transition is allowed.

use async_trait::async_trait;

use crate::domain::{Application, ApplicationDraft, ApplicationId, ApplicationStatus, CustomerId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by application store adapters.
    pub enum ApplicationStoreError {
        /// No record carries the requested id.
        NotFound { id: String } => "application {id} not found"; not_found,
        /// No record carries the requested customer id.
        CustomerNotFound { customer_id: String } =>
            "no application found for customer {customer_id}"; not_found,
        /// The backing store could not be reached; the call may succeed later.
        Connection { message: String } =>
            "application store connection failed: {message}"; transient,
        /// Query or mutation failed during execution.
        Query { message: String } => "application store query failed: {message}",
        /// A stored or received record could not be mapped onto an application.
        Decode { message: String } => "application record could not be decoded: {message}",
    }
}

/// Persistence port for application records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Return every application, newest first where applied dates are known.
    async fn list(&self) -> Result<Vec<Application>, ApplicationStoreError>;

    /// Fetch one application by id.
    async fn get_by_id(&self, id: &ApplicationId) -> Result<Application, ApplicationStoreError>;

    /// Fetch the application of a customer.
    ///
    /// When several applications share the customer id, the most recently
    /// applied one is returned.
    async fn get_by_customer_id(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Application, ApplicationStoreError>;

    /// Set the status of an application and return the persisted record.
    async fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, ApplicationStoreError>;

    /// Persist a new application with a freshly assigned id.
    async fn create(&self, draft: ApplicationDraft) -> Result<Application, ApplicationStoreError>;

    /// Replace the whole collection with the given drafts.
    async fn replace_all(
        &self,
        drafts: Vec<ApplicationDraft>,
    ) -> Result<Vec<Application>, ApplicationStoreError>;
}
