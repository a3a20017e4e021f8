//! Process-local application store.
//!
//! Used for tests, demos and as the default when no data directory is
//! configured. Contents are lost on restart.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use tokio::sync::RwLock;

use super::application_collection::ApplicationCollection;
use crate::domain::ports::{ApplicationStore, ApplicationStoreError};
use crate::domain::{Application, ApplicationDraft, ApplicationId, ApplicationStatus, CustomerId};

/// [`ApplicationStore`] backed by a vector behind an async lock.
pub struct InMemoryApplicationStore {
    collection: RwLock<ApplicationCollection>,
    clock: Arc<dyn Clock>,
}

impl InMemoryApplicationStore {
    /// Create an empty store using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Create an empty store that stamps dates from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_records(Vec::new(), clock)
    }

    /// Create a store holding existing records.
    pub fn with_records(records: Vec<Application>, clock: Arc<dyn Clock>) -> Self {
        Self {
            collection: RwLock::new(ApplicationCollection::new(records)),
            clock,
        }
    }
}

impl Default for InMemoryApplicationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApplicationStore for InMemoryApplicationStore {
    async fn list(&self) -> Result<Vec<Application>, ApplicationStoreError> {
        Ok(self.collection.read().await.records().to_vec())
    }

    async fn get_by_id(&self, id: &ApplicationId) -> Result<Application, ApplicationStoreError> {
        self.collection.read().await.find(id)
    }

    async fn get_by_customer_id(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Application, ApplicationStoreError> {
        self.collection.read().await.find_by_customer(customer_id)
    }

    async fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, ApplicationStoreError> {
        let now = self.clock.utc();
        self.collection.write().await.update_status(id, status, now)
    }

    async fn create(&self, draft: ApplicationDraft) -> Result<Application, ApplicationStoreError> {
        let now = self.clock.utc();
        Ok(self.collection.write().await.insert(draft, now))
    }

    async fn replace_all(
        &self,
        drafts: Vec<ApplicationDraft>,
    ) -> Result<Vec<Application>, ApplicationStoreError> {
        let now = self.clock.utc();
        Ok(self.collection.write().await.replace_all(drafts, now))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{ApplicantDetails, sample_application_drafts};
    use crate::test_support::MutableClock;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-10T09:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        Arc::new(MutableClock::new(start()))
    }

    fn draft(customer: &str) -> ApplicationDraft {
        ApplicationDraft::new(
            CustomerId::new(customer).expect("customer id"),
            690,
            ApplicantDetails::named("Emma Johnson"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn created_applications_are_listed_newest_first(clock: Arc<MutableClock>) {
        let store = InMemoryApplicationStore::with_clock(clock.clone());
        let first = store.create(draft("CUST001")).await.expect("create");
        clock.advance(std::time::Duration::from_secs(60));
        let second = store.create(draft("CUST002")).await.expect("create");

        let listed = store.list().await.expect("list");

        assert_eq!(listed, vec![second, first]);
        assert_eq!(listed[1].metadata().applied_date, Some(start()));
    }

    #[rstest]
    #[tokio::test]
    async fn update_status_persists_without_gating(clock: Arc<MutableClock>) {
        let store = InMemoryApplicationStore::with_clock(clock.clone());
        let created = store.create(draft("CUST001")).await.expect("create");

        store
            .update_status(created.id(), ApplicationStatus::Approved)
            .await
            .expect("approve");
        let reverted = store
            .update_status(created.id(), ApplicationStatus::UnderScrutiny)
            .await
            .expect("store accepts any status");

        assert_eq!(reverted.status(), ApplicationStatus::UnderScrutiny);
        assert_eq!(
            store.get_by_id(created.id()).await.expect("get"),
            reverted
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_lookups_are_not_found(clock: Arc<MutableClock>) {
        let store = InMemoryApplicationStore::with_clock(clock);
        let id = ApplicationId::new("nope").expect("id");
        let customer = CustomerId::new("CUST404").expect("customer id");

        assert!(store.get_by_id(&id).await.expect_err("missing").is_not_found());
        assert_eq!(
            store
                .get_by_customer_id(&customer)
                .await
                .expect_err("missing"),
            ApplicationStoreError::customer_not_found("CUST404")
        );
        assert!(
            store
                .update_status(&id, ApplicationStatus::Approved)
                .await
                .expect_err("missing")
                .is_not_found()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn replace_all_swaps_the_collection(clock: Arc<MutableClock>) {
        let store = InMemoryApplicationStore::with_clock(clock);
        store.create(draft("CUST999")).await.expect("create");

        let seeded = store
            .replace_all(sample_application_drafts().expect("samples"))
            .await
            .expect("seed");

        assert_eq!(seeded.len(), 10);
        assert_eq!(store.list().await.expect("list").len(), 10);
        let customer = CustomerId::new("CUST999").expect("customer id");
        assert!(store.get_by_customer_id(&customer).await.is_err());
    }
}
