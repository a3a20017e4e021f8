//! Shared record-keeping for stores that hold the whole collection in memory.

use chrono::{DateTime, Utc};

use crate::domain::ports::ApplicationStoreError;
use crate::domain::{
    Application, ApplicationDraft, ApplicationId, ApplicationStatus, CustomerId,
    sort_by_applied_desc,
};

/// Applications kept newest first.
#[derive(Debug, Clone, Default)]
pub(crate) struct ApplicationCollection {
    records: Vec<Application>,
}

impl ApplicationCollection {
    pub(crate) fn new(mut records: Vec<Application>) -> Self {
        sort_by_applied_desc(&mut records);
        Self { records }
    }

    pub(crate) fn records(&self) -> &[Application] {
        &self.records
    }

    pub(crate) fn find(&self, id: &ApplicationId) -> Result<Application, ApplicationStoreError> {
        self.records
            .iter()
            .find(|record| record.id() == id)
            .cloned()
            .ok_or_else(|| ApplicationStoreError::not_found(id.as_ref()))
    }

    /// Records are kept newest first, so the first match is the latest one.
    pub(crate) fn find_by_customer(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Application, ApplicationStoreError> {
        self.records
            .iter()
            .find(|record| record.customer_id() == customer_id)
            .cloned()
            .ok_or_else(|| ApplicationStoreError::customer_not_found(customer_id.as_ref()))
    }

    pub(crate) fn update_status(
        &mut self,
        id: &ApplicationId,
        status: ApplicationStatus,
        now: DateTime<Utc>,
    ) -> Result<Application, ApplicationStoreError> {
        let record = self
            .records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| ApplicationStoreError::not_found(id.as_ref()))?;
        record.record_status_change(status, now);
        Ok(record.clone())
    }

    pub(crate) fn insert(&mut self, draft: ApplicationDraft, now: DateTime<Utc>) -> Application {
        let created = Application::create(ApplicationId::random(), draft, now);
        self.records.insert(0, created.clone());
        created
    }

    pub(crate) fn replace_all(
        &mut self,
        drafts: Vec<ApplicationDraft>,
        now: DateTime<Utc>,
    ) -> Vec<Application> {
        self.records = drafts
            .into_iter()
            .map(|draft| Application::import(ApplicationId::random(), draft, now))
            .collect();
        self.records.clone()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{ApplicantDetails, ReviewMetadata};

    fn draft(customer: &str) -> ApplicationDraft {
        ApplicationDraft::new(
            CustomerId::new(customer).expect("customer id"),
            700,
            ApplicantDetails::named("Emma Johnson"),
        )
    }

    #[fixture]
    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-04-01T12:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    #[rstest]
    fn latest_application_wins_for_a_shared_customer(now: DateTime<Utc>) {
        let older = Application::new(
            ApplicationId::new("old").expect("id"),
            draft("CUST003"),
            ReviewMetadata {
                applied_date: Some(now - TimeDelta::days(30)),
                ..ReviewMetadata::default()
            },
        );
        let newer = Application::new(
            ApplicationId::new("new").expect("id"),
            draft("CUST003"),
            ReviewMetadata {
                applied_date: Some(now),
                ..ReviewMetadata::default()
            },
        );
        let collection = ApplicationCollection::new(vec![older, newer]);

        let found = collection
            .find_by_customer(&CustomerId::new("CUST003").expect("customer id"))
            .expect("customer exists");

        assert_eq!(found.id().as_ref(), "new");
    }

    #[rstest]
    fn update_stamps_review_dates(now: DateTime<Utc>) {
        let mut collection = ApplicationCollection::default();
        let created = collection.insert(draft("CUST001"), now);
        let later = now + TimeDelta::minutes(5);

        let updated = collection
            .update_status(created.id(), ApplicationStatus::Approved, later)
            .expect("update succeeds");

        assert_eq!(updated.status(), ApplicationStatus::Approved);
        assert_eq!(updated.metadata().applied_date, Some(now));
        assert_eq!(updated.metadata().reviewed_date, Some(later));
        assert_eq!(updated.metadata().last_updated, Some(later));
    }

    #[rstest]
    fn inserts_ignore_the_draft_status_but_bulk_loads_keep_it(now: DateTime<Utc>) {
        let mut decided = draft("CUST002");
        decided.status = ApplicationStatus::Approved;
        let mut collection = ApplicationCollection::default();

        let inserted = collection.insert(decided.clone(), now);
        assert_eq!(inserted.status(), ApplicationStatus::UnderScrutiny);

        let loaded = collection.replace_all(vec![decided], now);
        assert_eq!(
            loaded.first().map(Application::status),
            Some(ApplicationStatus::Approved)
        );
    }

    #[rstest]
    fn missing_ids_are_reported(now: DateTime<Utc>) {
        let mut collection = ApplicationCollection::default();
        let id = ApplicationId::new("missing").expect("id");

        let error = collection
            .update_status(&id, ApplicationStatus::Rejected, now)
            .expect_err("nothing to update");

        assert_eq!(error, ApplicationStoreError::not_found("missing"));
    }
}
