//! Tests for the application review service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockApplicationStore;
use crate::domain::{ApplicantDetails, ErrorCode, ReviewMetadata};

fn application(id: &str, status: ApplicationStatus, score: i32) -> Application {
    let mut draft = ApplicationDraft::new(
        CustomerId::new("CUST001").expect("customer id"),
        score,
        ApplicantDetails::named("Alice Williams"),
    );
    draft.status = status;
    Application::new(
        ApplicationId::new(id).expect("application id"),
        draft,
        ReviewMetadata::default(),
    )
}

#[fixture]
fn a1() -> ApplicationId {
    ApplicationId::new("A1").expect("application id")
}

#[rstest]
#[tokio::test]
async fn update_status_passes_through_to_the_store(a1: ApplicationId) {
    let mut store = MockApplicationStore::new();
    store.expect_get_by_id().times(0);
    store
        .expect_update_status()
        .with(eq(a1.clone()), eq(ApplicationStatus::Approved))
        .times(1)
        .return_once(|_, _| Ok(application("A1", ApplicationStatus::Approved, 720)));

    let service = ApplicationService::new(Arc::new(store));
    let updated = service
        .update_status(&a1, ApplicationStatus::Approved)
        .await
        .expect("update succeeds");

    assert_eq!(updated.status(), ApplicationStatus::Approved);
}

#[rstest]
#[tokio::test]
async fn trusted_policy_lets_terminal_records_change(a1: ApplicationId) {
    let mut store = MockApplicationStore::new();
    store
        .expect_update_status()
        .times(1)
        .return_once(|_, _| Ok(application("A1", ApplicationStatus::Rejected, 720)));

    let service = ApplicationService::new(Arc::new(store));
    let updated = service
        .update_status(&a1, ApplicationStatus::Rejected)
        .await
        .expect("store accepts any update");

    assert_eq!(updated.status(), ApplicationStatus::Rejected);
}

#[rstest]
#[tokio::test]
async fn enforced_policy_refuses_terminal_records(a1: ApplicationId) {
    let mut store = MockApplicationStore::new();
    store
        .expect_get_by_id()
        .times(1)
        .return_once(|_| Ok(application("A1", ApplicationStatus::Approved, 720)));
    store.expect_update_status().times(0);

    let service = ApplicationService::with_policy(Arc::new(store), TransitionPolicy::Enforced);
    let error = service
        .update_status(&a1, ApplicationStatus::Rejected)
        .await
        .expect_err("terminal record is refused");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(
        error.details().and_then(|d| d.get("status")),
        Some(&json!("Approved"))
    );
}

#[rstest]
#[tokio::test]
async fn enforced_policy_allows_records_under_scrutiny(a1: ApplicationId) {
    let mut store = MockApplicationStore::new();
    store
        .expect_get_by_id()
        .times(1)
        .return_once(|_| Ok(application("A1", ApplicationStatus::UnderScrutiny, 720)));
    store
        .expect_update_status()
        .times(1)
        .return_once(|_, _| Ok(application("A1", ApplicationStatus::Approved, 720)));

    let service = ApplicationService::with_policy(Arc::new(store), TransitionPolicy::Enforced);
    let updated = service
        .update_status(&a1, ApplicationStatus::Approved)
        .await
        .expect("transition allowed");

    assert_eq!(updated.status(), ApplicationStatus::Approved);
}

#[rstest]
#[case(ApplicationStoreError::not_found("A1"), ErrorCode::NotFound)]
#[case(ApplicationStoreError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(ApplicationStoreError::query("write failed"), ErrorCode::InternalError)]
#[case(ApplicationStoreError::decode("no id"), ErrorCode::InternalError)]
#[tokio::test]
async fn store_failures_map_to_domain_codes(
    a1: ApplicationId,
    #[case] failure: ApplicationStoreError,
    #[case] expected: ErrorCode,
) {
    let mut store = MockApplicationStore::new();
    store
        .expect_update_status()
        .times(1)
        .return_once(move |_, _| Err(failure));

    let service = ApplicationService::new(Arc::new(store));
    let error = service
        .update_status(&a1, ApplicationStatus::Approved)
        .await
        .expect_err("store failure surfaces");

    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn missing_customer_is_not_found_with_details() {
    let mut store = MockApplicationStore::new();
    store
        .expect_get_by_customer_id()
        .times(1)
        .return_once(|_| Err(ApplicationStoreError::customer_not_found("CUST999")));

    let service = ApplicationService::new(Arc::new(store));
    let customer = CustomerId::new("CUST999").expect("customer id");
    let error = service
        .find_by_customer(&customer)
        .await
        .expect_err("absent customer");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(
        error.details().and_then(|d| d.get("customerId")),
        Some(&json!("CUST999"))
    );
}

#[rstest]
#[tokio::test]
async fn summary_tallies_listed_applications() {
    let mut store = MockApplicationStore::new();
    store.expect_list().times(1).return_once(|| {
        Ok(vec![
            application("A1", ApplicationStatus::Approved, 700),
            application("A2", ApplicationStatus::UnderScrutiny, 600),
        ])
    });

    let service = ApplicationService::new(Arc::new(store));
    let summary = service.summary().await.expect("summary");

    assert_eq!(summary.total, 2);
    assert_eq!(summary.approved, 1);
    assert_eq!(summary.under_scrutiny, 1);
    assert_eq!(summary.average_credit_score, 650);
}

#[rstest]
#[tokio::test]
async fn seeding_replaces_the_collection_with_samples() {
    let mut store = MockApplicationStore::new();
    store
        .expect_replace_all()
        .withf(|drafts| drafts.len() == 10)
        .times(1)
        .return_once(|drafts| {
            Ok(drafts
                .into_iter()
                .map(|draft| Application::new(ApplicationId::random(), draft, ReviewMetadata::default()))
                .collect())
        });

    let service = ApplicationService::new(Arc::new(store));
    let seeded = service.seed_samples().await.expect("seeding succeeds");

    assert_eq!(seeded.len(), 10);
}
