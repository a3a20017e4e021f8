//! Tests for legacy record normalisation.

use rstest::rstest;
use serde_json::json;

use super::*;

fn timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

#[rstest]
fn canonical_record_is_read_verbatim() {
    let record = json!({
        "id": "A1",
        "customerId": "CUST001",
        "name": "Alice Williams",
        "creditScore": 720,
        "requiredScore": 700,
        "status": "Approved",
        "loanType": "Home Loan",
        "amount": "500000",
        "appliedDate": "2024-01-05T10:00:00.000Z",
        "reviewedBy": "reviewer@bank.test",
    });

    let application = normalize_record(&record).expect("canonical record");

    assert_eq!(application.id().as_ref(), "A1");
    assert_eq!(application.customer_id().as_ref(), "CUST001");
    assert_eq!(application.credit_score(), 720);
    assert_eq!(application.required_score(), 700);
    assert_eq!(application.status(), ApplicationStatus::Approved);
    assert_eq!(application.details().loan_type, "Home Loan");
    assert_eq!(application.details().amount.as_deref(), Some("500000"));
    assert_eq!(
        application.metadata().applied_date,
        Some(timestamp("2024-01-05T10:00:00Z"))
    );
    assert_eq!(
        application.metadata().reviewed_by.as_deref(),
        Some("reviewer@bank.test")
    );
}

#[rstest]
fn legacy_aliases_and_extended_json_are_understood() {
    let record = json!({
        "_id": { "$oid": "65f1c0ffee" },
        "Customer_ID": "CUST042",
        "customer_name": "Noah Brown",
        "Credit_Score": "612",
        "requiredMinimum": 600,
        "loan_amount": 250000,
        "pancardNumber": "ABCDE1234F",
        "Credit_Category": "Fair",
        "Lending_Outlook": "Cautious",
        "createdAt": { "$date": "2023-11-02T08:30:00Z" },
        "updatedAt": { "$date": { "$numberLong": "1700000000000" } },
    });

    let application = normalize_record(&record).expect("legacy record");

    assert_eq!(application.id().as_ref(), "65f1c0ffee");
    assert_eq!(application.customer_id().as_ref(), "CUST042");
    assert_eq!(application.details().name, "Noah Brown");
    assert_eq!(application.credit_score(), 612);
    assert_eq!(application.required_score(), 600);
    assert_eq!(application.details().amount.as_deref(), Some("250000"));
    assert_eq!(
        application.details().pan_card_number.as_deref(),
        Some("ABCDE1234F")
    );
    assert_eq!(application.details().credit_category.as_deref(), Some("Fair"));
    assert_eq!(
        application.details().lending_outlook.as_deref(),
        Some("Cautious")
    );
    assert_eq!(
        application.metadata().applied_date,
        Some(timestamp("2023-11-02T08:30:00Z"))
    );
    assert_eq!(
        application.metadata().last_updated,
        Utc.timestamp_millis_opt(1_700_000_000_000).single()
    );
}

#[rstest]
fn first_present_alias_wins_and_nulls_are_skipped() {
    let record = json!({
        "id": "A1",
        "customerId": null,
        "customer_id": "",
        "Customer_ID": "CUST007",
        "creditScore": 700,
        "credit_score": 100,
    });

    let application = normalize_record(&record).expect("record");

    assert_eq!(application.customer_id().as_ref(), "CUST007");
    assert_eq!(application.credit_score(), 700);
}

#[rstest]
fn missing_fields_fall_back_to_defaults() {
    let record = json!({ "id": "A9", "customerId": "CUST009", "phone": "" });

    let application = normalize_record(&record).expect("sparse record");

    assert_eq!(application.details().name, DEFAULT_APPLICANT_NAME);
    assert_eq!(application.details().loan_type, DEFAULT_LOAN_TYPE);
    assert_eq!(application.required_score(), DEFAULT_REQUIRED_SCORE);
    assert_eq!(application.credit_score(), 0);
    assert_eq!(application.details().phone, None);
    assert_eq!(application.status(), ApplicationStatus::UnderScrutiny);
    assert_eq!(application.metadata(), &ReviewMetadata::default());
}

#[rstest]
#[case(json!(780), ApplicationStatus::Approved)]
#[case(json!(750), ApplicationStatus::Approved)]
#[case(json!("700"), ApplicationStatus::UnderScrutiny)]
#[case(json!(650), ApplicationStatus::UnderScrutiny)]
#[case(json!(649), ApplicationStatus::Rejected)]
#[case(json!(0), ApplicationStatus::UnderScrutiny)]
fn absent_status_is_derived_from_the_score(
    #[case] score: Value,
    #[case] expected: ApplicationStatus,
) {
    let record = json!({ "id": "A1", "customerId": "CUST001", "creditScore": score });

    let application = normalize_record(&record).expect("record");

    assert_eq!(application.status(), expected);
}

#[rstest]
fn pending_is_read_as_under_scrutiny() {
    let record = json!({
        "id": "A1",
        "customerId": "CUST001",
        "creditScore": 780,
        "status": "Pending",
    });

    let application = normalize_record(&record).expect("record");

    assert_eq!(application.status(), ApplicationStatus::UnderScrutiny);
}

#[rstest]
#[case::not_an_object(json!(["A1"]), "JSON object")]
#[case::no_id(json!({ "customerId": "CUST001" }), "no id")]
#[case::no_customer(json!({ "id": "A1" }), "no customer id")]
#[case::bad_status(json!({ "id": "A1", "customerId": "C", "status": "Escalated" }), "Escalated")]
#[case::bad_score(json!({ "id": "A1", "customerId": "C", "creditScore": "high" }), "creditScore")]
#[case::huge_score(json!({ "id": "A1", "customerId": "C", "creditScore": 1.0e300 }), "creditScore")]
#[case::huge_score_text(json!({ "id": "A1", "customerId": "C", "creditScore": "9e18" }), "creditScore")]
#[case::not_a_number(json!({ "id": "A1", "customerId": "C", "creditScore": "NaN" }), "creditScore")]
#[case::bad_date(json!({ "id": "A1", "customerId": "C", "appliedDate": "yesterday" }), "appliedDate")]
fn unreadable_records_fail_with_decode_errors(#[case] record: Value, #[case] fragment: &str) {
    let error = normalize_record(&record).expect_err("record must be rejected");

    assert!(matches!(error, ApplicationStoreError::Decode { .. }));
    assert!(
        error.to_string().contains(fragment),
        "{error} should mention {fragment}"
    );
}

#[rstest]
fn documents_use_canonical_keys_and_read_back() {
    let record = json!({
        "_id": "A1",
        "customer_id": "CUST001",
        "credit_score": 720,
        "status": "Rejected",
        "reviewed_date": "2024-02-01T12:00:00Z",
    });
    let application = normalize_record(&record).expect("record");

    let document = serde_json::to_value(ApplicationDocument::from(&application))
        .expect("document serialises");

    assert_eq!(document["id"], json!("A1"));
    assert_eq!(document["customerId"], json!("CUST001"));
    assert_eq!(document["creditScore"], json!(720));
    assert_eq!(document["status"], json!("Rejected"));
    assert_eq!(document["reviewedDate"], json!("2024-02-01T12:00:00.000Z"));
    assert!(document.get("customer_id").is_none());
    assert_eq!(normalize_record(&document).expect("round trip"), application);
}
