//! Tests for HTTP error mapping.

use super::*;
use crate::domain::Error;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("already approved"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("store down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn response_payload(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id not valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should not be present"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_the_trace_id(expected_trace_id: String) {
    let error = Error::internal("application store error: disk full")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"path": "/var/lib/loan-desk"}));

    let redacted = response_payload(
        error,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;

    assert_eq!(redacted.code(), ErrorCode::InternalError);
    assert_eq!(redacted.message(), "Internal server error");
    assert!(redacted.details().is_none());
    assert_eq!(redacted.trace_id(), Some(TRACE_ID));
}

#[rstest]
#[actix_web::test]
async fn conflict_details_reach_the_client(expected_trace_id: String) {
    let error = Error::conflict("application A1 is already Approved")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"id": "A1", "status": "Approved", "code": "terminal_status"}));

    let payload = response_payload(
        error,
        StatusCode::CONFLICT,
        Some(expected_trace_id.as_str()),
    )
    .await;

    assert_eq!(payload.code(), ErrorCode::Conflict);
    assert_eq!(
        payload.details().and_then(|details| details.get("code")),
        Some(&json!("terminal_status"))
    );
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let error = Error::invalid_request("bad").with_details(json!({"field": "status"}));

    let payload = response_payload(error, StatusCode::BAD_REQUEST, None).await;

    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    assert_eq!(payload.message(), "bad");
    assert_eq!(payload.trace_id(), None);
    assert_eq!(payload.details(), Some(&json!({"field": "status"})));
}

#[rstest]
fn actix_errors_become_internal_errors() {
    let actix_error = actix_web::error::ErrorBadGateway("upstream exploded");

    let error = Error::from(actix_error);

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), "Internal server error");
}
