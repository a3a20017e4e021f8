//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{
    ApplicationId, ApplicationStatus, ApplicationValidationError, CustomerId, Error,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
    MissingField,
    UnknownStatus,
    InitialStatus,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::MissingField => "missing_field",
            ErrorCode::UnknownStatus => "unknown_status",
            ErrorCode::InitialStatus => "initial_status",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) const ID_FIELD: FieldName = FieldName::new("id");
pub(crate) const CUSTOMER_ID_FIELD: FieldName = FieldName::new("customerId");
pub(crate) const STATUS_FIELD: FieldName = FieldName::new("status");

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn field_error_with_value(
    field: FieldName,
    code: ErrorCode,
    message: impl Into<String>,
    value: &str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {}", field.as_str()),
    )
}

/// Parse an application id taken from the request path.
pub(crate) fn parse_application_id(raw: &str) -> Result<ApplicationId, Error> {
    ApplicationId::new(raw).map_err(|err| {
        field_error_with_value(ID_FIELD, ErrorCode::InvalidId, err.to_string(), raw)
    })
}

/// Parse a customer id taken from a path or body.
pub(crate) fn parse_customer_id(raw: &str, field: FieldName) -> Result<CustomerId, Error> {
    CustomerId::new(raw).map_err(|err| match err {
        ApplicationValidationError::EmptyCustomerId => missing_field_error(field),
        other => field_error_with_value(field, ErrorCode::InvalidId, other.to_string(), raw),
    })
}

/// Parse a status wire name, listing the accepted values on failure.
pub(crate) fn parse_status(raw: &str) -> Result<ApplicationStatus, Error> {
    raw.parse::<ApplicationStatus>().map_err(|_| {
        let allowed: Vec<&str> = ApplicationStatus::ALL.iter().map(|s| s.as_str()).collect();
        Error::invalid_request(format!("unknown status: {raw}")).with_details(json!({
            "field": STATUS_FIELD.as_str(),
            "value": raw,
            "allowed": allowed,
            "code": ErrorCode::UnknownStatus.as_str(),
        }))
    })
}

/// New submissions may only start `Under Scrutiny`.
pub(crate) fn ensure_initial_status(status: ApplicationStatus) -> Result<(), Error> {
    if status == ApplicationStatus::UnderScrutiny {
        return Ok(());
    }
    Err(field_error_with_value(
        STATUS_FIELD,
        ErrorCode::InitialStatus,
        format!(
            "new applications start as {}",
            ApplicationStatus::UnderScrutiny.as_str()
        ),
        status.as_str(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;

    #[rstest]
    fn padded_ids_are_rejected_with_field_details() {
        let error = parse_application_id(" A1").expect_err("padded id");

        assert_eq!(error.code(), DomainCode::InvalidRequest);
        let details = error.details().expect("details");
        assert_eq!(details["field"], "id");
        assert_eq!(details["code"], "invalid_id");
        assert_eq!(details["value"], " A1");
    }

    #[rstest]
    #[case("   ")]
    #[case("")]
    fn blank_customer_ids_are_missing(#[case] raw: &str) {
        let error = parse_customer_id(raw, CUSTOMER_ID_FIELD).expect_err("blank");

        let details = error.details().expect("details");
        assert_eq!(details["field"], "customerId");
        assert_eq!(details["code"], "missing_field");
    }

    #[rstest]
    #[case("Approved", ApplicationStatus::Approved)]
    #[case("Under Scrutiny", ApplicationStatus::UnderScrutiny)]
    #[case("Pending", ApplicationStatus::UnderScrutiny)]
    fn known_statuses_parse(#[case] raw: &str, #[case] expected: ApplicationStatus) {
        assert_eq!(parse_status(raw).expect("known status"), expected);
    }

    #[rstest]
    #[case("approved")]
    #[case("Done")]
    fn unknown_statuses_list_allowed_values(#[case] raw: &str) {
        let error = parse_status(raw).expect_err("unknown status");

        let details = error.details().expect("details");
        assert_eq!(details["code"], "unknown_status");
        assert_eq!(
            details["allowed"],
            json!(["Under Scrutiny", "Approved", "Rejected"])
        );
    }

    #[rstest]
    fn decided_statuses_are_not_valid_initial_statuses() {
        assert!(ensure_initial_status(ApplicationStatus::UnderScrutiny).is_ok());

        let error = ensure_initial_status(ApplicationStatus::Rejected).expect_err("decided");
        let details = error.details().expect("details");
        assert_eq!(details["field"], "status");
        assert_eq!(details["value"], "Rejected");
        assert_eq!(details["code"], "initial_status");
    }
}
