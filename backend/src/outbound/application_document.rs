//! Stored JSON document shape for applications.
//!
//! Records written over the years use camelCase, snake_case and PascalCase
//! keys, Mongo extended-JSON ids and dates, and numbers stored as strings.
//! [`normalize_record`] reads all of them onto [`Application`];
//! [`ApplicationDocument`] writes the canonical camelCase shape only.

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::ports::ApplicationStoreError;
use crate::domain::{
    ApplicantDetails, Application, ApplicationDraft, ApplicationId, ApplicationStatus, CustomerId,
    DEFAULT_APPLICANT_NAME, DEFAULT_LOAN_TYPE, DEFAULT_REQUIRED_SCORE, ReviewMetadata,
};

const ID: &[&str] = &["id", "_id"];
const CUSTOMER_ID: &[&str] = &["customerId", "customer_id", "Customer_ID"];
const NAME: &[&str] = &["name", "customerName", "customer_name"];
const CREDIT_SCORE: &[&str] = &["creditScore", "credit_score", "Credit_Score"];
const REQUIRED_SCORE: &[&str] = &["requiredScore", "required_score", "requiredMinimum"];
const STATUS: &[&str] = &["status"];
const EMAIL: &[&str] = &["email"];
const PHONE: &[&str] = &["phone"];
const ADDRESS: &[&str] = &["address"];
const OCCUPATION: &[&str] = &["occupation"];
const LOAN_TYPE: &[&str] = &["loanType", "loan_type"];
const AMOUNT: &[&str] = &["amount", "loanAmount", "loan_amount"];
const ANNUAL_INCOME: &[&str] = &["annualIncome", "annual_income"];
const PAN_CARD_NUMBER: &[&str] = &["panCardNumber", "pancardNumber", "pan_card_number"];
const CREDIT_CATEGORY: &[&str] = &["creditCategory", "credit_category", "Credit_Category"];
const LENDING_OUTLOOK: &[&str] = &["lendingOutlook", "lending_outlook", "Lending_Outlook"];
const POSITIVE_SUMMARY: &[&str] = &["positiveSummary", "positive_summary"];
const NEGATIVE_SUMMARY: &[&str] = &["negativeSummary", "negative_summary"];
const RECOMMENDATION_TIPS: &[&str] = &["recommendationTips", "recommendation_tips"];
const APPLIED_DATE: &[&str] = &["appliedDate", "applied_date", "createdAt"];
const REVIEWED_BY: &[&str] = &["reviewedBy", "reviewed_by"];
const REVIEWED_DATE: &[&str] = &["reviewedDate", "reviewed_date"];
const LAST_UPDATED: &[&str] = &["lastUpdated", "last_updated", "updatedAt"];

/// Canonical document written by the file store and read back by
/// [`normalize_record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDocument {
    pub id: String,
    pub customer_id: String,
    pub credit_score: i32,
    pub required_score: i32,
    pub status: ApplicationStatus,
    #[serde(flatten)]
    pub details: ApplicantDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

fn format_date(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(|date| date.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl From<&Application> for ApplicationDocument {
    fn from(application: &Application) -> Self {
        let metadata = application.metadata();
        Self {
            id: application.id().to_string(),
            customer_id: application.customer_id().to_string(),
            credit_score: application.credit_score(),
            required_score: application.required_score(),
            status: application.status(),
            details: application.details().clone(),
            applied_date: format_date(metadata.applied_date),
            reviewed_by: metadata.reviewed_by.clone(),
            reviewed_date: format_date(metadata.reviewed_date),
            last_updated: format_date(metadata.last_updated),
        }
    }
}

/// Request body for creating an application over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftDocument<'a> {
    pub customer_id: &'a str,
    pub credit_score: i32,
    pub required_score: i32,
    pub status: ApplicationStatus,
    #[serde(flatten)]
    pub details: &'a ApplicantDetails,
}

impl<'a> From<&'a ApplicationDraft> for DraftDocument<'a> {
    fn from(draft: &'a ApplicationDraft) -> Self {
        Self {
            customer_id: draft.customer_id.as_ref(),
            credit_score: draft.credit_score,
            required_score: draft.required_score,
            status: draft.status,
            details: &draft.details,
        }
    }
}

/// Map one stored or received JSON record onto an [`Application`].
///
/// # Errors
/// Returns [`ApplicationStoreError::Decode`] when the record is not an
/// object, lacks a usable id or customer id, or carries a value that cannot
/// be read (unknown status, non-numeric score, unparseable date).
///
/// # Examples
/// ```
/// use loan_desk::domain::ApplicationStatus;
/// use loan_desk::outbound::application_document::normalize_record;
/// use serde_json::json;
///
/// let record = json!({
///     "_id": { "$oid": "65f1c0ffee" },
///     "Customer_ID": "CUST042",
///     "credit_score": "780",
/// });
/// let application = normalize_record(&record).expect("legacy record");
/// assert_eq!(application.id().as_ref(), "65f1c0ffee");
/// assert_eq!(application.status(), ApplicationStatus::Approved);
/// ```
pub fn normalize_record(record: &Value) -> Result<Application, ApplicationStoreError> {
    let fields = record
        .as_object()
        .ok_or_else(|| ApplicationStoreError::decode("application record must be a JSON object"))?;
    let reader = FieldReader { fields };

    let raw_id = reader
        .text(ID)
        .ok_or_else(|| ApplicationStoreError::decode("application record has no id"))?;
    let id = ApplicationId::new(raw_id.trim())
        .map_err(|err| ApplicationStoreError::decode(format!("invalid id: {err}")))?;
    let customer_id = reader
        .text(CUSTOMER_ID)
        .ok_or_else(|| {
            ApplicationStoreError::decode(format!("application {id} has no customer id"))
        })
        .and_then(|raw| {
            CustomerId::new(raw).map_err(|err| {
                ApplicationStoreError::decode(format!("application {id}: {err}"))
            })
        })?;

    let credit_score = reader.number(CREDIT_SCORE).map_err(|err| decode_field(&id, err))?;
    let required_score = reader
        .number(REQUIRED_SCORE)
        .map_err(|err| decode_field(&id, err))?
        .unwrap_or(DEFAULT_REQUIRED_SCORE);
    let status = match reader.text(STATUS) {
        Some(raw) => raw
            .parse::<ApplicationStatus>()
            .map_err(|err| ApplicationStoreError::decode(format!("application {id}: {err}")))?,
        None => ApplicationStatus::derived_from_score(credit_score),
    };

    let details = ApplicantDetails {
        name: reader
            .text(NAME)
            .unwrap_or_else(|| DEFAULT_APPLICANT_NAME.to_owned()),
        email: reader.text(EMAIL),
        phone: reader.text(PHONE),
        address: reader.text(ADDRESS),
        occupation: reader.text(OCCUPATION),
        annual_income: reader.text(ANNUAL_INCOME),
        pan_card_number: reader.text(PAN_CARD_NUMBER),
        loan_type: reader
            .text(LOAN_TYPE)
            .unwrap_or_else(|| DEFAULT_LOAN_TYPE.to_owned()),
        amount: reader.text(AMOUNT),
        credit_category: reader.text(CREDIT_CATEGORY),
        lending_outlook: reader.text(LENDING_OUTLOOK),
        positive_summary: reader.text(POSITIVE_SUMMARY),
        negative_summary: reader.text(NEGATIVE_SUMMARY),
        recommendation_tips: reader.text(RECOMMENDATION_TIPS),
    };
    let metadata = ReviewMetadata {
        applied_date: reader.date(APPLIED_DATE).map_err(|err| decode_field(&id, err))?,
        reviewed_by: reader.text(REVIEWED_BY),
        reviewed_date: reader.date(REVIEWED_DATE).map_err(|err| decode_field(&id, err))?,
        last_updated: reader.date(LAST_UPDATED).map_err(|err| decode_field(&id, err))?,
    };

    let draft = ApplicationDraft {
        customer_id,
        credit_score: credit_score.unwrap_or(0),
        required_score,
        status,
        details,
    };
    Ok(Application::new(id, draft, metadata))
}

fn decode_field(id: &ApplicationId, message: String) -> ApplicationStoreError {
    ApplicationStoreError::decode(format!("application {id}: {message}"))
}

struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> FieldReader<'a> {
    /// First present text value; numbers are rendered and `$oid` wrappers unwrapped.
    fn text(&self, aliases: &[&str]) -> Option<String> {
        aliases
            .iter()
            .filter_map(|alias| self.fields.get(*alias))
            .find_map(text_value)
    }

    fn number(&self, aliases: &[&'static str]) -> Result<Option<i32>, String> {
        let Some((alias, value)) = self.present(aliases) else {
            return Ok(None);
        };
        number_value(value)
            .map(Some)
            .ok_or_else(|| format!("{alias} is not a whole number: {value}"))
    }

    fn date(&self, aliases: &[&'static str]) -> Result<Option<DateTime<Utc>>, String> {
        let Some((alias, value)) = self.present(aliases) else {
            return Ok(None);
        };
        date_value(value)
            .map(Some)
            .ok_or_else(|| format!("{alias} is not a date: {value}"))
    }

    fn present(&self, aliases: &[&'static str]) -> Option<(&'static str, &'a Value)> {
        aliases.iter().find_map(|alias| {
            self.fields
                .get(*alias)
                .filter(|value| !value.is_null() && !is_blank(value))
                .map(|value| (*alias, value))
        })
    }
}

fn is_blank(value: &Value) -> bool {
    value.as_str().is_some_and(|text| text.trim().is_empty())
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Object(object) => object.get("$oid").and_then(text_value),
        _ => None,
    }
}

fn number_value(value: &Value) -> Option<i32> {
    let wide = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(whole_number)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(whole_number))
        }
        Value::Object(object) => object
            .get("$numberInt")
            .or_else(|| object.get("$numberLong"))
            .and_then(number_value)
            .map(i64::from),
        _ => None,
    }?;
    i32::try_from(wide).ok()
}

/// Round a fractional score, refusing values no `i32` can hold.
fn whole_number(float: f64) -> Option<i64> {
    let rounded = float.round();
    if !rounded.is_finite() || rounded < f64::from(i32::MIN) || rounded > f64::from(i32::MAX) {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "bounded to the i32 range above"
    )]
    let whole = rounded as i64;
    Some(whole)
}

fn date_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_date_text(text.trim()),
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        Value::Object(object) => {
            let inner = object.get("$date")?;
            match inner {
                Value::Object(wrapped) => wrapped
                    .get("$numberLong")
                    .and_then(|millis| millis.as_str()?.parse::<i64>().ok())
                    .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
                other => date_value(other),
            }
        }
        _ => None,
    }
}

fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[path = "application_document_tests.rs"]
mod tests;
