//! Reqwest-backed application store speaking the loan desk REST contract.
//!
//! This adapter owns transport details only: URL building, timeouts, HTTP
//! status mapping and decoding responses through [`normalize_record`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde_json::{Value, json};
use tracing::debug;

use crate::domain::ports::{ApplicationStore, ApplicationStoreError};
use crate::domain::{
    Application, ApplicationDraft, ApplicationId, ApplicationStatus, CustomerId, TRACE_ID_HEADER,
    TraceId,
};
use crate::outbound::application_document::{DraftDocument, normalize_record};

/// What a request was looking for, used to phrase 404 responses.
enum Target<'a> {
    Collection,
    Application(&'a ApplicationId),
    Customer(&'a CustomerId),
}

/// [`ApplicationStore`] that forwards every call to a loan desk server.
pub struct HttpApplicationStore {
    client: Client,
    base_url: Url,
}

impl HttpApplicationStore {
    /// Build an adapter for the API rooted at `base_url` (for example
    /// `http://127.0.0.1:8080/api/v1/`) with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApplicationStoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ApplicationStoreError::query(format!(
                    "base URL {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Requests made inside a [`TraceId::scope`] carry the identifier so the
    /// server logs the call under the same trace.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        match TraceId::current() {
            Some(trace_id) => builder.header(TRACE_ID_HEADER, trace_id.to_string()),
            None => builder,
        }
    }

    async fn send(
        &self,
        request: RequestBuilder,
        target: Target<'_>,
    ) -> Result<Value, ApplicationStoreError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref(), &target));
        }
        debug!(status = status.as_u16(), bytes = body.len(), "application API call succeeded");
        serde_json::from_slice(body.as_ref()).map_err(|error| {
            ApplicationStoreError::decode(format!("invalid JSON payload: {error}"))
        })
    }
}

#[async_trait]
impl ApplicationStore for HttpApplicationStore {
    async fn list(&self) -> Result<Vec<Application>, ApplicationStoreError> {
        let url = self.endpoint(&["applications"])?;
        let body = self
            .send(self.request(Method::GET, url), Target::Collection)
            .await?;
        decode_list(&body)
    }

    async fn get_by_id(&self, id: &ApplicationId) -> Result<Application, ApplicationStoreError> {
        let url = self.endpoint(&["applications", id.as_ref()])?;
        let body = self
            .send(self.request(Method::GET, url), Target::Application(id))
            .await?;
        normalize_record(&body)
    }

    async fn get_by_customer_id(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Application, ApplicationStoreError> {
        let url = self.endpoint(&["users", customer_id.as_ref()])?;
        let body = self
            .send(self.request(Method::GET, url), Target::Customer(customer_id))
            .await?;
        normalize_record(&body)
    }

    async fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, ApplicationStoreError> {
        let url = self.endpoint(&["applications", id.as_ref(), "status"])?;
        let request = self
            .request(Method::PATCH, url)
            .json(&json!({ "status": status.as_str() }));
        let body = self.send(request, Target::Application(id)).await?;
        normalize_record(unwrap_application(&body))
    }

    async fn create(&self, draft: ApplicationDraft) -> Result<Application, ApplicationStoreError> {
        let url = self.endpoint(&["applications"])?;
        let draft = ApplicationDraft {
            status: ApplicationStatus::UnderScrutiny,
            ..draft
        };
        let request = self
            .request(Method::POST, url)
            .json(&DraftDocument::from(&draft));
        let body = self.send(request, Target::Collection).await?;
        normalize_record(&body)
    }

    async fn replace_all(
        &self,
        drafts: Vec<ApplicationDraft>,
    ) -> Result<Vec<Application>, ApplicationStoreError> {
        let url = self.endpoint(&["applications"])?;
        let documents: Vec<DraftDocument<'_>> = drafts.iter().map(DraftDocument::from).collect();
        let request = self.request(Method::PUT, url).json(&documents);
        let body = self.send(request, Target::Collection).await?;
        decode_list(&body)
    }
}

/// Some servers answer a status change with `{"message", "application"}`.
fn unwrap_application(body: &Value) -> &Value {
    match body.get("application") {
        Some(inner) if inner.is_object() => inner,
        _ => body,
    }
}

fn decode_list(body: &Value) -> Result<Vec<Application>, ApplicationStoreError> {
    body.as_array()
        .ok_or_else(|| ApplicationStoreError::decode("expected a JSON array of applications"))?
        .iter()
        .map(normalize_record)
        .collect()
}

fn map_transport_error(error: reqwest::Error) -> ApplicationStoreError {
    if error.is_timeout() {
        ApplicationStoreError::connection(format!("request timed out: {error}"))
    } else {
        ApplicationStoreError::connection(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8], target: &Target<'_>) -> ApplicationStoreError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match (status, target) {
        (StatusCode::NOT_FOUND, Target::Application(id)) => {
            ApplicationStoreError::not_found(id.as_ref())
        }
        (StatusCode::NOT_FOUND, Target::Customer(customer_id)) => {
            ApplicationStoreError::customer_not_found(customer_id.as_ref())
        }
        (StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS, _) => {
            ApplicationStoreError::connection(message)
        }
        _ if status.is_server_error() => ApplicationStoreError::connection(message),
        _ => ApplicationStoreError::query(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network mapping helpers.

    use super::*;
    use rstest::rstest;

    fn a1() -> ApplicationId {
        ApplicationId::new("A1").expect("application id")
    }

    fn store(base: &str) -> HttpApplicationStore {
        HttpApplicationStore::new(
            Url::parse(base).expect("valid URL"),
            Duration::from_secs(1),
        )
        .expect("client builds")
    }

    #[rstest]
    #[case("http://localhost:8080/api/v1/", "http://localhost:8080/api/v1/applications/A%201/status")]
    #[case("http://localhost:8080/api/v1", "http://localhost:8080/api/v1/applications/A%201/status")]
    fn endpoints_extend_the_base_path(#[case] base: &str, #[case] expected: &str) {
        let url = store(base)
            .endpoint(&["applications", "A 1", "status"])
            .expect("endpoint builds");

        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn requests_forward_the_scoped_trace_id() {
        let store = store("http://localhost:8080/api/v1/");
        let url = store.endpoint(&["applications"]).expect("endpoint builds");
        let trace_id = TraceId::generate();

        let scoped = TraceId::scope(trace_id, async {
            store.request(Method::GET, url.clone()).build()
        })
        .await
        .expect("request builds");
        let unscoped = store.request(Method::GET, url).build().expect("request builds");

        assert_eq!(
            scoped
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok()),
            Some(trace_id.to_string().as_str())
        );
        assert!(unscoped.headers().get(TRACE_ID_HEADER).is_none());
    }

    #[rstest]
    fn not_found_names_the_missing_application() {
        let id = a1();
        let error = map_status_error(StatusCode::NOT_FOUND, b"", &Target::Application(&id));

        assert_eq!(error, ApplicationStoreError::not_found("A1"));
    }

    #[rstest]
    fn not_found_names_the_missing_customer() {
        let customer = CustomerId::new("CUST999").expect("customer id");
        let error = map_status_error(StatusCode::NOT_FOUND, b"", &Target::Customer(&customer));

        assert_eq!(error, ApplicationStoreError::customer_not_found("CUST999"));
    }

    #[rstest]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, true)]
    #[case::unavailable(StatusCode::SERVICE_UNAVAILABLE, true)]
    #[case::timeout(StatusCode::REQUEST_TIMEOUT, true)]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, true)]
    #[case::bad_request(StatusCode::BAD_REQUEST, false)]
    #[case::conflict(StatusCode::CONFLICT, false)]
    #[case::collection_missing(StatusCode::NOT_FOUND, false)]
    fn statuses_map_to_transient_or_query_errors(
        #[case] status: StatusCode,
        #[case] transient: bool,
    ) {
        let error = map_status_error(status, br#"{"code": "oops"}"#, &Target::Collection);

        assert_eq!(error.is_transient(), transient);
        if !transient {
            assert!(matches!(error, ApplicationStoreError::Query { .. }));
        }
        assert!(error.to_string().contains("oops"));
    }

    #[rstest]
    fn wrapped_status_responses_are_unwrapped() {
        let body = json!({
            "message": "Status updated successfully",
            "application": { "_id": "A1", "customerId": "CUST001", "status": "Approved" },
        });

        let application = normalize_record(unwrap_application(&body)).expect("record");

        assert_eq!(application.id(), &a1());
        assert_eq!(application.status(), ApplicationStatus::Approved);
    }

    #[rstest]
    fn bare_records_are_used_as_is() {
        let body = json!({ "id": "A1", "customerId": "CUST001", "status": "Rejected" });

        assert_eq!(unwrap_application(&body), &body);
    }

    #[rstest]
    fn non_array_lists_fail_to_decode() {
        let error = decode_list(&json!({ "applications": [] })).expect_err("not an array");

        assert!(matches!(error, ApplicationStoreError::Decode { .. }));
    }

    #[rstest]
    fn long_bodies_are_truncated_in_previews() {
        let body = "x ".repeat(200);

        let preview = body_preview(body.as_bytes());

        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_servers_are_transient_failures() {
        let store = store("http://127.0.0.1:9/api/v1/");

        let error = store.list().await.expect_err("nothing listens on port 9");

        assert!(error.is_transient());
    }
}
