//! Health endpoints: liveness and readiness probes for orchestrators.
//!
//! Probe bodies are small JSON documents so operators hitting them by hand
//! see which state failed; orchestrators only look at the status code.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use utoipa::ToSchema;

/// Shared readiness and liveness flags.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Start as live but not ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready once the store and listener are up.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness probes, for example while draining on shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

/// Probe response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProbeBody {
    /// `ok` or `unavailable`.
    #[schema(example = "ok")]
    pub status: String,
}

fn probe_response(probe_ok: bool) -> HttpResponse {
    let (mut response, status) = if probe_ok {
        (HttpResponse::Ok(), "ok")
    } else {
        (HttpResponse::ServiceUnavailable(), "unavailable")
    };

    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(ProbeBody {
            status: status.to_owned(),
        })
}

/// Readiness probe. 200 once the application store is open and the server
/// accepts traffic; 503 before that.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic", body = ProbeBody),
        (status = 503, description = "Server is not ready", body = ProbeBody)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe_response(state.is_ready())
}

/// Liveness probe. 200 while the process is marked alive; 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive", body = ProbeBody),
        (status = 503, description = "Server is shutting down", body = ProbeBody)
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    probe_response(state.is_alive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn probe(state: web::Data<HealthState>, uri: &str) -> (StatusCode, Value) {
        let app = test::init_service(App::new().app_data(state).service(ready).service(live)).await;
        let response = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = response.status();
        assert_eq!(
            response
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|value| value.to_str().ok()),
            Some("no-store")
        );
        (status, test::read_body_json(response).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_follows_mark_ready() {
        let state = web::Data::new(HealthState::new());

        let (before, body) = probe(state.clone(), "/health/ready").await;
        assert_eq!(before, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({"status": "unavailable"}));

        state.mark_ready();
        let (after, body) = probe(state, "/health/ready").await;
        assert_eq!(after, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[rstest]
    #[actix_web::test]
    async fn liveness_fails_once_draining() {
        let state = web::Data::new(HealthState::new());
        let (alive, _) = probe(state.clone(), "/health/live").await;
        assert_eq!(alive, StatusCode::OK);

        state.mark_unhealthy();
        let (draining, _) = probe(state, "/health/live").await;
        assert_eq!(draining, StatusCode::SERVICE_UNAVAILABLE);
    }
}
