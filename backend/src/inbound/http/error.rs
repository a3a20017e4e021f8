//! Rendering of domain [`Error`]s as JSON error envelopes.
//!
//! Clients see the envelope and a `trace-id` header. Internal failures are
//! logged in full here and replaced by a generic message on the wire.

use std::borrow::Cow;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

impl Error {
    fn http_status(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The envelope as sent to clients.
    fn public_view(&self) -> Cow<'_, Error> {
        if self.code() != ErrorCode::InternalError {
            return Cow::Borrowed(self);
        }
        let redacted = Error::internal(REDACTED_MESSAGE);
        Cow::Owned(match self.trace_id() {
            Some(trace_id) => redacted.with_trace_id(trace_id.to_owned()),
            None => redacted,
        })
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.http_status();
        if status.is_server_error() {
            error!(
                code = ?self.code(),
                trace_id = self.trace_id().unwrap_or_default(),
                message = self.message(),
                "request failed"
            );
        }

        let mut response = HttpResponse::build(status);
        if let Some(trace_id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, trace_id.to_owned()));
        }
        response.json(&*self.public_view())
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        warn!(error = %err, "framework error surfaced in a handler");
        Error::internal(REDACTED_MESSAGE)
    }
}

#[cfg(test)]
mod tests;
