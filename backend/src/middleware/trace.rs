//! Request correlation middleware.
//!
//! A request carrying a UUID in its `trace-id` header keeps that identifier;
//! any other request is assigned a fresh one. The identifier is in scope for
//! the handler (see [`TraceId::current`]) and echoed on the response.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Correlation middleware for the HTTP surface.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use loan_desk::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone, Copy, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware {
            service: Rc::new(service),
        }))
    }
}

#[doc(hidden)]
pub struct TraceMiddleware<S> {
    service: Rc<S>,
}

/// Where the request's identifier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Caller,
    Minted,
}

impl Origin {
    fn as_str(self) -> &'static str {
        match self {
            Self::Caller => "caller",
            Self::Minted => "minted",
        }
    }
}

fn resolve_trace_id(req: &ServiceRequest) -> (TraceId, Origin) {
    req.headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(TraceId::from_header_value)
        .map_or_else(
            || (TraceId::generate(), Origin::Minted),
            |id| (id, Origin::Caller),
        )
}

fn stamp<B>(res: &mut ServiceResponse<B>, trace_id: TraceId) {
    // A hyphenated UUID is always a valid header value.
    match HeaderValue::from_str(&trace_id.to_string()) {
        Ok(value) => {
            res.response_mut()
                .headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        Err(error) => warn!(%error, %trace_id, "trace id not representable as header"),
    }
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let (trace_id, origin) = resolve_trace_id(&req);
        let method = req.method().clone();
        let path = req.path().to_owned();
        let service = Rc::clone(&self.service);

        Box::pin(TraceId::scope(trace_id, async move {
            let mut res = service.call(req).await?;
            stamp(&mut res, trace_id);
            debug!(
                %trace_id,
                origin = origin.as_str(),
                %method,
                %path,
                status = res.status().as_u16(),
                "request completed"
            );
            Ok(res)
        }))
    }
}
