//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ApplicationsCommand, ApplicationsQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub applications: Arc<dyn ApplicationsQuery>,
    pub commands: Arc<dyn ApplicationsCommand>,
}

impl HttpState {
    /// Bundle the query and command ports.
    pub fn new(
        applications: Arc<dyn ApplicationsQuery>,
        commands: Arc<dyn ApplicationsCommand>,
    ) -> Self {
        Self {
            applications,
            commands,
        }
    }

    /// Serve both ports from one implementation, such as
    /// [`ApplicationService`](crate::domain::ApplicationService).
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use loan_desk::domain::ApplicationService;
    /// use loan_desk::inbound::http::state::HttpState;
    /// use loan_desk::outbound::persistence::InMemoryApplicationStore;
    ///
    /// let service = ApplicationService::new(Arc::new(InMemoryApplicationStore::new()));
    /// let _state = HttpState::from_service(Arc::new(service));
    /// ```
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: ApplicationsQuery + ApplicationsCommand + 'static,
    {
        Self {
            applications: service.clone(),
            commands: service,
        }
    }
}
