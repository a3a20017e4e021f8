//! HTTP server configuration object and helpers.

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use crate::domain::TransitionPolicy;
use crate::domain::ports::ApplicationStore;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: Arc<dyn ApplicationStore>,
    pub(crate) policy: TransitionPolicy,
    pub(crate) listener: Option<TcpListener>,
}

impl ServerConfig {
    /// Construct a server configuration serving `store` on `bind_addr`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, store: Arc<dyn ApplicationStore>) -> Self {
        Self {
            bind_addr,
            store,
            policy: TransitionPolicy::default(),
            listener: None,
        }
    }

    /// Choose whether the server refuses changes to decided applications.
    #[must_use]
    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Serve on an already bound listener instead of binding `bind_addr`.
    ///
    /// Tests bind port 0 and read the chosen port from the listener.
    #[must_use]
    pub fn with_listener(mut self, listener: TcpListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
