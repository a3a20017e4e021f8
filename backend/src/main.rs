//! Loan desk entry-point: loads settings, opens the application store and
//! serves the REST API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use loan_desk::domain::ports::{ApplicationStore, ApplicationsCommand};
use loan_desk::domain::ApplicationService;
use loan_desk::inbound::http::health::HealthState;
use loan_desk::outbound::persistence::{InMemoryApplicationStore, JsonFileApplicationStore};
use loan_desk::server::{ServerConfig, create_server};
use loan_desk::settings::ServiceSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load()
        .map_err(|e| io::Error::other(format!("failed to load settings: {e}")))?;
    let store = open_store(&settings)?;

    if settings.seed_samples {
        let seeded = ApplicationService::new(store.clone())
            .seed_samples()
            .await
            .map_err(|e| io::Error::other(format!("failed to seed samples: {e}")))?;
        info!(count = seeded.len(), "sample applications loaded");
    }

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(settings.bind_addr(), store)
        .with_policy(settings.transition_policy());
    create_server(health_state, config)?.await
}

fn open_store(settings: &ServiceSettings) -> io::Result<Arc<dyn ApplicationStore>> {
    let clock = Arc::new(DefaultClock);
    match &settings.data_dir {
        Some(dir) => {
            let store = JsonFileApplicationStore::open(dir, clock).map_err(|e| {
                io::Error::other(format!("failed to open store at {}: {e}", dir.display()))
            })?;
            info!(data_dir = %dir.display(), "using JSON file application store");
            Ok(Arc::new(store))
        }
        None => {
            warn!("no data directory configured; applications are kept in memory");
            Ok(Arc::new(InMemoryApplicationStore::with_clock(clock)))
        }
    }
}
