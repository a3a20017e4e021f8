//! Test utilities for the loan desk crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and when the `test-support` feature is enabled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{ApplicationStore, ApplicationStoreError};
use crate::domain::{Application, ApplicationDraft, ApplicationId, ApplicationStatus, CustomerId};

/// Clock whose time only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
            }
        };
        *self.lock_clock() += delta;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Store wrapper that can be told to fail status updates with a transient error.
///
/// Reads and other writes always reach the inner store.
pub struct FlakyStore {
    inner: Arc<dyn ApplicationStore>,
    fail_updates: AtomicBool,
}

impl FlakyStore {
    pub fn new(inner: Arc<dyn ApplicationStore>) -> Self {
        Self {
            inner,
            fail_updates: AtomicBool::new(false),
        }
    }

    /// Toggle whether `update_status` fails with a connection error.
    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ApplicationStore for FlakyStore {
    async fn list(&self) -> Result<Vec<Application>, ApplicationStoreError> {
        self.inner.list().await
    }

    async fn get_by_id(&self, id: &ApplicationId) -> Result<Application, ApplicationStoreError> {
        self.inner.get_by_id(id).await
    }

    async fn get_by_customer_id(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Application, ApplicationStoreError> {
        self.inner.get_by_customer_id(customer_id).await
    }

    async fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, ApplicationStoreError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(ApplicationStoreError::connection("network unreachable"));
        }
        self.inner.update_status(id, status).await
    }

    async fn create(&self, draft: ApplicationDraft) -> Result<Application, ApplicationStoreError> {
        self.inner.create(draft).await
    }

    async fn replace_all(
        &self,
        drafts: Vec<ApplicationDraft>,
    ) -> Result<Vec<Application>, ApplicationStoreError> {
        self.inner.replace_all(drafts).await
    }
}
