//! Client-side review workflow with optimistic status changes.
//!
//! The controller keeps a local copy of the applications a reviewer is
//! looking at. A status change is applied to that copy before the store is
//! called, committed with the store's record on success, and reverted on
//! failure with a short-lived notice for the reviewer.
//!
//! This is the only layer that gates transitions: changes are offered only
//! while an application is `Under Scrutiny`, and at most one change per
//! application may be in flight.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{ApplicationStore, ApplicationStoreError};
use crate::domain::{Application, ApplicationId, ApplicationStatus};

/// How long a failure notice stays visible unless dismissed.
pub const DEFAULT_NOTICE_WINDOW: Duration = Duration::from_secs(5);

/// Message shown when a status change could not be saved.
pub const STATUS_UPDATE_FAILED: &str = "Failed to update application status. Please try again.";

/// Identity of the reviewer driving the workflow.
///
/// Passed to the controller explicitly rather than read from ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerSession {
    reviewer: String,
}

impl ReviewerSession {
    pub fn new(reviewer: impl Into<String>) -> Self {
        Self {
            reviewer: reviewer.into(),
        }
    }

    pub fn reviewer(&self) -> &str {
        self.reviewer.as_str()
    }
}

/// Failures reported by [`StatusWorkflowController::change_status`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    /// The application is not among the locally held records.
    #[error("application {id} is not loaded")]
    UnknownApplication { id: ApplicationId },
    /// The application already carries a terminal status.
    #[error("application {id} is already {status}; no further change is offered")]
    TerminalStatus {
        id: ApplicationId,
        status: ApplicationStatus,
    },
    /// Another change for the same application has not settled yet.
    #[error("a status change for application {id} is already in progress")]
    InFlight { id: ApplicationId },
    /// The store rejected or failed the update; the local copy was reverted.
    #[error("status update was not saved: {0}")]
    Store(#[from] ApplicationStoreError),
}

impl WorkflowError {
    /// Whether the reviewer can usefully trigger the same action again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Store(error) => error.is_transient(),
            Self::InFlight { .. } => true,
            Self::UnknownApplication { .. } | Self::TerminalStatus { .. } => false,
        }
    }
}

/// A dismissible, auto-expiring message for the reviewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: Uuid,
    pub application_id: ApplicationId,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

fn notice_delta(window: Duration) -> TimeDelta {
    TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX)
}

#[derive(Default)]
struct Board {
    records: Vec<Application>,
    in_flight: HashSet<ApplicationId>,
    notices: Vec<Notice>,
}

impl Board {
    fn record_mut(&mut self, id: &ApplicationId) -> Option<&mut Application> {
        self.records.iter_mut().find(|record| record.id() == id)
    }
}

/// Orchestrates optimistic status changes against an [`ApplicationStore`].
pub struct StatusWorkflowController {
    store: Arc<dyn ApplicationStore>,
    clock: Arc<dyn Clock>,
    session: ReviewerSession,
    notice_window: TimeDelta,
    board: Mutex<Board>,
}

impl StatusWorkflowController {
    /// Create a controller with the default notice window.
    pub fn new(
        store: Arc<dyn ApplicationStore>,
        clock: Arc<dyn Clock>,
        session: ReviewerSession,
    ) -> Self {
        Self {
            store,
            clock,
            session,
            notice_window: notice_delta(DEFAULT_NOTICE_WINDOW),
            board: Mutex::new(Board::default()),
        }
    }

    /// Override how long failure notices stay visible.
    #[must_use]
    pub fn with_notice_window(mut self, window: Duration) -> Self {
        self.notice_window = notice_delta(window);
        self
    }

    pub fn session(&self) -> &ReviewerSession {
        &self.session
    }

    fn board(&self) -> MutexGuard<'_, Board> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the local copies with the store's current records.
    ///
    /// On failure the previous copies are kept.
    ///
    /// # Errors
    /// Propagates the store error unchanged.
    pub async fn load(&self) -> Result<usize, ApplicationStoreError> {
        let records = self.store.list().await?;
        let count = records.len();
        let mut board = self.board();
        board.records = records;
        info!(
            reviewer = self.session.reviewer(),
            count, "applications loaded for review"
        );
        Ok(count)
    }

    /// Snapshot of the locally held applications.
    pub fn applications(&self) -> Vec<Application> {
        self.board().records.clone()
    }

    /// Locally observed status of one application.
    pub fn status_of(&self, id: &ApplicationId) -> Option<ApplicationStatus> {
        self.board()
            .records
            .iter()
            .find(|record| record.id() == id)
            .map(Application::status)
    }

    /// Whether the workflow offers a status change for this application.
    pub fn is_editable(&self, id: &ApplicationId) -> bool {
        let board = self.board();
        board
            .records
            .iter()
            .find(|record| record.id() == id)
            .is_some_and(|record| !record.status().is_terminal() && !board.in_flight.contains(id))
    }

    /// Change the status of an application optimistically.
    ///
    /// The local copy shows `new_status` as soon as the call starts. When the
    /// store call fails the local status is put back to what it was, a notice
    /// is queued, and the store error is returned. Dropping the future before
    /// the store answers also restores the previous status.
    ///
    /// # Errors
    /// [`WorkflowError::UnknownApplication`], [`WorkflowError::TerminalStatus`]
    /// and [`WorkflowError::InFlight`] are raised before the store is called
    /// and leave local state untouched. [`WorkflowError::Store`] follows a
    /// revert.
    pub async fn change_status(
        &self,
        id: &ApplicationId,
        new_status: ApplicationStatus,
    ) -> Result<Application, WorkflowError> {
        let previous_status = self.apply_optimistically(id, new_status)?;
        let pending = PendingChange {
            controller: self,
            id,
            previous_status,
            settled: false,
        };

        let outcome = self.store.update_status(id, new_status).await;

        let mut board = pending.settle();
        match outcome {
            Ok(persisted) => {
                if let Some(record) = board.record_mut(id) {
                    *record = persisted.clone();
                }
                info!(
                    reviewer = self.session.reviewer(),
                    application_id = %id,
                    from = %previous_status,
                    to = %new_status,
                    "status change committed"
                );
                Ok(persisted)
            }
            Err(error) => {
                if let Some(record) = board.record_mut(id) {
                    record.set_status(previous_status);
                }
                let now = self.clock.utc();
                board.notices.retain(|notice| notice.expires_at > now);
                board.notices.push(Notice {
                    id: Uuid::new_v4(),
                    application_id: id.clone(),
                    message: STATUS_UPDATE_FAILED.to_owned(),
                    expires_at: now
                        .checked_add_signed(self.notice_window)
                        .unwrap_or(DateTime::<Utc>::MAX_UTC),
                });
                warn!(
                    reviewer = self.session.reviewer(),
                    application_id = %id,
                    attempted = %new_status,
                    reverted_to = %previous_status,
                    %error,
                    "status change reverted"
                );
                Err(WorkflowError::Store(error))
            }
        }
    }

    fn apply_optimistically(
        &self,
        id: &ApplicationId,
        new_status: ApplicationStatus,
    ) -> Result<ApplicationStatus, WorkflowError> {
        let mut board = self.board();
        if board.in_flight.contains(id) {
            return Err(WorkflowError::InFlight { id: id.clone() });
        }
        let record = board
            .record_mut(id)
            .ok_or_else(|| WorkflowError::UnknownApplication { id: id.clone() })?;
        let previous_status = record.status();
        if previous_status.is_terminal() {
            return Err(WorkflowError::TerminalStatus {
                id: id.clone(),
                status: previous_status,
            });
        }
        record.set_status(new_status);
        board.in_flight.insert(id.clone());
        Ok(previous_status)
    }

    /// Notices that have not expired yet. Expired notices are dropped.
    pub fn notices(&self) -> Vec<Notice> {
        let now = self.clock.utc();
        let mut board = self.board();
        board.notices.retain(|notice| notice.expires_at > now);
        board.notices.clone()
    }

    /// Remove a notice before it expires. Returns whether it was present.
    pub fn dismiss(&self, notice_id: Uuid) -> bool {
        let mut board = self.board();
        let before = board.notices.len();
        board.notices.retain(|notice| notice.id != notice_id);
        board.notices.len() != before
    }
}

/// In-flight mark for one change.
///
/// Dropped unsettled, for example when the caller abandons the
/// `change_status` future, it clears the mark and restores the previous
/// status, since the store's outcome is unknown.
struct PendingChange<'a> {
    controller: &'a StatusWorkflowController,
    id: &'a ApplicationId,
    previous_status: ApplicationStatus,
    settled: bool,
}

impl<'a> PendingChange<'a> {
    /// Clear the in-flight mark and hand back the board for the outcome.
    fn settle(mut self) -> MutexGuard<'a, Board> {
        self.settled = true;
        let controller = self.controller;
        let mut board = controller.board();
        board.in_flight.remove(self.id);
        board
    }
}

impl Drop for PendingChange<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut board = self.controller.board();
        board.in_flight.remove(self.id);
        if let Some(record) = board.record_mut(self.id) {
            record.set_status(self.previous_status);
        }
        warn!(
            reviewer = self.controller.session.reviewer(),
            application_id = %self.id,
            reverted_to = %self.previous_status,
            "status change abandoned before the store answered"
        );
    }
}

#[cfg(test)]
#[path = "status_workflow_tests.rs"]
mod tests;
