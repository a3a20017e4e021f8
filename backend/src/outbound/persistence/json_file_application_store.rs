//! Durable application store kept in a single JSON document.
//!
//! The collection lives in `applications.json` inside the configured data
//! directory. Files written by older tools are accepted through
//! [`normalize_record`]; every write replaces the file with canonical
//! documents. The replacement is staged in a synced temporary file, renamed
//! over the original, and the directory is synced before the write is
//! acknowledged.
//!
//! File IO runs on tokio's blocking pool. The task owns the collection lock
//! until the write has settled, so an abandoned request cannot leave memory
//! and disk out of step.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use mockable::Clock;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::application_collection::ApplicationCollection;
use crate::domain::ports::{ApplicationStore, ApplicationStoreError};
use crate::domain::{Application, ApplicationDraft, ApplicationId, ApplicationStatus, CustomerId};
use crate::outbound::application_document::{ApplicationDocument, normalize_record};

/// Name of the collection file inside the data directory.
pub const APPLICATIONS_FILE: &str = "applications.json";

/// [`ApplicationStore`] persisted to `applications.json`.
///
/// Writers are serialised; the in-memory copy only changes after the file
/// has been replaced successfully.
pub struct JsonFileApplicationStore {
    dir: Arc<Dir>,
    dir_path: PathBuf,
    collection: Arc<Mutex<ApplicationCollection>>,
    clock: Arc<dyn Clock>,
}

impl JsonFileApplicationStore {
    /// Open (creating if needed) the data directory and load the collection.
    ///
    /// # Errors
    /// [`ApplicationStoreError::Connection`] when the directory or file cannot
    /// be opened or read, [`ApplicationStoreError::Decode`] when the file is
    /// not a JSON array of readable records.
    pub fn open(data_dir: &Path, clock: Arc<dyn Clock>) -> Result<Self, ApplicationStoreError> {
        Dir::create_ambient_dir_all(data_dir, ambient_authority())
            .map_err(|error| io_error(data_dir, "create", &error))?;
        let dir = Dir::open_ambient_dir(data_dir, ambient_authority())
            .map_err(|error| io_error(data_dir, "open", &error))?;
        let records = load_records(&dir, data_dir)?;
        info!(
            path = %data_dir.join(APPLICATIONS_FILE).display(),
            count = records.len(),
            "application file loaded"
        );
        Ok(Self {
            dir: Arc::new(dir),
            dir_path: data_dir.to_path_buf(),
            collection: Arc::new(Mutex::new(ApplicationCollection::new(records))),
            clock,
        })
    }

    /// Apply `change` to a copy of the collection, persist it, then keep it.
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut ApplicationCollection) -> Result<T, ApplicationStoreError>,
    ) -> Result<T, ApplicationStoreError>
    where
        T: Send + 'static,
    {
        let mut current = Arc::clone(&self.collection).lock_owned().await;
        let mut next = current.clone();
        let outcome = change(&mut next)?;
        let bytes = encode(&next)?;
        let dir = Arc::clone(&self.dir);
        let target = self.dir_path.join(APPLICATIONS_FILE);

        tokio::task::spawn_blocking(move || {
            write_atomic(&dir, &bytes).map_err(|error| {
                ApplicationStoreError::query(format!(
                    "failed to write {}: {error}",
                    target.display()
                ))
            })?;
            debug!(count = next.records().len(), "application file replaced");
            *current = next;
            Ok(outcome)
        })
        .await
        .map_err(|error| {
            ApplicationStoreError::query(format!("application file writer stopped: {error}"))
        })?
    }
}

fn encode(collection: &ApplicationCollection) -> Result<Vec<u8>, ApplicationStoreError> {
    let documents: Vec<ApplicationDocument> = collection
        .records()
        .iter()
        .map(ApplicationDocument::from)
        .collect();
    serde_json::to_vec_pretty(&documents).map_err(|error| {
        ApplicationStoreError::query(format!("failed to encode applications: {error}"))
    })
}

/// Replace [`APPLICATIONS_FILE`] so a crash leaves either the old or the new
/// collection on disk.
fn write_atomic(dir: &Dir, bytes: &[u8]) -> io::Result<()> {
    let staging = format!(".{APPLICATIONS_FILE}.{}.tmp", Uuid::new_v4().simple());
    let staged = write_staging(dir, &staging, bytes)
        .and_then(|()| dir.rename(&staging, dir, APPLICATIONS_FILE));
    if let Err(error) = staged {
        if let Err(cleanup) = dir.remove_file(&staging) {
            debug!(%cleanup, file = %staging, "staging file not removed");
        }
        return Err(error);
    }
    sync_directory(dir)
}

fn write_staging(dir: &Dir, staging: &str, bytes: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(staging, &options)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Persist the rename itself. Platforms that cannot sync a directory handle
/// report `Unsupported` or `PermissionDenied`; the rename already happened.
fn sync_directory(dir: &Dir) -> io::Result<()> {
    match dir.open(".").and_then(|handle| handle.sync_all()) {
        Ok(()) => Ok(()),
        Err(error)
            if matches!(
                error.kind(),
                io::ErrorKind::Unsupported | io::ErrorKind::PermissionDenied
            ) =>
        {
            warn!(%error, "data directory cannot be synced");
            Ok(())
        }
        Err(error) => Err(error),
    }
}

fn io_error(path: &Path, action: &str, error: &io::Error) -> ApplicationStoreError {
    ApplicationStoreError::connection(format!(
        "failed to {action} {}: {error}",
        path.display()
    ))
}

fn load_records(dir: &Dir, data_dir: &Path) -> Result<Vec<Application>, ApplicationStoreError> {
    let path = data_dir.join(APPLICATIONS_FILE);
    let raw = match dir.read_to_string(APPLICATIONS_FILE) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(error) => return Err(io_error(&path, "read", &error)),
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(&raw).map_err(|error| {
        ApplicationStoreError::decode(format!("{} is not valid JSON: {error}", path.display()))
    })?;
    let Value::Array(entries) = value else {
        return Err(ApplicationStoreError::decode(format!(
            "{} must contain a JSON array",
            path.display()
        )));
    };
    entries.iter().map(normalize_record).collect()
}

#[async_trait]
impl ApplicationStore for JsonFileApplicationStore {
    async fn list(&self) -> Result<Vec<Application>, ApplicationStoreError> {
        Ok(self.collection.lock().await.records().to_vec())
    }

    async fn get_by_id(&self, id: &ApplicationId) -> Result<Application, ApplicationStoreError> {
        self.collection.lock().await.find(id)
    }

    async fn get_by_customer_id(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Application, ApplicationStoreError> {
        self.collection.lock().await.find_by_customer(customer_id)
    }

    async fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, ApplicationStoreError> {
        let now = self.clock.utc();
        self.mutate(|collection| collection.update_status(id, status, now))
            .await
    }

    async fn create(&self, draft: ApplicationDraft) -> Result<Application, ApplicationStoreError> {
        let now = self.clock.utc();
        self.mutate(|collection| Ok(collection.insert(draft, now)))
            .await
    }

    async fn replace_all(
        &self,
        drafts: Vec<ApplicationDraft>,
    ) -> Result<Vec<Application>, ApplicationStoreError> {
        let now = self.clock.utc();
        self.mutate(|collection| Ok(collection.replace_all(drafts, now)))
            .await
    }
}
