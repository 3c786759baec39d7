// ── JSON file subscriber store ──
//
// A single JSON array on disk. `list_all` re-reads the file every time so
// external edits are picked up on the next cycle; `upsert` rewrites it via a
// temporary file and rename.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::debug;

use super::{SubscriberStore, UpsertOutcome, validate};
use crate::error::CoreError;
use crate::model::Subscriber;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<Subscriber>, CoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.store_error("read", &e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| self.store_error("parse", &e))
    }

    async fn write(&self, subscribers: &[Subscriber]) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.store_error("create directory for", &e))?;
        }

        let json = serde_json::to_vec_pretty(subscribers)
            .map_err(|e| self.store_error("serialize", &e))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| self.store_error("write", &e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.store_error("replace", &e))
    }

    fn store_error(&self, action: &str, err: &dyn std::fmt::Display) -> CoreError {
        CoreError::Store {
            message: format!("failed to {action} {}: {err}", self.path.display()),
        }
    }
}

impl SubscriberStore for FileStore {
    async fn list_all(&self) -> Result<Vec<Subscriber>, CoreError> {
        self.read().await
    }

    async fn upsert(&self, mut subscriber: Subscriber) -> Result<UpsertOutcome, CoreError> {
        validate(&mut subscriber)?;
        let _guard = self.write_lock.lock().await;

        let mut subscribers = self.read().await?;
        let outcome = match subscribers
            .iter_mut()
            .find(|s| s.address.trim() == subscriber.address)
        {
            Some(existing) => {
                *existing = subscriber;
                UpsertOutcome::Updated
            }
            None => {
                subscribers.push(subscriber);
                UpsertOutcome::Inserted
            }
        };

        self.write(&subscribers).await?;
        debug!(path = %self.path.display(), %outcome, count = subscribers.len(), "subscriber file updated");
        Ok(outcome)
    }
}
