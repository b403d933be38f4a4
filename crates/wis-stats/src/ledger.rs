// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded, JSON-persisted history of delivery attempts.
//!
//! Appends happen in memory under one mutex. Persisting trims both lists to
//! their configured bounds (most recent kept) under the same mutex, then
//! writes the serialized copy under a second lock, so two writers never
//! race on the file. Writes go to a temporary sibling that is renamed over
//! the ledger file.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use wis_config::model::StatsConfig;
use wis_core::WisError;

use crate::aggregate::{DestinationStats, LabelCount, LedgerSnapshot, MonthBucket};
use crate::records::{DeliveryAttempt, DeliveryRecord, ErrorRecord};

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    #[serde(default)]
    sends: Vec<DeliveryRecord>,
    #[serde(default)]
    errors: Vec<ErrorRecord>,
}

struct LedgerInner {
    path: PathBuf,
    max_sends: usize,
    max_errors: usize,
    autosave_every: usize,
    lists: Mutex<LedgerFile>,
    io_lock: Mutex<()>,
}

/// Delivery ledger. Cloning yields another handle to the same ledger.
#[derive(Clone)]
pub struct DeliveryLedger {
    inner: Arc<LedgerInner>,
}

impl std::fmt::Debug for DeliveryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryLedger")
            .field("path", &self.inner.path)
            .field("len", &self.len())
            .finish()
    }
}

impl DeliveryLedger {
    /// Creates an empty ledger that persists to `path`.
    pub fn new(path: impl Into<PathBuf>, config: &StatsConfig) -> Self {
        Self::with_data(path.into(), config, LedgerFile::default())
    }

    /// Loads the ledger stored at `path`.
    ///
    /// A missing file yields an empty ledger. An unreadable or malformed file
    /// is logged and also yields an empty ledger.
    pub fn load(path: impl Into<PathBuf>, config: &StatsConfig) -> Self {
        let path = path.into();
        let data = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<LedgerFile>(&bytes) {
                Ok(data) => {
                    debug!(
                        path = %path.display(),
                        sends = data.sends.len(),
                        errors = data.errors.len(),
                        "ledger loaded"
                    );
                    data
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ledger file is malformed, starting empty");
                    LedgerFile::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => LedgerFile::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read ledger, starting empty");
                LedgerFile::default()
            }
        };
        Self::with_data(path, config, data)
    }

    fn with_data(path: PathBuf, config: &StatsConfig, data: LedgerFile) -> Self {
        Self {
            inner: Arc::new(LedgerInner {
                path,
                max_sends: config.max_sends.max(1),
                max_errors: config.max_errors.max(1),
                autosave_every: config.autosave_every,
                lists: Mutex::new(data),
                io_lock: Mutex::new(()),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Appends one attempt and, on failure, its error record.
    ///
    /// Every `autosave_every` records a persist is started in the background;
    /// this call never waits for disk I/O.
    pub fn record_delivery(&self, attempt: DeliveryAttempt) {
        let (record, error) = attempt.into_records(Utc::now());
        let len = {
            let mut lists = self.lists();
            lists.sends.push(record);
            if let Some(error) = error {
                lists.errors.push(error);
            }
            lists.sends.len()
        };

        let every = self.inner.autosave_every;
        if every > 0 && len % every == 0 {
            self.persist_in_background();
        }
    }

    /// Persists on a blocking worker without waiting for it.
    pub fn persist_in_background(&self) {
        let ledger = self.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || ledger.persist());
            }
            Err(_) => {
                std::thread::spawn(move || ledger.persist());
            }
        }
    }

    /// Trims and writes the ledger, logging any failure.
    pub fn persist(&self) {
        if let Err(e) = self.try_persist() {
            warn!(path = %self.inner.path.display(), error = %e, "failed to save ledger");
        }
    }

    /// Trims and writes the ledger.
    pub fn try_persist(&self) -> Result<(), WisError> {
        // Held across snapshot and write so writes land in snapshot order.
        let _io = self.inner.io_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let bytes = {
            let mut lists = self.lists();
            trim_front(&mut lists.sends, self.inner.max_sends);
            trim_front(&mut lists.errors, self.inner.max_errors);
            serde_json::to_vec(&*lists).map_err(|e| WisError::Storage {
                source: Box::new(e),
            })?
        };
        write_atomic(&self.inner.path, &bytes)?;
        debug!(path = %self.inner.path.display(), bytes = bytes.len(), "ledger saved");
        Ok(())
    }

    /// Empties both lists in memory. The file is untouched until the next persist.
    pub fn clear(&self) {
        let mut lists = self.lists();
        lists.sends.clear();
        lists.errors.clear();
    }

    /// Number of delivery records held in memory.
    pub fn len(&self) -> usize {
        self.lists().sends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sends(&self) -> Vec<DeliveryRecord> {
        self.lists().sends.clone()
    }

    pub fn errors(&self) -> Vec<ErrorRecord> {
        self.lists().errors.clone()
    }

    /// Copies both lists for aggregate computation.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let lists = self.lists();
        LedgerSnapshot {
            sends: lists.sends.clone(),
            errors: lists.errors.clone(),
        }
    }

    pub fn counts_by_destination(&self) -> Vec<LabelCount> {
        self.snapshot().counts_by_destination()
    }

    pub fn counts_by_folder(&self) -> Vec<LabelCount> {
        self.snapshot().counts_by_folder()
    }

    pub fn counts_by_extension(&self) -> Vec<LabelCount> {
        self.snapshot().counts_by_extension()
    }

    pub fn counts_by_error_kind(&self) -> Vec<LabelCount> {
        self.snapshot().counts_by_error_kind()
    }

    pub fn monthly_series(&self, n: usize) -> Vec<MonthBucket> {
        self.snapshot().monthly_series(n)
    }

    pub fn destination_breakdown(&self) -> Vec<DestinationStats> {
        self.snapshot().destination_breakdown()
    }

    pub fn destination_stats(&self, name: &str) -> DestinationStats {
        self.snapshot().destination_stats(name)
    }

    fn lists(&self) -> MutexGuard<'_, LedgerFile> {
        self.inner.lists.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn trim_front<T>(list: &mut Vec<T>, max: usize) {
    if list.len() > max {
        list.drain(..list.len() - max);
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), WisError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
