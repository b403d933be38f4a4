// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The background scan-and-send loop.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use wis_config::model::FolderConfig;
use wis_core::{
    DeliveryErrorKind, DeliveryOutcome, LogKind, NotifyOutcome, ResolvedDestination,
    SessionCounters, WisError,
};
use wis_stats::{AttemptFailure, DeliveryAttempt};

use crate::engine::{Capabilities, Shared};
use crate::matcher::{ImageMatcher, absolute, extension_of};
use crate::session::MonitorSettings;

/// A validated folder with its absolute root and display name.
pub(crate) struct ScanTarget {
    pub folder: FolderConfig,
    root: PathBuf,
    base_name: String,
}

impl ScanTarget {
    pub fn new(folder: FolderConfig) -> Self {
        let root = absolute(Path::new(&folder.path));
        let base_name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| folder.path.clone());
        Self {
            folder,
            root,
            base_name,
        }
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

/// Loop state. The seen set and counters are owned here and never shared.
pub(crate) struct ScanLoop {
    pub caps: Arc<Capabilities>,
    pub shared: Arc<Shared>,
    pub targets: Vec<ScanTarget>,
    pub destinations: Vec<ResolvedDestination>,
    pub settings: MonitorSettings,
    pub matcher: ImageMatcher,
    pub seen: HashSet<PathBuf>,
    pub counters: SessionCounters,
    pub cancel: CancellationToken,
}

impl ScanLoop {
    pub async fn run(mut self) {
        let mut cycle: u64 = 0;
        while !self.cancel.is_cancelled() {
            cycle += 1;
            if self.settings.debug {
                self.caps.log(&format!("Scan #{cycle}"), LogKind::Debug);
            }

            for index in 0..self.targets.len() {
                if self.cancel.is_cancelled() {
                    break;
                }
                if let Err(e) = self.scan_folder(index).await {
                    let path = &self.targets[index].folder.path;
                    warn!(folder = %path, error = %e, "folder scan failed");
                    self.caps
                        .log(&format!("Error scanning {path}: {e}"), LogKind::Err);
                }
            }

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.settings.scan_rate) => {}
            }
        }

        self.caps.log("Monitoring stopped", LogKind::Warn);
        debug!(
            sent = self.counters.sent,
            failed = self.counters.failed,
            "scan loop exited"
        );
    }

    async fn scan_folder(&mut self, index: usize) -> Result<(), WisError> {
        let target = &self.targets[index];
        let matcher = self.matcher.clone();
        let root = target.root.clone();
        let recursive = target.folder.recursive;
        let found: Vec<PathBuf> =
            tokio::task::spawn_blocking(move || matcher.iter_images(&root, recursive).collect())
                .await
                .map_err(|e| WisError::Internal(format!("directory scan failed: {e}")))?;

        for path in found {
            if self.cancel.is_cancelled() {
                break;
            }
            if self.seen.contains(&path) {
                continue;
            }
            self.process_file(index, path).await;
        }
        Ok(())
    }

    async fn process_file(&mut self, index: usize, path: PathBuf) {
        let target = &self.targets[index];
        let rel = target.relative(&path);
        self.caps.log(
            &format!("New: {rel}  [{}]", target.base_name),
            LogKind::Info,
        );

        tokio::time::sleep(self.settings.file_delay).await;

        // Files that vanish or are still empty are retried on a later cycle.
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.len() == 0 => {
                self.caps.log(&format!("Empty, skipping: {rel}"), LogKind::Warn);
                return;
            }
            Ok(_) => {}
            Err(e) => {
                debug!(file = %path.display(), error = %e, "file disappeared before sending");
                return;
            }
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| rel.clone());
        let ext = extension_of(&path).unwrap_or_default();
        let folder = target.folder.path.clone();

        let mut all_ok = true;
        for dest in &self.destinations {
            let ok = self.send_one(&path, &file_name, &ext, &folder, dest).await;
            if !ok {
                all_ok = false;
                if self.settings.stop_on_first_failure {
                    break;
                }
            }
        }
        self.seen.insert(path);

        self.caps.notifier.notify(NotifyOutcome::from_all_ok(all_ok));
        if all_ok {
            self.counters.sent += 1;
        } else {
            self.counters.failed += 1;
        }
        self.shared.publish_counters(self.counters);
        self.caps
            .observer
            .on_counters(self.counters.sent, self.counters.failed);
    }

    /// One attempt to one destination. Returns whether it succeeded.
    async fn send_one(
        &self,
        path: &Path,
        file_name: &str,
        ext: &str,
        folder: &str,
        dest: &ResolvedDestination,
    ) -> bool {
        let result = self
            .caps
            .deliverer
            .deliver(
                path,
                &dest.url,
                self.settings.send_timeout,
                dest.identity.as_ref(),
            )
            .await;

        let attempt = DeliveryAttempt::succeeded(file_name, &dest.name, folder, ext);
        let (attempt, message, kind) = match result {
            Ok(DeliveryOutcome::Delivered { .. }) => (
                attempt,
                format!("{file_name}  →  {}", dest.name),
                LogKind::Ok,
            ),
            Ok(DeliveryOutcome::Rejected { status }) => (
                attempt.failed(AttemptFailure::rejected()),
                format!("Non-2xx ({status})  {file_name}  →  {}", dest.name),
                LogKind::Err,
            ),
            Err(e) => {
                let message = match &e.kind {
                    DeliveryErrorKind::Timeout => format!("Timeout  {file_name}  →  {}", dest.name),
                    DeliveryErrorKind::Connection => {
                        format!("Connection error  {file_name}  →  {}", dest.name)
                    }
                    DeliveryErrorKind::Other(_) => {
                        format!("Error  {file_name}  →  {}: {}", dest.name, e.detail)
                    }
                };
                (attempt.failed(AttemptFailure::from(&e)), message, LogKind::Err)
            }
        };

        let ok = attempt.is_ok();
        self.caps.log(&message, kind);
        self.caps.ledger.record_delivery(attempt);
        ok
    }
}
