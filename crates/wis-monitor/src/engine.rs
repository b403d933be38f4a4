// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session lifecycle of the monitoring engine.
//!
//! `Idle -> Running -> Stopping -> Idle`. `start` validates its inputs,
//! takes the snapshot of existing files, and spawns the scan loop. `stop`
//! cancels the loop cooperatively; the loop returns the engine to `Idle`
//! when it exits.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use wis_core::{
    Deliverer, LogKind, MonitorObserver, MonitorState, Notifier, SessionCounters, WisError,
};
use wis_stats::DeliveryLedger;

use crate::matcher::{ImageMatcher, absolute};
use crate::resolve::resolve_destinations;
use crate::scan::{ScanLoop, ScanTarget};
use crate::session::SessionRequest;

/// Injected collaborators shared with the scan loop.
pub(crate) struct Capabilities {
    pub deliverer: Arc<dyn Deliverer>,
    pub notifier: Arc<dyn Notifier>,
    pub ledger: DeliveryLedger,
    pub observer: Arc<dyn MonitorObserver>,
}

impl Capabilities {
    pub fn log(&self, message: &str, kind: LogKind) {
        self.observer.on_log(message, kind);
    }
}

/// State visible to both the controller and the scan loop.
pub(crate) struct Shared {
    state: Mutex<MonitorState>,
    counters: Mutex<SessionCounters>,
}

impl Default for Shared {
    fn default() -> Self {
        Self {
            state: Mutex::new(MonitorState::Idle),
            counters: Mutex::new(SessionCounters::default()),
        }
    }
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, MonitorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_idle(&self) {
        *self.state() = MonitorState::Idle;
    }

    pub fn publish_counters(&self, counters: SessionCounters) {
        *self.counters.lock().unwrap_or_else(PoisonError::into_inner) = counters;
    }

    fn counters(&self) -> SessionCounters {
        *self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the engine to `Idle` when the scan loop ends, even by panic.
pub(crate) struct IdleOnDrop(pub Arc<Shared>);

impl Drop for IdleOnDrop {
    fn drop(&mut self) {
        self.0.set_idle();
    }
}

/// The monitoring engine.
pub struct Monitor {
    caps: Arc<Capabilities>,
    shared: Arc<Shared>,
    cancel: Mutex<CancellationToken>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Monitor {
    pub fn new(
        deliverer: Arc<dyn Deliverer>,
        notifier: Arc<dyn Notifier>,
        ledger: DeliveryLedger,
        observer: Arc<dyn MonitorObserver>,
    ) -> Self {
        Self {
            caps: Arc::new(Capabilities {
                deliverer,
                notifier,
                ledger,
                observer,
            }),
            shared: Arc::new(Shared::default()),
            cancel: Mutex::new(CancellationToken::new()),
            task: Mutex::new(None),
        }
    }

    /// Starts a session and spawns the scan loop.
    ///
    /// Rejections (already running, no destination, no usable folder) are
    /// logged through the observer and leave the engine `Idle`.
    pub async fn start(&self, request: SessionRequest) -> Result<(), WisError> {
        {
            let mut state = self.shared.state();
            if *state != MonitorState::Idle {
                return Err(WisError::AlreadyRunning);
            }
            // Claimed while the session is being prepared.
            *state = MonitorState::Running;
        }

        match self.prepare_and_spawn(request).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.shared.set_idle();
                Err(e)
            }
        }
    }

    async fn prepare_and_spawn(&self, request: SessionRequest) -> Result<(), WisError> {
        let SessionRequest {
            folders,
            webhooks,
            profiles,
            settings,
        } = request;

        // Installed before any await so a stop during preparation is honored.
        let cancel = CancellationToken::new();
        *self.cancel.lock().unwrap_or_else(PoisonError::into_inner) = cancel.clone();

        let destinations = resolve_destinations(&webhooks, &profiles);
        if destinations.is_empty() {
            self.caps.log("No webhooks configured.", LogKind::Warn);
            return Err(WisError::NoEnabledDestinations);
        }

        let mut targets = Vec::new();
        for folder in folders.into_iter().filter(|f| f.enabled) {
            if is_dir(Path::new(&folder.path)).await {
                targets.push(ScanTarget::new(folder));
            } else {
                self.caps
                    .log(&format!("Folder not found, skipping: {}", folder.path), LogKind::Warn);
            }
        }
        if targets.is_empty() {
            self.caps.log("No valid folders found.", LogKind::Err);
            return Err(WisError::NoValidFolders);
        }

        let matcher = ImageMatcher::from_formats(&settings.formats);
        self.shared.publish_counters(SessionCounters::default());

        let seen = snapshot(&matcher, &targets).await?;
        self.caps.log(
            &format!("Snapshot: {} existing file(s) marked as seen", seen.len()),
            LogKind::Debug,
        );

        let names: Vec<&str> = destinations.iter().map(|d| d.name.as_str()).collect();
        self.caps.log(
            &format!(
                "Started — {} folder(s) → {} webhook(s): {}",
                targets.len(),
                destinations.len(),
                names.join(", ")
            ),
            LogKind::Ok,
        );
        info!(
            folders = targets.len(),
            destinations = destinations.len(),
            deliverer = self.caps.deliverer.name(),
            "monitoring started"
        );

        let scan = ScanLoop {
            caps: Arc::clone(&self.caps),
            shared: Arc::clone(&self.shared),
            targets,
            destinations,
            settings,
            matcher,
            seen,
            counters: SessionCounters::default(),
            cancel,
        };
        let guard = IdleOnDrop(Arc::clone(&self.shared));
        let handle = tokio::spawn(async move {
            let _guard = guard;
            scan.run().await;
        });
        *self.task.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        Ok(())
    }

    /// Requests the scan loop to stop after the file in progress.
    ///
    /// Does nothing unless a session is running. The ledger is not persisted
    /// here; callers do that once [`stopped`](Self::stopped) returns.
    pub fn stop(&self) {
        {
            let mut state = self.shared.state();
            if *state != MonitorState::Running {
                return;
            }
            *state = MonitorState::Stopping;
        }
        debug!("stop requested");
        self.cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }

    /// Waits for the scan loop task of the last session to exit.
    pub async fn stopped(&self) {
        let handle = self.task.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(handle) = handle
            && let Err(e) = handle.await
        {
            warn!(error = %e, "scan loop ended abnormally");
        }
    }

    pub fn state(&self) -> MonitorState {
        *self.shared.state()
    }

    pub fn is_running(&self) -> bool {
        self.state() == MonitorState::Running
    }

    /// Copy of the current session's counters.
    pub fn counters(&self) -> SessionCounters {
        self.shared.counters()
    }

    /// The ledger attempts are recorded in.
    pub fn ledger(&self) -> &DeliveryLedger {
        &self.caps.ledger
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

/// Collects every image already present in the target folders.
async fn snapshot(
    matcher: &ImageMatcher,
    targets: &[ScanTarget],
) -> Result<HashSet<PathBuf>, WisError> {
    let matcher = matcher.clone();
    let roots: Vec<(PathBuf, bool)> = targets
        .iter()
        .map(|t| (absolute(Path::new(&t.folder.path)), t.folder.recursive))
        .collect();
    tokio::task::spawn_blocking(move || {
        roots
            .iter()
            .flat_map(|(root, recursive)| matcher.iter_images(root, *recursive))
            .collect()
    })
    .await
    .map_err(|e| WisError::Internal(format!("snapshot task failed: {e}")))
}
