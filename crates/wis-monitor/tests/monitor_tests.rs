// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine tests driven by the scripted deliverer and recording observer.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use wis_config::model::{FolderConfig, IdentityProfile, StatsConfig, WebhookConfig};
use wis_core::{
    DeliveryErrorKind, LogKind, MonitorState, NotifyOutcome, ResolvedIdentity, SessionCounters,
    WisError,
};
use wis_monitor::{Monitor, MonitorSettings, SessionRequest};
use wis_stats::DeliveryLedger;
use wis_test_utils::{MockDeliverer, MockResponse, RecordingNotifier, RecordingObserver};

const WAIT: Duration = Duration::from_secs(3);
const URL_A: &str = "https://hooks.test/a";
const URL_B: &str = "https://hooks.test/b";

struct Harness {
    _dir: tempfile::TempDir,
    watch: PathBuf,
    deliverer: MockDeliverer,
    observer: RecordingObserver,
    notifier: RecordingNotifier,
    ledger: DeliveryLedger,
    monitor: Monitor,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let watch = dir.path().join("watch");
        std::fs::create_dir(&watch).unwrap();

        let deliverer = MockDeliverer::new();
        let observer = RecordingObserver::new();
        let notifier = RecordingNotifier::new();
        let ledger = DeliveryLedger::new(
            dir.path().join("wis_stats.json"),
            &StatsConfig {
                autosave_every: 0,
                ..StatsConfig::default()
            },
        );
        let monitor = Monitor::new(
            Arc::new(deliverer.clone()),
            Arc::new(notifier.clone()),
            ledger.clone(),
            Arc::new(observer.clone()),
        );

        Self {
            _dir: dir,
            watch,
            deliverer,
            observer,
            notifier,
            ledger,
            monitor,
        }
    }

    fn folder(&self) -> FolderConfig {
        FolderConfig::new(self.watch.display().to_string())
    }

    fn request(&self, webhooks: Vec<WebhookConfig>) -> SessionRequest {
        SessionRequest {
            folders: vec![self.folder()],
            webhooks,
            profiles: Vec::new(),
            settings: fast_settings(),
        }
    }

    async fn shutdown(&self) {
        self.monitor.stop();
        self.monitor.stopped().await;
    }
}

fn fast_settings() -> MonitorSettings {
    MonitorSettings {
        scan_rate: Duration::from_millis(30),
        file_delay: Duration::from_millis(10),
        send_timeout: Duration::from_secs(7),
        formats: ".png,.jpg".into(),
        debug: false,
        stop_on_first_failure: false,
    }
}

fn hooks() -> Vec<WebhookConfig> {
    vec![WebhookConfig::new("A", URL_A), WebhookConfig::new("B", URL_B)]
}

/// Writes `name` into `dir` via rename so the scanner never sees a partial file.
fn drop_image(dir: &Path, name: &str, bytes: &[u8]) {
    let staging = dir.join(format!("{name}.part"));
    std::fs::write(&staging, bytes).unwrap();
    std::fs::rename(&staging, dir.join(name)).unwrap();
}

#[tokio::test]
async fn existing_files_are_never_sent() {
    let h = Harness::new();
    drop_image(&h.watch, "old.png", b"old");

    h.monitor.start(h.request(hooks())).await.unwrap();
    assert!(h.observer.contains("Snapshot: 1 existing file(s) marked as seen"));

    drop_image(&h.watch, "new.png", b"new");
    assert!(h.observer.wait_for_counter_updates(1, WAIT).await);
    tokio::time::sleep(Duration::from_millis(150)).await;
    h.shutdown().await;

    let files: Vec<PathBuf> = h.deliverer.calls().into_iter().map(|c| c.file).collect();
    assert_eq!(files.len(), 2, "one attempt per destination");
    assert!(files.iter().all(|f| f.ends_with("new.png")));
}

#[tokio::test]
async fn start_is_rejected_without_destinations() {
    let h = Harness::new();
    let mut disabled = WebhookConfig::new("off", URL_A);
    disabled.enabled = false;

    let err = h
        .monitor
        .start(h.request(vec![disabled, WebhookConfig::new("blank", "")]))
        .await
        .unwrap_err();

    assert!(matches!(err, WisError::NoEnabledDestinations));
    assert_eq!(h.observer.messages_of(LogKind::Warn), ["No webhooks configured."]);
    assert_eq!(h.monitor.state(), MonitorState::Idle);
}

#[tokio::test]
async fn missing_folders_are_reported_and_reject_start() {
    let h = Harness::new();
    let missing = h.watch.join("nope").display().to_string();
    let mut disabled = h.folder();
    disabled.enabled = false;
    let request = SessionRequest {
        folders: vec![FolderConfig::new(missing.clone()), disabled],
        ..h.request(hooks())
    };

    let err = h.monitor.start(request).await.unwrap_err();

    assert!(matches!(err, WisError::NoValidFolders));
    assert!(err.is_start_rejection());
    assert_eq!(
        h.observer.messages_of(LogKind::Warn),
        [format!("Folder not found, skipping: {missing}")]
    );
    assert_eq!(h.observer.messages_of(LogKind::Err), ["No valid folders found."]);
    assert!(!h.monitor.is_running());
}

#[tokio::test]
async fn missing_folder_is_skipped_when_another_is_valid() {
    let h = Harness::new();
    let missing = h.watch.join("nope").display().to_string();
    let request = SessionRequest {
        folders: vec![FolderConfig::new(missing.clone()), h.folder()],
        ..h.request(hooks())
    };

    h.monitor.start(request).await.unwrap();
    assert!(h.observer.contains(&format!("Folder not found, skipping: {missing}")));
    assert!(h.observer.contains("Started — 1 folder(s) → 2 webhook(s): A, B"));
    h.shutdown().await;
}

#[tokio::test]
async fn lifecycle_and_restart() {
    let h = Harness::new();
    assert_eq!(h.monitor.state(), MonitorState::Idle);

    h.monitor.start(h.request(hooks())).await.unwrap();
    assert_eq!(h.monitor.state(), MonitorState::Running);
    assert!(matches!(
        h.monitor.start(h.request(hooks())).await,
        Err(WisError::AlreadyRunning)
    ));

    h.monitor.stop();
    assert_ne!(h.monitor.state(), MonitorState::Running);
    h.monitor.stopped().await;
    assert_eq!(h.monitor.state(), MonitorState::Idle);
    assert!(h.observer.contains("Monitoring stopped"));

    // Stopping an idle engine is a no-op.
    h.monitor.stop();
    assert_eq!(h.monitor.state(), MonitorState::Idle);

    h.monitor.start(h.request(hooks())).await.unwrap();
    assert!(h.monitor.is_running());
    h.shutdown().await;
}

#[tokio::test]
async fn stop_wakes_the_loop_from_its_sleep() {
    let h = Harness::new();
    let request = SessionRequest {
        settings: MonitorSettings {
            scan_rate: Duration::from_secs(3600),
            ..fast_settings()
        },
        ..h.request(hooks())
    };
    h.monitor.start(request).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    h.monitor.stop();
    tokio::time::timeout(Duration::from_secs(2), h.monitor.stopped())
        .await
        .expect("loop should exit promptly");
    assert_eq!(h.monitor.state(), MonitorState::Idle);
}

#[tokio::test]
async fn stop_during_delivery_finishes_the_current_file_only() {
    let h = Harness::new();
    let deliverer = h.deliverer.clone().with_latency(Duration::from_millis(300));
    h.monitor.start(h.request(hooks())).await.unwrap();

    drop_image(&h.watch, "first.png", b"1");
    drop_image(&h.watch, "second.png", b"2");
    assert!(deliverer.wait_for_calls(1, WAIT).await);

    h.monitor.stop();
    h.monitor.stopped().await;

    // Both destinations of the file in flight, nothing of the next one.
    let calls = deliverer.calls();
    assert_eq!(deliverer.called_urls(), vec![URL_A, URL_B]);
    assert_eq!(calls[0].file, calls[1].file);
    assert_eq!(h.observer.count_containing("New: "), 1);

    assert_eq!(h.observer.counter_updates(), vec![(1, 0)]);
    assert_eq!(h.monitor.counters(), SessionCounters { sent: 1, failed: 0 });
    assert_eq!(h.notifier.outcomes(), vec![NotifyOutcome::AllDelivered]);
    let sends = h.ledger.sends();
    assert_eq!(sends.len(), 2);
    assert!(sends.iter().all(|r| r.ok));
    assert!(h.observer.contains("Monitoring stopped"));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(deliverer.call_count(), 2);
}

#[tokio::test]
async fn file_that_vanishes_during_settle_delay_is_not_marked_seen() {
    let h = Harness::new();
    let request = SessionRequest {
        settings: MonitorSettings {
            file_delay: Duration::from_millis(400),
            ..fast_settings()
        },
        ..h.request(hooks())
    };
    h.monitor.start(request).await.unwrap();

    drop_image(&h.watch, "a.png", b"data");
    assert!(h.observer.wait_for_log("New: a.png", WAIT).await);
    std::fs::remove_file(h.watch.join("a.png")).unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(h.deliverer.call_count(), 0);

    drop_image(&h.watch, "a.png", b"data");
    assert!(h.deliverer.wait_for_calls(2, WAIT).await);
    h.shutdown().await;
}

#[tokio::test]
async fn empty_file_is_skipped_until_it_has_content() {
    let h = Harness::new();
    h.monitor.start(h.request(hooks())).await.unwrap();

    drop_image(&h.watch, "a.png", b"");
    assert!(h.observer.wait_for_log("Empty, skipping: a.png", WAIT).await);
    assert_eq!(h.deliverer.call_count(), 0);
    assert!(h.observer.counter_updates().is_empty());

    drop_image(&h.watch, "a.png", b"now with bytes");
    assert!(h.observer.wait_for_counter_updates(1, WAIT).await);
    h.shutdown().await;

    assert_eq!(h.deliverer.call_count(), 2);
    assert_eq!(h.monitor.counters(), SessionCounters { sent: 1, failed: 0 });
}

#[tokio::test]
async fn failed_files_are_never_retried() {
    let h = Harness::new();
    h.deliverer.respond(URL_A, MockResponse::Status(500));
    h.monitor
        .start(h.request(vec![WebhookConfig::new("A", URL_A)]))
        .await
        .unwrap();

    drop_image(&h.watch, "a.png", b"data");
    assert!(h.observer.wait_for_counter_updates(1, WAIT).await);
    tokio::time::sleep(Duration::from_millis(200)).await;
    h.shutdown().await;

    assert_eq!(h.deliverer.call_count(), 1);
    assert_eq!(h.observer.counter_updates(), [(0, 1)]);
    assert_eq!(h.notifier.outcomes(), [NotifyOutcome::SomeFailed]);
    assert!(h.observer.contains("Non-2xx (500)  a.png  →  A"));

    let errors = h.ledger.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, "HTTP Error");
    assert_eq!(errors[0].detail, "Non-2xx response");
}

#[tokio::test]
async fn all_destinations_are_attempted_by_default() {
    for order in [[("A", URL_A), ("B", URL_B)], [("B", URL_B), ("A", URL_A)]] {
        let h = Harness::new();
        h.deliverer
            .respond(URL_A, MockResponse::Error(DeliveryErrorKind::Timeout));
        let webhooks = order
            .iter()
            .map(|(name, url)| WebhookConfig::new(*name, *url))
            .collect();
        h.monitor.start(h.request(webhooks)).await.unwrap();

        drop_image(&h.watch, "a.png", b"data");
        assert!(h.observer.wait_for_counter_updates(1, WAIT).await);
        h.shutdown().await;

        let expected: Vec<&str> = order.iter().map(|(_, url)| *url).collect();
        assert_eq!(h.deliverer.called_urls(), expected);
        assert_eq!(h.ledger.len(), 2);
        assert_eq!(h.monitor.counters(), SessionCounters { sent: 0, failed: 1 });
        assert!(h.observer.contains("Timeout  a.png  →  A"));
        assert!(h.observer.contains("a.png  →  B"));
        assert_eq!(h.ledger.errors()[0].kind, "Timeout");
    }
}

#[tokio::test]
async fn short_circuit_skips_destinations_after_a_failure() {
    let h = Harness::new();
    h.deliverer
        .respond(URL_A, MockResponse::Error(DeliveryErrorKind::Connection));
    let request = SessionRequest {
        settings: MonitorSettings {
            stop_on_first_failure: true,
            ..fast_settings()
        },
        ..h.request(hooks())
    };
    h.monitor.start(request).await.unwrap();

    drop_image(&h.watch, "a.png", b"data");
    assert!(h.observer.wait_for_counter_updates(1, WAIT).await);
    h.shutdown().await;

    assert_eq!(h.deliverer.called_urls(), [URL_A]);
    assert_eq!(h.ledger.len(), 1);
    assert!(h.observer.contains("Connection error  a.png  →  A"));
    assert_eq!(h.ledger.errors()[0].kind, "Connection Error");
}

#[tokio::test]
async fn short_circuit_still_attempts_destinations_before_the_failure() {
    let h = Harness::new();
    h.deliverer
        .respond(URL_A, MockResponse::Error(DeliveryErrorKind::Connection));
    let request = SessionRequest {
        settings: MonitorSettings {
            stop_on_first_failure: true,
            ..fast_settings()
        },
        ..h.request(vec![
            WebhookConfig::new("B", URL_B),
            WebhookConfig::new("A", URL_A),
        ])
    };
    h.monitor.start(request).await.unwrap();

    drop_image(&h.watch, "a.png", b"data");
    assert!(h.observer.wait_for_counter_updates(1, WAIT).await);
    h.shutdown().await;

    assert_eq!(h.deliverer.called_urls(), [URL_B, URL_A]);
    assert_eq!(h.ledger.len(), 2);
    assert_eq!(h.monitor.counters(), SessionCounters { sent: 0, failed: 1 });
}

#[tokio::test]
async fn successful_files_count_and_notify() {
    let h = Harness::new();
    h.monitor.start(h.request(hooks())).await.unwrap();

    drop_image(&h.watch, "a.png", b"one");
    assert!(h.observer.wait_for_counter_updates(1, WAIT).await);
    drop_image(&h.watch, "b.JPG", b"two");
    assert!(h.observer.wait_for_counter_updates(2, WAIT).await);
    // Not an accepted format.
    drop_image(&h.watch, "c.gif", b"three");
    tokio::time::sleep(Duration::from_millis(150)).await;
    h.shutdown().await;

    assert_eq!(h.observer.counter_updates(), [(1, 0), (2, 0)]);
    assert_eq!(
        h.notifier.outcomes(),
        [NotifyOutcome::AllDelivered, NotifyOutcome::AllDelivered]
    );
    assert_eq!(h.deliverer.call_count(), 4);

    let sends = h.ledger.sends();
    assert!(sends.iter().all(|s| s.ok));
    assert_eq!(sends[0].file, "a.png");
    assert_eq!(sends[0].webhook, "A");
    assert_eq!(sends[0].folder, h.watch.display().to_string());
    assert_eq!(sends[2].ext, ".jpg");
}

#[tokio::test]
async fn identity_and_timeout_reach_the_deliverer() {
    let h = Harness::new();
    let mut hook = WebhookConfig::new("A", URL_A);
    hook.profile_enabled = true;
    hook.profile = "cam".into();
    let request = SessionRequest {
        profiles: vec![IdentityProfile {
            name: "cam".into(),
            username: "Camera".into(),
            avatar_url: "https://img.test/cam.png".into(),
        }],
        ..h.request(vec![hook, WebhookConfig::new("B", URL_B)])
    };
    h.monitor.start(request).await.unwrap();

    drop_image(&h.watch, "a.png", b"data");
    assert!(h.observer.wait_for_counter_updates(1, WAIT).await);
    h.shutdown().await;

    let calls = h.deliverer.calls();
    assert_eq!(
        calls[0].identity,
        Some(ResolvedIdentity {
            username: "Camera".into(),
            avatar_url: "https://img.test/cam.png".into(),
        })
    );
    assert_eq!(calls[1].identity, None);
    assert!(calls.iter().all(|c| c.timeout == Duration::from_secs(7)));
}

#[tokio::test]
async fn debug_mode_numbers_scan_cycles() {
    let h = Harness::new();
    let request = SessionRequest {
        settings: MonitorSettings {
            debug: true,
            ..fast_settings()
        },
        ..h.request(hooks())
    };
    h.monitor.start(request).await.unwrap();
    assert!(h.observer.wait_for_log("Scan #2", WAIT).await);
    h.shutdown().await;

    assert!(h.observer.messages_of(LogKind::Debug).contains(&"Scan #1".to_string()));
}

#[tokio::test]
async fn recursive_folders_report_relative_paths() {
    let h = Harness::new();
    let sub = h.watch.join("sub");
    std::fs::create_dir(&sub).unwrap();
    let mut folder = h.folder();
    folder.recursive = true;
    let request = SessionRequest {
        folders: vec![folder],
        ..h.request(vec![WebhookConfig::new("A", URL_A)])
    };
    h.monitor.start(request).await.unwrap();

    drop_image(&sub, "c.png", b"data");
    assert!(h.observer.wait_for_counter_updates(1, WAIT).await);
    h.shutdown().await;

    let rel = Path::new("sub").join("c.png");
    assert!(h.observer.contains(&format!("New: {}  [watch]", rel.display())));
    assert_eq!(h.ledger.sends()[0].file, "c.png");
}

#[tokio::test]
async fn non_recursive_folders_ignore_subdirectories() {
    let h = Harness::new();
    let sub = h.watch.join("sub");
    std::fs::create_dir(&sub).unwrap();
    h.monitor.start(h.request(hooks())).await.unwrap();

    drop_image(&sub, "c.png", b"data");
    tokio::time::sleep(Duration::from_millis(200)).await;
    h.shutdown().await;

    assert_eq!(h.deliverer.call_count(), 0);
}
