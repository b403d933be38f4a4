// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Activity log marshalling and rendering.
//!
//! The engine reports from its background task. [`ChannelObserver`] only
//! forwards each report into an unbounded channel; [`print_activity`] drains
//! that channel on the controller side and writes the activity log.

use std::io::Write;

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tracing::debug;
use wis_core::{LogKind, MonitorObserver};

/// One report from the engine, stamped when it was made.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityEvent {
    Log {
        at: DateTime<Local>,
        message: String,
        kind: LogKind,
    },
    Counters {
        sent: u64,
        failed: u64,
    },
}

/// Observer that hands every report to the controller task.
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<ActivityEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ActivityEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: ActivityEvent) {
        // The receiver only goes away during shutdown.
        let _ = self.tx.send(event);
    }
}

impl MonitorObserver for ChannelObserver {
    fn on_log(&self, message: &str, kind: LogKind) {
        self.send(ActivityEvent::Log {
            at: Local::now(),
            message: message.to_string(),
            kind,
        });
    }

    fn on_counters(&self, sent: u64, failed: u64) {
        self.send(ActivityEvent::Counters { sent, failed });
    }
}

/// Prints events to stdout until every sender is dropped or stdout closes.
pub async fn print_activity(rx: mpsc::UnboundedReceiver<ActivityEvent>, use_color: bool) {
    write_activity(rx, std::io::stdout(), use_color).await;
}

/// Writes one line per event to `out`. Stops at the first write error, such
/// as a closed pipe; later events are dropped by the observer.
pub async fn write_activity<W: Write>(
    mut rx: mpsc::UnboundedReceiver<ActivityEvent>,
    mut out: W,
    use_color: bool,
) {
    while let Some(event) = rx.recv().await {
        let line = render_event(&event, use_color);
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            debug!(error = %e, "activity output closed");
            break;
        }
    }
}

/// Renders one activity line: `HH:MM:SS  <icon>  <message>`.
pub fn render_event(event: &ActivityEvent, use_color: bool) -> String {
    match event {
        ActivityEvent::Log { at, message, kind } => {
            let time = at.format("%H:%M:%S").to_string();
            if use_color {
                use colored::Colorize;
                let icon = match kind {
                    LogKind::Ok => kind.icon().green(),
                    LogKind::Err => kind.icon().red(),
                    LogKind::Warn => kind.icon().yellow(),
                    LogKind::Info => kind.icon().cyan(),
                    LogKind::Debug => kind.icon().dimmed(),
                };
                let message = match kind {
                    LogKind::Err => message.red(),
                    LogKind::Debug => message.dimmed(),
                    _ => message.normal(),
                };
                format!("{}  {icon}  {message}", time.dimmed())
            } else {
                format!("{time}  {}  {message}", kind.icon())
            }
        }
        ActivityEvent::Counters { sent, failed } => {
            if use_color {
                use colored::Colorize;
                format!(
                    "          sent {}  failed {}",
                    sent.to_string().green(),
                    failed.to_string().red()
                )
            } else {
                format!("          sent {sent}  failed {failed}")
            }
        }
    }
}
