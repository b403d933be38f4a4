// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sound notifications through an external player command.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use tracing::debug;
use wis_config::model::SoundConfig;
use wis_core::{Notifier, NotifyOutcome, NullNotifier};

/// Environment variable carrying the configured volume (0.0 to 1.0) to the player.
pub const VOLUME_ENV: &str = "WIS_SOUND_VOLUME";

/// Plays a sound file per outcome by spawning `player <file>`.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    player: String,
    volume: f32,
    success_file: PathBuf,
    failure_file: PathBuf,
}

impl CommandNotifier {
    /// Builds the notifier for `config`, or a silent one when sound is off or
    /// no player is configured. Relative sound files resolve against `base_dir`.
    pub fn from_config(config: &SoundConfig, base_dir: &Path) -> Arc<dyn Notifier> {
        let player = config.player.trim();
        if !config.enabled || player.is_empty() {
            return Arc::new(NullNotifier);
        }
        Arc::new(Self {
            player: player.to_string(),
            volume: config.volume,
            success_file: base_dir.join(&config.success_file),
            failure_file: base_dir.join(&config.failure_file),
        })
    }

    /// The sound file for an outcome.
    pub fn sound_for(&self, outcome: NotifyOutcome) -> &Path {
        match outcome {
            NotifyOutcome::AllDelivered => &self.success_file,
            NotifyOutcome::SomeFailed => &self.failure_file,
        }
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self, outcome: NotifyOutcome) {
        let file = self.sound_for(outcome).to_path_buf();
        if !file.is_file() {
            debug!(file = %file.display(), "sound file not found, skipping");
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let mut command = tokio::process::Command::new(&self.player);
        command
            .arg(&file)
            .env(VOLUME_ENV, format!("{:.2}", self.volume))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        let player = self.player.clone();
        handle.spawn(async move {
            match command.status().await {
                Ok(status) if !status.success() => {
                    debug!(player = %player, %status, "sound player exited with failure");
                }
                Ok(_) => {}
                Err(e) => debug!(player = %player, error = %e, "failed to run sound player"),
            }
        });
    }
}
