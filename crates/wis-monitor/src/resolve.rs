// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session-start resolution of webhook identity overrides.

use std::collections::HashMap;

use tracing::debug;
use wis_config::model::{IdentityProfile, WebhookConfig};
use wis_core::{ResolvedDestination, ResolvedIdentity};

/// Resolves the active webhooks against the profile set.
///
/// Disabled webhooks and webhooks without a URL are dropped. An override
/// that is switched off, names no profile, names a profile that does not
/// exist, or points at a profile with no fields resolves to no override.
/// The result is a copy: later profile edits do not affect it.
pub fn resolve_destinations(
    webhooks: &[WebhookConfig],
    profiles: &[IdentityProfile],
) -> Vec<ResolvedDestination> {
    let by_name: HashMap<&str, &IdentityProfile> =
        profiles.iter().map(|p| (p.name.as_str(), p)).collect();

    webhooks
        .iter()
        .filter(|w| w.is_active())
        .map(|w| {
            let identity = w.profile_ref().and_then(|name| match by_name.get(name) {
                Some(profile) => Some(ResolvedIdentity {
                    username: profile.username.clone(),
                    avatar_url: profile.avatar_url.clone(),
                }),
                None => {
                    debug!(webhook = %w.name, profile = name, "profile not found, posting without override");
                    None
                }
            });
            ResolvedDestination {
                name: w.name.clone(),
                url: w.url.trim().to_string(),
                identity: identity.filter(|id| !id.is_empty()),
            }
        })
        .collect()
}
