// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image file enumeration by extension.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;
use walkdir::WalkDir;

/// Recognizes image files by lowercased extension.
#[derive(Debug, Clone)]
pub struct ImageMatcher {
    extensions: Arc<HashSet<String>>,
}

impl ImageMatcher {
    /// Parses a comma-separated extension list such as `".jpg, .PNG,gif"`.
    ///
    /// Entries are trimmed and lowercased, empty entries are dropped, and a
    /// missing leading dot is added.
    pub fn from_formats(formats: &str) -> Self {
        let extensions = formats
            .split(',')
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty() && e != ".")
            .map(|e| if e.starts_with('.') { e } else { format!(".{e}") })
            .collect();
        Self {
            extensions: Arc::new(extensions),
        }
    }

    /// The normalized extension set.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// True when the file name's extension is in the set.
    pub fn matches(&self, path: &Path) -> bool {
        extension_of(path).is_some_and(|ext| self.extensions.contains(&ext))
    }

    /// Lazily enumerates image files under `root` as absolute paths.
    ///
    /// Only direct children are visited unless `recursive` is set. Entries
    /// that cannot be read are skipped, so a missing or unreadable folder
    /// yields nothing. Each call starts a fresh walk.
    pub fn iter_images(&self, root: &Path, recursive: bool) -> Images {
        let walker = WalkDir::new(absolute(root)).min_depth(1);
        let walker = if recursive { walker } else { walker.max_depth(1) };
        Images {
            walker: walker.into_iter(),
            matcher: self.clone(),
        }
    }
}

/// Iterator returned by [`ImageMatcher::iter_images`].
pub struct Images {
    walker: walkdir::IntoIter,
    matcher: ImageMatcher,
}

impl Iterator for Images {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        for entry in self.walker.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if is_file && self.matcher.matches(entry.path()) {
                return Some(entry.into_path());
            }
        }
        None
    }
}

/// Lowercased extension with its leading dot, if the file name has one.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

/// `path` made absolute against the working directory, without resolving links.
pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
