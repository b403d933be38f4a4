// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config error diagnostics.
//!
//! Figment reports deserialization failures with a key path but no source
//! position. [`ConfigError::from_figment`] turns each failure into a miette
//! diagnostic and, when the offending TOML text is known, points a label at
//! the bad key and suggests the closest valid one.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use std::path::Path;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::loader;

/// Jaro-Winkler score a valid key must beat to be offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no config struct accepts.
    #[error("unknown key `{key}` in {section}")]
    #[diagnostic(code(wis::config::unknown_key), help("{help}"))]
    UnknownKey {
        key: String,
        /// `[monitor]`, `[[webhooks]]`-style name of the enclosing table.
        section: String,
        /// Closest valid key, if any is close enough.
        suggestion: Option<String>,
        help: String,
        #[label("not a recognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong type.
    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(code(wis::config::invalid_type), help("use a value of type {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    /// A required key is absent, such as a webhook without `url`.
    #[error("missing required key `{key}`")]
    #[diagnostic(code(wis::config::missing_key), help("set `{key}` in wis.toml"))]
    MissingKey { key: String },

    /// A semantic check failed after the file was read.
    #[error("validation error: {message}")]
    #[diagnostic(code(wis::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(wis::config::other))]
    Other(String),
}

impl ConfigError {
    /// Converts every error carried by a figment failure into a diagnostic.
    pub fn from_figment(err: figment::Error, sources: &ConfigSources) -> Vec<Self> {
        use figment::error::Kind;

        err.into_iter()
            .map(|error| match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let section = error.path.first().map(String::as_str);
                    let suggestion = suggest_key(field, expected);
                    let help = match &suggestion {
                        Some(s) => format!("did you mean `{s}`? valid keys: {}", expected.join(", ")),
                        None => format!("valid keys: {}", expected.join(", ")),
                    };
                    let (span, src) = sources
                        .locate(origin_of(&error).as_deref(), section, field)
                        .unzip();
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        section: section_label(section, sources),
                        suggestion,
                        help,
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: dotted_key(&error.path, field),
                },
                Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                    key: error.path.join("."),
                    detail: format!("found {actual}, expected {expected}"),
                    expected: expected.to_string(),
                },
                _ => ConfigError::Other(error.to_string()),
            })
            .collect()
    }
}

/// TOML texts an error may point into, keyed by display name.
#[derive(Debug, Default)]
pub struct ConfigSources {
    files: Vec<(String, String)>,
}

impl ConfigSources {
    /// The files of the standard lookup hierarchy that exist.
    pub fn standard() -> Self {
        let local = std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG_FILE))
            .unwrap_or_else(|_| loader::LOCAL_CONFIG_FILE.into());
        let mut sources = Self::default();
        for path in [
            Path::new(loader::SYSTEM_CONFIG_PATH).to_path_buf(),
            loader::user_config_path(),
            local,
        ] {
            sources.add_file(&path);
        }
        sources
    }

    /// A single file, if it can be read.
    pub fn file(path: &Path) -> Self {
        let mut sources = Self::default();
        sources.add_file(path);
        sources
    }

    /// TOML that did not come from a file.
    pub fn inline(content: &str) -> Self {
        Self {
            files: vec![("<inline>".to_string(), content.to_string())],
        }
    }

    fn add_file(&mut self, path: &Path) {
        if let Ok(content) = std::fs::read_to_string(path) {
            self.files.push((path.display().to_string(), content));
        }
    }

    /// Finds `field` under `section`. `origin` names the file figment blamed;
    /// when it is not among the sources, a lone source is assumed.
    fn locate(
        &self,
        origin: Option<&str>,
        section: Option<&str>,
        field: &str,
    ) -> Option<(SourceSpan, NamedSource<String>)> {
        let (name, content) = self
            .files
            .iter()
            .find(|(name, _)| Some(name.as_str()) == origin)
            .or_else(|| (self.files.len() == 1).then(|| &self.files[0]))?;
        let offset = find_key_offset(content, section, field)?;
        Some((
            SourceSpan::new(offset.into(), field.len()),
            NamedSource::new(name, content.clone()),
        ))
    }
}

fn origin_of(error: &figment::error::Error) -> Option<String> {
    match error.metadata.as_ref()?.source.as_ref()? {
        figment::Source::File(path) => Some(path.display().to_string()),
        _ => None,
    }
}

/// `[[webhooks]]` when the section is an array of tables in any source,
/// `[monitor]` otherwise, `the top level` without a section.
fn section_label(section: Option<&str>, sources: &ConfigSources) -> String {
    let Some(section) = section else {
        return "the top level".to_string();
    };
    let array = format!("[[{section}]]");
    if sources.files.iter().any(|(_, c)| c.contains(&array)) {
        array
    } else {
        format!("[{section}]")
    }
}

fn dotted_key(path: &[String], field: &str) -> String {
    path.iter()
        .map(String::as_str)
        .chain(std::iter::once(field))
        .collect::<Vec<_>>()
        .join(".")
}

/// Byte offset of the first `field = ...` line inside `section`.
///
/// Table headers are tracked line by line, so a key is only matched while
/// the current header is `[section]` or `[[section]]`. With no section the
/// search covers the lines before the first header.
pub fn find_key_offset(content: &str, section: Option<&str>, field: &str) -> Option<usize> {
    let mut current: Option<&str> = None;
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        let trimmed = line.trim_start();
        if trimmed.starts_with('[') {
            current = Some(
                trimmed
                    .trim_end()
                    .trim_start_matches('[')
                    .trim_end_matches(']')
                    .trim(),
            );
            continue;
        }
        if current != section {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix(field)
            && rest.trim_start().starts_with('=')
        {
            return Some(start + (line.len() - trimmed.len()));
        }
    }
    None
}

/// The valid key most similar to `unknown`, if it clears the threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Prints each error to stderr with miette's graphical renderer.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}
