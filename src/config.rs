//! Merge configuration (`linkmerge.toml`).
//!
//! Selects the diff algorithm and the conflict comment syntax. Every field is
//! optional; a missing file means all defaults.

use std::fmt;
use std::path::Path;

use linkmerge_text::{DiffAlgorithm, LineDiffer};
use serde::Deserialize;

use crate::merge::formatter::{CommentFormatter, CommentStyle, CommentStyleKind};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "linkmerge.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Diff settings.
    #[serde(default)]
    pub diff: DiffConfig,

    /// Conflict comment settings.
    #[serde(default)]
    pub comments: CommentConfig,
}

// ---------------------------------------------------------------------------
// DiffConfig
// ---------------------------------------------------------------------------

/// How sibling documents are diffed against their baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiffConfig {
    /// Line diff algorithm (default: `"myers"`).
    #[serde(default)]
    pub algorithm: DiffAlgorithm,
}

// ---------------------------------------------------------------------------
// CommentConfig
// ---------------------------------------------------------------------------

/// Conflict comment syntax.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommentConfig {
    /// Insert conflict comments at all. When `false`, conflicts are still
    /// reported but the merged text carries no annotation.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// `"block"` or `"line"`.
    #[serde(default)]
    pub style: CommentStyleKind,

    /// Opening delimiter for block comments.
    #[serde(default = "default_block_open")]
    pub block_open: String,

    /// Closing delimiter for block comments.
    #[serde(default = "default_block_close")]
    pub block_close: String,

    /// Prefix for line comments.
    #[serde(default = "default_line_prefix")]
    pub line_prefix: String,
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            style: CommentStyleKind::default(),
            block_open: default_block_open(),
            block_close: default_block_close(),
            line_prefix: default_line_prefix(),
        }
    }
}

const fn default_enabled() -> bool {
    true
}

fn default_block_open() -> String {
    "/*".to_owned()
}

fn default_block_close() -> String {
    "*/".to_owned()
}

fn default_line_prefix() -> String {
    "//".to_owned()
}

impl CommentConfig {
    /// The comment style this section selects.
    #[must_use]
    pub fn style(&self) -> CommentStyle {
        match self.style {
            CommentStyleKind::Block => CommentStyle::Block {
                open: self.block_open.clone(),
                close: self.block_close.clone(),
            },
            CommentStyleKind::Line => CommentStyle::Line {
                prefix: self.line_prefix.clone(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Error loading a configuration file.
#[derive(Debug)]
pub struct ConfigError {
    /// The path that was being loaded (if available).
    pub path: Option<std::path::PathBuf>,
    /// Human-readable message with line-level detail when possible.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(p) = &self.path {
            write!(f, "{}: {}", p.display(), self.message)
        } else {
            write!(f, "config error: {}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields all defaults.
    ///
    /// # Errors
    /// Returns `ConfigError` on I/O errors (other than not-found) or parse errors.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError {
                    path: Some(path.to_owned()),
                    message: format!("could not read file: {e}"),
                });
            }
        };
        Self::parse(&contents).map_err(|mut e| {
            e.path = Some(path.to_owned());
            e
        })
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `ConfigError` on invalid TOML or unknown fields.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| {
            let mut message = e.message().to_owned();
            if let Some(span) = e.span() {
                let line = toml_str[..span.start]
                    .chars()
                    .filter(|&c| c == '\n')
                    .count()
                    + 1;
                message = format!("line {line}: {message}");
            }
            ConfigError {
                path: None,
                message,
            }
        })
    }

    /// The differ this configuration selects.
    #[must_use]
    pub const fn differ(&self) -> LineDiffer {
        LineDiffer::new(self.diff.algorithm)
    }

    /// The conflict comment formatter this configuration selects.
    #[must_use]
    pub fn comment_formatter(&self) -> CommentFormatter {
        if self.comments.enabled {
            CommentFormatter::new(self.comments.style())
        } else {
            CommentFormatter::disabled()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
