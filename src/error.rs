//! Error type shared by the deck, config, and markdown layers
//!
//! Per-block failures (a theme that will not load, a diagram that will not
//! convert) are not represented here. They stay inside the block that
//! produced them so the rest of the slide keeps rendering.

use log::warn;
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Boxed cause attached to config and deck failures.
pub type Cause = Box<dyn StdError + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Bare I/O failure with no better context (stdout, runtime setup)
    Io(io::Error),

    // ── decks ───────────────────────────────────────────────────────────────
    DeckLoad { path: PathBuf, source: io::Error },
    DeckParse {
        message: String,
        source: Option<Cause>,
    },
    /// `index` is 1-based, as shown to the user
    SlideOutOfRange { index: usize, len: usize },

    // ── settings ────────────────────────────────────────────────────────────
    ConfigLoad { path: PathBuf, source: Cause },
    ConfigSave { path: PathBuf, source: Cause },
    ConfigParse {
        message: String,
        source: Option<Cause>,
    },
    ConfigDirNotFound,

    // ── rendering ───────────────────────────────────────────────────────────
    /// Markdown was rejected before tree conversion; callers show it literally
    MarkdownParse(String),

    /// Anything else, carried as a message
    Application(String),
}

impl Error {
    pub(crate) fn config_save(path: &Path, source: impl Into<Cause>) -> Self {
        Error::ConfigSave {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub(crate) fn config_load(path: &Path, source: impl Into<Cause>) -> Self {
        Error::ConfigLoad {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::DeckParse {
            message: err.message().to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {err}"),
            Error::DeckLoad { path, source } => {
                write!(f, "Failed to read deck '{}': {source}", path.display())
            }
            Error::DeckParse { message, .. } => write!(f, "Invalid deck: {message}"),
            Error::SlideOutOfRange { index, len } => {
                write!(f, "Slide {index} does not exist (deck has {len} slides)")
            }
            Error::ConfigLoad { path, source } => {
                write!(f, "Cannot read settings '{}': {source}", path.display())
            }
            Error::ConfigSave { path, source } => {
                write!(f, "Cannot write settings '{}': {source}", path.display())
            }
            Error::ConfigParse { message, .. } => write!(f, "Invalid settings: {message}"),
            Error::ConfigDirNotFound => f.write_str("Configuration directory not found"),
            Error::MarkdownParse(msg) => write!(f, "Markdown parse error: {msg}"),
            Error::Application(msg) => f.write_str(msg),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(err) | Error::DeckLoad { source: err, .. } => Some(err),
            Error::ConfigLoad { source, .. } | Error::ConfigSave { source, .. } => {
                Some(source.as_ref())
            }
            Error::DeckParse { source, .. } | Error::ConfigParse { source, .. } => {
                source.as_deref().map(|cause| cause as &(dyn StdError + 'static))
            }
            _ => None,
        }
    }
}

/// Fallback-with-a-warning for results whose failure should not stop a run.
pub trait ResultExt<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        self.unwrap_or_else(|err| {
            warn!("{context}: {err}. Using default.");
            default
        })
    }
}
