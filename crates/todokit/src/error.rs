//! Error types for loading and running todo lists.
//!
//! Construction errors (missing files, bad fields, unknown names, cycles)
//! are raised while configs are turned into package managers, collections
//! and steps. Each file hop wraps the error with [`Error::in_file`] so the
//! final message names every file involved. Execution errors come from
//! failing steps and are wrapped with the position of the step.

use crate::runner::ExecOutcome;
use std::io;
use std::path::{Path, PathBuf};

/// Result type alias for todokit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or executing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A config file does not exist.
    #[error("config file not found: {}", path.display())]
    ConfigNotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// A config file has an extension we cannot parse.
    #[error("unsupported config format for {} (expected .json, .yaml or .yml)", path.display())]
    UnsupportedConfigFormat {
        /// Offending path.
        path: PathBuf,
    },

    /// A config file could not be parsed.
    #[error("failed to parse {}: {message}", path.display())]
    ConfigParse {
        /// Offending path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A required key is absent.
    #[error("missing field `{field}` in {context}")]
    MissingField {
        /// Name of the key.
        field: String,
        /// Where the key was expected.
        context: String,
    },

    /// A key holds a value of the wrong shape or an unknown enumerated value.
    #[error("invalid value {value} for `{field}` in {context}")]
    InvalidValue {
        /// Name of the key.
        field: String,
        /// Rendered offending value.
        value: String,
        /// Where the key was found.
        context: String,
    },

    /// No name was given and the file does not hold exactly one entry.
    #[error("no {kind} name given and the file defines {count} of them")]
    AmbiguousSelection {
        /// What was being selected ("todo list", "collection", ...).
        kind: &'static str,
        /// How many candidates exist.
        count: usize,
    },

    /// A requested name is not defined.
    #[error("{kind} `{name}` not found")]
    NameNotFound {
        /// What was being selected.
        kind: &'static str,
        /// Requested name.
        name: String,
    },

    /// Lists or collections reference each other in a loop.
    #[error("cyclic reference: {chain}")]
    CyclicReference {
        /// The loop, rendered as `a -> b -> a`.
        chain: String,
    },

    /// An external command failed under the strict failure policy.
    #[error("command `{command}` {outcome}")]
    ExternalCommandFailed {
        /// Rendered command line.
        command: String,
        /// What happened to the process.
        outcome: ExecOutcome,
    },

    /// A step of a todo list failed; the remaining steps were not run.
    #[error("step {index} ({step}) of todo list `{list}` failed: {cause}")]
    StepFailed {
        /// Todo list name.
        list: String,
        /// 1-based position of the failing step.
        index: usize,
        /// Description of the failing step.
        step: String,
        /// The underlying error.
        cause: Box<Error>,
    },

    /// An error raised while processing a config file.
    #[error("{inner} (in {})", path.display())]
    InFile {
        /// File being processed.
        path: PathBuf,
        /// The underlying error.
        inner: Box<Error>,
    },

    /// Download or extraction failed.
    #[error(transparent)]
    Fetch(#[from] fetchkit::Error),

    /// IO error during file operations.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        /// Path involved in the error.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a missing field error.
    pub fn missing(field: &str, context: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
            context: context.to_string(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid(field: &str, value: impl std::fmt::Display, context: &str) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            context: context.to_string(),
        }
    }

    /// Annotate this error with the config file being processed.
    ///
    /// An error already annotated with the same path is returned unchanged.
    #[must_use]
    pub fn in_file(self, path: &Path) -> Self {
        let already_named = match &self {
            Self::InFile { path: p, .. }
            | Self::ConfigNotFound { path: p }
            | Self::UnsupportedConfigFormat { path: p }
            | Self::ConfigParse { path: p, .. } => p == path,
            _ => false,
        };
        if already_named {
            self
        } else {
            Self::InFile {
                path: path.to_path_buf(),
                inner: Box::new(self),
            }
        }
    }

    /// Whether this error was raised while building from configuration.
    pub fn is_config_error(&self) -> bool {
        match self {
            Self::ConfigNotFound { .. }
            | Self::UnsupportedConfigFormat { .. }
            | Self::ConfigParse { .. }
            | Self::MissingField { .. }
            | Self::InvalidValue { .. }
            | Self::AmbiguousSelection { .. }
            | Self::NameNotFound { .. }
            | Self::CyclicReference { .. } => true,
            Self::InFile { inner, .. } => inner.is_config_error(),
            _ => false,
        }
    }

    /// The innermost error, skipping file and step annotations.
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::InFile { inner, .. } => inner.root_cause(),
            Self::StepFailed { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}
