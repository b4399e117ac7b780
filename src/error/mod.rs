// dzmod: DayZ Mod Workflow Helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                DzError (~24 bytes)
//!                       |
//!   +-------+------+----+----+------+------+--------+
//!   |       |      |         |      |      |        |
//!   v       v      v         v      v      v        v
//! Bail    Cfg    Proc       Fs   Build   Link   Io/Other
//!         Box    Box        Box   Box    Box    Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Config  ParseError, MissingKey, InvalidValue
//!   Process SpawnFailed, NonZeroExit, Timeout
//!   Fs      NotFound, PermissionDenied, IoError
//!   Build   ToolNotFound, OutputDir, ToolFailed, ArtifactMissing
//!   Link    Create, Remove, MissingDirectory
//!
//! Taxonomy used when reporting per-item failures:
//!   NotFound / IoFailure / ExternalToolFailure / ConfigurationMismatch
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`DzError`].
pub type DzResult<T> = std::result::Result<T, DzError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum DzError {
    /// Fatal error that should terminate the application.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// Build pipeline error.
    #[error("build error: {0}")]
    Build(#[from] Box<BuildError>),

    /// Link (junction/symlink) error.
    #[error("link error: {0}")]
    Link(#[from] Box<LinkError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

/// Create a fatal [`DzError::Bailed`] that terminates the application.
pub fn bail_out(message: impl Into<String>) -> DzError {
    DzError::Bailed(message.into().into_boxed_str())
}

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for DzError {
                fn from(err: $error) -> Self {
                    DzError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConfigError => Config,
    ProcessError => Process,
    FsError => Fs,
    BuildError => Build,
    LinkError => Link,
    std::io::Error => Io,
}

/// Coarse classification of a per-item failure.
///
/// Aggregate operations (scan-all, build-all, toggle-all) report these per
/// item and keep going; none of them aborts the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A tool, artifact or configured directory is missing.
    NotFound,
    /// A read/stat/write/link operation failed.
    IoFailure,
    /// An external executable exited unsuccessfully.
    ExternalToolFailure,
    /// Paths disagree with configuration. Warning only.
    ConfigurationMismatch,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::IoFailure => write!(f, "i/o failure"),
            Self::ExternalToolFailure => write!(f, "external tool failure"),
            Self::ConfigurationMismatch => write!(f, "configuration mismatch"),
        }
    }
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// Process timed out.
    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),

    /// Permission denied.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Wraps an I/O error, mapping the common kinds onto dedicated variants.
    #[must_use]
    pub fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        let path = path.display().to_string();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::IoError { path, source },
        }
    }
}

// --- Build Errors ---

/// Build pipeline errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Packaging or signing tool could not be located.
    #[error("{tool} not found (checked config, registry, PATH and common install locations)")]
    ToolNotFound { tool: String },

    /// Output directory could not be created.
    #[error("failed to create output directory '{path}': {source}")]
    OutputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Tool exited unsuccessfully.
    #[error("{tool} exited with code {code}")]
    ToolFailed { tool: String, code: i32 },

    /// Built artifact is not where it was predicted to be.
    #[error("artifact not found at '{path}'")]
    ArtifactMissing { path: String },
}

impl BuildError {
    /// Returns the taxonomy bucket for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ToolNotFound { .. } | Self::ArtifactMissing { .. } => ErrorKind::NotFound,
            Self::OutputDir { .. } => ErrorKind::IoFailure,
            Self::ToolFailed { .. } => ErrorKind::ExternalToolFailure,
        }
    }
}

// --- Link Errors ---

/// Junction/symlink errors.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Creating the link failed.
    #[error("failed to link '{link}' -> '{target}': {source}")]
    Create {
        link: String,
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// Removing the link failed, including the forced fallback.
    #[error("failed to remove '{link}': {source}")]
    Remove {
        link: String,
        #[source]
        source: std::io::Error,
    },

    /// Target directory for the link does not exist.
    #[error("target directory not found: {0}")]
    MissingDirectory(String),
}

impl LinkError {
    /// Returns the taxonomy bucket for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingDirectory(_) => ErrorKind::NotFound,
            Self::Create { .. } | Self::Remove { .. } => ErrorKind::IoFailure,
        }
    }
}
