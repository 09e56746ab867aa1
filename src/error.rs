//! Error types for quill.
//!
//! One enum per concern, wrapped by [`Error`]. Messages never contain key
//! material or entry plaintext.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::pipeline::Stage;

/// Exit code for any ordinary abort.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code when the safety guard blocks the run.
pub const EXIT_BLOCKED: i32 = 3;

/// Exit code when the record was stored but stage/commit/push failed.
pub const EXIT_HISTORY: i32 = 4;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error(transparent)]
    Vcs(#[from] VcsError),

    #[error(transparent)]
    Entry(#[from] EntryError),

    /// The pipeline stopped at `stage`.
    #[error("{stage} failed: {source}")]
    Aborted {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap an error with the pipeline stage it stopped.
    pub fn at(stage: Stage, source: impl Into<Error>) -> Self {
        Self::Aborted {
            stage,
            source: Box::new(source.into()),
        }
    }

    /// The innermost error, looking through stage wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Self::Aborted { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this error is a guard block.
    pub fn is_blocked(&self) -> bool {
        matches!(self.root(), Self::Guard(GuardError::Blocked { .. }))
    }

    /// Process exit code for this error.
    ///
    /// Version-control failures count as history failures unless they
    /// stopped a stage before the record was written.
    pub fn exit_code(&self) -> i32 {
        if self.is_blocked() {
            return EXIT_BLOCKED;
        }
        match self {
            Self::Aborted { stage, .. } if stage.is_history() => EXIT_HISTORY,
            Self::Aborted { .. } => EXIT_FAILURE,
            Self::Vcs(_) => EXIT_HISTORY,
            _ => EXIT_FAILURE,
        }
    }
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to parse .quill.toml: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Key resolution and key file errors.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("no encryption key found (checked: {checked})")]
    NotFound { checked: String },

    #[error("malformed key from {source_name}: {reason}")]
    Format { source_name: String, reason: String },

    #[error("failed to read key file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write key file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("key file already exists: {0}")]
    AlreadyExists(PathBuf),
}

/// Cipher errors.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("authentication failed: wrong key, wrong nonce, or tampered ciphertext")]
    Authentication,

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("nonce must be {expected} bytes, got {actual}")]
    InvalidNonce { expected: usize, actual: usize },

    #[error("invalid base64 in {field}: {reason}")]
    Decode { field: &'static str, reason: String },

    #[error("decrypted entry is not valid UTF-8")]
    Utf8,
}

/// Record store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("journal io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to lock journal {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("corrupt record at {path}:{line}: {reason}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

/// Safety guard errors.
#[derive(Error, Debug)]
pub enum GuardError {
    #[error("{path} is tracked by version control: {reason}")]
    Blocked { path: String, reason: String },
}

/// Version-control errors.
#[derive(Error, Debug)]
pub enum VcsError {
    #[error("git is not installed")]
    NotInstalled,

    #[error("failed to run git {step}: {source}")]
    Spawn {
        step: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("git {step} failed: {detail}")]
    CommandFailed { step: &'static str, detail: String },
}

/// Entry input errors.
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("no entry text provided")]
    Empty,

    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("failed to read entry from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
