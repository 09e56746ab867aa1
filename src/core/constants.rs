//! Constants used throughout quill.
//!
//! Centralizes file names, environment variables and cipher sizes.

/// Configuration file name (.quill.toml).
pub const CONFIG_FILE: &str = ".quill.toml";

/// Default encrypted journal path, relative to the repo root.
pub const DEFAULT_DATA_PATH: &str = "journal/entries.jsonl";

/// Default key file path, relative to the repo root.
pub const DEFAULT_KEY_PATH: &str = ".quill/key";

/// Default environment variable holding a base64 key.
pub const DEFAULT_KEY_ENV_VAR: &str = "QUILL_KEY";

/// Default label written into every record.
pub const DEFAULT_KEY_LABEL: &str = "primary";

/// Remote override for push.
pub const ENV_GIT_REMOTE: &str = "QUILL_GIT_REMOTE";

/// Branch override for push.
pub const ENV_GIT_BRANCH: &str = "QUILL_GIT_BRANCH";

/// Branch override for `quill sync`.
pub const ENV_SYNC_BRANCH: &str = "QUILL_SYNC_BRANCH";

/// Log filter environment variable.
pub const ENV_LOG: &str = "QUILL_LOG";

/// Current record schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Required permissions for key files (Unix).
pub const KEY_FILE_MODE: u32 = 0o600;
