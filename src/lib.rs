//! Quill - an encrypted, append-only journal kept in git.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── init          # Create config and key file
//! │   ├── write         # Encrypt and append an entry
//! │   ├── read          # Decrypt and print entries
//! │   ├── verify        # Authenticate every record
//! │   ├── commit        # Retry stage/commit/push
//! │   ├── sync          # Fast-forward from the remote
//! │   ├── status        # Paths, key source, guard verdict
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # .quill.toml management
//!     ├── key/          # Key type and key sources (env, file)
//!     ├── cipher/       # Cipher trait and AES-256-GCM
//!     ├── domain/       # Entry and record types
//!     ├── journal/      # Append-only JSON-lines store
//!     ├── guard         # Keeps secrets out of version control
//!     ├── vcs/          # Vcs trait and git CLI backend
//!     └── pipeline      # Guard, encrypt, append, commit
//! ```
//!
//! # Features
//!
//! - AES-256-GCM with a fresh random nonce per entry
//! - Crash-safe appends under an exclusive file lock
//! - Refuses to run while the key file is tracked by git
//! - Commit and push failures never lose an entry

pub mod cli;
pub mod core;
pub mod error;
