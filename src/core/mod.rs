//! Core library components.
//!
//! Key resolution, encryption, the journal, the safety guard and the
//! pipeline that ties them together. Nothing here prints; the CLI layer
//! owns all terminal output.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod domain;
pub mod guard;
pub mod journal;
pub mod key;
pub mod pipeline;
pub mod vcs;
