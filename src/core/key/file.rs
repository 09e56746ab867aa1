//! Key file source.
//!
//! A key file holds `base64(32 bytes)` plus a trailing newline and should
//! be readable by its owner only.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, warn};
use zeroize::Zeroize;

use super::Key;
use crate::error::{KeyError, Result};

/// Read a key from `path`. A missing file is absent, not an error.
pub(super) fn load(path: &Path) -> Result<Option<Key>> {
    if !path.is_file() {
        return Ok(None);
    }
    debug!(path = %path.display(), "loading key file");

    #[cfg(unix)]
    warn_on_loose_permissions(path);

    let mut contents = fs::read_to_string(path).map_err(|source| KeyError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Err(KeyError::Format {
            source_name: path.display().to_string(),
            reason: "key file is empty".to_string(),
        }
        .into());
    }

    let key = Key::from_base64(&contents, &path.display().to_string());
    contents.zeroize();
    key.map(Some)
}

/// Generate a new key and write it to `path` with mode 0600.
///
/// Never overwrites an existing file.
///
/// # Errors
///
/// Returns `KeyError::AlreadyExists` if `path` exists, or `KeyError::Write`
/// if the directory or file cannot be created.
pub fn create_key_file(path: &Path) -> Result<Key> {
    if path.exists() {
        return Err(KeyError::AlreadyExists(path.to_path_buf()).into());
    }
    debug!(path = %path.display(), "generating key file");

    let write_err = |source| KeyError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let key = Key::generate();
    let mut encoded = key.to_base64();
    encoded.push('\n');

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(crate::core::constants::KEY_FILE_MODE);
    }

    let result = options
        .open(path)
        .and_then(|mut file| {
            file.write_all(encoded.as_bytes())?;
            file.sync_all()
        })
        .map_err(write_err);
    encoded.zeroize();
    result?;

    Ok(key)
}

#[cfg(unix)]
fn warn_on_loose_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let expected = crate::core::constants::KEY_FILE_MODE;
    if let Ok(metadata) = fs::metadata(path) {
        let mode = metadata.permissions().mode() & 0o777;
        if mode != expected {
            warn!(
                path = %path.display(),
                mode = %format!("{:o}", mode),
                "insecure key file permissions"
            );
        }
    }
}
