use crate::error::StagingError;
use gridstage_core::constants::archives;
use std::fs;
use std::io;
use std::path::Path;

/// Set a Unix permission mode. A no-op on other platforms, where the
/// separate test-executor user does not exist either.
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
pub fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

/// Unlink every `*.zip` directly under `dir`. Leftovers from a previous
/// final stage at the same path would otherwise end up inside the next
/// results archive.
pub fn purge_stale_archives(dir: &Path) -> Result<(), StagingError> {
    if !dir.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some(archives::ZIP_EXTENSION) {
            tracing::debug!("Removing stale archive {}", path.display());
            fs::remove_file(&path)?;
        }
    }

    Ok(())
}

/// Remove every top-level subdirectory of `dir`, keeping file entries.
/// Individual removal failures are logged and skipped so one stubborn
/// directory does not strand the finished archive.
pub fn prune_subdirectories(dir: &Path) -> Result<(), StagingError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if let Err(e) = fs::remove_dir_all(&path) {
                tracing::warn!("Failed to remove directory {}: {}", path.display(), e);
            }
        }
    }

    Ok(())
}
