use std::path::Path;

/// Copy the deployed binary aside so a failed deploy can be undone.
///
/// Best-effort: a missing binary (first deploy) or a failed write is logged and
/// otherwise ignored. Returns whether a backup was written.
pub async fn save(binary: &Path, backup: &Path) -> bool {
    let contents = match tokio::fs::read(binary).await {
        Ok(contents) => contents,
        Err(e) => {
            tracing::debug!(binary = %binary.display(), error = %e, "no binary to back up");
            return false;
        }
    };
    if let Err(e) = tokio::fs::write(backup, contents).await {
        tracing::warn!(backup = %backup.display(), error = %e, "failed to write backup");
        return false;
    }
    set_executable(backup).await;
    true
}

/// Move the backup over the deployed binary. Best-effort, like [`save`].
pub async fn restore(binary: &Path, backup: &Path) -> bool {
    match tokio::fs::rename(backup, binary).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(backup = %backup.display(), error = %e, "failed to restore backup");
            false
        }
    }
}

#[cfg(unix)]
async fn set_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let perms = std::fs::Permissions::from_mode(0o755);
    if let Err(e) = tokio::fs::set_permissions(path, perms).await {
        tracing::debug!(path = %path.display(), error = %e, "could not mark backup executable");
    }
}

#[cfg(not(unix))]
async fn set_executable(_path: &Path) {}
