//! Filesystem helpers for the tracking clone.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;
use tracing::debug;

/// Recursively delete `path`, clearing restrictive permission bits if needed.
///
/// Git marks object files read-only, which makes a plain recursive delete
/// fail on some platforms, and a directory without write permission cannot
/// have its entries unlinked anywhere. If the first attempt fails, every
/// entry of the tree is made owner-writable and deletion is retried once.
///
/// A missing `path` is not an error.
pub fn force_remove_dir_all(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "removal failed, clearing permissions and retrying");
            make_writable(path)?;
            fs::remove_dir_all(path)
        }
    }
}

fn make_writable(path: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.file_type().is_symlink() {
        return Ok(());
    }

    let mut permissions = metadata.permissions();
    clear_readonly(&mut permissions, metadata.is_dir());
    fs::set_permissions(path, permissions)?;

    if metadata.is_dir() {
        for entry in fs::read_dir(path)? {
            make_writable(&entry?.path())?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn clear_readonly(permissions: &mut fs::Permissions, is_dir: bool) {
    use std::os::unix::fs::PermissionsExt;
    let owner_bits = if is_dir { 0o700 } else { 0o600 };
    permissions.set_mode(permissions.mode() | owner_bits);
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn clear_readonly(permissions: &mut fs::Permissions, _is_dir: bool) {
    permissions.set_readonly(false);
}
