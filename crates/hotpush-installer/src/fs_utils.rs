use std::fs;
use std::io;
use std::path::Path;

use hotpush_core::UpdateError;

/// Removes the entry at `path` when one exists. Checked with
/// `symlink_metadata` so a symlink is removed itself, even when dangling.
pub fn remove_file_if_exists(path: &Path) -> Result<(), UpdateError> {
    match fs::symlink_metadata(path) {
        Ok(_) => fs::remove_file(path).map_err(|err| UpdateError::io(path, err)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(UpdateError::io(path, err)),
    }
}

pub fn remove_dir_if_exists(path: &Path) -> Result<(), UpdateError> {
    if path.exists() {
        fs::remove_dir_all(path).map_err(|err| UpdateError::io(path, err))?;
    }
    Ok(())
}

/// Recursively copies the contents of `src` into `dst`, overwriting files
/// that already exist at the same relative path. Symlinks are recreated,
/// not followed.
pub fn copy_dir_contents(src: &Path, dst: &Path) -> Result<(), UpdateError> {
    fs::create_dir_all(dst).map_err(|err| UpdateError::io(dst, err))?;
    for entry in fs::read_dir(src).map_err(|err| UpdateError::io(src, err))? {
        let entry = entry.map_err(|err| UpdateError::io(src, err))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        let metadata =
            fs::symlink_metadata(&src_path).map_err(|err| UpdateError::io(&src_path, err))?;

        if metadata.is_dir() {
            copy_dir_contents(&src_path, &dst_path)?;
            continue;
        }

        #[cfg(unix)]
        if metadata.file_type().is_symlink() {
            let target =
                fs::read_link(&src_path).map_err(|err| UpdateError::io(&src_path, err))?;
            remove_file_if_exists(&dst_path)?;
            std::os::unix::fs::symlink(&target, &dst_path)
                .map_err(|err| UpdateError::io(&dst_path, err))?;
            continue;
        }

        // An existing destination symlink must be replaced, not written
        // through.
        remove_file_if_exists(&dst_path)?;
        fs::copy(&src_path, &dst_path).map_err(|err| UpdateError::io(&dst_path, err))?;
    }
    Ok(())
}
