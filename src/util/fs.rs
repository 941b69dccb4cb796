use std::io;
use std::path::Path;

/// Remove a file or directory tree. Missing targets are not an error.
pub fn remove_path(p: &Path) -> io::Result<bool> {
    match p.symlink_metadata() {
        Ok(meta) => {
            if meta.is_dir() {
                std::fs::remove_dir_all(p)?;
            } else {
                std::fs::remove_file(p)?;
            }
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
