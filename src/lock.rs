use fs2::FileExt;
use std::env;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Repository/user-scoped lock guard that removes the lock file on drop.
#[derive(Debug)]
pub struct RepoLock {
    file: File,
    path: PathBuf,
}

impl Drop for RepoLock {
    fn drop(&mut self) {
        // Best-effort unlock; ignore errors
        let _ = self.file.unlock();

        // Try removal with brief retries (avoid background threads to keep tests leak-free)
        let path = self.path.clone();
        for _ in 0..10 {
            if !path.exists() {
                break;
            }
            if fs::remove_file(&path).is_ok() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(100));
        }
    }
}

/// Acquire a non-blocking exclusive lock using default candidate lock paths.
pub fn acquire_lock() -> io::Result<RepoLock> {
    let paths = candidate_lock_paths();
    let mut last_err: Option<io::Error> = None;

    for p in paths {
        // Best effort to ensure parent exists
        if let Some(parent) = p.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(&p)
        {
            Ok(f) => match f.try_lock_exclusive() {
                Ok(_) => {
                    return Ok(RepoLock {
                        file: f,
                        path: p.clone(),
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    return Err(io::Error::other(crate::display_for_step_error(
                        &crate::StepError::Message(
                            "Another build pipeline is already running (lock held). Please try again later.".to_string(),
                        ),
                    )));
                }
                Err(e) => {
                    last_err = Some(e);
                    continue;
                }
            },
            Err(e) => {
                last_err = Some(e);
                continue;
            }
        }
    }

    let mut msg = String::from("Failed to create lock file in any candidate location: ");
    msg.push_str(
        &candidate_lock_paths()
            .into_iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    );
    if let Some(e) = last_err {
        msg.push_str(&format!(" (last error: {e})"));
    }
    Err(io::Error::other(crate::display_for_step_error(
        &crate::StepError::Message(msg),
    )))
}

/// Acquire a lock at a specific path (helper for tests).
pub fn acquire_lock_at(p: &Path) -> io::Result<RepoLock> {
    if let Some(parent) = p.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(true)
        .open(p)
    {
        Ok(f) => match f.try_lock_exclusive() {
            Ok(_) => Ok(RepoLock {
                file: f,
                path: p.to_path_buf(),
            }),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                Err(io::Error::other(crate::display_for_step_error(
                    &crate::StepError::Message(
                        "Another build pipeline is already running (lock held). Please try again later.".to_string(),
                    ),
                )))
            }
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    }
}

/// Return true if the orchestrator should acquire a repository/user lock for this process.
/// Honor OCS_DEV_SKIP_LOCK=1 to skip acquiring any lock (used by nested invocations and tests).
pub fn should_acquire_lock() -> bool {
    env::var("OCS_DEV_SKIP_LOCK").ok().as_deref() != Some("1")
}

/// Candidate lock file locations.
/// - If inside a Git repository:
///   1) <repo_root>/.ocs-dev.lock
///   2) <xdg_runtime>/ocs-dev.<hash(repo_root)>.lock
///   3) /tmp/ocs-dev.lock
/// - Otherwise, ordered fallbacks:
///   HOME/.ocs-dev.lock, XDG_RUNTIME_DIR/ocs-dev.lock, /tmp/ocs-dev.lock, CWD/.ocs-dev.lock
pub fn candidate_lock_paths() -> Vec<PathBuf> {
    // Capture the current working directory immediately to avoid races with other tests
    // that may call set_current_dir() in parallel.
    let initial_cwd = env::current_dir().ok();

    if let Some(root) = crate::repo_root() {
        let mut paths = Vec::new();
        // Preferred: in-repo lock (if writable, acquire will succeed)
        paths.push(root.join(".ocs-dev.lock"));
        // Secondary: runtime-scoped hashed lock path
        let rt_base = env::var("XDG_RUNTIME_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);
        let key = normalized_repo_key_for_hash(&root);
        let hash = hash_repo_key_hex(&key);
        paths.push(rt_base.join(format!("ocs-dev.{}.lock", hash)));
        // Tertiary fallback: always include a tmp-scoped lock path for robustness and tests
        paths.push(PathBuf::from("/tmp/ocs-dev.lock"));
        return paths;
    }

    // Not inside a Git repository
    let mut paths = Vec::new();
    if let Some(home) = home::home_dir() {
        paths.push(home.join(".ocs-dev.lock"));
    }
    if let Ok(rt) = env::var("XDG_RUNTIME_DIR") {
        if !rt.is_empty() {
            paths.push(PathBuf::from(rt).join("ocs-dev.lock"));
        }
    }
    paths.push(PathBuf::from("/tmp/ocs-dev.lock"));
    if let Some(cwd) = initial_cwd.clone().or_else(|| env::current_dir().ok()) {
        paths.push(cwd.join(".ocs-dev.lock"));
    }
    paths
}

/// Normalize a repository path string for hashing to a stable key.
pub fn normalized_repo_key_for_hash(p: &Path) -> String {
    let abs = fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf());
    abs.to_string_lossy().to_string()
}

/// Simple stable 64-bit FNV-1a hash for strings; returns 16-hex lowercase id.
pub fn hash_repo_key_hex(s: &str) -> String {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 1099511628211;
    let mut h: u64 = FNV_OFFSET;
    for b in s.as_bytes() {
        h ^= *b as u64;
        h = h.wrapping_mul(FNV_PRIME);
    }
    format!("{:016x}", h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_repo_key_hex_is_stable() {
        let a = hash_repo_key_hex("/work/opencodespace");
        let b = hash_repo_key_hex("/work/opencodespace");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert_ne!(a, hash_repo_key_hex("/work/other"));
    }

    #[test]
    fn test_should_acquire_lock_env() {
        // Default: acquire
        std::env::remove_var("OCS_DEV_SKIP_LOCK");
        assert!(should_acquire_lock(), "should acquire lock by default");
        // Skip when set to "1"
        std::env::set_var("OCS_DEV_SKIP_LOCK", "1");
        assert!(
            !should_acquire_lock(),
            "should not acquire lock when OCS_DEV_SKIP_LOCK=1"
        );
        std::env::remove_var("OCS_DEV_SKIP_LOCK");
    }

    #[test]
    fn test_acquire_lock_at_conflict() {
        let td = tempfile::tempdir().expect("tmpdir");
        let p = td.path().join("pipeline.lock");
        let first = acquire_lock_at(&p).expect("first lock");
        let second = acquire_lock_at(&p);
        assert!(second.is_err(), "second lock should be refused");
        drop(first);
        // After release the path is removed and can be re-acquired
        let third = acquire_lock_at(&p).expect("re-acquire after drop");
        drop(third);
        assert!(!p.exists(), "lock file removed on drop");
    }
}
