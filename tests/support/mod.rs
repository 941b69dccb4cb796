/*!
Test support helpers shared across integration tests.

- stub_tool()/stub_tool_logging(): fabricate executables for PATH-driven runs
- project_skeleton(): lay out a minimal OpenCodeSpace-style project tree
- EnvGuard: snapshot-and-clean the environment around a test
- path_with(): prepend a directory to the inherited PATH

Tests print their own "skipping: ..." lines; helpers stay silent.
*/

#![allow(dead_code)]

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Variables the guard removes before each test, mirroring the knobs the
/// binaries and the provisioning tool around them react to.
pub const CLEANUP_VARS: &[&str] = &[
    "PASSWORD",
    "GIT_REPO_URL",
    "SSH_PRIVATE_KEY",
    "GIT_USER_NAME",
    "GIT_USER_EMAIL",
    "VSCODE_EXTENSIONS",
    "CURSOR_EXTENSIONS",
    "VSCODE_SETTINGS",
    "CURSOR_SETTINGS",
    "SKIP_GIT_SETUP",
    "OCS_DEV_COLOR",
    "OCS_DEV_SKIP_LOCK",
    "OCS_DEV_PYTHON",
    "OCS_DEV_UV",
    "OCS_DEV_TEST_RUNNER",
];

/// Removes the cleanup set on construction and restores the original
/// values (set or unset) on drop.
pub struct EnvGuard {
    saved: Vec<(&'static str, Option<OsString>)>,
}

impl EnvGuard {
    pub fn clean() -> Self {
        let mut saved = Vec::with_capacity(CLEANUP_VARS.len());
        for var in CLEANUP_VARS {
            saved.push((*var, std::env::var_os(var)));
            std::env::remove_var(var);
        }
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (var, value) in self.saved.drain(..) {
            match value {
                Some(v) => std::env::set_var(var, v),
                None => std::env::remove_var(var),
            }
        }
    }
}

/// Write an executable stub that exits with the given code.
#[cfg(unix)]
pub fn stub_tool(dir: &Path, name: &str, exit_code: i32) -> PathBuf {
    write_stub(dir, name, &format!("#!/bin/sh\nexit {exit_code}\n"))
}

/// Write an executable stub that appends "<name> <args>" to a log file,
/// then exits with the given code. The log records invocation order.
#[cfg(unix)]
pub fn stub_tool_logging(dir: &Path, name: &str, log: &Path, exit_code: i32) -> PathBuf {
    write_stub(
        dir,
        name,
        &format!(
            "#!/bin/sh\necho \"{name} $*\" >> \"{}\"\nexit {exit_code}\n",
            log.display()
        ),
    )
}

#[cfg(unix)]
fn write_stub(dir: &Path, name: &str, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let p = dir.join(name);
    std::fs::write(&p, script).expect("write stub");
    let mut perm = std::fs::metadata(&p).expect("stub metadata").permissions();
    perm.set_mode(0o755);
    std::fs::set_permissions(&p, perm).expect("chmod stub");
    p
}

/// PATH value with `dir` prepended to the inherited search path.
pub fn path_with(dir: &Path) -> OsString {
    let mut parts = vec![dir.to_path_buf()];
    if let Some(path) = std::env::var_os("PATH") {
        parts.extend(std::env::split_paths(&path));
    }
    std::env::join_paths(parts).expect("join PATH")
}

/// Minimal project tree the binaries expect: requirements manifests plus a
/// tests/ directory with one test module and a conftest.
pub fn project_skeleton(root: &Path) {
    std::fs::create_dir_all(root.join("src").join("opencodespace")).expect("src tree");
    std::fs::create_dir_all(root.join("tests")).expect("tests dir");
    std::fs::write(root.join("requirements.txt"), "click>=8.0\n").expect("requirements");
    std::fs::write(
        root.join("tests").join("test_requirements.txt"),
        "pytest>=7.0\n",
    )
    .expect("test requirements");
    std::fs::write(
        root.join("tests").join("test_main.py"),
        "def test_placeholder():\n    assert True\n",
    )
    .expect("test module");
    std::fs::write(root.join("tests").join("conftest.py"), "# fixtures\n").expect("conftest");
}

/// Read the invocation log written by logging stubs (empty when absent).
pub fn read_log(log: &Path) -> String {
    std::fs::read_to_string(log).unwrap_or_default()
}
