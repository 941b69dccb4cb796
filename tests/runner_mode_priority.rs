mod support;

use std::process::Command;

#[test]
fn test_quick_wins_over_coverage_in_dry_run_preview() {
    let td = tempfile::tempdir().expect("tmpdir");
    support::project_skeleton(td.path());

    let bin = env!("CARGO_BIN_EXE_ocs-test");
    let out = Command::new(bin)
        .args(["--quick", "--coverage", "--dry-run"])
        .current_dir(td.path())
        .env("OCS_DEV_PYTHON", "/fake/python")
        .output()
        .expect("failed to run ocs-test");

    assert!(
        out.status.success(),
        "dry-run exited non-zero: {:?}\nstderr:\n{}",
        out.status.code(),
        String::from_utf8_lossy(&out.stderr)
    );

    let err = String::from_utf8_lossy(&out.stderr);
    assert!(
        err.contains("Running quick unit tests"),
        "quick mode must be selected:\n{}",
        err
    );
    assert!(
        err.contains("unit or (not integration and not slow)"),
        "missing quick marker expression:\n{}",
        err
    );
    assert!(
        !err.contains("--cov"),
        "coverage fragments must not apply in quick mode:\n{}",
        err
    );
}

#[test]
fn test_integration_wins_over_coverage() {
    let td = tempfile::tempdir().expect("tmpdir");
    support::project_skeleton(td.path());

    let bin = env!("CARGO_BIN_EXE_ocs-test");
    let out = Command::new(bin)
        .args(["--integration", "--coverage", "--dry-run"])
        .current_dir(td.path())
        .env("OCS_DEV_PYTHON", "/fake/python")
        .output()
        .expect("failed to run ocs-test");

    assert!(out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(
        err.contains("Running integration tests"),
        "integration mode must be selected:\n{}",
        err
    );
    assert!(
        err.contains("-m pytest tests -m integration -v"),
        "missing integration invocation:\n{}",
        err
    );
    assert!(!err.contains("--cov"), "no coverage in integration mode:\n{}", err);
}
