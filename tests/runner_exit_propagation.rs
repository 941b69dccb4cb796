#![cfg(unix)]

mod support;

use std::process::Command;

#[test]
fn test_pytest_exit_code_is_propagated() {
    let td = tempfile::tempdir().expect("tmpdir");
    support::project_skeleton(td.path());

    let bindir = td.path().join("stub-bin");
    std::fs::create_dir_all(&bindir).expect("stub dir");
    // Stands in for the interpreter; pytest reports "some tests failed" as 1,
    // usage errors as 4 -- any non-zero code must pass through unchanged.
    let python = support::stub_tool(&bindir, "python", 5);

    let bin = env!("CARGO_BIN_EXE_ocs-test");
    let out = Command::new(bin)
        .current_dir(td.path())
        .env("OCS_DEV_PYTHON", &python)
        .output()
        .expect("failed to run ocs-test");

    assert_eq!(
        out.status.code(),
        Some(5),
        "wrapper must propagate the test framework's exit code\nstderr:\n{}",
        String::from_utf8_lossy(&out.stderr)
    );
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(
        err.contains("Command failed with exit code 5"),
        "missing failure report:\n{}",
        err
    );
}

#[test]
fn test_successful_run_exits_zero_with_summary() {
    let td = tempfile::tempdir().expect("tmpdir");
    support::project_skeleton(td.path());

    let bindir = td.path().join("stub-bin");
    std::fs::create_dir_all(&bindir).expect("stub dir");
    let log = td.path().join("invocations.log");
    let python = support::stub_tool_logging(&bindir, "python", &log, 0);

    let bin = env!("CARGO_BIN_EXE_ocs-test");
    let out = Command::new(bin)
        .args(["--markers", "unit", "--parallel", "4"])
        .current_dir(td.path())
        .env("OCS_DEV_PYTHON", &python)
        .output()
        .expect("failed to run ocs-test");

    assert_eq!(
        out.status.code(),
        Some(0),
        "stderr:\n{}",
        String::from_utf8_lossy(&out.stderr)
    );
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(
        err.contains("Tests completed successfully!"),
        "missing summary:\n{}",
        err
    );
    let logged = support::read_log(&log);
    assert!(
        logged.contains("python -m pytest tests -n 4 -m unit"),
        "unexpected invocation:\n{logged}"
    );
}

#[test]
fn test_missing_interpreter_maps_to_127() {
    let td = tempfile::tempdir().expect("tmpdir");
    support::project_skeleton(td.path());

    let bin = env!("CARGO_BIN_EXE_ocs-test");
    let out = Command::new(bin)
        .current_dir(td.path())
        .env("OCS_DEV_PYTHON", td.path().join("no-such-python"))
        .output()
        .expect("failed to run ocs-test");

    assert_eq!(
        out.status.code(),
        Some(127),
        "missing interpreter must map to 127\nstderr:\n{}",
        String::from_utf8_lossy(&out.stderr)
    );
}
