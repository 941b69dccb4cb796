#![cfg(unix)]

mod support;

use std::process::Command;

#[test]
fn test_failing_install_stops_the_pipeline() {
    let td = tempfile::tempdir().expect("tmpdir");
    support::project_skeleton(td.path());

    let bindir = td.path().join("stub-bin");
    std::fs::create_dir_all(&bindir).expect("stub dir");
    let log = td.path().join("invocations.log");

    // uv fails on its first invocation; everything later must never run
    let uv = support::stub_tool_logging(&bindir, "uv", &log, 1);
    let runner = support::stub_tool_logging(&bindir, "ocs-test", &log, 0);
    let python = support::stub_tool_logging(&bindir, "python", &log, 0);
    support::stub_tool_logging(&bindir, "flake8", &log, 0);
    support::stub_tool_logging(&bindir, "black", &log, 0);

    let bin = env!("CARGO_BIN_EXE_ocs-build");
    let out = Command::new(bin)
        .arg("all")
        .current_dir(td.path())
        .env("OCS_DEV_SKIP_LOCK", "1")
        .env("OCS_DEV_UV", &uv)
        .env("OCS_DEV_TEST_RUNNER", &runner)
        .env("OCS_DEV_PYTHON", &python)
        .env("PATH", support::path_with(&bindir))
        .output()
        .expect("failed to run ocs-build all");

    assert_eq!(out.status.code(), Some(1), "pipeline failure must exit 1");

    let err = String::from_utf8_lossy(&out.stderr);
    assert!(
        err.contains("Build pipeline failed at: Installing dependencies"),
        "missing failing-step report:\n{}",
        err
    );

    let logged = support::read_log(&log);
    assert!(logged.contains("uv "), "uv was invoked:\n{logged}");
    assert!(
        !logged.contains("ocs-test"),
        "test step must not run after install failure:\n{logged}"
    );
    assert!(
        !logged.contains("flake8"),
        "lint step must not run after install failure:\n{logged}"
    );
    assert!(
        !logged.contains("python -m build"),
        "build step must not run after install failure:\n{logged}"
    );
}
