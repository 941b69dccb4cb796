/// Startup header for the build orchestrator.
pub fn print_build_banner() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!();
    eprintln!("────────────────────────────────────────────────────────────");
    eprintln!(" 🚀 OpenCodeSpace Build Script  v{}", version);
    eprintln!("────────────────────────────────────────────────────────────");

    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;
    let uv_disp = crate::uv_path()
        .ok()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not found)".to_string());
    let py_disp = crate::python_path()
        .ok()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not found)".to_string());

    eprintln!("    - Platform: {}/{}", os, arch);
    eprintln!("    - Tools: uv={} | python={}", uv_disp, py_disp);
    eprintln!("────────────────────────────────────────────────────────────");
    eprintln!();
}

/// Startup header for the test runner wrapper.
pub fn print_test_banner() {
    eprintln!("🧪 OpenCodeSpace Test Runner");
    eprintln!("{}", "=".repeat(50));
}
