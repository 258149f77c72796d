use std::process::Command;

#[test]
fn tui_mode_starts_and_exits_cleanly() {
    let binary_path = env!("CARGO_BIN_EXE_lesson-console");

    let output = Command::new(binary_path)
        .args(["tui", "--pace", "0"])
        .env("LESSON_CONSOLE_TUI_TEST_EXIT_AFTER_TICKS", "2")
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to start lesson-console binary");

    assert!(
        output.status.success(),
        "Process exited with non-zero status: {}\nStderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
}
