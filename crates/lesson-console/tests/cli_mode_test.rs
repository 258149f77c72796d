use std::process::Command;

fn binary() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_lesson-console"));
    command.env("RUST_LOG", "error");
    command
}

#[test]
fn list_prints_every_lesson() {
    let output = binary()
        .arg("list")
        .output()
        .expect("Failed to start lesson-console binary");

    assert!(output.status.success(), "status: {}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    for id in ["basics", "arrays", "objects"] {
        assert!(stdout.contains(id), "missing {id} in:\n{stdout}");
    }
}

#[test]
fn run_plays_lesson_to_completion() {
    let output = binary()
        .args(["run", "--lesson", "arrays", "--pace", "0"])
        .output()
        .expect("Failed to start lesson-console binary");

    assert!(
        output.status.success(),
        "Process exited with non-zero status: {}\nStdout: {}\nStderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("PRACTICAL TASKS: ARRAYS AND LOOPS"));
    assert!(stdout.contains("Result: [2, 4, 6]"));
    assert!(
        stdout
            .lines()
            .last()
            .is_some_and(|line| line.contains("All 5 tasks completed successfully"))
    );
}

#[test]
fn run_json_emits_one_object_per_entry() {
    let output = binary()
        .args(["run", "--lesson", "objects", "--pace", "0", "--format", "json"])
        .output()
        .expect("Failed to start lesson-console binary");
    assert!(output.status.success(), "status: {}", output.status);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let entries: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is a JSON object"))
        .collect();

    assert!(!entries.is_empty());
    for (index, entry) in entries.iter().enumerate() {
        assert_eq!(entry["sequence_index"], index as u64);
    }
    assert!(entries.iter().any(|entry| entry["kind"] == "group-header"));
    assert_eq!(entries.last().unwrap()["severity"], "success");
}

#[test]
fn unknown_lesson_fails() {
    let output = binary()
        .args(["run", "--lesson", "calculus", "--pace", "0"])
        .output()
        .expect("Failed to start lesson-console binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown lesson: calculus"), "stderr: {stderr}");
}

#[test]
fn config_file_and_env_override_are_layered() {
    let path = std::env::temp_dir().join(format!(
        "lesson-console-cli-{}.yaml",
        std::process::id()
    ));
    std::fs::write(&path, "lesson: arrays\npacing:\n  scale: 0.0\n").unwrap();

    let output = binary()
        .arg("run")
        .arg("--config")
        .arg(&path)
        .env("LESSON_CONSOLE__LESSON", "objects")
        .output()
        .expect("Failed to start lesson-console binary");
    std::fs::remove_file(&path).ok();

    assert!(output.status.success(), "status: {}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("PRACTICAL TASKS: OBJECTS AND RECORDS"));
    assert!(!stdout.contains("PRACTICAL TASKS: ARRAYS AND LOOPS"));
}

#[test]
fn sample_config_runs_instantly_with_pace_flag() {
    let config_path = format!("{}/demos/sample.yaml", env!("CARGO_MANIFEST_DIR"));

    let output = binary()
        .args(["run", "--pace", "0", "--config"])
        .arg(config_path)
        .output()
        .expect("Failed to start lesson-console binary");

    assert!(output.status.success(), "status: {}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("GROUP 1: BASIC VARIABLE OPERATIONS"));
    assert!(stdout.lines().any(|line| line == "=".repeat(72)));
}
