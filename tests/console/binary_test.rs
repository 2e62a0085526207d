//! Runs the built binary as a stdio console.

use std::io::Write;
use std::process::{Command, Stdio};

/// Runs `camconsole serve --stdio` with `input` and returns (exit code, stdout).
fn run_stdio(config: &str, input: &[u8]) -> (i32, Vec<u8>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("config.toml");
    std::fs::write(&config_path, config).expect("write config");

    let mut child = Command::new(env!("CARGO_BIN_EXE_camconsole"))
        .arg("--config")
        .arg(&config_path)
        .args(["serve", "--stdio"])
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to execute command");

    // The child may exit before reading stdin (e.g. bad config); a broken
    // pipe here is not a test failure.
    if let Err(e) = child.stdin.take().expect("stdin").write_all(input) {
        assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe, "write stdin: {e}");
    }
    let output = child.wait_with_output().expect("wait");
    (output.status.code().unwrap_or(-1), output.stdout)
}

#[test]
fn test_stdio_session() {
    let (code, stdout) = run_stdio("", b"help\rbogus\r");
    assert_eq!(code, 0);
    let text = String::from_utf8(stdout).unwrap();
    assert!(text.starts_with("List of commands:\r\n"));
    assert!(text.ends_with(
        "Invalid command, use the command \"help\" to get a list of commands.\r\n"
    ));
}

#[test]
fn test_stdio_uses_configured_camera() {
    let config = "[camera]\nresolution = \"qcif\"\nformat = \"grayscale\"\n";
    let (code, stdout) = run_stdio(config, b"getCameraSettings\r\n");
    assert_eq!(code, 0);
    let text = String::from_utf8(stdout).unwrap();
    assert!(text.contains("\tResolution: QCIF (176x144).\r\n"));
    assert!(text.contains("\tFormat: GRAYSCALE (1 byte per pixel).\r\n"));
}

#[test]
fn test_bad_config_exits_with_error() {
    let (code, stdout) = run_stdio("[console]\nline_width = 0\n", b"help\r");
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
}
