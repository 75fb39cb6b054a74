#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tasktrack-{nanos}-{file_name}"))
}

/// Runs one interactive session against `config_path` (which may not exist).
pub fn run_session_with(args: &[&str], config_path: &Path, input: &str) -> Output {
    let exe = env!("CARGO_BIN_EXE_tasktrack");

    let mut child = Command::new(exe)
        .args(args)
        .env("TASKTRACK_CONFIG_PATH", config_path)
        .env_remove("TASKTRACK_LOG")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn interactive session");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin
            .write_all(input.as_bytes())
            .expect("failed to write to stdin");
    }

    child
        .wait_with_output()
        .expect("failed to read interactive output")
}

pub fn run_session(input: &str) -> Output {
    let config_path = temp_path("absent-config.json");
    run_session_with(&[], &config_path, input)
}
