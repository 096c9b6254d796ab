#![cfg(all(unix, feature = "cli"))]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/txctl-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn txctl() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_txctl"));
    cmd.arg("--log-level").arg("error");
    cmd
}

#[test]
fn track_turns_samples_into_setone_lines() {
    let mut child = txctl()
        .args(["track", "--interval", "0ms"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("track command should start");

    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(b"0 -0.25 0.5 1\n0 0 0 1\n")
        .expect("samples should be writable");

    let output = child.wait_with_output().expect("track should finish");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "so 4 512\nso 5 -256\nso 4 0\nso 5 0\n"
    );
}

#[test]
fn track_rejects_malformed_samples() {
    let dir = unique_temp_dir("track-bad");
    let input = dir.join("samples.txt");
    std::fs::write(&input, "0 0 0 1\nnot a sample\n").expect("samples should be writable");

    let output = txctl()
        .args(["track", "--interval", "0ms", "--input"])
        .arg(&input)
        .output()
        .expect("track should run");

    assert_eq!(output.status.code(), Some(60));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "so 4 0\nso 5 0\n");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn monitor_decodes_capture_file() {
    let dir = unique_temp_dir("monitor");
    let capture = dir.join("capture.bin");
    // Leading noise, then (0, 64) and (3, 99).
    std::fs::write(&capture, [0x01, 0x02, 181, 0, 4, 64, 181, 3, 4, 99])
        .expect("capture should be writable");

    let output = txctl()
        .args(["--format", "json", "monitor"])
        .arg(&capture)
        .output()
        .expect("monitor should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let frames: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line should be json"))
        .collect();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["channel"], 0);
    assert_eq!(frames[0]["value"], 64);
    assert_eq!(frames[1]["channel"], 3);
    assert_eq!(frames[1]["value"], 99);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn monitor_honours_count() {
    let dir = unique_temp_dir("monitor-count");
    let capture = dir.join("capture.bin");
    std::fs::write(&capture, [181, 0, 4, 0, 181, 1, 4, 0, 181, 2, 4, 0])
        .expect("capture should be writable");

    let output = txctl()
        .args(["--format", "pretty", "monitor", "--count", "2"])
        .arg(&capture)
        .output()
        .expect("monitor should run");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 2);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn send_to_missing_device_fails_with_transport_code() {
    let output = txctl()
        .args(["send", "/dev/txctl-no-such-radio", "1", "64"])
        .output()
        .expect("send should run");

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("open failed"));
}

#[test]
fn send_rejects_out_of_range_channel_before_opening() {
    let output = txctl()
        .args(["send", "/dev/txctl-no-such-radio", "16", "0"])
        .output()
        .expect("send should run");

    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid channel"));
}

#[test]
fn repl_on_missing_device_fails() {
    let output = txctl()
        .args(["repl", "/dev/txctl-no-such-radio"])
        .stdin(Stdio::null())
        .output()
        .expect("repl should run");

    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn version_reports_protocol() {
    let output = txctl()
        .args(["version", "--extended"])
        .output()
        .expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("marker=181 offset=1024 modulus=2049 channels=16"));
    assert!(stdout.contains("default_baud: 115200"));
    assert!(!stdout.contains("target_os"));
}

#[test]
fn send_rejects_nan_before_opening() {
    let output = txctl()
        .args(["send", "/dev/txctl-no-such-radio", "0", "nan"])
        .output()
        .expect("send should run");

    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid value"));
}
