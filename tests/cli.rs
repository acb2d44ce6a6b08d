use std::{io::Write, process::Command};

use tempfile::NamedTempFile;

fn measurements(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn onebrc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_onebrc"))
}

#[test]
fn summarizes_file() {
    let file = measurements("A;1.0\nA;2.0\nB;-1.5\n");
    for threads in ["1", "2", "8"] {
        let output = onebrc()
            .arg(file.path())
            .args(["--threads", threads])
            .output()
            .unwrap();
        assert!(output.status.success(), "exit status {:?}", output.status);
        assert_eq!(
            "{A=1.0/1.5/2.0, B=-1.5/-1.5/-1.5}\n",
            String::from_utf8_lossy(&output.stdout),
            "threads: {threads}"
        );
    }
}

#[test]
fn threads_from_env() {
    let file = measurements("x;-0.1\ny;0.1\nx;0.3\n");
    let output = onebrc()
        .arg(file.path())
        .env("ONEBRC_THREADS", "3")
        .env("ONEBRC_TABLE_CAPACITY", "2")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        "{x=-0.1/0.1/0.3, y=0.1/0.1/0.1}\n",
        String::from_utf8_lossy(&output.stdout)
    );
}

#[test]
fn empty_file() {
    let file = measurements("");
    let output = onebrc().arg(file.path()).output().unwrap();
    assert!(output.status.success());
    assert_eq!("{}\n", String::from_utf8_lossy(&output.stdout));
}

#[test]
fn reads_stdin() {
    use std::process::Stdio;

    let mut child = onebrc()
        .arg("-")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"b;5.0\na;-5.0\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        "{a=-5.0/-5.0/-5.0, b=5.0/5.0/5.0}\n",
        String::from_utf8_lossy(&output.stdout)
    );
}

#[test]
fn missing_file_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = onebrc()
        .arg(dir.path().join("nope.txt"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty(), "partial output on failure");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error opening file"), "stderr: {stderr}");
}

#[test]
fn malformed_input_fails_without_output() {
    let file = measurements("a;1.0\nno delimiter here\n");
    let output = onebrc()
        .arg(file.path())
        .args(["--threads", "1"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty(), "partial output on failure");
}

#[test]
fn out_of_range_config_is_rejected() {
    let file = measurements("a;1.0\n");
    for (flag, value) in [
        ("--threads", "0"),
        ("--threads", "18446744073709551615"),
        ("--table-capacity", "1"),
        ("--table-capacity", "18446744073709551615"),
    ] {
        let output = onebrc()
            .arg(file.path())
            .args([flag, value])
            .output()
            .unwrap();
        assert!(!output.status.success(), "{flag} {value} was accepted");
        assert!(output.stdout.is_empty(), "{flag} {value} produced output");
    }

    let output = onebrc()
        .arg(file.path())
        .env("ONEBRC_TABLE_CAPACITY", "18446744073709551615")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
