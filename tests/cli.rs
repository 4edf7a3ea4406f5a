use std::io::Write;
use std::process::{Command, Output, Stdio};

fn kosinter() -> Command {
    Command::new(env!("CARGO_BIN_EXE_kosinter"))
}

fn with_stdin(args: &[&str], input: &[u8]) -> Output {
    kosinter()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .and_then(|mut child| {
            if let Some(ref mut stdin) = child.stdin {
                stdin.write_all(input).ok();
            }
            child.wait_with_output()
        })
        .expect("failed to execute")
}

#[test]
fn list_platforms_prints_registry() {
    let output = kosinter()
        .arg("--list-platforms")
        .output()
        .expect("failed to execute");
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 10, "stdout: {stdout}");
    assert!(lines[0].starts_with("instagram\tInstagram\t"), "stdout: {stdout}");
    assert!(
        lines
            .iter()
            .any(|l| *l == "github_gist\tGitHub Gist\thttps://gist.github.com/{username}"),
        "stdout: {stdout}"
    );
}

#[test]
fn unknown_platform_exits_with_code_2() {
    let output = kosinter()
        .args(["--platform", "github,myspace", "john_doe"])
        .output()
        .expect("failed to execute");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("unknown platform `myspace`"),
        "stderr: {stderr}"
    );
    assert!(stderr.contains("available platforms:"), "stderr: {stderr}");
}

#[test]
fn zero_timeout_is_rejected() {
    let output = kosinter()
        .args(["--timeout", "0", "john_doe"])
        .output()
        .expect("failed to execute");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn blank_usernames_exit_with_code_2() {
    let output = kosinter()
        .args(["  ", ""])
        .output()
        .expect("failed to execute");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no usernames provided"), "stderr: {stderr}");
}

#[test]
fn interactive_eof_exits_cleanly() {
    let output = with_stdin(&[], b"");
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Enter base username:"), "stdout: {stdout}");
    assert!(stdout.contains("Goodbye."), "stdout: {stdout}");
}

#[test]
fn interactive_empty_username_exits() {
    let output = with_stdin(&["--no-color"], b"\n");
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("No username entered. Exiting."),
        "stdout: {stdout}"
    );
    assert!(!stdout.contains('\u{1b}'), "no ANSI codes: {stdout}");
}

#[test]
fn interactive_quit_word_skips_scanning() {
    let output = with_stdin(&[], b"quit\n");
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("OSINT RESULTS"), "stdout: {stdout}");
    assert!(stdout.contains("Goodbye."), "stdout: {stdout}");
}

#[test]
fn json_mode_skips_banner() {
    let output = with_stdin(&["--json"], b"");
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("KOSINTER"), "stdout: {stdout}");
}

#[test]
#[ignore = "requires network access"]
fn one_shot_scan_prints_every_variant() {
    let output = kosinter()
        .args(["--platform", "github,gitlab", "--no-color", "john_doe"])
        .output()
        .expect("failed to execute");
    let stdout = String::from_utf8_lossy(&output.stdout);
    for variant in ["john_doe", "johndoe", "john.doe", "john-doe"] {
        assert!(
            stdout.contains(&format!("--- Username variant: {variant} ---")),
            "stdout: {stdout}"
        );
    }
    let probes = stdout
        .lines()
        .filter(|l| l.starts_with("[+] ") || l.starts_with("[-] ") || l.starts_with("[!] "))
        .count();
    assert_eq!(probes, 8, "stdout: {stdout}");
}
