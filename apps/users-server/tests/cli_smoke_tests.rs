//! CLI smoke tests for the users-server binary
//!
//! These tests verify that the CLI commands work correctly, including
//! configuration validation, help output, and a short live run.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Helper to run the users-server binary with given arguments
fn run_users_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_users-server"))
        .args(args)
        .env_remove("PORT")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute users-server")
}

/// Write a config whose home_dir lives inside `dir`.
fn write_config(dir: &TempDir, name: &str, body: &str) -> String {
    let path = dir.path().join(name);
    let home = dir.path().join("home");
    let content = format!(
        "server:\n  home_dir: \"{}\"\n  host: \"127.0.0.1\"\n  port: 3000\n{}",
        home.to_string_lossy().replace('\\', "/"),
        body
    );
    std::fs::write(&path, content).expect("Failed to write config file");
    path.to_string_lossy().to_string()
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .expect("Failed to reserve a port")
}

struct KillOnDrop(Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

/// Minimal HTTP/1.1 exchange; returns (status line, body).
fn http(port: u16, method: &str, path: &str, body: Option<&str>) -> std::io::Result<(String, String)> {
    let mut stream = TcpStream::connect(("127.0.0.1", port))?;
    stream.set_read_timeout(Some(Duration::from_secs(5)))?;
    let payload = body.unwrap_or("");
    write!(
        stream,
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{payload}",
        payload.len()
    )?;

    let mut reader = BufReader::new(stream);
    let mut status = String::new();
    reader.read_line(&mut status)?;
    let mut rest = String::new();
    reader.read_to_string(&mut rest)?;
    let body = rest.split("\r\n\r\n").nth(1).unwrap_or("").to_string();
    Ok((status.trim().to_string(), body))
}

fn wait_until_listening(port: u16, deadline: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if TcpStream::connect(("127.0.0.1", port)).is_ok() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    false
}

#[test]
fn test_cli_help_command() {
    let output = run_users_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("users-server"), "Should contain binary name");
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--mock"), "Should mention mock option");
}

#[test]
fn test_cli_version_command() {
    let output = run_users_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("users-server"), "Should contain binary name");
    assert!(stdout.contains("0.1.0"), "Should contain version number");
}

#[test]
fn test_cli_invalid_command() {
    let output = run_users_server(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error"),
        "Should contain error message about invalid command: {}",
        stderr
    );
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_users_server(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "Should fail with missing config");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Config file not found"),
        "Should mention config file issue: {}",
        stderr
    );
}

#[test]
fn test_cli_config_flag_short_form() {
    let output = run_users_server(&["-c", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "Should fail with missing config file");
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed")
        .expect("Failed to write file");

    let output = run_users_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");
}

#[test]
fn test_cli_config_validation_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        "valid.yaml",
        r#"
database:
  url: "sqlite://database/users.db"

logging:
  default:
    console_level: info
    file: "logs/users.log"
    file_level: info
    max_backups: 3
    max_size_mb: 100

modules:
  api_ingress:
    api_prefix: "/v1"
"#,
    );

    let output = run_users_server(&["--config", &config_path, "check"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        output.status.success(),
        "Should succeed with valid config. STDOUT: {stdout} STDERR: {stderr}"
    );
    assert!(stdout.contains("Configuration check passed"));
    assert!(stdout.contains("API prefix: /v1"));
    assert!(stdout.contains("database/users.db?mode=rwc"));
}

#[test]
fn test_cli_invalid_logging_section_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        "bad_logging.yaml",
        r#"
logging:
  level: "info"
"#,
    );

    let output = run_users_server(&["--config", &config_path, "check"]);
    assert!(!output.status.success(), "Malformed logging section should fail");
}

#[test]
fn test_cli_unsupported_database_fails_check() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        "mysql.yaml",
        r#"
database:
  url: "mysql://localhost/users"
"#,
    );

    let output = run_users_server(&["--config", &config_path, "check"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported database type"), "{stderr}");
}

#[test]
fn test_cli_mock_flag() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        "mock.yaml",
        r#"
database:
  url: "mysql://localhost/nonexistent"
"#,
    );

    // --mock replaces the configured database entirely
    let output = run_users_server(&["--config", &config_path, "--mock", "check"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "Should succeed with mock database even if the configured DB is unusable"
    );
    assert!(stdout.contains("Database: sqlite::memory:"));
}

#[test]
fn test_cli_print_config_applies_port_override() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&temp_dir, "print.yaml", "");

    let output = run_users_server(&["--config", &config_path, "--port", "8123", "--print-config"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port: 8123"), "{stdout}");
}

#[test]
fn test_cli_port_env_override() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&temp_dir, "env.yaml", "");

    let output = Command::new(env!("CARGO_BIN_EXE_users-server"))
        .args(["--config", &config_path, "--print-config"])
        .env("PORT", "4567")
        .output()
        .expect("Failed to execute users-server");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port: 4567"), "{stdout}");
}

#[test]
fn test_cli_subcommand_help() {
    let output = run_users_server(&["run", "--help"]);
    assert!(output.status.success(), "Run subcommand help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Start the server"));

    let output = run_users_server(&["check", "--help"]);
    assert!(output.status.success(), "Check subcommand help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Check configuration"));
}

#[test]
fn test_cli_run_serves_users_api_with_mock_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        "run.yaml",
        r#"
logging:
  default:
    console_level: "off"
    file: ""
"#,
    );
    let port = free_port();
    let port_arg = port.to_string();

    let child = Command::new(env!("CARGO_BIN_EXE_users-server"))
        .args(["--config", &config_path, "--port", &port_arg, "--mock", "run"])
        .env_remove("PORT")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to start users-server");
    let _guard = KillOnDrop(child);

    assert!(
        wait_until_listening(port, Duration::from_secs(15)),
        "Server should start listening"
    );

    let (status, body) = http(port, "GET", "/health", None).expect("health request");
    assert!(status.contains("200"), "{status}");
    assert!(body.contains("healthy"), "{body}");

    let (status, body) = http(
        port,
        "POST",
        "/api/users",
        Some(r#"{"name":"Al","email":"a@b.com"}"#),
    )
    .expect("create request");
    assert!(status.contains("201"), "{status}");
    assert!(body.contains("\"email\":\"a@b.com\""), "{body}");

    let (status, body) = http(port, "GET", "/api/users", None).expect("list request");
    assert!(status.contains("200"), "{status}");
    assert!(body.contains("\"name\":\"Al\""), "{body}");

    let (status, _) = http(port, "GET", "/api/users/abc", None).expect("get request");
    assert!(status.contains("400"), "{status}");
}
