//! Process-level tests for the binaries' arguments, output and exit codes

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use otp_protocol::config::ServerConfig;
use otp_protocol::core::cipher;
use otp_protocol::{Role, Server};
use tempfile::TempDir;
use tokio::task::JoinHandle;

const KEYGEN: &str = env!("CARGO_BIN_EXE_keygen");
const ENC_CLIENT: &str = env!("CARGO_BIN_EXE_enc_client");
const DEC_CLIENT: &str = env!("CARGO_BIN_EXE_dec_client");
const ENC_SERVER: &str = env!("CARGO_BIN_EXE_enc_server");

fn run(bin: &str, args: &[&str]) -> Output {
    Command::new(bin)
        .args(args)
        .env_remove("OTP_PROTOCOL_CLIENT_HOST")
        .env_remove("OTP_PROTOCOL_MAX_MESSAGE_SIZE")
        .output()
        .expect("binary should start")
}

/// Run `bin` off the runtime so an in-process service can answer it.
async fn run_async(bin: &'static str, args: Vec<String>) -> Output {
    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run(bin, &args)
    })
    .await
    .unwrap()
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn start(role: Role) -> (u16, JoinHandle<otp_protocol::Result<()>>) {
    let config = ServerConfig {
        address: "127.0.0.1:0".to_string(),
        ..ServerConfig::default()
    };
    let server = Server::bind(role, &config).unwrap();
    let port = server.local_addr().unwrap().port();
    (port, tokio::spawn(server.run()))
}

fn unused_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

// ============================================================================
// KEYGEN
// ============================================================================

#[test]
fn test_keygen_prints_key_and_newline() {
    let out = run(KEYGEN, &["10"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(out.stdout.len(), 11);
    assert_eq!(out.stdout.last(), Some(&b'\n'));
    assert!(cipher::validate(&out.stdout[..10]).is_ok());
}

#[test]
fn test_keygen_argument_count_exits_one() {
    assert_eq!(run(KEYGEN, &[]).status.code(), Some(1));
    assert_eq!(run(KEYGEN, &["5", "6"]).status.code(), Some(1));
}

#[test]
fn test_keygen_bad_length_exits_two() {
    for length in ["abc", "-3", "0", "100001", "12x"] {
        let out = run(KEYGEN, &[length]);
        assert_eq!(out.status.code(), Some(2), "length {length:?}");
        assert!(out.stdout.is_empty());
    }
}

#[test]
fn test_keygen_accepts_maximum_length() {
    let out = run(KEYGEN, &["100000"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(out.stdout.len(), 100_001);
}

// ============================================================================
// SERVERS
// ============================================================================

#[test]
fn test_server_argument_errors_exit_one() {
    assert_eq!(run(ENC_SERVER, &[]).status.code(), Some(1));
    assert_eq!(run(ENC_SERVER, &["not-a-port"]).status.code(), Some(1));
    assert_eq!(run(ENC_SERVER, &["--help"]).status.code(), Some(0));
}

// ============================================================================
// CLIENTS
// ============================================================================

#[test]
fn test_client_argument_count_exits_one() {
    assert_eq!(run(ENC_CLIENT, &[]).status.code(), Some(1));
    assert_eq!(run(ENC_CLIENT, &["a", "b"]).status.code(), Some(1));
}

#[test]
fn test_client_connection_refused_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let text = write_file(&dir, "plaintext", "HELLO\n");
    let key = write_file(&dir, "key", "ABCDEFG\n");
    let port = unused_port().to_string();

    let out = run(ENC_CLIENT, &[&arg(&text), &arg(&key), &port]);
    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
}

#[test]
fn test_client_bad_input_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let text = write_file(&dir, "plaintext", "HELLO $WORLD\n");
    let key = write_file(&dir, "key", "ABCDEFGHIJKLMNOP\n");
    let missing = dir.path().join("missing");
    let port = unused_port().to_string();

    let out = run(ENC_CLIENT, &[&arg(&text), &arg(&key), &port]);
    assert_eq!(out.status.code(), Some(1));

    let out = run(ENC_CLIENT, &[&arg(&missing), &arg(&key), &port]);
    assert_eq!(out.status.code(), Some(1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_client_prints_result_and_exits_zero() {
    let (port, server) = start(Role::Encrypt);
    let dir = tempfile::tempdir().unwrap();
    let text = write_file(&dir, "plaintext", "HELLO WORLD\n");
    let key = write_file(&dir, "key", "XMCKLQWERTYZ ABC\n");

    let out = run_async(ENC_CLIENT, vec![arg(&text), arg(&key), port.to_string()]).await;
    assert_eq!(out.status.code(), Some(0));

    let mut expected = cipher::encrypt(b"HELLO WORLD", b"XMCKLQWERTYZ ABC").unwrap();
    expected.push(b'\n');
    assert_eq!(out.stdout, expected);
    server.abort();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_client_wrong_role_exits_one() {
    let (port, server) = start(Role::Encrypt);
    let dir = tempfile::tempdir().unwrap();
    let text = write_file(&dir, "ciphertext", "HELLO\n");
    let key = write_file(&dir, "key", "ABCDE\n");

    let out = run_async(DEC_CLIENT, vec![arg(&text), arg(&key), port.to_string()]).await;
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    server.abort();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_client_short_key_exits_one() {
    let (port, server) = start(Role::Encrypt);
    let dir = tempfile::tempdir().unwrap();
    let text = write_file(&dir, "plaintext", "HELLO\n");
    let key = write_file(&dir, "key", "ABCD\n");

    let out = run_async(ENC_CLIENT, vec![arg(&text), arg(&key), port.to_string()]).await;
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    server.abort();
}
