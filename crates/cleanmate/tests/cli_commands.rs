#![cfg(feature = "cli")]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Command, Output};
use std::thread::{self, JoinHandle};

use bytes::BytesMut;
use cleanmate_frame::{build_packet, parse_header, HEADER_SIZE};
use serde_json::{json, Value};

/// Accepts one connection, hands each request to `reply` and writes back
/// whatever it returns. Returns every request value it saw.
fn fake_device<F>(exchanges: usize, reply: F) -> (u16, JoinHandle<Vec<Value>>)
where
    F: Fn(&Value) -> Option<Value> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let port = listener.local_addr().expect("listener has address").port();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("device should accept");
        let mut seen = Vec::new();
        for _ in 0..exchanges {
            let request = read_request(&mut stream);
            if let Some(response) = reply(&request) {
                write_response(&mut stream, &response);
            }
            seen.push(request);
        }
        seen
    });

    (port, handle)
}

fn read_request(stream: &mut TcpStream) -> Value {
    let mut header = [0u8; HEADER_SIZE];
    stream.read_exact(&mut header).expect("request header");
    let len = parse_header(&header).expect("valid request header");
    let mut payload = vec![0u8; len];
    stream.read_exact(&mut payload).expect("request payload");
    serde_json::from_slice(&payload).expect("request payload is json")
}

fn write_response(stream: &mut TcpStream, value: &Value) {
    let mut buf = BytesMut::new();
    build_packet(value.to_string().as_bytes(), &mut buf).expect("response packet");
    // Dribble the response out to exercise reassembly on the client side.
    for piece in buf.chunks(5) {
        stream.write_all(piece).expect("response write");
        stream.flush().expect("response flush");
    }
}

fn status_document() -> Value {
    json!({
        "version": "1.0",
        "value": {
            "battery": "91",
            "version": "1.7.0",
            "workMode": "9",
            "workState": "5",
            "waterTank": "60"
        }
    })
}

fn cleanmate(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cleanmate"))
        .args(["--log-level", "error", "--format", "json"])
        .args(args)
        .env_remove("CLEANMATE_AUTH_CODE")
        .env_remove("CLEANMATE_LOG")
        .output()
        .expect("cleanmate should run")
}

#[test]
fn status_prints_device_state() {
    let (port, device) = fake_device(1, |_| Some(status_document()));
    let port = port.to_string();

    let output = cleanmate(&[
        "status",
        "127.0.0.1",
        "--port",
        &port,
        "--auth-code",
        "AUTH123",
        "--timeout",
        "5s",
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: Value = serde_json::from_slice(&output.stdout).expect("stdout is json");
    assert_eq!(report["command"], json!("status"));
    assert_eq!(report["state"]["battery_level"], json!(91));
    assert_eq!(report["state"]["work_mode"], json!("silent"));
    assert_eq!(report["state"]["work_state"], json!("charging"));
    assert_eq!(report["state"]["mop_mode"], json!("low"));

    let requests = device.join().expect("device thread");
    assert_eq!(
        requests[0],
        json!({
            "version": "1.0",
            "control": {"authCode": "AUTH123"},
            "value": {"state": "", "transitCmd": "98"}
        })
    );
}

#[test]
fn auth_code_can_come_from_environment() {
    let (port, device) = fake_device(1, |_| Some(status_document()));
    let port = port.to_string();

    let output = Command::new(env!("CARGO_BIN_EXE_cleanmate"))
        .args(["--log-level", "error", "--format", "json"])
        .args(["find", "127.0.0.1", "--port", &port, "--timeout", "5s"])
        .env("CLEANMATE_AUTH_CODE", "FROM_ENV")
        .output()
        .expect("cleanmate should run");
    assert!(output.status.success());

    let requests = device.join().expect("device thread");
    assert_eq!(requests[0]["control"]["authCode"], json!("FROM_ENV"));
    assert_eq!(requests[0]["value"]["transitCmd"], json!("143"));
}

#[test]
fn send_no_wait_does_not_read_response() {
    let (port, device) = fake_device(1, |_| None);
    let port = port.to_string();

    let output = cleanmate(&[
        "send",
        "127.0.0.1",
        "--port",
        &port,
        "--auth-code",
        "k",
        "--json",
        r#"{"charge":"1","transitCmd":"104"}"#,
        "--no-wait",
    ]);
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).expect("stdout is json");
    assert_eq!(report["command"], json!("send"));
    assert!(report.get("response").is_none());

    let requests = device.join().expect("device thread");
    assert_eq!(requests[0]["value"], json!({"charge": "1", "transitCmd": "104"}));
}

#[test]
fn unexpected_response_exits_with_protocol_error() {
    let (port, device) = fake_device(1, |_| Some(json!("busy")));
    let port = port.to_string();

    let output = cleanmate(&[
        "pause",
        "127.0.0.1",
        "--port",
        &port,
        "--auth-code",
        "k",
        "--timeout",
        "5s",
    ]);
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("pause failed"));

    device.join().expect("device thread");
}

#[test]
fn refused_connection_exits_with_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let port = listener.local_addr().expect("listener has address").port();
    drop(listener);
    let port = port.to_string();

    let output = cleanmate(&["status", "127.0.0.1", "--port", &port, "--auth-code", "k"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("connect failed"));
}

#[test]
fn invalid_json_is_a_usage_error() {
    let output = cleanmate(&[
        "send",
        "127.0.0.1",
        "--auth-code",
        "k",
        "--json",
        "not-json",
    ]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_prints_package_version() {
    let output = cleanmate(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("cleanmate "));
}
