use std::io::{BufRead, BufReader, Write};
use std::process::{ChildStdin, ChildStdout, Command, Stdio};

use serde_json::{Value, json};
use tempfile::TempDir;

fn send(stdin: &mut ChildStdin, message: Value) {
    writeln!(stdin, "{}", message).expect("write request");
    stdin.flush().expect("flush request");
}

/// Read newline-delimited JSON-RPC messages until the reply with `id` arrives
fn reply(stdout: &mut BufReader<ChildStdout>, id: u64) -> Value {
    loop {
        let mut line = String::new();
        let read = stdout.read_line(&mut line).expect("read reply");
        assert!(read > 0, "server closed stdout before replying to {}", id);
        let message: Value = serde_json::from_str(line.trim()).expect("reply is JSON");
        if message["id"] == json!(id) {
            return message;
        }
    }
}

#[test]
fn serve_answers_mcp_requests_over_stdio() {
    let dir = TempDir::new().expect("create temp dir");
    std::fs::write(dir.path().join("biotools.toml"), "[binaries]\nsalmon = \"ls\"\n")
        .expect("write config");

    let mut child = Command::new(env!("CARGO_BIN_EXE_biotools"))
        .current_dir(dir.path())
        .arg("serve")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn biotools serve");
    let mut stdin = child.stdin.take().expect("child stdin");
    let mut stdout = BufReader::new(child.stdout.take().expect("child stdout"));

    send(
        &mut stdin,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": { "name": "e2e", "version": "0.1.0" }
            }
        }),
    );
    let init = reply(&mut stdout, 1);
    assert_eq!(init["result"]["serverInfo"]["name"], "biotools");

    send(
        &mut stdin,
        json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
    );

    send(
        &mut stdin,
        json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list", "params": {} }),
    );
    let list = reply(&mut stdout, 2);
    let mut names: Vec<&str> = list["result"]["tools"]
        .as_array()
        .expect("tools array")
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "create_salmon_index",
            "get_fastqc",
            "list_directory",
            "quantify_with_salmon",
            "read_file_lines",
        ]
    );

    send(
        &mut stdin,
        json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {
                "name": "create_salmon_index",
                "arguments": { "transcript_fasta": "missing.fa", "index_dir": "idx" }
            }
        }),
    );
    let call = reply(&mut stdout, 3);
    let text = call["result"]["content"][0]["text"]
        .as_str()
        .expect("text content");
    assert!(
        text.starts_with("Error creating Salmon index:"),
        "unexpected reply: {}",
        text
    );
    assert_ne!(call["result"]["isError"], json!(true));

    drop(stdin);
    let status = child.wait().expect("wait for server");
    assert!(status.success(), "server exited with {}", status);
}
