use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_dreamtrackd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn dreamtrackd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn completed_tasks(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
) -> u64 {
    let summary = request_ok(stdin, reader, id, "progress.summary", json!({}));
    summary
        .get("summary")
        .and_then(|s| s.get("completedTasks"))
        .and_then(|v| v.as_u64())
        .expect("completedTasks")
}

#[test]
fn garbage_file_loads_as_fresh_defaults() {
    let workspace = temp_dir("dreamtrack-recovery-garbage");
    std::fs::write(workspace.join("progress.json"), "definitely { not json")
        .expect("write garbage");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    assert_eq!(completed_tasks(&mut stdin, &mut reader, "2"), 0);
    drop(stdin);
    let _ = child.wait();

    // The overwrite is durable: a fresh session parses the file cleanly.
    let text = std::fs::read_to_string(workspace.join("progress.json")).expect("read back");
    let payload: serde_json::Value = serde_json::from_str(&text).expect("regenerated payload");
    assert_eq!(
        payload.get("schema").and_then(|v| v.as_str()),
        Some("dream-tracker/1")
    );
    assert_eq!(
        payload.get("rows").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(104)
    );

    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn obsolete_payload_shape_loads_as_fresh_defaults() {
    let workspace = temp_dir("dreamtrack-recovery-obsolete");
    // A well-formed file from some earlier life of the tracker, missing the
    // structural key this schema expects.
    std::fs::write(
        workspace.join("progress.json"),
        r#"{"Chapters":{"Motion":{"Revision":true}}}"#,
    )
    .expect("write obsolete payload");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    assert_eq!(completed_tasks(&mut stdin, &mut reader, "2"), 0);
    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

fn seed_partial_payload(workspace: &std::path::Path) {
    // One still-valid chapter with progress, one chapter the syllabus no
    // longer contains. Far fewer rows than the catalog expects.
    let payload = json!({
        "schema": "dream-tracker/1",
        "savedAt": "2025-01-01T00:00:00Z",
        "rows": [
            { "class": "Class 9 (Foundation)", "subject": "Physics", "chapter": "Motion",
              "revision": true, "mcq": true, "pyq": false },
            { "class": "Class 9 (Foundation)", "subject": "Physics", "chapter": "Retired Chapter",
              "revision": true, "mcq": true, "pyq": true }
        ]
    });
    std::fs::write(
        workspace.join("progress.json"),
        serde_json::to_string_pretty(&payload).expect("serialize seed"),
    )
    .expect("write seed payload");
}

#[test]
fn key_set_mismatch_resets_by_default() {
    let workspace = temp_dir("dreamtrack-recovery-mismatch");
    seed_partial_payload(&workspace);

    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    assert_eq!(completed_tasks(&mut stdin, &mut reader, "2"), 0);
    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn key_set_mismatch_with_carry_over_keeps_matching_rows() {
    let workspace = temp_dir("dreamtrack-recovery-carry");
    seed_partial_payload(&workspace);

    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy(), "carryOver": true }),
    );
    // Motion's two finished tasks survive; the retired chapter is gone.
    assert_eq!(completed_tasks(&mut stdin, &mut reader, "2"), 2);

    let opened = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "progress.open",
        json!({ "class": "Class 9 (Foundation)", "subject": "Physics" }),
    );
    let rows = opened.get("rows").and_then(|v| v.as_array()).expect("rows");
    let motion = rows
        .iter()
        .find(|r| r.get("chapter").and_then(|v| v.as_str()) == Some("Motion"))
        .expect("motion row");
    assert_eq!(motion.get("revision").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(motion.get("mcq").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(motion.get("pyq").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(motion.get("percent").and_then(|v| v.as_u64()), Some(67));
    drop(stdin);
    let _ = child.wait();

    // The rebuilt snapshot was persisted with the full catalog's rows.
    let text = std::fs::read_to_string(workspace.join("progress.json")).expect("read back");
    let payload: serde_json::Value = serde_json::from_str(&text).expect("rebuilt payload");
    assert_eq!(
        payload.get("rows").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(104)
    );

    let _ = std::fs::remove_dir_all(workspace);
}
