
use serde_json::json;
use test_support::{
    request, request_err, request_ok, spawn_sidecar, str_at, temp_dir, u64_at,
    write_workspace_fixtures,
};

fn select_err(dir: &std::path::Path) -> serde_json::Value {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    request(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": dir.to_string_lossy() }),
    )
}

fn error_message(resp: &serde_json::Value) -> String {
    assert_eq!(resp.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        resp.get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("load_failed")
    );
    resp.get("error")
        .and_then(|e| e.get("message"))
        .and_then(|v| v.as_str())
        .expect("message")
        .to_string()
}

#[test]
fn missing_source_file_fails_the_select() {
    let dir = temp_dir("classboardd-missing-file");
    write_workspace_fixtures(&dir);
    std::fs::remove_file(dir.join("student_attendance.csv")).expect("remove fixture");

    let msg = error_message(&select_err(&dir));
    assert!(msg.contains("student_attendance.csv"), "message: {msg}");
}

#[test]
fn unparseable_date_fails_with_file_context() {
    let dir = temp_dir("classboardd-bad-date");
    write_workspace_fixtures(&dir);
    std::fs::write(
        dir.join("student_remarks.csv"),
        "ID,Date,Remark\nS01,soon,Good\n",
    )
    .expect("write fixture");

    let msg = error_message(&select_err(&dir));
    assert!(msg.contains("student_remarks.csv"), "message: {msg}");
}

#[test]
fn unparseable_boolean_fails_the_select() {
    let dir = temp_dir("classboardd-bad-bool");
    write_workspace_fixtures(&dir);
    std::fs::write(
        dir.join("student_attendance.csv"),
        "ID,Date,Present\nS01,2025-01-10,maybe\n",
    )
    .expect("write fixture");

    let msg = error_message(&select_err(&dir));
    assert!(msg.contains("student_attendance.csv"), "message: {msg}");
}

#[test]
fn missing_required_column_fails_the_select() {
    let dir = temp_dir("classboardd-missing-column");
    write_workspace_fixtures(&dir);
    std::fs::write(
        dir.join("student_summary.csv"),
        "ID,Name,Class,Section,Avg_Score,Attendance_Rate,Submission_Rate\n\
         S01,Asha Verma,10,A,95.0,0.98,1.0\n",
    )
    .expect("write fixture");

    let msg = error_message(&select_err(&dir));
    assert!(msg.contains("student_summary.csv"), "message: {msg}");
}

#[test]
fn failed_select_keeps_the_previous_snapshot() {
    let good = temp_dir("classboardd-good");
    write_workspace_fixtures(&good);
    let bad = temp_dir("classboardd-bad");

    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": good.to_string_lossy() }),
    );

    let code = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "workspace.select",
        json!({ "path": bad.to_string_lossy() }),
    );
    assert_eq!(code, "load_failed");

    // The earlier snapshot still answers.
    let overview = request_ok(&mut stdin, &mut reader, "3", "summary.overview", json!({}));
    assert_eq!(u64_at(&overview, "totalStudents"), 10);
    let health = request_ok(&mut stdin, &mut reader, "4", "health", json!({}));
    assert_eq!(str_at(&health, "workspacePath"), good.to_string_lossy());
}
