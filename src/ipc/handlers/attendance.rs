use serde_json::json;

use crate::calc;
use crate::ipc::error::ok;
use crate::ipc::helpers::{dataset, resolve_selection, student_json};
use crate::ipc::types::{AppState, Request};

fn handle_monthly(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match dataset(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    ok(
        &req.id,
        json!({ "months": calc::monthly_attendance(&ds.attendance) }),
    )
}

fn handle_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match dataset(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let selection = match resolve_selection(ds, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let counts = selection
        .student
        .as_ref()
        .map(|s| calc::attendance_counts(&ds.attendance, &s.id))
        .unwrap_or(calc::AttendanceCounts {
            present_days: 0,
            absent_days: 0,
        });
    let total = counts.present_days + counts.absent_days;
    let rate = if total > 0 {
        Some(counts.present_days as f64 / total as f64)
    } else {
        None
    };
    ok(
        &req.id,
        json!({
            "student": student_json(&selection.student),
            "presentDays": counts.present_days,
            "absentDays": counts.absent_days,
            "attendanceRate": rate
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.monthly" => Some(handle_monthly(state, req)),
        "attendance.student" => Some(handle_student(state, req)),
        _ => None,
    }
}
