use serde_json::json;

use crate::calc;
use crate::ipc::error::ok;
use crate::ipc::helpers::{dataset, resolve_selection, student_json};
use crate::ipc::types::{AppState, Request};

fn handle_categories(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match dataset(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    ok(
        &req.id,
        json!({ "categories": calc::remark_category_counts(&ds.remarks) }),
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
    let remarks: Vec<serde_json::Value> = selection
        .student
        .as_ref()
        .map(|s| calc::remarks_for_student(&ds.remarks, &s.id))
        .unwrap_or_default()
        .iter()
        .map(|r| json!({ "date": r.date, "remark": r.remark }))
        .collect();
    ok(
        &req.id,
        json!({
            "student": student_json(&selection.student),
            "remarks": remarks
        }),
    )
}

fn handle_trend(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match dataset(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let selection = match resolve_selection(ds, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let points = selection
        .student
        .as_ref()
        .map(|s| calc::remark_trend(&calc::remarks_for_student(&ds.remarks, &s.id)))
        .unwrap_or_default();
    ok(
        &req.id,
        json!({
            "student": student_json(&selection.student),
            "points": points
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "remarks.categories" => Some(handle_categories(state, req)),
        "remarks.student" => Some(handle_student(state, req)),
        "remarks.trend" => Some(handle_trend(state, req)),
        _ => None,
    }
}
