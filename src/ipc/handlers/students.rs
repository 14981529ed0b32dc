use serde_json::json;

use crate::calc;
use crate::ipc::error::ok;
use crate::ipc::helpers::{dataset, parse_filters, resolve_selection, student_json};
use crate::ipc::types::{AppState, Request};

// Feeds the drill-down selectors: ids and display names of the students
// the current filters leave visible, in row order.
fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match dataset(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let filters = match parse_filters(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let rows = calc::filter_summary(&ds.summary, &filters);
    let students: Vec<serde_json::Value> = rows
        .iter()
        .map(|r| json!({ "id": r.id, "name": r.name }))
        .collect();
    ok(
        &req.id,
        json!({ "totalStudents": rows.len(), "students": students }),
    )
}

fn handle_profile(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match dataset(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let selection = match resolve_selection(ds, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let profile = selection
        .student
        .as_ref()
        .and_then(|s| ds.profiles.iter().find(|p| p.id == s.id));
    let profile_json = match profile {
        Some(p) => json!({
            "id": p.id,
            "name": p.name,
            "class": p.class,
            "section": p.section,
            "gender": p.gender
        }),
        None => serde_json::Value::Null,
    };
    ok(
        &req.id,
        json!({
            "student": student_json(&selection.student),
            "profile": profile_json
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_list(state, req)),
        "students.profile" => Some(handle_profile(state, req)),
        _ => None,
    }
}
