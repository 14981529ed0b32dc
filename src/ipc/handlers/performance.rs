use serde_json::json;

use crate::calc;
use crate::ipc::error::ok;
use crate::ipc::helpers::{dataset, resolve_selection, student_json};
use crate::ipc::types::{AppState, Request};

fn handle_subjects(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match dataset(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    ok(
        &req.id,
        json!({ "subjects": calc::subject_mean_scores(&ds.scores) }),
    )
}

fn handle_subject_terms(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match dataset(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    ok(
        &req.id,
        json!({ "rows": calc::subject_term_mean_scores(&ds.scores) }),
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
    let scores: Vec<serde_json::Value> = selection
        .student
        .as_ref()
        .map(|s| calc::scores_for_student(&ds.scores, &s.id))
        .unwrap_or_default()
        .iter()
        .map(|r| json!({ "subject": r.subject, "term": r.term, "score": r.score }))
        .collect();
    ok(
        &req.id,
        json!({
            "student": student_json(&selection.student),
            "scores": scores
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "performance.subjects" => Some(handle_subjects(state, req)),
        "performance.subjectTerms" => Some(handle_subject_terms(state, req)),
        "performance.student" => Some(handle_student(state, req)),
        _ => None,
    }
}
