use serde_json::json;

use crate::calc;
use crate::data;
use crate::ipc::error::ok;
use crate::ipc::helpers::{
    dataset, optional_count, optional_str, resolve_selection, student_json, HandlerErr,
};
use crate::ipc::types::{AppState, Request};

fn handle_completion(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match dataset(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    ok(
        &req.id,
        json!({ "subjects": calc::completion_by_subject(&ds.assignments) }),
    )
}

fn parse_as_of(params: &serde_json::Value) -> Result<chrono::NaiveDate, HandlerErr> {
    match optional_str(params, "asOf")? {
        Some(raw) => data::parse_date(&raw)
            .ok_or_else(|| HandlerErr::new("bad_params", format!("unparseable asOf: {raw}"))),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn handle_upcoming(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match dataset(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let as_of = match parse_as_of(&req.params) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let count = match optional_count(&req.params, "count", 10) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let upcoming: Vec<serde_json::Value> = calc::upcoming_deadlines(&ds.assignments, as_of, count)
        .iter()
        .map(|r| {
            json!({
                "id": r.id,
                "subject": r.subject,
                "deadline": r.deadline,
                "submitted": r.submitted,
                "marks": r.marks
            })
        })
        .collect();
    ok(
        &req.id,
        json!({ "asOf": as_of, "assignments": upcoming }),
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
    let (counts, marks) = match selection.student.as_ref() {
        Some(s) => (
            calc::submission_counts(&ds.assignments, &s.id),
            calc::submitted_marks(&ds.assignments, &s.id),
        ),
        None => (
            calc::SubmissionCounts {
                submitted: 0,
                not_submitted: 0,
            },
            Vec::new(),
        ),
    };
    ok(
        &req.id,
        json!({
            "student": student_json(&selection.student),
            "submittedCount": counts.submitted,
            "notSubmittedCount": counts.not_submitted,
            "submittedMarks": marks
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "assignments.completion" => Some(handle_completion(state, req)),
        "assignments.upcoming" => Some(handle_upcoming(state, req)),
        "assignments.student" => Some(handle_student(state, req)),
        _ => None,
    }
}
