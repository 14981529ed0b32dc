use serde_json::json;

use crate::calc;
use crate::data::{SummaryRow, SUMMARY_HEADERS};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{dataset, optional_count, parse_filters, require_str, HandlerErr};
use crate::ipc::types::{AppState, Request};

fn summary_row_json(r: &SummaryRow) -> serde_json::Value {
    json!({
        "id": r.id,
        "name": r.name,
        "class": r.class,
        "section": r.section,
        "gender": r.gender,
        "avgScore": r.avg_score,
        "attendanceRate": r.attendance_rate,
        "submissionRate": r.submission_rate
    })
}

fn performer_json(r: &SummaryRow) -> serde_json::Value {
    json!({
        "id": r.id,
        "name": r.name,
        "class": r.class,
        "section": r.section,
        "avgScore": r.avg_score
    })
}

fn handle_overview(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match dataset(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let filters = match parse_filters(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let rows = calc::filter_summary(&ds.summary, &filters);
    ok(&req.id, json!(calc::overview(&rows)))
}

fn handle_rows(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match dataset(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let filters = match parse_filters(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let rows = calc::filter_summary(&ds.summary, &filters);
    let rows_json: Vec<serde_json::Value> = rows.iter().map(summary_row_json).collect();
    ok(
        &req.id,
        json!({ "totalStudents": rows.len(), "rows": rows_json }),
    )
}

fn handle_performers(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match dataset(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let filters = match parse_filters(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let count = match optional_count(&req.params, "count", 5) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let rows = calc::filter_summary(&ds.summary, &filters);
    let top: Vec<serde_json::Value> = calc::top_performers(&rows, count)
        .iter()
        .map(performer_json)
        .collect();
    let bottom: Vec<serde_json::Value> = calc::bottom_performers(&rows, count)
        .iter()
        .map(performer_json)
        .collect();
    ok(&req.id, json!({ "top": top, "bottom": bottom }))
}

fn export_rows(rows: &[SummaryRow], out_path: &str) -> Result<(), HandlerErr> {
    // Header written by hand so an empty filtered table still exports the
    // source column layout.
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(out_path)
        .map_err(|e| HandlerErr::new("write_failed", e.to_string()))?;
    wtr.write_record(SUMMARY_HEADERS)
        .map_err(|e| HandlerErr::new("write_failed", e.to_string()))?;
    for row in rows {
        wtr.serialize(row)
            .map_err(|e| HandlerErr::new("write_failed", e.to_string()))?;
    }
    wtr.flush()
        .map_err(|e| HandlerErr::new("write_failed", e.to_string()))
}

// One-shot snapshot of the current filtered summary, same column layout
// as the source file.
fn handle_export(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ds = match dataset(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let filters = match parse_filters(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let out_path = match require_str(&req.params, "outPath") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let rows = calc::filter_summary(&ds.summary, &filters);
    if let Err(e) = export_rows(&rows, &out_path) {
        return e.response(&req.id);
    }
    ok(
        &req.id,
        json!({ "ok": true, "rowsExported": rows.len(), "path": out_path }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "summary.overview" => Some(handle_overview(state, req)),
        "summary.rows" => Some(handle_rows(state, req)),
        "summary.performers" => Some(handle_performers(state, req)),
        "summary.export" => Some(handle_export(state, req)),
        _ => None,
    }
}
