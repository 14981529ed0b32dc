use serde_json::json;

use crate::calc::{self, SummaryFilters};
use crate::data::{Dataset, SummaryRow};
use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

pub fn dataset<'a>(state: &'a AppState, req: &Request) -> Result<&'a Dataset, serde_json::Value> {
    state
        .data
        .as_ref()
        .ok_or_else(|| err(&req.id, "no_workspace", "select a workspace first", None))
}

pub fn parse_filters(req: &Request) -> Result<SummaryFilters, serde_json::Value> {
    calc::parse_summary_filters(req.params.get("filters"))
        .map_err(|e| err(&req.id, &e.code, e.message, e.details))
}

pub fn require_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::new("bad_params", format!("missing {}", key)))
}

pub fn optional_str(params: &serde_json::Value, key: &str) -> Result<Option<String>, HandlerErr> {
    match params.get(key) {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(v) => v
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| HandlerErr::new("bad_params", format!("{} must be a string", key))),
    }
}

pub fn optional_count(
    params: &serde_json::Value,
    key: &str,
    default: usize,
) -> Result<usize, HandlerErr> {
    match params.get(key) {
        None => Ok(default),
        Some(v) if v.is_null() => Ok(default),
        Some(v) => v
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| HandlerErr::new("bad_params", format!("{} must be a non-negative integer", key))),
    }
}

/// The common front half of every drill-down method: apply the sidebar
/// filters, then resolve the selected student against the filtered rows.
pub struct Selection {
    pub rows: Vec<SummaryRow>,
    pub student: Option<SummaryRow>,
}

pub fn resolve_selection(ds: &Dataset, req: &Request) -> Result<Selection, serde_json::Value> {
    let filters = parse_filters(req)?;
    let student_id = optional_str(&req.params, "studentId").map_err(|e| e.response(&req.id))?;
    let name = optional_str(&req.params, "name").map_err(|e| e.response(&req.id))?;
    let rows = calc::filter_summary(&ds.summary, &filters);
    let student =
        calc::resolve_student(&rows, student_id.as_deref(), name.as_deref()).cloned();
    Ok(Selection { rows, student })
}

/// Echoes the effective selection so the UI can pin its selector to it.
pub fn student_json(student: &Option<SummaryRow>) -> serde_json::Value {
    match student {
        Some(r) => json!({ "id": r.id, "name": r.name }),
        None => serde_json::Value::Null,
    }
}
