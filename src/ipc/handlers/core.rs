use serde_json::json;
use std::path::PathBuf;

use crate::data;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    // A failed load keeps whatever snapshot was selected before.
    match data::load_dataset(&path) {
        Ok(dataset) => {
            let rows_loaded = json!({
                "profiles": dataset.profiles.len(),
                "assignments": dataset.assignments.len(),
                "attendance": dataset.attendance.len(),
                "remarks": dataset.remarks.len(),
                "scores": dataset.scores.len(),
                "summary": dataset.summary.len(),
            });
            state.workspace = Some(path.clone());
            state.data = Some(dataset);
            ok(
                &req.id,
                json!({
                    "workspacePath": path.to_string_lossy(),
                    "rowsLoaded": rows_loaded
                }),
            )
        }
        Err(e) => err(&req.id, "load_failed", format!("{e:#}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}
