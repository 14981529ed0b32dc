use std::path::PathBuf;

use serde::Deserialize;

use crate::data::Dataset;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Session state: the selected workspace and the dataset snapshot loaded
/// from it. There is no other state; every response is recomputed from the
/// snapshot.
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub data: Option<Dataset>,
}
