use std::path::PathBuf;

use serde::Deserialize;

use crate::catalog::Catalog;
use crate::progress::ProgressSnapshot;
use crate::store::ProgressStore;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Everything a request handler can touch. The snapshot is the UI's working
/// copy; every mutating handler replaces it with whatever the store handed
/// back, so memory and storage never drift apart.
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub catalog: Catalog,
    pub store: Option<ProgressStore>,
    pub snapshot: Option<ProgressSnapshot>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            workspace: None,
            catalog: Catalog::builtin(),
            store: None,
            snapshot: None,
        }
    }
}
