use std::path::PathBuf;

use serde_json::json;

use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::store::{JsonFileBackend, ProgressBackend, ProgressStore, SheetBackend};

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

/// Opens a workspace: picks the persistence backend, loads (or rebuilds) the
/// snapshot, and makes it the daemon's working copy.
fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };
    let backend_kind = req
        .params
        .get("backend")
        .and_then(|v| v.as_str())
        .unwrap_or("json");
    let carry_over = req
        .params
        .get("carryOver")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    let backend: Box<dyn ProgressBackend> = match backend_kind {
        "json" => match JsonFileBackend::open(&path) {
            Ok(b) => Box::new(b),
            Err(e) => return err(&req.id, "backend_open_failed", format!("{e:?}"), None),
        },
        "sheet" => match db::open_sheet(&path) {
            Ok(conn) => Box::new(SheetBackend::new(conn)),
            Err(e) => return err(&req.id, "db_open_failed", format!("{e:?}"), None),
        },
        other => {
            return err(
                &req.id,
                "bad_params",
                "backend must be one of: json, sheet",
                Some(json!({ "backend": other })),
            )
        }
    };

    let mut store = ProgressStore::new(backend, carry_over);
    match store.load(&state.catalog) {
        Ok(snapshot) => {
            state.workspace = Some(path.clone());
            state.store = Some(store);
            state.snapshot = Some(snapshot);
            ok(
                &req.id,
                json!({
                    "workspacePath": path.to_string_lossy(),
                    "backend": backend_kind,
                    "chapterCount": state.catalog.chapter_count()
                }),
            )
        }
        Err(e) => err(&req.id, "store_load_failed", format!("{e:?}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}
