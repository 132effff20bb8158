use serde_json::json;

use crate::calc;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::progress::{ChapterKey, Flag, FlagEdit};
use crate::sync;

fn handle_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(snapshot) = state.snapshot.as_ref() else {
        return err(&req.id, "no_workspace", "open a workspace first", None);
    };
    let Some(class) = req.params.get("class").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing params.class", None);
    };
    let Some(subject) = req.params.get("subject").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing params.subject", None);
    };

    match calc::subject_rows(snapshot, &state.catalog, class, subject) {
        Ok(rows) => ok(
            &req.id,
            json!({ "class": class, "subject": subject, "rows": rows }),
        ),
        Err(e) => err(&req.id, "not_found", e.to_string(), None),
    }
}

/// One render cycle's batch of checkbox toggles. The whole batch is
/// validated, reconciled and persisted (at most once) in one go.
fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(items) = req.params.get("edits").and_then(|v| v.as_array()) else {
        return err(&req.id, "bad_params", "missing params.edits", None);
    };

    let mut edits: Vec<FlagEdit> = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let class = item.get("class").and_then(|v| v.as_str());
        let subject = item.get("subject").and_then(|v| v.as_str());
        let chapter = item.get("chapter").and_then(|v| v.as_str());
        let flag_raw = item.get("flag").and_then(|v| v.as_str());
        let value = item.get("value").and_then(|v| v.as_bool());

        let (Some(class), Some(subject), Some(chapter), Some(flag_raw), Some(value)) =
            (class, subject, chapter, flag_raw, value)
        else {
            return err(
                &req.id,
                "bad_params",
                "each edit needs class, subject, chapter, flag, value",
                Some(json!({ "index": i })),
            );
        };
        let Some(flag) = Flag::parse(flag_raw) else {
            return err(
                &req.id,
                "bad_params",
                "flag must be one of: revision, mcq, pyq",
                Some(json!({ "index": i, "flag": flag_raw })),
            );
        };

        let key = ChapterKey::new(class, subject, chapter);
        if !state.catalog.contains(&key) {
            return err(
                &req.id,
                "unknown_chapter",
                format!("not in the catalog: {key}"),
                Some(json!({ "index": i })),
            );
        }
        edits.push(FlagEdit { key, flag, value });
    }

    let Some(store) = state.store.as_mut() else {
        return err(&req.id, "no_workspace", "open a workspace first", None);
    };
    let Some(snapshot) = state.snapshot.as_ref() else {
        return err(&req.id, "no_workspace", "open a workspace first", None);
    };

    match sync::reconcile(store, &state.catalog, snapshot, &edits) {
        Ok((next, changed)) => {
            let summary = calc::overall_summary(&next);
            state.snapshot = Some(next);
            ok(&req.id, json!({ "changed": changed, "summary": summary }))
        }
        Err(e) => err(&req.id, "store_save_failed", format!("{e:?}"), None),
    }
}

fn handle_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(snapshot) = state.snapshot.as_ref() else {
        return err(&req.id, "no_workspace", "open a workspace first", None);
    };
    ok(&req.id, json!({ "summary": calc::overall_summary(snapshot) }))
}

/// "Clear all progress": rebuild every record at its default and persist.
fn handle_reset(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_mut() else {
        return err(&req.id, "no_workspace", "open a workspace first", None);
    };
    match store.reset(&state.catalog) {
        Ok(snapshot) => {
            let summary = calc::overall_summary(&snapshot);
            state.snapshot = Some(snapshot);
            ok(&req.id, json!({ "summary": summary }))
        }
        Err(e) => err(&req.id, "store_save_failed", format!("{e:?}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "progress.open" => Some(handle_open(state, req)),
        "progress.update" => Some(handle_update(state, req)),
        "progress.summary" => Some(handle_summary(state, req)),
        "progress.reset" => Some(handle_reset(state, req)),
        _ => None,
    }
}
