use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};

fn handle_classes(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "classes": state.catalog.classes() }))
}

fn handle_subjects(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(class) = req.params.get("class").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing params.class", None);
    };
    match state.catalog.subjects(class) {
        Ok(subjects) => ok(&req.id, json!({ "class": class, "subjects": subjects })),
        Err(e) => err(&req.id, "not_found", e.to_string(), None),
    }
}

fn handle_chapters(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(class) = req.params.get("class").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing params.class", None);
    };
    let Some(subject) = req.params.get("subject").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing params.subject", None);
    };
    match state.catalog.chapters(class, subject) {
        Ok(chapters) => ok(
            &req.id,
            json!({ "class": class, "subject": subject, "chapters": chapters }),
        ),
        Err(e) => err(&req.id, "not_found", e.to_string(), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "catalog.classes" => Some(handle_classes(state, req)),
        "catalog.subjects" => Some(handle_subjects(state, req)),
        "catalog.chapters" => Some(handle_chapters(state, req)),
        _ => None,
    }
}
