use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use crate::quotes;

fn handle_daily(req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "quote": quotes::daily_quote(),
            "userName": quotes::USER_NAME,
            "dreamCollege": quotes::DREAM_COLLEGE,
        }),
    )
}

pub fn try_handle(_state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "motivation.daily" => Some(handle_daily(req)),
        _ => None,
    }
}
