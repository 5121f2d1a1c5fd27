pub mod account;
pub mod admin;
pub mod market;
pub mod portfolio;
pub mod positions;
pub mod wallet;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();
    Json(json!({
        "status": if database { "ok" } else { "degraded" },
        "database": database,
    }))
}
