//! Dashboard overview statistics.

use axum::extract::State;
use axum::Json;
use database::{agent, call, user};
use serde_json::{json, Value};

use crate::error::Result;
use crate::state::AppState;

/// Headline numbers for the dashboard landing page.
pub async fn stats(State(state): State<AppState>) -> Result<Json<Value>> {
    let agents = agent::count_agents(state.db.pool()).await?;
    let users = user::list_users(state.db.pool()).await?.len();
    let recent_calls = call::list_calls(state.db.pool(), 100).await?;
    let active_agent_id = state.ledger().active_agent_id().await;

    Ok(Json(json!({
        "agents": agents,
        "users": users,
        "recent_calls": recent_calls.len(),
        "active_agent_id": active_agent_id,
    })))
}
