//! Settings endpoints, including the active-agent pointer.

use axum::extract::{Path, State};
use axum::Json;
use database::{agent, setting};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::Result;
use crate::state::AppState;

/// Body for writing a setting.
#[derive(Debug, Deserialize)]
pub struct SetSetting {
    pub value: String,
}

/// Body for repointing the active agent.
#[derive(Debug, Deserialize)]
pub struct SetActiveAgent {
    pub agent_id: i64,
}

pub async fn get_one(State(state): State<AppState>, Path(key): Path<String>) -> Result<Json<Value>> {
    let value = setting::get_setting(state.db.pool(), &key).await?;
    Ok(Json(json!({ "key": key, "value": value })))
}

pub async fn set_one(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<SetSetting>,
) -> Result<Json<Value>> {
    setting::set_setting(state.db.pool(), &key, &body.value).await?;
    Ok(Json(json!({ "key": key, "value": body.value })))
}

pub async fn remove(State(state): State<AppState>, Path(key): Path<String>) -> Result<Json<Value>> {
    setting::delete_setting(state.db.pool(), &key).await?;
    Ok(Json(json!({ "deleted": key })))
}

pub async fn get_active_agent(State(state): State<AppState>) -> Json<Value> {
    let agent_id = state.ledger().active_agent_id().await;
    Json(json!({ "agent_id": agent_id }))
}

pub async fn set_active_agent(
    State(state): State<AppState>,
    Json(body): Json<SetActiveAgent>,
) -> Result<Json<Value>> {
    // 404 for an agent that does not exist.
    agent::get_agent(state.db.pool(), body.agent_id).await?;
    state.ledger().set_active_agent_id(body.agent_id).await;
    Ok(Json(json!({ "agent_id": body.agent_id })))
}
