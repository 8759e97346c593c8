//! Agent CRUD endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use database::agent::{self, NewAgent};
use database::document;
use database::models::{Agent, AgentDocument};
use serde::Deserialize;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Body for creating an agent. Only the name is required.
#[derive(Debug, Deserialize)]
pub struct CreateAgent {
    pub name: String,
    pub user_id: Option<i64>,
    pub prompt: Option<String>,
    pub first_sentence: Option<String>,
    pub voice: Option<String>,
    pub gender: Option<String>,
    pub max_call_duration_mins: Option<i64>,
    pub max_wait_secs: Option<i64>,
    pub company_info: Option<String>,
    pub email_after_call: Option<bool>,
    pub notification_email: Option<String>,
}

/// Body for updating an agent; unset fields keep their current value.
#[derive(Debug, Deserialize)]
pub struct UpdateAgent {
    pub name: Option<String>,
    pub prompt: Option<String>,
    pub first_sentence: Option<String>,
    pub voice: Option<String>,
    pub gender: Option<String>,
    pub max_call_duration_mins: Option<i64>,
    pub max_wait_secs: Option<i64>,
    pub company_info: Option<String>,
    pub email_after_call: Option<bool>,
    pub notification_email: Option<String>,
}

/// Body for adding a knowledge document.
#[derive(Debug, Deserialize)]
pub struct CreateDocument {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Restrict the listing to one owner's agents.
    pub user_id: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Agent>>> {
    let agents = match query.user_id {
        Some(user_id) => agent::list_agents_for_user(state.db.pool(), user_id).await?,
        None => agent::list_agents(state.db.pool()).await?,
    };
    Ok(Json(agents))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateAgent>,
) -> Result<Json<Agent>> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".into()));
    }
    let mut new = NewAgent::named(body.name.trim());
    new.user_id = body.user_id;
    if let Some(prompt) = body.prompt {
        new.prompt = prompt;
    }
    new.first_sentence = body.first_sentence;
    if let Some(voice) = body.voice {
        new.voice = voice;
    }
    if let Some(gender) = body.gender {
        new.gender = gender;
    }
    if let Some(mins) = body.max_call_duration_mins {
        new.max_call_duration_mins = mins;
    }
    if let Some(secs) = body.max_wait_secs {
        new.max_wait_secs = secs;
    }
    new.company_info = body.company_info;
    if let Some(flag) = body.email_after_call {
        new.email_after_call = flag;
    }
    new.notification_email = body.notification_email;

    Ok(Json(agent::create_agent(state.db.pool(), &new).await?))
}

pub async fn get_one(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Agent>> {
    Ok(Json(agent::get_agent(state.db.pool(), id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateAgent>,
) -> Result<Json<Agent>> {
    let mut current = agent::get_agent(state.db.pool(), id).await?;
    if let Some(name) = body.name {
        current.name = name;
    }
    if let Some(prompt) = body.prompt {
        current.prompt = prompt;
    }
    if let Some(first_sentence) = body.first_sentence {
        current.first_sentence = Some(first_sentence);
    }
    if let Some(voice) = body.voice {
        current.voice = voice;
    }
    if let Some(gender) = body.gender {
        current.gender = gender;
    }
    if let Some(mins) = body.max_call_duration_mins {
        current.max_call_duration_mins = mins;
    }
    if let Some(secs) = body.max_wait_secs {
        current.max_wait_secs = secs;
    }
    if let Some(company_info) = body.company_info {
        current.company_info = Some(company_info);
    }
    if let Some(flag) = body.email_after_call {
        current.email_after_call = flag;
    }
    if let Some(email) = body.notification_email {
        current.notification_email = Some(email);
    }

    agent::update_agent(state.db.pool(), &current).await?;
    Ok(Json(current))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<serde_json::Value>> {
    agent::delete_agent(state.db.pool(), id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

pub async fn list_documents(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<AgentDocument>>> {
    // 404 for a missing agent rather than an empty list.
    agent::get_agent(state.db.pool(), id).await?;
    Ok(Json(document::list_documents(state.db.pool(), id).await?))
}

pub async fn add_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<CreateDocument>,
) -> Result<Json<AgentDocument>> {
    agent::get_agent(state.db.pool(), id).await?;
    Ok(Json(
        document::add_document(state.db.pool(), id, &body.name, &body.content).await?,
    ))
}

pub async fn remove_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    document::delete_document(state.db.pool(), id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
