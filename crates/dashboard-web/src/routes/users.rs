//! User CRUD and billing endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use database::models::{Transaction, User};
use database::{transaction, user};
use serde::Deserialize;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Option<String>,
    pub assigned_agent_id: Option<i64>,
    pub plan: Option<String>,
}

/// Body for updating a user; unset fields keep their current value.
#[derive(Debug, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub role: Option<String>,
    pub plan: Option<String>,
    pub assigned_agent_id: Option<i64>,
    pub password_hash: Option<String>,
}

/// Body for a credit top-up.
#[derive(Debug, Deserialize)]
pub struct TopUp {
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    pub limit: Option<i64>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(user::list_users(state.db.pool()).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateUser>,
) -> Result<Json<User>> {
    if body.email.trim().is_empty() {
        return Err(ApiError::BadRequest("email must not be empty".into()));
    }
    let new = user::NewUser {
        email: body.email.trim().to_string(),
        password_hash: body.password_hash,
        name: body.name,
        role: body.role.unwrap_or_else(|| "customer".to_string()),
        assigned_agent_id: body.assigned_agent_id,
        plan: body.plan.unwrap_or_else(|| "STARTER".to_string()),
    };
    Ok(Json(user::create_user(state.db.pool(), &new).await?))
}

pub async fn get_one(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<User>> {
    Ok(Json(user::get_user(state.db.pool(), id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateUser>,
) -> Result<Json<User>> {
    let mut current = user::get_user(state.db.pool(), id).await?;
    if let Some(name) = body.name {
        current.name = name;
    }
    if let Some(role) = body.role {
        current.role = role;
    }
    if let Some(plan) = body.plan {
        current.plan = plan;
    }
    if let Some(agent_id) = body.assigned_agent_id {
        current.assigned_agent_id = Some(agent_id);
    }
    if let Some(password_hash) = body.password_hash {
        current.password_hash = password_hash;
    }
    user::update_user(state.db.pool(), &current).await?;
    Ok(Json(current))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    user::delete_user(state.db.pool(), id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

pub async fn transactions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<Vec<Transaction>>> {
    user::get_user(state.db.pool(), id).await?;
    Ok(Json(
        transaction::list_transactions_for_user(state.db.pool(), id, query.limit.unwrap_or(50))
            .await?,
    ))
}

pub async fn top_up(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<TopUp>,
) -> Result<Json<User>> {
    if body.amount <= 0.0 {
        return Err(ApiError::BadRequest("amount must be positive".into()));
    }
    user::get_user(state.db.pool(), id).await?;
    user::credit_credits(state.db.pool(), id, body.amount).await?;
    transaction::create_transaction(
        state.db.pool(),
        id,
        body.amount,
        "top_up",
        &format!("Credit top-up of ${:.2}", body.amount),
    )
    .await?;
    Ok(Json(user::get_user(state.db.pool(), id).await?))
}
