//! Phone number endpoints.

use axum::extract::{Path, State};
use axum::Json;
use database::models::PhoneNumber;
use database::phone_number;
use serde::Deserialize;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Body for registering a number.
#[derive(Debug, Deserialize)]
pub struct CreateNumber {
    pub number: String,
    pub friendly_name: Option<String>,
}

/// Body for binding a number to an agent.
#[derive(Debug, Deserialize)]
pub struct BindNumber {
    pub agent_id: i64,
}

/// Body for provisioning a new number from the telephony provider.
#[derive(Debug, Deserialize)]
pub struct ProvisionNumber {
    pub country: Option<String>,
    pub area_code: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PhoneNumber>>> {
    Ok(Json(phone_number::list_numbers(state.db.pool()).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateNumber>,
) -> Result<Json<PhoneNumber>> {
    let number = body.number.trim();
    if number.is_empty() {
        return Err(ApiError::BadRequest("number must not be empty".into()));
    }
    let friendly_name = body.friendly_name.unwrap_or_else(|| number.to_string());
    Ok(Json(
        phone_number::create_number(state.db.pool(), number, &friendly_name).await?,
    ))
}

/// Buy the first available local number and register it, with its voice
/// webhook pointed at this deployment.
pub async fn provision(
    State(state): State<AppState>,
    Json(body): Json<ProvisionNumber>,
) -> Result<Json<PhoneNumber>> {
    let twilio = state
        .twilio
        .as_ref()
        .ok_or(ApiError::NotConfigured("Twilio"))?;

    let country = body.country.as_deref().unwrap_or("US");
    let available = twilio
        .search_available_numbers(country, body.area_code.as_deref())
        .await?;
    let candidate = available
        .first()
        .ok_or_else(|| ApiError::BadRequest("no numbers available".into()))?;

    let voice_url = format!("{}/voice", state.public_url);
    let purchased = twilio.purchase_number(&candidate.phone_number, &voice_url).await?;

    let friendly_name = candidate
        .friendly_name
        .clone()
        .unwrap_or_else(|| purchased.phone_number.clone());
    Ok(Json(
        phone_number::create_number(state.db.pool(), &purchased.phone_number, &friendly_name)
            .await?,
    ))
}

pub async fn bind(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<BindNumber>,
) -> Result<Json<PhoneNumber>> {
    phone_number::bind_to_agent(state.db.pool(), id, body.agent_id).await?;
    Ok(Json(phone_number::get_number(state.db.pool(), id).await?))
}

pub async fn unbind(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PhoneNumber>> {
    phone_number::unbind(state.db.pool(), id).await?;
    Ok(Json(phone_number::get_number(state.db.pool(), id).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    phone_number::delete_number(state.db.pool(), id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
