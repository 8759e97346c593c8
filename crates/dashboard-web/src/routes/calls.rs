//! Call history endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use database::models::{Call, TranscriptEntry};
use database::{agent, call, transcript, DatabaseError};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub agent_id: Option<i64>,
}

/// A call row joined with the agent that handled it.
#[derive(Debug, Serialize)]
pub struct CallSummary {
    #[serde(flatten)]
    pub call: Call,
    pub agent_name: Option<String>,
}

/// A call with its full transcript.
#[derive(Debug, Serialize)]
pub struct CallDetail {
    #[serde(flatten)]
    pub call: Call,
    pub agent_name: Option<String>,
    pub transcript: Vec<TranscriptEntry>,
}

async fn agent_name(state: &AppState, agent_id: Option<i64>) -> Result<Option<String>> {
    let Some(agent_id) = agent_id else {
        return Ok(None);
    };
    match agent::get_agent(state.db.pool(), agent_id).await {
        Ok(agent) => Ok(Some(agent.name)),
        // The agent may have been deleted since the call.
        Err(DatabaseError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CallSummary>>> {
    let limit = query.limit.unwrap_or(50);
    let calls = match query.agent_id {
        Some(agent_id) => call::list_calls_for_agent(state.db.pool(), agent_id, limit).await?,
        None => call::list_calls(state.db.pool(), limit).await?,
    };

    let mut summaries = Vec::with_capacity(calls.len());
    for row in calls {
        let agent_name = agent_name(&state, row.agent_id).await?;
        summaries.push(CallSummary {
            call: row,
            agent_name,
        });
    }
    Ok(Json(summaries))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(sid): Path<String>,
) -> Result<Json<CallDetail>> {
    let row = call::get_call(state.db.pool(), &sid).await?;
    let agent_name = agent_name(&state, row.agent_id).await?;
    let entries = transcript::get_entries(state.db.pool(), &sid).await?;
    Ok(Json(CallDetail {
        call: row,
        agent_name,
        transcript: entries,
    }))
}
