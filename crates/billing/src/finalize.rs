//! Call finalization - runs once per call-completion callback.

use database::{agent, call, transaction, user, Database, DatabaseError};
use tracing::{info, warn};

use crate::cost::calculate_call_cost;
use crate::error::BillingError;
use crate::plans::plan_for;

/// What finalization did, for the caller's logs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalizeSummary {
    /// Billable minutes for this call.
    pub minutes: i64,
    /// Amount actually charged. Zero when the plan's allowance covered the
    /// call or the agent is unowned.
    pub charged: f64,
}

/// Finalize a completed call: bill the owning user and close the call row.
///
/// Unowned agents (and calls that never resolved to an agent) skip billing
/// entirely; only the call row is updated. When the owning user still has
/// included minutes remaining, the whole call is free and only the usage
/// counter moves. No pro-ration at the allowance boundary.
///
/// The writes here are sequential, not transactional. A crash between the
/// debit and the call-row update leaves a charged but open-looking call;
/// duplicate completion callbacks for one SID would bill twice. Both
/// windows are inherited behavior, kept until product signs off on
/// idempotency keys.
pub async fn finalize_call(
    db: &Database,
    call_sid: &str,
    duration_secs: i64,
    status: &str,
    recording_url: Option<&str>,
) -> Result<FinalizeSummary, BillingError> {
    let pool = db.pool();
    let call = call::get_call(pool, call_sid).await?;

    let owner = match call.agent_id {
        Some(agent_id) => match agent::get_agent(pool, agent_id).await {
            Ok(agent) => agent.user_id,
            Err(DatabaseError::NotFound { .. }) => {
                warn!("Call {} references deleted agent {}", call_sid, agent_id);
                None
            }
            Err(e) => return Err(e.into()),
        },
        None => None,
    };

    let mut summary = FinalizeSummary {
        minutes: (duration_secs.max(0) + 59) / 60,
        charged: 0.0,
    };
    let mut recorded_cost = None;

    if let Some(user_id) = owner {
        let owner = user::get_user(pool, user_id).await?;
        let plan = plan_for(&owner.plan);

        if owner.usage_minutes_used < plan.included_minutes {
            // Still inside the allowance: the whole call is free.
            user::add_usage_minutes(pool, user_id, summary.minutes).await?;
            recorded_cost = Some(0.0);
            info!(
                "Call {} covered by {} allowance for user {} ({} min)",
                call_sid,
                plan.id.as_str(),
                user_id,
                summary.minutes
            );
        } else {
            let cost = calculate_call_cost(plan, duration_secs);
            user::debit_credits(pool, user_id, cost.billed).await?;
            user::add_usage_minutes(pool, user_id, cost.minutes).await?;
            if cost.billed > 0.0 {
                transaction::create_transaction(
                    pool,
                    user_id,
                    -cost.billed,
                    "call_charge",
                    &format!("Call {} ({} min)", call_sid, cost.minutes),
                )
                .await?;
            }
            summary.charged = cost.billed;
            recorded_cost = Some(cost.billed);
            info!(
                "Call {} billed ${:.2} to user {} ({} min at {} rate)",
                call_sid,
                cost.billed,
                user_id,
                cost.minutes,
                plan.id.as_str()
            );
        }
    } else {
        info!("Call {} has no owning user, skipping billing", call_sid);
    }

    call::complete_call(pool, call_sid, duration_secs, status, recording_url, recorded_cost)
        .await?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::agent::{create_agent, NewAgent};
    use database::user::{create_user, NewUser};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    async fn seed_user(db: &Database, plan: &str) -> i64 {
        create_user(
            db.pool(),
            &NewUser {
                email: format!("{}@example.com", plan.to_lowercase()),
                password_hash: "hash".to_string(),
                name: "Owner".to_string(),
                role: "customer".to_string(),
                assigned_agent_id: None,
                plan: plan.to_string(),
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn seed_call(db: &Database, sid: &str, user_id: Option<i64>) -> i64 {
        let mut new = NewAgent::named("Ava");
        new.user_id = user_id;
        let agent = create_agent(db.pool(), &new).await.unwrap();
        call::upsert_call_agent(db.pool(), sid, agent.id, "+15550001", "+15550002", "inbound")
            .await
            .unwrap();
        agent.id
    }

    #[tokio::test]
    async fn test_starter_call_is_billed() {
        let db = test_db().await;
        let user_id = seed_user(&db, "STARTER").await;
        seed_call(&db, "CA1", Some(user_id)).await;

        let summary = finalize_call(&db, "CA1", 61, "completed", Some("http://rec"))
            .await
            .unwrap();
        assert_eq!(summary.minutes, 2);
        assert_eq!(summary.charged, 0.50);

        let owner = user::get_user(db.pool(), user_id).await.unwrap();
        assert_eq!(owner.credits_balance, -0.50);
        assert_eq!(owner.usage_minutes_used, 2);

        let txs = transaction::list_transactions_for_user(db.pool(), user_id, 10)
            .await
            .unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].amount, -0.50);
        assert!(txs[0].description.contains("CA1"));

        let finished = call::get_call(db.pool(), "CA1").await.unwrap();
        assert_eq!(finished.duration_secs, Some(61));
        assert_eq!(finished.status, "completed");
        assert_eq!(finished.cost, Some(0.50));
        assert_eq!(finished.recording_url.as_deref(), Some("http://rec"));
        assert!(finished.ended_at.is_some());
    }

    #[tokio::test]
    async fn test_allowance_covers_call_without_charge() {
        let db = test_db().await;
        let user_id = seed_user(&db, "PRO").await;
        seed_call(&db, "CA1", Some(user_id)).await;

        let summary = finalize_call(&db, "CA1", 300, "completed", None).await.unwrap();
        assert_eq!(summary.charged, 0.0);
        assert_eq!(summary.minutes, 5);

        let owner = user::get_user(db.pool(), user_id).await.unwrap();
        assert_eq!(owner.credits_balance, 0.0);
        assert_eq!(owner.usage_minutes_used, 5);
        assert!(transaction::list_transactions_for_user(db.pool(), user_id, 10)
            .await
            .unwrap()
            .is_empty());

        let finished = call::get_call(db.pool(), "CA1").await.unwrap();
        assert_eq!(finished.cost, Some(0.0));
    }

    #[tokio::test]
    async fn test_allowance_boundary_is_all_or_nothing() {
        let db = test_db().await;
        let user_id = seed_user(&db, "PRO").await;
        seed_call(&db, "CA1", Some(user_id)).await;

        // One minute left in the allowance, a ten minute call: still free.
        user::add_usage_minutes(db.pool(), user_id, 999).await.unwrap();
        let summary = finalize_call(&db, "CA1", 600, "completed", None).await.unwrap();
        assert_eq!(summary.charged, 0.0);

        let owner = user::get_user(db.pool(), user_id).await.unwrap();
        assert_eq!(owner.usage_minutes_used, 1009);

        // Allowance now exhausted: the next call bills in full.
        seed_call(&db, "CA2", Some(user_id)).await;
        let summary = finalize_call(&db, "CA2", 60, "completed", None).await.unwrap();
        assert_eq!(summary.charged, 0.14);
    }

    #[tokio::test]
    async fn test_unowned_agent_skips_billing() {
        let db = test_db().await;
        seed_call(&db, "CA1", None).await;

        let summary = finalize_call(&db, "CA1", 61, "completed", None).await.unwrap();
        assert_eq!(summary.charged, 0.0);

        let finished = call::get_call(db.pool(), "CA1").await.unwrap();
        assert_eq!(finished.duration_secs, Some(61));
        assert_eq!(finished.cost, None);
    }

    #[tokio::test]
    async fn test_unknown_call_is_not_found() {
        let db = test_db().await;
        let result = finalize_call(&db, "CA_missing", 60, "completed", None).await;
        assert!(matches!(
            result,
            Err(BillingError::Database(DatabaseError::NotFound { .. }))
        ));
    }
}
