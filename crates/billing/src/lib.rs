//! Billing: the plan table, the per-call cost function, and the
//! finalization routine that runs on every call-completion callback.

mod cost;
mod error;
mod finalize;
mod plans;

pub use cost::{calculate_call_cost, CallCost, AI_COST_PER_MIN, TELEPHONY_COST_PER_MIN};
pub use error::BillingError;
pub use finalize::{finalize_call, FinalizeSummary};
pub use plans::{plan_for, Plan, PlanId};
