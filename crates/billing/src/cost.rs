//! Per-call cost calculation. Pure arithmetic, no storage.

use crate::plans::Plan;

/// Telephony provider cost per connected minute, in dollars.
pub const TELEPHONY_COST_PER_MIN: f64 = 0.0085;

/// AI generation cost per connected minute, in dollars.
pub const AI_COST_PER_MIN: f64 = 0.06;

/// The cost of one call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallCost {
    /// Billable minutes (duration rounded up to whole minutes).
    pub minutes: i64,
    /// Amount charged to the user at the plan's overage rate.
    pub billed: f64,
    /// Our underlying provider cost. Internal margin visibility only;
    /// never charged to the user.
    pub base: f64,
}

/// Calculate the cost of a call under a plan.
///
/// Partial minutes round up; a 61 second call bills as 2 minutes.
pub fn calculate_call_cost(plan: &Plan, duration_secs: i64) -> CallCost {
    let minutes = (duration_secs.max(0) + 59) / 60;
    CallCost {
        minutes,
        billed: minutes as f64 * plan.overage_rate_per_min,
        base: minutes as f64 * (TELEPHONY_COST_PER_MIN + AI_COST_PER_MIN),
    }
}
