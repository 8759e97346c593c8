//! The plan table. Fixed in-memory constants, not a database table.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Identifier of a billing plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlanId {
    Starter,
    Pro,
    Enterprise,
}

impl PlanId {
    /// The stored string for this plan.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanId::Starter => "STARTER",
            PlanId::Pro => "PRO",
            PlanId::Enterprise => "ENTERPRISE",
        }
    }

    /// Parse a stored plan string.
    pub fn parse(s: &str) -> Option<PlanId> {
        match s {
            "STARTER" => Some(PlanId::Starter),
            "PRO" => Some(PlanId::Pro),
            "ENTERPRISE" => Some(PlanId::Enterprise),
            _ => None,
        }
    }
}

/// One billing plan's terms.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Plan {
    /// Plan identifier.
    pub id: PlanId,
    /// Bundled minutes before overage billing applies.
    pub included_minutes: i64,
    /// Monthly base price in dollars.
    pub base_price: f64,
    /// Per-minute overage rate in dollars.
    pub overage_rate_per_min: f64,
}

const STARTER: Plan = Plan {
    id: PlanId::Starter,
    included_minutes: 0,
    base_price: 0.0,
    overage_rate_per_min: 0.25,
};

const PRO: Plan = Plan {
    id: PlanId::Pro,
    included_minutes: 1000,
    base_price: 99.0,
    overage_rate_per_min: 0.14,
};

const ENTERPRISE: Plan = Plan {
    id: PlanId::Enterprise,
    included_minutes: 3000,
    base_price: 299.0,
    overage_rate_per_min: 0.11,
};

/// Look up the plan for a stored plan string.
///
/// Unknown strings fall back to STARTER, which has no included minutes and
/// the highest overage rate, so a corrupt plan field never gives away free
/// usage.
pub fn plan_for(plan: &str) -> &'static Plan {
    match PlanId::parse(plan) {
        Some(PlanId::Starter) => &STARTER,
        Some(PlanId::Pro) => &PRO,
        Some(PlanId::Enterprise) => &ENTERPRISE,
        None => {
            warn!("Unknown plan {:?}, falling back to STARTER", plan);
            &STARTER
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_terms() {
        assert_eq!(plan_for("STARTER").included_minutes, 0);
        assert_eq!(plan_for("STARTER").overage_rate_per_min, 0.25);
        assert_eq!(plan_for("PRO").included_minutes, 1000);
        assert_eq!(plan_for("PRO").overage_rate_per_min, 0.14);
        assert_eq!(plan_for("ENTERPRISE").included_minutes, 3000);
        assert_eq!(plan_for("ENTERPRISE").overage_rate_per_min, 0.11);
    }

    #[test]
    fn test_unknown_plan_falls_back_to_starter() {
        assert_eq!(plan_for("GOLD").id, PlanId::Starter);
    }

    #[test]
    fn test_plan_id_roundtrip() {
        assert_eq!(PlanId::parse("PRO"), Some(PlanId::Pro));
        assert_eq!(PlanId::Pro.as_str(), "PRO");
        assert_eq!(PlanId::parse("pro"), None);
    }
}
