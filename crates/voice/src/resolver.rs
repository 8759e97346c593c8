//! Agent resolution for an inbound call leg.

use database::models::Agent;
use database::{agent, phone_number, DatabaseError};
use tracing::{debug, warn};

use crate::ledger::Ledger;

/// How many agents the IVR menu can enumerate (one DTMF digit each).
pub const MENU_LIMIT: usize = 9;

/// Outcome of resolving a call leg to an agent.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// A single agent handles the call.
    Agent(Agent),
    /// No agent could be auto-resolved; present a numeric menu.
    Menu(Vec<Agent>),
    /// An out-of-range digit was pressed; re-present the menu.
    InvalidDigit(Vec<Agent>),
    /// No agents exist at all. Terminal.
    NoAgents,
    /// An explicitly requested agent does not exist. Terminal.
    NotFound,
}

/// Resolve which agent handles a call leg.
///
/// Precedence: explicit id, then a pressed digit (a digit implies the
/// caller is mid-IVR and beats number-based routing), then the destination
/// number's binding with the persisted active-agent pointer as fallback.
/// With no explicit id, no digit, and no destination, the IVR menu is the
/// answer. Pure lookup; the caller acts on the outcome.
pub async fn resolve(
    ledger: &Ledger,
    explicit_agent_id: Option<i64>,
    destination_number: Option<&str>,
    dtmf_digit: Option<u32>,
) -> Resolution {
    let pool = ledger.db().pool();

    if let Some(agent_id) = explicit_agent_id {
        return match agent::get_agent(pool, agent_id).await {
            Ok(agent) => Resolution::Agent(agent),
            Err(DatabaseError::NotFound { .. }) => {
                warn!("Requested agent {} does not exist", agent_id);
                Resolution::NotFound
            }
            Err(e) => {
                warn!("Failed to look up agent {}: {}", agent_id, e);
                Resolution::NotFound
            }
        };
    }

    let agents = match agent::list_agents(pool).await {
        Ok(agents) => agents,
        Err(e) => {
            warn!("Failed to list agents: {}", e);
            Vec::new()
        }
    };
    if agents.is_empty() {
        return Resolution::NoAgents;
    }

    if let Some(digit) = dtmf_digit {
        let index = digit as usize;
        if index >= 1 && index <= agents.len() {
            let agent = agents[index - 1].clone();
            debug!("Digit {} routed to agent {} ({})", digit, agent.id, agent.name);
            return Resolution::Agent(agent);
        }
        warn!("Digit {} is out of range for {} agents", digit, agents.len());
        return Resolution::InvalidDigit(menu_slice(agents));
    }

    if let Some(number) = destination_number {
        match phone_number::get_by_number(pool, number).await {
            Ok(Some(bound)) => {
                if let Some(agent_id) = bound.agent_id {
                    match agent::get_agent(pool, agent_id).await {
                        Ok(agent) => {
                            debug!("Number {} routed to agent {} ({})", number, agent.id, agent.name);
                            return Resolution::Agent(agent);
                        }
                        Err(e) => {
                            warn!("Number {} points at missing agent {}: {}", number, agent_id, e)
                        }
                    }
                }
            }
            Ok(None) => debug!("No phone number record for {}", number),
            Err(e) => warn!("Failed to look up number {}: {}", number, e),
        }

        // Unbound or unknown destination: fall back to the active agent.
        let active_id = ledger.active_agent_id().await;
        match agent::get_agent(pool, active_id).await {
            Ok(agent) => {
                debug!("Number {} fell back to active agent {}", number, agent.id);
                return Resolution::Agent(agent);
            }
            Err(e) => warn!("Active agent {} unavailable: {}", active_id, e),
        }
    }

    Resolution::Menu(menu_slice(agents))
}

fn menu_slice(mut agents: Vec<Agent>) -> Vec<Agent> {
    agents.truncate(MENU_LIMIT);
    agents
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::agent::{create_agent, NewAgent};
    use database::phone_number::{bind_to_agent, create_number};
    use database::Database;

    async fn test_ledger() -> Ledger {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        Ledger::new(db)
    }

    #[tokio::test]
    async fn test_explicit_id_wins() {
        let ledger = test_ledger().await;
        let pool = ledger.db().pool();
        create_agent(pool, &NewAgent::named("First")).await.unwrap();
        let second = create_agent(pool, &NewAgent::named("Second")).await.unwrap();

        match resolve(&ledger, Some(second.id), Some("+15550002"), Some(1)).await {
            Resolution::Agent(agent) => assert_eq!(agent.name, "Second"),
            other => panic!("Expected Agent, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_explicit_id_missing_is_not_found() {
        let ledger = test_ledger().await;
        create_agent(ledger.db().pool(), &NewAgent::named("Only"))
            .await
            .unwrap();

        assert!(matches!(
            resolve(&ledger, Some(999), None, None).await,
            Resolution::NotFound
        ));
    }

    #[tokio::test]
    async fn test_digit_beats_number_routing() {
        let ledger = test_ledger().await;
        let pool = ledger.db().pool();
        let first = create_agent(pool, &NewAgent::named("First")).await.unwrap();
        let second = create_agent(pool, &NewAgent::named("Second")).await.unwrap();
        let number = create_number(pool, "+15550002", "Main line").await.unwrap();
        bind_to_agent(pool, number.id, first.id).await.unwrap();

        match resolve(&ledger, None, Some("+15550002"), Some(2)).await {
            Resolution::Agent(agent) => assert_eq!(agent.id, second.id),
            other => panic!("Expected Agent, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bound_number_routes_to_its_agent() {
        let ledger = test_ledger().await;
        let pool = ledger.db().pool();
        create_agent(pool, &NewAgent::named("First")).await.unwrap();
        let second = create_agent(pool, &NewAgent::named("Second")).await.unwrap();
        let number = create_number(pool, "+15550002", "Main line").await.unwrap();
        bind_to_agent(pool, number.id, second.id).await.unwrap();

        match resolve(&ledger, None, Some("+15550002"), None).await {
            Resolution::Agent(agent) => assert_eq!(agent.id, second.id),
            other => panic!("Expected Agent, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_number_falls_back_to_active_agent() {
        let ledger = test_ledger().await;
        let pool = ledger.db().pool();
        create_agent(pool, &NewAgent::named("First")).await.unwrap();
        let second = create_agent(pool, &NewAgent::named("Second")).await.unwrap();
        ledger.set_active_agent_id(second.id).await;

        match resolve(&ledger, None, Some("+15559999"), None).await {
            Resolution::Agent(agent) => assert_eq!(agent.id, second.id),
            other => panic!("Expected Agent, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_destination_yields_menu() {
        let ledger = test_ledger().await;
        let pool = ledger.db().pool();
        create_agent(pool, &NewAgent::named("First")).await.unwrap();
        create_agent(pool, &NewAgent::named("Second")).await.unwrap();

        match resolve(&ledger, None, None, None).await {
            Resolution::Menu(agents) => assert_eq!(agents.len(), 2),
            other => panic!("Expected Menu, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_menu_caps_at_nine_agents() {
        let ledger = test_ledger().await;
        let pool = ledger.db().pool();
        for i in 1..=12 {
            create_agent(pool, &NewAgent::named(format!("Agent {}", i)))
                .await
                .unwrap();
        }

        match resolve(&ledger, None, None, None).await {
            Resolution::Menu(agents) => assert_eq!(agents.len(), 9),
            other => panic!("Expected Menu, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_out_of_range_digit_represents_menu() {
        let ledger = test_ledger().await;
        create_agent(ledger.db().pool(), &NewAgent::named("Only"))
            .await
            .unwrap();

        match resolve(&ledger, None, None, Some(5)).await {
            Resolution::InvalidDigit(agents) => assert_eq!(agents.len(), 1),
            other => panic!("Expected InvalidDigit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_zero_agents_is_terminal() {
        let ledger = test_ledger().await;
        assert!(matches!(
            resolve(&ledger, None, None, None).await,
            Resolution::NoAgents
        ));
        assert!(matches!(
            resolve(&ledger, None, Some("+15550002"), None).await,
            Resolution::NoAgents
        ));
    }
}
