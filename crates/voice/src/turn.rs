//! Conversation turn controller.
//!
//! Each inbound webhook callback is one turn. The controller classifies the
//! turn into an explicit [`TurnState`], then dispatches it to produce a
//! TwiML response. Every response contains zero or more `<Say>` verbs and
//! exactly one of a `<Gather>` (the conversation continues) or a `<Hangup>`
//! (terminal). The controller never fails outward; anything that goes wrong
//! mid-turn degrades to a spoken line.

use std::sync::Arc;

use brain_core::{Brain, ChatRequest, ChatTurn, Role};
use database::models::Agent;
use database::{document, now_ms};
use tracing::{info, warn};
use twilio_rest::{Gather, VoiceResponse};

use crate::control::CallControl;
use crate::ledger::Ledger;
use crate::prompt::build_system_prompt;
use crate::resolver::{resolve, Resolution};

const NO_AGENTS_LINE: &str = "Sorry, there are no agents available right now. Goodbye.";
const NOT_FOUND_LINE: &str = "Agent not found. Goodbye.";
const INVALID_DIGIT_LINE: &str = "That was not a valid choice.";
const EMPTY_REPLY_LINE: &str = "I didn't quite catch that.";
const TROUBLE_LINE: &str = "I'm sorry, I'm having trouble connecting.";
const STILL_THERE_LINE: &str = "Are you still there?";
const TIME_UP_LINE: &str =
    "I'm sorry, we have reached the maximum call duration. Thank you for calling. Goodbye.";

/// Voice used before an agent (with its own voice config) is resolved.
const DEFAULT_VOICE: &str = "Polly.Joanna";

/// Wait timeout for the IVR menu, before an agent's own setting applies.
const MENU_WAIT_SECS: u32 = 10;

/// One inbound webhook callback, decoded.
#[derive(Debug, Clone)]
pub struct TurnInput {
    /// Provider call SID.
    pub call_sid: String,
    /// Caller's number.
    pub from: String,
    /// Destination number, when the provider supplies one.
    pub to: Option<String>,
    /// Call direction (`inbound`/`outbound`).
    pub direction: String,
    /// Recognized speech, when the caller said something.
    pub speech: Option<String>,
    /// Pressed DTMF digits, when mid-IVR.
    pub digits: Option<String>,
    /// Agent id carried on the action URL from a previous turn.
    pub agent_id: Option<i64>,
}

/// The explicit state a turn classifies into.
///
/// Exactly one state per callback; dispatch on the state is the only place
/// TwiML is produced.
#[derive(Debug, Clone)]
pub enum TurnState {
    /// No agent auto-resolved; present the IVR menu.
    Menu(Vec<Agent>),
    /// Out-of-range digit; re-present the menu.
    InvalidDigit(Vec<Agent>),
    /// No agents configured at all. Terminal.
    NoAgents,
    /// An explicitly requested agent does not exist. Terminal.
    AgentNotFound,
    /// The call has run past the agent's maximum duration. Terminal.
    DurationExceeded(Agent),
    /// First contact with the agent; speak the greeting.
    Greeting(Agent),
    /// The caller said something; generate a reply.
    Turn { agent: Agent, speech: String },
    /// Silence on an established call; nudge the caller.
    Reprompt(Agent),
}

/// Orchestrates one webhook turn end to end.
pub struct TurnController {
    ledger: Ledger,
    brain: Arc<dyn Brain>,
    control: Arc<dyn CallControl>,
}

impl TurnController {
    /// Create a controller.
    pub fn new(ledger: Ledger, brain: Arc<dyn Brain>, control: Arc<dyn CallControl>) -> Self {
        Self {
            ledger,
            brain,
            control,
        }
    }

    /// The ledger this controller writes through.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Handle one webhook callback, producing the TwiML to answer with.
    pub async fn handle(&self, input: &TurnInput) -> VoiceResponse {
        let state = self.classify(input).await;
        self.dispatch(state, input).await
    }

    /// Classify a callback into its turn state.
    pub async fn classify(&self, input: &TurnInput) -> TurnState {
        let digit = input
            .digits
            .as_deref()
            .and_then(|d| d.trim().chars().next())
            .and_then(|c| c.to_digit(10));

        let agent = match resolve(&self.ledger, input.agent_id, input.to.as_deref(), digit).await {
            Resolution::Agent(agent) => agent,
            Resolution::Menu(agents) => return TurnState::Menu(agents),
            Resolution::InvalidDigit(agents) => return TurnState::InvalidDigit(agents),
            Resolution::NoAgents => return TurnState::NoAgents,
            Resolution::NotFound => return TurnState::AgentNotFound,
        };

        // The call row exists from the greeting turn onward, so its
        // presence marks "any turn after the first".
        if let Some(call) = self.ledger.call(&input.call_sid).await {
            let elapsed_ms = now_ms() - call.started_at;
            if elapsed_ms >= agent.max_call_duration_mins * 60_000 {
                return TurnState::DurationExceeded(agent);
            }
        }

        let speech = input
            .speech
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        match speech {
            Some(speech) => TurnState::Turn {
                agent,
                speech: speech.to_string(),
            },
            // No speech: first turn and silent turn look the same on the
            // wire. Only the presence of a prior transcript tells them
            // apart.
            None if self.ledger.has_transcript(&input.call_sid).await => {
                TurnState::Reprompt(agent)
            }
            None => TurnState::Greeting(agent),
        }
    }

    /// Produce the TwiML for a classified turn.
    pub async fn dispatch(&self, state: TurnState, input: &TurnInput) -> VoiceResponse {
        match state {
            TurnState::NoAgents => VoiceResponse::new().say(DEFAULT_VOICE, NO_AGENTS_LINE).hangup(),
            TurnState::AgentNotFound => {
                VoiceResponse::new().say(DEFAULT_VOICE, NOT_FOUND_LINE).hangup()
            }
            TurnState::Menu(agents) => VoiceResponse::new()
                .say(DEFAULT_VOICE, menu_prompt(&agents))
                .gather(Gather::new("/voice", MENU_WAIT_SECS)),
            TurnState::InvalidDigit(agents) => VoiceResponse::new()
                .say(
                    DEFAULT_VOICE,
                    format!("{} {}", INVALID_DIGIT_LINE, menu_prompt(&agents)),
                )
                .gather(Gather::new("/voice", MENU_WAIT_SECS)),
            TurnState::DurationExceeded(agent) => {
                info!("Call {} exceeded max duration, hanging up", input.call_sid);
                VoiceResponse::new()
                    .say(agent_voice(&agent), TIME_UP_LINE)
                    .hangup()
            }
            TurnState::Greeting(agent) => self.greet(&agent, input).await,
            TurnState::Turn { agent, speech } => self.take_turn(&agent, &speech, input).await,
            TurnState::Reprompt(agent) => VoiceResponse::new()
                .say(agent_voice(&agent), STILL_THERE_LINE)
                .gather(agent_gather(&agent)),
        }
    }

    async fn greet(&self, agent: &Agent, input: &TurnInput) -> VoiceResponse {
        let greeting = agent
            .first_sentence
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!("Hello, I am {}. How can I help you today?", agent.name)
            });

        // This is the point the call row is first created.
        self.ledger
            .upsert_call_agent(
                &input.call_sid,
                agent.id,
                &input.from,
                input.to.as_deref().unwrap_or(""),
                &input.direction,
            )
            .await;
        self.ledger
            .append_transcript(&input.call_sid, Role::Assistant.as_str(), &greeting)
            .await;

        // Best effort. A failed recording start must not break the call.
        if let Err(e) = self.control.start_recording(&input.call_sid).await {
            warn!("Failed to start recording for call {}: {}", input.call_sid, e);
        }

        info!(
            "Call {} greeted by agent {} ({})",
            input.call_sid, agent.id, agent.name
        );
        VoiceResponse::new()
            .say(agent_voice(agent), greeting)
            .gather(agent_gather(agent))
    }

    async fn take_turn(&self, agent: &Agent, speech: &str, input: &TurnInput) -> VoiceResponse {
        self.ledger
            .append_transcript(&input.call_sid, Role::User.as_str(), speech)
            .await;

        let documents = match document::list_documents(self.ledger.db().pool(), agent.id).await {
            Ok(documents) => documents,
            Err(e) => {
                warn!("Failed to load documents for agent {}: {}", agent.id, e);
                Vec::new()
            }
        };
        let system_prompt = build_system_prompt(agent, &documents);
        let turns: Vec<ChatTurn> = self
            .ledger
            .entries(&input.call_sid)
            .await
            .into_iter()
            .map(|entry| ChatTurn {
                role: Role::parse(&entry.role),
                text: entry.text,
            })
            .collect();

        match self.brain.generate(ChatRequest::new(system_prompt, turns)).await {
            Ok(reply) => {
                let text = if reply.is_empty() {
                    EMPTY_REPLY_LINE.to_string()
                } else {
                    reply.text
                };
                self.ledger
                    .append_transcript(&input.call_sid, Role::Assistant.as_str(), &text)
                    .await;
                VoiceResponse::new()
                    .say(agent_voice(agent), text)
                    .gather(agent_gather(agent))
            }
            Err(e) => {
                warn!("Reply generation failed for call {}: {}", input.call_sid, e);
                VoiceResponse::new()
                    .say(agent_voice(agent), TROUBLE_LINE)
                    .gather(agent_gather(agent))
            }
        }
    }
}

/// The IVR menu prompt for a list of agents.
fn menu_prompt(agents: &[Agent]) -> String {
    let mut prompt = String::from("Please select an agent.");
    for (i, agent) in agents.iter().enumerate() {
        prompt.push_str(&format!(" Press {} for {}.", i + 1, agent.name));
    }
    prompt
}

/// Map an agent's configured voice to a Twilio voice name.
fn agent_voice(agent: &Agent) -> &'static str {
    match agent.voice.as_str() {
        "alloy" | "nova" | "shimmer" => "Polly.Joanna",
        "echo" | "onyx" => "Polly.Matthew",
        "fable" => "Polly.Brian",
        _ => {
            if agent.gender == "male" {
                "Polly.Matthew"
            } else {
                "Polly.Joanna"
            }
        }
    }
}

/// The speech gather for an agent's next turn.
///
/// The action URL carries the agent id so later turns skip re-resolution.
fn agent_gather(agent: &Agent) -> Gather {
    Gather::new(
        format!("/voice?agentId={}", agent.id),
        agent.max_wait_secs.max(1) as u32,
    )
}
