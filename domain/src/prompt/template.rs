//! Prompt templates for persona agents and the reviewer

use crate::assessment::Outcome;
use crate::conversation::{Phase, Turn};
use crate::persona::{Persona, Speaker};
use crate::similarity::SimilaritySignals;
use serde_json::json;

/// Everything needed to render one persona-agent turn
#[derive(Debug, Clone, Copy)]
pub struct TurnPrompt<'a> {
    pub speaker: Speaker,
    pub persona: &'a Persona,
    pub counterpart: &'a Persona,
    /// Zero-based index of the turn being generated
    pub turn_index: usize,
    pub phase: Phase,
    /// Transcript window visible to the agent, oldest first
    pub history: &'a [Turn],
    /// Retry after a failed attempt
    pub abbreviated: bool,
}

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for a persona agent
    pub fn persona_system() -> &'static str {
        r#"You are a professional conversation agent representing one party in a business-matching conversation.
Use the provided PROFILE_CONTEXT, which includes both your principal's profile and the counterpart's profile, to conduct a concise, outcome-oriented conversation.
Ask one focused question per turn and propose clear next steps when appropriate.
If the counterpart's needs clearly do not match what your principal offers, say so plainly."#
    }

    /// JSON block describing the agent and its counterpart
    pub fn profile_context(speaker: Speaker, persona: &Persona, counterpart: &Persona) -> String {
        json!({
            "agent_role": speaker.as_str(),
            "agent": {
                "id": persona.id(),
                "needs": persona.needs(),
                "personality": persona.personality(),
            },
            "counterpart": {
                "id": counterpart.id(),
                "needs": counterpart.needs(),
                "personality": counterpart.personality(),
            },
        })
        .to_string()
    }

    /// Style rules shared by every turn
    pub fn style_constraints() -> &'static str {
        "STYLE_CONSTRAINTS: 50-80 words, 2-3 sentences, business-formal. \
Reference at least one concrete detail from counterpart.needs or counterpart.personality and link it to the agent's needs or personality. \
One question max (omit in closing). Plain sentences only; no lists; avoid greetings after the first turn; avoid generic praise. \
Do not invent facts; use only PROFILE_CONTEXT and the transcript. If something is unknown, say so briefly and ask one clarifying question. \
Do not claim commitments (meetings, materials) unless explicitly confirmed."
    }

    /// Phase-specific guidance
    pub fn phase_instruction(phase: Phase) -> Option<&'static str> {
        match phase {
            Phase::Opening => Some(
                "OPENING_INSTRUCTION: Start with a warm, professional greeting and a concise self-introduction (1-2 sentences) grounded in PROFILE_CONTEXT. \
Then ask exactly one focused question to understand the counterpart's current top priority.",
            ),
            Phase::Discovery => Some(
                "DISCOVERY_INSTRUCTION: Explore the counterpart's needs and constraints. Connect them to your principal's profile.",
            ),
            Phase::DeepDive => Some(
                "DEEP_DIVE_INSTRUCTION: Go into specifics (scope, timing, budget, fit). Surface any blocker honestly.",
            ),
            Phase::Closing => Some(
                "CLOSING_INSTRUCTION: Confirm agreed next steps in 1-2 sentences and, if needed, ask one short logistics question (timing, link, attachments). \
If everything is confirmed, end politely. If there is no fit, say so.",
            ),
            Phase::Ended => None,
        }
    }

    /// User prompt for one persona-agent turn
    pub fn turn_prompt(prompt: &TurnPrompt<'_>) -> String {
        let mut blocks = vec![
            format!(
                "PROFILE_CONTEXT:\n{}",
                Self::profile_context(prompt.speaker, prompt.persona, prompt.counterpart)
            ),
            Self::style_constraints().to_string(),
            format!("TURN_INDEX: {}", prompt.turn_index + 1),
            format!("PHASE: {}", prompt.phase.as_str()),
        ];

        if prompt.abbreviated {
            blocks.push(
                "NOTE: Your previous reply could not be used. Reply concisely (at most 120 words, 2-4 sentences, one question max)."
                    .to_string(),
            );
        }

        if let Some((last, earlier)) = prompt.history.split_last() {
            if !earlier.is_empty() {
                let transcript = earlier
                    .iter()
                    .map(|t| format!("{} [{}]: {}", t.speaker, t.phase.as_str(), t.message))
                    .collect::<Vec<_>>()
                    .join("\n");
                blocks.push(format!("TRANSCRIPT:\n{}", transcript));
            }
            blocks.push(format!("LAST_MESSAGE:\n{}", last.message));
        }

        if let Some(instruction) = Self::phase_instruction(prompt.phase) {
            blocks.push(instruction.to_string());
        }

        blocks.push("REPLY: Provide the response now. Do not leave this blank.".to_string());
        blocks.join("\n\n")
    }

    /// System prompt for the reviewer
    pub fn review_system() -> &'static str {
        r#"You are an impartial reviewer of a business-matching conversation.
Read both personas, the similarity signals, the conversation outcome and the transcript.
Return only a JSON object with keys:
- "decision": one of "proceed", "more_info", "not_a_fit"
- "rationale": at most 80 words
- "confidence": a number between 0 and 1
Recommend "proceed" only when both parties explicitly agreed on a concrete next step."#
    }

    /// User payload for the reviewer
    pub fn review_payload(
        persona_1: &Persona,
        persona_2: &Persona,
        signals: &SimilaritySignals,
        outcome: Outcome,
        transcript: &[Turn],
    ) -> String {
        let persona = |p: &Persona| {
            json!({
                "id": p.id(),
                "needs": p.needs(),
                "personality": p.personality(),
            })
        };
        json!({
            "persona_1": persona(persona_1),
            "persona_2": persona(persona_2),
            "similarity_signals": signals,
            "conversation_outcome": outcome,
            "conversation": transcript,
        })
        .to_string()
    }
}
