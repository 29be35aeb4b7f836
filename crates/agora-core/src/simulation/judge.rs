//! Judge pass: a one-shot evaluation of the latest turn.
//!
//! Unlike a conversation turn there is no speaker rotation, no memory recall
//! and no option override. The verdict is stored as an agentless message
//! prefixed with [`JUDGE_MARKER`]; any score inside it stays opaque text.

use agora_types::agent::Agent;
use agora_types::error::SimulationError;
use agora_types::id::RoomId;
use agora_types::message::{JUDGE_MARKER, Message};
use tracing::info;

use crate::llm::client::GenerationClient;
use crate::memory::store::MemoryStore;
use crate::repository::agent::AgentRepository;
use crate::repository::message::MessageRepository;
use crate::repository::room::RoomRepository;

use super::orchestrator::TurnOrchestrator;

pub const JUDGE_SYSTEM_PROMPT: &str = "You are a neutral judge observing a conversation. \
Assess the quality, logic, and helpfulness of the latest turn. \
Output one paragraph followed by a score from 1-10.";

/// Display name used when the judged message has no resolvable agent.
pub const UNKNOWN_SPEAKER: &str = "Unknown";

/// Build the judge's user prompt from the transcript tail.
///
/// Blank bodies are left out of the rendered window, but the judged speaker
/// is always the author of the transcript's last message, even when that
/// reply came back empty. Returns `None` when no message has a non-blank
/// body.
pub fn build_judge_prompt(agents: &[Agent], transcript: &[Message], window: usize) -> Option<String> {
    let recent: Vec<&Message> = transcript
        .iter()
        .filter(|m| !m.content.trim().is_empty())
        .collect();
    if recent.is_empty() {
        return None;
    }
    let start = recent.len().saturating_sub(window);
    let recent = &recent[start..];

    let speaker = transcript
        .last()
        .and_then(|m| m.agent_id)
        .and_then(|id| agents.iter().find(|a| a.id == id))
        .map(|a| a.name.as_str())
        .unwrap_or(UNKNOWN_SPEAKER);

    let lines = recent
        .iter()
        .map(|m| m.render_line())
        .collect::<Vec<_>>()
        .join("\n");

    Some(format!(
        "Recent conversation:\n{lines}\n\nEvaluate the latest turn by {speaker}."
    ))
}

impl<R, A, M, S, G> TurnOrchestrator<R, A, M, S, G>
where
    R: RoomRepository,
    A: AgentRepository,
    M: MessageRepository,
    S: MemoryStore,
    G: GenerationClient,
{
    /// Ask the judge to critique the room's latest turn and persist the
    /// verdict.
    pub async fn judge_last_turn(&self, room_id: &RoomId) -> Result<Message, SimulationError> {
        let (room, agents, transcript) = self.load_context(room_id).await?;

        let prompt = build_judge_prompt(&agents, &transcript, self.judge_window)
            .ok_or(SimulationError::NoMessages(*room_id))?;

        let verdict = self
            .generator
            .generate(JUDGE_SYSTEM_PROMPT, &prompt, None)
            .await?;

        let body = format!("{JUDGE_MARKER} {}", verdict.trim());
        let message = self
            .messages
            .create(&Message::new(room.id, None, body))
            .await?;

        info!(room_id = %room_id, message_id = %message.id, "judge verdict recorded");
        Ok(message)
    }
}
