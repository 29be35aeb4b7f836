//! Turn orchestration.
//!
//! One call to [`TurnOrchestrator::advance_turn`] runs a single agent turn:
//! pick the speaker, recall their memories, build the prompt, generate,
//! persist the reply and memorize it. Generation failure aborts the turn
//! before anything is written. Memory failures in either direction only
//! degrade the turn and are reported in [`TurnOutcome::degradations`].
//!
//! The orchestrator does not serialize calls for the same room; callers use
//! [`TurnLocks`](super::lock::TurnLocks) for that.

use agora_types::agent::Agent;
use agora_types::config::AgoraConfig;
use agora_types::error::{MemoryDegradation, SimulationError};
use agora_types::id::RoomId;
use agora_types::message::Message;
use agora_types::room::Room;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::llm::client::GenerationClient;
use crate::memory::store::MemoryStore;
use crate::repository::agent::AgentRepository;
use crate::repository::message::MessageRepository;
use crate::repository::room::RoomRepository;

use super::prompt::PromptBuilder;
use super::speaker::select_next;

/// Where a turn currently is. Logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    SelectingSpeaker,
    Recalling,
    BuildingPrompt,
    Generating,
    Persisting,
    UpdatingMemory,
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TurnPhase::Idle => "idle",
            TurnPhase::SelectingSpeaker => "selecting_speaker",
            TurnPhase::Recalling => "recalling",
            TurnPhase::BuildingPrompt => "building_prompt",
            TurnPhase::Generating => "generating",
            TurnPhase::Persisting => "persisting",
            TurnPhase::UpdatingMemory => "updating_memory",
        };
        f.write_str(name)
    }
}

/// Result of a successful turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// The persisted reply.
    pub message: Message,
    pub speaker: Agent,
    /// Number of memories that went into the prompt.
    pub recalled_count: usize,
    pub degradations: Vec<MemoryDegradation>,
}

/// Runs agent turns against injected repositories, memory store and
/// generation client.
pub struct TurnOrchestrator<R, A, M, S, G>
where
    R: RoomRepository,
    A: AgentRepository,
    M: MessageRepository,
    S: MemoryStore,
    G: GenerationClient,
{
    pub(super) rooms: R,
    pub(super) agents: A,
    pub(super) messages: M,
    memory: S,
    pub(super) generator: G,
    prompts: PromptBuilder,
    recall_top_k: usize,
    pub(super) judge_window: usize,
}

impl<R, A, M, S, G> TurnOrchestrator<R, A, M, S, G>
where
    R: RoomRepository,
    A: AgentRepository,
    M: MessageRepository,
    S: MemoryStore,
    G: GenerationClient,
{
    pub fn new(rooms: R, agents: A, messages: M, memory: S, generator: G, config: &AgoraConfig) -> Self {
        Self {
            rooms,
            agents,
            messages,
            memory,
            generator,
            prompts: PromptBuilder::from_config(config),
            recall_top_k: config.recall_top_k,
            judge_window: config.judge_window,
        }
    }

    pub fn prompt_builder(&self) -> &PromptBuilder {
        &self.prompts
    }

    /// Room, roster and full transcript, failing when the room is missing
    /// or has nobody in it.
    pub(super) async fn load_context(
        &self,
        room_id: &RoomId,
    ) -> Result<(Room, Vec<Agent>, Vec<Message>), SimulationError> {
        let room = self
            .rooms
            .get_by_id(room_id)
            .await?
            .ok_or(SimulationError::RoomNotFound(*room_id))?;

        let agents = self.agents.list_by_room(room_id).await?;
        if agents.is_empty() {
            return Err(SimulationError::NoAgents(*room_id));
        }

        let transcript = self.messages.list_by_room(room_id).await?;
        Ok((room, agents, transcript))
    }

    /// Advance the room's conversation by one agent turn.
    pub async fn advance_turn(&self, room_id: &RoomId) -> Result<TurnOutcome, SimulationError> {
        let (room, agents, transcript) = self.load_context(room_id).await?;

        enter(room_id, TurnPhase::SelectingSpeaker);
        let speaker = select_next(room.id, &agents, &transcript)?.clone();
        debug!(room_id = %room_id, agent_id = %speaker.id, speaker = %speaker.name, "speaker selected");

        let mut degradations = Vec::new();

        enter(room_id, TurnPhase::Recalling);
        let query = self.prompts.history_text(&transcript);
        let recalled = match self
            .memory
            .recall(&speaker.id, &query, self.recall_top_k)
            .await
        {
            Ok(recalled) => recalled,
            Err(e) => {
                warn!(
                    room_id = %room_id,
                    agent_id = %speaker.id,
                    error = %e,
                    "MemoryRecallDegraded: continuing without memories"
                );
                degradations.push(MemoryDegradation::RecallDegraded {
                    agent_id: speaker.id,
                    reason: e.to_string(),
                });
                Vec::new()
            }
        };

        enter(room_id, TurnPhase::BuildingPrompt);
        let built = self.prompts.build(&speaker, &room, &transcript, &recalled);

        enter(room_id, TurnPhase::Generating);
        let reply = self
            .generator
            .generate(&built.system, &built.prompt, Some(&built.options))
            .await
            .inspect_err(|e| {
                warn!(room_id = %room_id, agent_id = %speaker.id, error = %e, "generation failed, turn aborted");
            })?;

        enter(room_id, TurnPhase::Persisting);
        let reply = reply.trim();
        let message = self
            .messages
            .create(&Message::new(room.id, Some(speaker.id), reply))
            .await?;

        enter(room_id, TurnPhase::UpdatingMemory);
        if let Err(e) = self.memory.add(&speaker.id, reply).await {
            warn!(
                room_id = %room_id,
                agent_id = %speaker.id,
                message_id = %message.id,
                error = %e,
                "MemoryWriteDegraded: reply kept but not memorized"
            );
            degradations.push(MemoryDegradation::WriteDegraded {
                agent_id: speaker.id,
                reason: e.to_string(),
            });
        }

        enter(room_id, TurnPhase::Idle);
        info!(
            room_id = %room_id,
            agent_id = %speaker.id,
            mode = %built.mode,
            recalled = recalled.len(),
            reply_len = reply.len(),
            "turn complete"
        );

        Ok(TurnOutcome {
            message,
            speaker,
            recalled_count: recalled.len(),
            degradations,
        })
    }

    /// Run `count` turns back to back, stopping at the first error.
    ///
    /// Turns that completed before the error stay persisted.
    pub async fn advance_turns(
        &self,
        room_id: &RoomId,
        count: usize,
    ) -> Result<Vec<TurnOutcome>, SimulationError> {
        let mut outcomes = Vec::with_capacity(count);
        for _ in 0..count {
            outcomes.push(self.advance_turn(room_id).await?);
        }
        Ok(outcomes)
    }
}

fn enter(room_id: &RoomId, phase: TurnPhase) {
    debug!(room_id = %room_id, phase = %phase, "turn phase");
}
