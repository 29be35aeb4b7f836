//! Round-robin speaker selection.
//!
//! Selection is a pure function of the roster and the transcript. There is
//! no stored cursor, so the next speaker can always be recovered by replaying
//! a room's transcript against its current roster.

use agora_types::agent::Agent;
use agora_types::error::SimulationError;
use agora_types::id::RoomId;
use agora_types::message::Message;

/// Pick the agent that speaks next.
///
/// Finds the most recent agent-authored message and returns the agent after
/// its author in roster order, wrapping around. With no agent-authored
/// message yet, or when the last author has since left the roster, the
/// first agent speaks.
pub fn select_next<'a>(
    room_id: RoomId,
    agents: &'a [Agent],
    transcript: &[Message],
) -> Result<&'a Agent, SimulationError> {
    let Some(first) = agents.first() else {
        return Err(SimulationError::NoAgents(room_id));
    };

    let last_author = transcript.iter().rev().find_map(|m| m.agent_id);

    let Some(last_author) = last_author else {
        return Ok(first);
    };

    match agents.iter().position(|a| a.id == last_author) {
        Some(index) => Ok(&agents[(index + 1) % agents.len()]),
        None => Ok(first),
    }
}
