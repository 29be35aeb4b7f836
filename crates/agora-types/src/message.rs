//! Transcript message types.
//!
//! A room's transcript is the list of its messages ordered by `created_at`
//! (ties broken by the time-sortable id). Messages without an agent are
//! authored by a human, the system, or the judge; judge output is
//! recognised by the [`JUDGE_MARKER`] prefix rather than by a schema field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{AgentId, MessageId, RoomId};

/// Prefix marking a message body as judge commentary.
pub const JUDGE_MARKER: &str = "[JUDGE]";

/// Body prefix that sets the conversation topic for short-mode rooms.
pub const TOPIC_MARKER: &str = "TOPIC:";

/// Speaker identifier rendered for messages without an agent.
pub const ABSENT_SPEAKER: &str = "system";

/// A single message in a room's transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub room_id: RoomId,
    /// Speaking agent; `None` for human, system and judge messages.
    #[serde(default)]
    pub agent_id: Option<AgentId>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Build a new message stamped with the current time.
    pub fn new(room_id: RoomId, agent_id: Option<AgentId>, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            room_id,
            agent_id,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Identifier used when rendering the transcript into prompts.
    ///
    /// This is the raw agent id, never a display name.
    pub fn speaker_identifier(&self) -> String {
        match &self.agent_id {
            Some(id) => id.to_string(),
            None => ABSENT_SPEAKER.to_string(),
        }
    }

    /// Render as `speakerIdentifier:body`.
    pub fn render_line(&self) -> String {
        format!("{}:{}", self.speaker_identifier(), self.content)
    }

    /// Whether this message carries judge commentary.
    pub fn is_judge(&self) -> bool {
        self.agent_id.is_none() && self.content.starts_with(JUDGE_MARKER)
    }
}

/// Request to post a human/system message into a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMessageRequest {
    pub content: String,
}
