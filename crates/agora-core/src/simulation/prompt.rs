//! Turn prompt builder.
//!
//! Assembles the system preamble and user prompt for one agent turn from the
//! persona, the room's scenario mode, a window over the transcript and the
//! memories recalled for the speaker.
//!
//! Layout of the user prompt:
//! ```text
//! Topic: {topic}                  (short mode only)
//!
//! {memory section}
//!
//! Conversation so far:
//! {windowed transcript}
//!
//! Your turn:
//! ```

use agora_types::agent::Agent;
use agora_types::config::{AgoraConfig, GenerationConfig};
use agora_types::llm::GenerationOptions;
use agora_types::message::{Message, TOPIC_MARKER};
use agora_types::room::Room;
use agora_types::scenario::ScenarioMode;

/// Heading placed above recalled memories.
pub const MEMORY_HEADING: &str = "Relevant past memories:";

/// Memory section used when nothing was recalled.
pub const NO_MEMORIES_SENTINEL: &str = "No relevant past memories.";

/// Topic used by short-mode prompts when the transcript sets none.
pub const DEFAULT_TOPIC: &str = "argue generally, avoid ad hominem";

const PERSONA_TEMPLATE: &str =
    "You are {name}, a {role}. Your goal: {goal}. Stay concise and in-character.";

const SHORT_CONSTRAINTS: &str = "Reply with exactly one sentence of at most 18 words. \
State a claim and a reason. Directly address your opponent's last point. \
No lists, no preambles, no meta-commentary, no insults.";

/// Per-mode template descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTemplate {
    /// Extra instructions appended to the persona line.
    pub constraints: Option<&'static str>,
    /// Whether the topic line leads the user prompt.
    pub include_topic: bool,
}

impl ModeTemplate {
    pub fn for_mode(mode: ScenarioMode) -> Self {
        match mode {
            ScenarioMode::Default => Self {
                constraints: None,
                include_topic: false,
            },
            ScenarioMode::Short => Self {
                constraints: Some(SHORT_CONSTRAINTS),
                include_topic: true,
            },
        }
    }

    /// Render the system preamble for `agent`.
    pub fn system_text(&self, agent: &Agent) -> String {
        let persona = PERSONA_TEMPLATE
            .replace("{name}", &agent.name)
            .replace("{role}", &agent.role)
            .replace("{goal}", &agent.goal);
        match self.constraints {
            Some(constraints) => format!("{persona}\n{constraints}"),
            None => persona,
        }
    }
}

/// Output of [`PromptBuilder::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltPrompt {
    pub system: String,
    pub prompt: String,
    pub options: GenerationOptions,
    pub mode: ScenarioMode,
}

/// Builds turn prompts. Holds only configuration, so one builder serves
/// every room.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    history_window: usize,
    generation: GenerationConfig,
}

impl PromptBuilder {
    pub fn new(history_window: usize, generation: GenerationConfig) -> Self {
        Self {
            history_window,
            generation,
        }
    }

    pub fn from_config(config: &AgoraConfig) -> Self {
        Self::new(config.history_window, config.generation.clone())
    }

    /// The most recent `history_window` messages, oldest first.
    pub fn window<'a>(&self, transcript: &'a [Message]) -> &'a [Message] {
        let start = transcript.len().saturating_sub(self.history_window);
        &transcript[start..]
    }

    /// The windowed transcript rendered one `speaker:body` line per message.
    ///
    /// Also used as the memory recall query.
    pub fn history_text(&self, transcript: &[Message]) -> String {
        self.window(transcript)
            .iter()
            .map(Message::render_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn build(
        &self,
        agent: &Agent,
        room: &Room,
        transcript: &[Message],
        recalled: &[String],
    ) -> BuiltPrompt {
        let mode = room.mode();
        let template = ModeTemplate::for_mode(mode);

        let mut prompt = String::new();
        if template.include_topic {
            prompt.push_str("Topic: ");
            prompt.push_str(&extract_topic(transcript));
            prompt.push_str("\n\n");
        }
        prompt.push_str(&memory_section(recalled));
        prompt.push_str("\n\nConversation so far:\n");
        prompt.push_str(&self.history_text(transcript));
        prompt.push_str("\n\nYour turn:");

        BuiltPrompt {
            system: template.system_text(agent),
            prompt,
            options: self.generation.for_mode(mode),
            mode,
        }
    }
}

/// Topic from the first `TOPIC:` message of the full transcript, or
/// [`DEFAULT_TOPIC`] when there is none or it is blank.
pub fn extract_topic(transcript: &[Message]) -> String {
    transcript
        .iter()
        .find_map(|m| m.content.strip_prefix(TOPIC_MARKER))
        .map(str::trim)
        .filter(|topic| !topic.is_empty())
        .unwrap_or(DEFAULT_TOPIC)
        .to_string()
}

/// Recalled memories under [`MEMORY_HEADING`], or [`NO_MEMORIES_SENTINEL`].
pub fn memory_section(recalled: &[String]) -> String {
    if recalled.is_empty() {
        NO_MEMORIES_SENTINEL.to_string()
    } else {
        format!("{MEMORY_HEADING}\n{}", recalled.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::id::{AgentId, RoomId};
    use chrono::Utc;

    fn room(scenario: &str) -> Room {
        Room {
            id: RoomId::new(),
            name: "Test room".to_string(),
            scenario: scenario.to_string(),
            created_at: Utc::now(),
        }
    }

    fn agent(room: &Room, name: &str, role: &str) -> Agent {
        Agent {
            id: AgentId::new(),
            room_id: room.id,
            name: name.to_string(),
            role: role.to_string(),
            goal: "Win.".to_string(),
        }
    }

    fn builder() -> PromptBuilder {
        PromptBuilder::from_config(&AgoraConfig::default())
    }

    #[test]
    fn test_default_system_template() {
        let room = room("debate");
        let alex = agent(&room, "Alex", "Pro side");
        let built = builder().build(&alex, &room, &[], &[]);
        assert_eq!(
            built.system,
            "You are Alex, a Pro side. Your goal: Win.. Stay concise and in-character."
        );
        assert_eq!(built.mode, ScenarioMode::Default);
    }

    #[test]
    fn test_short_system_template_adds_constraints() {
        let room = room("argument_short");
        let riley = agent(&room, "Riley", "Arguer A");
        let built = builder().build(&riley, &room, &[], &[]);
        assert!(built.system.starts_with("You are Riley, a Arguer A."));
        assert!(built.system.contains("at most 18 words"));
        assert!(built.system.contains("no insults"));
        assert_eq!(built.mode, ScenarioMode::Short);
    }

    #[test]
    fn test_window_keeps_last_twelve_of_twenty() {
        let room = room("debate");
        let alex = agent(&room, "Alex", "Pro side");
        let transcript: Vec<Message> = (0..20)
            .map(|i| Message::new(room.id, Some(alex.id), format!("msg-{i:02}")))
            .collect();

        let built = builder().build(&alex, &room, &transcript, &[]);

        for i in 0..8 {
            assert!(!built.prompt.contains(&format!("msg-{i:02}")), "msg-{i:02} leaked");
        }
        for i in 8..20 {
            assert!(built.prompt.contains(&format!("{}:msg-{i:02}", alex.id)));
        }
        assert_eq!(builder().window(&transcript).len(), 12);
    }

    #[test]
    fn test_absent_speaker_rendered_as_system() {
        let room = room("debate");
        let alex = agent(&room, "Alex", "Pro side");
        let transcript = vec![Message::new(room.id, None, "Please begin.")];
        let built = builder().build(&alex, &room, &transcript, &[]);
        assert!(built.prompt.contains("Conversation so far:\nsystem:Please begin.\n\nYour turn:"));
    }

    #[test]
    fn test_topic_in_short_mode() {
        let room = room("argument_short");
        let riley = agent(&room, "Riley", "Arguer A");
        let mut transcript: Vec<Message> = (0..15)
            .map(|i| Message::new(room.id, Some(riley.id), format!("point {i}")))
            .collect();
        transcript.insert(0, Message::new(room.id, None, "TOPIC: Universal basic income"));

        let built = builder().build(&riley, &room, &transcript, &[]);
        assert!(built.prompt.starts_with("Topic: Universal basic income\n\n"));
    }

    #[test]
    fn test_topic_placeholder_when_missing() {
        let room = room("argument_short");
        let riley = agent(&room, "Riley", "Arguer A");
        let built = builder().build(&riley, &room, &[], &[]);
        assert!(built.prompt.starts_with("Topic: argue generally, avoid ad hominem\n\n"));

        let blank = vec![Message::new(room.id, None, "TOPIC:   ")];
        assert_eq!(extract_topic(&blank), DEFAULT_TOPIC);
    }

    #[test]
    fn test_topic_omitted_in_default_mode() {
        let room = room("debate");
        let alex = agent(&room, "Alex", "Pro side");
        let transcript = vec![Message::new(room.id, None, "TOPIC: Universal basic income")];
        let built = builder().build(&alex, &room, &transcript, &[]);
        assert!(!built.prompt.contains("Topic:"));
        assert!(built.prompt.starts_with(NO_MEMORIES_SENTINEL));
    }

    #[test]
    fn test_memory_sentinel_when_nothing_recalled() {
        let room = room("debate");
        let alex = agent(&room, "Alex", "Pro side");
        let built = builder().build(&alex, &room, &[], &[]);
        assert!(built.prompt.contains("No relevant past memories."));
        assert!(!built.prompt.contains(MEMORY_HEADING));
    }

    #[test]
    fn test_memory_section_lists_recalled() {
        let recalled = vec!["UBI reduces poverty".to_string(), "Pilots in Finland".to_string()];
        assert_eq!(
            memory_section(&recalled),
            "Relevant past memories:\nUBI reduces poverty\nPilots in Finland"
        );
    }

    #[test]
    fn test_options_follow_mode() {
        let short_room = room("argument_short");
        let long_room = room("story_writing");
        let a = agent(&short_room, "Riley", "Arguer A");

        let short = builder().build(&a, &short_room, &[], &[]).options;
        assert_eq!(short.max_output_tokens, 60);
        assert!((short.temperature - 0.9).abs() < f64::EPSILON);

        let long = builder().build(&a, &long_room, &[], &[]).options;
        assert_eq!(long.max_output_tokens, 256);
        assert!((long.temperature - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_scenario_uses_default_family() {
        let room = room("no_such_scenario");
        let a = agent(&room, "Sam", "Guest");
        let built = builder().build(&a, &room, &[], &[]);
        assert_eq!(built.mode, ScenarioMode::Default);
        assert_eq!(built.options.max_output_tokens, 256);
    }
}
