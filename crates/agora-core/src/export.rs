//! Markdown transcript export.

use std::collections::HashMap;
use std::fmt::Write;

use agora_types::agent::Agent;
use agora_types::message::{JUDGE_MARKER, Message};
use agora_types::room::Room;

/// Render a room transcript as Markdown.
///
/// Agent messages are labeled with the agent's name, judge commentary with
/// `Judge` (marker stripped), and everything else with `System`. Messages
/// from agents no longer on the roster are labeled `Former agent`.
pub fn render_markdown(room: &Room, agents: &[Agent], transcript: &[Message]) -> String {
    let names: HashMap<_, _> = agents.iter().map(|a| (a.id, a.name.as_str())).collect();

    let mut out = String::new();
    let _ = writeln!(out, "# {}", room.name);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "_Scenario: {} | Created: {}_",
        room.scenario,
        room.created_at.format("%Y-%m-%d %H:%M UTC")
    );

    if !agents.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Participants");
        let _ = writeln!(out);
        for agent in agents {
            let _ = writeln!(out, "- **{}** ({}): {}", agent.name, agent.role, agent.goal);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## Transcript");

    for message in transcript {
        let (label, body) = if message.is_judge() {
            (
                "Judge",
                message.content.trim_start_matches(JUDGE_MARKER).trim_start(),
            )
        } else {
            let label = match message.agent_id {
                Some(id) => names.get(&id).copied().unwrap_or("Former agent"),
                None => "System",
            };
            (label, message.content.as_str())
        };

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "**{label}** _{}_",
            message.created_at.format("%H:%M:%S")
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "{body}");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::id::{AgentId, RoomId};
    use chrono::Utc;

    #[test]
    fn test_labels_agents_judge_and_system() {
        let room = Room {
            id: RoomId::new(),
            name: "UBI debate".to_string(),
            scenario: "debate".to_string(),
            created_at: Utc::now(),
        };
        let alex = Agent {
            id: AgentId::new(),
            room_id: room.id,
            name: "Alex".to_string(),
            role: "Pro side".to_string(),
            goal: "Argue in favor of the topic.".to_string(),
        };
        let transcript = vec![
            Message::new(room.id, None, "TOPIC: UBI"),
            Message::new(room.id, Some(alex.id), "It works."),
            Message::new(room.id, None, "[JUDGE] Thin argument. Score: 4"),
            Message::new(room.id, Some(AgentId::new()), "I left."),
        ];

        let md = render_markdown(&room, &[alex], &transcript);

        assert!(md.starts_with("# UBI debate\n"));
        assert!(md.contains("_Scenario: debate"));
        assert!(md.contains("- **Alex** (Pro side): Argue in favor of the topic."));
        assert!(md.contains("**System**"));
        assert!(md.contains("TOPIC: UBI"));
        assert!(md.contains("**Alex**"));
        assert!(md.contains("**Judge**"));
        assert!(md.contains("\nThin argument. Score: 4\n"));
        assert!(!md.contains("[JUDGE]"));
        assert!(md.contains("**Former agent**"));
    }
}
