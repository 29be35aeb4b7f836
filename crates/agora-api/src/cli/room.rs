//! Room lifecycle CLI commands: create, list, show, delete, export, reset.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::{Confirm, Input, Select};

use agora_types::agent::Agent;
use agora_types::id::AgentId;
use agora_types::message::Message;
use agora_types::room::CreateRoomRequest;
use agora_types::scenario::{DEFAULT_SCENARIO, ScenarioMode, builtin_scenarios};

use super::{resolve_room, spinner};
use crate::state::AppState;

/// Create a new room via interactive wizard or one-shot flags.
///
/// # Examples
///
/// ```bash
/// # Interactive wizard
/// agora create room
///
/// # One-shot with flags
/// agora create room --name "Rent control" --scenario debate
/// ```
pub async fn create_room(
    state: &AppState,
    name: Option<String>,
    scenario: Option<String>,
    no_seed: bool,
    json: bool,
) -> Result<()> {
    let interactive = name.is_none();

    let name = match name {
        Some(n) => n,
        None => Input::<String>::new().with_prompt("Room name").interact_text()?,
    };

    let scenario = match scenario {
        Some(s) => s,
        None if interactive => {
            let catalog = builtin_scenarios();
            let items: Vec<String> = catalog
                .iter()
                .map(|s| format!("{:<18} {}", s.key, s.description))
                .collect();
            let choice = Select::new()
                .with_prompt("Scenario")
                .items(&items)
                .default(0)
                .interact()?;
            catalog[choice].key.to_string()
        }
        None => DEFAULT_SCENARIO.to_string(),
    };

    let (room, agents) = state
        .room_service
        .create_room(CreateRoomRequest {
            name,
            scenario,
            seed_agents: !no_seed,
        })
        .await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "room": room, "agents": agents }))?
        );
        return Ok(());
    }

    println!();
    println!("  {} Room created!", style("✓").green().bold());
    println!();
    println!("  {}      {}", style("Name:").bold(), style(&room.name).cyan());
    println!("  {}  {} ({})", style("Scenario:").bold(), room.scenario, room.mode());
    println!("  {}        {}", style("ID:").bold(), style(room.id.to_string()).dim());
    println!();

    if agents.is_empty() {
        println!(
            "  Add participants with: {}",
            style(format!("agora add agent \"{}\" --name ...", room.name)).yellow()
        );
    } else {
        println!("  {}", style("── Participants ──").dim());
        for agent in &agents {
            println!("    {} {} ({})", style("•").dim(), style(&agent.name).cyan(), agent.role);
        }
        println!();
        println!(
            "  Start the conversation: {}",
            style(format!("agora turn \"{}\"", room.name)).yellow()
        );
    }
    println!();

    Ok(())
}

/// List all rooms in a table, newest first.
pub async fn list_rooms(state: &AppState, json: bool) -> Result<()> {
    let rooms = state.room_service.list_rooms().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rooms)?);
        return Ok(());
    }

    if rooms.is_empty() {
        println!();
        println!(
            "  {} No rooms yet. Create one with: {}",
            style("i").blue().bold(),
            style("agora create room").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Scenario").fg(Color::White),
        Cell::new("Agents").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("Created").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);

    for room in &rooms {
        let agents = state.room_service.list_agents(&room.id).await?.len();
        let messages = state.room_service.list_messages(&room.id).await?.len();
        let scenario_cell = match room.mode() {
            ScenarioMode::Short => Cell::new(&room.scenario).fg(Color::Magenta),
            ScenarioMode::Default => Cell::new(&room.scenario),
        };

        table.add_row(vec![
            Cell::new(&room.name).fg(Color::Cyan),
            scenario_cell,
            Cell::new(agents),
            Cell::new(messages),
            Cell::new(room.created_at.format("%Y-%m-%d %H:%M")).fg(Color::DarkGrey),
            Cell::new(room.id).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} room{}",
        style(rooms.len()).bold(),
        if rooms.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// List the built-in scenario catalog.
pub fn list_scenarios(json: bool) -> Result<()> {
    let catalog = builtin_scenarios();

    if json {
        let entries: Vec<_> = catalog
            .iter()
            .map(|s| {
                serde_json::json!({
                    "key": s.key,
                    "description": s.description,
                    "mode": s.mode(),
                    "agents": s.agents,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Key").fg(Color::White),
        Cell::new("Mode").fg(Color::White),
        Cell::new("Personas").fg(Color::White),
        Cell::new("Description").fg(Color::White),
    ]);

    for scenario in catalog {
        let personas = scenario
            .agents
            .iter()
            .map(|p| p.name)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(scenario.key).fg(Color::Cyan),
            Cell::new(scenario.mode()),
            Cell::new(if personas.is_empty() { "-".to_string() } else { personas }),
            Cell::new(scenario.description),
        ]);
    }

    println!();
    println!("{table}");
    println!();

    Ok(())
}

/// Show a room's participants and transcript.
pub async fn show_room(state: &AppState, reference: &str, last: Option<usize>, json: bool) -> Result<()> {
    let room = resolve_room(state, reference).await?;
    let agents = state.room_service.list_agents(&room.id).await?;
    let transcript = state.room_service.list_messages(&room.id).await?;

    let shown = match last {
        Some(n) => &transcript[transcript.len().saturating_sub(n)..],
        None => &transcript[..],
    };

    if json {
        let detail = serde_json::json!({
            "room": room,
            "agents": agents,
            "messages": shown,
        });
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    println!();
    println!("  {}", style(&room.name).cyan().bold());
    println!(
        "  {}",
        style(format!("{} · {} mode · {} messages", room.scenario, room.mode(), transcript.len())).dim()
    );
    println!();

    println!("  {}", style("── Participants ──").dim());
    if agents.is_empty() {
        println!("  (none)");
    }
    for (index, agent) in agents.iter().enumerate() {
        println!(
            "  {}. {} {} {}",
            index + 1,
            style(&agent.name).cyan().bold(),
            style(format!("({})", agent.role)).dim(),
            agent.goal
        );
    }
    println!();

    println!("  {}", style("── Transcript ──").dim());
    if shown.is_empty() {
        println!("  (empty)");
    }
    let names = agent_names(&agents);
    for message in shown {
        print_message(message, &names);
    }
    println!();

    Ok(())
}

/// Delete a room with its agents, transcript and memories.
pub async fn delete_room(state: &AppState, reference: &str, force: bool, json: bool) -> Result<()> {
    let room = resolve_room(state, reference).await?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Permanently delete room '{}' with its agents and memories?",
                style(&room.name).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let bar = spinner(format!("Deleting {}...", room.name), "red")?;
    state.room_service.delete_room(&room.id).await?;
    bar.finish_and_clear();

    if json {
        println!("{}", serde_json::json!({ "deleted": true, "room_id": room.id }));
    } else {
        println!("  {} Room '{}' deleted.", style("✓").red().bold(), room.name);
    }

    Ok(())
}

/// Clear a room's transcript. Agents and their memories are kept.
pub async fn reset_room(state: &AppState, reference: &str, force: bool, json: bool) -> Result<()> {
    let room = resolve_room(state, reference).await?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Clear the transcript of '{}'? Agent memories are kept.",
                style(&room.name).yellow().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let removed = state.room_service.clear_transcript(&room.id).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "cleared": true, "room_id": room.id, "messages_removed": removed })
        );
    } else {
        println!(
            "  {} Cleared {} message{} from '{}'.",
            style("✓").green().bold(),
            removed,
            if removed == 1 { "" } else { "s" },
            room.name
        );
    }

    Ok(())
}

/// Export the transcript as Markdown to stdout or a file.
pub async fn export_room(state: &AppState, reference: &str, output: Option<&Path>, json: bool) -> Result<()> {
    let room = resolve_room(state, reference).await?;
    let markdown = state.room_service.export_markdown(&room.id).await?;

    match output {
        Some(path) => {
            tokio::fs::write(path, &markdown)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "exported": true, "room_id": room.id, "path": path.display().to_string() })
                );
            } else {
                println!(
                    "  {} Exported '{}' to {}",
                    style("✓").green().bold(),
                    room.name,
                    style(path.display()).cyan()
                );
            }
        }
        None => print!("{markdown}"),
    }

    Ok(())
}

pub(crate) fn agent_names(agents: &[Agent]) -> HashMap<AgentId, &str> {
    agents.iter().map(|a| (a.id, a.name.as_str())).collect()
}

/// Print one transcript entry with a styled speaker label.
pub(crate) fn print_message(message: &Message, names: &HashMap<AgentId, &str>) {
    let time = message.created_at.format("%H:%M:%S");
    let label = if message.is_judge() {
        style("Judge".to_string()).yellow().bold()
    } else {
        match message.agent_id {
            Some(id) => match names.get(&id) {
                Some(name) => style(name.to_string()).cyan().bold(),
                None => style("Former agent".to_string()).dim(),
            },
            None => style("You".to_string()).green().bold(),
        }
    };

    println!("  {} {}", label, style(time).dim());
    for line in message.content.lines() {
        println!("    {line}");
    }
}
