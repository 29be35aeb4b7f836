//! Agent CLI commands: add, list, remove, memories, forget.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::{Confirm, Input};

use agora_types::agent::CreateAgentRequest;

use super::{resolve_agent, resolve_room, spinner};
use crate::state::AppState;

/// Add an agent to a room, prompting for any missing field.
pub async fn add_agent(
    state: &AppState,
    room: &str,
    name: Option<String>,
    role: Option<String>,
    goal: Option<String>,
    json: bool,
) -> Result<()> {
    let room = resolve_room(state, room).await?;

    let name = match name {
        Some(n) => n,
        None => Input::<String>::new().with_prompt("Agent name").interact_text()?,
    };
    let role = match role {
        Some(r) => r,
        None => Input::<String>::new()
            .with_prompt("Role")
            .default("Participant".to_string())
            .interact_text()?,
    };
    let goal = match goal {
        Some(g) => g,
        None => Input::<String>::new().with_prompt("Goal").interact_text()?,
    };

    let agent = state
        .room_service
        .add_agent(&room.id, CreateAgentRequest { name, role, goal })
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&agent)?);
        return Ok(());
    }

    let position = state.room_service.list_agents(&room.id).await?.len();
    println!();
    println!(
        "  {} {} joined '{}' as speaker #{}",
        style("✓").green().bold(),
        style(&agent.name).cyan().bold(),
        room.name,
        position
    );
    println!("  {}", style(agent.id.to_string()).dim());
    println!();

    Ok(())
}

/// List a room's agents in speaking order with memory counts.
pub async fn list_agents(state: &AppState, room: &str, json: bool) -> Result<()> {
    let room = resolve_room(state, room).await?;
    let agents = state.room_service.list_agents(&room.id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&agents)?);
        return Ok(());
    }

    if agents.is_empty() {
        println!();
        println!(
            "  {} '{}' has no agents. Add one with: {}",
            style("i").blue().bold(),
            room.name,
            style(format!("agora add agent \"{}\"", room.name)).yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Goal").fg(Color::White),
        Cell::new("Memories").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);

    for (index, agent) in agents.iter().enumerate() {
        let memories = state.room_service.memory_count(&agent.id).await?;
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&agent.name).fg(Color::Cyan),
            Cell::new(&agent.role),
            Cell::new(&agent.goal),
            Cell::new(memories),
            Cell::new(agent.id).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();

    Ok(())
}

/// Remove an agent from its room and wipe its memories.
pub async fn remove_agent(
    state: &AppState,
    reference: &str,
    room: Option<&str>,
    force: bool,
    json: bool,
) -> Result<()> {
    let agent = resolve_agent(state, reference, room).await?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove agent '{}' and wipe its memories? Its messages stay in the transcript.",
                style(&agent.name).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let removed = state.room_service.remove_agent(&agent.id).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "deleted": true, "agent_id": removed.id, "name": removed.name })
        );
    } else {
        println!("  {} Agent '{}' removed.", style("✓").red().bold(), removed.name);
    }

    Ok(())
}

/// Browse an agent's memories, newest first.
pub async fn list_memories(state: &AppState, reference: &str, room: Option<&str>, json: bool) -> Result<()> {
    let agent = resolve_agent(state, reference, room).await?;
    let items = state.memory_store.list_items(&agent.id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!();
        println!(
            "  {} {} has no memories yet.",
            style("i").blue().bold(),
            style(&agent.name).cyan()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("When").fg(Color::White),
        Cell::new("Memory").fg(Color::White),
        Cell::new("Model").fg(Color::White),
    ]);

    for item in &items {
        table.add_row(vec![
            Cell::new(item.created_at.format("%Y-%m-%d %H:%M:%S")).fg(Color::DarkGrey),
            Cell::new(&item.content),
            Cell::new(&item.embedding_model).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("  {} memories of {}", style(items.len()).bold(), style(&agent.name).cyan().bold());
    println!("{table}");
    println!();

    Ok(())
}

/// Wipe all memories of an agent.
pub async fn forget(
    state: &AppState,
    reference: &str,
    room: Option<&str>,
    force: bool,
    json: bool,
) -> Result<()> {
    let agent = resolve_agent(state, reference, room).await?;

    if !force && !json {
        let count = state.room_service.memory_count(&agent.id).await?;
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Wipe {} memor{} of '{}'?",
                count,
                if count == 1 { "y" } else { "ies" },
                style(&agent.name).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let bar = spinner(format!("Wiping memories of {}...", agent.name), "red")?;
    let removed = state.room_service.wipe_agent_memory(&agent.id).await?;
    bar.finish_and_clear();

    if json {
        println!(
            "{}",
            serde_json::json!({ "wiped": true, "agent_id": agent.id, "memories_removed": removed })
        );
    } else {
        println!(
            "  {} Wiped {} memor{} of '{}'.",
            style("✓").green().bold(),
            removed,
            if removed == 1 { "y" } else { "ies" },
            agent.name
        );
    }

    Ok(())
}
