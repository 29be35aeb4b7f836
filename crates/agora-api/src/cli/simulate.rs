//! Conversation CLI commands: say, turn, judge.

use anyhow::{Result, bail};
use console::style;

use agora_types::error::MemoryDegradation;
use agora_types::message::{CreateMessageRequest, TOPIC_MARKER};

use super::room::{agent_names, print_message};
use super::{resolve_room, spinner};
use crate::state::AppState;

/// Body posted by `agora say`, with the topic marker when requested.
fn say_body(text: &[String], topic: bool) -> String {
    let joined = text.join(" ");
    if topic {
        format!("{TOPIC_MARKER} {}", joined.trim())
    } else {
        joined
    }
}

/// Post a human message into a room.
pub async fn say(state: &AppState, room: &str, text: &[String], topic: bool, json: bool) -> Result<()> {
    let room = resolve_room(state, room).await?;

    let message = {
        let _guard = state.turn_locks.acquire(&room.id).await;
        state
            .room_service
            .post_message(
                &room.id,
                CreateMessageRequest {
                    content: say_body(text, topic),
                },
            )
            .await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&message)?);
        return Ok(());
    }

    println!();
    print_message(&message, &Default::default());
    println!();

    Ok(())
}

/// Run `count` turns, printing each reply as it lands.
pub async fn turn(state: &AppState, room: &str, count: usize, judge: bool, json: bool) -> Result<()> {
    if count == 0 {
        bail!("--count must be at least 1");
    }

    let room = resolve_room(state, room).await?;
    let agents = state.room_service.list_agents(&room.id).await?;
    let names = agent_names(&agents);

    let _guard = state.turn_locks.acquire(&room.id).await;

    let mut outcomes = Vec::with_capacity(count);
    for index in 0..count {
        let bar = spinner(
            format!("Turn {}/{} in '{}'...", index + 1, count, room.name),
            "cyan",
        )?;
        let outcome = state.orchestrator.advance_turn(&room.id).await;
        bar.finish_and_clear();
        let outcome = outcome?;

        if !json {
            print_message(&outcome.message, &names);
            for degradation in &outcome.degradations {
                let note = match degradation {
                    MemoryDegradation::RecallDegraded { reason, .. } => format!("memory recall skipped: {reason}"),
                    MemoryDegradation::WriteDegraded { reason, .. } => format!("reply not memorized: {reason}"),
                };
                println!("    {} {}", style("!").yellow().bold(), style(note).yellow());
            }
        }
        outcomes.push(outcome);
    }

    let verdict = if judge {
        let bar = spinner("The judge is deliberating...", "yellow")?;
        let verdict = state.orchestrator.judge_last_turn(&room.id).await;
        bar.finish_and_clear();
        let verdict = verdict?;
        if !json {
            print_message(&verdict, &names);
        }
        Some(verdict)
    } else {
        None
    };

    if json {
        let report = serde_json::json!({ "turns": outcomes, "judge": verdict });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
    }

    Ok(())
}

/// Append judge commentary on the latest turn.
pub async fn judge(state: &AppState, room: &str, json: bool) -> Result<()> {
    let room = resolve_room(state, room).await?;

    let bar = spinner("The judge is deliberating...", "yellow")?;
    let verdict = {
        let _guard = state.turn_locks.acquire(&room.id).await;
        state.orchestrator.judge_last_turn(&room.id).await
    };
    bar.finish_and_clear();
    let verdict = verdict?;

    if json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
        return Ok(());
    }

    println!();
    print_message(&verdict, &Default::default());
    println!();

    Ok(())
}
