//! System status dashboard command.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Display system status: rooms, backend reachability and configuration.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let rooms = state.room_service.list_rooms().await?;
    let mut agents = 0;
    let mut messages = 0;
    for room in &rooms {
        agents += state.room_service.list_agents(&room.id).await?.len();
        messages += state.room_service.list_messages(&room.id).await?.len();
    }

    let ollama_version = state.ollama.health_check().await;
    let config = &state.config;

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "rooms": rooms.len(),
            "agents": agents,
            "messages": messages,
            "ollama": {
                "host": state.ollama.base_url(),
                "model": state.ollama.model(),
                "embedding_model": config.ollama.embedding_model,
                "reachable": ollama_version.is_some(),
                "version": ollama_version,
            },
            "history_window": config.history_window,
            "judge_window": config.judge_window,
            "recall_top_k": config.recall_top_k,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!("  {} Agora v{}", style("⚡").bold(), env!("CARGO_PKG_VERSION"));
    println!();

    println!("  {}", style("── Rooms ──").dim());
    println!("  Rooms:    {}", style(rooms.len()).bold());
    println!("  Agents:   {}", agents);
    println!("  Messages: {}", messages);
    println!();

    println!("  {}", style("── Backend ──").dim());
    match &ollama_version {
        Some(version) => println!(
            "  Ollama:    {} {}",
            style("● reachable").green(),
            style(format!("v{version}")).dim()
        ),
        None => println!(
            "  Ollama:    {} {}",
            style("○ unreachable").red(),
            style("(is `ollama serve` running?)").dim()
        ),
    }
    println!("  Host:      {}", style(state.ollama.base_url()).dim());
    println!("  Model:     {}", style(state.ollama.model()).cyan());
    println!("  Embedding: {}", style(&config.ollama.embedding_model).cyan());
    println!();

    println!("  {}", style("── Turns ──").dim());
    println!("  History window: {}", config.history_window);
    println!("  Judge window:   {}", config.judge_window);
    println!("  Recall top-k:   {}", config.recall_top_k);
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!("  Database: {}", style("SQLite (WAL mode)").dim());
    println!();

    Ok(())
}
