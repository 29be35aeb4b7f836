//! CLI command definitions and dispatch for the `agora` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a verb-noun
//! pattern (e.g., `agora create room`, `agora list agents <room>`).

pub mod agent;
pub mod room;
pub mod simulate;
pub mod status;

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};

use agora_types::agent::Agent;
use agora_types::room::Room;

use crate::state::AppState;

/// Run multi-agent conversations against a local model.
#[derive(Parser)]
#[command(name = "agora", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new resource.
    Create {
        #[command(subcommand)]
        resource: CreateResource,
    },

    /// Add a resource to a room.
    Add {
        #[command(subcommand)]
        resource: AddResource,
    },

    /// List resources.
    #[command(alias = "ls")]
    List {
        #[command(subcommand)]
        resource: ListResource,
    },

    /// Show a room: participants and transcript.
    Show {
        /// Room id or name.
        room: String,

        /// Only show the last N messages.
        #[arg(long)]
        last: Option<usize>,
    },

    /// Delete a resource.
    #[command(alias = "rm", visible_alias = "remove")]
    Delete {
        #[command(subcommand)]
        resource: DeleteResource,
    },

    /// Post a message into a room as the human participant.
    Say {
        /// Room id or name.
        room: String,

        /// Message text.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Set the conversation topic (prefixes the message with `TOPIC:`).
        #[arg(long)]
        topic: bool,
    },

    /// Let the next agent(s) speak.
    Turn {
        /// Room id or name.
        room: String,

        /// Number of turns to run.
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Ask the judge to evaluate the last turn afterwards.
        #[arg(long)]
        judge: bool,
    },

    /// Ask the judge to evaluate the latest turn.
    Judge {
        /// Room id or name.
        room: String,
    },

    /// Export a room transcript as Markdown.
    Export {
        /// Room id or name.
        room: String,

        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Clear a room's transcript (agents and memories are kept).
    Reset {
        /// Room id or name.
        room: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Browse an agent's memories.
    Memories {
        /// Agent id or name.
        agent: String,

        /// Room id or name, to disambiguate agent names.
        #[arg(long)]
        room: Option<String>,
    },

    /// Wipe all memories for an agent.
    Forget {
        /// Agent id or name.
        agent: String,

        /// Room id or name, to disambiguate agent names.
        #[arg(long)]
        room: Option<String>,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// System status: data directory, model and backend reachability.
    Status,

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CreateResource {
    /// Create a new room.
    Room {
        /// Room name (skips the interactive wizard if provided).
        #[arg(long)]
        name: Option<String>,

        /// Scenario key (see `agora list scenarios`).
        #[arg(long)]
        scenario: Option<String>,

        /// Do not seed the scenario's personas.
        #[arg(long)]
        no_seed: bool,
    },
}

#[derive(Subcommand)]
pub enum AddResource {
    /// Add an agent at the end of a room's speaking order.
    Agent {
        /// Room id or name.
        room: String,

        /// Agent name.
        #[arg(long)]
        name: Option<String>,

        /// Free-text role.
        #[arg(long)]
        role: Option<String>,

        /// Free-text goal.
        #[arg(long)]
        goal: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ListResource {
    /// List all rooms.
    Rooms,

    /// List agents of a room in speaking order.
    Agents {
        /// Room id or name.
        room: String,
    },

    /// List built-in scenarios.
    Scenarios,
}

#[derive(Subcommand)]
pub enum DeleteResource {
    /// Delete a room with its agents, transcript and memories.
    Room {
        /// Room id or name.
        room: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Remove an agent and wipe its memories.
    Agent {
        /// Agent id or name.
        agent: String,

        /// Room id or name, to disambiguate agent names.
        #[arg(long)]
        room: Option<String>,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

/// Steady-ticking spinner for long operations.
pub(crate) fn spinner(message: impl Into<String>, color: &str) -> Result<ProgressBar> {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner().template(&format!("{{spinner:.{color}}} {{msg}}"))?);
    bar.set_message(message.into());
    bar.enable_steady_tick(std::time::Duration::from_millis(80));
    Ok(bar)
}

/// Pick the one candidate whose id or (case-insensitive) name matches.
///
/// A full id always wins. Name matches must be unique.
fn pick_unique<'a, T>(
    candidates: &'a [T],
    reference: &str,
    kind: &str,
    id_of: impl Fn(&T) -> String,
    name_of: impl Fn(&T) -> &str,
) -> Result<&'a T> {
    let reference = reference.trim();
    if let Some(found) = candidates.iter().find(|c| id_of(c) == reference) {
        return Ok(found);
    }

    let matches: Vec<&T> = candidates
        .iter()
        .filter(|c| name_of(c).eq_ignore_ascii_case(reference))
        .collect();

    match matches.as_slice() {
        [one] => Ok(*one),
        [] => bail!("no {kind} matches '{reference}'"),
        many => bail!(
            "'{reference}' matches {} {kind}s; use the id instead",
            many.len()
        ),
    }
}

/// Resolve a room by id or name.
pub(crate) async fn resolve_room(state: &AppState, reference: &str) -> Result<Room> {
    let rooms = state.room_service.list_rooms().await?;
    Ok(pick_unique(&rooms, reference, "room", |r| r.id.to_string(), |r| r.name.as_str())?.clone())
}

/// Resolve an agent by id or name, optionally within one room.
pub(crate) async fn resolve_agent(state: &AppState, reference: &str, room: Option<&str>) -> Result<Agent> {
    let rooms = match room {
        Some(room) => vec![resolve_room(state, room).await?],
        None => state.room_service.list_rooms().await?,
    };

    let mut agents = Vec::new();
    for room in &rooms {
        agents.extend(state.room_service.list_agents(&room.id).await?);
    }
    Ok(pick_unique(&agents, reference, "agent", |a| a.id.to_string(), |a| a.name.as_str())?.clone())
}
