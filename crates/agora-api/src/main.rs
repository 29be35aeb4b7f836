//! Agora CLI and REST API entry point.
//!
//! Binary name: `agora`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{AddResource, Cli, Commands, CreateResource, DeleteResource, ListResource};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,agora_api=debug,agora_core=debug,agora_infra=debug",
        _ => "trace",
    };
    agora_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    agora_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Neither needs app state
    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(*shell, &mut cmd, "agora", &mut std::io::stdout());
            return Ok(());
        }
        Commands::List {
            resource: ListResource::Scenarios,
        } => return cli::room::list_scenarios(cli.json),
        _ => {}
    }

    let state = AppState::init().await?;
    let json = cli.json;

    match cli.command {
        Commands::Create { resource } => match resource {
            CreateResource::Room {
                name,
                scenario,
                no_seed,
            } => cli::room::create_room(&state, name, scenario, no_seed, json).await?,
        },

        Commands::Add { resource } => match resource {
            AddResource::Agent {
                room,
                name,
                role,
                goal,
            } => cli::agent::add_agent(&state, &room, name, role, goal, json).await?,
        },

        Commands::List { resource } => match resource {
            ListResource::Rooms => cli::room::list_rooms(&state, json).await?,
            ListResource::Agents { room } => cli::agent::list_agents(&state, &room, json).await?,
            ListResource::Scenarios => cli::room::list_scenarios(json)?,
        },

        Commands::Show { room, last } => cli::room::show_room(&state, &room, last, json).await?,

        Commands::Delete { resource } => match resource {
            DeleteResource::Room { room, force } => {
                cli::room::delete_room(&state, &room, force, json).await?
            }
            DeleteResource::Agent { agent, room, force } => {
                cli::agent::remove_agent(&state, &agent, room.as_deref(), force, json).await?
            }
        },

        Commands::Say { room, text, topic } => {
            cli::simulate::say(&state, &room, &text, topic, json).await?
        }

        Commands::Turn { room, count, judge } => {
            cli::simulate::turn(&state, &room, count, judge, json).await?
        }

        Commands::Judge { room } => cli::simulate::judge(&state, &room, json).await?,

        Commands::Export { room, output } => {
            cli::room::export_room(&state, &room, output.as_deref(), json).await?
        }

        Commands::Reset { room, force } => cli::room::reset_room(&state, &room, force, json).await?,

        Commands::Memories { agent, room } => {
            cli::agent::list_memories(&state, &agent, room.as_deref(), json).await?
        }

        Commands::Forget { agent, room, force } => {
            cli::agent::forget(&state, &agent, room.as_deref(), force, json).await?
        }

        Commands::Status => cli::status::status(&state, json).await?,

        Commands::Serve { port, host } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if state.ollama.health_check().await.is_none() {
                tracing::warn!(host = %state.ollama.base_url(), "Ollama is not reachable; turns will fail until it is");
            }

            println!(
                "  {} Agora API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
