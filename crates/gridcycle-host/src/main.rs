use tracing_subscriber::EnvFilter;

use gridcycle_core::config::GameConfig;
use gridcycle_core::round::Round;

use gridcycle_host::registration::{EnvRegistrar, Registrar};
use gridcycle_host::session::{SessionCommand, SessionSinks, spawn_session};
use gridcycle_host::sinks::{TraceFrame, TraceIndicators, TraceText};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = GameConfig::load();
    if let Err(err) = config.validate() {
        tracing::error!(error = %err, "Invalid configuration");
        std::process::exit(1);
    }
    tracing::info!(
        width = config.grid_width,
        height = config.grid_height,
        min_players = config.min_players,
        "gridcycle host starting"
    );

    let sinks = SessionSinks {
        frame: Box::new(TraceFrame::new(&config)),
        indicators: Box::new(TraceIndicators),
        text: Box::new(TraceText),
    };
    let (commands, events, session) = spawn_session(Round::new(config), sinks);
    // Events are logged inside the session; no other consumer here.
    drop(events);

    match EnvRegistrar::default().register() {
        Ok(players) => {
            if !players.is_empty() {
                tracing::info!(count = players.len(), "Replaying registered roster");
                let _ = commands.send(SessionCommand::Register { players });
            }
        },
        Err(err) => {
            tracing::error!(error = %err, "Registration failed, starting with an empty roster");
        },
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down"),
        Err(err) => tracing::error!(error = %err, "Failed to listen for shutdown signal"),
    }
    let _ = commands.send(SessionCommand::Stop);
    let _ = session.await;
}
