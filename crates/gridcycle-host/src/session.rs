//! The session tick loop. One tokio task owns the round and its sinks;
//! transports talk to it over a command channel.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use gridcycle_core::PlayerId;
use gridcycle_core::events::RoundEvent;
use gridcycle_core::input::Button;
use gridcycle_core::round::Round;
use gridcycle_core::sink::{FrameSink, IndicatorSink, RoundIo, TextSink};

/// Commands sent from transports to the session tick loop.
#[derive(Debug)]
pub enum SessionCommand {
    Button {
        player_id: PlayerId,
        button: Button,
    },
    Join {
        player_id: PlayerId,
    },
    Leave {
        player_id: PlayerId,
    },
    /// Replay of an already-joined roster, applied as idempotent joins.
    Register {
        players: Vec<PlayerId>,
    },
    Stop,
}

/// The output sinks a session presents through, owned by the session task.
pub struct SessionSinks {
    pub frame: Box<dyn FrameSink + Send>,
    pub indicators: Box<dyn IndicatorSink + Send>,
    pub text: Box<dyn TextSink + Send>,
}

impl SessionSinks {
    fn io(&mut self) -> RoundIo<'_> {
        RoundIo {
            frame: &mut *self.frame,
            indicators: &mut *self.indicators,
            text: &mut *self.text,
        }
    }
}

/// Spawn the session tick loop as a tokio task.
/// Returns the command sender, the event receiver, and the task handle.
pub fn spawn_session(
    round: Round,
    sinks: SessionSinks,
) -> (
    mpsc::UnboundedSender<SessionCommand>,
    mpsc::UnboundedReceiver<RoundEvent>,
    JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(async move {
        run_session(round, sinks, cmd_rx, event_tx).await;
    });
    (cmd_tx, event_rx, handle)
}

/// Drive the round forever: apply commands until the tick deadline, run
/// the tick, publish its events, repeat. Commands never land mid-tick.
async fn run_session(
    mut round: Round,
    mut sinks: SessionSinks,
    mut cmd_rx: mpsc::UnboundedReceiver<SessionCommand>,
    event_tx: mpsc::UnboundedSender<RoundEvent>,
) {
    let mut deadline = Instant::now();
    loop {
        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(SessionCommand::Button { player_id, button }) => {
                            round.handle_button(player_id, button);
                        },
                        Some(SessionCommand::Join { player_id }) => {
                            round.join(player_id, &mut sinks.io());
                        },
                        Some(SessionCommand::Register { players }) => {
                            for player_id in players {
                                round.join(player_id, &mut sinks.io());
                            }
                        },
                        Some(SessionCommand::Leave { player_id }) => {
                            round.leave(player_id);
                        },
                        Some(SessionCommand::Stop) | None => {
                            tracing::info!("Session stopping");
                            return;
                        },
                    }
                }
                _ = tokio::time::sleep_until(deadline) => break,
            }
        }

        let outcome = round.tick(&mut sinks.io());
        for event in outcome.events {
            log_event(&event);
            let _ = event_tx.send(event);
        }
        deadline = Instant::now() + outcome.delay;
    }
}

fn log_event(event: &RoundEvent) {
    match event {
        RoundEvent::PowerupSpawned { kind, position } => {
            tracing::debug!(?kind, ?position, "Powerup spawned");
        },
        RoundEvent::PowerupCollected { player_id, kind } => {
            tracing::debug!(player_id, ?kind, "Powerup collected");
        },
        RoundEvent::PowerupDiscarded { player_id, kind } => {
            tracing::debug!(player_id, ?kind, "Powerup discarded");
        },
        RoundEvent::PortalDeployed {
            player_id,
            side,
            linked,
        } => {
            tracing::debug!(player_id, ?side, linked, "Portal gate deployed");
        },
        RoundEvent::PlayerDied { player_id } => {
            tracing::debug!(player_id, "Player crashed");
        },
        // The round INFO-logs its own phase transitions.
        RoundEvent::RoundStarted { .. } | RoundEvent::RoundEnded { .. } => {},
    }
}
