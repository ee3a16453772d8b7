use crate::geometry::Point;
use crate::player::PlayerId;
use crate::portal::PortalSide;
use crate::powerup::PowerupKind;

/// Observable happenings of a round step, returned to the driver for
/// logging. The simulation itself never blocks on these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundEvent {
    /// Enough players arrived; the intro frame is up.
    RoundStarted { players: usize },
    PowerupSpawned { kind: PowerupKind, position: Point },
    /// A player picked up a powerup into their empty held slot.
    PowerupCollected { player_id: PlayerId, kind: PowerupKind },
    /// A pickup consumed by a player already holding one.
    PowerupDiscarded { player_id: PlayerId, kind: PowerupKind },
    PortalDeployed {
        player_id: PlayerId,
        side: PortalSide,
        linked: bool,
    },
    PlayerDied { player_id: PlayerId },
    /// Play ended; winners flash until dead trails decay away.
    RoundEnded { winners: Vec<PlayerId> },
}
