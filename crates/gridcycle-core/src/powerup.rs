use rand::Rng;
use rand::rngs::StdRng;

use crate::color::Rgb;
use crate::config::GameConfig;
use crate::geometry::{Grid, Point};
use crate::portal::{PortalId, PortalSide};

/// Jump lasts a single boosted move.
const JUMP_DURATION_MOVES: u32 = 1;

/// The three pickup kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupKind {
    Jump,
    Speed,
    Portal,
}

impl PowerupKind {
    pub fn color(self) -> Rgb {
        match self {
            PowerupKind::Jump => Rgb::WHITE,
            PowerupKind::Speed => Rgb::GREEN,
            PowerupKind::Portal => Rgb::ORANGE,
        }
    }

    fn sample(rng: &mut StdRng) -> Self {
        match rng.random_range(0u8..3) {
            0 => PowerupKind::Jump,
            1 => PowerupKind::Speed,
            _ => PowerupKind::Portal,
        }
    }
}

/// A pickup sitting on the board. Consumed pickups stop rendering and
/// stop being collectible; the round sweeps them at the end of the tick.
#[derive(Debug, Clone)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub position: Point,
    pub consumed: bool,
}

impl Powerup {
    /// Spawn at a uniformly random cell with a uniformly random kind.
    /// Placement is not collision checked; a pickup may land on a trail
    /// or on another pickup.
    pub fn random(grid: &Grid, rng: &mut StdRng) -> Self {
        let position = Point::new(
            rng.random_range(0..grid.width),
            rng.random_range(0..grid.height),
        );
        Self {
            kind: PowerupKind::sample(rng),
            position,
            consumed: false,
        }
    }
}

/// A powerup carried by a player. One variant per kind so each carries
/// only its own state.
#[derive(Debug, Clone)]
pub enum HeldPowerup {
    Jump {
        activated: bool,
        moves_left: u32,
    },
    Speed {
        activated: bool,
        moves_left: u32,
    },
    Portal {
        primary_requested: bool,
        secondary_requested: bool,
        primary: Option<PortalId>,
        secondary: Option<PortalId>,
    },
}

impl HeldPowerup {
    pub fn new(kind: PowerupKind, config: &GameConfig) -> Self {
        match kind {
            PowerupKind::Jump => HeldPowerup::Jump {
                activated: false,
                moves_left: JUMP_DURATION_MOVES,
            },
            PowerupKind::Speed => HeldPowerup::Speed {
                activated: false,
                moves_left: config.speed_duration_moves,
            },
            PowerupKind::Portal => HeldPowerup::Portal {
                primary_requested: false,
                secondary_requested: false,
                primary: None,
                secondary: None,
            },
        }
    }

    pub fn kind(&self) -> PowerupKind {
        match self {
            HeldPowerup::Jump { .. } => PowerupKind::Jump,
            HeldPowerup::Speed { .. } => PowerupKind::Speed,
            HeldPowerup::Portal { .. } => PowerupKind::Portal,
        }
    }

    pub fn color(&self) -> Rgb {
        self.kind().color()
    }

    /// Latch an activation from the primary button. Jump and Speed have a
    /// single activation flag, so either button sets it.
    pub fn activate_primary(&mut self) {
        match self {
            HeldPowerup::Jump { activated, .. } | HeldPowerup::Speed { activated, .. } => {
                *activated = true;
            },
            HeldPowerup::Portal {
                primary_requested, ..
            } => *primary_requested = true,
        }
    }

    pub fn activate_secondary(&mut self) {
        match self {
            HeldPowerup::Jump { activated, .. } | HeldPowerup::Speed { activated, .. } => {
                *activated = true;
            },
            HeldPowerup::Portal {
                secondary_requested,
                ..
            } => *secondary_requested = true,
        }
    }

    /// Whether activating this powerup doubles the owner's moves per tick.
    pub fn grants_double_moves(&self) -> bool {
        matches!(self, HeldPowerup::Speed { .. })
    }

    /// Activated with moves still left on the clock (Jump/Speed only).
    pub fn is_running(&self) -> bool {
        match self {
            HeldPowerup::Jump {
                activated,
                moves_left,
            }
            | HeldPowerup::Speed {
                activated,
                moves_left,
            } => *activated && *moves_left > 0,
            HeldPowerup::Portal { .. } => false,
        }
    }

    /// Displacement multiplier applied while running.
    pub fn displacement_multiplier(&self, config: &GameConfig) -> i32 {
        match self {
            HeldPowerup::Jump { .. } => config.jump_distance,
            _ => 1,
        }
    }

    /// Burn one move off a running clock.
    pub fn tick_move(&mut self) {
        match self {
            HeldPowerup::Jump {
                activated,
                moves_left,
            }
            | HeldPowerup::Speed {
                activated,
                moves_left,
            } => {
                if *activated && *moves_left > 0 {
                    *moves_left -= 1;
                }
            },
            HeldPowerup::Portal { .. } => {},
        }
    }

    /// A portal side whose deployment was requested but has not happened
    /// yet. Primary wins when both are pending.
    pub fn pending_deploy(&self) -> Option<PortalSide> {
        let HeldPowerup::Portal {
            primary_requested,
            secondary_requested,
            primary,
            secondary,
        } = self
        else {
            return None;
        };
        if *primary_requested && primary.is_none() {
            Some(PortalSide::Primary)
        } else if *secondary_requested && secondary.is_none() {
            Some(PortalSide::Secondary)
        } else {
            None
        }
    }

    /// Record that a gate was placed for the given side.
    pub fn record_deploy(&mut self, side: PortalSide, id: PortalId) {
        if let HeldPowerup::Portal {
            primary, secondary, ..
        } = self
        {
            match side {
                PortalSide::Primary => *primary = Some(id),
                PortalSide::Secondary => *secondary = Some(id),
            }
        }
    }

    /// The gate already deployed on the opposite side, if any.
    pub fn deployed(&self, side: PortalSide) -> Option<PortalId> {
        match self {
            HeldPowerup::Portal {
                primary, secondary, ..
            } => match side {
                PortalSide::Primary => *primary,
                PortalSide::Secondary => *secondary,
            },
            _ => None,
        }
    }

    /// Spent powerups are dropped from the held slot during resolution.
    pub fn is_exhausted(&self) -> bool {
        match self {
            HeldPowerup::Jump {
                activated,
                moves_left,
            }
            | HeldPowerup::Speed {
                activated,
                moves_left,
            } => *activated && *moves_left == 0,
            HeldPowerup::Portal {
                primary, secondary, ..
            } => primary.is_some() && secondary.is_some(),
        }
    }
}
