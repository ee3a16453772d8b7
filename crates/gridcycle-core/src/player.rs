use rand::Rng;
use rand::rngs::StdRng;

use crate::color::Rgb;
use crate::config::GameConfig;
use crate::geometry::{Direction, Grid, Point};
use crate::powerup::HeldPowerup;
use crate::trail::Trail;

/// External identity of a player (the badge id on the wire).
pub type PlayerId = u64;

/// Indicator brightness while alive; dead players go dark.
const ALIVE_BRIGHTNESS: f32 = 0.1;

/// A cycle on the grid plus the per-player plumbing around it: held
/// powerup, indicator brightness, and win/play counters that survive
/// round resets.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub color: Rgb,
    pub direction: Direction,
    pub moves_per_tick: u32,
    pub invincible: bool,
    pub alive: bool,
    pub brightness: f32,
    pub wins: u32,
    pub plays: u32,
    pub trail: Trail,
    pub held: Option<HeldPowerup>,
    turned_this_tick: bool,
    decay_chunk: usize,
}

impl Player {
    /// Spawn at a random cell, facing away from the nearer vertical edge.
    /// Spawns are not collision checked; a fresh trail is a single cell.
    pub fn spawn(
        id: PlayerId,
        color: Rgb,
        grid: &Grid,
        config: &GameConfig,
        rng: &mut StdRng,
    ) -> Self {
        let mut player = Self {
            id,
            color,
            direction: Direction::Right,
            moves_per_tick: 1,
            invincible: false,
            alive: true,
            brightness: ALIVE_BRIGHTNESS,
            wins: 0,
            plays: 0,
            trail: Trail::new(config.trail_cap),
            held: None,
            turned_this_tick: false,
            decay_chunk: 0,
        };
        player.place(grid, config, rng);
        player
    }

    /// Fresh spawn for the next round, keeping identity and counters.
    pub fn respawn(&mut self, grid: &Grid, config: &GameConfig, rng: &mut StdRng) {
        self.direction = Direction::Right;
        self.moves_per_tick = 1;
        self.alive = true;
        self.brightness = ALIVE_BRIGHTNESS;
        self.held = None;
        self.turned_this_tick = false;
        self.decay_chunk = 0;
        self.place(grid, config, rng);
    }

    fn place(&mut self, grid: &Grid, config: &GameConfig, rng: &mut StdRng) {
        let cell = Point::new(
            rng.random_range(0..grid.width),
            rng.random_range(0..grid.height),
        );
        self.direction = if cell.x > grid.width / 2 {
            Direction::Left
        } else {
            Direction::Right
        };
        self.trail = Trail::new(config.trail_cap);
        self.trail.push_head(cell);
    }

    /// The cell the cycle currently occupies.
    pub fn head(&self) -> Option<Point> {
        self.trail.head()
    }

    /// Steer the cycle. Reversals are ignored, and only the first turn
    /// per tick takes effect; pressing the current direction also spends
    /// the tick's turn.
    pub fn turn(&mut self, direction: Direction) {
        if !self.alive || self.turned_this_tick {
            return;
        }
        if direction == self.direction.reversed() {
            return;
        }
        self.direction = direction;
        self.turned_this_tick = true;
    }

    /// Re-arm the turn latch once the tick's movement has resolved.
    pub fn clear_turn_latch(&mut self) {
        self.turned_this_tick = false;
    }

    /// Press the primary activation button. No-op without a held powerup.
    pub fn activate_primary(&mut self) {
        if let Some(held) = self.held.as_mut() {
            held.activate_primary();
            if held.grants_double_moves() {
                self.moves_per_tick = 2;
            }
        }
    }

    /// Press the secondary activation button.
    pub fn activate_secondary(&mut self) {
        if let Some(held) = self.held.as_mut() {
            held.activate_secondary();
            if held.grants_double_moves() {
                self.moves_per_tick = 2;
            }
        }
    }

    /// Toggle winner-flash brightness during the decay phase.
    pub fn set_flash(&mut self, on: bool) {
        self.brightness = if on { ALIVE_BRIGHTNESS } else { 0.0 };
    }

    /// Mark the cycle dead and latch how many cells each decay tick will
    /// eat so the whole trail clears in `decay_ticks` steps.
    pub fn kill(&mut self, decay_ticks: usize) {
        self.alive = false;
        self.brightness = 0.0;
        self.decay_chunk = (self.trail.len() / decay_ticks).max(1);
    }

    /// Consume one decay chunk from the tail of the trail.
    pub fn decay_step(&mut self) {
        self.trail.pop_tail(self.decay_chunk);
    }

    /// A dead player whose trail has fully decayed.
    pub fn is_decayed(&self) -> bool {
        self.trail.is_empty()
    }
}
