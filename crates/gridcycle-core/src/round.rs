//! The round state machine: waiting, intro, active play, decay flash,
//! and reset, plus roster management and powerup wave timing.

use std::collections::HashMap;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::color::Rgb;
use crate::config::GameConfig;
use crate::engine;
use crate::events::RoundEvent;
use crate::geometry::Grid;
use crate::input::{self, Button};
use crate::player::{Player, PlayerId};
use crate::portal::Portal;
use crate::powerup::Powerup;
use crate::render;
use crate::sink::RoundIo;

/// Decay flash cadence: three lit steps, four dark.
const FLASH_PATTERN: [bool; 7] = [true, true, true, false, false, false, false];

const WIN_TEXT: &str = "You win!!!";
const WIN_BLANK: &str = "          ";
const WIN_ROW: u8 = 24;
const PLAYS_ROW: u8 = 0;
const WINS_ROW: u8 = 1;

/// Where the round currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    WaitingForPlayers,
    Intro,
    Active,
    Decay,
    Reset,
}

/// What one `Round::tick` produced: how long the driver should wait
/// before the next tick, and anything worth logging.
#[derive(Debug)]
pub struct TickOutcome {
    pub delay: Duration,
    pub events: Vec<RoundEvent>,
}

impl TickOutcome {
    fn quiet(delay: Duration) -> Self {
        Self {
            delay,
            events: Vec::new(),
        }
    }
}

/// A perpetual sequence of rounds on one grid. A single owner calls
/// `tick`; roster and input changes apply between ticks.
#[derive(Debug)]
pub struct Round {
    pub config: GameConfig,
    pub grid: Grid,
    pub phase: Phase,
    pub players: HashMap<PlayerId, Player>,
    /// Stable iteration order for every per-player loop; doubles as the
    /// tie-break for same-tick contests.
    pub join_order: Vec<PlayerId>,
    pub powerups: Vec<Powerup>,
    pub portals: Vec<Portal>,
    rng: StdRng,
    color_cursor: usize,
    active_ticks: u64,
    next_spawn_tick: u64,
    first_wave_pending: bool,
    flash_phase: usize,
}

impl Round {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic round for tests and replays.
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let grid = config.grid();
        Self {
            config,
            grid,
            phase: Phase::WaitingForPlayers,
            players: HashMap::new(),
            join_order: Vec::new(),
            powerups: Vec::new(),
            portals: Vec::new(),
            rng,
            color_cursor: 0,
            active_ticks: 0,
            next_spawn_tick: 0,
            first_wave_pending: true,
            flash_phase: 0,
        }
    }

    /// Add a player with the next palette color and a fresh spawn.
    /// Re-joining an id already on the roster is a no-op, which keeps
    /// registration replays harmless.
    pub fn join(&mut self, id: PlayerId, io: &mut RoundIo<'_>) {
        if self.players.contains_key(&id) {
            tracing::debug!(player_id = id, "Join for player already on the roster");
            return;
        }
        let color = Rgb::PALETTE[self.color_cursor % Rgb::PALETTE.len()];
        self.color_cursor += 1;
        let player = Player::spawn(id, color, &self.grid, &self.config, &mut self.rng);
        io.text.clear_text(id);
        io.indicators.set_lights(id, render::player_lights(&player));
        self.players.insert(id, player);
        self.join_order.push(id);
        tracing::info!(player_id = id, "Player joined");
    }

    /// Drop a player entirely. Their trail disappears with them; gates
    /// they deployed stay until the next reset.
    pub fn leave(&mut self, id: PlayerId) {
        if self.players.remove(&id).is_none() {
            tracing::warn!(player_id = id, "Leave for unknown player");
            return;
        }
        self.join_order.retain(|&p| p != id);
        tracing::info!(player_id = id, "Player left");
    }

    /// Route a button press. Unknown ids are logged and dropped.
    pub fn handle_button(&mut self, id: PlayerId, button: Button) {
        let Some(player) = self.players.get_mut(&id) else {
            tracing::warn!(player_id = id, "Input from unknown player");
            return;
        };
        input::apply_button(player, button);
    }

    /// Run one step of the current phase.
    pub fn tick(&mut self, io: &mut RoundIo<'_>) -> TickOutcome {
        match self.phase {
            Phase::WaitingForPlayers => self.waiting_tick(io),
            Phase::Intro => self.intro_tick(io),
            Phase::Active => self.active_tick(io),
            Phase::Decay => self.decay_tick(io),
            Phase::Reset => self.reset_tick(io),
        }
    }

    pub fn living_count(&self) -> usize {
        self.players.values().filter(|p| p.alive).count()
    }

    fn waiting_tick(&mut self, io: &mut RoundIo<'_>) -> TickOutcome {
        self.render_board(io);
        if self.join_order.len() >= self.config.min_players {
            self.phase = Phase::Intro;
            return TickOutcome::quiet(Duration::ZERO);
        }
        TickOutcome::quiet(Duration::from_millis(self.config.waiting_poll_ms))
    }

    fn intro_tick(&mut self, io: &mut RoundIo<'_>) -> TickOutcome {
        self.powerups.clear();
        self.portals.clear();
        self.active_ticks = 0;
        self.next_spawn_tick = 0;
        self.first_wave_pending = true;
        self.render_board(io);
        self.phase = Phase::Active;
        tracing::info!(players = self.join_order.len(), "Round starting");
        TickOutcome {
            delay: Duration::from_millis(self.config.intro_hold_ms),
            events: vec![RoundEvent::RoundStarted {
                players: self.join_order.len(),
            }],
        }
    }

    fn active_tick(&mut self, io: &mut RoundIo<'_>) -> TickOutcome {
        let mut events = Vec::new();

        if self.active_ticks >= self.next_spawn_tick {
            let count = if self.first_wave_pending {
                self.living_count() + self.config.first_wave_bonus
            } else {
                1
            };
            self.first_wave_pending = false;
            self.next_spawn_tick = self.active_ticks + self.config.powerup_interval_ticks;
            for _ in 0..count {
                let pickup = Powerup::random(&self.grid, &mut self.rng);
                events.push(RoundEvent::PowerupSpawned {
                    kind: pickup.kind,
                    position: pickup.position,
                });
                self.powerups.push(pickup);
            }
        }
        self.active_ticks += 1;

        events.extend(engine::advance_tick(
            &self.join_order,
            &mut self.players,
            &mut self.powerups,
            &mut self.portals,
            &self.grid,
            &self.config,
        ));

        self.render_board(io);
        self.push_lights(io);

        if self.living_count() <= 1 {
            let winners: Vec<PlayerId> = self
                .join_order
                .iter()
                .copied()
                .filter(|id| self.players.get(id).is_some_and(|p| p.alive))
                .collect();
            tracing::info!(?winners, "Round over, decaying trails");
            events.push(RoundEvent::RoundEnded { winners });
            self.flash_phase = 0;
            self.phase = Phase::Decay;
            return TickOutcome {
                delay: Duration::from_millis(self.config.decay_tick_ms),
                events,
            };
        }

        TickOutcome {
            delay: Duration::from_millis(self.config.tick_ms),
            events,
        }
    }

    fn decay_tick(&mut self, io: &mut RoundIo<'_>) -> TickOutcome {
        // Completion is checked every decay tick, so a trail never
        // lingers to round out a flash cycle.
        let all_decayed = self
            .join_order
            .iter()
            .filter_map(|id| self.players.get(id))
            .all(|p| p.alive || p.is_decayed());
        if all_decayed {
            self.phase = Phase::Reset;
            return TickOutcome::quiet(Duration::ZERO);
        }

        let on = FLASH_PATTERN[self.flash_phase % FLASH_PATTERN.len()];
        self.flash_phase += 1;

        io.frame.clear();
        for id in &self.join_order {
            let Some(player) = self.players.get_mut(id) else {
                continue;
            };
            if player.alive {
                player.set_flash(on);
                if on {
                    io.text.set_text(*id, WIN_ROW, 0, WIN_TEXT);
                    render::draw_player(io.frame, player);
                } else {
                    io.text.set_text(*id, WIN_ROW, 0, WIN_BLANK);
                }
            } else {
                player.decay_step();
                render::draw_player(io.frame, player);
            }
            io.indicators.set_lights(*id, render::player_lights(player));
        }
        if let Err(err) = io.frame.flush() {
            tracing::warn!(error = %err, "Frame flush failed, dropping frame");
        }

        TickOutcome::quiet(Duration::from_millis(self.config.decay_tick_ms))
    }

    fn reset_tick(&mut self, io: &mut RoundIo<'_>) -> TickOutcome {
        for id in &self.join_order {
            let Some(player) = self.players.get_mut(id) else {
                continue;
            };
            if player.alive {
                player.wins += 1;
            }
            player.plays += 1;
            io.text
                .set_text(*id, PLAYS_ROW, 0, &format!("Plays: {}", player.plays));
            io.text
                .set_text(*id, WINS_ROW, 0, &format!("Wins:  {}", player.wins));
        }

        io.frame.clear();
        if let Err(err) = io.frame.flush() {
            tracing::warn!(error = %err, "Frame flush failed, dropping frame");
        }

        for id in &self.join_order {
            if let Some(player) = self.players.get_mut(id) {
                player.respawn(&self.grid, &self.config, &mut self.rng);
            }
        }
        self.powerups.clear();
        self.portals.clear();
        self.phase = Phase::WaitingForPlayers;
        TickOutcome::quiet(Duration::ZERO)
    }

    /// Clear, draw trails, pickups, and gates, and present the frame.
    fn render_board(&self, io: &mut RoundIo<'_>) {
        io.frame.clear();
        for id in &self.join_order {
            if let Some(player) = self.players.get(id) {
                render::draw_player(io.frame, player);
            }
        }
        render::draw_powerups(io.frame, &self.powerups);
        render::draw_portals(io.frame, &self.portals, &self.grid);
        if let Err(err) = io.frame.flush() {
            tracing::warn!(error = %err, "Frame flush failed, dropping frame");
        }
    }

    fn push_lights(&self, io: &mut RoundIo<'_>) {
        for id in &self.join_order {
            if let Some(player) = self.players.get(id) {
                io.indicators.set_lights(*id, render::player_lights(player));
            }
        }
    }
}
