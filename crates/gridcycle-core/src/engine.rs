//! Per-tick movement resolution: displacement, powerup effects, portal
//! traversal, lethality, pickups, and trail growth.

use std::collections::HashMap;

use crate::config::GameConfig;
use crate::events::RoundEvent;
use crate::geometry::Grid;
use crate::player::{Player, PlayerId};
use crate::portal::{self, Portal};
use crate::powerup::{HeldPowerup, Powerup};

/// Resolve one Active tick for every living player, in roster join
/// order. Resolution is sequential: an earlier mover's new head cell is
/// already lethal to later movers within the same tick, which is the
/// documented tie-break for head-on contests.
pub fn advance_tick(
    order: &[PlayerId],
    players: &mut HashMap<PlayerId, Player>,
    powerups: &mut Vec<Powerup>,
    portals: &mut Vec<Portal>,
    grid: &Grid,
    config: &GameConfig,
) -> Vec<RoundEvent> {
    let mut events = Vec::new();
    for &id in order {
        let Some(mut player) = players.remove(&id) else {
            continue;
        };
        if player.alive {
            resolve_player(
                &mut player,
                players,
                powerups,
                portals,
                grid,
                config,
                &mut events,
            );
        }
        players.insert(id, player);
    }
    powerups.retain(|p| !p.consumed);
    events
}

/// Run the player's sub-steps for this tick. The sub-step count is
/// latched up front, so a Speed powerup expiring on the first sub-step
/// still gets its second one.
fn resolve_player(
    player: &mut Player,
    others: &HashMap<PlayerId, Player>,
    powerups: &mut Vec<Powerup>,
    portals: &mut Vec<Portal>,
    grid: &Grid,
    config: &GameConfig,
    events: &mut Vec<RoundEvent>,
) {
    let moves = player.moves_per_tick;
    for _ in 0..moves {
        if !resolve_move(player, others, powerups, portals, grid, config, events) {
            break;
        }
    }
    player.clear_turn_latch();
}

/// One sub-step. Returns false when the player died (or has no head),
/// ending their tick.
fn resolve_move(
    player: &mut Player,
    others: &HashMap<PlayerId, Player>,
    powerups: &mut Vec<Powerup>,
    portals: &mut Vec<Portal>,
    grid: &Grid,
    config: &GameConfig,
    events: &mut Vec<RoundEvent>,
) -> bool {
    let Some(head) = player.head() else {
        return false;
    };

    let (mut dx, mut dy) = player.direction.delta();

    if let Some(held) = player.held.as_mut() {
        if let Some(side) = held.pending_deploy() {
            // Deploying a gate consumes the whole sub-step; the cycle
            // holds its cell.
            let center = grid.step(head, dx * config.portal_reach, dy * config.portal_reach);
            let id = portals.len();
            let mut gate = Portal::new(center, player.direction, side);
            if let Some(partner_id) = held.deployed(side.other()) {
                gate.partner = Some(partner_id);
                if let Some(partner) = portals.get_mut(partner_id) {
                    partner.partner = Some(id);
                }
            }
            let linked = gate.is_linked();
            portals.push(gate);
            held.record_deploy(side, id);
            events.push(RoundEvent::PortalDeployed {
                player_id: player.id,
                side,
                linked,
            });
            if held.is_exhausted() {
                player.held = None;
            }
            return true;
        }
        if held.is_running() {
            let mult = held.displacement_multiplier(config);
            dx *= mult;
            dy *= mult;
            held.tick_move();
        }
        if held.is_exhausted() {
            if held.grants_double_moves() {
                player.moves_per_tick = 1;
            }
            player.held = None;
        }
    }

    let mut candidate = grid.step(head, dx, dy);

    // First linked gate whose span holds the candidate wins.
    for i in 0..portals.len() {
        let gate = &portals[i];
        let Some(partner_id) = gate.partner else {
            continue;
        };
        let Some(index) = gate.span_index(grid, candidate) else {
            continue;
        };
        let Some(partner) = portals.get(partner_id) else {
            continue;
        };
        let (out_pos, out_dir) = portal::traverse(gate, partner, grid, index, player.direction);
        candidate = out_pos;
        player.direction = out_dir;
        break;
    }

    // Lethality is judged at the post-remap cell. Dead players' trails
    // stay lethal until they decay.
    if !player.invincible {
        let hits_wall = !grid.contains(candidate);
        let hits_trail = player.trail.contains(candidate)
            || others.values().any(|p| p.trail.contains(candidate));
        if hits_wall || hits_trail {
            player.kill(config.decay_ticks);
            events.push(RoundEvent::PlayerDied {
                player_id: player.id,
            });
            return false;
        }
    }

    // Every pickup on the cell is consumed; only the first fills an
    // empty held slot.
    for pickup in powerups.iter_mut() {
        if pickup.consumed || pickup.position != candidate {
            continue;
        }
        pickup.consumed = true;
        if player.held.is_none() {
            player.held = Some(HeldPowerup::new(pickup.kind, config));
            events.push(RoundEvent::PowerupCollected {
                player_id: player.id,
                kind: pickup.kind,
            });
        } else {
            events.push(RoundEvent::PowerupDiscarded {
                player_id: player.id,
                kind: pickup.kind,
            });
        }
    }

    player.trail.push_head(candidate);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::color::Rgb;
    use crate::geometry::{Direction, Point};
    use crate::portal::PortalSide;
    use crate::powerup::PowerupKind;
    use crate::trail::Trail;

    fn fixture(ids: &[PlayerId]) -> (Vec<PlayerId>, HashMap<PlayerId, Player>, GameConfig, Grid) {
        let config = GameConfig::default();
        let grid = config.grid();
        let mut rng = StdRng::seed_from_u64(11);
        let mut players = HashMap::new();
        for &id in ids {
            players.insert(id, Player::spawn(id, Rgb::BLUE, &grid, &config, &mut rng));
        }
        (ids.to_vec(), players, config, grid)
    }

    fn place(player: &mut Player, x: i32, y: i32, direction: Direction) {
        player.trail = Trail::new(None);
        player.trail.push_head(Point::new(x, y));
        player.direction = direction;
    }

    fn tick(
        order: &[PlayerId],
        players: &mut HashMap<PlayerId, Player>,
        powerups: &mut Vec<Powerup>,
        portals: &mut Vec<Portal>,
        grid: &Grid,
        config: &GameConfig,
    ) -> Vec<RoundEvent> {
        advance_tick(order, players, powerups, portals, grid, config)
    }

    // ================================================================
    // Movement and lethality
    // ================================================================

    #[test]
    fn heads_advance_one_cell_per_tick() {
        let (order, mut players, config, grid) = fixture(&[1]);
        place(players.get_mut(&1).expect("present"), 10, 10, Direction::Right);

        for expected_x in 11..=15 {
            tick(&order, &mut players, &mut vec![], &mut vec![], &grid, &config);
            let head = players[&1].head().expect("alive player has head");
            assert_eq!(head, Point::new(expected_x, 10));
        }
    }

    #[test]
    fn leaving_an_unwrapped_edge_kills() {
        let (order, mut players, config, grid) = fixture(&[1]);
        place(players.get_mut(&1).expect("present"), 511, 10, Direction::Right);

        let events = tick(&order, &mut players, &mut vec![], &mut vec![], &grid, &config);
        assert!(!players[&1].alive, "Exiting the board must kill");
        assert_eq!(events, vec![RoundEvent::PlayerDied { player_id: 1 }]);
        assert_eq!(
            players[&1].head(),
            Some(Point::new(511, 10)),
            "Death leaves the trail where it was"
        );
    }

    #[test]
    fn a_wrapped_axis_carries_the_cycle_across() {
        let config = GameConfig {
            wrap_x: true,
            ..GameConfig::default()
        };
        let grid = config.grid();
        let mut rng = StdRng::seed_from_u64(11);
        let mut players = HashMap::new();
        players.insert(1, Player::spawn(1, Rgb::BLUE, &grid, &config, &mut rng));
        place(players.get_mut(&1).expect("present"), 511, 10, Direction::Right);

        tick(&[1], &mut players, &mut vec![], &mut vec![], &grid, &config);
        assert!(players[&1].alive);
        assert_eq!(players[&1].head(), Some(Point::new(0, 10)));
    }

    #[test]
    fn own_trail_is_lethal() {
        let (order, mut players, config, grid) = fixture(&[1]);
        let player = players.get_mut(&1).expect("present");
        place(player, 7, 5, Direction::Up);
        player.trail.push_head(Point::new(7, 4));
        player.trail.push_head(Point::new(6, 4));
        player.trail.push_head(Point::new(6, 5));
        player.direction = Direction::Right;

        // Candidate (7,5) is the player's own oldest cell.
        tick(&order, &mut players, &mut vec![], &mut vec![], &grid, &config);
        assert!(!players[&1].alive, "Closing a loop onto your own trail kills");
    }

    #[test]
    fn dead_players_trails_stay_lethal() {
        let (order, mut players, config, grid) = fixture(&[1, 2]);
        {
            let p1 = players.get_mut(&1).expect("present");
            place(p1, 100, 10, Direction::Right);
            p1.trail.push_head(Point::new(101, 10));
            p1.kill(config.decay_ticks);
        }
        place(players.get_mut(&2).expect("present"), 102, 10, Direction::Left);

        tick(&order, &mut players, &mut vec![], &mut vec![], &grid, &config);
        assert!(
            !players[&2].alive,
            "An undecayed trail kills even when its owner is dead"
        );
    }

    #[test]
    fn head_on_with_even_gap_kills_both_in_one_tick() {
        let (order, mut players, config, grid) = fixture(&[1, 2]);
        place(players.get_mut(&1).expect("present"), 10, 10, Direction::Right);
        place(players.get_mut(&2).expect("present"), 13, 10, Direction::Left);

        tick(&order, &mut players, &mut vec![], &mut vec![], &grid, &config);
        assert!(players[&1].alive);
        assert!(players[&2].alive);

        let events = tick(&order, &mut players, &mut vec![], &mut vec![], &grid, &config);
        assert!(!players[&1].alive, "Both cycles die on the meeting tick");
        assert!(!players[&2].alive);
        assert_eq!(
            events,
            vec![
                RoundEvent::PlayerDied { player_id: 1 },
                RoundEvent::PlayerDied { player_id: 2 },
            ]
        );
    }

    #[test]
    fn earlier_mover_head_kills_later_mover_same_tick() {
        // Odd gap: the join-order tie-break sends player 2 into player
        // 1's freshly placed head cell.
        let (order, mut players, config, grid) = fixture(&[1, 2]);
        place(players.get_mut(&1).expect("present"), 10, 10, Direction::Right);
        place(players.get_mut(&2).expect("present"), 12, 10, Direction::Left);

        tick(&order, &mut players, &mut vec![], &mut vec![], &grid, &config);
        assert!(players[&1].alive);
        assert!(!players[&2].alive);
        assert_eq!(players[&1].head(), Some(Point::new(11, 10)));
    }

    #[test]
    fn invincible_players_shrug_off_trails() {
        let (order, mut players, config, grid) = fixture(&[1, 2]);
        {
            let p1 = players.get_mut(&1).expect("present");
            place(p1, 100, 10, Direction::Right);
            p1.trail.push_head(Point::new(101, 10));
        }
        {
            let p2 = players.get_mut(&2).expect("present");
            place(p2, 102, 10, Direction::Left);
            p2.invincible = true;
        }

        tick(&order, &mut players, &mut vec![], &mut vec![], &grid, &config);
        assert!(players[&2].alive, "Invincible cycles skip the death check");
        assert_eq!(players[&2].head(), Some(Point::new(101, 10)));
    }

    // ================================================================
    // Powerups
    // ================================================================

    #[test]
    fn jump_covers_four_cells_and_skips_intermediates() {
        let (order, mut players, config, grid) = fixture(&[1, 2]);
        {
            let p2 = players.get_mut(&2).expect("present");
            place(p2, 11, 10, Direction::Down);
            p2.trail.push_head(Point::new(12, 10));
            p2.trail.push_head(Point::new(13, 10));
            p2.kill(config.decay_ticks);
        }
        {
            let p1 = players.get_mut(&1).expect("present");
            place(p1, 10, 10, Direction::Right);
            p1.held = Some(HeldPowerup::new(PowerupKind::Jump, &config));
            p1.activate_primary();
        }

        tick(&order, &mut players, &mut vec![], &mut vec![], &grid, &config);
        let p1 = &players[&1];
        assert!(p1.alive, "Jump hops over the wall of trail cells");
        assert_eq!(p1.head(), Some(Point::new(14, 10)));
        assert!(p1.held.is_none(), "Jump exhausts after its single move");
        assert!(
            !p1.trail.contains(Point::new(11, 10)),
            "Skipped cells are not appended to the trail"
        );
    }

    #[test]
    fn jump_landing_cell_is_still_death_checked() {
        let (order, mut players, config, grid) = fixture(&[1, 2]);
        {
            let p2 = players.get_mut(&2).expect("present");
            place(p2, 14, 10, Direction::Down);
        }
        {
            let p1 = players.get_mut(&1).expect("present");
            place(p1, 10, 10, Direction::Right);
            p1.held = Some(HeldPowerup::new(PowerupKind::Jump, &config));
            p1.activate_primary();
        }

        tick(&order, &mut players, &mut vec![], &mut vec![], &grid, &config);
        assert!(!players[&1].alive, "Landing on a trail cell still kills");
    }

    #[test]
    fn speed_doubles_moves_for_thirty_moves() {
        let (order, mut players, config, grid) = fixture(&[1]);
        {
            let p1 = players.get_mut(&1).expect("present");
            place(p1, 10, 10, Direction::Right);
            p1.held = Some(HeldPowerup::new(PowerupKind::Speed, &config));
            p1.activate_primary();
            assert_eq!(p1.moves_per_tick, 2);
        }

        // 15 ticks at two moves each burn the 30-move clock.
        for tick_index in 1..=15 {
            tick(&order, &mut players, &mut vec![], &mut vec![], &grid, &config);
            let head = players[&1].head().expect("alive");
            assert_eq!(
                head.x,
                10 + 2 * tick_index,
                "Tick {tick_index} should advance two cells"
            );
        }
        assert!(players[&1].held.is_none(), "Speed exhausts after 30 moves");
        assert_eq!(players[&1].moves_per_tick, 1);

        tick(&order, &mut players, &mut vec![], &mut vec![], &grid, &config);
        assert_eq!(players[&1].head(), Some(Point::new(41, 10)));
    }

    #[test]
    fn speed_expiring_mid_tick_finishes_the_latched_move() {
        let (order, mut players, config, grid) = fixture(&[1]);
        {
            let p1 = players.get_mut(&1).expect("present");
            place(p1, 10, 10, Direction::Right);
            p1.held = Some(HeldPowerup::Speed {
                activated: true,
                moves_left: 1,
            });
            p1.moves_per_tick = 2;
        }

        tick(&order, &mut players, &mut vec![], &mut vec![], &grid, &config);
        assert_eq!(
            players[&1].head(),
            Some(Point::new(12, 10)),
            "The second latched sub-step still runs after expiry"
        );
        assert_eq!(players[&1].moves_per_tick, 1);
        assert!(players[&1].held.is_none());
    }

    #[test]
    fn every_pickup_on_a_cell_is_consumed_but_only_first_granted() {
        let (order, mut players, config, grid) = fixture(&[1]);
        place(players.get_mut(&1).expect("present"), 10, 10, Direction::Right);
        let mut powerups = vec![
            Powerup {
                kind: PowerupKind::Speed,
                position: Point::new(11, 10),
                consumed: false,
            },
            Powerup {
                kind: PowerupKind::Jump,
                position: Point::new(11, 10),
                consumed: false,
            },
        ];

        let events = tick(&order, &mut players, &mut powerups, &mut vec![], &grid, &config);
        assert!(powerups.is_empty(), "Consumed pickups are swept after the tick");
        assert!(
            matches!(
                players[&1].held,
                Some(HeldPowerup::Speed { activated: false, .. })
            ),
            "First pickup fills the slot un-activated"
        );
        assert_eq!(
            events,
            vec![
                RoundEvent::PowerupCollected {
                    player_id: 1,
                    kind: PowerupKind::Speed,
                },
                RoundEvent::PowerupDiscarded {
                    player_id: 1,
                    kind: PowerupKind::Jump,
                },
            ]
        );
    }

    #[test]
    fn holding_a_powerup_discards_new_pickups() {
        let (order, mut players, config, grid) = fixture(&[1]);
        {
            let p1 = players.get_mut(&1).expect("present");
            place(p1, 10, 10, Direction::Right);
            p1.held = Some(HeldPowerup::new(PowerupKind::Portal, &config));
        }
        let mut powerups = vec![Powerup {
            kind: PowerupKind::Jump,
            position: Point::new(11, 10),
            consumed: false,
        }];

        tick(&order, &mut players, &mut powerups, &mut vec![], &grid, &config);
        assert!(powerups.is_empty());
        assert!(
            matches!(players[&1].held, Some(HeldPowerup::Portal { .. })),
            "The held powerup is kept"
        );
    }

    // ================================================================
    // Portals
    // ================================================================

    #[test]
    fn deploying_a_gate_consumes_the_move() {
        let (order, mut players, config, grid) = fixture(&[1]);
        {
            let p1 = players.get_mut(&1).expect("present");
            place(p1, 50, 10, Direction::Right);
            p1.held = Some(HeldPowerup::new(PowerupKind::Portal, &config));
            p1.activate_primary();
        }
        let mut portals = Vec::new();

        let events = tick(&order, &mut players, &mut vec![], &mut portals, &grid, &config);
        assert_eq!(
            players[&1].head(),
            Some(Point::new(50, 10)),
            "Deployment consumes the sub-step; the cycle holds its cell"
        );
        assert_eq!(portals.len(), 1);
        assert_eq!(portals[0].position, Point::new(60, 10));
        assert_eq!(portals[0].facing, Direction::Right);
        assert!(!portals[0].is_linked());
        assert_eq!(
            events,
            vec![RoundEvent::PortalDeployed {
                player_id: 1,
                side: PortalSide::Primary,
                linked: false,
            }]
        );

        // Movement resumes the next tick.
        tick(&order, &mut players, &mut vec![], &mut portals, &grid, &config);
        assert_eq!(players[&1].head(), Some(Point::new(51, 10)));
    }

    #[test]
    fn second_gate_links_the_pair_and_spends_the_powerup() {
        let (order, mut players, config, grid) = fixture(&[1]);
        {
            let p1 = players.get_mut(&1).expect("present");
            place(p1, 50, 10, Direction::Right);
            p1.held = Some(HeldPowerup::new(PowerupKind::Portal, &config));
            p1.activate_primary();
            p1.activate_secondary();
        }
        let mut portals = Vec::new();

        tick(&order, &mut players, &mut vec![], &mut portals, &grid, &config);
        tick(&order, &mut players, &mut vec![], &mut portals, &grid, &config);
        assert_eq!(portals.len(), 2);
        assert_eq!(portals[0].partner, Some(1));
        assert_eq!(portals[1].partner, Some(0));
        assert_eq!(portals[1].side, PortalSide::Secondary);
        assert!(players[&1].held.is_none(), "Both gates placed spends the powerup");
    }

    #[test]
    fn linked_gates_teleport_with_remapped_direction() {
        // Gate A at (10,10) facing Right, gate B at (40,10) facing
        // Left. Entering A's top span cell moving Right exits B's
        // matching span cell moving Left.
        let (order, mut players, config, grid) = fixture(&[1]);
        place(players.get_mut(&1).expect("present"), 9, 8, Direction::Right);
        let mut a = Portal::new(Point::new(10, 10), Direction::Right, PortalSide::Primary);
        let mut b = Portal::new(Point::new(40, 10), Direction::Left, PortalSide::Secondary);
        a.partner = Some(1);
        b.partner = Some(0);
        let mut portals = vec![a, b];

        tick(&order, &mut players, &mut vec![], &mut portals, &grid, &config);
        let p1 = &players[&1];
        assert_eq!(p1.head(), Some(Point::new(40, 12)));
        assert_eq!(p1.direction, Direction::Left);
        assert!(
            !p1.trail.contains(Point::new(10, 8)),
            "The entry cell is never occupied"
        );

        // And back: the next ticks walk away from B, turn around is
        // forbidden, so steer onto B's span from the far side instead.
        tick(&order, &mut players, &mut vec![], &mut portals, &grid, &config);
        assert_eq!(players[&1].head(), Some(Point::new(39, 12)));
    }

    #[test]
    fn unlinked_gates_are_inert() {
        let (order, mut players, config, grid) = fixture(&[1]);
        place(players.get_mut(&1).expect("present"), 9, 8, Direction::Right);
        let mut portals = vec![Portal::new(
            Point::new(10, 10),
            Direction::Right,
            PortalSide::Primary,
        )];

        tick(&order, &mut players, &mut vec![], &mut portals, &grid, &config);
        assert_eq!(
            players[&1].head(),
            Some(Point::new(10, 8)),
            "A gate without a partner does not teleport"
        );
    }

    #[test]
    fn remap_happens_before_the_death_check() {
        // The entry span cell overlaps a trail wall, but the exit cell
        // is clear: the cycle must survive because lethality is judged
        // after the remap.
        let (order, mut players, config, grid) = fixture(&[1, 2]);
        {
            let p2 = players.get_mut(&2).expect("present");
            place(p2, 10, 8, Direction::Down);
            p2.kill(config.decay_ticks);
        }
        place(players.get_mut(&1).expect("present"), 9, 8, Direction::Right);
        let mut a = Portal::new(Point::new(10, 10), Direction::Right, PortalSide::Primary);
        let mut b = Portal::new(Point::new(40, 10), Direction::Left, PortalSide::Secondary);
        a.partner = Some(1);
        b.partner = Some(0);
        let mut portals = vec![a, b];

        tick(&order, &mut players, &mut vec![], &mut portals, &grid, &config);
        assert!(players[&1].alive, "Death is judged at the post-remap cell");
        assert_eq!(players[&1].head(), Some(Point::new(40, 12)));
    }
}
