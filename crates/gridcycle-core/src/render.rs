//! Drawing primitives. The round composes these into full frames; the
//! sink decides where pixels go.

use crate::color::Rgb;
use crate::geometry::Grid;
use crate::player::Player;
use crate::portal::Portal;
use crate::powerup::Powerup;
use crate::sink::FrameSink;

/// Newest trail cells tinted with the held powerup's color, with a white
/// marker cell just behind them.
const TINT_CELLS: usize = 9;

/// Draw one player's trail, oldest to newest. While a powerup is held
/// the newest cells advertise it in the pickup's color.
pub fn draw_player(frame: &mut dyn FrameSink, player: &Player) {
    let len = player.trail.len();
    let tint = player.held.as_ref().map(|held| held.color());
    for (i, cell) in player.trail.iter().enumerate() {
        let color = match tint {
            Some(tint_color) if i + TINT_CELLS >= len => tint_color,
            Some(_) if i + TINT_CELLS + 1 == len => Rgb::WHITE,
            _ => player.color,
        };
        frame.set(cell.x, cell.y, color);
    }
}

/// Draw un-consumed pickups in their kind color.
pub fn draw_powerups(frame: &mut dyn FrameSink, powerups: &[Powerup]) {
    for pickup in powerups {
        if !pickup.consumed {
            frame.set(pickup.position.x, pickup.position.y, pickup.kind.color());
        }
    }
}

/// Draw every gate's span in its side color. Off-grid span cells are
/// dropped by the sink.
pub fn draw_portals(frame: &mut dyn FrameSink, portals: &[Portal], grid: &Grid) {
    for gate in portals {
        for cell in gate.span(grid) {
            frame.set(cell.x, cell.y, gate.color());
        }
    }
}

/// The four indicator lights: player color scaled by brightness.
pub fn player_lights(player: &Player) -> [Rgb; 4] {
    [player.color.scaled(player.brightness); 4]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::config::GameConfig;
    use crate::geometry::{Direction, Point};
    use crate::portal::PortalSide;
    use crate::powerup::{HeldPowerup, PowerupKind};
    use crate::sink::MemoryFrame;
    use crate::trail::Trail;

    fn player_with_trail(len: i32) -> Player {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut player = Player::spawn(1, Rgb::BLUE, &config.grid(), &config, &mut rng);
        player.trail = Trail::new(None);
        for x in 0..len {
            player.trail.push_head(Point::new(x, 0));
        }
        player.direction = Direction::Right;
        player
    }

    #[test]
    fn bare_trail_draws_in_player_color() {
        let mut frame = MemoryFrame::new(64, 8);
        let player = player_with_trail(5);
        draw_player(&mut frame, &player);
        for x in 0..5 {
            assert_eq!(frame.get(x, 0), Rgb::BLUE);
        }
        assert_eq!(frame.get(5, 0), Rgb::BLACK);
    }

    #[test]
    fn held_powerup_tints_the_newest_nine_cells() {
        let mut frame = MemoryFrame::new(64, 8);
        let mut player = player_with_trail(12);
        player.held = Some(HeldPowerup::new(PowerupKind::Speed, &GameConfig::default()));
        draw_player(&mut frame, &player);

        // Oldest two cells stay in player color, the tenth-newest is the
        // white marker, the newest nine take the pickup color.
        assert_eq!(frame.get(0, 0), Rgb::BLUE);
        assert_eq!(frame.get(1, 0), Rgb::BLUE);
        assert_eq!(frame.get(2, 0), Rgb::WHITE);
        for x in 3..12 {
            assert_eq!(frame.get(x, 0), Rgb::GREEN, "Cell {x} should carry the tint");
        }
    }

    #[test]
    fn short_trails_tint_entirely_without_marker() {
        let mut frame = MemoryFrame::new(64, 8);
        let mut player = player_with_trail(4);
        player.held = Some(HeldPowerup::new(PowerupKind::Jump, &GameConfig::default()));
        draw_player(&mut frame, &player);
        for x in 0..4 {
            assert_eq!(frame.get(x, 0), Rgb::WHITE);
        }
    }

    #[test]
    fn consumed_pickups_are_not_drawn() {
        let mut frame = MemoryFrame::new(64, 8);
        let powerups = vec![
            Powerup {
                kind: PowerupKind::Speed,
                position: Point::new(3, 3),
                consumed: false,
            },
            Powerup {
                kind: PowerupKind::Jump,
                position: Point::new(4, 4),
                consumed: true,
            },
        ];
        draw_powerups(&mut frame, &powerups);
        assert_eq!(frame.get(3, 3), Rgb::GREEN);
        assert_eq!(frame.get(4, 4), Rgb::BLACK);
    }

    #[test]
    fn gate_spans_draw_in_side_colors() {
        let grid = Grid::new(64, 32);
        let mut frame = MemoryFrame::new(64, 32);
        let portals = vec![
            Portal::new(Point::new(10, 10), Direction::Right, PortalSide::Primary),
            Portal::new(Point::new(20, 10), Direction::Right, PortalSide::Secondary),
        ];
        draw_portals(&mut frame, &portals, &grid);
        for y in 8..=12 {
            assert_eq!(frame.get(10, y), Rgb::ORANGE);
            assert_eq!(frame.get(20, y), Rgb::CYAN);
        }
    }

    #[test]
    fn lights_scale_with_brightness() {
        let player = player_with_trail(1);
        let lights = player_lights(&player);
        assert_eq!(lights, [Rgb::BLUE.scaled(0.1); 4]);

        let mut dead = player_with_trail(1);
        dead.kill(30);
        assert_eq!(player_lights(&dead), [Rgb::BLACK; 4]);
    }
}
