use crate::geometry::Direction;
use crate::player::Player;

/// The badge buttons the game understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Primary,
    Secondary,
}

/// Route one button press into the player's state machine. Turn and
/// activation rules (debounce, reversal, missing powerup) live on the
/// player; anything rejected there is silently dropped.
pub fn apply_button(player: &mut Player, button: Button) {
    match button {
        Button::Up => player.turn(Direction::Up),
        Button::Down => player.turn(Direction::Down),
        Button::Left => player.turn(Direction::Left),
        Button::Right => player.turn(Direction::Right),
        Button::Primary => player.activate_primary(),
        Button::Secondary => player.activate_secondary(),
    }
}
