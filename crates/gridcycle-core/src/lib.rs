pub mod color;
pub mod config;
pub mod engine;
pub mod events;
pub mod geometry;
pub mod input;
pub mod player;
pub mod portal;
pub mod powerup;
pub mod render;
pub mod round;
pub mod sink;
pub mod trail;

pub use player::PlayerId;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::HashMap;

    use crate::color::Rgb;
    use crate::config::GameConfig;
    use crate::player::PlayerId;
    use crate::sink::{IndicatorSink, MemoryFrame, RoundIo, TextSink};

    /// A small board that keeps round tests fast.
    pub fn small_config() -> GameConfig {
        GameConfig {
            grid_width: 64,
            grid_height: 16,
            ..GameConfig::default()
        }
    }

    /// Indicator sink remembering the last lights pushed per player.
    #[derive(Debug, Default)]
    pub struct RecordingIndicators {
        pub last: HashMap<PlayerId, [Rgb; 4]>,
    }

    impl IndicatorSink for RecordingIndicators {
        fn set_lights(&mut self, player_id: PlayerId, lights: [Rgb; 4]) {
            self.last.insert(player_id, lights);
        }
    }

    /// Text sink remembering the last line per player and row.
    #[derive(Debug, Default)]
    pub struct RecordingText {
        pub lines: HashMap<(PlayerId, u8), String>,
        pub cleared: Vec<PlayerId>,
    }

    impl TextSink for RecordingText {
        fn set_text(&mut self, player_id: PlayerId, row: u8, _col: u8, text: &str) {
            self.lines.insert((player_id, row), text.to_string());
        }

        fn clear_text(&mut self, player_id: PlayerId) {
            self.cleared.push(player_id);
            self.lines.retain(|(id, _), _| *id != player_id);
        }
    }

    /// The three sinks a round writes to, bundled for tests.
    #[derive(Debug)]
    pub struct TestIo {
        pub frame: MemoryFrame,
        pub indicators: RecordingIndicators,
        pub text: RecordingText,
    }

    impl TestIo {
        pub fn new(config: &GameConfig) -> Self {
            Self {
                frame: MemoryFrame::new(config.grid_width, config.grid_height),
                indicators: RecordingIndicators::default(),
                text: RecordingText::default(),
            }
        }

        /// Borrow the sinks in the shape `Round::tick` expects.
        pub fn io(&mut self) -> RoundIo<'_> {
            RoundIo {
                frame: &mut self.frame,
                indicators: &mut self.indicators,
                text: &mut self.text,
            }
        }
    }
}
