//! Output seams. The round renders through these traits; hosts decide
//! where pixels, lights, and text actually go.

use std::io;

use crate::color::Rgb;
use crate::player::PlayerId;

/// Full-frame pixel output. `set` calls outside the frame are ignored by
/// implementations; `flush` presents the assembled frame.
pub trait FrameSink {
    fn set(&mut self, x: i32, y: i32, color: Rgb);
    fn clear(&mut self);
    fn flush(&mut self) -> io::Result<()>;
}

/// Per-player indicator lights, ordered bottom-left, bottom-right,
/// top-right, top-left.
pub trait IndicatorSink {
    fn set_lights(&mut self, player_id: PlayerId, lights: [Rgb; 4]);
}

/// Per-player text lines (win banner, round stats).
pub trait TextSink {
    fn set_text(&mut self, player_id: PlayerId, row: u8, col: u8, text: &str);
    fn clear_text(&mut self, player_id: PlayerId);
}

/// The sinks a round step writes to, borrowed together.
pub struct RoundIo<'a> {
    pub frame: &'a mut dyn FrameSink,
    pub indicators: &'a mut dyn IndicatorSink,
    pub text: &'a mut dyn TextSink,
}

/// A frame buffer in memory. `flush` snapshots the working buffer into a
/// presented copy, so tests and presenters read what was last shown
/// rather than a half-drawn frame.
#[derive(Debug, Clone)]
pub struct MemoryFrame {
    width: i32,
    height: i32,
    pixels: Vec<Rgb>,
    presented: Vec<Rgb>,
    flushes: u64,
}

impl MemoryFrame {
    pub fn new(width: i32, height: i32) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; size],
            presented: vec![Rgb::BLACK; size],
            flushes: 0,
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width && y >= 0 && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    /// Pixel in the working (unflushed) buffer; black outside the frame.
    pub fn get(&self, x: i32, y: i32) -> Rgb {
        self.index(x, y).map_or(Rgb::BLACK, |i| self.pixels[i])
    }

    /// Pixel in the last presented frame; black outside the frame.
    pub fn presented(&self, x: i32, y: i32) -> Rgb {
        self.index(x, y).map_or(Rgb::BLACK, |i| self.presented[i])
    }

    pub fn flushes(&self) -> u64 {
        self.flushes
    }
}

impl FrameSink for MemoryFrame {
    fn set(&mut self, x: i32, y: i32, color: Rgb) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    fn clear(&mut self) {
        self.pixels.fill(Rgb::BLACK);
    }

    fn flush(&mut self) -> io::Result<()> {
        self.presented.copy_from_slice(&self.pixels);
        self.flushes += 1;
        Ok(())
    }
}

/// Indicator sink that drops every update (headless hosts).
#[derive(Debug, Default)]
pub struct NullIndicators;

impl IndicatorSink for NullIndicators {
    fn set_lights(&mut self, _player_id: PlayerId, _lights: [Rgb; 4]) {}
}

/// Text sink that drops every update.
#[derive(Debug, Default)]
pub struct NullText;

impl TextSink for NullText {
    fn set_text(&mut self, _player_id: PlayerId, _row: u8, _col: u8, _text: &str) {}

    fn clear_text(&mut self, _player_id: PlayerId) {}
}
