//! Host-side sink implementations. The real LED matrix and badge
//! transports plug in here; these present into memory and TRACE-log the
//! traffic so a headless host is still observable.

use std::io;

use gridcycle_core::PlayerId;
use gridcycle_core::color::Rgb;
use gridcycle_core::config::GameConfig;
use gridcycle_core::sink::{FrameSink, IndicatorSink, MemoryFrame, TextSink};

/// Presents frames into a `MemoryFrame` and TRACE-logs each flush.
#[derive(Debug)]
pub struct TraceFrame {
    buffer: MemoryFrame,
}

impl TraceFrame {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            buffer: MemoryFrame::new(config.grid_width, config.grid_height),
        }
    }

    /// The last presented frame.
    pub fn frame(&self) -> &MemoryFrame {
        &self.buffer
    }
}

impl FrameSink for TraceFrame {
    fn set(&mut self, x: i32, y: i32, color: Rgb) {
        self.buffer.set(x, y, color);
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }

    fn flush(&mut self) -> io::Result<()> {
        self.buffer.flush()?;
        tracing::trace!(frames = self.buffer.flushes(), "Frame presented");
        Ok(())
    }
}

/// TRACE-logs indicator light pushes.
#[derive(Debug, Default)]
pub struct TraceIndicators;

impl IndicatorSink for TraceIndicators {
    fn set_lights(&mut self, player_id: PlayerId, lights: [Rgb; 4]) {
        tracing::trace!(player_id, ?lights, "Lights updated");
    }
}

/// TRACE-logs badge text pushes.
#[derive(Debug, Default)]
pub struct TraceText;

impl TextSink for TraceText {
    fn set_text(&mut self, player_id: PlayerId, row: u8, col: u8, text: &str) {
        tracing::trace!(player_id, row, col, text, "Text updated");
    }

    fn clear_text(&mut self, player_id: PlayerId) {
        tracing::trace!(player_id, "Text cleared");
    }
}
