use std::collections::VecDeque;

use crate::geometry::Point;

/// The ordered cell history a cycle leaves behind. Oldest cell at the
/// front, newest (the head the player occupies) at the back. An optional
/// cap turns the trail into a ring: appending past the cap drops the
/// oldest cell.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    cells: VecDeque<Point>,
    cap: Option<usize>,
}

impl Trail {
    pub fn new(cap: Option<usize>) -> Self {
        Self {
            cells: VecDeque::new(),
            cap,
        }
    }

    /// Append a new head cell, evicting the oldest if capped and full.
    pub fn push_head(&mut self, cell: Point) {
        if let Some(cap) = self.cap {
            while self.cells.len() >= cap.max(1) {
                self.cells.pop_front();
            }
        }
        self.cells.push_back(cell);
    }

    /// The newest cell, where the player currently is.
    pub fn head(&self) -> Option<Point> {
        self.cells.back().copied()
    }

    /// Whether any trail cell occupies the given point. Linear scan;
    /// trails are bounded by the grid size.
    pub fn contains(&self, cell: Point) -> bool {
        self.cells.contains(&cell)
    }

    /// Remove up to `n` cells from the tail (the oldest end).
    pub fn pop_tail(&mut self, n: usize) {
        for _ in 0..n {
            if self.cells.pop_front().is_none() {
                break;
            }
        }
    }

    /// Oldest-to-newest iteration.
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
