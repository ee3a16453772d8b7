//! Portal gates: 5-cell spans that teleport cycles between linked pairs.

use crate::color::Rgb;
use crate::geometry::{Direction, Grid, Point};

/// Index handle into the round's portal table. Partner links are by id,
/// never by reference, so the table stays plainly owned.
pub type PortalId = usize;

/// Cells in a gate, perpendicular to its facing.
pub const PORTAL_SPAN: usize = 5;

const SPAN_HALF: i32 = (PORTAL_SPAN as i32 - 1) / 2;

/// Which gate of a pair a deployment creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalSide {
    Primary,
    Secondary,
}

impl PortalSide {
    pub fn other(self) -> Self {
        match self {
            PortalSide::Primary => PortalSide::Secondary,
            PortalSide::Secondary => PortalSide::Primary,
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            PortalSide::Primary => Rgb::ORANGE,
            PortalSide::Secondary => Rgb::CYAN,
        }
    }
}

/// A deployed gate. Unlinked gates render but do not teleport.
#[derive(Debug, Clone)]
pub struct Portal {
    pub position: Point,
    pub facing: Direction,
    pub side: PortalSide,
    pub partner: Option<PortalId>,
}

impl Portal {
    pub fn new(position: Point, facing: Direction, side: PortalSide) -> Self {
        Self {
            position,
            facing,
            side,
            partner: None,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.partner.is_some()
    }

    pub fn color(&self) -> Rgb {
        self.side.color()
    }

    /// The gate's cells, ordered from the facing's left side. On wrapped
    /// axes span cells wrap; on others they may sit off-grid, where they
    /// are unreachable and skipped by rendering.
    pub fn span(&self, grid: &Grid) -> [Point; PORTAL_SPAN] {
        let (lx, ly) = self.facing.left().delta();
        std::array::from_fn(|i| {
            let offset = SPAN_HALF - i as i32;
            grid.step(self.position, lx * offset, ly * offset)
        })
    }

    /// Position of `cell` within the span, if it lies on the gate.
    pub fn span_index(&self, grid: &Grid, cell: Point) -> Option<usize> {
        self.span(grid).iter().position(|&c| c == cell)
    }
}

/// Remap a traversal entering `entry` at `span_index` while moving in
/// `incoming`. The cycle leaves at the partner's span cell of the same
/// index; the outgoing direction preserves the incoming direction's
/// rotational offset from the entry facing, measured against the exit
/// facing.
pub fn traverse(
    entry: &Portal,
    exit: &Portal,
    grid: &Grid,
    span_index: usize,
    incoming: Direction,
) -> (Point, Direction) {
    let quarter_turns = incoming.quarter_turns_from(entry.facing);
    let out_direction = exit.facing.rotated(quarter_turns);
    let out_position = exit.span(grid)[span_index];
    (out_position, out_direction)
}
