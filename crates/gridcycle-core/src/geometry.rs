//! Grid geometry: cells, the 4-direction cycle, and per-axis wrapping.

/// A cell on the grid. Also used as a raw (possibly out-of-bounds)
/// candidate position before bounds checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Movement direction in screen coordinates: y grows downward, so the
/// clockwise cycle is Up, Right, Down, Left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit displacement for one step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The 180-degree opposite.
    pub fn reversed(self) -> Self {
        self.rotated(2)
    }

    /// The counter-clockwise neighbor.
    pub fn left(self) -> Self {
        self.rotated(3)
    }

    /// Rotate clockwise by quarter turns.
    pub fn rotated(self, quarter_turns: u8) -> Self {
        Self::from_index((self.index() + quarter_turns) % 4)
    }

    /// The number of clockwise quarter turns from `other` to `self`.
    pub fn quarter_turns_from(self, other: Self) -> u8 {
        (4 + self.index() - other.index()) % 4
    }

    fn index(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Direction::Up,
            1 => Direction::Right,
            2 => Direction::Down,
            _ => Direction::Left,
        }
    }
}

/// Board bounds with independent wrap per axis. A grid wrapped on x only
/// is a cylinder; wrapped on both it is a torus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    pub wrap_x: bool,
    pub wrap_y: bool,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_wrap(width, height, false, false)
    }

    pub fn with_wrap(width: i32, height: i32, wrap_x: bool, wrap_y: bool) -> Self {
        Self {
            width,
            height,
            wrap_x,
            wrap_y,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    /// Displace a point, wrapping each axis independently. Displacements
    /// larger than one cell (jumps) wrap correctly; non-wrapped axes keep
    /// the raw coordinate so the caller can detect out-of-bounds.
    pub fn step(&self, p: Point, dx: i32, dy: i32) -> Point {
        let mut x = p.x + dx;
        let mut y = p.y + dy;
        if self.wrap_x {
            x = x.rem_euclid(self.width);
        }
        if self.wrap_y {
            y = y.rem_euclid(self.height);
        }
        Point::new(x, y)
    }
}
