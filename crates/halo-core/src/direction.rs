//! Exchange directions and partition axes.

use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// An axis of the partition grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis. Columns are contiguous along this axis's cells.
    X,
    /// Vertical axis. Rows are strided in storage.
    Y,
}

/// A relative direction toward a neighboring partition.
///
/// Also used as the message tag: a transfer travelling toward `Left`
/// carries the tag `Left`, so two simultaneous transfers along the same
/// axis are never confused.
///
/// `Up` decreases the partition-grid Y coordinate, `Down` increases it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Toward `coord_x - 1`.
    Left,
    /// Toward `coord_x + 1`.
    Right,
    /// Toward `coord_y - 1`.
    Up,
    /// Toward `coord_y + 1`.
    Down,
}

/// A small set of directions, ordered as inserted.
pub type DirectionSet = SmallVec<[Direction; 4]>;

impl Direction {
    /// All four directions in canonical order.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// The two directions along the X axis.
    pub const HORIZONTAL: [Direction; 2] = [Direction::Left, Direction::Right];

    /// The two directions along the Y axis.
    pub const VERTICAL: [Direction; 2] = [Direction::Up, Direction::Down];

    /// The direction pointing the other way along the same axis.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// The axis this direction moves along.
    pub fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::X,
            Direction::Up | Direction::Down => Axis::Y,
        }
    }

    /// Partition-grid offset `(dx, dy)` of the neighbor in this direction.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    /// Whether this direction points toward lower coordinates.
    pub fn is_backward(self) -> bool {
        matches!(self, Direction::Left | Direction::Up)
    }

    /// Lowercase name, used in diagnostics and trace events.
    pub fn name(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(format!("unknown direction '{other}'")),
        }
    }
}

impl Axis {
    /// The two directions along this axis, backward first.
    pub fn directions(self) -> [Direction; 2] {
        match self {
            Axis::X => Direction::HORIZONTAL,
            Axis::Y => Direction::VERTICAL,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}
