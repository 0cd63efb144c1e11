use std::fmt;

/// Axis of a single-cell move on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Row changes, column stays (northbound or southbound).
    NorthSouth,
    /// Column changes, row stays (eastbound or westbound).
    EastWest,
}

impl fmt::Display for Axis {
    /// Formats the axis for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crossroads_sim_core::map::Axis;
    ///
    /// assert_eq!(format!("{}", Axis::NorthSouth), "north-south");
    /// assert_eq!(format!("{}", Axis::EastWest), "east-west");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::NorthSouth => write!(f, "north-south"),
            Axis::EastWest => write!(f, "east-west"),
        }
    }
}

/// A cell coordinate on the 7x7 crossing grid.
///
/// `(-1, -1)` is the sentinel for "outside the map": vehicles start there,
/// return there when they exit, and routes are terminated by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    /// The outside-the-map sentinel.
    pub const OUTSIDE: Position = Position { row: -1, col: -1 };

    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// True for the sentinel coordinate.
    pub fn is_outside(&self) -> bool {
        self.row == -1 || self.col == -1
    }

    /// Classifies the move from `self` to `to` as a straight single-cell
    /// step along one axis. Any other displacement (routes only ever produce
    /// straight steps) yields `None`.
    pub fn axis_towards(&self, to: Position) -> Option<Axis> {
        let row_diff = (to.row - self.row).abs();
        let col_diff = (to.col - self.col).abs();
        if col_diff == 0 && row_diff == 1 {
            return Some(Axis::NorthSouth);
        }
        if row_diff == 0 && col_diff == 1 {
            return Some(Axis::EastWest);
        }
        None
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_outside() {
            return write!(f, "(outside)");
        }
        write!(f, "({},{})", self.row, self.col)
    }
}
