use crate::map::position::{Axis, Position};
use std::fmt;

/// Number of managed intersection zones.
pub const NUM_ZONES: usize = 5;

/// A named region of intersection cells.
///
/// The four entry zones are the one-cell-deep bands through which traffic
/// enters and leaves the core; the center is the shared 3x3 block where the
/// two axes cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Cells (1,2), (1,3), (1,4).
    NorthEntry,
    /// Cells (5,2), (5,3), (5,4).
    SouthEntry,
    /// Cells (2,1), (3,1), (4,1).
    WestEntry,
    /// Cells (2,5), (3,5), (4,5).
    EastEntry,
    /// Cells (2..4, 2..4).
    Center,
}

impl Zone {
    pub const ALL: [Zone; NUM_ZONES] = [
        Zone::NorthEntry,
        Zone::SouthEntry,
        Zone::WestEntry,
        Zone::EastEntry,
        Zone::Center,
    ];

    pub fn index(self) -> usize {
        match self {
            Zone::NorthEntry => 0,
            Zone::SouthEntry => 1,
            Zone::WestEntry => 2,
            Zone::EastEntry => 3,
            Zone::Center => 4,
        }
    }

    /// Traffic axis served by an entry zone; the center serves both and
    /// therefore has no single axis.
    pub fn axis(self) -> Option<Axis> {
        match self {
            Zone::NorthEntry | Zone::SouthEntry => Some(Axis::NorthSouth),
            Zone::WestEntry | Zone::EastEntry => Some(Axis::EastWest),
            Zone::Center => None,
        }
    }

    /// The grid cells belonging to this zone.
    pub fn cells(self) -> &'static [Position] {
        const NORTH_ENTRY: [Position; 3] = [
            Position::new(1, 2),
            Position::new(1, 3),
            Position::new(1, 4),
        ];
        const SOUTH_ENTRY: [Position; 3] = [
            Position::new(5, 2),
            Position::new(5, 3),
            Position::new(5, 4),
        ];
        const WEST_ENTRY: [Position; 3] = [
            Position::new(2, 1),
            Position::new(3, 1),
            Position::new(4, 1),
        ];
        const EAST_ENTRY: [Position; 3] = [
            Position::new(2, 5),
            Position::new(3, 5),
            Position::new(4, 5),
        ];
        const CENTER: [Position; 9] = [
            Position::new(2, 2),
            Position::new(2, 3),
            Position::new(2, 4),
            Position::new(3, 2),
            Position::new(3, 3),
            Position::new(3, 4),
            Position::new(4, 2),
            Position::new(4, 3),
            Position::new(4, 4),
        ];
        match self {
            Zone::NorthEntry => &NORTH_ENTRY,
            Zone::SouthEntry => &SOUTH_ENTRY,
            Zone::WestEntry => &WEST_ENTRY,
            Zone::EastEntry => &EAST_ENTRY,
            Zone::Center => &CENTER,
        }
    }
}

impl fmt::Display for Zone {
    /// Formats the zone for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crossroads_sim_core::zones::Zone;
    ///
    /// assert_eq!(format!("{}", Zone::NorthEntry), "north_entry");
    /// assert_eq!(format!("{}", Zone::Center), "center");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::NorthEntry => write!(f, "north_entry"),
            Zone::SouthEntry => write!(f, "south_entry"),
            Zone::WestEntry => write!(f, "west_entry"),
            Zone::EastEntry => write!(f, "east_entry"),
            Zone::Center => write!(f, "center"),
        }
    }
}

/// Maps a grid position to the intersection zone containing it, or `None`
/// for cells outside the managed intersection.
pub fn zone_for(pos: Position) -> Option<Zone> {
    if pos.is_outside() {
        return None;
    }
    let (row, col) = (pos.row, pos.col);
    if (2..=4).contains(&row) && (2..=4).contains(&col) {
        return Some(Zone::Center);
    }
    if row == 1 && (2..=4).contains(&col) {
        return Some(Zone::NorthEntry);
    }
    if row == 5 && (2..=4).contains(&col) {
        return Some(Zone::SouthEntry);
    }
    if col == 1 && (2..=4).contains(&row) {
        return Some(Zone::WestEntry);
    }
    if col == 5 && (2..=4).contains(&row) {
        return Some(Zone::EastEntry);
    }
    None
}

/// True iff the position lies inside the managed intersection.
pub fn is_intersection_position(pos: Position) -> bool {
    zone_for(pos).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_mapping_matches_cell_lists() {
        for zone in Zone::ALL {
            for &cell in zone.cells() {
                assert_eq!(zone_for(cell), Some(zone), "cell {} misclassified", cell);
            }
        }
    }

    #[test]
    fn test_boundary_ring_is_unzoned() {
        assert_eq!(zone_for(Position::new(0, 2)), None);
        assert_eq!(zone_for(Position::new(6, 4)), None);
        assert_eq!(zone_for(Position::new(4, 0)), None);
        assert_eq!(zone_for(Position::new(2, 6)), None);
        assert_eq!(zone_for(Position::OUTSIDE), None);
        // Corners of the inner ring belong to no zone either.
        assert_eq!(zone_for(Position::new(1, 1)), None);
        assert_eq!(zone_for(Position::new(5, 5)), None);
    }

    #[test]
    fn test_zone_axes() {
        assert_eq!(Zone::NorthEntry.axis(), Some(Axis::NorthSouth));
        assert_eq!(Zone::SouthEntry.axis(), Some(Axis::NorthSouth));
        assert_eq!(Zone::WestEntry.axis(), Some(Axis::EastWest));
        assert_eq!(Zone::EastEntry.axis(), Some(Axis::EastWest));
        assert_eq!(Zone::Center.axis(), None);
    }
}
