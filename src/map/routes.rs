use crate::map::position::Position;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;

/// Custom error types for gate parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// Indicates that the provided gate character is not one of A..D.
    InvalidGate(char),
}

impl fmt::Display for GateError {
    /// Formats the error message for `GateError`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateError::InvalidGate(value) => {
                write!(f, "Invalid gate: '{}', expected one of A, B, C, D", value)
            }
        }
    }
}

impl std::error::Error for GateError {}

/// One of the four cardinal entry/exit points of the crossing.
///
/// Gate letters follow the map convention: `A` is the west gate, `B` the
/// south gate, `C` the east gate and `D` the north gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    A,
    B,
    C,
    D,
}

impl Gate {
    pub const ALL: [Gate; 4] = [Gate::A, Gate::B, Gate::C, Gate::D];

    /// Parses a gate letter.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crossroads_sim_core::map::Gate;
    ///
    /// assert_eq!(Gate::from_char('B').unwrap(), Gate::B);
    /// assert!(Gate::from_char('X').is_err());
    /// ```
    pub fn from_char(value: char) -> Result<Self, GateError> {
        match value {
            'A' => Ok(Gate::A),
            'B' => Ok(Gate::B),
            'C' => Ok(Gate::C),
            'D' => Ok(Gate::D),
            other => Err(GateError::InvalidGate(other)),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Gate::A => 'A',
            Gate::B => 'B',
            Gate::C => 'C',
            Gate::D => 'D',
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Raw route table: `RAW_ROUTES[from][to]` lists the cells a vehicle visits
/// from gate `from` to gate `to`, terminated by the outside sentinel. The
/// grid is 7x7; only cells touched by some route are meaningful.
#[rustfmt::skip]
const RAW_ROUTES: [[&[(i32, i32)]; 4]; 4] = [
    /* from A */ [
        /* to A */ &[(4,0),(4,1),(4,2),(4,3),(4,4),(3,4),(2,4),(2,3),(2,2),(2,1),(2,0),(-1,-1)],
        /* to B */ &[(4,0),(4,1),(4,2),(5,2),(6,2),(-1,-1)],
        /* to C */ &[(4,0),(4,1),(4,2),(4,3),(4,4),(4,5),(4,6),(-1,-1)],
        /* to D */ &[(4,0),(4,1),(4,2),(4,3),(4,4),(3,4),(2,4),(1,4),(0,4),(-1,-1)],
    ],
    /* from B */ [
        /* to A */ &[(6,4),(5,4),(4,4),(3,4),(2,4),(2,3),(2,2),(2,1),(2,0),(-1,-1)],
        /* to B */ &[(6,4),(5,4),(4,4),(3,4),(2,4),(2,3),(2,2),(3,2),(4,2),(5,2),(6,2),(-1,-1)],
        /* to C */ &[(6,4),(5,4),(4,4),(4,5),(4,6),(-1,-1)],
        /* to D */ &[(6,4),(5,4),(4,4),(3,4),(2,4),(1,4),(0,4),(-1,-1)],
    ],
    /* from C */ [
        /* to A */ &[(2,6),(2,5),(2,4),(2,3),(2,2),(2,1),(2,0),(-1,-1)],
        /* to B */ &[(2,6),(2,5),(2,4),(2,3),(2,2),(3,2),(4,2),(5,2),(6,2),(-1,-1)],
        /* to C */ &[(2,6),(2,5),(2,4),(2,3),(2,2),(3,2),(4,2),(4,3),(4,4),(4,5),(4,6),(-1,-1)],
        /* to D */ &[(2,6),(2,5),(2,4),(1,4),(0,4),(-1,-1)],
    ],
    /* from D */ [
        /* to A */ &[(0,2),(1,2),(2,2),(2,1),(2,0),(-1,-1)],
        /* to B */ &[(0,2),(1,2),(2,2),(3,2),(4,2),(5,2),(6,2),(-1,-1)],
        /* to C */ &[(0,2),(1,2),(2,2),(3,2),(4,2),(4,3),(4,4),(4,5),(4,6),(-1,-1)],
        /* to D */ &[(0,2),(1,2),(2,2),(3,2),(4,2),(4,3),(4,4),(3,4),(2,4),(1,4),(0,4),(-1,-1)],
    ],
];

lazy_static! {
    static ref ROUTES: HashMap<(Gate, Gate), Vec<Position>> = {
        let mut m = HashMap::new();
        for (from_idx, from) in Gate::ALL.iter().enumerate() {
            for (to_idx, to) in Gate::ALL.iter().enumerate() {
                let cells = RAW_ROUTES[from_idx][to_idx]
                    .iter()
                    .map(|&(row, col)| Position::new(row, col))
                    .collect();
                m.insert((*from, *to), cells);
            }
        }
        m
    };
}

/// Returns the immutable route between two gates, sentinel-terminated.
pub fn route(from: Gate, to: Gate) -> &'static [Position] {
    ROUTES
        .get(&(from, to))
        .map(|cells| cells.as_slice())
        .expect("route table covers every gate pair")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_is_sentinel_terminated() {
        for from in Gate::ALL {
            for to in Gate::ALL {
                let cells = route(from, to);
                assert!(cells.len() >= 2, "route {}->{} too short", from, to);
                assert!(cells.last().unwrap().is_outside());
                for cell in &cells[..cells.len() - 1] {
                    assert!(!cell.is_outside());
                }
            }
        }
    }

    #[test]
    fn test_routes_move_one_cell_at_a_time() {
        for from in Gate::ALL {
            for to in Gate::ALL {
                let cells = route(from, to);
                for pair in cells[..cells.len() - 1].windows(2) {
                    if pair[1].is_outside() {
                        continue;
                    }
                    assert!(
                        pair[0].axis_towards(pair[1]).is_some(),
                        "route {}->{} jumps from {} to {}",
                        from,
                        to,
                        pair[0],
                        pair[1]
                    );
                }
            }
        }
    }

    #[test]
    fn test_straight_west_east_route() {
        let cells = route(Gate::A, Gate::C);
        assert_eq!(cells.len(), 8);
        assert_eq!(cells[0], Position::new(4, 0));
        assert_eq!(cells[6], Position::new(4, 6));
        assert!(cells[7].is_outside());
    }
}
