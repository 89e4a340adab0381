//! Wind state and the compass geometry of the Moore neighborhood.
//!
//! Neighbor slots use a fixed ordering shared by the adjacency builder, the
//! horizontal ignition scan, and the wind-directed spread: the four cardinal
//! directions first, then the four diagonals. Slot indices >= 4 are diagonal
//! and get the `sqrt(2)` distance correction.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Number of neighbor slots in a Moore neighborhood.
pub(crate) const NEIGHBOR_SLOTS: usize = 8;

/// Shape constant of the fire-lean sigmoid.
const WIND_SHAPE: f64 = 0.2;

/// One of the eight compass directions.
///
/// Serialized with the uppercase names of the configuration contract
/// (`"NORTH"`, `"SOUTHWEST"`, ...). `y` grows southward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompassDirection {
    North,
    East,
    South,
    West,
    NorthWest,
    NorthEast,
    SouthEast,
    SouthWest,
}

/// All directions in neighbor-slot order: cardinals first, then diagonals.
pub(crate) const SLOT_ORDER: [CompassDirection; NEIGHBOR_SLOTS] = [
    CompassDirection::North,
    CompassDirection::East,
    CompassDirection::South,
    CompassDirection::West,
    CompassDirection::NorthWest,
    CompassDirection::NorthEast,
    CompassDirection::SouthEast,
    CompassDirection::SouthWest,
];

impl CompassDirection {
    /// Slot index of this direction in a cell's neighbor array.
    #[must_use]
    pub const fn neighbor_slot(self) -> usize {
        match self {
            CompassDirection::North => 0,
            CompassDirection::East => 1,
            CompassDirection::South => 2,
            CompassDirection::West => 3,
            CompassDirection::NorthWest => 4,
            CompassDirection::NorthEast => 5,
            CompassDirection::SouthEast => 6,
            CompassDirection::SouthWest => 7,
        }
    }

    /// Grid offset `(dx, dy)` of the neighboring cell, `y` growing southward.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            CompassDirection::North => (0, -1),
            CompassDirection::East => (1, 0),
            CompassDirection::South => (0, 1),
            CompassDirection::West => (-1, 0),
            CompassDirection::NorthWest => (-1, -1),
            CompassDirection::NorthEast => (1, -1),
            CompassDirection::SouthEast => (1, 1),
            CompassDirection::SouthWest => (-1, 1),
        }
    }

    /// Whether this direction crosses a cell corner rather than an edge.
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        self.neighbor_slot() >= 4
    }

    /// Parse an uppercase configuration name (`"NORTH"`, ...).
    pub fn from_name(name: &str) -> Result<Self, ParseError> {
        SLOT_ORDER
            .into_iter()
            .find(|dir| dir.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ParseError::UnknownDirection(name.to_string()))
    }

    /// Configuration name of this direction.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CompassDirection::North => "NORTH",
            CompassDirection::East => "EAST",
            CompassDirection::South => "SOUTH",
            CompassDirection::West => "WEST",
            CompassDirection::NorthWest => "NORTHWEST",
            CompassDirection::NorthEast => "NORTHEAST",
            CompassDirection::SouthEast => "SOUTHEAST",
            CompassDirection::SouthWest => "SOUTHWEST",
        }
    }
}

/// Global wind state, shared read-only by all cells during a step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// Wind speed (km/h), non-negative
    pub velocity: f64,
    /// Direction the flame leans toward
    pub direction: CompassDirection,
}

impl Wind {
    /// Calm wind, arbitrary direction.
    #[must_use]
    pub const fn calm() -> Self {
        Wind {
            velocity: 0.0,
            direction: CompassDirection::North,
        }
    }
}

/// Flame lean angle in degrees for a given wind velocity.
///
/// `angle = 90 * (1 - sigmoid(0.2 * v))`: calm wind gives 45 degrees,
/// strong wind pushes the flame toward horizontal (angle -> 0).
#[must_use]
pub fn fire_lean_angle(velocity: f64) -> f64 {
    90.0 * (1.0 - sigmoid(WIND_SHAPE * velocity))
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
