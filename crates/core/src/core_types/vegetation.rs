//! Vegetation kinds and their per-kind constants.
//!
//! Modeled as a closed enum with lookup tables rather than a trait hierarchy:
//! the kind set is small and fixed, and every kind differs only in a handful
//! of scalar constants (burning temperature, canopy height statistics).

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Vegetation occupying a grid cell.
///
/// `Empty` cells never burn and are never ignited passively; they are the
/// "No Fire" state of the map exchange format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VegetationKind {
    Empty,
    Litter,
    Floor,
    Understory,
    Coniferous,
    Deciduous,
}

/// The kinds eligible for random terrain generation (everything but `Empty`).
pub(crate) const SEEDED_KINDS: [VegetationKind; 5] = [
    VegetationKind::Litter,
    VegetationKind::Floor,
    VegetationKind::Understory,
    VegetationKind::Coniferous,
    VegetationKind::Deciduous,
];

impl VegetationKind {
    /// Display name used by the map exchange format.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            VegetationKind::Empty => "No Fire",
            VegetationKind::Litter => "Litter",
            VegetationKind::Floor => "Floor",
            VegetationKind::Understory => "Understory",
            VegetationKind::Coniferous => "Coniferous",
            VegetationKind::Deciduous => "Deciduous",
        }
    }

    /// Parse a display name back into a kind (case-insensitive).
    pub fn from_display_name(label: &str) -> Result<Self, ParseError> {
        let all = [
            VegetationKind::Empty,
            VegetationKind::Litter,
            VegetationKind::Floor,
            VegetationKind::Understory,
            VegetationKind::Coniferous,
            VegetationKind::Deciduous,
        ];
        all.into_iter()
            .find(|kind| kind.display_name().eq_ignore_ascii_case(label))
            .ok_or_else(|| ParseError::UnknownKind(label.to_string()))
    }

    /// Mean canopy height in meters for this kind.
    #[must_use]
    pub const fn mean_height(self) -> f64 {
        match self {
            VegetationKind::Empty => 0.0,
            VegetationKind::Litter => 0.5,
            VegetationKind::Floor => 0.05,
            VegetationKind::Understory => 5.0,
            VegetationKind::Coniferous => 25.0,
            VegetationKind::Deciduous => 35.0,
        }
    }

    /// Variance of the canopy height Gaussian for this kind.
    #[must_use]
    pub const fn height_variance(self) -> f64 {
        match self {
            VegetationKind::Empty => 0.0,
            VegetationKind::Litter
            | VegetationKind::Floor
            | VegetationKind::Understory => 0.001,
            VegetationKind::Coniferous | VegetationKind::Deciduous => 25.0,
        }
    }
}

/// Interactive edit command for a single cell.
///
/// The transient "Fire" paint command is an edit verb, never a stored cell
/// state: igniting a cell flags it as a fire source and heats its ground
/// layer, it does not change its vegetation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    /// Reset the cell to the given kind (`Empty` clears it)
    Vegetation(VegetationKind),
    /// Mark the cell as a fire source
    Ignite,
}

impl EditAction {
    /// Parse an edit label: any vegetation display name, or `"Fire"`.
    pub fn from_label(label: &str) -> Result<Self, ParseError> {
        if label.eq_ignore_ascii_case("Fire") {
            return Ok(EditAction::Ignite);
        }
        VegetationKind::from_display_name(label).map(EditAction::Vegetation)
    }
}
