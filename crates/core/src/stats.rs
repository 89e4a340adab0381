//! Aggregate and per-cell statistics snapshots.
//!
//! Statistics are recomputed from scratch on request, never maintained
//! incrementally; they are plain data for external observers.

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, LayerState, LEVELS};
use crate::core_types::VegetationKind;

/// Whole-grid aggregate snapshot.
///
/// "Burnt" means at least one layer has consumed fuel; per-kind counts only
/// include cells that have not burnt yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Cells with any vegetation
    pub total_cells: usize,
    /// Cells with at least one layer below full fuel
    pub burnt_cells: usize,
    /// Cells with at least one burning layer
    pub burning_cells: usize,
    pub litter_cells: usize,
    pub floor_cells: usize,
    pub understory_cells: usize,
    pub coniferous_cells: usize,
    pub deciduous_cells: usize,
}

impl SimulationStats {
    /// Tally a single cell.
    pub(crate) fn tally(cell: &Cell) -> Self {
        let mut stats = SimulationStats::default();
        if cell.kind() == VegetationKind::Empty {
            return stats;
        }
        stats.total_cells = 1;
        let burnt = cell.is_burnt();
        if burnt {
            stats.burnt_cells = 1;
        }
        if cell.is_on_fire() {
            stats.burning_cells = 1;
        }
        if !burnt {
            match cell.kind() {
                VegetationKind::Litter => stats.litter_cells = 1,
                VegetationKind::Floor => stats.floor_cells = 1,
                VegetationKind::Understory => stats.understory_cells = 1,
                VegetationKind::Coniferous => stats.coniferous_cells = 1,
                VegetationKind::Deciduous => stats.deciduous_cells = 1,
                VegetationKind::Empty => {}
            }
        }
        stats
    }

    /// Combine two partial tallies (parallel reduction operator).
    pub(crate) fn merge(self, other: Self) -> Self {
        SimulationStats {
            total_cells: self.total_cells + other.total_cells,
            burnt_cells: self.burnt_cells + other.burnt_cells,
            burning_cells: self.burning_cells + other.burning_cells,
            litter_cells: self.litter_cells + other.litter_cells,
            floor_cells: self.floor_cells + other.floor_cells,
            understory_cells: self.understory_cells + other.understory_cells,
            coniferous_cells: self.coniferous_cells + other.coniferous_cells,
            deciduous_cells: self.deciduous_cells + other.deciduous_cells,
        }
    }
}

/// Full read-only snapshot of one cell, for inspection tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub x: usize,
    pub y: usize,
    pub elevation: i64,
    pub kind: VegetationKind,
    pub height: f64,
    pub humidity: f64,
    pub fire_source: bool,
    /// Layer states ground to canopy top
    pub layers: [LayerState; LEVELS],
}

impl CellSnapshot {
    pub(crate) fn of(cell: &Cell) -> Self {
        let (x, y) = cell.position();
        CellSnapshot {
            x,
            y,
            elevation: cell.elevation(),
            kind: cell.kind(),
            height: cell.height(),
            humidity: cell.humidity(),
            fire_source: cell.fire_source(),
            layers: *cell.layers(),
        }
    }
}
