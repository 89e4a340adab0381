//! Terrain grid: topology, the two-phase synchronous step, fire spread
//! between cells, editing, and statistics.
//!
//! A step is compute-then-commit: phase 1 reads committed state and writes
//! staging buffers, phase 2 commits every cell behind a full barrier. The
//! one deliberate exception is wind-directed spread, which writes a target
//! neighbor's temperature inside phase 1 (last writer wins); because of it
//! phase 1 runs sequentially, while phase 2 and statistics are cell-local
//! and run on rayon.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::cell::{Cell, LEVELS};
use crate::config::{GenerationWindow, SimulationConfig};
use crate::core_types::{
    fire_lean_angle, EditAction, VegetationKind, Wind, NEIGHBOR_SLOTS, SEEDED_KINDS, SLOT_ORDER,
};
use crate::error::{ConfigError, ParseError};
use crate::snapshot::CellRecord;
use crate::stats::{CellSnapshot, SimulationStats};

/// Base probability of fire crossing to an adjacent cell or layer.
const BASE_SPREAD_PROBABILITY: f64 = 0.1;

/// Horizontal distance between adjacent cells.
const CELL_DISTANCE: f64 = 1.0;

/// How cells on the outer ring are wired to neighbors.
///
/// The reference behavior is `InteriorOnly`: border cells get no neighbors
/// at all, forming a no-man's land the fire cannot cross. This is a policy,
/// not an oversight; the alternatives exist so edge treatment can change
/// without touching the combustion algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdjacencyPolicy {
    /// Only strictly interior cells are wired (reference behavior)
    #[default]
    InteriorOnly,
    /// Toroidal wraparound; every cell gets eight neighbors
    Wrap,
    /// Out-of-range slots clamp to the border; slots landing on the cell
    /// itself stay empty
    Clamp,
}

/// Optional construction knobs beyond the configuration record.
#[derive(Debug, Clone, Default)]
pub struct GridOptions {
    /// Seed for the simulation's random generator; entropy-seeded if unset
    pub seed: Option<u64>,
    pub adjacency: AdjacencyPolicy,
    /// Vegetation window override; defaults to the config's window at the
    /// reference origin
    pub window: Option<GenerationWindow>,
}

/// The full simulation state: all cells, their adjacency, wind, and the
/// injected random generator.
pub struct Grid {
    width: usize,
    height: usize,
    /// Row-major: `cells[y * width + x]`
    cells: Vec<Cell>,
    /// Per-cell neighbor indices in fixed slot order (N, E, S, W, NW, NE,
    /// SE, SW); `None` where the policy leaves a slot unwired
    neighbors: Vec<[Option<usize>; NEIGHBOR_SLOTS]>,
    wind: Wind,
    config: SimulationConfig,
    window: GenerationWindow,
    adjacency: AdjacencyPolicy,
    rng: StdRng,
}

impl Grid {
    /// Build a grid with default options (reference adjacency, config
    /// window, entropy seed).
    pub fn new(
        width: usize,
        height: usize,
        config: SimulationConfig,
    ) -> Result<Self, ConfigError> {
        Self::with_options(width, height, config, GridOptions::default())
    }

    /// Build a grid, validating the configuration and window first.
    pub fn with_options(
        width: usize,
        height: usize,
        config: SimulationConfig,
        options: GridOptions,
    ) -> Result<Self, ConfigError> {
        let GridOptions {
            seed,
            adjacency,
            window,
        } = options;

        config.validate()?;
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyGrid { width, height });
        }
        let window = window.unwrap_or_else(|| GenerationWindow::from_config(&config));
        window.check_fits(width, height)?;

        let mut rng = StdRng::seed_from_u64(seed.unwrap_or_else(rand::random));
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::new(x, y, &config, &mut rng));
            }
        }
        let neighbors = build_adjacency(width, height, adjacency);
        let wind = config.wind();

        let mut grid = Grid {
            width,
            height,
            cells,
            neighbors,
            wind,
            config,
            window,
            adjacency,
            rng,
        };
        grid.seed_window();
        info!(width, height, "wildfire grid built");
        Ok(grid)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn wind(&self) -> Wind {
        self.wind
    }

    /// Change the wind between steps. The wind is never mutated during a
    /// step.
    pub fn set_wind(&mut self, wind: Wind) {
        self.wind = wind;
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub fn adjacency(&self) -> AdjacencyPolicy {
        self.adjacency
    }

    /// Borrow a cell, if in range.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        (x < self.width && y < self.height).then(|| &self.cells[self.index(x, y)])
    }

    /// Advance the automaton by one synchronous step.
    pub fn step(&mut self) {
        // Phase 1: stage every cell's next state. Sequential because
        // wind-directed spread writes into neighbor cells mid-phase.
        for idx in 0..self.cells.len() {
            self.compute_next_state(idx);
        }
        // Full barrier, then phase 2: commit is cell-local.
        self.cells.par_iter_mut().for_each(Cell::commit);
    }

    /// Reset every cell to bare ground; topology is untouched.
    pub fn clear(&mut self) {
        for idx in 0..self.cells.len() {
            self.cells[idx].reset(VegetationKind::Empty, &self.config, &mut self.rng);
        }
    }

    /// Clear the grid and reseed the vegetation window with fresh random
    /// kinds, equivalent to rebuilding the map without changing topology.
    pub fn regenerate(&mut self) {
        debug!("regenerating vegetation");
        self.clear();
        self.seed_window();
    }

    /// Apply an interactive edit to one cell. Out-of-range coordinates are
    /// silently ignored by contract.
    pub fn edit_cell(&mut self, x: usize, y: usize, action: EditAction) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.index(x, y);
        match action {
            EditAction::Vegetation(kind) => {
                self.cells[idx].reset(kind, &self.config, &mut self.rng);
            }
            EditAction::Ignite => self.cells[idx].ignite(),
        }
    }

    /// Fresh aggregate statistics; a full scan, never incremental.
    #[must_use]
    pub fn compute_stats(&self) -> SimulationStats {
        self.cells
            .par_iter()
            .map(SimulationStats::tally)
            .reduce(SimulationStats::default, SimulationStats::merge)
    }

    /// Full read-only snapshot of one cell, if in range.
    #[must_use]
    pub fn cell_stats(&self, x: usize, y: usize) -> Option<CellSnapshot> {
        self.cell(x, y).map(Cell::snapshot)
    }

    /// Export the map snapshot: one record per cell, row-major.
    #[must_use]
    pub fn to_records(&self) -> Vec<CellRecord> {
        self.cells
            .iter()
            .map(|cell| {
                let (x, y) = cell.position();
                CellRecord {
                    x,
                    y,
                    elevation: cell.elevation(),
                    height: cell.height(),
                    current_state: cell.kind().display_name().to_string(),
                }
            })
            .collect()
    }

    /// Import a map snapshot: clear the grid, then reset each addressed
    /// cell through the same path as interactive editing and overwrite its
    /// terrain values.
    ///
    /// An unrecognized state label fails that record and aborts the rest of
    /// the import; records addressing out-of-range cells are skipped.
    pub fn apply_records(&mut self, records: &[CellRecord]) -> Result<(), ParseError> {
        debug!(records = records.len(), "importing map snapshot");
        self.clear();
        for record in records {
            let kind = VegetationKind::from_display_name(&record.current_state)?;
            if record.x >= self.width || record.y >= self.height {
                continue;
            }
            let idx = self.index(record.x, record.y);
            self.cells[idx].reset(kind, &self.config, &mut self.rng);
            self.cells[idx].set_terrain(record.elevation, record.height);
        }
        Ok(())
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Assign every cell in the generation window a uniformly random
    /// vegetation kind.
    fn seed_window(&mut self) {
        let mut seeded = 0usize;
        for y in self.window.origin_y..self.window.origin_y + self.window.height {
            for x in self.window.origin_x..self.window.origin_x + self.window.width {
                let kind = SEEDED_KINDS[self.rng.random_range(0..SEEDED_KINDS.len())];
                let idx = self.index(x, y);
                self.cells[idx].reset(kind, &self.config, &mut self.rng);
                seeded += 1;
            }
        }
        debug!(seeded, "vegetation window seeded");
    }

    /// Phase 1 for a single cell: vertical combustion, horizontal neighbor
    /// ignition, in-stack spread, then wind-directed spread.
    fn compute_next_state(&mut self, idx: usize) {
        if self.cells[idx].kind() == VegetationKind::Empty {
            return;
        }

        let air_temperature = self.config.air_temperature;
        self.cells[idx].burn(air_temperature);

        let ignition = self.cells[idx].actual_ignition_temperature();
        let elevation = self.cells[idx].elevation();

        // Horizontal ignition: a hot neighbor ground layer may pull this
        // cell's ground layer up to its temperature. Elevation gaps and
        // diagonal adjacency slow the crossing down.
        for slot in 0..NEIGHBOR_SLOTS {
            let Some(n_idx) = self.neighbors[idx][slot] else {
                continue;
            };
            let neighbor_temperature = self.cells[n_idx].layers()[0].temperature;
            if neighbor_temperature >= ignition {
                let gap = (elevation - self.cells[n_idx].elevation()) as f64;
                let delta = (gap * gap + CELL_DISTANCE * CELL_DISTANCE).sqrt();
                let mut probability = BASE_SPREAD_PROBABILITY / (1.0 + delta);
                if slot >= 4 {
                    probability /= std::f64::consts::SQRT_2;
                }
                if self.rng.random::<f64>() < probability {
                    self.cells[idx].stage_layer_temperature(0, neighbor_temperature);
                }
            }
        }

        self.cells[idx].spread_within_stack(&mut self.rng);

        self.wind_spread(idx, elevation);
    }

    /// Wind-directed spread: project each burning-capable layer of this
    /// cell onto the wind-facing neighbor's stack along the flame lean
    /// angle, and on success write that neighbor's layer temperature
    /// directly (current and staged) to this cell's layer temperature.
    ///
    /// This is the single phase-1 cross-cell write; concurrent writes to
    /// the same target layer within one step are last-writer-wins.
    fn wind_spread(&mut self, idx: usize, elevation: i64) {
        let slot = self.wind.direction.neighbor_slot();
        let Some(n_idx) = self.neighbors[idx][slot] else {
            return;
        };

        let lean = fire_lean_angle(self.wind.velocity).to_radians();
        let height = self.cells[idx].height();
        let n_elevation = self.cells[n_idx].elevation() as f64;
        let n_height = self.cells[n_idx].height();

        let mut probability = BASE_SPREAD_PROBABILITY;
        if self.wind.direction.is_diagonal() {
            probability *= std::f64::consts::SQRT_2;
        }

        for k in (0..LEVELS).rev() {
            let fraction = k as f64 / (LEVELS - 1) as f64;
            let projected = elevation as f64 + height * fraction * lean.sin();
            // Truncating cast keeps the reference mapping semantics: the
            // 0/0 at ground level on flat terrain resolves to layer 0, and
            // out-of-range projections saturate and get rejected.
            let target = ((projected - n_elevation) * LEVELS as f64 / n_height / fraction) as i64;
            if (0..LEVELS as i64).contains(&target) && self.rng.random::<f64>() < probability {
                let temperature = self.cells[idx].layers()[k].temperature;
                self.cells[n_idx].force_layer_temperature(target as usize, temperature);
            }
        }
    }
}

/// Wire the Moore neighborhood for every cell under the given policy.
fn build_adjacency(
    width: usize,
    height: usize,
    policy: AdjacencyPolicy,
) -> Vec<[Option<usize>; NEIGHBOR_SLOTS]> {
    let mut neighbors = vec![[None; NEIGHBOR_SLOTS]; width * height];
    for y in 0..height {
        for x in 0..width {
            if policy == AdjacencyPolicy::InteriorOnly
                && !(x >= 1 && x + 1 < width && y >= 1 && y + 1 < height)
            {
                continue;
            }
            let slots = &mut neighbors[y * width + x];
            for (slot, direction) in SLOT_ORDER.iter().enumerate() {
                let (dx, dy) = direction.offset();
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                let target = match policy {
                    // Interior cells have all eight neighbors in range
                    AdjacencyPolicy::InteriorOnly => (nx as usize, ny as usize),
                    AdjacencyPolicy::Wrap => (
                        nx.rem_euclid(width as i64) as usize,
                        ny.rem_euclid(height as i64) as usize,
                    ),
                    AdjacencyPolicy::Clamp => (
                        nx.clamp(0, width as i64 - 1) as usize,
                        ny.clamp(0, height as i64 - 1) as usize,
                    ),
                };
                if target != (x, y) {
                    slots[slot] = Some(target.1 * width + target.0);
                }
            }
        }
    }
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::CompassDirection;

    fn test_config() -> SimulationConfig {
        SimulationConfig {
            wind_velocity: 0.0,
            wind_direction: CompassDirection::South,
            mean_moisture: 0.5,
            moisture_variance: 0.0,
            air_temperature: 30.0,
            map_width: 10,
            map_height: 10,
            ..SimulationConfig::default()
        }
    }

    fn bare_options(seed: u64) -> GridOptions {
        GridOptions {
            seed: Some(seed),
            window: Some(GenerationWindow::new(0, 0, 0, 0)),
            ..GridOptions::default()
        }
    }

    /// 5x5 grid of coniferous cells with fixed humidity 0.5.
    fn coniferous_grid(seed: u64) -> Grid {
        let mut grid = Grid::with_options(5, 5, test_config(), bare_options(seed)).unwrap();
        for y in 0..5 {
            for x in 0..5 {
                grid.edit_cell(x, y, EditAction::Vegetation(VegetationKind::Coniferous));
            }
        }
        grid
    }

    #[test]
    fn build_seeds_only_the_window() {
        let config = test_config();
        let options = GridOptions {
            seed: Some(42),
            ..GridOptions::default()
        };
        // Default window: 10x10 at origin (8, 5)
        let grid = Grid::with_options(30, 20, config, options).unwrap();

        let mut vegetated = 0;
        for y in 0..20 {
            for x in 0..30 {
                let inside = (8..18).contains(&x) && (5..15).contains(&y);
                let cell = grid.cell(x, y).unwrap();
                if inside {
                    assert_ne!(cell.kind(), VegetationKind::Empty, "({x}, {y}) bare");
                    vegetated += 1;
                } else {
                    assert_eq!(cell.kind(), VegetationKind::Empty, "({x}, {y}) seeded");
                }
            }
        }
        assert_eq!(vegetated, 100);
        assert_eq!(grid.compute_stats().total_cells, 100);
    }

    #[test]
    fn window_must_fit_in_grid() {
        let config = test_config();
        // Default origin (8, 5) + 10x10 window does not fit in 10x10
        assert!(matches!(
            Grid::new(10, 10, config),
            Err(ConfigError::WindowOutOfBounds { .. })
        ));
    }

    #[test]
    fn border_cells_have_no_neighbors() {
        let grid = coniferous_grid(1);
        for (x, y) in [(0, 0), (2, 0), (4, 4), (0, 3)] {
            let idx = grid.index(x, y);
            assert!(
                grid.neighbors[idx].iter().all(Option::is_none),
                "border cell ({x}, {y}) should be unwired"
            );
        }
    }

    #[test]
    fn interior_cell_slots_follow_compass_order() {
        let grid = coniferous_grid(1);
        let idx = grid.index(2, 2);
        let expected = [
            (2, 1), // N
            (3, 2), // E
            (2, 3), // S
            (1, 2), // W
            (1, 1), // NW
            (3, 1), // NE
            (3, 3), // SE
            (1, 3), // SW
        ];
        for (slot, (nx, ny)) in expected.into_iter().enumerate() {
            assert_eq!(grid.neighbors[idx][slot], Some(grid.index(nx, ny)));
        }
    }

    #[test]
    fn wrap_policy_wires_the_border() {
        let options = GridOptions {
            adjacency: AdjacencyPolicy::Wrap,
            ..bare_options(1)
        };
        let grid = Grid::with_options(5, 5, test_config(), options).unwrap();
        let idx = grid.index(0, 0);
        // North of (0, 0) wraps to (0, 4)
        assert_eq!(grid.neighbors[idx][0], Some(grid.index(0, 4)));
        // NorthWest wraps to (4, 4)
        assert_eq!(grid.neighbors[idx][4], Some(grid.index(4, 4)));
        assert!(grid.neighbors[idx].iter().all(Option::is_some));
    }

    #[test]
    fn clamp_policy_drops_self_slots() {
        let options = GridOptions {
            adjacency: AdjacencyPolicy::Clamp,
            ..bare_options(1)
        };
        let grid = Grid::with_options(5, 5, test_config(), options).unwrap();
        let idx = grid.index(0, 0);
        // North clamps onto the cell itself and stays unwired
        assert_eq!(grid.neighbors[idx][0], None);
        // East is a real neighbor
        assert_eq!(grid.neighbors[idx][1], Some(grid.index(1, 0)));
        // NorthEast clamps to (1, 0)
        assert_eq!(grid.neighbors[idx][5], Some(grid.index(1, 0)));
    }

    #[test]
    fn out_of_range_edits_are_ignored() {
        let mut grid = coniferous_grid(5);
        grid.edit_cell(99, 2, EditAction::Ignite);
        grid.edit_cell(2, 99, EditAction::Vegetation(VegetationKind::Litter));
        assert_eq!(grid.compute_stats().coniferous_cells, 25);
    }

    #[test]
    fn ignited_cell_burns_after_one_step() {
        let mut grid = coniferous_grid(5);
        // The upwind neighbor could overwrite the source's temperature
        // through the wind path; bare it out so the outcome is exact
        grid.edit_cell(2, 1, EditAction::Vegetation(VegetationKind::Empty));
        grid.edit_cell(2, 2, EditAction::Ignite);
        assert!(grid.cell(2, 2).unwrap().fire_source());

        grid.step();
        let snapshot = grid.cell_stats(2, 2).unwrap();
        assert!(snapshot.layers[0].burning);
        // Neighbors may or may not have caught in the same step
        assert!(grid.compute_stats().burning_cells >= 1);
    }

    #[test]
    fn burnt_cells_leave_the_kind_counts() {
        let mut grid = coniferous_grid(6);
        // Shield the source from upwind quenching so it chars for certain
        grid.edit_cell(2, 1, EditAction::Vegetation(VegetationKind::Empty));
        grid.edit_cell(2, 2, EditAction::Ignite);
        grid.step();
        grid.step();

        let stats = grid.compute_stats();
        assert_eq!(stats.total_cells, 24);
        assert!(stats.burnt_cells >= 1);
        assert!(stats.coniferous_cells <= 23);
        assert_eq!(
            stats.coniferous_cells + stats.burnt_cells,
            24,
            "every vegetated cell is coniferous or burnt"
        );
    }

    #[test]
    fn clear_resets_everything() {
        let mut grid = coniferous_grid(7);
        grid.edit_cell(2, 2, EditAction::Ignite);
        grid.step();
        grid.clear();

        let stats = grid.compute_stats();
        assert_eq!(stats.total_cells, 0);
        assert_eq!(stats.burning_cells, 0);
        assert!(!grid.cell(2, 2).unwrap().fire_source());
    }

    #[test]
    fn regenerate_refills_the_window() {
        let config = test_config();
        let options = GridOptions {
            seed: Some(42),
            ..GridOptions::default()
        };
        let mut grid = Grid::with_options(30, 20, config, options).unwrap();
        grid.regenerate();
        assert_eq!(grid.compute_stats().total_cells, 100);
    }

    #[test]
    fn empty_cells_are_never_ignited_passively() {
        let mut grid = coniferous_grid(8);
        grid.edit_cell(2, 1, EditAction::Vegetation(VegetationKind::Empty));
        grid.edit_cell(2, 2, EditAction::Ignite);
        for _ in 0..30 {
            grid.step();
        }
        assert!(!grid.cell(2, 1).unwrap().is_on_fire());
        assert!(!grid.cell(2, 1).unwrap().is_burnt());
    }

    #[test]
    fn export_is_exhaustive_row_major() {
        let grid = coniferous_grid(9);
        let records = grid.to_records();
        assert_eq!(records.len(), 25);
        assert_eq!((records[0].x, records[0].y), (0, 0));
        assert_eq!((records[7].x, records[7].y), (2, 1));
        assert!(records
            .iter()
            .all(|r| r.current_state == "Coniferous"));
    }

    #[test]
    fn import_rejects_unknown_labels() {
        let mut grid = coniferous_grid(10);
        let records = vec![CellRecord {
            x: 1,
            y: 1,
            elevation: 0,
            height: 1.0,
            current_state: "Plasma".to_string(),
        }];
        let err = grid.apply_records(&records).unwrap_err();
        assert_eq!(err, ParseError::UnknownKind("Plasma".to_string()));
    }

    #[test]
    fn import_skips_out_of_range_records() {
        let mut grid = coniferous_grid(11);
        let records = vec![
            CellRecord {
                x: 40,
                y: 40,
                elevation: 3,
                height: 2.0,
                current_state: "Litter".to_string(),
            },
            CellRecord {
                x: 1,
                y: 1,
                elevation: 9,
                height: 2.5,
                current_state: "Floor".to_string(),
            },
        ];
        grid.apply_records(&records).unwrap();
        let cell = grid.cell(1, 1).unwrap();
        assert_eq!(cell.kind(), VegetationKind::Floor);
        assert_eq!(cell.elevation(), 9);
        assert_eq!(cell.height(), 2.5);
        // The rest of the grid was cleared by the import
        assert_eq!(grid.compute_stats().total_cells, 1);
    }
}
