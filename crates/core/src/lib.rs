//! Core wildfire spread simulation engine.
//!
//! A stochastic cellular automaton over a rectangular grid where every cell
//! carries a vertical stack of combustible layers. Fire spreads within a
//! cell's stack, across the Moore neighborhood, and downwind along the
//! flame lean angle. Steps are synchronous: phase 1 stages next state from
//! committed state, phase 2 commits every cell at once.
//!
//! The engine is deterministic under a fixed seed and performs no I/O of
//! its own; the JSON helpers in [`snapshot`] exist for external persistence
//! layers.
//!
//! ```no_run
//! use wildfire_sim_core::{EditAction, Grid, GridOptions, SimulationConfig};
//!
//! let config = SimulationConfig::default();
//! let mut grid = Grid::with_options(
//!     100,
//!     100,
//!     config,
//!     GridOptions {
//!         seed: Some(42),
//!         ..GridOptions::default()
//!     },
//! )
//! .unwrap();
//!
//! grid.edit_cell(30, 30, EditAction::Ignite);
//! for _ in 0..100 {
//!     grid.step();
//! }
//! println!("{} cells burnt", grid.compute_stats().burnt_cells);
//! ```

pub mod cell;
pub mod config;
pub mod core_types;
pub mod error;
pub mod grid;
pub mod snapshot;
pub mod stats;

pub use cell::{Cell, LayerState, LEVELS, STANDARD_HUMIDITY};
pub use config::{GenerationWindow, SimulationConfig};
pub use core_types::{fire_lean_angle, CompassDirection, EditAction, VegetationKind, Wind};
pub use error::{ConfigError, ParseError};
pub use grid::{AdjacencyPolicy, Grid, GridOptions};
pub use snapshot::{load_config, load_map, save_config, save_map, CellRecord, PersistenceError};
pub use stats::{CellSnapshot, SimulationStats};
