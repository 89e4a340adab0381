//! Fire Spread Behavior Validation Suite
//!
//! End-to-end checks of the cellular automaton through the public API:
//! quiescence without ignition, spread from a single fire source, the
//! horizontal ignition probability, wind-directed spread bias, snapshot
//! round trips, and seed determinism.
//!
//! Run tests with: cargo test --test `fire_spread`

use wildfire_sim_core::{
    load_map, save_map, CompassDirection, EditAction, GenerationWindow, Grid, GridOptions,
    SimulationConfig, VegetationKind,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Config with fixed humidity so ignition thresholds are exact.
fn calm_config() -> SimulationConfig {
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

/// Square grid filled entirely with coniferous vegetation.
fn coniferous_grid(side: usize, config: SimulationConfig, seed: u64) -> Grid {
    let options = GridOptions {
        seed: Some(seed),
        window: Some(GenerationWindow::new(0, 0, 0, 0)),
        ..GridOptions::default()
    };
    let mut grid = Grid::with_options(side, side, config, options).unwrap();
    for y in 0..side {
        for x in 0..side {
            grid.edit_cell(x, y, EditAction::Vegetation(VegetationKind::Coniferous));
        }
    }
    grid
}

/// Without an ignition the grid is a fixed point: nothing burns, nothing
/// chars, temperatures stay at ambient.
#[test]
fn unignited_grid_is_quiescent() {
    init_tracing();
    let mut grid = coniferous_grid(7, calm_config(), 3);
    for _ in 0..50 {
        grid.step();
    }

    let stats = grid.compute_stats();
    assert_eq!(stats.burning_cells, 0, "no fire source, nothing may burn");
    assert_eq!(stats.burnt_cells, 0);
    assert_eq!(stats.coniferous_cells, 49);

    let snapshot = grid.cell_stats(3, 3).unwrap();
    for layer in &snapshot.layers {
        assert_eq!(layer.fuel, 1.0);
        assert_eq!(layer.temperature, 30.0);
    }
}

/// A single fire source in a fully fueled interior spreads beyond its own
/// cell within a modest number of steps.
#[test]
fn fire_spreads_from_a_single_source() {
    init_tracing();
    let mut grid = coniferous_grid(7, calm_config(), 42);
    // Bare the upwind neighbor so the source cannot be quenched through
    // the wind path before the fire takes hold
    grid.edit_cell(3, 2, EditAction::Vegetation(VegetationKind::Empty));
    grid.edit_cell(3, 3, EditAction::Ignite);

    let mut spread = false;
    for _ in 0..50 {
        grid.step();
        if grid.compute_stats().burning_cells > 1 {
            spread = true;
            break;
        }
    }
    assert!(spread, "fire never left the source cell in 50 steps");

    // A burning layer consumes fuel on the following step
    grid.step();
    grid.step();
    let stats = grid.compute_stats();
    assert!(stats.burnt_cells >= 1, "the source cell must have charred");
    assert!(grid.cell(3, 3).unwrap().fire_source());
}

/// Horizontal ignition from a hot neighbor on flat terrain fires with
/// probability 0.1 / (1 + sqrt(0 + 1)) = 0.05 per step.
#[test]
fn horizontal_ignition_frequency_on_flat_terrain() {
    init_tracing();
    let mut ignited = 0;
    for seed in 0..400 {
        let mut grid = coniferous_grid(5, calm_config(), seed);
        grid.edit_cell(2, 2, EditAction::Ignite);
        grid.step();
        // (2, 1) is upwind of the southward wind, so only the horizontal
        // path can reach it
        if grid.cell(2, 1).unwrap().is_on_fire() {
            ignited += 1;
        }
    }
    // Expected frequency 0.05 over 400 trials
    assert!(
        (4..=42).contains(&ignited),
        "horizontal ignition count {ignited} out of range for p = 0.05"
    );
}

/// Wind-directed spread biases the fire toward the downwind neighbor: with
/// a southward wind the cell below the source ignites noticeably more often
/// than the cell above it.
#[test]
fn wind_biases_spread_downwind() {
    init_tracing();
    let mut downwind = 0;
    let mut upwind = 0;
    for seed in 0..300 {
        let mut grid = coniferous_grid(5, calm_config(), seed);
        grid.edit_cell(2, 2, EditAction::Ignite);
        grid.step();
        if grid.cell(2, 3).unwrap().is_on_fire() {
            downwind += 1;
        }
        if grid.cell(2, 1).unwrap().is_on_fire() {
            upwind += 1;
        }
    }
    assert!(
        downwind > upwind,
        "downwind ignitions ({downwind}) must exceed upwind ({upwind})"
    );
    // Downwind combines wind spread (0.1) with the horizontal path (0.05)
    assert!(
        (20..=70).contains(&downwind),
        "downwind ignition count {downwind} out of range"
    );
}

/// Border cells have no neighbors under the default adjacency, so they
/// never pull fire in themselves. Wind writes can still push heat into the
/// downwind border row, so the cells checked here sit outside the
/// southward wind path.
#[test]
fn fire_never_crosses_the_border_ring() {
    init_tracing();
    let mut grid = coniferous_grid(5, calm_config(), 11);
    grid.edit_cell(2, 2, EditAction::Ignite);
    for _ in 0..100 {
        grid.step();
    }
    for (x, y) in [(0, 0), (2, 0), (4, 2), (0, 4)] {
        let cell = grid.cell(x, y).unwrap();
        assert!(
            !cell.is_on_fire() && !cell.is_burnt(),
            "border cell ({x}, {y}) caught fire"
        );
    }
}

/// A map snapshot survives a save / load / apply round trip byte for byte
/// at the record level.
#[test]
fn map_snapshot_round_trip() {
    init_tracing();
    let config = calm_config();
    let options = GridOptions {
        seed: Some(5),
        ..GridOptions::default()
    };
    let source = Grid::with_options(20, 20, config.clone(), options).unwrap();

    let path = std::env::temp_dir().join("wildfire_sim_core_map_roundtrip.json");
    save_map(&source, &path).unwrap();
    let records = load_map(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let mut restored = Grid::with_options(
        20,
        20,
        config,
        GridOptions {
            seed: Some(99),
            ..GridOptions::default()
        },
    )
    .unwrap();
    restored.apply_records(&records).unwrap();

    assert_eq!(restored.to_records(), source.to_records());
    assert_eq!(
        restored.compute_stats().total_cells,
        source.compute_stats().total_cells
    );
}

/// The same seed, edits, and step count produce identical state.
#[test]
fn fixed_seed_runs_are_deterministic() {
    init_tracing();
    let run = || {
        let mut grid = coniferous_grid(7, calm_config(), 7);
        grid.edit_cell(3, 3, EditAction::Ignite);
        for _ in 0..20 {
            grid.step();
        }
        (grid.compute_stats(), grid.cell_stats(3, 3).unwrap())
    };

    let (stats_a, center_a) = run();
    let (stats_b, center_b) = run();
    assert_eq!(stats_a, stats_b);
    assert_eq!(center_a, center_b);
}
