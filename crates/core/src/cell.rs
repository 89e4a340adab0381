//! Per-cell combustion state machine.
//!
//! Each cell owns a vertical stack of `LEVELS` combustible layers, ground
//! contact at index 0 up to canopy top at index 9. Layer state is double
//! buffered: phase 1 of a step writes only the staging buffers, phase 2
//! commits them and re-derives the burning flags. The cell never reads its
//! neighbors itself; all neighbor coupling lives in the grid orchestration.

use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::core_types::VegetationKind;
use crate::stats::CellSnapshot;

/// Number of vertical combustible layers per cell.
pub const LEVELS: usize = 10;

/// Reference humidity the ignition threshold is normalized against.
pub const STANDARD_HUMIDITY: f64 = 0.5;

/// Initial layer temperature after a reset.
pub(crate) const AMBIENT_START: f64 = 30.0;

/// Ground-layer temperature forced by an explicit ignition command.
pub(crate) const FIRE_SOURCE_TEMPERATURE: f64 = 600.0;

/// Self-reinforcing temperature growth rate of a burning layer, and the
/// relaxation rate of a cooling one.
const FIRE_GROWTH_RATE: f64 = 0.2;

/// Per-step fuel consumption coefficient.
const FUEL_DECAY_RATE: f64 = 0.005;

/// Probability a burning layer heats the layer above it.
const UPWARD_SPREAD_PROBABILITY: f64 = 0.2;

/// Probability a burning layer heats the layer below it (convection makes
/// downward spread much rarer than upward).
const DOWNWARD_SPREAD_PROBABILITY: f64 = 0.05;

/// Committed state of one combustible layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerState {
    /// Remaining fuel fraction, 0.0-1.0; never increases while burning
    pub fuel: f64,
    /// Layer temperature (degrees C)
    pub temperature: f64,
    /// Derived at commit: `temperature >= actual ignition temperature`
    pub burning: bool,
}

impl LayerState {
    const fn fresh() -> Self {
        LayerState {
            fuel: 1.0,
            temperature: AMBIENT_START,
            burning: false,
        }
    }
}

/// One grid position's vertical stack of combustible layers.
#[derive(Debug, Clone)]
pub struct Cell {
    x: usize,
    y: usize,
    /// Synthetic terrain elevation, fixed at creation (snapshot import may
    /// overwrite it)
    elevation: i64,
    /// Canopy height (m), sampled per reset from the kind's Gaussian
    height: f64,
    kind: VegetationKind,
    /// Sampled per reset; scales the ignition threshold
    humidity: f64,
    /// Set once the cell has been explicitly ignited
    fire_source: bool,
    /// Kind-specific threshold cached at reset
    burning_temperature: f64,
    layers: [LayerState; LEVELS],
    next_fuel: [f64; LEVELS],
    next_temperature: [f64; LEVELS],
}

impl Cell {
    /// Create an empty cell at a grid position.
    ///
    /// Elevation follows the synthetic terrain slope `max(x + y - 700, 0)`.
    pub(crate) fn new(x: usize, y: usize, config: &SimulationConfig, rng: &mut StdRng) -> Self {
        let elevation = (x as i64 + y as i64 - 700).max(0);
        let mut cell = Cell {
            x,
            y,
            elevation,
            height: 0.0,
            kind: VegetationKind::Empty,
            humidity: STANDARD_HUMIDITY,
            fire_source: false,
            burning_temperature: 0.0,
            layers: [LayerState::fresh(); LEVELS],
            next_fuel: [1.0; LEVELS],
            next_temperature: [AMBIENT_START; LEVELS],
        };
        cell.reset(VegetationKind::Empty, config, rng);
        cell
    }

    /// Reset the cell to a vegetation kind, discarding all combustion
    /// progress. This is the only way to change kind.
    pub(crate) fn reset(
        &mut self,
        kind: VegetationKind,
        config: &SimulationConfig,
        rng: &mut StdRng,
    ) {
        self.kind = kind;
        self.fire_source = false;
        self.humidity = sample_gaussian(rng, config.mean_moisture, config.moisture_variance);
        self.height = if kind == VegetationKind::Empty {
            0.0
        } else {
            sample_gaussian(rng, kind.mean_height(), kind.height_variance())
        };
        self.burning_temperature = config.burning_temperature(kind);
        self.layers = [LayerState::fresh(); LEVELS];
        self.next_fuel = [1.0; LEVELS];
        self.next_temperature = [AMBIENT_START; LEVELS];
    }

    /// Force the ground layer to the fire-source temperature.
    ///
    /// Does not set the burning flag; that is derived at the next commit.
    pub(crate) fn ignite(&mut self) {
        self.layers[0].temperature = FIRE_SOURCE_TEMPERATURE;
        self.fire_source = true;
    }

    /// Humidity-adjusted temperature a layer must reach to sustain
    /// combustion. Wetter cells need more heat.
    #[must_use]
    pub fn actual_ignition_temperature(&self) -> f64 {
        self.burning_temperature * self.humidity / STANDARD_HUMIDITY
    }

    /// Phase-1 vertical combustion: burning layers consume fuel and heat up
    /// in a fuel-bounded feedback, idle layers relax toward ambient air.
    pub(crate) fn burn(&mut self, air_temperature: f64) {
        let ignition = self.actual_ignition_temperature();
        for i in 0..LEVELS {
            let layer = self.layers[i];
            self.next_fuel[i] = layer.fuel;
            if layer.burning {
                self.next_fuel[i] =
                    layer.fuel * (1.0 - FUEL_DECAY_RATE * layer.temperature / ignition);
                self.next_temperature[i] =
                    layer.temperature * (1.0 + FIRE_GROWTH_RATE) * self.next_fuel[i];
            } else {
                self.next_temperature[i] =
                    air_temperature.max(layer.temperature * (1.0 - FIRE_GROWTH_RATE));
            }
        }
    }

    /// Phase-1 vertical spread within the stack: a burning layer may heat
    /// its unburnt vertical neighbors, with a strong upward bias.
    pub(crate) fn spread_within_stack(&mut self, rng: &mut StdRng) {
        for i in 0..LEVELS - 1 {
            if self.layers[i].burning
                && !self.layers[i + 1].burning
                && rng.random::<f64>() < UPWARD_SPREAD_PROBABILITY
            {
                self.next_temperature[i + 1] = self.layers[i].temperature;
            }
        }
        for i in (1..LEVELS).rev() {
            if self.layers[i].burning
                && !self.layers[i - 1].burning
                && rng.random::<f64>() < DOWNWARD_SPREAD_PROBABILITY
            {
                self.next_temperature[i - 1] = self.layers[i].temperature;
            }
        }
    }

    /// Stage a layer temperature for the upcoming commit (horizontal
    /// neighbor ignition path).
    pub(crate) fn stage_layer_temperature(&mut self, layer: usize, temperature: f64) {
        self.next_temperature[layer] = temperature;
    }

    /// Write a layer temperature into BOTH the committed and the staged
    /// state. This is the single sanctioned phase-1 cross-cell write used
    /// by wind-directed spread; writing both buffers makes the value
    /// survive the target cell's own commit.
    pub(crate) fn force_layer_temperature(&mut self, layer: usize, temperature: f64) {
        self.layers[layer].temperature = temperature;
        self.next_temperature[layer] = temperature;
    }

    /// Phase-2 commit: adopt the staged state and re-derive every burning
    /// flag from the now-current temperatures. Empty cells never burn.
    pub(crate) fn commit(&mut self) {
        let ignition = self.actual_ignition_temperature();
        let combustible = self.kind != VegetationKind::Empty;
        for i in 0..LEVELS {
            self.layers[i].fuel = self.next_fuel[i];
            self.layers[i].temperature = self.next_temperature[i];
            self.layers[i].burning = combustible && self.layers[i].temperature >= ignition;
        }
    }

    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    #[must_use]
    pub fn elevation(&self) -> i64 {
        self.elevation
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn kind(&self) -> VegetationKind {
        self.kind
    }

    #[must_use]
    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    #[must_use]
    pub fn fire_source(&self) -> bool {
        self.fire_source
    }

    /// Committed layer states, ground (0) to canopy top (LEVELS-1).
    #[must_use]
    pub fn layers(&self) -> &[LayerState; LEVELS] {
        &self.layers
    }

    /// At least one layer has consumed fuel.
    #[must_use]
    pub fn is_burnt(&self) -> bool {
        self.layers.iter().any(|layer| layer.fuel < 1.0)
    }

    /// At least one layer is currently burning.
    #[must_use]
    pub fn is_on_fire(&self) -> bool {
        self.layers.iter().any(|layer| layer.burning)
    }

    /// Full read-only snapshot of this cell.
    #[must_use]
    pub fn snapshot(&self) -> CellSnapshot {
        CellSnapshot::of(self)
    }

    /// Overwrite terrain values from an imported snapshot record.
    pub(crate) fn set_terrain(&mut self, elevation: i64, height: f64) {
        self.elevation = elevation;
        self.height = height;
    }
}

/// Draw from `Gaussian(mean, sqrt(variance))`.
fn sample_gaussian(rng: &mut StdRng, mean: f64, variance: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + variance.sqrt() * z
}
