//! Simulation configuration: the flat parameter record every grid is built
//! from, plus the vegetation generation window.
//!
//! The JSON field names are a fixed external contract (`mapWidth`,
//! `mediumMoisture`, ...) and must not drift with internal renames.

use serde::{Deserialize, Serialize};

use crate::core_types::{CompassDirection, VegetationKind, Wind};
use crate::error::ConfigError;

/// Static per-simulation parameters.
///
/// A grid is fully reproducible from this record plus a random seed.
/// `cell_size` is a rendering hint carried through the contract and ignored
/// by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Width of the vegetation generation window (cells)
    pub map_width: usize,
    /// Height of the vegetation generation window (cells)
    pub map_height: usize,
    /// Wind speed (km/h)
    pub wind_velocity: f64,
    /// Direction the flame leans toward
    pub wind_direction: CompassDirection,
    /// Mean of the per-cell humidity Gaussian
    #[serde(rename = "mediumMoisture")]
    pub mean_moisture: f64,
    /// Variance of the per-cell humidity Gaussian
    #[serde(rename = "mediumMoistureVariance")]
    pub moisture_variance: f64,
    /// Ambient air temperature non-burning layers relax toward
    pub air_temperature: f64,
    pub coniferous_burning_temperature: f64,
    pub deciduous_burning_temperature: f64,
    pub understory_burning_temperature: f64,
    pub floor_burning_temperature: f64,
    pub litter_burning_temperature: f64,
    /// Rendering cell size in pixels; not used by the engine
    #[serde(rename = "size")]
    pub cell_size: usize,
    /// Generation density fraction, 0.0-1.0
    pub point_percentage: f64,
}

impl Default for SimulationConfig {
    /// Defaults matching the interactive start form.
    fn default() -> Self {
        SimulationConfig {
            map_width: 60,
            map_height: 60,
            wind_velocity: 10.0,
            wind_direction: CompassDirection::North,
            mean_moisture: 0.4,
            moisture_variance: 0.001,
            air_temperature: 20.0,
            coniferous_burning_temperature: 260.0,
            deciduous_burning_temperature: 310.0,
            understory_burning_temperature: 300.0,
            floor_burning_temperature: 275.0,
            litter_burning_temperature: 215.0,
            cell_size: 7,
            point_percentage: 0.1,
        }
    }
}

impl SimulationConfig {
    /// Validate every field's domain. Fails fast; a grid is never built
    /// from an invalid config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_width == 0 || self.map_height == 0 {
            return Err(ConfigError::OutOfDomain {
                field: "mapWidth/mapHeight",
                value: 0.0,
            });
        }
        let non_negative: [(&'static str, f64); 3] = [
            ("windVelocity", self.wind_velocity),
            ("mediumMoistureVariance", self.moisture_variance),
            ("pointPercentage", self.point_percentage),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::OutOfDomain { field, value });
            }
        }
        if self.point_percentage > 1.0 {
            return Err(ConfigError::OutOfDomain {
                field: "pointPercentage",
                value: self.point_percentage,
            });
        }
        if !self.mean_moisture.is_finite() || !self.air_temperature.is_finite() {
            return Err(ConfigError::OutOfDomain {
                field: "mediumMoisture/airTemperature",
                value: f64::NAN,
            });
        }
        let burning_temperatures: [(&'static str, f64); 5] = [
            (
                "coniferousBurningTemperature",
                self.coniferous_burning_temperature,
            ),
            (
                "deciduousBurningTemperature",
                self.deciduous_burning_temperature,
            ),
            (
                "understoryBurningTemperature",
                self.understory_burning_temperature,
            ),
            ("floorBurningTemperature", self.floor_burning_temperature),
            ("litterBurningTemperature", self.litter_burning_temperature),
        ];
        for (field, value) in burning_temperatures {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::OutOfDomain { field, value });
            }
        }
        Ok(())
    }

    /// Burning temperature threshold for a vegetation kind.
    ///
    /// `Empty` has no fuel and no meaningful threshold; it returns 0.0 and
    /// is excluded from combustion by the cell state machine.
    #[must_use]
    pub fn burning_temperature(&self, kind: VegetationKind) -> f64 {
        match kind {
            VegetationKind::Empty => 0.0,
            VegetationKind::Litter => self.litter_burning_temperature,
            VegetationKind::Floor => self.floor_burning_temperature,
            VegetationKind::Understory => self.understory_burning_temperature,
            VegetationKind::Coniferous => self.coniferous_burning_temperature,
            VegetationKind::Deciduous => self.deciduous_burning_temperature,
        }
    }

    /// Initial wind state described by this config.
    #[must_use]
    pub fn wind(&self) -> Wind {
        Wind {
            velocity: self.wind_velocity,
            direction: self.wind_direction,
        }
    }
}

/// Sub-rectangle of the grid that receives random vegetation at build time.
///
/// The reference behavior seeds vegetation only inside an offset window,
/// leaving a bare border strip around it. The offset is explicit here
/// instead of a magic constant so alternative placements stay possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationWindow {
    pub origin_x: usize,
    pub origin_y: usize,
    pub width: usize,
    pub height: usize,
}

/// Reference window origin.
const DEFAULT_ORIGIN: (usize, usize) = (8, 5);

impl GenerationWindow {
    /// Window at the reference origin with the config's map dimensions.
    #[must_use]
    pub fn from_config(config: &SimulationConfig) -> Self {
        GenerationWindow {
            origin_x: DEFAULT_ORIGIN.0,
            origin_y: DEFAULT_ORIGIN.1,
            width: config.map_width,
            height: config.map_height,
        }
    }

    /// Arbitrary window. A zero-sized window seeds nothing.
    #[must_use]
    pub const fn new(origin_x: usize, origin_y: usize, width: usize, height: usize) -> Self {
        GenerationWindow {
            origin_x,
            origin_y,
            width,
            height,
        }
    }

    /// Check the window fits inside a grid of the given dimensions.
    pub(crate) fn check_fits(
        &self,
        grid_width: usize,
        grid_height: usize,
    ) -> Result<(), ConfigError> {
        if self.origin_x + self.width > grid_width || self.origin_y + self.height > grid_height {
            return Err(ConfigError::WindowOutOfBounds {
                origin: (self.origin_x, self.origin_y),
                window: (self.width, self.height),
                grid: (grid_width, grid_height),
            });
        }
        Ok(())
    }
}
