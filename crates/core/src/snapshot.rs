//! Map and configuration JSON exchange.
//!
//! The engine itself performs no I/O during simulation; these helpers exist
//! for the external persistence layer and for round-trip testing of the
//! data contracts. A map snapshot is an exhaustive row-major sequence of
//! per-cell records carrying only terrain and vegetation, never combustion
//! progress.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::grid::Grid;

/// One cell of the map exchange format.
///
/// `currentState` holds a vegetation display name (`"No Fire"`, `"Litter"`,
/// ...); parsing happens at import time so a bad record fails individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    pub x: usize,
    pub y: usize,
    pub elevation: i64,
    pub height: f64,
    pub current_state: String,
}

/// Errors from the JSON file helpers.
#[derive(Debug)]
pub enum PersistenceError {
    /// Failed to load file
    LoadFailed(String),
    /// Failed to parse file contents
    ParseFailed(String),
    /// Failed to serialize state
    SerializeFailed(String),
    /// Failed to save file
    SaveFailed(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceError::LoadFailed(msg) => write!(f, "Failed to load: {msg}"),
            PersistenceError::ParseFailed(msg) => write!(f, "Failed to parse: {msg}"),
            PersistenceError::SerializeFailed(msg) => write!(f, "Failed to serialize: {msg}"),
            PersistenceError::SaveFailed(msg) => write!(f, "Failed to save: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

/// Save a grid's map snapshot as pretty-printed JSON.
pub fn save_map<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<(), PersistenceError> {
    let records = grid.to_records();
    let contents = serde_json::to_string_pretty(&records)
        .map_err(|e| PersistenceError::SerializeFailed(e.to_string()))?;
    fs::write(path, contents).map_err(|e| PersistenceError::SaveFailed(e.to_string()))?;
    Ok(())
}

/// Load a map snapshot from a JSON file.
pub fn load_map<P: AsRef<Path>>(path: P) -> Result<Vec<CellRecord>, PersistenceError> {
    let contents =
        fs::read_to_string(path).map_err(|e| PersistenceError::LoadFailed(e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| PersistenceError::ParseFailed(e.to_string()))
}

/// Save a configuration record as pretty-printed JSON.
pub fn save_config<P: AsRef<Path>>(
    config: &SimulationConfig,
    path: P,
) -> Result<(), PersistenceError> {
    let contents = serde_json::to_string_pretty(config)
        .map_err(|e| PersistenceError::SerializeFailed(e.to_string()))?;
    fs::write(path, contents).map_err(|e| PersistenceError::SaveFailed(e.to_string()))?;
    Ok(())
}

/// Load a configuration record from a JSON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SimulationConfig, PersistenceError> {
    let contents =
        fs::read_to_string(path).map_err(|e| PersistenceError::LoadFailed(e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| PersistenceError::ParseFailed(e.to_string()))
}
