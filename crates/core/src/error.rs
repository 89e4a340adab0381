//! Error types shared across the simulation core.
//!
//! The engine has no I/O of its own, so the taxonomy is small: configuration
//! problems are fatal at construction, label parsing fails per record, and
//! out-of-range interactive edits are a silent no-op by contract (not an
//! error at all).

use std::fmt;

/// Malformed or out-of-domain configuration value.
///
/// Raised once, at grid construction. A simulation instance is never built
/// from an invalid configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Grid dimensions must both be non-zero
    EmptyGrid { width: usize, height: usize },
    /// A numeric configuration field is outside its allowed domain
    OutOfDomain {
        /// JSON name of the offending field
        field: &'static str,
        value: f64,
    },
    /// The vegetation generation window does not fit inside the grid
    WindowOutOfBounds {
        origin: (usize, usize),
        window: (usize, usize),
        grid: (usize, usize),
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyGrid { width, height } => {
                write!(f, "Grid dimensions must be non-zero, got {width}x{height}")
            }
            ConfigError::OutOfDomain { field, value } => {
                write!(f, "Configuration field '{field}' is out of domain: {value}")
            }
            ConfigError::WindowOutOfBounds {
                origin,
                window,
                grid,
            } => {
                write!(
                    f,
                    "Generation window {}x{} at ({}, {}) exceeds grid {}x{}",
                    window.0, window.1, origin.0, origin.1, grid.0, grid.1
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Unrecognized label in external input.
///
/// Fails the single record it came from; the caller decides whether to
/// abort an import wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Vegetation-kind display name not recognized
    UnknownKind(String),
    /// Compass direction name not recognized
    UnknownDirection(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownKind(label) => {
                write!(f, "Unknown vegetation kind '{label}'")
            }
            ParseError::UnknownDirection(label) => {
                write!(f, "Unknown compass direction '{label}'")
            }
        }
    }
}

impl std::error::Error for ParseError {}
