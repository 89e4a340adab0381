//! Core value types: vegetation kinds and wind geometry.

pub mod vegetation;
pub mod wind;

pub(crate) use vegetation::SEEDED_KINDS;
pub use vegetation::{EditAction, VegetationKind};
pub(crate) use wind::{NEIGHBOR_SLOTS, SLOT_ORDER};
pub use wind::{fire_lean_angle, CompassDirection, Wind};
