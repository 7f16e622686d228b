//! Data types for the grid layout engine.

mod cell;
mod geometry;

pub use cell::*;
pub use geometry::*;
