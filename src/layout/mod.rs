//! Geometry derived from the occupancy grid.
//!
//! This module handles:
//! - Inferring normalized row/column boundary positions from cell extents
//! - Locating the band under a normalized position

mod edges;

pub use edges::{solve_edges, EdgeSolution};
