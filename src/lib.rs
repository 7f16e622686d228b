//! gridlayout - proportional grid layout engine
//!
//! A rectangle is divided into rows and columns whose sizes are normalized
//! fractions of the whole. Cells may span several rows/columns and can be:
//! - Merged: a rectangular range fused into one spanning cell
//! - Sliced: one cell cut into N equal pieces along either axis
//! - Condensed: bands that are always spanned together fold back into one
//!
//! Edge positions are derived from the cells' own normalized extents, so the
//! layout needs no separate row/column size table.
//!
//! # Usage
//!
//! ```
//! use gridlayout::{CellId, GridLayout};
//!
//! let mut layout = GridLayout::new(3, 3)?;
//! layout.merge(0, 0, 1, 2)?;
//! layout.slice_horizontally(CellId(8), 2)?;
//! assert_eq!(layout.cols(), 4);
//! # Ok::<(), gridlayout::GridError>(())
//! ```

pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod grid;
pub mod layout;
pub mod selection;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod bindings;

use wasm_bindgen::prelude::*;

pub use commands::{parse_script, run_script, Command};
pub use config::LayoutConfig;
pub use editor::{GridLayout, LayoutEvent};
pub use error::{GridError, Result};
pub use export::ExportRecord;
pub use grid::GridModel;
pub use layout::{solve_edges, EdgeSolution};
pub use selection::Selection;
pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
