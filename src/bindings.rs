//! JavaScript handle for a browser presentation layer.
//!
//! Cells and edge arrays cross the boundary as plain objects via
//! `serde-wasm-bindgen`; errors become string `JsValue`s.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::LayoutConfig;
use crate::editor::{GridLayout, LayoutEvent};
use crate::layout::EdgeSolution;
use crate::types::{Axis, CellId};

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

#[derive(Serialize)]
struct EdgesJs<'a> {
    edges: &'a [f64],
    success: bool,
}

impl<'a> From<&'a EdgeSolution> for EdgesJs<'a> {
    fn from(solution: &'a EdgeSolution) -> Self {
        Self {
            edges: &solution.edges,
            success: solution.success,
        }
    }
}

/// Editing session exported to JavaScript.
#[wasm_bindgen]
pub struct GridLayoutHandle {
    layout: GridLayout,
}

#[wasm_bindgen]
impl GridLayoutHandle {
    /// Create a uniform `rows x cols` layout.
    #[wasm_bindgen(constructor)]
    pub fn new(rows: u32, cols: u32) -> Result<GridLayoutHandle, JsValue> {
        console_error_panic_hook::set_once();
        let layout = GridLayout::new(rows, cols)?;
        Ok(Self { layout })
    }

    /// Create a layout with settings given as a JSON string.
    #[wasm_bindgen(js_name = "withConfig")]
    pub fn with_config(rows: u32, cols: u32, config: &str) -> Result<GridLayoutHandle, JsValue> {
        console_error_panic_hook::set_once();
        let config = LayoutConfig::from_json(config)?;
        let layout = GridLayout::with_config(rows, cols, config)?;
        Ok(Self { layout })
    }

    #[wasm_bindgen(js_name = "createGrid")]
    pub fn create_grid(&mut self, rows: u32, cols: u32) -> Result<(), JsValue> {
        Ok(self.layout.create_grid(rows, cols)?)
    }

    #[wasm_bindgen(getter)]
    pub fn rows(&self) -> u32 {
        self.layout.rows()
    }

    #[wasm_bindgen(getter)]
    pub fn cols(&self) -> u32 {
        self.layout.cols()
    }

    /// Distinct cells in scan order.
    #[wasm_bindgen(js_name = "uniqueElements")]
    pub fn unique_elements(&self) -> Result<JsValue, JsValue> {
        to_js(&self.layout.unique_elements())
    }

    /// `{ edges, success }` for the row axis.
    #[wasm_bindgen(js_name = "rowEdgePositions")]
    pub fn row_edge_positions(&self) -> Result<JsValue, JsValue> {
        to_js(&EdgesJs::from(&self.layout.row_edge_positions()))
    }

    #[wasm_bindgen(js_name = "columnEdgePositions")]
    pub fn column_edge_positions(&self) -> Result<JsValue, JsValue> {
        to_js(&EdgesJs::from(&self.layout.column_edge_positions()))
    }

    #[wasm_bindgen(js_name = "sliceHorizontally")]
    pub fn slice_horizontally(&mut self, cell: u32, parts: u32) -> Result<(), JsValue> {
        Ok(self.layout.slice_horizontally(CellId(cell), parts)?)
    }

    #[wasm_bindgen(js_name = "sliceVertically")]
    pub fn slice_vertically(&mut self, cell: u32, parts: u32) -> Result<(), JsValue> {
        Ok(self.layout.slice_vertically(CellId(cell), parts)?)
    }

    pub fn merge(
        &mut self,
        start_row: u32,
        start_col: u32,
        row_span: u32,
        col_span: u32,
    ) -> Result<(), JsValue> {
        Ok(self.layout.merge(start_row, start_col, row_span, col_span)?)
    }

    #[wasm_bindgen(js_name = "canMerge")]
    pub fn can_merge(&self) -> bool {
        self.layout.can_merge()
    }

    #[wasm_bindgen(js_name = "mergeSelection")]
    pub fn merge_selection(&mut self) -> Result<(), JsValue> {
        Ok(self.layout.merge_selection()?)
    }

    /// Slice every selected cell; `horizontal` picks side-by-side pieces.
    #[wasm_bindgen(js_name = "sliceSelection")]
    pub fn slice_selection(&mut self, horizontal: bool, parts: u32) -> Result<u32, JsValue> {
        let axis = if horizontal { Axis::Columns } else { Axis::Rows };
        let sliced = self.layout.slice_selection(axis, parts)?;
        Ok(u32::try_from(sliced).unwrap_or(u32::MAX))
    }

    #[wasm_bindgen(js_name = "addToSelection")]
    pub fn add_to_selection(&mut self, cell: u32) -> Result<(), JsValue> {
        Ok(self.layout.add_to_selection(CellId(cell))?)
    }

    #[wasm_bindgen(js_name = "removeFromSelection")]
    pub fn remove_from_selection(&mut self, cell: u32) {
        self.layout.remove_from_selection(CellId(cell));
    }

    #[wasm_bindgen(js_name = "extendSelection")]
    pub fn extend_selection(&mut self, cell: u32) -> Result<(), JsValue> {
        Ok(self.layout.extend_selection(CellId(cell))?)
    }

    #[wasm_bindgen(js_name = "clearSelection")]
    pub fn clear_selection(&mut self) {
        self.layout.clear_selection();
    }

    #[wasm_bindgen(js_name = "selectAll")]
    pub fn select_all(&mut self) {
        self.layout.select_all();
    }

    #[wasm_bindgen(js_name = "selectedCells")]
    pub fn selected_cells(&self) -> Vec<u32> {
        self.layout.selected_cells().iter().map(|id| id.0).collect()
    }

    /// `{ col, row, colSpan, rowSpan }`
    #[wasm_bindgen(js_name = "selectedExtent")]
    pub fn selected_extent(&self) -> Result<JsValue, JsValue> {
        to_js(&self.layout.selected_extent())
    }

    #[wasm_bindgen(js_name = "setLocked")]
    pub fn set_locked(&mut self, cell: u32, locked: bool) -> Result<(), JsValue> {
        Ok(self.layout.set_locked(CellId(cell), locked)?)
    }

    #[wasm_bindgen(js_name = "beginEdit")]
    pub fn begin_edit(&mut self, cell: u32) -> Result<bool, JsValue> {
        Ok(self.layout.begin_edit(CellId(cell))?)
    }

    #[wasm_bindgen(js_name = "endEdit")]
    pub fn end_edit(&mut self) {
        self.layout.end_edit();
    }

    /// Id of the cell under a normalized point.
    #[wasm_bindgen(js_name = "cellAtPoint")]
    pub fn cell_at_point(&self, x: f64, y: f64) -> Option<u32> {
        self.layout.cell_at_point(x, y).map(|cell| cell.id.0)
    }

    /// Drain pending events as `"grid"` / `"selection"` strings.
    #[wasm_bindgen(js_name = "takeEvents")]
    pub fn take_events(&mut self) -> Vec<String> {
        self.layout
            .take_events()
            .into_iter()
            .map(|event| match event {
                LayoutEvent::GridReplaced { .. } => "grid".to_string(),
                LayoutEvent::SelectionChanged => "selection".to_string(),
            })
            .collect()
    }

    #[wasm_bindgen(js_name = "exportJson")]
    pub fn export_json(&self) -> Result<String, JsValue> {
        Ok(self.layout.export_json()?)
    }

    #[wasm_bindgen(js_name = "exportRecords")]
    pub fn export_records(&self) -> Result<JsValue, JsValue> {
        to_js(&self.layout.export_records())
    }
}
