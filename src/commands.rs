//! Line-oriented command scripts.
//!
//! One command per line, `#` starts a comment:
//!
//! ```text
//! grid 4 4
//! merge 0 0 2 2        # row col row_span col_span
//! hslice 3 3 2         # row col parts, side-by-side pieces
//! vslice 0 3 3         # stacked pieces
//! select 0 0
//! extend 1 1
//! select-all
//! clear
//! merge-selection
//! ```
//!
//! Cell-addressing commands name a slot; the command applies to whichever
//! cell covers it.

use std::fmt;

use crate::config::LayoutConfig;
use crate::editor::GridLayout;
use crate::error::{GridError, Result};
use crate::types::{Axis, CellId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Grid {
        rows: u32,
        cols: u32,
    },
    Merge {
        row: u32,
        col: u32,
        row_span: u32,
        col_span: u32,
    },
    Slice {
        axis: Axis,
        row: u32,
        col: u32,
        parts: u32,
    },
    Select {
        row: u32,
        col: u32,
    },
    Deselect {
        row: u32,
        col: u32,
    },
    Extend {
        row: u32,
        col: u32,
    },
    SelectAll,
    Clear,
    MergeSelection,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid { rows, cols } => write!(f, "grid {rows} {cols}"),
            Self::Merge {
                row,
                col,
                row_span,
                col_span,
            } => write!(f, "merge {row} {col} {row_span} {col_span}"),
            Self::Slice {
                axis: Axis::Columns,
                row,
                col,
                parts,
            } => write!(f, "hslice {row} {col} {parts}"),
            Self::Slice {
                axis: Axis::Rows,
                row,
                col,
                parts,
            } => write!(f, "vslice {row} {col} {parts}"),
            Self::Select { row, col } => write!(f, "select {row} {col}"),
            Self::Deselect { row, col } => write!(f, "deselect {row} {col}"),
            Self::Extend { row, col } => write!(f, "extend {row} {col}"),
            Self::SelectAll => f.write_str("select-all"),
            Self::Clear => f.write_str("clear"),
            Self::MergeSelection => f.write_str("merge-selection"),
        }
    }
}

/// A parsed command and the 1-based line it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: Command,
}

impl Command {
    /// Parse one line. Blank and comment-only lines yield `None`.
    pub fn parse(text: &str, line: usize) -> Result<Option<Self>> {
        let text = text.split('#').next().unwrap_or_default().trim();
        let mut words = text.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args = words
            .map(|word| {
                word.parse::<u32>().map_err(|_| GridError::Command {
                    line,
                    message: format!("expected a non-negative integer, found `{word}`"),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let arity = |expected: usize| -> Result<()> {
            if args.len() == expected {
                Ok(())
            } else {
                Err(GridError::Command {
                    line,
                    message: format!(
                        "`{name}` takes {expected} argument(s), found {}",
                        args.len()
                    ),
                })
            }
        };
        let arg = |i: usize| args.get(i).copied().unwrap_or_default();

        let command = match name {
            "grid" => {
                arity(2)?;
                Self::Grid {
                    rows: arg(0),
                    cols: arg(1),
                }
            }
            "merge" => {
                arity(4)?;
                Self::Merge {
                    row: arg(0),
                    col: arg(1),
                    row_span: arg(2),
                    col_span: arg(3),
                }
            }
            "hslice" | "vslice" => {
                arity(3)?;
                Self::Slice {
                    axis: if name == "hslice" {
                        Axis::Columns
                    } else {
                        Axis::Rows
                    },
                    row: arg(0),
                    col: arg(1),
                    parts: arg(2),
                }
            }
            "select" => {
                arity(2)?;
                Self::Select {
                    row: arg(0),
                    col: arg(1),
                }
            }
            "deselect" => {
                arity(2)?;
                Self::Deselect {
                    row: arg(0),
                    col: arg(1),
                }
            }
            "extend" => {
                arity(2)?;
                Self::Extend {
                    row: arg(0),
                    col: arg(1),
                }
            }
            "select-all" => {
                arity(0)?;
                Self::SelectAll
            }
            "clear" => {
                arity(0)?;
                Self::Clear
            }
            "merge-selection" => {
                arity(0)?;
                Self::MergeSelection
            }
            other => {
                return Err(GridError::Command {
                    line,
                    message: format!("unknown command `{other}`"),
                })
            }
        };
        Ok(Some(command))
    }
}

/// Parse a whole script, stopping at the first bad line.
pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>> {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, text)| {
            let line = index + 1;
            Command::parse(text, line)
                .map(|parsed| parsed.map(|command| ScriptLine { line, command }))
                .transpose()
        })
        .collect()
}

impl GridLayout {
    /// Apply one command to the session.
    pub fn apply(&mut self, command: &Command) -> Result<()> {
        match *command {
            Command::Grid { rows, cols } => self.create_grid(rows, cols),
            Command::Merge {
                row,
                col,
                row_span,
                col_span,
            } => self.merge(row, col, row_span, col_span),
            Command::Slice {
                axis,
                row,
                col,
                parts,
            } => {
                let id = self.slot(row, col)?;
                match axis {
                    Axis::Columns => self.slice_horizontally(id, parts),
                    Axis::Rows => self.slice_vertically(id, parts),
                }
            }
            Command::Select { row, col } => {
                let id = self.slot(row, col)?;
                self.add_to_selection(id)
            }
            Command::Deselect { row, col } => {
                let id = self.slot(row, col)?;
                self.remove_from_selection(id);
                Ok(())
            }
            Command::Extend { row, col } => {
                let id = self.slot(row, col)?;
                self.extend_selection(id)
            }
            Command::SelectAll => {
                self.select_all();
                Ok(())
            }
            Command::Clear => {
                self.clear_selection();
                Ok(())
            }
            Command::MergeSelection => self.merge_selection(),
        }
    }

    fn slot(&self, row: u32, col: u32) -> Result<CellId> {
        self.grid().id_at(row, col).ok_or(GridError::OutOfBounds {
            row,
            col,
            row_span: 1,
            col_span: 1,
            rows: self.rows(),
            cols: self.cols(),
        })
    }
}

/// Run a script from scratch. The first command must be `grid`.
///
/// Recoverable failures (unresolved geometry, degenerate cells) are logged
/// and skipped; anything else aborts with the offending line number.
pub fn run_script(source: &str, config: LayoutConfig) -> Result<GridLayout> {
    let mut layout: Option<GridLayout> = None;
    for ScriptLine { line, command } in parse_script(source)? {
        if layout.is_none() {
            let Command::Grid { rows, cols } = command else {
                return Err(GridError::Command {
                    line,
                    message: "script must start with `grid <rows> <cols>`".to_string(),
                });
            };
            let session =
                GridLayout::with_config(rows, cols, config).map_err(|err| GridError::Command {
                    line,
                    message: err.to_string(),
                })?;
            layout = Some(session);
            continue;
        }
        let Some(session) = layout.as_mut() else {
            continue;
        };

        match session.apply(&command) {
            Ok(()) => tracing::debug!(line, %command, "applied"),
            Err(err) if err.is_recoverable() => {
                tracing::warn!(line, %command, error = %err, "command skipped");
            }
            Err(err) => {
                return Err(GridError::Command {
                    line,
                    message: err.to_string(),
                })
            }
        }
    }

    layout.ok_or_else(|| GridError::Command {
        line: 0,
        message: "empty script".to_string(),
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments() {
        assert_eq!(Command::parse("  # nothing", 1).unwrap(), None);
        assert_eq!(
            Command::parse("hslice 0 1 3 # cut", 2).unwrap(),
            Some(Command::Slice {
                axis: Axis::Columns,
                row: 0,
                col: 1,
                parts: 3
            })
        );
    }

    #[test]
    fn test_parse_errors_carry_line() {
        let err = parse_script("grid 2 2\nmerge 0 0 x 1\n").unwrap_err();
        assert!(matches!(err, GridError::Command { line: 2, .. }));
        let err = Command::parse("explode", 7).unwrap_err();
        assert!(matches!(err, GridError::Command { line: 7, .. }));
        let err = Command::parse("grid 1", 3).unwrap_err();
        assert!(matches!(err, GridError::Command { line: 3, .. }));
    }

    #[test]
    fn test_display_round_trips() {
        let line = "vslice 2 1 4";
        let command = Command::parse(line, 1).unwrap().unwrap();
        assert_eq!(command.to_string(), line);
    }

    #[test]
    fn test_run_requires_grid_first() {
        let err = run_script("select 0 0\n", LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, GridError::Command { line: 1, .. }));
    }

    #[test]
    fn test_run_script() {
        let layout = run_script(
            "grid 4 4\nmerge 0 0 2 2\nselect 3 3\nextend 2 2\n",
            LayoutConfig::default(),
        )
        .unwrap();
        assert_eq!(layout.unique_elements().len(), 13);
        assert_eq!(layout.selected_cells().len(), 4);
    }
}
