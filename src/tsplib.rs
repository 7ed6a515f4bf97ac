//! Reading city coordinates from TSPLIB files.
//!
//! Only the `NODE_COORD_SECTION` is consumed. Header lines before it
//! (`NAME`, `TYPE`, `EDGE_WEIGHT_TYPE`, ...) are skipped; each line in the
//! section is `<index> <x> <y>`, and the section ends at `EOF` or at the end
//! of input. Cities are returned in file order; the index column is not
//! used for ordering.

use std::fs;
use std::path::Path;

use crate::distance::City;
use crate::error::{AcoError, Result};

const SECTION_MARKER: &str = "NODE_COORD_SECTION";
const EOF_MARKER: &str = "EOF";

/// Parses the coordinate section of a TSPLIB document.
///
/// ```
/// use u_aco::tsplib::parse_node_coords;
///
/// let text = "NAME : tiny\nTYPE : TSP\nNODE_COORD_SECTION\n1 0 0\n2 3 4\nEOF\n";
/// let cities = parse_node_coords(text)?;
/// assert_eq!(cities.len(), 2);
/// assert_eq!(cities[1].x, 3.0);
/// # Ok::<(), u_aco::AcoError>(())
/// ```
pub fn parse_node_coords(text: &str) -> Result<Vec<City>> {
    let mut lines = text.lines().enumerate();

    if !lines.any(|(_, line)| line.trim_start().starts_with(SECTION_MARKER)) {
        return Err(AcoError::MissingNodeCoordSection);
    }

    let mut cities = Vec::new();
    for (idx, line) in lines {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed == EOF_MARKER {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let [_, x, y] = fields.as_slice() else {
            return Err(AcoError::parse(
                line_no,
                format!("expected `<index> <x> <y>`, got `{trimmed}`"),
            ));
        };
        let x: f64 = x
            .parse()
            .map_err(|e| AcoError::parse(line_no, format!("bad x coordinate `{x}`: {e}")))?;
        let y: f64 = y
            .parse()
            .map_err(|e| AcoError::parse(line_no, format!("bad y coordinate `{y}`: {e}")))?;
        cities.push(City::new(x, y));
    }

    log::debug!("tsplib: parsed {} cities", cities.len());
    Ok(cities)
}

/// Reads and parses a TSPLIB file from disk.
pub fn read_node_coords(path: impl AsRef<Path>) -> Result<Vec<City>> {
    let text = fs::read_to_string(path.as_ref())?;
    parse_node_coords(&text)
}
