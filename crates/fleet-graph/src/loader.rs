//! JSON navigation-graph loader.
//!
//! # File format
//!
//! ```json
//! {
//!   "levels": {
//!     "l0": {
//!       "vertices": [[0.0, 0.0, {"name": "dock", "is_charger": true}], [4.0, 0.0]],
//!       "lanes":    [[0, 1, {}], [1, 0]]
//!     }
//!   }
//! }
//! ```
//!
//! Only the first level (in file order) is loaded.  Vertex entries are
//! `[x, y]` or `[x, y, attrs]`; lane entries are `[from, to]` or
//! `[from, to, attrs]` and are directed.  Unknown attributes are ignored.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use fleet_core::{Point2, VertexId};

use crate::{GraphError, GraphResult, NavGraph, NavGraphBuilder};

#[derive(Deserialize)]
struct RawDocument {
    levels: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawLevel {
    vertices: Vec<Vec<Value>>,
    #[serde(default)]
    lanes:    Vec<Vec<Value>>,
}

#[derive(Deserialize, Default)]
struct RawVertexAttrs {
    #[serde(default)]
    name:       Option<String>,
    #[serde(default)]
    is_charger: bool,
}

/// Load a graph from a JSON file on disk.
pub fn load_graph_json(path: &Path) -> GraphResult<NavGraph> {
    let file = File::open(path)?;
    load_graph_reader(BufReader::new(file))
}

/// Load a graph from any JSON reader.
pub fn load_graph_reader<R: Read>(reader: R) -> GraphResult<NavGraph> {
    let doc: RawDocument = serde_json::from_reader(reader)?;
    graph_from_document(doc)
}

/// Load a graph from an in-memory JSON string.
pub fn load_graph_str(json: &str) -> GraphResult<NavGraph> {
    let doc: RawDocument = serde_json::from_str(json)?;
    graph_from_document(doc)
}

fn graph_from_document(doc: RawDocument) -> GraphResult<NavGraph> {
    let (level_name, level_value) = doc
        .levels
        .into_iter()
        .next()
        .ok_or_else(|| GraphError::Malformed("no levels defined".into()))?;
    let level: RawLevel = serde_json::from_value(level_value)?;

    let mut b = NavGraphBuilder::with_capacity(level.vertices.len(), level.lanes.len());

    for (i, entry) in level.vertices.iter().enumerate() {
        let (x, y) = match (entry.first().and_then(Value::as_f64), entry.get(1).and_then(Value::as_f64)) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                return Err(GraphError::Malformed(format!(
                    "level {level_name}: vertex {i} needs numeric [x, y]"
                )));
            }
        };
        let attrs: RawVertexAttrs = match entry.get(2) {
            Some(v) if !v.is_null() => serde_json::from_value(v.clone())?,
            _ => RawVertexAttrs::default(),
        };
        b.add_named_vertex(attrs.name.as_deref().unwrap_or(""), Point2::new(x, y), attrs.is_charger);
    }

    let vertex_count = b.vertex_count();
    for (i, entry) in level.lanes.iter().enumerate() {
        let endpoint = |slot: usize| -> GraphResult<VertexId> {
            let raw = entry
                .get(slot)
                .and_then(Value::as_u64)
                .ok_or_else(|| GraphError::Malformed(format!(
                    "level {level_name}: lane {i} needs integer [from, to]"
                )))?;
            let id = u32::try_from(raw)
                .map(VertexId)
                .map_err(|_| GraphError::Malformed(format!("lane {i}: vertex index {raw} overflows")))?;
            if id.index() >= vertex_count {
                return Err(GraphError::VertexNotFound(id));
            }
            Ok(id)
        };
        let from = endpoint(0)?;
        let to   = endpoint(1)?;
        b.add_lane(from, to);
    }

    Ok(b.build())
}
