//! Built-in warehouse floor plan used when no `--graph` file is given.
//!
//! ```text
//!   shelf-0 ── shelf-1 ── shelf-2 ── shelf-3 ── shelf-4     y = 6
//!      │          │          │          │          │
//!   aisle-0 ── aisle-1 ── aisle-2 ── aisle-3 ── aisle-4     y = 3
//!      │                     │                     │
//!   dock-0*              dock-2                 dock-4*     y = 0
//! ```
//!
//! `*` marks a charger.  Every lane is two-way; columns are 3 m apart.

use fleet_core::{Point2, VertexId};
use fleet_graph::{NavGraph, NavGraphBuilder};

const COLUMNS: usize = 5;
const SPACING: f64 = 3.0;

/// Build the floor plan.  Returns the graph and the dock vertices.
pub fn build_floor_plan() -> (NavGraph, Vec<VertexId>) {
    let mut b = NavGraphBuilder::new();

    let docks: Vec<VertexId> = [0, 2, 4]
        .into_iter()
        .map(|c| {
            let pos = Point2::new(c as f64 * SPACING, 0.0);
            b.add_named_vertex(&format!("dock-{c}"), pos, c != 2)
        })
        .collect();
    let aisles: Vec<VertexId> = (0..COLUMNS)
        .map(|c| b.add_named_vertex(&format!("aisle-{c}"), Point2::new(c as f64 * SPACING, SPACING), false))
        .collect();
    let shelves: Vec<VertexId> = (0..COLUMNS)
        .map(|c| b.add_named_vertex(&format!("shelf-{c}"), Point2::new(c as f64 * SPACING, 2.0 * SPACING), false))
        .collect();

    for row in [&aisles, &shelves] {
        for pair in row.windows(2) {
            b.add_two_way_lane(pair[0], pair[1]);
        }
    }
    for (&aisle, &shelf) in aisles.iter().zip(&shelves) {
        b.add_two_way_lane(aisle, shelf);
    }
    for (&dock, column) in docks.iter().zip([0, 2, 4]) {
        b.add_two_way_lane(dock, aisles[column]);
    }

    (b.build(), docks)
}
