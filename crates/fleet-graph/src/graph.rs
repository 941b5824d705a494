//! Navigation graph representation and builder.
//!
//! # Data layout
//!
//! Lanes are stored in **Compressed Sparse Row (CSR)** format.  Given a
//! `VertexId v`, its outgoing lanes occupy the slice:
//!
//! ```text
//! lane_to[ vertex_out_start[v] .. vertex_out_start[v+1] ]
//! ```
//!
//! All lane arrays (`lane_from`, `lane_to`, `lane_length`) are sorted by
//! source vertex and indexed by `EdgeId`, so Dijkstra's inner loop is a
//! contiguous scan.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps a planar point to the nearest `VertexId`.
//! Drivers use it to turn a picked coordinate into a task destination.

use std::fmt;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use fleet_core::{EdgeId, Geometry, Lane, Point2, VertexId};

// ── R-tree vertex entry ───────────────────────────────────────────────────────

#[derive(Clone)]
struct VertexEntry {
    point: [f64; 2],
    id:    VertexId,
}

impl RTreeObject for VertexEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for VertexEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Vertex attributes ─────────────────────────────────────────────────────────

/// Per-vertex metadata carried alongside the coordinate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexInfo {
    /// Display name.  Empty means "unnamed"; see [`NavGraph::vertex_name`].
    pub name:       String,
    /// Whether the vertex hosts a charging station.
    pub is_charger: bool,
}

// ── NavGraph ──────────────────────────────────────────────────────────────────

/// Directed navigation graph in CSR format plus a spatial index.
///
/// All array fields are `pub` for direct indexed access on hot paths.  Do
/// not construct directly; use [`NavGraphBuilder`].
pub struct NavGraph {
    /// Position of each vertex.  Indexed by `VertexId`.
    pub vertex_pos: Vec<Point2>,

    /// Name and charger flag of each vertex.  Indexed by `VertexId`.
    pub vertex_info: Vec<VertexInfo>,

    /// CSR row pointer.  Length = `vertex_count + 1`.
    pub vertex_out_start: Vec<u32>,

    /// Source vertex of each lane.
    pub lane_from: Vec<VertexId>,

    /// Destination vertex of each lane.
    pub lane_to: Vec<VertexId>,

    /// Euclidean length of each lane, computed at build time.
    pub lane_length: Vec<f64>,

    spatial_idx: RTree<VertexEntry>,
}

impl NavGraph {
    /// Construct an empty graph.  Every routing request against it fails.
    pub fn empty() -> Self {
        NavGraphBuilder::new().build()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_pos.len()
    }

    pub fn lane_count(&self) -> usize {
        self.lane_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_pos.is_empty()
    }

    /// `true` if `vertex` is a valid index into this graph.
    #[inline]
    pub fn contains(&self, vertex: VertexId) -> bool {
        vertex.index() < self.vertex_count()
    }

    /// Iterator over the `EdgeId`s of all lanes leaving `vertex`.
    #[inline]
    pub fn out_lanes(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.vertex_out_start[vertex.index()] as usize;
        let end   = self.vertex_out_start[vertex.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `vertex`.
    #[inline]
    pub fn out_degree(&self, vertex: VertexId) -> usize {
        let start = self.vertex_out_start[vertex.index()] as usize;
        let end   = self.vertex_out_start[vertex.index() + 1] as usize;
        end - start
    }

    /// The directed lane `from → to`, if the graph has one.
    pub fn lane(&self, from: VertexId, to: VertexId) -> Option<EdgeId> {
        if !self.contains(from) {
            return None;
        }
        self.out_lanes(from).find(|e| self.lane_to[e.index()] == to)
    }

    /// `from → to` endpoints of lane `edge`.
    #[inline]
    pub fn lane_endpoints(&self, edge: EdgeId) -> Lane {
        Lane::new(self.lane_from[edge.index()], self.lane_to[edge.index()])
    }

    // ── Vertex metadata ───────────────────────────────────────────────────

    /// Display name of `vertex`; unnamed vertices are called `v{index}`.
    pub fn vertex_name(&self, vertex: VertexId) -> String {
        match self.vertex_info.get(vertex.index()) {
            Some(info) if !info.name.is_empty() => info.name.clone(),
            _ => format!("v{}", vertex.0),
        }
    }

    /// First vertex whose name equals `name`.
    pub fn find_vertex(&self, name: &str) -> Option<VertexId> {
        self.vertex_info
            .iter()
            .position(|info| info.name == name)
            .map(|i| VertexId(i as u32))
    }

    #[inline]
    pub fn is_charger(&self, vertex: VertexId) -> bool {
        self.vertex_info.get(vertex.index()).is_some_and(|info| info.is_charger)
    }

    /// All charging-station vertices in ascending id order.
    pub fn chargers(&self) -> Vec<VertexId> {
        self.vertex_info
            .iter()
            .enumerate()
            .filter(|(_, info)| info.is_charger)
            .map(|(i, _)| VertexId(i as u32))
            .collect()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The vertex closest to `pos`.  `None` only for an empty graph.
    pub fn nearest_vertex(&self, pos: Point2) -> Option<VertexId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.id)
    }

    /// The nearest vertex, but only if it lies within `radius` of `pos`.
    pub fn vertex_near(&self, pos: Point2, radius: f64) -> Option<VertexId> {
        self.nearest_vertex(pos)
            .filter(|&v| self.vertex_pos[v.index()].distance(pos) <= radius)
    }
}

// The R-tree mirrors `vertex_pos` and is left out.
impl fmt::Debug for NavGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavGraph")
            .field("vertices", &self.vertex_count())
            .field("lanes", &self.lane_count())
            .field("chargers", &self.chargers())
            .finish_non_exhaustive()
    }
}

impl Geometry for NavGraph {
    #[inline]
    fn coordinate_of(&self, vertex: VertexId) -> Point2 {
        self.vertex_pos[vertex.index()]
    }
}

// ── NavGraphBuilder ───────────────────────────────────────────────────────────

/// Construct a [`NavGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use fleet_core::Point2;
/// use fleet_graph::NavGraphBuilder;
///
/// let mut b = NavGraphBuilder::new();
/// let a = b.add_vertex(Point2::new(0.0, 0.0));
/// let c = b.add_vertex(Point2::new(3.0, 4.0));
/// b.add_two_way_lane(a, c);
/// let graph = b.build();
/// assert_eq!(graph.vertex_count(), 2);
/// assert_eq!(graph.lane_count(), 2);
/// assert_eq!(graph.lane_length[0], 5.0);
/// ```
pub struct NavGraphBuilder {
    vertices:  Vec<Point2>,
    info:      Vec<VertexInfo>,
    raw_lanes: Vec<(VertexId, VertexId)>,
}

impl NavGraphBuilder {
    pub fn new() -> Self {
        Self { vertices: Vec::new(), info: Vec::new(), raw_lanes: Vec::new() }
    }

    pub fn with_capacity(vertices: usize, lanes: usize) -> Self {
        Self {
            vertices:  Vec::with_capacity(vertices),
            info:      Vec::with_capacity(vertices),
            raw_lanes: Vec::with_capacity(lanes),
        }
    }

    /// Add an unnamed vertex and return its `VertexId` (sequential from 0).
    pub fn add_vertex(&mut self, pos: Point2) -> VertexId {
        self.add_named_vertex("", pos, false)
    }

    /// Add a vertex with a display name and charger flag.
    pub fn add_named_vertex(&mut self, name: &str, pos: Point2, is_charger: bool) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(pos);
        self.info.push(VertexInfo { name: name.to_owned(), is_charger });
        id
    }

    /// Add a **directed** lane from `from` to `to`.
    pub fn add_lane(&mut self, from: VertexId, to: VertexId) {
        self.raw_lanes.push((from, to));
    }

    /// Convenience: add lanes in both directions.
    pub fn add_two_way_lane(&mut self, a: VertexId, b: VertexId) {
        self.add_lane(a, b);
        self.add_lane(b, a);
    }

    pub fn vertex_count(&self) -> usize { self.vertices.len() }
    pub fn lane_count(&self) -> usize { self.raw_lanes.len() }

    /// Consume the builder and produce a [`NavGraph`].
    ///
    /// Lanes whose endpoints were never added are a caller bug and panic
    /// here; the JSON loader validates indices before calling this.
    pub fn build(self) -> NavGraph {
        let vertex_count = self.vertices.len();
        let lane_count   = self.raw_lanes.len();

        // Stable sort keeps insertion order among a vertex's lanes.
        let mut raw = self.raw_lanes;
        raw.sort_by_key(|&(from, _)| from.0);

        let lane_from: Vec<VertexId> = raw.iter().map(|&(f, _)| f).collect();
        let lane_to:   Vec<VertexId> = raw.iter().map(|&(_, t)| t).collect();
        let lane_length: Vec<f64> = raw
            .iter()
            .map(|&(f, t)| self.vertices[f.index()].distance(self.vertices[t.index()]))
            .collect();

        let mut vertex_out_start = vec![0u32; vertex_count + 1];
        for &(from, _) in &raw {
            vertex_out_start[from.index() + 1] += 1;
        }
        for i in 1..=vertex_count {
            vertex_out_start[i] += vertex_out_start[i - 1];
        }
        debug_assert_eq!(vertex_out_start[vertex_count] as usize, lane_count);

        let entries: Vec<VertexEntry> = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, p)| VertexEntry { point: [p.x, p.y], id: VertexId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        NavGraph {
            vertex_pos: self.vertices,
            vertex_info: self.info,
            vertex_out_start,
            lane_from,
            lane_to,
            lane_length,
            spatial_idx,
        }
    }
}

impl Default for NavGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
