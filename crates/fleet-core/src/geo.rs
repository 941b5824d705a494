//! Planar coordinate type and the geometry capability consumed by agents.
//!
//! Vertex coordinates live in an arbitrary planar frame (metres on a floor
//! plan, grid cells, …).  Distances are Euclidean; `f64` keeps interpolated
//! positions exact at the midpoints tests care about.

use crate::VertexId;

/// A point in the navigation plane.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Point2) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Linear interpolation from `self` (t = 0) to `other` (t = 1).
    ///
    /// `t` is not clamped; callers pass an already-clamped lane progress.
    #[inline]
    pub fn lerp(self, other: Point2, t: f64) -> Point2 {
        Point2 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl std::fmt::Display for Point2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Point2 { x, y }
    }
}

// ── Geometry capability ──────────────────────────────────────────────────────

/// Coordinate and distance lookups over graph vertices.
///
/// Injected into every agent update instead of being held by the agent, so
/// tests can substitute a hand-written fake.  Both methods are pure; passing
/// an id that does not exist in the graph is a caller bug and may panic.
///
/// `Sync` so the kinematic phase can fan out across threads.
pub trait Geometry: Sync {
    /// Position of `vertex`.
    fn coordinate_of(&self, vertex: VertexId) -> Point2;

    /// Travel distance between two vertices.  The default is the straight
    /// line between their coordinates.
    fn distance(&self, a: VertexId, b: VertexId) -> f64 {
        self.coordinate_of(a).distance(self.coordinate_of(b))
    }
}

/// A bare coordinate table is the simplest geometry: vertex `i` sits at
/// `self[i]`.
impl Geometry for [Point2] {
    #[inline]
    fn coordinate_of(&self, vertex: VertexId) -> Point2 {
        self[vertex.index()]
    }
}

impl Geometry for Vec<Point2> {
    #[inline]
    fn coordinate_of(&self, vertex: VertexId) -> Point2 {
        self[vertex.index()]
    }
}
