//! Directed lanes and their undirected occupancy key.

use std::fmt;

use crate::VertexId;

/// A directed traversal from one vertex to an adjacent one.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lane {
    pub from: VertexId,
    pub to:   VertexId,
}

impl Lane {
    #[inline]
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Self { from, to }
    }

    /// The same lane travelled the other way.
    #[inline]
    pub fn reversed(self) -> Lane {
        Lane { from: self.to, to: self.from }
    }

    /// Undirected key shared by both directions of this lane.
    #[inline]
    pub fn key(self) -> LaneKey {
        LaneKey::new(self.from, self.to)
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from.0, self.to.0)
    }
}

/// Normalised, direction-free lane identity: the smaller vertex always comes
/// first.  Two agents meeting head-on produce the same key and therefore
/// contest the same physical resource.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneKey(VertexId, VertexId);

impl LaneKey {
    #[inline]
    pub fn new(a: VertexId, b: VertexId) -> Self {
        if a <= b { LaneKey(a, b) } else { LaneKey(b, a) }
    }

    /// The two endpoints, smaller id first.
    #[inline]
    pub fn endpoints(self) -> (VertexId, VertexId) {
        (self.0, self.1)
    }
}

impl fmt::Display for LaneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<->{}", self.0.0, self.1.0)
    }
}

impl From<Lane> for LaneKey {
    fn from(lane: Lane) -> Self {
        lane.key()
    }
}
