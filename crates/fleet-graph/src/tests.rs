//! Unit tests for fleet-graph.
//!
//! All tests use hand-crafted graphs so they run without any data file.

#[cfg(test)]
mod helpers {
    use fleet_core::{Point2, VertexId};
    use crate::{NavGraph, NavGraphBuilder};

    /// Small floor plan:
    ///
    /// ```text
    ///   0 ── 1 ── 2
    ///   │         │
    ///   3 ─────── 4
    /// ```
    ///
    /// Vertex 3 sits far below the others, so 0→1→2→4 (length 3) beats
    /// 0→3→4 (length ≈ 9.5).
    pub fn floor_plan() -> (NavGraph, [VertexId; 5]) {
        let mut b = NavGraphBuilder::new();
        let v0 = b.add_named_vertex("dock", Point2::new(0.0, 0.0), true);
        let v1 = b.add_vertex(Point2::new(1.0, 0.0));
        let v2 = b.add_named_vertex("shelf", Point2::new(2.0, 0.0), false);
        let v3 = b.add_vertex(Point2::new(0.0, -5.0));
        let v4 = b.add_vertex(Point2::new(2.0, -1.0));

        b.add_two_way_lane(v0, v1);
        b.add_two_way_lane(v1, v2);
        b.add_two_way_lane(v2, v4);
        b.add_two_way_lane(v0, v3);
        b.add_two_way_lane(v3, v4);

        (b.build(), [v0, v1, v2, v3, v4])
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use fleet_core::{Geometry, Point2, VertexId};
    use crate::NavGraphBuilder;

    #[test]
    fn empty_build() {
        let g = NavGraphBuilder::new().build();
        assert_eq!(g.vertex_count(), 0);
        assert_eq!(g.lane_count(), 0);
        assert!(g.is_empty());
        assert!(g.nearest_vertex(Point2::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn two_way_lane_adds_both_directions() {
        let mut b = NavGraphBuilder::new();
        let a = b.add_vertex(Point2::new(0.0, 0.0));
        let c = b.add_vertex(Point2::new(3.0, 4.0));
        b.add_two_way_lane(a, c);
        let g = b.build();
        assert_eq!(g.lane_count(), 2);
        assert!(g.lane(a, c).is_some());
        assert!(g.lane(c, a).is_some());
        assert_eq!(g.lane_length[0], 5.0);
    }

    #[test]
    fn csr_out_lanes() {
        let (g, [v0, v1, v2, v3, v4]) = super::helpers::floor_plan();
        assert_eq!(g.out_degree(v0), 2);
        assert_eq!(g.out_degree(v1), 2);
        assert_eq!(g.out_degree(v4), 2);
        for e in g.out_lanes(v1) {
            assert_eq!(g.lane_from[e.index()], v1);
        }
        let targets: Vec<VertexId> = g.out_lanes(v0).map(|e| g.lane_to[e.index()]).collect();
        assert_eq!(targets, vec![v1, v3]);
        assert!(g.lane(v1, v3).is_none());
        assert!(g.lane(v2, v4).is_some());
        let lane = g.lane_endpoints(g.lane(v2, v4).unwrap());
        assert_eq!((lane.from, lane.to), (v2, v4));
    }

    #[test]
    fn directed_lane_is_one_way() {
        let mut b = NavGraphBuilder::new();
        let a = b.add_vertex(Point2::new(0.0, 0.0));
        let c = b.add_vertex(Point2::new(1.0, 0.0));
        b.add_lane(a, c);
        let g = b.build();
        assert!(g.lane(a, c).is_some());
        assert!(g.lane(c, a).is_none());
    }

    #[test]
    fn geometry_matches_coordinates() {
        let (g, [v0, _, v2, _, v4]) = super::helpers::floor_plan();
        assert_eq!(g.coordinate_of(v2), Point2::new(2.0, 0.0));
        assert_eq!(g.distance(v0, v2), 2.0);
        assert!((g.distance(v2, v4) - 1.0).abs() < 1e-12);
    }
}

// ── Vertex metadata & spatial queries ─────────────────────────────────────────

#[cfg(test)]
mod metadata {
    use fleet_core::{Point2, VertexId};

    #[test]
    fn names_default_to_index() {
        let (g, [v0, v1, v2, ..]) = super::helpers::floor_plan();
        assert_eq!(g.vertex_name(v0), "dock");
        assert_eq!(g.vertex_name(v1), "v1");
        assert_eq!(g.vertex_name(v2), "shelf");
        assert_eq!(g.find_vertex("shelf"), Some(v2));
        assert_eq!(g.find_vertex("nowhere"), None);
    }

    #[test]
    fn chargers() {
        let (g, [v0, v1, ..]) = super::helpers::floor_plan();
        assert!(g.is_charger(v0));
        assert!(!g.is_charger(v1));
        assert!(!g.is_charger(VertexId(99)));
        assert_eq!(g.chargers(), vec![v0]);
    }

    #[test]
    fn nearest_vertex_snaps() {
        let (g, [v0, _, v2, _, v4]) = super::helpers::floor_plan();
        assert_eq!(g.nearest_vertex(Point2::new(0.1, 0.1)), Some(v0));
        assert_eq!(g.nearest_vertex(Point2::new(2.2, -0.9)), Some(v4));
        assert_eq!(g.vertex_near(Point2::new(2.0, 0.2), 0.3), Some(v2));
        assert_eq!(g.vertex_near(Point2::new(2.0, 0.5), 0.3), None);
    }

    #[test]
    fn debug_summarises_counts() {
        let (g, _) = super::helpers::floor_plan();
        let text = format!("{g:?}");
        assert!(text.starts_with("NavGraph { vertices: 5, lanes: 10, chargers: [VertexId(0)]"), "{text}");
        assert!(text.ends_with(".. }"), "{text}");
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use fleet_core::{Point2, VertexId};
    use crate::{DijkstraRouter, GraphError, NavGraphBuilder, Router};

    #[test]
    fn shortest_path_by_length() {
        let (g, [v0, v1, v2, _, v4]) = super::helpers::floor_plan();
        let route = DijkstraRouter.route(&g, v0, v4).unwrap();
        assert_eq!(route.vertices, vec![v0, v1, v2, v4]);
        assert!((route.length - 3.0).abs() < 1e-9);
        assert_eq!(route.hops(), 3);
    }

    #[test]
    fn same_vertex_is_single_vertex_route() {
        let (g, [v0, ..]) = super::helpers::floor_plan();
        let route = DijkstraRouter.route(&g, v0, v0).unwrap();
        assert_eq!(route.vertices, vec![v0]);
        assert!(route.is_trivial());
        assert_eq!(route.length, 0.0);
    }

    #[test]
    fn unreachable_is_no_route() {
        let mut b = NavGraphBuilder::new();
        let a = b.add_vertex(Point2::new(0.0, 0.0));
        let c = b.add_vertex(Point2::new(1.0, 0.0));
        b.add_lane(a, c);
        let g = b.build();
        let err = DijkstraRouter.route(&g, c, a).unwrap_err();
        assert!(matches!(err, GraphError::NoRoute { .. }));
    }

    #[test]
    fn unknown_vertex_is_rejected() {
        let (g, [v0, ..]) = super::helpers::floor_plan();
        let err = DijkstraRouter.route(&g, v0, VertexId(42)).unwrap_err();
        assert!(matches!(err, GraphError::VertexNotFound(VertexId(42))));
    }
}

// ── JSON loader ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Write;

    use fleet_core::{Point2, VertexId};
    use crate::{GraphError, load_graph_json, load_graph_str};

    const SAMPLE: &str = r#"{
        "building_name": "depot",
        "levels": {
            "ground": {
                "lanes": [[0, 1, {"speed_limit": 0.0}], [1, 0], [1, 2, {}]],
                "vertices": [
                    [0.0, 0.0, {"name": "dock", "is_charger": true}],
                    [4.0, 0.0, {"name": ""}],
                    [4.0, 3.0]
                ]
            },
            "mezzanine": { "vertices": [[9.0, 9.0]], "lanes": [] }
        }
    }"#;

    #[test]
    fn loads_first_level() {
        let g = load_graph_str(SAMPLE).unwrap();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.lane_count(), 3);
        assert_eq!(g.vertex_pos[2], Point2::new(4.0, 3.0));
        assert_eq!(g.vertex_name(VertexId(0)), "dock");
        assert_eq!(g.vertex_name(VertexId(1)), "v1");
        assert!(g.is_charger(VertexId(0)));
        assert!(g.lane(VertexId(1), VertexId(2)).is_some());
        assert!(g.lane(VertexId(2), VertexId(1)).is_none());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let g = load_graph_json(file.path()).unwrap();
        assert_eq!(g.vertex_count(), 3);
    }

    #[test]
    fn lane_to_missing_vertex_is_rejected() {
        let json = r#"{"levels": {"a": {"vertices": [[0, 0]], "lanes": [[0, 5]]}}}"#;
        let err = load_graph_str(json).unwrap_err();
        assert!(matches!(err, GraphError::VertexNotFound(VertexId(5))));
    }

    #[test]
    fn empty_levels_is_malformed() {
        let err = load_graph_str(r#"{"levels": {}}"#).unwrap_err();
        assert!(matches!(err, GraphError::Malformed(_)));
    }

    #[test]
    fn non_numeric_vertex_is_malformed() {
        let json = r#"{"levels": {"a": {"vertices": [["x", 0]]}}}"#;
        assert!(matches!(load_graph_str(json).unwrap_err(), GraphError::Malformed(_)));
    }

    #[test]
    fn invalid_json_is_json_error() {
        assert!(matches!(load_graph_str("{").unwrap_err(), GraphError::Json(_)));
    }
}
