//! Unit tests for fleet-traffic.

use fleet_agent::{Agent, AgentState};
use fleet_core::{AgentId, LaneKey, Point2, VertexId};

use crate::{Grant, LaneNegotiator, Priority};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Four vertices on a line, one unit apart: 0 — 1 — 2 — 3.
fn corridor() -> Vec<Point2> {
    (0..4).map(|i| Point2::new(i as f64, 0.0)).collect()
}

fn v(i: u32) -> VertexId {
    VertexId(i)
}

/// An agent at `path[0]` already assigned to follow `path`.
fn routed(id: u32, path: &[u32], geo: &[Point2]) -> Agent {
    let mut a = idle(id, path[0], geo);
    a.assign_task(v(*path.last().unwrap()), path.iter().copied().map(VertexId).collect())
        .unwrap();
    a
}

fn idle(id: u32, vertex: u32, geo: &[Point2]) -> Agent {
    Agent::new(AgentId(id), v(vertex), geo[vertex as usize], 11)
}

// ── Conflict resolution ───────────────────────────────────────────────────────

#[cfg(test)]
mod contention {
    use super::*;

    #[test]
    fn lone_agent_is_granted_and_moves() {
        let geo = corridor();
        let mut agents = vec![routed(0, &[0, 1, 2], &geo)];
        let mut neg = LaneNegotiator::new();

        let report = neg.step(&mut agents, 0.25, &geo);
        assert_eq!(report.tick, 0);
        assert_eq!(report.grants.len(), 1);
        assert_eq!(report.grants[0].agent, AgentId(0));
        assert_eq!(report.changed, vec![AgentId(0)]);
        assert_eq!(neg.occupant(LaneKey::new(v(0), v(1))), Some(AgentId(0)));
        assert_eq!(agents[0].progress(), 0.25);
    }

    #[test]
    fn incumbent_keeps_lane_against_higher_priority() {
        let geo = corridor();
        // A (id 1) idle at 0, B (id 2) entering 1 → 0.
        let mut agents = vec![idle(1, 0, &geo), routed(2, &[1, 0], &geo)];
        let mut neg = LaneNegotiator::new();
        neg.step(&mut agents, 0.25, &geo);
        assert_eq!(neg.occupant(LaneKey::new(v(0), v(1))), Some(AgentId(2)));

        agents[0].assign_task(v(1), vec![v(0), v(1)]).unwrap();
        let report = neg.step(&mut agents, 0.25, &geo);

        assert_eq!(agents[0].state(), AgentState::Waiting);
        assert_eq!(agents[1].state(), AgentState::Moving);
        assert_eq!(report.blocker_of(AgentId(1)), Some(AgentId(2)));
        assert!(report.grants.is_empty());
        assert_eq!(agents[1].progress(), 0.5);
    }

    #[test]
    fn head_on_request_goes_to_smallest_id() {
        let geo = corridor();
        let mut agents = vec![routed(2, &[1, 0], &geo), routed(1, &[0, 1], &geo)];
        let mut neg = LaneNegotiator::new();

        let report = neg.step(&mut agents, 0.5, &geo);
        assert_eq!(report.grants, vec![Grant { agent: AgentId(1), lane: fleet_core::Lane::new(v(0), v(1)) }]);
        assert_eq!(report.blocker_of(AgentId(2)), Some(AgentId(1)));
        assert_eq!(agents[0].state(), AgentState::Waiting);
        assert_eq!(agents[1].state(), AgentState::Moving);
    }

    #[test]
    fn three_contenders_one_winner() {
        let geo = corridor();
        let mut agents = vec![
            routed(3, &[0, 1], &geo),
            routed(1, &[0, 1], &geo),
            routed(2, &[0, 1], &geo),
        ];
        let mut neg = LaneNegotiator::new();

        let report = neg.step(&mut agents, 0.1, &geo);
        assert_eq!(report.grants.len(), 1);
        assert_eq!(report.grants[0].agent, AgentId(1));
        let denied: Vec<_> = report.denials.iter().map(|d| (d.agent, d.blocker)).collect();
        assert_eq!(
            denied,
            vec![(AgentId(2), Some(AgentId(1))), (AgentId(3), Some(AgentId(1)))]
        );
    }

    #[test]
    fn disjoint_lanes_do_not_interfere() {
        let geo = corridor();
        let mut agents = vec![routed(0, &[0, 1], &geo), routed(1, &[2, 3], &geo)];
        let mut neg = LaneNegotiator::new();

        let report = neg.step(&mut agents, 0.5, &geo);
        assert_eq!(report.grants.len(), 2);
        assert!(report.denials.is_empty());
    }

    #[test]
    fn waiter_is_admitted_the_tick_after_incumbent_clears() {
        let geo = corridor();
        let mut agents = vec![routed(1, &[0, 1], &geo), routed(2, &[1, 0], &geo)];
        let mut neg = LaneNegotiator::new();

        neg.step(&mut agents, 0.5, &geo);
        let report = neg.step(&mut agents, 0.5, &geo);
        assert_eq!(agents[0].state(), AgentState::TaskComplete);
        assert_eq!(report.releases.len(), 1);
        assert_eq!(report.releases[0].agent, AgentId(1));
        assert_eq!(neg.occupant(LaneKey::new(v(0), v(1))), None);

        let report = neg.step(&mut agents, 0.5, &geo);
        assert_eq!(report.grants[0].agent, AgentId(2));
        assert_eq!(agents[1].state(), AgentState::Moving);
        assert_eq!(agents[1].blocked_secs(), 0.0);
        assert_eq!(agents[1].progress(), 0.5);
    }

    #[test]
    fn lane_handover_between_consecutive_lanes() {
        let geo = corridor();
        let mut agents = vec![routed(0, &[0, 1, 2], &geo)];
        let mut neg = LaneNegotiator::new();

        neg.step(&mut agents, 1.0, &geo);
        assert_eq!(neg.occupant(LaneKey::new(v(0), v(1))), None);

        neg.step(&mut agents, 0.5, &geo);
        assert_eq!(neg.occupant(LaneKey::new(v(1), v(2))), Some(AgentId(0)));
    }
}

// ── Holds and bookkeeping ─────────────────────────────────────────────────────

#[cfg(test)]
mod holds {
    use super::*;

    #[test]
    fn held_agent_is_denied_a_free_lane() {
        let geo = corridor();
        let mut agents = vec![routed(0, &[0, 1], &geo)];
        let mut neg = LaneNegotiator::new();
        assert!(neg.hold(AgentId(0)));
        assert!(!neg.hold(AgentId(0)));

        let report = neg.step(&mut agents, 0.5, &geo);
        assert_eq!(report.blocker_of(AgentId(0)), None);
        assert!(report.was_denied(AgentId(0)));
        assert_eq!(agents[0].state(), AgentState::Waiting);
        assert_eq!(neg.occupant(LaneKey::new(v(0), v(1))), None);

        assert!(neg.release(AgentId(0)));
        neg.step(&mut agents, 0.5, &geo);
        assert_eq!(agents[0].state(), AgentState::Moving);
        assert_eq!(agents[0].progress(), 0.5);
    }

    #[test]
    fn held_agent_loses_contest_to_larger_id() {
        let geo = corridor();
        let mut agents = vec![routed(0, &[0, 1], &geo), routed(5, &[1, 0], &geo)];
        let mut neg = LaneNegotiator::new();
        neg.hold(AgentId(0));

        let report = neg.step(&mut agents, 0.5, &geo);
        assert_eq!(report.grants[0].agent, AgentId(5));
        assert_eq!(report.blocker_of(AgentId(0)), Some(AgentId(5)));
    }

    #[test]
    fn held_incumbent_keeps_lane_and_creeps_back() {
        let geo = corridor();
        let mut agents = vec![routed(0, &[0, 1], &geo), idle(1, 1, &geo)];
        let mut neg = LaneNegotiator::new();
        neg.step(&mut agents, 0.5, &geo);

        neg.hold(AgentId(0));
        agents[0].hold();
        agents[1].assign_task(v(0), vec![v(1), v(0)]).unwrap();

        let report = neg.step(&mut agents, 1.0, &geo);
        assert_eq!(neg.occupant(LaneKey::new(v(0), v(1))), Some(AgentId(0)));
        assert_eq!(report.blocker_of(AgentId(0)), None);
        assert_eq!(report.blocker_of(AgentId(1)), Some(AgentId(0)));
        assert!(agents[0].progress() < 0.5);
        assert_eq!(agents[1].state(), AgentState::Waiting);
    }

    #[test]
    fn cleared_task_releases_lane_on_next_tick() {
        let geo = corridor();
        let mut agents = vec![routed(0, &[0, 1], &geo)];
        let mut neg = LaneNegotiator::new();
        neg.step(&mut agents, 0.5, &geo);

        agents[0].clear_task(&geo);
        let report = neg.step(&mut agents, 0.5, &geo);
        assert_eq!(report.releases.len(), 1);
        assert_eq!(neg.occupancy().count(), 0);
    }

    #[test]
    fn occupancy_query_is_direction_free() {
        let geo = corridor();
        let mut agents = vec![routed(0, &[0, 1], &geo)];
        let mut neg = LaneNegotiator::new();
        neg.step(&mut agents, 0.25, &geo);

        assert!(neg.is_blocked(v(1), v(0), AgentId(7)));
        assert!(neg.is_blocked(v(0), v(1), AgentId(7)));
        assert!(!neg.is_blocked(v(0), v(1), AgentId(0)));
        assert!(!neg.is_blocked(v(1), v(2), AgentId(7)));

        neg.hold(AgentId(7));
        assert!(neg.is_blocked(v(2), v(3), AgentId(7)));
    }

    #[test]
    fn task_stamp_follows_reassignment() {
        let geo = corridor();
        let mut agents = vec![routed(0, &[0, 1], &geo)];
        let mut neg = LaneNegotiator::new();
        assert_eq!(neg.priority_of(AgentId(0)), None);

        neg.step(&mut agents, 1.0, &geo);
        assert_eq!(
            neg.priority_of(AgentId(0)),
            Some(Priority { agent: AgentId(0), assigned_tick: 0 })
        );

        neg.step(&mut agents, 1.0, &geo);
        agents[0].assign_task(v(0), vec![v(1), v(0)]).unwrap();
        neg.step(&mut agents, 0.5, &geo);
        assert_eq!(neg.priority_of(AgentId(0)).map(|p| p.assigned_tick), Some(2));
        assert_eq!(neg.tick(), 3);
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;

    const RING: u32 = 8;

    fn ring() -> Vec<Point2> {
        (0..RING)
            .map(|i| {
                let a = i as f64 * std::f64::consts::TAU / RING as f64;
                Point2::new(4.0 * a.cos(), 4.0 * a.sin())
            })
            .collect()
    }

    fn ring_walk(start: u32, clockwise: bool, hops: usize) -> Vec<u32> {
        let mut walk = vec![start];
        let mut cur = start;
        for _ in 0..hops {
            cur = if clockwise { (cur + 1) % RING } else { (cur + RING - 1) % RING };
            walk.push(cur);
        }
        walk
    }

    proptest! {
        #[test]
        fn at_most_one_agent_per_lane(
            starts in prop::sample::subsequence((0..RING).collect::<Vec<_>>(), 1..=5),
            plans  in prop::collection::vec((any::<bool>(), 1usize..6), 5),
            dt     in 0.05f64..1.5,
            ticks  in 1usize..80,
        ) {
            let geo = ring();
            let mut agents: Vec<Agent> = starts
                .iter()
                .zip(&plans)
                .enumerate()
                .map(|(i, (&s, &(cw, hops)))| routed(i as u32, &ring_walk(s, cw, hops), &geo))
                .collect();
            let mut neg = LaneNegotiator::new();

            for _ in 0..ticks {
                neg.step(&mut agents, dt, &geo);
                for a in agents.iter().filter(|a| a.progress() > 0.0) {
                    let key = a.current_lane().map(|l| l.key());
                    prop_assert!(key.is_some());
                    prop_assert_eq!(key.and_then(|k| neg.occupant(k)), Some(a.id()));
                }
            }
        }

        #[test]
        fn identical_inputs_give_identical_reports(
            starts in prop::sample::subsequence((0..RING).collect::<Vec<_>>(), 2..=4),
            dt     in 0.1f64..1.0,
        ) {
            let geo = ring();
            let build = || -> Vec<Agent> {
                starts
                    .iter()
                    .enumerate()
                    .map(|(i, &s)| routed(i as u32, &ring_walk(s, i % 2 == 0, 3), &geo))
                    .collect()
            };
            let (mut a, mut b) = (build(), build());
            let (mut na, mut nb) = (LaneNegotiator::new(), LaneNegotiator::new());
            for _ in 0..30 {
                prop_assert_eq!(na.step(&mut a, dt, &geo), nb.step(&mut b, dt, &geo));
            }
        }
    }
}

// ── Parallel apply ────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parallel"))]
mod parallel_apply {
    use proptest::prelude::*;

    use super::*;

    fn kinematics(agents: &[Agent]) -> Vec<(AgentState, VertexId, Point2, f64)> {
        agents
            .iter()
            .map(|a| (a.state(), a.vertex(), a.position(), a.progress()))
            .collect()
    }

    #[test]
    fn head_on_corridor_matches_serial_replay() {
        let geo = corridor();
        let build = || vec![routed(0, &[0, 1, 2, 3], &geo), routed(1, &[3, 2, 1, 0], &geo)];
        let (mut par, mut ser) = (build(), build());
        let (mut np, mut ns) = (LaneNegotiator::new(), LaneNegotiator::new());

        for _ in 0..40 {
            assert_eq!(np.step(&mut par, 0.3, &geo), ns.step_serial(&mut ser, 0.3, &geo));
            assert_eq!(kinematics(&par), kinematics(&ser));
        }
    }

    proptest! {
        #[test]
        fn reports_match_serial_replay(
            starts in prop::sample::subsequence((0..4u32).collect::<Vec<_>>(), 2..=4),
            dt     in 0.05f64..1.2,
        ) {
            let geo = corridor();
            let build = || -> Vec<Agent> {
                starts
                    .iter()
                    .enumerate()
                    .map(|(i, &s)| {
                        let end = if i % 2 == 0 { 3 } else { 0 };
                        let walk: Vec<u32> = if s <= end {
                            (s..=end).collect()
                        } else {
                            (end..=s).rev().collect()
                        };
                        routed(i as u32, &walk, &geo)
                    })
                    .collect()
            };
            let (mut par, mut ser) = (build(), build());
            let (mut np, mut ns) = (LaneNegotiator::new(), LaneNegotiator::new());

            for _ in 0..40 {
                prop_assert_eq!(np.step(&mut par, dt, &geo), ns.step_serial(&mut ser, dt, &geo));
                prop_assert_eq!(kinematics(&par), kinematics(&ser));
            }
        }
    }
}
