//! Randomised schedules for stress-testing the search.

use crate::network::{EdgeRecord, NodeIndex, Schedule};

/// Reassign every edge's origin and destination uniformly at random (with replacement)
/// from the schedule's nodes, keeping edge ids and times.
///
/// Real flight tables are dominated by a few hub airports; shuffling spreads the
/// connections across many more node pairs. The node set is kept, so some nodes
/// may end up with no edges at all.
pub fn shuffle_endpoints(schedule: &Schedule, rng: &mut fastrand::Rng) -> Schedule {
    // Every edge touches at least one node, so `node_ids` is only empty when there are no edges to draw for.
    let node_ids: Vec<&str> = schedule.all_node_ids().collect();
    let records = schedule
        .edges()
        .iter()
        .map(|edge| EdgeRecord {
            origin: node_ids[rng.usize(..node_ids.len())].to_owned(),
            destination: node_ids[rng.usize(..node_ids.len())].to_owned(),
            departure: edge.departure,
            arrival: edge.arrival,
        })
        .collect();

    // Times are untouched and every code is non-empty, so the source schedule's checks still hold.
    Schedule::with_nodes(node_ids.iter().copied(), records).expect("Shuffled schedule keeps valid edges.")
}

/// Pick two distinct nodes at random, or `None` if there are fewer than two.
pub fn random_pair(schedule: &Schedule, rng: &mut fastrand::Rng) -> Option<(NodeIndex, NodeIndex)> {
    let num_nodes = schedule.num_nodes();
    if num_nodes < 2 {
        return None;
    }
    let source = rng.usize(..num_nodes) as NodeIndex;
    let destination = random_other(schedule, rng, source)?;
    Some((source, destination))
}

/// Pick a node other than `excluded` at random, or `None` if there is no other node.
pub fn random_other(schedule: &Schedule, rng: &mut fastrand::Rng, excluded: NodeIndex) -> Option<NodeIndex> {
    let num_nodes = schedule.num_nodes();
    if num_nodes < 2 {
        return None;
    }
    // Draw from the remaining nodes, skipping over the excluded one.
    let mut node = rng.usize(..num_nodes - 1);
    if node >= excluded as usize {
        node += 1;
    }
    Some(node as NodeIndex)
}
