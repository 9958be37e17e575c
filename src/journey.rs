use std::fmt::Display;

use chrono::TimeDelta;

use crate::network::{ArrivalTime, Edge, EdgeIndex, NodeIndex, Schedule};
use crate::utils;

// How the current best arrival at a node was achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boarding {
    pub predecessor: NodeIndex,
    pub edge: EdgeIndex,
}

/// Per-node search state. `best_arrival == None` means the node has not been reached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeLabel {
    pub visited: bool,
    pub best_arrival: Option<ArrivalTime>,
    pub boarding: Option<Boarding>,
}

impl NodeLabel {
    pub fn predecessor(&self) -> Option<NodeIndex> {
        self.boarding.map(|boarding| boarding.predecessor)
    }

    pub fn incoming_edge(&self) -> Option<EdgeIndex> {
        self.boarding.map(|boarding| boarding.edge)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum JourneyError {
    #[error("No journey found.")]
    NoJourneyFound,
}

pub type JourneyResult<'a> = Result<Journey<'a>, JourneyError>;

pub struct Journey<'a> {
    pub legs: Vec<Edge>,
    pub source: NodeIndex,
    pub destination: NodeIndex,
    pub arrival: ArrivalTime,
    pub network: &'a Schedule,
}

impl<'a> Journey<'a> {
    // Walk boarding links back from `end` to `start`. The labels must come from a run that finalised `end`.
    pub(crate) fn from_labels(labels: &[NodeLabel], network: &'a Schedule, start: NodeIndex, end: NodeIndex, arrival: ArrivalTime) -> Self {
        let mut legs = Vec::new();
        let mut current_node = end;
        while current_node != start {
            // A simple path visits each node at most once, so anything longer is a cycle.
            assert!(legs.len() < labels.len(), "Inconsistent path: predecessor links from {} loop.", network.node_id(end));

            let boarding = labels[current_node as usize].boarding.unwrap_or_else(|| {
                panic!(
                    "Inconsistent path: {} has no predecessor on the way back to {}.",
                    network.node_id(current_node),
                    network.node_id(start)
                )
            });
            legs.push(*network.edge(boarding.edge));
            current_node = boarding.predecessor;
        }

        legs.reverse();

        Self { legs, source: start, destination: end, arrival, network }
    }

    /// Time from the first departure to the final arrival. Zero for an empty journey.
    pub fn duration(&self) -> TimeDelta {
        match (self.legs.first(), self.legs.last()) {
            (Some(first), Some(last)) => last.arrival - first.departure,
            _ => TimeDelta::zero(),
        }
    }

    /// Whether each leg departs where, and strictly after, the previous one arrives.
    pub fn is_chained(&self) -> bool {
        self.legs.first().is_none_or(|first| first.origin == self.source)
            && self.legs.last().is_none_or(|last| last.destination == self.destination)
            && self
                .legs
                .windows(2)
                .all(|pair| pair[0].destination == pair[1].origin && pair[0].arrival < pair[1].departure)
    }

    pub fn source_id(&self) -> &'a str { self.network.node_id(self.source) }

    pub fn destination_id(&self) -> &'a str { self.network.node_id(self.destination) }
}

impl Display for Journey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "-----------------------------------------------")?;
        writeln!(f)?;
        writeln!(f, "Route from {} to {}.", self.source_id(), self.destination_id())?;
        if self.legs.is_empty() {
            writeln!(f, "Already there ({}).", self.arrival)?;
        }
        for leg in self.legs.iter() {
            writeln!(f)?;
            writeln!(f,
                     "Depart {} at {} (connection {}).",
                     self.network.node_id(leg.origin),
                     utils::get_time_str(leg.departure),
                     leg.id,
            )?;
            writeln!(f,
                     "Arrive at {} at {}.",
                     self.network.node_id(leg.destination),
                     utils::get_time_str(leg.arrival),
            )?;
        }
        if !self.legs.is_empty() {
            writeln!(f)?;
            writeln!(f, "Total journey time: {}.", utils::get_duration_str(self.duration()))?;
        }
        writeln!(f, "-----------------------------------------------")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::EdgeRecord;
    use crate::utils::at;

    fn chain() -> Schedule {
        Schedule::new(vec![
            EdgeRecord::new("A", "B", at(10, 0), at(11, 0)),
            EdgeRecord::new("B", "C", at(11, 30), at(12, 30)),
        ])
        .unwrap()
    }

    fn reached(predecessor: NodeIndex, edge: EdgeIndex, time: ArrivalTime) -> NodeLabel {
        NodeLabel { visited: true, best_arrival: Some(time), boarding: Some(Boarding { predecessor, edge }) }
    }

    fn chain_labels() -> Vec<NodeLabel> {
        vec![
            NodeLabel { visited: true, best_arrival: Some(ArrivalTime::Immediately), boarding: None },
            reached(0, 0, at(11, 0).into()),
            reached(1, 1, at(12, 30).into()),
        ]
    }

    #[test]
    fn legs_come_out_in_travel_order() {
        let schedule = chain();
        let journey = Journey::from_labels(&chain_labels(), &schedule, 0, 2, at(12, 30).into());
        assert_eq!(journey.legs.iter().map(|leg| leg.id).collect::<Vec<_>>(), vec![0, 1]);
        assert!(journey.is_chained());
        assert_eq!(journey.duration(), TimeDelta::minutes(150));
        assert_eq!(journey.source_id(), "A");
        assert_eq!(journey.destination_id(), "C");
    }

    #[test]
    fn partial_walk_stops_at_source() {
        let schedule = chain();
        let journey = Journey::from_labels(&chain_labels(), &schedule, 1, 2, at(12, 30).into());
        assert_eq!(journey.legs.len(), 1);
        assert_eq!(journey.legs[0].id, 1);
    }

    #[test]
    #[should_panic(expected = "Inconsistent path")]
    fn missing_predecessor_panics() {
        let schedule = chain();
        let mut labels = chain_labels();
        labels[1].boarding = None;
        Journey::from_labels(&labels, &schedule, 0, 2, at(12, 30).into());
    }

    #[test]
    #[should_panic(expected = "Inconsistent path")]
    fn predecessor_cycle_panics() {
        let schedule = chain();
        let mut labels = chain_labels();
        labels[1] = reached(2, 1, at(11, 0).into());
        Journey::from_labels(&labels, &schedule, 0, 2, at(12, 30).into());
    }

    #[test]
    fn display_lists_each_leg() {
        let schedule = chain();
        let journey = Journey::from_labels(&chain_labels(), &schedule, 0, 2, at(12, 30).into());
        let text = journey.to_string();
        assert!(text.contains("Depart A at 2013-01-01 10:00 (connection 0)."));
        assert!(text.contains("Arrive at C at 2013-01-01 12:30."));
        assert!(text.contains("Total journey time: 2h30m."));
    }

    #[test]
    fn broken_chain_is_detected() {
        let schedule = chain();
        let journey = Journey {
            legs: vec![*schedule.edge(1), *schedule.edge(0)],
            source: 1,
            destination: 1,
            arrival: at(11, 0).into(),
            network: &schedule,
        };
        assert!(!journey.is_chained());
    }
}
