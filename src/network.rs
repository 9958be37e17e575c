use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;

use chrono::NaiveDateTime;

use crate::utils;

// Timestamps are wall-clock instants, already normalised for overnight arrivals.
pub type Timestamp = NaiveDateTime;
pub type NodeIndex = u32;
pub type EdgeIndex = u32;

/// When a traveller becomes available at a node.
///
/// `Immediately` sorts before every instant, so a source that starts "right away"
/// can board any connection leaving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArrivalTime {
    Immediately,
    At(Timestamp),
}

impl ArrivalTime {
    pub fn timestamp(self) -> Option<Timestamp> {
        match self {
            ArrivalTime::Immediately => None,
            ArrivalTime::At(time) => Some(time),
        }
    }

    // Can a connection departing at `departure` still be boarded? Departing at the
    // same instant we arrive counts as missed.
    pub fn can_board(self, departure: Timestamp) -> bool {
        match self {
            ArrivalTime::Immediately => true,
            ArrivalTime::At(time) => departure > time,
        }
    }
}

impl From<Timestamp> for ArrivalTime {
    fn from(time: Timestamp) -> Self {
        ArrivalTime::At(time)
    }
}

impl Display for ArrivalTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArrivalTime::Immediately => write!(f, "immediately"),
            ArrivalTime::At(time) => write!(f, "{}", utils::get_time_str(*time)),
        }
    }
}

/// A raw scheduled connection, identified by node codes rather than indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRecord {
    pub origin: String,
    pub destination: String,
    pub departure: Timestamp,
    pub arrival: Timestamp,
}

impl EdgeRecord {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>, departure: Timestamp, arrival: Timestamp) -> Self {
        Self { origin: origin.into(), destination: destination.into(), departure, arrival }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeIndex, // Position in the schedule table, used to look the record back up.
    pub origin: NodeIndex,
    pub destination: NodeIndex,
    pub departure: Timestamp,
    pub arrival: Timestamp,
}

pub struct Node {
    pub id: Box<str>,
    pub edges_idx: usize,
    pub num_edges: usize,
}

impl Node {
    pub fn new(id: String) -> Self {
        Self {
            id: id.into_boxed_str(),
            edges_idx: 0,
            num_edges: 0,
        }
    }

    // Outgoing edges, sorted by (departure, id).
    pub fn get_edges<'a>(&self, node_edges: &'a [EdgeIndex]) -> &'a [EdgeIndex] {
        &node_edges[self.edges_idx..(self.edges_idx + self.num_edges)]
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Row {row} is missing an origin or destination code.")]
    MissingNode { row: usize },
    #[error("Row {row} arrives at {arrival} but departs at {departure}.")]
    NonPositiveDuration { row: usize, departure: Timestamp, arrival: Timestamp },
    #[error("Too many {0} in schedule (we currently use a 32-bit index).")]
    TooLarge(&'static str),
}

/// An immutable set of timestamped edges, with an outgoing-edge index per node.
pub struct Schedule {
    pub nodes: Vec<Node>,
    pub node_index: HashMap<Box<str>, NodeIndex>,
    pub edges: Vec<Edge>,
    pub node_edges: Vec<EdgeIndex>,
}

impl Schedule {
    pub fn new(records: Vec<EdgeRecord>) -> Result<Self, ScheduleError> {
        Self::with_nodes(std::iter::empty::<String>(), records)
    }

    /// Like [`Schedule::new`], but also registers nodes that no edge touches.
    pub fn with_nodes<I, S>(nodes: I, records: Vec<EdgeRecord>) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut node_ids = BTreeSet::new();
        for node in nodes {
            let node = node.into();
            if !node.is_empty() {
                node_ids.insert(node);
            }
        }

        for (row, record) in records.iter().enumerate() {
            if record.origin.is_empty() || record.destination.is_empty() {
                return Err(ScheduleError::MissingNode { row });
            }
            if record.arrival <= record.departure {
                return Err(ScheduleError::NonPositiveDuration {
                    row,
                    departure: record.departure,
                    arrival: record.arrival,
                });
            }
            node_ids.insert(record.origin.clone());
            node_ids.insert(record.destination.clone());
        }

        if node_ids.len() > NodeIndex::MAX as usize {
            return Err(ScheduleError::TooLarge("nodes"));
        }
        if records.len() > EdgeIndex::MAX as usize {
            return Err(ScheduleError::TooLarge("edges"));
        }

        // A BTreeSet iterates in sorted order, so node indices follow the ordering of the codes.
        let mut node_index = HashMap::with_capacity(node_ids.len());
        let mut nodes = Vec::with_capacity(node_ids.len());
        for (i, id) in node_ids.into_iter().enumerate() {
            node_index.insert(Box::from(id.as_str()), i as NodeIndex);
            nodes.push(Node::new(id));
        }

        let edges: Vec<Edge> = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| Edge {
                id: i as EdgeIndex,
                origin: node_index[record.origin.as_str()],
                destination: node_index[record.destination.as_str()],
                departure: record.departure,
                arrival: record.arrival,
            })
            .collect();

        // Group edges by origin, then order each group by departure so the boardable window is a suffix.
        let mut node_edges: Vec<EdgeIndex> = (0..edges.len() as EdgeIndex).collect();
        node_edges.sort_unstable_by_key(|&edge_idx| {
            let edge = &edges[edge_idx as usize];
            (edge.origin, edge.departure, edge.id)
        });

        let mut start = 0;
        for (node_idx, node) in nodes.iter_mut().enumerate() {
            let num_edges = node_edges[start..]
                .iter()
                .take_while(|&&edge_idx| edges[edge_idx as usize].origin as usize == node_idx)
                .count();
            node.edges_idx = start;
            node.num_edges = num_edges;
            start += num_edges;
        }
        debug_assert_eq!(start, node_edges.len());

        Ok(Self { nodes, node_index, edges, node_edges })
    }

    /// All node codes known to the schedule, in ascending order.
    pub fn all_node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.iter().map(|node| &*node.id)
    }

    /// Edges leaving `node` that depart strictly after `not_before`.
    pub fn outgoing_after(&self, node: NodeIndex, not_before: ArrivalTime) -> impl Iterator<Item = &Edge> + '_ {
        let node_edges = self.get_node(node).get_edges(&self.node_edges);
        let first_boardable = match not_before {
            ArrivalTime::Immediately => 0,
            ArrivalTime::At(time) => node_edges.partition_point(|&edge_idx| self.edges[edge_idx as usize].departure <= time),
        };
        node_edges[first_boardable..].iter().map(move |&edge_idx| &self.edges[edge_idx as usize])
    }

    pub fn get_node(&self, node: NodeIndex) -> &Node { &self.nodes[node as usize] }

    pub fn get_node_idx(&self, node_id: &str) -> Option<NodeIndex> { self.node_index.get(node_id).copied() }

    pub fn node_id(&self, node: NodeIndex) -> &str { &self.get_node(node).id }

    pub fn edge(&self, edge: EdgeIndex) -> &Edge { &self.edges[edge as usize] }

    pub fn edges(&self) -> &[Edge] { &self.edges }

    pub fn num_nodes(&self) -> usize { self.nodes.len() }

    pub fn num_edges(&self) -> usize { self.edges.len() }

    pub fn is_empty(&self) -> bool { self.edges.is_empty() }

    pub fn print_stats(&self) {
        log::info!("Schedule has {} nodes and {} edges.", self.num_nodes(), self.num_edges());
        let first_departure = self.edges.iter().map(|edge| edge.departure).min();
        let last_arrival = self.edges.iter().map(|edge| edge.arrival).max();
        if let (Some(first), Some(last)) = (first_departure, last_arrival) {
            log::info!("Edges span {} to {}.", utils::get_time_str(first), utils::get_time_str(last));
        }
    }
}
