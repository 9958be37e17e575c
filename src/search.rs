use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use crate::config::SearchConfig;
use crate::journey::{Boarding, Journey, JourneyError, JourneyResult, NodeLabel};
use crate::network::{ArrivalTime, EdgeIndex, NodeIndex, Schedule, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Found(ArrivalTime),
    Unreachable,
}

#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("Unknown node {0:?}.")]
    UnknownNode(String),
    #[error("Search exceeded its deadline of {0:?}.")]
    DeadlineExceeded(Duration),
    #[error(transparent)]
    Journey(#[from] JourneyError),
}

// Frontier entries are ordered by arrival, then by node index (which follows node code order).
type FrontierEntry = Reverse<(ArrivalTime, NodeIndex)>;

/// Earliest-arrival search over a [`Schedule`].
pub struct EarliestArrival<'a> {
    schedule: &'a Schedule,
    config: SearchConfig,
}

impl<'a> EarliestArrival<'a> {
    pub fn new(schedule: &'a Schedule) -> Self {
        Self::with_config(schedule, SearchConfig::default())
    }

    pub fn with_config(schedule: &'a Schedule, config: SearchConfig) -> Self {
        Self { schedule, config }
    }

    fn resolve(&self, node_id: &str) -> Result<NodeIndex, SearchError> {
        self.schedule
            .get_node_idx(node_id)
            .ok_or_else(|| SearchError::UnknownNode(node_id.to_owned()))
    }

    /// Finalise nodes in order of arrival until `destination` is reached or nothing else is reachable.
    pub fn run(&self, source: &str, destination: &str, start_time: ArrivalTime) -> Result<SearchRun<'a>, SearchError> {
        let source = self.resolve(source)?;
        let destination = self.resolve(destination)?;
        let started = Instant::now();

        let mut run = SearchRun::new(self.schedule, source, destination, start_time);
        let mut frontier: BinaryHeap<FrontierEntry> = BinaryHeap::new();
        frontier.push(Reverse((start_time, source)));

        while let Some(Reverse((time, node))) = frontier.pop() {
            let label = &mut run.labels[node as usize];
            // Stale entry: the node was finalised or improved after this entry was pushed.
            if label.visited || label.best_arrival != Some(time) {
                continue;
            }
            label.visited = true;
            run.settled.push((node, time));

            if node == destination {
                run.outcome = Outcome::Found(time);
                break;
            }

            if let Some(deadline) = self.config.deadline {
                if started.elapsed() >= deadline {
                    return Err(SearchError::DeadlineExceeded(deadline));
                }
            }

            run.relax(node, time, &mut frontier);
        }

        log::debug!(
            "Search from {} to {} settled {} of {} nodes in {:?}: {:?}.",
            self.schedule.node_id(source),
            self.schedule.node_id(destination),
            run.settled.len(),
            self.schedule.num_nodes(),
            started.elapsed(),
            run.outcome,
        );

        Ok(run)
    }
}

/// The working set of a single search, kept around for path reconstruction.
pub struct SearchRun<'a> {
    schedule: &'a Schedule,
    source: NodeIndex,
    destination: NodeIndex,
    start_time: ArrivalTime,
    labels: Vec<NodeLabel>,
    settled: Vec<(NodeIndex, ArrivalTime)>,
    outcome: Outcome,
    // Scratch buffer for one relaxation round: (destination, arrival, edge).
    candidates: Vec<(NodeIndex, Timestamp, EdgeIndex)>,
}

impl<'a> SearchRun<'a> {
    fn new(schedule: &'a Schedule, source: NodeIndex, destination: NodeIndex, start_time: ArrivalTime) -> Self {
        let mut labels = vec![NodeLabel::default(); schedule.num_nodes()];
        labels[source as usize].best_arrival = Some(start_time);
        Self {
            schedule,
            source,
            destination,
            start_time,
            labels,
            settled: Vec::new(),
            outcome: Outcome::Unreachable,
            candidates: Vec::new(),
        }
    }

    fn relax(&mut self, node: NodeIndex, time: ArrivalTime, frontier: &mut BinaryHeap<FrontierEntry>) {
        self.candidates.clear();
        self.candidates.extend(
            self.schedule
                .outgoing_after(node, time)
                .filter(|edge| !self.labels[edge.destination as usize].visited)
                .map(|edge| (edge.destination, edge.arrival, edge.id)),
        );

        // Per destination, keep the earliest-arriving edge, lowest id first on ties.
        self.candidates.sort_unstable();
        self.candidates.dedup_by_key(|&mut (destination, _, _)| destination);

        for &(destination, arrival, edge) in &self.candidates {
            let label = &mut self.labels[destination as usize];
            let arrival = ArrivalTime::At(arrival);
            if label.best_arrival.is_none_or(|best| arrival < best) {
                label.best_arrival = Some(arrival);
                label.boarding = Some(Boarding { predecessor: node, edge });
                frontier.push(Reverse((arrival, destination)));
            }
        }
    }

    pub fn outcome(&self) -> Outcome { self.outcome }

    pub fn source(&self) -> NodeIndex { self.source }

    pub fn destination(&self) -> NodeIndex { self.destination }

    pub fn start_time(&self) -> ArrivalTime { self.start_time }

    pub fn schedule(&self) -> &'a Schedule { self.schedule }

    pub fn label(&self, node: NodeIndex) -> &NodeLabel { &self.labels[node as usize] }

    pub fn labels(&self) -> &[NodeLabel] { &self.labels }

    /// Nodes in the order they were finalised, with their final arrival.
    pub fn settled(&self) -> &[(NodeIndex, ArrivalTime)] { &self.settled }

    /// Reconstruct the winning path. Only a run that found the destination has one.
    pub fn journey(&self) -> JourneyResult<'a> {
        match self.outcome {
            Outcome::Found(arrival) => Ok(Journey::from_labels(&self.labels, self.schedule, self.source, self.destination, arrival)),
            Outcome::Unreachable => Err(JourneyError::NoJourneyFound),
        }
    }
}

pub fn earliest_arrival_query<'a>(network: &'a Schedule, start: &str, start_time: ArrivalTime, end: &str) -> Result<Journey<'a>, SearchError> {
    let run = EarliestArrival::new(network).run(start, end, start_time)?;
    Ok(run.journey()?)
}
