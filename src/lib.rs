pub mod network;

pub use network::{ArrivalTime, Edge, EdgeRecord, Schedule};

pub mod journey;

pub use journey::{Journey, JourneyError};

pub mod search;

pub use search::{earliest_arrival_query, EarliestArrival, Outcome, SearchError, SearchRun};

pub mod config;

pub use config::SearchConfig;

pub mod ingest;
pub mod report;
pub mod synthetic;
pub mod utils;
