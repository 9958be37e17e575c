use chrono::{NaiveDate, TimeDelta};
use flightpath::network::Timestamp;
use flightpath::{utils, ArrivalTime, EdgeRecord, Schedule};

// Common example data for the tests, demos and benchmarks.

pub fn get_example_date() -> NaiveDate {
    const { utils::const_unwrap(NaiveDate::from_ymd_opt(2013, 1, 1)) }
}

pub fn at(hours: u32, minutes: u32) -> Timestamp {
    get_example_date().and_hms_opt(hours, minutes, 0).unwrap()
}

pub fn node_code(i: usize) -> String {
    format!("N{i:03}")
}

/// A→B 10:00-11:00 (edge 0), B→C at `b_to_c_departure` for an hour (edge 1), A→C 10:00-13:00 (edge 2).
pub fn three_airports(b_to_c_departure: Timestamp) -> Schedule {
    Schedule::new(vec![
        EdgeRecord::new("A", "B", at(10, 0), at(11, 0)),
        EdgeRecord::new("B", "C", b_to_c_departure, b_to_c_departure + TimeDelta::hours(1)),
        EdgeRecord::new("A", "C", at(10, 0), at(13, 0)),
    ])
    .unwrap()
}

/// Random edges over one day between `num_nodes` nodes. Every node is registered even if no edge touches it.
pub fn random_records(rng: &mut fastrand::Rng, num_nodes: usize, num_edges: usize) -> Vec<EdgeRecord> {
    const MINUTES_PER_DAY: u32 = 24 * 60;
    (0..num_edges)
        .map(|_| {
            let departure_minute = rng.u32(..MINUTES_PER_DAY);
            let flight_minutes = rng.u32(1..=6 * 60);
            let departure = at(departure_minute / 60, departure_minute % 60);
            EdgeRecord::new(
                node_code(rng.usize(..num_nodes)),
                node_code(rng.usize(..num_nodes)),
                departure,
                departure + TimeDelta::minutes(flight_minutes as i64),
            )
        })
        .collect()
}

pub fn random_schedule(rng: &mut fastrand::Rng, num_nodes: usize, num_edges: usize) -> Schedule {
    let records = random_records(rng, num_nodes, num_edges);
    Schedule::with_nodes((0..num_nodes).map(node_code), records).unwrap()
}

pub fn get_example_start_time() -> ArrivalTime {
    ArrivalTime::At(at(6, 0))
}

pub fn get_example_scenario() -> (Schedule, String, ArrivalTime, String) {
    let mut rng = fastrand::Rng::with_seed(7);
    let schedule = random_schedule(&mut rng, 300, 20_000);
    (schedule, node_code(0), get_example_start_time(), node_code(299))
}
