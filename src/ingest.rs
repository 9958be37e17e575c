//! CSV flight table loader.
//!
//! # CSV format
//!
//! One row per flight, with a header. Only these columns are read; any others
//! (carrier, tail number, delays...) are ignored:
//!
//! ```csv
//! year,month,day,dep_time,arr_time,origin,dest
//! 2013,1,1,517,830,EWR,IAH
//! 2013,1,1,2355,425,JFK,BQN
//! 2013,1,1,NA,NA,LGA,XNA
//! ```
//!
//! `dep_time` and `arr_time` are local `hhmm` clock readings on the given day.
//! An arrival reading earlier than the departure is an overnight flight and lands
//! the next day. Rows with a missing (`NA` or empty) or unparseable field are
//! dropped, as are rows whose arrival equals their departure.

use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, TimeDelta};
use serde::Deserialize;

use crate::network::{EdgeRecord, Schedule, ScheduleError};
use crate::utils;

#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// How many rows were read, and how many of them were dropped while cleaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub rows: usize,
    pub dropped: usize,
}

// Every field is read as text so a bad value drops its row instead of failing the whole file.
#[derive(Deserialize)]
struct FlightRecord {
    year: Option<String>,
    month: Option<String>,
    day: Option<String>,
    dep_time: Option<String>,
    arr_time: Option<String>,
    origin: Option<String>,
    dest: Option<String>,
}

fn field<'r>(value: &'r Option<String>) -> Option<&'r str> {
    let value = value.as_deref()?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("NA") {
        None
    } else {
        Some(value)
    }
}

fn parse_field<T: std::str::FromStr>(value: &Option<String>) -> Option<T> {
    field(value)?.parse().ok()
}

impl FlightRecord {
    fn into_edge(self) -> Option<EdgeRecord> {
        let origin = field(&self.origin)?.to_owned();
        let destination = field(&self.dest)?.to_owned();
        let date = NaiveDate::from_ymd_opt(parse_field(&self.year)?, parse_field(&self.month)?, parse_field(&self.day)?)?;
        let dep_time = utils::parse_hhmm(field(&self.dep_time)?)?;
        let arr_time = utils::parse_hhmm(field(&self.arr_time)?)?;

        let departure = utils::combine_date_hhmm(date, dep_time)?;
        let mut arrival = utils::combine_date_hhmm(date, arr_time)?;
        if arrival < departure {
            arrival = arrival.checked_add_signed(TimeDelta::days(1))?;
        }
        if arrival == departure {
            return None;
        }

        Some(EdgeRecord { origin, destination, departure, arrival })
    }
}

/// Load a schedule from a CSV flight table on disk.
pub fn load_schedule_csv(path: &Path) -> Result<(Schedule, IngestStats), IngestError> {
    let file = std::fs::File::open(path)?;
    log::info!("Loading flights from {}.", path.display());
    load_schedule_reader(file)
}

/// Like [`load_schedule_csv`] but accepts any `Read` source.
pub fn load_schedule_reader<R: Read>(reader: R) -> Result<(Schedule, IngestStats), IngestError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut stats = IngestStats::default();
    let mut records = Vec::new();

    for result in csv_reader.deserialize::<FlightRecord>() {
        let row = result?;
        stats.rows += 1;
        match row.into_edge() {
            Some(record) => records.push(record),
            None => {
                stats.dropped += 1;
                log::trace!("Dropping incomplete flight on line {}.", stats.rows + 1);
            }
        }
    }

    if stats.dropped > 0 {
        log::warn!("Dropped {} of {} flights with missing or invalid fields.", stats.dropped, stats.rows);
    }

    let schedule = Schedule::new(records)?;
    schedule.print_stats();
    Ok((schedule, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::ArrivalTime;
    use crate::utils::at;
    use std::io::Cursor;

    const FLIGHTS: &str = "\
year,month,day,dep_time,sched_dep_time,arr_time,carrier,origin,dest
2013,1,1,517,515,830,UA,EWR,IAH
2013,1,1,2355,2359,425,B6,JFK,BQN
2013,1,1,NA,1630,NA,EV,LGA,XNA
2013,1,1,600,600,,AA,LGA,ORD
2013,1,1,700,700,700,AA,LGA,ORD
2013,1,1,2400,2359,130,DL,JFK,ATL
2013,1,1,800.0,800,905.0,AA,,MIA
";

    #[test]
    fn loads_and_cleans_flights() {
        let (schedule, stats) = load_schedule_reader(Cursor::new(FLIGHTS)).unwrap();
        assert_eq!(stats, IngestStats { rows: 7, dropped: 4 });
        assert_eq!(schedule.num_edges(), 3);
        assert_eq!(schedule.all_node_ids().collect::<Vec<_>>(), vec!["ATL", "BQN", "EWR", "IAH", "JFK"]);

        let first = schedule.edge(0);
        assert_eq!(schedule.node_id(first.origin), "EWR");
        assert_eq!(first.departure, at(5, 17));
        assert_eq!(first.arrival, at(8, 30));
    }

    #[test]
    fn overnight_arrival_lands_next_day() {
        let (schedule, _) = load_schedule_reader(Cursor::new(FLIGHTS)).unwrap();
        let red_eye = schedule.edge(1);
        assert_eq!(red_eye.departure, at(23, 55));
        assert_eq!(red_eye.arrival, at(4, 25) + TimeDelta::days(1));

        // 2400 departs at midnight at the end of the day, and 01:30 is then the day after.
        let midnight = schedule.edge(2);
        assert_eq!(midnight.departure, at(0, 0) + TimeDelta::days(1));
        assert_eq!(midnight.arrival, at(1, 30) + TimeDelta::days(1));
        assert!(ArrivalTime::At(midnight.departure) > ArrivalTime::At(at(23, 59)));
    }

    #[test]
    fn malformed_clock_readings_drop_their_rows() {
        let flights = "\
year,month,day,dep_time,arr_time,origin,dest
2013,1,1,-45,830,EWR,IAH
2013,1,1,1059.9,1200,JFK,BOS
2013,1,1,900,1e3,JFK,BOS
2013,1,1,517.0,830.00,EWR,IAH
";
        let (schedule, stats) = load_schedule_reader(Cursor::new(flights)).unwrap();
        assert_eq!(stats, IngestStats { rows: 4, dropped: 3 });
        assert_eq!(schedule.num_edges(), 1);
        assert_eq!(schedule.edge(0).departure, at(5, 17));
        assert_eq!(schedule.edge(0).arrival, at(8, 30));
    }

    #[test]
    fn overnight_flight_past_last_date_is_dropped() {
        let flights = "\
year,month,day,dep_time,arr_time,origin,dest
262142,12,31,2355,5,EWR,IAH
262142,12,31,2400,100,EWR,IAH
2013,1,1,517,830,EWR,IAH
";
        let (schedule, stats) = load_schedule_reader(Cursor::new(flights)).unwrap();
        assert_eq!(stats, IngestStats { rows: 3, dropped: 2 });
        assert_eq!(schedule.num_edges(), 1);
    }

    #[test]
    fn empty_table_gives_empty_schedule() {
        let (schedule, stats) = load_schedule_reader(Cursor::new("year,month,day,dep_time,arr_time,origin,dest\n")).unwrap();
        assert!(schedule.is_empty());
        assert_eq!(stats, IngestStats::default());
    }

    #[test]
    fn missing_column_drops_every_row() {
        let result = load_schedule_reader(Cursor::new("year,month,day,origin,dest\n2013,1,1,EWR,IAH\n"));
        assert!(result.is_ok_and(|(schedule, stats)| schedule.is_empty() && stats.dropped == 1));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_schedule_csv(Path::new("does/not/exist.csv"));
        assert!(matches!(result, Err(IngestError::Io(_))));
    }
}
