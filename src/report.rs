//! Plain-text route reports.
//!
//! ```text
//! ROUTE FROM EWR TO SFO
//! --------------
//! 12,EWR,ORD,2013-01-01 06:00,2013-01-01 07:40
//! --------------
//! 57,ORD,SFO,2013-01-01 09:10,2013-01-01 11:45
//! --------------
//! ```

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::journey::Journey;
use crate::network::EdgeIndex;
use crate::utils;

const SEPARATOR: &str = "--------------";

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Serialize)]
struct LegRow<'a> {
    id: EdgeIndex,
    origin: &'a str,
    destination: &'a str,
    departure: String,
    arrival: String,
}

/// Write one CSV row per leg, in travel order, between separator lines.
pub fn write_report<W: Write>(journey: &Journey, mut writer: W) -> Result<(), ReportError> {
    writeln!(writer, "ROUTE FROM {} TO {}", journey.source_id(), journey.destination_id())?;
    writeln!(writer, "{SEPARATOR}")?;
    for leg in &journey.legs {
        let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(&mut writer);
        let row = LegRow {
            id: leg.id,
            origin: journey.network.node_id(leg.origin),
            destination: journey.network.node_id(leg.destination),
            departure: utils::get_time_str(leg.departure),
            arrival: utils::get_time_str(leg.arrival),
        };
        csv_writer.serialize(row)?;
        // The CSV writer buffers, so flush before writing the separator underneath it.
        csv_writer.flush()?;
        drop(csv_writer);
        writeln!(writer, "{SEPARATOR}")?;
    }
    Ok(())
}

/// Append the report to `<dir>/<SOURCE>-<DESTINATION>.txt`, returning the file's path.
pub fn append_report(journey: &Journey, dir: &Path) -> Result<PathBuf, ReportError> {
    let path = dir.join(format!("{}-{}.txt", journey.source_id(), journey.destination_id()));
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let mut writer = std::io::BufWriter::new(file);
    write_report(journey, &mut writer)?;
    writer.flush()?;
    log::info!("Wrote route report to {}.", path.display());
    Ok(path)
}
