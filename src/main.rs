use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use flightpath::ingest::load_schedule_csv;
use flightpath::{report, synthetic, utils, ArrivalTime, EarliestArrival, Outcome, SearchConfig};

/// Find the earliest-arriving sequence of flights between two airports.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Flight table (CSV with year, month, day, dep_time, arr_time, origin, dest columns).
    flights: PathBuf,

    /// Departure airport. Picked at random when omitted.
    #[arg(long)]
    from: Option<String>,

    /// Arrival airport. Picked at random when omitted.
    #[arg(long)]
    to: Option<String>,

    /// Earliest time we can leave, as "YYYY-MM-DD HH:MM". Any departure is allowed when omitted.
    #[arg(long, value_parser = utils::parse_time)]
    start: Option<chrono::NaiveDateTime>,

    /// Randomly reassign flight origins and destinations before searching.
    #[arg(long)]
    shuffle: bool,

    /// Seed for shuffling and random airport selection.
    #[arg(long)]
    seed: Option<u64>,

    /// Append the route to <DIR>/<FROM>-<TO>.txt.
    #[arg(long, value_name = "DIR")]
    report_dir: Option<PathBuf>,

    /// Give up on the search after this many milliseconds.
    #[arg(long)]
    deadline_ms: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let (mut schedule, stats) = load_schedule_csv(&args.flights)?;
    println!("Loaded {} flights ({} rows dropped) between {} airports.", schedule.num_edges(), stats.dropped, schedule.num_nodes());

    let mut rng = match args.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    if args.shuffle {
        schedule = synthetic::shuffle_endpoints(&schedule, &mut rng);
        log::info!("Shuffled flight origins and destinations.");
    }

    const TOO_FEW_AIRPORTS: &str = "Need at least two airports to pick a random route.";
    // A random end is always drawn from the airports other than the fixed one.
    let random_other = |fixed: &str, rng: &mut fastrand::Rng| -> Result<String, &'static str> {
        let fixed = schedule.get_node_idx(fixed).ok_or("Unknown airport.")?;
        let other = synthetic::random_other(&schedule, rng, fixed).ok_or(TOO_FEW_AIRPORTS)?;
        Ok(schedule.node_id(other).to_owned())
    };
    let (source, destination) = match (args.from, args.to) {
        (Some(from), Some(to)) => (from, to),
        (Some(from), None) => {
            let to = random_other(&from, &mut rng)?;
            (from, to)
        }
        (None, Some(to)) => (random_other(&to, &mut rng)?, to),
        (None, None) => {
            let (random_source, random_destination) = synthetic::random_pair(&schedule, &mut rng).ok_or(TOO_FEW_AIRPORTS)?;
            (schedule.node_id(random_source).to_owned(), schedule.node_id(random_destination).to_owned())
        }
    };
    let start_time = args.start.map_or(ArrivalTime::Immediately, ArrivalTime::At);

    println!();
    println!("Start: {source} ({start_time})");
    println!("End: {destination}");
    println!();

    let config = SearchConfig::new(args.deadline_ms.map(Duration::from_millis));
    let query_start = std::time::Instant::now();
    let run = EarliestArrival::with_config(&schedule, config).run(&source, &destination, start_time)?;
    println!("Query took {:?}", query_start.elapsed());

    match run.outcome() {
        Outcome::Found(_) => {
            let journey = run.journey()?;
            println!("{journey}");
            if let Some(dir) = &args.report_dir {
                let path = report::append_report(&journey, dir)?;
                println!("Report written to {}.", path.display());
            }
        }
        Outcome::Unreachable => println!("No journey found."),
    }

    Ok(())
}
