use flightpath::{utils, ArrivalTime, EarliestArrival, Outcome};

use dev_utils::{at, three_airports};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // The direct A→C flight lands at 13:00, but changing at B gets in at 12:30.
    let schedule = three_airports(at(11, 30));
    schedule.print_stats();

    let start_time = ArrivalTime::At(utils::parse_time("2013-01-01 00:00")?);
    let run = EarliestArrival::new(&schedule).run("A", "C", start_time)?;

    match run.outcome() {
        Outcome::Found(arrival) => {
            println!("Earliest arrival: {arrival}");
            println!("{}", run.journey()?);
        }
        Outcome::Unreachable => println!("No journey found."),
    }

    Ok(())
}
