use flightpath::{report, synthetic, ArrivalTime, EarliestArrival};

use dev_utils::random_schedule;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Random flights between 50 airports, then shuffled endpoints as a stress test.
    let mut rng = fastrand::Rng::with_seed(7);
    let schedule = random_schedule(&mut rng, 50, 2_000);
    let schedule = synthetic::shuffle_endpoints(&schedule, &mut rng);
    schedule.print_stats();

    let (source, destination) = synthetic::random_pair(&schedule, &mut rng).ok_or("Not enough airports.")?;
    let (source, destination) = (schedule.node_id(source), schedule.node_id(destination));

    let run = EarliestArrival::new(&schedule).run(source, destination, ArrivalTime::Immediately)?;
    if let Ok(journey) = run.journey() {
        println!("{journey}");
        report::write_report(&journey, std::io::stdout().lock())?;
    } else {
        println!("No journey found from {source} to {destination}.");
    }

    Ok(())
}
