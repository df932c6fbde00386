use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use flightmr::formats::{records, report};
use flightmr::{sequential, MRController, MRParameters, Result};

/// Finds the passengers with the most flights.
#[derive(Debug, Parser)]
#[command(name = "maxflights", version)]
struct Args {
    /// Flight records, one `passengerId,flightId,from,to,departure,duration` per line ("-" for stdin)
    #[arg(default_value = "input/AComp_Passenger_data_no_error.csv")]
    input: PathBuf,

    /// Records per map partition
    #[arg(short = 'p', long, default_value_t = 100)]
    partition_size: usize,

    /// Maximum number of map units running at once (default: one per partition)
    #[arg(short, long)]
    mappers: Option<usize>,

    /// Fail if the map phase takes longer than this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Recompute the answer sequentially and compare
    #[arg(long)]
    verify: bool,
}

impl Args {
    fn params(&self) -> MRParameters {
        let mut params = MRParameters::new().set_partition_size(self.partition_size);
        if let Some(n) = self.mappers {
            params = params.set_mappers(n);
        }
        if let Some(ms) = self.timeout_ms {
            params = params.set_map_timeout(Duration::from_millis(ms));
        }
        params
    }
}

fn run(args: &Args) -> Result<bool> {
    let controller = MRController::flight_counter(args.params())?;
    let flights = records::load(&args.input)?;

    let reference = if args.verify {
        Some(sequential::max_flights(&flights)?)
    } else {
        None
    };

    let max = controller.max_flights(flights)?;
    report::write_report(&mut io::stdout().lock(), &max)?;

    match reference {
        Some(expected) if expected != max => {
            eprintln!("maxflights: verification failed");
            error!(
                "verification failed: sequential count found {} flights for {:?}",
                expected.count, expected.keys
            );
            Ok(false)
        }
        Some(_) => {
            info!("verification passed");
            Ok(true)
        }
        None => Ok(true),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("maxflights: {}", e);
            ExitCode::FAILURE
        }
    }
}
