//! Minimal command-line wrapper around [`tzshard::TimezoneFinder`] (§6
//! "Command-line surface"): prints the zone name at `lng lat`, or an empty
//! line when the dataset has no coverage there.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tzshard::TimezoneFinderBuilder;

/// Resolve a coordinate to its IANA timezone name.
#[derive(Parser)]
#[command(name = "tzshard", version, about)]
struct Cli {
    /// Longitude in degrees, range [-180, 180].
    lng: f64,
    /// Latitude in degrees, range [-90, 90].
    lat: f64,
    /// Directory holding the on-disk artefact set (§6). Defaults to
    /// `TZSHARD_DATA_DIR`, then the current directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Read artefacts fully into memory instead of memory-mapping them.
    #[arg(long)]
    in_memory: bool,
    /// Only report land timezones, suppressing ocean (`Etc/GMT*`) zones.
    #[arg(long)]
    land_only: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mut builder = TimezoneFinderBuilder::new();
    if let Some(dir) = cli.data_dir {
        builder = builder.data_dir(dir);
    }
    if cli.in_memory {
        builder = builder.in_memory();
    }

    // SAFETY: the CLI process does not mutate the data directory it reads
    // from, and exits (dropping the finder) before any such mutation
    // could plausibly happen.
    let finder = match unsafe { builder.build() } {
        Ok(finder) => finder,
        Err(err) => {
            eprintln!("tzshard: {err}");
            return ExitCode::FAILURE;
        }
    };

    let result = if cli.land_only {
        finder.timezone_at_land(cli.lng, cli.lat)
    } else {
        finder.timezone_at(cli.lng, cli.lat)
    };

    match result {
        Ok(Some(name)) => {
            println!("{name}");
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!();
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("tzshard: {err}");
            ExitCode::FAILURE
        }
    }
}
