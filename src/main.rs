//! rangerate - satellite look angles, range-rate and illumination for a ground observer.
//!
//! By default the current element set of the satellite is fetched from Celestrak and one UTC
//! day is swept second by second, printing a full record whenever the satellite is above the
//! horizon threshold. `--continuous` tracks the satellite in real time instead.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use camino::Utf8PathBuf;
use chrono::{Datelike, NaiveDate};
use clap::Parser;

use rangerate::constants::{CatalogNumber, Degree, Meter};
use rangerate::elements::source::{CelestrakSource, ElementSource, TleFileSource};
use rangerate::env_state::TrackerEnv;
use rangerate::observers::ObserverLocation;
use rangerate::propagation::Sgp4Propagator;
use rangerate::report::{CsvSink, ReportSink, TextSink};
use rangerate::tracker::{LiveClock, SimulatedDay, ThreadPacer, Tracker, TrackerConfig};
use rangerate::tracker_errors::TrackerError;

#[derive(Debug, Parser)]
#[command(name = "rangerate", version, about)]
struct Cli {
    /// NORAD catalog number of the satellite
    catalog: CatalogNumber,

    /// Observer latitude in degrees, north positive
    #[arg(allow_negative_numbers = true)]
    latitude: Degree,

    /// Observer longitude in degrees, east positive (west longitudes are negative)
    #[arg(allow_negative_numbers = true)]
    longitude: Degree,

    /// Observer altitude in meters above mean sea level
    #[arg(long, default_value_t = 701.0)]
    altitude: Meter,

    /// Track in real time instead of sweeping one day
    #[arg(long)]
    continuous: bool,

    /// Read element sets from a local 2LE/3LE file instead of Celestrak
    #[arg(long)]
    tle_file: Option<Utf8PathBuf>,

    /// Date to sweep (YYYY-MM-DD), today in UTC by default
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Elevation the satellite must exceed to be reported in a day sweep (degrees)
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    min_elevation: Degree,

    /// Do not print the per-second progress line of a day sweep
    #[arg(long)]
    no_progress: bool,

    /// Write reports as CSV rows
    #[arg(long)]
    csv: bool,

    /// Output file, `-` for standard output
    #[arg(short, long)]
    output: Option<Utf8PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(err) = run(&cli) {
        report_fatal(&mut io::stderr(), &err);
        std::process::exit(err.exit_code());
    }
}

/// Single user-facing line for an error that ends the program.
fn report_fatal<W: Write>(out: &mut W, err: &TrackerError) {
    // nothing left to do if stderr itself is gone
    let _ = writeln!(out, " {err} - Exiting!");
}

fn run(cli: &Cli) -> Result<(), TrackerError> {
    let observer = ObserverLocation::from_degrees(cli.latitude, cli.longitude, cli.altitude, None)?;
    let config = TrackerConfig::builder()
        .min_elevation(cli.min_elevation)
        .progress_lines(!cli.no_progress)
        .build()?;

    let source: Box<dyn ElementSource> = match &cli.tle_file {
        Some(path) => Box::new(TleFileSource::new(path.clone())),
        None => Box::new(CelestrakSource::new(TrackerEnv::new()?)),
    };
    let elements = source.fetch(cli.catalog)?;
    let propagator = Sgp4Propagator::adopt(&elements)?;

    let mut out = open_output(cli.output.as_ref())?;
    if cli.csv {
        log::info!("{}: TLE set good", elements.name);
        track(cli, &propagator, &observer, config, &mut CsvSink::new(out))
    } else {
        writeln!(out, " {}: TLE set good - Happy Tracking!", elements.name)?;
        track(cli, &propagator, &observer, config, &mut TextSink::new(out))
    }
}

fn open_output(path: Option<&Utf8PathBuf>) -> Result<Box<dyn Write>, TrackerError> {
    match path {
        Some(path) if path.as_str() != "-" => {
            log::debug!("writing reports to {path}");
            Ok(Box::new(BufWriter::new(File::create(path)?)))
        }
        _ => Ok(Box::new(io::stdout())),
    }
}

fn track<S: ReportSink>(
    cli: &Cli,
    propagator: &Sgp4Propagator,
    observer: &ObserverLocation,
    config: TrackerConfig,
    sink: &mut S,
) -> Result<(), TrackerError> {
    let mut pacer = ThreadPacer;

    if cli.continuous {
        let mut tracker = Tracker::continuous(propagator, observer, config);
        tracker.run(&mut LiveClock, &mut pacer, sink)?;
        return Ok(());
    }

    let mut day = match cli.date {
        Some(date) => SimulatedDay::starting(date.year(), date.month() as u8, date.day() as u8)?,
        None => SimulatedDay::today()?,
    };
    let mut tracker = Tracker::day_sweep(propagator, observer, config);
    let summary = tracker.run(&mut day, &mut pacer, sink)?;
    log::info!(
        "day sweep of catalog {} done: {} reports in {} ticks",
        cli.catalog,
        summary.reports,
        summary.ticks
    );
    Ok(())
}

#[cfg(test)]
mod main_test {
    use super::*;

    #[test]
    fn test_fatal_error_is_printed_once() {
        let err = TrackerError::PropagationError("diverged".into());
        let mut out = Vec::new();
        report_fatal(&mut out, &err);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, " Propagation failed: diverged - Exiting!\n");
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_cli_accepts_west_longitude() {
        let cli = Cli::try_parse_from(["rangerate", "25445", "53.7694", "-113.4560"]).unwrap();
        assert_eq!(cli.catalog, 25445);
        assert_eq!(cli.longitude, -113.4560);
        assert_eq!(cli.altitude, 701.0);
        assert!(!cli.continuous);
    }
}
