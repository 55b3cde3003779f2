//! # Report stream
//!
//! A [`Report`] gathers everything computed for one tick. It is rendered either as the fixed
//! five-line text record
//!
//! ```text
//!
//!  Date: 16/10/2024 UTC: 13:04:27  Ephemeris: SGP4
//!  Azi= 211.3 Ele=  12.7 Range=  1843.2 Range Rate= -3.41
//!  Lat=  49.1 Lon= 250.3  Alt=   548.9  Vel=   7.588
//!  Satellite Status: In Sunlight - Depth: -0.512
//!  Sun Azi= 172.4 Sun Ele=  27.0
//! ```
//!
//! or as one CSV row ([`ReportRow`]). Angles are printed in degrees, distances in km, rates in
//! km/s and the eclipse depth in radians.
//!
//! Output goes through a [`ReportSink`]: [`TextSink`] also prints the day-sweep progress line
//! `current time HH:MM:SS`, [`CsvSink`] only writes data rows.

use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::illumination::EclipseState;
use crate::observation::{GeodeticPosition, LookAngles};
use crate::propagation::Regime;
use crate::time::CalendarTimestamp;
use crate::tracker_errors::TrackerError;

/// Observational state of the target at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub timestamp: CalendarTimestamp,
    pub regime: Regime,
    /// Target seen from the observer
    pub target: LookAngles,
    /// Point below the target
    pub sub_point: GeodeticPosition,
    /// Inertial speed of the target (km/s)
    pub speed: f64,
    pub eclipse: EclipseState,
    /// Sun seen from the observer, range and range-rate unused
    pub sun: LookAngles,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\n Date: {}  Ephemeris: {}\
             \n Azi={:6.1} Ele={:6.1} Range={:8.1} Range Rate={:6.2}\
             \n Lat={:6.1} Lon={:6.1}  Alt={:8.1}  Vel={:8.3}\
             \n Satellite Status: {} - Depth: {:2.3}\
             \n Sun Azi={:6.1} Sun Ele={:6.1}\n",
            self.timestamp,
            self.regime.label(),
            self.target.azimuth_deg(),
            self.target.elevation_deg(),
            self.target.range,
            self.target.range_rate,
            self.sub_point.latitude_deg(),
            self.sub_point.longitude_deg(),
            self.sub_point.altitude,
            self.speed,
            self.eclipse.status(),
            self.eclipse.depth,
            self.sun.azimuth_deg(),
            self.sun.elevation_deg(),
        )
    }
}

/// Progress line printed on every day-sweep tick.
pub fn progress_line(timestamp: &CalendarTimestamp) -> String {
    format!("current time {}", timestamp.time_of_day())
}

/// Flat CSV rendering of a [`Report`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub utc: String,
    pub ephemeris: &'static str,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub range_km: f64,
    pub range_rate_km_s: f64,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
    pub velocity_km_s: f64,
    pub status: &'static str,
    pub eclipse_depth_rad: f64,
    pub sun_azimuth_deg: f64,
    pub sun_elevation_deg: f64,
}

impl From<&Report> for ReportRow {
    fn from(report: &Report) -> Self {
        let t = &report.timestamp;
        ReportRow {
            utc: format!(
                "{:04}-{:02}-{:02}T{}",
                t.year,
                t.month,
                t.day,
                t.time_of_day()
            ),
            ephemeris: report.regime.label(),
            azimuth_deg: report.target.azimuth_deg(),
            elevation_deg: report.target.elevation_deg(),
            range_km: report.target.range,
            range_rate_km_s: report.target.range_rate,
            latitude_deg: report.sub_point.latitude_deg(),
            longitude_deg: report.sub_point.longitude_deg(),
            altitude_km: report.sub_point.altitude,
            velocity_km_s: report.speed,
            status: report.eclipse.status(),
            eclipse_depth_rad: report.eclipse.depth,
            sun_azimuth_deg: report.sun.azimuth_deg(),
            sun_elevation_deg: report.sun.elevation_deg(),
        }
    }
}

/// Destination of the report stream.
pub trait ReportSink {
    /// Emit one full report.
    fn report(&mut self, report: &Report) -> Result<(), TrackerError>;

    /// Emit the per-tick progress marker of a day sweep.
    fn progress(&mut self, timestamp: &CalendarTimestamp) -> Result<(), TrackerError>;

    /// Flush everything still buffered once the run is over.
    fn finish(&mut self) -> Result<(), TrackerError>;
}

/// Human-readable text records.
#[derive(Debug)]
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        TextSink { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextSink<W> {
    fn report(&mut self, report: &Report) -> Result<(), TrackerError> {
        write!(self.out, "{report}")?;
        self.out.flush()?;
        Ok(())
    }

    fn progress(&mut self, timestamp: &CalendarTimestamp) -> Result<(), TrackerError> {
        writeln!(self.out, "{}", progress_line(timestamp))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), TrackerError> {
        self.out.flush()?;
        Ok(())
    }
}

/// One CSV row per report, header first.
#[derive(Debug)]
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(out: W) -> Self {
        CsvSink {
            writer: csv::Writer::from_writer(out),
        }
    }

    /// Flush the pending rows and give back the underlying writer.
    pub fn into_inner(self) -> Result<W, TrackerError> {
        self.writer
            .into_inner()
            .map_err(|e| {
                TrackerError::IoError(std::io::Error::new(e.error().kind(), e.error().to_string()))
            })
    }
}

impl<W: Write> ReportSink for CsvSink<W> {
    fn report(&mut self, report: &Report) -> Result<(), TrackerError> {
        self.writer.serialize(ReportRow::from(report))?;
        self.writer.flush()?;
        Ok(())
    }

    fn progress(&mut self, _timestamp: &CalendarTimestamp) -> Result<(), TrackerError> {
        Ok(())
    }

    fn finish(&mut self) -> Result<(), TrackerError> {
        self.writer.flush()?;
        Ok(())
    }
}
