//! # Day-simulation controller
//!
//! One controller, [`Tracker`], drives the observation pipeline. Its behaviour is set by two
//! independent strategies:
//!
//! * a [`ClockSource`] deciding which instant is evaluated next and when the run is over:
//!   [`LiveClock`] (wall clock, never ends) or [`SimulatedDay`] (one calendar day at one
//!   second per tick, from midnight to 23:59:59);
//! * a [`ReportPolicy`] deciding what is written for each tick:
//!   [`ReportPolicy::Unconditional`] (every tick gets a full report) or
//!   [`ReportPolicy::ElevationGated`] (full report only above a threshold elevation, plus a
//!   progress line on every tick).
//!
//! Pacing between ticks goes through a [`Pacer`] so that tests and benches can run a whole day
//! without sleeping.
//!
//! ## Per-tick pipeline
//!
//! ```text
//! instant ─► JD ─► tsince ─► propagate(regime) ─► look angles + sub-point
//!                                          └─► solar position ─► Sun look angles + shadow test
//!        ─► report policy ─► sink ─► pacer
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use rangerate::elements::source::{ElementSource, TleFileSource};
//! use rangerate::observers::ObserverLocation;
//! use rangerate::propagation::Sgp4Propagator;
//! use rangerate::report::TextSink;
//! use rangerate::tracker::{NoPacing, SimulatedDay, Tracker, TrackerConfig};
//!
//! let set = TleFileSource::new("tests/data/sample.tle").fetch(25445).unwrap();
//! let propagator = Sgp4Propagator::adopt(&set).unwrap();
//! let observer = ObserverLocation::from_degrees(53.7694, -113.4560, 701.0, None).unwrap();
//!
//! let mut tracker = Tracker::day_sweep(&propagator, &observer, TrackerConfig::default());
//! let mut clock = SimulatedDay::starting(2024, 10, 16).unwrap();
//! let mut sink = TextSink::new(std::io::stdout());
//! let summary = tracker.run(&mut clock, &mut NoPacing, &mut sink).unwrap();
//! println!("{} ticks, {} reports", summary.ticks, summary.reports);
//! ```

use std::time::Duration;

use hifitime::Epoch;

use crate::constants::{Degree, JD};
use crate::illumination::{eclipsed, solar_position, EclipseState};
use crate::observation::{look_angles, sub_point};
use crate::observers::ObserverLocation;
use crate::propagation::{propagate, Propagator, Regime, StateVector};
use crate::report::{Report, ReportSink};
use crate::time::{continuous_time, elapsed_minutes, CalendarTimestamp};
use crate::tracker_errors::TrackerError;

/// Tunable parameters of a [`Tracker`] run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Elevation a target must strictly exceed to be reported in a day sweep (degrees)
    pub min_elevation: Degree,
    /// Pause after every tick of a live run
    pub live_interval: Duration,
    /// Pause after every full report of a day sweep
    pub visible_pause: Duration,
    /// Emit the `current time HH:MM:SS` line on every day-sweep tick
    pub progress_lines: bool,
}

impl TrackerConfig {
    pub fn builder() -> TrackerConfigBuilder {
        TrackerConfigBuilder::new()
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            min_elevation: 1.0,
            live_interval: Duration::from_millis(1100),
            visible_pause: Duration::from_millis(100),
            progress_lines: true,
        }
    }
}

/// Builder for [`TrackerConfig`], with validation.
#[derive(Debug, Clone)]
pub struct TrackerConfigBuilder {
    params: TrackerConfig,
}

impl Default for TrackerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerConfigBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            params: TrackerConfig::default(),
        }
    }

    pub fn min_elevation(mut self, v: Degree) -> Self {
        self.params.min_elevation = v;
        self
    }
    pub fn live_interval(mut self, v: Duration) -> Self {
        self.params.live_interval = v;
        self
    }
    pub fn visible_pause(mut self, v: Duration) -> Self {
        self.params.visible_pause = v;
        self
    }
    pub fn progress_lines(mut self, v: bool) -> Self {
        self.params.progress_lines = v;
        self
    }

    /// Finalize the builder and produce a [`TrackerConfig`].
    ///
    /// Validation rules
    /// -----------------
    /// * `min_elevation` must be a finite angle within `[−90°, 90°]`.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(TrackerConfig)` if all values are valid.
    /// * `Err(TrackerError::InvalidConfig)` otherwise.
    pub fn build(self) -> Result<TrackerConfig, TrackerError> {
        let p = &self.params;
        if !(-90.0..=90.0).contains(&p.min_elevation) {
            return Err(TrackerError::InvalidConfig(format!(
                "min_elevation must lie in [-90, 90] degrees, got {}",
                p.min_elevation
            )));
        }
        Ok(self.params)
    }
}

/// Calendar clock of a simulated day, advanced one second per tick.
///
/// Only the time of day moves: the date fields are never incremented, and the clock is
/// complete once the hour reaches 24.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedClock {
    timestamp: CalendarTimestamp,
}

impl SimulatedClock {
    /// Clock set to midnight of the given date.
    pub fn new(year: i32, month: u8, day: u8) -> Self {
        SimulatedClock {
            timestamp: CalendarTimestamp::midnight_of(year, month, day),
        }
    }

    /// Clock set to an arbitrary time of day (sub-second part dropped).
    ///
    /// Errors
    /// ------
    /// * [`TrackerError::InvalidConfig`] if the time of day is out of range.
    pub fn from_timestamp(timestamp: CalendarTimestamp) -> Result<Self, TrackerError> {
        if timestamp.hour > 23 || timestamp.minute > 59 || timestamp.second > 59 {
            return Err(TrackerError::InvalidConfig(format!(
                "time of day {} out of range",
                timestamp.time_of_day()
            )));
        }
        Ok(SimulatedClock {
            timestamp: CalendarTimestamp {
                microsecond: 0,
                ..timestamp
            },
        })
    }

    pub fn timestamp(&self) -> CalendarTimestamp {
        self.timestamp
    }

    pub fn is_complete(&self) -> bool {
        self.timestamp.hour >= 24
    }

    /// Move forward by one second, carrying into minutes and hours.
    pub fn advance(&mut self) {
        if self.is_complete() {
            return;
        }

        let t = &mut self.timestamp;
        if t.second == 59 {
            t.second = 0;
            if t.minute == 59 {
                t.minute = 0;
                t.hour += 1;
            } else {
                t.minute += 1;
            }
        } else {
            t.second += 1;
        }
    }
}

/// Strategy producing the instants a [`Tracker`] evaluates.
pub trait ClockSource {
    /// Instant of the current tick, `None` once the run is over.
    fn current(&mut self) -> Result<Option<CalendarTimestamp>, TrackerError>;

    /// Move to the next tick.
    fn advance(&mut self);
}

/// Wall clock; every tick evaluates "now" and the run never ends on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveClock;

impl ClockSource for LiveClock {
    fn current(&mut self) -> Result<Option<CalendarTimestamp>, TrackerError> {
        CalendarTimestamp::now().map(Some)
    }

    fn advance(&mut self) {}
}

/// One calendar day swept from 00:00:00 to 23:59:59, 86 400 ticks.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedDay {
    clock: SimulatedClock,
}

impl SimulatedDay {
    /// Sweep the current UTC date.
    pub fn today() -> Result<Self, TrackerError> {
        let now = CalendarTimestamp::now()?;
        Ok(SimulatedDay {
            clock: SimulatedClock::new(now.year, now.month, now.day),
        })
    }

    /// Sweep the given date.
    ///
    /// Errors
    /// ------
    /// * [`TrackerError::InvalidConfig`] if the date does not exist.
    pub fn starting(year: i32, month: u8, day: u8) -> Result<Self, TrackerError> {
        Epoch::maybe_from_gregorian_utc(year, month, day, 0, 0, 0, 0).map_err(|e| {
            TrackerError::InvalidConfig(format!("invalid date {year:04}-{month:02}-{day:02}: {e}"))
        })?;
        Ok(SimulatedDay {
            clock: SimulatedClock::new(year, month, day),
        })
    }

    /// Resume a sweep from an already positioned clock.
    pub fn from_clock(clock: SimulatedClock) -> Self {
        SimulatedDay { clock }
    }

    pub fn clock(&self) -> &SimulatedClock {
        &self.clock
    }
}

impl ClockSource for SimulatedDay {
    fn current(&mut self) -> Result<Option<CalendarTimestamp>, TrackerError> {
        if self.clock.is_complete() {
            Ok(None)
        } else {
            Ok(Some(self.clock.timestamp()))
        }
    }

    fn advance(&mut self) {
        self.clock.advance();
    }
}

/// What gets written for each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportPolicy {
    /// Full report on every tick (live tracking)
    Unconditional,
    /// Full report only when the elevation strictly exceeds `threshold_deg`, progress line on
    /// every tick (day sweep)
    ElevationGated { threshold_deg: Degree },
}

impl ReportPolicy {
    pub fn should_report(&self, elevation_deg: Degree) -> bool {
        match self {
            ReportPolicy::Unconditional => true,
            ReportPolicy::ElevationGated { threshold_deg } => elevation_deg > *threshold_deg,
        }
    }
}

/// Suspension between ticks.
pub trait Pacer {
    fn pause(&mut self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Never sleeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn pause(&mut self, _duration: Duration) {}
}

/// Counters of a finished [`Tracker::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Instants evaluated
    pub ticks: u64,
    /// Full reports written
    pub reports: u64,
    /// Shadow entries and exits seen during the run
    pub eclipse_transitions: u64,
}

/// Per-run context of the observation pipeline.
///
/// The propagator and observer are borrowed for the whole run; the regime is read once from
/// the propagator and the eclipse state is carried from one tick to the next.
pub struct Tracker<'a, P: Propagator + ?Sized> {
    propagator: &'a P,
    observer: &'a ObserverLocation,
    regime: Regime,
    epoch_jd: JD,
    policy: ReportPolicy,
    config: TrackerConfig,
    eclipse: Option<EclipseState>,
    previous_eclipsed: Option<bool>,
    eclipse_transitions: u64,
}

impl<'a, P: Propagator + ?Sized> Tracker<'a, P> {
    pub fn new(
        propagator: &'a P,
        observer: &'a ObserverLocation,
        policy: ReportPolicy,
        config: TrackerConfig,
    ) -> Self {
        Tracker {
            propagator,
            observer,
            regime: propagator.regime(),
            epoch_jd: propagator.epoch_jd(),
            policy,
            config,
            eclipse: None,
            previous_eclipsed: None,
            eclipse_transitions: 0,
        }
    }

    /// Live tracking: every tick reported, paced by `live_interval`.
    pub fn continuous(
        propagator: &'a P,
        observer: &'a ObserverLocation,
        config: TrackerConfig,
    ) -> Self {
        Tracker::new(propagator, observer, ReportPolicy::Unconditional, config)
    }

    /// Day sweep: reports gated by `min_elevation`.
    pub fn day_sweep(
        propagator: &'a P,
        observer: &'a ObserverLocation,
        config: TrackerConfig,
    ) -> Self {
        let policy = ReportPolicy::ElevationGated {
            threshold_deg: config.min_elevation,
        };
        Tracker::new(propagator, observer, policy, config)
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    pub fn policy(&self) -> ReportPolicy {
        self.policy
    }

    /// Shadow state of the last evaluated tick, `None` before the first one.
    pub fn eclipse(&self) -> Option<EclipseState> {
        self.eclipse
    }

    /// Shadow flag of the tick before the last one.
    pub fn previous_eclipsed(&self) -> Option<bool> {
        self.previous_eclipsed
    }

    /// Run the pipeline once for `instant`.
    ///
    /// Arguments
    /// -----------------
    /// * `instant`: UTC calendar timestamp to evaluate
    ///
    /// Return
    /// ----------
    /// * The [`Report`] of the tick, or the [`TrackerError::PropagationError`] raised by the
    ///   propagator.
    pub fn observe(&mut self, instant: &CalendarTimestamp) -> Result<Report, TrackerError> {
        let jd = continuous_time(instant);
        let tsince = elapsed_minutes(jd, self.epoch_jd);

        let state = propagate(self.propagator, tsince, self.regime)?;
        let target = look_angles(&state, self.observer, jd);
        let below = sub_point(&state, jd);

        let sun_position = solar_position(jd);
        let sun = look_angles(&StateVector::at_rest(sun_position), self.observer, jd);
        let eclipse = eclipsed(&state.position, &sun_position);

        self.previous_eclipsed = self.eclipse.map(|e| e.eclipsed);
        self.eclipse = Some(eclipse);
        if self.previous_eclipsed.is_some_and(|was| was != eclipse.eclipsed) {
            self.eclipse_transitions += 1;
            let change = if eclipse.eclipsed { "entered" } else { "left" };
            log::debug!("{change} Earth shadow at {instant}, depth {:.4} rad", eclipse.depth);
        }

        Ok(Report {
            timestamp: *instant,
            regime: self.regime,
            target,
            sub_point: below,
            speed: state.speed,
            eclipse,
            sun,
        })
    }

    /// Evaluate ticks until the clock runs out.
    ///
    /// Arguments
    /// -----------------
    /// * `clock`: source of the instants; a [`LiveClock`] never runs out
    /// * `pacer`: suspension after a tick (live) or after a full report (day sweep)
    /// * `sink`: destination of reports and progress lines
    ///
    /// Return
    /// ----------
    /// * The [`RunSummary`] once the clock is exhausted and the sink is flushed, or the first
    ///   error met. All errors are terminal.
    pub fn run<C, Z, S>(
        &mut self,
        clock: &mut C,
        pacer: &mut Z,
        sink: &mut S,
    ) -> Result<RunSummary, TrackerError>
    where
        C: ClockSource + ?Sized,
        Z: Pacer + ?Sized,
        S: ReportSink + ?Sized,
    {
        let mut summary = RunSummary::default();
        let transitions_before = self.eclipse_transitions;

        while let Some(instant) = clock.current()? {
            let report = self.observe(&instant)?;
            summary.ticks += 1;

            match self.policy {
                ReportPolicy::Unconditional => {
                    sink.report(&report)?;
                    summary.reports += 1;
                    pacer.pause(self.config.live_interval);
                }
                ReportPolicy::ElevationGated { .. } => {
                    if self.policy.should_report(report.target.elevation_deg()) {
                        sink.report(&report)?;
                        summary.reports += 1;
                        pacer.pause(self.config.visible_pause);
                    }
                    if self.config.progress_lines {
                        sink.progress(&instant)?;
                    }
                }
            }

            clock.advance();
        }
        sink.finish()?;

        summary.eclipse_transitions = self.eclipse_transitions - transitions_before;
        log::info!(
            "run complete: {} ticks, {} reports, {} shadow transitions",
            summary.ticks,
            summary.reports,
            summary.eclipse_transitions
        );
        Ok(summary)
    }
}
