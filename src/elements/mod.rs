//! # Orbital element sets
//!
//! Parsing and validation of two-line element sets (TLE), with or without a leading name line,
//! into [`OrbitalElementSet`] values, and the [`source`] collaborators that supply them.
//!
//! ## Accepted text layouts
//!
//! ```text
//! ISS (ZARYA)                                       <- optional name line ("0 " prefix allowed)
//! 1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
//! 2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008
//! ```
//!
//! Several sets may follow each other in one text; blank lines are ignored. A set is looked up
//! by catalog number and only that set is parsed, see [`OrbitalElementSet::find_in_text`].
//!
//! ## Validation
//!
//! Line format and checksums are checked by the [`sgp4`] parser. On top of that an element set
//! is rejected when its eccentricity lies outside `[0, 1)`, its mean motion is not strictly
//! positive, or its inclination lies outside `[0°, 180°]`. All rejections are reported as
//! [`TrackerError::InvalidElementSet`].

pub mod source;

use chrono::{Datelike, Timelike};

use crate::constants::{CatalogNumber, Degree, JD, SECONDS_PER_DAY};
use crate::time::julian_date_of_epoch;
use crate::tracker_errors::TrackerError;

/// One orbital element set, immutable once loaded.
#[derive(Debug, Clone)]
pub struct OrbitalElementSet {
    /// NORAD catalog number
    pub catalog_number: CatalogNumber,
    /// Object name, from the name line or the catalog number when absent
    pub name: String,
    /// Four-digit year of the epoch
    pub epoch_year: i32,
    /// Fractional day-of-year of the epoch (1.0 = January 1st, 0h UTC)
    pub epoch_day: f64,
    elements: sgp4::Elements,
}

impl OrbitalElementSet {
    /// Parse one element set from its two data lines.
    ///
    /// Arguments
    /// -----------------
    /// * `name`: optional object name (a leading `"0 "` is stripped)
    /// * `line1`, `line2`: the two TLE data lines
    ///
    /// Return
    /// ----------
    /// * The validated element set, or [`TrackerError::InvalidElementSet`].
    pub fn from_lines(
        name: Option<&str>,
        line1: &str,
        line2: &str,
    ) -> Result<Self, TrackerError> {
        let name = name
            .map(clean_name_line)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        let elements =
            sgp4::Elements::from_tle(name, line1.trim_end().as_bytes(), line2.trim_end().as_bytes())
                .map_err(|e| TrackerError::InvalidElementSet(format!("{e:?}")))?;

        OrbitalElementSet::from_elements(elements)
    }

    /// Wrap already-parsed [`sgp4::Elements`], validating their consistency.
    pub fn from_elements(elements: sgp4::Elements) -> Result<Self, TrackerError> {
        let catalog_number = CatalogNumber::try_from(elements.norad_id).map_err(|_| {
            TrackerError::InvalidElementSet(format!(
                "catalog number {} out of range",
                elements.norad_id
            ))
        })?;

        if !(0.0..1.0).contains(&elements.eccentricity) {
            return Err(TrackerError::InvalidElementSet(format!(
                "eccentricity {} outside [0, 1)",
                elements.eccentricity
            )));
        }
        if !(elements.mean_motion > 0.0) {
            return Err(TrackerError::InvalidElementSet(format!(
                "mean motion {} rev/day is not positive",
                elements.mean_motion
            )));
        }
        if !(0.0..=180.0).contains(&elements.inclination) {
            return Err(TrackerError::InvalidElementSet(format!(
                "inclination {}° outside [0°, 180°]",
                elements.inclination
            )));
        }

        let datetime = elements.datetime;
        let epoch_day = datetime.ordinal() as f64
            + (datetime.num_seconds_from_midnight() as f64
                + datetime.nanosecond() as f64 * 1e-9)
                / SECONDS_PER_DAY;

        let name = elements
            .object_name
            .clone()
            .unwrap_or_else(|| catalog_number.to_string());

        Ok(OrbitalElementSet {
            catalog_number,
            name,
            epoch_year: datetime.year(),
            epoch_day,
            elements,
        })
    }

    /// Find and parse the element set of one catalog number in a 2LE/3LE text.
    ///
    /// Records are matched on the catalog number of line 1 (columns 3-7) before any parsing, so
    /// only the requested set is validated. Other records, malformed or not, are skipped.
    ///
    /// Arguments
    /// -----------------
    /// * `text`: the 2LE/3LE text
    /// * `catalog`: NORAD catalog number to look for
    ///
    /// Return
    /// ----------
    /// * The first element set of `catalog`, `None` if the text has no record for it, or
    ///   [`TrackerError::InvalidElementSet`] if that record is malformed.
    pub fn find_in_text(text: &str, catalog: CatalogNumber) -> Result<Option<Self>, TrackerError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty())
            .collect();

        let mut name: Option<&str> = None;
        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];
            if line.starts_with("1 ") {
                let line2 = lines.get(i + 1).copied().filter(|l| l.starts_with("2 "));
                let requested = line1_catalog(line) == Some(catalog);

                match (requested, line2) {
                    (true, Some(line2)) => {
                        return OrbitalElementSet::from_lines(name, line, line2).map(Some)
                    }
                    (true, None) => {
                        return Err(TrackerError::InvalidElementSet(format!(
                            "line 1 without matching line 2: {line}"
                        )))
                    }
                    (false, Some(_)) => i += 2,
                    (false, None) => {
                        log::debug!("skipping line 1 without matching line 2: {line}");
                        i += 1;
                    }
                }
                name = None;
            } else if line.starts_with("2 ") {
                log::debug!("skipping line 2 without preceding line 1: {line}");
                name = None;
                i += 1;
            } else {
                name = Some(line);
                i += 1;
            }
        }
        Ok(None)
    }

    /// Julian date of the element-set epoch.
    pub fn epoch_jd(&self) -> JD {
        julian_date_of_epoch(self.epoch_year, self.epoch_day)
    }

    /// Parsed elements, as handed to the propagator.
    pub fn elements(&self) -> &sgp4::Elements {
        &self.elements
    }

    /// Kozai mean motion, in revolutions per day.
    pub fn mean_motion(&self) -> f64 {
        self.elements.mean_motion
    }

    pub fn eccentricity(&self) -> f64 {
        self.elements.eccentricity
    }

    pub fn inclination(&self) -> Degree {
        self.elements.inclination
    }
}

/// Catalog number of a TLE line 1, `None` when columns 3-7 are not a plain number.
fn line1_catalog(line: &str) -> Option<CatalogNumber> {
    line.get(2..7)?.trim().parse().ok()
}

fn clean_name_line(line: &str) -> &str {
    let line = line.trim();
    line.strip_prefix("0 ").unwrap_or(line).trim()
}

#[cfg(test)]
mod elements_test {
    use super::*;
    use approx::assert_relative_eq;

    const ISS_LINE1: &str = "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
    const ISS_LINE2: &str = "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

    #[test]
    fn test_from_lines() {
        let set = OrbitalElementSet::from_lines(Some("ISS (ZARYA)"), ISS_LINE1, ISS_LINE2).unwrap();
        assert_eq!(set.catalog_number, 25544);
        assert_eq!(set.name, "ISS (ZARYA)");
        assert_eq!(set.epoch_year, 2020);
        assert_relative_eq!(set.epoch_day, 194.88612269, epsilon = 1e-8);
        assert_relative_eq!(set.mean_motion(), 15.49507896, epsilon = 1e-8);
        assert_relative_eq!(set.inclination(), 51.6461, epsilon = 1e-10);
    }

    #[test]
    fn test_name_defaults_to_catalog_number() {
        let set = OrbitalElementSet::from_lines(None, ISS_LINE1, ISS_LINE2).unwrap();
        assert_eq!(set.name, "25544");

        let set = OrbitalElementSet::from_lines(Some("0 ISS"), ISS_LINE1, ISS_LINE2).unwrap();
        assert_eq!(set.name, "ISS");
    }

    #[test]
    fn test_epoch_jd() {
        let set = OrbitalElementSet::from_lines(None, ISS_LINE1, ISS_LINE2).unwrap();
        // 2020-01-01T00:00 is JD 2458849.5, day 194.886... is 193.886 days later
        assert_relative_eq!(set.epoch_jd(), 2458849.5 + 193.88612269, epsilon = 1e-7);
    }

    #[test]
    fn test_bad_checksum_is_invalid() {
        let corrupted = ISS_LINE2.replace("15.49507896236008", "15.49507896236009");
        let err = OrbitalElementSet::from_lines(None, ISS_LINE1, &corrupted).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidElementSet(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_find_in_text_mixed_layouts() {
        let text = format!("{ISS_LINE1}\n{ISS_LINE2}\n\nISS (ZARYA)\n{ISS_LINE1}\n{ISS_LINE2}\n");
        let set = OrbitalElementSet::find_in_text(&text, 25544).unwrap().unwrap();
        assert_eq!(set.name, "25544");

        let text = format!("0 ISS (ZARYA)\n{ISS_LINE1}\n{ISS_LINE2}\n");
        let set = OrbitalElementSet::find_in_text(&text, 25544).unwrap().unwrap();
        assert_eq!(set.name, "ISS (ZARYA)");
    }

    #[test]
    fn test_find_in_text_skips_other_records() {
        let text = format!(
            "GARBAGE\n1 99999U garbage\n2 99999 garbage\n2 12345 orphan\n1 11111U orphan\n\
             ISS (ZARYA)\n{ISS_LINE1}\n{ISS_LINE2}\n"
        );
        let set = OrbitalElementSet::find_in_text(&text, 25544).unwrap().unwrap();
        assert_eq!(set.name, "ISS (ZARYA)");
        assert_eq!(set.catalog_number, 25544);
    }

    #[test]
    fn test_find_in_text_requested_record_malformed() {
        let text = format!("{ISS_LINE1}\n");
        let err = OrbitalElementSet::find_in_text(&text, 25544).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidElementSet(_)));

        let corrupted = ISS_LINE2.replace("15.49507896236008", "15.49507896236009");
        let text = format!("{ISS_LINE1}\n{corrupted}\n");
        let err = OrbitalElementSet::find_in_text(&text, 25544).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_find_in_text_absent() {
        assert!(OrbitalElementSet::find_in_text("\n\n", 25544).unwrap().is_none());

        let text = format!("{ISS_LINE1}\n{ISS_LINE2}\n");
        assert!(OrbitalElementSet::find_in_text(&text, 25545).unwrap().is_none());
    }

    #[test]
    fn test_line1_catalog() {
        assert_eq!(line1_catalog(ISS_LINE1), Some(25544));
        assert_eq!(line1_catalog("1 A0001U 98067A"), None);
        assert_eq!(line1_catalog("1 25"), None);
    }
}
