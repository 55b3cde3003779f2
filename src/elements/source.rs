//! Element-set sources: the Celestrak GP service and local TLE files.
//!
//! Both sources answer the same question, "the current element set for this catalog number",
//! and report the two failure kinds the tracker distinguishes:
//!
//! * [`TrackerError::SourceUnavailable`] – the source could not be reached or read, or it does
//!   not know the catalog number.
//! * [`TrackerError::InvalidElementSet`] – the source answered, but the requested set is
//!   malformed or inconsistent. Malformed records of other catalog numbers are ignored.

use camino::Utf8PathBuf;

use super::OrbitalElementSet;
use crate::constants::CatalogNumber;
use crate::env_state::TrackerEnv;
use crate::tracker_errors::TrackerError;

/// Supplier of orbital element sets.
pub trait ElementSource {
    /// Fetch the element set of one catalog number.
    fn fetch(&self, catalog: CatalogNumber) -> Result<OrbitalElementSet, TrackerError>;
}

/// Look `catalog` up in a fetched text.
fn select_catalog(
    text: &str,
    catalog: CatalogNumber,
    origin: &str,
) -> Result<OrbitalElementSet, TrackerError> {
    OrbitalElementSet::find_in_text(text, catalog)?.ok_or_else(|| {
        TrackerError::SourceUnavailable(format!(
            "no element set for catalog number {catalog} in {origin}"
        ))
    })
}

/// Current element sets from the GP query service.
#[derive(Debug, Clone)]
pub struct CelestrakSource {
    env: TrackerEnv,
}

impl CelestrakSource {
    pub fn new(env: TrackerEnv) -> Self {
        CelestrakSource { env }
    }
}

impl ElementSource for CelestrakSource {
    fn fetch(&self, catalog: CatalogNumber) -> Result<OrbitalElementSet, TrackerError> {
        let url = self.env.gp_url(catalog);
        let body = self
            .env
            .get_from_url(&url)
            .map_err(|e| TrackerError::SourceUnavailable(e.to_string()))?;

        // the service answers 200 with a plain message for unknown objects
        if body.trim().is_empty() || body.contains("No GP data found") {
            return Err(TrackerError::SourceUnavailable(format!(
                "{url} returned no element set"
            )));
        }

        select_catalog(&body, catalog, &url)
    }
}

/// Element sets read from a local 2LE/3LE file.
#[derive(Debug, Clone)]
pub struct TleFileSource {
    path: Utf8PathBuf,
}

impl TleFileSource {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        TleFileSource { path: path.into() }
    }
}

impl ElementSource for TleFileSource {
    fn fetch(&self, catalog: CatalogNumber) -> Result<OrbitalElementSet, TrackerError> {
        log::debug!("reading element sets from {}", self.path);
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            TrackerError::SourceUnavailable(format!("cannot read {}: {e}", self.path))
        })?;

        select_catalog(&text, catalog, self.path.as_str())
    }
}
