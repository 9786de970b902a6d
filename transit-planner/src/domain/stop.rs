//! Transit stops: rail stations, surface stops and walking waypoints.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// How a stop is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    /// A waypoint reached on foot (journey origin or destination)
    Walk,
    /// A station on the rail network
    Rail,
    /// A bus, minibus or ferry stop
    Surface,
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TravelMode::Walk => "WALK",
            TravelMode::Rail => "RAIL",
            TravelMode::Surface => "SURFACE",
        })
    }
}

/// A place a journey can start, end, board or alight.
///
/// Rail stations carry the codes of the lines that serve them; surface stops
/// and waypoints have no lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitStop {
    /// Identifier, unique within its network
    pub id: String,
    /// Display names keyed by locale (e.g. "en", "zh-Hant")
    pub names: BTreeMap<String, String>,
    pub coordinate: Coordinate,
    pub mode: TravelMode,
    /// Operating company, empty for waypoints
    pub company: String,
    /// Line codes serving this stop, in source order without duplicates
    pub lines: Vec<String>,
}

impl TransitStop {
    /// Create a rail station served by the given lines.
    pub fn rail(
        id: impl Into<String>,
        name: impl Into<String>,
        coordinate: Coordinate,
        company: impl Into<String>,
        lines: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut stop = Self::with_mode(id, name, coordinate, TravelMode::Rail, company);
        for line in lines {
            stop.add_line(line);
        }
        stop
    }

    /// Create a surface-transit stop.
    pub fn surface(
        id: impl Into<String>,
        name: impl Into<String>,
        coordinate: Coordinate,
        company: impl Into<String>,
    ) -> Self {
        Self::with_mode(id, name, coordinate, TravelMode::Surface, company)
    }

    /// Create a walking waypoint, used for journey origins and destinations.
    pub fn waypoint(id: impl Into<String>, coordinate: Coordinate) -> Self {
        let id = id.into();
        let name = id.clone();
        Self::with_mode(id, name, coordinate, TravelMode::Walk, String::new())
    }

    fn with_mode(
        id: impl Into<String>,
        name: impl Into<String>,
        coordinate: Coordinate,
        mode: TravelMode,
        company: impl Into<String>,
    ) -> Self {
        let mut names = BTreeMap::new();
        names.insert("en".to_string(), name.into());
        Self {
            id: id.into(),
            names,
            coordinate,
            mode,
            company: company.into(),
            lines: Vec::new(),
        }
    }

    /// Add a display name for a locale.
    pub fn with_name(mut self, locale: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(locale.into(), name.into());
        self
    }

    /// Record that a line serves this stop. Duplicates are ignored.
    pub fn add_line(&mut self, line: impl Into<String>) {
        let line = line.into();
        if !self.lines.contains(&line) {
            self.lines.push(line);
        }
    }

    /// Display name for a locale, falling back to English and then the id.
    pub fn display_name(&self, locale: &str) -> &str {
        self.names
            .get(locale)
            .or_else(|| self.names.get("en"))
            .map(String::as_str)
            .unwrap_or(self.id.as_str())
    }

    /// True if at least two lines serve this stop.
    pub fn is_interchange(&self) -> bool {
        self.lines.len() >= 2
    }

    /// First line code (in this stop's order) that also serves `other`.
    pub fn shared_line(&self, other: &TransitStop) -> Option<&str> {
        self.lines
            .iter()
            .find(|line| other.lines.contains(*line))
            .map(String::as_str)
    }

    /// True if `other` is the same stop: same id and same coordinate.
    pub fn same_place(&self, other: &TransitStop) -> bool {
        self.id == other.id && self.coordinate == other.coordinate
    }
}
