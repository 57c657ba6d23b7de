//! Exchange-rate history models

use chrono::{DateTime, Utc};

/// One historical quote as published in the history document
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub bid: f64,
    pub timestamp_iso: String,
    pub source: Option<String>,
}

impl Observation {
    /// Parsed `timestamp_iso`, if it is valid RFC 3339
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp_iso)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Project the observation onto what the chart needs
    pub fn to_chart_point(&self) -> ChartPoint {
        ChartPoint {
            bid: self.bid,
            timestamp_iso: self.timestamp_iso.clone(),
        }
    }
}

/// A single data point on the dashboard chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub bid: f64,
    pub timestamp_iso: String,
}

/// Observations ordered oldest first; the last entry is the most recent quote
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    observations: Vec<Observation>,
}

impl History {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Most recent observation
    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Observation right before the most recent one
    pub fn previous(&self) -> Option<&Observation> {
        let len = self.observations.len();
        if len >= 2 {
            self.observations.get(len - 2)
        } else {
            None
        }
    }

    /// Chart points for the trailing `window` observations, oldest first
    pub fn tail_points(&self, window: usize) -> Vec<ChartPoint> {
        let start = self.observations.len().saturating_sub(window);
        self.observations[start..]
            .iter()
            .map(Observation::to_chart_point)
            .collect()
    }
}
