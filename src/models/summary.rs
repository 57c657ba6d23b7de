//! Latest-quote summary models

use super::observation::Observation;

/// Latest quote, the one before it and the percent change between them
#[derive(Debug, Clone)]
pub struct Summary {
    pub last: Observation,
    pub previous: Option<Observation>,
    pub change: Option<f64>,
}
