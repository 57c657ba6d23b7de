use crate::models::{History, Summary};

/// Percent change from `previous` to `current`.
///
/// `None` when there is no previous value or it is exactly zero.
pub fn percent_change(current: f64, previous: Option<f64>) -> Option<f64> {
    match previous {
        None => None,
        Some(p) if p == 0.0 => None,
        Some(p) => Some((current - p) / p * 100.0),
    }
}

/// Summarize the last two observations; `None` for an empty history
pub fn summarize(history: &History) -> Option<Summary> {
    let last = history.last()?.clone();
    let previous = history.previous().cloned();
    let change = percent_change(last.bid, previous.as_ref().map(|p| p.bid));

    Some(Summary {
        last,
        previous,
        change,
    })
}

/// Default notification rule: every run notifies
pub fn should_notify_always() -> bool {
    true
}

/// True when `current` is under `below` or over `above`
pub fn should_notify_threshold(current: f64, below: Option<f64>, above: Option<f64>) -> bool {
    if let Some(below) = below {
        if current < below {
            return true;
        }
    }
    if let Some(above) = above {
        if current > above {
            return true;
        }
    }
    false
}

/// Optional alert bounds for notifications
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Thresholds {
    pub below: Option<f64>,
    pub above: Option<f64>,
}

impl Thresholds {
    pub fn is_configured(&self) -> bool {
        self.below.is_some() || self.above.is_some()
    }

    /// Threshold rule when bounds are set, otherwise always notify
    pub fn should_notify(&self, current: f64) -> bool {
        if self.is_configured() {
            should_notify_threshold(current, self.below, self.above)
        } else {
            should_notify_always()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Observation;
    use approx::assert_relative_eq;

    fn obs(bid: f64) -> Observation {
        Observation {
            bid,
            timestamp_iso: "2024-01-01T12:00:00Z".to_string(),
            source: None,
        }
    }

    #[test]
    fn test_percent_change_without_previous() {
        for x in [0.0, 1.0, -2.5, 5.2, 1e9] {
            assert_eq!(percent_change(x, None), None);
            assert_eq!(percent_change(x, Some(0.0)), None);
        }
    }

    #[test]
    fn test_percent_change_values() {
        assert_relative_eq!(percent_change(110.0, Some(100.0)).unwrap(), 10.0);
        assert_relative_eq!(percent_change(90.0, Some(100.0)).unwrap(), -10.0);
        assert_relative_eq!(
            percent_change(5.00, Some(5.20)).unwrap(),
            -3.846153846153846,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_summarize_picks_last_two() {
        let history = History::new(vec![obs(5.10), obs(5.20), obs(5.00)]);
        let summary = summarize(&history).unwrap();

        assert_eq!(summary.last.bid, 5.00);
        assert_eq!(summary.previous.map(|p| p.bid), Some(5.20));
        assert_relative_eq!(summary.change.unwrap(), -3.846153846153846, epsilon = 1e-12);
    }

    #[test]
    fn test_summarize_edges() {
        assert!(summarize(&History::default()).is_none());

        let single = summarize(&History::new(vec![obs(5.10)])).unwrap();
        assert!(single.previous.is_none());
        assert_eq!(single.change, None);
    }

    #[test]
    fn test_threshold_rule() {
        assert!(should_notify_threshold(4.9, Some(5.0), None));
        assert!(should_notify_threshold(5.6, None, Some(5.5)));
        assert!(!should_notify_threshold(5.2, Some(5.0), Some(5.5)));
        assert!(!should_notify_threshold(5.2, None, None));
    }

    #[test]
    fn test_thresholds_fall_back_to_always() {
        assert!(Thresholds::default().should_notify(5.2));

        let bounded = Thresholds { below: Some(5.0), above: Some(5.5) };
        assert!(!bounded.should_notify(5.2));
        assert!(bounded.should_notify(4.8));
    }
}
