//! Scroll proximity detection for "load more".

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Distance from the bottom (in container units) at which the next page is
/// requested.
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 100.0;

/// Geometry of the scrollable result container at one scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ScrollMetrics {
    pub scroll_height: f64,
    pub client_height: f64,
    pub scroll_top: f64,
}

impl ScrollMetrics {
    #[must_use]
    pub const fn new(scroll_height: f64, client_height: f64, scroll_top: f64) -> Self {
        Self {
            scroll_height,
            client_height,
            scroll_top,
        }
    }

    #[must_use]
    pub fn distance_to_bottom(&self) -> f64 {
        self.scroll_height - self.client_height - self.scroll_top
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScrollTrigger {
    threshold: f64,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_THRESHOLD)
    }
}

impl ScrollTrigger {
    /// Negative or non-finite thresholds fall back to the default.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_finite() && threshold >= 0.0 {
            threshold
        } else {
            DEFAULT_SCROLL_THRESHOLD
        };
        Self { threshold }
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Geometry check only; loading/has-next gating happens in the
    /// pagination controller.
    #[must_use]
    pub fn is_near_bottom(&self, metrics: &ScrollMetrics) -> bool {
        let distance = metrics.distance_to_bottom();
        distance.is_finite() && distance <= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(310.0, true)]
    #[case(290.0, false)]
    #[case(300.0, true)]
    #[case(400.0, true)]
    fn test_threshold(#[case] scroll_top: f64, #[case] fires: bool) {
        let trigger = ScrollTrigger::default();
        let metrics = ScrollMetrics::new(1000.0, 600.0, scroll_top);
        assert_eq!(trigger.is_near_bottom(&metrics), fires);
    }

    #[test]
    fn test_distance() {
        let metrics = ScrollMetrics::new(1000.0, 600.0, 310.0);
        assert!((metrics.distance_to_bottom() - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_threshold_falls_back() {
        assert!((ScrollTrigger::new(f64::NAN).threshold() - DEFAULT_SCROLL_THRESHOLD).abs() < f64::EPSILON);
        assert!((ScrollTrigger::new(-1.0).threshold() - DEFAULT_SCROLL_THRESHOLD).abs() < f64::EPSILON);
    }
}
