//! Ordered threshold tables and band selection.
//!
//! A value is assigned to the band whose threshold is nearest to it. When two
//! thresholds are equally near, the earlier (lower) band wins.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Band<B> {
    pub kind: B,
    pub threshold: f64,
    /// Only meaningful for height bands
    #[serde(default)]
    pub passable: bool,
}

impl<B> Band<B> {
    pub fn new(kind: B, threshold: f64, passable: bool) -> Self {
        Self {
            kind,
            threshold,
            passable,
        }
    }
}

/// Pick the nearest band. `None` only for an empty table.
pub fn classify<B>(table: &[Band<B>], value: f64) -> Option<&Band<B>> {
    let mut best: Option<(&Band<B>, f64)> = None;
    for band in table {
        let distance = (band.threshold - value).abs();
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((band, distance)),
        }
    }
    best.map(|(band, _)| band)
}

/// A usable table is non-empty with strictly ascending finite thresholds.
pub fn is_ascending<B>(table: &[Band<B>]) -> bool {
    !table.is_empty()
        && table.iter().all(|b| b.threshold.is_finite())
        && table.windows(2).all(|w| w[0].threshold < w[1].threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<Band<&'static str>> {
        vec![
            Band::new("low", 0.25, false),
            Band::new("high", 0.75, true),
            Band::new("peak", 1.0, true),
        ]
    }

    #[test]
    fn test_nearest_threshold_wins() {
        let t = table();
        assert_eq!(classify(&t, 0.0).unwrap().kind, "low");
        assert_eq!(classify(&t, 0.6).unwrap().kind, "high");
        assert_eq!(classify(&t, 0.9).unwrap().kind, "peak");
        assert_eq!(classify(&t, 1.5).unwrap().kind, "peak");
    }

    #[test]
    fn test_exact_tie_goes_to_lower_band() {
        let t = table();
        // 0.5 is exactly 0.25 from both 0.25 and 0.75
        assert_eq!(classify(&t, 0.5).unwrap().kind, "low");
        // 0.875 is exactly 0.125 from both 0.75 and 1.0
        assert_eq!(classify(&t, 0.875).unwrap().kind, "high");
    }

    #[test]
    fn test_threshold_value_maps_to_itself() {
        let t = table();
        for band in &t {
            assert_eq!(classify(&t, band.threshold).unwrap().kind, band.kind);
        }
    }

    #[test]
    fn test_empty_table() {
        let t: Vec<Band<u8>> = Vec::new();
        assert!(classify(&t, 0.5).is_none());
        assert!(!is_ascending(&t));
    }

    #[test]
    fn test_ascending_check() {
        assert!(is_ascending(&table()));
        let mut t = table();
        t.swap(0, 1);
        assert!(!is_ascending(&t));
    }
}
