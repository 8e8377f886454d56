//! Arrival curve generation
//!
//! Converts a flight's expected passenger count into an exact per-minute
//! arrival count array covering `[departure − span, departure − close)`.
//! Two interchangeable strategies exist:
//!
//! - [`LegacyGaussianCurve`]: symmetric normal density over the full window
//!   (mean = window/2, σ = window/6).
//! - [`EditedSplitGaussianCurve`]: asymmetric density with independent
//!   left/right sigmas around a configurable peak, optionally zeroed outside
//!   `[late clamp, window start]`.
//!
//! Both integerize the continuous density with the same largest-remainder
//! rule, so the array always sums to the passenger count exactly — no
//! floating-point drift ever loses or duplicates a passenger.

mod edited;
mod legacy;

pub use edited::EditedSplitGaussianCurve;
pub use legacy::LegacyGaussianCurve;

use serde::{Deserialize, Serialize};

/// Default earliest minute-before-departure at which arrivals may occur.
pub const DEFAULT_WINDOW_START: i64 = 120;

/// Fixed boarding-close offset: no passenger is admitted into ticketing or
/// checkpoint processing within 20 minutes of departure.
pub const DEFAULT_BOARDING_CLOSE: i64 = 20;

/// Upper bound for the editable arrival window.
pub const MAX_WINDOW_START: i64 = 240;

/// Arrival curve configuration.
///
/// All offsets are minutes before departure. Out-of-range values are clamped
/// into the nearest valid bound by [`validate_and_clamp`], never rejected.
///
/// [`validate_and_clamp`]: ArrivalCurveConfig::validate_and_clamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrivalCurveConfig {
    /// True = legacy symmetric curve; false = edited split Gaussian.
    pub legacy_mode: bool,

    /// Peak of the edited curve.
    pub peak_minutes_before_departure: i64,

    /// Spread on the early side of the peak (≥ 1 minute).
    pub left_sigma_minutes: i64,

    /// Spread on the late side of the peak (≥ 1 minute).
    pub right_sigma_minutes: i64,

    /// When enabled, no arrivals occur later than the late clamp.
    pub late_clamp_enabled: bool,
    pub late_clamp_minutes_before_departure: i64,

    /// Earliest minute-before-departure at which arrivals may occur.
    pub window_start_minutes_before_departure: i64,

    /// Boarding-close offset. The engine forces this back to
    /// [`DEFAULT_BOARDING_CLOSE`] whenever a config is applied.
    pub boarding_close_minutes_before_departure: i64,
}

impl Default for ArrivalCurveConfig {
    fn default() -> Self {
        Self::legacy_default()
    }
}

impl ArrivalCurveConfig {
    /// The configuration the engine starts with: legacy curve, standard
    /// 120-minute window, boarding close at 20, editor-friendly peak/sigma
    /// defaults.
    pub fn legacy_default() -> Self {
        let mut cfg = Self {
            legacy_mode: true,
            peak_minutes_before_departure: 70,
            left_sigma_minutes: 18,
            right_sigma_minutes: 14,
            late_clamp_enabled: false,
            late_clamp_minutes_before_departure: 30,
            window_start_minutes_before_departure: DEFAULT_WINDOW_START,
            boarding_close_minutes_before_departure: DEFAULT_BOARDING_CLOSE,
        };
        cfg.validate_and_clamp();
        cfg
    }

    /// Switch the config to the edited split-Gaussian curve.
    pub fn mark_edited(&mut self) {
        self.legacy_mode = false;
    }

    /// Clamp every field into its valid range instead of rejecting.
    ///
    /// Guarantees `close ≤ peak ≤ windowStart`, both sigmas ≥ 1, the window
    /// start within `[120, 240]` and, when enabled, the late clamp within
    /// `[close, windowStart]`.
    pub fn validate_and_clamp(&mut self) {
        if self.boarding_close_minutes_before_departure <= 0 {
            self.boarding_close_minutes_before_departure = DEFAULT_BOARDING_CLOSE;
        }
        self.boarding_close_minutes_before_departure = self
            .boarding_close_minutes_before_departure
            .clamp(0, MAX_WINDOW_START);

        if self.window_start_minutes_before_departure <= 0 {
            self.window_start_minutes_before_departure = DEFAULT_WINDOW_START;
        }
        self.window_start_minutes_before_departure = self
            .window_start_minutes_before_departure
            .clamp(DEFAULT_WINDOW_START, MAX_WINDOW_START);

        if self.peak_minutes_before_departure <= 0 {
            self.peak_minutes_before_departure = 70;
        }
        self.peak_minutes_before_departure = self.peak_minutes_before_departure.clamp(
            self.boarding_close_minutes_before_departure,
            self.window_start_minutes_before_departure,
        );

        if self.left_sigma_minutes <= 0 {
            self.left_sigma_minutes = 18;
        }
        if self.right_sigma_minutes <= 0 {
            self.right_sigma_minutes = 14;
        }
        self.left_sigma_minutes = self.left_sigma_minutes.max(1);
        self.right_sigma_minutes = self.right_sigma_minutes.max(1);

        if self.late_clamp_minutes_before_departure <= 0 {
            self.late_clamp_minutes_before_departure = 30;
        }
        self.late_clamp_minutes_before_departure =
            self.late_clamp_minutes_before_departure.clamp(
                self.boarding_close_minutes_before_departure,
                self.window_start_minutes_before_departure,
            );
    }
}

/// An arrival-curve strategy.
///
/// Implementations must return an array of length `span − close` (empty when
/// that is ≤ 0) summing exactly to `total_passengers`.
pub trait ArrivalCurveGenerator {
    fn per_minute_arrivals(
        &self,
        total_passengers: u32,
        cfg: &ArrivalCurveConfig,
        arrival_span_minutes: i64,
    ) -> Vec<u32>;
}

/// Largest-remainder integerization: scale `weights` to sum to `total`,
/// floor each bucket, then hand the remainder out one unit at a time to the
/// buckets with the largest fractional remainder (stable tie-break: original
/// minute order).
///
/// Callers must ensure the weight sum is positive.
pub(crate) fn integerize(weights: &[f64], total: u32) -> Vec<u32> {
    let n = weights.len();
    let sum: f64 = weights.iter().sum();
    debug_assert!(sum > 0.0, "integerize requires positive total weight");

    let mut out = vec![0u32; n];
    let mut frac = vec![0.0f64; n];
    let mut floor_sum: u32 = 0;
    for (i, w) in weights.iter().enumerate() {
        let raw = w / sum * total as f64;
        let floored = raw.floor() as u32;
        out[i] = floored;
        frac[i] = raw - floored as f64;
        floor_sum += floored;
    }

    let remainder = (total - floor_sum) as usize;
    let mut order: Vec<usize> = (0..n).collect();
    // Stable sort keeps ties in original minute order.
    order.sort_by(|&a, &b| frac[b].partial_cmp(&frac[a]).unwrap());
    for &i in order.iter().take(remainder) {
        out[i] += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_default_is_valid() {
        let cfg = ArrivalCurveConfig::legacy_default();
        assert!(cfg.legacy_mode);
        assert_eq!(cfg.boarding_close_minutes_before_departure, 20);
        assert_eq!(cfg.window_start_minutes_before_departure, 120);
        assert!(
            cfg.boarding_close_minutes_before_departure <= cfg.peak_minutes_before_departure
                && cfg.peak_minutes_before_departure
                    <= cfg.window_start_minutes_before_departure
        );
    }

    #[test]
    fn test_clamp_pulls_peak_into_window() {
        let mut cfg = ArrivalCurveConfig::legacy_default();
        cfg.peak_minutes_before_departure = 500;
        cfg.validate_and_clamp();
        assert_eq!(
            cfg.peak_minutes_before_departure,
            cfg.window_start_minutes_before_departure
        );

        cfg.peak_minutes_before_departure = 5;
        cfg.validate_and_clamp();
        assert_eq!(
            cfg.peak_minutes_before_departure,
            cfg.boarding_close_minutes_before_departure
        );
    }

    #[test]
    fn test_clamp_replaces_nonpositive_values() {
        let mut cfg = ArrivalCurveConfig::legacy_default();
        cfg.boarding_close_minutes_before_departure = -3;
        cfg.window_start_minutes_before_departure = 0;
        cfg.left_sigma_minutes = 0;
        cfg.right_sigma_minutes = -1;
        cfg.validate_and_clamp();

        assert_eq!(cfg.boarding_close_minutes_before_departure, 20);
        assert_eq!(cfg.window_start_minutes_before_departure, 120);
        assert_eq!(cfg.left_sigma_minutes, 18);
        assert_eq!(cfg.right_sigma_minutes, 14);
    }

    #[test]
    fn test_clamp_window_start_floor_is_default() {
        let mut cfg = ArrivalCurveConfig::legacy_default();
        cfg.window_start_minutes_before_departure = 60;
        cfg.validate_and_clamp();
        assert_eq!(cfg.window_start_minutes_before_departure, DEFAULT_WINDOW_START);

        cfg.window_start_minutes_before_departure = 999;
        cfg.validate_and_clamp();
        assert_eq!(cfg.window_start_minutes_before_departure, MAX_WINDOW_START);
    }

    #[test]
    fn test_integerize_exact_sum() {
        let weights = vec![0.3, 0.25, 0.25, 0.2];
        for total in [0u32, 1, 7, 100, 137] {
            let out = integerize(&weights, total);
            assert_eq!(out.iter().sum::<u32>(), total);
        }
    }

    #[test]
    fn test_integerize_ties_prefer_earlier_minutes() {
        // Four equal buckets, three units: the first three buckets win.
        let out = integerize(&[1.0, 1.0, 1.0, 1.0], 3);
        assert_eq!(out, vec![1, 1, 1, 0]);
    }
}
