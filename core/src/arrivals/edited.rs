//! Edited split-Gaussian arrival curve.

use super::{integerize, ArrivalCurveConfig, ArrivalCurveGenerator};

/// Asymmetric arrival model: independent left/right sigmas around a
/// configurable peak, with density zeroed earlier than the window start and
/// (when the late clamp is enabled) later than the clamp. If the whole
/// density collapses to zero the full passenger count lands in the single
/// bucket nearest the peak.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditedSplitGaussianCurve;

impl ArrivalCurveGenerator for EditedSplitGaussianCurve {
    fn per_minute_arrivals(
        &self,
        total_passengers: u32,
        cfg: &ArrivalCurveConfig,
        arrival_span_minutes: i64,
    ) -> Vec<u32> {
        let mut cfg = cfg.clone();
        cfg.validate_and_clamp();

        let close = cfg
            .boarding_close_minutes_before_departure
            .clamp(0, arrival_span_minutes.max(0));
        let total_minutes = arrival_span_minutes - close;
        if total_minutes <= 0 {
            return Vec::new();
        }
        let n = total_minutes as usize;
        if total_passengers == 0 {
            return vec![0; n];
        }

        let peak = cfg
            .peak_minutes_before_departure
            .clamp(close, arrival_span_minutes);
        let left_sigma = cfg.left_sigma_minutes.max(1) as f64;
        let right_sigma = cfg.right_sigma_minutes.max(1) as f64;
        let window_start = cfg
            .window_start_minutes_before_departure
            .clamp(close, arrival_span_minutes);
        let clamp_enabled = cfg.late_clamp_enabled;
        let late_clamp = cfg
            .late_clamp_minutes_before_departure
            .clamp(close, arrival_span_minutes);

        let mut weights = vec![0.0f64; n];
        let mut weight_sum = 0.0;
        for (i, w) in weights.iter_mut().enumerate() {
            let minutes_before_departure = arrival_span_minutes as f64 - (i as f64 + 0.5);

            // Earlier than the window start: no arrivals yet.
            if minutes_before_departure > window_start as f64 {
                continue;
            }
            // Later than the clamp (closer to departure): arrivals cut off.
            if clamp_enabled && minutes_before_departure < late_clamp as f64 {
                continue;
            }

            let sigma = if minutes_before_departure >= peak as f64 {
                left_sigma
            } else {
                right_sigma
            };
            let z = (minutes_before_departure - peak as f64) / sigma;
            let pdf = (-0.5 * z * z).exp();
            *w = pdf;
            weight_sum += pdf;
        }

        if weight_sum <= 0.0 {
            // Degenerate configuration: everyone at the bucket nearest the peak.
            let mut fallback = vec![0u32; n];
            let peak_idx =
                ((arrival_span_minutes - peak) as usize).min(n - 1);
            fallback[peak_idx] = total_passengers;
            return fallback;
        }

        integerize(&weights, total_passengers)
    }
}
