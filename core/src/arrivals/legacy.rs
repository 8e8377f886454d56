//! Legacy symmetric Gaussian arrival curve.

use super::{integerize, ArrivalCurveConfig, ArrivalCurveGenerator, DEFAULT_BOARDING_CLOSE};

/// The legacy arrival model: a symmetric normal density over the whole
/// arrival window (`span − 20` minutes), mean at the window midpoint and
/// σ = window/6, evaluated at bucket centers.
///
/// The curve shape ignores the editable peak/sigma fields; only the fixed
/// 20-minute boarding close bounds the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyGaussianCurve;

impl ArrivalCurveGenerator for LegacyGaussianCurve {
    fn per_minute_arrivals(
        &self,
        total_passengers: u32,
        _cfg: &ArrivalCurveConfig,
        arrival_span_minutes: i64,
    ) -> Vec<u32> {
        let total_minutes = arrival_span_minutes - DEFAULT_BOARDING_CLOSE;
        if total_minutes <= 0 {
            return Vec::new();
        }
        let n = total_minutes as usize;
        if total_passengers == 0 {
            return vec![0; n];
        }

        let mean = n as f64 / 2.0;
        let sigma = n as f64 / 6.0;
        let weights: Vec<f64> = (0..n)
            .map(|m| {
                let x = (m as f64 + 0.5 - mean) / sigma;
                (-0.5 * x * x).exp()
            })
            .collect();

        integerize(&weights, total_passengers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(total: u32, span: i64) -> Vec<u32> {
        LegacyGaussianCurve.per_minute_arrivals(total, &ArrivalCurveConfig::legacy_default(), span)
    }

    #[test]
    fn test_sum_is_exact() {
        for total in [0u32, 1, 13, 100, 250, 999] {
            let arrivals = generate(total, 120);
            assert_eq!(arrivals.len(), 100);
            assert_eq!(arrivals.iter().sum::<u32>(), total, "total {}", total);
        }
    }

    #[test]
    fn test_zero_passengers_gives_zero_array() {
        let arrivals = generate(0, 120);
        assert_eq!(arrivals, vec![0; 100]);
    }

    #[test]
    fn test_degenerate_span_gives_empty_array() {
        assert!(generate(50, 20).is_empty());
        assert!(generate(50, 5).is_empty());
        assert!(generate(50, -1).is_empty());
    }

    #[test]
    fn test_center_heavier_than_edges() {
        let arrivals = generate(600, 120);
        let mid = arrivals[50];
        assert!(mid > arrivals[0]);
        assert!(mid > arrivals[99]);
    }

    #[test]
    fn test_single_passenger_lands_at_center() {
        // With one passenger every bucket floors to zero and the largest
        // fractional remainder is the density maximum; ties break to the
        // earlier minute.
        let arrivals = generate(1, 120);
        assert_eq!(arrivals.iter().sum::<u32>(), 1);
        let minute = arrivals.iter().position(|&c| c == 1).unwrap();
        assert_eq!(minute, 49);
    }
}
