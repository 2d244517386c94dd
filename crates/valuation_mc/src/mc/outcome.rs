//! Result of a Monte Carlo valuation run.

use valuation_core::math::statistics::{
    percentile_sorted, sorted_copy, Histogram, StatisticsError, SummaryStatistics,
};

use super::error::SimulationError;

/// Distribution of simulated intrinsic values and its summary.
///
/// Constructed once per run and immutable afterwards. `values` keeps the
/// order in which samples were accepted; every value comes from a draw with
/// `discount_rate > growth_rate`.
///
/// # Examples
///
/// ```rust
/// use valuation_mc::mc::SimulationOutcome;
///
/// let outcome = SimulationOutcome::from_samples(vec![3.0, 1.0, 2.0], 1).unwrap();
/// assert_eq!(outcome.values(), &[3.0, 1.0, 2.0]);
/// assert_eq!(outcome.mean(), 2.0);
/// assert_eq!(outcome.sample_count(), 4);
///
/// assert!(SimulationOutcome::from_samples(Vec::new(), 10).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimulationOutcome {
    values: Vec<f64>,
    rejected_count: usize,
    summary: SummaryStatistics,
    #[cfg_attr(feature = "serde", serde(skip))]
    sorted: Vec<f64>,
}

impl SimulationOutcome {
    /// Summarises accepted `values` and the number of rejected draws.
    ///
    /// # Errors
    ///
    /// [`SimulationError::EmptySimulation`] if `values` is empty.
    pub fn from_samples(
        values: Vec<f64>,
        rejected_count: usize,
    ) -> Result<Self, SimulationError> {
        if values.is_empty() {
            return Err(SimulationError::EmptySimulation {
                rejected: rejected_count,
            });
        }

        let sorted = sorted_copy(&values);
        let summary = SummaryStatistics::from_sorted(&sorted)?;

        Ok(Self {
            values,
            rejected_count,
            summary,
            sorted,
        })
    }

    /// Accepted intrinsic values in sampling order.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Mean of the accepted values.
    #[inline]
    pub fn mean(&self) -> f64 {
        self.summary.mean
    }

    /// 5th percentile of the accepted values.
    #[inline]
    pub fn p5(&self) -> f64 {
        self.summary.p5
    }

    /// 95th percentile of the accepted values.
    #[inline]
    pub fn p95(&self) -> f64 {
        self.summary.p95
    }

    /// Median of the accepted values.
    #[inline]
    pub fn median(&self) -> f64 {
        self.summary.median
    }

    /// Population standard deviation of the accepted values.
    #[inline]
    pub fn std_dev(&self) -> f64 {
        self.summary.std_dev
    }

    /// Smallest accepted value.
    #[inline]
    pub fn min(&self) -> f64 {
        self.summary.min
    }

    /// Largest accepted value.
    #[inline]
    pub fn max(&self) -> f64 {
        self.summary.max
    }

    /// Full summary statistics.
    #[inline]
    pub fn summary(&self) -> &SummaryStatistics {
        &self.summary
    }

    /// Number of draws discarded by the rejection rule.
    #[inline]
    pub fn rejected_count(&self) -> usize {
        self.rejected_count
    }

    /// Number of accepted draws.
    #[inline]
    pub fn accepted_count(&self) -> usize {
        self.values.len()
    }

    /// Total number of draws (`accepted + rejected`).
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.values.len() + self.rejected_count
    }

    /// Fraction of draws that were accepted, in (0, 1].
    #[inline]
    pub fn acceptance_ratio(&self) -> f64 {
        self.values.len() as f64 / self.sample_count() as f64
    }

    /// Arbitrary percentile of the accepted values.
    ///
    /// # Errors
    ///
    /// [`StatisticsError::InvalidPercentile`] if `p` is outside `[0, 100]`.
    pub fn percentile(&self, p: f64) -> Result<f64, StatisticsError> {
        percentile_sorted(&self.sorted, p)
    }

    /// Equal-width histogram of the accepted values.
    ///
    /// # Errors
    ///
    /// [`StatisticsError::InvalidBinCount`] if `bins == 0`.
    pub fn histogram(&self, bins: usize) -> Result<Histogram, StatisticsError> {
        Histogram::new(&self.values, bins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_samples_fail() {
        assert_eq!(
            SimulationOutcome::from_samples(Vec::new(), 42),
            Err(SimulationError::EmptySimulation { rejected: 42 })
        );
    }

    #[test]
    fn test_counts() {
        let outcome = SimulationOutcome::from_samples(vec![1.0, 2.0, 3.0, 4.0], 4).unwrap();
        assert_eq!(outcome.accepted_count(), 4);
        assert_eq!(outcome.rejected_count(), 4);
        assert_eq!(outcome.sample_count(), 8);
        assert_relative_eq!(outcome.acceptance_ratio(), 0.5);
    }

    #[test]
    fn test_statistics_follow_summary() {
        let outcome = SimulationOutcome::from_samples(vec![10.0, 40.0, 20.0, 30.0], 0).unwrap();
        assert_relative_eq!(outcome.mean(), 25.0);
        assert_relative_eq!(outcome.p5(), 11.5, epsilon = 1e-12);
        assert_relative_eq!(outcome.p95(), 38.5, epsilon = 1e-12);
        assert_relative_eq!(outcome.median(), 25.0, epsilon = 1e-12);
        assert_eq!(outcome.min(), 10.0);
        assert_eq!(outcome.max(), 40.0);
        assert_eq!(outcome.summary().count, 4);
    }

    #[test]
    fn test_values_keep_sampling_order() {
        let outcome = SimulationOutcome::from_samples(vec![5.0, 1.0, 3.0], 0).unwrap();
        assert_eq!(outcome.values(), &[5.0, 1.0, 3.0]);
    }

    #[test]
    fn test_percentile_extremes() {
        let outcome = SimulationOutcome::from_samples(vec![5.0, 1.0, 3.0], 0).unwrap();
        assert_eq!(outcome.percentile(0.0).unwrap(), 1.0);
        assert_eq!(outcome.percentile(100.0).unwrap(), 5.0);
        assert!(outcome.percentile(150.0).is_err());
    }

    #[test]
    fn test_histogram() {
        let values: Vec<f64> = (0..500).map(|i| i as f64).collect();
        let outcome = SimulationOutcome::from_samples(values, 0).unwrap();
        let hist = outcome.histogram(50).unwrap();
        assert_eq!(hist.total(), 500);
        assert!(hist.counts.iter().all(|&c| c == 10));
        assert!(outcome.histogram(0).is_err());
    }
}
