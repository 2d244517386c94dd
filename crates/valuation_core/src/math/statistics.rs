//! Descriptive statistics over a sample of valuations.
//!
//! Percentiles use linear interpolation between order statistics at rank
//! `p / 100 * (n - 1)` (the "type 7" estimator, numpy's default). For
//! `n = 1` every percentile equals the single value.
//!
//! None of the functions accept an empty sample; callers must decide what an
//! empty simulation means before asking for statistics.

use thiserror::Error;

/// Statistics computation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatisticsError {
    /// The sample contains no values.
    #[error("Cannot compute statistics of an empty sample")]
    EmptySample,

    /// Percentile outside `[0, 100]` or NaN.
    #[error("Invalid percentile {0}: must be in [0, 100]")]
    InvalidPercentile(f64),

    /// Histogram requested with zero bins.
    #[error("Histogram requires at least one bin")]
    InvalidBinCount,
}

/// Arithmetic mean of `values`.
///
/// # Errors
///
/// [`StatisticsError::EmptySample`] if `values` is empty.
///
/// # Examples
///
/// ```rust
/// use valuation_core::math::statistics::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, 6.0]).unwrap(), 3.0);
/// assert!(mean(&[]).is_err());
/// ```
pub fn mean(values: &[f64]) -> Result<f64, StatisticsError> {
    if values.is_empty() {
        return Err(StatisticsError::EmptySample);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Linear-interpolation percentile of an already sorted sample.
///
/// `sorted` must be in ascending order; this is not checked.
///
/// # Errors
///
/// - [`StatisticsError::EmptySample`] if `sorted` is empty
/// - [`StatisticsError::InvalidPercentile`] if `p` is NaN or outside `[0, 100]`
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Result<f64, StatisticsError> {
    if sorted.is_empty() {
        return Err(StatisticsError::EmptySample);
    }
    if !(0.0..=100.0).contains(&p) {
        return Err(StatisticsError::InvalidPercentile(p));
    }

    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let weight = rank - lo as f64;

    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * weight)
}

/// Linear-interpolation percentile of an unsorted sample.
///
/// Sorts a copy of `values`; use [`percentile_sorted`] when computing several
/// percentiles of the same sample.
///
/// # Examples
///
/// ```rust
/// use valuation_core::math::statistics::percentile;
///
/// let values = [4.0, 1.0, 3.0, 2.0, 5.0];
/// assert_eq!(percentile(&values, 50.0).unwrap(), 3.0);
/// assert!((percentile(&values, 5.0).unwrap() - 1.2).abs() < 1e-12);
/// ```
pub fn percentile(values: &[f64], p: f64) -> Result<f64, StatisticsError> {
    let sorted = sorted_copy(values);
    percentile_sorted(&sorted, p)
}

/// Returns an ascending copy of `values`.
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Summary of a simulated distribution.
///
/// `std_dev` is the population standard deviation (divisor `n`).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummaryStatistics {
    /// Number of values summarised.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Smallest value.
    pub min: f64,
    /// 5th percentile.
    pub p5: f64,
    /// 50th percentile.
    pub median: f64,
    /// 95th percentile.
    pub p95: f64,
    /// Largest value.
    pub max: f64,
}

impl SummaryStatistics {
    /// Computes the summary of `values`.
    ///
    /// # Errors
    ///
    /// [`StatisticsError::EmptySample`] if `values` is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use valuation_core::math::statistics::SummaryStatistics;
    ///
    /// let stats = SummaryStatistics::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    /// assert_eq!(stats.mean, 5.0);
    /// assert_eq!(stats.std_dev, 2.0);
    /// assert_eq!(stats.min, 2.0);
    /// assert_eq!(stats.max, 9.0);
    /// ```
    pub fn from_values(values: &[f64]) -> Result<Self, StatisticsError> {
        let sorted = sorted_copy(values);
        Self::from_sorted(&sorted)
    }

    /// Computes the summary of an ascending sample.
    ///
    /// # Errors
    ///
    /// [`StatisticsError::EmptySample`] if `sorted` is empty.
    pub fn from_sorted(sorted: &[f64]) -> Result<Self, StatisticsError> {
        let mean = mean(sorted)?;
        let variance =
            sorted.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / sorted.len() as f64;

        Ok(Self {
            count: sorted.len(),
            mean,
            std_dev: variance.sqrt(),
            min: sorted[0],
            p5: percentile_sorted(sorted, 5.0)?,
            median: percentile_sorted(sorted, 50.0)?,
            p95: percentile_sorted(sorted, 95.0)?,
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Equal-width frequency histogram.
///
/// Bins span `[min, max]` of the sample. Every bin is half-open except the
/// last, which also includes `max`. A constant sample is spread over
/// `[value - 0.5, value + 0.5]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Histogram {
    /// Bin edges, `counts.len() + 1` entries in ascending order.
    pub edges: Vec<f64>,
    /// Number of values per bin.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Builds a histogram of `values` with `bins` equal-width bins.
    ///
    /// # Errors
    ///
    /// - [`StatisticsError::EmptySample`] if `values` is empty
    /// - [`StatisticsError::InvalidBinCount`] if `bins == 0`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use valuation_core::math::statistics::Histogram;
    ///
    /// let hist = Histogram::new(&[0.0, 1.0, 2.0, 3.0], 3).unwrap();
    /// assert_eq!(hist.counts, vec![1, 1, 2]);
    /// assert_eq!(hist.edges.len(), 4);
    /// ```
    pub fn new(values: &[f64], bins: usize) -> Result<Self, StatisticsError> {
        if bins == 0 {
            return Err(StatisticsError::InvalidBinCount);
        }
        if values.is_empty() {
            return Err(StatisticsError::EmptySample);
        }

        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Ok(Self { edges, counts })
    }

    /// Number of bins.
    #[inline]
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Total number of values counted.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Iterates over `(lower_edge, upper_edge, count)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(self.counts.iter())
            .map(|(edge, &count)| (edge[0], edge[1], count))
    }
}
