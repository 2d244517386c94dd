//! Monte Carlo valuation engine.
//!
//! # Overview
//!
//! The [`MonteCarloSimulator`] coordinates, for each sample:
//! 1. Drawing a discount rate and a growth rate from independent normals
//! 2. Rejecting the draw when `discount_rate <= growth_rate`
//! 3. Valuing the accepted draw with [`intrinsic_value`]
//!
//! and finally summarises the accepted values into a [`SimulationOutcome`].
//!
//! # Parallel Runs
//!
//! [`MonteCarloSimulator::run_parallel`] splits the sample budget into chunks
//! of [`ParallelConfig::chunk_size`] samples. Chunk `k` draws from
//! [`ValuationRng::for_stream`]`(seed, k)` and chunks are concatenated in
//! index order, so the outcome for a given seed does not depend on the
//! number of rayon worker threads.

use rand_distr::Normal;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};
use valuation_core::dcf::intrinsic_value;

use super::cancel::{CancellationToken, CANCEL_CHECK_INTERVAL};
use super::config::{DistributionSpec, SimulationConfig};
use super::error::{ConfigError, SimulationError};
use super::outcome::SimulationOutcome;
use crate::rng::ValuationRng;

/// Default number of samples per parallel chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Acceptance ratio below which a run logs a warning.
const LOW_ACCEPTANCE_WARNING: f64 = 0.5;

/// Configuration for parallel sampling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Samples per independently seeded chunk.
    pub chunk_size: usize,

    /// Minimum samples per worker thread before rayon is used.
    pub min_samples_per_thread: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            min_samples_per_thread: 10_000,
        }
    }
}

impl ParallelConfig {
    /// Sets the chunk size.
    #[inline]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Determines if rayon should be used for the given sample count.
    ///
    /// Chunks are seeded identically either way; this only decides whether
    /// they are processed on the thread pool.
    #[inline]
    pub fn should_parallelise(&self, sample_count: usize) -> bool {
        let n_threads = rayon::current_num_threads();
        n_threads > 1 && sample_count >= self.min_samples_per_thread.saturating_mul(n_threads)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize(self.chunk_size));
        }
        Ok(())
    }
}

/// Accepted values and rejection count of a contiguous run of samples.
#[derive(Debug, Default)]
struct SampleBlock {
    values: Vec<f64>,
    rejected: usize,
}

/// Monte Carlo simulator for DCF intrinsic value.
///
/// Holds the validated configuration and the two sampling distributions.
/// The simulator itself carries no random state; every run takes its random
/// source (or seed) explicitly.
///
/// # Examples
///
/// ```rust
/// use valuation_core::types::CashFlowSeries;
/// use valuation_mc::mc::{DistributionSpec, MonteCarloSimulator, SimulationConfig};
/// use valuation_mc::rng::ValuationRng;
///
/// let config = SimulationConfig::builder()
///     .cash_flows(CashFlowSeries::new(vec![100.0; 5]).unwrap())
///     .discount_rate(DistributionSpec::new(0.10, 0.01))
///     .growth_rate(DistributionSpec::new(0.03, 0.01))
///     .sample_count(2_000)
///     .build()
///     .unwrap();
/// let simulator = MonteCarloSimulator::new(config).unwrap();
///
/// let a = simulator.run(&mut ValuationRng::from_seed(1)).unwrap();
/// let b = simulator.run(&mut ValuationRng::from_seed(1)).unwrap();
/// assert_eq!(a.values(), b.values());
/// ```
#[derive(Clone, Debug)]
pub struct MonteCarloSimulator {
    config: SimulationConfig,
    discount_dist: Normal<f64>,
    growth_dist: Normal<f64>,
    parallel: ParallelConfig,
}

impl MonteCarloSimulator {
    /// Creates a simulator with the default [`ParallelConfig`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        Self::with_parallel_config(config, ParallelConfig::default())
    }

    /// Creates a simulator with an explicit [`ParallelConfig`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if either configuration is invalid.
    pub fn with_parallel_config(
        config: SimulationConfig,
        parallel: ParallelConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        parallel.validate()?;

        let discount_dist = normal("discount_rate", config.discount_rate())?;
        let growth_dist = normal("growth_rate", config.growth_rate())?;

        Ok(Self {
            config,
            discount_dist,
            growth_dist,
            parallel,
        })
    }

    /// Returns the simulation configuration.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns the parallel sampling configuration.
    #[inline]
    pub fn parallel_config(&self) -> &ParallelConfig {
        &self.parallel
    }

    /// Runs the simulation sequentially, drawing from `rng`.
    ///
    /// # Errors
    ///
    /// [`SimulationError::EmptySimulation`] if every draw was rejected.
    pub fn run(&self, rng: &mut ValuationRng) -> Result<SimulationOutcome, SimulationError> {
        self.run_sequential(rng, None)
    }

    /// Runs the simulation sequentially, polling `token` every
    /// [`CANCEL_CHECK_INTERVAL`] samples.
    ///
    /// # Errors
    ///
    /// - [`SimulationError::Cancelled`] if `token` was cancelled before the
    ///   last sample was drawn
    /// - [`SimulationError::EmptySimulation`] if every draw was rejected
    pub fn run_with_cancel(
        &self,
        rng: &mut ValuationRng,
        token: &CancellationToken,
    ) -> Result<SimulationOutcome, SimulationError> {
        self.run_sequential(rng, Some(token))
    }

    /// Runs the simulation over independently seeded chunks, on the rayon
    /// pool when the sample count warrants it.
    ///
    /// The result is a pure function of the configuration, the chunk size
    /// and `seed`. It differs from [`run`](Self::run) with the same seed.
    ///
    /// # Errors
    ///
    /// [`SimulationError::EmptySimulation`] if every draw was rejected.
    pub fn run_parallel(&self, seed: u64) -> Result<SimulationOutcome, SimulationError> {
        self.run_chunked(seed, None)
    }

    /// Parallel counterpart of [`run_with_cancel`](Self::run_with_cancel).
    ///
    /// # Errors
    ///
    /// Same as [`run_with_cancel`](Self::run_with_cancel).
    pub fn run_parallel_with_cancel(
        &self,
        seed: u64,
        token: &CancellationToken,
    ) -> Result<SimulationOutcome, SimulationError> {
        self.run_chunked(seed, Some(token))
    }

    fn run_sequential(
        &self,
        rng: &mut ValuationRng,
        token: Option<&CancellationToken>,
    ) -> Result<SimulationOutcome, SimulationError> {
        let n = self.config.sample_count();
        debug!(
            samples = n,
            seed = rng.seed(),
            discount_mean = self.config.discount_rate().mean,
            discount_std = self.config.discount_rate().std_dev,
            growth_mean = self.config.growth_rate().mean,
            growth_std = self.config.growth_rate().std_dev,
            "Starting sequential simulation"
        );

        let block = self
            .simulate_block(rng, n, token)
            .map_err(|completed| SimulationError::Cancelled { completed })?;

        self.finish(block)
    }

    fn run_chunked(
        &self,
        seed: u64,
        token: Option<&CancellationToken>,
    ) -> Result<SimulationOutcome, SimulationError> {
        let n = self.config.sample_count();
        let chunk_size = self.parallel.chunk_size;
        let n_chunks = n.div_ceil(chunk_size);
        let parallel = self.parallel.should_parallelise(n);
        debug!(
            samples = n,
            seed,
            chunks = n_chunks,
            parallel,
            "Starting chunked simulation"
        );

        let completed = AtomicUsize::new(0);
        let run_chunk = |chunk_idx: usize| -> Option<SampleBlock> {
            let start = chunk_idx * chunk_size;
            let len = chunk_size.min(n - start);
            let mut rng = ValuationRng::for_stream(seed, chunk_idx as u64);

            match self.simulate_block(&mut rng, len, token) {
                Ok(block) => {
                    completed.fetch_add(len, Ordering::Relaxed);
                    Some(block)
                }
                Err(done) => {
                    completed.fetch_add(done, Ordering::Relaxed);
                    None
                }
            }
        };

        let blocks: Option<Vec<SampleBlock>> = if parallel {
            (0..n_chunks).into_par_iter().map(run_chunk).collect()
        } else {
            (0..n_chunks).map(run_chunk).collect()
        };

        let blocks = blocks.ok_or_else(|| SimulationError::Cancelled {
            completed: completed.load(Ordering::Relaxed),
        })?;

        let mut merged = SampleBlock {
            values: Vec::with_capacity(n),
            rejected: 0,
        };
        for block in blocks {
            merged.values.extend(block.values);
            merged.rejected += block.rejected;
        }

        self.finish(merged)
    }

    /// Draws `len` samples. On cancellation returns the number drawn so far.
    fn simulate_block(
        &self,
        rng: &mut ValuationRng,
        len: usize,
        token: Option<&CancellationToken>,
    ) -> Result<SampleBlock, usize> {
        let cash_flows = self.config.cash_flows();
        let mut block = SampleBlock {
            values: Vec::with_capacity(len),
            rejected: 0,
        };

        for i in 0..len {
            let poll = i % CANCEL_CHECK_INTERVAL == 0;
            if poll && token.is_some_and(CancellationToken::is_cancelled) {
                return Err(i);
            }

            let discount_rate = rng.sample(&self.discount_dist);
            let growth_rate = rng.sample(&self.growth_dist);

            if discount_rate <= growth_rate {
                block.rejected += 1;
                continue;
            }

            // Draws the engine cannot value (e.g. discount_rate <= -1) count as rejections
            match intrinsic_value(cash_flows, discount_rate, growth_rate) {
                Ok(value) => block.values.push(value),
                Err(_) => block.rejected += 1,
            }
        }

        Ok(block)
    }

    fn finish(&self, block: SampleBlock) -> Result<SimulationOutcome, SimulationError> {
        let outcome = match SimulationOutcome::from_samples(block.values, block.rejected) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(rejected = block.rejected, "All samples rejected");
                return Err(err);
            }
        };

        if outcome.acceptance_ratio() < LOW_ACCEPTANCE_WARNING {
            warn!(
                accepted = outcome.accepted_count(),
                rejected = outcome.rejected_count(),
                "More than half of the draws were rejected"
            );
        }

        info!(
            accepted = outcome.accepted_count(),
            rejected = outcome.rejected_count(),
            mean = outcome.mean(),
            p5 = outcome.p5(),
            p95 = outcome.p95(),
            "Simulation complete"
        );
        Ok(outcome)
    }
}

fn normal(name: &'static str, spec: DistributionSpec) -> Result<Normal<f64>, ConfigError> {
    Normal::new(spec.mean, spec.std_dev).map_err(|e| ConfigError::InvalidDistribution {
        name,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use valuation_core::types::CashFlowSeries;

    fn config(discount: DistributionSpec, growth: DistributionSpec, n: usize) -> SimulationConfig {
        SimulationConfig::builder()
            .cash_flows(CashFlowSeries::new(vec![100.0, 110.0, 120.0]).unwrap())
            .discount_rate(discount)
            .growth_rate(growth)
            .sample_count(n)
            .build()
            .unwrap()
    }

    #[test]
    fn test_degenerate_distributions_give_constant_values() {
        let sim = MonteCarloSimulator::new(config(
            DistributionSpec::fixed(0.10),
            DistributionSpec::fixed(0.03),
            50,
        ))
        .unwrap();

        let outcome = sim.run(&mut ValuationRng::from_seed(1)).unwrap();
        let expected = intrinsic_value(sim.config().cash_flows(), 0.10, 0.03).unwrap();

        assert_eq!(outcome.accepted_count(), 50);
        assert_eq!(outcome.rejected_count(), 0);
        assert!(outcome.values().iter().all(|&v| v == expected));
        assert_eq!(outcome.p5(), expected);
        assert_eq!(outcome.p95(), expected);
    }

    #[test]
    fn test_equal_rates_are_rejected() {
        let sim = MonteCarloSimulator::new(config(
            DistributionSpec::fixed(0.05),
            DistributionSpec::fixed(0.05),
            10,
        ))
        .unwrap();

        let result = sim.run(&mut ValuationRng::from_seed(1));
        assert_eq!(result, Err(SimulationError::EmptySimulation { rejected: 10 }));
    }

    #[test]
    fn test_discount_below_minus_one_is_rejected() {
        let sim = MonteCarloSimulator::new(config(
            DistributionSpec::fixed(-1.5),
            DistributionSpec::fixed(-2.0),
            5,
        ))
        .unwrap();

        let result = sim.run(&mut ValuationRng::from_seed(1));
        assert_eq!(result, Err(SimulationError::EmptySimulation { rejected: 5 }));
    }

    #[test]
    fn test_counts_add_up() {
        let sim = MonteCarloSimulator::new(config(
            DistributionSpec::new(0.06, 0.03),
            DistributionSpec::new(0.04, 0.03),
            5_000,
        ))
        .unwrap();

        let outcome = sim.run(&mut ValuationRng::from_seed(3)).unwrap();
        assert_eq!(outcome.accepted_count() + outcome.rejected_count(), 5_000);
        assert!(outcome.rejected_count() > 0);
    }

    #[test]
    fn test_pre_cancelled_token() {
        let sim = MonteCarloSimulator::new(config(
            DistributionSpec::new(0.10, 0.01),
            DistributionSpec::new(0.03, 0.01),
            10_000,
        ))
        .unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let result = sim.run_with_cancel(&mut ValuationRng::from_seed(1), &token);
        assert_eq!(result, Err(SimulationError::Cancelled { completed: 0 }));

        let result = sim.run_parallel_with_cancel(1, &token);
        assert_eq!(result, Err(SimulationError::Cancelled { completed: 0 }));
    }

    #[test]
    fn test_uncancelled_token_matches_plain_run() {
        let sim = MonteCarloSimulator::new(config(
            DistributionSpec::new(0.10, 0.01),
            DistributionSpec::new(0.03, 0.01),
            3_000,
        ))
        .unwrap();
        let token = CancellationToken::new();

        let plain = sim.run(&mut ValuationRng::from_seed(8)).unwrap();
        let polled = sim
            .run_with_cancel(&mut ValuationRng::from_seed(8), &token)
            .unwrap();
        assert_eq!(plain, polled);
    }

    #[test]
    fn test_chunked_run_independent_of_parallelism() {
        let cfg = config(
            DistributionSpec::new(0.10, 0.01),
            DistributionSpec::new(0.03, 0.01),
            10_000,
        );
        let sequential = MonteCarloSimulator::with_parallel_config(
            cfg.clone(),
            ParallelConfig {
                chunk_size: 1000,
                min_samples_per_thread: usize::MAX,
            },
        )
        .unwrap();
        let parallel = MonteCarloSimulator::with_parallel_config(
            cfg,
            ParallelConfig {
                chunk_size: 1000,
                min_samples_per_thread: 0,
            },
        )
        .unwrap();

        let a = sequential.run_parallel(77).unwrap();
        let b = parallel.run_parallel(77).unwrap();
        assert_eq!(a.values(), b.values());
        assert_eq!(a.rejected_count(), b.rejected_count());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let cfg = config(DistributionSpec::fixed(0.1), DistributionSpec::fixed(0.0), 10);
        let parallel = ParallelConfig::default().with_chunk_size(0);
        let result = MonteCarloSimulator::with_parallel_config(cfg, parallel);
        assert!(matches!(result, Err(ConfigError::InvalidChunkSize(0))));
    }

    #[test]
    fn test_partial_last_chunk() {
        let sim = MonteCarloSimulator::with_parallel_config(
            config(DistributionSpec::fixed(0.1), DistributionSpec::fixed(0.02), 2_500),
            ParallelConfig::default().with_chunk_size(1000),
        )
        .unwrap();

        let outcome = sim.run_parallel(5).unwrap();
        assert_eq!(outcome.sample_count(), 2_500);
    }
}
