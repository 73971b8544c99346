//! Independent replications of the teller simulation, run in parallel
//!
//! Replication `i` draws every variate from `RngSource::seeded(base_seed + i)`,
//! so results are identical regardless of thread count or execution order.
//!
//! ```rust
//! use teller_queue::{QueueParams, ReplicationRunner, ReplicationSummary};
//!
//! let results = ReplicationRunner::new(20, 42, QueueParams::default())
//!     .num_threads(2)
//!     .run()
//!     .unwrap();
//! assert_eq!(results.len(), 20);
//!
//! let summary = ReplicationSummary::from_results(&results).unwrap();
//! assert_eq!(summary.replications, 20);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Result, SimulationError};
use crate::params::QueueParams;
use crate::simulation::{QueueSimulation, SummaryStats};
use crate::variates::RngSource;

type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Runs many seeded simulations with the same parameters
pub struct ReplicationRunner {
    replications: usize,
    base_seed: u64,
    params: QueueParams,
    num_threads: Option<usize>,
    progress_callback: Option<ProgressCallback>,
}

impl ReplicationRunner {
    pub fn new(replications: usize, base_seed: u64, params: QueueParams) -> Self {
        ReplicationRunner {
            replications,
            base_seed,
            params,
            num_threads: None,
            progress_callback: None,
        }
    }

    /// Set number of threads (defaults to rayon's global pool)
    pub fn num_threads(mut self, n: usize) -> Self {
        self.num_threads = Some(n);
        self
    }

    /// Set progress callback, called with `(completed, total)` after each
    /// replication finishes
    pub fn progress<P>(mut self, callback: P) -> Self
    where
        P: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(callback));
        self
    }

    /// Seed used by replication `index`
    pub fn seed_for(&self, index: usize) -> u64 {
        self.base_seed.wrapping_add(index as u64)
    }

    /// Execute all replications and return their summaries in replication order
    ///
    /// A failing replication does not stop the others; its error is returned
    /// in its slot.
    pub fn run(self) -> Result<Vec<Result<SummaryStats>>> {
        let pool = match self.num_threads {
            Some(n) => Some(rayon::ThreadPoolBuilder::new().num_threads(n).build()?),
            None => None,
        };
        let completed = AtomicUsize::new(0);

        let execute = || {
            (0..self.replications)
                .into_par_iter()
                .map(|index| {
                    let seed = self.seed_for(index);
                    let result = QueueSimulation::new(&self.params, &mut RngSource::seeded(seed))
                        .and_then(|sim| sim.summary());

                    match &result {
                        Ok(stats) => debug!(index, seed, clients = stats.clients, "replication done"),
                        Err(e) => warn!(index, seed, error = %e, "replication failed"),
                    }

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(ref callback) = self.progress_callback {
                        callback(done, self.replications);
                    }
                    result
                })
                .collect::<Vec<_>>()
        };

        Ok(match pool {
            Some(pool) => pool.install(execute),
            None => execute(),
        })
    }
}

/// Progress reporter logging every `interval` completed replications
pub fn simple_progress_reporter(interval: usize) -> impl Fn(usize, usize) + Send + Sync {
    move |completed, total| {
        if interval > 0 && (completed % interval == 0 || completed == total) {
            tracing::info!(completed, total, "replications progress");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeanStd {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl MeanStd {
    /// Sample statistics, `None` for an empty slice. Uses the population
    /// standard deviation.
    pub fn from_values(values: &[f64]) -> Option<MeanStd> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(MeanStd {
            mean,
            std: variance.sqrt(),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

/// Statistics aggregated across successful replications
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplicationSummary {
    pub replications: usize,
    pub failed: usize,
    pub clients: MeanStd,
    pub average_wait: MeanStd,
    pub average_time_in_system: MeanStd,
    pub max_service_duration: MeanStd,
    pub waited_fraction: MeanStd,
    pub utilisation: MeanStd,
}

impl ReplicationSummary {
    pub fn from_results(results: &[Result<SummaryStats>]) -> Result<Self> {
        let ok: Vec<&SummaryStats> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        let stat = |f: fn(&SummaryStats) -> f64| -> Result<MeanStd> {
            let values: Vec<f64> = ok.iter().map(|s| f(s)).collect();
            MeanStd::from_values(&values).ok_or(SimulationError::NoReplications)
        };

        Ok(ReplicationSummary {
            replications: results.len(),
            failed: results.len() - ok.len(),
            clients: stat(|s| s.clients as f64)?,
            average_wait: stat(|s| s.average_wait)?,
            average_time_in_system: stat(|s| s.average_time_in_system)?,
            max_service_duration: stat(|s| s.max_service_duration)?,
            waited_fraction: stat(SummaryStats::waited_fraction)?,
            utilisation: stat(|s| s.utilisation)?,
        })
    }
}
