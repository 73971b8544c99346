//! Sources of random variates consumed by the queue simulation.
//!
//! The simulation never touches a global generator. A source is owned by the
//! caller and lent to [`QueueSimulation::new`](crate::QueueSimulation::new),
//! so tests can swap in a [`ScriptedSource`] and replications can each hold
//! their own seeded [`RngSource`].

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

use crate::error::{Result, SimulationError};

/// Produces independent uniform variates on demand.
pub trait VariateSource {
    /// Draw a real number uniformly from `[min, max]`.
    fn uniform_real(&mut self, min: f64, max: f64) -> Result<f64>;

    /// Draw an integer uniformly from `[min, max]` inclusive.
    fn uniform_integer(&mut self, min: u64, max: u64) -> Result<u64>;
}

fn check_real_range(min: f64, max: f64) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(SimulationError::InvalidRange { min, max });
    }
    Ok(())
}

fn check_integer_range(min: u64, max: u64) -> Result<()> {
    if min > max {
        return Err(SimulationError::InvalidRange {
            min: min as f64,
            max: max as f64,
        });
    }
    Ok(())
}

/// Variate source backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R = StdRng> {
    rng: R,
}

impl RngSource<StdRng> {
    /// Non-deterministic source seeded from the operating system.
    pub fn from_entropy() -> Self {
        RngSource {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible source: the same seed yields the same variate stream.
    pub fn seeded(seed: u64) -> Self {
        RngSource {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        RngSource { rng }
    }
}

impl<R: Rng> VariateSource for RngSource<R> {
    fn uniform_real(&mut self, min: f64, max: f64) -> Result<f64> {
        check_real_range(min, max)?;
        if min == max {
            return Ok(min);
        }
        let dist = Uniform::new_inclusive(min, max)
            .map_err(|_| SimulationError::InvalidRange { min, max })?;
        Ok(dist.sample(&mut self.rng))
    }

    fn uniform_integer(&mut self, min: u64, max: u64) -> Result<u64> {
        check_integer_range(min, max)?;
        let dist = Uniform::new_inclusive(min, max).map_err(|_| SimulationError::InvalidRange {
            min: min as f64,
            max: max as f64,
        })?;
        Ok(dist.sample(&mut self.rng))
    }
}

/// Replays fixed sequences of reals and integers, in the order they are
/// requested.
///
/// Range validation still applies, and a scripted value must lie inside the
/// range it is drawn for.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    reals: VecDeque<f64>,
    integers: VecDeque<u64>,
}

impl ScriptedSource {
    pub fn new<I, J>(reals: I, integers: J) -> Self
    where
        I: IntoIterator<Item = f64>,
        J: IntoIterator<Item = u64>,
    {
        ScriptedSource {
            reals: reals.into_iter().collect(),
            integers: integers.into_iter().collect(),
        }
    }

    /// Number of reals not yet drawn.
    pub fn remaining_reals(&self) -> usize {
        self.reals.len()
    }

    /// Number of integers not yet drawn.
    pub fn remaining_integers(&self) -> usize {
        self.integers.len()
    }
}

impl VariateSource for ScriptedSource {
    fn uniform_real(&mut self, min: f64, max: f64) -> Result<f64> {
        check_real_range(min, max)?;
        let value = self
            .reals
            .pop_front()
            .ok_or(SimulationError::VariatesExhausted { kind: "real" })?;
        if !value.is_finite() || value < min || value > max {
            return Err(SimulationError::ScriptedValueOutOfRange { value, min, max });
        }
        Ok(value)
    }

    fn uniform_integer(&mut self, min: u64, max: u64) -> Result<u64> {
        check_integer_range(min, max)?;
        let value = self
            .integers
            .pop_front()
            .ok_or(SimulationError::VariatesExhausted { kind: "integer" })?;
        if value < min || value > max {
            return Err(SimulationError::ScriptedValueOutOfRange {
                value: value as f64,
                min: min as f64,
                max: max as f64,
            });
        }
        Ok(value)
    }
}
