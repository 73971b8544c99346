use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, SimulationError};
use crate::params::QueueParams;
use crate::record::ClientRecord;
use crate::variates::VariateSource;

/// A fully built single-teller simulation
///
/// Construction draws the population size, the arrival times and the service
/// durations, and derives every client record. Once built the record sequence
/// is read-only; re-simulating means building a new instance.
#[derive(Debug, Clone)]
pub struct QueueSimulation {
    params: QueueParams,
    records: Vec<ClientRecord>,
}

/// Aggregate statistics over one simulation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub clients: usize,
    pub waited_clients: usize,
    pub average_wait: f64,
    pub average_time_in_system: f64,
    pub max_service_duration: f64,
    pub total_idle_time: f64,
    /// Busy time over the span from first arrival to last departure
    pub utilisation: f64,
}

impl SummaryStats {
    /// Fraction of clients who had to queue
    pub fn waited_fraction(&self) -> f64 {
        if self.clients == 0 {
            return 0.0;
        }
        self.waited_clients as f64 / self.clients as f64
    }
}

impl QueueSimulation {
    /// Build a simulation, drawing every variate from `source`
    ///
    /// Draw order is fixed: population size, first arrival, one gap per
    /// further client, then one service duration per client in arrival order.
    pub fn new<S: VariateSource + ?Sized>(params: &QueueParams, source: &mut S) -> Result<Self> {
        params.validate()?;

        let (pop_min, pop_max) = params.population;
        let population = source.uniform_integer(pop_min, pop_max)?;
        if population == 0 {
            return Err(SimulationError::InvalidConfiguration(
                "population size must be positive".to_string(),
            ));
        }
        let population = usize::try_from(population).map_err(|_| too_large(population))?;

        let arrivals = draw_arrivals(params, population, source)?;

        let mut records: Vec<ClientRecord> = Vec::new();
        records
            .try_reserve_exact(population)
            .map_err(|_| too_large(population))?;
        for (idx, &arrival) in arrivals.iter().enumerate() {
            let (min, max) = params.service_duration;
            let duration = source.uniform_real(min, max)?;
            let record = ClientRecord::derive(arrival, records.last(), duration);
            if !record.service_end().is_finite() {
                return Err(SimulationError::InvalidConfiguration(format!(
                    "service end of client {} overflowed",
                    idx + 1
                )));
            }
            debug!(
                client = idx + 1,
                arrival = record.arrival_time(),
                begin = record.service_begin(),
                end = record.service_end(),
                wait = record.wait_in_queue(),
                idle = record.idle_time(),
                "client served"
            );
            records.push(record);
        }

        let simulation = QueueSimulation {
            params: params.clone(),
            records,
        };
        info!(
            clients = simulation.len(),
            waited = simulation.waited_client_count(),
            "simulation built"
        );
        Ok(simulation)
    }

    pub fn params(&self) -> &QueueParams {
        &self.params
    }

    /// Client records in arrival order
    pub fn records(&self) -> &[ClientRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn average_waiting_time(&self) -> Result<f64> {
        self.mean_of(ClientRecord::wait_in_queue)
    }

    pub fn average_time_in_system(&self) -> Result<f64> {
        self.mean_of(ClientRecord::time_in_system)
    }

    /// Longest time the teller spent on a single client
    pub fn max_service_duration(&self) -> f64 {
        self.records
            .iter()
            .map(ClientRecord::service_duration)
            .fold(0.0, f64::max)
    }

    /// Clients whose wait was strictly positive
    pub fn waited_client_count(&self) -> usize {
        self.records.iter().filter(|r| r.waited()).count()
    }

    pub fn total_idle_time(&self) -> f64 {
        self.records.iter().map(ClientRecord::idle_time).sum()
    }

    /// Fraction of the first-arrival-to-last-departure span the teller was busy
    pub fn utilisation(&self) -> f64 {
        let (Some(first), Some(last)) = (self.records.first(), self.records.last()) else {
            return 0.0;
        };
        let span = last.service_end() - first.arrival_time();
        if span <= 0.0 {
            return 0.0;
        }
        let busy: f64 = self.records.iter().map(ClientRecord::service_duration).sum();
        busy / span
    }

    pub fn summary(&self) -> Result<SummaryStats> {
        Ok(SummaryStats {
            clients: self.len(),
            waited_clients: self.waited_client_count(),
            average_wait: self.average_waiting_time()?,
            average_time_in_system: self.average_time_in_system()?,
            max_service_duration: self.max_service_duration(),
            total_idle_time: self.total_idle_time(),
            utilisation: self.utilisation(),
        })
    }

    fn mean_of(&self, field: fn(&ClientRecord) -> f64) -> Result<f64> {
        if self.records.is_empty() {
            return Err(SimulationError::EmptyPopulation);
        }
        let total: f64 = self.records.iter().map(field).sum();
        Ok(total / self.records.len() as f64)
    }
}

fn too_large<N: std::fmt::Display>(population: N) -> SimulationError {
    SimulationError::InvalidConfiguration(format!(
        "population size {} does not fit in memory",
        population
    ))
}

/// Chain arrival times from the first arrival and successive gaps
///
/// Fails if the running arrival time stops being finite, since strictly
/// increasing arrivals cannot be kept past that point.
fn draw_arrivals<S: VariateSource + ?Sized>(
    params: &QueueParams,
    population: usize,
    source: &mut S,
) -> Result<Vec<f64>> {
    let mut arrivals = Vec::new();
    arrivals
        .try_reserve_exact(population)
        .map_err(|_| too_large(population))?;
    let (first_min, first_max) = params.first_arrival;
    let mut current = source.uniform_real(first_min, first_max)?;
    arrivals.push(current);

    let (gap_min, gap_max) = params.arrival_gap;
    for idx in 1..population {
        current += source.uniform_real(gap_min, gap_max)?;
        if !current.is_finite() {
            return Err(SimulationError::InvalidConfiguration(format!(
                "arrival time of client {} overflowed",
                idx + 1
            )));
        }
        arrivals.push(current);
    }
    Ok(arrivals)
}
