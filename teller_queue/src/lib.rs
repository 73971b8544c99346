//! Single-teller queue simulation
//!
//! A random number of clients arrive at a single teller. Each client is
//! served in arrival order: service begins once the client has arrived and the
//! previous client has left. From the drawn arrival gaps and service durations
//! the simulation derives, per client, the service window, the time spent
//! queueing, the total time in the bank and the teller's idle time just before
//! the client was served, then aggregates those into summary statistics.
//!
//! ```rust
//! use teller_queue::{QueueParams, QueueSimulation, RngSource};
//!
//! let mut source = RngSource::seeded(42);
//! let sim = QueueSimulation::new(&QueueParams::default(), &mut source).unwrap();
//!
//! assert!((5..=15).contains(&sim.len()));
//! assert!(sim.waited_client_count() <= sim.len());
//! ```

pub mod error;
pub mod params;
pub mod record;
pub mod replication;
pub mod report;
pub mod simulation;
pub mod variates;

pub use error::{Result, SimulationError};
pub use params::QueueParams;
pub use record::ClientRecord;
pub use replication::{MeanStd, ReplicationRunner, ReplicationSummary};
pub use simulation::{QueueSimulation, SummaryStats};
pub use variates::{RngSource, ScriptedSource, VariateSource};
