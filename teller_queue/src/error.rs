use thiserror::Error;

/// Errors raised while configuring, building or reporting a simulation.
///
/// None of these are transient: a simulation that fails to build leaves
/// nothing behind, and retrying with the same inputs fails the same way.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SimulationError {
    /// A variate was requested from an inverted or non-finite range.
    #[error("Invalid variate range: [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },

    /// The simulation parameters cannot produce a valid client sequence.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An aggregate was requested over zero client records.
    #[error("Cannot aggregate over an empty population")]
    EmptyPopulation,

    /// A scripted source ran out of values.
    #[error("Scripted variate source exhausted: no {kind} values left")]
    VariatesExhausted { kind: &'static str },

    /// A scripted source produced a value outside the requested range.
    #[error("Scripted value {value} outside requested range [{min}, {max}]")]
    ScriptedValueOutOfRange { value: f64, min: f64, max: f64 },

    /// Replication summary requested but no replication succeeded.
    #[error("No successful replications to summarise")]
    NoReplications,

    #[error("Unable to build replication thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Error parsing TOML config: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
