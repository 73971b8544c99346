use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Largest population a single simulation may draw
pub const MAX_POPULATION: u64 = 10_000_000;

/// Ranges the teller simulation draws its variates from
///
/// Every range is an inclusive `(min, max)` pair. Times are in minutes.
/// Fields missing from a TOML file keep their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueParams {
    /// Number of clients served in one simulation
    pub population: (u64, u64),
    /// Arrival time of the first client
    pub first_arrival: (f64, f64),
    /// Gap between consecutive arrivals, must be strictly positive
    pub arrival_gap: (f64, f64),
    /// Time the teller spends with one client
    pub service_duration: (f64, f64),
}

impl QueueParams {
    /// Check every range before any variate is drawn
    pub fn validate(&self) -> Result<()> {
        let (pop_min, pop_max) = self.population;
        if pop_min > pop_max {
            return Err(invalid(format!(
                "population range [{}, {}] is inverted",
                pop_min, pop_max
            )));
        }
        if pop_min == 0 {
            return Err(invalid("population range must not allow zero clients"));
        }
        if pop_max > MAX_POPULATION {
            return Err(invalid(format!(
                "population maximum {} exceeds {}",
                pop_max, MAX_POPULATION
            )));
        }

        check_range("first_arrival", self.first_arrival)?;
        check_range("arrival_gap", self.arrival_gap)?;
        check_range("service_duration", self.service_duration)?;

        if self.first_arrival.0 < 0.0 {
            return Err(invalid("first_arrival minimum must not be negative"));
        }
        // Strictly positive gaps keep arrival times strictly increasing
        if self.arrival_gap.0 <= 0.0 {
            return Err(invalid("arrival_gap minimum must be strictly positive"));
        }
        if self.service_duration.0 < 0.0 {
            return Err(invalid("service_duration minimum must not be negative"));
        }
        Ok(())
    }

    /// Parse parameters from TOML, e.g.
    ///
    /// ```toml
    /// population = [5, 15]
    /// arrival_gap = [0.5, 2.0]
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let params: QueueParams = toml::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    /// Load and validate parameters from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

impl Default for QueueParams {
    fn default() -> Self {
        QueueParams {
            population: (5, 15),
            first_arrival: (0.0, 3.0),
            arrival_gap: (1.0, 5.0),
            service_duration: (1.0, 5.0),
        }
    }
}

fn invalid(msg: impl Into<String>) -> SimulationError {
    SimulationError::InvalidConfiguration(msg.into())
}

fn check_range(name: &str, (min, max): (f64, f64)) -> Result<()> {
    if !min.is_finite() || !max.is_finite() {
        return Err(invalid(format!(
            "{} range [{}, {}] is not finite",
            name, min, max
        )));
    }
    if min > max {
        return Err(invalid(format!(
            "{} range [{}, {}] is inverted",
            name, min, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_bank_teller() {
        let params = QueueParams::default();
        assert_eq!(params.population, (5, 15));
        assert_eq!(params.first_arrival, (0.0, 3.0));
        assert_eq!(params.arrival_gap, (1.0, 5.0));
        assert_eq!(params.service_duration, (1.0, 5.0));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn inverted_population_is_invalid() {
        let params = QueueParams {
            population: (15, 5),
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(SimulationError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn zero_population_is_invalid() {
        let params = QueueParams {
            population: (0, 3),
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(SimulationError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn oversized_population_is_invalid() {
        let params = QueueParams {
            population: (1 << 62, 1 << 62),
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(SimulationError::InvalidConfiguration(_))
        ));

        let at_cap = QueueParams {
            population: (1, MAX_POPULATION),
            ..Default::default()
        };
        assert!(at_cap.validate().is_ok());
    }

    #[test]
    fn non_positive_gap_is_invalid() {
        let params = QueueParams {
            arrival_gap: (0.0, 5.0),
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(SimulationError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn inverted_or_infinite_service_is_invalid() {
        let inverted = QueueParams {
            service_duration: (5.0, 1.0),
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let infinite = QueueParams {
            service_duration: (1.0, f64::INFINITY),
            ..Default::default()
        };
        assert!(infinite.validate().is_err());
    }

    #[test]
    fn toml_overrides_only_given_fields() {
        let params = QueueParams::from_toml_str(
            r#"
            population = [20, 30]
            service_duration = [0.5, 1.5]
            "#,
        )
        .unwrap();
        assert_eq!(params.population, (20, 30));
        assert_eq!(params.service_duration, (0.5, 1.5));
        assert_eq!(params.arrival_gap, (1.0, 5.0));
        assert_eq!(params.first_arrival, (0.0, 3.0));
    }

    #[test]
    fn toml_with_invalid_ranges_is_rejected() {
        let err = QueueParams::from_toml_str("population = [10, 2]").unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfiguration(_)));

        let err = QueueParams::from_toml_str("population = \"many\"").unwrap_err();
        assert!(matches!(err, SimulationError::Config(_)));
    }
}
