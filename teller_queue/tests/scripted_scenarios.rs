// Scripted-variate scenarios: every draw is known in advance, so every derived
// timestamp can be asserted exactly.

use teller_queue::report::{self, SimulationOutput};
use teller_queue::{QueueParams, QueueSimulation, ScriptedSource, SimulationError};

fn open_population(max: u64) -> QueueParams {
    QueueParams {
        population: (1, max),
        ..Default::default()
    }
}

fn column(sim: &QueueSimulation, f: fn(&teller_queue::ClientRecord) -> f64) -> Vec<f64> {
    sim.records().iter().map(f).collect()
}

// ============================================================================
// Level 1: Hand-computed sequences
// ============================================================================

#[test]
fn given_busy_teller_when_second_client_arrives_then_queues_until_free() {
    // GIVEN: four clients, first at t=1, gaps of 2, services 3, 1, 1, 1
    let mut source = ScriptedSource::new([1.0, 2.0, 2.0, 2.0, 3.0, 1.0, 1.0, 1.0], [4]);

    // WHEN: the simulation is built
    let sim = QueueSimulation::new(&open_population(15), &mut source).unwrap();

    // THEN: the second client waits for the first to leave
    assert_eq!(column(&sim, |r| r.arrival_time()), vec![1.0, 3.0, 5.0, 7.0]);
    assert_eq!(column(&sim, |r| r.service_begin()), vec![1.0, 4.0, 5.0, 7.0]);
    assert_eq!(column(&sim, |r| r.service_end()), vec![4.0, 5.0, 6.0, 8.0]);
    assert_eq!(column(&sim, |r| r.wait_in_queue()), vec![0.0, 1.0, 0.0, 0.0]);
    assert_eq!(column(&sim, |r| r.idle_time()), vec![0.0, 0.0, 0.0, 1.0]);
    assert_eq!(column(&sim, |r| r.time_in_system()), vec![3.0, 2.0, 1.0, 1.0]);

    // THEN: aggregates follow
    assert_eq!(sim.average_waiting_time().unwrap(), 0.25);
    assert_eq!(sim.average_time_in_system().unwrap(), 1.75);
    assert_eq!(sim.max_service_duration(), 3.0);
    assert_eq!(sim.waited_client_count(), 1);
}

#[test]
fn given_long_services_when_clients_pile_up_then_waits_accumulate() {
    // GIVEN: three clients one minute apart, each needing five minutes
    let mut source = ScriptedSource::new([0.0, 1.0, 1.0, 5.0, 5.0, 5.0], [3]);

    // WHEN
    let sim = QueueSimulation::new(&open_population(15), &mut source).unwrap();

    // THEN: each later client waits longer, teller never idles
    assert_eq!(column(&sim, |r| r.wait_in_queue()), vec![0.0, 4.0, 8.0]);
    assert_eq!(column(&sim, |r| r.idle_time()), vec![0.0, 0.0, 0.0]);
    assert_eq!(sim.waited_client_count(), 2);
    assert_eq!(sim.average_waiting_time().unwrap(), 4.0);
    assert_eq!(sim.utilisation(), 1.0);
}

#[test]
fn given_sparse_arrivals_when_simulated_then_nobody_waits() {
    // GIVEN: gaps of 5, services of 1
    let mut source = ScriptedSource::new([2.0, 5.0, 5.0, 1.0, 1.0, 1.0], [3]);

    // WHEN
    let sim = QueueSimulation::new(&open_population(15), &mut source).unwrap();

    // THEN: no waits, four minutes idle before each later client
    assert_eq!(sim.waited_client_count(), 0);
    assert_eq!(sim.average_waiting_time().unwrap(), 0.0);
    assert_eq!(column(&sim, |r| r.idle_time()), vec![0.0, 4.0, 4.0]);
    assert_eq!(sim.total_idle_time(), 8.0);
}

// ============================================================================
// Level 2: Construction failures are atomic
// ============================================================================

#[test]
fn given_inverted_population_when_built_then_invalid_configuration() {
    let params = QueueParams {
        population: (15, 5),
        ..Default::default()
    };
    let mut source = ScriptedSource::new([1.0; 40], [10]);

    let result = QueueSimulation::new(&params, &mut source);

    assert!(matches!(
        result,
        Err(SimulationError::InvalidConfiguration(_))
    ));
    // validation happens before any draw
    assert_eq!(source.remaining_integers(), 1);
    assert_eq!(source.remaining_reals(), 40);
}

#[test]
fn given_inverted_service_range_when_built_then_invalid_configuration() {
    let params = QueueParams {
        service_duration: (5.0, 1.0),
        ..Default::default()
    };
    let mut source = ScriptedSource::new([1.0; 40], [10]);

    assert!(matches!(
        QueueSimulation::new(&params, &mut source),
        Err(SimulationError::InvalidConfiguration(_))
    ));
}

#[test]
fn given_script_outside_gap_range_when_built_then_error_propagates() {
    // gap of 0.5 is below the default minimum of 1
    let mut source = ScriptedSource::new([1.0, 0.5, 2.0, 2.0], [2]);

    let result = QueueSimulation::new(&open_population(15), &mut source);

    assert!(matches!(
        result,
        Err(SimulationError::ScriptedValueOutOfRange { .. })
    ));
}

// ============================================================================
// Level 3: Reports of a scripted run
// ============================================================================

#[test]
fn given_scripted_run_when_reported_then_table_and_json_agree() {
    let mut source = ScriptedSource::new([1.0, 2.0, 2.0, 2.0, 3.0, 1.0, 1.0, 1.0], [4]);
    let sim = QueueSimulation::new(&open_population(15), &mut source).unwrap();

    let table = report::render_table(&sim).unwrap();
    assert!(table.contains("Average Time In System  : 1.75 minutes"));
    assert!(table.contains("Maximum Service Time    : 3.00 minutes"));
    assert!(table.contains("|  4 |    7.00 |          7.00 |        8.00 |      1.00 |  0.00 |   1.00 |"));

    let output = SimulationOutput::from_simulation(&sim, None).unwrap();
    assert_eq!(output.clients.len(), 4);
    assert_eq!(output.summary.waited_clients, 1);
    assert!(output.seed.is_none());
}

#[test]
fn given_shipped_config_when_loaded_then_overrides_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/configs/busy_branch.toml");

    let params = QueueParams::load(path).unwrap();

    assert_eq!(params.population, (20, 40));
    assert_eq!(params.arrival_gap, (0.5, 2.5));
    assert_eq!(params.service_duration, QueueParams::default().service_duration);
}

#[test]
fn given_missing_config_when_loaded_then_io_error() {
    let result = QueueParams::load("/definitely/not/here.toml");
    assert!(matches!(result, Err(SimulationError::Io(_))));
}

#[test]
fn given_nan_in_script_when_built_then_no_simulation() {
    // GIVEN: a NaN first arrival
    let mut source = ScriptedSource::new([f64::NAN, 2.0, 1.0, 1.0], [2]);

    // WHEN
    let result = QueueSimulation::new(&open_population(15), &mut source);

    // THEN: rejected before any record is derived
    assert!(matches!(
        result,
        Err(SimulationError::ScriptedValueOutOfRange { .. })
    ));
}
