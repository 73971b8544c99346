//! Renderings of a built simulation: the boxed console table, a per-client
//! CSV and a JSON document with parameters, records and summary.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::params::QueueParams;
use crate::record::ClientRecord;
use crate::simulation::{QueueSimulation, SummaryStats};

const CSV_HEADER: [&str; 7] = [
    "client",
    "arrival_time",
    "service_begin",
    "service_end",
    "idle_time",
    "wait_in_queue",
    "time_in_system",
];

/// Render the client table followed by the four summary lines
///
/// All times are printed with two decimals.
pub fn render_table(simulation: &QueueSimulation) -> Result<String> {
    let header = format!(
        "| {:>2} | {:>7} | {:>13} | {:>11} | {:>9} | {:>5} | {:>6} |",
        "ID", "Arrival", "Service Begin", "Service End", "Idle Time", "Wait", "System"
    );
    let rule = "=".repeat(header.chars().count());

    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{}", header);
    let _ = writeln!(out, "{}", rule);
    for (idx, record) in simulation.records().iter().enumerate() {
        let _ = writeln!(
            out,
            "| {:>2} | {:>7.2} | {:>13.2} | {:>11.2} | {:>9.2} | {:>5.2} | {:>6.2} |",
            idx + 1,
            record.arrival_time(),
            record.service_begin(),
            record.service_end(),
            record.idle_time(),
            record.wait_in_queue(),
            record.time_in_system(),
        );
    }
    let _ = writeln!(out, "{}", rule);
    out.push_str(&render_statistics(&simulation.summary()?));
    Ok(out)
}

/// The four headline statistics, one per line
pub fn render_statistics(summary: &SummaryStats) -> String {
    format!(
        "Average Waiting Time    : {:.2} minutes\n\
         Average Time In System  : {:.2} minutes\n\
         Maximum Service Time    : {:.2} minutes\n\
         Clients Who Waited      : {} out of {}\n",
        summary.average_wait,
        summary.average_time_in_system,
        summary.max_service_duration,
        summary.waited_clients,
        summary.clients,
    )
}

/// Write one CSV row per client, in arrival order
pub fn write_csv<W: io::Write>(simulation: &QueueSimulation, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for (idx, record) in simulation.records().iter().enumerate() {
        wtr.write_record(&[
            (idx + 1).to_string(),
            format!("{:.2}", record.arrival_time()),
            format!("{:.2}", record.service_begin()),
            format!("{:.2}", record.service_end()),
            format!("{:.2}", record.idle_time()),
            format!("{:.2}", record.wait_in_queue()),
            format!("{:.2}", record.time_in_system()),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Everything needed to reproduce and inspect one run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationOutput {
    /// `None` when the run was seeded from OS entropy
    pub seed: Option<u64>,
    pub params: QueueParams,
    pub summary: SummaryStats,
    pub clients: Vec<ClientRecord>,
}

impl SimulationOutput {
    pub fn from_simulation(simulation: &QueueSimulation, seed: Option<u64>) -> Result<Self> {
        Ok(SimulationOutput {
            seed,
            params: simulation.params().clone(),
            summary: simulation.summary()?,
            clients: simulation.records().to_vec(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
