//! Bank teller queue simulation
//!
//! Usage:
//!   cargo run --release -p teller_queue -- [--config params.toml] [--seed N]
//!       [--replications N] [--threads N] [--csv clients.csv] [--json run.json]
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::env;
use std::fs::File;
use std::path::PathBuf;
use std::process;

use teller_queue::replication::simple_progress_reporter;
use teller_queue::report::{self, SimulationOutput};
use teller_queue::{
    QueueParams, QueueSimulation, ReplicationRunner, ReplicationSummary, Result, RngSource,
};
use tracing::{info, warn};

#[derive(Debug, Default)]
struct CliArgs {
    config: Option<PathBuf>,
    seed: Option<u64>,
    replications: Option<usize>,
    threads: Option<usize>,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {} [--config FILE] [--seed N] [--replications N] [--threads N] [--csv FILE] [--json FILE]",
        program
    )
}

fn parse_args(args: &[String]) -> std::result::Result<CliArgs, String> {
    let mut parsed = CliArgs::default();
    let mut iter = args.iter().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("Missing value for {}", flag))
        };
        match flag.as_str() {
            "--config" => parsed.config = Some(PathBuf::from(value()?)),
            "--seed" => parsed.seed = Some(parse_number(flag, &value()?)?),
            "--replications" => parsed.replications = Some(parse_number(flag, &value()?)?),
            "--threads" => parsed.threads = Some(parse_number(flag, &value()?)?),
            "--csv" => parsed.csv = Some(PathBuf::from(value()?)),
            "--json" => parsed.json = Some(PathBuf::from(value()?)),
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }
    if parsed.replications == Some(0) {
        return Err("--replications must be at least 1".to_string());
    }
    if parsed.threads == Some(0) {
        return Err("--threads must be at least 1".to_string());
    }
    Ok(parsed)
}

impl CliArgs {
    fn replicating(&self) -> bool {
        self.replications.is_some_and(|n| n > 1)
    }

    /// Flags that have no effect in the selected mode
    fn ignored_flags(&self) -> Vec<&'static str> {
        let mut ignored = Vec::new();
        if self.replicating() {
            if self.csv.is_some() {
                ignored.push("--csv");
            }
        } else if self.threads.is_some() {
            ignored.push("--threads");
        }
        ignored
    }
}

fn parse_number<T: std::str::FromStr>(flag: &str, raw: &str) -> std::result::Result<T, String> {
    raw.parse()
        .map_err(|_| format!("Invalid value for {}: {}", flag, raw))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("{}", e);
        eprintln!("{}", usage(&args[0]));
        process::exit(2);
    });

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &CliArgs) -> Result<()> {
    let params = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "loading parameters");
            QueueParams::load(path)?
        }
        None => QueueParams::default(),
    };

    for flag in cli.ignored_flags() {
        warn!(flag, "flag has no effect in this mode");
    }

    match cli.replications {
        Some(n) if n > 1 => run_replications(cli, params, n),
        _ => run_single(cli, &params),
    }
}

fn run_single(cli: &CliArgs, params: &QueueParams) -> Result<()> {
    let mut source = match cli.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };
    let simulation = QueueSimulation::new(params, &mut source)?;

    print!("{}", report::render_table(&simulation)?);

    if let Some(path) = &cli.csv {
        report::write_csv(&simulation, File::create(path)?)?;
        info!(path = %path.display(), "wrote client CSV");
    }
    if let Some(path) = &cli.json {
        SimulationOutput::from_simulation(&simulation, cli.seed)?.write_json(path)?;
        info!(path = %path.display(), "wrote simulation JSON");
    }
    Ok(())
}

fn run_replications(cli: &CliArgs, params: QueueParams, replications: usize) -> Result<()> {
    let base_seed = cli.seed.unwrap_or(42);
    println!("=== Teller Queue Replications ===");
    println!("Replications: {} (base seed {})\n", replications, base_seed);

    let mut runner = ReplicationRunner::new(replications, base_seed, params)
        .progress(simple_progress_reporter((replications / 10).max(1)));
    if let Some(threads) = cli.threads {
        runner = runner.num_threads(threads);
    }
    let results = runner.run()?;
    let summary = ReplicationSummary::from_results(&results)?;

    println!("Failed runs: {}", summary.failed);
    let rows = [
        ("Clients", &summary.clients),
        ("Average Waiting Time", &summary.average_wait),
        ("Average Time In System", &summary.average_time_in_system),
        ("Maximum Service Time", &summary.max_service_duration),
        ("Fraction Who Waited", &summary.waited_fraction),
        ("Teller Utilisation", &summary.utilisation),
    ];
    println!(
        "{:<24} {:>8} {:>8} {:>8} {:>8}",
        "Statistic", "Mean", "Std", "Min", "Max"
    );
    for (name, stat) in rows {
        println!(
            "{:<24} {:>8.2} {:>8.2} {:>8.2} {:>8.2}",
            name, stat.mean, stat.std, stat.min, stat.max
        );
    }

    if let Some(path) = &cli.json {
        std::fs::write(path, serde_json::to_string_pretty(&summary)?)?;
        info!(path = %path.display(), "wrote replication summary JSON");
    }
    Ok(())
}
