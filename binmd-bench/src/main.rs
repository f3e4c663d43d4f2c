//! Benchmark driver for the binmd particle simulation
//!
//! Mirrors the classic cutoff-radius particle benchmark interface: fixed
//! step count, periodic snapshot output by the leader worker and a one-line
//! summary appended per run for scaling studies.

use std::env;
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};

use binmd::output::append_summary;
use binmd::runtime::SimulationBuilder;

struct Options {
    num_particles: usize,
    num_workers: usize,
    snapshot_path: Option<String>,
    summary_path: Option<String>,
    seed: Option<u64>,
    no_output: bool,
}

fn print_help() {
    println!("Options:");
    println!("-h to see this help");
    println!("-n <int> to set the number of particles");
    println!("-p <int> to set the number of worker threads");
    println!("-o <filename> to specify the snapshot output file name");
    println!("-s <filename> to specify a summary file name");
    println!("--seed <int> to set the particle placement seed");
    println!("-no turns off all correctness checks and particle output");
}

/// Flag scan over the raw argument list; unknown arguments are ignored.
fn parse_args() -> Result<Option<Options>> {
    let args = env::args().collect::<Vec<_>>();
    if args.iter().any(|a| a == "-h") {
        print_help();
        return Ok(None);
    }

    let find_value = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
    };
    let parse_value = |flag: &str, default: usize| -> Result<usize> {
        match find_value(flag) {
            Some(value) => value
                .parse::<usize>()
                .with_context(|| format!("invalid value for {}: {}", flag, value)),
            None => Ok(default),
        }
    };

    Ok(Some(Options {
        num_particles: parse_value("-n", 1000)?,
        num_workers: parse_value("-p", 2)?,
        snapshot_path: find_value("-o").cloned(),
        summary_path: find_value("-s").cloned(),
        seed: match find_value("--seed") {
            Some(value) => Some(
                value
                    .parse::<u64>()
                    .with_context(|| format!("invalid value for --seed: {}", value))?,
            ),
            None => None,
        },
        no_output: args.iter().any(|a| a == "-no"),
    }))
}

fn run() -> Result<()> {
    let options = match parse_args()? {
        Some(options) => options,
        None => return Ok(()), // -h
    };

    let mut builder = SimulationBuilder::new()
        .with_particles(options.num_particles)
        .with_workers(options.num_workers)
        .with_diagnostics(!options.no_output);
    if let Some(seed) = options.seed {
        builder = builder.with_seed(seed);
    }
    if let Some(path) = &options.snapshot_path {
        builder = builder.with_snapshot_path(path);
    }
    let mut simulation = builder.build()?;

    let start = Instant::now();
    let stats = simulation.run()?;
    let seconds = start.elapsed().as_secs_f64();

    print!(
        "n = {}, simulation time = {} seconds",
        options.num_particles, seconds
    );
    if let Some(stats) = stats {
        //
        // A correct run keeps the minimum pair distance above 0.4 cutoffs
        // (typical 0.7-0.8) and the average around 0.95; far lower values
        // mean particles pass through each other without interacting.
        //
        print!(
            ", absmin = {:.6}, absavg = {:.6}",
            stats.min_norm, stats.avg_norm
        );
        if stats.min_norm < 0.4 {
            print!("\nThe minimum distance is below 0.4 meaning that some particle is not interacting");
        }
        if stats.avg_norm < 0.8 {
            print!("\nThe average distance is below 0.8 meaning that most particles are not interacting");
        }
    }
    println!();

    if let Some(path) = &options.summary_path {
        if let Err(error) = append_summary(path, options.num_particles, options.num_workers, seconds)
        {
            log::warn!("cannot append to summary file {}: {}", path, error);
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(error) = run() {
        eprintln!("FAILURE: {:#}", error);
        process::exit(1);
    }
}
