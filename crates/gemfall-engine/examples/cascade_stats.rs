//! Example sampling cascade statistics over many random boards.
//!
//! This example shows how to:
//! - Initialize boards from random seeds with a `CascadeConfig`
//! - Resolve them headlessly with `run_until_stable`
//! - Report cycle counts and the seed of the longest cascade
//! - Count boards that never settle, which is common with fewer than three kinds
//!
//! # Usage
//!
//! ```sh
//! cargo run --example cascade_stats
//! ```
//!
//! Change the board shape and palette:
//!
//! ```sh
//! cargo run --example cascade_stats -- --width 10 --height 12 --palette 4
//! ```
//!
//! Control the number of sampled boards (default: 10000):
//!
//! ```sh
//! cargo run --example cascade_stats -- --samples 100000
//! ```

use std::process;

use clap::Parser;
use gemfall_core::{Grid, Palette};
use gemfall_engine::{CascadeConfig, CascadeError, CascadeResolver, CascadeStats, NoopObserver};
use gemfall_generator::{GemSeed, RandomGemSource};
use rayon::prelude::*;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Number of columns.
    #[arg(long, value_name = "COUNT", default_value_t = 8)]
    width: usize,

    /// Number of rows.
    #[arg(long, value_name = "COUNT", default_value_t = 8)]
    height: usize,

    /// Number of gem kinds.
    #[arg(long, value_name = "COUNT", default_value_t = 5)]
    palette: usize,

    /// Number of boards to sample.
    #[arg(long, value_name = "COUNT", default_value_t = 10_000)]
    samples: usize,

    /// Cycles after which a cascade is abandoned.
    #[arg(long, value_name = "COUNT", default_value_t = 1_000)]
    max_cycles: usize,
}

#[derive(Debug)]
struct Sample {
    seed: GemSeed,
    initial: Grid,
    stats: CascadeStats,
    settled: bool,
}

fn main() {
    let args = Args::parse();
    if args.samples == 0 {
        eprintln!("--samples must be at least 1.");
        process::exit(1);
    }

    let palette = match Palette::new(args.palette) {
        Ok(palette) => palette,
        Err(err) => {
            eprintln!("{err}");
            process::exit(2);
        }
    };
    let config = CascadeConfig::default()
        .with_size(args.width, args.height)
        .with_palette(palette);
    if let Err(err) = config.validate() {
        eprintln!("{err}");
        process::exit(2);
    }

    let samples = match (0..args.samples)
        .into_par_iter()
        .map(|_| sample(config, args.max_cycles))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(samples) => samples,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    print_report(&config, &samples);
}

fn sample(config: CascadeConfig, max_cycles: usize) -> Result<Sample, CascadeError> {
    let seed = GemSeed::random();
    let source = RandomGemSource::with_seed(config.palette, seed);
    let mut resolver = CascadeResolver::initialize(config, source)?;
    let initial = resolver.grid().clone();
    let settled = match resolver.run_until_stable(&mut NoopObserver, Some(max_cycles)) {
        Ok(_) => true,
        Err(CascadeError::CycleLimitExceeded { .. }) => false,
        Err(err) => return Err(err),
    };
    Ok(Sample {
        seed,
        initial,
        stats: *resolver.stats(),
        settled,
    })
}

#[expect(clippy::cast_precision_loss)]
fn print_report(config: &CascadeConfig, samples: &[Sample]) {
    let count = samples.len();
    let stable = samples.iter().filter(|s| s.stats.cycles == 0).count();
    let unsettled = samples.iter().filter(|s| !s.settled).count();
    let total_cycles: usize = samples.iter().map(|s| s.stats.cycles).sum();
    let total_cleared: usize = samples.iter().map(|s| s.stats.cleared).sum();

    println!("Board:");
    println!("  Size: {}x{}", config.width, config.height);
    println!("  Kinds: {}", config.palette.size());
    println!("  Samples: {count}");
    println!();

    println!("Stats:");
    println!(
        "  Initially stable: {stable} ({:.1}%)",
        stable as f64 * 100.0 / count as f64
    );
    println!(
        "  Unsettled after limit: {unsettled} ({:.1}%)",
        unsettled as f64 * 100.0 / count as f64
    );
    println!(
        "  Average cycles: {:.3}",
        total_cycles as f64 / count as f64
    );
    println!(
        "  Average cleared: {:.3}",
        total_cleared as f64 / count as f64
    );

    let mut histogram = Vec::<usize>::new();
    for s in samples.iter().filter(|s| s.settled) {
        if histogram.len() <= s.stats.cycles {
            histogram.resize(s.stats.cycles + 1, 0);
        }
        histogram[s.stats.cycles] += 1;
    }
    println!();
    println!("Cycles (settled boards):");
    for (cycles, n) in histogram.iter().enumerate().filter(|(_, n)| **n > 0) {
        println!("  {cycles}: {n}");
    }

    if let Some(longest) = samples
        .iter()
        .filter(|s| s.settled)
        .max_by_key(|s| s.stats.cycles)
    {
        println!();
        println!("Longest cascade:");
        println!("  Seed: {}", longest.seed);
        println!("  Cycles: {}", longest.stats.cycles);
        println!("  Initial board:");
        for row in longest.initial.to_string().lines() {
            println!("    {row}");
        }
    }
}
