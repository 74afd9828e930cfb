//! Command line driver for the gemfall cascade engine.
//!
//! Creates a board from a seed, resolves the cascade with real clear-delay
//! pacing (or none with `--headless`) and prints the boards before and after.

use std::{process::ExitCode, thread, time::Duration};

use clap::Parser;
use gemfall_core::{Grid, Palette, PaletteError};
use gemfall_engine::{
    CascadeConfig, CascadeError, CascadeObserver, CascadeResolver, CascadeStats, CascadeStep,
};
use gemfall_generator::{GemSeed, GemSource, RandomGemSource};

use self::log_observer::LogObserver;

mod log_observer;

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

    /// Seed of the gem source, as 64 hex digits. Random if omitted.
    #[arg(long, value_name = "HEX")]
    seed: Option<GemSeed>,

    /// Pause between highlighting matches and clearing them.
    #[arg(long, value_name = "MILLIS", default_value_t = 500)]
    clear_delay_ms: u64,

    /// Stop the cascade after this many cycles.
    #[arg(long, value_name = "COUNT")]
    max_cycles: Option<usize>,

    /// Resolve without pausing.
    #[arg(long)]
    headless: bool,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
enum CliError {
    #[display("{_0}")]
    Palette(#[from] PaletteError),
    #[display("{_0}")]
    Cascade(#[from] CascadeError),
}

fn main() -> ExitCode {
    better_panic::install();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn config(args: &Args) -> Result<CascadeConfig, PaletteError> {
    Ok(CascadeConfig::default()
        .with_size(args.width, args.height)
        .with_palette(Palette::new(args.palette)?)
        .with_clear_delay(Duration::from_millis(args.clear_delay_ms)))
}

fn run(args: &Args) -> Result<CascadeStats, CliError> {
    let config = config(args)?;
    let seed = args.seed.unwrap_or_else(GemSeed::random);
    let source = RandomGemSource::with_seed(config.palette, seed);
    let mut resolver = CascadeResolver::initialize(config, source)?;

    println!("Seed:");
    println!("  {seed}");
    println!();
    print_grid("Initial board:", resolver.grid());

    let mut observer = LogObserver::default();
    let stats = if args.headless {
        resolver.run_until_stable(&mut observer, args.max_cycles)?
    } else {
        drive_paced(&mut resolver, &mut observer, args.max_cycles)?
    };

    print_grid("Final board:", resolver.grid());
    println!("Stats:");
    println!("  cycles: {}", stats.cycles);
    println!("  cleared: {}", stats.cleared);
    println!("  moved: {}", stats.moved);
    println!("  spawned: {}", stats.spawned);
    Ok(stats)
}

fn drive_paced<S, O>(
    resolver: &mut CascadeResolver<S>,
    observer: &mut O,
    max_cycles: Option<usize>,
) -> Result<CascadeStats, CascadeError>
where
    S: GemSource,
    O: CascadeObserver,
{
    resolver.begin_cascade_if_idle();
    loop {
        match resolver.advance(observer)? {
            CascadeStep::Matched { pause, .. } => {
                resolver.check_cycle_limit(max_cycles)?;
                thread::sleep(pause);
            }
            CascadeStep::Stable(stats) => return Ok(stats),
            CascadeStep::Idle => return Ok(*resolver.stats()),
            CascadeStep::Cleared { .. }
            | CascadeStep::Collapsed { .. }
            | CascadeStep::Refilled { .. } => {}
        }
    }
}

fn print_grid(title: &str, grid: &Grid) {
    println!("{title}");
    for row in grid.to_string().lines() {
        println!("  {row}");
    }
    println!();
}
