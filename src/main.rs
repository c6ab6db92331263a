//! Infinite Goban: a shared, unbounded Go board.
//!
//! ## Usage
//!
//! - `infinite-goban` - Show a demo
//! - `infinite-goban console` - Drive a board over a line protocol on stdin
//! - `infinite-goban demo` - Run the capture demo
//! - `infinite-goban stress` - Hammer a board from several player threads

use std::io;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use log::{LevelFilter, info};

use infinite_goban::board::{Color, Rect, Stone};
use infinite_goban::console::Console;
use infinite_goban::constants::{
    DEFAULT_REGION_SIZE, STRESS_ATTEMPTS, STRESS_PLAYERS, STRESS_SPREAD, STRESS_TICK_MS,
};
use infinite_goban::engine::{EngineConfig, GobanEngine, TickReport};
use infinite_goban::error::{EngineError, PlacementError};
use infinite_goban::store::MemoryStore;

/// Infinite Goban: a shared, unbounded Go board
#[derive(Parser)]
#[command(name = "infinite-goban")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Side length of a notification region
    #[arg(long, global = true, default_value_t = NonZeroU32::new(DEFAULT_REGION_SIZE).unwrap_or(NonZeroU32::MIN))]
    region_size: NonZeroU32,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read commands from stdin and answer on stdout
    Console,
    /// Surround and capture a group, printing each tick
    Demo,
    /// Place random stones from several threads while ticking
    Stress(StressArgs),
}

#[derive(Args, Clone, Copy)]
struct StressArgs {
    /// Number of player threads
    #[arg(long, default_value_t = STRESS_PLAYERS)]
    players: usize,
    /// Placement attempts per player
    #[arg(long, default_value_t = STRESS_ATTEMPTS)]
    attempts: usize,
    /// Stones land in [-spread, spread] on both axes
    #[arg(long, default_value_t = STRESS_SPREAD)]
    spread: i64,
    /// Milliseconds between ticks
    #[arg(long, default_value_t = STRESS_TICK_MS)]
    tick_ms: u64,
    /// Seed for the random placements
    #[arg(long, default_value_t = 1)]
    seed: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let engine = GobanEngine::new(MemoryStore::new(), EngineConfig::with_region_size(cli.region_size));

    match cli.command {
        Some(Commands::Console) => {
            let mut console = Console::new(engine);
            console
                .run(io::stdin().lock(), io::stdout())
                .context("console session failed")?;
            info!("session ended: {:?}", console.engine().stats()?);
            Ok(())
        }
        Some(Commands::Stress(args)) => run_stress(&engine, args),
        Some(Commands::Demo) | None => run_demo(&engine),
    }
}

fn print_report(report: &TickReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report).context("serializing tick report")?);
    Ok(())
}

fn run_demo(engine: &GobanEngine<MemoryStore>) -> Result<()> {
    println!("Infinite Goban: capture demo\n");

    // White takes the four points around the origin.
    println!("=== Tick 1: white surrounds (0, 0) ===");
    for (x, y) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
        engine.place(Stone::new(x, y, Color::White, "white-player"))?;
    }
    print_report(&engine.process()?)?;

    match engine.place(Stone::new(0, 0, Color::Black, "black-player")) {
        Err(EngineError::Illegal(PlacementError::Suicide)) => {
            println!("Black at (0, 0) is refused: suicide\n")
        }
        other => return Err(anyhow!("expected suicide, got {other:?}")),
    }

    // Black closes every outside liberty of the four white stones.
    println!("=== Tick 2: black encircles the white stones ===");
    for (x, y) in [(2, 0), (-2, 0), (0, 2), (0, -2), (1, 1), (1, -1), (-1, 1), (-1, -1)] {
        engine.place(Stone::new(x, y, Color::Black, "black-player"))?;
    }
    print_report(&engine.process()?)?;

    println!("=== Tick 3: black plays the center and captures ===");
    engine.place(Stone::new(0, 0, Color::Black, "black-player"))?;
    print_report(&engine.process()?)?;

    let stones = engine.retrieve(Rect::new(-2, -2, 2, 2))?;
    println!("Stones left near the origin: {}", stones.len());
    println!("Captures: {:?}", engine.stats()?);
    engine.verify()?;
    Ok(())
}

fn run_stress(engine: &GobanEngine<MemoryStore>, args: StressArgs) -> Result<()> {
    let done = AtomicBool::new(false);
    let accepted = AtomicUsize::new(0);
    let occupied = AtomicUsize::new(0);
    let suicide = AtomicUsize::new(0);

    let (ticks, captured) = thread::scope(|scope| -> Result<(usize, usize)> {
        let ticker = scope.spawn(|| -> Result<(usize, usize)> {
            let mut ticks = 0;
            let mut captured = 0;
            loop {
                let finished = done.load(Ordering::Acquire);
                thread::sleep(Duration::from_millis(args.tick_ms));
                let report = engine.process()?;
                if report.tick > 0 {
                    ticks += 1;
                }
                captured += report.captures.iter().map(|c| c.points.len()).sum::<usize>();
                if finished {
                    return Ok((ticks, captured));
                }
            }
        });

        let players: Vec<_> = (0..args.players)
            .map(|i| {
                let (accepted, occupied, suicide) = (&accepted, &occupied, &suicide);
                scope.spawn(move || -> Result<()> {
                    let mut rng = fastrand::Rng::with_seed(args.seed.wrapping_add(i as u64));
                    let color = if i % 2 == 0 { Color::Black } else { Color::White };
                    let owner = format!("player-{i}");
                    for _ in 0..args.attempts {
                        let x = rng.i64(-args.spread..=args.spread);
                        let y = rng.i64(-args.spread..=args.spread);
                        match engine.place(Stone::new(x, y, color, owner.as_str())) {
                            Ok(()) => accepted.fetch_add(1, Ordering::Relaxed),
                            Err(EngineError::Illegal(PlacementError::Occupied)) => {
                                occupied.fetch_add(1, Ordering::Relaxed)
                            }
                            Err(EngineError::Illegal(PlacementError::Suicide)) => {
                                suicide.fetch_add(1, Ordering::Relaxed)
                            }
                            Err(e) => return Err(e.into()),
                        };
                    }
                    Ok(())
                })
            })
            .collect();

        let results: Vec<Result<()>> = players
            .into_iter()
            .map(|p| p.join().unwrap_or_else(|_| Err(anyhow!("player thread panicked"))))
            .collect();
        done.store(true, Ordering::Release);
        let totals = ticker
            .join()
            .unwrap_or_else(|_| Err(anyhow!("ticker thread panicked")))?;
        results.into_iter().collect::<Result<()>>()?;
        Ok(totals)
    })?;

    engine.verify().context("ledger disagrees with the board after stress run")?;
    let stats = engine.stats()?;
    println!(
        "{} players x {} attempts over {} ticks",
        args.players, args.attempts, ticks
    );
    println!(
        "accepted {}, occupied {}, suicide {}",
        accepted.load(Ordering::Relaxed),
        occupied.load(Ordering::Relaxed),
        suicide.load(Ordering::Relaxed)
    );
    println!(
        "{} stones in {} groups on the board, {} captured",
        stats.stones, stats.groups, captured
    );
    Ok(())
}
