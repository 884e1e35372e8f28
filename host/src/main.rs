use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use maze_host::{parse_coord, run, HostError, MazeConfig, MazeReport};

#[derive(Debug, Parser)]
#[command(name = "maze", version, about = "Carve perfect mazes and solve them by backtracking")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Carve a maze, solve it and save the report as JSON
    Generate {
        /// Columns (default 20, or the config file's value)
        width: Option<usize>,
        /// Rows (default 20, or the config file's value)
        height: Option<usize>,
        /// LCG seed; random when omitted
        #[arg(long)]
        seed: Option<u32>,
        /// Start cell as X,Y; random when omitted
        #[arg(long, value_parser = parse_coord)]
        start: Option<[usize; 2]>,
        /// End cell as X,Y; random when omitted
        #[arg(long, value_parser = parse_coord)]
        end: Option<[usize; 2]>,
        /// Keep one frame per wall removal / path change
        #[arg(long)]
        record: bool,
        /// JSON config file; command-line values override it
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output file (defaults to <seed>_maze.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replay a saved report's moves against its grid
    Verify {
        report: PathBuf,
    },
}

fn main() {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Generate {
            width,
            height,
            seed,
            start,
            end,
            record,
            config,
            output,
        } => load_config(config).and_then(|mut config| {
            if let Some(width) = width {
                config.width = width;
            }
            if let Some(height) = height {
                config.height = height;
            }
            config.seed = seed.or(config.seed);
            config.start = start.or(config.start);
            config.end = end.or(config.end);
            config.record |= record;
            generate_command(&config, output)
        }),
        Command::Verify { report } => verify_command(report),
    };

    if let Err(e) = result {
        if e.is_fatal() {
            // a broken invariant means a bug, not bad input
            tracing::error!("Fatal: {}", e);
            std::process::abort();
        }
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<PathBuf>) -> Result<MazeConfig, HostError> {
    match path {
        Some(path) => MazeConfig::load(&path),
        None => Ok(MazeConfig::default()),
    }
}

fn generate_command(config: &MazeConfig, output: Option<PathBuf>) -> Result<(), HostError> {
    println!("📋 Generating maze");
    println!("  Size: {}x{} cells", config.width, config.height);
    println!();

    let started = Instant::now();
    let report = run(config)?;
    println!("  Time: {:.3}s", started.elapsed().as_secs_f64());
    println!();

    println!("✅ Maze carved and solved!");
    println!("  Seed: {}", report.seed);
    println!("  Start: ({}, {})  End: ({}, {})", report.start[0], report.start[1], report.end[0], report.end[1]);
    println!("  Walls removed: {} (max stack depth {})", report.walls_removed, report.max_depth);
    println!("  Path length: {} cells, {} moves", report.path.len(), report.moves.len());
    if let Some(frames) = &report.frames {
        println!("  Frames recorded: {}", frames.len());
    }
    println!();

    let output = output.unwrap_or_else(|| PathBuf::from(format!("{}_maze.json", report.seed)));
    report.save(&output)?;
    println!("💾 Report saved to: {}", output.display());
    println!("{}", "=".repeat(70));
    Ok(())
}

fn verify_command(path: PathBuf) -> Result<(), HostError> {
    let report = MazeReport::load(&path)?;
    tracing::info!("Verifying {} moves for seed {}", report.moves.len(), report.seed);

    if report.verify() {
        println!("✅ Path is valid: {} moves reach ({}, {})", report.moves.len(), report.end[0], report.end[1]);
        Ok(())
    } else {
        eprintln!("❌ Path is invalid for seed {}", report.seed);
        std::process::exit(2);
    }
}
