//! hpcimg CLI - height-map synthesis and RGB morphology

mod io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use hpcimg_algorithms::morphology::{
    ElementLoader, ElementShape, MorphologyContext, OpeningClosing, Operation, SynthesizedElement,
};
use hpcimg_algorithms::strategy::StrategySelector;
use hpcimg_algorithms::terrain::{DiamondSquareParams, HeightMapSynthesis, Seed, MAX};
use hpcimg_parallel::ExecutionStrategy;

use crate::io::{next_free_path, read_image, write_grid, write_image, PngElementLoader};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "hpcimg")]
#[command(author, version, about = "Height-map synthesis and RGB morphology", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Execution strategy: sequential, threaded, offloaded
    #[arg(short, long, global = true, default_value = "sequential")]
    strategy: String,

    /// Worker threads for the threaded strategy (0 = all cores)
    #[arg(short, long, global = true, default_value = "0")]
    threads: usize,

    /// Directory results are saved to
    #[arg(short, long, global = true, default_value = ".")]
    output_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a fractal height-map
    DiamondSquare {
        /// Grid side, must be 2^n + 1
        #[arg(long, default_value = "257")]
        size: usize,
        /// Starting perturbation amplitude (0 = no perturbation)
        #[arg(short, long, default_value_t = MAX)]
        max_value: u32,
        /// Fixed seed; the clock is used when absent
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Morphological opening (removes small bright features)
    Opening(MorphologyArgs),
    /// Morphological closing (fills small dark gaps)
    Closing(MorphologyArgs),
}

#[derive(clap::Args)]
struct MorphologyArgs {
    /// Input PNG image
    input: PathBuf,
    /// Structuring element side (odd)
    #[arg(short, long, default_value = "3")]
    element_size: usize,
    /// Synthesized element shape: square, cross, disk
    #[arg(long, default_value = "square")]
    shape: String,
    /// Directory holding StructuringElement<size>.png bitmaps; overrides --shape
    #[arg(long)]
    elements_dir: Option<PathBuf>,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Setting default subscriber failed")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn element_loader(args: &MorphologyArgs) -> Result<Box<dyn ElementLoader>> {
    Ok(match &args.elements_dir {
        Some(dir) => Box::new(PngElementLoader::new(dir)),
        None => {
            let shape: ElementShape = args.shape.parse().context("Invalid structuring element")?;
            Box::new(SynthesizedElement::new(shape))
        }
    })
}

fn run_morphology(
    selector: &StrategySelector,
    strategy: ExecutionStrategy,
    operation: Operation,
    args: &MorphologyArgs,
    output_dir: &Path,
) -> Result<()> {
    let name = match operation {
        Operation::Opening => "Opening",
        Operation::Closing => "Closing",
    };

    let pb = spinner("Reading image...");
    let image = read_image(&args.input)?;
    pb.finish_and_clear();
    info!("Input: {} x {}", image.width(), image.height());

    let loader = element_loader(args)?;
    let context = MorphologyContext::load(Some(&image), loader.as_ref(), args.element_size);
    let engine = selector.morphology(strategy, context)?;

    let pb = spinner(&format!("Running {} ({})...", name.to_lowercase(), strategy));
    let start = Instant::now();
    let result = engine
        .execute(operation)
        .with_context(|| format!("{} unavailable", name))?;
    let elapsed = start.elapsed();
    pb.finish_and_clear();

    let path = next_free_path(output_dir, name);
    let pb = spinner("Writing output...");
    write_image(&result, &path)?;
    pb.finish_and_clear();
    done(name, &path, elapsed);
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let strategy = ExecutionStrategy::parse(&cli.strategy, cli.threads)
        .context("Invalid execution strategy")?;
    let selector = StrategySelector::default();

    match cli.command {
        Commands::DiamondSquare {
            size,
            max_value,
            seed,
        } => {
            let params = DiamondSquareParams {
                size,
                max_value,
                seed: seed.map_or(Seed::Clock, Seed::Fixed),
                corners: None,
            };
            let engine = selector.diamond_square(strategy)?;

            let pb = spinner(&format!("Synthesizing {}x{} height-map ({})...", size, size, strategy));
            let start = Instant::now();
            let grid = engine
                .synthesize(&params)
                .context("Failed to synthesize height-map")?;
            let elapsed = start.elapsed();
            pb.finish_and_clear();

            let stats = grid.statistics()?;
            info!(
                "Height range: {} .. {}, mean {:.1}",
                stats.min, stats.max, stats.mean
            );

            let path = next_free_path(&cli.output_dir, "DiamondSquare");
            let pb = spinner("Writing output...");
            write_grid(grid, &path)?;
            pb.finish_and_clear();
            done("Height-map", &path, elapsed);
        }

        Commands::Opening(args) => {
            run_morphology(&selector, strategy, Operation::Opening, &args, &cli.output_dir)?;
        }

        Commands::Closing(args) => {
            run_morphology(&selector, strategy, Operation::Closing, &args, &cli.output_dir)?;
        }
    }

    Ok(())
}
