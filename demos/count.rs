#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::{fmt::Display, path::PathBuf, process::ExitCode, time::Instant};

use clap::{Parser, ValueEnum};
use lumacount::{pgm, CountPipeline, Strategy, Threshold, TileSize, WorkerCount};

#[derive(Copy, Clone, ValueEnum)]
enum CliStrategy {
    Sequential,
    Columns,
    Tiles,
}

impl From<CliStrategy> for Strategy {
    fn from(value: CliStrategy) -> Self {
        match value {
            CliStrategy::Sequential => Strategy::Sequential,
            CliStrategy::Columns => Strategy::StaticColumns,
            CliStrategy::Tiles => Strategy::DynamicTiles,
        }
    }
}

impl Display for CliStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CliStrategy::Sequential => "sequential",
                CliStrategy::Columns => "columns",
                CliStrategy::Tiles => "tiles",
            }
        )
    }
}

#[derive(Parser)]
/// Counts the pixels of a PGM image above a threshold with the chosen strategy.
struct Options {
    /// The binary PGM image to count over.
    input: PathBuf,

    /// The counting strategy to run.
    #[arg(default_value_t = CliStrategy::Tiles)]
    strategy: CliStrategy,

    /// Count samples strictly greater than this value.
    #[arg(long, default_value_t = Threshold::DEFAULT.into_inner())]
    threshold: u8,

    /// The number of parallel workers; 0 uses the available parallelism.
    #[arg(short, long, default_value_t = 0)]
    workers: usize,

    /// The tile width for the tiles strategy.
    #[arg(long, default_value_t = TileSize::DEFAULT.width())]
    tile_width: u32,

    /// The tile height for the tiles strategy.
    #[arg(long, default_value_t = TileSize::DEFAULT.height())]
    tile_height: u32,
}

fn main() -> ExitCode {
    let Options { input, strategy, threshold, workers, tile_width, tile_height } =
        Options::parse();

    let workers = match workers {
        0 => WorkerCount::default(),
        n => match n.try_into() {
            Ok(workers) => workers,
            Err(e) => {
                eprintln!("invalid worker count: {e}");
                return ExitCode::FAILURE;
            }
        },
    };
    let tile = match TileSize::new(tile_width, tile_height) {
        Ok(tile) => tile,
        Err(e) => {
            eprintln!("invalid tile size: {e}");
            return ExitCode::FAILURE;
        }
    };

    let time = Instant::now();
    let img = match pgm::load_path(&input) {
        Ok(img) => img,
        Err(e) => {
            eprintln!("failed to load {}: {e}", input.display());
            return ExitCode::FAILURE;
        }
    };
    println!(
        "loaded {} ({}x{}) in {:.3}ms",
        input.display(),
        img.width(),
        img.height(),
        time.elapsed().as_secs_f64() * 1000.0
    );

    let report = {
        let mut pipeline = CountPipeline::new(&img);
        pipeline
            .threshold(Threshold::new(threshold))
            .workers(workers)
            .tile_size(tile);

        let time = Instant::now();
        let report = pipeline.run(strategy.into());
        let elapsed = time.elapsed();
        match report {
            Ok(report) => {
                println!(
                    "[{}] counted in {:.3}ms with {workers} worker(s)",
                    report.strategy,
                    elapsed.as_secs_f64() * 1000.0
                );
                report
            }
            Err(e) => {
                eprintln!("counting failed: {e}");
                return ExitCode::FAILURE;
            }
        }
    };

    println!("{} samples above {threshold}", report.total_matches);
    ExitCode::SUCCESS
}
