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

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use lumacount::{pgm, synth, TileSize};

#[derive(Copy, Clone, ValueEnum)]
enum Pattern {
    /// Every sample is 0.
    Black,
    /// Every sample is 255.
    White,
    /// Alternating dark and bright cells.
    Checker,
    /// Top half bright, bottom half checkered.
    Half,
}

#[derive(Parser)]
/// Generates a synthetic binary PGM image for exercising the counting strategies.
struct Options {
    /// The pattern to generate.
    pattern: Pattern,

    /// The width of the image in pixels.
    width: u32,

    /// The height of the image in pixels.
    height: u32,

    /// Where to write the PGM file.
    output: PathBuf,

    /// The side length of the checkerboard cells.
    #[arg(long, default_value_t = 8)]
    cell: u32,
}

fn main() -> ExitCode {
    let Options { pattern, width, height, output, cell } = Options::parse();

    let cell = match TileSize::square(cell) {
        Ok(cell) => cell,
        Err(e) => {
            eprintln!("invalid cell size: {e}");
            return ExitCode::FAILURE;
        }
    };

    let img = match pattern {
        Pattern::Black => synth::solid(width, height, synth::BLACK),
        Pattern::White => synth::solid(width, height, synth::WHITE),
        Pattern::Checker => synth::checkerboard(width, height, cell),
        Pattern::Half => synth::half_solid_checkerboard(width, height, cell),
    };
    let img = match img {
        Ok(img) => img,
        Err(e) => {
            eprintln!("failed to generate image: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = pgm::write_path(&output, &img) {
        eprintln!("failed to write {}: {e}", output.display());
        return ExitCode::FAILURE;
    }

    println!("wrote {} ({}x{})", output.display(), img.width(), img.height());
    ExitCode::SUCCESS
}
