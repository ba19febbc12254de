//! A library for counting the pixels of a grayscale raster that pass a threshold predicate.
//!
//! `lumacount` computes the same exact count three ways: a sequential scan, a statically
//! partitioned parallel scan (one contiguous column range per worker), and a dynamically
//! partitioned parallel scan (fixed-size tiles claimed from a shared work queue).
//! All three strategies return the same total for any input, worker count, and tile size,
//! which makes the crate a small substrate for studying load balancing and
//! synchronization overhead.
//!
//! # Features
//! To reduce dependencies and compile times, `lumacount` has several `cargo` features
//! that can be turned off or on:
//! - `pipelines`: exposes the [`CountPipeline`] builder struct that serves as the high-level API.
//! - `threads`: exposes the parallel counting strategies via [`rayon`].
//! - `image`: enables integration with the [`image`] crate.
//!
//! # High-Level API
//! To get started with the high-level API, see [`CountPipeline`].
//! It has examples in its documentation, but here is an additional one:
//! ```no_run
//! # use lumacount::{pgm, CountPipeline, Strategy, Threshold};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = pgm::load_path("some image.pgm")?;
//!
//! let report = CountPipeline::new(&img)
//!     .threshold(Threshold::new(200)) // only count samples above 200
//!     .workers(8.try_into()?) // use 8 workers
//!     .run(Strategy::DynamicTiles)?;
//!
//! println!("{} pixels matched", report.total_matches);
//! # Ok(())
//! # }
//! ```
//!
//! The low-level entry points live in the [`count`] module and take any pure
//! `Fn(u8) -> bool` closure as the predicate.
//!
//! Note that some of the options and functions above require certain features to be enabled.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc
)]

mod types;

#[cfg(feature = "pipelines")]
mod api;

pub mod count;
pub mod partition;
pub mod pgm;
pub mod synth;

pub use types::*;

#[cfg(feature = "pipelines")]
pub use api::*;

#[cfg(feature = "threads")]
pub use count::WorkerPoolError;

/// The maximum supported image size in number of pixels is `u32::MAX`.
pub const MAX_PIXELS: u32 = u32::MAX;
