//! Contains the [`CountPipeline`] builder struct for the high level API.

use crate::{count, RasterBuffer, Threshold};
#[cfg(feature = "threads")]
use crate::{count::WorkerPoolError, CountOutput, Strategy, TileSize, WorkerCount};

/// A builder struct to configure and run a counting strategy over one image.
///
/// # Examples
/// To start, create a [`CountPipeline`] from a [`RasterBuffer`]:
/// ```
/// # use lumacount::{CountPipeline, RasterBuffer};
/// # fn main() -> Result<(), lumacount::RasterError> {
/// let img = RasterBuffer::new(2, 2, vec![0, 255, 255, 0])?;
/// let pipeline = CountPipeline::new(&img);
/// # Ok(())
/// # }
/// ```
///
/// Then, you can change different options like the threshold or the worker count:
/// ```
/// # use lumacount::{CountPipeline, RasterBuffer, Threshold, TileSize};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let img = RasterBuffer::new(2, 2, vec![0, 255, 255, 0])?;
/// let mut pipeline = CountPipeline::new(&img);
/// let pipeline = pipeline
///     .threshold(Threshold::new(64))
///     .workers(2.try_into()?)
///     .tile_size(TileSize::square(32)?);
/// # Ok(())
/// # }
/// ```
///
/// Finally, run one of the strategies (the parallel ones need the `threads` feature):
/// ```
/// # use lumacount::{CountPipeline, RasterBuffer, Strategy};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let img = RasterBuffer::new(2, 2, vec![0, 255, 255, 0])?;
/// # let pipeline = CountPipeline::new(&img);
/// let total = pipeline.sequential();
/// let total = pipeline.tiles_par()?;
/// let report = pipeline.run(Strategy::StaticColumns)?;
/// assert_eq!(report.total_matches, total);
/// # Ok(())
/// # }
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct CountPipeline<'a> {
    /// The image to count over.
    buffer: &'a RasterBuffer,
    /// The predicate each sample is tested against.
    threshold: Threshold,
    /// The number of workers for the parallel strategies.
    #[cfg(feature = "threads")]
    workers: WorkerCount,
    /// The tile dimensions for the dynamic strategy.
    #[cfg(feature = "threads")]
    tile: TileSize,
}

impl<'a> CountPipeline<'a> {
    /// Creates a new [`CountPipeline`] over the given image with default options.
    pub fn new(buffer: &'a RasterBuffer) -> Self {
        Self {
            buffer,
            threshold: Threshold::default(),
            #[cfg(feature = "threads")]
            workers: WorkerCount::default(),
            #[cfg(feature = "threads")]
            tile: TileSize::default(),
        }
    }

    /// Sets the threshold that each sample is tested against.
    ///
    /// The default threshold is [`Threshold::DEFAULT`].
    pub fn threshold(&mut self, threshold: impl Into<Threshold>) -> &mut Self {
        self.threshold = threshold.into();
        self
    }

    /// Sets the number of workers used by the parallel strategies.
    ///
    /// The default is [`WorkerCount::default`], the available parallelism.
    #[cfg(feature = "threads")]
    pub fn workers(&mut self, workers: WorkerCount) -> &mut Self {
        self.workers = workers;
        self
    }

    /// Sets the tile dimensions used by the dynamic strategy.
    ///
    /// The default tile size is [`TileSize::DEFAULT`].
    #[cfg(feature = "threads")]
    pub fn tile_size(&mut self, tile: TileSize) -> &mut Self {
        self.tile = tile;
        self
    }

    /// Runs the sequential baseline and returns the number of matching samples.
    #[must_use]
    pub fn sequential(&self) -> u64 {
        let threshold = self.threshold;
        count::sequential(self.buffer, move |sample| threshold.matches(sample))
    }
}

#[cfg(feature = "threads")]
impl<'a> CountPipeline<'a> {
    /// Runs the statically partitioned strategy and returns the number of matching samples.
    ///
    /// # Errors
    /// Returns an error if the worker pool cannot be created.
    pub fn columns_par(&self) -> Result<u64, WorkerPoolError> {
        let threshold = self.threshold;
        count::columns_par(self.buffer, self.workers, move |sample| {
            threshold.matches(sample)
        })
    }

    /// Runs the dynamically partitioned strategy and returns the number of matching samples.
    ///
    /// # Errors
    /// Returns an error if the worker pool cannot be created.
    pub fn tiles_par(&self) -> Result<u64, WorkerPoolError> {
        let threshold = self.threshold;
        count::tiles_par(self.buffer, self.workers, self.tile, move |sample| {
            threshold.matches(sample)
        })
    }

    /// Runs the given strategy and returns its report.
    ///
    /// # Errors
    /// Returns an error if the worker pool for a parallel strategy cannot be created.
    pub fn run(&self, strategy: Strategy) -> Result<CountOutput, WorkerPoolError> {
        let total_matches = match strategy {
            Strategy::Sequential => self.sequential(),
            Strategy::StaticColumns => self.columns_par()?,
            Strategy::DynamicTiles => self.tiles_par()?,
        };
        Ok(CountOutput { strategy, total_matches })
    }
}
