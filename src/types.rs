//! Contains various types needed across the crate.

use crate::MAX_PIXELS;
use std::{error::Error, fmt::Display, num::NonZeroUsize};
#[cfg(feature = "image")]
use image::GrayImage;

/// An error type for when a configuration value that must be nonzero is zero.
///
/// Worker counts and tile dimensions must be at least one,
/// so their constructors reject zero with this error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroValue;

impl Display for ZeroValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "value must be nonzero")
    }
}

impl Error for ZeroValue {}

/// An error type for when a [`RasterBuffer`] cannot be constructed from the given
/// dimensions and samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterError {
    /// The width or height is zero.
    ZeroDimension,
    /// The number of pixels is above [`MAX_PIXELS`].
    AboveMaxPixels,
    /// The number of samples does not equal `width * height`.
    LengthMismatch {
        /// The number of samples implied by the dimensions.
        expected: u64,
        /// The number of samples actually given.
        actual: u64,
    },
}

impl Display for RasterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::ZeroDimension => write!(f, "width and height must be nonzero"),
            Self::AboveMaxPixels => {
                write!(f, "above the maximum pixel count of {MAX_PIXELS}")
            }
            Self::LengthMismatch { expected, actual } => {
                write!(f, "expected {expected} samples but got {actual}")
            }
        }
    }
}

impl Error for RasterError {}

/// An in-memory grayscale image: a width, a height, and one 8-bit sample per pixel
/// in row-major order.
///
/// The buffer is immutable once constructed. Counting strategies borrow it shared,
/// so one buffer can be reused across sequential and parallel runs.
///
/// # Examples
/// Construct a buffer from raw samples:
/// ```
/// # use lumacount::RasterBuffer;
/// # fn main() -> Result<(), lumacount::RasterError> {
/// let img = RasterBuffer::new(2, 2, vec![0, 255, 255, 0])?;
/// assert_eq!(img.num_samples(), 4);
/// # Ok(())
/// # }
/// ```
///
/// Or load one from a binary PGM file:
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = lumacount::pgm::load_path("some image.pgm")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    /// The width of the image in pixels.
    width: u32,
    /// The height of the image in pixels.
    height: u32,
    /// The samples in row-major order with length `width * height`.
    samples: Vec<u8>,
}

impl RasterBuffer {
    /// Creates a new [`RasterBuffer`] from the given dimensions and row-major samples.
    ///
    /// # Errors
    /// Returns an error if the width or height is zero, if `width * height`
    /// is above [`MAX_PIXELS`], or if the number of samples is not `width * height`.
    pub fn new(width: u32, height: u32, samples: Vec<u8>) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::ZeroDimension);
        }
        let expected = u64::from(width) * u64::from(height);
        if expected > u64::from(MAX_PIXELS) {
            return Err(RasterError::AboveMaxPixels);
        }
        if samples.len() as u64 != expected {
            return Err(RasterError::LengthMismatch {
                expected,
                actual: samples.len() as u64,
            });
        }
        Ok(Self { width, height, samples })
    }

    /// Returns the width of the image in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns the total number of samples (`width * height`).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn num_samples(&self) -> u32 {
        self.samples.len() as u32
    }

    /// Returns the samples in row-major order.
    #[must_use]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Returns an iterator over the rows of the image, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.samples.chunks_exact(self.width as usize)
    }
}

#[cfg(feature = "image")]
impl TryFrom<&GrayImage> for RasterBuffer {
    type Error = RasterError;

    fn try_from(image: &GrayImage) -> Result<Self, Self::Error> {
        Self::new(image.width(), image.height(), image.as_raw().clone())
    }
}

/// A rectangular, half-open sub-range of a [`RasterBuffer`].
///
/// A region covers the pixels with `x` in `x_start..x_end` and `y` in `y_start..y_end`.
/// It may be empty (`x_start == x_end` or `y_start == y_end`) but never negative-sized:
/// `x_start <= x_end <= width` and `y_start <= y_end <= height` must hold for the
/// buffer it is scanned against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// The first column covered (inclusive).
    pub x_start: u32,
    /// The column one past the last covered (exclusive).
    pub x_end: u32,
    /// The first row covered (inclusive).
    pub y_start: u32,
    /// The row one past the last covered (exclusive).
    pub y_end: u32,
}

impl Region {
    /// Returns the number of columns covered by this region.
    #[must_use]
    pub const fn width(self) -> u32 {
        self.x_end - self.x_start
    }

    /// Returns the number of rows covered by this region.
    #[must_use]
    pub const fn height(self) -> u32 {
        self.y_end - self.y_start
    }

    /// Returns the number of pixels covered by this region.
    #[must_use]
    pub const fn num_pixels(self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Whether or not this region covers zero pixels.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.x_start == self.x_end || self.y_start == self.y_end
    }
}

/// The number of workers to run a parallel counting strategy with.
///
/// This is a simple new type wrapper around `usize` with the invariant that it must
/// be nonzero. The worker count may exceed the image width or the number of tiles;
/// excess workers receive no work and contribute zero to the total.
///
/// # Examples
/// Use `try_into` to create [`WorkerCount`]s from `usize`s:
/// ```
/// # use lumacount::{WorkerCount, ZeroValue};
/// # fn main() -> Result<(), ZeroValue> {
/// let workers = WorkerCount::try_from(4)?;
/// let workers: WorkerCount = 4.try_into()?;
/// assert!(WorkerCount::try_from(0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct WorkerCount(usize);

impl WorkerCount {
    /// A single worker.
    pub const ONE: Self = Self(1);

    /// Gets the inner `usize` value.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for WorkerCount {
    /// Defaults to [`std::thread::available_parallelism`], or one worker
    /// if the parallelism cannot be determined.
    fn default() -> Self {
        std::thread::available_parallelism().map_or(Self::ONE, Self::from)
    }
}

impl From<NonZeroUsize> for WorkerCount {
    fn from(value: NonZeroUsize) -> Self {
        Self(value.get())
    }
}

impl TryFrom<usize> for WorkerCount {
    type Error = ZeroValue;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(ZeroValue)
        } else {
            Ok(Self(value))
        }
    }
}

impl Display for WorkerCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The dimensions of the tiles that the dynamic strategy divides an image into.
///
/// Both dimensions must be nonzero. Tiles at the right and bottom edges of the image
/// are clipped to the image bounds, so the tile dimensions need not divide the image
/// dimensions; they may even exceed them, in which case a single tile covers the
/// whole image.
///
/// # Examples
/// ```
/// # use lumacount::{TileSize, ZeroValue};
/// # fn main() -> Result<(), ZeroValue> {
/// let tile = TileSize::new(32, 16)?;
/// let tile = TileSize::square(8)?;
/// assert_eq!(TileSize::default(), TileSize::new(64, 64)?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSize {
    /// The width of a tile in pixels.
    width: u32,
    /// The height of a tile in pixels.
    height: u32,
}

impl TileSize {
    /// The default tile size of `64x64`.
    pub const DEFAULT: Self = Self { width: 64, height: 64 };

    /// Creates a new [`TileSize`] with the given dimensions.
    ///
    /// # Errors
    /// Returns an error if either dimension is zero.
    pub const fn new(width: u32, height: u32) -> Result<Self, ZeroValue> {
        if width == 0 || height == 0 {
            Err(ZeroValue)
        } else {
            Ok(Self { width, height })
        }
    }

    /// Creates a new square [`TileSize`] with the given side length.
    ///
    /// # Errors
    /// Returns an error if the side length is zero.
    pub const fn square(side: u32) -> Result<Self, ZeroValue> {
        Self::new(side, side)
    }

    /// Returns the width of a tile in pixels.
    #[must_use]
    pub const fn width(self) -> u32 {
        self.width
    }

    /// Returns the height of a tile in pixels.
    #[must_use]
    pub const fn height(self) -> u32 {
        self.height
    }
}

impl Default for TileSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Display for TileSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The stock predicate: a sample matches if it is strictly greater than the threshold.
///
/// Evaluating the threshold is pure and stateless, so every strategy and worker
/// reaches the same decision for the same sample. A threshold of `255` matches nothing.
///
/// # Examples
/// ```
/// # use lumacount::Threshold;
/// let threshold = Threshold::default();
/// assert!(!threshold.matches(128));
/// assert!(threshold.matches(129));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Threshold(u8);

impl Threshold {
    /// The default threshold of `128`.
    pub const DEFAULT: Self = Self(128);

    /// Creates a new [`Threshold`] with the given cutoff value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Whether or not the given sample passes this threshold.
    #[inline]
    #[must_use]
    pub const fn matches(self, sample: u8) -> bool {
        sample > self.0
    }

    /// Gets the inner `u8` cutoff value.
    #[must_use]
    pub const fn into_inner(self) -> u8 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u8> for Threshold {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The counting strategy used to produce a [`CountOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// A single-threaded row-major scan of every sample.
    Sequential,
    /// One contiguous column range per worker, fixed before any worker starts.
    StaticColumns,
    /// Fixed-size tiles claimed greedily from a shared work queue.
    DynamicTiles,
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Sequential => "sequential",
                Self::StaticColumns => "static columns",
                Self::DynamicTiles => "dynamic tiles",
            }
        )
    }
}

/// The result of one counting run: the strategy that produced it and the exact
/// number of samples that passed the predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountOutput {
    /// The strategy that produced this count.
    pub strategy: Strategy,
    /// The number of samples that passed the predicate.
    pub total_matches: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn raster_buffer_validates_dimensions() {
        assert_eq!(
            RasterBuffer::new(0, 4, Vec::new()),
            Err(RasterError::ZeroDimension)
        );
        assert_eq!(
            RasterBuffer::new(4, 0, Vec::new()),
            Err(RasterError::ZeroDimension)
        );
        assert_eq!(
            RasterBuffer::new(u32::MAX, 2, Vec::new()),
            Err(RasterError::AboveMaxPixels)
        );
        assert_eq!(
            RasterBuffer::new(3, 2, vec![0; 5]),
            Err(RasterError::LengthMismatch { expected: 6, actual: 5 })
        );

        let img = RasterBuffer::new(3, 2, vec![7; 6]).unwrap();
        assert_eq!((img.width(), img.height(), img.num_samples()), (3, 2, 6));
        assert_eq!(img.rows().count(), 2);
        assert!(img.rows().all(|row| row == [7, 7, 7]));
    }

    #[test]
    fn zero_configuration_is_rejected() {
        assert_eq!(WorkerCount::try_from(0), Err(ZeroValue));
        assert_eq!(WorkerCount::try_from(3).unwrap().get(), 3);
        assert!(WorkerCount::default().get() >= 1);

        assert_eq!(TileSize::new(0, 8), Err(ZeroValue));
        assert_eq!(TileSize::new(8, 0), Err(ZeroValue));
        assert_eq!(TileSize::square(0), Err(ZeroValue));
        let tile = TileSize::new(8, 4).unwrap();
        assert_eq!((tile.width(), tile.height()), (8, 4));
    }

    #[test]
    fn threshold_is_strictly_greater_than() {
        let threshold = Threshold::default();
        assert_eq!(threshold, Threshold::new(128));
        assert!(!threshold.matches(0));
        assert!(!threshold.matches(128));
        assert!(threshold.matches(129));
        assert!(threshold.matches(255));
        assert!(!Threshold::new(255).matches(255));
    }

    #[test]
    fn region_accessors() {
        let region = Region { x_start: 2, x_end: 6, y_start: 1, y_end: 4 };
        assert_eq!(region.width(), 4);
        assert_eq!(region.height(), 3);
        assert_eq!(region.num_pixels(), 12);
        assert!(!region.is_empty());

        let empty = Region { x_start: 6, x_end: 6, y_start: 0, y_end: 4 };
        assert!(empty.is_empty());
        assert_eq!(empty.num_pixels(), 0);
    }

    #[cfg(feature = "image")]
    #[test]
    fn raster_buffer_from_gray_image() {
        let image = image::GrayImage::from_fn(3, 2, |x, y| image::Luma([(x + y) as u8]));
        let img = RasterBuffer::try_from(&image).unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!(img.samples(), [0, 1, 2, 1, 2, 3]);
    }
}
