//! Splits an image into the work units consumed by the parallel counting strategies.
//!
//! The static strategy assigns each worker one contiguous range of columns via
//! [`column_ranges`]. The dynamic strategy divides the image into a grid of fixed-size
//! tiles via [`TileGrid`] and hands out tile indices through a shared work queue.
//! Both decompositions cover every pixel exactly once, which is what makes the
//! strategies interchangeable.

use crate::{Region, TileSize, WorkerCount};
use std::ops::Range;

/// Deterministically splits `width` columns into one contiguous range per worker.
///
/// Each worker receives `width / workers` columns, and the remainder is distributed
/// one extra column at a time to the lowest-indexed workers. The ranges are assigned
/// consecutively, so their union is exactly `0..width` with no gaps or overlaps.
/// If there are more workers than columns, the excess workers receive empty ranges.
///
/// # Examples
/// ```
/// # use lumacount::partition::column_ranges;
/// # fn main() -> Result<(), lumacount::ZeroValue> {
/// let ranges: Vec<_> = column_ranges(16, 3.try_into()?).collect();
/// assert_eq!(ranges, [0..6, 6..11, 11..16]);
/// # Ok(())
/// # }
/// ```
pub fn column_ranges(
    width: u32,
    workers: WorkerCount,
) -> impl ExactSizeIterator<Item = Range<u32>> {
    let n = workers.get() as u64;
    let base = u64::from(width) / n;
    let remainder = u64::from(width) % n;
    let mut x = 0;
    (0..workers.get()).map(move |i| {
        let start = x;
        x += base + u64::from((i as u64) < remainder);
        #[allow(clippy::cast_possible_truncation)] // both bounds are at most `width`
        let range = start as u32..x as u32;
        range
    })
}

/// A grid of fixed-size tiles covering an image, indexed by row-major task id.
///
/// Tiles in the last column and row are clipped to the image bounds, so every grid
/// covers the image exactly, for any [`TileSize`]. A tile larger than the image
/// yields a single task covering the whole image.
///
/// # Examples
/// ```
/// # use lumacount::{partition::TileGrid, TileSize};
/// # fn main() -> Result<(), lumacount::ZeroValue> {
/// let grid = TileGrid::new(100, 50, TileSize::new(64, 64)?);
/// assert_eq!(grid.num_tasks(), 2);
/// assert_eq!(grid.region(1).width(), 36); // clipped at the right edge
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    /// The width of the image in pixels.
    width: u32,
    /// The height of the image in pixels.
    height: u32,
    /// The unclipped dimensions of each tile.
    tile: TileSize,
    /// The number of tiles along the image width.
    tiles_per_row: u32,
    /// The number of tiles along the image height.
    tiles_per_col: u32,
}

impl TileGrid {
    /// Creates the grid of tiles covering an image of the given dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32, tile: TileSize) -> Self {
        Self {
            width,
            height,
            tile,
            tiles_per_row: width.div_ceil(tile.width()),
            tiles_per_col: height.div_ceil(tile.height()),
        }
    }

    /// Returns the number of tiles along the image width.
    #[must_use]
    pub const fn tiles_per_row(&self) -> u32 {
        self.tiles_per_row
    }

    /// Returns the number of tiles along the image height.
    #[must_use]
    pub const fn tiles_per_col(&self) -> u32 {
        self.tiles_per_col
    }

    /// Returns the total number of tasks in the grid.
    #[must_use]
    pub const fn num_tasks(&self) -> u64 {
        self.tiles_per_row as u64 * self.tiles_per_col as u64
    }

    /// Maps a task id to its tile's region, clipped to the image bounds.
    ///
    /// Task ids run in row-major order: id `0` is the top-left tile and id
    /// `tiles_per_row - 1` is the top-right one. The given `task` must be less
    /// than [`TileGrid::num_tasks`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // all bounds are clipped to the image
    pub fn region(&self, task: u64) -> Region {
        debug_assert!(task < self.num_tasks());
        let tx = task % u64::from(self.tiles_per_row);
        let ty = task / u64::from(self.tiles_per_row);
        let x_start = tx * u64::from(self.tile.width());
        let y_start = ty * u64::from(self.tile.height());
        let x_end = (x_start + u64::from(self.tile.width())).min(u64::from(self.width));
        let y_end = (y_start + u64::from(self.tile.height())).min(u64::from(self.height));
        Region {
            x_start: x_start as u32,
            x_end: x_end as u32,
            y_start: y_start as u32,
            y_end: y_end as u32,
        }
    }

    /// Returns an iterator over every tile's region in task id order.
    #[allow(clippy::cast_possible_truncation)] // num_tasks is at most MAX_PIXELS
    pub fn regions(&self) -> impl ExactSizeIterator<Item = Region> + '_ {
        (0..self.num_tasks() as usize).map(move |task| self.region(task as u64))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn workers(n: usize) -> WorkerCount {
        n.try_into().unwrap()
    }

    fn tile(w: u32, h: u32) -> TileSize {
        TileSize::new(w, h).unwrap()
    }

    #[test]
    fn column_ranges_cover_the_width_exactly_once() {
        let width = 16;
        for n in 1..=(width as usize * 2) {
            let ranges: Vec<_> = column_ranges(width, workers(n)).collect();
            assert_eq!(ranges.len(), n);
            assert_eq!(ranges[0].start, 0);
            assert_eq!(ranges[ranges.len() - 1].end, width);
            for pair in ranges.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
            }
        }
    }

    #[test]
    fn remainder_columns_go_to_the_lowest_indexed_workers() {
        let ranges: Vec<_> = column_ranges(16, workers(3)).collect();
        assert_eq!(ranges, [0..6, 6..11, 11..16]);

        let ranges: Vec<_> = column_ranges(10, workers(4)).collect();
        assert_eq!(ranges, [0..3, 3..6, 6..8, 8..10]);
    }

    #[test]
    fn excess_workers_receive_empty_ranges() {
        let ranges: Vec<_> = column_ranges(4, workers(7)).collect();
        assert_eq!(ranges[..4], [0..1, 1..2, 2..3, 3..4]);
        assert!(ranges[4..].iter().all(Range::is_empty));
    }

    #[test]
    fn grid_dimensions_round_up() {
        let grid = TileGrid::new(16, 16, tile(8, 8));
        assert_eq!((grid.tiles_per_row(), grid.tiles_per_col()), (2, 2));
        assert_eq!(grid.num_tasks(), 4);

        let grid = TileGrid::new(17, 16, tile(8, 8));
        assert_eq!((grid.tiles_per_row(), grid.tiles_per_col()), (3, 2));
        assert_eq!(grid.num_tasks(), 6);
    }

    #[test]
    fn task_ids_map_row_major() {
        let grid = TileGrid::new(16, 16, tile(8, 8));
        let expected = [(0, 0), (8, 0), (0, 8), (8, 8)];
        for (task, &(x, y)) in expected.iter().enumerate() {
            let region = grid.region(task as u64);
            assert_eq!((region.x_start, region.y_start), (x, y));
            assert_eq!((region.width(), region.height()), (8, 8));
        }
    }

    #[test]
    fn edge_tiles_are_clipped() {
        let grid = TileGrid::new(10, 7, tile(4, 3));
        assert_eq!(grid.num_tasks(), 9);

        let bottom_right = grid.region(8);
        assert_eq!(bottom_right, Region { x_start: 8, x_end: 10, y_start: 6, y_end: 7 });
    }

    #[test]
    fn oversized_tiles_collapse_to_a_single_task() {
        for size in [tile(100, 100), tile(100, 2), tile(2, 100)] {
            let grid = TileGrid::new(10, 10, size);
            if size.width() > 10 && size.height() > 10 {
                assert_eq!(grid.num_tasks(), 1);
                assert_eq!(
                    grid.region(0),
                    Region { x_start: 0, x_end: 10, y_start: 0, y_end: 10 }
                );
            }
            assert_eq!(
                grid.regions().map(Region::num_pixels).sum::<u64>(),
                100,
                "tiles {size} must cover the image exactly"
            );
        }
    }

    #[test]
    fn grids_cover_every_pixel_exactly_once() {
        let (width, height) = (13, 9);
        for tw in 1..=(width + 2) {
            for th in 1..=(height + 2) {
                let grid = TileGrid::new(width, height, tile(tw, th));
                let mut covered = vec![0u32; (width * height) as usize];
                for region in grid.regions() {
                    for y in region.y_start..region.y_end {
                        for x in region.x_start..region.x_end {
                            covered[(y * width + x) as usize] += 1;
                        }
                    }
                }
                assert!(
                    covered.iter().all(|&count| count == 1),
                    "{tw}x{th} tiles must cover every pixel exactly once"
                );
            }
        }
    }
}
