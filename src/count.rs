//! The counting strategies: a sequential baseline and two parallel scans that must
//! reproduce it exactly.
//!
//! Every strategy evaluates the same pure predicate over every pixel exactly once,
//! so the final total is invariant to the decomposition and the worker count.
//! [`sequential`] is the single-threaded ground truth. [`columns_par`] fixes one
//! contiguous column range per worker before any worker starts. [`tiles_par`] lets
//! workers claim fixed-size tiles greedily from a shared cursor, so slower workers
//! simply claim fewer tiles; this absorbs load skew from non-uniform content better
//! than the static split.
//!
//! Each parallel worker accumulates into a private local count and merges it into
//! the shared total exactly once, after it runs out of work. The total is read only
//! after every worker has been joined.

use crate::{RasterBuffer, Region};
#[cfg(feature = "threads")]
use {
    crate::partition::{column_ranges, TileGrid},
    crate::{TileSize, WorkerCount},
    rayon::ThreadPoolBuilder,
    std::error::Error,
    std::fmt::Display,
    std::sync::atomic::{AtomicU64, Ordering},
};

/// Counts the samples that pass the predicate with a single-threaded row-major scan.
///
/// This is the ground-truth value that every parallel strategy reproduces.
#[must_use]
pub fn sequential(img: &RasterBuffer, predicate: impl Fn(u8) -> bool) -> u64 {
    img.samples().iter().filter(|&&sample| predicate(sample)).count() as u64
}

/// Counts the samples within one region that pass the predicate.
///
/// The region must lie within the image bounds. An empty region counts zero samples.
#[must_use]
pub fn in_region(img: &RasterBuffer, region: Region, predicate: impl Fn(u8) -> bool) -> u64 {
    debug_assert!(region.x_end <= img.width() && region.y_end <= img.height());
    let width = img.width() as usize;
    let mut matches = 0;
    for y in region.y_start..region.y_end {
        let row = y as usize * width;
        let columns = &img.samples()[row + region.x_start as usize..row + region.x_end as usize];
        matches += columns.iter().filter(|&&sample| predicate(sample)).count() as u64;
    }
    matches
}

/// An error type for when the worker pool for a parallel count could not be created.
///
/// The pool is built before any worker starts scanning, so a failed run performs no
/// work at all; there is never a partial count.
#[cfg(feature = "threads")]
#[derive(Debug)]
pub struct WorkerPoolError(rayon::ThreadPoolBuildError);

#[cfg(feature = "threads")]
impl Display for WorkerPoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to create the worker pool")
    }
}

#[cfg(feature = "threads")]
impl Error for WorkerPoolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

/// Builds a pool with exactly one thread per configured worker.
#[cfg(feature = "threads")]
fn build_pool(workers: WorkerCount) -> Result<rayon::ThreadPool, WorkerPoolError> {
    ThreadPoolBuilder::new()
        .num_threads(workers.get())
        .build()
        .map_err(WorkerPoolError)
}

/// The shared total that each worker merges its private local count into exactly once,
/// after that worker has finished all of its scanning work.
///
/// Reading the total consumes the accumulator, which the borrow checker only permits
/// once the worker scope (the join barrier) has ended.
#[cfg(feature = "threads")]
struct SharedCount(AtomicU64);

#[cfg(feature = "threads")]
impl SharedCount {
    /// Creates an accumulator holding zero.
    fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Adds one worker's completed local count to the total.
    fn merge(&self, local: u64) {
        self.0.fetch_add(local, Ordering::Relaxed);
    }

    /// Returns the merged total. Only reachable after all borrows (the workers) end.
    fn into_total(self) -> u64 {
        self.0.into_inner()
    }
}

/// The shared cursor from which workers claim tile task ids until none remain.
#[cfg(feature = "threads")]
struct TaskQueue {
    /// The id of the next unclaimed task.
    next: AtomicU64,
    /// The number of tasks; claims at or past this id fail permanently.
    total: u64,
}

#[cfg(feature = "threads")]
impl TaskQueue {
    /// Creates a queue of `total` tasks with task `0` claimed first.
    fn new(total: u64) -> Self {
        Self { next: AtomicU64::new(0), total }
    }

    /// Atomically claims the next task id, or `None` once every task has been claimed.
    ///
    /// No two claims ever return the same id. A worker stops claiming on the first
    /// `None`, so the cursor overshoots `total` by at most one per worker.
    fn claim(&self) -> Option<u64> {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        (id < self.total).then_some(id)
    }
}

/// Counts the samples that pass the predicate using one worker per contiguous column range.
///
/// The image width is split into `workers` consecutive ranges with any remainder
/// distributed to the lowest-indexed workers (see
/// [`column_ranges`](crate::partition::column_ranges)), so the assignment is fixed
/// before any worker starts and there is no runtime task contention. Workers whose
/// range is empty contribute zero. The result equals [`sequential`] for every worker
/// count.
///
/// # Errors
/// Returns an error if the worker pool cannot be created; no partial count is produced.
#[cfg(feature = "threads")]
pub fn columns_par(
    img: &RasterBuffer,
    workers: WorkerCount,
    predicate: impl Fn(u8) -> bool + Sync,
) -> Result<u64, WorkerPoolError> {
    let pool = build_pool(workers)?;
    let total = SharedCount::new();
    pool.scope(|scope| {
        for columns in column_ranges(img.width(), workers) {
            let (total, predicate) = (&total, &predicate);
            scope.spawn(move |_| {
                let assigned = Region {
                    x_start: columns.start,
                    x_end: columns.end,
                    y_start: 0,
                    y_end: img.height(),
                };
                total.merge(in_region(img, assigned, predicate));
            });
        }
    });
    Ok(total.into_total())
}

/// Counts the samples that pass the predicate using workers that claim tiles from a
/// shared work queue.
///
/// The image is divided into a row-major grid of `tile`-sized regions, clipped at the
/// right and bottom edges (see [`TileGrid`](crate::partition::TileGrid)). Each worker
/// repeatedly claims the next unclaimed task id, scans that tile into its private
/// local count, and merges the local count into the shared total once the queue is
/// exhausted. Workers that claim no tiles merge zero. The result equals
/// [`sequential`] for every worker count and tile size.
///
/// # Errors
/// Returns an error if the worker pool cannot be created; no partial count is produced.
#[cfg(feature = "threads")]
pub fn tiles_par(
    img: &RasterBuffer,
    workers: WorkerCount,
    tile: TileSize,
    predicate: impl Fn(u8) -> bool + Sync,
) -> Result<u64, WorkerPoolError> {
    let grid = TileGrid::new(img.width(), img.height(), tile);
    let queue = TaskQueue::new(grid.num_tasks());
    let pool = build_pool(workers)?;
    let total = SharedCount::new();
    pool.scope(|scope| {
        for _ in 0..workers.get() {
            let (queue, total, predicate) = (&queue, &total, &predicate);
            scope.spawn(move |_| {
                let mut local = 0;
                while let Some(task) = queue.claim() {
                    local += in_region(img, grid.region(task), predicate);
                }
                total.merge(local);
            });
        }
    });
    Ok(total.into_total())
}
