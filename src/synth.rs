//! Deterministic synthetic images for tests, benches, and demos.
//!
//! These fixtures are not part of the counting engine; they exist so that every
//! strategy can be exercised against inputs with known counts and known load skew.

use crate::{RasterBuffer, RasterError, TileSize};

/// The sample value used for dark pixels. Never passes the default threshold.
pub const BLACK: u8 = 0;

/// The sample value used for bright pixels. Passes every threshold below `255`.
pub const WHITE: u8 = u8::MAX;

/// Builds a buffer by evaluating `sample` at every pixel in row-major order.
fn from_fn(
    width: u32,
    height: u32,
    sample: impl Fn(u32, u32) -> u8,
) -> Result<RasterBuffer, RasterError> {
    #[allow(clippy::cast_possible_truncation)]
    let mut samples = Vec::with_capacity((u64::from(width) * u64::from(height)) as usize);
    for y in 0..height {
        for x in 0..width {
            samples.push(sample(x, y));
        }
    }
    RasterBuffer::new(width, height, samples)
}

/// The checkerboard pattern: cells alternate between dark and bright,
/// starting dark at the origin.
fn checker_sample(x: u32, y: u32, cell: TileSize) -> u8 {
    if (x / cell.width() + y / cell.height()) % 2 == 0 {
        BLACK
    } else {
        WHITE
    }
}

/// Creates an image where every sample has the same value.
///
/// # Errors
/// Returns an error if the dimensions do not form a valid raster.
pub fn solid(width: u32, height: u32, value: u8) -> Result<RasterBuffer, RasterError> {
    #[allow(clippy::cast_possible_truncation)]
    let samples = vec![value; (u64::from(width) * u64::from(height)) as usize];
    RasterBuffer::new(width, height, samples)
}

/// Creates a checkerboard of `cell`-sized squares alternating between [`BLACK`] and
/// [`WHITE`], starting dark at the origin.
///
/// # Errors
/// Returns an error if the dimensions do not form a valid raster.
pub fn checkerboard(width: u32, height: u32, cell: TileSize) -> Result<RasterBuffer, RasterError> {
    from_fn(width, height, |x, y| checker_sample(x, y, cell))
}

/// Creates an image whose top half is solid [`WHITE`] and whose bottom half is a
/// checkerboard of `cell`-sized squares.
///
/// The bright half makes some regions far denser in matches than others, which is
/// the load-skew scenario the dynamic strategy balances better than the static one.
///
/// # Errors
/// Returns an error if the dimensions do not form a valid raster.
pub fn half_solid_checkerboard(
    width: u32,
    height: u32,
    cell: TileSize,
) -> Result<RasterBuffer, RasterError> {
    from_fn(width, height, |x, y| {
        if y < height / 2 {
            WHITE
        } else {
            checker_sample(x, y, cell)
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::count;

    fn bright(sample: u8) -> bool {
        sample == WHITE
    }

    #[test]
    fn solid_images_are_uniform() {
        let img = solid(10, 10, WHITE).unwrap();
        assert_eq!(count::sequential(&img, bright), 100);

        let img = solid(10, 10, BLACK).unwrap();
        assert_eq!(count::sequential(&img, bright), 0);

        assert!(solid(0, 10, BLACK).is_err());
    }

    #[test]
    fn checkerboard_is_half_bright() {
        let img = checkerboard(16, 16, TileSize::square(8).unwrap()).unwrap();
        assert_eq!(count::sequential(&img, bright), 128);

        // the origin cell is dark
        assert_eq!(img.samples()[0], BLACK);
        assert_eq!(img.samples()[8], WHITE);
    }

    #[test]
    fn checkerboard_cells_need_not_divide_the_image() {
        let img = checkerboard(5, 3, TileSize::square(2).unwrap()).unwrap();
        let rows: Vec<_> = img.rows().collect();
        assert_eq!(rows[0], [BLACK, BLACK, WHITE, WHITE, BLACK]);
        assert_eq!(rows[2], [WHITE, WHITE, BLACK, BLACK, WHITE]);
    }

    #[test]
    fn half_solid_checkerboard_is_skewed() {
        let img = half_solid_checkerboard(16, 16, TileSize::square(8).unwrap()).unwrap();
        // 128 bright samples in the solid top half plus 64 in the checkered bottom
        assert_eq!(count::sequential(&img, bright), 192);
        assert!(img.rows().take(8).all(|row| row.iter().all(|&s| s == WHITE)));
    }
}
