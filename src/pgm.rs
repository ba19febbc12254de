//! Reading and writing binary (`P5`) PGM images.
//!
//! Only the subset of the format the counting engine consumes is supported:
//! the `P5` magic number, ASCII width/height/max-sample-value tokens separated by
//! whitespace and `#` comments, a single whitespace byte, and then `width * height`
//! raw samples. The maximum sample value must fit a single byte. A failed load never
//! produces a partially populated buffer.

use crate::{RasterBuffer, RasterError, MAX_PIXELS};
use std::{
    error::Error,
    fmt::Display,
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Read, Write},
    path::Path,
};

/// An error type for when a PGM image cannot be loaded.
#[derive(Debug)]
pub enum PgmError {
    /// The stream does not start with the `P5` binary PGM magic number.
    Magic,
    /// A header token is missing or is not a decimal integer.
    Header,
    /// The maximum sample value is zero or does not fit a single byte.
    MaxValue(u32),
    /// The raster data ended before `width * height` samples were read.
    Truncated {
        /// The number of samples implied by the header.
        expected: u64,
        /// The number of samples actually read.
        actual: u64,
    },
    /// The header does not describe a valid raster.
    Raster(RasterError),
    /// An underlying I/O error.
    Io(io::Error),
}

impl Display for PgmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Magic => write!(f, "not a binary (P5) PGM image"),
            Self::Header => write!(f, "malformed PGM header"),
            Self::MaxValue(value) => {
                write!(f, "unsupported maximum sample value of {value}")
            }
            Self::Truncated { expected, actual } => {
                write!(f, "expected {expected} samples but the data ended after {actual}")
            }
            Self::Raster(error) => write!(f, "invalid raster: {error}"),
            Self::Io(error) => write!(f, "failed to read image: {error}"),
        }
    }
}

impl Error for PgmError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            Self::Raster(error) => Some(error),
            _ => None,
        }
    }
}

impl From<io::Error> for PgmError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

/// Reads a single byte, or `None` at a clean end of stream.
fn read_byte(reader: &mut impl BufRead) -> io::Result<Option<u8>> {
    let mut byte = [0];
    match reader.read_exact(&mut byte) {
        Ok(()) => Ok(Some(byte[0])),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(error) => Err(error),
    }
}

/// Skips whitespace and `#` comments, returning the first byte of the next token.
fn skip_header_filler(reader: &mut impl BufRead) -> Result<Option<u8>, PgmError> {
    loop {
        match read_byte(reader)? {
            None => return Ok(None),
            // a comment runs to the end of its line
            Some(b'#') => loop {
                match read_byte(reader)? {
                    None => return Ok(None),
                    Some(b'\n' | b'\r') => break,
                    Some(_) => {}
                }
            },
            Some(byte) if byte.is_ascii_whitespace() => {}
            Some(byte) => return Ok(Some(byte)),
        }
    }
}

/// Reads the next ASCII decimal header token, consuming its terminating whitespace byte.
fn read_header_int(reader: &mut impl BufRead) -> Result<u32, PgmError> {
    let first = skip_header_filler(reader)?.ok_or(PgmError::Header)?;
    if !first.is_ascii_digit() {
        return Err(PgmError::Header);
    }
    let mut value = u64::from(first - b'0');
    loop {
        match read_byte(reader)? {
            Some(byte) if byte.is_ascii_digit() => {
                value = value * 10 + u64::from(byte - b'0');
                if value > u64::from(u32::MAX) {
                    return Err(PgmError::Header);
                }
            }
            Some(byte) if byte.is_ascii_whitespace() => break,
            Some(_) => return Err(PgmError::Header),
            None => break,
        }
    }
    #[allow(clippy::cast_possible_truncation)] // bounded by the check above
    let value = value as u32;
    Ok(value)
}

/// Loads a binary PGM image from the given reader.
///
/// # Errors
/// Returns an error if the stream is not a `P5` image, if the header is malformed,
/// if the maximum sample value is zero or above `255`, if the dimensions do not form
/// a valid raster, if the sample data is truncated, or if reading fails.
pub fn load(mut reader: impl BufRead) -> Result<RasterBuffer, PgmError> {
    let mut magic = [0; 2];
    reader.read_exact(&mut magic).map_err(|error| {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            PgmError::Magic
        } else {
            PgmError::Io(error)
        }
    })?;
    if magic != *b"P5" {
        return Err(PgmError::Magic);
    }

    let width = read_header_int(&mut reader)?;
    let height = read_header_int(&mut reader)?;
    let max_value = read_header_int(&mut reader)?;
    if max_value == 0 || max_value > u32::from(u8::MAX) {
        return Err(PgmError::MaxValue(max_value));
    }

    let expected = u64::from(width) * u64::from(height);
    if expected > u64::from(MAX_PIXELS) {
        return Err(PgmError::Raster(RasterError::AboveMaxPixels));
    }

    #[allow(clippy::cast_possible_truncation)] // bounded by MAX_PIXELS
    let mut samples = vec![0; expected as usize];
    let mut filled = 0;
    while filled < samples.len() {
        match reader.read(&mut samples[filled..]) {
            Ok(0) => {
                return Err(PgmError::Truncated { expected, actual: filled as u64 });
            }
            Ok(read) => filled += read,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => return Err(error.into()),
        }
    }

    RasterBuffer::new(width, height, samples).map_err(PgmError::Raster)
}

/// Loads a binary PGM image from the given file path.
///
/// # Errors
/// Returns an error if the file cannot be opened or does not contain a valid image;
/// see [`load`].
pub fn load_path(path: impl AsRef<Path>) -> Result<RasterBuffer, PgmError> {
    load(BufReader::new(File::open(path)?))
}

/// Writes the image as a binary PGM with a maximum sample value of `255`.
///
/// # Errors
/// Returns an error if writing fails.
pub fn write(mut writer: impl Write, img: &RasterBuffer) -> io::Result<()> {
    write!(writer, "P5\n{} {}\n255\n", img.width(), img.height())?;
    writer.write_all(img.samples())
}

/// Writes the image as a binary PGM to the given file path.
///
/// # Errors
/// Returns an error if the file cannot be created or writing fails.
pub fn write_path(path: impl AsRef<Path>, img: &RasterBuffer) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write(&mut file, img)?;
    file.flush()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{synth, TileSize};

    fn load_bytes(bytes: &[u8]) -> Result<RasterBuffer, PgmError> {
        load(bytes)
    }

    #[test]
    fn round_trips_through_memory() {
        let img = synth::checkerboard(16, 16, TileSize::square(8).unwrap()).unwrap();
        let mut bytes = Vec::new();
        write(&mut bytes, &img).unwrap();
        assert!(bytes.starts_with(b"P5\n16 16\n255\n"));
        assert_eq!(load_bytes(&bytes).unwrap(), img);
    }

    #[test]
    fn parses_comments_and_arbitrary_whitespace() {
        let mut bytes = b"P5 # a comment\n# another one\n 3\t2\r\n255\n".to_vec();
        bytes.extend_from_slice(&[0, 1, 2, 3, 4, 5]);
        let img = load_bytes(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!(img.samples(), [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn rejects_other_magic_numbers() {
        assert!(matches!(load_bytes(b"P2\n3 2\n255\n"), Err(PgmError::Magic)));
        assert!(matches!(load_bytes(b""), Err(PgmError::Magic)));
        assert!(matches!(load_bytes(b"P"), Err(PgmError::Magic)));
    }

    #[test]
    fn rejects_malformed_headers() {
        assert!(matches!(load_bytes(b"P5\n"), Err(PgmError::Header)));
        assert!(matches!(load_bytes(b"P5\nthree 2\n255\n"), Err(PgmError::Header)));
        assert!(matches!(load_bytes(b"P5\n3 -2\n255\n"), Err(PgmError::Header)));
        assert!(matches!(
            load_bytes(b"P5\n99999999999 2\n255\n"),
            Err(PgmError::Header)
        ));
    }

    #[test]
    fn rejects_unsupported_max_values() {
        assert!(matches!(
            load_bytes(b"P5\n3 2\n0\n\0\0\0\0\0\0"),
            Err(PgmError::MaxValue(0))
        ));
        assert!(matches!(
            load_bytes(b"P5\n3 2\n65535\n\0\0\0\0\0\0"),
            Err(PgmError::MaxValue(65535))
        ));
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert!(matches!(
            load_bytes(b"P5\n0 2\n255\n"),
            Err(PgmError::Raster(RasterError::ZeroDimension))
        ));
    }

    #[test]
    fn rejects_truncated_sample_data() {
        let mut bytes = b"P5\n4 4\n255\n".to_vec();
        bytes.extend_from_slice(&[7; 10]);
        assert!(matches!(
            load_bytes(&bytes),
            Err(PgmError::Truncated { expected: 16, actual: 10 })
        ));
    }
}
