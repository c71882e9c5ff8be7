//! Binary graymap (P5) encoding of single-channel [`Matrix`] values.
//!
//! The header's width is the matrix column count and its height the row
//! count; samples follow in row-major order.
//!
//! # Example
//!
//! ```rust
//! use imp_core::Matrix;
//! use imp_io::pgm;
//!
//! let m = Matrix::from_rows(&[[4u8, 8], [16, 24]]);
//! let mut bytes = Vec::new();
//! pgm::save(&mut bytes, &m, 24).unwrap();
//! assert_eq!(&bytes[..11], b"P5\n2 2\n255\n");
//! assert_eq!(&bytes[11..], &[0x2B, 0x55, 0xAA, 0xFF]);
//!
//! let back: Matrix<u8> = pgm::load(&mut bytes.as_slice(), 24).unwrap();
//! assert_eq!(back, m);
//! ```

use crate::error::IoResult;
use crate::pnm::{self, Header, Magic, Quantizer};
use imp_core::{Matrix, Scalar};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

/// Writes `m` with values in `[0, max]`.
pub fn save<W: Write, T: Scalar>(w: &mut W, m: &Matrix<'_, T>, max: T) -> IoResult<()> {
    save_with_black_level(w, m, max, T::zero())
}

/// Writes `m` with values in `[black, max]`; `black` maps to sample 0.
///
/// # Errors
///
/// [`IoError::InvalidRange`](crate::IoError::InvalidRange) unless
/// `max > black`, or any stream error.
pub fn save_with_black_level<W: Write, T: Scalar>(
    w: &mut W,
    m: &Matrix<'_, T>,
    max: T,
    black: T,
) -> IoResult<()> {
    let q = Quantizer::new(max, black)?;
    let header = Header::new(Magic::Gray, m.cols(), m.rows(), q.depth());
    debug!(
        width = header.width,
        height = header.height,
        bits = q.depth().bits(),
        "writing P5"
    );
    header.write(w)?;
    pnm::write_samples(w, &q, m.len(), m.as_slice().iter().copied())
}

/// Reads a P5 map with values in `[0, max]`.
pub fn load<T: Scalar, R: Read>(r: &mut R, max: T) -> IoResult<Matrix<'static, T>> {
    load_with_black_level(r, max, T::zero())
}

/// Reads a P5 map into a fresh Owned matrix with values in `[black, max]`.
///
/// # Errors
///
/// - [`IoError::Format`](crate::IoError::Format) for a malformed header or
///   a non-P5 magic
/// - [`IoError::Truncated`](crate::IoError::Truncated) if the stream ends
///   early
/// - [`IoError::InvalidRange`](crate::IoError::InvalidRange) unless
///   `max > black`
pub fn load_with_black_level<T: Scalar, R: Read>(
    r: &mut R,
    max: T,
    black: T,
) -> IoResult<Matrix<'static, T>> {
    let q = Quantizer::new(max, black)?;
    let header = Header::read_expecting(r, Magic::Gray)?;
    debug!(
        width = header.width,
        height = header.height,
        max_sample = header.max_sample,
        "reading P5"
    );
    let data = pnm::read_samples(r, &header)?
        .into_iter()
        .map(|s| q.dequantize(s, header.max_sample))
        .collect();
    Ok(Matrix::from_vec(header.height, header.width, data)?)
}

/// Writes `m` to a file at `path`.
pub fn write_file<P: AsRef<Path>, T: Scalar>(
    path: P,
    m: &Matrix<'_, T>,
    max: T,
    black: T,
) -> IoResult<()> {
    let mut w = BufWriter::new(File::create(path)?);
    save_with_black_level(&mut w, m, max, black)?;
    w.flush()?;
    Ok(())
}

/// Reads a P5 file at `path`.
pub fn read_file<P: AsRef<Path>, T: Scalar>(
    path: P,
    max: T,
    black: T,
) -> IoResult<Matrix<'static, T>> {
    let mut r = BufReader::new(File::open(path)?);
    load_with_black_level(&mut r, max, black)
}
