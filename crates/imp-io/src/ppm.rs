//! Binary pixmap (P6) encoding of planar [`RgbImage`] values.
//!
//! Images are planar in memory; the body is interleaved `R, G, B` per
//! pixel in row-major order.

use crate::error::IoResult;
use crate::pnm::{self, Header, Magic, Quantizer};
use imp_core::{RgbImage, Scalar, CHANNELS};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

/// Writes `img` with values in `[0, max]`.
pub fn save<W: Write, T: Scalar>(w: &mut W, img: &RgbImage<'_, T>, max: T) -> IoResult<()> {
    save_with_black_level(w, img, max, T::zero())
}

/// Writes `img` with values in `[black, max]`.
///
/// # Errors
///
/// [`IoError::InvalidRange`](crate::IoError::InvalidRange) unless
/// `max > black`, or any stream error.
pub fn save_with_black_level<W: Write, T: Scalar>(
    w: &mut W,
    img: &RgbImage<'_, T>,
    max: T,
    black: T,
) -> IoResult<()> {
    let q = Quantizer::new(max, black)?;
    let header = Header::new(Magic::Rgb, img.width(), img.height(), q.depth());
    debug!(
        width = header.width,
        height = header.height,
        bits = q.depth().bits(),
        "writing P6"
    );
    header.write(w)?;

    let n = img.plane_size();
    let data = img.as_slice();
    let interleaved = (0..n).flat_map(|i| (0..CHANNELS).map(move |c| data[c * n + i]));
    pnm::write_samples(w, &q, img.len(), interleaved)
}

/// Reads a P6 map with values in `[0, max]`.
pub fn load<T: Scalar, R: Read>(r: &mut R, max: T) -> IoResult<RgbImage<'static, T>> {
    load_with_black_level(r, max, T::zero())
}

/// Reads a P6 map into a fresh Owned image with values in `[black, max]`.
///
/// # Errors
///
/// Same as [`pgm::load_with_black_level`](crate::pgm::load_with_black_level)
/// with a P6 magic expected.
pub fn load_with_black_level<T: Scalar, R: Read>(
    r: &mut R,
    max: T,
    black: T,
) -> IoResult<RgbImage<'static, T>> {
    let q = Quantizer::new(max, black)?;
    let header = Header::read_expecting(r, Magic::Rgb)?;
    debug!(
        width = header.width,
        height = header.height,
        max_sample = header.max_sample,
        "reading P6"
    );
    let samples = pnm::read_samples(r, &header)?;

    let n = header.width * header.height;
    let mut data = vec![T::zero(); samples.len()];
    for (i, px) in samples.chunks_exact(CHANNELS).enumerate() {
        for (c, &s) in px.iter().enumerate() {
            data[c * n + i] = q.dequantize(s, header.max_sample);
        }
    }
    Ok(RgbImage::from_vec(header.width, header.height, data)?)
}

/// Writes `img` to a file at `path`.
pub fn write_file<P: AsRef<Path>, T: Scalar>(
    path: P,
    img: &RgbImage<'_, T>,
    max: T,
    black: T,
) -> IoResult<()> {
    let mut w = BufWriter::new(File::create(path)?);
    save_with_black_level(&mut w, img, max, black)?;
    w.flush()?;
    Ok(())
}

/// Reads a P6 file at `path`.
pub fn read_file<P: AsRef<Path>, T: Scalar>(
    path: P,
    max: T,
    black: T,
) -> IoResult<RgbImage<'static, T>> {
    let mut r = BufReader::new(File::open(path)?);
    load_with_black_level(&mut r, max, black)
}
