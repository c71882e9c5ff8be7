//! Shared netpbm machinery for the binary P5/P6 formats.
//!
//! # Layout
//!
//! ```text
//! P5\n            magic (P5 gray, P6 rgb)
//! <width> <height>\n
//! <max_sample>\n  255 or 65535 when written by this crate
//! <body>          1 or 2 bytes per sample, 16-bit big-endian
//! ```
//!
//! The reader accepts any ASCII whitespace between header fields and `#`
//! comments running to the end of a line. Exactly one whitespace byte
//! separates `max_sample` from the body.
//!
//! # Quantization
//!
//! Values are mapped from `[black, max]` onto `[0, 2^depth - 1]`:
//!
//! | Element type | `max - black` | Depth |
//! |--------------|---------------|-------|
//! | integer | `<= 255` | 8-bit |
//! | integer | `> 255` | 16-bit |
//! | float | any | 16-bit |
//!
//! `sample = round(clamp((v - black) * (2^depth - 1) / (max - black)))`
//! with rounding half away from zero, and on load
//! `v = black + sample * (max - black) / max_sample`.

use crate::error::{IoError, IoResult};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use imp_core::Scalar;
use std::fmt;
use std::io::{ErrorKind, Read, Write};

/// Format magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magic {
    /// `P5`: single-channel binary graymap.
    Gray,
    /// `P6`: three-channel binary pixmap.
    Rgb,
}

impl Magic {
    /// The two magic bytes.
    pub fn as_bytes(self) -> &'static [u8; 2] {
        match self {
            Magic::Gray => b"P5",
            Magic::Rgb => b"P6",
        }
    }

    /// Samples per pixel.
    pub fn channels(self) -> usize {
        match self {
            Magic::Gray => 1,
            Magic::Rgb => 3,
        }
    }

    /// Identifies a map from its leading bytes.
    ///
    /// ```rust
    /// use imp_io::pnm::Magic;
    ///
    /// assert_eq!(Magic::detect(b"P6\n4 4\n255\n"), Some(Magic::Rgb));
    /// assert_eq!(Magic::detect(b"\x89PNG"), None);
    /// ```
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [a, b, ..] => Self::from_bytes([*a, *b]),
            _ => None,
        }
    }

    fn from_bytes(bytes: [u8; 2]) -> Option<Self> {
        match &bytes {
            b"P5" => Some(Magic::Gray),
            b"P6" => Some(Magic::Rgb),
            _ => None,
        }
    }
}

impl fmt::Display for Magic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b] = *self.as_bytes();
        write!(f, "{}{}", a as char, b as char)
    }
}

/// Bits per stored sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleDepth {
    /// One byte per sample.
    Bit8,
    /// Two big-endian bytes per sample.
    Bit16,
}

impl SampleDepth {
    /// Bits per sample.
    pub fn bits(self) -> u32 {
        match self {
            SampleDepth::Bit8 => 8,
            SampleDepth::Bit16 => 16,
        }
    }

    /// Largest sample, `2^bits - 1`.
    pub fn max_sample(self) -> u16 {
        match self {
            SampleDepth::Bit8 => u8::MAX as u16,
            SampleDepth::Bit16 => u16::MAX,
        }
    }

    /// Bytes per sample.
    pub fn bytes(self) -> usize {
        match self {
            SampleDepth::Bit8 => 1,
            SampleDepth::Bit16 => 2,
        }
    }

    /// Depth implied by a declared `max_sample`.
    pub fn from_max_sample(max_sample: u16) -> Self {
        if max_sample > u8::MAX as u16 {
            SampleDepth::Bit16
        } else {
            SampleDepth::Bit8
        }
    }
}

/// Parsed or to-be-written header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Format magic.
    pub magic: Magic,
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
    /// Declared maximum sample (`1..=65535`).
    pub max_sample: u16,
}

impl Header {
    /// Header for a map written at `depth`.
    pub fn new(magic: Magic, width: usize, height: usize, depth: SampleDepth) -> Self {
        Self {
            magic,
            width,
            height,
            max_sample: depth.max_sample(),
        }
    }

    /// Sample depth implied by `max_sample`.
    pub fn depth(&self) -> SampleDepth {
        SampleDepth::from_max_sample(self.max_sample)
    }

    /// Total samples in the body.
    pub fn sample_count(&self) -> IoResult<usize> {
        self.width
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(self.magic.channels()))
            .ok_or_else(|| {
                IoError::format(format!("{}x{} image is too large", self.width, self.height))
            })
    }

    /// Body length in bytes.
    pub fn body_len(&self) -> IoResult<usize> {
        self.sample_count()?
            .checked_mul(self.depth().bytes())
            .ok_or_else(|| {
                IoError::format(format!("{}x{} image is too large", self.width, self.height))
            })
    }

    /// Writes the ASCII header.
    pub fn write<W: Write>(&self, w: &mut W) -> IoResult<()> {
        w.write_all(self.magic.as_bytes())?;
        write!(w, "\n{} {}\n{}\n", self.width, self.height, self.max_sample)?;
        Ok(())
    }

    /// Reads and validates a header, leaving `r` at the first body byte.
    pub fn read<R: Read>(r: &mut R) -> IoResult<Self> {
        let mut p = HeaderParser { inner: r, consumed: 0 };

        let magic_bytes = [p.byte()?, p.byte()?];
        let magic = Magic::from_bytes(magic_bytes).ok_or_else(|| {
            IoError::format(format!(
                "unknown magic {:?}",
                String::from_utf8_lossy(&magic_bytes)
            ))
        })?;
        let sep = p.byte()?;
        if !sep.is_ascii_whitespace() {
            return Err(IoError::format(format!(
                "expected whitespace after magic, found {:?}",
                char::from(sep)
            )));
        }

        let width = p.field("width")?;
        let height = p.field("height")?;
        let max_sample = p.field("max sample")?;
        let max_sample = u16::try_from(max_sample)
            .ok()
            .filter(|&m| m > 0)
            .ok_or_else(|| IoError::format(format!("max sample {max_sample} outside 1..=65535")))?;

        Ok(Self {
            magic,
            width,
            height,
            max_sample,
        })
    }

    /// Reads a header and checks its magic.
    pub fn read_expecting<R: Read>(r: &mut R, magic: Magic) -> IoResult<Self> {
        let header = Self::read(r)?;
        if header.magic != magic {
            return Err(IoError::format(format!(
                "expected {magic} magic, found {}",
                header.magic
            )));
        }
        Ok(header)
    }
}

struct HeaderParser<'r, R> {
    inner: &'r mut R,
    consumed: usize,
}

impl<R: Read> HeaderParser<'_, R> {
    fn byte(&mut self) -> IoResult<u8> {
        match self.inner.read_u8() {
            Ok(b) => {
                self.consumed += 1;
                Ok(b)
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(IoError::Truncated {
                expected: self.consumed + 1,
                actual: self.consumed,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Skips whitespace and comments, returning the first other byte.
    fn skip_blank(&mut self) -> IoResult<u8> {
        loop {
            match self.byte()? {
                b'#' => while !matches!(self.byte()?, b'\n' | b'\r') {},
                b if b.is_ascii_whitespace() => {}
                b => return Ok(b),
            }
        }
    }

    /// One unsigned decimal field plus its single terminating whitespace.
    fn field(&mut self, name: &str) -> IoResult<usize> {
        let mut b = self.skip_blank()?;
        if !b.is_ascii_digit() {
            return Err(IoError::format(format!(
                "expected unsigned {name}, found {:?}",
                b as char
            )));
        }
        let mut value: usize = 0;
        while b.is_ascii_digit() {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(usize::from(b - b'0')))
                .ok_or_else(|| IoError::format(format!("{name} overflows")))?;
            b = self.byte()?;
        }
        if !b.is_ascii_whitespace() {
            return Err(IoError::format(format!(
                "unexpected {:?} after {name}",
                b as char
            )));
        }
        Ok(value)
    }
}

/// Maps element values onto integer samples and back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    black: f64,
    range: f64,
    depth: SampleDepth,
}

impl Quantizer {
    /// Quantizer for values in `[black, max]` of element type `T`.
    ///
    /// # Errors
    ///
    /// [`IoError::InvalidRange`] unless `max > black`.
    pub fn new<T: Scalar>(max: T, black: T) -> IoResult<Self> {
        let (max, black) = (max.to_f64(), black.to_f64());
        let range = max - black;
        if range.is_nan() || range <= 0.0 {
            return Err(IoError::InvalidRange { max, black });
        }
        let depth = if !T::IS_FLOAT && range <= u8::MAX as f64 {
            SampleDepth::Bit8
        } else {
            SampleDepth::Bit16
        };
        Ok(Self { black, range, depth })
    }

    /// Depth chosen for this range and element type.
    pub fn depth(&self) -> SampleDepth {
        self.depth
    }

    /// Quantizes `v` at this quantizer's depth.
    pub fn quantize<T: Scalar>(&self, v: T) -> u16 {
        let top = self.depth.max_sample() as f64;
        let scaled = (v.to_f64() - self.black) * top / self.range;
        // NaN lands on 0
        scaled.clamp(0.0, top).round() as u16
    }

    /// Maps `sample` of a map declaring `max_sample` back to `T`.
    pub fn dequantize<T: Scalar>(&self, sample: u16, max_sample: u16) -> T {
        T::from_f64(self.black + sample as f64 * self.range / max_sample as f64)
    }
}

/// Quantizes `values` and writes them as the body.
pub(crate) fn write_samples<W, T, I>(w: &mut W, q: &Quantizer, len: usize, values: I) -> IoResult<()>
where
    W: Write,
    T: Scalar,
    I: IntoIterator<Item = T>,
{
    let mut body = Vec::with_capacity(len * q.depth().bytes());
    for v in values {
        let s = q.quantize(v);
        match q.depth() {
            SampleDepth::Bit8 => body.push(s as u8),
            SampleDepth::Bit16 => body.write_u16::<BigEndian>(s)?,
        }
    }
    w.write_all(&body)?;
    Ok(())
}

/// Reads the body declared by `header` as raw samples.
pub(crate) fn read_samples<R: Read>(r: &mut R, header: &Header) -> IoResult<Vec<u16>> {
    let body = read_body(r, header.body_len()?)?;
    let samples: Vec<u16> = match header.depth() {
        SampleDepth::Bit8 => body.iter().map(|&b| u16::from(b)).collect(),
        SampleDepth::Bit16 => body
            .chunks_exact(2)
            .map(|mut c| c.read_u16::<BigEndian>())
            .collect::<Result<_, _>>()?,
    };
    if let Some(&s) = samples.iter().find(|&&s| s > header.max_sample) {
        return Err(IoError::format(format!(
            "sample {s} exceeds declared max {}",
            header.max_sample
        )));
    }
    Ok(samples)
}

/// Initial body capacity; the buffer grows with the bytes actually read,
/// never with the declared size alone.
const BODY_CHUNK: usize = 1 << 16;

fn read_body<R: Read>(r: &mut R, len: usize) -> IoResult<Vec<u8>> {
    let mut body = Vec::with_capacity(len.min(BODY_CHUNK));
    r.by_ref().take(len as u64).read_to_end(&mut body)?;
    if body.len() < len {
        return Err(IoError::Truncated {
            expected: len,
            actual: body.len(),
        });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_depth_selection() {
        assert_eq!(Quantizer::new(255u16, 0).unwrap().depth(), SampleDepth::Bit8);
        assert_eq!(Quantizer::new(271i32, 16).unwrap().depth(), SampleDepth::Bit8);
        assert_eq!(Quantizer::new(256u16, 0).unwrap().depth(), SampleDepth::Bit16);
        assert_eq!(Quantizer::new(1.0f32, 0.0).unwrap().depth(), SampleDepth::Bit16);
    }

    #[test]
    fn test_invalid_range() {
        assert!(matches!(
            Quantizer::new(10u8, 10),
            Err(IoError::InvalidRange { max, black }) if max == 10.0 && black == 10.0
        ));
        assert!(Quantizer::new(-1i8, 0).is_err());
        assert!(Quantizer::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_quantize_rounds_half_away() {
        let q = Quantizer::new(24u8, 0).unwrap();
        assert_eq!(q.quantize(4u8), 0x2B);
        let q = Quantizer::new(1600u16, 0).unwrap();
        assert_eq!(q.quantize(800u16), 0x8000);
        assert_eq!(q.quantize(16u16), 0x028F);
    }

    #[test]
    fn test_quantize_clamps() {
        let q = Quantizer::new(100i32, 50).unwrap();
        assert_eq!(q.quantize(10i32), 0);
        assert_eq!(q.quantize(500i32), 255);
    }

    #[test]
    fn test_dequantize_integer_exact() {
        let q = Quantizer::new(24i32, 0).unwrap();
        for v in 0..=24 {
            let s = q.quantize(v);
            assert_eq!(q.dequantize::<i32>(s, 255), v);
        }
    }

    #[test]
    fn test_header_write() {
        let mut out = Vec::new();
        Header::new(Magic::Rgb, 3, 2, SampleDepth::Bit16)
            .write(&mut out)
            .unwrap();
        assert_eq!(out, b"P6\n3 2\n65535\n");
    }

    #[test]
    fn test_header_read_comments() {
        let data = b"P5 # made by hand\n  4\t# width\n3\n# max\n255\nrest";
        let mut r = Cursor::new(&data[..]);
        let h = Header::read(&mut r).unwrap();
        assert_eq!(h, Header::new(Magic::Gray, 4, 3, SampleDepth::Bit8));
        assert_eq!(&data[r.position() as usize..], b"rest");
    }

    #[test]
    fn test_header_errors() {
        let cases: &[&[u8]] = &[
            b"P4\n1 1\n255\n",
            b"P5\n-1 1\n255\n",
            b"P5\n1x 1\n255\n",
            b"P5\n1 1\n0\n",
            b"P5\n1 1\n65536\n",
            b"P51 1\n255\n",
            b"P5#x\n1 1\n255\n",
        ];
        for data in cases {
            let err = Header::read(&mut Cursor::new(*data)).unwrap_err();
            assert!(err.is_format_error(), "{err}");
        }
        let err = Header::read(&mut Cursor::new(&b"P6\n2 "[..])).unwrap_err();
        assert!(matches!(err, IoError::Truncated { expected: 6, actual: 5 }));
    }

    #[test]
    fn test_read_expecting() {
        let mut r = Cursor::new(&b"P6\n1 1\n255\n"[..]);
        let err = Header::read_expecting(&mut r, Magic::Gray).unwrap_err();
        assert!(err.to_string().contains("expected P5"));
    }

    #[test]
    fn test_truncated_body() {
        let h = Header::new(Magic::Gray, 2, 2, SampleDepth::Bit16);
        let err = read_samples(&mut Cursor::new(&[0u8; 5][..]), &h).unwrap_err();
        assert!(matches!(err, IoError::Truncated { expected: 8, actual: 5 }));
    }

    #[test]
    fn test_huge_declared_body_is_truncated() {
        let h = Header::new(Magic::Rgb, 100_000, 100_000, SampleDepth::Bit16);
        let err = read_samples(&mut Cursor::new(&[1u8, 2, 3][..]), &h).unwrap_err();
        assert!(matches!(
            err,
            IoError::Truncated { expected: 60_000_000_000, actual: 3 }
        ));
    }

    #[test]
    fn test_sample_above_max() {
        let h = Header { magic: Magic::Gray, width: 1, height: 1, max_sample: 100 };
        assert!(read_samples(&mut Cursor::new(&[200u8][..]), &h).unwrap_err().is_format_error());
    }
}
