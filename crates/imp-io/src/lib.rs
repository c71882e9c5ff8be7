//! # imp-io
//!
//! Netpbm binary maps for imp containers:
//!
//! - **P5** ([`pgm`]) - one sample per pixel, from a [`Matrix`](imp_core::Matrix)
//! - **P6** ([`ppm`]) - interleaved RGB samples, from a planar
//!   [`RgbImage`](imp_core::RgbImage)
//!
//! Values are quantized from a caller-supplied `[black, max]` range to 8 or
//! 16 bits, see [`pnm`] for the exact rules.
//!
//! # Quick Start
//!
//! ```rust
//! use imp_core::RgbImage;
//! use imp_io::ppm;
//! use std::io::Cursor;
//!
//! let mut img = RgbImage::<f32>::zeros(4, 2);
//! img.r_plane_mut().fill(1.0);
//!
//! let mut stream = Cursor::new(Vec::new());
//! ppm::save(&mut stream, &img, 1.0)?;
//! stream.set_position(0);
//!
//! let back: RgbImage<f32> = ppm::load(&mut stream, 1.0)?;
//! assert!(back.approx_eq(&img, 1.0 / 65535.0));
//! # Ok::<(), imp_io::IoError>(())
//! ```
//!
//! # Streams
//!
//! Saving takes any [`std::io::Write`], loading any [`std::io::Read`]. The
//! header is read byte by byte, so a successful load leaves the stream
//! directly after the body. Use [`BufReader`](std::io::BufReader) over
//! unbuffered sources; the `read_file`/`write_file` helpers do.
//!
//! # Feature Flags
//!
//! - `pgm` - P5 support (default)
//! - `ppm` - P6 support (default)

#![warn(missing_docs)]

pub mod error;
pub mod pnm;

#[cfg(feature = "pgm")]
pub mod pgm;
#[cfg(feature = "ppm")]
pub mod ppm;

pub use error::{IoError, IoResult};
pub use pnm::{Magic, SampleDepth};
