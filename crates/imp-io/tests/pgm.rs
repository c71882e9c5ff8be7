//! P5 encoding: byte-exact fixtures, typed round trips and failure modes.

#![cfg(feature = "pgm")]

use half::f16;
use imp_core::{Matrix, Scalar};
use imp_io::{pgm, IoError};
use std::io::{Cursor, Seek, SeekFrom};

fn encode<T: Scalar>(m: &Matrix<'_, T>, max: T, black: T) -> Vec<u8> {
    let mut out = Vec::new();
    pgm::save_with_black_level(&mut out, m, max, black).expect("save");
    out
}

fn split_header(bytes: &[u8], header: &[u8]) -> Vec<u8> {
    assert!(
        bytes.starts_with(header),
        "header {:?}",
        String::from_utf8_lossy(&bytes[..header.len().min(bytes.len())])
    );
    bytes[header.len()..].to_vec()
}

#[test]
fn integer_8bit_fixture() {
    let m = Matrix::from_rows(&[[4i32, 8], [16, 24]]);
    let out = encode(&m, 24, 0);
    assert_eq!(
        out,
        [0x50u8, 0x35, 0x0A, 0x32, 0x20, 0x32, 0x0A, 0x32, 0x35, 0x35, 0x0A, 0x2B, 0x55, 0xAA, 0xFF]
    );
}

#[test]
fn float_always_16bit() {
    let m = Matrix::from_rows(&[[4.0f64, 8.0], [16.0, 24.0]]);
    let body = split_header(&encode(&m, 24.0, 0.0), b"P5\n2 2\n65535\n");
    assert_eq!(body, [0x2Au8, 0xAB, 0x55, 0x55, 0xAA, 0xAA, 0xFF, 0xFF]);
}

#[test]
fn integer_16bit_fixture() {
    let m = Matrix::from_rows(&[[16u16, 1600], [16, 800]]);
    let body = split_header(&encode(&m, 1600, 0), b"P5\n2 2\n65535\n");
    assert_eq!(body, [0x02u8, 0x8F, 0xFF, 0xFF, 0x02, 0x8F, 0x80, 0x00]);
}

#[test]
fn black_level_fixture() {
    let m = Matrix::from_rows(&[[16u8, 255], [16, 32]]);
    let bytes = encode(&m, 255, 16);
    let body = split_header(&bytes, b"P5\n2 2\n255\n");
    assert_eq!(body, [0x00u8, 0xFF, 0x00, 0x11]);

    let back = pgm::load_with_black_level(&mut bytes.as_slice(), 255u8, 16).unwrap();
    assert_eq!(back, m);
}

#[test]
fn float_round_trip_within_quantization_step() {
    let m = Matrix::from_rows(&[[4.0f32, 8.0], [16.0, 24.0]]);
    let back: Matrix<f32> = pgm::load(&mut encode(&m, 24.0, 0.0).as_slice(), 24.0).unwrap();
    assert!(back.is_owned());
    assert!(back.approx_eq(&m, 24.0 / 65535.0));
    approx::assert_abs_diff_eq!(back[0], 4.0, epsilon = 24.0 / 65535.0);
}

/// `rows x cols` values spread evenly over `[black, max]`.
fn ramp<T: Scalar>(rows: usize, cols: usize, max: f64, black: f64) -> Matrix<'static, T> {
    let n = rows * cols;
    let data = (0..n)
        .map(|k| T::from_f64(black + (max - black) * k as f64 / (n - 1) as f64))
        .collect();
    Matrix::from_vec(rows, cols, data).unwrap()
}

fn round_trip<T: Scalar>(max: f64, black: f64, tolerance: f64) {
    let m = ramp::<T>(3, 4, max, black);
    let (max, black) = (T::from_f64(max), T::from_f64(black));

    let mut stream = Cursor::new(Vec::new());
    pgm::save_with_black_level(&mut stream, &m, max, black).unwrap();
    stream.seek(SeekFrom::Start(0)).unwrap();
    let back = pgm::load_with_black_level(&mut stream, max, black).unwrap();

    assert_eq!(back.shape(), (3, 4));
    if T::IS_FLOAT {
        assert!(back.approx_eq(&m, tolerance), "{back:?} vs {m:?}");
    } else {
        assert_eq!(back, m);
    }
}

macro_rules! round_trip_suite {
    ($($name:ident: $t:ty => [$(($max:expr, $black:expr)),+ $(,)?]),* $(,)?) => {
        $(
            #[test]
            fn $name() {
                $(
                    let range: f64 = $max - $black;
                    let tolerance = if <$t>::IS_FLOAT { range / 1000.0 } else { 0.0 };
                    round_trip::<$t>($max, $black, tolerance);
                )+
            }
        )*
    };
}

round_trip_suite! {
    round_trip_u8: u8 => [(24.0, 0.0), (255.0, 16.0), (200.0, 100.0)],
    round_trip_i8: i8 => [(24.0, 0.0), (100.0, -100.0), (-10.0, -120.0)],
    round_trip_u16: u16 => [(24.0, 0.0), (1600.0, 0.0), (65535.0, 0.0)],
    round_trip_i16: i16 => [(255.0, 0.0), (1600.0, -1600.0)],
    round_trip_u32: u32 => [(24.0, 0.0), (40000.0, 16.0)],
    round_trip_i32: i32 => [(24.0, -24.0), (30000.0, -30000.0)],
    round_trip_u64: u64 => [(1600.0, 0.0)],
    round_trip_i64: i64 => [(255.0, 0.0), (1000.0, -1000.0)],
    round_trip_f16: f16 => [(24.0, 0.0), (1.0, -1.0)],
    round_trip_f32: f32 => [(24.0, 0.0), (1.0, 0.25), (1600.0, 16.0)],
    round_trip_f64: f64 => [(24.0, 0.0), (1e6, -1e6)],
}

#[test]
fn invalid_range_rejected_both_ways() {
    let m = Matrix::from_row(&[1u8, 2]);
    let mut out = Vec::new();
    let err = pgm::save_with_black_level(&mut out, &m, 10, 10).unwrap_err();
    assert!(matches!(err, IoError::InvalidRange { .. }));
    assert!(out.is_empty());

    let bytes = encode(&m, 2, 0);
    assert!(matches!(
        pgm::load_with_black_level(&mut bytes.as_slice(), 2u8, 5),
        Err(IoError::InvalidRange { .. })
    ));
}

#[test]
fn truncated_body() {
    let m = Matrix::from_rows(&[[1u16, 2], [3, 1000]]);
    let bytes = encode(&m, 1000, 0);
    let cut = &bytes[..bytes.len() - 3];
    match pgm::load::<u16, _>(&mut &cut[..], 1000) {
        Err(IoError::Truncated { expected, actual }) => {
            assert_eq!(expected, 8);
            assert_eq!(actual, 5);
        }
        other => panic!("expected truncation, got {other:?}"),
    }
}

#[test]
fn huge_header_with_short_body_is_truncated() {
    let data = b"P5\n1000000000 1000000000\n255\n\x01\x02";
    match pgm::load::<u8, _>(&mut &data[..], 255) {
        Err(IoError::Truncated { expected, actual }) => {
            assert_eq!(expected, 1_000_000_000_000_000_000);
            assert_eq!(actual, 2);
        }
        other => panic!("expected truncation, got {other:?}"),
    }
}

#[test]
fn empty_stream_is_truncated() {
    let err = pgm::load::<u8, _>(&mut &b""[..], 255).unwrap_err();
    assert!(err.is_truncated());
}

#[test]
fn malformed_headers() {
    for data in [&b"P3\n1 1\n255\n\0"[..], b"P5\n1 -1\n255\n\0", b"P5 a b 255 \0", b"P51 1\n255\n\0"] {
        let err = pgm::load::<u8, _>(&mut &data[..], 255).unwrap_err();
        assert!(err.is_format_error(), "{err}");
    }
}

#[test]
fn fixed_size_stream() {
    let m = Matrix::from_rows(&[[4u8, 8], [16, 24]]);
    let mut storage = [0u8; 15];
    let mut stream = Cursor::new(&mut storage[..]);
    pgm::save(&mut stream, &m, 24).unwrap();
    stream.set_position(0);
    assert_eq!(pgm::load::<u8, _>(&mut stream, 24).unwrap(), m);

    let mut small = [0u8; 12];
    let err = pgm::save(&mut Cursor::new(&mut small[..]), &m, 24).unwrap_err();
    assert!(matches!(err, IoError::Io(_)));
}

#[test]
fn borrowed_source_saves_like_owned() {
    let mut raw = [4u8, 8, 16, 24];
    let mapped = Matrix::map(2, 2, &mut raw).unwrap();
    let owned = Matrix::from_rows(&[[4u8, 8], [16, 24]]);
    assert_eq!(encode(&mapped, 24, 0), encode(&owned, 24, 0));
}
