//! RgbImage planes, channel access and lifecycle across element types.

use half::f16;
use imp_core::{Channel, Error, Matrix, RgbImage, Scalar, StorageMode};

fn v<T: Scalar>(x: f64) -> T {
    T::from_f64(x)
}

/// 3 wide, 2 tall; R = 1..6, G = 11..16, B = 21..26.
fn sample<T: Scalar>() -> RgbImage<'static, T> {
    RgbImage::from_planes(&[
        [[v(1.0), v(2.0), v(3.0)], [v(4.0), v(5.0), v(6.0)]],
        [[v(11.0), v(12.0), v(13.0)], [v(14.0), v(15.0), v(16.0)]],
        [[v(21.0), v(22.0), v(23.0)], [v(24.0), v(25.0), v(26.0)]],
    ])
}

fn channel_accessors<T: Scalar>() {
    let img = sample::<T>();
    assert_eq!((img.width(), img.height()), (3, 2));
    assert_eq!(img.len(), 18);
    assert_eq!(img.color(4, Channel::R), v(5.0));
    assert_eq!(img.color_at(1, 0, Channel::G), v(14.0));
    assert_eq!(img[(0, 2, Channel::B)], v(23.0));
    assert_eq!(img.g_plane()[(1, 2)], v(16.0));
    assert_eq!(img.b_plane()[0], v(21.0));
    assert_eq!(img[7], v(12.0));
    assert_eq!(img.pixel(1, 1), [v(5.0), v(15.0), v(25.0)]);
}

fn planes_share_image_buffer<T: Scalar>() {
    let mut img = sample::<T>();
    let base = img.as_ptr() as usize;
    let step = img.plane_size() * std::mem::size_of::<T>();
    for (i, view) in img.views().iter().enumerate() {
        assert_eq!(view.offset, i * 6);
        assert_eq!(img.plane(view.channel).as_ptr() as usize, base + i * step);
    }

    *img.color_at_mut(0, 0, Channel::R) = v(100.0);
    *img.color_mut(5, Channel::B) = v(101.0);
    assert_eq!(img.r_plane()[(0, 0)], v(100.0));
    assert_eq!(img.as_slice()[17], v(101.0));
    assert!(!img.r_plane().is_owned());
}

fn plane_reassignment<T: Scalar>() {
    let mut img = sample::<T>();
    let ptr = img.as_ptr();
    {
        let mut r = img.r_plane_mut();
        assert_eq!(r.mode(), StorageMode::Borrowed);
        let err = r.assign_rows(&[[v(0.0); 3]]).unwrap_err();
        assert_eq!(err, Error::SizeMismatch { expected: 6, got: 3 });
    }
    assert_eq!(img, sample());

    let replacement = Matrix::from_rows(&[[v::<T>(7.0); 3]; 2]);
    img.g_plane_mut().assign(&replacement).unwrap();
    assert_eq!(img.as_ptr(), ptr);
    assert_eq!(img.g_plane(), replacement);
    assert_eq!(img.r_plane(), sample::<T>().r_plane());
    assert_eq!(img.b_plane(), sample::<T>().b_plane());
}

fn copy_and_move<T: Scalar>() {
    let mut data: Vec<T> = sample::<T>().as_slice().to_vec();
    let ptr = data.as_ptr();
    let mut mapped = RgbImage::map(3, 2, &mut data).unwrap();
    assert!(!mapped.is_owned());
    assert_eq!(mapped.as_ptr(), ptr);

    let copy = mapped.clone();
    assert!(copy.is_owned());
    assert_ne!(copy.as_ptr(), ptr);
    assert_eq!(copy, mapped);
    assert_eq!(copy, sample());

    let moved = mapped.take();
    assert_eq!(moved.as_ptr(), ptr);
    assert_eq!((mapped.width(), mapped.height()), (0, 0));
    assert!(mapped.as_ptr().is_null());
}

fn equality_across_modes<T: Scalar>() {
    let owned = sample::<T>();
    let copied = RgbImage::from_slice(3, 2, owned.as_slice()).unwrap();
    let stacked = RgbImage::from_matrices(
        &owned.r_plane().to_matrix(),
        &owned.g_plane().to_matrix(),
        &owned.b_plane().to_matrix(),
    )
    .unwrap();
    assert_eq!(owned, copied);
    assert_eq!(owned, stacked);

    let transposed = RgbImage::from_slice(2, 3, owned.as_slice()).unwrap();
    assert_ne!(owned, transposed);

    let mut changed = owned.clone();
    changed.set_pixel(1, 2, [v(0.0); 3]).unwrap();
    assert_ne!(owned, changed);
}

macro_rules! image_suite {
    ($($name:ident: $t:ty),* $(,)?) => {
        $(
            mod $name {
                use super::*;

                #[test]
                fn accessors() {
                    channel_accessors::<$t>();
                }

                #[test]
                fn shared_buffer() {
                    planes_share_image_buffer::<$t>();
                }

                #[test]
                fn reassignment() {
                    plane_reassignment::<$t>();
                }

                #[test]
                fn copy_move() {
                    copy_and_move::<$t>();
                }

                #[test]
                fn equality() {
                    equality_across_modes::<$t>();
                }
            }
        )*
    };
}

image_suite! {
    u8_image: u8,
    i8_image: i8,
    u16_image: u16,
    i16_image: i16,
    u32_image: u32,
    i32_image: i32,
    u64_image: u64,
    i64_image: i64,
    f16_image: f16,
    f32_image: f32,
    f64_image: f64,
}

#[test]
#[should_panic(expected = "out of bounds")]
fn coordinate_out_of_bounds_panics() {
    let img = RgbImage::<u8>::zeros(2, 2);
    let _v = img[(0, 2, Channel::G)];
}

#[test]
#[should_panic(expected = "(2, 0) out of bounds for 2x3 image")]
fn out_of_bounds_message_is_rows_by_cols() {
    let img = RgbImage::<u8>::zeros(3, 2);
    let _v = img[(2, 0, Channel::R)];
}

#[test]
fn zero_sized_image() {
    let img = RgbImage::<f32>::zeros(0, 4);
    assert!(img.is_empty());
    assert!(img.r_plane().is_empty());
    assert_eq!(img.len(), 0);
    assert_ne!(img, RgbImage::default());
}
