// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use waste_sorter::vision::image_utils::{decode_image_bytes_with_limit, to_rgb, ImageError};
use waste_sorter::vision::{decode_image_bytes, detect_format};

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

#[test]
fn test_decode_png_and_jpeg() {
    let rgba = RgbaImage::from_pixel(8, 6, Rgba([10, 20, 30, 255]));
    let png = encode(DynamicImage::ImageRgba8(rgba.clone()), ImageFormat::Png);
    let (_, info) = decode_image_bytes(&png).unwrap();
    assert_eq!((info.width, info.height), (8, 6));
    assert_eq!(info.format, ImageFormat::Png);

    let jpeg = encode(
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8()),
        ImageFormat::Jpeg,
    );
    assert_eq!(detect_format(&jpeg).unwrap(), ImageFormat::Jpeg);
}

#[test]
fn test_alpha_is_dropped() {
    let rgba = RgbaImage::from_pixel(2, 2, Rgba([200, 100, 50, 7]));
    let rgb = to_rgb(&DynamicImage::ImageRgba8(rgba));
    assert_eq!(rgb.get_pixel(1, 1).0, [200, 100, 50]);
}

#[test]
fn test_rejects_bad_input() {
    assert!(matches!(decode_image_bytes(&[]), Err(ImageError::EmptyData)));
    assert!(matches!(
        decode_image_bytes(b"hello world, not an image"),
        Err(ImageError::UnsupportedFormat)
    ));
    assert!(matches!(
        decode_image_bytes_with_limit(&[0u8; 32], 16),
        Err(ImageError::TooLarge(32, 16))
    ));
}
