//! Tiny in-memory images for exercising the imaging and provider paths.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgba};
use std::io::Cursor;

/// A 4x4 opaque red PNG
pub fn tiny_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
    let mut out = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}

/// A 4x4 gray PNG straddling the mask threshold: left half dark, right half light
pub fn mask_png() -> Vec<u8> {
    let mut img = image::RgbaImage::from_pixel(4, 4, Rgba([100, 100, 100, 255]));
    for y in 0..4 {
        for x in 2..4 {
            img.put_pixel(x, y, Rgba([200, 200, 200, 255]));
        }
    }
    let mut out = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}

/// A 4x4 JPEG
pub fn tiny_jpeg() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([0, 128, 255]));
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_with_encoder(JpegEncoder::new_with_quality(&mut out, 90))
        .unwrap();
    out
}

/// A PNG of a few MiB: pseudo-random pixels defeat the PNG filters so the
/// file stays close to its raw size
pub fn noisy_png() -> Vec<u8> {
    let mut state: u32 = 0x9e37_79b9;
    let mut next = move || {
        // xorshift32
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };

    let mut img = image::RgbaImage::new(1024, 1024);
    for pixel in img.pixels_mut() {
        let v = next().to_le_bytes();
        *pixel = Rgba([v[0], v[1], v[2], 255]);
    }
    let mut out = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}

/// Wrap image bytes in a base64 data URL
pub fn data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}
