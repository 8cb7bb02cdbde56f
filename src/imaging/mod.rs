//! Pixel-format conversions for provider payloads.
//!
//! Masks drawn in the browser arrive as anti-aliased RGBA; the inpainting
//! provider requires a strict black-and-white grayscale PNG, so masks are
//! thresholded before dispatch. Images travel onward as PNG regardless of
//! what the browser or a remote URL handed us.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

use crate::error::ImagingError;

/// Luma values below this become black (0), everything else white (255)
pub const MASK_THRESHOLD: u8 = 128;

fn decode(bytes: &[u8], max_bytes: usize) -> Result<DynamicImage, ImagingError> {
    if bytes.is_empty() {
        return Err(ImagingError::EmptyData);
    }
    if bytes.len() > max_bytes {
        return Err(ImagingError::TooLarge {
            size: bytes.len(),
            max: max_bytes,
        });
    }
    image::load_from_memory(bytes).map_err(|e| ImagingError::Decode(e.to_string()))
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, ImagingError> {
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .map_err(|e| ImagingError::Encode(e.to_string()))?;
    Ok(out)
}

/// Convert a browser-drawn mask into the binary grayscale PNG the inpainting
/// endpoint expects.
pub fn mask_to_binary_png(bytes: &[u8], max_bytes: usize) -> Result<Vec<u8>, ImagingError> {
    let img = decode(bytes, max_bytes)?;

    let mut luma = img.to_luma8();
    for pixel in luma.pixels_mut() {
        pixel.0[0] = if pixel.0[0] < MASK_THRESHOLD { 0 } else { 255 };
    }

    encode_png(&DynamicImage::ImageLuma8(luma))
}

/// Re-encode any supported image format as PNG.
///
/// Already-PNG input is decoded and re-encoded too; the providers have
/// rejected PNGs with unusual ancillary chunks, and a round trip normalizes
/// them.
pub fn to_png(bytes: &[u8], max_bytes: usize) -> Result<Vec<u8>, ImagingError> {
    let img = decode(bytes, max_bytes)?;
    encode_png(&img)
}

/// Decode a `data:image/...;base64,` URL and re-encode as JPEG at the given
/// quality, flattening any alpha channel.
pub fn data_url_to_jpeg(
    data_url: &str,
    quality: u8,
    max_bytes: usize,
) -> Result<Vec<u8>, ImagingError> {
    let bytes = decode_data_url(data_url)?;
    let img = decode(&bytes, max_bytes)?;

    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut out = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))
        .map_err(|e| ImagingError::Encode(e.to_string()))?;
    Ok(out)
}

/// Extract the raw bytes from a base64 image data URL.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, ImagingError> {
    if !data_url.starts_with("data:image/") {
        return Err(ImagingError::InvalidDataUrl);
    }
    let payload = data_url
        .split_once("base64,")
        .map(|(_, payload)| payload)
        .ok_or(ImagingError::InvalidDataUrl)?;
    Ok(STANDARD.decode(payload)?)
}
