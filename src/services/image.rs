use anyhow::{bail, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView};
use std::io::Cursor;

pub const THUMBNAIL_SIZE: u32 = 300;
const THUMBNAIL_QUALITY: u8 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Thumbnail,
    Full,
}

pub fn is_thumbnailable(mime_type: &str) -> bool {
    matches!(
        mime_type,
        "image/jpeg" | "image/png" | "image/gif" | "image/webp" | "image/bmp"
    )
}

/// Fits `width`×`height` inside a `max`×`max` box, keeping the aspect ratio.
/// Images already inside the box keep their size.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }
    if width > height {
        let h = (height as f64 * max as f64 / width as f64).round().max(1.0) as u32;
        (max, h)
    } else {
        let w = (width as f64 * max as f64 / height as f64).round().max(1.0) as u32;
        (w, max)
    }
}

/// Produces a JPEG thumbnail no larger than `size` on either side.
pub fn generate_thumbnail(data: &[u8], size: Option<u32>) -> Result<Vec<u8>> {
    let max = size.unwrap_or(THUMBNAIL_SIZE);
    if max == 0 {
        bail!("Thumbnail size must be positive");
    }

    let img = image::load_from_memory(data)?;
    let (width, height) = img.dimensions();
    let (w, h) = fit_within(width, height, max);

    let resized = if (w, h) == (width, height) {
        img
    } else {
        img.resize_exact(w, h, image::imageops::FilterType::Triangle)
    };

    encode_jpeg(&resized)
}

fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, THUMBNAIL_QUALITY);
    rgb.write_with_encoder(encoder)?;
    Ok(buffer.into_inner())
}

/// URL to use for a given display size. Falls back to the original file when
/// no thumbnail exists.
pub fn optimized_url<'a>(url: &'a str, thumbnail_url: Option<&'a str>, variant: Variant) -> &'a str {
    match (variant, thumbnail_url) {
        (Variant::Thumbnail, Some(thumb)) => thumb,
        _ => url,
    }
}
