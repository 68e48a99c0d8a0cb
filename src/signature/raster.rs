//! Pixel operations on the signature raster

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use thiserror::Error;

/// Prefix of serialized signatures
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A position in raster coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Errors raised while encoding or decoding signature images
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signature is not a PNG data URL")]
    NotPngDataUrl,
    #[error("signature base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("signature image error: {0}")]
    Image(#[from] image::ImageError),
}

/// A white raster of the given size
pub fn blank(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, WHITE)
}

pub fn fill_white(raster: &mut RgbaImage) {
    for pixel in raster.pixels_mut() {
        *pixel = WHITE;
    }
}

/// Ink is any visible pixel that is not pure white
pub fn is_ink(pixel: &Rgba<u8>) -> bool {
    let [r, g, b, a] = pixel.0;
    a > 0 && (r != 255 || g != 255 || b != 255)
}

pub fn has_ink(raster: &RgbaImage) -> bool {
    raster.pixels().any(is_ink)
}

/// Any ink inside the half-open pixel rectangle `[x0, x1) × [y0, y1)`
pub fn has_ink_in(raster: &RgbaImage, x0: u32, x1: u32, y0: u32, y1: u32) -> bool {
    let x1 = x1.min(raster.width());
    let y1 = y1.min(raster.height());
    (y0..y1).any(|y| (x0..x1).any(|x| is_ink(raster.get_pixel(x, y))))
}

/// Stroke a segment with round caps: every pixel whose center lies within
/// `width / 2` of the segment takes `color`.
pub fn stroke_segment(raster: &mut RgbaImage, from: Point, to: Point, color: Rgba<u8>, width: f32) {
    let radius = (width / 2.0).max(0.5);
    let (w, h) = (raster.width() as f32, raster.height() as f32);
    if w == 0.0 || h == 0.0 {
        return;
    }

    let min_x = (from.x.min(to.x) - radius).floor().clamp(0.0, w - 1.0) as u32;
    let max_x = (from.x.max(to.x) + radius).ceil().clamp(0.0, w - 1.0) as u32;
    let min_y = (from.y.min(to.y) - radius).floor().clamp(0.0, h - 1.0) as u32;
    let max_y = (from.y.max(to.y) + radius).ceil().clamp(0.0, h - 1.0) as u32;

    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len_sq = dx * dx + dy * dy;
    let radius_sq = radius * radius;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            let t = if len_sq == 0.0 {
                0.0
            } else {
                (((px - from.x) * dx + (py - from.y) * dy) / len_sq).clamp(0.0, 1.0)
            };
            let cx = from.x + t * dx - px;
            let cy = from.y + t * dy - py;
            if cx * cx + cy * cy <= radius_sq {
                raster.put_pixel(x, y, color);
            }
        }
    }
}

/// Draw `source` at the origin of a white-filled `target`, blending by
/// alpha and clipping to the target bounds.
pub fn draw_over_white(target: &mut RgbaImage, source: &RgbaImage) {
    fill_white(target);
    let width = target.width().min(source.width());
    let height = target.height().min(source.height());
    for y in 0..height {
        for x in 0..width {
            let src = source.get_pixel(x, y).0;
            let alpha = src[3] as u32;
            let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
            target.put_pixel(x, y, Rgba([blend(src[0]), blend(src[1]), blend(src[2]), 255]));
        }
    }
}

/// Encode the raster as a PNG data URL
pub fn encode_data_url(raster: &RgbaImage) -> Result<String, SignatureError> {
    let mut bytes = Vec::new();
    raster.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(bytes)))
}

/// Raw PNG bytes from a data URL (or bare base64)
pub fn data_url_bytes(encoded: &str) -> Result<Vec<u8>, SignatureError> {
    let payload = match encoded.strip_prefix("data:") {
        Some(rest) => rest
            .strip_prefix("image/png;base64,")
            .ok_or(SignatureError::NotPngDataUrl)?,
        None => encoded,
    };
    Ok(STANDARD.decode(payload.trim())?)
}

/// Decode a PNG data URL into an RGBA raster
pub fn decode_data_url(encoded: &str) -> Result<RgbaImage, SignatureError> {
    let bytes = data_url_bytes(encoded)?;
    let image = image::load_from_memory_with_format(&bytes, ImageFormat::Png)?;
    Ok(image.to_rgba8())
}
