use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, Rgb as RgbPixel, RgbImage, Rgba, RgbaImage};

use super::capture::RasterCapture;
use super::ExportFormat;
use crate::app::domain::registry::Rgb;
use crate::app::infrastructure::error::ExportError;

fn check_len(capture: &RasterCapture) -> Result<(), ExportError> {
    let expected = capture.width as usize * capture.height as usize * 3;
    let white_ok = capture
        .over_white
        .as_ref()
        .is_none_or(|white| white.len() == expected);
    if capture.width == 0 || capture.height == 0 || capture.rgb.len() != expected || !white_ok {
        return Err(ExportError::Capture(format!(
            "surface returned {} bytes for a {}x{} image",
            capture.rgb.len(),
            capture.width,
            capture.height
        )));
    }
    Ok(())
}

fn rgb_at(buf: &[u8], i: usize) -> Rgb {
    Rgb(buf[i], buf[i + 1], buf[i + 2])
}

/// Recover a straight-alpha pixel from the same drawing composited over
/// black and over white. Coverage is what white shows through, and the
/// color is the over-black value divided by that coverage.
pub fn unmatte(over_black: Rgb, over_white: Rgb) -> Rgba<u8> {
    let b = [over_black.0, over_black.1, over_black.2];
    let w = [over_white.0, over_white.1, over_white.2];
    let seen_through = (0..3)
        .map(|c| w[c].saturating_sub(b[c]))
        .max()
        .unwrap_or(0);
    let alpha = 255 - seen_through;
    if alpha == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    let a = alpha as u32;
    let channel = |v: u8| ((v as u32 * 255 + a / 2) / a).min(255) as u8;
    Rgba([channel(b[0]), channel(b[1]), channel(b[2]), alpha])
}

/// PNG with the backdrop removed. Anti-aliased edges and shadows keep
/// partial alpha when the capture carries an over-white pass.
pub fn encode_png(capture: &RasterCapture) -> Result<Vec<u8>, ExportError> {
    check_len(capture)?;
    let img = RgbaImage::from_fn(capture.width, capture.height, |x, y| {
        let i = ((y * capture.width + x) * 3) as usize;
        let black = rgb_at(&capture.rgb, i);
        match &capture.over_white {
            Some(white) => unmatte(black, rgb_at(white, i)),
            None => Rgba([black.0, black.1, black.2, 0xff]),
        }
    });

    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
    Ok(out)
}

/// JPEG has no alpha channel. A transparent capture is flattened onto
/// white, which is exactly its over-white pass.
pub fn encode_jpeg(capture: &RasterCapture, quality: u8) -> Result<Vec<u8>, ExportError> {
    check_len(capture)?;
    let pixels = capture.over_white.as_ref().unwrap_or(&capture.rgb);
    let img = RgbImage::from_fn(capture.width, capture.height, |x, y| {
        let i = ((y * capture.width + x) * 3) as usize;
        let px = rgb_at(pixels, i);
        RgbPixel([px.0, px.1, px.2])
    });

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)).encode_image(&img)?;
    Ok(out)
}

pub fn encode_raster(
    capture: &RasterCapture,
    format: ExportFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Png => encode_png(capture),
        ExportFormat::Jpeg => encode_jpeg(capture, jpeg_quality),
        ExportFormat::Svg => Err(ExportError::Capture(
            "raster capture cannot be written as SVG".to_string(),
        )),
    }
}
