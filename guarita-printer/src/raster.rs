//! QL raster job building
//!
//! Converts a label image into a Brother QL raster job: decode, scale to
//! the label's printable width, luminance-threshold to 1bpp, and wrap in
//! the raster command envelope.

use crate::error::{PrintError, PrintResult};
use base64::Engine;
use image::{DynamicImage, GenericImageView};
use shared::models::{LabelSize, PrinterModel};
use tracing::{debug, info, instrument};

/// Bytes of zeros sent before a job to flush any half-received command
const INVALIDATE_LEN: usize = 200;

/// Right-margin feed in dots appended after the image
const FEED_MARGIN_DOTS: u8 = 35;

/// Print head width in raster bytes for a model.
///
/// QL desktop models drive a 720-dot head (90 bytes per line); the wide
/// QL-1100 series drives 1296 dots (162 bytes).
fn head_bytes(model: PrinterModel) -> usize {
    match model {
        PrinterModel::Ql1110Nwb | PrinterModel::Ql1100 => 162,
        _ => 90,
    }
}

/// Load an image from a bridge URI: `file://` path, bare path, or a
/// base64 `data:` URI.
///
/// Remote URLs are rejected the way the original bridge rejected
/// anything it could not resolve to a local file.
#[instrument]
pub fn load_image_uri(uri: &str) -> PrintResult<DynamicImage> {
    if let Some(rest) = uri.strip_prefix("data:") {
        let payload = rest
            .split_once("base64,")
            .map(|(_, b64)| b64)
            .ok_or_else(|| PrintError::Image("data: URI without base64 payload".into()))?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| PrintError::Image(format!("data: URI decode failed: {}", e)))?;
        return image::load_from_memory(&bytes)
            .map_err(|e| PrintError::Image(format!("data: image decode failed: {}", e)));
    }

    if uri.starts_with("http://") || uri.starts_with("https://") {
        return Err(PrintError::Image(format!(
            "Could not resolve file path from URI: {}",
            uri
        )));
    }

    let path = uri.strip_prefix("file://").unwrap_or(uri);
    image::open(path).map_err(|e| PrintError::Image(format!("open {} failed: {}", path, e)))
}

/// Build the complete raster job for one label.
#[instrument(skip(img), fields(label = %label, model = %model))]
pub fn build_raster_job(
    img: &DynamicImage,
    model: PrinterModel,
    label: LabelSize,
) -> PrintResult<Vec<u8>> {
    let line_bytes = head_bytes(model);
    let head_dots = (line_bytes * 8) as u32;
    let width_dots = label.width_dots().min(head_dots);

    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(PrintError::Image("Empty image".into()));
    }

    // scale to the printable width, preserving aspect ratio
    let lines = ((h as f64) * (width_dots as f64) / (w as f64)).round().max(1.0) as u32;
    let resized = img.resize_exact(width_dots, lines, image::imageops::FilterType::Triangle);
    let rgba = resized.to_rgba8();

    debug!(width_dots, lines, line_bytes, "rasterizing label");

    // media is centered under the head
    let offset_dots = (head_dots - width_dots) / 2;

    let mut job = Vec::with_capacity(INVALIDATE_LEN + 64 + lines as usize * (3 + line_bytes));

    // invalidate + initialize
    job.extend(std::iter::repeat_n(0x00, INVALIDATE_LEN));
    job.extend_from_slice(&[0x1B, 0x40]);

    // ESC i a 01 - switch to raster mode
    job.extend_from_slice(&[0x1B, 0x69, 0x61, 0x01]);

    // ESC i z - print information: validate media kind + width, raster line count
    let media_kind: u8 = if matches!(label, LabelSize::RollW12
        | LabelSize::RollW29
        | LabelSize::RollW38
        | LabelSize::RollW50
        | LabelSize::RollW54
        | LabelSize::RollW62
        | LabelSize::RollW62RB
        | LabelSize::RollW102
        | LabelSize::RollW103)
    {
        0x0B
    } else {
        0x0A
    };
    job.extend_from_slice(&[0x1B, 0x69, 0x7A]);
    job.push(0x86); // PI_KIND | PI_WIDTH | PI_RECOVER
    job.push(media_kind);
    job.push(label.width_mm() as u8);
    job.push(0x00); // media length unchecked
    job.extend_from_slice(&lines.to_le_bytes());
    job.push(0x00); // first page
    job.push(0x00);

    // ESC i M - auto cut on
    job.extend_from_slice(&[0x1B, 0x69, 0x4D, 0x40]);
    // ESC i d - feed margin
    job.extend_from_slice(&[0x1B, 0x69, 0x64, FEED_MARGIN_DOTS, 0x00]);

    // raster lines: g 0x00 n + n data bytes, left-to-right, MSB first
    for y in 0..lines {
        job.extend_from_slice(&[0x67, 0x00, line_bytes as u8]);
        let row_start = job.len();
        job.resize(row_start + line_bytes, 0u8);
        for x in 0..width_dots {
            let pixel = rgba.get_pixel(x, y);
            let alpha = pixel[3];
            let dark = if alpha < 128 {
                false
            } else {
                let luma =
                    0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32;
                luma < 128.0
            };
            if dark {
                let dot = offset_dots + x;
                job[row_start + (dot / 8) as usize] |= 0x80 >> (dot % 8);
            }
        }
    }

    // Ctrl-Z - print with feeding (last page)
    job.push(0x1A);

    info!(bytes = job.len(), lines, "raster job built");
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn checker(w: u32, h: u32) -> DynamicImage {
        let mut img = RgbaImage::new(w, h);
        for (x, y, p) in img.enumerate_pixels_mut() {
            let dark = (x + y) % 2 == 0;
            *p = if dark {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            };
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_job_geometry() {
        let img = checker(100, 50);
        let job = build_raster_job(&img, PrinterModel::Ql820Nwb, LabelSize::RollW62).unwrap();

        // scaled to 696 dots wide -> 348 lines at aspect ratio 2:1
        let lines = 348usize;
        let per_line = 3 + 90;
        let raster_bytes = lines * per_line;
        // job ends with raster data + final 0x1A
        assert_eq!(job[job.len() - 1], 0x1A);
        assert!(job.len() > INVALIDATE_LEN + raster_bytes);

        // invalidate prefix then ESC @
        assert!(job[..INVALIDATE_LEN].iter().all(|&b| b == 0));
        assert_eq!(&job[INVALIDATE_LEN..INVALIDATE_LEN + 2], &[0x1B, 0x40]);
    }

    #[test]
    fn test_wide_model_line_width() {
        let img = checker(40, 10);
        let job = build_raster_job(&img, PrinterModel::Ql1100, LabelSize::RollW102).unwrap();
        // find the first raster line marker and check its byte count
        let pos = job.windows(2).position(|w| w == [0x67, 0x00]).unwrap();
        assert_eq!(job[pos + 2], 162);
    }

    #[test]
    fn test_empty_image_rejected() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(0, 0));
        assert!(build_raster_job(&img, PrinterModel::Ql820Nwb, LabelSize::RollW62).is_err());
    }

    #[test]
    fn test_load_data_uri() {
        // 1x1 transparent png
        let png = image::RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(png)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let b64 = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let uri = format!("data:image/png;base64,{}", b64);

        let img = load_image_uri(&uri).unwrap();
        assert_eq!(img.dimensions(), (1, 1));
    }

    #[test]
    fn test_remote_uri_rejected() {
        let err = load_image_uri("http://10.0.0.1/render/h1");
        assert!(matches!(err, Err(PrintError::Image(_))));
    }
}
