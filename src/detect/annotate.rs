//! Annotated frame copies.
//!
//! The detection-record builder mirrors each processed frame into the
//! output folder with its detections drawn on, which makes spot-checking a
//! run cheap.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::RgbImage;

use crate::detect::result::Detection;
use crate::sequence::Frame;

/// Outline colors cycle by class id.
const CLASS_COLORS: [[u8; 3]; 6] = [
    [230, 60, 60],
    [60, 180, 75],
    [65, 105, 225],
    [240, 180, 30],
    [170, 70, 200],
    [70, 200, 200],
];

const OUTLINE_PX: u32 = 2;

/// Draw detection outlines onto a copy of the frame.
pub fn annotate(frame: &Frame, detections: &[Detection]) -> Result<RgbImage> {
    let mut image = RgbImage::from_raw(frame.width, frame.height, frame.pixels.clone())
        .ok_or_else(|| anyhow!("frame buffer does not match its dimensions"))?;

    for detection in detections {
        let color = CLASS_COLORS[detection.class_id % CLASS_COLORS.len()];
        draw_box(&mut image, detection.bbox, color);
    }
    Ok(image)
}

/// Annotate a frame and save it.
pub fn save_annotated(frame: &Frame, detections: &[Detection], path: &Path) -> Result<()> {
    let image = annotate(frame, detections)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    image
        .save(path)
        .with_context(|| format!("failed to save annotated frame {}", path.display()))
}

fn draw_box(image: &mut RgbImage, bbox: [f32; 4], color: [u8; 3]) {
    let width = image.width();
    let height = image.height();
    if width == 0 || height == 0 {
        return;
    }

    let x0 = to_pixel(bbox[0].min(bbox[2]), width);
    let x1 = to_pixel(bbox[0].max(bbox[2]), width);
    let y0 = to_pixel(bbox[1].min(bbox[3]), height);
    let y1 = to_pixel(bbox[1].max(bbox[3]), height);

    let pixel = image::Rgb(color);
    for t in 0..OUTLINE_PX {
        // Horizontal edges.
        for x in x0..=x1 {
            put(image, x, y0.saturating_add(t).min(height - 1), pixel);
            put(image, x, y1.saturating_sub(t), pixel);
        }
        // Vertical edges.
        for y in y0..=y1 {
            put(image, x0.saturating_add(t).min(width - 1), y, pixel);
            put(image, x1.saturating_sub(t), y, pixel);
        }
    }
}

fn to_pixel(normalized: f32, extent: u32) -> u32 {
    let clamped = normalized.clamp(0.0, 1.0);
    ((clamped * extent as f32) as u32).min(extent.saturating_sub(1))
}

fn put(image: &mut RgbImage, x: u32, y: u32, pixel: image::Rgb<u8>) {
    if x < image.width() && y < image.height() {
        image.put_pixel(x, y, pixel);
    }
}
