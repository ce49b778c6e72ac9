//! Page region partitioning: text extraction and figure cropping
//!
//! The layout model labels regions on a page image; OCR runs once over the
//! full page. Text is assembled from lines whose center falls inside a
//! non-figure region, and figure regions are cropped out for vision
//! captioning.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use crate::error::Result;
use crate::types::{LayoutBox, TextLine};

/// Assemble page text from OCR lines, excluding figure regions.
///
/// A line is kept when its bounding-box center lies inside any non-figure
/// layout box; lines outside every box (or inside figures) are discarded.
pub fn page_text(lines: &[TextLine], boxes: &[LayoutBox]) -> String {
    let text_boxes: Vec<&LayoutBox> = boxes.iter().filter(|b| !b.is_figure()).collect();

    let mut text = String::new();
    for line in lines {
        let (x, y) = line.center();
        if text_boxes.iter().any(|b| b.contains_point(x, y)) {
            text.push_str(&line.text);
            text.push('\n');
        }
    }

    text.trim().to_string()
}

/// The figure-labeled regions of a page
pub fn figure_boxes(boxes: &[LayoutBox]) -> Vec<&LayoutBox> {
    boxes.iter().filter(|b| b.is_figure()).collect()
}

/// Crop a figure region out of the page image and encode it as JPEG.
/// The rectangle is clamped to the image bounds.
pub fn crop_figure(page: &DynamicImage, bbox: &[f32; 4]) -> Result<Vec<u8>> {
    let (width, height) = (page.width(), page.height());

    let x1 = bbox[0].max(0.0) as u32;
    let y1 = bbox[1].max(0.0) as u32;
    let x2 = (bbox[2].ceil() as u32).min(width);
    let y2 = (bbox[3].ceil() as u32).min(height);

    let crop_w = x2.saturating_sub(x1).max(1);
    let crop_h = y2.saturating_sub(y1).max(1);

    let cropped = page.crop_imm(x1, y1, crop_w, crop_h);

    let mut buffer = Cursor::new(Vec::new());
    // JPEG has no alpha channel
    DynamicImage::ImageRgb8(cropped.to_rgb8()).write_to(&mut buffer, ImageFormat::Jpeg)?;

    Ok(buffer.into_inner())
}
