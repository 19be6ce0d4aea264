// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Freehand stroke capture and rendering.
//!
//! [`StrokeCanvas`] turns pointer drags into strokes while drawing is
//! enabled and holds the notes typed alongside them. Together they form the
//! working copy of one annotation. [`render`] draws a list of strokes onto
//! any [`Surface`]: the egui painter for the live canvas, or a
//! [`RasterSurface`] for PNG export.

use crate::models::annotation::{AnnotationRecord, Point, Stroke};
use crate::util::color::css_color_or_black;
use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Working set of strokes and notes for the annotation being edited.
#[derive(Debug, Default)]
pub struct StrokeCanvas {
    strokes: Vec<Stroke>,
    notes: String,
    /// Index of the stroke currently being dragged out.
    in_progress: Option<usize>,
    enabled: bool,
}

impl StrokeCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept or ignore pointer input. Disabling ends any stroke in progress.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.end_stroke();
        }
    }

    /// Start a new stroke at the pointer-down position.
    pub fn begin_stroke(&mut self, color: &str, point: Point) {
        if !self.enabled {
            return;
        }
        self.strokes.push(Stroke::begin(color, point));
        self.in_progress = Some(self.strokes.len() - 1);
    }

    /// Append a point to the stroke being drawn, if any.
    pub fn extend_stroke(&mut self, point: Point) {
        if !self.enabled {
            return;
        }
        if let Some(stroke) = self.in_progress.and_then(|i| self.strokes.get_mut(i)) {
            stroke.push(point);
        }
    }

    pub fn end_stroke(&mut self) {
        self.in_progress = None;
    }

    pub fn is_drawing(&self) -> bool {
        self.in_progress.is_some()
    }

    /// Clear strokes and notes. Stored annotations are not affected.
    pub fn reset(&mut self) {
        self.strokes.clear();
        self.notes.clear();
        self.in_progress = None;
    }

    /// Replace the working set with a stored record's contents.
    pub fn load(&mut self, record: &AnnotationRecord) {
        self.strokes = record.strokes.clone();
        self.notes = record.notes.clone();
        self.in_progress = None;
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn notes_mut(&mut self) -> &mut String {
        &mut self.notes
    }

    /// True when there is nothing to save.
    pub fn is_empty(&self) -> bool {
        self.strokes.iter().all(Stroke::is_degenerate) && self.notes.trim().is_empty()
    }

    /// Snapshot the working set as a record, dropping strokes without points.
    pub fn to_record(&self, timestamp: u64) -> AnnotationRecord {
        let strokes = self
            .strokes
            .iter()
            .filter(|s| !s.is_degenerate())
            .cloned()
            .collect();
        AnnotationRecord::new(timestamp, self.notes.clone(), strokes)
    }
}

/// Something strokes can be drawn onto.
pub trait Surface {
    /// Erase everything previously drawn.
    fn clear(&mut self);

    /// Draw connected line segments through `points`.
    fn polyline(&mut self, points: &[Point], color: [u8; 4], width: f32);
}

/// Clear `surface`, then draw each stroke in order, later strokes on top.
pub fn render<S: Surface + ?Sized>(surface: &mut S, strokes: &[Stroke], width: f32) {
    surface.clear();
    for stroke in strokes {
        if stroke.points.len() < 2 {
            continue;
        }
        surface.polyline(&stroke.points, css_color_or_black(&stroke.color), width);
    }
}

/// An in-memory RGBA image used for overlay export.
pub struct RasterSurface {
    image: RgbaImage,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn segment(&mut self, from: &Point, to: &Point, width: f32, color: [u8; 4]) {
        let (x0, y0) = (from.x as f32, from.y as f32);
        let dx = to.x as f32 - x0;
        let dy = to.y as f32 - y0;
        let len = (dx * dx + dy * dy).sqrt();
        let steps = (len * 2.0).ceil() as i32;
        let half = (width / 2.0).max(0.5) as i32;
        let (w, h) = (self.image.width() as i32, self.image.height() as i32);

        for i in 0..=steps {
            let t = i as f32 / steps.max(1) as f32;
            let cx = (x0 + dx * t).round() as i32;
            let cy = (y0 + dy * t).round() as i32;
            for oy in -half..=half {
                for ox in -half..=half {
                    let (px, py) = (cx + ox, cy + oy);
                    if px >= 0 && px < w && py >= 0 && py < h {
                        self.image.put_pixel(px as u32, py as u32, Rgba(color));
                    }
                }
            }
        }
    }
}

impl Surface for RasterSurface {
    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    fn polyline(&mut self, points: &[Point], color: [u8; 4], width: f32) {
        for pair in points.windows(2) {
            self.segment(&pair[0], &pair[1], width, color);
        }
    }
}

/// Render strokes onto a transparent image and save it as PNG.
pub fn export_png(
    strokes: &[Stroke],
    width: u32,
    height: u32,
    stroke_width: f32,
    path: &Path,
) -> Result<()> {
    let mut surface = RasterSurface::new(width.max(1), height.max(1));
    render(&mut surface, strokes, stroke_width);
    surface
        .into_image()
        .save(path)
        .with_context(|| format!("Failed to write overlay {}", path.display()))?;
    log::info!("Exported {} strokes to {}", strokes.len(), path.display());
    Ok(())
}
