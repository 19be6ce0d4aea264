// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric and timing conversions.
//!
//! Strokes are stored in canvas-local pixels, so screen positions reported
//! by the pointer have to be shifted by the canvas origin before they are
//! recorded, and shifted back before they are painted.

use crate::models::annotation::Point;

/// Convert a screen position to canvas-local coordinates.
pub fn to_canvas_local(screen_x: f32, screen_y: f32, origin_x: f32, origin_y: f32) -> Point {
    Point {
        x: (screen_x - origin_x) as f64,
        y: (screen_y - origin_y) as f64,
    }
}

/// Convert canvas-local coordinates back to a screen position.
pub fn to_screen(point: &Point, origin_x: f32, origin_y: f32) -> (f32, f32) {
    (point.x as f32 + origin_x, point.y as f32 + origin_y)
}

/// Playback position in seconds to a whole-millisecond timestamp, rounded down.
///
/// Positions produced by seeking to an integer millisecond come back as
/// `ms / 1000.0`; the small epsilon keeps those from flooring to `ms - 1`.
pub fn seconds_to_timestamp(secs: f64) -> u64 {
    if !secs.is_finite() || secs <= 0.0 {
        return 0;
    }
    (secs * 1000.0 + 1e-6).floor() as u64
}

/// Format seconds as `m:ss.mmm` for the timeline.
pub fn format_position(secs: f64) -> String {
    let ms = seconds_to_timestamp(secs);
    format!("{}:{:02}.{:03}", ms / 60_000, (ms / 1000) % 60, ms % 1000)
}
