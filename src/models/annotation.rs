// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the records persisted per video frame: freehand
//! strokes made of canvas-local points, plus the free-text notes that go
//! with them.

use serde::{Deserialize, Serialize};

/// A 2D point in canvas-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One continuous freehand pointer drag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// CSS color string, e.g. `#ff0000`.
    pub color: String,
    pub points: Vec<Point>,
}

impl Stroke {
    /// Start a stroke at the pointer-down position.
    pub fn begin(color: impl Into<String>, start: Point) -> Self {
        Self {
            color: color.into(),
            points: vec![start],
        }
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// A stroke without points carries nothing worth drawing or saving.
    pub fn is_degenerate(&self) -> bool {
        self.points.is_empty()
    }
}

/// A timestamped note and drawing attached to a single video frame.
///
/// The timestamp is the record's identity: a directory holds at most one
/// record per timestamp and a second write replaces the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Playback position in whole milliseconds.
    pub timestamp: u64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub strokes: Vec<Stroke>,
}

impl AnnotationRecord {
    pub fn new(timestamp: u64, notes: impl Into<String>, strokes: Vec<Stroke>) -> Self {
        Self {
            timestamp,
            notes: notes.into(),
            strokes,
        }
    }

    /// True when there are no strokes and the notes are blank.
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.notes.trim().is_empty()
    }

    /// File name this record is stored under.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.timestamp)
    }
}
