// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas over the video frame.
//!
//! This module paints the current video frame with the working strokes on
//! top, and turns pointer drags into canvas-local stroke events.

use crate::models::annotation::Point;
use crate::session::{Mode, Session};
use crate::strokes::{render, Surface};
use crate::util::geometry::{to_canvas_local, to_screen};

/// Pointer events for the session, in canvas-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasAction {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    PointerLeave,
}

/// Result of showing the canvas for one frame.
pub struct CanvasOutput {
    pub actions: Vec<CanvasAction>,
    /// Canvas size in pixels, used for overlay export.
    pub size: egui::Vec2,
}

/// egui painter as a stroke surface, offset to the canvas origin.
struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
}

impl Surface for PainterSurface<'_> {
    fn clear(&mut self) {
        // egui repaints every frame from scratch, nothing to erase.
    }

    fn polyline(&mut self, points: &[Point], color: [u8; 4], width: f32) {
        let screen_points: Vec<egui::Pos2> = points
            .iter()
            .map(|p| {
                let (x, y) = to_screen(p, self.origin.x, self.origin.y);
                egui::pos2(x, y)
            })
            .collect();
        let color = egui::Color32::from_rgba_unmultiplied(color[0], color[1], color[2], color[3]);
        self.painter
            .add(egui::Shape::line(screen_points, egui::Stroke::new(width, color)));
    }
}

/// Display the canvas and collect pointer events.
pub fn show(
    ui: &mut egui::Ui,
    session: Option<&Session>,
    frame_texture: &Option<egui::TextureHandle>,
    stroke_width: f32,
) -> CanvasOutput {
    let (response, painter) =
        ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
    let rect = response.rect;
    let mut actions = Vec::new();

    painter.rect_filled(rect, 0.0, egui::Color32::from_gray(40));

    let Some(session) = session else {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "File → Open Video... to begin annotating",
            egui::FontId::proportional(16.0),
            egui::Color32::from_gray(180),
        );
        return CanvasOutput {
            actions,
            size: rect.size(),
        };
    };

    match frame_texture {
        Some(texture) => {
            painter.image(
                texture.id(),
                fit_rect(rect, texture.size_vec2()),
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        None => {
            painter.text(
                rect.center_top() + egui::vec2(0.0, 16.0),
                egui::Align2::CENTER_TOP,
                session.video().base_name.as_str(),
                egui::FontId::proportional(14.0),
                egui::Color32::from_gray(130),
            );
        }
    }

    let mut surface = PainterSurface {
        painter: &painter,
        origin: rect.min,
    };
    render(&mut surface, session.canvas().strokes(), stroke_width);

    if session.mode() == Mode::Annotating {
        painter.rect_stroke(
            rect.shrink(1.0),
            0.0,
            egui::Stroke::new(2.0, egui::Color32::from_rgb(220, 60, 60)),
        );

        let local = |pos: egui::Pos2| to_canvas_local(pos.x, pos.y, rect.min.x, rect.min.y);

        if response.drag_started() {
            let origin = ui.input(|i| i.pointer.press_origin());
            if let Some(pos) = origin.or_else(|| response.interact_pointer_pos()) {
                actions.push(CanvasAction::PointerDown(local(pos)));
            }
        } else if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                actions.push(CanvasAction::PointerDown(local(pos)));
                actions.push(CanvasAction::PointerUp);
            }
        }

        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                if rect.contains(pos) {
                    actions.push(CanvasAction::PointerMove(local(pos)));
                } else if session.canvas().is_drawing() {
                    actions.push(CanvasAction::PointerLeave);
                }
            }
        }

        if response.drag_stopped() {
            actions.push(CanvasAction::PointerUp);
        }
    }

    CanvasOutput {
        actions,
        size: rect.size(),
    }
}

/// Largest rect with the frame's aspect ratio, centered in `area`.
fn fit_rect(area: egui::Rect, frame_size: egui::Vec2) -> egui::Rect {
    if frame_size.x <= 0.0 || frame_size.y <= 0.0 {
        return area;
    }
    let scale = (area.width() / frame_size.x).min(area.height() / frame_size.y);
    egui::Rect::from_center_size(area.center(), frame_size * scale)
}
