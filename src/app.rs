// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the annotation session for the open video
//! and turns menu, toolbar, panel and canvas actions into session calls,
//! reporting failures in the status line instead of aborting.

use crate::config::AppConfig;
use crate::error::{StoreError, StoreResult};
use crate::io::{media, selection::VideoSelection};
use crate::session::{Mode, Session};
use crate::strokes;
use crate::ui::{canvas, properties, timeline, toolbar};
use crate::util::{
    color::{parse_css_color, to_hex},
    geometry::seconds_to_timestamp,
};
use std::path::PathBuf;

pub const APP_TITLE: &str = "Video Annotator";

/// Last message shown in the status line.
struct Status {
    text: String,
    is_error: bool,
}

/// Main application state.
pub struct AnnotatorApp {
    config: AppConfig,

    /// Session for the open video, if any
    session: Option<Session>,

    /// Current stroke color
    stroke_color: [u8; 3],

    /// Record highlighted in the timestamp list
    selected_record: Option<String>,

    /// Texture holding the current video frame
    frame_texture: Option<egui::TextureHandle>,

    /// Canvas size from the last frame
    canvas_size: egui::Vec2,

    status: Option<Status>,

    /// Whether the startup open dialog has been shown
    startup_prompted: bool,
}

impl AnnotatorApp {
    pub fn new(config: AppConfig) -> Self {
        let stroke_color = parse_css_color(&config.default_color)
            .map(|c| [c[0], c[1], c[2]])
            .unwrap_or([255, 0, 0]);

        Self {
            startup_prompted: !config.prompt_on_startup,
            config,
            session: None,
            stroke_color,
            selected_record: None,
            frame_texture: None,
            canvas_size: egui::Vec2::ZERO,
            status: None,
        }
    }

    fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            is_error: false,
        });
    }

    fn set_error(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::error!("{}", text);
        self.status = Some(Status {
            text,
            is_error: true,
        });
    }

    fn session_mut(&mut self) -> StoreResult<&mut Session> {
        self.session.as_mut().ok_or(StoreError::NoDirectorySelected)
    }

    /// Ask for a video with the native picker and open it.
    fn choose_video(&mut self, ctx: &egui::Context) {
        let picked = rfd::FileDialog::new()
            .add_filter("Video", &self.config.video_extensions[..])
            .pick_file();
        if let Some(path) = picked {
            self.open_video(path, ctx);
        }
    }

    /// Replace the current session with one for `path`.
    ///
    /// Unsaved work in the current session is saved first; if that fails
    /// the current session is kept.
    fn open_video(&mut self, path: PathBuf, ctx: &egui::Context) {
        if let Some(session) = self.session.as_mut() {
            if let Err(e) = session.stop_annotating() {
                self.set_error(format!("Could not save the current annotation: {}", e));
                return;
            }
        }

        let playback = match media::open_playback(&path) {
            Ok(playback) => playback,
            Err(e) => {
                self.set_error(format!("Failed to open video: {:#}", e));
                return;
            }
        };

        let selection = VideoSelection::from_video_path(path);
        match Session::open(selection, playback, &self.config.weld_types) {
            Ok(session) => {
                ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
                    "{}: {}",
                    APP_TITLE,
                    session.video().folder_name()
                )));
                self.set_status(format!(
                    "Opened {} ({} annotations)",
                    session.video().base_name,
                    session.records().len()
                ));
                self.session = Some(session);
                self.selected_record = None;
                self.frame_texture = None;
            }
            Err(e) => self.set_error(format!("Failed to open annotations: {}", e)),
        }
    }

    fn start_annotating(&mut self) {
        match self.session_mut() {
            Ok(session) => session.start_annotating(),
            Err(e) => self.set_error(e.to_string()),
        }
    }

    fn save_annotation(&mut self) {
        let result = self.session_mut().and_then(|s| s.stop_annotating());
        match result {
            Ok(Some(name)) => {
                self.selected_record = None;
                self.set_status(format!("Saved {}", name));
            }
            Ok(None) => self.set_status("Nothing to save"),
            Err(e) => self.set_error(format!("Save failed, annotation kept: {}", e)),
        }
    }

    fn load_record(&mut self, name: &str) {
        match self.session_mut().and_then(|s| s.load_for_edit(name)) {
            Ok(()) => self.set_status(format!("Editing {}", name)),
            Err(e) if e.is_not_found() => self.forget_record(name),
            Err(e) => self.set_error(format!("Failed to load {}: {}", name, e)),
        }
    }

    /// A listed record vanished from disk: drop it from the listing.
    fn forget_record(&mut self, name: &str) {
        self.selected_record = None;
        if let Some(session) = self.session.as_mut() {
            if let Err(e) = session.refresh() {
                log::warn!("Could not reload annotations: {}", e);
            }
        }
        self.set_error(format!("{} no longer exists", name));
    }

    fn delete_record(&mut self, name: &str) {
        let confirmed = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title("Delete annotation")
            .set_description("Are you sure you want to delete this annotation?")
            .set_buttons(rfd::MessageButtons::YesNo)
            .show()
            == rfd::MessageDialogResult::Yes;
        if !confirmed {
            return;
        }

        match self.session_mut().and_then(|s| s.delete_record(name)) {
            Ok(()) => {
                self.selected_record = None;
                self.set_status(format!("Deleted {}", name));
            }
            Err(e) if e.is_not_found() => self.forget_record(name),
            Err(e) => self.set_error(format!("Delete failed: {}", e)),
        }
    }

    fn save_meta(&mut self) {
        match self.session_mut().and_then(|s| s.save_meta()) {
            Ok(()) => self.set_status("Metadata saved"),
            Err(e) => self.set_error(format!("Failed to save metadata: {}", e)),
        }
    }

    /// Save the working strokes as a transparent PNG the size of the canvas.
    fn export_overlay(&mut self) {
        let Some(session) = self.session.as_ref() else {
            self.set_error(StoreError::NoDirectorySelected.to_string());
            return;
        };

        let timestamp = seconds_to_timestamp(session.playback().position_secs());
        let picked = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_directory(&session.video().annotation_dir)
            .set_file_name(format!("{}.png", timestamp))
            .save_file();
        let Some(path) = picked else {
            return;
        };

        let result = strokes::export_png(
            session.canvas().strokes(),
            self.canvas_size.x.round() as u32,
            self.canvas_size.y.round() as u32,
            self.config.stroke_width,
            &path,
        );
        match result {
            Ok(()) => self.set_status(format!("Exported {}", path.display())),
            Err(e) => self.set_error(format!("{:#}", e)),
        }
    }

    /// Advance playback and upload any new frame.
    fn update_playback(&mut self, ctx: &egui::Context) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let dt = ctx.input(|i| i.stable_dt) as f64;
        let playback = session.playback_mut();
        playback.tick(dt);
        if playback.is_playing() {
            ctx.request_repaint();
        }

        if let Some(frame) = playback.take_frame() {
            let size = [frame.width as usize, frame.height as usize];
            let image = egui::ColorImage::from_rgba_unmultiplied(size, &frame.pixels);
            match self.frame_texture.as_mut() {
                Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                None => {
                    self.frame_texture =
                        Some(ctx.load_texture("video_frame", image, egui::TextureOptions::LINEAR));
                }
            }
        }
    }
}

impl eframe::App for AnnotatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.startup_prompted {
            self.startup_prompted = true;
            self.choose_video(ctx);
        }

        self.update_playback(ctx);

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Video...").clicked() {
                        ui.close_menu();
                        self.choose_video(ctx);
                    }
                    ui.separator();
                    let has_session = self.session.is_some();
                    if ui
                        .add_enabled(has_session, egui::Button::new("Save Metadata"))
                        .clicked()
                    {
                        ui.close_menu();
                        self.save_meta();
                    }
                    if ui
                        .add_enabled(has_session, egui::Button::new("Export Overlay PNG..."))
                        .clicked()
                    {
                        ui.close_menu();
                        self.export_overlay();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Toolbar
        let mode = self.session.as_ref().map(Session::mode);
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, mode, &mut self.stroke_color))
            .inner;
        match toolbar_action {
            toolbar::ToolbarAction::StartAnnotating => self.start_annotating(),
            toolbar::ToolbarAction::SaveAnnotation => self.save_annotation(),
            toolbar::ToolbarAction::None => {}
        }

        if mode == Some(Mode::Annotating)
            && ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::S))
        {
            self.save_annotation();
        }

        // Status line
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| match &self.status {
                Some(status) if status.is_error => {
                    ui.colored_label(egui::Color32::from_rgb(230, 90, 90), &status.text);
                }
                Some(status) => {
                    ui.label(&status.text);
                }
                None => {
                    ui.label("Ready");
                }
            });
        });

        // Timeline
        if let Some(session) = self.session.as_mut() {
            egui::TopBottomPanel::bottom("timeline").show(ctx, |ui| {
                timeline::show(ui, session.playback_mut());
            });
        }

        // Properties panel (right side)
        let weld_types = self.config.weld_types.clone();
        let properties_action = match self.session.as_mut() {
            Some(session) => {
                egui::SidePanel::right("properties")
                    .default_width(260.0)
                    .show(ctx, |ui| {
                        properties::show(ui, session, &weld_types, &mut self.selected_record)
                    })
                    .inner
            }
            None => properties::PropertiesAction::None,
        };
        match properties_action {
            properties::PropertiesAction::LoadRecord(name) => self.load_record(&name),
            properties::PropertiesAction::DeleteRecord(name) => self.delete_record(&name),
            properties::PropertiesAction::None => {}
        }

        // Main canvas (center)
        let stroke_width = self.config.stroke_width;
        let output = egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                canvas::show(ui, self.session.as_ref(), &self.frame_texture, stroke_width)
            })
            .inner;
        self.canvas_size = output.size;

        if let Some(session) = self.session.as_mut() {
            let color = to_hex(self.stroke_color);
            for action in output.actions {
                match action {
                    canvas::CanvasAction::PointerDown(point) => session.pointer_down(&color, point),
                    canvas::CanvasAction::PointerMove(point) => session.pointer_move(point),
                    canvas::CanvasAction::PointerUp => session.pointer_up(),
                    canvas::CanvasAction::PointerLeave => session.pointer_leave(),
                }
            }
        }
    }
}
