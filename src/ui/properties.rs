// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation properties panel.
//!
//! This module provides the side panel with the video's metadata fields,
//! the list of saved timestamps, and the notes for the annotation being
//! edited.

use crate::session::Session;

/// Result of properties panel interaction.
pub enum PropertiesAction {
    None,
    LoadRecord(String),
    DeleteRecord(String),
}

/// Display the properties panel.
pub fn show(
    ui: &mut egui::Ui,
    session: &mut Session,
    weld_types: &[String],
    selected: &mut Option<String>,
) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Video");
    ui.label(egui::RichText::new(session.video().base_name.as_str()).strong());
    ui.add_space(4.0);

    egui::Grid::new("meta_grid").num_columns(2).show(ui, |ui| {
        let meta = session.meta_mut();
        ui.label("Title:");
        ui.text_edit_singleline(&mut meta.title);
        ui.end_row();

        ui.label("Weld type:");
        egui::ComboBox::from_id_source("weld_type")
            .selected_text(meta.weld_type.as_str())
            .show_ui(ui, |ui| {
                for weld_type in weld_types {
                    ui.selectable_value(&mut meta.weld_type, weld_type.clone(), weld_type.as_str());
                }
            });
        ui.end_row();
    });

    ui.separator();
    ui.heading("Annotations");

    egui::ScrollArea::vertical()
        .id_source("timestamp_list")
        .max_height(220.0)
        .show(ui, |ui| {
            if session.records().is_empty() {
                ui.label(egui::RichText::new("No annotations yet").weak());
            }
            for entry in session.records() {
                let is_selected = selected.as_deref() == Some(entry.name.as_str());
                if ui.selectable_label(is_selected, entry.label()).clicked() {
                    *selected = Some(entry.name.clone());
                    action = PropertiesAction::LoadRecord(entry.name.clone());
                }
            }
        });

    ui.horizontal(|ui| {
        if ui
            .add_enabled(selected.is_some(), egui::Button::new("🗑 Delete"))
            .clicked()
        {
            if let Some(name) = selected.clone() {
                action = PropertiesAction::DeleteRecord(name);
            }
        }
        if let Some(name) = session.editing() {
            ui.label(egui::RichText::new(format!("Editing {}", name)).weak());
        }
    });

    ui.separator();
    ui.heading("Notes");

    match session.notes_mut() {
        Some(notes) => {
            ui.add(
                egui::TextEdit::multiline(notes)
                    .desired_rows(8)
                    .desired_width(f32::INFINITY),
            );
        }
        None => {
            let mut placeholder = String::new();
            ui.add_enabled(
                false,
                egui::TextEdit::multiline(&mut placeholder)
                    .hint_text("Press Annotate to add notes")
                    .desired_rows(8)
                    .desired_width(f32::INFINITY),
            );
        }
    }

    action
}
