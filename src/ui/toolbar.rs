// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with the annotate/save toggle and stroke color.

use crate::session::Mode;

/// Action requested from the toolbar.
pub enum ToolbarAction {
    None,
    StartAnnotating,
    SaveAnnotation,
}

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, mode: Option<Mode>, color: &mut [u8; 3]) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let has_video = mode.is_some();
        let annotating = mode == Some(Mode::Annotating);

        if ui
            .add_enabled(has_video && !annotating, egui::Button::new("✏ Annotate"))
            .clicked()
        {
            action = ToolbarAction::StartAnnotating;
        }
        if ui
            .add_enabled(annotating, egui::Button::new("💾 Save"))
            .clicked()
        {
            action = ToolbarAction::SaveAnnotation;
        }

        ui.separator();

        ui.label("Color:");
        ui.color_edit_button_srgb(color);

        ui.separator();

        let hint = match mode {
            None => "Open a video to start",
            Some(Mode::Viewing) => "Scrub to a frame, then press Annotate",
            Some(Mode::Annotating) => "Drag on the frame to draw, press Save when done",
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    action
}
