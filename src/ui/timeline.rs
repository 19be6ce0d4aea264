// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video timeline scrubber control.
//!
//! Play/pause and seeking are only offered while playback is unlocked, so
//! the frame cannot move under an annotation being drawn.

use crate::io::media::Playback;
use crate::util::geometry::{format_position, seconds_to_timestamp};

/// Display the timeline and apply user changes to `playback`.
pub fn show(ui: &mut egui::Ui, playback: &mut dyn Playback) {
    let enabled = !playback.is_locked();

    ui.horizontal(|ui| {
        let label = if playback.is_playing() { "⏸" } else { "▶" };
        if ui.add_enabled(enabled, egui::Button::new(label)).clicked() {
            let playing = playback.is_playing();
            playback.set_playing(!playing);
        }

        let mut position = playback.position_secs();
        let changed = match playback.duration_secs() {
            Some(duration) => {
                ui.spacing_mut().slider_width = (ui.available_width() - 120.0).max(100.0);
                ui.add_enabled(
                    enabled,
                    egui::Slider::new(&mut position, 0.0..=duration).show_value(false),
                )
                .changed()
            }
            None => ui
                .add_enabled(
                    enabled,
                    egui::DragValue::new(&mut position)
                        .speed(0.05)
                        .range(0.0..=f64::MAX)
                        .suffix(" s"),
                )
                .changed(),
        };
        if changed {
            playback.seek_ms(seconds_to_timestamp(position));
        }

        ui.label(format_position(playback.position_secs()));
    });
}
