// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! CSS color strings.
//!
//! Stroke colors are stored the way a web color picker writes them, so
//! records stay readable by other tools. Hex forms and the basic named
//! colors are understood.

use egui::ecolor::HexColor;
use egui::Color32;

/// Parse a CSS color into RGBA bytes.
pub fn parse_css_color(input: &str) -> Option<[u8; 4]> {
    let value = input.trim();
    if let Some(digits) = value.strip_prefix('#') {
        // `from_str_radix` would let a sign through.
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let color = value.parse::<HexColor>().ok()?.color();
        return Some(color.to_srgba_unmultiplied());
    }

    let rgb = match value.to_ascii_lowercase().as_str() {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "lime" => [0, 255, 0],
        "green" => [0, 128, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "cyan" | "aqua" => [0, 255, 255],
        "magenta" | "fuchsia" => [255, 0, 255],
        "orange" => [255, 165, 0],
        "purple" => [128, 0, 128],
        "gray" | "grey" => [128, 128, 128],
        _ => return None,
    };
    Some([rgb[0], rgb[1], rgb[2], 255])
}

/// Parse a color, falling back to opaque black for unknown values.
pub fn css_color_or_black(input: &str) -> [u8; 4] {
    parse_css_color(input).unwrap_or_else(|| {
        log::warn!("Unrecognized stroke color {:?}, drawing in black", input);
        [0, 0, 0, 255]
    })
}

/// Format RGB bytes as `#rrggbb`.
pub fn to_hex(rgb: [u8; 3]) -> String {
    HexColor::Hex6(Color32::from_rgb(rgb[0], rgb[1], rgb[2])).to_string()
}
