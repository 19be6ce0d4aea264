// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings.
//!
//! Settings are read from a YAML file: the path in `VIDEO_ANNOTATOR_CONFIG`
//! if set, otherwise `video-annotator.yaml` in the working directory. A
//! missing file means defaults; a malformed one is an error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "VIDEO_ANNOTATOR_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "video-annotator.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Width of drawn strokes in pixels.
    pub stroke_width: f32,
    /// Initial stroke color as a CSS color.
    pub default_color: String,
    /// Choices offered for the weld type. Should include "Other".
    pub weld_types: Vec<String>,
    /// Extensions offered by the open-video dialog.
    pub video_extensions: Vec<String>,
    /// Show the open-video dialog when the app starts.
    pub prompt_on_startup: bool,
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stroke_width: 3.0,
            default_color: "#ff0000".to_string(),
            weld_types: ["Butt", "Fillet", "Lap", "Corner", "Edge", "Plug", "Other"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            video_extensions: ["mp4", "mpg", "mov"].iter().map(|s| s.to_string()).collect(),
            prompt_on_startup: true,
            window_size: [1000.0, 900.0],
        }
    }
}

impl AppConfig {
    /// Load settings from the configured location, or defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&yaml)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
