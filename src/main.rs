// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video Annotator
//!
//! A cross-platform desktop application for drawing freehand notes on
//! video frames. Each annotation is stored as `<timestamp>.json` in a
//! `<video>_annotations` folder next to the video.

mod app;
mod config;
mod error;
mod io;
mod models;
mod session;
mod strokes;
mod ui;
mod util;

use anyhow::Result;
use app::{AnnotatorApp, APP_TITLE};
use config::AppConfig;

fn main() -> Result<()> {
    // Initialize logging, `info` unless RUST_LOG says otherwise
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load()?;

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([640.0, 480.0])
            .with_title(APP_TITLE),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(AnnotatorApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
