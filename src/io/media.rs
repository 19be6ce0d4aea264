// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video playback.
//!
//! The annotator only needs a small slice of a media engine: the current
//! position, seeking, and pausing while the user draws. [`Playback`] is that
//! slice. The default [`VideoClock`] keeps time without decoding anything;
//! with the `video-opencv` feature, [`OpenCvVideo`] also decodes frames for
//! display.

use anyhow::Result;
use std::path::Path;

/// A decoded RGBA frame ready to upload as a texture.
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Playback controls consumed by the annotation session.
pub trait Playback {
    /// Current position in fractional seconds.
    fn position_secs(&self) -> f64;

    /// Total length, if the backend knows it.
    fn duration_secs(&self) -> Option<f64>;

    /// Reposition playback. Allowed even while locked.
    fn seek_ms(&mut self, ms: u64);

    /// Stop playing and lock out user control.
    fn pause(&mut self);

    /// Give control back to the user. Does not start playing on its own.
    fn resume(&mut self);

    fn is_locked(&self) -> bool;

    fn is_playing(&self) -> bool;

    /// Start or stop playing on user request. Ignored while locked.
    fn set_playing(&mut self, playing: bool);

    /// Advance by `dt` seconds of wall time.
    fn tick(&mut self, dt: f64);

    /// A newly decoded frame, if the position moved since the last call.
    fn take_frame(&mut self) -> Option<VideoFrame> {
        None
    }
}

/// Position clock for videos the build cannot decode.
#[derive(Debug, Default)]
pub struct VideoClock {
    position: f64,
    duration: Option<f64>,
    playing: bool,
    locked: bool,
}

impl VideoClock {
    pub fn new(duration: Option<f64>) -> Self {
        Self {
            duration,
            ..Default::default()
        }
    }

    fn clamp(&self, secs: f64) -> f64 {
        let secs = secs.max(0.0);
        match self.duration {
            Some(d) => secs.min(d),
            None => secs,
        }
    }
}

impl Playback for VideoClock {
    fn position_secs(&self) -> f64 {
        self.position
    }

    fn duration_secs(&self) -> Option<f64> {
        self.duration
    }

    fn seek_ms(&mut self, ms: u64) {
        self.position = self.clamp(ms as f64 / 1000.0);
    }

    fn pause(&mut self) {
        self.playing = false;
        self.locked = true;
    }

    fn resume(&mut self) {
        self.locked = false;
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn set_playing(&mut self, playing: bool) {
        if !self.locked {
            self.playing = playing;
        }
    }

    fn tick(&mut self, dt: f64) {
        if !self.playing {
            return;
        }
        self.position = self.clamp(self.position + dt);
        if let Some(d) = self.duration {
            if self.position >= d {
                self.playing = false;
            }
        }
    }
}

/// Open a video with OpenCV decoding.
#[cfg(feature = "video-opencv")]
pub fn open_playback(path: &Path) -> Result<Box<dyn Playback>> {
    Ok(Box::new(OpenCvVideo::open(path)?))
}

/// Open a video without a decoder: only the playback position is tracked.
#[cfg(not(feature = "video-opencv"))]
pub fn open_playback(path: &Path) -> Result<Box<dyn Playback>> {
    if !path.exists() {
        anyhow::bail!("Video not found: {}", path.display());
    }
    log::info!(
        "Built without a video decoder, using a playback clock for {}",
        path.display()
    );
    Ok(Box::new(VideoClock::new(None)))
}

#[cfg(feature = "video-opencv")]
pub use opencv_backend::OpenCvVideo;

#[cfg(feature = "video-opencv")]
mod opencv_backend {
    use super::{Playback, VideoClock, VideoFrame};
    use anyhow::{Context, Result};
    use opencv::{core, imgproc, prelude::*, videoio};
    use std::path::Path;

    /// OpenCV-backed playback: a [`VideoClock`] plus frame decoding.
    pub struct OpenCvVideo {
        capture: videoio::VideoCapture,
        clock: VideoClock,
        decoded_at: Option<f64>,
        frame_interval: f64,
    }

    impl OpenCvVideo {
        pub fn open(path: &Path) -> Result<Self> {
            let path_str = path.to_string_lossy();
            let capture = videoio::VideoCapture::from_file(&path_str, videoio::CAP_ANY)
                .with_context(|| format!("Failed to open video {}", path.display()))?;
            if !capture.is_opened()? {
                anyhow::bail!("Video could not be opened: {}", path.display());
            }

            let fps = capture.get(videoio::CAP_PROP_FPS)?;
            let frames = capture.get(videoio::CAP_PROP_FRAME_COUNT)?;
            let duration = (fps > 0.0 && frames > 0.0).then(|| frames / fps);
            let frame_interval = if fps > 0.0 { 1.0 / fps } else { 1.0 / 30.0 };

            log::info!(
                "Opened video {} ({:.1} fps, {:?} s)",
                path.display(),
                fps,
                duration
            );

            Ok(Self {
                capture,
                clock: VideoClock::new(duration),
                decoded_at: None,
                frame_interval,
            })
        }

        fn decode_at(&mut self, secs: f64) -> Result<Option<VideoFrame>> {
            self.capture
                .set(videoio::CAP_PROP_POS_MSEC, secs * 1000.0)?;
            let mut bgr = core::Mat::default();
            if !self.capture.read(&mut bgr)? || bgr.empty() {
                return Ok(None);
            }
            let mut rgba = core::Mat::default();
            imgproc::cvt_color(&bgr, &mut rgba, imgproc::COLOR_BGR2RGBA, 0)?;
            Ok(Some(VideoFrame {
                width: rgba.cols() as u32,
                height: rgba.rows() as u32,
                pixels: rgba.data_bytes()?.to_vec(),
            }))
        }
    }

    impl Playback for OpenCvVideo {
        fn position_secs(&self) -> f64 {
            self.clock.position_secs()
        }

        fn duration_secs(&self) -> Option<f64> {
            self.clock.duration_secs()
        }

        fn seek_ms(&mut self, ms: u64) {
            self.clock.seek_ms(ms);
        }

        fn pause(&mut self) {
            self.clock.pause();
        }

        fn resume(&mut self) {
            self.clock.resume();
        }

        fn is_locked(&self) -> bool {
            self.clock.is_locked()
        }

        fn is_playing(&self) -> bool {
            self.clock.is_playing()
        }

        fn set_playing(&mut self, playing: bool) {
            self.clock.set_playing(playing);
        }

        fn tick(&mut self, dt: f64) {
            self.clock.tick(dt);
        }

        fn take_frame(&mut self) -> Option<VideoFrame> {
            let position = self.clock.position_secs();
            if let Some(last) = self.decoded_at {
                if (position - last).abs() < self.frame_interval {
                    return None;
                }
            }
            self.decoded_at = Some(position);
            match self.decode_at(position) {
                Ok(frame) => frame,
                Err(e) => {
                    log::error!("Failed to decode frame at {:.3}s: {}", position, e);
                    None
                }
            }
        }
    }
}
