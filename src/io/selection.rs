// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video selection and annotation directory naming.
//!
//! The annotation directory of a video is a pure function of the video's
//! path: `<folder>/<base name>_annotations`. Paths are split on both `/`
//! and `\` so a path copied from another OS resolves the same way, and the
//! derived directory reuses whichever separator the input used.

use std::path::PathBuf;

/// Suffix appended to the video's base name to form its annotation directory.
pub const ANNOTATION_DIR_SUFFIX: &str = "_annotations";

/// Everything derived from the video the user picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSelection {
    pub file_path: PathBuf,
    /// Folder containing the video, as written in the input path.
    pub folder: String,
    /// File name without its last extension.
    pub base_name: String,
    pub annotation_dir: PathBuf,
}

impl VideoSelection {
    /// Derive the selection for a video path.
    pub fn from_video_path(path: impl Into<PathBuf>) -> Self {
        let file_path = path.into();
        let raw = file_path.to_string_lossy().into_owned();

        let split_at = raw.rfind(['/', '\\']);
        let (folder, file_name, separator) = match split_at {
            Some(idx) => {
                let sep = &raw[idx..idx + 1];
                let folder = if idx == 0 { sep } else { &raw[..idx] };
                (folder.to_string(), &raw[idx + 1..], Some(sep.to_string()))
            }
            None => (String::new(), raw.as_str(), None),
        };

        let base_name = strip_extension(file_name).to_string();
        let dir_name = format!("{}{}", base_name, ANNOTATION_DIR_SUFFIX);

        let annotation_dir = match separator {
            Some(sep) if folder.ends_with(sep.as_str()) => format!("{}{}", folder, dir_name),
            Some(sep) => format!("{}{}{}", folder, sep, dir_name),
            None => dir_name,
        };

        Self {
            file_path,
            folder,
            base_name,
            annotation_dir: PathBuf::from(annotation_dir),
        }
    }

    /// Last component of the video's folder, used in the window title.
    pub fn folder_name(&self) -> &str {
        self.folder
            .trim_end_matches(['/', '\\'])
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or("")
    }
}

/// Drop the last extension. A leading dot alone does not start an extension.
fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(0) | None => file_name,
        Some(idx) => &file_name[..idx],
    }
}
