// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-video metadata.
//!
//! Each annotation directory carries one metadata record describing the
//! video as a whole. It is rewritten in full on every save.

use serde::{Deserialize, Serialize};

/// Weld type used when a stored value is not one of the known choices.
pub const OTHER_WELD_TYPE: &str = "Other";

/// Title and weld category for a video's annotation set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "weldType")]
    pub weld_type: String,
}

impl MetaRecord {
    pub fn new(title: impl Into<String>, weld_type: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            weld_type: weld_type.into(),
        }
    }

    /// Map an unknown weld type onto [`OTHER_WELD_TYPE`].
    pub fn normalized(mut self, known_weld_types: &[String]) -> Self {
        if !known_weld_types.iter().any(|w| *w == self.weld_type) {
            self.weld_type = OTHER_WELD_TYPE.to_string();
        }
        self
    }
}
