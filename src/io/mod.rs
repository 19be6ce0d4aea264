// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O: annotation storage, video selection and playback.

pub mod media;
pub mod selection;
pub mod store;
