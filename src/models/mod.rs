// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data models for annotation records and per-video metadata.

pub mod annotation;
pub mod meta;
