// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Small conversion helpers shared by the canvas and the session.

pub mod color;
pub mod geometry;
