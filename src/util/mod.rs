// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pure helpers derived from the document: prompt text, marker layout and
//! timeline geometry.

pub mod geometry;
pub mod layout;
pub mod prompt;
