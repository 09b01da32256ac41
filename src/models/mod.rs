// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model for prompt projects.

pub mod project;
pub mod transitions;
