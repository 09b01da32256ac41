// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: key-value storage, project persistence and image media.

pub mod media;
pub mod persistence;
pub mod storage;
