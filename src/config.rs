// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Resolved once at startup. The only user-facing setting is where data is
//! stored, which can be overridden with the `CRUMPET_DATA` environment
//! variable.

use directories::ProjectDirs;
use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CRUMPET_DATA";

/// Initial window size.
pub const WINDOW_SIZE: [f32; 2] = [1400.0, 860.0];

/// Smallest usable window size.
pub const MIN_WINDOW_SIZE: [f32; 2] = [900.0, 600.0];

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory holding the saved project and settings
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Resolve configuration from the environment and platform directories.
    pub fn resolve() -> Self {
        let data_override = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        Self {
            data_dir: data_dir(data_override, project_directory()),
        }
    }

    /// Create the data directory if it does not exist yet.
    pub fn ensure_data_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)
    }
}

fn data_dir(data_override: Option<PathBuf>, dirs: Option<ProjectDirs>) -> PathBuf {
    if let Some(dir) = data_override {
        dir
    } else if let Some(dirs) = dirs {
        dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "crumpet", env!("CARGO_PKG_NAME"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let dir = data_dir(Some(PathBuf::from("/tmp/crumpet")), project_directory());
        assert_eq!(dir, PathBuf::from("/tmp/crumpet"));
    }

    #[test]
    fn test_fallback_without_platform_dirs() {
        assert_eq!(data_dir(None, None), PathBuf::from("./.data"));
    }

    #[test]
    fn test_ensure_data_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data_dir: tmp.path().join("a").join("b"),
        };
        config.ensure_data_dir().unwrap();
        assert!(config.data_dir.is_dir());
    }
}
