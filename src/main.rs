// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Crumpet - Shot Prompt Editor
//!
//! A desktop editor for composing timed text prompts for AI video
//! generation from reference images and timeline markers.

mod app;
mod config;
mod io;
mod models;
mod state;
mod ui;
mod util;

use anyhow::Result;
use app::CrumpetApp;
use config::{AppConfig, MIN_WINDOW_SIZE, WINDOW_SIZE};
use io::storage::{FileStore, KeyValueStore, MemoryStore};
use std::sync::Arc;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = AppConfig::resolve();
    let store = open_store(&config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_min_inner_size(MIN_WINDOW_SIZE)
            .with_title("Crumpet - Shot Prompt Editor")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Crumpet",
        options,
        Box::new(move |_cc| Ok(Box::new(CrumpetApp::new(store)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

/// File-backed storage in the data directory, or in-memory storage when
/// the directory cannot be created.
fn open_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    match config.ensure_data_dir() {
        Ok(()) => {
            let store = FileStore::new(&config.data_dir);
            log::info!("Storing data in {}", store.root().display());
            Arc::new(store)
        }
        Err(e) => {
            log::warn!(
                "Data directory {} unavailable, changes will not be saved: {}",
                config.data_dir.display(),
                e
            );
            Arc::new(MemoryStore::new())
        }
    }
}
