// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project and settings persistence.
//!
//! The project snapshot is loaded once at startup and written in the
//! background after every committed change. The default transition list is a
//! separate small settings value with its own change counter. Storage
//! failures never interrupt editing: loads fall back to defaults and save
//! errors are logged and dropped.

use super::storage::{KeyValueStore, StorageError};
use crate::models::project::ProjectData;
use crate::models::transitions::builtin_transitions;
use std::sync::mpsc::{channel, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Storage key of the project snapshot.
pub const STORAGE_KEY: &str = "crumpet-state";

/// Storage key of the app-wide default transitions.
pub const TRANSITIONS_DEFAULTS_KEY: &str = "crumpet-default-transitions";

/// Load the saved project, or a fresh default project when nothing usable
/// is stored.
pub fn load_project(store: &dyn KeyValueStore) -> ProjectData {
    match read_project(store) {
        Ok(Some(data)) if !data.tabs.is_empty() => {
            log::info!("Loaded project with {} tabs", data.tabs.len());
            data.normalized()
        }
        Ok(Some(_)) => {
            log::warn!("Saved project has no tabs, starting fresh");
            ProjectData::default()
        }
        Ok(None) => ProjectData::default(),
        Err(e) => {
            log::warn!("Failed to load saved project, starting fresh: {}", e);
            ProjectData::default()
        }
    }
}

fn read_project(store: &dyn KeyValueStore) -> Result<Option<ProjectData>, StorageError> {
    match store.get(STORAGE_KEY)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Write a project snapshot immediately.
pub fn save_project(store: &dyn KeyValueStore, data: &ProjectData) -> Result<(), StorageError> {
    let json = serde_json::to_string(data)?;
    store.set(STORAGE_KEY, &json)
}

/// Background writer for project snapshots.
///
/// Submitting never blocks. When several snapshots queue up only the newest
/// is written.
pub struct SaveWorker {
    sender: Option<Sender<ProjectData>>,
    handle: Option<JoinHandle<()>>,
}

impl SaveWorker {
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        let (sender, receiver) = channel::<ProjectData>();
        let handle = std::thread::spawn(move || {
            while let Ok(mut data) = receiver.recv() {
                while let Ok(newer) = receiver.try_recv() {
                    data = newer;
                }
                if let Err(e) = save_project(store.as_ref(), &data) {
                    log::warn!("Failed to save project: {}", e);
                }
            }
        });
        Self {
            sender: Some(sender),
            handle: Some(handle),
        }
    }

    pub fn submit(&self, data: ProjectData) {
        if let Some(sender) = &self.sender {
            if sender.send(data).is_err() {
                log::warn!("Save worker stopped; project changes are not being saved");
            }
        }
    }

    /// Flush pending snapshots and stop the writer thread.
    pub fn shutdown(&mut self) {
        self.sender = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Save worker panicked");
            }
        }
    }
}

impl Drop for SaveWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// App-wide default transition labels.
///
/// Edited only from the app settings window. Every edit is written through
/// to storage and bumps [`TransitionSettings::revision`], which readers
/// compare against the revision they last saw.
pub struct TransitionSettings {
    store: Arc<dyn KeyValueStore>,
    transitions: Vec<String>,
    revision: u64,
}

impl TransitionSettings {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let transitions = load_default_transitions(store.as_ref());
        Self {
            store,
            transitions,
            revision: 0,
        }
    }

    pub fn transitions(&self) -> &[String] {
        &self.transitions
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Add a label; returns false when it is blank or already present.
    pub fn add(&mut self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || self.transitions.iter().any(|t| t == value) {
            return false;
        }
        self.transitions.push(value.to_string());
        self.commit();
        true
    }

    pub fn remove(&mut self, value: &str) {
        self.transitions.retain(|t| t != value);
        self.commit();
    }

    /// Restore the built-in labels.
    pub fn reset(&mut self) {
        self.transitions = builtin_transitions();
        self.commit();
    }

    fn commit(&mut self) {
        self.revision += 1;
        if let Err(e) = save_default_transitions(self.store.as_ref(), &self.transitions) {
            log::warn!("Failed to save default transitions: {}", e);
        }
    }
}

/// Stored default transitions, or the built-ins when none are stored.
pub fn load_default_transitions(store: &dyn KeyValueStore) -> Vec<String> {
    let stored = store
        .get(TRANSITIONS_DEFAULTS_KEY)
        .and_then(|value| match value {
            Some(json) => Ok(Some(serde_json::from_str::<Vec<String>>(&json)?)),
            None => Ok(None),
        });
    match stored {
        Ok(Some(transitions)) => transitions,
        Ok(None) => builtin_transitions(),
        Err(e) => {
            log::warn!("Failed to load default transitions: {}", e);
            builtin_transitions()
        }
    }
}

pub fn save_default_transitions(
    store: &dyn KeyValueStore,
    transitions: &[String],
) -> Result<(), StorageError> {
    let json = serde_json::to_string(transitions)?;
    store.set(TRANSITIONS_DEFAULTS_KEY, &json)
}
