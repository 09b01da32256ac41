// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor state and the actions that change it.
//!
//! [`AppState`] combines the persisted document with the few transient UI
//! flags the reducer owns (open panels and the image picker). Drag state,
//! text being edited and thumbnail size live in the UI layer instead.

pub mod action;
pub mod reducer;

pub use action::Action;
pub use reducer::reduce;

use crate::models::project::{Id, ProjectData, Tab};

/// Where the image picker popup opens, relative to the timeline ruler.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PickerPosition {
    pub x: f32,
    pub y: f32,
}

/// Open image picker and the marker it assigns to.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePicker {
    pub marker_id: Id,
    pub position: PickerPosition,
}

/// Full editor state.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub active_tab_id: Id,
    pub tabs: Vec<Tab>,
    pub custom_transitions: Vec<String>,

    /// Timeline settings window
    pub settings_open: bool,
    /// App-wide settings window
    pub app_settings_open: bool,
    pub image_picker: Option<ImagePicker>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_project(ProjectData::default())
    }
}

impl AppState {
    /// Build editor state from a snapshot with every transient flag closed.
    pub fn from_project(data: ProjectData) -> Self {
        let data = data.normalized();
        let active_tab_id = data
            .active_tab_id
            .unwrap_or_else(|| data.tabs[0].id.clone());
        Self {
            active_tab_id,
            tabs: data.tabs,
            custom_transitions: data.custom_transitions,
            settings_open: false,
            app_settings_open: false,
            image_picker: None,
        }
    }

    /// The persistable part of the state.
    pub fn snapshot(&self) -> ProjectData {
        ProjectData {
            active_tab_id: Some(self.active_tab_id.clone()),
            tabs: self.tabs.clone(),
            custom_transitions: self.custom_transitions.clone(),
        }
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == self.active_tab_id)
    }

    pub(crate) fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        let id = &self.active_tab_id;
        self.tabs.iter_mut().find(|t| &t.id == id)
    }
}
