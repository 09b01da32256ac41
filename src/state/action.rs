// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Every change to the editor state is expressed as an [`Action`].
//!
//! UI components collect actions during a frame; the app feeds them through
//! [`super::reduce`] afterwards.

use super::PickerPosition;
use crate::models::project::{Id, ProjectData, TimelinePatch};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Tabs
    AddTab,
    RemoveTab { id: Id },
    RenameTab { id: Id, name: String },
    SetActiveTab { id: Id },

    // Images (active tab)
    AddImage { data_uri: Arc<str> },
    RenameImage { id: Id, name: String },
    RemoveImage { id: Id },

    // Timeline (active tab)
    SetTimeline(TimelinePatch),

    // Markers (active tab)
    /// Place a marker and open the image picker for it.
    AddMarker { frame: i64, position: PickerPosition },
    RemoveMarker { id: Id },
    /// Set the frame as given; callers clamp beforehand.
    MoveMarker { id: Id, frame: i64 },
    UpdateMarkerText { id: Id, text: String },
    ToggleMarkerCollapsed { id: Id },
    ToggleMarkerFrameRef { id: Id },
    AssignMarkerImage { marker_id: Id, image_id: Id },
    SetMarkerTransition { id: Id, transition: String },

    // Prompt text (active tab)
    SetPrefix(String),
    SetSuffix(String),

    // Project transitions
    AddCustomTransition(String),
    RemoveCustomTransition(String),

    // Transient UI
    OpenSettings,
    CloseSettings,
    OpenAppSettings,
    CloseAppSettings,
    OpenImagePicker { marker_id: Id, position: PickerPosition },
    CloseImagePicker,

    /// Replace the document wholesale and close every popup.
    RestoreState(ProjectData),
}

impl Action {
    /// Short tag for logging; never includes payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddTab => "add_tab",
            Action::RemoveTab { .. } => "remove_tab",
            Action::RenameTab { .. } => "rename_tab",
            Action::SetActiveTab { .. } => "set_active_tab",
            Action::AddImage { .. } => "add_image",
            Action::RenameImage { .. } => "rename_image",
            Action::RemoveImage { .. } => "remove_image",
            Action::SetTimeline(_) => "set_timeline",
            Action::AddMarker { .. } => "add_marker",
            Action::RemoveMarker { .. } => "remove_marker",
            Action::MoveMarker { .. } => "move_marker",
            Action::UpdateMarkerText { .. } => "update_marker_text",
            Action::ToggleMarkerCollapsed { .. } => "toggle_marker_collapsed",
            Action::ToggleMarkerFrameRef { .. } => "toggle_marker_frame_ref",
            Action::AssignMarkerImage { .. } => "assign_marker_image",
            Action::SetMarkerTransition { .. } => "set_marker_transition",
            Action::SetPrefix(_) => "set_prefix",
            Action::SetSuffix(_) => "set_suffix",
            Action::AddCustomTransition(_) => "add_custom_transition",
            Action::RemoveCustomTransition(_) => "remove_custom_transition",
            Action::OpenSettings => "open_settings",
            Action::CloseSettings => "close_settings",
            Action::OpenAppSettings => "open_app_settings",
            Action::CloseAppSettings => "close_app_settings",
            Action::OpenImagePicker { .. } => "open_image_picker",
            Action::CloseImagePicker => "close_image_picker",
            Action::RestoreState(_) => "restore_state",
        }
    }

    /// Actions that only touch transient UI state and need no save.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Action::OpenSettings
                | Action::CloseSettings
                | Action::OpenAppSettings
                | Action::CloseAppSettings
                | Action::OpenImagePicker { .. }
                | Action::CloseImagePicker
        )
    }
}
