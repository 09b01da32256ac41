// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the Crumpet application.
//!
//! Components read the current state and push [`crate::state::Action`]s for
//! the app to apply after the frame. Text being edited and other scratch
//! state lives in small per-component structs owned by the app.

pub mod dropzone;
pub mod prompt_panel;
pub mod properties;
pub mod settings;
pub mod thumbnails;
pub mod timeline;
pub mod toolbar;

use crate::models::project::Id;

/// Accent color used for markers and highlights.
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(0xF2, 0x8C, 0x28);

/// Color of advisory warnings.
pub const WARNING: egui::Color32 = egui::Color32::from_rgb(0xE8, 0xB3, 0x3A);

/// Result of an inline rename field for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Editing,
    Commit(String),
    Cancel,
}

/// Single-line field used to rename tabs and images in place.
///
/// Enter or clicking away commits; Escape cancels.
pub struct InlineRename {
    pub target: Id,
    buffer: String,
    focus_requested: bool,
}

impl InlineRename {
    pub fn new(target: Id, current: &str) -> Self {
        Self {
            target,
            buffer: current.to_string(),
            focus_requested: false,
        }
    }

    pub fn is_for(&self, id: &Id) -> bool {
        &self.target == id
    }

    pub fn show(&mut self, ui: &mut egui::Ui, width: f32) -> RenameOutcome {
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.buffer)
                .desired_width(width)
                .font(egui::TextStyle::Monospace),
        );
        if !self.focus_requested {
            response.request_focus();
            self.focus_requested = true;
        }

        if response.lost_focus() {
            if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                return RenameOutcome::Cancel;
            }
            return RenameOutcome::Commit(self.buffer.clone());
        }
        RenameOutcome::Editing
    }
}
