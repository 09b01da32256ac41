// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tab bar.
//!
//! One selectable entry per shot tab with rename and close controls, a
//! button for a new tab and the app settings button on the right.

use super::{InlineRename, RenameOutcome};
use crate::models::project::{Id, Tab};
use crate::state::Action;

/// Scratch state of the tab bar.
#[derive(Default)]
pub struct TabBarState {
    renaming: Option<InlineRename>,
}

/// Display the tab bar.
pub fn show(
    ui: &mut egui::Ui,
    tabs: &[Tab],
    active_id: &Id,
    state: &mut TabBarState,
    actions: &mut Vec<Action>,
) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        for tab in tabs {
            ui.separator();

            // Inline rename field
            if let Some(rename) = state.renaming.as_mut().filter(|r| r.is_for(&tab.id)) {
                match rename.show(ui, 80.0) {
                    RenameOutcome::Editing => {}
                    RenameOutcome::Commit(name) => {
                        actions.push(Action::RenameTab {
                            id: tab.id.clone(),
                            name,
                        });
                        state.renaming = None;
                    }
                    RenameOutcome::Cancel => state.renaming = None,
                }
                continue;
            }

            let is_active = &tab.id == active_id;
            let label = ui.selectable_label(is_active, egui::RichText::new(&tab.name).monospace());
            if label.clicked() {
                actions.push(Action::SetActiveTab { id: tab.id.clone() });
            }
            if label.double_clicked() {
                state.renaming = Some(InlineRename::new(tab.id.clone(), &tab.name));
            }

            if ui.small_button("✏").on_hover_text("Rename").clicked() {
                state.renaming = Some(InlineRename::new(tab.id.clone(), &tab.name));
            }
            if ui.small_button("✕").on_hover_text("Close tab").clicked() && confirm_close(tab) {
                log::info!("Closing tab {}", tab.name);
                actions.push(Action::RemoveTab { id: tab.id.clone() });
            }
        }

        ui.separator();
        if ui.button("➕").on_hover_text("Add new tab").clicked() {
            actions.push(Action::AddTab);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("⚙").on_hover_text("Settings").clicked() {
                actions.push(Action::OpenAppSettings);
            }
        });
    });
}

/// Ask before closing a tab that holds any work.
fn confirm_close(tab: &Tab) -> bool {
    if !tab.has_content() {
        return true;
    }
    let answer = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title("Close tab")
        .set_description(format!(
            "Close \"{}\"? This tab has content that will be lost.",
            tab.name
        ))
        .set_buttons(rfd::MessageButtons::OkCancel)
        .show();
    answer == rfd::MessageDialogResult::Ok
}
