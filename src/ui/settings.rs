// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Timeline settings and app settings windows.

use super::WARNING;
use crate::io::persistence::TransitionSettings;
use crate::models::project::{Timeline, TimelinePatch, FPS_CHOICES};
use crate::state::Action;

/// Scratch state of the settings windows.
#[derive(Default)]
pub struct SettingsState {
    /// Duration text while the timeline window is open
    duration_input: Option<String>,
    new_transition: String,
}

impl SettingsState {
    /// Forget the duration being typed so the next open starts fresh.
    pub fn reset_timeline_input(&mut self) {
        self.duration_input = None;
    }
}

/// Parse the duration field; only whole positive seconds are accepted.
pub fn parse_duration_input(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok().filter(|seconds| *seconds > 0)
}

/// Display the timeline settings window for the active tab.
pub fn timeline_window(
    ctx: &egui::Context,
    timeline: &Timeline,
    state: &mut SettingsState,
    actions: &mut Vec<Action>,
) {
    let mut open = true;

    egui::Window::new("Timeline Settings")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label("Duration (seconds)");
            let input = state
                .duration_input
                .get_or_insert_with(|| timeline.duration.to_string());
            let response = ui.add(egui::TextEdit::singleline(&mut *input).desired_width(80.0));
            if response.changed() {
                if let Some(seconds) = parse_duration_input(input) {
                    actions.push(Action::SetTimeline(TimelinePatch::duration(seconds)));
                }
            }
            if timeline.duration_is_unusual() {
                ui.colored_label(
                    WARNING,
                    "Most AI video generating models do not support this length.",
                );
            }

            ui.add_space(8.0);
            ui.label("Frame rate");
            egui::ComboBox::from_id_source("fps")
                .selected_text(format!("{} fps", timeline.fps))
                .show_ui(ui, |ui| {
                    for fps in FPS_CHOICES {
                        if ui
                            .selectable_label(timeline.fps == fps, format!("{} fps", fps))
                            .clicked()
                        {
                            actions.push(Action::SetTimeline(TimelinePatch::fps(fps)));
                        }
                    }
                });
            if timeline.fps_is_unusual() {
                ui.colored_label(
                    WARNING,
                    "Non-standard frame rate. Most AI video models expect 24 or 25 fps.",
                );
            }

            ui.add_space(4.0);
            ui.label(
                egui::RichText::new(format!("{} frames total", timeline.total_frames())).weak(),
            );
        });

    if !open {
        state.reset_timeline_input();
        actions.push(Action::CloseSettings);
    }
}

/// Display the app settings window.
///
/// Default transitions are edited directly on `transitions`, which saves
/// every change. Project transitions are removed through actions.
pub fn app_settings_window(
    ctx: &egui::Context,
    transitions: &mut TransitionSettings,
    project_transitions: &[String],
    state: &mut SettingsState,
    actions: &mut Vec<Action>,
) {
    let mut open = true;

    egui::Window::new("Settings")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new("Default Transitions").strong());
            ui.label(
                egui::RichText::new(
                    "These options appear in every marker's transition dropdown.",
                )
                .weak(),
            );

            let mut removed = None;
            for label in transitions.transitions() {
                ui.horizontal(|ui| {
                    ui.label(label);
                    if ui.small_button("✕").on_hover_text("Remove").clicked() {
                        removed = Some(label.clone());
                    }
                });
            }
            if transitions.transitions().is_empty() {
                ui.label(egui::RichText::new("No default transitions").weak());
            }
            if let Some(label) = removed {
                log::info!("Removed default transition {}", label);
                transitions.remove(&label);
            }

            ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut state.new_transition)
                        .hint_text("Add transition...")
                        .desired_width(160.0),
                );
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let can_add = !state.new_transition.trim().is_empty();
                let clicked = ui.add_enabled(can_add, egui::Button::new("Add")).clicked();
                if (submitted || clicked) && transitions.add(&state.new_transition) {
                    log::info!("Added default transition {}", state.new_transition.trim());
                    state.new_transition.clear();
                    response.request_focus();
                }
            });

            if ui.button("Reset to defaults").clicked() {
                log::info!("Reset default transitions");
                transitions.reset();
            }

            ui.separator();
            ui.label(egui::RichText::new("Project Transitions").strong());
            ui.label(egui::RichText::new("Custom transitions created in this project.").weak());
            for label in project_transitions {
                ui.horizontal(|ui| {
                    ui.label(label);
                    if ui.small_button("✕").on_hover_text("Remove").clicked() {
                        actions.push(Action::RemoveCustomTransition(label.clone()));
                    }
                });
            }
            if project_transitions.is_empty() {
                ui.label(egui::RichText::new("None yet").weak());
            }
        });

    if !open {
        actions.push(Action::CloseAppSettings);
    }
}
