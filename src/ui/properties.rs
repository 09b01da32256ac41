// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Prefix and suffix editors.
//!
//! Free text placed before and after the marker lines of the prompt.

use crate::models::project::Tab;
use crate::state::Action;

/// Display the prefix editor above the timeline.
pub fn show_prefix(ui: &mut egui::Ui, tab: &Tab, actions: &mut Vec<Action>) {
    if let Some(text) = prompt_text(ui, "Prefix", "Prefix prompt (appears at start)...", &tab.prefix) {
        actions.push(Action::SetPrefix(text));
    }
}

/// Display the suffix editor below the timeline.
pub fn show_suffix(ui: &mut egui::Ui, tab: &Tab, actions: &mut Vec<Action>) {
    if let Some(text) = prompt_text(ui, "Suffix", "Suffix prompt (appears at end)...", &tab.suffix) {
        actions.push(Action::SetSuffix(text));
    }
}

/// Multi-line text field; returns the new text when it was edited.
fn prompt_text(ui: &mut egui::Ui, label: &str, hint: &str, current: &str) -> Option<String> {
    ui.label(egui::RichText::new(label).strong());
    let mut text = current.to_string();
    let response = ui.add(
        egui::TextEdit::multiline(&mut text)
            .hint_text(hint)
            .desired_rows(2)
            .desired_width(f32::INFINITY),
    );
    ui.add_space(8.0);
    response.changed().then_some(text)
}
