// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Final prompt panel.

use std::time::Duration;

/// How long the copy button shows its confirmation.
pub const COPIED_FEEDBACK: Duration = Duration::from_millis(1500);

/// Display the assembled prompt. Returns true when Copy was clicked.
pub fn show(ui: &mut egui::Ui, prompt: &str, copied: bool) -> bool {
    let mut copy = false;

    ui.horizontal(|ui| {
        ui.heading("Final Prompt");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let label = if copied { "✔ Copied" } else { "📋 Copy" };
            if ui.add_enabled(!prompt.is_empty(), egui::Button::new(label)).clicked() {
                copy = true;
            }
        });
    });
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if prompt.is_empty() {
                ui.label(
                    egui::RichText::new("Add markers and write prompts to see output here.")
                        .weak(),
                );
            } else {
                ui.label(egui::RichText::new(prompt).monospace());
            }
        });

    copy
}
