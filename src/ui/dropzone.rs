// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Reference image strip.
//!
//! Shows the active tab's images as thumbnails with rename and remove
//! controls. Files dropped anywhere on the window are handled by the app;
//! this component only asks for the file picker.

use super::thumbnails::ThumbnailCache;
use super::{InlineRename, RenameOutcome, ACCENT};
use crate::models::project::Tab;
use crate::state::Action;
use std::ops::RangeInclusive;

pub const DEFAULT_THUMB_SIZE: f32 = 96.0;
pub const THUMB_SIZE_RANGE: RangeInclusive<f32> = 48.0..=240.0;

#[derive(Default)]
pub struct DropzoneState {
    renaming: Option<InlineRename>,
}

/// Display the image strip. Returns true when the user asked to browse for
/// image files.
pub fn show(
    ui: &mut egui::Ui,
    tab: &Tab,
    thumbnails: &mut ThumbnailCache,
    thumb_size: &mut f32,
    state: &mut DropzoneState,
    actions: &mut Vec<Action>,
) -> bool {
    let mut browse = false;

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Images").strong());
        if ui.small_button("Add images...").clicked() {
            browse = true;
        }
        if !tab.images.is_empty() {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add(egui::Slider::new(thumb_size, THUMB_SIZE_RANGE).show_value(false));
                ui.label("Size");
            });
        }
    });

    let hovering_files = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
    let mut frame = egui::Frame::group(ui.style());
    if hovering_files {
        frame = frame.stroke(egui::Stroke::new(2.0, ACCENT));
    }

    frame.show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.set_min_height(*thumb_size * 0.75);

        if tab.images.is_empty() {
            ui.vertical_centered(|ui| {
                let placeholder = egui::Button::new(
                    egui::RichText::new("Drop or click to add images").weak(),
                )
                .frame(false);
                if ui.add(placeholder).clicked() {
                    browse = true;
                }
            });
            return;
        }

        ui.horizontal_wrapped(|ui| {
            for image in &tab.images {
                ui.push_id(&image.id, |ui| {
                    ui.vertical(|ui| {
                        ui.set_max_width(*thumb_size);

                        match thumbnails.get(ui.ctx(), image) {
                            Some(texture) => {
                                let size = texture.size_vec2();
                                let scale = (*thumb_size / size.x).min(*thumb_size * 1.5 / size.y);
                                ui.image((texture.id(), size * scale));
                            }
                            None if thumbnails.is_pending(&image.id) => {
                                ui.add_sized([*thumb_size, *thumb_size], egui::Spinner::new());
                            }
                            None => {
                                ui.add_sized(
                                    [*thumb_size, *thumb_size],
                                    egui::Label::new(egui::RichText::new("?").weak()),
                                );
                            }
                        }

                        ui.horizontal(|ui| {
                            if let Some(rename) =
                                state.renaming.as_mut().filter(|r| r.is_for(&image.id))
                            {
                                match rename.show(ui, *thumb_size - 24.0) {
                                    RenameOutcome::Editing => {}
                                    RenameOutcome::Commit(name) => {
                                        actions.push(Action::RenameImage {
                                            id: image.id.clone(),
                                            name,
                                        });
                                        state.renaming = None;
                                    }
                                    RenameOutcome::Cancel => state.renaming = None,
                                }
                            } else {
                                let name = ui
                                    .add(
                                        egui::Label::new(
                                            egui::RichText::new(&image.name).monospace(),
                                        )
                                        .sense(egui::Sense::click()),
                                    )
                                    .on_hover_text("Click to rename");
                                if name.clicked() {
                                    state.renaming =
                                        Some(InlineRename::new(image.id.clone(), &image.name));
                                }
                            }

                            if ui.small_button("✕").on_hover_text("Remove image").clicked() {
                                actions.push(Action::RemoveImage { id: image.id.clone() });
                            }
                        });
                    });
                });
            }
        });
    });

    browse
}
