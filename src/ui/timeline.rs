// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Timeline editor.
//!
//! A frame ruler with draggable marker handles, followed by the marker text
//! boxes laid out in two rows. Clicking the ruler adds a marker and opens
//! the image picker for it.

use super::thumbnails::ThumbnailCache;
use super::{ACCENT, WARNING};
use crate::models::project::{Id, Marker, Tab, Timeline};
use crate::models::transitions::contains_transition;
use crate::state::{Action, ImagePicker};
use crate::util::geometry::{
    frame_to_pixel, picker_position, pixel_to_frame, ruler_ticks, Tick, PICKER_WIDTH,
};
use crate::util::layout::{layout_markers, MarkerPlacement, ROW_OFFSET, TEXT_BOX_WIDTH};
use std::time::{Duration, Instant};

/// Clicks on the ruler this soon after a marker drag ends are ignored.
pub const DRAG_CLICK_GRACE: Duration = Duration::from_millis(200);

/// Above this many markers the timeline shows a crowding warning.
pub const MARKER_WARNING_THRESHOLD: usize = 10;

const RULER_HEIGHT: f32 = 56.0;
const BOX_HEIGHT: f32 = 160.0;
const CHIP_SIZE: egui::Vec2 = egui::vec2(64.0, 22.0);
const THUMB_SIZE: f32 = 20.0;

/// Label of the empty transition in the dropdown.
const NO_TRANSITION: &str = "--";

/// Inline field for typing a custom transition.
struct CustomEntry {
    marker_id: Id,
    buffer: String,
    focus_requested: bool,
}

/// Scratch state of the timeline.
#[derive(Default)]
pub struct TimelineState {
    dragging: Option<Id>,
    last_drag_end: Option<Instant>,
    custom_entry: Option<CustomEntry>,
    ticks: Option<(Timeline, Vec<Tick>)>,
}

impl TimelineState {
    /// Whether a click on the ruler may add a marker.
    pub fn accepts_ruler_click(&self, now: Instant) -> bool {
        if self.dragging.is_some() {
            return false;
        }
        match self.last_drag_end {
            Some(end) => now.saturating_duration_since(end) >= DRAG_CLICK_GRACE,
            None => true,
        }
    }

    fn begin_drag(&mut self, marker_id: Id) {
        self.dragging = Some(marker_id);
    }

    fn end_drag(&mut self, now: Instant) {
        self.dragging = None;
        self.last_drag_end = Some(now);
    }

    fn ticks(&mut self, timeline: &Timeline) -> &[Tick] {
        let stale = !matches!(&self.ticks, Some((cached, _)) if cached == timeline);
        if stale {
            self.ticks = Some((*timeline, ruler_ticks(timeline)));
        }
        match &self.ticks {
            Some((_, ticks)) => ticks,
            None => &[],
        }
    }
}

/// What the timeline displays.
pub struct TimelineView<'a> {
    pub tab: &'a Tab,
    pub picker: Option<&'a ImagePicker>,
    /// Merged default and project transitions
    pub transitions: &'a [String],
}

/// Display the timeline.
pub fn show(
    ui: &mut egui::Ui,
    view: TimelineView<'_>,
    thumbnails: &mut ThumbnailCache,
    state: &mut TimelineState,
    actions: &mut Vec<Action>,
) {
    let tab = view.tab;
    let total = tab.total_frames();
    let sorted = tab.sorted_markers();

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Timeline").strong());
        ui.label(
            egui::RichText::new(format!(
                "{}s @ {} fps",
                tab.timeline.duration, tab.timeline.fps
            ))
            .weak(),
        );
        if ui.small_button("⚙").on_hover_text("Timeline settings").clicked() {
            actions.push(Action::OpenSettings);
        }
        if tab.markers.len() > MARKER_WARNING_THRESHOLD {
            ui.colored_label(
                WARNING,
                format!(
                    "{} markers. Many models struggle with this many cues.",
                    tab.markers.len()
                ),
            );
        }
    });

    let width = ui.available_width().max(100.0);
    let (ruler, response) =
        ui.allocate_exact_size(egui::vec2(width, RULER_HEIGHT), egui::Sense::click());

    draw_ruler(ui.painter(), ruler, total, state.ticks(&tab.timeline));

    // Marker handles
    for marker in &sorted {
        let x = ruler.left() + frame_to_pixel(marker.frame, total, ruler.width());
        ui.painter().line_segment(
            [egui::pos2(x, ruler.top()), egui::pos2(x, ruler.bottom())],
            egui::Stroke::new(2.0, ACCENT),
        );

        let handle_rect = egui::Rect::from_center_size(
            egui::pos2(x, ruler.bottom() - 7.0),
            egui::vec2(12.0, 14.0),
        );
        let handle = ui
            .interact(handle_rect, ui.id().with(("handle", &marker.id)), egui::Sense::drag())
            .on_hover_cursor(egui::CursorIcon::ResizeHorizontal);
        ui.painter().rect_filled(handle_rect, 2.0, ACCENT);
        drag_marker(&handle, marker, ruler, total, state, actions);

        let thumb_rect = egui::Rect::from_center_size(
            egui::pos2(x, ruler.top() + 26.0),
            egui::vec2(THUMB_SIZE, THUMB_SIZE),
        );
        let texture = marker
            .image_id
            .as_ref()
            .and_then(|id| tab.image(id))
            .and_then(|image| thumbnails.get(ui.ctx(), image));
        let picker_clicked = match texture {
            Some(texture) => {
                ui.painter().image(
                    texture.id(),
                    thumb_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
                ui.interact(thumb_rect, ui.id().with(("thumb", &marker.id)), egui::Sense::click())
                    .on_hover_text("Change image")
                    .clicked()
            }
            None => ui
                .put(thumb_rect, egui::Button::new("+").small())
                .on_hover_text("Assign image")
                .clicked(),
        };
        if picker_clicked {
            actions.push(Action::OpenImagePicker {
                marker_id: marker.id.clone(),
                position: picker_position(x - ruler.left(), ruler.width()),
            });
        }
    }

    if response.clicked() && state.accepts_ruler_click(Instant::now()) {
        if let Some(pos) = response.interact_pointer_pos() {
            let px = pos.x - ruler.left();
            actions.push(Action::AddMarker {
                frame: pixel_to_frame(px, ruler.width(), total),
                position: picker_position(px, ruler.width()),
            });
        }
    }

    if let Some(picker) = view.picker {
        show_image_picker(ui.ctx(), ruler, picker, tab, thumbnails, actions);
    }

    // Text boxes
    let (area, _) = ui.allocate_exact_size(
        egui::vec2(width, ROW_OFFSET + BOX_HEIGHT + 8.0),
        egui::Sense::hover(),
    );
    for placement in layout_markers(&sorted, total, area.width()) {
        ui.push_id(&placement.marker.id, |ui| match placement.position {
            None => marker_chip(ui, area, total, placement.marker, actions),
            Some(_) => marker_box(
                ui,
                area,
                &placement,
                ruler,
                total,
                view.transitions,
                state,
                actions,
            ),
        });
    }
}

fn draw_ruler(painter: &egui::Painter, ruler: egui::Rect, total: i64, ticks: &[Tick]) {
    let visuals_text = egui::Color32::from_gray(170);
    painter.rect_filled(ruler, 4.0, egui::Color32::from_gray(35));

    for tick in ticks {
        let x = ruler.left() + tick.fraction * ruler.width();
        let length = if tick.major { 14.0 } else { 7.0 };
        painter.line_segment(
            [
                egui::pos2(x, ruler.bottom()),
                egui::pos2(x, ruler.bottom() - length),
            ],
            egui::Stroke::new(1.0, egui::Color32::from_gray(110)),
        );
        if let Some(label) = &tick.label {
            let anchor = if tick.fraction <= 0.0 {
                egui::Align2::LEFT_BOTTOM
            } else if tick.fraction >= 1.0 {
                egui::Align2::RIGHT_BOTTOM
            } else {
                egui::Align2::CENTER_BOTTOM
            };
            painter.text(
                egui::pos2(x, ruler.bottom() - 16.0),
                anchor,
                label,
                egui::FontId::proportional(10.0),
                visuals_text,
            );
        }
    }

    painter.text(
        ruler.right_top() + egui::vec2(-4.0, 4.0),
        egui::Align2::RIGHT_TOP,
        format!("{}f", total),
        egui::FontId::monospace(10.0),
        visuals_text,
    );
}

/// Move a marker while its handle is dragged.
fn drag_marker(
    response: &egui::Response,
    marker: &Marker,
    ruler: egui::Rect,
    total: i64,
    state: &mut TimelineState,
    actions: &mut Vec<Action>,
) {
    if response.drag_started() {
        state.begin_drag(marker.id.clone());
    }
    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            let frame = pixel_to_frame(pos.x - ruler.left(), ruler.width(), total);
            if frame != marker.frame {
                actions.push(Action::MoveMarker {
                    id: marker.id.clone(),
                    frame,
                });
            }
        }
    }
    if response.drag_stopped() {
        state.end_drag(Instant::now());
    }
}

fn show_image_picker(
    ctx: &egui::Context,
    ruler: egui::Rect,
    picker: &ImagePicker,
    tab: &Tab,
    thumbnails: &mut ThumbnailCache,
    actions: &mut Vec<Action>,
) {
    let pos = ruler.left_top() + egui::vec2(picker.position.x.max(0.0), picker.position.y);
    let area = egui::Area::new(egui::Id::new("image_picker"))
        .order(egui::Order::Foreground)
        .fixed_pos(pos)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_width(PICKER_WIDTH - 20.0);
                ui.label(egui::RichText::new("Assign image").strong());

                if tab.images.is_empty() {
                    ui.label(egui::RichText::new("No images added yet").weak());
                    return;
                }

                ui.horizontal_wrapped(|ui| {
                    for image in &tab.images {
                        let clicked = match thumbnails.get(ctx, image) {
                            Some(texture) => ui
                                .add(egui::ImageButton::new((
                                    texture.id(),
                                    egui::vec2(40.0, 40.0),
                                )))
                                .on_hover_text(&image.name)
                                .clicked(),
                            None => ui.button(&image.name).clicked(),
                        };
                        if clicked {
                            actions.push(Action::AssignMarkerImage {
                                marker_id: picker.marker_id.clone(),
                                image_id: image.id.clone(),
                            });
                        }
                    }
                });
            });
        });

    let pressed_outside = ctx.input(|i| {
        i.pointer.any_pressed()
            && i
                .pointer
                .interact_pos()
                .is_some_and(|p| !area.response.rect.contains(p))
    });
    if pressed_outside {
        actions.push(Action::CloseImagePicker);
    }
}

fn marker_chip(
    ui: &mut egui::Ui,
    area: egui::Rect,
    total: i64,
    marker: &Marker,
    actions: &mut Vec<Action>,
) {
    let x = area.left() + frame_to_pixel(marker.frame, total, area.width());
    let left = (x - CHIP_SIZE.x / 2.0).clamp(area.left(), area.right() - CHIP_SIZE.x);
    let rect = egui::Rect::from_min_size(egui::pos2(left, area.top()), CHIP_SIZE);

    ui.allocate_ui_at_rect(rect, |ui| {
        ui.horizontal(|ui| {
            if ui.small_button("⏷").on_hover_text("Expand").clicked() {
                actions.push(Action::ToggleMarkerCollapsed {
                    id: marker.id.clone(),
                });
            }
            ui.label(egui::RichText::new(marker.frame.to_string()).monospace());
        });
    });
}

#[allow(clippy::too_many_arguments)]
fn marker_box(
    ui: &mut egui::Ui,
    area: egui::Rect,
    placement: &MarkerPlacement<'_>,
    ruler: egui::Rect,
    total: i64,
    transitions: &[String],
    state: &mut TimelineState,
    actions: &mut Vec<Action>,
) {
    let Some(position) = placement.position else {
        return;
    };
    let marker = placement.marker;
    let top = area.top() + placement.row as f32 * ROW_OFFSET;
    let rect = egui::Rect::from_min_size(
        egui::pos2(area.left() + position.left, top),
        egui::vec2(TEXT_BOX_WIDTH, BOX_HEIGHT),
    );

    // Connector from the ruler side down to the box
    if placement.row > 0 || position.connector.is_some() {
        let x = rect.left() + position.connector.unwrap_or(TEXT_BOX_WIDTH / 2.0);
        let from = if placement.row > 0 { area.top() } else { top - 4.0 };
        ui.painter().line_segment(
            [egui::pos2(x, from), egui::pos2(x, rect.top())],
            egui::Stroke::new(1.0, ACCENT.gamma_multiply(0.6)),
        );
    }

    ui.allocate_ui_at_rect(rect, |ui| {
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.set_width(TEXT_BOX_WIDTH - 14.0);

                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing.x = 4.0;
                    let grip = ui
                        .add(egui::Label::new("⠿").sense(egui::Sense::drag()))
                        .on_hover_cursor(egui::CursorIcon::Grab);
                    drag_marker(&grip, marker, ruler, total, state, actions);

                    let mut show_frame_ref = marker.show_frame_ref;
                    if ui
                        .checkbox(&mut show_frame_ref, "")
                        .on_hover_text("Include frame reference")
                        .changed()
                    {
                        actions.push(Action::ToggleMarkerFrameRef {
                            id: marker.id.clone(),
                        });
                    }
                    ui.label(egui::RichText::new(marker.frame.to_string()).monospace());

                    transition_dropdown(ui, marker, transitions, state, actions);

                    if ui.small_button("⏶").on_hover_text("Collapse").clicked() {
                        actions.push(Action::ToggleMarkerCollapsed {
                            id: marker.id.clone(),
                        });
                    }
                });

                let mut text = marker.text.clone();
                if ui
                    .add(
                        egui::TextEdit::multiline(&mut text)
                            .hint_text("Prompt text...")
                            .desired_rows(4)
                            .desired_width(f32::INFINITY),
                    )
                    .changed()
                {
                    actions.push(Action::UpdateMarkerText {
                        id: marker.id.clone(),
                        text,
                    });
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("🗑").on_hover_text("Delete marker").clicked() {
                        actions.push(Action::RemoveMarker {
                            id: marker.id.clone(),
                        });
                    }
                });
            });
    });
}

fn transition_dropdown(
    ui: &mut egui::Ui,
    marker: &Marker,
    transitions: &[String],
    state: &mut TimelineState,
    actions: &mut Vec<Action>,
) {
    if let Some(entry) = state
        .custom_entry
        .as_mut()
        .filter(|entry| entry.marker_id == marker.id)
    {
        let response = ui.add(
            egui::TextEdit::singleline(&mut entry.buffer)
                .hint_text("custom...")
                .desired_width(70.0),
        );
        if !entry.focus_requested {
            response.request_focus();
            entry.focus_requested = true;
        }
        if response.lost_focus() {
            if !ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                actions.extend(custom_transition_actions(
                    &marker.id,
                    &entry.buffer,
                    transitions,
                ));
            }
            state.custom_entry = None;
        }
        return;
    }

    let selected = if marker.transition.is_empty() {
        NO_TRANSITION
    } else {
        marker.transition.as_str()
    };
    egui::ComboBox::from_id_source("transition")
        .selected_text(selected)
        .width(70.0)
        .show_ui(ui, |ui| {
            if ui
                .selectable_label(marker.transition.is_empty(), NO_TRANSITION)
                .clicked()
            {
                actions.push(Action::SetMarkerTransition {
                    id: marker.id.clone(),
                    transition: String::new(),
                });
            }
            for option in transitions {
                if ui
                    .selectable_label(&marker.transition == option, option)
                    .clicked()
                {
                    actions.push(Action::SetMarkerTransition {
                        id: marker.id.clone(),
                        transition: option.clone(),
                    });
                }
            }
            if ui.selectable_label(false, "Custom...").clicked() {
                state.custom_entry = Some(CustomEntry {
                    marker_id: marker.id.clone(),
                    buffer: String::new(),
                    focus_requested: false,
                });
            }
        });
}

/// Actions for committing a typed custom transition on a marker.
///
/// A label missing from the merged list is also recorded as a project
/// custom transition. Blank input commits nothing.
pub fn custom_transition_actions(marker_id: &Id, value: &str, transitions: &[String]) -> Vec<Action> {
    let value = value.trim();
    if value.is_empty() {
        return Vec::new();
    }

    let mut actions = Vec::new();
    if !contains_transition(transitions, value) {
        actions.push(Action::AddCustomTransition(value.to_string()));
    }
    actions.push(Action::SetMarkerTransition {
        id: marker_id.clone(),
        transition: value.to_string(),
    });
    actions
}
