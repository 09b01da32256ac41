// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The state reducer.
//!
//! [`reduce`] is a total function from the current state and an action to
//! the next state. It never touches its input and has no failure path: an
//! action naming an id that does not exist leaves the state as it was.

use super::{Action, AppState, ImagePicker};
use crate::models::project::{next_tab_name, Id, Image, Marker, ProjectData, Tab, DEFAULT_TAB_NAME};

/// Compute the state that follows `action`.
pub fn reduce(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();
    match action {
        Action::RestoreState(data) => next = AppState::from_project(data),

        Action::AddTab => {
            let tab = Tab::new(next_tab_name(&next.tabs));
            next.active_tab_id = tab.id.clone();
            next.tabs.push(tab);
        }
        Action::RemoveTab { id } => remove_tab(&mut next, &id),
        Action::RenameTab { id, name } => {
            if let Some(name) = submitted_name(&name) {
                if let Some(tab) = next.tabs.iter_mut().find(|t| t.id == id) {
                    tab.name = name;
                }
            }
        }
        Action::SetActiveTab { id } => {
            if next.tabs.iter().any(|t| t.id == id) {
                next.active_tab_id = id;
                next.settings_open = false;
                next.image_picker = None;
            }
        }

        Action::AddImage { data_uri } => {
            if let Some(tab) = next.active_tab_mut() {
                let image = Image::new(data_uri, tab.images.len() + 1);
                tab.images.push(image);
            }
        }
        Action::RenameImage { id, name } => {
            if let Some(name) = submitted_name(&name) {
                if let Some(image) = next
                    .active_tab_mut()
                    .and_then(|t| t.images.iter_mut().find(|img| img.id == id))
                {
                    image.name = name;
                }
            }
        }
        Action::RemoveImage { id } => {
            if let Some(tab) = next.active_tab_mut() {
                tab.images.retain(|img| img.id != id);
                for marker in &mut tab.markers {
                    if marker.image_id.as_ref() == Some(&id) {
                        marker.image_id = None;
                    }
                }
            }
        }

        Action::SetTimeline(patch) => {
            if let Some(tab) = next.active_tab_mut() {
                tab.timeline = tab.timeline.patched(patch);
                let total = tab.timeline.total_frames();
                for marker in &mut tab.markers {
                    marker.frame = marker.frame.min(total);
                }
            }
        }

        Action::AddMarker { frame, position } => {
            let marker = Marker::new(frame);
            let marker_id = marker.id.clone();
            if let Some(tab) = next.active_tab_mut() {
                tab.markers.push(marker);
            } else {
                return next;
            }
            next.image_picker = Some(ImagePicker {
                marker_id,
                position,
            });
        }
        Action::RemoveMarker { id } => {
            if let Some(tab) = next.active_tab_mut() {
                tab.markers.retain(|m| m.id != id);
            }
        }
        Action::MoveMarker { id, frame } => {
            if let Some(marker) = active_marker_mut(&mut next, &id) {
                marker.frame = frame;
            }
        }
        Action::UpdateMarkerText { id, text } => {
            if let Some(marker) = active_marker_mut(&mut next, &id) {
                marker.text = text;
            }
        }
        Action::ToggleMarkerCollapsed { id } => {
            if let Some(marker) = active_marker_mut(&mut next, &id) {
                marker.collapsed = !marker.collapsed;
            }
        }
        Action::ToggleMarkerFrameRef { id } => {
            if let Some(marker) = active_marker_mut(&mut next, &id) {
                marker.show_frame_ref = !marker.show_frame_ref;
            }
        }
        Action::AssignMarkerImage {
            marker_id,
            image_id,
        } => assign_marker_image(&mut next, &marker_id, image_id),
        Action::SetMarkerTransition { id, transition } => {
            if let Some(marker) = active_marker_mut(&mut next, &id) {
                marker.transition = transition;
            }
        }

        Action::SetPrefix(text) => {
            if let Some(tab) = next.active_tab_mut() {
                tab.prefix = text;
            }
        }
        Action::SetSuffix(text) => {
            if let Some(tab) = next.active_tab_mut() {
                tab.suffix = text;
            }
        }

        Action::AddCustomTransition(value) => {
            let value = value.trim();
            if !value.is_empty() && !next.custom_transitions.iter().any(|t| t == value) {
                next.custom_transitions.push(value.to_string());
            }
        }
        Action::RemoveCustomTransition(value) => {
            next.custom_transitions.retain(|t| *t != value);
        }

        Action::OpenSettings => next.settings_open = true,
        Action::CloseSettings => next.settings_open = false,
        Action::OpenAppSettings => next.app_settings_open = true,
        Action::CloseAppSettings => next.app_settings_open = false,
        Action::OpenImagePicker {
            marker_id,
            position,
        } => {
            next.image_picker = Some(ImagePicker {
                marker_id,
                position,
            })
        }
        Action::CloseImagePicker => next.image_picker = None,
    }
    next
}

/// Trimmed name, or `None` when nothing but whitespace was submitted.
fn submitted_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn active_marker_mut<'a>(state: &'a mut AppState, id: &Id) -> Option<&'a mut Marker> {
    state
        .active_tab_mut()?
        .markers
        .iter_mut()
        .find(|m| &m.id == id)
}

fn remove_tab(state: &mut AppState, id: &Id) {
    let Some(index) = state.tabs.iter().position(|t| &t.id == id) else {
        return;
    };
    state.tabs.remove(index);

    if state.tabs.is_empty() {
        let tab = Tab::new(DEFAULT_TAB_NAME);
        state.active_tab_id = tab.id.clone();
        state.tabs.push(tab);
    } else if &state.active_tab_id == id {
        let fallback = index.saturating_sub(1);
        state.active_tab_id = state.tabs[fallback].id.clone();
    }
}

fn assign_marker_image(state: &mut AppState, marker_id: &Id, image_id: Id) {
    let Some(tab) = state.active_tab_mut() else {
        return;
    };
    let Some(image_name) = tab.image(&image_id).map(|img| img.name.clone()) else {
        return;
    };
    let Some(marker) = tab.markers.iter_mut().find(|m| &m.id == marker_id) else {
        return;
    };
    if marker.text.is_empty() {
        marker.text = format!("{} ", image_name);
    }
    marker.image_id = Some(image_id);
    state.image_picker = None;
}

/// State for a project restored from storage.
pub fn restored(data: ProjectData) -> AppState {
    reduce(&AppState::default(), Action::RestoreState(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::{Timeline, TimelinePatch};
    use crate::state::PickerPosition;
    use pretty_assertions::assert_eq;

    fn apply(state: &AppState, actions: impl IntoIterator<Item = Action>) -> AppState {
        actions
            .into_iter()
            .fold(state.clone(), |acc, action| reduce(&acc, action))
    }

    fn active(state: &AppState) -> &Tab {
        state.active_tab().expect("active tab exists")
    }

    fn with_markers(frames: &[i64]) -> AppState {
        let mut state = AppState::default();
        for &frame in frames {
            state = reduce(
                &state,
                Action::AddMarker {
                    frame,
                    position: PickerPosition::default(),
                },
            );
        }
        reduce(&state, Action::CloseImagePicker)
    }

    fn data_uri() -> std::sync::Arc<str> {
        "data:image/png;base64,AAAA".into()
    }

    #[test]
    fn test_reduce_does_not_mutate_input() {
        let state = AppState::default();
        let before = state.clone();
        let next = reduce(&state, Action::AddTab);
        assert_eq!(state, before);
        assert_eq!(next.tabs.len(), 2);
    }

    #[test]
    fn test_add_tab_names_and_activates() {
        let state = apply(&AppState::default(), [Action::AddTab, Action::AddTab]);
        let names: Vec<&str> = state.tabs.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["SH010", "SH020", "SH030"]);
        assert_eq!(active(&state).name, "SH030");
        assert_eq!(active(&state).timeline, Timeline { duration: 8, fps: 24 });
    }

    #[test]
    fn test_remove_active_tab_selects_previous() {
        let state = apply(&AppState::default(), [Action::AddTab, Action::AddTab]);
        let middle = state.tabs[1].id.clone();
        let state = reduce(&state, Action::SetActiveTab { id: middle.clone() });
        let state = reduce(&state, Action::RemoveTab { id: middle });
        assert_eq!(state.tabs.len(), 2);
        assert_eq!(active(&state).name, "SH010");
    }

    #[test]
    fn test_remove_first_active_tab_selects_new_first() {
        let state = reduce(&AppState::default(), Action::AddTab);
        let first = state.tabs[0].id.clone();
        let state = reduce(&state, Action::SetActiveTab { id: first.clone() });
        let state = reduce(&state, Action::RemoveTab { id: first });
        assert_eq!(active(&state).name, "SH020");
    }

    #[test]
    fn test_remove_inactive_tab_keeps_active() {
        let state = reduce(&AppState::default(), Action::AddTab);
        let first = state.tabs[0].id.clone();
        let active_before = state.active_tab_id.clone();
        let state = reduce(&state, Action::RemoveTab { id: first });
        assert_eq!(state.active_tab_id, active_before);
    }

    #[test]
    fn test_remove_last_tab_recreates_default() {
        let state = apply(
            &AppState::default(),
            [Action::AddTab, Action::SetPrefix("intro".into())],
        );
        let ids: Vec<Id> = state.tabs.iter().map(|t| t.id.clone()).collect();
        let state = apply(&state, ids.into_iter().map(|id| Action::RemoveTab { id }));

        assert_eq!(state.tabs.len(), 1);
        assert_eq!(active(&state).name, "SH010");
        assert!(!active(&state).has_content());
    }

    #[test]
    fn test_rename_tab_trims_and_ignores_blank() {
        let state = AppState::default();
        let id = state.tabs[0].id.clone();
        let renamed = reduce(
            &state,
            Action::RenameTab {
                id: id.clone(),
                name: "  Opening  ".into(),
            },
        );
        assert_eq!(renamed.tabs[0].name, "Opening");

        let unchanged = reduce(&renamed, Action::RenameTab { id, name: "   ".into() });
        assert_eq!(unchanged, renamed);
    }

    #[test]
    fn test_set_active_tab_closes_popups() {
        let state = apply(
            &AppState::default(),
            [
                Action::AddTab,
                Action::OpenSettings,
                Action::AddMarker {
                    frame: 3,
                    position: PickerPosition { x: 10.0, y: -80.0 },
                },
            ],
        );
        let first = state.tabs[0].id.clone();
        let state = reduce(&state, Action::SetActiveTab { id: first.clone() });
        assert_eq!(state.active_tab_id, first);
        assert!(!state.settings_open);
        assert!(state.image_picker.is_none());
    }

    #[test]
    fn test_add_image_names_sequentially_without_renumbering() {
        let state = apply(
            &AppState::default(),
            [
                Action::AddImage { data_uri: data_uri() },
                Action::AddImage { data_uri: data_uri() },
            ],
        );
        let first = active(&state).images[0].id.clone();
        let state = apply(
            &state,
            [
                Action::RemoveImage { id: first },
                Action::AddImage { data_uri: data_uri() },
            ],
        );
        let names: Vec<&str> = active(&state).images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["@img2", "@img2"]);
    }

    #[test]
    fn test_rename_image() {
        let state = reduce(&AppState::default(), Action::AddImage { data_uri: data_uri() });
        let id = active(&state).images[0].id.clone();
        let state = reduce(
            &state,
            Action::RenameImage {
                id,
                name: " @hero ".into(),
            },
        );
        assert_eq!(active(&state).images[0].name, "@hero");
    }

    #[test]
    fn test_remove_image_clears_marker_reference() {
        let state = reduce(&with_markers(&[12]), Action::AddImage { data_uri: data_uri() });
        let image_id = active(&state).images[0].id.clone();
        let marker_id = active(&state).markers[0].id.clone();
        let state = apply(
            &state,
            [
                Action::AssignMarkerImage {
                    marker_id,
                    image_id: image_id.clone(),
                },
                Action::UpdateMarkerText {
                    id: active(&state).markers[0].id.clone(),
                    text: "@img1 walks in".into(),
                },
            ],
        );
        let state = reduce(&state, Action::RemoveImage { id: image_id });

        let marker = &active(&state).markers[0];
        assert_eq!(marker.image_id, None);
        assert_eq!(marker.text, "@img1 walks in");
        assert_eq!(marker.frame, 12);
        assert!(active(&state).images.is_empty());
    }

    #[test]
    fn test_set_timeline_reclamps_markers_downward() {
        let state = with_markers(&[10, 150, 192]);
        let state = reduce(&state, Action::SetTimeline(TimelinePatch::duration(4)));
        let frames: Vec<i64> = active(&state).markers.iter().map(|m| m.frame).collect();
        assert_eq!(frames, vec![10, 96, 96]);

        let state = reduce(&state, Action::SetTimeline(TimelinePatch::fps(60)));
        let frames: Vec<i64> = active(&state).markers.iter().map(|m| m.frame).collect();
        assert_eq!(frames, vec![10, 96, 96]);
        assert_eq!(active(&state).timeline, Timeline { duration: 4, fps: 60 });
    }

    #[test]
    fn test_set_timeline_sequence_never_raises_frames() {
        let patches = [
            TimelinePatch::duration(2),
            TimelinePatch::fps(60),
            TimelinePatch::duration(15),
            TimelinePatch::fps(25),
            TimelinePatch::duration(1),
            TimelinePatch::fps(24),
        ];
        let mut state = with_markers(&[0, 40, 100, 192]);
        for patch in patches {
            let before: Vec<i64> = active(&state).markers.iter().map(|m| m.frame).collect();
            state = reduce(&state, Action::SetTimeline(patch));
            let total = active(&state).total_frames();
            for (marker, old) in active(&state).markers.iter().zip(before) {
                assert!(marker.frame <= total);
                assert!(marker.frame <= old);
            }
        }
    }

    #[test]
    fn test_add_marker_defaults_and_opens_picker() {
        let position = PickerPosition { x: 120.0, y: -80.0 };
        let state = reduce(
            &AppState::default(),
            Action::AddMarker {
                frame: 48,
                position,
            },
        );
        let marker = &active(&state).markers[0];
        assert_eq!(marker.frame, 48);
        assert_eq!(marker.image_id, None);
        assert_eq!(marker.text, "");
        assert_eq!(marker.transition, "cut to");
        assert!(marker.show_frame_ref);
        assert!(!marker.collapsed);
        assert_eq!(
            state.image_picker,
            Some(ImagePicker {
                marker_id: marker.id.clone(),
                position
            })
        );
    }

    #[test]
    fn test_assign_marker_image_seeds_empty_text_only() {
        let state = reduce(&with_markers(&[5, 9]), Action::AddImage { data_uri: data_uri() });
        let image_id = active(&state).images[0].id.clone();
        let first = active(&state).markers[0].id.clone();
        let second = active(&state).markers[1].id.clone();
        let state = apply(
            &state,
            [
                Action::UpdateMarkerText {
                    id: second.clone(),
                    text: "keep me".into(),
                },
                Action::OpenImagePicker {
                    marker_id: first.clone(),
                    position: PickerPosition::default(),
                },
                Action::AssignMarkerImage {
                    marker_id: first,
                    image_id: image_id.clone(),
                },
                Action::AssignMarkerImage {
                    marker_id: second,
                    image_id: image_id.clone(),
                },
            ],
        );
        let markers = &active(&state).markers;
        assert_eq!(markers[0].text, "@img1 ");
        assert_eq!(markers[0].image_id, Some(image_id));
        assert_eq!(markers[1].text, "keep me");
        assert!(state.image_picker.is_none());
    }

    #[test]
    fn test_move_marker_does_not_clamp() {
        let state = with_markers(&[5]);
        let id = active(&state).markers[0].id.clone();
        let state = reduce(&state, Action::MoveMarker { id, frame: 500 });
        assert_eq!(active(&state).markers[0].frame, 500);
    }

    #[test]
    fn test_marker_toggles_and_transition() {
        let state = with_markers(&[5]);
        let id = active(&state).markers[0].id.clone();
        let state = apply(
            &state,
            [
                Action::ToggleMarkerCollapsed { id: id.clone() },
                Action::ToggleMarkerFrameRef { id: id.clone() },
                Action::SetMarkerTransition {
                    id: id.clone(),
                    transition: String::new(),
                },
            ],
        );
        let marker = &active(&state).markers[0];
        assert!(marker.collapsed);
        assert!(!marker.show_frame_ref);
        assert_eq!(marker.transition, "");

        let state = reduce(&state, Action::RemoveMarker { id });
        assert!(active(&state).markers.is_empty());
    }

    #[test]
    fn test_custom_transitions() {
        let state = apply(
            &AppState::default(),
            [
                Action::AddCustomTransition("  whip pan ".into()),
                Action::AddCustomTransition("whip pan".into()),
                Action::AddCustomTransition("   ".into()),
                Action::AddCustomTransition("match cut".into()),
            ],
        );
        assert_eq!(state.custom_transitions, vec!["whip pan", "match cut"]);

        let state = reduce(&state, Action::RemoveCustomTransition("whip pan".into()));
        assert_eq!(state.custom_transitions, vec!["match cut"]);
    }

    #[test]
    fn test_panel_flags() {
        let state = apply(&AppState::default(), [Action::OpenSettings, Action::OpenAppSettings]);
        assert!(state.settings_open && state.app_settings_open);
        let state = apply(&state, [Action::CloseSettings, Action::CloseAppSettings]);
        assert!(!state.settings_open && !state.app_settings_open);
    }

    #[test]
    fn test_restore_state_closes_transient_ui() {
        let state = apply(
            &AppState::default(),
            [
                Action::OpenSettings,
                Action::OpenAppSettings,
                Action::AddMarker {
                    frame: 1,
                    position: PickerPosition::default(),
                },
            ],
        );
        let mut data = ProjectData::default();
        data.tabs[0].name = "Restored".into();
        data.custom_transitions = vec!["fade".into()];

        let state = reduce(&state, Action::RestoreState(data.clone()));
        assert!(!state.settings_open);
        assert!(!state.app_settings_open);
        assert!(state.image_picker.is_none());
        assert_eq!(state.snapshot(), data);
    }

    #[test]
    fn test_restored_empty_snapshot_gives_default_document() {
        let state = restored(ProjectData {
            active_tab_id: None,
            tabs: Vec::new(),
            custom_transitions: Vec::new(),
        });
        assert_eq!(state.tabs.len(), 1);
        assert_eq!(active(&state).name, "SH010");
    }

    #[test]
    fn test_unknown_ids_are_no_ops() {
        let mut state = reduce(&with_markers(&[5]), Action::AddImage { data_uri: data_uri() });
        state = reduce(&state, Action::SetPrefix("intro".into()));
        let image_id = active(&state).images[0].id.clone();
        let marker_id = active(&state).markers[0].id.clone();
        let missing = Id::from("missing");

        let actions = vec![
            Action::RemoveTab { id: missing.clone() },
            Action::RenameTab {
                id: missing.clone(),
                name: "x".into(),
            },
            Action::SetActiveTab { id: missing.clone() },
            Action::RenameImage {
                id: missing.clone(),
                name: "x".into(),
            },
            Action::RemoveImage { id: missing.clone() },
            Action::RemoveMarker { id: missing.clone() },
            Action::MoveMarker {
                id: missing.clone(),
                frame: 3,
            },
            Action::UpdateMarkerText {
                id: missing.clone(),
                text: "x".into(),
            },
            Action::ToggleMarkerCollapsed { id: missing.clone() },
            Action::ToggleMarkerFrameRef { id: missing.clone() },
            Action::SetMarkerTransition {
                id: missing.clone(),
                transition: "x".into(),
            },
            Action::AssignMarkerImage {
                marker_id: missing.clone(),
                image_id,
            },
            Action::AssignMarkerImage {
                marker_id,
                image_id: missing.clone(),
            },
            Action::RemoveCustomTransition("missing".into()),
        ];
        for action in actions {
            let name = action.name();
            assert_eq!(reduce(&state, action), state, "{} changed the state", name);
        }
    }

    #[test]
    fn test_transient_actions() {
        assert!(Action::CloseImagePicker.is_transient());
        assert!(Action::OpenAppSettings.is_transient());
        assert!(!Action::AddTab.is_transient());
        assert!(!Action::SetPrefix(String::new()).is_transient());
    }
}
