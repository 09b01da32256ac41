// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The app owns the editor state and applies the actions UI components
//! collect during a frame. Every committed change is handed to the save
//! worker; image files are encoded in the background and arrive as
//! `AddImage` actions.

use crate::io::media::{ImageLoader, ImageSource, IMAGE_EXTENSIONS};
use crate::io::persistence::{self, SaveWorker, TransitionSettings};
use crate::io::storage::KeyValueStore;
use crate::models::transitions::merge_transitions;
use crate::state::reducer::restored;
use crate::state::{reduce, Action, AppState};
use crate::ui::dropzone::{self, DropzoneState, DEFAULT_THUMB_SIZE};
use crate::ui::prompt_panel::{self, COPIED_FEEDBACK};
use crate::ui::settings::{self, SettingsState};
use crate::ui::thumbnails::ThumbnailCache;
use crate::ui::timeline::{self, TimelineState, TimelineView};
use crate::ui::toolbar::{self, TabBarState};
use crate::ui::properties;
use crate::util::prompt::build_prompt;
use std::sync::Arc;
use std::time::Instant;

/// Main application state.
pub struct CrumpetApp {
    state: AppState,

    /// Background writer for project snapshots
    saver: SaveWorker,

    /// App-wide default transitions, edited in the settings window
    transition_settings: TransitionSettings,

    /// Default transitions as last read from `transition_settings`
    default_transitions: Vec<String>,
    defaults_revision: u64,

    image_loader: ImageLoader,
    thumbnails: ThumbnailCache,
    thumb_size: f32,

    tab_bar: TabBarState,
    dropzone: DropzoneState,
    timeline: TimelineState,
    settings: SettingsState,

    /// When the prompt was last copied
    copied_at: Option<Instant>,
}

impl CrumpetApp {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let state = restored(persistence::load_project(store.as_ref()));
        let transition_settings = TransitionSettings::load(store.clone());
        let default_transitions = transition_settings.transitions().to_vec();
        let defaults_revision = transition_settings.revision();

        Self {
            state,
            saver: SaveWorker::spawn(store),
            transition_settings,
            default_transitions,
            defaults_revision,
            image_loader: ImageLoader::new(),
            thumbnails: ThumbnailCache::default(),
            thumb_size: DEFAULT_THUMB_SIZE,
            tab_bar: TabBarState::default(),
            dropzone: DropzoneState::default(),
            timeline: TimelineState::default(),
            settings: SettingsState::default(),
            copied_at: None,
        }
    }

    /// Apply one action and save the result unless it only touched
    /// transient UI state.
    fn dispatch(&mut self, action: Action) {
        log::debug!("dispatch {}", action.name());
        match &action {
            Action::AddTab => log::info!("Created tab"),
            Action::RemoveTab { id } => log::info!("Removed tab {}", id),
            Action::AddImage { .. } => log::info!("Added image"),
            _ => {}
        }

        let transient = action.is_transient();
        let closes_app_settings = matches!(action, Action::CloseAppSettings);

        self.state = reduce(&self.state, action);

        if closes_app_settings {
            self.refresh_default_transitions();
        }
        if !transient {
            self.saver.submit(self.state.snapshot());
        }
    }

    fn refresh_default_transitions(&mut self) {
        if self.transition_settings.revision() != self.defaults_revision {
            self.default_transitions = self.transition_settings.transitions().to_vec();
            self.defaults_revision = self.transition_settings.revision();
            log::info!(
                "Default transitions updated ({} labels)",
                self.default_transitions.len()
            );
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            let source = match (file.path, file.bytes) {
                (Some(path), _) => ImageSource::Path(path),
                (None, Some(bytes)) => ImageSource::Bytes {
                    name: file.name,
                    bytes,
                },
                (None, None) => continue,
            };
            self.image_loader.load(source, ctx);
        }
    }

    fn browse_for_images(&mut self, ctx: &egui::Context) {
        if let Some(paths) = rfd::FileDialog::new()
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_files()
        {
            for path in paths {
                self.image_loader.load(ImageSource::Path(path), ctx);
            }
        }
    }

    fn copy_prompt(&mut self, ctx: &egui::Context, prompt: String) {
        ctx.output_mut(|o| o.copied_text = prompt);
        self.copied_at = Some(Instant::now());
        ctx.request_repaint_after(COPIED_FEEDBACK);
        log::info!("Copied prompt to clipboard");
    }
}

impl eframe::App for CrumpetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Images finished since the last frame
        self.handle_dropped_files(ctx);
        for data_uri in self.image_loader.poll() {
            self.dispatch(Action::AddImage {
                data_uri: data_uri.into(),
            });
        }
        self.thumbnails.poll(ctx);
        if self.image_loader.is_loading() || self.thumbnails.is_decoding() {
            ctx.request_repaint();
        }

        if !self.state.settings_open {
            self.settings.reset_timeline_input();
        }
        self.thumbnails.retain_live(&self.state.tabs);

        let mut actions = Vec::new();
        let mut browse = false;
        let mut copy = None;

        let state = &self.state;
        let Some(tab) = state.active_tab() else {
            return;
        };
        let prompt = build_prompt(tab);
        let copied = self
            .copied_at
            .is_some_and(|at| at.elapsed() < COPIED_FEEDBACK);
        let transitions = merge_transitions([
            self.default_transitions.as_slice(),
            state.custom_transitions.as_slice(),
        ]);

        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            toolbar::show(
                ui,
                &state.tabs,
                &state.active_tab_id,
                &mut self.tab_bar,
                &mut actions,
            );
        });

        egui::SidePanel::right("final_prompt")
            .default_width(320.0)
            .show(ctx, |ui| {
                if prompt_panel::show(ui, &prompt, copied) {
                    copy = Some(prompt.clone());
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    browse = dropzone::show(
                        ui,
                        tab,
                        &mut self.thumbnails,
                        &mut self.thumb_size,
                        &mut self.dropzone,
                        &mut actions,
                    );
                    ui.add_space(12.0);

                    properties::show_prefix(ui, tab, &mut actions);
                    timeline::show(
                        ui,
                        TimelineView {
                            tab,
                            picker: state.image_picker.as_ref(),
                            transitions: &transitions,
                        },
                        &mut self.thumbnails,
                        &mut self.timeline,
                        &mut actions,
                    );
                    properties::show_suffix(ui, tab, &mut actions);
                });
        });

        if state.settings_open {
            settings::timeline_window(ctx, &tab.timeline, &mut self.settings, &mut actions);
        }
        if state.app_settings_open {
            settings::app_settings_window(
                ctx,
                &mut self.transition_settings,
                &state.custom_transitions,
                &mut self.settings,
                &mut actions,
            );
        }

        if browse {
            self.browse_for_images(ctx);
        }
        if let Some(prompt) = copy {
            self.copy_prompt(ctx, prompt);
        }
        for action in actions {
            self.dispatch(action);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.saver.shutdown();
    }
}
