// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project document structures.
//!
//! A project is an ordered list of shot tabs. Each tab owns its reference
//! images, a timeline configuration and the markers placed on it. These types
//! carry no editing behavior; all mutation goes through [`crate::state`].

use super::transitions::DEFAULT_MARKER_TRANSITION;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

/// Name given to the first tab of a fresh project.
pub const DEFAULT_TAB_NAME: &str = "SH010";

/// Default timeline length in seconds.
pub const DEFAULT_DURATION: i64 = 8;

/// Default timeline frame rate.
pub const DEFAULT_FPS: i64 = 24;

/// Frame rates offered by the timeline settings.
pub const FPS_CHOICES: [i64; 4] = [24, 25, 30, 60];

/// Frame rates most video models expect.
pub const RECOMMENDED_FPS: [i64; 2] = [24, 25];

/// Durations most video models support.
pub const RECOMMENDED_DURATION: RangeInclusive<i64> = 4..=15;

/// Opaque identifier for tabs, images and markers.
///
/// Fresh ids are random v4 UUIDs; any string is accepted when loading a
/// saved project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Generate a new random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Duration and frame rate of a tab's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    /// Length in whole seconds
    pub duration: i64,
    /// Frames per second
    pub fps: i64,
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            fps: DEFAULT_FPS,
        }
    }
}

impl Timeline {
    /// Number of addressable frames (`duration * fps`).
    pub fn total_frames(&self) -> i64 {
        self.duration.saturating_mul(self.fps)
    }

    /// Duration falls outside what most models accept.
    pub fn duration_is_unusual(&self) -> bool {
        !RECOMMENDED_DURATION.contains(&self.duration)
    }

    /// Frame rate is not one most models expect.
    pub fn fps_is_unusual(&self) -> bool {
        !RECOMMENDED_FPS.contains(&self.fps)
    }

    /// Apply a partial update, keeping unset fields.
    pub fn patched(&self, patch: TimelinePatch) -> Self {
        Self {
            duration: patch.duration.unwrap_or(self.duration),
            fps: patch.fps.unwrap_or(self.fps),
        }
    }
}

/// Partial timeline update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelinePatch {
    pub duration: Option<i64>,
    pub fps: Option<i64>,
}

impl TimelinePatch {
    pub fn duration(duration: i64) -> Self {
        Self {
            duration: Some(duration),
            fps: None,
        }
    }

    pub fn fps(fps: i64) -> Self {
        Self {
            duration: None,
            fps: Some(fps),
        }
    }
}

/// A reference image embedded in a tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: Id,
    /// Inline `data:` URI holding the encoded image bytes
    pub data_uri: Arc<str>,
    pub name: String,
}

impl Image {
    /// Create an image named after its 1-based position at insertion time.
    pub fn new(data_uri: Arc<str>, ordinal: usize) -> Self {
        Self {
            id: Id::generate(),
            data_uri,
            name: format!("@img{}", ordinal),
        }
    }
}

/// A point-in-time annotation on a tab's timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub id: Id,
    pub frame: i64,
    #[serde(default)]
    pub image_id: Option<Id>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub transition: String,
    /// Emit `at frame N` in the prompt line
    #[serde(default = "default_true")]
    pub show_frame_ref: bool,
    #[serde(default)]
    pub collapsed: bool,
}

fn default_true() -> bool {
    true
}

impl Marker {
    /// Create an empty marker at the given frame.
    pub fn new(frame: i64) -> Self {
        Self {
            id: Id::generate(),
            frame,
            image_id: None,
            text: String::new(),
            transition: DEFAULT_MARKER_TRANSITION.to_string(),
            show_frame_ref: true,
            collapsed: false,
        }
    }
}

/// One shot: images, timeline, markers and the surrounding prompt text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub timeline: Timeline,
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
}

impl Tab {
    /// Create an empty tab with the default timeline.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Id::generate(),
            name: name.into(),
            images: Vec::new(),
            timeline: Timeline::default(),
            markers: Vec::new(),
            prefix: String::new(),
            suffix: String::new(),
        }
    }

    pub fn total_frames(&self) -> i64 {
        self.timeline.total_frames()
    }

    pub fn image(&self, id: &Id) -> Option<&Image> {
        self.images.iter().find(|img| &img.id == id)
    }

    /// Markers in ascending frame order; ties keep insertion order.
    pub fn sorted_markers(&self) -> Vec<&Marker> {
        let mut sorted: Vec<&Marker> = self.markers.iter().collect();
        sorted.sort_by_key(|m| m.frame);
        sorted
    }

    /// Whether closing this tab would lose user work.
    pub fn has_content(&self) -> bool {
        !self.images.is_empty()
            || !self.markers.is_empty()
            || !self.prefix.trim().is_empty()
            || !self.suffix.trim().is_empty()
    }
}

/// Compute the next default tab name (`SH010`, `SH020`, ...).
///
/// Only names of the form `SH` followed by at least three digits take part
/// in numbering. The result is the smallest multiple of ten above the highest
/// such number.
pub fn next_tab_name(tabs: &[Tab]) -> String {
    let max = tabs
        .iter()
        .filter_map(|t| shot_number(&t.name))
        .max()
        .unwrap_or(0);
    let next = (max / 10).saturating_add(1).saturating_mul(10);
    format!("SH{:03}", next)
}

fn shot_number(name: &str) -> Option<u64> {
    let digits = name.strip_prefix("SH")?;
    if digits.len() < 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|n| *n > 0)
}

/// Persisted project snapshot.
///
/// Holds only the document; transient UI state never reaches storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    #[serde(default)]
    pub active_tab_id: Option<Id>,
    pub tabs: Vec<Tab>,
    #[serde(default)]
    pub custom_transitions: Vec<String>,
}

impl Default for ProjectData {
    /// A fresh project with a single `SH010` tab.
    fn default() -> Self {
        let tab = Tab::new(DEFAULT_TAB_NAME);
        Self {
            active_tab_id: Some(tab.id.clone()),
            tabs: vec![tab],
            custom_transitions: Vec::new(),
        }
    }
}

impl ProjectData {
    /// Repair a loaded snapshot so it satisfies the document invariants.
    ///
    /// An empty tab list yields the default project, and an active id that
    /// names no tab falls back to the first tab.
    pub fn normalized(mut self) -> Self {
        if self.tabs.is_empty() {
            return Self::default();
        }
        let active_exists = self
            .active_tab_id
            .as_ref()
            .is_some_and(|id| self.tabs.iter().any(|t| &t.id == id));
        if !active_exists {
            self.active_tab_id = Some(self.tabs[0].id.clone());
        }
        self
    }
}
