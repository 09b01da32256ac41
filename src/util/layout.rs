// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Marker text box layout.
//!
//! Text boxes hang below the ruler in two rows. A single left-to-right pass
//! over frame-sorted markers puts each box in the first row whose last box
//! ends at least [`MIN_BOX_GAP`] before it. When neither row is free the box
//! goes to the row whose last box ends earliest, so boxes may overlap in very
//! dense timelines. Horizontal clamping keeps every box inside the container.

use super::geometry::frame_to_pixel;
use crate::models::project::Marker;

/// Width of an expanded marker text box.
pub const TEXT_BOX_WIDTH: f32 = 180.0;

/// Minimum horizontal gap between boxes in the same row.
pub const MIN_BOX_GAP: f32 = 8.0;

/// Vertical distance between the two rows.
pub const ROW_OFFSET: f32 = 120.0;

const ROW_COUNT: usize = 2;

/// Horizontal placement of a text box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxPosition {
    /// Left edge within the container
    pub left: f32,
    /// Offset of the marker from the box's left edge when the box had to be
    /// pinned to a container edge; `None` when the box is centered on it
    pub connector: Option<f32>,
}

/// Layout result for one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPlacement<'a> {
    pub marker: &'a Marker,
    pub row: usize,
    /// Absent for collapsed markers, which render as a small chip
    pub position: Option<BoxPosition>,
}

/// Assign rows and positions to frame-sorted markers.
pub fn layout_markers<'a>(
    sorted: &[&'a Marker],
    total_frames: i64,
    container_width: f32,
) -> Vec<MarkerPlacement<'a>> {
    let mut row_right_edge = [f32::NEG_INFINITY; ROW_COUNT];

    sorted
        .iter()
        .map(|&marker| {
            if marker.collapsed {
                return MarkerPlacement {
                    marker,
                    row: 0,
                    position: None,
                };
            }

            let center = frame_to_pixel(marker.frame, total_frames, container_width);
            let left = center - TEXT_BOX_WIDTH / 2.0;

            let row = (0..ROW_COUNT)
                .find(|&r| left >= row_right_edge[r] + MIN_BOX_GAP)
                .unwrap_or_else(|| earliest_row(&row_right_edge));
            row_right_edge[row] = left + TEXT_BOX_WIDTH;

            MarkerPlacement {
                marker,
                row,
                position: Some(clamp_box(center, container_width)),
            }
        })
        .collect()
}

fn earliest_row(edges: &[f32; ROW_COUNT]) -> usize {
    if edges[0] <= edges[1] {
        0
    } else {
        1
    }
}

/// Position a box for a marker at `marker_px`, pinning it to the container
/// edges when centering would push it outside.
pub fn clamp_box(marker_px: f32, container_width: f32) -> BoxPosition {
    let half = TEXT_BOX_WIDTH / 2.0;

    if marker_px < half {
        BoxPosition {
            left: 0.0,
            connector: Some(marker_px),
        }
    } else if marker_px > container_width - half {
        let left = container_width - TEXT_BOX_WIDTH;
        BoxPosition {
            left,
            connector: Some(marker_px - left),
        }
    } else {
        BoxPosition {
            left: marker_px - half,
            connector: None,
        }
    }
}
