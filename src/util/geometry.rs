// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Timeline geometry.
//!
//! Conversions between frame numbers and horizontal pixel positions on the
//! ruler, plus the tick marks drawn along it.

use crate::models::project::Timeline;
use crate::state::PickerPosition;

/// Width reserved for the image picker popup.
pub const PICKER_WIDTH: f32 = 220.0;

/// Vertical offset of the picker above the ruler.
pub const PICKER_OFFSET_Y: f32 = -80.0;

/// Position of `frame` along the timeline as a fraction (0.0 to 1.0).
pub fn frame_to_fraction(frame: i64, total_frames: i64) -> f32 {
    if total_frames == 0 {
        return 0.0;
    }
    (frame as f64 / total_frames as f64) as f32
}

/// Pixel offset of `frame` within a container `width` pixels wide.
pub fn frame_to_pixel(frame: i64, total_frames: i64, width: f32) -> f32 {
    frame_to_fraction(frame, total_frames) * width
}

/// Nearest frame to a pixel offset, clamped to `[0, total_frames]`.
pub fn pixel_to_frame(px: f32, width: f32, total_frames: i64) -> i64 {
    if width <= 0.0 || total_frames <= 0 {
        return 0;
    }
    let raw = (px as f64 / width as f64) * total_frames as f64;
    (raw.round() as i64).clamp(0, total_frames)
}

/// Where the image picker opens for a click at `px` on the ruler.
pub fn picker_position(px: f32, width: f32) -> PickerPosition {
    PickerPosition {
        x: px.min(width - PICKER_WIDTH),
        y: PICKER_OFFSET_Y,
    }
}

/// A tick mark on the ruler.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub frame: i64,
    pub fraction: f32,
    /// Whole-second ticks carry a label such as `3s`
    pub label: Option<String>,
    pub major: bool,
}

/// Ticks for a timeline: one labelled tick per second plus unlabelled
/// sub-second ticks (quarter seconds at 30 fps and above, half seconds below).
pub fn ruler_ticks(timeline: &Timeline) -> Vec<Tick> {
    let total = timeline.total_frames();
    let mut ticks: Vec<Tick> = (0..=timeline.duration)
        .map(|s| {
            let frame = s * timeline.fps;
            Tick {
                frame,
                fraction: frame_to_fraction(frame, total),
                label: Some(format!("{}s", s)),
                major: true,
            }
        })
        .collect();

    let divisor = if timeline.fps >= 30 { 4.0 } else { 2.0 };
    let interval = (timeline.fps as f64 / divisor).round() as i64;
    if interval <= 0 {
        return ticks;
    }

    let mut frame = 0;
    while frame <= total {
        let fraction = frame_to_fraction(frame, total);
        if !ticks.iter().any(|t| (t.fraction - fraction).abs() < 0.005) {
            ticks.push(Tick {
                frame,
                fraction,
                label: None,
                major: false,
            });
        }
        frame += interval;
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_pixel_roundtrip() {
        let width = 960.0;
        let total = 192;

        let px = frame_to_pixel(48, total, width);
        assert!((px - 240.0).abs() < 0.0001);
        assert_eq!(pixel_to_frame(px, width, total), 48);
    }

    #[test]
    fn test_frame_to_fraction_zero_total() {
        assert_eq!(frame_to_fraction(10, 0), 0.0);
    }

    #[test]
    fn test_pixel_to_frame_clamps() {
        assert_eq!(pixel_to_frame(-50.0, 800.0, 192), 0);
        assert_eq!(pixel_to_frame(900.0, 800.0, 192), 192);
        assert_eq!(pixel_to_frame(400.0, 0.0, 192), 0);
    }

    #[test]
    fn test_picker_position_stays_inside() {
        assert_eq!(picker_position(100.0, 800.0), PickerPosition { x: 100.0, y: -80.0 });
        assert_eq!(picker_position(790.0, 800.0).x, 580.0);
    }

    #[test]
    fn test_ruler_ticks_half_seconds_at_24fps() {
        let ticks = ruler_ticks(&Timeline { duration: 2, fps: 24 });
        let majors: Vec<&str> = ticks
            .iter()
            .filter(|t| t.major)
            .filter_map(|t| t.label.as_deref())
            .collect();
        assert_eq!(majors, vec!["0s", "1s", "2s"]);

        let minors: Vec<i64> = ticks.iter().filter(|t| !t.major).map(|t| t.frame).collect();
        assert_eq!(minors, vec![12, 36]);
    }

    #[test]
    fn test_ruler_ticks_quarter_seconds_at_60fps() {
        let ticks = ruler_ticks(&Timeline { duration: 1, fps: 60 });
        let minors: Vec<i64> = ticks.iter().filter(|t| !t.major).map(|t| t.frame).collect();
        assert_eq!(minors, vec![15, 30, 45]);
    }

    #[test]
    fn test_ruler_ticks_degenerate_timeline() {
        let ticks = ruler_ticks(&Timeline { duration: 0, fps: 0 });
        assert_eq!(ticks.len(), 1);
        assert!(ticks[0].major);
    }
}
