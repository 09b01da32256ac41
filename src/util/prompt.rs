// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Final prompt assembly.
//!
//! A tab's prompt is its prefix, one line per marker with text (in frame
//! order), and its suffix, joined with newlines.

use crate::models::project::{Marker, Tab};

/// Build the prompt lines for a tab.
pub fn prompt_lines(tab: &Tab) -> Vec<String> {
    let mut lines = Vec::new();

    let prefix = tab.prefix.trim();
    if !prefix.is_empty() {
        lines.push(prefix.to_string());
    }

    lines.extend(tab.sorted_markers().into_iter().filter_map(marker_line));

    let suffix = tab.suffix.trim();
    if !suffix.is_empty() {
        lines.push(suffix.to_string());
    }
    lines
}

/// Build the full prompt text for a tab.
pub fn build_prompt(tab: &Tab) -> String {
    prompt_lines(tab).join("\n")
}

fn marker_line(marker: &Marker) -> Option<String> {
    let text = marker.text.trim();
    if text.is_empty() {
        return None;
    }

    let mut line = String::new();
    if marker.show_frame_ref {
        line.push_str(&format!("at frame {} ", marker.frame));
    }
    if !marker.transition.is_empty() {
        line.push_str(&marker.transition);
        line.push(' ');
    }
    line.push_str(text);
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn marker(frame: i64, text: &str) -> Marker {
        let mut marker = Marker::new(frame);
        marker.text = text.to_string();
        marker
    }

    #[test]
    fn test_prefix_sorted_markers_suffix() {
        let mut tab = Tab::new("SH010");
        tab.prefix = "intro".into();
        tab.suffix = "outro".into();
        tab.markers = vec![marker(10, "b"), marker(5, "a")];

        assert_eq!(
            prompt_lines(&tab),
            vec!["intro", "at frame 5 cut to a", "at frame 10 cut to b", "outro"]
        );
        assert_eq!(
            build_prompt(&tab),
            "intro\nat frame 5 cut to a\nat frame 10 cut to b\noutro"
        );
    }

    #[test]
    fn test_blank_markers_are_skipped() {
        let mut tab = Tab::new("SH010");
        let mut blank = marker(3, "   \n ");
        blank.transition = "use".into();
        tab.markers = vec![blank, marker(7, "  keep  ")];

        assert_eq!(build_prompt(&tab), "at frame 7 cut to keep");
    }

    #[test]
    fn test_frame_ref_and_transition_optional() {
        let mut tab = Tab::new("SH010");
        let mut plain = marker(12, "@img1 smiles");
        plain.show_frame_ref = false;
        plain.transition = String::new();
        tab.markers = vec![plain];

        assert_eq!(build_prompt(&tab), "@img1 smiles");
    }

    #[test]
    fn test_empty_tab_builds_empty_prompt() {
        let mut tab = Tab::new("SH010");
        tab.prefix = "  ".into();
        assert_eq!(build_prompt(&tab), "");
    }
}
