// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Transition labels.
//!
//! Labels come from the app-wide defaults (seeded with the built-ins) and
//! from the per-project custom list. Dropdowns show the merged list.

/// Labels every installation starts with.
pub const BUILTIN_TRANSITIONS: [&str; 2] = ["cut to", "use"];

/// Transition given to newly placed markers.
pub const DEFAULT_MARKER_TRANSITION: &str = "cut to";

pub fn builtin_transitions() -> Vec<String> {
    BUILTIN_TRANSITIONS.iter().map(|t| t.to_string()).collect()
}

/// Merge label lists in order, trimming each value and dropping blanks and
/// repeats. The first occurrence of a label decides its position.
pub fn merge_transitions<'a, I>(sources: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut merged: Vec<String> = Vec::new();
    for label in sources.into_iter().flatten() {
        let label = label.trim();
        if !label.is_empty() && !merged.iter().any(|m| m == label) {
            merged.push(label.to_string());
        }
    }
    merged
}

/// Whether `value` (trimmed) is already one of `labels`.
pub fn contains_transition(labels: &[String], value: &str) -> bool {
    let value = value.trim();
    labels.iter().any(|l| l.trim() == value)
}
