//! FileListing: a sorted directory listing with alphabetical jump markers.

use std::collections::HashSet;

use crate::path::BrowsePath;

/// Prefix carried by the ids of listing rows.
pub const ENTRY_ID_PREFIX: &str = "file-";

/// Label of the marker that always jumps back to the top of the list.
pub const TOP_MARKER: char = '○';

/// An alphabetical anchor: the first entry whose lowercased name starts
/// with `key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpMarker {
    pub key: char,
    pub index: usize,
}

impl JumpMarker {
    /// Uppercased label shown in the marker column.
    pub fn label(&self) -> String {
        self.key.to_uppercase().collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileListing {
    pub path: BrowsePath,
    pub entries: Vec<String>,
    pub markers: Vec<JumpMarker>,
}

impl FileListing {
    /// Sort `entries` ascending (plain string order, so uppercase sorts
    /// before lowercase) and compute one marker per distinct lowercase
    /// first character, in order of first occurrence.
    pub fn new(path: BrowsePath, mut entries: Vec<String>) -> Self {
        entries.sort();
        let markers = compute_markers(&entries);
        Self {
            path,
            entries,
            markers,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Marker anchored at `index`, if a new letter group starts there.
    pub fn marker_at(&self, index: usize) -> Option<&JumpMarker> {
        self.markers.iter().find(|m| m.index == index)
    }

    /// Index of the first entry for the marker matching `key`
    /// (case-insensitive). The top marker always resolves to 0.
    pub fn jump_target(&self, key: char) -> Option<usize> {
        if key == TOP_MARKER {
            return Some(0);
        }
        let wanted = lower_first(key);
        self.markers
            .iter()
            .find(|m| m.key == wanted)
            .map(|m| m.index)
    }

    /// Marker column labels: the top marker, then one per letter group.
    pub fn marker_labels(&self) -> Vec<String> {
        std::iter::once(TOP_MARKER.to_string())
            .chain(self.markers.iter().map(JumpMarker::label))
            .collect()
    }
}

pub fn entry_id(name: &str) -> String {
    format!("{}{}", ENTRY_ID_PREFIX, name)
}

/// Entry name from a row id; ids without the prefix are taken verbatim.
pub fn entry_name(id: &str) -> &str {
    id.strip_prefix(ENTRY_ID_PREFIX).unwrap_or(id)
}

fn compute_markers(sorted: &[String]) -> Vec<JumpMarker> {
    let mut seen = HashSet::new();
    let mut markers = Vec::new();
    for (index, entry) in sorted.iter().enumerate() {
        let Some(first) = entry.chars().next() else {
            continue;
        };
        let key = lower_first(first);
        if seen.insert(key) {
            markers.push(JumpMarker { key, index });
        }
    }
    markers
}

fn lower_first(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}
