//! BrowsePath: the slash-delimited location shown in the file browser.
//!
//! The service lists directories under a slash-prefixed path
//! (`/api/filelist/music/`) but expects control paths without the leading
//! slash (`/api/control/play/<addr>/music/song.mp3`). Directories always end
//! in `/`; that trailing slash is the only way to tell them from files.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrowsePath(String);

impl BrowsePath {
    /// The library root, `/`.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Wrap a path exactly as displayed, without normalizing it.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Normalize a location for the listing endpoint: always slash-prefixed.
    pub fn for_listing(loc: &str) -> Self {
        if loc.starts_with('/') {
            Self(loc.to_string())
        } else {
            Self(format!("/{}", loc))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A trailing slash marks a directory.
    pub fn is_dir(&self) -> bool {
        self.0.ends_with('/')
    }

    /// Append an entry name to this path. Directory entries keep their
    /// trailing slash, so the result is a directory iff the entry was one.
    pub fn join(&self, entry: &str) -> Self {
        Self(format!("{}{}", self.0, entry))
    }

    /// Parent directory, always with a trailing slash.
    ///
    /// `a/b/c/` and `a/b/c` both yield `a/b/`: splitting on `/` gives an
    /// empty last component for the trailing slash, so one extra component
    /// is dropped in that case.
    pub fn parent(&self) -> Self {
        let parts: Vec<&str> = self.0.split('/').collect();
        let overhead = if self.is_dir() { 2 } else { 1 };
        let keep = parts.len().saturating_sub(overhead);
        Self(format!("{}/", parts[..keep].join("/")))
    }

    /// The path as embedded in control endpoints: no leading slash.
    pub fn control_path(&self) -> &str {
        self.0.strip_prefix('/').unwrap_or(&self.0)
    }

    /// Percent-encode each segment, keeping the `/` separators.
    pub fn encoded(&self) -> String {
        encode_path(&self.0)
    }
}

impl Default for BrowsePath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for BrowsePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BrowsePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Percent-encode every `/`-separated segment of `path` individually.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|seg| urlencoding::encode(seg).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_path_is_slash_prefixed() {
        assert_eq!(BrowsePath::for_listing("").as_str(), "/");
        assert_eq!(BrowsePath::for_listing("music/").as_str(), "/music/");
        assert_eq!(BrowsePath::for_listing("/music/").as_str(), "/music/");
    }

    #[test]
    fn parent_strips_one_level_with_or_without_trailing_slash() {
        assert_eq!(BrowsePath::new("a/b/c/").parent().as_str(), "a/b/");
        assert_eq!(BrowsePath::new("a/b/c").parent().as_str(), "a/b/");
        assert_eq!(BrowsePath::new("/music/rock/").parent().as_str(), "/music/");
    }

    #[test]
    fn parent_of_root_is_root() {
        assert_eq!(BrowsePath::root().parent().as_str(), "/");
        assert_eq!(BrowsePath::new("/music/").parent().as_str(), "/");
    }

    #[test]
    fn join_keeps_directory_marker() {
        let base = BrowsePath::new("music/");
        assert!(base.join("rock/").is_dir());
        assert_eq!(base.join("rock/").as_str(), "music/rock/");
        assert!(!base.join("song.mp3").is_dir());
    }

    #[test]
    fn control_path_has_no_leading_slash() {
        assert_eq!(BrowsePath::new("/music/song.mp3").control_path(), "music/song.mp3");
        assert_eq!(BrowsePath::new("music/song.mp3").control_path(), "music/song.mp3");
    }

    #[test]
    fn encoding_keeps_separators() {
        assert_eq!(encode_path("/My Music/a#b.mp3"), "/My%20Music/a%23b.mp3");
        assert_eq!(BrowsePath::new("/").encoded(), "/");
    }
}
