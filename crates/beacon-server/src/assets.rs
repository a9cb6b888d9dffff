//! Recursive listing of the served `assets/` directory.

use std::path::Path;

use serde::Serialize;
use walkdir::WalkDir;

const IMAGE_EXTS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "bmp"];
const VIDEO_EXTS: &[&str] = &["mp4", "webm", "ogg", "mov"];

/// One entry in the `/api/files` listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssetEntry {
    pub name: String,
    /// Root-relative path with a leading slash, usable directly as a URL.
    pub path: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Video,
    Pdf,
    Other,
}

/// Classify a file by its (lowercased) extension.
pub fn classify(ext: &str) -> AssetKind {
    if IMAGE_EXTS.contains(&ext) {
        AssetKind::Image
    } else if VIDEO_EXTS.contains(&ext) {
        AssetKind::Video
    } else if ext == "pdf" {
        AssetKind::Pdf
    } else {
        AssetKind::Other
    }
}

/// Walk `<root>/assets` and list every non-hidden file, in a deterministic
/// (name-sorted) order. A missing assets directory yields an empty listing.
pub fn scan(root: &Path) -> Vec<AssetEntry> {
    let assets_dir = root.join("assets");
    if !assets_dir.is_dir() {
        return Vec::new();
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(&assets_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let ext = entry
            .path()
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let path = format!("/{}", rel.to_string_lossy().replace('\\', "/"));
        entries.push(AssetEntry {
            name,
            path,
            kind: classify(&ext),
        });
    }
    entries
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
