use super::{Catalog, Track};
use anyhow::{Context, Result};
use std::path::Path;

/// Load a catalog from a JSON file containing an array of tracks.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let file_text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
    let tracks: Vec<Track> = serde_json::from_str(&file_text)
        .with_context(|| format!("Failed to parse catalog file {}", path.display()))?;
    Catalog::from_tracks(tracks)
}
