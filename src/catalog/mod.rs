mod load;
mod track;

pub use load::load_catalog;
pub use track::Track;

use anyhow::{bail, Result};
use std::collections::HashSet;

/// Read-only collection of tracks, loaded once at startup and shared by
/// every generation request. Iteration order is the load order of the
/// backing file, which makes the assignment tie-break stable.
#[derive(Debug, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    pub fn from_tracks(tracks: Vec<Track>) -> Result<Catalog> {
        let mut seen = HashSet::new();
        for track in &tracks {
            if !seen.insert(track.id.as_str()) {
                bail!("Duplicate track id in catalog: {}", track.id);
            }
        }
        Ok(Catalog { tracks })
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
