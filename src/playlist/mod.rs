mod assign;
mod scorer;

pub use assign::{assign_tracks, PlaylistPick};
pub use scorer::score_track;

use serde::{Deserialize, Serialize};

/// Per-request music preferences. Immutable for the duration of one
/// generation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prefs {
    /// Allowed genre tags; empty means unrestricted.
    #[serde(default)]
    pub genres: Vec<String>,
    /// Case-insensitive substrings matched against artist names.
    #[serde(default)]
    pub include_artists: Vec<String>,
    #[serde(default)]
    pub exclude_artists: Vec<String>,
    /// Free-text keyword matched against title/artist; may be empty.
    #[serde(default)]
    pub theme: String,
    /// 0 = familiar staples, 100 = fresh/unexpected.
    #[serde(default)]
    pub familiarity: f64,
    /// Hard filter: explicit tracks are effectively excluded when false.
    #[serde(default)]
    pub explicit_ok: bool,
    /// Soft bias towards remixes.
    #[serde(default)]
    pub prefer_remixes: bool,
}
