use serde::{Deserialize, Serialize};

/// One track in the catalog. Immutable once loaded; the core only ever
/// reads these.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub bpm: u32,
    pub energy: f64,
    pub duration_sec: u32,
    #[serde(default)]
    pub is_remix: bool,
    #[serde(default)]
    pub explicit: bool,
    /// Decade label, e.g. "2010s". Tracks without one are treated as
    /// undated by the freshness scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decade: Option<String>,
}
