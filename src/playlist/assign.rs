use super::{score_track, Prefs};
use crate::catalog::{Catalog, Track};
use crate::planner::SegmentPlan;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One segment of the plan paired with its chosen track, or with no
/// track when the catalog ran out of usable candidates. `score` is only
/// present for heuristic picks.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistPick {
    pub seg: SegmentPlan,
    pub track: Option<Track>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

fn pick_for_segment<'a>(
    catalog: &'a Catalog,
    seg: &SegmentPlan,
    prefs: &Prefs,
    used: &HashSet<&str>,
) -> Option<(&'a Track, f64)> {
    let mut best: Option<(&'a Track, f64)> = None;
    for track in catalog.tracks() {
        if used.contains(track.id.as_str()) {
            continue;
        }
        let score = score_track(track, seg, prefs);
        // strictly-greater comparison: the earliest catalog entry wins ties
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((track, score));
        }
    }
    best
}

/// Greedily assign one track per segment, in plan order.
///
/// Each segment takes the highest-scoring track not yet used in this
/// run; there is no backtracking, so an early segment can consume a
/// track that would have fit a later one better. The used-id set is
/// local to this call.
pub fn assign_tracks(catalog: &Catalog, plan: &[SegmentPlan], prefs: &Prefs) -> Vec<PlaylistPick> {
    let mut used: HashSet<&str> = HashSet::new();
    let mut picks = Vec::with_capacity(plan.len());
    for seg in plan {
        match pick_for_segment(catalog, seg, prefs, &used) {
            Some((track, score)) => {
                used.insert(track.id.as_str());
                picks.push(PlaylistPick {
                    seg: seg.clone(),
                    track: Some(track.clone()),
                    score: Some(score),
                });
            }
            None => picks.push(PlaylistPick {
                seg: seg.clone(),
                track: None,
                score: None,
            }),
        }
    }
    picks
}
