//! Reconciliation of the external service's free-form JSON into domain
//! picks.
//!
//! The service response is untrusted: every numeric field is coerced or
//! clamped before a `Track` is built from it, picks are matched to plan
//! segments by segment id, and segments the service skipped get an
//! explicit empty pick. Duplicate picks for the same segment resolve to
//! the first one in the response.

use super::{GenerationResponse, Source};
use crate::catalog::Track;
use crate::planner::SegmentPlan;
use crate::playlist::PlaylistPick;
use serde::Deserialize;
use uuid::Uuid;

/// The shape the external service is instructed to produce. Everything
/// is defaulted so a sloppy response still deserializes; sanitization
/// happens field by field afterwards.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLlmPlaylist {
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub picks: Vec<RawLlmPick>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLlmPick {
    #[serde(default)]
    pub segment_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub bpm: f64,
    #[serde(default)]
    pub energy: Option<f64>,
    #[serde(default)]
    pub duration_sec: f64,
    #[serde(default)]
    pub explicit: Option<bool>,
    #[serde(default)]
    pub is_remix: Option<bool>,
}

fn fresh_track_id(seg_id: &str) -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{}-{}", seg_id, &uuid[..6])
}

fn sanitize_pick(seg: &SegmentPlan, raw: &RawLlmPick) -> Track {
    Track {
        // never reuse catalog ids for service-invented tracks
        id: fresh_track_id(&seg.id),
        title: raw.title.clone(),
        artist: raw.artist.clone(),
        genre: raw.genre.clone(),
        bpm: raw.bpm.round().max(0.0) as u32,
        energy: raw.energy.unwrap_or(0.8).clamp(0.0, 1.0),
        duration_sec: raw.duration_sec.round().max(60.0) as u32,
        is_remix: raw.is_remix.unwrap_or(false),
        explicit: raw.explicit.unwrap_or(false),
        decade: None,
    }
}

/// Fold the service's picks back onto the plan, in plan order.
pub fn reconcile(plan: &[SegmentPlan], raw: RawLlmPlaylist) -> GenerationResponse {
    let picks: Vec<PlaylistPick> = plan
        .iter()
        .map(|seg| {
            let matched = raw.picks.iter().find(|p| p.segment_id == seg.id);
            PlaylistPick {
                seg: seg.clone(),
                track: matched.map(|p| sanitize_pick(seg, p)),
                score: None,
            }
        })
        .collect();

    let total_duration_sec = picks
        .iter()
        .filter_map(|p| p.track.as_ref())
        .map(|t| t.duration_sec)
        .sum();

    GenerationResponse {
        plan: plan.to_vec(),
        picks,
        total_duration_sec,
        source: Source::Chatgpt,
        notes: raw.notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::SegmentType;

    fn seg(id: &str) -> SegmentPlan {
        SegmentPlan {
            id: id.to_owned(),
            segment_type: SegmentType::Sprint,
            duration_sec: 150,
            target_bpm_min: 140,
            target_bpm_max: 175,
            target_energy_min: 0.75,
            target_energy_max: 1.0,
        }
    }

    fn raw_pick(segment_id: &str) -> RawLlmPick {
        RawLlmPick {
            segment_id: segment_id.to_owned(),
            title: "Song".to_owned(),
            artist: "Artist".to_owned(),
            genre: "edm".to_owned(),
            bpm: 150.4,
            energy: Some(0.9),
            duration_sec: 200.0,
            explicit: Some(false),
            is_remix: Some(true),
        }
    }

    #[test]
    fn picks_follow_plan_order_with_empty_slots() {
        let plan = vec![seg("a"), seg("b"), seg("c")];
        // response covers c and a only, out of order
        let raw = RawLlmPlaylist {
            notes: Some("have fun".to_owned()),
            picks: vec![raw_pick("c"), raw_pick("a")],
        };

        let response = reconcile(&plan, raw);
        assert_eq!(response.picks.len(), 3);
        assert_eq!(response.source, Source::Chatgpt);
        assert_eq!(response.notes.as_deref(), Some("have fun"));
        assert!(response.picks[0].track.is_some());
        assert!(response.picks[1].track.is_none());
        assert!(response.picks[2].track.is_some());
        assert_eq!(response.picks[0].seg.id, "a");
        // scores never come from the external path
        assert!(response.picks.iter().all(|p| p.score.is_none()));
    }

    #[test]
    fn numeric_fields_are_sanitized() {
        let plan = vec![seg("a")];
        let mut pick = raw_pick("a");
        pick.bpm = 150.6;
        pick.energy = Some(1.4);
        pick.duration_sec = 10.0;
        pick.explicit = None;
        pick.is_remix = None;

        let response = reconcile(
            &plan,
            RawLlmPlaylist {
                notes: None,
                picks: vec![pick],
            },
        );
        let track = response.picks[0].track.as_ref().unwrap();
        assert_eq!(track.bpm, 151);
        assert_eq!(track.energy, 1.0);
        assert_eq!(track.duration_sec, 60);
        assert!(!track.explicit);
        assert!(!track.is_remix);
    }

    #[test]
    fn missing_energy_defaults() {
        let plan = vec![seg("a")];
        let mut pick = raw_pick("a");
        pick.energy = None;
        let response = reconcile(
            &plan,
            RawLlmPlaylist {
                notes: None,
                picks: vec![pick],
            },
        );
        assert_eq!(response.picks[0].track.as_ref().unwrap().energy, 0.8);
    }

    #[test]
    fn track_ids_are_freshly_generated() {
        let plan = vec![seg("a"), seg("b")];
        let raw = RawLlmPlaylist {
            notes: None,
            picks: vec![raw_pick("a"), raw_pick("b")],
        };
        let response = reconcile(&plan, raw);
        let ids: Vec<&str> = response
            .picks
            .iter()
            .filter_map(|p| p.track.as_ref())
            .map(|t| t.id.as_str())
            .collect();
        assert!(ids[0].starts_with("a-"));
        assert!(ids[1].starts_with("b-"));
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn duplicate_segment_picks_use_first_match() {
        let plan = vec![seg("a")];
        let mut first = raw_pick("a");
        first.title = "First".to_owned();
        let mut second = raw_pick("a");
        second.title = "Second".to_owned();

        let response = reconcile(
            &plan,
            RawLlmPlaylist {
                notes: None,
                picks: vec![first, second],
            },
        );
        assert_eq!(response.picks[0].track.as_ref().unwrap().title, "First");
    }

    #[test]
    fn total_duration_sums_matched_picks_only() {
        let plan = vec![seg("a"), seg("b")];
        let raw = RawLlmPlaylist {
            notes: None,
            picks: vec![raw_pick("a")],
        };
        let response = reconcile(&plan, raw);
        assert_eq!(response.total_duration_sec, 200);
    }

    #[test]
    fn unknown_segment_ids_are_ignored() {
        let plan = vec![seg("a")];
        let raw = RawLlmPlaylist {
            notes: None,
            picks: vec![raw_pick("zzz")],
        };
        let response = reconcile(&plan, raw);
        assert!(response.picks[0].track.is_none());
        assert_eq!(response.total_duration_sec, 0);
    }
}
