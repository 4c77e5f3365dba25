use super::Prefs;
use crate::catalog::Track;
use crate::planner::SegmentPlan;

/// Score a track against a segment's targets and the rider's preferences.
///
/// Higher is better. The result is a weighted-sum base multiplied by
/// preference factors, so there is no fixed upper bound. Explicit tracks
/// under an explicit-not-ok policy short-circuit to a near-zero constant
/// so they only ever surface when every candidate is explicit.
pub fn score_track(track: &Track, seg: &SegmentPlan, prefs: &Prefs) -> f64 {
    if !prefs.explicit_ok && track.explicit {
        return 0.01;
    }

    let bpm_fit = if track.bpm >= seg.target_bpm_min && track.bpm <= seg.target_bpm_max {
        1.0
    } else {
        let nearest = if track.bpm < seg.target_bpm_min {
            seg.target_bpm_min
        } else {
            seg.target_bpm_max
        };
        let distance = (track.bpm as f64 - nearest as f64).abs();
        1.0 - distance.min(50.0) / 50.0
    };

    let energy_fit = if track.energy >= seg.target_energy_min && track.energy <= seg.target_energy_max
    {
        1.0
    } else {
        0.5
    };

    let genre_fit = if prefs.genres.is_empty() || prefs.genres.iter().any(|g| g == &track.genre) {
        1.0
    } else {
        0.7
    };

    let artist_lower = track.artist.to_lowercase();
    let include_boost = if prefs
        .include_artists
        .iter()
        .any(|a| artist_lower.contains(&a.to_lowercase()))
    {
        1.15
    } else {
        1.0
    };
    let exclude_penalty = if prefs
        .exclude_artists
        .iter()
        .any(|a| artist_lower.contains(&a.to_lowercase()))
    {
        0.1
    } else {
        1.0
    };

    let theme = prefs.theme.trim().to_lowercase();
    let theme_match = if !theme.is_empty()
        && (track.title.to_lowercase().contains(&theme) || artist_lower.contains(&theme))
    {
        1.1
    } else {
        1.0
    };

    let remix_boost = if prefs.prefer_remixes {
        if track.is_remix {
            1.1
        } else {
            0.95
        }
    } else {
        1.0
    };

    // familiarity above the midpoint rewards remixes and tracks from
    // outside the current decade; at or below it rewards pop/edm staples
    let fresh_boost = if prefs.familiarity > 50.0 {
        let off_decade = track.decade.as_deref().map(|d| d != "2020s").unwrap_or(false);
        if track.is_remix || off_decade {
            1.05
        } else {
            0.98
        }
    } else if track.genre == "pop" || track.genre == "edm" {
        1.05
    } else {
        1.0
    };

    let base = 0.5 * bpm_fit + 0.25 * energy_fit + 0.15 * genre_fit + 0.10;
    base * include_boost * exclude_penalty * theme_match * remix_boost * fresh_boost
}
