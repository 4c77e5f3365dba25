//! Natural-language instruction rendering for the LLM path.

use super::GenerationInput;
use crate::planner::SegmentPlan;

pub const SYSTEM_PROMPT: &str = "You are RideMix, an expert coach who programs indoor cycling \
    playlists that fit detailed ride segment specs.";

/// Render the user instruction: ride parameters, the enumerated segment
/// plan with BPM targets, every preference, and the strict output-shape
/// requirement.
pub fn render_user_prompt(input: &GenerationInput, plan: &[SegmentPlan]) -> String {
    let plan_summary = plan
        .iter()
        .enumerate()
        .map(|(idx, seg)| {
            format!(
                "{}. {} ({}s) BPM {}-{}",
                idx + 1,
                seg.segment_type,
                seg.duration_sec,
                seg.target_bpm_min,
                seg.target_bpm_max
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let prefs = &input.prefs;
    let genre_line = if prefs.genres.is_empty() {
        "any high-energy".to_owned()
    } else {
        prefs.genres.join(", ")
    };
    let theme_line = if prefs.theme.is_empty() {
        String::new()
    } else {
        format!("Theme keywords: {}.", prefs.theme)
    };
    let include_line = if prefs.include_artists.is_empty() {
        String::new()
    } else {
        format!("Prioritize artists: {}.", prefs.include_artists.join(", "))
    };
    let exclude_line = if prefs.exclude_artists.is_empty() {
        String::new()
    } else {
        format!("Avoid artists: {}.", prefs.exclude_artists.join(", "))
    };
    let explicit_line = if prefs.explicit_ok {
        "Explicit tracks are allowed."
    } else {
        "Explicit tracks must be avoided."
    };
    let remix_line = if prefs.prefer_remixes {
        "Remixes are encouraged."
    } else {
        "Prefer original edits."
    };
    let freshness_line = if prefs.familiarity >= 60.0 {
        "Focus on fresher or unexpected picks."
    } else if prefs.familiarity <= 40.0 {
        "Stick with familiar, high-energy staples."
    } else {
        "Blend familiar staples with a few newer surprises."
    };

    format!(
        "You are an elite indoor cycling coach and music supervisor. Create a playlist for a \
         {duration} minute {difficulty} {profile} ride. Use the following segment plan (with BPM \
         and energy targets):\n{plan_summary}\nGenres to emphasize: {genre_line}. {theme_line} \
         {include_line} {exclude_line} {explicit_line} {remix_line} {freshness_line} Provide a \
         JSON object with a \"notes\" field and a \"picks\" array. Each pick must include \
         segmentId, title, artist, genre, bpm, energy (0..1), durationSec, explicit, and isRemix. \
         Match the BPM and energy targets and ensure total duration closely matches the plan.",
        duration = input.duration_min,
        difficulty = input.difficulty,
        profile = input.profile,
    )
}
