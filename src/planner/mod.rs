//! Segment plan construction.
//!
//! A ride is laid out as warmup, a block of intense intervals with
//! recoveries between them, an optional steady block that absorbs the
//! remaining time, and a cooldown. The sprint/climb labelling of the
//! intervals is randomized for variety; callers inject the RNG so tests
//! can seed it.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Moderate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Moderate => "moderate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    SprintHeavy,
    ClimbHeavy,
    MixedIntervals,
    RhythmRide,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::SprintHeavy => "sprint-heavy",
            Profile::ClimbHeavy => "climb-heavy",
            Profile::MixedIntervals => "mixed-intervals",
            Profile::RhythmRide => "rhythm-ride",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentType {
    Warmup,
    Sprint,
    Climb,
    Recovery,
    Arm,
    Steady,
    Cooldown,
}

impl SegmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentType::Warmup => "warmup",
            SegmentType::Sprint => "sprint",
            SegmentType::Climb => "climb",
            SegmentType::Recovery => "recovery",
            SegmentType::Arm => "arm",
            SegmentType::Steady => "steady",
            SegmentType::Cooldown => "cooldown",
        }
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timed block of the ride with its BPM and energy targets.
/// Immutable once the plan is built; plan order is ride chronology.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentPlan {
    pub id: String,
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    pub duration_sec: u32,
    pub target_bpm_min: u32,
    pub target_bpm_max: u32,
    pub target_energy_min: f64,
    pub target_energy_max: f64,
}

fn seg_id(prefix: &str) -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &uuid[..8])
}

/// Build the ordered segment plan for a ride.
///
/// The plan shape (segment count, durations, ordering) is deterministic
/// for a given input; only the sprint/climb split of the intervals
/// depends on `rng`. Out-of-range durations are clamped, never rejected.
pub fn build_plan<R: Rng>(
    duration_min: u32,
    difficulty: Difficulty,
    profile: Profile,
    arm_songs: u32,
    rng: &mut R,
) -> Vec<SegmentPlan> {
    let total_seconds = duration_min * 60;
    let mut segments = Vec::new();

    let warmup = (if profile == Profile::RhythmRide { 360u32 } else { 300 }).clamp(240, 540);
    segments.push(SegmentPlan {
        id: seg_id("warm"),
        segment_type: SegmentType::Warmup,
        duration_sec: warmup,
        target_bpm_min: 90,
        target_bpm_max: 110,
        target_energy_min: 0.3,
        target_energy_max: 0.55,
    });

    let intense_count = match difficulty {
        Difficulty::Easy => 4,
        Difficulty::Moderate => 5,
        Difficulty::Advanced => 6,
    };
    let work_dur = if difficulty == Difficulty::Advanced { 180 } else { 150 };
    let rec_dur = if difficulty == Difficulty::Easy { 120 } else { 90 };
    let sprint_bias = match profile {
        Profile::SprintHeavy => 0.75,
        Profile::MixedIntervals => 0.5,
        Profile::RhythmRide => 0.4,
        Profile::ClimbHeavy => 0.25,
    };

    let mut core_duration = 0u32;
    for i in 0..intense_count {
        // The draw happens for every interval so seeded runs stay aligned
        // across profiles; sprint-heavy rides are sprints regardless.
        let is_sprint = rng.random::<f64>() < sprint_bias || profile == Profile::SprintHeavy;
        segments.push(SegmentPlan {
            id: seg_id("core"),
            segment_type: if is_sprint { SegmentType::Sprint } else { SegmentType::Climb },
            duration_sec: work_dur,
            target_bpm_min: if is_sprint { 140 } else { 60 },
            target_bpm_max: if is_sprint { 175 } else { 95 },
            target_energy_min: 0.75,
            target_energy_max: 1.0,
        });
        core_duration += work_dur;
        if i < intense_count - 1 {
            segments.push(SegmentPlan {
                id: seg_id("rec"),
                segment_type: SegmentType::Recovery,
                duration_sec: rec_dur,
                target_bpm_min: 85,
                target_bpm_max: 110,
                target_energy_min: 0.3,
                target_energy_max: 0.55,
            });
            core_duration += rec_dur;
        }
    }

    // 240s of the remaining time is earmarked for the cooldown; whatever
    // is left beyond that becomes a steady block, which is what
    // reconciles the plan against the requested class length.
    let leftover = total_seconds as i64 - warmup as i64 - core_duration as i64 - 240;
    if leftover > 120 {
        segments.push(SegmentPlan {
            id: seg_id("steady"),
            segment_type: SegmentType::Steady,
            duration_sec: leftover as u32,
            target_bpm_min: 110,
            target_bpm_max: 130,
            target_energy_min: 0.55,
            target_energy_max: 0.75,
        });
    }

    let mut inserted = 0;
    for segment in segments.iter_mut() {
        if inserted >= arm_songs {
            break;
        }
        if segment.segment_type == SegmentType::Recovery {
            segment.segment_type = SegmentType::Arm;
            segment.target_bpm_min = 95;
            segment.target_bpm_max = 120;
            segment.target_energy_min = 0.5;
            segment.target_energy_max = 0.7;
            inserted += 1;
        }
    }

    let cooldown = (if difficulty == Difficulty::Advanced { 240u32 } else { 300 }).clamp(180, 420);
    segments.push(SegmentPlan {
        id: seg_id("cool"),
        segment_type: SegmentType::Cooldown,
        duration_sec: cooldown,
        target_bpm_min: 70,
        target_bpm_max: 95,
        target_energy_min: 0.1,
        target_energy_max: 0.4,
    });

    segments
}
