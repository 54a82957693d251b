use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type DriverId = i64;
pub type RaceId = i64;
pub type ConstructorId = i64;

/// Score every calculator falls back to when it cannot say anything.
pub const NEUTRAL_SCORE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub driver_id: DriverId,
    pub reference: String,
    pub forename: String,
    pub surname: String,
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.forename, self.surname).trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
    pub race_id: RaceId,
    pub year: i32,
    pub round: u32,
    #[serde(default)]
    pub circuit: Option<String>,
    pub name: String,
}

/// One classified (or unclassified) race entry.
///
/// `position` is `None` for a DNF; `position_order` is the finishing order
/// including retirements and is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub race_id: RaceId,
    pub driver_id: DriverId,
    pub constructor_id: ConstructorId,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub round: Option<u32>,
    #[serde(default)]
    pub circuit: Option<String>,
    #[serde(default)]
    pub grid: Option<u32>,
    #[serde(default)]
    pub position: Option<u32>,
    pub position_order: u32,
    #[serde(default)]
    pub points: f64,
}

impl RaceResult {
    pub fn is_dnf(&self) -> bool {
        self.position.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifyingRecord {
    pub race_id: RaceId,
    pub driver_id: DriverId,
    #[serde(default)]
    pub constructor_id: Option<ConstructorId>,
    #[serde(default)]
    pub position: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapPosition {
    pub race_id: RaceId,
    pub driver_id: DriverId,
    pub lap: u32,
    #[serde(default)]
    pub position: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitStop {
    pub race_id: RaceId,
    pub driver_id: DriverId,
    pub stop: u32,
    pub lap: u32,
    #[serde(default)]
    pub duration_ms: Option<i64>,
}

/// Championship standing after a race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub race_id: RaceId,
    pub driver_id: DriverId,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub wins: u32,
}

/// The closed set of traits the framework scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitKind {
    Aggression,
    Consistency,
    RaceStart,
    PressurePerformance,
    Racecraft,
}

impl TraitKind {
    pub const ALL: [TraitKind; 5] = [
        TraitKind::Aggression,
        TraitKind::Consistency,
        TraitKind::RaceStart,
        TraitKind::PressurePerformance,
        TraitKind::Racecraft,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TraitKind::Aggression => "aggression",
            TraitKind::Consistency => "consistency",
            TraitKind::RaceStart => "race_start",
            TraitKind::PressurePerformance => "pressure_performance",
            TraitKind::Racecraft => "racecraft",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TraitKind::Aggression => "Aggression",
            TraitKind::Consistency => "Consistency",
            TraitKind::RaceStart => "Race Start Performance",
            TraitKind::PressurePerformance => "Pressure Performance",
            TraitKind::Racecraft => "Racecraft",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        TraitKind::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl std::fmt::Display for TraitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

/// Output of one calculator invocation.
///
/// `contributing_stats` keeps unavailable sub-metrics as explicit `None`,
/// which serializes to JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitResult {
    pub score: f64,
    pub raw_value: Option<f64>,
    #[serde(default)]
    pub contributing_stats: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    pub notes: String,
    pub races_analyzed: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(default)]
    pub insufficient_data: bool,
}

impl TraitResult {
    /// The neutral default: score 50, nothing analyzed.
    pub fn insufficient(notes: impl Into<String>) -> Self {
        Self {
            score: NEUTRAL_SCORE,
            raw_value: None,
            contributing_stats: BTreeMap::new(),
            notes: notes.into(),
            races_analyzed: 0,
            confidence: None,
            insufficient_data: true,
        }
    }

    pub fn errored(kind: TraitKind, err: &anyhow::Error) -> Self {
        Self::insufficient(format!(
            "calculation error in {}: {:#}",
            kind.as_str(),
            err
        ))
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn is_default(&self) -> bool {
        self.insufficient_data
    }

    pub fn stat(&self, key: &str) -> Option<f64> {
        self.contributing_stats.get(key).copied().flatten()
    }
}

/// One row per driver. Race start is `None` when that calculator had too little data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnaProfile {
    pub driver_id: DriverId,
    pub driver_name: String,
    pub aggression_score: f64,
    pub consistency_score: f64,
    pub pressure_performance_score: f64,
    pub racecraft_score: f64,
    pub race_start_score: Option<f64>,
    pub races_analyzed: usize,
    pub career_span: String,
    pub last_updated: DateTime<Utc>,
}

impl DnaProfile {
    pub fn score(&self, kind: TraitKind) -> Option<f64> {
        match kind {
            TraitKind::Aggression => Some(self.aggression_score),
            TraitKind::Consistency => Some(self.consistency_score),
            TraitKind::RaceStart => self.race_start_score,
            TraitKind::PressurePerformance => Some(self.pressure_performance_score),
            TraitKind::Racecraft => Some(self.racecraft_score),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitBreakdown {
    pub driver_id: DriverId,
    pub trait_name: TraitKind,
    pub raw_value: Option<f64>,
    pub normalized_score: f64,
    /// JSON object; unavailable sub-metrics are `null`.
    pub contributing_stats: String,
    pub calculation_notes: String,
}

impl TraitBreakdown {
    pub fn from_result(
        driver_id: DriverId,
        kind: TraitKind,
        result: &TraitResult,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            driver_id,
            trait_name: kind,
            raw_value: result.raw_value.filter(|v| v.is_finite()),
            normalized_score: result.score,
            contributing_stats: serde_json::to_string(&sanitize_stats(
                &result.contributing_stats,
            ))?,
            calculation_notes: result.notes.clone(),
        })
    }
}

fn sanitize_stats(stats: &BTreeMap<String, Option<f64>>) -> BTreeMap<&str, Option<f64>> {
    stats
        .iter()
        .map(|(k, v)| (k.as_str(), v.filter(|x| x.is_finite())))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub driver_id: DriverId,
    pub season: i32,
    /// trait name -> score for that season only
    pub trait_scores: BTreeMap<String, Option<f64>>,
    pub races_completed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RacingStats {
    pub driver_id: DriverId,
    pub total_races: usize,
    pub wins: usize,
    pub second_places: usize,
    pub third_places: usize,
    pub podiums: usize,
    pub avg_finish_position: Option<f64>,
    pub best_championship_finish: Option<u32>,
    pub avg_championship_finish: Option<f64>,
    pub seasons_completed: usize,
    pub avg_teammate_points_delta: Option<f64>,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_kind_parse_roundtrip() {
        for kind in TraitKind::ALL {
            assert_eq!(TraitKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(TraitKind::parse("weather_mastery"), None);
    }

    #[test]
    fn test_insufficient_is_neutral_default() {
        let r = TraitResult::insufficient("not enough races");
        assert_eq!(r.score, 50.0);
        assert!(r.contributing_stats.is_empty());
        assert_eq!(r.races_analyzed, 0);
        assert!(r.is_default());
    }

    #[test]
    fn test_breakdown_serializes_missing_stats_as_null() {
        let mut r = TraitResult::insufficient("x");
        r.contributing_stats
            .insert("late_race_moves".into(), None);
        r.contributing_stats
            .insert("broken".into(), Some(f64::NAN));
        r.contributing_stats
            .insert("overtaking_rate".into(), Some(61.5));

        let b = TraitBreakdown::from_result(1, TraitKind::Aggression, &r).unwrap();
        let v: serde_json::Value = serde_json::from_str(&b.contributing_stats).unwrap();
        assert!(v["late_race_moves"].is_null());
        assert!(v["broken"].is_null());
        assert_eq!(v["overtaking_rate"], serde_json::json!(61.5));
    }
}
