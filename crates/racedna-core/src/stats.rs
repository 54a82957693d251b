use crate::model::{ConstructorId, DriverId, RaceId, RaceResult, NEUTRAL_SCORE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1). Undefined below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

pub fn population_std(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// Fraction of items matching `pred`, 0.0 for an empty slice.
pub fn share<T>(items: &[T], pred: impl Fn(&T) -> bool) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    items.iter().filter(|x| pred(x)).count() as f64 / items.len() as f64
}

/// Clamp into [0, 100]; NaN and infinities collapse to the neutral score.
pub fn clamp_score(v: f64) -> f64 {
    clamp_range(v, 0.0, 100.0)
}

pub fn clamp_range(v: f64, lo: f64, hi: f64) -> f64 {
    if !v.is_finite() {
        return NEUTRAL_SCORE.clamp(lo, hi);
    }
    v.clamp(lo, hi)
}

pub fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeMethod {
    #[default]
    Percentile,
    ZScore,
}

/// Percentile rank of every value (average rank for ties), in 0..=100.
pub fn percentile_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let mut idx: Vec<usize> = (0..n).collect();
    idx.sort_by(|a, b| values[*a].total_cmp(&values[*b]));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && values[idx[j + 1]] == values[idx[i]] {
            j += 1;
        }
        // ranks are 1-based; ties share the mean of their positions
        let avg = (i + j) as f64 / 2.0 + 1.0;
        for k in i..=j {
            ranks[idx[k]] = avg / n as f64 * 100.0;
        }
        i = j + 1;
    }
    ranks
}

/// Score the last value of `values` relative to the whole series.
pub fn normalize_score(values: &[f64], method: NormalizeMethod) -> f64 {
    let Some(last) = values.last().copied() else {
        return NEUTRAL_SCORE;
    };
    match method {
        NormalizeMethod::Percentile => percentile_ranks(values)
            .last()
            .copied()
            .map(clamp_score)
            .unwrap_or(NEUTRAL_SCORE),
        NormalizeMethod::ZScore => {
            let (Some(m), Some(sd)) = (mean(values), sample_std(values)) else {
                return NEUTRAL_SCORE;
            };
            if sd == 0.0 {
                return NEUTRAL_SCORE;
            }
            clamp_score(50.0 + 17.0 * (last - m) / sd)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeammateDelta {
    pub race_id: RaceId,
    pub constructor_id: ConstructorId,
    pub driver_id: DriverId,
    pub value: f64,
    pub team_mean: f64,
    pub delta: f64,
}

/// For every (constructor, race) with at least two drivers, each driver's
/// metric minus the group mean. Rows where `metric` yields `None` are ignored.
pub fn teammate_baseline(
    results: &[RaceResult],
    metric: impl Fn(&RaceResult) -> Option<f64>,
) -> Vec<TeammateDelta> {
    let mut groups: BTreeMap<(ConstructorId, RaceId), Vec<(DriverId, f64)>> = BTreeMap::new();
    for r in results {
        if let Some(v) = metric(r).filter(|v| v.is_finite()) {
            groups
                .entry((r.constructor_id, r.race_id))
                .or_default()
                .push((r.driver_id, v));
        }
    }

    let mut out = Vec::new();
    for ((constructor_id, race_id), rows) in groups {
        if rows.len() < 2 {
            continue;
        }
        let team_mean = rows.iter().map(|(_, v)| v).sum::<f64>() / rows.len() as f64;
        for (driver_id, value) in rows {
            out.push(TeammateDelta {
                race_id,
                constructor_id,
                driver_id,
                value,
                team_mean,
                delta: value - team_mean,
            });
        }
    }
    out
}
