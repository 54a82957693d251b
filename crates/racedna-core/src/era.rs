use crate::model::RaceResult;
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Exponential-decay weighting by season recency.
///
/// `weight(year) = max(exp(-decay_rate * (reference_year - year)), floor)`.
/// Years after the reference year are capped at weight 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EraWeights {
    pub decay_rate: f64,
    pub floor: f64,
    pub reference_year: i32,
}

impl Default for EraWeights {
    fn default() -> Self {
        Self {
            decay_rate: 0.1,
            floor: 0.1,
            reference_year: chrono::Utc::now().year(),
        }
    }
}

/// What the era hook observed for one calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EraHook {
    pub score: f64,
    pub mean_weight: Option<f64>,
}

impl EraWeights {
    pub fn weight(&self, year: i32) -> f64 {
        let age = (self.reference_year - year).max(0) as f64;
        (-self.decay_rate * age).exp().max(self.floor)
    }

    pub fn apply(&self, rows: &[(i32, f64)]) -> Vec<f64> {
        rows.iter().map(|(y, v)| v * self.weight(*y)).collect()
    }

    /// Observes era weights over `results` and passes the score through.
    pub fn hook(&self, score: f64, results: &[RaceResult]) -> EraHook {
        let weights: Vec<f64> = results
            .iter()
            .filter_map(|r| r.year)
            .map(|y| self.weight(y))
            .collect();
        EraHook {
            score,
            mean_weight: crate::stats::mean(&weights),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights() -> EraWeights {
        EraWeights {
            decay_rate: 0.1,
            floor: 0.1,
            reference_year: 2024,
        }
    }

    #[test]
    fn test_weight_decays_to_floor() {
        let w = weights();
        assert_eq!(w.weight(2024), 1.0);
        assert!((w.weight(2014) - (-1.0f64).exp()).abs() < 1e-12);
        assert_eq!(w.weight(1950), 0.1);
        assert_eq!(w.weight(2030), 1.0);
    }

    #[test]
    fn test_apply_multiplies_by_year_weight() {
        let out = weights().apply(&[(2024, 10.0), (1960, 10.0)]);
        assert_eq!(out, vec![10.0, 1.0]);
    }

    #[test]
    fn test_hook_is_pass_through() {
        let r = RaceResult {
            race_id: 1,
            driver_id: 1,
            constructor_id: 1,
            year: Some(2024),
            round: Some(1),
            circuit: None,
            grid: None,
            position: None,
            position_order: 20,
            points: 0.0,
        };
        let hook = weights().hook(72.5, &[r]);
        assert_eq!(hook.score, 72.5);
        assert_eq!(hook.mean_weight, Some(1.0));
        assert_eq!(weights().hook(10.0, &[]).mean_weight, None);
    }
}
