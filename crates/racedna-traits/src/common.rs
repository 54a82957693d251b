use racedna_core::aggregate::{stats_map, weighted_blend, Component};
use racedna_core::era::EraWeights;
use racedna_core::model::{RaceResult, TraitResult};
use std::collections::BTreeMap;

/// `"Label: 61.2; Other: 40.0"` for the defined values.
pub(crate) fn describe_components(parts: &[(&str, Option<f64>)]) -> String {
    let notes: Vec<String> = parts
        .iter()
        .filter_map(|(label, v)| v.map(|v| format!("{}: {:.1}", label, v)))
        .collect();
    if notes.is_empty() {
        "Insufficient data for detailed analysis".to_string()
    } else {
        notes.join("; ")
    }
}

/// Blends the components and runs the era hook. `None` when no component is defined.
pub(crate) fn blend_with_era(
    components: &[Component],
    era: &EraWeights,
    results: &[RaceResult],
    notes: String,
    races_analyzed: usize,
) -> Option<TraitResult> {
    let blend = weighted_blend(components)?;
    let hook = era.hook(blend.score, results);

    let mut contributing_stats: BTreeMap<String, Option<f64>> = stats_map(components);
    contributing_stats.insert("era_weight_mean".into(), hook.mean_weight);

    Some(TraitResult {
        score: hook.score,
        raw_value: Some(blend.raw),
        contributing_stats,
        notes: format!("{}; era weighting: pass-through", notes),
        races_analyzed,
        confidence: None,
        insufficient_data: false,
    })
}
