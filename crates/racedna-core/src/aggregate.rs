use crate::stats::clamp_score;
use std::collections::BTreeMap;

/// One weighted sub-metric of a trait. `None` means it could not be computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Component {
    pub name: &'static str,
    pub weight: f64,
    pub value: Option<f64>,
}

impl Component {
    pub fn new(name: &'static str, weight: f64, value: Option<f64>) -> Self {
        Self {
            name,
            weight,
            value: value.filter(|v| v.is_finite()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Blend {
    /// Weighted sum before clamping.
    pub raw: f64,
    pub score: f64,
    pub used: Vec<&'static str>,
}

/// Weighted mean over the defined components, weights re-normalized to 1.
/// Returns `None` when no component is defined.
pub fn weighted_blend(components: &[Component]) -> Option<Blend> {
    let defined: Vec<(&Component, f64)> = components
        .iter()
        .filter_map(|c| c.value.map(|v| (c, v)))
        .filter(|(c, _)| c.weight > 0.0)
        .collect();
    let total: f64 = defined.iter().map(|(c, _)| c.weight).sum();
    if defined.is_empty() || total <= 0.0 {
        return None;
    }

    let raw = defined
        .iter()
        .map(|(c, v)| v * (c.weight / total))
        .sum::<f64>();
    Some(Blend {
        raw,
        score: clamp_score(raw),
        used: defined.iter().map(|(c, _)| c.name).collect(),
    })
}

/// Components as a contributing-stats map, undefined ones as `None`.
pub fn stats_map(components: &[Component]) -> BTreeMap<String, Option<f64>> {
    components
        .iter()
        .map(|c| (c.name.to_string(), c.value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_renormalizes_over_defined_components() {
        let all = [
            Component::new("a", 0.4, Some(80.0)),
            Component::new("b", 0.35, Some(60.0)),
            Component::new("c", 0.25, Some(40.0)),
        ];
        let b = weighted_blend(&all).unwrap();
        assert!((b.raw - (32.0 + 21.0 + 10.0)).abs() < 1e-9);

        let two = [
            Component::new("a", 0.4, Some(80.0)),
            Component::new("b", 0.35, None),
            Component::new("c", 0.25, Some(40.0)),
        ];
        let b = weighted_blend(&two).unwrap();
        let expected = 80.0 * (0.4 / 0.65) + 40.0 * (0.25 / 0.65);
        assert!((b.score - expected).abs() < 1e-9);
        assert_eq!(b.used, vec!["a", "c"]);

        let one = [
            Component::new("a", 0.4, None),
            Component::new("b", 0.35, Some(72.0)),
        ];
        assert!((weighted_blend(&one).unwrap().score - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_blend_none_when_nothing_defined() {
        let none = [
            Component::new("a", 0.5, None),
            Component::new("b", 0.5, Some(f64::NAN)),
        ];
        assert!(weighted_blend(&none).is_none());
        let map = stats_map(&none);
        assert_eq!(map.get("b"), Some(&None));
    }
}
