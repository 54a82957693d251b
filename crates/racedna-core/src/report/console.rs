use crate::engine::runner::RunSummary;
use crate::model::{DnaProfile, TimelineEntry, TraitBreakdown, TraitKind};
use crate::storage::store::{DriverSummary, StoreStatus};
use std::fmt::Write;

fn bar(score: f64) -> String {
    let filled = (score.clamp(0.0, 100.0) / 10.0).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

pub fn format_profile(profile: &DnaProfile, breakdowns: &[TraitBreakdown]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🏎  {} (#{})", profile.driver_name, profile.driver_id);
    let _ = writeln!(
        out,
        "    Career: {}  Races analyzed: {}",
        profile.career_span, profile.races_analyzed
    );
    for kind in TraitKind::ALL {
        match profile.score(kind) {
            Some(s) => {
                let _ = writeln!(out, "    {:<24} {:>5.1} {}", kind.display_name(), s, bar(s));
            }
            None => {
                let _ = writeln!(out, "    {:<24}   n/a (insufficient data)", kind.display_name());
            }
        }
        if let Some(b) = breakdowns.iter().find(|b| b.trait_name == kind) {
            if !b.calculation_notes.is_empty() {
                let _ = writeln!(out, "      → {}", b.calculation_notes);
            }
        }
    }
    out
}

pub fn format_run_summary(label: &str, s: &RunSummary) -> String {
    format!(
        "Summary ({}): {} drivers, {} saved, {} skipped, {} failed",
        label, s.total, s.succeeded, s.skipped, s.failed
    )
}

pub fn format_driver_table(rows: &[DriverSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>6}  {:<28} {:<18} {:>5}  {}", "ID", "Name", "Ref", "Races", "Career");
    for r in rows {
        let _ = writeln!(
            out,
            "{:>6}  {:<28} {:<18} {:>5}  {}",
            r.driver_id, r.name, r.reference, r.races, r.career_span
        );
    }
    let _ = write!(out, "{} drivers", rows.len());
    out
}

pub fn format_timeline(entries: &[TimelineEntry]) -> String {
    let mut out = String::new();
    for e in entries {
        let scores: Vec<String> = e
            .trait_scores
            .iter()
            .map(|(k, v)| match v {
                Some(s) => format!("{}={:.1}", k, s),
                None => format!("{}=n/a", k),
            })
            .collect();
        let _ = writeln!(out, "  {} ({} races): {}", e.season, e.races_completed, scores.join(", "));
    }
    out
}

pub fn format_status(status: &StoreStatus, top: &[DnaProfile]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Tables:");
    for (table, count) in &status.tables {
        match count {
            Some(n) => {
                let _ = writeln!(out, "  {:<24} {:>10}", table, n);
            }
            None => {
                let _ = writeln!(out, "  {:<24} {:>10}", table, "missing");
            }
        }
    }
    let _ = writeln!(
        out,
        "Last profile update: {}",
        status.last_profile_update.as_deref().unwrap_or("never")
    );
    if !top.is_empty() {
        let _ = writeln!(out, "Top profiles by races analyzed:");
        for p in top {
            let _ = writeln!(
                out,
                "  {:<28} {:>4} races  agg {:>5.1}  con {:>5.1}  prs {:>5.1}  rcf {:>5.1}",
                p.driver_name,
                p.races_analyzed,
                p.aggression_score,
                p.consistency_score,
                p.pressure_performance_score,
                p.racecraft_score
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_profile_shows_missing_race_start() {
        let p = DnaProfile {
            driver_id: 1,
            driver_name: "Ayrton Senna".into(),
            aggression_score: 81.2,
            consistency_score: 64.0,
            pressure_performance_score: 77.7,
            racecraft_score: 70.1,
            race_start_score: None,
            races_analyzed: 161,
            career_span: "1984-1994".into(),
            last_updated: Utc::now(),
        };
        let out = format_profile(&p, &[]);
        assert!(out.contains("Ayrton Senna"));
        assert!(out.contains("1984-1994"));
        assert!(out.contains("Race Start Performance"));
        assert!(out.contains("n/a"));
        assert!(out.contains("81.2"));
    }

    #[test]
    fn test_run_summary_line() {
        let s = RunSummary {
            total: 3,
            succeeded: 2,
            failed: 1,
            skipped: 0,
        };
        assert_eq!(
            format_run_summary("dna", &s),
            "Summary (dna): 3 drivers, 2 saved, 0 skipped, 1 failed"
        );
    }
}
