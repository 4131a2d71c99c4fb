//! Text rendering of an experiment report.

use std::fmt::Write;

use simulation::{ExperimentReport, MetricsSnapshot};
use types::Variant;

/// Left-hand label of the summary table.
fn summary_label(variant: Variant) -> &'static str {
    match variant {
        Variant::Baseline => "Baseline depth",
        Variant::HazardOnly => "Hazard-only",
        Variant::CoherenceGated => "Z(Q) v1.0",
    }
}

/// Render the report the way the experiment has always printed it.
pub fn render_text(report: &ExperimentReport) -> String {
    let mut out = String::new();

    for outcome in &report.outcomes {
        let _ = writeln!(out, "{}", outcome.variant.description());
    }
    out.push('\n');

    for outcome in &report.outcomes {
        let _ = write!(
            out,
            "{:<15}: {}",
            summary_label(outcome.variant),
            group_thousands(outcome.depth.value())
        );
        if outcome.variant == Variant::CoherenceGated {
            match report.gain {
                Some(gain) => {
                    let _ = write!(out, "  ← {gain:.1}× gain");
                }
                None => out.push_str("  ← gain undefined (baseline depth is zero)"),
            }
        }
        out.push('\n');
    }

    out
}

/// Render the metrics snapshot as aligned key/value lines.
pub fn render_metrics(snapshot: &MetricsSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Steps observed : {}", snapshot.total_steps);
    let _ = writeln!(
        out,
        "Scoring steps  : {} ({:.1}%)",
        snapshot.scoring_steps,
        snapshot.scoring_rate * 100.0
    );
    let _ = writeln!(
        out,
        "Cost branches  : shock={} drift={} decline={}",
        snapshot.shock_steps, snapshot.drift_steps, snapshot.decline_steps
    );
    let _ = writeln!(out, "Capped drives  : {}", snapshot.capped_drive_steps);
    let _ = writeln!(out, "Peak score     : {:.4}", snapshot.peak_score);
    let _ = writeln!(out, "Peak hazard    : {:.4}", snapshot.peak_hazard);
    match snapshot.peak_drive {
        Some(drive) => {
            let _ = writeln!(out, "Peak drive     : {drive:.4}");
        }
        None => out.push_str("Peak drive     : n/a\n"),
    }
    if snapshot.total_steps > 0 {
        let _ = writeln!(
            out,
            "Floors reached : activity={:.4} energy={:.4} cost={:.4}",
            snapshot.min_activity, snapshot.min_energy, snapshot.min_cost
        );
    } else {
        out.push_str("Floors reached : n/a\n");
    }
    out
}

/// Round to an integer and group digits in threes, e.g. `1234567.6` → `1,234,568`.
pub fn group_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3 + 1);
    if value < 0.0 && rounded != "0" {
        grouped.push('-');
    }
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
