//! MetricsHook - aggregates per-step statistics across runs.

use std::sync::atomic::{AtomicU64, Ordering};

use dynamics::CostBranch;
use parking_lot::Mutex;
use serde::Serialize;

use crate::hooks::{RunContext, SimulationHook, StepRecord};

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Runs completed.
    pub runs: u64,
    /// Steps observed.
    pub total_steps: u64,
    /// Steps whose score contributed to depth.
    pub scoring_steps: u64,
    /// Cost shocks.
    pub shock_steps: u64,
    /// Cost drift draws.
    pub drift_steps: u64,
    /// Fixed cost declines.
    pub decline_steps: u64,
    /// Steps where the drive hit the safety cap.
    pub capped_drive_steps: u64,
    /// Fraction of steps that scored.
    pub scoring_rate: f64,
    /// Highest score seen.
    pub peak_score: f64,
    /// Highest hazard memory seen.
    pub peak_hazard: f64,
    /// Highest drive seen (phase lock only).
    pub peak_drive: Option<f64>,
    /// Lowest activity, energy and cost seen.
    pub min_activity: f64,
    pub min_energy: f64,
    pub min_cost: f64,
}

#[derive(Debug, Clone)]
struct Extremes {
    peak_score: f64,
    peak_hazard: f64,
    peak_drive: Option<f64>,
    min_activity: f64,
    min_energy: f64,
    min_cost: f64,
}

impl Default for Extremes {
    fn default() -> Self {
        Self {
            peak_score: 0.0,
            peak_hazard: 0.0,
            peak_drive: None,
            min_activity: f64::INFINITY,
            min_energy: f64::INFINITY,
            min_cost: f64::INFINITY,
        }
    }
}

/// Built-in hook for collecting run metrics.
///
/// Counters are atomics; float extremes sit behind a mutex.
#[derive(Debug, Default)]
pub struct MetricsHook {
    runs: AtomicU64,
    steps: AtomicU64,
    scoring: AtomicU64,
    shocks: AtomicU64,
    drifts: AtomicU64,
    declines: AtomicU64,
    capped: AtomicU64,
    extremes: Mutex<Extremes>,
}

impl MetricsHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_steps = self.steps.load(Ordering::Relaxed);
        let scoring_steps = self.scoring.load(Ordering::Relaxed);
        let extremes = self.extremes.lock().clone();

        let scoring_rate = if total_steps > 0 {
            scoring_steps as f64 / total_steps as f64
        } else {
            0.0
        };

        MetricsSnapshot {
            runs: self.runs.load(Ordering::Relaxed),
            total_steps,
            scoring_steps,
            shock_steps: self.shocks.load(Ordering::Relaxed),
            drift_steps: self.drifts.load(Ordering::Relaxed),
            decline_steps: self.declines.load(Ordering::Relaxed),
            capped_drive_steps: self.capped.load(Ordering::Relaxed),
            scoring_rate,
            peak_score: extremes.peak_score,
            peak_hazard: extremes.peak_hazard,
            peak_drive: extremes.peak_drive,
            min_activity: extremes.min_activity,
            min_energy: extremes.min_energy,
            min_cost: extremes.min_cost,
        }
    }

    /// Reset all metrics.
    pub fn reset(&self) {
        for counter in [
            &self.runs,
            &self.steps,
            &self.scoring,
            &self.shocks,
            &self.drifts,
            &self.declines,
            &self.capped,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        *self.extremes.lock() = Extremes::default();
    }
}

impl SimulationHook for MetricsHook {
    fn name(&self) -> &str {
        "Metrics"
    }

    fn on_step(&self, record: &StepRecord, _ctx: &RunContext) {
        self.steps.fetch_add(1, Ordering::Relaxed);
        if record.contribution > 0.0 {
            self.scoring.fetch_add(1, Ordering::Relaxed);
        }
        let branch = match record.cost_branch {
            CostBranch::Shock => &self.shocks,
            CostBranch::Drift => &self.drifts,
            CostBranch::Decline => &self.declines,
        };
        branch.fetch_add(1, Ordering::Relaxed);
        if record.drive_capped {
            self.capped.fetch_add(1, Ordering::Relaxed);
        }

        let mut extremes = self.extremes.lock();
        extremes.peak_score = extremes.peak_score.max(record.score);
        extremes.peak_hazard = extremes.peak_hazard.max(record.state.hazard);
        if let Some(drive) = record.drive {
            extremes.peak_drive = Some(extremes.peak_drive.map_or(drive, |p| p.max(drive)));
        }
        extremes.min_activity = extremes.min_activity.min(record.state.activity);
        extremes.min_energy = extremes.min_energy.min(record.state.energy);
        extremes.min_cost = extremes.min_cost.min(record.state.cost);
    }

    fn on_run_end(&self, _depth: types::Depth, _ctx: &RunContext) {
        self.runs.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynamics::ModelState;
    use types::{Depth, RunMode};

    fn ctx() -> RunContext {
        RunContext::new(RunMode::COHERENCE_GATED, 3, 42)
    }

    fn record(score: f64, branch: CostBranch, drive: Option<f64>) -> StepRecord {
        StepRecord {
            step: 0,
            state: ModelState {
                hazard: score / 2.0,
                ..ModelState::initial()
            },
            hazard_before: 0.0,
            hazard_added: 0.0,
            cost_branch: branch,
            drive,
            drive_capped: drive == Some(5.0),
            score,
            contribution: dynamics::stages::depth_contribution(score),
            depth: Depth::ZERO,
        }
    }

    #[test]
    fn test_metrics_accumulation() {
        let metrics = MetricsHook::new();
        metrics.on_step(&record(1.2, CostBranch::Shock, Some(5.0)), &ctx());
        metrics.on_step(&record(0.5, CostBranch::Drift, Some(0.4)), &ctx());
        metrics.on_step(&record(0.9, CostBranch::Decline, Some(1.1)), &ctx());
        metrics.on_run_end(Depth(0.0336), &ctx());

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.runs, 1);
        assert_eq!(snapshot.total_steps, 3);
        assert_eq!(snapshot.scoring_steps, 2);
        assert_eq!(snapshot.shock_steps, 1);
        assert_eq!(snapshot.drift_steps, 1);
        assert_eq!(snapshot.decline_steps, 1);
        assert_eq!(snapshot.capped_drive_steps, 1);
        assert_eq!(snapshot.peak_drive, Some(5.0));
        assert!((snapshot.peak_score - 1.2).abs() < 1e-12);
        assert!((snapshot.peak_hazard - 0.6).abs() < 1e-12);
        assert!((snapshot.scoring_rate - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_reset() {
        let metrics = MetricsHook::new();
        metrics.on_step(&record(1.0, CostBranch::Shock, None), &ctx());
        assert_eq!(metrics.snapshot().total_steps, 1);

        metrics.reset();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_steps, 0);
        assert_eq!(snapshot.peak_drive, None);
        assert_eq!(snapshot.min_energy, f64::INFINITY);
    }
}
