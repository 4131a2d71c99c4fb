//! Core types for the Z(Q) simulation.
//!
//! This crate provides the shared vocabulary used across the workspace:
//! model constants, the configuration document, run modes, and the
//! accumulated `Depth` metric.

use derive_more::{Add, AddAssign, From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;

mod config;
mod error;

pub use config::{
    CostShockSection, DynamicsSection, GatingSection, SafetySection, SimulationSection,
    ZParamsSection, ZqConfig,
};
pub use error::ConfigError;

// =============================================================================
// Constants
// =============================================================================

/// Lower clamp applied to activity, energy and cost after every update.
pub const FLOOR: f64 = 0.1;

/// Denominator guard for the A·E / (C + H) ratio.
pub const EPS: f64 = 1e-6;

/// Per-step multiplicative decay of hazard memory under phase lock.
pub const HAZARD_DECAY: f64 = 0.98;

/// Scores strictly above this contribute to depth.
pub const SCORE_THRESHOLD: f64 = 0.75;

/// Fraction of a qualifying score added to depth each step.
pub const DEPTH_RATE: f64 = 0.016;

/// Probability of a drift draw when the cost shock does not fire.
pub const COST_DRIFT_PROBABILITY: f64 = 0.3;

/// Fixed cost delta when neither shock nor drift fires.
pub const COST_DECLINE: f64 = -0.02;

// =============================================================================
// Depth
// =============================================================================

/// Accumulated depth metric for a single run.
///
/// Only ever grows: contributions are added when the per-step score clears
/// [`SCORE_THRESHOLD`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Default,
    Add,
    AddAssign,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Depth(pub f64);

impl Depth {
    pub const ZERO: Depth = Depth(0.0);

    /// Raw value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Ratio of `self` to a reference depth (the experiment gain).
    ///
    /// Returns `None` when the reference is zero.
    pub fn ratio_to(self, reference: Depth) -> Option<f64> {
        if reference.0 == 0.0 {
            None
        } else {
            Some(self.0 / reference.0)
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

// =============================================================================
// RunMode / Variant
// =============================================================================

/// The two switches that select the dynamics of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunMode {
    /// Apply `hazard_rate * H` as an energy drain.
    pub hazard_on: bool,
    /// Phase-driven activity, phase control and hazard decay.
    pub psi_lock: bool,
}

impl RunMode {
    pub const BASELINE: RunMode = RunMode::new(false, false);
    pub const HAZARD_ONLY: RunMode = RunMode::new(true, false);
    pub const COHERENCE_GATED: RunMode = RunMode::new(true, true);

    pub const fn new(hazard_on: bool, psi_lock: bool) -> Self {
        Self {
            hazard_on,
            psi_lock,
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hazard={} psi_lock={}",
            if self.hazard_on { "on" } else { "off" },
            if self.psi_lock { "on" } else { "off" }
        )
    }
}

/// Named experimental conditions, in the order the experiment runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    Baseline,
    HazardOnly,
    CoherenceGated,
}

impl Variant {
    /// All variants in experiment order.
    pub const ALL: [Variant; 3] = [
        Variant::Baseline,
        Variant::HazardOnly,
        Variant::CoherenceGated,
    ];

    /// Switches used for this variant.
    pub fn mode(self) -> RunMode {
        match self {
            Variant::Baseline => RunMode::BASELINE,
            Variant::HazardOnly => RunMode::HAZARD_ONLY,
            Variant::CoherenceGated => RunMode::COHERENCE_GATED,
        }
    }

    /// Report label.
    pub fn label(self) -> &'static str {
        match self {
            Variant::Baseline => "Baseline",
            Variant::HazardOnly => "Hazard-Only",
            Variant::CoherenceGated => "Z(Q)-v1.0",
        }
    }

    /// One-line description printed before each run.
    pub fn description(self) -> &'static str {
        match self {
            Variant::Baseline => "Baseline (no hazard, no lock)",
            Variant::HazardOnly => "Hazard-only (lethal regime)",
            Variant::CoherenceGated => "Z(Q) v1.0 (coherence + dissipation)",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_accumulates() {
        let mut depth = Depth::ZERO;
        depth += Depth(0.5);
        depth += Depth::from(0.25);
        assert!((depth.value() - 0.75).abs() < 1e-12);
        assert_eq!(f64::from(depth), depth.0);
    }

    #[test]
    fn test_depth_ratio() {
        assert_eq!(Depth(8.0).ratio_to(Depth(2.0)), Some(4.0));
        assert_eq!(Depth(8.0).ratio_to(Depth::ZERO), None);
    }

    #[test]
    fn test_variant_modes() {
        assert_eq!(Variant::Baseline.mode(), RunMode::new(false, false));
        assert_eq!(Variant::HazardOnly.mode(), RunMode::new(true, false));
        assert_eq!(Variant::CoherenceGated.mode(), RunMode::new(true, true));
        assert_eq!(Variant::CoherenceGated.label(), "Z(Q)-v1.0");
    }
}
