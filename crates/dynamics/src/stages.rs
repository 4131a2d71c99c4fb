//! The five per-step update stages.
//!
//! Each stage mutates [`ModelState`] in place and takes any random draw it
//! needs as a plain argument, so the arithmetic can be checked without a
//! generator.

use serde::Serialize;
use types::{DEPTH_RATE, FLOOR, HAZARD_DECAY, SCORE_THRESHOLD};

use crate::ModelState;

// =============================================================================
// Energy
// =============================================================================

/// Result of the energy stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyUpdate {
    /// Delta applied to energy after hazard drain.
    pub delta: f64,
    /// Amount added to hazard memory.
    pub hazard_added: f64,
}

/// Apply an energy delta and feed negative excursions into hazard memory.
///
/// Hazard memory never decreases here.
pub fn apply_energy(
    state: &mut ModelState,
    raw_delta: f64,
    hazard_rate: f64,
    hazard_memory: f64,
) -> EnergyUpdate {
    let delta = raw_delta - hazard_rate * state.hazard;
    state.energy = (state.energy + delta).max(FLOOR);

    let hazard_added = (-delta).max(0.0) * hazard_memory;
    state.hazard += hazard_added;

    EnergyUpdate {
        delta,
        hazard_added,
    }
}

// =============================================================================
// Cost
// =============================================================================

/// Which branch produced the cost delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CostBranch {
    /// Scaled normal draw, taken with the shock probability.
    Shock,
    /// Unscaled normal draw.
    Drift,
    /// Fixed negative delta.
    Decline,
}

/// Apply a cost delta, halving it when it exceeds `shock_bias`.
///
/// Returns the delta actually applied.
pub fn apply_cost(state: &mut ModelState, raw_delta: f64, shock_bias: f64) -> f64 {
    let delta = if raw_delta > shock_bias {
        raw_delta * 0.5
    } else {
        raw_delta
    };
    state.cost = (state.cost + delta).max(FLOOR);
    delta
}

// =============================================================================
// Activity
// =============================================================================

/// Phase-driven activity delta used under lock.
pub fn locked_activity_delta(state: &ModelState, beta: f64) -> f64 {
    beta * state.phase.sin()
}

/// Apply an activity delta.
pub fn apply_activity(state: &mut ModelState, delta: f64) {
    state.activity = (state.activity + delta).max(FLOOR);
}

// =============================================================================
// Phase
// =============================================================================

/// Result of the phase stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseUpdate {
    /// Drive fed to the controller, never above the cap.
    pub drive: f64,
    /// The uncapped ratio exceeded the cap.
    pub capped: bool,
}

/// Advance the phase toward `psi_target` and dissipate hazard memory.
///
/// Only runs under phase lock.
pub fn apply_phase(
    state: &mut ModelState,
    gamma: f64,
    damping: f64,
    psi_target: f64,
    sre_cap: f64,
) -> PhaseUpdate {
    let raw = state.ratio();
    let capped = raw > sre_cap;
    let drive = if capped { sre_cap } else { raw };

    state.phase += gamma * drive - damping * (state.phase - psi_target);
    state.hazard *= HAZARD_DECAY;

    PhaseUpdate { drive, capped }
}

// =============================================================================
// Score
// =============================================================================

/// Depth contribution for a score: `Z · rate` above the threshold, else zero.
pub fn depth_contribution(score: f64) -> f64 {
    if score > SCORE_THRESHOLD {
        score * DEPTH_RATE
    } else {
        0.0
    }
}
