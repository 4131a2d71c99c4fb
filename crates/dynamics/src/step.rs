//! A single step of the recurrence.

use rand::Rng;
use rand_distr::Distribution;
use types::{COST_DECLINE, COST_DRIFT_PROBABILITY, RunMode};

use crate::draws::{ACTIVITY_DELTA, COST_DELTA, ENERGY_DELTA, uniform};
use crate::stages::{self, CostBranch};
use crate::{ModelParams, ModelState};

/// Everything a step produced besides the new state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Hazard memory entering the step.
    pub hazard_before: f64,
    /// Hazard memory added by the energy stage.
    pub hazard_added: f64,
    /// Energy delta after hazard drain.
    pub energy_delta: f64,
    /// Cost branch taken.
    pub cost_branch: CostBranch,
    /// Cost delta after the bias rule.
    pub cost_delta: f64,
    /// Activity delta.
    pub activity_delta: f64,
    /// Drive fed to the phase controller (phase lock only).
    pub drive: Option<f64>,
    /// The uncapped drive exceeded the safety cap.
    pub drive_capped: bool,
    /// Score Z from the post-update state.
    pub score: f64,
    /// Depth added this step.
    pub contribution: f64,
}

/// Advance `state` by one step.
///
/// Draw order: energy normal, shock uniform, then either the shock normal or
/// the drift uniform (followed by a drift normal only when drift fires), then
/// the activity normal unless phase lock is on.
pub fn advance<R: Rng>(
    state: &mut ModelState,
    params: &ModelParams,
    mode: RunMode,
    rng: &mut R,
) -> StepOutcome {
    let hazard_before = state.hazard;

    // 1. Energy
    let energy = stages::apply_energy(
        state,
        ENERGY_DELTA.sample(rng),
        params.effective_hazard_rate(mode),
        params.hazard_memory,
    );

    // 2. Cost
    let (cost_branch, raw_cost) = if uniform(rng) < params.shock_probability {
        (CostBranch::Shock, COST_DELTA.sample(rng) * params.shock_factor)
    } else if uniform(rng) < COST_DRIFT_PROBABILITY {
        (CostBranch::Drift, COST_DELTA.sample(rng))
    } else {
        (CostBranch::Decline, COST_DECLINE)
    };
    let cost_delta = stages::apply_cost(state, raw_cost, params.shock_bias);

    // 3. Activity
    let activity_delta = if mode.psi_lock {
        stages::locked_activity_delta(state, params.beta)
    } else {
        ACTIVITY_DELTA.sample(rng)
    };
    stages::apply_activity(state, activity_delta);

    // 4. Phase (lock only)
    let phase = mode.psi_lock.then(|| {
        stages::apply_phase(
            state,
            params.gamma,
            params.damping,
            params.psi_target,
            params.sre_cap,
        )
    });

    // 5. Score
    let score = state.score();

    StepOutcome {
        hazard_before,
        hazard_added: energy.hazard_added,
        energy_delta: energy.delta,
        cost_branch,
        cost_delta,
        activity_delta,
        drive: phase.map(|p| p.drive),
        drive_capped: phase.is_some_and(|p| p.capped),
        score,
        contribution: stages::depth_contribution(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use types::{FLOOR, HAZARD_DECAY, ZqConfig};

    fn params() -> ModelParams {
        ModelParams::from_config(&ZqConfig::default())
    }

    /// Replays the draw sequence by hand and checks the generator ends in
    /// the same position as after `advance`.
    fn assert_draw_order(mode: RunMode, shock_probability: f64) {
        let params = ModelParams {
            shock_probability,
            ..params()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut replay = rng.clone();

        let mut state = ModelState::initial();
        let outcome = advance(&mut state, &params, mode, &mut rng);

        let _energy = ENERGY_DELTA.sample(&mut replay);
        let shock = uniform(&mut replay) < shock_probability;
        assert_eq!(shock, outcome.cost_branch == CostBranch::Shock);
        if shock {
            COST_DELTA.sample(&mut replay);
        } else {
            let drift = uniform(&mut replay) < COST_DRIFT_PROBABILITY;
            assert_eq!(drift, outcome.cost_branch == CostBranch::Drift);
            if drift {
                COST_DELTA.sample(&mut replay);
            }
        }
        if !mode.psi_lock {
            ACTIVITY_DELTA.sample(&mut replay);
        }

        assert_eq!(rng.next_u64(), replay.next_u64());
    }

    #[test]
    fn test_draw_order_always_shock() {
        assert_draw_order(RunMode::BASELINE, 1.0);
        assert_draw_order(RunMode::COHERENCE_GATED, 1.0);
    }

    #[test]
    fn test_draw_order_never_shock() {
        for mode in [RunMode::BASELINE, RunMode::HAZARD_ONLY, RunMode::COHERENCE_GATED] {
            assert_draw_order(mode, 0.0);
        }
    }

    #[test]
    fn test_unlocked_step_keeps_phase_and_hazard() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut state = ModelState::initial();
        for _ in 0..200 {
            let before = state.hazard;
            let outcome = advance(&mut state, &params(), RunMode::HAZARD_ONLY, &mut rng);
            assert_eq!(state.phase, 0.0);
            assert!(outcome.drive.is_none());
            assert!((state.hazard - (before + outcome.hazard_added)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_locked_step_decays_hazard() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut state = ModelState::initial();
        for _ in 0..200 {
            let before = state.hazard;
            let outcome = advance(&mut state, &params(), RunMode::COHERENCE_GATED, &mut rng);
            let expected = (before + outcome.hazard_added) * HAZARD_DECAY;
            assert!((state.hazard - expected).abs() < 1e-12);
            assert!(state.hazard <= HAZARD_DECAY * before + outcome.hazard_added + 1e-12);
        }
    }

    #[test]
    fn test_floor_holds_under_heavy_hazard() {
        let params = ModelParams {
            hazard_rate: 0.5,
            hazard_memory: 1.0,
            ..params()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut state = ModelState::initial();
        for _ in 0..500 {
            advance(&mut state, &params, RunMode::HAZARD_ONLY, &mut rng);
            assert!(state.activity >= FLOOR);
            assert!(state.energy >= FLOOR);
            assert!(state.cost >= FLOOR);
            assert!(state.hazard >= 0.0);
        }
    }

    #[test]
    fn test_drive_never_exceeds_cap() {
        let params = ModelParams {
            sre_cap: 0.5,
            ..params()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut state = ModelState::initial();
        for _ in 0..500 {
            let outcome = advance(&mut state, &params, RunMode::COHERENCE_GATED, &mut rng);
            let drive = outcome.drive.unwrap();
            assert!(drive <= 0.5);
        }
    }
}
