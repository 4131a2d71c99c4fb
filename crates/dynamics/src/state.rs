//! Model state carried across steps of a single run.

use serde::Serialize;
use types::EPS;

/// State variables of one run.
///
/// Created fresh by every run; nothing here outlives the loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelState {
    /// Activity (A).
    pub activity: f64,
    /// Energy (E).
    pub energy: f64,
    /// Cost (C).
    pub cost: f64,
    /// Hazard memory (H).
    pub hazard: f64,
    /// Phase (Ψ) in radians.
    pub phase: f64,
}

impl ModelState {
    /// `A = E = C = 1`, no hazard memory, zero phase.
    pub fn initial() -> Self {
        Self {
            activity: 1.0,
            energy: 1.0,
            cost: 1.0,
            hazard: 0.0,
            phase: 0.0,
        }
    }

    /// A·E / (C + H + ε).
    pub fn ratio(&self) -> f64 {
        self.activity * self.energy / (self.cost + self.hazard + EPS)
    }

    /// Instantaneous score Z = ratio · cos²Ψ.
    pub fn score(&self) -> f64 {
        self.ratio() * self.phase.cos().powi(2)
    }
}

impl Default for ModelState {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_score() {
        let state = ModelState::initial();
        // 1·1 / (1 + 0 + ε) · cos²0
        assert!((state.score() - 1.0 / (1.0 + EPS)).abs() < 1e-12);
    }

    #[test]
    fn test_score_vanishes_at_quarter_phase() {
        let state = ModelState {
            phase: std::f64::consts::FRAC_PI_2,
            ..ModelState::initial()
        };
        assert!(state.score().abs() < 1e-12);
        assert!(state.ratio() > 0.99);
    }

    #[test]
    fn test_ratio_guarded_at_zero_denominator() {
        let state = ModelState {
            cost: 0.0,
            hazard: 0.0,
            ..ModelState::initial()
        };
        assert!(state.ratio().is_finite());
    }
}
