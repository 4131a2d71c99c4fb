//! Parameters resolved from configuration once per simulator.

use types::{RunMode, ZqConfig};

/// Flat, immutable parameter set used by the step stages.
///
/// The target phase is stored in radians.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParams {
    pub hazard_rate: f64,
    pub hazard_memory: f64,
    pub psi_target: f64,
    pub gamma: f64,
    pub damping: f64,
    pub beta: f64,
    pub shock_probability: f64,
    pub shock_factor: f64,
    pub shock_bias: f64,
    pub sre_cap: f64,
}

impl ModelParams {
    /// Resolve parameters from a configuration document.
    pub fn from_config(config: &ZqConfig) -> Self {
        Self {
            hazard_rate: config.dynamics.hazard_rate,
            hazard_memory: config.dynamics.hazard_memory,
            psi_target: config.gating.psi_target_rad(),
            gamma: config.gating.gamma,
            damping: config.gating.damping,
            beta: config.z_params.beta,
            shock_probability: config.c_shock.probability,
            shock_factor: config.c_shock.shock_factor,
            shock_bias: config.c_shock.shock_bias,
            sre_cap: config.safety.sre_cap,
        }
    }

    /// Hazard drain rate for a run: zero unless hazard is on.
    pub fn effective_hazard_rate(&self, mode: RunMode) -> f64 {
        if mode.hazard_on {
            self.hazard_rate
        } else {
            0.0
        }
    }
}

impl From<&ZqConfig> for ModelParams {
    fn from(config: &ZqConfig) -> Self {
        Self::from_config(config)
    }
}
