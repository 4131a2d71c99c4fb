//! Configuration document for the simulation.
//!
//! The document is grouped into sections mirroring the TOML layout:
//!
//! ```toml
//! [simulation]
//! steps = 500
//! seed = 42
//!
//! [dynamics]
//! hazard_rate = 0.05
//! hazard_memory = 0.9
//! # ...
//! ```
//!
//! Every field is required. A missing or non-numeric field fails parsing
//! with a [`ConfigError`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// =============================================================================
// Sections
// =============================================================================

/// Loop control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSection {
    /// Number of steps per run. Values `<= 0` produce an empty run.
    pub steps: i64,
    /// Seed for the run generator.
    pub seed: u64,
}

/// Hazard coupling between energy and hazard memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicsSection {
    /// Energy drain per unit of hazard memory when hazard is on.
    pub hazard_rate: f64,
    /// Fraction of each negative energy excursion retained in hazard memory.
    pub hazard_memory: f64,
}

/// Phase controller parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatingSection {
    /// Target phase in degrees.
    pub psi_target_deg: f64,
    /// Gain on the capped drive signal.
    pub gamma: f64,
    /// Pull of the phase toward its target.
    pub damping: f64,
}

impl GatingSection {
    /// Target phase in radians.
    pub fn psi_target_rad(&self) -> f64 {
        self.psi_target_deg.to_radians()
    }
}

/// Score parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZParamsSection {
    /// Amplitude of the phase-driven activity update.
    pub beta: f64,
}

/// Cost shock injection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostShockSection {
    /// Probability of a shock each step.
    pub probability: f64,
    /// Multiplier applied to the shock draw.
    pub shock_factor: f64,
    /// Deltas above this are halved.
    pub shock_bias: f64,
}

/// Safety limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetySection {
    /// Upper clamp on the drive signal feeding the phase update.
    pub sre_cap: f64,
}

// =============================================================================
// ZqConfig
// =============================================================================

/// Full simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZqConfig {
    pub simulation: SimulationSection,
    pub dynamics: DynamicsSection,
    pub gating: GatingSection,
    pub z_params: ZParamsSection,
    pub c_shock: CostShockSection,
    pub safety: SafetySection,
}

impl Default for ZqConfig {
    /// Parameters of the bundled `configs/default.toml`.
    fn default() -> Self {
        Self {
            simulation: SimulationSection {
                steps: 500,
                seed: 42,
            },
            dynamics: DynamicsSection {
                hazard_rate: 0.05,
                hazard_memory: 0.9,
            },
            gating: GatingSection {
                psi_target_deg: 0.0,
                gamma: 0.05,
                damping: 0.1,
            },
            z_params: ZParamsSection { beta: 0.05 },
            c_shock: CostShockSection {
                probability: 0.05,
                shock_factor: 4.0,
                shock_bias: 0.05,
            },
            safety: SafetySection { sre_cap: 5.0 },
        }
    }
}

impl ZqConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Number of steps a run executes (negative counts run nothing).
    pub fn step_count(&self) -> u64 {
        self.simulation.steps.max(0) as u64
    }

    /// Seed for the run generator.
    pub fn seed(&self) -> u64 {
        self.simulation.seed
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder-style overrides
    // ─────────────────────────────────────────────────────────────────────────

    /// Override the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.simulation.seed = seed;
        self
    }

    /// Override the step count.
    pub fn with_steps(mut self, steps: i64) -> Self {
        self.simulation.steps = steps;
        self
    }

    /// Override the hazard rate.
    pub fn with_hazard_rate(mut self, hazard_rate: f64) -> Self {
        self.dynamics.hazard_rate = hazard_rate;
        self
    }

    /// Override the drive cap.
    pub fn with_sre_cap(mut self, sre_cap: f64) -> Self {
        self.safety.sre_cap = sre_cap;
        self
    }

    /// Override the shock probability.
    pub fn with_shock_probability(mut self, probability: f64) -> Self {
        self.c_shock.probability = probability;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
        [simulation]
        steps = 500
        seed = 42

        [dynamics]
        hazard_rate = 0.05
        hazard_memory = 0.9

        [gating]
        psi_target_deg = 90
        gamma = 0.05
        damping = 0.1

        [z_params]
        beta = 0.05

        [c_shock]
        probability = 0.05
        shock_factor = 4.0
        shock_bias = 0.05

        [safety]
        sre_cap = 5.0
    "#;

    #[test]
    fn test_parse_full_document() {
        let config = ZqConfig::from_toml_str(FULL).unwrap();
        assert_eq!(config.step_count(), 500);
        assert_eq!(config.seed(), 42);
        // Integers are accepted for float fields
        assert_eq!(config.gating.psi_target_deg, 90.0);
        assert!((config.gating.psi_target_rad() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_missing_field_is_error() {
        let without_cap = FULL.replace("sre_cap = 5.0", "");
        let err = ZqConfig::from_toml_str(&without_cap).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("sre_cap"));
    }

    #[test]
    fn test_missing_section_is_error() {
        let without_safety = FULL.replace("[safety]", "").replace("sre_cap = 5.0", "");
        assert!(ZqConfig::from_toml_str(&without_safety).is_err());
    }

    #[test]
    fn test_non_numeric_field_is_error() {
        let bad = FULL.replace("gamma = 0.05", "gamma = \"fast\"");
        assert!(matches!(
            ZqConfig::from_toml_str(&bad),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_negative_steps_run_nothing() {
        let config = ZqConfig::default().with_steps(-3);
        assert_eq!(config.step_count(), 0);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ZqConfig::load("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = toml::to_string(&ZqConfig::default()).unwrap();
        assert_eq!(ZqConfig::from_toml_str(&text).unwrap(), ZqConfig::default());
    }
}
