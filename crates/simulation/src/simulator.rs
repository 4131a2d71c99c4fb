//! The simulator: immutable configuration plus the step loop.
//!
//! The random generator is passed into every run instead of living inside
//! the simulator. Reusing one generator across calls couples the runs;
//! giving each call a freshly seeded generator makes them replays.

use std::path::Path;

use dynamics::{ModelParams, ModelState, advance};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use types::{ConfigError, Depth, RunMode, Variant, ZqConfig};

use crate::hooks::{HookRunner, RunContext, StepRecord};

/// Generator used for all seeded runs.
pub type SimRng = ChaCha8Rng;

/// Runs the recurrence for a fixed configuration.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: ZqConfig,
    params: ModelParams,
}

impl Simulator {
    /// Build a simulator from a parsed configuration.
    pub fn new(config: ZqConfig) -> Self {
        let params = ModelParams::from_config(&config);
        Self { config, params }
    }

    /// Build a simulator from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        ZqConfig::from_toml_str(content).map(Self::new)
    }

    /// Build a simulator from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ZqConfig::load(path).map(Self::new)
    }

    pub fn config(&self) -> &ZqConfig {
        &self.config
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    /// Steps per run.
    pub fn steps(&self) -> u64 {
        self.config.step_count()
    }

    /// Configured seed.
    pub fn seed(&self) -> u64 {
        self.config.seed()
    }

    /// Fresh generator seeded from the configuration.
    pub fn seeded_rng(&self) -> SimRng {
        SimRng::seed_from_u64(self.seed())
    }

    /// Run once and return the accumulated depth.
    pub fn run<R: Rng>(&self, rng: &mut R, mode: RunMode) -> Depth {
        self.execute(rng, RunContext::new(mode, self.steps(), self.seed()), &HookRunner::new())
    }

    /// Run once, reporting every step to `hooks`.
    pub fn run_observed<R: Rng>(&self, rng: &mut R, mode: RunMode, hooks: &HookRunner) -> Depth {
        self.execute(rng, RunContext::new(mode, self.steps(), self.seed()), hooks)
    }

    /// Run a named variant, reporting every step to `hooks`.
    pub fn run_variant<R: Rng>(&self, rng: &mut R, variant: Variant, hooks: &HookRunner) -> Depth {
        let ctx = RunContext::new(variant.mode(), self.steps(), self.seed()).with_variant(variant);
        self.execute(rng, ctx, hooks)
    }

    fn execute<R: Rng>(&self, rng: &mut R, ctx: RunContext, hooks: &HookRunner) -> Depth {
        debug!(mode = %ctx.mode, steps = ctx.steps, variant = ?ctx.variant, "run started");
        hooks.on_run_start(&ctx);

        let mut state = ModelState::initial();
        let mut depth = Depth::ZERO;

        for step in 0..ctx.steps {
            let outcome = advance(&mut state, &self.params, ctx.mode, rng);
            depth += Depth(outcome.contribution);

            if !hooks.is_empty() {
                hooks.on_step(&StepRecord::new(step, state, &outcome, depth), &ctx);
            }
        }

        hooks.on_run_end(depth, &ctx);
        debug!(mode = %ctx.mode, depth = depth.value(), "run finished");
        depth
    }
}
