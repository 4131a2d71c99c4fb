//! Three-variant experiment: Baseline, Hazard-Only, then Z(Q).
//!
//! # Generator sharing
//!
//! - [`RngSharing::Shared`]: one generator, seeded once, consumed by the
//!   three runs in order. Each run starts where the previous one stopped, so
//!   only the first run is a clean replay of the seed.
//! - [`RngSharing::Independent`]: every run gets its own generator seeded
//!   identically. Runs are order-independent and may execute in parallel.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};
use types::{Depth, Variant};

use crate::hooks::{HookRunner, SimulationHook};
use crate::parallel;
use crate::simulator::Simulator;

/// How the experiment's runs obtain their generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RngSharing {
    #[default]
    Shared,
    Independent,
}

/// Depth of one variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VariantOutcome {
    pub variant: Variant,
    pub label: &'static str,
    pub depth: Depth,
}

/// Result of a full experiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentReport {
    pub seed: u64,
    pub steps: u64,
    pub sharing: RngSharing,
    /// One outcome per variant, in experiment order.
    pub outcomes: Vec<VariantOutcome>,
    /// Z(Q) depth over baseline depth; `None` when baseline depth is zero.
    pub gain: Option<f64>,
}

impl ExperimentReport {
    /// Depth for a variant.
    pub fn depth(&self, variant: Variant) -> Option<Depth> {
        self.outcomes
            .iter()
            .find(|o| o.variant == variant)
            .map(|o| o.depth)
    }
}

/// Runs every [`Variant`] against one simulator.
#[derive(Debug)]
pub struct Experiment {
    simulator: Simulator,
    sharing: RngSharing,
    force_sequential: bool,
    hooks: HookRunner,
}

impl Experiment {
    pub fn new(simulator: Simulator) -> Self {
        Self {
            simulator,
            sharing: RngSharing::default(),
            force_sequential: false,
            hooks: HookRunner::new(),
        }
    }

    /// Set generator sharing.
    pub fn with_sharing(mut self, sharing: RngSharing) -> Self {
        self.sharing = sharing;
        self
    }

    /// Disable parallel execution of independent runs.
    pub fn with_sequential(mut self, force_sequential: bool) -> Self {
        self.force_sequential = force_sequential;
        self
    }

    /// Register a hook observing every run.
    pub fn add_hook(&mut self, hook: Arc<dyn SimulationHook>) {
        self.hooks.add(hook);
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    /// Run all variants and compute the gain.
    pub fn run(&self) -> ExperimentReport {
        let sim = &self.simulator;
        let hooks = &self.hooks;

        let depths: Vec<Depth> = match self.sharing {
            RngSharing::Shared => {
                let mut rng = sim.seeded_rng();
                Variant::ALL
                    .iter()
                    .map(|&variant| sim.run_variant(&mut rng, variant, hooks))
                    .collect()
            }
            RngSharing::Independent => parallel::map_variants(
                &Variant::ALL,
                |variant| sim.run_variant(&mut sim.seeded_rng(), variant, hooks),
                self.force_sequential,
            ),
        };

        let outcomes: Vec<VariantOutcome> = Variant::ALL
            .iter()
            .zip(depths)
            .map(|(&variant, depth)| VariantOutcome {
                variant,
                label: variant.label(),
                depth,
            })
            .collect();

        let report = ExperimentReport {
            seed: sim.seed(),
            steps: sim.steps(),
            sharing: self.sharing,
            gain: gain(&outcomes),
            outcomes,
        };

        if report.gain.is_none() {
            warn!(seed = report.seed, "baseline depth is zero; gain undefined");
        }
        debug!(sharing = ?report.sharing, gain = ?report.gain, "experiment finished");
        report
    }
}

fn gain(outcomes: &[VariantOutcome]) -> Option<f64> {
    let depth_of = |variant: Variant| {
        outcomes
            .iter()
            .find(|o| o.variant == variant)
            .map(|o| o.depth)
    };
    depth_of(Variant::CoherenceGated)?.ratio_to(depth_of(Variant::Baseline)?)
}
