//! Observer hooks for simulation runs.
//!
//! Hooks borrow a per-step snapshot and cannot modify the run.
//! The step loop only builds records when at least one hook is registered.
//!
//! # Lifecycle
//!
//! ```text
//! Simulator::run_observed()
//!   │
//!   ├─ on_run_start()        ← before the first step
//!   │
//!   ├─ on_step() × steps     ← after stage 5 of every step
//!   │
//!   └─ on_run_end()          ← with the final depth
//! ```
//!
//! # Example
//!
//! ```ignore
//! use simulation::{HookRunner, MetricsHook, Simulator};
//! use std::sync::Arc;
//!
//! let sim = Simulator::new(types::ZqConfig::default());
//! let metrics = Arc::new(MetricsHook::new());
//! let mut hooks = HookRunner::new();
//! hooks.add(metrics.clone());
//!
//! let mut rng = sim.seeded_rng();
//! sim.run_observed(&mut rng, types::RunMode::COHERENCE_GATED, &hooks);
//! println!("scoring steps: {}", metrics.snapshot().scoring_steps);
//! ```

use std::sync::Arc;

use dynamics::{CostBranch, ModelState, StepOutcome};
use serde::Serialize;
use types::{Depth, RunMode, Variant};

// ─────────────────────────────────────────────────────────────────────────────
// Run Context / Step Record
// ─────────────────────────────────────────────────────────────────────────────

/// Identifies the run a hook is observing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunContext {
    /// Named variant, when the run was started through one.
    pub variant: Option<Variant>,
    /// Switches in effect.
    pub mode: RunMode,
    /// Steps the run will execute.
    pub steps: u64,
    /// Configured seed.
    pub seed: u64,
}

impl RunContext {
    pub fn new(mode: RunMode, steps: u64, seed: u64) -> Self {
        Self {
            variant: None,
            mode,
            steps,
            seed,
        }
    }

    /// Attach a variant.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }
}

/// Snapshot of one completed step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepRecord {
    /// Zero-based step index.
    pub step: u64,
    /// Post-update state.
    pub state: ModelState,
    /// Hazard memory entering the step.
    pub hazard_before: f64,
    /// Hazard memory added by negative energy excursions.
    pub hazard_added: f64,
    /// Cost branch taken.
    pub cost_branch: CostBranch,
    /// Drive fed to the phase controller (phase lock only).
    pub drive: Option<f64>,
    /// Uncapped drive exceeded the safety cap.
    pub drive_capped: bool,
    /// Score Z.
    pub score: f64,
    /// Depth added this step.
    pub contribution: f64,
    /// Running depth after this step.
    pub depth: Depth,
}

impl StepRecord {
    pub fn new(step: u64, state: ModelState, outcome: &StepOutcome, depth: Depth) -> Self {
        Self {
            step,
            state,
            hazard_before: outcome.hazard_before,
            hazard_added: outcome.hazard_added,
            cost_branch: outcome.cost_branch,
            drive: outcome.drive,
            drive_capped: outcome.drive_capped,
            score: outcome.score,
            contribution: outcome.contribution,
            depth,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SimulationHook Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for run observers.
///
/// Hooks must be `Send + Sync`: independent experiment runs may execute in
/// parallel against the same hooks. Use interior mutability for hook state.
pub trait SimulationHook: Send + Sync {
    /// Human-readable name for logging and debugging.
    fn name(&self) -> &str;

    /// Called once before the first step.
    #[allow(unused_variables)]
    fn on_run_start(&self, ctx: &RunContext) {}

    /// Called after every step.
    #[allow(unused_variables)]
    fn on_step(&self, record: &StepRecord, ctx: &RunContext) {}

    /// Called once with the final depth.
    #[allow(unused_variables)]
    fn on_run_end(&self, depth: Depth, ctx: &RunContext) {}
}

// ─────────────────────────────────────────────────────────────────────────────
// HookRunner
// ─────────────────────────────────────────────────────────────────────────────

/// Registered hooks, invoked in registration order.
#[derive(Default, Clone)]
pub struct HookRunner {
    hooks: Vec<Arc<dyn SimulationHook>>,
}

impl HookRunner {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Register a hook.
    pub fn add(&mut self, hook: Arc<dyn SimulationHook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Hook names for debugging.
    pub fn hook_names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    pub fn on_run_start(&self, ctx: &RunContext) {
        for hook in &self.hooks {
            hook.on_run_start(ctx);
        }
    }

    pub fn on_step(&self, record: &StepRecord, ctx: &RunContext) {
        for hook in &self.hooks {
            hook.on_step(record, ctx);
        }
    }

    pub fn on_run_end(&self, depth: Depth, ctx: &RunContext) {
        for hook in &self.hooks {
            hook.on_run_end(depth, ctx);
        }
    }
}

impl std::fmt::Debug for HookRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRunner")
            .field("hooks", &self.hook_names())
            .finish()
    }
}

/// A hook that does nothing.
#[derive(Debug, Default)]
pub struct NoOpHook;

impl SimulationHook for NoOpHook {
    fn name(&self) -> &str {
        "NoOp"
    }
}
