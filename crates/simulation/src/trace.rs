//! TraceHook - keeps the step records of the latest run of each variant.

use std::collections::HashMap;

use parking_lot::Mutex;
use types::Variant;

use crate::hooks::{RunContext, SimulationHook, StepRecord};

/// Trace buffer key. Runs started outside an experiment have no variant.
type TraceKey = Option<Variant>;

/// Keys in the order [`TraceHook::records`] concatenates them.
const KEY_ORDER: [TraceKey; 4] = [
    None,
    Some(Variant::Baseline),
    Some(Variant::HazardOnly),
    Some(Variant::CoherenceGated),
];

/// Records per-step snapshots for export or offline checks.
///
/// Records are buffered per variant, so runs executing in parallel against
/// the same hook never interleave. A new run of a variant replaces that
/// variant's previous trace. Each buffer is bounded by `max_history`; later
/// steps are dropped once full.
#[derive(Debug)]
pub struct TraceHook {
    filter: Option<Variant>,
    traces: Mutex<HashMap<TraceKey, Vec<StepRecord>>>,
    max_history: usize,
}

impl TraceHook {
    /// Trace every run with default history.
    pub fn new() -> Self {
        Self::with_max_history(100_000)
    }

    /// Trace every run with a custom history limit.
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            filter: None,
            traces: Mutex::new(HashMap::new()),
            max_history,
        }
    }

    /// Only trace runs started for `variant`.
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            filter: Some(variant),
            ..Self::new()
        }
    }

    /// All traced steps: unlabelled runs first, then variants in experiment
    /// order.
    pub fn records(&self) -> Vec<StepRecord> {
        let traces = self.traces.lock();
        KEY_ORDER
            .iter()
            .filter_map(|key| traces.get(key))
            .flatten()
            .copied()
            .collect()
    }

    /// Steps traced for one variant's latest run.
    pub fn records_for(&self, variant: Variant) -> Vec<StepRecord> {
        self.traces
            .lock()
            .get(&Some(variant))
            .cloned()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.traces.lock().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn matches(&self, ctx: &RunContext) -> bool {
        self.filter.is_none() || self.filter == ctx.variant
    }
}

impl Default for TraceHook {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationHook for TraceHook {
    fn name(&self) -> &str {
        "Trace"
    }

    fn on_run_start(&self, ctx: &RunContext) {
        if self.matches(ctx) {
            let capacity = ctx.steps.min(self.max_history as u64) as usize;
            self.traces
                .lock()
                .insert(ctx.variant, Vec::with_capacity(capacity));
        }
    }

    fn on_step(&self, record: &StepRecord, ctx: &RunContext) {
        if !self.matches(ctx) {
            return;
        }
        let mut traces = self.traces.lock();
        let trace = traces.entry(ctx.variant).or_default();
        if trace.len() < self.max_history {
            trace.push(*record);
        }
    }
}
