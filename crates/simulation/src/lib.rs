//! Simulation crate: runs the Z(Q) recurrence and the three-variant experiment.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Experiment.run()                            │
//! │                                              │
//! │  Baseline ──► Hazard-Only ──► Z(Q)           │
//! │     │             │             │            │
//! │     └─────── Simulator::run_variant ───┐     │
//! │                                        ▼     │
//! │               for step in 0..steps:          │
//! │                 dynamics::advance()          │
//! │                 depth += contribution        │
//! │                 hooks.on_step(&record)       │
//! │                                              │
//! │  gain = depth(Z(Q)) / depth(Baseline)        │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use simulation::{Experiment, Simulator};
//!
//! let sim = Simulator::load("configs/default.toml")?;
//! let report = Experiment::new(sim).run();
//! println!("gain: {:?}", report.gain);
//! ```

mod experiment;
mod hooks;
mod metrics;
pub mod parallel;
mod simulator;
mod trace;

pub use experiment::{Experiment, ExperimentReport, RngSharing, VariantOutcome};
pub use hooks::{HookRunner, NoOpHook, RunContext, SimulationHook, StepRecord};
pub use metrics::{MetricsHook, MetricsSnapshot};
pub use simulator::{SimRng, Simulator};
pub use trace::TraceHook;
