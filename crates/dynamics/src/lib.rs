//! Step mechanics for the Z(Q) simulation.
//!
//! One step of the model runs five stages in a fixed order:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  advance()                                   │
//! │                                              │
//! │  1. Energy   dE ~ N(0.04, 0.05) - hz·H       │
//! │  2. Cost     shock / drift / decline         │
//! │  3. Activity β·sin(Ψ) or N(0.02, 0.01)       │
//! │  4. Phase    capped drive, H decay (lock)    │
//! │  5. Score    Z = A·E/(C+H+ε) · cos²Ψ         │
//! │                                              │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Stages are pure functions over [`ModelState`] taking their random draws
//! as arguments; [`advance`] owns the draw order.

pub mod draws;
mod params;
pub mod stages;
mod state;
mod step;

pub use params::ModelParams;
pub use stages::CostBranch;
pub use state::ModelState;
pub use step::{StepOutcome, advance};
