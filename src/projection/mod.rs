//! Growth projection: phase simulation, scenario paths and strategy evaluation

mod phase;
mod path;
mod engine;

pub use phase::{simulate_phase, PhaseInputs, PhaseSimulator, Snapshot};
pub use path::{Phase, ScenarioPath, TraceRow};
pub use engine::{EngineConfig, ScenarioEngine};
