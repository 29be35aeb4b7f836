//! The turn engine: speaker selection, prompt assembly, turn orchestration
//! and the judge pass.

pub mod judge;
pub mod lock;
pub mod orchestrator;
pub mod prompt;
pub mod speaker;
