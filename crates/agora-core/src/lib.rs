//! Turn engine and repository trait definitions for Agora.
//!
//! This crate defines the "ports" (repository, memory and generation traits)
//! that the infrastructure layer implements, plus the logic built on them:
//! speaker selection, prompt assembly, turn orchestration, the judge pass
//! and room management. It depends only on `agora-types` -- never on
//! `agora-infra` or any database/IO crate.

pub mod export;
pub mod llm;
pub mod memory;
pub mod repository;
pub mod service;
pub mod simulation;

#[cfg(test)]
pub(crate) mod testing;
