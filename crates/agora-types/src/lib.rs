//! Shared domain types for Agora.
//!
//! Rooms, agents, transcript messages, memory items, the scenario catalog,
//! configuration and error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod agent;
pub mod config;
pub mod error;
pub mod id;
pub mod llm;
pub mod memory;
pub mod message;
pub mod room;
pub mod scenario;
