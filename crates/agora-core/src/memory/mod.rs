//! Per-agent long-term memory ports.
//!
//! `MemoryStore` is what the turn engine talks to. `Embedder` is the
//! text-to-vector port used by vector-backed store implementations.

pub mod embedder;
pub mod store;
