//! Business logic services (use cases).
//!
//! Services orchestrate repository and memory calls plus business rules.
//! They depend on traits (ports) -- never on concrete infrastructure
//! implementations.

pub mod room;
