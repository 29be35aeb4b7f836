//! Text-generation port.

pub mod client;
