//! Adapter implementations for the ports.
//!
//! - `heuristic`: the offline rule engine.
//! - `hosted`: chat-completion backends (GitHub Models, Foundry, OpenAI-compatible).
//! - `live`: real network and clock.
//! - `canned`: scripted in-memory stand-ins.

pub mod canned;
pub mod heuristic;
pub mod hosted;
pub mod live;
