//! Application Layer - Pipeline coordination

pub mod engine;

pub use engine::{EngineError, EngineStatus, RankedIdeas, SignalEngine};
