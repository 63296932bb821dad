//! Application layer - the transition engine orchestrating the ports.

mod engine;

pub use engine::{AuthTransitionEngine, EngineError, EngineRoutes, Outcome};
