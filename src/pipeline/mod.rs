//! Action pipeline: dependency resolution and the planning/execution passes

pub mod orchestrator;
pub mod resolver;

pub use orchestrator::{bob, Orchestrator, Plan};
pub use resolver::{resolve, ResolveError};
