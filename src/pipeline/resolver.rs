//! Expands a requested action into the ordered sequence of actions to run

use crate::api::Action;
use crate::tasks::{RegistryError, TaskRegistry};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Dependency cycle between tasks: {}", format_path(.path))]
    Cycle { path: Vec<Action> },
}

fn format_path(path: &[Action]) -> String {
    path.iter()
        .map(|a| a.name())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Orders `requested` and everything it depends on
///
/// Every prerequisite comes before the actions depending on it, each action
/// appears once, and `requested` is last.
pub fn resolve(registry: &TaskRegistry, requested: Action) -> Result<Vec<Action>, ResolveError> {
    let mut scanned = Vec::new();
    let mut path = Vec::new();
    scan(registry, requested, &mut path, &mut scanned)?;

    // Reversed pre-order puts every dependency before its first dependent
    let mut sequence = Vec::with_capacity(scanned.len());
    for action in scanned.into_iter().rev() {
        if !sequence.contains(&action) {
            sequence.push(action);
        }
    }

    debug!("Resolved {} into {}", requested, format_path(&sequence));
    Ok(sequence)
}

fn scan(
    registry: &TaskRegistry,
    action: Action,
    path: &mut Vec<Action>,
    scanned: &mut Vec<Action>,
) -> Result<(), ResolveError> {
    if path.contains(&action) {
        let mut cycle = path.clone();
        cycle.push(action);
        return Err(ResolveError::Cycle { path: cycle });
    }

    let task = registry.get(action)?;
    scanned.push(action);
    path.push(action);
    for dependency in task.depends_on() {
        scan(registry, dependency, path, scanned)?;
    }
    path.pop();

    Ok(())
}
