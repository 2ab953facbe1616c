//! Task registry

use super::{BootstrapTask, BuildTask, ConfigureTask, InstallTask, Task};
use crate::api::Action;
use crate::fetch::{Fetcher, HttpFetcher};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("No corresponding task for {0}")]
    NotFound(Action),
}

/// Maps each action to the task implementing it
#[derive(Clone)]
pub struct TaskRegistry {
    tasks: Vec<Arc<dyn Task>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// All built-in tasks, downloading toolchains over HTTP
    pub fn with_defaults() -> Self {
        Self::with_fetcher(Arc::new(HttpFetcher::new()))
    }

    /// All built-in tasks, downloading toolchains through `fetcher`
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(BootstrapTask::new(fetcher)));
        registry.register(Arc::new(ConfigureTask));
        registry.register(Arc::new(BuildTask));
        registry.register(Arc::new(InstallTask));
        registry
    }

    /// Adds a task, replacing any task registered for the same action
    pub fn register(&mut self, task: Arc<dyn Task>) {
        let action = task.action();
        self.tasks.retain(|t| t.action() != action);
        self.tasks.push(task);
    }

    pub fn get(&self, action: Action) -> Result<Arc<dyn Task>, RegistryError> {
        self.tasks
            .iter()
            .find(|t| t.action() == action)
            .cloned()
            .ok_or(RegistryError::NotFound(action))
    }

    pub fn actions(&self) -> Vec<Action> {
        self.tasks.iter().map(|t| t.action()).collect()
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
