//! Progress handler trait and events

use crate::api::Action;
use std::time::Duration;

/// Events emitted while a run progresses
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// The requested action has been resolved into a sequence of tasks
    RunStarted { action: Action, sequence: Vec<Action> },

    /// A task is about to generate and run its commands
    TaskStarted {
        action: Action,
        index: usize,
        total: usize,
    },

    /// An external command is about to be spawned
    CommandStarted { command: String },

    /// An external command exited
    CommandComplete {
        command: String,
        duration: Duration,
        success: bool,
    },

    /// All commands of a task ran successfully
    TaskComplete {
        action: Action,
        commands: usize,
        duration: Duration,
    },

    /// Every task in the sequence completed
    Completed { action: Action, total_time: Duration },

    /// The run stopped on an error
    Failed { error: String },
}

/// Trait for handling progress events during a run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
