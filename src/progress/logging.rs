//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::RunStarted { action, sequence } => {
                let names: Vec<&str> = sequence.iter().map(|a| a.name()).collect();
                info!(action = %action, sequence = %names.join(" -> "), "Starting run");
            }
            ProgressEvent::TaskStarted {
                action,
                index,
                total,
            } => {
                info!(
                    task = %action,
                    progress = format!("{}/{}", index, total),
                    "Running task"
                );
            }
            ProgressEvent::CommandStarted { command } => {
                info!(command = %command, "Running command");
            }
            ProgressEvent::CommandComplete {
                command,
                duration,
                success,
            } => {
                if *success {
                    debug!(
                        command = %command,
                        duration_ms = duration.as_millis(),
                        "Command complete"
                    );
                } else {
                    warn!(
                        command = %command,
                        duration_ms = duration.as_millis(),
                        "Command failed"
                    );
                }
            }
            ProgressEvent::TaskComplete {
                action,
                commands,
                duration,
            } => {
                debug!(
                    task = %action,
                    commands,
                    duration_ms = duration.as_millis(),
                    "Task complete"
                );
            }
            ProgressEvent::Completed { action, total_time } => {
                info!(
                    action = %action,
                    total_time_ms = total_time.as_millis(),
                    "Run complete"
                );
            }
            ProgressEvent::Failed { error } => {
                warn!(error = %error, "Run failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Action;
    use std::time::Duration;

    #[test]
    fn test_logging_all_events() {
        let handler = LoggingHandler;

        let events = vec![
            ProgressEvent::RunStarted {
                action: Action::Install,
                sequence: Action::all_variants().to_vec(),
            },
            ProgressEvent::TaskStarted {
                action: Action::Bootstrap,
                index: 1,
                total: 4,
            },
            ProgressEvent::CommandStarted {
                command: "cmake -E make_directory cmake".to_string(),
            },
            ProgressEvent::CommandComplete {
                command: "cmake -E make_directory cmake".to_string(),
                duration: Duration::from_millis(10),
                success: true,
            },
            ProgressEvent::CommandComplete {
                command: "git clone x y".to_string(),
                duration: Duration::from_millis(10),
                success: false,
            },
            ProgressEvent::TaskComplete {
                action: Action::Bootstrap,
                commands: 2,
                duration: Duration::from_millis(20),
            },
            ProgressEvent::Completed {
                action: Action::Install,
                total_time: Duration::from_secs(5),
            },
            ProgressEvent::Failed {
                error: "Test error".to_string(),
            },
        ];

        for event in events {
            handler.on_progress(&event);
        }
    }
}
