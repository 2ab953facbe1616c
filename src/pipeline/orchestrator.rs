//! Runs a requested action with all of its prerequisites
//!
//! A run has two passes over the resolved sequence:
//!
//! 1. **Planning**: every task refines the settings and adds its locations to
//!    the environment. All configuration is validated here, so an invalid
//!    project fails before anything touches the filesystem or the network.
//! 2. **Execution**: every task generates its commands, which are executed
//!    before the next task generates its own.

use super::resolver::resolve;
use crate::api::Action;
use crate::config::RawConfig;
use crate::environment::Environment;
use crate::error::BobError;
use crate::exec::{CommandRunner, Executor, ProcessRunner};
use crate::options::{parse_options, Settings};
use crate::progress::{LoggingHandler, ProgressEvent, ProgressHandler};
use crate::tasks::{Task, TaskRegistry};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Result of the planning pass
pub struct Plan {
    pub action: Action,
    pub settings: Settings,
    pub environment: Environment,
    tasks: Vec<Arc<dyn Task>>,
}

impl Plan {
    /// The resolved sequence, requested action last
    pub fn actions(&self) -> Vec<Action> {
        self.tasks.iter().map(|t| t.action()).collect()
    }
}

pub struct Orchestrator<'a> {
    registry: &'a TaskRegistry,
    runner: &'a dyn CommandRunner,
    progress: &'a dyn ProgressHandler,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        registry: &'a TaskRegistry,
        runner: &'a dyn CommandRunner,
        progress: &'a dyn ProgressHandler,
    ) -> Self {
        Self {
            registry,
            runner,
            progress,
        }
    }

    /// Resolves the sequence and threads settings and environment through it
    pub fn plan(&self, action: Action, raw: &RawConfig, root: &Path) -> Result<Plan, BobError> {
        let sequence = resolve(self.registry, action)?;
        let mut settings = parse_options(raw)?;
        let mut environment = Environment::new(root);

        let mut tasks = Vec::with_capacity(sequence.len());
        for step in sequence {
            let task = self.registry.get(step)?;
            task.refine_options(raw, &mut settings)
                .map_err(BobError::task(step))?;
            task.extend_environment(&mut environment, &settings);
            tasks.push(task);
        }
        debug!("Settings after planning: {:?}", settings);
        debug!("Environment after planning: {:?}", environment);

        Ok(Plan {
            action,
            settings,
            environment,
            tasks,
        })
    }

    /// Generates and runs the commands of every planned task, in order
    pub fn execute(&self, plan: &Plan) -> Result<(), BobError> {
        let executor = Executor::new(self.runner, self.progress);
        let total = plan.tasks.len();

        for (index, task) in plan.tasks.iter().enumerate() {
            let action = task.action();
            self.progress.on_progress(&ProgressEvent::TaskStarted {
                action,
                index: index + 1,
                total,
            });

            let start = Instant::now();
            let commands = task
                .generate_commands(&plan.settings, &plan.environment)
                .map_err(BobError::task(action))?;
            for command in &commands {
                debug!("{}: {}", action, command);
            }
            executor.run_all(&commands)?;

            self.progress.on_progress(&ProgressEvent::TaskComplete {
                action,
                commands: commands.len(),
                duration: start.elapsed(),
            });
        }

        Ok(())
    }

    /// Plans and executes `action`, reporting the outcome as progress events
    pub fn run(&self, action: Action, raw: &RawConfig, root: &Path) -> Result<(), BobError> {
        let start = Instant::now();
        info!("Running {} in {}", action, root.display());

        let result = self.plan(action, raw, root).and_then(|plan| {
            self.progress.on_progress(&ProgressEvent::RunStarted {
                action,
                sequence: plan.actions(),
            });
            self.execute(&plan)
        });

        match &result {
            Ok(()) => self.progress.on_progress(&ProgressEvent::Completed {
                action,
                total_time: start.elapsed(),
            }),
            Err(e) => self.progress.on_progress(&ProgressEvent::Failed { error: e.chain() }),
        }

        result
    }
}

/// Runs `action` for the project at `root` with the built-in tasks, spawning
/// real processes
pub fn bob(action: Action, raw: &RawConfig, root: &Path) -> Result<(), BobError> {
    let registry = TaskRegistry::with_defaults();
    let runner = ProcessRunner::new(root);
    Orchestrator::new(&registry, &runner, &LoggingHandler).run(action, raw, root)
}
