//! Build the configured codebase

use super::container::wrap;
use super::{Task, TaskError};
use crate::api::{Action, CommandVector};
use crate::environment::Environment;
use crate::options::Settings;

pub struct BuildTask;

impl Task for BuildTask {
    fn action(&self) -> Action {
        Action::Build
    }

    fn depends_on(&self) -> Vec<Action> {
        vec![Action::Configure]
    }

    fn generate_commands(
        &self,
        settings: &Settings,
        env: &Environment,
    ) -> Result<Vec<CommandVector>, TaskError> {
        let build_path = env.build_path()?.to_string_lossy().into_owned();

        Ok(vec![CommandVector::new(wrap(
            settings,
            &env.root_path,
            ["cmake".to_string(), "--build".to_string(), build_path],
        ))])
    }
}
