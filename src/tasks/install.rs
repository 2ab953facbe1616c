//! Install the build output

use super::container::wrap;
use super::{Task, TaskError};
use crate::api::{Action, CommandVector};
use crate::environment::Environment;
use crate::options::Settings;

pub struct InstallTask;

impl Task for InstallTask {
    fn action(&self) -> Action {
        Action::Install
    }

    fn depends_on(&self) -> Vec<Action> {
        vec![Action::Build]
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
            ["cmake".to_string(), "--install".to_string(), build_path],
        ))])
    }
}
