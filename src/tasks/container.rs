//! Container wrapper prepended to build system commands

use crate::options::Settings;
use std::path::Path;

/// Mount point of the project root inside the container
pub const WORK_DIR: &str = "/work/";

/// `docker run` prefix for the active container, or nothing
pub fn container_prefix(settings: &Settings, root: &Path) -> Vec<String> {
    match settings.active_container() {
        Some(image) => vec![
            "docker".to_string(),
            "run".to_string(),
            "--rm".to_string(),
            "-v".to_string(),
            format!("{}:{}", root.display(), WORK_DIR),
            image.to_string(),
        ],
        None => Vec::new(),
    }
}

/// Prepends the container prefix (if any) to `command`, producing one vector
pub fn wrap<I, S>(settings: &Settings, root: &Path, command: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut steps = container_prefix(settings, root);
    steps.extend(command.into_iter().map(Into::into));
    steps
}
