pub mod commands;
pub mod handlers;

pub use commands::{CliArgs, Commands, TargetArgs};
pub use handlers::handle;
