//! External process plumbing for the runtime service.
//!
//! - [`CommandSpec`] describes one invocation (program, ordered args, timeout).
//! - [`HelmCli`] builds the helm invocations as pure values.
//! - [`CommandRunner`] executes a spec; [`SubprocessRunner`] is the real one.
mod error;
pub use error::ExecError;

mod command;
pub use command::{CommandOutput, CommandSpec};

mod config;
pub use config::RunnerConfig;

mod helm;
pub use helm::{HelmCli, is_release_missing};

mod runner;
pub use runner::{CommandRunner, SubprocessRunner};
