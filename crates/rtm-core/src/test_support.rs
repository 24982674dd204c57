use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rtm_exec::{CommandOutput, CommandRunner, CommandSpec, ExecError};
use tokio_util::sync::CancellationToken;

type Script = dyn Fn(&CommandSpec) -> Result<CommandOutput, ExecError> + Send + Sync;

/// Runner that answers from a closure and records every spec it was given.
pub struct ScriptedRunner {
    script: Box<Script>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new<F>(script: F) -> Arc<Self>
    where
        F: Fn(&CommandSpec) -> Result<CommandOutput, ExecError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        spec: &CommandSpec,
        _cancel: &CancellationToken,
    ) -> Result<CommandOutput, ExecError> {
        self.calls.lock().unwrap().push(spec.clone());
        (self.script)(spec)
    }
}

pub fn ok(stdout: &str) -> Result<CommandOutput, ExecError> {
    Ok(CommandOutput {
        code: Some(0),
        stdout: stdout.as_bytes().to_vec(),
        stderr: Vec::new(),
    })
}

pub fn fail(code: i32, stderr: &str) -> Result<CommandOutput, ExecError> {
    Ok(CommandOutput {
        code: Some(code),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    })
}
