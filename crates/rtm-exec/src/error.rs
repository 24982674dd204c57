use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("invalid command specification: {0}")]
    InvalidSpec(String),

    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' did not finish within {after_ms}ms")]
    Timeout { program: String, after_ms: u64 },

    #[error("'{program}' exited with {}: {stderr}", exit_label(.code))]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("invocation canceled")]
    Canceled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "signal".to_string(),
    }
}
