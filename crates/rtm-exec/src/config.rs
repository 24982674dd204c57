use std::time::Duration;

/// Tunables of [`crate::SubprocessRunner`].
#[derive(Debug, Clone, Copy)]
pub struct RunnerConfig {
    /// Extra time granted past a command's own timeout before the process is killed.
    ///
    /// Lets helm report its own timeout instead of being cut off mid-write.
    pub kill_grace: Duration,
    /// Max stderr bytes kept in error messages (tail is kept).
    pub max_error_bytes: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            kill_grace: Duration::from_secs(30),
            max_error_bytes: 4096,
        }
    }
}
