use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::{LoggerFormat, LoggerLevel, LoggerTimeZone};

/// Logger configuration, usually the `logger` section of the service config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// Filter expression, e.g. `"info"` or `"rtm_core=debug,info"`.
    pub level: LoggerLevel,
    /// Timezone of log timestamps.
    pub tz: LoggerTimeZone,
    /// Include the event target (module path) in text and json output.
    pub with_targets: bool,
    /// Colored text output; ignored unless stdout is a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Color is used only when requested and stdout is a terminal.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.format, LoggerFormat::Text);
        assert_eq!(config.tz, LoggerTimeZone::Utc);
        assert_eq!(config.level.as_str(), "info");
        assert!(config.with_targets);
        assert!(config.use_color);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: LoggerConfig =
            serde_json::from_str(r#"{"format": "json", "level": "rtm_core=debug,info"}"#).unwrap();
        assert_eq!(config.format, LoggerFormat::Json);
        assert_eq!(config.level.as_str(), "rtm_core=debug,info");
        assert_eq!(config.tz, LoggerTimeZone::Utc);
        assert!(config.with_targets);
    }

    #[test]
    fn invalid_level_fails_deserialization() {
        let err = serde_json::from_str::<LoggerConfig>(r#"{"level": "rtm_core=loud"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let config = LoggerConfig {
            format: LoggerFormat::Json,
            level: "warn".parse().unwrap(),
            tz: LoggerTimeZone::Local,
            with_targets: false,
            use_color: false,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<LoggerConfig>(&json).unwrap(), config);
    }
}
