use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_HELM_TIMEOUT, ModelError};

/// Per-invocation timeout in helm's (Go) duration syntax.
///
/// The raw text is handed to helm verbatim via `--timeout`; the parsed
/// [`Duration`] bounds the subprocess on our side.
///
/// Accepted: one or more `<number><unit>` segments with units `ns`, `us`,
/// `µs`, `ms`, `s`, `m`, `h` (e.g. `"300s"`, `"5m0s"`, `"1h2m3.5s"`).
/// Zero and negative durations are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HelmTimeout {
    raw: String,
    duration: Duration,
}

impl HelmTimeout {
    /// Parse a timeout; empty input falls back to [`DEFAULT_HELM_TIMEOUT`].
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }
        match parse_go_duration(raw) {
            Some(duration) if !duration.is_zero() => Ok(Self {
                raw: raw.to_string(),
                duration,
            }),
            _ => Err(ModelError::InvalidTimeout(raw.to_string())),
        }
    }

    /// Text passed to helm.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Default for HelmTimeout {
    fn default() -> Self {
        Self {
            raw: DEFAULT_HELM_TIMEOUT.to_string(),
            duration: Duration::from_secs(300),
        }
    }
}

impl FromStr for HelmTimeout {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HelmTimeout {
    type Error = ModelError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<HelmTimeout> for String {
    fn from(t: HelmTimeout) -> Self {
        t.raw
    }
}

impl fmt::Display for HelmTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

const NANOS_PER_UNIT: [(&str, f64); 8] = [
    ("ns", 1.0),
    ("us", 1e3),
    ("µs", 1e3),
    ("μs", 1e3),
    ("ms", 1e6),
    ("s", 1e9),
    ("m", 60e9),
    ("h", 3600e9),
];

fn parse_go_duration(s: &str) -> Option<Duration> {
    if s == "0" {
        return Some(Duration::ZERO);
    }

    let mut rest = s;
    let mut nanos = 0f64;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (num, tail) = rest.split_at(num_len);
        if num.is_empty() || num == "." {
            return None;
        }
        let value: f64 = num.parse().ok()?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);
        let scale = NANOS_PER_UNIT
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)?;

        nanos += value * scale;
        rest = next;
    }
    if !nanos.is_finite() || nanos > u64::MAX as f64 {
        return None;
    }
    Some(Duration::from_nanos(nanos as u64))
}
