// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Trace configuration, read once from the environment.
//!
//! The adapter is usually loaded into a host process whose logging setup the
//! adapter does not control, so tracing is switched on per process through
//! the `PLINTH_TRACE` environment variable rather than through code. The
//! parsed configuration lives in a registry slot, so it obeys the same lazy
//! lifecycle as every other global.

use std::env;

/// Environment variable selecting the trace level for this process.
pub const TRACE_ENV_VAR: &str = "PLINTH_TRACE";

/// How much of the adapter's activity is traced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceLevel {
    /// No tracing (the default, and the value for anything unrecognized).
    #[default]
    Off,
    /// Lifecycle events only: registry creation, shutdown, drain counts.
    Lifecycle,
    /// Lifecycle events plus every adapter entry-point call.
    All,
}

/// Process-wide trace settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraceConfig {
    level: TraceLevel,
}

impl TraceConfig {
    /// Reads the trace level from [`TRACE_ENV_VAR`].
    ///
    /// `1` enables lifecycle tracing, `2` or `-1` enables everything;
    /// anything else (including an unset variable) disables tracing.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_value(env::var(TRACE_ENV_VAR).ok().as_deref())
    }

    fn from_value(raw: Option<&str>) -> Self {
        let level = match raw.map(str::trim) {
            Some("1") => TraceLevel::Lifecycle,
            Some("2") | Some("-1") => TraceLevel::All,
            _ => TraceLevel::Off,
        };
        Self { level }
    }

    /// The configured trace level.
    #[must_use]
    pub fn level(&self) -> TraceLevel {
        self.level
    }

    /// Whether lifecycle events (creation, shutdown, drains) are traced.
    #[must_use]
    pub fn lifecycle_enabled(&self) -> bool {
        self.level != TraceLevel::Off
    }

    /// Whether individual adapter entry-point calls are traced.
    ///
    /// Nothing in this crate emits per-call traces; the predicate is surfaced
    /// for the adapter operation layers above, which gate their entry/exit
    /// logging on it.
    #[must_use]
    pub fn calls_enabled(&self) -> bool {
        self.level == TraceLevel::All
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_and_unrecognized_values_disable_tracing() {
        for raw in [None, Some("0"), Some(""), Some("yes"), Some("3")] {
            let config = TraceConfig::from_value(raw);
            assert_eq!(config.level(), TraceLevel::Off, "raw = {raw:?}");
            assert!(!config.lifecycle_enabled());
            assert!(!config.calls_enabled());
        }
    }

    #[test]
    fn level_one_traces_lifecycle_only() {
        let config = TraceConfig::from_value(Some("1"));
        assert_eq!(config.level(), TraceLevel::Lifecycle);
        assert!(config.lifecycle_enabled());
        assert!(!config.calls_enabled());
    }

    #[test]
    fn level_two_and_minus_one_trace_everything() {
        for raw in ["2", "-1", " 2 "] {
            let config = TraceConfig::from_value(Some(raw));
            assert_eq!(config.level(), TraceLevel::All, "raw = {raw:?}");
            assert!(config.lifecycle_enabled());
            assert!(config.calls_enabled());
        }
    }
}
