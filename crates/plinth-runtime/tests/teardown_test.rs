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

//! Teardown must not construct registry state the process never used.
//!
//! A separate binary from the lifecycle test on purpose: each integration
//! test binary is its own process, so each one gets its own registry and
//! one-shot teardown to exercise.

use std::sync::Mutex;

use log::{LevelFilter, Metadata, Record};
use plinth_runtime::{shutdown, shutdown_phase, GlobalHandler, ShutdownPhase};

/// Captures every emitted log line so the test can assert on what the
/// teardown path did (and did not) touch.
struct CapturingLogger {
    lines: Mutex<Vec<String>>,
}

static LOGGER: CapturingLogger = CapturingLogger {
    lines: Mutex::new(Vec::new()),
};

impl log::Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.lines.lock().unwrap().push(record.args().to_string());
    }

    fn flush(&self) {}
}

#[test]
fn teardown_of_an_untraced_registry_constructs_no_trace_config() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    // Create the handler and its platform cache, but never touch the trace
    // settings.
    assert!(GlobalHandler::instance()
        .platform_cache()
        .lock()
        .unwrap()
        .is_empty());

    // SAFETY: nothing else in this binary touches the registry, and nothing
    // below re-enters it.
    unsafe { shutdown() };
    assert_eq!(shutdown_phase(), ShutdownPhase::Released);

    let lines = LOGGER.lines.lock().unwrap();
    assert!(
        !lines.iter().any(|line| line.contains("TraceConfig")),
        "teardown must not populate the trace slot: {lines:?}"
    );
    // With the trace settings absent, every lifecycle shutdown line stays
    // silent as well.
    assert!(
        !lines.iter().any(|line| line.contains("Backend registry")),
        "lifecycle logging must be off when tracing was never enabled: {lines:?}"
    );
    assert!(
        !lines.iter().any(|line| line.contains("Drained")),
        "drain count logging must be off when tracing was never enabled: {lines:?}"
    );
}
