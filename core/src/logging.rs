// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Logging facilities shared by all services.

/// Test utilities for logging.
#[cfg(any(test, feature = "testutils"))]
pub mod testutils {
    use log::{LevelFilter, Log, Metadata, Record};
    use std::sync::{Mutex, OnceLock};

    /// Logger that records every message at `info` level or above and then hands the message to
    /// `env_logger` so that `RUST_LOG` keeps working during tests.
    struct CapturingLogger {
        /// The logger that prints messages as configured by the environment.
        inner: env_logger::Logger,

        /// Messages recorded so far.
        lines: Mutex<Vec<String>>,
    }

    impl Log for CapturingLogger {
        fn enabled(&self, metadata: &Metadata<'_>) -> bool {
            metadata.level() <= LevelFilter::Info || self.inner.enabled(metadata)
        }

        fn log(&self, record: &Record<'_>) {
            if record.level() <= LevelFilter::Info {
                let mut lines = self.lines.lock().unwrap();
                lines.push(record.args().to_string());
            }
            self.inner.log(record);
        }

        fn flush(&self) {
            self.inner.flush();
        }
    }

    /// The process-wide capturing logger.
    static LOGGER: OnceLock<&'static CapturingLogger> = OnceLock::new();

    /// Returns the capturing logger, installing it as the global logger on first use.
    fn logger() -> &'static CapturingLogger {
        LOGGER.get_or_init(|| {
            let inner = env_logger::builder().is_test(true).build();
            let max_level = inner.filter().max(LevelFilter::Info);
            let logger: &'static CapturingLogger =
                Box::leak(Box::new(CapturingLogger { inner, lines: Mutex::new(vec![]) }));
            log::set_logger(logger).expect("No other logger can be installed during tests");
            log::set_max_level(max_level);
            logger
        })
    }

    /// Initializes logging for tests.  Safe to call any number of times.
    ///
    /// All test setup code must go through this instead of initializing `env_logger` directly,
    /// or else messages cannot be captured.
    pub fn setup() {
        logger();
    }

    /// Returns a copy of all messages logged at `info` level or above since the process started.
    ///
    /// Tests run concurrently, so callers should look for messages unique to them instead of
    /// expecting an exact sequence.
    pub fn logged_lines() -> Vec<String> {
        logger().lines.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::testutils::*;
    use log::{debug, info, warn};

    #[test]
    fn test_logged_lines() {
        setup();
        setup();

        info!("info line {}", 1234);
        warn!("warn line");
        debug!("debug line");

        let lines = logged_lines();
        assert!(lines.contains(&"info line 1234".to_owned()));
        assert!(lines.contains(&"warn line".to_owned()));
        assert!(!lines.contains(&"debug line".to_owned()));
    }
}
