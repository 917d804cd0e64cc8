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


//! Process-wide logger setup.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// How the global logger is configured.
///
/// `RUST_LOG` takes precedence over `default_filter`; module filters are applied on top
/// of both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// The filter used when `RUST_LOG` is not set.
    pub default_filter: String,
    /// Per-module level overrides.
    pub module_filters: Vec<(String, LevelFilter)>,
    /// If `true`, output goes through the test harness capture.
    pub is_test: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
            module_filters: Vec::new(),
            is_test: false,
        }
    }
}

impl LoggingConfig {
    /// Overrides the level of one module.
    pub fn with_module_filter(mut self, module: impl Into<String>, level: LevelFilter) -> Self {
        self.module_filters.push((module.into(), level));
        self
    }
}

/// Installs the global logger.
///
/// Returns `false` if a logger was already installed, in which case nothing changes.
/// Calling it more than once is harmless.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let mut builder = Builder::from_env(Env::default().default_filter_or(&config.default_filter));
    for (module, level) in &config.module_filters {
        builder.filter_module(module, *level);
    }
    builder.is_test(config.is_test);

    match builder.try_init() {
        Ok(()) => {
            log::debug!("Logger initialized (default filter '{}').", config.default_filter);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialization_is_a_no_op() {
        let config = LoggingConfig {
            is_test: true,
            ..LoggingConfig::default()
        }
        .with_module_filter("prism_infra::graphics", LevelFilter::Warn);
        init_logging(&config);
        assert!(!init_logging(&config));
    }
}
