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

//! Global settings for the rendering system.

use crate::renderer::api::util::BackendKind;
use crate::renderer::error::RenderError;
use serde::{Deserialize, Serialize};

/// The environment variable that overrides [`RenderSettings::backend`].
pub const BACKEND_ENV_VAR: &str = "PRISM_BACKEND";

/// The smallest page a command stream accepts, in bytes.
pub const MIN_COMMAND_PAGE_SIZE: usize = 64;

/// Settings of command buffers and command buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandSettings {
    /// The size in bytes of one page of encoded commands. Must be a multiple of 8 and at
    /// least [`MIN_COMMAND_PAGE_SIZE`]. Records larger than a page get a page of their own.
    pub page_size: usize,
    /// If `false`, debug marker and debug event commands are not recorded at all.
    pub debug_markers: bool,
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            page_size: 4096,
            debug_markers: true,
        }
    }
}

impl CommandSettings {
    /// Checks that the settings can be used to build a command stream.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.page_size < MIN_COMMAND_PAGE_SIZE || self.page_size % 8 != 0 {
            return Err(RenderError::InvalidSettings(format!(
                "command page size must be a multiple of 8 of at least {MIN_COMMAND_PAGE_SIZE} bytes, got {}",
                self.page_size
            )));
        }
        Ok(())
    }
}

/// A collection of global settings that affect the rendering process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// The name of the backend to instantiate, e.g. `"Null"` or `"Direct3D11"`.
    pub backend: String,
    /// Settings of the command subsystem.
    pub command: CommandSettings,
    /// If `true`, backends skip native calls that would not change the bound state.
    pub state_cache: bool,
    /// The color a freshly created swap chain is cleared to.
    pub clear_color: [f32; 4],
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::Null.name().to_string(),
            command: CommandSettings::default(),
            state_cache: true,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl RenderSettings {
    /// Parses settings from a JSON document. Missing fields take their default value.
    pub fn from_json_str(json: &str) -> Result<Self, RenderError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| RenderError::InvalidSettings(e.to_string()))?;
        settings.command.validate()?;
        Ok(settings)
    }

    /// Applies overrides from the process environment (see [`BACKEND_ENV_VAR`]).
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up through `lookup` instead of the process environment.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(backend) = lookup(BACKEND_ENV_VAR).filter(|name| !name.trim().is_empty()) {
            log::debug!("Backend overridden by {BACKEND_ENV_VAR}: '{backend}'");
            self.backend = backend;
        }
        self
    }

    /// Resolves the configured backend name.
    pub fn backend_kind(&self) -> Result<BackendKind, RenderError> {
        self.backend.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_the_null_backend() {
        let settings = RenderSettings::default();
        assert_eq!(settings.backend_kind().ok(), Some(BackendKind::Null));
        assert!(settings.state_cache);
        assert!(settings.command.validate().is_ok());
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let settings =
            RenderSettings::from_json_str(r#"{ "backend": "Vulkan", "command": { "page_size": 256 } }"#)
                .expect("valid settings");
        assert_eq!(settings.backend_kind().ok(), Some(BackendKind::Vulkan));
        assert_eq!(settings.command.page_size, 256);
        assert!(settings.command.debug_markers);
        assert_eq!(settings.clear_color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn json_rejects_bad_page_sizes() {
        let err = RenderSettings::from_json_str(r#"{ "command": { "page_size": 100 } }"#);
        assert!(matches!(err, Err(RenderError::InvalidSettings(_))));
        let err = RenderSettings::from_json_str(r#"{ "command": { "page_size": 8 } }"#);
        assert!(matches!(err, Err(RenderError::InvalidSettings(_))));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            RenderSettings::from_json_str("{ backend: "),
            Err(RenderError::InvalidSettings(_))
        ));
    }

    #[test]
    fn overrides_replace_the_backend_name() {
        let settings = RenderSettings::default().with_overrides_from(|key| {
            (key == BACKEND_ENV_VAR).then(|| "OpenGLES3".to_string())
        });
        assert_eq!(settings.backend_kind().ok(), Some(BackendKind::OpenGLES3));

        let untouched = RenderSettings::default().with_overrides_from(|_| Some("  ".to_string()));
        assert_eq!(untouched.backend, "Null");
    }
}
