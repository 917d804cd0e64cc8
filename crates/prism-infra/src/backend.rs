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


//! Backend selection: turns [`RenderSettings`] into a working renderer.

use prism_core::renderer::api::{BackendKind, RenderSettings};
use prism_core::renderer::{CommandBackend, RenderError, Renderer};

/// The two halves of an instantiated backend.
///
/// Resources are created through `renderer`, which can be cloned and shared across
/// threads. Command buffers and buckets are submitted to `command_backend`, which
/// belongs to the thread that owns the native context.
pub struct BackendInstance {
    /// The resource factory.
    pub renderer: Renderer,
    /// The command sink.
    pub command_backend: Box<dyn CommandBackend + Send>,
}

impl std::fmt::Debug for BackendInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendInstance")
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}

impl BackendInstance {
    /// The name of the backend.
    pub fn name(&self) -> &str {
        self.renderer.backend_name()
    }
}

/// Instantiates the backend named in `settings`.
///
/// ## Errors
/// * `RenderError::UnknownBackend` - If the name matches no known backend.
/// * `RenderError::BackendUnavailable` - If the backend is not compiled into this build.
/// * `RenderError::InvalidSettings` - If the command settings are inconsistent.
pub fn create_backend(settings: &RenderSettings) -> Result<BackendInstance, RenderError> {
    settings.command.validate()?;
    let kind = settings.backend_kind()?;
    log::info!("Creating '{kind}' backend (state cache: {}).", settings.state_cache);

    match kind {
        #[cfg(feature = "null")]
        BackendKind::Null => Ok(create_null_backend(settings)),
        _ => {
            log::error!("Backend '{kind}' is not compiled into this build.");
            Err(RenderError::BackendUnavailable(kind.to_string()))
        }
    }
}

#[cfg(feature = "null")]
fn create_null_backend(settings: &RenderSettings) -> BackendInstance {
    use crate::graphics::null::{NullCommandBackend, NullDevice};
    use prism_core::renderer::api::Capabilities;
    use std::sync::Arc;

    let device = NullDevice::new(Capabilities::desktop());
    BackendInstance {
        renderer: Renderer::new(Arc::new(device.clone())),
        command_backend: Box::new(NullCommandBackend::new(device, settings.state_cache)),
    }
}

/// The backends this build can instantiate.
pub fn available_backends() -> Vec<BackendKind> {
    BackendKind::ALL
        .into_iter()
        .filter(|kind| match kind {
            BackendKind::Null => cfg!(feature = "null"),
            _ => false,
        })
        .collect()
}
