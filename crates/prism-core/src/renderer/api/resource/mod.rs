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

//! Reference-counted GPU resources and the descriptors used to create them.
//!
//! Every resource kind is a plain struct holding a [`ResourceCore`] plus whatever it owns.
//! Resources are created through the [`Renderer`](crate::renderer::Renderer) factory and
//! handed out as [`Handle`]s; they are destroyed when the last handle is dropped.

pub mod buffer;
pub mod framebuffer;
pub mod handle;
pub mod pipeline_state;
pub mod program;
pub mod resource_group;
pub mod root_signature;
pub mod sampler;
pub mod swap_chain;
pub mod texture;
pub mod types;
pub mod vertex_array;

pub use self::buffer::*;
pub use self::framebuffer::*;
pub use self::handle::*;
pub use self::pipeline_state::*;
pub use self::program::*;
pub use self::resource_group::*;
pub use self::root_signature::*;
pub use self::sampler::*;
pub use self::swap_chain::*;
pub use self::texture::*;
pub use self::types::*;
pub use self::vertex_array::*;

use crate::renderer::api::core::Capabilities;
use crate::renderer::error::ResourceError;

/// Implements [`Resource`] for a struct whose identity lives in a `core` field.
macro_rules! impl_resource {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::renderer::api::resource::Resource for $ty {
                fn core(&self) -> &$crate::renderer::api::resource::ResourceCore {
                    &self.core
                }
            }
        )+
    };
}
pub(crate) use impl_resource;

/// What a descriptor is validated against before the backend sees it.
#[derive(Debug, Clone, Copy)]
pub struct CreationContext<'a> {
    /// The name of the backend.
    pub backend: &'a str,
    /// The limits and features of the backend.
    pub capabilities: &'a Capabilities,
}

impl CreationContext<'_> {
    /// Logs a capability mismatch and returns the matching error.
    pub fn unsupported(&self, feature: impl Into<String>) -> ResourceError {
        let feature = feature.into();
        log::warn!("Backend '{}' does not support {}", self.backend, feature);
        ResourceError::Unsupported {
            backend: self.backend.to_string(),
            feature,
        }
    }
}

/// Returns the label of a descriptor, or `"unnamed"`.
pub(crate) fn display_label(label: Option<&str>) -> String {
    label.unwrap_or("unnamed").to_string()
}
