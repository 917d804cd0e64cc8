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

//! Sampler resources and the filtering, addressing and comparison state they carry.

use super::{impl_resource, CreationContext, ResourceCore, ResourceType};
use crate::renderer::api::util::CompareFunction;
use crate::renderer::error::ResourceError;
use std::borrow::Cow;

/// How texels are filtered when a texture is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Nearest texel.
    Point,
    /// Linear interpolation.
    #[default]
    Linear,
    /// Anisotropic filtering.
    Anisotropic,
}

/// How coordinates outside of `[0, 1]` are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressMode {
    /// Repeat the texture.
    #[default]
    Wrap,
    /// Repeat the texture, mirrored every other time.
    Mirror,
    /// Clamp to the edge texel.
    Clamp,
    /// Use the border color.
    Border,
}

/// The state a sampler applies. Plain data, shared by the descriptor and the resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerSettings {
    /// Texel filter.
    pub filter: FilterMode,
    /// Addressing of the u, v and w coordinates.
    pub address_mode: [AddressMode; 3],
    /// Bias added to the computed mipmap level.
    pub mip_lod_bias: f32,
    /// Maximum anisotropy, `1..=16`.
    pub max_anisotropy: u32,
    /// Turns the sampler into a comparison sampler.
    pub comparison: Option<CompareFunction>,
    /// The color used with [`AddressMode::Border`].
    pub border_color: [f32; 4],
    /// The lowest mipmap level that may be used.
    pub min_lod: f32,
    /// The highest mipmap level that may be used.
    pub max_lod: f32,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            filter: FilterMode::Linear,
            address_mode: [AddressMode::Wrap; 3],
            mip_lod_bias: 0.0,
            max_anisotropy: 1,
            comparison: None,
            border_color: [0.0; 4],
            min_lod: 0.0,
            max_lod: f32::MAX,
        }
    }
}

/// A descriptor used to create a [`SamplerState`].
#[derive(Debug, Clone, Default)]
pub struct SamplerStateDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The sampling state.
    pub settings: SamplerSettings,
}

impl SamplerStateDescriptor<'_> {
    pub(crate) fn validate(&self, _ctx: &CreationContext<'_>) -> Result<(), ResourceError> {
        let settings = &self.settings;
        if !(1..=16).contains(&settings.max_anisotropy) {
            return Err(ResourceError::InvalidDescriptor {
                resource_type: ResourceType::SamplerState,
                details: format!("max anisotropy {} is outside 1..=16", settings.max_anisotropy),
            });
        }
        if settings.min_lod > settings.max_lod {
            return Err(ResourceError::InvalidDescriptor {
                resource_type: ResourceType::SamplerState,
                details: format!(
                    "min lod {} is above max lod {}",
                    settings.min_lod, settings.max_lod
                ),
            });
        }
        Ok(())
    }
}

/// Texture sampling state.
#[derive(Debug)]
pub struct SamplerState {
    core: ResourceCore,
    settings: SamplerSettings,
}

impl_resource!(SamplerState);

impl SamplerState {
    pub(crate) fn new(core: ResourceCore, descriptor: &SamplerStateDescriptor<'_>) -> Self {
        Self {
            core,
            settings: descriptor.settings,
        }
    }

    /// The sampling state.
    pub fn settings(&self) -> &SamplerSettings {
        &self.settings
    }
}
