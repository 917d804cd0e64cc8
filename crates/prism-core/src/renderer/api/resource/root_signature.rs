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

//! Root signatures: the binding layout a pipeline expects.

use super::{impl_resource, CreationContext, ResourceCore, ResourceType};
use crate::renderer::api::util::{RootSignatureFlags, ShaderStage};
use crate::renderer::error::ResourceError;
use std::borrow::Cow;

/// The kind of resources a descriptor range binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorRangeType {
    /// Read-only textures and texture buffers.
    ShaderResourceView,
    /// Read/write resources.
    UnorderedAccessView,
    /// Uniform buffers.
    UniformBufferView,
    /// Sampler states.
    Sampler,
}

/// A contiguous range of shader registers bound by one root descriptor table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorRange {
    /// The kind of resources in the range.
    pub range_type: DescriptorRangeType,
    /// The number of descriptors in the range.
    pub number_of_descriptors: u32,
    /// The first shader register of the range.
    pub base_shader_register: u32,
    /// The name of the resource in the shader, for backends that bind by name.
    pub base_shader_register_name: Cow<'static, str>,
}

/// One root parameter: a descriptor table made of ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootParameter {
    /// The ranges of the descriptor table.
    pub descriptor_ranges: Vec<DescriptorRange>,
    /// The stage that sees the parameter; `None` for every stage.
    pub shader_visibility: Option<ShaderStage>,
}

impl RootParameter {
    /// The total number of descriptors over all ranges.
    pub fn number_of_descriptors(&self) -> u32 {
        self.descriptor_ranges
            .iter()
            .map(|range| range.number_of_descriptors)
            .sum()
    }
}

/// A descriptor used to create a [`RootSignature`].
#[derive(Debug, Clone, Default)]
pub struct RootSignatureDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The root parameters, addressed by index in `SetGraphicsRootDescriptorTable`.
    pub parameters: Vec<RootParameter>,
    /// Creation flags.
    pub flags: RootSignatureFlags,
}

impl RootSignatureDescriptor<'_> {
    pub(crate) fn validate(&self, _ctx: &CreationContext<'_>) -> Result<(), ResourceError> {
        for (index, parameter) in self.parameters.iter().enumerate() {
            if parameter.descriptor_ranges.is_empty() {
                return Err(ResourceError::InvalidDescriptor {
                    resource_type: ResourceType::RootSignature,
                    details: format!("root parameter {index} has no descriptor range"),
                });
            }
            if parameter
                .descriptor_ranges
                .iter()
                .any(|range| range.number_of_descriptors == 0)
            {
                return Err(ResourceError::InvalidDescriptor {
                    resource_type: ResourceType::RootSignature,
                    details: format!("root parameter {index} has an empty descriptor range"),
                });
            }
        }
        Ok(())
    }
}

/// The binding layout a pipeline expects, independent of any resource instance.
#[derive(Debug)]
pub struct RootSignature {
    core: ResourceCore,
    parameters: Vec<RootParameter>,
    flags: RootSignatureFlags,
}

impl_resource!(RootSignature);

impl RootSignature {
    pub(crate) fn new(core: ResourceCore, descriptor: &RootSignatureDescriptor<'_>) -> Self {
        Self {
            core,
            parameters: descriptor.parameters.clone(),
            flags: descriptor.flags,
        }
    }

    /// The root parameters.
    pub fn parameters(&self) -> &[RootParameter] {
        &self.parameters
    }

    /// Creation flags.
    pub fn flags(&self) -> RootSignatureFlags {
        self.flags
    }
}
