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

//! Groups of resources bound together through one root descriptor table.

use super::{
    impl_resource, Buffer, CreationContext, Handle, ResourceCore, ResourceId, ResourceType,
    RootSignature, SamplerState, Texture,
};
use crate::renderer::error::ResourceError;
use std::borrow::Cow;

/// A resource that can be part of a [`ResourceGroup`].
#[derive(Debug, Clone)]
pub enum GroupResource {
    /// A uniform, texture or indirect buffer.
    Buffer(Handle<Buffer>),
    /// A texture of any shape.
    Texture(Handle<Texture>),
    /// A sampler state.
    SamplerState(Handle<SamplerState>),
}

impl GroupResource {
    /// The id of the wrapped resource.
    pub fn id(&self) -> ResourceId {
        match self {
            GroupResource::Buffer(buffer) => buffer.id(),
            GroupResource::Texture(texture) => texture.id(),
            GroupResource::SamplerState(sampler) => sampler.id(),
        }
    }

    /// The type tag of the wrapped resource.
    pub fn resource_type(&self) -> ResourceType {
        match self {
            GroupResource::Buffer(buffer) => buffer.resource_type(),
            GroupResource::Texture(texture) => texture.resource_type(),
            GroupResource::SamplerState(sampler) => sampler.resource_type(),
        }
    }
}

/// A descriptor used to create a [`ResourceGroup`].
#[derive(Debug, Clone)]
pub struct ResourceGroupDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The root signature the group is laid out for.
    pub root_signature: Handle<RootSignature>,
    /// The root parameter the group binds to.
    pub root_parameter_index: u32,
    /// The resources, in descriptor range order.
    pub resources: Vec<GroupResource>,
    /// Optional per-resource samplers. Empty, or one entry per resource.
    pub sampler_states: Vec<Option<Handle<SamplerState>>>,
}

impl ResourceGroupDescriptor<'_> {
    pub(crate) fn validate(&self, _ctx: &CreationContext<'_>) -> Result<(), ResourceError> {
        let invalid = |details: String| ResourceError::InvalidDescriptor {
            resource_type: ResourceType::ResourceGroup,
            details,
        };
        let parameter = self
            .root_signature
            .parameters()
            .get(self.root_parameter_index as usize)
            .ok_or_else(|| {
                invalid(format!(
                    "root parameter {} does not exist",
                    self.root_parameter_index
                ))
            })?;
        if self.resources.is_empty() {
            return Err(invalid("a resource group cannot be empty".to_string()));
        }
        if self.resources.len() != parameter.number_of_descriptors() as usize {
            return Err(invalid(format!(
                "root parameter {} expects {} resources, got {}",
                self.root_parameter_index,
                parameter.number_of_descriptors(),
                self.resources.len()
            )));
        }
        if !self.sampler_states.is_empty() && self.sampler_states.len() != self.resources.len() {
            return Err(invalid(format!(
                "{} sampler states for {} resources",
                self.sampler_states.len(),
                self.resources.len()
            )));
        }
        Ok(())
    }
}

/// A group of resources bound through one root descriptor table.
///
/// The group keeps its resources, samplers and root signature alive.
#[derive(Debug)]
pub struct ResourceGroup {
    core: ResourceCore,
    root_signature: Handle<RootSignature>,
    root_parameter_index: u32,
    resources: Vec<GroupResource>,
    sampler_states: Vec<Option<Handle<SamplerState>>>,
}

impl_resource!(ResourceGroup);

impl ResourceGroup {
    pub(crate) fn new(core: ResourceCore, descriptor: &ResourceGroupDescriptor<'_>) -> Self {
        Self {
            core,
            root_signature: descriptor.root_signature.clone(),
            root_parameter_index: descriptor.root_parameter_index,
            resources: descriptor.resources.clone(),
            sampler_states: descriptor.sampler_states.clone(),
        }
    }

    /// The root signature the group is laid out for.
    pub fn root_signature(&self) -> &Handle<RootSignature> {
        &self.root_signature
    }

    /// The root parameter the group binds to.
    pub fn root_parameter_index(&self) -> u32 {
        self.root_parameter_index
    }

    /// The resources of the group.
    pub fn resources(&self) -> &[GroupResource] {
        &self.resources
    }

    /// The sampler of each resource, if any.
    pub fn sampler_states(&self) -> &[Option<Handle<SamplerState>>] {
        &self.sampler_states
    }
}
