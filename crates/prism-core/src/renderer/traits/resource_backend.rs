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

use crate::renderer::api::core::Capabilities;
use crate::renderer::api::resource::{
    BufferDescriptor, FramebufferDescriptor, PipelineStateDescriptor, ProgramDescriptor,
    ResourceGroupDescriptor, ResourceId, ResourceType, RootSignatureDescriptor,
    SamplerStateDescriptor, ShaderDescriptor, SwapChainDescriptor, TextureDescriptor,
    VertexArrayDescriptor,
};
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// A validated creation request, as handed to [`ResourceBackend::create_resource`].
#[derive(Debug, Clone, Copy)]
pub enum ResourceDescription<'a> {
    /// A root signature.
    RootSignature(&'a RootSignatureDescriptor<'a>),
    /// A single shader stage.
    Shader(&'a ShaderDescriptor<'a>),
    /// A linked program.
    Program(&'a ProgramDescriptor<'a>),
    /// A pipeline state object.
    PipelineState(&'a PipelineStateDescriptor<'a>),
    /// Any kind of buffer.
    Buffer(&'a BufferDescriptor<'a>),
    /// A vertex array.
    VertexArray(&'a VertexArrayDescriptor<'a>),
    /// Any kind of texture.
    Texture(&'a TextureDescriptor<'a>),
    /// A sampler state.
    SamplerState(&'a SamplerStateDescriptor<'a>),
    /// A framebuffer.
    Framebuffer(&'a FramebufferDescriptor<'a>),
    /// A swap chain.
    SwapChain(&'a SwapChainDescriptor<'a>),
    /// A resource group.
    ResourceGroup(&'a ResourceGroupDescriptor<'a>),
}

impl ResourceDescription<'_> {
    /// The type of the resource being created.
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Self::RootSignature(_) => ResourceType::RootSignature,
            Self::Shader(descriptor) => descriptor.stage.resource_type(),
            Self::Program(_) => ResourceType::Program,
            Self::PipelineState(_) => ResourceType::PipelineState,
            Self::Buffer(descriptor) => descriptor.kind.resource_type(),
            Self::VertexArray(_) => ResourceType::VertexArray,
            Self::Texture(descriptor) => descriptor.dimension.resource_type(),
            Self::SamplerState(_) => ResourceType::SamplerState,
            Self::Framebuffer(_) => ResourceType::Framebuffer,
            Self::SwapChain(_) => ResourceType::SwapChain,
            Self::ResourceGroup(_) => ResourceType::ResourceGroup,
        }
    }

    /// The debug label of the descriptor.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::RootSignature(d) => d.label.as_deref(),
            Self::Shader(d) => d.label.as_deref(),
            Self::Program(d) => d.label.as_deref(),
            Self::PipelineState(d) => d.label.as_deref(),
            Self::Buffer(d) => d.label.as_deref(),
            Self::VertexArray(d) => d.label.as_deref(),
            Self::Texture(d) => d.label.as_deref(),
            Self::SamplerState(d) => d.label.as_deref(),
            Self::Framebuffer(d) => d.label.as_deref(),
            Self::SwapChain(d) => d.label.as_deref(),
            Self::ResourceGroup(d) => d.label.as_deref(),
        }
    }
}

/// The resource side of a graphics backend.
///
/// The [`Renderer`](crate::renderer::Renderer) factory validates every descriptor before
/// calling [`create_resource`](Self::create_resource), so a backend only has to deal with
/// native failures. [`destroy_resource`](Self::destroy_resource) is called exactly once per
/// created resource, when its last [`Handle`](crate::renderer::api::resource::Handle) is
/// dropped.
pub trait ResourceBackend: Send + Sync + Debug {
    /// A human-readable backend name, used in logs and errors.
    fn name(&self) -> &str;

    /// The limits and optional features of the backend.
    fn capabilities(&self) -> &Capabilities;

    /// Creates the native object for a validated description and returns its id.
    ///
    /// ## Errors
    /// * `ResourceError::Backend` - If the native object could not be created.
    fn create_resource(
        &self,
        description: &ResourceDescription<'_>,
    ) -> Result<ResourceId, ResourceError>;

    /// Releases the native object behind `id`.
    fn destroy_resource(&self, id: ResourceId, resource_type: ResourceType);

    /// Writes `data` into a buffer at `offset`. The range has been bounds checked.
    fn write_buffer(&self, id: ResourceId, offset: u64, data: &[u8]) -> Result<(), ResourceError>;

    /// Resizes the back buffers of a swap chain.
    fn resize_swap_chain(&self, id: ResourceId, width: u32, height: u32)
        -> Result<(), ResourceError>;
}
