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

//! Resource identity: ids, type tags and the shared core of every resource.

use crate::renderer::traits::ResourceBackend;
use bytemuck::{Pod, Zeroable};
use std::fmt;
use std::sync::Arc;

/// An opaque, backend-assigned identifier of a native resource.
///
/// Commands refer to resources by id only. `0` is the null id, used for example to
/// unbind the render target.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Pod, Zeroable)]
pub struct ResourceId(pub u64);

impl ResourceId {
    /// The null id.
    pub const NULL: ResourceId = ResourceId(0);

    /// Returns `true` for the null id.
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The closed set of resource kinds.
///
/// The tag decides which backend entry points apply to a resource. Backends switch on it
/// where behaviour differs, e.g. a render target may be a swap chain or a framebuffer.
/// The discriminant is the raw value stored in encoded commands.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// A description of the bindings a pipeline expects.
    RootSignature = 1,
    /// A compiled program plus fixed-function state.
    PipelineState = 2,
    /// Per-vertex data.
    VertexBuffer = 3,
    /// Indices into vertex buffers.
    IndexBuffer = 4,
    /// Constant data read by shaders.
    UniformBuffer = 5,
    /// Formatted data read by shaders as a texture.
    TextureBuffer = 6,
    /// Draw arguments read by indirect draws.
    IndirectBuffer = 7,
    /// A set of vertex buffers, an optional index buffer and their layout.
    VertexArray = 8,
    /// A one-dimensional texture.
    Texture1D = 9,
    /// A two-dimensional texture.
    Texture2D = 10,
    /// An array of two-dimensional textures.
    Texture2DArray = 11,
    /// A three-dimensional texture.
    Texture3D = 12,
    /// A cube texture.
    TextureCube = 13,
    /// Texture sampling state.
    SamplerState = 14,
    /// An off-screen render target made of textures.
    Framebuffer = 15,
    /// An on-screen render target.
    SwapChain = 16,
    /// A vertex shader.
    VertexShader = 17,
    /// A fragment shader.
    FragmentShader = 18,
    /// A geometry shader.
    GeometryShader = 19,
    /// A tessellation control shader.
    TessellationControlShader = 20,
    /// A tessellation evaluation shader.
    TessellationEvaluationShader = 21,
    /// A linked set of shaders.
    Program = 22,
    /// A group of resources bound through one root descriptor table.
    ResourceGroup = 23,
}

impl ResourceType {
    /// Every resource type, in discriminant order.
    pub const ALL: [ResourceType; 23] = [
        ResourceType::RootSignature,
        ResourceType::PipelineState,
        ResourceType::VertexBuffer,
        ResourceType::IndexBuffer,
        ResourceType::UniformBuffer,
        ResourceType::TextureBuffer,
        ResourceType::IndirectBuffer,
        ResourceType::VertexArray,
        ResourceType::Texture1D,
        ResourceType::Texture2D,
        ResourceType::Texture2DArray,
        ResourceType::Texture3D,
        ResourceType::TextureCube,
        ResourceType::SamplerState,
        ResourceType::Framebuffer,
        ResourceType::SwapChain,
        ResourceType::VertexShader,
        ResourceType::FragmentShader,
        ResourceType::GeometryShader,
        ResourceType::TessellationControlShader,
        ResourceType::TessellationEvaluationShader,
        ResourceType::Program,
        ResourceType::ResourceGroup,
    ];

    /// Returns the raw value used in the command encoding.
    pub const fn as_raw(self) -> u32 {
        self as u32
    }

    /// Converts a raw encoded value back into a resource type, if it is known.
    pub fn from_raw(raw: u32) -> Option<Self> {
        raw.checked_sub(1)
            .and_then(|index| Self::ALL.get(index as usize))
            .copied()
    }

    /// Returns `true` for the buffer types.
    pub const fn is_buffer(self) -> bool {
        matches!(
            self,
            ResourceType::VertexBuffer
                | ResourceType::IndexBuffer
                | ResourceType::UniformBuffer
                | ResourceType::TextureBuffer
                | ResourceType::IndirectBuffer
        )
    }

    /// Returns `true` for the texture types.
    pub const fn is_texture(self) -> bool {
        matches!(
            self,
            ResourceType::Texture1D
                | ResourceType::Texture2D
                | ResourceType::Texture2DArray
                | ResourceType::Texture3D
                | ResourceType::TextureCube
        )
    }

    /// Returns `true` for the shader types.
    pub const fn is_shader(self) -> bool {
        matches!(
            self,
            ResourceType::VertexShader
                | ResourceType::FragmentShader
                | ResourceType::GeometryShader
                | ResourceType::TessellationControlShader
                | ResourceType::TessellationEvaluationShader
        )
    }

    /// Returns `true` for the types a `SetRenderTarget` command accepts.
    pub const fn is_render_target(self) -> bool {
        matches!(self, ResourceType::SwapChain | ResourceType::Framebuffer)
    }
}

/// The identity every resource shares: its id, type tag, debug label and the backend that
/// owns the native object.
///
/// Dropping the core destroys the native object. Since resources are only reachable
/// through [`Handle`](super::Handle)s, this happens exactly once, when the last handle
/// goes away.
pub struct ResourceCore {
    id: ResourceId,
    resource_type: ResourceType,
    label: Option<String>,
    backend: Arc<dyn ResourceBackend>,
}

impl ResourceCore {
    /// Wraps a freshly created native object.
    pub fn new(
        id: ResourceId,
        resource_type: ResourceType,
        label: Option<String>,
        backend: Arc<dyn ResourceBackend>,
    ) -> Self {
        Self {
            id,
            resource_type,
            label,
            backend,
        }
    }

    /// The backend-assigned id.
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// The type tag.
    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// The debug label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The backend owning the native object.
    pub fn backend(&self) -> &Arc<dyn ResourceBackend> {
        &self.backend
    }
}

impl fmt::Debug for ResourceCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCore")
            .field("id", &self.id)
            .field("resource_type", &self.resource_type)
            .field("label", &self.label)
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl Drop for ResourceCore {
    fn drop(&mut self) {
        log::debug!(
            "Destroying {:?} {} ('{}')",
            self.resource_type,
            self.id,
            self.label.as_deref().unwrap_or("unnamed")
        );
        self.backend.destroy_resource(self.id, self.resource_type);
    }
}

/// The capability shared by every resource kind.
pub trait Resource: Send + Sync + fmt::Debug {
    /// The shared identity of the resource.
    fn core(&self) -> &ResourceCore;

    /// The backend-assigned id.
    fn id(&self) -> ResourceId {
        self.core().id()
    }

    /// The type tag.
    fn resource_type(&self) -> ResourceType {
        self.core().resource_type()
    }

    /// The debug label, if any.
    fn label(&self) -> Option<&str> {
        self.core().label()
    }
}
