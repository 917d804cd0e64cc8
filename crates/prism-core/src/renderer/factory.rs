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

//! The resource factory.

use crate::renderer::api::core::Capabilities;
use crate::renderer::api::resource::*;
use crate::renderer::api::util::{BufferUsage, IndexFormat, TextureFlags, TextureFormat};
use crate::renderer::error::ResourceError;
use crate::renderer::traits::{ResourceBackend, ResourceDescription};
use std::sync::Arc;

/// Creates reference-counted resources on a [`ResourceBackend`].
///
/// Every `create_*` method validates its descriptor, checks it against the backend's
/// [`Capabilities`], and only then asks the backend for a native object. Configuration
/// errors and capability mismatches come back as [`ResourceError`]s; mismatches are also
/// logged as warnings.
///
/// The factory is cheap to clone and can be shared between threads.
#[derive(Debug, Clone)]
pub struct Renderer {
    backend: Arc<dyn ResourceBackend>,
}

impl Renderer {
    /// Creates a factory for `backend`.
    pub fn new(backend: Arc<dyn ResourceBackend>) -> Self {
        Self { backend }
    }

    /// The name of the backend.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// The limits and features of the backend.
    pub fn capabilities(&self) -> &Capabilities {
        self.backend.capabilities()
    }

    /// The backend resources are created on.
    pub fn backend(&self) -> &Arc<dyn ResourceBackend> {
        &self.backend
    }

    fn instantiate<R: Resource>(
        &self,
        description: ResourceDescription<'_>,
        validate: impl FnOnce(&CreationContext<'_>) -> Result<(), ResourceError>,
        build: impl FnOnce(ResourceCore) -> R,
    ) -> Result<Handle<R>, ResourceError> {
        let ctx = CreationContext {
            backend: self.backend.name(),
            capabilities: self.backend.capabilities(),
        };
        validate(&ctx)?;

        let resource_type = description.resource_type();
        let id = self.backend.create_resource(&description)?;
        if id.is_null() {
            return Err(ResourceError::Backend(format!(
                "backend '{}' returned the null id for a {resource_type:?}",
                self.backend.name()
            )));
        }
        let label = description.label().map(str::to_owned);
        log::debug!(
            "Created {resource_type:?} {id} ('{}') on '{}'",
            display_label(label.as_deref()),
            self.backend.name()
        );
        let core = ResourceCore::new(id, resource_type, label, Arc::clone(&self.backend));
        Ok(Handle::new(build(core)))
    }

    /// Creates a root signature.
    pub fn create_root_signature(
        &self,
        descriptor: &RootSignatureDescriptor<'_>,
    ) -> Result<Handle<RootSignature>, ResourceError> {
        self.instantiate(
            ResourceDescription::RootSignature(descriptor),
            |ctx| descriptor.validate(ctx),
            |core| RootSignature::new(core, descriptor),
        )
    }

    /// Creates a single shader stage.
    pub fn create_shader(
        &self,
        descriptor: &ShaderDescriptor<'_>,
    ) -> Result<Handle<Shader>, ResourceError> {
        self.instantiate(
            ResourceDescription::Shader(descriptor),
            |ctx| descriptor.validate(ctx),
            |core| Shader::new(core, descriptor),
        )
    }

    /// Links shaders into a program. The program keeps its shaders alive.
    pub fn create_program(
        &self,
        descriptor: &ProgramDescriptor<'_>,
    ) -> Result<Handle<Program>, ResourceError> {
        self.instantiate(
            ResourceDescription::Program(descriptor),
            |ctx| descriptor.validate(ctx),
            |core| Program::new(core, descriptor),
        )
    }

    /// Creates a pipeline state. It keeps its root signature and program alive.
    pub fn create_pipeline_state(
        &self,
        descriptor: &PipelineStateDescriptor<'_>,
    ) -> Result<Handle<PipelineState>, ResourceError> {
        self.instantiate(
            ResourceDescription::PipelineState(descriptor),
            |ctx| descriptor.validate(ctx),
            |core| PipelineState::new(core, descriptor),
        )
    }

    /// Creates a buffer of any kind.
    pub fn create_buffer(
        &self,
        descriptor: &BufferDescriptor<'_>,
    ) -> Result<Handle<Buffer>, ResourceError> {
        self.instantiate(
            ResourceDescription::Buffer(descriptor),
            |ctx| descriptor.validate(ctx),
            |core| Buffer::new(core, descriptor),
        )
    }

    /// Creates a vertex buffer of `size` bytes.
    pub fn create_vertex_buffer(
        &self,
        size: u64,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) -> Result<Handle<Buffer>, ResourceError> {
        self.create_buffer(&BufferDescriptor::new(BufferKind::Vertex, size, data, usage))
    }

    /// Creates an index buffer of `size` bytes.
    pub fn create_index_buffer(
        &self,
        size: u64,
        data: Option<&[u8]>,
        usage: BufferUsage,
        format: IndexFormat,
    ) -> Result<Handle<Buffer>, ResourceError> {
        self.create_buffer(&BufferDescriptor::new(
            BufferKind::Index(format),
            size,
            data,
            usage,
        ))
    }

    /// Creates a uniform buffer of `size` bytes.
    pub fn create_uniform_buffer(
        &self,
        size: u64,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) -> Result<Handle<Buffer>, ResourceError> {
        self.create_buffer(&BufferDescriptor::new(BufferKind::Uniform, size, data, usage))
    }

    /// Creates a texture buffer of `size` bytes holding `format` texels.
    pub fn create_texture_buffer(
        &self,
        size: u64,
        data: Option<&[u8]>,
        usage: BufferUsage,
        format: TextureFormat,
    ) -> Result<Handle<Buffer>, ResourceError> {
        self.create_buffer(&BufferDescriptor::new(
            BufferKind::Texture(format),
            size,
            data,
            usage,
        ))
    }

    /// Creates an indirect argument buffer of `size` bytes.
    pub fn create_indirect_buffer(
        &self,
        size: u64,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) -> Result<Handle<Buffer>, ResourceError> {
        self.create_buffer(&BufferDescriptor::new(BufferKind::Indirect, size, data, usage))
    }

    /// Creates a vertex array. It keeps its buffers alive.
    pub fn create_vertex_array(
        &self,
        descriptor: &VertexArrayDescriptor<'_>,
    ) -> Result<Handle<VertexArray>, ResourceError> {
        self.instantiate(
            ResourceDescription::VertexArray(descriptor),
            |ctx| descriptor.validate(ctx),
            |core| VertexArray::new(core, descriptor),
        )
    }

    /// Creates a texture of any shape.
    pub fn create_texture(
        &self,
        descriptor: &TextureDescriptor<'_>,
    ) -> Result<Handle<Texture>, ResourceError> {
        self.instantiate(
            ResourceDescription::Texture(descriptor),
            |ctx| descriptor.validate(ctx),
            |core| Texture::new(core, descriptor),
        )
    }

    fn create_shaped_texture<'a>(
        &self,
        mut descriptor: TextureDescriptor<'a>,
        flags: TextureFlags,
        data: Option<&'a [u8]>,
    ) -> Result<Handle<Texture>, ResourceError> {
        descriptor.flags = flags;
        descriptor.data = data;
        self.create_texture(&descriptor)
    }

    /// Creates a 1D texture.
    pub fn create_texture_1d(
        &self,
        width: u32,
        format: TextureFormat,
        flags: TextureFlags,
        data: Option<&[u8]>,
    ) -> Result<Handle<Texture>, ResourceError> {
        let descriptor = TextureDescriptor::new(TextureDimension::D1, width, 1, 1, format);
        self.create_shaped_texture(descriptor, flags, data)
    }

    /// Creates a 2D texture.
    pub fn create_texture_2d(
        &self,
        width: u32,
        height: u32,
        format: TextureFormat,
        flags: TextureFlags,
        data: Option<&[u8]>,
    ) -> Result<Handle<Texture>, ResourceError> {
        let descriptor = TextureDescriptor::new(TextureDimension::D2, width, height, 1, format);
        self.create_shaped_texture(descriptor, flags, data)
    }

    /// Creates a 2D texture array with `layers` slices.
    pub fn create_texture_2d_array(
        &self,
        width: u32,
        height: u32,
        layers: u32,
        format: TextureFormat,
        flags: TextureFlags,
        data: Option<&[u8]>,
    ) -> Result<Handle<Texture>, ResourceError> {
        let descriptor =
            TextureDescriptor::new(TextureDimension::D2Array, width, height, layers, format);
        self.create_shaped_texture(descriptor, flags, data)
    }

    /// Creates a 3D texture.
    pub fn create_texture_3d(
        &self,
        width: u32,
        height: u32,
        depth: u32,
        format: TextureFormat,
        flags: TextureFlags,
        data: Option<&[u8]>,
    ) -> Result<Handle<Texture>, ResourceError> {
        let descriptor = TextureDescriptor::new(TextureDimension::D3, width, height, depth, format);
        self.create_shaped_texture(descriptor, flags, data)
    }

    /// Creates a cube texture with square faces of `size` texels.
    pub fn create_texture_cube(
        &self,
        size: u32,
        format: TextureFormat,
        flags: TextureFlags,
        data: Option<&[u8]>,
    ) -> Result<Handle<Texture>, ResourceError> {
        let descriptor =
            TextureDescriptor::new(TextureDimension::Cube, size, size, CUBE_FACES, format);
        self.create_shaped_texture(descriptor, flags, data)
    }

    /// Creates a sampler state.
    pub fn create_sampler_state(
        &self,
        descriptor: &SamplerStateDescriptor<'_>,
    ) -> Result<Handle<SamplerState>, ResourceError> {
        self.instantiate(
            ResourceDescription::SamplerState(descriptor),
            |ctx| descriptor.validate(ctx),
            |core| SamplerState::new(core, descriptor),
        )
    }

    /// Creates a framebuffer. It keeps its attached textures alive.
    pub fn create_framebuffer(
        &self,
        descriptor: &FramebufferDescriptor<'_>,
    ) -> Result<Handle<Framebuffer>, ResourceError> {
        self.instantiate(
            ResourceDescription::Framebuffer(descriptor),
            |ctx| descriptor.validate(ctx),
            |core| Framebuffer::new(core, descriptor),
        )
    }

    /// Creates a swap chain presenting to a native window.
    pub fn create_swap_chain(
        &self,
        descriptor: &SwapChainDescriptor<'_>,
    ) -> Result<Handle<SwapChain>, ResourceError> {
        self.instantiate(
            ResourceDescription::SwapChain(descriptor),
            |ctx| descriptor.validate(ctx),
            |core| SwapChain::new(core, descriptor),
        )
    }

    /// Creates a resource group. It keeps its resources and samplers alive.
    pub fn create_resource_group(
        &self,
        descriptor: &ResourceGroupDescriptor<'_>,
    ) -> Result<Handle<ResourceGroup>, ResourceError> {
        self.instantiate(
            ResourceDescription::ResourceGroup(descriptor),
            |ctx| descriptor.validate(ctx),
            |core| ResourceGroup::new(core, descriptor),
        )
    }
}
