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

//! Defines data structures related to GPU buffer resources.

use super::{display_label, impl_resource, CreationContext, ResourceCore, ResourceType};
use crate::renderer::api::util::{BufferUsage, IndexFormat, TextureFormat};
use crate::renderer::error::ResourceError;
use std::borrow::Cow;

/// What a buffer holds. Each kind maps to its own [`ResourceType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Per-vertex data.
    Vertex,
    /// Indices of the given format.
    Index(IndexFormat),
    /// Constant data read by shaders.
    Uniform,
    /// Texels of the given format read by shaders.
    Texture(TextureFormat),
    /// Draw arguments read by indirect draws.
    Indirect,
}

impl BufferKind {
    /// The resource type of a buffer of this kind.
    pub const fn resource_type(&self) -> ResourceType {
        match self {
            BufferKind::Vertex => ResourceType::VertexBuffer,
            BufferKind::Index(_) => ResourceType::IndexBuffer,
            BufferKind::Uniform => ResourceType::UniformBuffer,
            BufferKind::Texture(_) => ResourceType::TextureBuffer,
            BufferKind::Indirect => ResourceType::IndirectBuffer,
        }
    }

    /// The size of one element; the buffer size must be a multiple of it.
    fn element_size(&self) -> u64 {
        match self {
            BufferKind::Vertex | BufferKind::Uniform => 1,
            BufferKind::Index(format) => format.byte_size(),
            BufferKind::Texture(format) => u64::from(format.bytes_per_pixel()),
            BufferKind::Indirect => 4,
        }
    }
}

/// A descriptor used to create a [`Buffer`].
#[derive(Debug, Clone)]
pub struct BufferDescriptor<'a> {
    /// An optional debug label for the buffer.
    pub label: Option<Cow<'a, str>>,
    /// What the buffer holds.
    pub kind: BufferKind,
    /// The total size of the buffer in bytes.
    pub size: u64,
    /// How often the CPU is expected to update the buffer.
    pub usage: BufferUsage,
    /// The initial contents. When present it must be exactly `size` bytes long.
    pub data: Option<&'a [u8]>,
}

impl<'a> BufferDescriptor<'a> {
    /// An unnamed buffer of the given kind.
    pub fn new(kind: BufferKind, size: u64, data: Option<&'a [u8]>, usage: BufferUsage) -> Self {
        Self {
            label: None,
            kind,
            size,
            usage,
            data,
        }
    }

    /// Sets the debug label.
    pub fn with_label(mut self, label: impl Into<Cow<'a, str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub(crate) fn validate(&self, ctx: &CreationContext<'_>) -> Result<(), ResourceError> {
        let resource_type = self.kind.resource_type();
        if self.size == 0 {
            return Err(ResourceError::ZeroSized {
                resource_type,
                label: display_label(self.label.as_deref()),
            });
        }
        if let Some(data) = self.data {
            if data.len() as u64 != self.size {
                return Err(ResourceError::DataSizeMismatch {
                    resource_type,
                    expected: self.size,
                    actual: data.len() as u64,
                });
            }
        }
        if self.size % self.kind.element_size() != 0 {
            return Err(ResourceError::InvalidDescriptor {
                resource_type,
                details: format!(
                    "size {} is not a multiple of the element size {}",
                    self.size,
                    self.kind.element_size()
                ),
            });
        }

        let caps = ctx.capabilities;
        match self.kind {
            BufferKind::Index(IndexFormat::Uint32) if !caps.uint_indices => {
                Err(ctx.unsupported("32-bit indices"))
            }
            BufferKind::Uniform if self.size > caps.max_uniform_buffer_size => Err(ctx.unsupported(
                format!("uniform buffers of {} bytes", self.size),
            )),
            BufferKind::Texture(_) if self.size > caps.max_texture_buffer_size => Err(ctx
                .unsupported(format!("texture buffers of {} bytes", self.size))),
            BufferKind::Indirect if self.size > caps.max_indirect_buffer_size => Err(ctx
                .unsupported(format!("indirect buffers of {} bytes", self.size))),
            _ => Ok(()),
        }
    }
}

/// A GPU buffer.
#[derive(Debug)]
pub struct Buffer {
    core: ResourceCore,
    kind: BufferKind,
    size: u64,
    usage: BufferUsage,
}

impl_resource!(Buffer);

impl Buffer {
    pub(crate) fn new(core: ResourceCore, descriptor: &BufferDescriptor<'_>) -> Self {
        Self {
            core,
            kind: descriptor.kind,
            size: descriptor.size,
            usage: descriptor.usage,
        }
    }

    /// What the buffer holds.
    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    /// The total size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// The expected update frequency.
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// The index format of an index buffer.
    pub fn index_format(&self) -> Option<IndexFormat> {
        match self.kind {
            BufferKind::Index(format) => Some(format),
            _ => None,
        }
    }

    /// Copies `data` into the buffer at `offset`.
    ///
    /// The write happens immediately. Sequencing it against submissions that read the same
    /// buffer is up to the caller.
    pub fn copy_data_from(&self, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        let size = data.len() as u64;
        if offset.checked_add(size).is_none_or(|end| end > self.size) {
            return Err(ResourceError::OutOfBounds {
                offset,
                size,
                capacity: self.size,
            });
        }
        self.core.backend().write_buffer(self.core.id(), offset, data)
    }
}
