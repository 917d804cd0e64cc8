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

//! Vertex layouts and vertex arrays.

use super::{impl_resource, Buffer, CreationContext, Handle, ResourceCore, ResourceType};
use crate::renderer::error::ResourceError;
use std::borrow::Cow;

/// The memory format of one vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeFormat {
    /// One 32-bit float.
    Float1,
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
    /// Four 32-bit floats.
    Float4,
    /// Four 8-bit unsigned normalized components.
    R8G8B8A8Unorm,
    /// Four 8-bit unsigned integer components.
    R8G8B8A8Uint,
    /// Two 16-bit signed integers.
    Short2,
    /// Four 16-bit signed integers.
    Short4,
    /// One 32-bit unsigned integer.
    Uint1,
}

impl VertexAttributeFormat {
    /// The size in bytes of one attribute value.
    pub fn byte_size(&self) -> u32 {
        match self {
            VertexAttributeFormat::Float1 => 4,
            VertexAttributeFormat::Float2 => 8,
            VertexAttributeFormat::Float3 => 12,
            VertexAttributeFormat::Float4 => 16,
            VertexAttributeFormat::R8G8B8A8Unorm => 4,
            VertexAttributeFormat::R8G8B8A8Uint => 4,
            VertexAttributeFormat::Short2 => 4,
            VertexAttributeFormat::Short4 => 8,
            VertexAttributeFormat::Uint1 => 4,
        }
    }
}

/// One vertex attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    /// The memory format.
    pub format: VertexAttributeFormat,
    /// The attribute name in the shader.
    pub name: Cow<'static, str>,
    /// The semantic name, for backends that bind by semantic.
    pub semantic_name: Cow<'static, str>,
    /// The semantic index.
    pub semantic_index: u32,
    /// The index of the vertex buffer the attribute is read from.
    pub input_slot: u32,
    /// The offset of the attribute within one element.
    pub aligned_byte_offset: u32,
    /// The distance between two elements.
    pub stride_in_bytes: u32,
    /// `0` for per-vertex data, otherwise the number of instances sharing one element.
    pub instances_per_element: u32,
}

impl VertexAttribute {
    /// A per-vertex attribute read from slot 0.
    pub fn per_vertex(
        name: &'static str,
        format: VertexAttributeFormat,
        aligned_byte_offset: u32,
        stride_in_bytes: u32,
    ) -> Self {
        Self {
            format,
            name: Cow::Borrowed(name),
            semantic_name: Cow::Borrowed(name),
            semantic_index: 0,
            input_slot: 0,
            aligned_byte_offset,
            stride_in_bytes,
            instances_per_element: 0,
        }
    }
}

/// The vertex layout shared by pipeline states and vertex arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexAttributes {
    /// The attributes.
    pub attributes: Vec<VertexAttribute>,
}

impl VertexAttributes {
    /// Wraps a list of attributes.
    pub fn new(attributes: Vec<VertexAttribute>) -> Self {
        Self { attributes }
    }

    /// Returns `true` if any attribute is per-instance.
    pub fn is_instanced(&self) -> bool {
        self.attributes
            .iter()
            .any(|attribute| attribute.instances_per_element > 0)
    }
}

/// A descriptor used to create a [`VertexArray`].
#[derive(Debug, Clone)]
pub struct VertexArrayDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The vertex layout.
    pub vertex_attributes: VertexAttributes,
    /// The vertex buffers, addressed by [`VertexAttribute::input_slot`].
    pub vertex_buffers: Vec<Handle<Buffer>>,
    /// The index buffer, if the geometry is indexed.
    pub index_buffer: Option<Handle<Buffer>>,
}

impl VertexArrayDescriptor<'_> {
    pub(crate) fn validate(&self, ctx: &CreationContext<'_>) -> Result<(), ResourceError> {
        let invalid = |details: String| ResourceError::InvalidDescriptor {
            resource_type: ResourceType::VertexArray,
            details,
        };
        if let Some(buffer) = self
            .vertex_buffers
            .iter()
            .find(|buffer| buffer.resource_type() != ResourceType::VertexBuffer)
        {
            return Err(invalid(format!(
                "{:?} {} used as a vertex buffer",
                buffer.resource_type(),
                buffer.id()
            )));
        }
        if let Some(buffer) = self
            .index_buffer
            .as_ref()
            .filter(|buffer| buffer.resource_type() != ResourceType::IndexBuffer)
        {
            return Err(invalid(format!(
                "{:?} {} used as an index buffer",
                buffer.resource_type(),
                buffer.id()
            )));
        }
        if let Some(attribute) = self
            .vertex_attributes
            .attributes
            .iter()
            .find(|attribute| attribute.input_slot as usize >= self.vertex_buffers.len())
        {
            return Err(invalid(format!(
                "attribute '{}' reads slot {} but only {} vertex buffers are bound",
                attribute.name,
                attribute.input_slot,
                self.vertex_buffers.len()
            )));
        }
        if self.vertex_attributes.is_instanced() && !ctx.capabilities.instanced_arrays {
            return Err(ctx.unsupported("per-instance vertex attributes"));
        }
        Ok(())
    }
}

/// A set of vertex buffers, an optional index buffer and their layout.
///
/// The vertex array keeps its buffers alive.
#[derive(Debug)]
pub struct VertexArray {
    core: ResourceCore,
    vertex_attributes: VertexAttributes,
    vertex_buffers: Vec<Handle<Buffer>>,
    index_buffer: Option<Handle<Buffer>>,
}

impl_resource!(VertexArray);

impl VertexArray {
    pub(crate) fn new(core: ResourceCore, descriptor: &VertexArrayDescriptor<'_>) -> Self {
        Self {
            core,
            vertex_attributes: descriptor.vertex_attributes.clone(),
            vertex_buffers: descriptor.vertex_buffers.clone(),
            index_buffer: descriptor.index_buffer.clone(),
        }
    }

    /// The vertex layout.
    pub fn vertex_attributes(&self) -> &VertexAttributes {
        &self.vertex_attributes
    }

    /// The vertex buffers.
    pub fn vertex_buffers(&self) -> &[Handle<Buffer>] {
        &self.vertex_buffers
    }

    /// The index buffer, if any.
    pub fn index_buffer(&self) -> Option<&Handle<Buffer>> {
        self.index_buffer.as_ref()
    }
}
