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

//! Describes what a backend can do.

/// The limits and optional features of a backend.
///
/// The resource factory checks requests against these values before asking the backend
/// for a native object. A request the backend cannot honour is logged and rejected with
/// [`ResourceError::Unsupported`](crate::renderer::ResourceError::Unsupported).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// Maximum number of viewports that can be set at once.
    pub max_viewports: u32,
    /// Maximum number of color attachments of a framebuffer.
    pub max_simultaneous_render_targets: u32,
    /// Maximum width, height and depth of a texture.
    pub max_texture_dimension: u32,
    /// Maximum number of slices of a 2D texture array.
    pub max_2d_texture_array_slices: u32,
    /// Maximum size in bytes of a uniform buffer.
    pub max_uniform_buffer_size: u64,
    /// Maximum size in bytes of a texture buffer.
    pub max_texture_buffer_size: u64,
    /// Maximum size in bytes of an indirect buffer.
    pub max_indirect_buffer_size: u64,
    /// Whether 32-bit indices are supported.
    pub uint_indices: bool,
    /// Whether per-instance vertex attributes are supported.
    pub instanced_arrays: bool,
    /// Whether draws may specify more than one instance.
    pub draw_instanced: bool,
    /// Whether indexed draws may specify a base vertex.
    pub base_vertex: bool,
    /// Whether geometry shaders are supported.
    pub geometry_shader: bool,
    /// Whether tessellation control and evaluation shaders are supported.
    pub tessellation_shaders: bool,
    /// Maximum number of vertices per tessellation patch; `0` without tessellation.
    pub max_patch_vertices: u32,
}

impl Capabilities {
    /// Capabilities of a modern desktop class backend.
    pub fn desktop() -> Self {
        Self {
            max_viewports: 16,
            max_simultaneous_render_targets: 8,
            max_texture_dimension: 16384,
            max_2d_texture_array_slices: 2048,
            max_uniform_buffer_size: 64 * 1024,
            max_texture_buffer_size: 128 * 1024 * 1024,
            max_indirect_buffer_size: 128 * 1024 * 1024,
            uint_indices: true,
            instanced_arrays: true,
            draw_instanced: true,
            base_vertex: true,
            geometry_shader: true,
            tessellation_shaders: true,
            max_patch_vertices: 32,
        }
    }

    /// Capabilities of a minimal mobile class backend, without instancing, geometry or
    /// tessellation support and with 16-bit indices only.
    pub fn minimal() -> Self {
        Self {
            max_viewports: 1,
            max_simultaneous_render_targets: 1,
            max_texture_dimension: 2048,
            max_2d_texture_array_slices: 0,
            max_uniform_buffer_size: 16 * 1024,
            max_texture_buffer_size: 0,
            max_indirect_buffer_size: 0,
            uint_indices: false,
            instanced_arrays: false,
            draw_instanced: false,
            base_vertex: false,
            geometry_shader: false,
            tessellation_shaders: false,
            max_patch_vertices: 0,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::desktop()
    }
}
