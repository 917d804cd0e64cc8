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

use crate::renderer::api::command::{
    Clear, CopyResource, CopyTextureBufferData, CopyUniformBufferData, Draw, DrawIndexed,
    DrawIndexedIndirect, DrawIndirect, ResolveMultisampleFramebuffer, ScissorRectangle,
    SetGraphicsRootDescriptorTable, SetGraphicsRootSignature, SetPipelineState,
    SetPrimitiveTopology, SetRenderTarget, SetVertexArray, SetViewportAndScissorRectangle,
    Viewport,
};

/// The command side of a graphics backend.
///
/// Submitting a [`CommandBuffer`](crate::renderer::CommandBuffer) or a
/// [`CommandBucket`](crate::renderer::CommandBucket) decodes each command and calls the
/// matching method with its fixed arguments, plus the payload where the command carries
/// one. The methods are also the immediate-mode API: calling them directly executes a
/// command without encoding it.
///
/// Implementations may skip native calls whose state is already current, see
/// [`StateCache`](crate::renderer::StateCache).
pub trait CommandBackend {
    /// Called before the first command of a submission.
    fn begin_submission(&mut self) {}

    /// Called after the last command of a submission.
    fn end_submission(&mut self) {}

    /// Binds a root signature.
    fn set_graphics_root_signature(&mut self, command: &SetGraphicsRootSignature);

    /// Binds a resource to a root parameter.
    fn set_graphics_root_descriptor_table(&mut self, command: &SetGraphicsRootDescriptorTable);

    /// Binds a pipeline state.
    fn set_pipeline_state(&mut self, command: &SetPipelineState);

    /// Binds a vertex array.
    fn set_vertex_array(&mut self, command: &SetVertexArray);

    /// Sets the primitive topology.
    fn set_primitive_topology(&mut self, command: &SetPrimitiveTopology);

    /// Sets one viewport and the matching scissor rectangle.
    fn set_viewport_and_scissor_rectangle(&mut self, command: &SetViewportAndScissorRectangle);

    /// Sets several viewports.
    fn set_viewports(&mut self, viewports: &[Viewport]);

    /// Sets several scissor rectangles.
    fn set_scissor_rectangles(&mut self, rectangles: &[ScissorRectangle]);

    /// Binds a render target, or unbinds it when the id is null.
    fn set_render_target(&mut self, command: &SetRenderTarget);

    /// Clears the bound render target.
    fn clear(&mut self, command: &Clear);

    /// Resolves a multisampled framebuffer.
    fn resolve_multisample_framebuffer(&mut self, command: &ResolveMultisampleFramebuffer);

    /// Copies a resource into another one.
    fn copy_resource(&mut self, command: &CopyResource);

    /// Draws non-indexed primitives.
    fn draw(&mut self, command: &Draw);

    /// Draws indexed primitives.
    fn draw_indexed(&mut self, command: &DrawIndexed);

    /// Draws non-indexed primitives with indirect arguments.
    fn draw_indirect(&mut self, command: &DrawIndirect);

    /// Draws indexed primitives with indirect arguments.
    fn draw_indexed_indirect(&mut self, command: &DrawIndexedIndirect);

    /// Copies `data` into a uniform buffer.
    fn copy_uniform_buffer_data(&mut self, command: &CopyUniformBufferData, data: &[u8]);

    /// Copies `data` into a texture buffer.
    fn copy_texture_buffer_data(&mut self, command: &CopyTextureBufferData, data: &[u8]);

    /// Inserts a debug marker.
    fn set_debug_marker(&mut self, _name: &str) {}

    /// Opens a debug event.
    fn begin_debug_event(&mut self, _name: &str) {}

    /// Closes the innermost debug event.
    fn end_debug_event(&mut self) {}
}

// Lets a boxed backend, e.g. the one a backend factory returns, be wrapped or submitted to.
impl<B: CommandBackend + ?Sized> CommandBackend for Box<B> {
    fn begin_submission(&mut self) {
        (**self).begin_submission();
    }

    fn end_submission(&mut self) {
        (**self).end_submission();
    }

    fn set_graphics_root_signature(&mut self, command: &SetGraphicsRootSignature) {
        (**self).set_graphics_root_signature(command);
    }

    fn set_graphics_root_descriptor_table(&mut self, command: &SetGraphicsRootDescriptorTable) {
        (**self).set_graphics_root_descriptor_table(command);
    }

    fn set_pipeline_state(&mut self, command: &SetPipelineState) {
        (**self).set_pipeline_state(command);
    }

    fn set_vertex_array(&mut self, command: &SetVertexArray) {
        (**self).set_vertex_array(command);
    }

    fn set_primitive_topology(&mut self, command: &SetPrimitiveTopology) {
        (**self).set_primitive_topology(command);
    }

    fn set_viewport_and_scissor_rectangle(&mut self, command: &SetViewportAndScissorRectangle) {
        (**self).set_viewport_and_scissor_rectangle(command);
    }

    fn set_viewports(&mut self, viewports: &[Viewport]) {
        (**self).set_viewports(viewports);
    }

    fn set_scissor_rectangles(&mut self, rectangles: &[ScissorRectangle]) {
        (**self).set_scissor_rectangles(rectangles);
    }

    fn set_render_target(&mut self, command: &SetRenderTarget) {
        (**self).set_render_target(command);
    }

    fn clear(&mut self, command: &Clear) {
        (**self).clear(command);
    }

    fn resolve_multisample_framebuffer(&mut self, command: &ResolveMultisampleFramebuffer) {
        (**self).resolve_multisample_framebuffer(command);
    }

    fn copy_resource(&mut self, command: &CopyResource) {
        (**self).copy_resource(command);
    }

    fn draw(&mut self, command: &Draw) {
        (**self).draw(command);
    }

    fn draw_indexed(&mut self, command: &DrawIndexed) {
        (**self).draw_indexed(command);
    }

    fn draw_indirect(&mut self, command: &DrawIndirect) {
        (**self).draw_indirect(command);
    }

    fn draw_indexed_indirect(&mut self, command: &DrawIndexedIndirect) {
        (**self).draw_indexed_indirect(command);
    }

    fn copy_uniform_buffer_data(&mut self, command: &CopyUniformBufferData, data: &[u8]) {
        (**self).copy_uniform_buffer_data(command, data);
    }

    fn copy_texture_buffer_data(&mut self, command: &CopyTextureBufferData, data: &[u8]) {
        (**self).copy_texture_buffer_data(command, data);
    }

    fn set_debug_marker(&mut self, name: &str) {
        (**self).set_debug_marker(name);
    }

    fn begin_debug_event(&mut self, name: &str) {
        (**self).begin_debug_event(name);
    }

    fn end_debug_event(&mut self) {
        (**self).end_debug_event();
    }
}
