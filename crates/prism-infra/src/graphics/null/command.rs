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


//! The command side of the Null backend.

use super::device::NullDevice;
use prism_core::renderer::api::command::{
    Clear, CopyResource, CopyTextureBufferData, CopyUniformBufferData, Draw, DrawIndexed,
    DrawIndexedIndirect, DrawIndirect, ResolveMultisampleFramebuffer, ScissorRectangle,
    SetGraphicsRootDescriptorTable, SetGraphicsRootSignature, SetPipelineState,
    SetPrimitiveTopology, SetRenderTarget, SetVertexArray, SetViewportAndScissorRectangle,
    Viewport,
};
use prism_core::renderer::api::{DispatchStats, ResourceId, ResourceType};
use prism_core::renderer::traits::ResourceBackend;
use prism_core::renderer::{CommandBackend, StateCache};

/// A command backend that checks and counts commands instead of executing them.
///
/// Ids are looked up in the shared [`NullDevice`]; a command naming a resource the
/// device does not know is logged and skipped, the way a real backend skips a binding
/// it cannot resolve. Redundant bindings are elided through a [`StateCache`].
#[derive(Debug)]
pub struct NullCommandBackend {
    device: NullDevice,
    state_cache: StateCache,
    stats: DispatchStats,
    render_target: ResourceId,
    debug_event_depth: u32,
}

impl NullCommandBackend {
    /// Creates a command backend resolving ids through `device`.
    pub fn new(device: NullDevice, state_cache: bool) -> Self {
        Self {
            device,
            state_cache: StateCache::new(state_cache),
            stats: DispatchStats::default(),
            render_target: ResourceId::NULL,
            debug_event_depth: 0,
        }
    }

    /// The device this backend resolves ids through.
    pub fn device(&self) -> &NullDevice {
        &self.device
    }

    /// The counters collected since creation or the last [`reset_stats`](Self::reset_stats).
    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Resets the counters.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// The redundant-state filter.
    pub fn state_cache(&self) -> &StateCache {
        &self.state_cache
    }

    /// The bound render target, null if none.
    pub fn render_target(&self) -> ResourceId {
        self.render_target
    }

    /// The number of debug events opened and not closed yet.
    pub fn debug_event_depth(&self) -> u32 {
        self.debug_event_depth
    }

    /// Looks `id` up in the device and checks its type.
    fn resolve(&self, what: &str, id: ResourceId, accept: impl Fn(ResourceType) -> bool) -> bool {
        match self.device.resource_type(id) {
            Some(resource_type) if accept(resource_type) => true,
            Some(resource_type) => {
                log::warn!("NullCommandBackend: {what} {id} is a {resource_type:?}.");
                false
            }
            None => {
                log::warn!("NullCommandBackend: {what} {id} not found.");
                false
            }
        }
    }

    /// Counts a state change that passed (or was filtered by) the state cache.
    fn state_change(&mut self, changed: bool) {
        if changed {
            self.stats.state_changes += 1;
        } else {
            self.stats.elided_state_changes += 1;
        }
    }

    fn upload(&mut self, what: &str, id: ResourceId, data: &[u8], expected: ResourceType) {
        self.stats.commands_dispatched += 1;
        if !self.resolve(what, id, |t| t == expected) {
            return;
        }
        if let Err(e) = self.device.upload(id, data) {
            log::warn!("NullCommandBackend: Upload to {what} {id} failed: {e}");
            return;
        }
        let uploaded = data.len() as u64;
        match expected {
            ResourceType::TextureBuffer => self.stats.texture_buffer_bytes_uploaded += uploaded,
            _ => self.stats.uniform_bytes_uploaded += uploaded,
        }
    }
}

impl CommandBackend for NullCommandBackend {
    fn begin_submission(&mut self) {
        self.stats.submissions += 1;
        log::trace!("NullCommandBackend: Begin submission #{}", self.stats.submissions);
    }

    fn end_submission(&mut self) {
        if self.debug_event_depth > 0 {
            log::warn!(
                "NullCommandBackend: Submission ended with {} open debug event(s).",
                self.debug_event_depth
            );
        }
        log::trace!("NullCommandBackend: End submission #{}", self.stats.submissions);
    }

    fn set_graphics_root_signature(&mut self, command: &SetGraphicsRootSignature) {
        self.stats.commands_dispatched += 1;
        let id = command.root_signature;
        if self.resolve("RootSignature", id, |t| t == ResourceType::RootSignature) {
            let changed = self.state_cache.should_set_root_signature(id);
            self.state_change(changed);
        }
    }

    fn set_graphics_root_descriptor_table(&mut self, command: &SetGraphicsRootDescriptorTable) {
        self.stats.commands_dispatched += 1;
        let expected = ResourceType::from_raw(command.resource_type);
        if self.resolve("Descriptor table resource", command.resource, |t| Some(t) == expected) {
            log::trace!(
                "NullCommandBackend: Root parameter {} <- {}",
                command.root_parameter_index,
                command.resource
            );
            self.state_change(true);
        }
    }

    fn set_pipeline_state(&mut self, command: &SetPipelineState) {
        self.stats.commands_dispatched += 1;
        let id = command.pipeline_state;
        if self.resolve("PipelineState", id, |t| t == ResourceType::PipelineState) {
            let changed = self.state_cache.should_set_pipeline_state(id);
            self.state_change(changed);
        }
    }

    fn set_vertex_array(&mut self, command: &SetVertexArray) {
        self.stats.commands_dispatched += 1;
        let id = command.vertex_array;
        if self.resolve("VertexArray", id, |t| t == ResourceType::VertexArray) {
            let changed = self.state_cache.should_set_vertex_array(id);
            self.state_change(changed);
        }
    }

    fn set_primitive_topology(&mut self, command: &SetPrimitiveTopology) {
        self.stats.commands_dispatched += 1;
        match command.topology() {
            Some(topology) => {
                let changed = self.state_cache.should_set_primitive_topology(topology);
                self.state_change(changed);
            }
            None => log::warn!(
                "NullCommandBackend: Unknown primitive topology {}.",
                command.topology
            ),
        }
    }

    fn set_viewport_and_scissor_rectangle(&mut self, command: &SetViewportAndScissorRectangle) {
        self.stats.commands_dispatched += 1;
        log::trace!(
            "NullCommandBackend: Viewport ({}, {}) {}x{}",
            command.top_left_x,
            command.top_left_y,
            command.width,
            command.height
        );
        self.state_change(true);
    }

    fn set_viewports(&mut self, viewports: &[Viewport]) {
        self.stats.commands_dispatched += 1;
        let max_viewports = self.device.capabilities().max_viewports as usize;
        if viewports.len() > max_viewports {
            log::warn!(
                "NullCommandBackend: {} viewports set, the device supports {max_viewports}.",
                viewports.len()
            );
        }
        self.state_change(true);
    }

    fn set_scissor_rectangles(&mut self, rectangles: &[ScissorRectangle]) {
        self.stats.commands_dispatched += 1;
        log::trace!("NullCommandBackend: {} scissor rectangle(s)", rectangles.len());
        self.state_change(true);
    }

    fn set_render_target(&mut self, command: &SetRenderTarget) {
        self.stats.commands_dispatched += 1;
        let id = command.render_target;
        let expected = command.target_type();
        if id.is_null()
            || self.resolve("Render target", id, |t| t.is_render_target() && Some(t) == expected)
        {
            self.render_target = id;
            let changed = self.state_cache.should_set_render_target(id);
            self.state_change(changed);
        }
    }

    fn clear(&mut self, command: &Clear) {
        self.stats.commands_dispatched += 1;
        if self.render_target.is_null() {
            log::warn!("NullCommandBackend: Clear without a bound render target.");
            return;
        }
        log::trace!(
            "NullCommandBackend: Clear {:?} to {:?}",
            command.clear_flags(),
            command.color
        );
    }

    fn resolve_multisample_framebuffer(&mut self, command: &ResolveMultisampleFramebuffer) {
        self.stats.commands_dispatched += 1;
        let _ = self.resolve("Resolve source", command.source, |t| {
            t == ResourceType::Framebuffer
        }) && self.resolve("Resolve destination", command.destination, |t| {
            t.is_render_target()
        });
    }

    fn copy_resource(&mut self, command: &CopyResource) {
        self.stats.commands_dispatched += 1;
        let expected = ResourceType::from_raw(command.resource_type);
        let _ = self.resolve("Copy source", command.source, |t| Some(t) == expected)
            && self.resolve("Copy destination", command.destination, |t| Some(t) == expected);
    }

    fn draw(&mut self, command: &Draw) {
        self.stats.commands_dispatched += 1;
        self.stats.draw_calls += 1;
        log::trace!(
            "NullCommandBackend: Draw {} vertices x {} instances",
            command.number_of_vertices_per_instance,
            command.number_of_instances
        );
    }

    fn draw_indexed(&mut self, command: &DrawIndexed) {
        self.stats.commands_dispatched += 1;
        self.stats.draw_calls += 1;
        log::trace!(
            "NullCommandBackend: DrawIndexed {} indices x {} instances",
            command.number_of_indices_per_instance,
            command.number_of_instances
        );
    }

    fn draw_indirect(&mut self, command: &DrawIndirect) {
        self.stats.commands_dispatched += 1;
        if self.resolve("Indirect buffer", command.indirect_buffer, |t| {
            t == ResourceType::IndirectBuffer
        }) {
            self.stats.draw_calls += 1;
        }
    }

    fn draw_indexed_indirect(&mut self, command: &DrawIndexedIndirect) {
        self.stats.commands_dispatched += 1;
        if self.resolve("Indirect buffer", command.indirect_buffer, |t| {
            t == ResourceType::IndirectBuffer
        }) {
            self.stats.draw_calls += 1;
        }
    }

    fn copy_uniform_buffer_data(&mut self, command: &CopyUniformBufferData, data: &[u8]) {
        self.upload(
            "Uniform buffer",
            command.uniform_buffer,
            data,
            ResourceType::UniformBuffer,
        );
    }

    fn copy_texture_buffer_data(&mut self, command: &CopyTextureBufferData, data: &[u8]) {
        self.upload(
            "Texture buffer",
            command.texture_buffer,
            data,
            ResourceType::TextureBuffer,
        );
    }

    fn set_debug_marker(&mut self, name: &str) {
        self.stats.commands_dispatched += 1;
        log::trace!("NullCommandBackend: Marker '{name}'");
    }

    fn begin_debug_event(&mut self, name: &str) {
        self.stats.commands_dispatched += 1;
        self.debug_event_depth += 1;
        log::trace!("NullCommandBackend: Begin event '{name}'");
    }

    fn end_debug_event(&mut self) {
        self.stats.commands_dispatched += 1;
        match self.debug_event_depth.checked_sub(1) {
            Some(depth) => self.debug_event_depth = depth,
            None => log::warn!("NullCommandBackend: End of a debug event that was never begun."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::renderer::api::{BufferUsage, ClearFlags, PrimitiveTopology, TextureFormat};
    use prism_core::{CommandBuffer, Renderer};
    use std::sync::Arc;

    fn setup(state_cache: bool) -> (Renderer, NullCommandBackend) {
        let device = NullDevice::default();
        let renderer = Renderer::new(Arc::new(device.clone()));
        (renderer, NullCommandBackend::new(device, state_cache))
    }

    #[test]
    fn draws_and_submissions_are_counted() {
        let (_renderer, mut backend) = setup(true);
        let mut buffer = CommandBuffer::new();
        buffer.push(Draw::vertices(3));
        buffer.push(DrawIndexed::indices(6));
        buffer.submit(&mut backend);
        buffer.submit(&mut backend);

        let stats = backend.stats();
        assert_eq!(stats.submissions, 2);
        assert_eq!(stats.draw_calls, 4);
        assert_eq!(stats.commands_dispatched, 4);
    }

    #[test]
    fn redundant_topology_changes_are_elided() {
        let (_renderer, mut backend) = setup(true);
        for _ in 0..3 {
            backend.set_primitive_topology(&SetPrimitiveTopology::new(
                PrimitiveTopology::TriangleList,
            ));
        }
        assert_eq!(backend.stats().state_changes, 1);
        assert_eq!(backend.stats().elided_state_changes, 2);
    }

    #[test]
    fn disabled_cache_forwards_every_change() {
        let (_renderer, mut backend) = setup(false);
        for _ in 0..3 {
            backend.set_primitive_topology(&SetPrimitiveTopology::new(
                PrimitiveTopology::TriangleList,
            ));
        }
        assert_eq!(backend.stats().state_changes, 3);
        assert_eq!(backend.stats().elided_state_changes, 0);
    }

    #[test]
    fn unknown_ids_are_skipped() {
        let (_renderer, mut backend) = setup(true);
        backend.set_pipeline_state(&SetPipelineState {
            pipeline_state: ResourceId(1234),
        });
        backend.draw_indirect(&DrawIndirect {
            indirect_buffer: ResourceId(1234),
            indirect_buffer_offset: 0,
            number_of_draws: 1,
        });
        assert_eq!(backend.stats().state_changes, 0);
        assert_eq!(backend.stats().draw_calls, 0);
        assert_eq!(backend.stats().commands_dispatched, 2);
    }

    #[test]
    fn uniform_uploads_reach_the_device() {
        let (renderer, mut backend) = setup(true);
        let uniforms = renderer
            .create_uniform_buffer(4, None, BufferUsage::DynamicDraw)
            .expect("buffer");
        let command = CopyUniformBufferData {
            uniform_buffer: uniforms.id(),
        };
        backend.copy_uniform_buffer_data(&command, &[1, 2, 3, 4]);

        assert_eq!(backend.stats().uniform_bytes_uploaded, 4);
        assert_eq!(
            backend.device().buffer_contents(uniforms.id()),
            Some(vec![1, 2, 3, 4])
        );
    }

    #[test]
    fn texture_buffer_uploads_are_counted_apart() {
        let (renderer, mut backend) = setup(true);
        let texels = renderer
            .create_texture_buffer(16, None, BufferUsage::DynamicDraw, TextureFormat::Rgba8Unorm)
            .expect("texture buffer");
        let command = CopyTextureBufferData {
            texture_buffer: texels.id(),
        };
        backend.copy_texture_buffer_data(&command, &[7; 8]);

        let stats = backend.stats();
        assert_eq!(stats.texture_buffer_bytes_uploaded, 8);
        assert_eq!(stats.uniform_bytes_uploaded, 0);
        assert_eq!(
            backend.device().buffer_contents(texels.id()).map(|c| c[..8].to_vec()),
            Some(vec![7; 8])
        );
    }

    #[test]
    fn clear_needs_a_render_target() {
        let (_renderer, mut backend) = setup(true);
        backend.clear(&Clear::new(ClearFlags::COLOR, [0.0; 4], 1.0, 0));
        assert_eq!(backend.stats().commands_dispatched, 1);

        backend.set_render_target(&SetRenderTarget::new(ResourceId(77), ResourceType::SwapChain));
        assert_eq!(backend.render_target(), ResourceId::NULL);
        assert_eq!(backend.stats().state_changes, 0);
    }

    #[test]
    fn debug_events_are_balanced() {
        let (_renderer, mut backend) = setup(true);
        backend.begin_debug_event("frame");
        backend.begin_debug_event("shadows");
        assert_eq!(backend.debug_event_depth(), 2);
        backend.end_debug_event();
        backend.end_debug_event();
        backend.end_debug_event();
        assert_eq!(backend.debug_event_depth(), 0);
    }
}
