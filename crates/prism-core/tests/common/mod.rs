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

//! Backends shared by the integration tests.

#![allow(dead_code)]

use prism_core::renderer::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// A command as observed by [`TracingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    RootSignature(SetGraphicsRootSignature),
    DescriptorTable(SetGraphicsRootDescriptorTable),
    PipelineState(SetPipelineState),
    VertexArray(SetVertexArray),
    Topology(SetPrimitiveTopology),
    ViewportAndScissor(SetViewportAndScissorRectangle),
    Viewports(Vec<Viewport>),
    Scissors(Vec<ScissorRectangle>),
    RenderTarget(SetRenderTarget),
    Clear(Clear),
    Resolve(ResolveMultisampleFramebuffer),
    Copy(CopyResource),
    Draw(Draw),
    DrawIndexed(DrawIndexed),
    DrawIndirect(DrawIndirect),
    DrawIndexedIndirect(DrawIndexedIndirect),
    UniformData(CopyUniformBufferData, Vec<u8>),
    TextureBufferData(CopyTextureBufferData, Vec<u8>),
    Marker(String),
    BeginEvent(String),
    EndEvent,
}

/// Keeps every decoded command, in dispatch order.
#[derive(Debug, Default)]
pub struct TracingBackend {
    pub calls: Vec<Call>,
    pub submissions: usize,
}

impl CommandBackend for TracingBackend {
    fn begin_submission(&mut self) {
        self.submissions += 1;
    }

    fn set_graphics_root_signature(&mut self, command: &SetGraphicsRootSignature) {
        self.calls.push(Call::RootSignature(*command));
    }

    fn set_graphics_root_descriptor_table(&mut self, command: &SetGraphicsRootDescriptorTable) {
        self.calls.push(Call::DescriptorTable(*command));
    }

    fn set_pipeline_state(&mut self, command: &SetPipelineState) {
        self.calls.push(Call::PipelineState(*command));
    }

    fn set_vertex_array(&mut self, command: &SetVertexArray) {
        self.calls.push(Call::VertexArray(*command));
    }

    fn set_primitive_topology(&mut self, command: &SetPrimitiveTopology) {
        self.calls.push(Call::Topology(*command));
    }

    fn set_viewport_and_scissor_rectangle(&mut self, command: &SetViewportAndScissorRectangle) {
        self.calls.push(Call::ViewportAndScissor(*command));
    }

    fn set_viewports(&mut self, viewports: &[Viewport]) {
        self.calls.push(Call::Viewports(viewports.to_vec()));
    }

    fn set_scissor_rectangles(&mut self, rectangles: &[ScissorRectangle]) {
        self.calls.push(Call::Scissors(rectangles.to_vec()));
    }

    fn set_render_target(&mut self, command: &SetRenderTarget) {
        self.calls.push(Call::RenderTarget(*command));
    }

    fn clear(&mut self, command: &Clear) {
        self.calls.push(Call::Clear(*command));
    }

    fn resolve_multisample_framebuffer(&mut self, command: &ResolveMultisampleFramebuffer) {
        self.calls.push(Call::Resolve(*command));
    }

    fn copy_resource(&mut self, command: &CopyResource) {
        self.calls.push(Call::Copy(*command));
    }

    fn draw(&mut self, command: &Draw) {
        self.calls.push(Call::Draw(*command));
    }

    fn draw_indexed(&mut self, command: &DrawIndexed) {
        self.calls.push(Call::DrawIndexed(*command));
    }

    fn draw_indirect(&mut self, command: &DrawIndirect) {
        self.calls.push(Call::DrawIndirect(*command));
    }

    fn draw_indexed_indirect(&mut self, command: &DrawIndexedIndirect) {
        self.calls.push(Call::DrawIndexedIndirect(*command));
    }

    fn copy_uniform_buffer_data(&mut self, command: &CopyUniformBufferData, data: &[u8]) {
        self.calls.push(Call::UniformData(*command, data.to_vec()));
    }

    fn copy_texture_buffer_data(&mut self, command: &CopyTextureBufferData, data: &[u8]) {
        self.calls.push(Call::TextureBufferData(*command, data.to_vec()));
    }

    fn set_debug_marker(&mut self, name: &str) {
        self.calls.push(Call::Marker(name.to_string()));
    }

    fn begin_debug_event(&mut self, name: &str) {
        self.calls.push(Call::BeginEvent(name.to_string()));
    }

    fn end_debug_event(&mut self) {
        self.calls.push(Call::EndEvent);
    }
}

/// A resource backend that only tracks which ids are alive.
#[derive(Debug)]
pub struct CountingResources {
    capabilities: Capabilities,
    next_id: AtomicU64,
    live: Mutex<HashSet<ResourceId>>,
    destroyed: AtomicU64,
}

impl CountingResources {
    pub fn new() -> Self {
        Self {
            capabilities: Capabilities::desktop(),
            next_id: AtomicU64::new(1),
            live: Mutex::new(HashSet::new()),
            destroyed: AtomicU64::new(0),
        }
    }

    pub fn live(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    pub fn destroyed(&self) -> u64 {
        self.destroyed.load(Ordering::SeqCst)
    }
}

impl ResourceBackend for CountingResources {
    fn name(&self) -> &str {
        "Counting"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn create_resource(
        &self,
        _description: &ResourceDescription<'_>,
    ) -> Result<ResourceId, ResourceError> {
        let id = ResourceId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.live.lock().unwrap().insert(id);
        Ok(id)
    }

    fn destroy_resource(&self, id: ResourceId, _resource_type: ResourceType) {
        assert!(self.live.lock().unwrap().remove(&id), "{id} destroyed twice");
        self.destroyed.fetch_add(1, Ordering::SeqCst);
    }

    fn write_buffer(&self, _id: ResourceId, _offset: u64, _data: &[u8]) -> Result<(), ResourceError> {
        Ok(())
    }

    fn resize_swap_chain(
        &self,
        _id: ResourceId,
        _width: u32,
        _height: u32,
    ) -> Result<(), ResourceError> {
        Ok(())
    }
}
