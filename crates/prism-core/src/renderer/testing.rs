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

//! Backends used by the unit tests of this crate.

use crate::renderer::api::command::*;
use crate::renderer::api::core::Capabilities;
use crate::renderer::api::resource::{ResourceId, ResourceType};
use crate::renderer::error::ResourceError;
use crate::renderer::traits::{CommandBackend, ResourceBackend, ResourceDescription};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// One command as seen by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Dispatched {
    pub(crate) opcode: Opcode,
    pub(crate) fixed: Vec<u8>,
    pub(crate) payload: Vec<u8>,
}

impl Dispatched {
    pub(crate) fn read<T: Command>(&self) -> Option<T> {
        (self.opcode == T::OPCODE).then(|| bytemuck::pod_read_unaligned(&self.fixed))
    }
}

/// Records every dispatched command, re-encoded as raw bytes.
#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub(crate) dispatched: Vec<Dispatched>,
    pub(crate) submissions: usize,
}

impl RecordingBackend {
    fn record<T: Command>(&mut self, command: &T, payload: &[u8]) {
        self.dispatched.push(Dispatched {
            opcode: T::OPCODE,
            fixed: bytemuck::bytes_of(command).to_vec(),
            payload: payload.to_vec(),
        });
    }

    pub(crate) fn opcodes(&self) -> Vec<Opcode> {
        self.dispatched.iter().map(|d| d.opcode).collect()
    }
}

impl CommandBackend for RecordingBackend {
    fn begin_submission(&mut self) {
        self.submissions += 1;
    }

    fn set_graphics_root_signature(&mut self, command: &SetGraphicsRootSignature) {
        self.record(command, &[]);
    }

    fn set_graphics_root_descriptor_table(&mut self, command: &SetGraphicsRootDescriptorTable) {
        self.record(command, &[]);
    }

    fn set_pipeline_state(&mut self, command: &SetPipelineState) {
        self.record(command, &[]);
    }

    fn set_vertex_array(&mut self, command: &SetVertexArray) {
        self.record(command, &[]);
    }

    fn set_primitive_topology(&mut self, command: &SetPrimitiveTopology) {
        self.record(command, &[]);
    }

    fn set_viewport_and_scissor_rectangle(&mut self, command: &SetViewportAndScissorRectangle) {
        self.record(command, &[]);
    }

    fn set_viewports(&mut self, viewports: &[Viewport]) {
        let command = SetViewports {
            number_of_viewports: viewports.len() as u32,
        };
        self.record(&command, bytemuck::cast_slice(viewports));
    }

    fn set_scissor_rectangles(&mut self, rectangles: &[ScissorRectangle]) {
        let command = SetScissorRectangles {
            number_of_scissor_rectangles: rectangles.len() as u32,
        };
        self.record(&command, bytemuck::cast_slice(rectangles));
    }

    fn set_render_target(&mut self, command: &SetRenderTarget) {
        self.record(command, &[]);
    }

    fn clear(&mut self, command: &Clear) {
        self.record(command, &[]);
    }

    fn resolve_multisample_framebuffer(&mut self, command: &ResolveMultisampleFramebuffer) {
        self.record(command, &[]);
    }

    fn copy_resource(&mut self, command: &CopyResource) {
        self.record(command, &[]);
    }

    fn draw(&mut self, command: &Draw) {
        self.record(command, &[]);
    }

    fn draw_indexed(&mut self, command: &DrawIndexed) {
        self.record(command, &[]);
    }

    fn draw_indirect(&mut self, command: &DrawIndirect) {
        self.record(command, &[]);
    }

    fn draw_indexed_indirect(&mut self, command: &DrawIndexedIndirect) {
        self.record(command, &[]);
    }

    fn copy_uniform_buffer_data(&mut self, command: &CopyUniformBufferData, data: &[u8]) {
        self.record(command, data);
    }

    fn copy_texture_buffer_data(&mut self, command: &CopyTextureBufferData, data: &[u8]) {
        self.record(command, data);
    }

    fn set_debug_marker(&mut self, name: &str) {
        let command = SetDebugMarker {
            name_length: name.len() as u32,
        };
        self.record(&command, name.as_bytes());
    }

    fn begin_debug_event(&mut self, name: &str) {
        let command = BeginDebugEvent {
            name_length: name.len() as u32,
        };
        self.record(&command, name.as_bytes());
    }

    fn end_debug_event(&mut self) {
        self.record(&EndDebugEvent::default(), &[]);
    }
}

/// Hands out sequential ids and remembers what is alive.
#[derive(Debug)]
pub(crate) struct MockResourceBackend {
    capabilities: Capabilities,
    next_id: AtomicU64,
    created: AtomicU64,
    live: Mutex<BTreeMap<ResourceId, ResourceType>>,
    destroyed: Mutex<Vec<ResourceId>>,
    writes: Mutex<Vec<(ResourceId, u64, Vec<u8>)>>,
}

impl MockResourceBackend {
    pub(crate) fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            next_id: AtomicU64::new(1),
            created: AtomicU64::new(0),
            live: Mutex::new(BTreeMap::new()),
            destroyed: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn created(&self) -> u64 {
        self.created.load(Ordering::SeqCst)
    }

    pub(crate) fn is_live(&self, id: ResourceId) -> bool {
        self.live.lock().unwrap().contains_key(&id)
    }

    pub(crate) fn live_count(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    pub(crate) fn destroyed(&self) -> Vec<ResourceId> {
        self.destroyed.lock().unwrap().clone()
    }

    pub(crate) fn writes(&self) -> Vec<(ResourceId, u64, Vec<u8>)> {
        self.writes.lock().unwrap().clone()
    }
}

impl ResourceBackend for MockResourceBackend {
    fn name(&self) -> &str {
        "Mock"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn create_resource(
        &self,
        description: &ResourceDescription<'_>,
    ) -> Result<ResourceId, ResourceError> {
        let id = ResourceId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.created.fetch_add(1, Ordering::SeqCst);
        self.live
            .lock()
            .unwrap()
            .insert(id, description.resource_type());
        Ok(id)
    }

    fn destroy_resource(&self, id: ResourceId, resource_type: ResourceType) {
        let removed = self.live.lock().unwrap().remove(&id);
        assert_eq!(removed, Some(resource_type), "double or foreign destroy of {id}");
        self.destroyed.lock().unwrap().push(id);
    }

    fn write_buffer(&self, id: ResourceId, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        self.writes.lock().unwrap().push((id, offset, data.to_vec()));
        Ok(())
    }

    fn resize_swap_chain(
        &self,
        id: ResourceId,
        _width: u32,
        _height: u32,
    ) -> Result<(), ResourceError> {
        if self.is_live(id) {
            Ok(())
        } else {
            Err(ResourceError::UnknownResource(id.0))
        }
    }
}
