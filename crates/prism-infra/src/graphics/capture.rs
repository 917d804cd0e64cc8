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


//! A command backend decorator that publishes every dispatched command on a channel.
//!
//! Captures are meant for tools: a frame debugger or a test harness holds the receiver
//! and inspects the exact command sequence a submission produced, while the wrapped
//! backend keeps executing it.

use prism_core::renderer::api::command::{
    BeginDebugEvent, Clear, Command, CopyResource, CopyTextureBufferData, CopyUniformBufferData,
    Draw, DrawIndexed, DrawIndexedIndirect, DrawIndirect, EndDebugEvent, Opcode,
    ResolveMultisampleFramebuffer, ScissorRectangle, SetDebugMarker,
    SetGraphicsRootDescriptorTable, SetGraphicsRootSignature, SetPipelineState,
    SetPrimitiveTopology, SetRenderTarget, SetScissorRectangles, SetVertexArray,
    SetViewportAndScissorRectangle, SetViewports, Viewport,
};
use prism_core::renderer::CommandBackend;

/// One command as it reached the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedCommand {
    /// The command type.
    pub opcode: Opcode,
    /// The bytes of the fixed arguments.
    pub fixed: Vec<u8>,
    /// The auxiliary payload, empty for most commands.
    pub payload: Vec<u8>,
}

impl CapturedCommand {
    fn new<T: Command>(command: &T, payload: &[u8]) -> Self {
        Self {
            opcode: T::OPCODE,
            fixed: bytemuck::bytes_of(command).to_vec(),
            payload: payload.to_vec(),
        }
    }

    /// Reads the fixed arguments back, if the command is a `T`.
    pub fn read<T: Command>(&self) -> Option<T> {
        (self.opcode == T::OPCODE).then(|| bytemuck::pod_read_unaligned(&self.fixed))
    }
}

/// What a [`CaptureBackend`] publishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// A buffer or bucket submission started.
    BeginSubmission,
    /// A command was dispatched.
    Command(CapturedCommand),
    /// The submission ended.
    EndSubmission,
}

/// Wraps a command backend and publishes what it is asked to do.
#[derive(Debug)]
pub struct CaptureBackend<B> {
    inner: B,
    sender: flume::Sender<CaptureEvent>,
}

impl<B: CommandBackend> CaptureBackend<B> {
    /// Wraps `inner` and returns the receiving end of the capture channel.
    pub fn new(inner: B) -> (Self, flume::Receiver<CaptureEvent>) {
        let (sender, receiver) = flume::unbounded();
        log::info!("CaptureBackend: Capture channel opened.");
        (Self { inner, sender }, receiver)
    }

    /// The wrapped backend.
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// The wrapped backend.
    pub fn inner_mut(&mut self) -> &mut B {
        &mut self.inner
    }

    /// Stops capturing and returns the wrapped backend.
    pub fn into_inner(self) -> B {
        self.inner
    }

    fn publish(&self, event: CaptureEvent) {
        // A dropped receiver only means nobody is watching anymore.
        if self.sender.send(event).is_err() {
            log::trace!("CaptureBackend: Receiver disconnected, event dropped.");
        }
    }

    fn record<T: Command>(&self, command: &T, payload: &[u8]) {
        self.publish(CaptureEvent::Command(CapturedCommand::new(command, payload)));
    }
}

impl<B: CommandBackend> CommandBackend for CaptureBackend<B> {
    fn begin_submission(&mut self) {
        self.publish(CaptureEvent::BeginSubmission);
        self.inner.begin_submission();
    }

    fn end_submission(&mut self) {
        self.inner.end_submission();
        self.publish(CaptureEvent::EndSubmission);
    }

    fn set_graphics_root_signature(&mut self, command: &SetGraphicsRootSignature) {
        self.record(command, &[]);
        self.inner.set_graphics_root_signature(command);
    }

    fn set_graphics_root_descriptor_table(&mut self, command: &SetGraphicsRootDescriptorTable) {
        self.record(command, &[]);
        self.inner.set_graphics_root_descriptor_table(command);
    }

    fn set_pipeline_state(&mut self, command: &SetPipelineState) {
        self.record(command, &[]);
        self.inner.set_pipeline_state(command);
    }

    fn set_vertex_array(&mut self, command: &SetVertexArray) {
        self.record(command, &[]);
        self.inner.set_vertex_array(command);
    }

    fn set_primitive_topology(&mut self, command: &SetPrimitiveTopology) {
        self.record(command, &[]);
        self.inner.set_primitive_topology(command);
    }

    fn set_viewport_and_scissor_rectangle(&mut self, command: &SetViewportAndScissorRectangle) {
        self.record(command, &[]);
        self.inner.set_viewport_and_scissor_rectangle(command);
    }

    fn set_viewports(&mut self, viewports: &[Viewport]) {
        let command = SetViewports {
            number_of_viewports: viewports.len() as u32,
        };
        self.record(&command, bytemuck::cast_slice(viewports));
        self.inner.set_viewports(viewports);
    }

    fn set_scissor_rectangles(&mut self, rectangles: &[ScissorRectangle]) {
        let command = SetScissorRectangles {
            number_of_scissor_rectangles: rectangles.len() as u32,
        };
        self.record(&command, bytemuck::cast_slice(rectangles));
        self.inner.set_scissor_rectangles(rectangles);
    }

    fn set_render_target(&mut self, command: &SetRenderTarget) {
        self.record(command, &[]);
        self.inner.set_render_target(command);
    }

    fn clear(&mut self, command: &Clear) {
        self.record(command, &[]);
        self.inner.clear(command);
    }

    fn resolve_multisample_framebuffer(&mut self, command: &ResolveMultisampleFramebuffer) {
        self.record(command, &[]);
        self.inner.resolve_multisample_framebuffer(command);
    }

    fn copy_resource(&mut self, command: &CopyResource) {
        self.record(command, &[]);
        self.inner.copy_resource(command);
    }

    fn draw(&mut self, command: &Draw) {
        self.record(command, &[]);
        self.inner.draw(command);
    }

    fn draw_indexed(&mut self, command: &DrawIndexed) {
        self.record(command, &[]);
        self.inner.draw_indexed(command);
    }

    fn draw_indirect(&mut self, command: &DrawIndirect) {
        self.record(command, &[]);
        self.inner.draw_indirect(command);
    }

    fn draw_indexed_indirect(&mut self, command: &DrawIndexedIndirect) {
        self.record(command, &[]);
        self.inner.draw_indexed_indirect(command);
    }

    fn copy_uniform_buffer_data(&mut self, command: &CopyUniformBufferData, data: &[u8]) {
        self.record(command, data);
        self.inner.copy_uniform_buffer_data(command, data);
    }

    fn copy_texture_buffer_data(&mut self, command: &CopyTextureBufferData, data: &[u8]) {
        self.record(command, data);
        self.inner.copy_texture_buffer_data(command, data);
    }

    fn set_debug_marker(&mut self, name: &str) {
        let command = SetDebugMarker {
            name_length: name.len() as u32,
        };
        self.record(&command, name.as_bytes());
        self.inner.set_debug_marker(name);
    }

    fn begin_debug_event(&mut self, name: &str) {
        let command = BeginDebugEvent {
            name_length: name.len() as u32,
        };
        self.record(&command, name.as_bytes());
        self.inner.begin_debug_event(name);
    }

    fn end_debug_event(&mut self) {
        self.record(&EndDebugEvent::default(), &[]);
        self.inner.end_debug_event();
    }
}
