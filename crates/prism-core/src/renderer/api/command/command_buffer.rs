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

//! Linear command buffers, dispatched in recording order.

use super::packets::{
    BeginDebugEvent, Command, CopyUniformBufferData, EndDebugEvent, ScissorRectangle,
    SetDebugMarker, SetScissorRectangles, SetViewports, Viewport,
};
use super::stream::{CommandSlot, CommandStream, DecodedCommand};
use crate::renderer::api::core::CommandSettings;
use crate::renderer::api::resource::ResourceId;
use crate::renderer::error::CommandError;
use crate::renderer::traits::CommandBackend;

/// An append-only, linear sequence of encoded commands.
///
/// Commands are decoded and dispatched in append order. Submitting is non-destructive;
/// [`submit_and_clear`](Self::submit_and_clear) is the usual choice for per-frame buffers.
///
/// Commands refer to resources by id and never own them: clearing the buffer does not
/// release any resource, and the caller must keep every referenced resource alive until
/// the buffer has been submitted.
///
/// A buffer is `Send`, so several threads can each fill their own buffer. Filling one
/// buffer takes `&mut self`, which rules out concurrent writers to the same instance.
#[derive(Debug)]
pub struct CommandBuffer {
    stream: CommandStream,
    settings: CommandSettings,
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBuffer {
    /// Creates an empty buffer with default settings.
    pub fn new() -> Self {
        Self::with_settings(CommandSettings::default())
    }

    /// Creates an empty buffer. The page size is rounded up to a valid value.
    pub fn with_settings(settings: CommandSettings) -> Self {
        Self {
            stream: CommandStream::new(&settings),
            settings,
        }
    }

    /// The settings the buffer was created with.
    pub fn settings(&self) -> &CommandSettings {
        &self.settings
    }

    /// Encodes `command` followed by a zeroed payload of `payload_size` bytes.
    ///
    /// The returned slot gives in-place access to the fixed arguments and the payload, so
    /// the caller can finish the command once the payload contents are known.
    ///
    /// # Panics
    ///
    /// Panics if `payload_size` exceeds [`MAX_PAYLOAD_SIZE`](super::MAX_PAYLOAD_SIZE).
    pub fn append<T: Command>(&mut self, command: T, payload_size: usize) -> CommandSlot<'_, T> {
        self.stream.append(command, payload_size).1
    }

    /// Encodes a command without payload.
    pub fn push<T: Command>(&mut self, command: T) {
        self.append(command, 0);
    }

    /// Encodes a command followed by a copy of `payload`.
    pub fn push_with_payload<T: Command>(&mut self, command: T, payload: &[u8]) {
        self.append(command, payload.len())
            .payload
            .copy_from_slice(payload);
    }

    /// Encodes a [`CopyUniformBufferData`] of `data`. Nothing is encoded for empty data.
    pub fn copy_uniform_buffer_data(&mut self, uniform_buffer: ResourceId, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        self.push_with_payload(CopyUniformBufferData { uniform_buffer }, data);
    }

    /// Encodes a [`SetViewports`] carrying `viewports`. Nothing is encoded for an empty slice.
    pub fn set_viewports(&mut self, viewports: &[Viewport]) {
        if viewports.is_empty() {
            return;
        }
        self.push_with_payload(
            SetViewports {
                number_of_viewports: viewports.len() as u32,
            },
            bytemuck::cast_slice(viewports),
        );
    }

    /// Encodes a [`SetScissorRectangles`] carrying `rectangles`. Nothing is encoded for an
    /// empty slice.
    pub fn set_scissor_rectangles(&mut self, rectangles: &[ScissorRectangle]) {
        if rectangles.is_empty() {
            return;
        }
        self.push_with_payload(
            SetScissorRectangles {
                number_of_scissor_rectangles: rectangles.len() as u32,
            },
            bytemuck::cast_slice(rectangles),
        );
    }

    /// Encodes a [`SetDebugMarker`]. Skipped when debug markers are disabled.
    pub fn set_debug_marker(&mut self, name: &str) {
        if self.settings.debug_markers {
            self.push_with_payload(
                SetDebugMarker {
                    name_length: name.len() as u32,
                },
                name.as_bytes(),
            );
        }
    }

    /// Encodes a [`BeginDebugEvent`]. Skipped when debug markers are disabled.
    pub fn begin_debug_event(&mut self, name: &str) {
        if self.settings.debug_markers {
            self.push_with_payload(
                BeginDebugEvent {
                    name_length: name.len() as u32,
                },
                name.as_bytes(),
            );
        }
    }

    /// Encodes an [`EndDebugEvent`]. Skipped when debug markers are disabled.
    pub fn end_debug_event(&mut self) {
        if self.settings.debug_markers {
            self.push(EndDebugEvent::default());
        }
    }

    /// Returns `true` if the buffer holds no command.
    pub fn is_empty(&self) -> bool {
        self.stream.len() == 0
    }

    /// The number of encoded commands.
    pub fn len(&self) -> usize {
        self.stream.len()
    }

    /// Forgets every command. Allocated pages are kept for reuse; no resource is released.
    pub fn clear(&mut self) {
        self.stream.clear();
    }

    /// Iterates over the encoded commands in append order.
    pub fn iter(&self) -> impl Iterator<Item = DecodedCommand<'_>> {
        self.stream.iter()
    }

    /// Decodes every command in order and dispatches it to `backend`.
    ///
    /// The stream is walked and every payload checked once before anything is dispatched,
    /// so a bad record aborts the submission before any state reaches the backend.
    ///
    /// # Panics
    ///
    /// Panics if a record written through [`append`](Self::append) or
    /// [`push_with_payload`](Self::push_with_payload) has a payload that does not match its
    /// fixed arguments.
    pub fn submit<B: CommandBackend + ?Sized>(&self, backend: &mut B) {
        self.stream.verify();
        backend.begin_submission();
        for command in self.stream.iter() {
            command.dispatch(backend);
        }
        backend.end_submission();
    }

    /// Submits, then clears.
    pub fn submit_and_clear<B: CommandBackend + ?Sized>(&mut self, backend: &mut B) {
        self.submit(backend);
        self.clear();
    }

    /// Exports the encoded commands as one flat byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.stream.to_bytes()
    }

    /// Imports a byte vector produced by [`to_bytes`](Self::to_bytes).
    ///
    /// Every record is validated: opcode, sizes and payload consistency. A malformed
    /// stream is rejected as a whole.
    pub fn from_bytes(bytes: &[u8], settings: CommandSettings) -> Result<Self, CommandError> {
        let mut buffer = Self::with_settings(settings);
        let count = buffer.stream.extend_from_bytes(bytes)?;
        log::debug!("Imported {count} commands ({} bytes)", bytes.len());
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::command::packets::{Draw, DrawIndexed, SetPipelineState};
    use crate::renderer::api::command::Opcode;
    use crate::renderer::testing::RecordingBackend;

    #[test]
    fn new_buffer_is_empty() {
        let buffer = CommandBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn submit_dispatches_in_append_order_and_keeps_commands() {
        let mut buffer = CommandBuffer::new();
        buffer.push(SetPipelineState {
            pipeline_state: ResourceId(4),
        });
        buffer.push(Draw::vertices(3));
        buffer.push(DrawIndexed::indices(6));

        let mut backend = RecordingBackend::default();
        buffer.submit(&mut backend);
        assert_eq!(
            backend.opcodes(),
            vec![Opcode::SetPipelineState, Opcode::Draw, Opcode::DrawIndexed]
        );
        assert_eq!(backend.submissions, 1);
        assert_eq!(buffer.len(), 3);

        buffer.submit(&mut backend);
        assert_eq!(backend.dispatched.len(), 6);
    }

    #[test]
    fn submit_and_clear_empties_the_buffer() {
        let mut buffer = CommandBuffer::new();
        buffer.push(Draw::vertices(3));
        let mut backend = RecordingBackend::default();
        buffer.submit_and_clear(&mut backend);
        assert!(buffer.is_empty());

        let mut backend = RecordingBackend::default();
        buffer.submit(&mut backend);
        assert!(backend.dispatched.is_empty());
    }

    #[test]
    fn uniform_payload_survives_later_appends() {
        let mut buffer = CommandBuffer::with_settings(CommandSettings {
            page_size: 64,
            debug_markers: true,
        });
        let slot = buffer.append(
            CopyUniformBufferData {
                uniform_buffer: ResourceId(1),
            },
            8,
        );
        slot.payload
            .copy_from_slice(bytemuck::cast_slice(&[0.25f32, -4.5f32]));
        for i in 0..32 {
            buffer.push(Draw::vertices(i));
        }

        let mut backend = RecordingBackend::default();
        buffer.submit(&mut backend);
        let first = &backend.dispatched[0];
        assert_eq!(first.opcode, Opcode::CopyUniformBufferData);
        let values: Vec<f32> = first
            .payload
            .chunks_exact(4)
            .map(bytemuck::pod_read_unaligned)
            .collect();
        assert_eq!(values, vec![0.25, -4.5]);
        assert_eq!(backend.dispatched.len(), 33);
    }

    #[test]
    fn debug_markers_can_be_disabled() {
        let mut buffer = CommandBuffer::with_settings(CommandSettings {
            debug_markers: false,
            ..CommandSettings::default()
        });
        buffer.begin_debug_event("Shadow pass");
        buffer.set_debug_marker("here");
        buffer.end_debug_event();
        assert!(buffer.is_empty());

        let mut buffer = CommandBuffer::new();
        buffer.begin_debug_event("Shadow pass");
        buffer.end_debug_event();
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn byte_export_round_trips() {
        let mut buffer = CommandBuffer::new();
        buffer.set_viewports(&[Viewport {
            top_left_x: 0.0,
            top_left_y: 0.0,
            width: 640.0,
            height: 480.0,
            min_depth: 0.0,
            max_depth: 1.0,
        }]);
        buffer.set_debug_marker("marker");
        buffer.push(Draw::vertices(3));

        let bytes = buffer.to_bytes();
        let imported = CommandBuffer::from_bytes(&bytes, CommandSettings::default())
            .expect("valid stream");
        assert_eq!(imported.len(), 3);
        assert_eq!(imported.to_bytes(), bytes);
    }

    #[test]
    fn import_rejects_inconsistent_payloads() {
        let mut buffer = CommandBuffer::new();
        // Two viewports announced, one provided.
        buffer.push_with_payload(
            SetViewports {
                number_of_viewports: 2,
            },
            &[0u8; 24],
        );
        let err = CommandBuffer::from_bytes(&buffer.to_bytes(), CommandSettings::default());
        assert!(matches!(err, Err(CommandError::InvalidPayload { offset: 0, .. })));
    }

    #[test]
    fn invalid_marker_name_aborts_before_any_dispatch() {
        let mut buffer = CommandBuffer::new();
        buffer.push(Draw::vertices(3));
        buffer.push_with_payload(SetDebugMarker { name_length: 2 }, &[0xff, 0xfe]);

        let mut backend = RecordingBackend::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            buffer.submit(&mut backend)
        }));
        assert!(result.is_err());
        assert!(backend.dispatched.is_empty());
        assert_eq!(backend.submissions, 0);
    }

    #[test]
    fn empty_typed_payloads_encode_nothing() {
        let mut buffer = CommandBuffer::new();
        buffer.copy_uniform_buffer_data(ResourceId(1), &[]);
        buffer.set_viewports(&[]);
        buffer.set_scissor_rectangles(&[]);
        buffer.push(Draw::vertices(3));
        assert_eq!(buffer.len(), 1);

        let imported = CommandBuffer::from_bytes(&buffer.to_bytes(), CommandSettings::default())
            .expect("typed helpers only produce valid records");
        assert_eq!(imported.len(), 1);

        let mut backend = RecordingBackend::default();
        imported.submit(&mut backend);
        assert_eq!(backend.opcodes(), vec![Opcode::Draw]);
    }
}
