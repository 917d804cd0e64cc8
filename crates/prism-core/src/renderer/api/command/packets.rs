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

//! The fixed arguments of every command.
//!
//! Commands are plain `#[repr(C)]` data. They refer to resources by [`ResourceId`] only:
//! an encoded command borrows the resource, it never owns a reference. Keeping the
//! resource alive until the command has been submitted is up to the caller.

use super::opcode::Opcode;
use super::stream::corrupt_stream;
use crate::renderer::api::resource::{ResourceId, ResourceType};
use crate::renderer::api::util::{ClearFlags, PrimitiveTopology};
use crate::renderer::traits::CommandBackend;
use bytemuck::{Pod, Zeroable};

/// A command that can be encoded into a command buffer or bucket.
pub trait Command: Pod {
    /// The discriminator stored in the record header.
    const OPCODE: Opcode;

    /// Hands the decoded command to the matching backend entry point.
    fn dispatch<B: CommandBackend + ?Sized>(&self, payload: &[u8], backend: &mut B);

    /// Checks the auxiliary payload against the fixed arguments. Commands without a
    /// payload accept only an empty one.
    fn validate_payload(&self, payload: &[u8]) -> Result<(), String> {
        if payload.is_empty() {
            Ok(())
        } else {
            Err(format!("unexpected {}-byte payload", payload.len()))
        }
    }
}

fn check_resource_type(raw: u32, accept: impl Fn(ResourceType) -> bool) -> Result<(), String> {
    match ResourceType::from_raw(raw) {
        Some(resource_type) if accept(resource_type) => Ok(()),
        Some(resource_type) => Err(format!("{resource_type:?} is not accepted here")),
        None => Err(format!("unknown resource type {raw}")),
    }
}

fn check_counted_payload<T: Pod>(count: u32, payload: &[u8]) -> Result<(), String> {
    let expected = count as usize * std::mem::size_of::<T>();
    if count == 0 {
        Err("count is zero".to_string())
    } else if payload.len() != expected {
        Err(format!("{count} elements need {expected} bytes, got {}", payload.len()))
    } else {
        Ok(())
    }
}

fn check_name(length: u32, payload: &[u8]) -> Result<(), String> {
    if payload.len() != length as usize {
        return Err(format!("name of {length} bytes, payload of {}", payload.len()));
    }
    std::str::from_utf8(payload)
        .map(|_| ())
        .map_err(|e| format!("name is not UTF-8: {e}"))
}

fn payload_as<T: Pod>(opcode: Opcode, payload: &[u8]) -> &[T] {
    bytemuck::try_cast_slice(payload).unwrap_or_else(|e| {
        corrupt_stream(format_args!("{} payload cannot be read: {e}", opcode.name()))
    })
}

fn payload_as_str(opcode: Opcode, payload: &[u8]) -> &str {
    std::str::from_utf8(payload).unwrap_or_else(|e| {
        corrupt_stream(format_args!("{} name is not UTF-8: {e}", opcode.name()))
    })
}

/// Binds a root signature.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetGraphicsRootSignature {
    /// The root signature to bind.
    pub root_signature: ResourceId,
}

impl Command for SetGraphicsRootSignature {
    const OPCODE: Opcode = Opcode::SetGraphicsRootSignature;

    fn dispatch<B: CommandBackend + ?Sized>(&self, _payload: &[u8], backend: &mut B) {
        backend.set_graphics_root_signature(self);
    }
}

/// Binds a resource group, or a single resource, to a root parameter of the bound root
/// signature.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetGraphicsRootDescriptorTable {
    /// The resource group or resource to bind.
    pub resource: ResourceId,
    /// The index of the root parameter.
    pub root_parameter_index: u32,
    /// The raw [`ResourceType`] of `resource`.
    pub resource_type: u32,
}

impl SetGraphicsRootDescriptorTable {
    /// Binds `resource` of type `resource_type` to a root parameter.
    pub fn new(root_parameter_index: u32, resource: ResourceId, resource_type: ResourceType) -> Self {
        Self {
            resource,
            root_parameter_index,
            resource_type: resource_type.as_raw(),
        }
    }
}

impl Command for SetGraphicsRootDescriptorTable {
    const OPCODE: Opcode = Opcode::SetGraphicsRootDescriptorTable;

    fn dispatch<B: CommandBackend + ?Sized>(&self, _payload: &[u8], backend: &mut B) {
        backend.set_graphics_root_descriptor_table(self);
    }

    fn validate_payload(&self, payload: &[u8]) -> Result<(), String> {
        check_resource_type(self.resource_type, |_| true)?;
        if payload.is_empty() {
            Ok(())
        } else {
            Err(format!("unexpected {}-byte payload", payload.len()))
        }
    }
}

/// Binds a pipeline state.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetPipelineState {
    /// The pipeline state to bind.
    pub pipeline_state: ResourceId,
}

impl Command for SetPipelineState {
    const OPCODE: Opcode = Opcode::SetPipelineState;

    fn dispatch<B: CommandBackend + ?Sized>(&self, _payload: &[u8], backend: &mut B) {
        backend.set_pipeline_state(self);
    }
}

/// Binds a vertex array. The null id unbinds.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetVertexArray {
    /// The vertex array to bind.
    pub vertex_array: ResourceId,
}

impl Command for SetVertexArray {
    const OPCODE: Opcode = Opcode::SetVertexArray;

    fn dispatch<B: CommandBackend + ?Sized>(&self, _payload: &[u8], backend: &mut B) {
        backend.set_vertex_array(self);
    }
}

/// Sets the primitive topology of subsequent draws.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetPrimitiveTopology {
    /// The raw [`PrimitiveTopology`].
    pub topology: u32,
}

impl SetPrimitiveTopology {
    /// Sets `topology`.
    pub fn new(topology: PrimitiveTopology) -> Self {
        Self {
            topology: topology.as_raw(),
        }
    }

    /// The decoded topology.
    pub fn topology(&self) -> Option<PrimitiveTopology> {
        PrimitiveTopology::from_raw(self.topology)
    }
}

impl Command for SetPrimitiveTopology {
    const OPCODE: Opcode = Opcode::SetPrimitiveTopology;

    fn dispatch<B: CommandBackend + ?Sized>(&self, _payload: &[u8], backend: &mut B) {
        backend.set_primitive_topology(self);
    }

    fn validate_payload(&self, payload: &[u8]) -> Result<(), String> {
        if self.topology().is_none() {
            return Err(format!("unknown primitive topology {}", self.topology));
        }
        if payload.is_empty() {
            Ok(())
        } else {
            Err(format!("unexpected {}-byte payload", payload.len()))
        }
    }
}

/// Sets a single viewport and a scissor rectangle covering it.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SetViewportAndScissorRectangle {
    /// Left edge in pixels.
    pub top_left_x: u32,
    /// Top edge in pixels.
    pub top_left_y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Minimum depth of the viewport.
    pub min_depth: f32,
    /// Maximum depth of the viewport.
    pub max_depth: f32,
}

impl SetViewportAndScissorRectangle {
    /// A viewport with the full `[0, 1]` depth range.
    pub fn new(top_left_x: u32, top_left_y: u32, width: u32, height: u32) -> Self {
        Self {
            top_left_x,
            top_left_y,
            width,
            height,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

impl Command for SetViewportAndScissorRectangle {
    const OPCODE: Opcode = Opcode::SetViewportAndScissorRectangle;

    fn dispatch<B: CommandBackend + ?Sized>(&self, _payload: &[u8], backend: &mut B) {
        backend.set_viewport_and_scissor_rectangle(self);
    }
}

/// One viewport, carried in the payload of [`SetViewports`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Viewport {
    /// Left edge in pixels.
    pub top_left_x: f32,
    /// Top edge in pixels.
    pub top_left_y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Minimum depth.
    pub min_depth: f32,
    /// Maximum depth.
    pub max_depth: f32,
}

/// Sets several viewports. The payload holds `number_of_viewports` [`Viewport`]s.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetViewports {
    /// The number of viewports in the payload.
    pub number_of_viewports: u32,
}

impl Command for SetViewports {
    const OPCODE: Opcode = Opcode::SetViewports;

    fn dispatch<B: CommandBackend + ?Sized>(&self, payload: &[u8], backend: &mut B) {
        backend.set_viewports(payload_as::<Viewport>(Self::OPCODE, payload));
    }

    fn validate_payload(&self, payload: &[u8]) -> Result<(), String> {
        check_counted_payload::<Viewport>(self.number_of_viewports, payload)
    }
}

/// One scissor rectangle, carried in the payload of [`SetScissorRectangles`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct ScissorRectangle {
    /// Left edge in pixels.
    pub left: i32,
    /// Top edge in pixels.
    pub top: i32,
    /// Right edge in pixels, exclusive.
    pub right: i32,
    /// Bottom edge in pixels, exclusive.
    pub bottom: i32,
}

/// Sets several scissor rectangles. The payload holds `number_of_scissor_rectangles`
/// [`ScissorRectangle`]s.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetScissorRectangles {
    /// The number of rectangles in the payload.
    pub number_of_scissor_rectangles: u32,
}

impl Command for SetScissorRectangles {
    const OPCODE: Opcode = Opcode::SetScissorRectangles;

    fn dispatch<B: CommandBackend + ?Sized>(&self, payload: &[u8], backend: &mut B) {
        backend.set_scissor_rectangles(payload_as::<ScissorRectangle>(Self::OPCODE, payload));
    }

    fn validate_payload(&self, payload: &[u8]) -> Result<(), String> {
        check_counted_payload::<ScissorRectangle>(self.number_of_scissor_rectangles, payload)
    }
}

/// Binds a swap chain or framebuffer as render target. The null id unbinds.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetRenderTarget {
    /// The render target to bind.
    pub render_target: ResourceId,
    /// The raw [`ResourceType`] of the target, `0` when unbinding.
    pub resource_type: u32,
    /// Explicit padding, always zero.
    pub _padding: u32,
}

impl SetRenderTarget {
    /// Binds `render_target`.
    pub fn new(render_target: ResourceId, resource_type: ResourceType) -> Self {
        Self {
            render_target,
            resource_type: resource_type.as_raw(),
            _padding: 0,
        }
    }

    /// Unbinds the current render target.
    pub fn unbind() -> Self {
        Self::zeroed()
    }

    /// The decoded target type; `None` when unbinding.
    pub fn target_type(&self) -> Option<ResourceType> {
        ResourceType::from_raw(self.resource_type)
    }
}

impl Command for SetRenderTarget {
    const OPCODE: Opcode = Opcode::SetRenderTarget;

    fn dispatch<B: CommandBackend + ?Sized>(&self, _payload: &[u8], backend: &mut B) {
        backend.set_render_target(self);
    }

    fn validate_payload(&self, payload: &[u8]) -> Result<(), String> {
        if !self.render_target.is_null() || self.resource_type != 0 {
            check_resource_type(self.resource_type, ResourceType::is_render_target)?;
        }
        if payload.is_empty() {
            Ok(())
        } else {
            Err(format!("unexpected {}-byte payload", payload.len()))
        }
    }
}

/// Clears the bound render target.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Clear {
    /// The raw [`ClearFlags`].
    pub flags: u32,
    /// The stencil clear value.
    pub stencil: u32,
    /// The color clear value.
    pub color: [f32; 4],
    /// The depth clear value.
    pub z: f32,
}

impl Clear {
    /// Clears the aspects selected by `flags`.
    pub fn new(flags: ClearFlags, color: [f32; 4], z: f32, stencil: u32) -> Self {
        Self {
            flags: flags.bits(),
            stencil,
            color,
            z,
        }
    }

    /// The decoded clear flags. Unknown bits are dropped.
    pub fn clear_flags(&self) -> ClearFlags {
        ClearFlags::from_bits_truncate(self.flags)
    }
}

impl Command for Clear {
    const OPCODE: Opcode = Opcode::Clear;

    fn dispatch<B: CommandBackend + ?Sized>(&self, _payload: &[u8], backend: &mut B) {
        backend.clear(self);
    }

    fn validate_payload(&self, payload: &[u8]) -> Result<(), String> {
        if ClearFlags::from_bits(self.flags).is_none() {
            return Err(format!("unknown clear flags {:#x}", self.flags));
        }
        if payload.is_empty() {
            Ok(())
        } else {
            Err(format!("unexpected {}-byte payload", payload.len()))
        }
    }
}

/// Resolves a multisampled framebuffer into a render target.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct ResolveMultisampleFramebuffer {
    /// The swap chain or framebuffer receiving the resolved image.
    pub destination: ResourceId,
    /// The multisampled framebuffer.
    pub source: ResourceId,
    /// The raw [`ResourceType`] of `destination`.
    pub destination_type: u32,
    /// Explicit padding, always zero.
    pub _padding: u32,
}

impl ResolveMultisampleFramebuffer {
    /// Resolves `source` into `destination`.
    pub fn new(destination: ResourceId, destination_type: ResourceType, source: ResourceId) -> Self {
        Self {
            destination,
            source,
            destination_type: destination_type.as_raw(),
            _padding: 0,
        }
    }
}

impl Command for ResolveMultisampleFramebuffer {
    const OPCODE: Opcode = Opcode::ResolveMultisampleFramebuffer;

    fn dispatch<B: CommandBackend + ?Sized>(&self, _payload: &[u8], backend: &mut B) {
        backend.resolve_multisample_framebuffer(self);
    }

    fn validate_payload(&self, payload: &[u8]) -> Result<(), String> {
        check_resource_type(self.destination_type, ResourceType::is_render_target)?;
        if payload.is_empty() {
            Ok(())
        } else {
            Err(format!("unexpected {}-byte payload", payload.len()))
        }
    }
}

/// Copies a whole resource into another resource of the same type.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct CopyResource {
    /// The resource receiving the copy.
    pub destination: ResourceId,
    /// The resource copied from.
    pub source: ResourceId,
    /// The raw [`ResourceType`] of both resources.
    pub resource_type: u32,
    /// Explicit padding, always zero.
    pub _padding: u32,
}

impl CopyResource {
    /// Copies `source` into `destination`, both of type `resource_type`.
    pub fn new(destination: ResourceId, source: ResourceId, resource_type: ResourceType) -> Self {
        Self {
            destination,
            source,
            resource_type: resource_type.as_raw(),
            _padding: 0,
        }
    }
}

impl Command for CopyResource {
    const OPCODE: Opcode = Opcode::CopyResource;

    fn dispatch<B: CommandBackend + ?Sized>(&self, _payload: &[u8], backend: &mut B) {
        backend.copy_resource(self);
    }

    fn validate_payload(&self, payload: &[u8]) -> Result<(), String> {
        check_resource_type(self.resource_type, |t| t.is_buffer() || t.is_texture())?;
        if payload.is_empty() {
            Ok(())
        } else {
            Err(format!("unexpected {}-byte payload", payload.len()))
        }
    }
}

/// Draws non-indexed primitives.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Draw {
    /// The number of vertices of one instance.
    pub number_of_vertices_per_instance: u32,
    /// The number of instances.
    pub number_of_instances: u32,
    /// The first vertex.
    pub start_vertex_location: u32,
    /// The first instance.
    pub start_instance_location: u32,
}

impl Draw {
    /// Draws `number_of_vertices` vertices, one instance.
    pub fn vertices(number_of_vertices: u32) -> Self {
        Self {
            number_of_vertices_per_instance: number_of_vertices,
            number_of_instances: 1,
            start_vertex_location: 0,
            start_instance_location: 0,
        }
    }
}

impl Command for Draw {
    const OPCODE: Opcode = Opcode::Draw;

    fn dispatch<B: CommandBackend + ?Sized>(&self, _payload: &[u8], backend: &mut B) {
        backend.draw(self);
    }
}

/// Draws indexed primitives.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawIndexed {
    /// The number of indices of one instance.
    pub number_of_indices_per_instance: u32,
    /// The number of instances.
    pub number_of_instances: u32,
    /// The first index.
    pub start_index_location: u32,
    /// Added to every index before the vertex is fetched.
    pub base_vertex_location: i32,
    /// The first instance.
    pub start_instance_location: u32,
}

impl DrawIndexed {
    /// Draws `number_of_indices` indices, one instance.
    pub fn indices(number_of_indices: u32) -> Self {
        Self {
            number_of_indices_per_instance: number_of_indices,
            number_of_instances: 1,
            start_index_location: 0,
            base_vertex_location: 0,
            start_instance_location: 0,
        }
    }
}

impl Command for DrawIndexed {
    const OPCODE: Opcode = Opcode::DrawIndexed;

    fn dispatch<B: CommandBackend + ?Sized>(&self, _payload: &[u8], backend: &mut B) {
        backend.draw_indexed(self);
    }
}

/// The layout of one [`DrawIndirect`] argument record in an indirect buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawArguments {
    /// The number of vertices of one instance.
    pub vertex_count_per_instance: u32,
    /// The number of instances.
    pub instance_count: u32,
    /// The first vertex.
    pub start_vertex_location: u32,
    /// The first instance.
    pub start_instance_location: u32,
}

/// The layout of one [`DrawIndexedIndirect`] argument record in an indirect buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawIndexedArguments {
    /// The number of indices of one instance.
    pub index_count_per_instance: u32,
    /// The number of instances.
    pub instance_count: u32,
    /// The first index.
    pub start_index_location: u32,
    /// Added to every index before the vertex is fetched.
    pub base_vertex_location: i32,
    /// The first instance.
    pub start_instance_location: u32,
}

/// Draws non-indexed primitives, reading [`DrawArguments`] from an indirect buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawIndirect {
    /// The indirect buffer holding the arguments.
    pub indirect_buffer: ResourceId,
    /// Byte offset of the first argument record.
    pub indirect_buffer_offset: u32,
    /// The number of consecutive argument records.
    pub number_of_draws: u32,
}

impl Command for DrawIndirect {
    const OPCODE: Opcode = Opcode::DrawIndirect;

    fn dispatch<B: CommandBackend + ?Sized>(&self, _payload: &[u8], backend: &mut B) {
        backend.draw_indirect(self);
    }
}

/// Draws indexed primitives, reading [`DrawIndexedArguments`] from an indirect buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawIndexedIndirect {
    /// The indirect buffer holding the arguments.
    pub indirect_buffer: ResourceId,
    /// Byte offset of the first argument record.
    pub indirect_buffer_offset: u32,
    /// The number of consecutive argument records.
    pub number_of_draws: u32,
}

impl Command for DrawIndexedIndirect {
    const OPCODE: Opcode = Opcode::DrawIndexedIndirect;

    fn dispatch<B: CommandBackend + ?Sized>(&self, _payload: &[u8], backend: &mut B) {
        backend.draw_indexed_indirect(self);
    }
}

/// Copies the payload to the start of a uniform buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct CopyUniformBufferData {
    /// The uniform buffer receiving the data.
    pub uniform_buffer: ResourceId,
}

impl Command for CopyUniformBufferData {
    const OPCODE: Opcode = Opcode::CopyUniformBufferData;

    fn dispatch<B: CommandBackend + ?Sized>(&self, payload: &[u8], backend: &mut B) {
        backend.copy_uniform_buffer_data(self, payload);
    }

    fn validate_payload(&self, payload: &[u8]) -> Result<(), String> {
        if payload.is_empty() {
            Err("nothing to copy".to_string())
        } else {
            Ok(())
        }
    }
}

/// Copies the payload to the start of a texture buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct CopyTextureBufferData {
    /// The texture buffer receiving the data.
    pub texture_buffer: ResourceId,
}

impl Command for CopyTextureBufferData {
    const OPCODE: Opcode = Opcode::CopyTextureBufferData;

    fn dispatch<B: CommandBackend + ?Sized>(&self, payload: &[u8], backend: &mut B) {
        backend.copy_texture_buffer_data(self, payload);
    }

    fn validate_payload(&self, payload: &[u8]) -> Result<(), String> {
        if payload.is_empty() {
            Err("nothing to copy".to_string())
        } else {
            Ok(())
        }
    }
}

/// Inserts a debug marker. The payload holds the UTF-8 name.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetDebugMarker {
    /// The length of the name in bytes.
    pub name_length: u32,
}

impl Command for SetDebugMarker {
    const OPCODE: Opcode = Opcode::SetDebugMarker;

    fn dispatch<B: CommandBackend + ?Sized>(&self, payload: &[u8], backend: &mut B) {
        backend.set_debug_marker(payload_as_str(Self::OPCODE, payload));
    }

    fn validate_payload(&self, payload: &[u8]) -> Result<(), String> {
        check_name(self.name_length, payload)
    }
}

/// Opens a debug event. The payload holds the UTF-8 name.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct BeginDebugEvent {
    /// The length of the name in bytes.
    pub name_length: u32,
}

impl Command for BeginDebugEvent {
    const OPCODE: Opcode = Opcode::BeginDebugEvent;

    fn dispatch<B: CommandBackend + ?Sized>(&self, payload: &[u8], backend: &mut B) {
        backend.begin_debug_event(payload_as_str(Self::OPCODE, payload));
    }

    fn validate_payload(&self, payload: &[u8]) -> Result<(), String> {
        check_name(self.name_length, payload)
    }
}

/// Closes the innermost debug event.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct EndDebugEvent {
    /// Reserved, always zero.
    pub _reserved: u32,
}

impl Command for EndDebugEvent {
    const OPCODE: Opcode = Opcode::EndDebugEvent;

    fn dispatch<B: CommandBackend + ?Sized>(&self, _payload: &[u8], backend: &mut B) {
        backend.end_debug_event();
    }
}
