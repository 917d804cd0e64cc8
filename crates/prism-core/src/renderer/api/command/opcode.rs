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

//! The opcode table: one entry per command type.
//!
//! Every command struct in [`packets`](super::packets) is listed here once. The table
//! generates the [`Opcode`] discriminator and the type-erased trampolines the stream
//! walker uses to validate and dispatch a record knowing only its opcode.

use super::packets::{self, Command};
use crate::renderer::traits::CommandBackend;

macro_rules! command_table {
    ($( $(#[$doc:meta])* $name:ident = $value:literal, )+) => {
        /// The type discriminator stored in the header of every encoded command.
        #[repr(u16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Opcode {
            $( $(#[$doc])* $name = $value, )+
        }

        impl Opcode {
            /// Every opcode, in discriminant order.
            pub const ALL: &'static [Opcode] = &[$(Opcode::$name),+];

            /// Converts a raw header value back into an opcode, if it is known.
            pub const fn from_raw(raw: u16) -> Option<Self> {
                match raw {
                    $( $value => Some(Opcode::$name), )+
                    _ => None,
                }
            }

            /// The name of the command, for diagnostics.
            pub const fn name(self) -> &'static str {
                match self {
                    $( Opcode::$name => stringify!($name), )+
                }
            }

            /// The size in bytes of the command's fixed arguments.
            pub const fn fixed_size(self) -> usize {
                match self {
                    $( Opcode::$name => std::mem::size_of::<packets::$name>(), )+
                }
            }
        }

        // Records are 8-byte aligned; a command must not need more.
        $( const _: () = assert!(std::mem::align_of::<packets::$name>() <= 8); )+

        /// Checks the payload of a record against its fixed arguments.
        pub(crate) fn validate_payload(
            opcode: Opcode,
            fixed: &[u8],
            payload: &[u8],
        ) -> Result<(), String> {
            match opcode {
                $( Opcode::$name => {
                    bytemuck::pod_read_unaligned::<packets::$name>(fixed).validate_payload(payload)
                } )+
            }
        }

        /// Decodes the fixed arguments of a record and hands them to the backend.
        pub(crate) fn dispatch_record<B: CommandBackend + ?Sized>(
            opcode: Opcode,
            fixed: &[u8],
            payload: &[u8],
            backend: &mut B,
        ) {
            match opcode {
                $( Opcode::$name => {
                    bytemuck::pod_read_unaligned::<packets::$name>(fixed).dispatch(payload, backend)
                } )+
            }
        }
    };
}

command_table! {
    /// Binds a root signature.
    SetGraphicsRootSignature = 0x0001,
    /// Binds a resource group (or a single resource) to a root parameter.
    SetGraphicsRootDescriptorTable = 0x0002,
    /// Binds a pipeline state.
    SetPipelineState = 0x0003,
    /// Binds a vertex array.
    SetVertexArray = 0x0004,
    /// Sets the primitive topology.
    SetPrimitiveTopology = 0x0005,
    /// Sets a single viewport and a matching scissor rectangle.
    SetViewportAndScissorRectangle = 0x0006,
    /// Sets several viewports.
    SetViewports = 0x0007,
    /// Sets several scissor rectangles.
    SetScissorRectangles = 0x0008,
    /// Binds a swap chain or framebuffer as render target.
    SetRenderTarget = 0x0009,
    /// Clears the bound render target.
    Clear = 0x000a,
    /// Resolves a multisampled framebuffer into a render target.
    ResolveMultisampleFramebuffer = 0x000b,
    /// Copies a whole resource into another one.
    CopyResource = 0x000c,
    /// Draws non-indexed primitives.
    Draw = 0x0010,
    /// Draws indexed primitives.
    DrawIndexed = 0x0011,
    /// Draws non-indexed primitives with arguments read from an indirect buffer.
    DrawIndirect = 0x0012,
    /// Draws indexed primitives with arguments read from an indirect buffer.
    DrawIndexedIndirect = 0x0013,
    /// Copies the payload into a uniform buffer.
    CopyUniformBufferData = 0x0020,
    /// Copies the payload into a texture buffer.
    CopyTextureBufferData = 0x0021,
    /// Inserts a named debug marker.
    SetDebugMarker = 0x0030,
    /// Opens a named debug event.
    BeginDebugEvent = 0x0031,
    /// Closes the innermost debug event.
    EndDebugEvent = 0x0032,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_values_round_trip() {
        for opcode in Opcode::ALL {
            assert_eq!(Opcode::from_raw(*opcode as u16), Some(*opcode));
        }
        assert_eq!(Opcode::from_raw(0), None);
        assert_eq!(Opcode::from_raw(0xffff), None);
    }

    #[test]
    fn fixed_sizes_match_the_layouts() {
        assert_eq!(Opcode::SetGraphicsRootSignature.fixed_size(), 8);
        assert_eq!(Opcode::SetGraphicsRootDescriptorTable.fixed_size(), 16);
        assert_eq!(Opcode::SetPrimitiveTopology.fixed_size(), 4);
        assert_eq!(Opcode::SetViewportAndScissorRectangle.fixed_size(), 24);
        assert_eq!(Opcode::SetRenderTarget.fixed_size(), 16);
        assert_eq!(Opcode::Clear.fixed_size(), 28);
        assert_eq!(Opcode::Draw.fixed_size(), 16);
        assert_eq!(Opcode::DrawIndexed.fixed_size(), 20);
        assert_eq!(Opcode::DrawIndirect.fixed_size(), 16);
        assert_eq!(Opcode::CopyUniformBufferData.fixed_size(), 8);
    }

    #[test]
    fn names_are_the_command_names() {
        assert_eq!(Opcode::DrawIndexed.name(), "DrawIndexed");
        assert_eq!(Opcode::CopyUniformBufferData.name(), "CopyUniformBufferData");
    }
}
