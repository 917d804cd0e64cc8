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

//! Bit flags shared by resources and commands.

use bitflags::bitflags;

bitflags! {
    /// Selects which aspects of the bound render target a `Clear` command affects.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u32 {
        /// Clear the color attachments.
        const COLOR = 1 << 0;
        /// Clear the depth attachment.
        const DEPTH = 1 << 1;
        /// Clear the stencil attachment.
        const STENCIL = 1 << 2;
        /// Clear color and depth.
        const COLOR_DEPTH = Self::COLOR.bits() | Self::DEPTH.bits();
    }
}

bitflags! {
    /// Creation flags of a texture.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextureFlags: u32 {
        /// The initial data contains the complete mipmap chain.
        const DATA_CONTAINS_MIPMAPS = 1 << 0;
        /// The backend generates the mipmap chain from the top level.
        const GENERATE_MIPMAPS = 1 << 1;
        /// The texture can be bound for sampling.
        const SHADER_RESOURCE = 1 << 2;
        /// The texture can be bound for unordered (read/write) access.
        const UNORDERED_ACCESS = 1 << 3;
        /// The texture can be used as a framebuffer attachment.
        const RENDER_TARGET = 1 << 4;
    }
}

bitflags! {
    /// Creation flags of a root signature.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RootSignatureFlags: u32 {
        /// The pipeline reads vertex attributes through the input assembler.
        const ALLOW_INPUT_ASSEMBLER_INPUT_LAYOUT = 1 << 0;
        /// Deny access to the root signature from the vertex shader.
        const DENY_VERTEX_SHADER_ROOT_ACCESS = 1 << 1;
        /// Deny access to the root signature from the fragment shader.
        const DENY_FRAGMENT_SHADER_ROOT_ACCESS = 1 << 2;
    }
}
