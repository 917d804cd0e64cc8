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

//! Generic rendering enums.

/// Specifies the data type of indices in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    /// Indices are 16-bit unsigned integers.
    Uint16,
    /// Indices are 32-bit unsigned integers.
    Uint32,
}

impl IndexFormat {
    /// Returns the size in bytes of a single index.
    pub fn byte_size(&self) -> u64 {
        match self {
            IndexFormat::Uint16 => 2,
            IndexFormat::Uint32 => 4,
        }
    }
}

/// How vertices are assembled into primitives.
///
/// The discriminant is the raw value stored in encoded commands.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    /// Every vertex is a point.
    PointList = 1,
    /// Every two vertices form an independent line.
    LineList = 2,
    /// Vertices form a connected line strip.
    LineStrip = 3,
    /// Every three vertices form an independent triangle.
    TriangleList = 4,
    /// Vertices form a connected triangle strip.
    TriangleStrip = 5,
    /// Vertices are grouped into tessellation patches.
    PatchList = 6,
}

impl PrimitiveTopology {
    /// Returns the raw value used in the command encoding.
    pub const fn as_raw(self) -> u32 {
        self as u32
    }

    /// Converts a raw encoded value back into a topology, if it is known.
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(PrimitiveTopology::PointList),
            2 => Some(PrimitiveTopology::LineList),
            3 => Some(PrimitiveTopology::LineStrip),
            4 => Some(PrimitiveTopology::TriangleList),
            5 => Some(PrimitiveTopology::TriangleStrip),
            6 => Some(PrimitiveTopology::PatchList),
            _ => None,
        }
    }

    /// The coarse topology class a pipeline state is compiled against.
    pub const fn topology_type(self) -> PrimitiveTopologyType {
        match self {
            PrimitiveTopology::PointList => PrimitiveTopologyType::Point,
            PrimitiveTopology::LineList | PrimitiveTopology::LineStrip => {
                PrimitiveTopologyType::Line
            }
            PrimitiveTopology::TriangleList | PrimitiveTopology::TriangleStrip => {
                PrimitiveTopologyType::Triangle
            }
            PrimitiveTopology::PatchList => PrimitiveTopologyType::Patch,
        }
    }
}

/// The coarse primitive class a pipeline state is compiled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopologyType {
    /// Points.
    Point,
    /// Lines and line strips.
    Line,
    /// Triangles and triangle strips.
    #[default]
    Triangle,
    /// Tessellation patches.
    Patch,
}

/// Defines the programmable stage a shader is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// The vertex shader stage.
    Vertex,
    /// The tessellation control (hull) shader stage.
    TessellationControl,
    /// The tessellation evaluation (domain) shader stage.
    TessellationEvaluation,
    /// The geometry shader stage.
    Geometry,
    /// The fragment (or pixel) shader stage.
    Fragment,
}

/// Defines the memory format of texels in a texture or texture buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// One 8-bit unsigned normalized component.
    R8Unorm,
    /// Four 8-bit unsigned normalized components (RGBA).
    Rgba8Unorm,
    /// Four 8-bit unsigned normalized components (RGBA) in the sRGB color space.
    Rgba8UnormSrgb,
    /// Four 8-bit unsigned normalized components (BGRA). A common swap chain format.
    Bgra8Unorm,
    /// Four 16-bit float components.
    Rgba16Float,
    /// One 32-bit float component.
    R32Float,
    /// Four 32-bit float components.
    Rgba32Float,
    /// A 32-bit float depth format.
    Depth32Float,
    /// A 24-bit depth format with an 8-bit stencil component.
    Depth24PlusStencil8,
}

impl TextureFormat {
    /// Returns the size in bytes of a single texel for this format.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::R8Unorm => 1,
            TextureFormat::Rgba8Unorm => 4,
            TextureFormat::Rgba8UnormSrgb => 4,
            TextureFormat::Bgra8Unorm => 4,
            TextureFormat::Rgba16Float => 8,
            TextureFormat::R32Float => 4,
            TextureFormat::Rgba32Float => 16,
            TextureFormat::Depth32Float => 4,
            TextureFormat::Depth24PlusStencil8 => 4,
        }
    }

    /// Returns `true` for depth (and depth/stencil) formats.
    pub fn is_depth(&self) -> bool {
        matches!(
            self,
            TextureFormat::Depth32Float | TextureFormat::Depth24PlusStencil8
        )
    }
}

/// Describes how often the CPU is expected to update a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    /// Written once, drawn many times.
    #[default]
    StaticDraw,
    /// Written repeatedly, drawn many times.
    DynamicDraw,
    /// Written once, drawn a few times.
    StreamDraw,
}

/// Describes how a texture is expected to be accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureUsage {
    /// GPU read and write access.
    #[default]
    Default,
    /// GPU read-only access; contents must be provided at creation.
    Immutable,
    /// GPU read-only, CPU write-only access.
    Dynamic,
}

/// A comparison function used by depth tests and comparison samplers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompareFunction {
    /// Never passes.
    Never,
    /// Passes if the new value is less than the existing value.
    #[default]
    Less,
    /// Passes if the values are equal.
    Equal,
    /// Passes if the new value is less than or equal to the existing value.
    LessEqual,
    /// Passes if the new value is greater than the existing value.
    Greater,
    /// Passes if the values are different.
    NotEqual,
    /// Passes if the new value is greater than or equal to the existing value.
    GreaterEqual,
    /// Always passes.
    Always,
}

/// The name of a concrete graphics backend.
///
/// Backends are selected by name, e.g. `"Null"` or `"Direct3D11"`. The core never links
/// against a backend; it only needs the name to report capabilities and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendKind {
    /// A backend that validates and counts commands without touching a GPU.
    #[default]
    Null,
    /// Desktop OpenGL.
    OpenGL,
    /// OpenGL ES 3.
    OpenGLES3,
    /// Microsoft Direct3D 11.
    Direct3D11,
    /// Microsoft Direct3D 12.
    Direct3D12,
    /// Vulkan.
    Vulkan,
}

impl BackendKind {
    /// Every known backend kind.
    pub const ALL: [BackendKind; 6] = [
        BackendKind::Null,
        BackendKind::OpenGL,
        BackendKind::OpenGLES3,
        BackendKind::Direct3D11,
        BackendKind::Direct3D12,
        BackendKind::Vulkan,
    ];

    /// The canonical name used for selection.
    pub const fn name(&self) -> &'static str {
        match self {
            BackendKind::Null => "Null",
            BackendKind::OpenGL => "OpenGL",
            BackendKind::OpenGLES3 => "OpenGLES3",
            BackendKind::Direct3D11 => "Direct3D11",
            BackendKind::Direct3D12 => "Direct3D12",
            BackendKind::Vulkan => "Vulkan",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = crate::renderer::RenderError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        BackendKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| crate::renderer::RenderError::UnknownBackend(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topology_raw_values_round_trip() {
        for topology in [
            PrimitiveTopology::PointList,
            PrimitiveTopology::LineList,
            PrimitiveTopology::LineStrip,
            PrimitiveTopology::TriangleList,
            PrimitiveTopology::TriangleStrip,
            PrimitiveTopology::PatchList,
        ] {
            assert_eq!(PrimitiveTopology::from_raw(topology.as_raw()), Some(topology));
        }
        assert_eq!(PrimitiveTopology::from_raw(0), None);
        assert_eq!(PrimitiveTopology::from_raw(42), None);
    }

    #[test]
    fn backend_kind_parses_case_insensitively() {
        assert_eq!("null".parse::<BackendKind>().ok(), Some(BackendKind::Null));
        assert_eq!(
            "Direct3D11".parse::<BackendKind>().ok(),
            Some(BackendKind::Direct3D11)
        );
        assert_eq!(" vulkan ".parse::<BackendKind>().ok(), Some(BackendKind::Vulkan));
        assert!("Glide".parse::<BackendKind>().is_err());
    }

    #[test]
    fn depth_formats_are_detected() {
        assert!(TextureFormat::Depth32Float.is_depth());
        assert!(TextureFormat::Depth24PlusStencil8.is_depth());
        assert!(!TextureFormat::Rgba8Unorm.is_depth());
    }
}
