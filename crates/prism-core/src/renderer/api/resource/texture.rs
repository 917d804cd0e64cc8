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

//! Defines data structures related to GPU texture resources.

use super::{display_label, impl_resource, CreationContext, ResourceCore, ResourceType};
use crate::renderer::api::util::{TextureFlags, TextureFormat, TextureUsage};
use crate::renderer::error::ResourceError;
use std::borrow::Cow;

/// The number of faces of a cube texture.
pub const CUBE_FACES: u32 = 6;

/// The shape of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureDimension {
    /// A one-dimensional texture. `height` and `depth_or_array_layers` must be 1.
    D1,
    /// A two-dimensional texture. `depth_or_array_layers` must be 1.
    D2,
    /// An array of two-dimensional textures, one per layer.
    D2Array,
    /// A three-dimensional texture.
    D3,
    /// A cube texture. Square faces, `depth_or_array_layers` must be 6.
    Cube,
}

impl TextureDimension {
    /// The resource type of a texture of this shape.
    pub const fn resource_type(&self) -> ResourceType {
        match self {
            TextureDimension::D1 => ResourceType::Texture1D,
            TextureDimension::D2 => ResourceType::Texture2D,
            TextureDimension::D2Array => ResourceType::Texture2DArray,
            TextureDimension::D3 => ResourceType::Texture3D,
            TextureDimension::Cube => ResourceType::TextureCube,
        }
    }
}

/// Returns the number of mipmap levels of a full chain for the given size.
pub fn number_of_mipmaps(width: u32, height: u32, depth: u32) -> u32 {
    let largest = width.max(height).max(depth).max(1);
    u32::BITS - largest.leading_zeros()
}

/// A descriptor used to create a [`Texture`].
#[derive(Debug, Clone)]
pub struct TextureDescriptor<'a> {
    /// An optional debug label for the texture.
    pub label: Option<Cow<'a, str>>,
    /// The shape of the texture.
    pub dimension: TextureDimension,
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Depth of a 3D texture, number of layers of an array, 6 for a cube, else 1.
    pub depth_or_array_layers: u32,
    /// The texel format.
    pub format: TextureFormat,
    /// Creation flags.
    pub flags: TextureFlags,
    /// The expected access pattern.
    pub usage: TextureUsage,
    /// The number of samples per texel. Values above 1 are only valid for 2D textures.
    pub sample_count: u32,
    /// The initial contents: the top level, or every level with
    /// [`TextureFlags::DATA_CONTAINS_MIPMAPS`].
    pub data: Option<&'a [u8]>,
    /// The optimized clear value of a render target texture.
    pub clear_value: Option<[f32; 4]>,
}

impl<'a> TextureDescriptor<'a> {
    /// A single-sampled texture without initial data.
    pub fn new(
        dimension: TextureDimension,
        width: u32,
        height: u32,
        depth_or_array_layers: u32,
        format: TextureFormat,
    ) -> Self {
        Self {
            label: None,
            dimension,
            width,
            height,
            depth_or_array_layers,
            format,
            flags: TextureFlags::SHADER_RESOURCE,
            usage: TextureUsage::Default,
            sample_count: 1,
            data: None,
            clear_value: None,
        }
    }

    /// Sets the debug label.
    pub fn with_label(mut self, label: impl Into<Cow<'a, str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The number of mipmap levels the texture will have.
    pub fn mip_level_count(&self) -> u32 {
        if self
            .flags
            .intersects(TextureFlags::GENERATE_MIPMAPS | TextureFlags::DATA_CONTAINS_MIPMAPS)
        {
            let depth = match self.dimension {
                TextureDimension::D3 => self.depth_or_array_layers,
                _ => 1,
            };
            number_of_mipmaps(self.width, self.height, depth)
        } else {
            1
        }
    }

    /// The number of bytes the initial data must have.
    pub fn expected_data_size(&self) -> u64 {
        let bpp = u64::from(self.format.bytes_per_pixel());
        let levels = if self.flags.contains(TextureFlags::DATA_CONTAINS_MIPMAPS) {
            self.mip_level_count()
        } else {
            1
        };
        (0..levels)
            .map(|level| {
                let width = u64::from((self.width >> level).max(1));
                let height = u64::from((self.height >> level).max(1));
                let depth = match self.dimension {
                    TextureDimension::D3 => u64::from((self.depth_or_array_layers >> level).max(1)),
                    _ => u64::from(self.depth_or_array_layers),
                };
                width * height * depth * bpp
            })
            .sum()
    }

    pub(crate) fn validate(&self, ctx: &CreationContext<'_>) -> Result<(), ResourceError> {
        let resource_type = self.dimension.resource_type();
        let caps = ctx.capabilities;
        let dimensions = |details: String| ResourceError::InvalidDimensions {
            resource_type,
            details,
        };

        if self.width == 0 || self.height == 0 || self.depth_or_array_layers == 0 {
            return Err(ResourceError::ZeroSized {
                resource_type,
                label: display_label(self.label.as_deref()),
            });
        }
        match self.dimension {
            TextureDimension::D1 if self.height != 1 || self.depth_or_array_layers != 1 => {
                return Err(dimensions("a 1D texture has a height and depth of 1".to_string()));
            }
            TextureDimension::D2 if self.depth_or_array_layers != 1 => {
                return Err(dimensions("a 2D texture has a depth of 1".to_string()));
            }
            TextureDimension::Cube
                if self.width != self.height || self.depth_or_array_layers != CUBE_FACES =>
            {
                return Err(dimensions(format!(
                    "a cube texture has square faces and {CUBE_FACES} layers"
                )));
            }
            TextureDimension::D2Array
                if self.depth_or_array_layers > caps.max_2d_texture_array_slices =>
            {
                return Err(ctx.unsupported(format!(
                    "2D texture arrays of {} slices",
                    self.depth_or_array_layers
                )));
            }
            _ => {}
        }
        let largest = match self.dimension {
            TextureDimension::D3 => self.width.max(self.height).max(self.depth_or_array_layers),
            _ => self.width.max(self.height),
        };
        if largest > caps.max_texture_dimension {
            return Err(dimensions(format!(
                "{largest} texels exceed the maximum of {}",
                caps.max_texture_dimension
            )));
        }

        if self.sample_count == 0 || !self.sample_count.is_power_of_two() || self.sample_count > 8
        {
            return Err(ResourceError::InvalidDescriptor {
                resource_type,
                details: format!("unsupported sample count {}", self.sample_count),
            });
        }
        if self.sample_count > 1
            && (self.dimension != TextureDimension::D2 || self.mip_level_count() > 1)
        {
            return Err(ResourceError::InvalidDescriptor {
                resource_type,
                details: "only single-level 2D textures can be multisampled".to_string(),
            });
        }
        if self.format.is_depth()
            && matches!(self.dimension, TextureDimension::D1 | TextureDimension::D3)
        {
            return Err(ResourceError::InvalidDescriptor {
                resource_type,
                details: format!("{:?} cannot be used with {:?}", self.format, self.dimension),
            });
        }

        match self.data {
            Some(data) => {
                let expected = self.expected_data_size();
                if data.len() as u64 != expected {
                    return Err(ResourceError::DataSizeMismatch {
                        resource_type,
                        expected,
                        actual: data.len() as u64,
                    });
                }
            }
            None if self.usage == TextureUsage::Immutable => {
                return Err(ResourceError::InvalidDescriptor {
                    resource_type,
                    details: "an immutable texture needs initial data".to_string(),
                });
            }
            None => {}
        }
        Ok(())
    }
}

/// A GPU texture.
#[derive(Debug)]
pub struct Texture {
    core: ResourceCore,
    dimension: TextureDimension,
    width: u32,
    height: u32,
    depth_or_array_layers: u32,
    format: TextureFormat,
    flags: TextureFlags,
    usage: TextureUsage,
    mip_level_count: u32,
    sample_count: u32,
}

impl_resource!(Texture);

impl Texture {
    pub(crate) fn new(core: ResourceCore, descriptor: &TextureDescriptor<'_>) -> Self {
        Self {
            core,
            dimension: descriptor.dimension,
            width: descriptor.width,
            height: descriptor.height,
            depth_or_array_layers: descriptor.depth_or_array_layers,
            format: descriptor.format,
            flags: descriptor.flags,
            usage: descriptor.usage,
            mip_level_count: descriptor.mip_level_count(),
            sample_count: descriptor.sample_count,
        }
    }

    /// The shape of the texture.
    pub fn dimension(&self) -> TextureDimension {
        self.dimension
    }

    /// Width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Depth, layer count or face count.
    pub fn depth_or_array_layers(&self) -> u32 {
        self.depth_or_array_layers
    }

    /// The texel format.
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Creation flags.
    pub fn flags(&self) -> TextureFlags {
        self.flags
    }

    /// The expected access pattern.
    pub fn usage(&self) -> TextureUsage {
        self.usage
    }

    /// The number of mipmap levels.
    pub fn mip_level_count(&self) -> u32 {
        self.mip_level_count
    }

    /// The number of samples per texel.
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }
}
