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

//! Off-screen render targets.

use super::{
    display_label, impl_resource, CreationContext, Handle, Resource, ResourceCore, ResourceType,
    Texture,
};
use crate::renderer::api::util::TextureFlags;
use crate::renderer::error::ResourceError;
use std::borrow::Cow;

/// One texture attached to a framebuffer.
#[derive(Debug, Clone)]
pub struct FramebufferAttachment {
    /// The attached texture. Must be a 2D texture or 2D texture array.
    pub texture: Handle<Texture>,
    /// The mipmap level rendered into.
    pub mipmap_index: u32,
    /// The array layer rendered into; `0` for a 2D texture.
    pub layer_index: u32,
}

impl FramebufferAttachment {
    /// Attaches the top level of a texture.
    pub fn new(texture: Handle<Texture>) -> Self {
        Self {
            texture,
            mipmap_index: 0,
            layer_index: 0,
        }
    }

    /// The size of the attached level.
    pub fn size(&self) -> (u32, u32) {
        (
            (self.texture.width() >> self.mipmap_index).max(1),
            (self.texture.height() >> self.mipmap_index).max(1),
        )
    }

    fn check(&self, index: usize, depth: bool) -> Result<(), ResourceError> {
        let incompatible = |details: String| ResourceError::IncompatibleAttachment { index, details };
        let texture = &self.texture;
        match texture.resource_type() {
            ResourceType::Texture2D => {
                if self.layer_index != 0 {
                    return Err(incompatible(format!(
                        "layer {} of a 2D texture",
                        self.layer_index
                    )));
                }
            }
            ResourceType::Texture2DArray => {
                if self.layer_index >= texture.depth_or_array_layers() {
                    return Err(incompatible(format!(
                        "layer {} of a {} layer array",
                        self.layer_index,
                        texture.depth_or_array_layers()
                    )));
                }
            }
            other => {
                return Err(incompatible(format!(
                    "{other:?} '{}' cannot be rendered into",
                    display_label(texture.label())
                )))
            }
        }
        if !texture.flags().contains(TextureFlags::RENDER_TARGET) {
            return Err(incompatible(format!(
                "texture '{}' was not created as a render target",
                display_label(texture.label())
            )));
        }
        if self.mipmap_index >= texture.mip_level_count() {
            return Err(incompatible(format!(
                "mipmap {} of a {} level texture",
                self.mipmap_index,
                texture.mip_level_count()
            )));
        }
        if texture.format().is_depth() != depth {
            return Err(incompatible(format!(
                "{:?} used as a {} attachment",
                texture.format(),
                if depth { "depth-stencil" } else { "color" }
            )));
        }
        Ok(())
    }
}

/// A descriptor used to create a [`Framebuffer`].
#[derive(Debug, Clone, Default)]
pub struct FramebufferDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The color attachments.
    pub color_attachments: Vec<FramebufferAttachment>,
    /// The depth-stencil attachment.
    pub depth_stencil_attachment: Option<FramebufferAttachment>,
}

impl FramebufferDescriptor<'_> {
    /// Every attachment, depth-stencil last.
    pub fn attachments(&self) -> impl Iterator<Item = &FramebufferAttachment> {
        self.color_attachments
            .iter()
            .chain(self.depth_stencil_attachment.iter())
    }

    pub(crate) fn validate(&self, ctx: &CreationContext<'_>) -> Result<(), ResourceError> {
        if self.color_attachments.is_empty() && self.depth_stencil_attachment.is_none() {
            return Err(ResourceError::InvalidDescriptor {
                resource_type: ResourceType::Framebuffer,
                details: "a framebuffer needs at least one attachment".to_string(),
            });
        }
        if self.color_attachments.len() > ctx.capabilities.max_simultaneous_render_targets as usize
        {
            return Err(ctx.unsupported(format!(
                "{} simultaneous render targets",
                self.color_attachments.len()
            )));
        }
        for (index, attachment) in self.color_attachments.iter().enumerate() {
            attachment.check(index, false)?;
        }
        if let Some(attachment) = &self.depth_stencil_attachment {
            attachment.check(self.color_attachments.len(), true)?;
        }

        let mut attachments = self.attachments().enumerate();
        if let Some((_, first)) = attachments.next() {
            let size = first.size();
            if let Some((index, attachment)) = attachments.find(|(_, a)| a.size() != size) {
                return Err(ResourceError::IncompatibleAttachment {
                    index,
                    details: format!(
                        "size {:?} differs from the first attachment's {:?}",
                        attachment.size(),
                        size
                    ),
                });
            }
        }
        Ok(())
    }
}

/// An off-screen render target made of textures.
///
/// The framebuffer keeps every attached texture alive, so a caller may drop its own
/// texture handles right after creating the framebuffer.
#[derive(Debug)]
pub struct Framebuffer {
    core: ResourceCore,
    color_attachments: Vec<FramebufferAttachment>,
    depth_stencil_attachment: Option<FramebufferAttachment>,
    width: u32,
    height: u32,
}

impl_resource!(Framebuffer);

impl Framebuffer {
    pub(crate) fn new(core: ResourceCore, descriptor: &FramebufferDescriptor<'_>) -> Self {
        let (width, height) = descriptor
            .attachments()
            .next()
            .map(FramebufferAttachment::size)
            .unwrap_or((0, 0));
        Self {
            core,
            color_attachments: descriptor.color_attachments.clone(),
            depth_stencil_attachment: descriptor.depth_stencil_attachment.clone(),
            width,
            height,
        }
    }

    /// The color attachments.
    pub fn color_attachments(&self) -> &[FramebufferAttachment] {
        &self.color_attachments
    }

    /// The depth-stencil attachment, if any.
    pub fn depth_stencil_attachment(&self) -> Option<&FramebufferAttachment> {
        self.depth_stencil_attachment.as_ref()
    }

    /// The size shared by every attachment.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
