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

//! Swap chains: the presentable render targets bound to a native window.

use super::{display_label, impl_resource, CreationContext, ResourceCore, ResourceType};
use crate::renderer::api::util::TextureFormat;
use crate::renderer::error::ResourceError;
use std::borrow::Cow;
use std::sync::atomic::{AtomicU32, Ordering};

/// A descriptor used to create a [`SwapChain`].
#[derive(Debug, Clone)]
pub struct SwapChainDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The platform window the swap chain presents to, as an opaque integer.
    pub native_window_handle: u64,
    /// Width of the back buffers.
    pub width: u32,
    /// Height of the back buffers.
    pub height: u32,
    /// The back buffer format.
    pub color_format: TextureFormat,
    /// The format of the implicit depth-stencil buffer, if any.
    pub depth_stencil_format: Option<TextureFormat>,
    /// If `true`, presentation waits for vertical sync.
    pub vsync: bool,
}

impl SwapChainDescriptor<'_> {
    pub(crate) fn validate(&self, _ctx: &CreationContext<'_>) -> Result<(), ResourceError> {
        if self.width == 0 || self.height == 0 {
            return Err(ResourceError::ZeroSized {
                resource_type: ResourceType::SwapChain,
                label: display_label(self.label.as_deref()),
            });
        }
        if self.color_format.is_depth() {
            return Err(ResourceError::InvalidDescriptor {
                resource_type: ResourceType::SwapChain,
                details: format!("{:?} is not a color format", self.color_format),
            });
        }
        if let Some(format) = self.depth_stencil_format.filter(|f| !f.is_depth()) {
            return Err(ResourceError::InvalidDescriptor {
                resource_type: ResourceType::SwapChain,
                details: format!("{format:?} is not a depth format"),
            });
        }
        Ok(())
    }
}

/// An on-screen render target.
#[derive(Debug)]
pub struct SwapChain {
    core: ResourceCore,
    native_window_handle: u64,
    width: AtomicU32,
    height: AtomicU32,
    color_format: TextureFormat,
    depth_stencil_format: Option<TextureFormat>,
    vsync: bool,
}

impl_resource!(SwapChain);

impl SwapChain {
    pub(crate) fn new(core: ResourceCore, descriptor: &SwapChainDescriptor<'_>) -> Self {
        Self {
            core,
            native_window_handle: descriptor.native_window_handle,
            width: AtomicU32::new(descriptor.width),
            height: AtomicU32::new(descriptor.height),
            color_format: descriptor.color_format,
            depth_stencil_format: descriptor.depth_stencil_format,
            vsync: descriptor.vsync,
        }
    }

    /// The platform window the swap chain presents to.
    pub fn native_window_handle(&self) -> u64 {
        self.native_window_handle
    }

    /// The current back buffer size.
    pub fn size(&self) -> (u32, u32) {
        (
            self.width.load(Ordering::Acquire),
            self.height.load(Ordering::Acquire),
        )
    }

    /// The back buffer format.
    pub fn color_format(&self) -> TextureFormat {
        self.color_format
    }

    /// The depth-stencil format, if any.
    pub fn depth_stencil_format(&self) -> Option<TextureFormat> {
        self.depth_stencil_format
    }

    /// Whether presentation waits for vertical sync.
    pub fn vsync(&self) -> bool {
        self.vsync
    }

    /// Resizes the back buffers, typically after the window was resized.
    pub fn resize(&self, width: u32, height: u32) -> Result<(), ResourceError> {
        if width == 0 || height == 0 {
            return Err(ResourceError::InvalidDimensions {
                resource_type: ResourceType::SwapChain,
                details: format!("cannot resize to {width}x{height}"),
            });
        }
        self.core
            .backend()
            .resize_swap_chain(self.core.id(), width, height)?;
        self.width.store(width, Ordering::Release);
        self.height.store(height, Ordering::Release);
        log::debug!("Swap chain {} resized to {width}x{height}", self.core.id());
        Ok(())
    }
}
