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


//! The resource side of the Null backend.

use prism_core::renderer::api::{Capabilities, ResourceId, ResourceType};
use prism_core::renderer::error::ResourceError;
use prism_core::renderer::traits::{ResourceBackend, ResourceDescription};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// The bookkeeping the Null device keeps for one live resource.
#[derive(Debug, Clone)]
struct NullResourceEntry {
    resource_type: ResourceType,
    label: Option<String>,
    /// The memory the resource would occupy on a GPU.
    size_in_bytes: u64,
    /// The contents of buffers; other resources store nothing.
    contents: Option<Vec<u8>>,
    /// The back buffer size of swap chains.
    extent: Option<(u32, u32)>,
}

#[derive(Debug)]
struct NullDeviceInternal {
    capabilities: Capabilities,
    resources: Mutex<HashMap<ResourceId, NullResourceEntry>>,
    next_resource_id: AtomicU64,
    allocated_bytes: AtomicU64,
    peak_bytes: AtomicU64,
    destroyed: AtomicU64,
}

/// A device that keeps a registry of resources without touching a GPU.
///
/// Buffers keep their bytes so writes can be observed. Every other resource is reduced
/// to its type, label and estimated memory footprint. The device is a clonable handle:
/// the command side of the backend shares it to check the ids it is given.
#[derive(Clone, Debug)]
pub struct NullDevice {
    internal: Arc<NullDeviceInternal>,
}

impl Default for NullDevice {
    fn default() -> Self {
        Self::new(Capabilities::desktop())
    }
}

impl NullDevice {
    /// The name the device reports.
    pub const NAME: &'static str = "Null";

    /// Creates a device reporting the given capabilities.
    pub fn new(capabilities: Capabilities) -> Self {
        log::info!("NullDevice: Created with capabilities {capabilities:?}");
        Self {
            internal: Arc::new(NullDeviceInternal {
                capabilities,
                resources: Mutex::new(HashMap::new()),
                next_resource_id: AtomicU64::new(1),
                allocated_bytes: AtomicU64::new(0),
                peak_bytes: AtomicU64::new(0),
                destroyed: AtomicU64::new(0),
            }),
        }
    }

    fn generate_resource_id(&self) -> ResourceId {
        ResourceId(self.internal.next_resource_id.fetch_add(1, Ordering::Relaxed))
    }

    fn lock_resources(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<ResourceId, NullResourceEntry>>, ResourceError> {
        self.internal
            .resources
            .lock()
            .map_err(|e| ResourceError::Backend(format!("NullDevice registry poisoned: {e}")))
    }

    /// The memory a resource of this description would occupy.
    fn estimate_size_in_bytes(description: &ResourceDescription<'_>) -> u64 {
        match description {
            ResourceDescription::Buffer(descriptor) => descriptor.size,
            ResourceDescription::Texture(descriptor) => {
                let bpp = u64::from(descriptor.format.bytes_per_pixel());
                let samples = u64::from(descriptor.sample_count.max(1));
                (0..descriptor.mip_level_count())
                    .map(|level| {
                        let width = u64::from((descriptor.width >> level).max(1));
                        let height = u64::from((descriptor.height >> level).max(1));
                        width * height * u64::from(descriptor.depth_or_array_layers) * bpp
                    })
                    .sum::<u64>()
                    * samples
            }
            ResourceDescription::SwapChain(descriptor) => {
                Self::swap_chain_size(descriptor.width, descriptor.height)
            }
            _ => 0,
        }
    }

    /// Two RGBA8 back buffers.
    fn swap_chain_size(width: u32, height: u32) -> u64 {
        2 * u64::from(width) * u64::from(height) * 4
    }

    fn track_allocation(&self, size: u64) {
        let current = self.internal.allocated_bytes.fetch_add(size, Ordering::Relaxed) + size;
        self.internal.peak_bytes.fetch_max(current, Ordering::Relaxed);
    }

    /// Returns `true` if `id` refers to a live resource.
    pub fn contains(&self, id: ResourceId) -> bool {
        self.lock_resources()
            .map(|resources| resources.contains_key(&id))
            .unwrap_or(false)
    }

    /// The type of a live resource.
    pub fn resource_type(&self, id: ResourceId) -> Option<ResourceType> {
        let resources = self.lock_resources().ok()?;
        resources.get(&id).map(|entry| entry.resource_type)
    }

    /// The debug label of a live resource.
    pub fn label(&self, id: ResourceId) -> Option<String> {
        let resources = self.lock_resources().ok()?;
        resources.get(&id).and_then(|entry| entry.label.clone())
    }

    /// The current contents of a live buffer.
    pub fn buffer_contents(&self, id: ResourceId) -> Option<Vec<u8>> {
        let resources = self.lock_resources().ok()?;
        resources.get(&id).and_then(|entry| entry.contents.clone())
    }

    /// The back buffer size of a live swap chain.
    pub fn swap_chain_extent(&self, id: ResourceId) -> Option<(u32, u32)> {
        let resources = self.lock_resources().ok()?;
        resources.get(&id).and_then(|entry| entry.extent)
    }

    /// The number of live resources.
    pub fn live_resource_count(&self) -> usize {
        self.lock_resources().map(|r| r.len()).unwrap_or(0)
    }

    /// The number of resources destroyed so far.
    pub fn destroyed_resource_count(&self) -> u64 {
        self.internal.destroyed.load(Ordering::Relaxed)
    }

    /// The estimated memory held by live resources.
    pub fn allocated_bytes(&self) -> u64 {
        self.internal.allocated_bytes.load(Ordering::Relaxed)
    }

    /// The highest value [`allocated_bytes`](Self::allocated_bytes) has reached.
    pub fn peak_bytes(&self) -> u64 {
        self.internal.peak_bytes.load(Ordering::Relaxed)
    }

    /// Copies `data` into a live buffer, as the uniform and texture buffer commands do.
    pub(crate) fn upload(&self, id: ResourceId, data: &[u8]) -> Result<(), ResourceError> {
        self.write_buffer(id, 0, data)
    }
}

impl ResourceBackend for NullDevice {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn capabilities(&self) -> &Capabilities {
        &self.internal.capabilities
    }

    fn create_resource(
        &self,
        description: &ResourceDescription<'_>,
    ) -> Result<ResourceId, ResourceError> {
        let resource_type = description.resource_type();
        let size_in_bytes = Self::estimate_size_in_bytes(description);

        let (contents, extent) = match description {
            ResourceDescription::Buffer(descriptor) => {
                let mut contents = vec![0u8; descriptor.size as usize];
                if let Some(data) = descriptor.data {
                    let len = data.len().min(contents.len());
                    contents[..len].copy_from_slice(&data[..len]);
                }
                (Some(contents), None)
            }
            ResourceDescription::SwapChain(descriptor) => {
                (None, Some((descriptor.width, descriptor.height)))
            }
            _ => (None, None),
        };

        let id = self.generate_resource_id();
        self.lock_resources()?.insert(
            id,
            NullResourceEntry {
                resource_type,
                label: description.label().map(str::to_string),
                size_in_bytes,
                contents,
                extent,
            },
        );
        self.track_allocation(size_in_bytes);

        log::debug!(
            "NullDevice: Created {resource_type:?} '{}' with ID: {id}, size: {size_in_bytes} bytes",
            description.label().unwrap_or_default(),
        );
        Ok(id)
    }

    fn destroy_resource(&self, id: ResourceId, resource_type: ResourceType) {
        let removed = match self.lock_resources() {
            Ok(mut resources) => resources.remove(&id),
            Err(e) => {
                log::error!("{e}");
                return;
            }
        };

        match removed {
            Some(entry) => {
                if entry.resource_type != resource_type {
                    log::warn!(
                        "NullDevice: Resource {id} was created as {:?} but destroyed as {resource_type:?}",
                        entry.resource_type
                    );
                }
                self.internal
                    .allocated_bytes
                    .fetch_sub(entry.size_in_bytes, Ordering::Relaxed);
                self.internal.destroyed.fetch_add(1, Ordering::Relaxed);
                log::debug!("NullDevice: Destroyed {resource_type:?} with ID: {id}");
            }
            None => log::warn!("NullDevice: Destroy of unknown {resource_type:?} {id}"),
        }
    }

    fn write_buffer(&self, id: ResourceId, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        let mut resources = self.lock_resources()?;
        let contents = resources
            .get_mut(&id)
            .and_then(|entry| entry.contents.as_mut())
            .ok_or(ResourceError::UnknownResource(id.0))?;

        let capacity = contents.len() as u64;
        let end = offset
            .checked_add(data.len() as u64)
            .filter(|end| *end <= capacity)
            .ok_or(ResourceError::OutOfBounds {
                offset,
                size: data.len() as u64,
                capacity,
            })?;
        contents[offset as usize..end as usize].copy_from_slice(data);

        log::trace!(
            "NullDevice: Wrote {} bytes to buffer ID: {id} at offset {offset}",
            data.len()
        );
        Ok(())
    }

    fn resize_swap_chain(&self, id: ResourceId, width: u32, height: u32) -> Result<(), ResourceError> {
        let mut resources = self.lock_resources()?;
        let entry = resources
            .get_mut(&id)
            .filter(|entry| entry.resource_type == ResourceType::SwapChain)
            .ok_or(ResourceError::UnknownResource(id.0))?;

        let new_size = Self::swap_chain_size(width, height);
        let old_size = std::mem::replace(&mut entry.size_in_bytes, new_size);
        entry.extent = Some((width, height));
        drop(resources);

        self.internal
            .allocated_bytes
            .fetch_sub(old_size, Ordering::Relaxed);
        self.track_allocation(new_size);
        log::debug!("NullDevice: Resized swap chain {id} to {width}x{height}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::renderer::api::{BufferUsage, TextureFlags, TextureFormat};
    use prism_core::Renderer;

    fn renderer() -> (NullDevice, Renderer) {
        let device = NullDevice::default();
        let renderer = Renderer::new(Arc::new(device.clone()));
        (device, renderer)
    }

    #[test]
    fn ids_are_never_null_and_never_reused() {
        let (device, renderer) = renderer();
        let first = renderer
            .create_uniform_buffer(16, None, BufferUsage::DynamicDraw)
            .expect("buffer");
        let first_id = first.id();
        drop(first);
        let second = renderer
            .create_uniform_buffer(16, None, BufferUsage::DynamicDraw)
            .expect("buffer");

        assert!(!first_id.is_null());
        assert_ne!(first_id, second.id());
        assert_eq!(device.live_resource_count(), 1);
        assert_eq!(device.destroyed_resource_count(), 1);
    }

    #[test]
    fn buffers_keep_their_initial_data_and_writes() {
        let (device, renderer) = renderer();
        let buffer = renderer
            .create_vertex_buffer(8, Some(&[1, 2, 3, 4, 5, 6, 7, 8]), BufferUsage::StaticDraw)
            .expect("buffer");

        buffer.copy_data_from(4, &[9, 9]).expect("write in bounds");
        assert_eq!(
            device.buffer_contents(buffer.id()),
            Some(vec![1, 2, 3, 4, 9, 9, 7, 8])
        );
    }

    #[test]
    fn out_of_bounds_writes_are_rejected_by_the_device() {
        let (device, renderer) = renderer();
        let buffer = renderer
            .create_uniform_buffer(4, None, BufferUsage::DynamicDraw)
            .expect("buffer");

        let err = device.write_buffer(buffer.id(), 2, &[0; 4]);
        assert!(matches!(err, Err(ResourceError::OutOfBounds { capacity: 4, .. })));
        let err = device.write_buffer(ResourceId(999), 0, &[0]);
        assert_eq!(err, Err(ResourceError::UnknownResource(999)));
    }

    #[test]
    fn memory_tracking_follows_the_live_set() {
        let (device, renderer) = renderer();
        let texture = renderer
            .create_texture_2d(4, 4, TextureFormat::Rgba8Unorm, TextureFlags::SHADER_RESOURCE, None)
            .expect("texture");
        let buffer = renderer
            .create_uniform_buffer(32, None, BufferUsage::DynamicDraw)
            .expect("buffer");
        assert_eq!(device.allocated_bytes(), 64 + 32);

        drop(texture);
        drop(buffer);
        assert_eq!(device.allocated_bytes(), 0);
        assert_eq!(device.peak_bytes(), 96);
        assert_eq!(device.live_resource_count(), 0);
    }

    #[test]
    fn labels_and_types_are_recorded() {
        let (device, renderer) = renderer();
        let buffer = renderer
            .create_buffer(
                &prism_core::renderer::api::BufferDescriptor::new(
                    prism_core::renderer::api::BufferKind::Indirect,
                    20,
                    None,
                    BufferUsage::DynamicDraw,
                )
                .with_label("draws"),
            )
            .expect("buffer");

        assert_eq!(device.label(buffer.id()).as_deref(), Some("draws"));
        assert_eq!(
            device.resource_type(buffer.id()),
            Some(ResourceType::IndirectBuffer)
        );
    }
}
