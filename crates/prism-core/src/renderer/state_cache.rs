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

//! Redundant-state elision for command backends.

use crate::renderer::api::resource::ResourceId;
use crate::renderer::api::util::PrimitiveTopology;

/// Remembers the pipeline state a backend last applied, so that binding the same object
/// twice in a row can be skipped.
///
/// Each `should_set_*` method returns `true` when the native call must be issued and
/// records the new value; it returns `false`, and counts an elision, when the value is
/// already current. A disabled cache always answers `true`.
///
/// Call [`reset`](Self::reset) whenever native state may have changed behind the cache's
/// back, e.g. at the start of a frame or after a context loss.
#[derive(Debug, Clone, Default)]
pub struct StateCache {
    enabled: bool,
    render_target: Option<ResourceId>,
    root_signature: Option<ResourceId>,
    pipeline_state: Option<ResourceId>,
    vertex_array: Option<ResourceId>,
    primitive_topology: Option<PrimitiveTopology>,
    elided: u64,
}

impl StateCache {
    /// Creates an empty cache.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    /// Returns `true` if redundant calls are elided.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables elision. Disabling also forgets every tracked value.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.reset();
        }
    }

    /// Forgets every tracked value. The elision count is kept.
    pub fn reset(&mut self) {
        self.render_target = None;
        self.root_signature = None;
        self.pipeline_state = None;
        self.vertex_array = None;
        self.primitive_topology = None;
    }

    /// The number of calls elided so far.
    pub fn elided(&self) -> u64 {
        self.elided
    }

    fn update<T: PartialEq>(
        enabled: bool,
        elided: &mut u64,
        slot: &mut Option<T>,
        value: T,
    ) -> bool {
        if !enabled {
            return true;
        }
        if slot.as_ref() == Some(&value) {
            *elided += 1;
            return false;
        }
        *slot = Some(value);
        true
    }

    /// Tracks the bound swap chain or framebuffer.
    pub fn should_set_render_target(&mut self, render_target: ResourceId) -> bool {
        Self::update(self.enabled, &mut self.elided, &mut self.render_target, render_target)
    }

    /// Tracks the bound root signature.
    pub fn should_set_root_signature(&mut self, root_signature: ResourceId) -> bool {
        Self::update(self.enabled, &mut self.elided, &mut self.root_signature, root_signature)
    }

    /// Tracks the bound pipeline state.
    pub fn should_set_pipeline_state(&mut self, pipeline_state: ResourceId) -> bool {
        Self::update(self.enabled, &mut self.elided, &mut self.pipeline_state, pipeline_state)
    }

    /// Tracks the bound vertex array.
    pub fn should_set_vertex_array(&mut self, vertex_array: ResourceId) -> bool {
        Self::update(self.enabled, &mut self.elided, &mut self.vertex_array, vertex_array)
    }

    /// Tracks the primitive topology.
    pub fn should_set_primitive_topology(&mut self, topology: PrimitiveTopology) -> bool {
        Self::update(
            self.enabled,
            &mut self.elided,
            &mut self.primitive_topology,
            topology,
        )
    }

    /// The render target last applied.
    pub fn render_target(&self) -> Option<ResourceId> {
        self.render_target
    }

    /// The pipeline state last applied.
    pub fn pipeline_state(&self) -> Option<ResourceId> {
        self.pipeline_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_bindings_are_elided() {
        let mut cache = StateCache::new(true);
        assert!(cache.should_set_pipeline_state(ResourceId(1)));
        assert!(!cache.should_set_pipeline_state(ResourceId(1)));
        assert!(cache.should_set_pipeline_state(ResourceId(2)));
        assert!(!cache.should_set_pipeline_state(ResourceId(2)));
        assert!(cache.should_set_primitive_topology(PrimitiveTopology::TriangleList));
        assert!(!cache.should_set_primitive_topology(PrimitiveTopology::TriangleList));
        assert_eq!(cache.elided(), 3);
        assert_eq!(cache.pipeline_state(), Some(ResourceId(2)));
    }

    #[test]
    fn slots_are_independent() {
        let mut cache = StateCache::new(true);
        assert!(cache.should_set_vertex_array(ResourceId(7)));
        assert!(cache.should_set_root_signature(ResourceId(7)));
        assert!(cache.should_set_render_target(ResourceId(7)));
        assert_eq!(cache.elided(), 0);
    }

    #[test]
    fn reset_forgets_values_but_keeps_the_count() {
        let mut cache = StateCache::new(true);
        cache.should_set_render_target(ResourceId(3));
        cache.should_set_render_target(ResourceId(3));
        cache.reset();
        assert_eq!(cache.render_target(), None);
        assert!(cache.should_set_render_target(ResourceId(3)));
        assert_eq!(cache.elided(), 1);
    }

    #[test]
    fn disabled_cache_never_elides() {
        let mut cache = StateCache::new(false);
        for _ in 0..3 {
            assert!(cache.should_set_vertex_array(ResourceId(1)));
        }
        assert_eq!(cache.elided(), 0);

        let mut cache = StateCache::new(true);
        cache.should_set_vertex_array(ResourceId(1));
        cache.set_enabled(false);
        assert!(cache.should_set_vertex_array(ResourceId(1)));
        assert!(!cache.is_enabled());
    }
}
