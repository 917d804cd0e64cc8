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

//! Shared, reference-counted handles that keep a resource alive across threads.

use super::types::{Resource, ResourceId, ResourceType};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A strong, thread-safe, reference-counted handle to a GPU resource.
///
/// Cloning a handle adds a reference and dropping one releases it. When the last handle
/// is dropped the resource asks its backend to destroy the native object. Owners such as
/// a framebuffer keep handles to what they reference, so a texture outlives every
/// framebuffer it is attached to no matter when the caller drops its own handle.
pub struct Handle<R: Resource>(Arc<R>);

impl<R: Resource> Handle<R> {
    /// Wraps a freshly created resource. The reference count starts at one.
    pub fn new(resource: R) -> Self {
        Self(Arc::new(resource))
    }

    /// Returns the number of live handles to this resource.
    pub fn reference_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// Returns `true` if both handles point to the same resource.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Shorthand for the resource id.
    pub fn id(&self) -> ResourceId {
        self.0.id()
    }

    /// Shorthand for the resource type tag.
    pub fn resource_type(&self) -> ResourceType {
        self.0.resource_type()
    }
}

impl<R: Resource> Clone for Handle<R> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<R: Resource> Deref for Handle<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.0
    }
}

impl<R: Resource> fmt::Debug for Handle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&*self.0).finish()
    }
}
