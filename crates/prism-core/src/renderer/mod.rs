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

//! Provides the public, backend-agnostic rendering contracts.
//!
//! This module defines the "common language" of rendering: the resource model and its
//! factory ([`Renderer`]), the command encoding used by [`CommandBuffer`] and
//! [`CommandBucket`], and the traits a concrete backend implements
//! ([`ResourceBackend`] for resource lifetime, [`CommandBackend`] for dispatch).
//!
//! The 'how' lives in a backend crate (e.g. `prism-infra`), which implements these
//! traits. Client code only ever talks to the types re-exported here.

pub mod api;
pub mod error;
pub mod factory;
pub mod state_cache;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::error::{CommandError, RenderError, ResourceError};
pub use self::factory::Renderer;
pub use self::state_cache::StateCache;
pub use self::traits::{CommandBackend, ResourceBackend, ResourceDescription};
