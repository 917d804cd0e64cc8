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


//! # Prism Infra
//!
//! Concrete backends for the `prism-core` contracts, and the glue an application needs
//! to start one: backend selection from [`RenderSettings`](prism_core::renderer::api::RenderSettings)
//! and logger setup.

#![warn(missing_docs)]

pub mod backend;
pub mod graphics;
pub mod logging;

pub use backend::{available_backends, create_backend, BackendInstance};
pub use logging::{init_logging, LoggingConfig};
