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

//! Command encoding, linear command buffers and keyed command buckets.
//!
//! Commands are plain-old-data structs ([`packets`]) identified by an [`Opcode`]. They are
//! encoded back to back into paged storage ([`stream`]) and decoded again at submission,
//! where each one is handed to the matching [`CommandBackend`](crate::renderer::CommandBackend)
//! method.

pub mod command_bucket;
pub mod command_buffer;
pub mod key;
pub mod opcode;
pub mod packets;
pub mod stream;

pub use self::command_bucket::*;
pub use self::command_buffer::*;
pub use self::key::*;
pub use self::opcode::Opcode;
pub use self::packets::*;
pub use self::stream::{CommandSlot, DecodedCommand, PacketHeader, HEADER_SIZE};

/// The largest payload a single command may carry, in bytes.
pub const MAX_PAYLOAD_SIZE: usize = 1 << 30;
