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

//! Counters collected while dispatching commands.

use std::ops::AddAssign;

/// Statistics of one or more submissions to a command backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// The number of submissions (buffer or bucket submits).
    pub submissions: u64,
    /// The number of commands decoded and dispatched.
    pub commands_dispatched: u64,
    /// The number of draw commands, indirect draws count as one.
    pub draw_calls: u64,
    /// The number of state changes that reached the native API.
    pub state_changes: u64,
    /// The number of state changes skipped because the state was already bound.
    pub elided_state_changes: u64,
    /// The number of bytes copied into uniform buffers.
    pub uniform_bytes_uploaded: u64,
    /// The number of bytes copied into texture buffers.
    pub texture_buffer_bytes_uploaded: u64,
}

impl DispatchStats {
    /// Resets every counter to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl AddAssign for DispatchStats {
    fn add_assign(&mut self, other: Self) {
        self.submissions += other.submissions;
        self.commands_dispatched += other.commands_dispatched;
        self.draw_calls += other.draw_calls;
        self.state_changes += other.state_changes;
        self.elided_state_changes += other.elided_state_changes;
        self.uniform_bytes_uploaded += other.uniform_bytes_uploaded;
        self.texture_buffer_bytes_uploaded += other.texture_buffer_bytes_uploaded;
    }
}
