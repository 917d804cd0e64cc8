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

//! Keyed, sortable command chains.
//!
//! A [`CommandBucket`] decouples the order in which commands are generated from the order
//! in which they execute. Each [`add_command`](CommandBucket::add_command) starts a chain
//! tagged with a key; [`append_command`](CommandBucket::append_command) links further
//! commands into that chain. [`sort`](CommandBucket::sort) orders the chains by key and
//! [`submit`](CommandBucket::submit) replays them, each chain in its own append order.
//!
//! The bucket knows nothing about what a key means. A plain pass priority, a packed
//! depth/material/pipeline key or any other `Ord` type works the same way.

use super::packets::Command;
use super::stream::{CommandSlot, CommandStream, DecodedCommand, RecordLocation};
use crate::renderer::api::core::CommandSettings;
use crate::renderer::error::CommandError;
use crate::renderer::traits::CommandBackend;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

static NEXT_BUCKET_ID: AtomicU32 = AtomicU32::new(1);

/// Where a bucket is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketState {
    /// No chain.
    Empty,
    /// Chains were added since the last sort.
    Populated,
    /// Chains are sorted and nothing was added since.
    Sorted,
    /// The bucket was submitted and not modified since.
    Submitted,
}

/// A checked reference to a command in a bucket, used to extend its chain.
///
/// A handle stays valid until the bucket is cleared. Using it with another bucket, or
/// after a clear, is rejected with a [`CommandError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandHandle {
    bucket: u32,
    generation: u32,
    link: u32,
}

#[derive(Debug, Clone, Copy)]
struct Link {
    location: RecordLocation,
    next: Option<u32>,
}

#[derive(Debug)]
struct Chain<K> {
    key: K,
    first: u32,
}

/// A keyed, sortable collection of command chains.
///
/// Like [`CommandBuffer`](super::CommandBuffer), a bucket borrows the resources its
/// commands refer to and is filled through `&mut self`; distinct buckets can be filled
/// on distinct threads.
#[derive(Debug)]
pub struct CommandBucket<K> {
    id: u32,
    generation: u32,
    stream: CommandStream,
    links: Vec<Link>,
    chains: Vec<Chain<K>>,
    order: Vec<u32>,
    state: BucketState,
}

impl<K> Default for CommandBucket<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> CommandBucket<K> {
    /// Creates an empty bucket with default settings.
    pub fn new() -> Self {
        Self::with_settings(CommandSettings::default())
    }

    /// Creates an empty bucket.
    pub fn with_settings(settings: CommandSettings) -> Self {
        Self {
            id: NEXT_BUCKET_ID.fetch_add(1, AtomicOrdering::Relaxed),
            generation: 0,
            stream: CommandStream::new(&settings),
            links: Vec::new(),
            chains: Vec::new(),
            order: Vec::new(),
            state: BucketState::Empty,
        }
    }

    /// The current life-cycle state.
    pub fn state(&self) -> BucketState {
        self.state
    }

    /// Returns `true` if the bucket holds no chain.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// The number of chains.
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// The number of commands over all chains.
    pub fn command_count(&self) -> usize {
        self.links.len()
    }

    /// Starts a new chain tagged with `key`, headed by `command` and a zeroed payload of
    /// `payload_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `payload_size` exceeds [`MAX_PAYLOAD_SIZE`](super::MAX_PAYLOAD_SIZE).
    pub fn add_command<T: Command>(
        &mut self,
        key: K,
        command: T,
        payload_size: usize,
    ) -> (CommandHandle, CommandSlot<'_, T>) {
        let link = self.links.len() as u32;
        self.chains.push(Chain { key, first: link });
        self.order.push((self.chains.len() - 1) as u32);
        self.state = BucketState::Populated;
        self.encode(command, payload_size, None)
    }

    /// Encodes `command` with a zeroed payload of `payload_size` bytes directly after
    /// `previous` in its chain.
    pub fn append_command<T: Command>(
        &mut self,
        previous: CommandHandle,
        command: T,
        payload_size: usize,
    ) -> Result<(CommandHandle, CommandSlot<'_, T>), CommandError> {
        let previous = self.resolve(previous)?;
        self.state = BucketState::Populated;
        Ok(self.encode(command, payload_size, Some(previous)))
    }

    /// Starts a new chain with a command without payload.
    pub fn add<T: Command>(&mut self, key: K, command: T) -> CommandHandle {
        self.add_command(key, command, 0).0
    }

    /// Starts a new chain with a command followed by a copy of `payload`.
    pub fn add_with_payload<T: Command>(
        &mut self,
        key: K,
        command: T,
        payload: &[u8],
    ) -> CommandHandle {
        let (handle, slot) = self.add_command(key, command, payload.len());
        slot.payload.copy_from_slice(payload);
        handle
    }

    /// Links a command without payload after `previous`.
    pub fn append<T: Command>(
        &mut self,
        previous: CommandHandle,
        command: T,
    ) -> Result<CommandHandle, CommandError> {
        Ok(self.append_command(previous, command, 0)?.0)
    }

    /// Links a command followed by a copy of `payload` after `previous`.
    pub fn append_with_payload<T: Command>(
        &mut self,
        previous: CommandHandle,
        command: T,
        payload: &[u8],
    ) -> Result<CommandHandle, CommandError> {
        let (handle, slot) = self.append_command(previous, command, payload.len())?;
        slot.payload.copy_from_slice(payload);
        Ok(handle)
    }

    fn encode<T: Command>(
        &mut self,
        command: T,
        payload_size: usize,
        previous: Option<u32>,
    ) -> (CommandHandle, CommandSlot<'_, T>) {
        let index = self.links.len() as u32;
        let (location, slot) = self.stream.append(command, payload_size);
        let next = previous.and_then(|previous| {
            let previous = &mut self.links[previous as usize];
            previous.next.replace(index)
        });
        self.links.push(Link { location, next });
        let handle = CommandHandle {
            bucket: self.id,
            generation: self.generation,
            link: index,
        };
        (handle, slot)
    }

    fn resolve(&self, handle: CommandHandle) -> Result<u32, CommandError> {
        if handle.bucket != self.id {
            return Err(CommandError::ForeignChainReference {
                handle_bucket: handle.bucket,
                bucket: self.id,
            });
        }
        if handle.generation != self.generation || handle.link as usize >= self.links.len() {
            return Err(CommandError::DanglingChainReference {
                link: handle.link,
                generation: handle.generation,
                current_generation: self.generation,
            });
        }
        Ok(handle.link)
    }

    /// Orders the chains with `compare`. Chains comparing equal keep their insertion
    /// order, so sorting again without adding chains changes nothing.
    pub fn sort_by(&mut self, mut compare: impl FnMut(&K, &K) -> Ordering) {
        let chains = &self.chains;
        self.order.sort_by(|&a, &b| {
            compare(&chains[a as usize].key, &chains[b as usize].key).then(a.cmp(&b))
        });
        if !self.chains.is_empty() {
            self.state = BucketState::Sorted;
        }
    }

    /// The keys in the current submission order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order
            .iter()
            .map(|&chain| &self.chains[chain as usize].key)
    }

    fn chain_commands(&self, chain: u32) -> ChainIter<'_> {
        ChainIter {
            stream: &self.stream,
            links: &self.links,
            next: Some(self.chains[chain as usize].first),
        }
    }

    /// Iterates over the commands in submission order: chains in the last established
    /// order, each chain in append order.
    pub fn iter(&self) -> impl Iterator<Item = DecodedCommand<'_>> {
        self.order
            .iter()
            .flat_map(move |&chain| self.chain_commands(chain))
    }

    /// Dispatches every chain to `backend`, in the last established order.
    ///
    /// Chains added after the last sort follow the sorted ones in insertion order. Every
    /// record is checked before the first command is dispatched.
    pub fn submit<B: CommandBackend + ?Sized>(&mut self, backend: &mut B) {
        self.stream.verify();
        backend.begin_submission();
        for &chain in &self.order {
            for command in self.chain_commands(chain) {
                command.dispatch(backend);
            }
        }
        backend.end_submission();
        if !self.chains.is_empty() {
            self.state = BucketState::Submitted;
        }
    }

    /// Submits, then clears.
    pub fn submit_and_clear<B: CommandBackend + ?Sized>(&mut self, backend: &mut B) {
        self.submit(backend);
        self.clear();
    }

    /// Forgets every chain. Every handle issued so far becomes dangling.
    pub fn clear(&mut self) {
        self.stream.clear();
        self.links.clear();
        self.chains.clear();
        self.order.clear();
        self.generation = self.generation.wrapping_add(1);
        self.state = BucketState::Empty;
    }
}

impl<K: Ord> CommandBucket<K> {
    /// Stable-sorts the chains by ascending key. Idempotent.
    pub fn sort(&mut self) {
        self.sort_by(K::cmp);
    }
}

struct ChainIter<'a> {
    stream: &'a CommandStream,
    links: &'a [Link],
    next: Option<u32>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = DecodedCommand<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.links[self.next? as usize];
        self.next = link.next;
        Some(self.stream.record(link.location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::command::packets::{CopyUniformBufferData, Draw, DrawIndexed};
    use crate::renderer::api::command::Opcode;
    use crate::renderer::api::resource::ResourceId;
    use crate::renderer::testing::RecordingBackend;

    fn draws(backend: &RecordingBackend) -> Vec<u32> {
        backend
            .dispatched
            .iter()
            .filter_map(|d| d.read::<Draw>())
            .map(|d| d.number_of_vertices_per_instance)
            .collect()
    }

    #[test]
    fn sort_orders_chains_by_ascending_key() {
        let mut bucket = CommandBucket::new();
        for (key, vertices) in [(30u32, 3), (10, 1), (20, 2)] {
            bucket.add(key, Draw::vertices(vertices));
        }
        bucket.sort();
        assert_eq!(bucket.keys().copied().collect::<Vec<_>>(), vec![10, 20, 30]);

        let mut backend = RecordingBackend::default();
        bucket.submit(&mut backend);
        assert_eq!(draws(&backend), vec![1, 2, 3]);
    }

    #[test]
    fn equal_keys_keep_insertion_order() {
        let mut bucket = CommandBucket::new();
        bucket.add(5u8, Draw::vertices(1));
        bucket.add(1u8, Draw::vertices(2));
        bucket.add(5u8, Draw::vertices(3));
        bucket.add(5u8, Draw::vertices(4));
        bucket.sort();

        let mut backend = RecordingBackend::default();
        bucket.submit(&mut backend);
        assert_eq!(draws(&backend), vec![2, 1, 3, 4]);
    }

    #[test]
    fn sorting_twice_changes_nothing() {
        let mut bucket = CommandBucket::new();
        for (key, vertices) in [(2i64, 1), (-1, 2), (2, 3), (0, 4)] {
            bucket.add(key, Draw::vertices(vertices));
        }
        bucket.sort();
        let once: Vec<_> = bucket.keys().copied().collect();
        let mut first = RecordingBackend::default();
        bucket.submit(&mut first);

        bucket.sort();
        bucket.sort();
        assert_eq!(bucket.keys().copied().collect::<Vec<_>>(), once);
        let mut second = RecordingBackend::default();
        bucket.submit(&mut second);
        assert_eq!(draws(&first), draws(&second));
    }

    #[test]
    fn chains_replay_in_append_order() -> Result<(), CommandError> {
        let mut bucket = CommandBucket::new();
        let head = bucket.add_with_payload(
            1u32,
            CopyUniformBufferData {
                uniform_buffer: ResourceId(1),
            },
            &[1, 2, 3, 4],
        );
        let second = bucket.append(head, Draw::vertices(1))?;
        bucket.append(second, Draw::vertices(2))?;
        // Inserting after the head puts the command before the first draw.
        bucket.append(head, DrawIndexed::indices(6))?;
        bucket.add(0u32, Draw::vertices(9));
        bucket.sort();

        let mut backend = RecordingBackend::default();
        bucket.submit(&mut backend);
        assert_eq!(
            backend.opcodes(),
            vec![
                Opcode::Draw,
                Opcode::CopyUniformBufferData,
                Opcode::DrawIndexed,
                Opcode::Draw,
                Opcode::Draw,
            ]
        );
        assert_eq!(draws(&backend), vec![9, 1, 2]);
        assert_eq!(bucket.chain_count(), 2);
        assert_eq!(bucket.command_count(), 5);
        Ok(())
    }

    #[test]
    fn unsorted_submit_uses_insertion_order() {
        let mut bucket = CommandBucket::new();
        bucket.add(3u32, Draw::vertices(1));
        bucket.add(1u32, Draw::vertices(2));
        let mut backend = RecordingBackend::default();
        bucket.submit(&mut backend);
        assert_eq!(draws(&backend), vec![1, 2]);
    }

    #[test]
    fn clear_makes_handles_dangle() {
        let mut bucket = CommandBucket::new();
        let handle = bucket.add(1u32, Draw::vertices(3));
        bucket.clear();
        assert!(bucket.is_empty());
        assert_eq!(bucket.state(), BucketState::Empty);

        let err = bucket.append(handle, Draw::vertices(1));
        assert!(matches!(
            err,
            Err(CommandError::DanglingChainReference {
                generation: 0,
                current_generation: 1,
                ..
            })
        ));

        let mut backend = RecordingBackend::default();
        bucket.submit(&mut backend);
        assert!(backend.dispatched.is_empty());
    }

    #[test]
    fn handles_from_other_buckets_are_rejected() {
        let mut first = CommandBucket::new();
        let mut second = CommandBucket::new();
        let handle = first.add(1u32, Draw::vertices(3));
        second.add(1u32, Draw::vertices(3));
        assert!(matches!(
            second.append(handle, Draw::vertices(1)),
            Err(CommandError::ForeignChainReference { .. })
        ));
        assert_eq!(second.command_count(), 1);
    }

    #[test]
    fn state_follows_the_life_cycle() {
        let mut bucket = CommandBucket::new();
        assert_eq!(bucket.state(), BucketState::Empty);
        bucket.sort();
        assert_eq!(bucket.state(), BucketState::Empty);
        bucket.add(1u32, Draw::vertices(3));
        assert_eq!(bucket.state(), BucketState::Populated);
        bucket.sort();
        assert_eq!(bucket.state(), BucketState::Sorted);
        let mut backend = RecordingBackend::default();
        bucket.submit(&mut backend);
        assert_eq!(bucket.state(), BucketState::Submitted);
        bucket.submit_and_clear(&mut backend);
        assert_eq!(bucket.state(), BucketState::Empty);
    }

    #[test]
    fn custom_comparison_reverses_order() {
        let mut bucket = CommandBucket::new();
        for key in [1u32, 3, 2] {
            bucket.add(key, Draw::vertices(key));
        }
        bucket.sort_by(|a, b| b.cmp(a));
        assert_eq!(bucket.keys().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn mismatched_payload_aborts_before_any_dispatch() {
        use crate::renderer::api::command::packets::SetViewports;

        let mut bucket = CommandBucket::new();
        bucket.add(1u32, Draw::vertices(3));
        // Two viewports announced, one provided.
        bucket.add_with_payload(
            2u32,
            SetViewports {
                number_of_viewports: 2,
            },
            &[0u8; 24],
        );
        bucket.sort();

        let mut backend = RecordingBackend::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            bucket.submit(&mut backend)
        }));
        assert!(result.is_err());
        assert!(backend.dispatched.is_empty());
        assert_eq!(backend.submissions, 0);
    }
}
