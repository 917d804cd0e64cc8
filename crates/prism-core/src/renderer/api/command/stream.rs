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

//! Paged storage of encoded commands.
//!
//! A record is a [`PacketHeader`], the fixed arguments of the command and its auxiliary
//! payload, each part padded to 8 bytes:
//!
//! ```text
//! +----------------+------------------+------------------+
//! | header (16 B)  | fixed (padded 8) | payload (pad. 8) |
//! +----------------+------------------+------------------+
//! ```
//!
//! Records live in fixed-size pages of `u64` words. A page is never reallocated, so bytes
//! written once stay where they are until the stream is cleared. A record larger than a
//! page gets a page of its own. Clearing keeps the pages for reuse.

use super::opcode::{self, Opcode};
use super::packets::Command;
use crate::renderer::api::core::{CommandSettings, MIN_COMMAND_PAGE_SIZE};
use crate::renderer::error::CommandError;
use crate::renderer::traits::CommandBackend;
use bytemuck::{Pod, Zeroable};
use std::fmt;

/// Size in bytes of a [`PacketHeader`].
pub const HEADER_SIZE: usize = std::mem::size_of::<PacketHeader>();

/// The header in front of every encoded command.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct PacketHeader {
    /// The raw [`Opcode`].
    pub opcode: u16,
    /// Reserved, always zero.
    pub flags: u16,
    /// The unpadded size of the fixed arguments.
    pub fixed_size: u32,
    /// The unpadded size of the auxiliary payload.
    pub payload_size: u32,
    /// The total padded size of the record, header included.
    pub record_size: u32,
}

impl PacketHeader {
    fn new(opcode: Opcode, fixed_size: usize, payload_size: usize) -> Self {
        Self {
            opcode: opcode as u16,
            flags: 0,
            fixed_size: fixed_size as u32,
            payload_size: payload_size as u32,
            record_size: record_size(fixed_size, payload_size) as u32,
        }
    }
}

/// Rounds `size` up to the record alignment.
pub(crate) const fn padded(size: usize) -> usize {
    (size + 7) & !7
}

/// The padded size of a record.
pub(crate) const fn record_size(fixed_size: usize, payload_size: usize) -> usize {
    HEADER_SIZE + padded(fixed_size) + padded(payload_size)
}

/// Aborts on an internal inconsistency of a command stream.
///
/// Submissions verify the whole stream before dispatching, so this fires before the
/// backend has seen any command of the submission.
#[cold]
#[track_caller]
pub(crate) fn corrupt_stream(details: fmt::Arguments<'_>) -> ! {
    panic!("corrupt command stream: {details}")
}

/// The two-phase construction slot returned when a command is appended.
///
/// The fixed arguments are already written and may still be adjusted through `command`;
/// `payload` is the zero-initialized auxiliary region of the size requested at append.
#[derive(Debug)]
pub struct CommandSlot<'a, T> {
    /// The fixed arguments, in place.
    pub command: &'a mut T,
    /// The auxiliary payload region.
    pub payload: &'a mut [u8],
}

/// A command as stored in a stream, decoded up to its opcode.
#[derive(Debug, Clone, Copy)]
pub struct DecodedCommand<'a> {
    /// The command type.
    pub opcode: Opcode,
    /// The raw fixed arguments.
    pub fixed: &'a [u8],
    /// The auxiliary payload.
    pub payload: &'a [u8],
}

impl DecodedCommand<'_> {
    /// Returns the fixed arguments if the command is a `T`.
    pub fn read<T: Command>(&self) -> Option<T> {
        (self.opcode == T::OPCODE).then(|| bytemuck::pod_read_unaligned(self.fixed))
    }

    /// Hands the command to the backend.
    pub fn dispatch<B: CommandBackend + ?Sized>(&self, backend: &mut B) {
        opcode::dispatch_record(self.opcode, self.fixed, self.payload, backend);
    }
}

/// The position of a record in a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RecordLocation {
    page: u32,
    offset: u32,
}

struct Page {
    words: Box<[u64]>,
    used: usize,
}

impl Page {
    fn new(capacity: usize) -> Self {
        Self {
            words: vec![0u64; capacity / 8].into_boxed_slice(),
            used: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.words.len() * 8
    }

    fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.words)
    }
}

/// Paged, append-only storage of encoded commands.
pub(crate) struct CommandStream {
    pages: Vec<Page>,
    current: usize,
    page_size: usize,
    len: usize,
}

impl CommandStream {
    pub(crate) fn new(settings: &CommandSettings) -> Self {
        Self {
            pages: Vec::new(),
            current: 0,
            page_size: padded(settings.page_size.max(MIN_COMMAND_PAGE_SIZE)),
            len: 0,
        }
    }

    /// The number of records.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// The number of allocated pages, used or not.
    pub(crate) fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Forgets every record. Pages are kept.
    pub(crate) fn clear(&mut self) {
        for page in &mut self.pages {
            page.used = 0;
        }
        self.current = 0;
        self.len = 0;
    }

    /// Reserves `size` bytes, moving to the next page (or a new one) when the current
    /// page is full.
    fn reserve(&mut self, size: usize) -> RecordLocation {
        if self.pages.is_empty() {
            self.pages.push(Page::new(self.page_size.max(size)));
            self.current = 0;
        }
        loop {
            let page = &mut self.pages[self.current];
            if page.capacity() - page.used >= size {
                let location = RecordLocation {
                    page: self.current as u32,
                    offset: page.used as u32,
                };
                page.used += size;
                return location;
            }
            // Pages after the current one are empty.
            let next = self.current + 1;
            if next >= self.pages.len() || self.pages[next].capacity() < size {
                if size > self.page_size {
                    log::trace!("Allocating a dedicated {size}-byte command page");
                }
                self.pages.insert(next, Page::new(self.page_size.max(size)));
            }
            self.current = next;
        }
    }

    /// Writes a record and returns its location and its fixed and payload regions.
    fn write_record(
        &mut self,
        header: PacketHeader,
        fixed: &[u8],
    ) -> (RecordLocation, &mut [u8], &mut [u8]) {
        let fixed_size = header.fixed_size as usize;
        let payload_size = header.payload_size as usize;
        let size = header.record_size as usize;
        let location = self.reserve(size);
        self.len += 1;

        let offset = location.offset as usize;
        let record = &mut self.pages[location.page as usize].bytes_mut()[offset..offset + size];
        record.fill(0);
        let (head, body) = record.split_at_mut(HEADER_SIZE);
        head.copy_from_slice(bytemuck::bytes_of(&header));
        let (fixed_region, payload_region) = body.split_at_mut(padded(fixed_size));
        fixed_region[..fixed_size].copy_from_slice(fixed);
        (
            location,
            &mut fixed_region[..fixed_size],
            &mut payload_region[..payload_size],
        )
    }

    /// Encodes `command` followed by a zeroed payload of `payload_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `payload_size` does not fit the 32-bit record header.
    pub(crate) fn append<T: Command>(
        &mut self,
        command: T,
        payload_size: usize,
    ) -> (RecordLocation, CommandSlot<'_, T>) {
        assert!(
            payload_size <= super::MAX_PAYLOAD_SIZE,
            "{} payload of {payload_size} bytes exceeds the maximum of {}",
            T::OPCODE.name(),
            super::MAX_PAYLOAD_SIZE
        );
        let header = PacketHeader::new(T::OPCODE, std::mem::size_of::<T>(), payload_size);
        let (location, fixed, payload) = self.write_record(header, bytemuck::bytes_of(&command));
        let command = bytemuck::from_bytes_mut::<T>(fixed);
        (location, CommandSlot { command, payload })
    }

    /// Reads the record at `location`, checking its header.
    pub(crate) fn record(&self, location: RecordLocation) -> DecodedCommand<'_> {
        let page = self
            .pages
            .get(location.page as usize)
            .unwrap_or_else(|| corrupt_stream(format_args!("no page {}", location.page)));
        decode_at(&page.bytes()[..page.used], location.offset as usize)
            .map(|(command, _)| command)
            .unwrap_or_else(|e| corrupt_stream(format_args!("{e}")))
    }

    /// Walks every record and checks each payload against its fixed arguments,
    /// aborting on the first bad one.
    ///
    /// Payloads are written by the caller through [`CommandSlot`], so this is the first
    /// point where a mismatched count or a non UTF-8 name can be seen.
    pub(crate) fn verify(&self) {
        let mut walked = 0;
        for command in self.iter() {
            if let Err(details) =
                opcode::validate_payload(command.opcode, command.fixed, command.payload)
            {
                corrupt_stream(format_args!(
                    "record #{walked} ({}) has an invalid payload: {details}",
                    command.opcode.name()
                ));
            }
            walked += 1;
        }
        if walked != self.len {
            corrupt_stream(format_args!("walked {walked} records, expected {}", self.len));
        }
    }

    /// Walks every record in append order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = DecodedCommand<'_>> {
        self.pages.iter().flat_map(|page| RecordIter {
            bytes: &page.bytes()[..page.used],
            offset: 0,
        })
    }

    /// Copies every record into one flat byte vector.
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let total = self.pages.iter().map(|page| page.used).sum();
        let mut bytes = Vec::with_capacity(total);
        for page in &self.pages {
            bytes.extend_from_slice(&page.bytes()[..page.used]);
        }
        bytes
    }

    /// Decodes a flat byte vector produced by [`CommandStream::to_bytes`], validating every
    /// record, and appends the records to this stream.
    pub(crate) fn extend_from_bytes(&mut self, bytes: &[u8]) -> Result<usize, CommandError> {
        // Validate everything first so a bad stream leaves `self` untouched.
        let mut offset = 0;
        let mut count = 0;
        while offset < bytes.len() {
            let (command, size) = decode_at(bytes, offset)?;
            opcode::validate_payload(command.opcode, command.fixed, command.payload).map_err(
                |details| CommandError::InvalidPayload {
                    offset,
                    command: command.opcode.name(),
                    details,
                },
            )?;
            offset += size;
            count += 1;
        }

        let mut offset = 0;
        while offset < bytes.len() {
            let (command, size) = decode_at(bytes, offset)?;
            let header = PacketHeader::new(command.opcode, command.fixed.len(), command.payload.len());
            let (_, _, payload) = self.write_record(header, command.fixed);
            payload.copy_from_slice(command.payload);
            offset += size;
        }
        Ok(count)
    }
}

impl fmt::Debug for CommandStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandStream")
            .field("len", &self.len)
            .field("pages", &self.pages.len())
            .field("page_size", &self.page_size)
            .finish()
    }
}

struct RecordIter<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = DecodedCommand<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.bytes.len() {
            return None;
        }
        match decode_at(self.bytes, self.offset) {
            Ok((command, size)) => {
                self.offset += size;
                Some(command)
            }
            Err(e) => corrupt_stream(format_args!("{e}")),
        }
    }
}

/// Decodes the record starting at `offset`, returning it with its padded size.
fn decode_at(bytes: &[u8], offset: usize) -> Result<(DecodedCommand<'_>, usize), CommandError> {
    let available = bytes.len().saturating_sub(offset);
    if available < HEADER_SIZE {
        return Err(CommandError::Truncated {
            offset,
            needed: HEADER_SIZE,
            available,
        });
    }
    let header: PacketHeader = bytemuck::pod_read_unaligned(&bytes[offset..offset + HEADER_SIZE]);
    let opcode = Opcode::from_raw(header.opcode).ok_or(CommandError::UnknownOpcode {
        offset,
        opcode: header.opcode,
    })?;
    let fixed_size = header.fixed_size as usize;
    if fixed_size != opcode.fixed_size() {
        return Err(CommandError::FixedSizeMismatch {
            offset,
            command: opcode.name(),
            expected: opcode.fixed_size() as u32,
            actual: header.fixed_size,
        });
    }
    let payload_size = header.payload_size as usize;
    let size = record_size(fixed_size, payload_size);
    if header.record_size as usize != size {
        return Err(CommandError::InvalidPayload {
            offset,
            command: opcode.name(),
            details: format!(
                "record size {} does not match the {} bytes its parts need",
                header.record_size, size
            ),
        });
    }
    if available < size {
        return Err(CommandError::Truncated {
            offset,
            needed: size,
            available,
        });
    }
    let fixed_start = offset + HEADER_SIZE;
    let payload_start = fixed_start + padded(fixed_size);
    Ok((
        DecodedCommand {
            opcode,
            fixed: &bytes[fixed_start..fixed_start + fixed_size],
            payload: &bytes[payload_start..payload_start + payload_size],
        },
        size,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::command::packets::{CopyUniformBufferData, Draw, SetVertexArray};
    use crate::renderer::api::resource::ResourceId;

    fn small_stream() -> CommandStream {
        CommandStream::new(&CommandSettings {
            page_size: 64,
            debug_markers: true,
        })
    }

    #[test]
    fn records_are_padded_to_eight_bytes() {
        assert_eq!(record_size(4, 0), 24);
        assert_eq!(record_size(8, 8), 32);
        assert_eq!(record_size(20, 3), 16 + 24 + 8);
    }

    #[test]
    fn records_spill_into_new_pages_in_order() {
        let mut stream = small_stream();
        for i in 0..10 {
            stream.append(Draw::vertices(i), 0);
        }
        // 32-byte records, two per 64-byte page.
        assert_eq!(stream.page_count(), 5);
        let counts: Vec<u32> = stream
            .iter()
            .filter_map(|c| c.read::<Draw>())
            .map(|d| d.number_of_vertices_per_instance)
            .collect();
        assert_eq!(counts, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn oversized_records_get_a_dedicated_page() {
        let mut stream = small_stream();
        stream.append(Draw::vertices(1), 0);
        let (_, slot) = stream.append(
            CopyUniformBufferData {
                uniform_buffer: ResourceId(9),
            },
            200,
        );
        slot.payload.fill(0xab);
        stream.append(Draw::vertices(2), 0);

        let commands: Vec<_> = stream.iter().collect();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[1].payload.len(), 200);
        assert!(commands[1].payload.iter().all(|b| *b == 0xab));
        assert_eq!(commands[2].read::<Draw>(), Some(Draw::vertices(2)));
    }

    #[test]
    fn clear_keeps_pages() {
        let mut stream = small_stream();
        for _ in 0..6 {
            stream.append(SetVertexArray { vertex_array: ResourceId(1) }, 0);
        }
        let pages = stream.page_count();
        stream.clear();
        assert_eq!(stream.len(), 0);
        assert_eq!(stream.iter().count(), 0);
        assert_eq!(stream.page_count(), pages);
        stream.append(Draw::vertices(3), 0);
        assert_eq!(stream.page_count(), pages);
    }

    #[test]
    fn slot_edits_are_visible_to_readers() {
        let mut stream = small_stream();
        let (location, slot) = stream.append(Draw::vertices(0), 0);
        slot.command.number_of_instances = 7;
        assert_eq!(
            stream.record(location).read::<Draw>().map(|d| d.number_of_instances),
            Some(7)
        );
    }

    #[test]
    fn decoding_rejects_garbage() {
        let mut stream = small_stream();
        stream.append(Draw::vertices(3), 0);
        let mut bytes = stream.to_bytes();

        let mut other = small_stream();
        assert!(matches!(
            other.extend_from_bytes(&bytes[..20]),
            Err(CommandError::Truncated { offset: 0, .. })
        ));
        bytes[0] = 0xee;
        assert!(matches!(
            other.extend_from_bytes(&bytes),
            Err(CommandError::UnknownOpcode { opcode: 0x00ee, .. })
        ));
        assert_eq!(other.len(), 0);
    }
}
