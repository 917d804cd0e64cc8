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

//! Defines the hierarchy of error types for the rendering subsystem.
//!
//! Resource creation failures are configuration errors and are always recoverable: the
//! caller gets an `Err` and simply skips the dependent feature. Command errors surface at
//! the boundaries where foreign data enters the command subsystem (chain handles and
//! imported byte streams).

use crate::renderer::api::resource::ResourceType;
use thiserror::Error;

/// An error related to the creation or management of a GPU resource.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// A buffer, texture or swap chain was requested with a size of zero.
    #[error("{resource_type:?} '{label}' cannot be zero-sized")]
    ZeroSized {
        /// The type of the resource being created.
        resource_type: ResourceType,
        /// The debug label of the resource, or `"unnamed"`.
        label: String,
    },
    /// The requested dimensions exceed the limits of the backend or are inconsistent.
    #[error("Invalid dimensions for {resource_type:?}: {details}")]
    InvalidDimensions {
        /// The type of the resource being created.
        resource_type: ResourceType,
        /// A human readable explanation.
        details: String,
    },
    /// The provided initial data does not match the size of the resource.
    #[error("Initial data for {resource_type:?} has {actual} bytes, expected {expected}")]
    DataSizeMismatch {
        /// The type of the resource being created.
        resource_type: ResourceType,
        /// The number of bytes the resource requires.
        expected: u64,
        /// The number of bytes that were provided.
        actual: u64,
    },
    /// A descriptor field is invalid for reasons other than size.
    #[error("Invalid {resource_type:?} descriptor: {details}")]
    InvalidDescriptor {
        /// The type of the resource being created.
        resource_type: ResourceType,
        /// A human readable explanation.
        details: String,
    },
    /// A framebuffer attachment is of the wrong type, format or size.
    #[error("Incompatible framebuffer attachment #{index}: {details}")]
    IncompatibleAttachment {
        /// The index of the attachment in the descriptor (depth-stencil is last).
        index: usize,
        /// A human readable explanation.
        details: String,
    },
    /// A write touched bytes outside of the resource.
    #[error("Write of {size} bytes at offset {offset} is out of bounds for a resource of {capacity} bytes")]
    OutOfBounds {
        /// The byte offset of the write.
        offset: u64,
        /// The number of bytes written.
        size: u64,
        /// The total size of the resource.
        capacity: u64,
    },
    /// The backend does not support a feature required by the request.
    #[error("Backend '{backend}' does not support {feature}")]
    Unsupported {
        /// The name of the backend.
        backend: String,
        /// The missing feature.
        feature: String,
    },
    /// The backend has no record of the given resource id.
    #[error("Unknown resource id {0}")]
    UnknownResource(u64),
    /// A backend-specific failure.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// An error raised by the command subsystem.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// A chain handle does not refer to a live command of this bucket, typically because
    /// the bucket was cleared after the handle was issued.
    #[error("Dangling chain reference: command #{link} of generation {generation} is not live (current generation {current_generation})")]
    DanglingChainReference {
        /// The link index stored in the handle.
        link: u32,
        /// The generation stored in the handle.
        generation: u32,
        /// The bucket's current generation.
        current_generation: u32,
    },
    /// A chain handle was issued by a different command bucket.
    #[error("Foreign chain reference: handle belongs to bucket #{handle_bucket}, not #{bucket}")]
    ForeignChainReference {
        /// The bucket that issued the handle.
        handle_bucket: u32,
        /// The bucket the handle was passed to.
        bucket: u32,
    },
    /// The byte stream ends in the middle of a record.
    #[error("Command stream truncated at byte {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        /// Byte offset of the record.
        offset: usize,
        /// Bytes required by the record.
        needed: usize,
        /// Bytes left in the stream.
        available: usize,
    },
    /// A record carries an opcode that is not part of the command set.
    #[error("Unknown opcode {opcode:#06x} at byte {offset}")]
    UnknownOpcode {
        /// Byte offset of the record.
        offset: usize,
        /// The raw opcode value.
        opcode: u16,
    },
    /// A record's fixed part does not have the size of its command type.
    #[error("{command} at byte {offset} declares {actual} fixed bytes, expected {expected}")]
    FixedSizeMismatch {
        /// Byte offset of the record.
        offset: usize,
        /// The command name.
        command: &'static str,
        /// Size of the command type.
        expected: u32,
        /// Size declared by the record.
        actual: u32,
    },
    /// A record's auxiliary payload is inconsistent with its fixed arguments.
    #[error("{command} at byte {offset} has an invalid payload: {details}")]
    InvalidPayload {
        /// Byte offset of the record.
        offset: usize,
        /// The command name.
        command: &'static str,
        /// A human readable explanation.
        details: String,
    },
}

/// A high-level error that can occur within the rendering system.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The requested backend exists but is not compiled into this build.
    #[error("Backend '{0}' is not available in this build")]
    BackendUnavailable(String),
    /// The backend name does not match any known backend.
    #[error("Unknown backend name '{0}'")]
    UnknownBackend(String),
    /// The render settings could not be parsed or are inconsistent.
    #[error("Invalid render settings: {0}")]
    InvalidSettings(String),
    /// The backend failed to initialize.
    #[error("Backend initialization failed: {0}")]
    InitializationFailed(String),
    /// A resource-related error.
    #[error(transparent)]
    Resource(#[from] ResourceError),
    /// A command-related error.
    #[error(transparent)]
    Command(#[from] CommandError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_error_messages_name_the_resource() {
        let err = ResourceError::ZeroSized {
            resource_type: ResourceType::VertexBuffer,
            label: "quad".to_string(),
        };
        assert_eq!(err.to_string(), "VertexBuffer 'quad' cannot be zero-sized");

        let err = ResourceError::Unsupported {
            backend: "Null".to_string(),
            feature: "32-bit indices".to_string(),
        };
        assert_eq!(err.to_string(), "Backend 'Null' does not support 32-bit indices");
    }

    #[test]
    fn render_error_wraps_lower_level_errors() {
        let err: RenderError = CommandError::ForeignChainReference {
            handle_bucket: 1,
            bucket: 2,
        }
        .into();
        assert!(matches!(err, RenderError::Command(_)));
        assert_eq!(
            err.to_string(),
            "Foreign chain reference: handle belongs to bucket #1, not #2"
        );
    }

    #[test]
    fn unknown_opcode_is_printed_in_hex() {
        let err = CommandError::UnknownOpcode {
            offset: 32,
            opcode: 0xbeef,
        };
        assert_eq!(err.to_string(), "Unknown opcode 0xbeef at byte 32");
    }
}
