// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the bridge.
//!
//! Every host callback fails independently: errors are logged where they are
//! detected and returned to the caller, never retried and never fatal to the
//! process.

use thiserror::Error;

use crate::types::{Field, GroupIndex};

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Startup parameters are missing or malformed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The host sent a command other than `On` or `Off`.
    #[error("unsupported command: {0}")]
    UnsupportedCommand(String),

    /// The status payload lacks a configured key for a group.
    #[error("group {group}: missing {field} key \"{key}\" in status payload")]
    FieldMissing {
        /// Group whose payload was incomplete.
        group: GroupIndex,
        /// Semantic field that was looked up.
        field: Field,
        /// Raw data point key that was absent.
        key: String,
    },

    /// A data point value has the wrong shape for its field.
    #[error("group {group}: {field} value {value} is not usable")]
    InvalidValue {
        /// Group whose payload was malformed.
        group: GroupIndex,
        /// Semantic field that was looked up.
        field: Field,
        /// The offending raw value.
        value: String,
    },

    /// Error surfaced unchanged from the device client.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The host referenced a unit that does not belong to a configured group.
    #[error("unknown sensor unit {0}")]
    UnknownSensor(u32),

    /// The device reported a group that is not configured.
    #[error("group {0} is not configured")]
    UnknownGroup(GroupIndex),

    /// The host device registry rejected an operation.
    #[error("host registry error: {0}")]
    Host(String),

    /// A callback arrived before start or after stop.
    #[error("plugin is not started")]
    NotStarted,

    /// The plugin worker has shut down.
    #[error("plugin worker is closed")]
    WorkerClosed,
}

/// Errors raised while validating startup parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required host parameter was not provided.
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    /// A group list entry is not a positive integer.
    #[error("invalid group index: \"{0}\"")]
    InvalidGroupIndex(String),

    /// The group list is empty.
    #[error("no group index configured")]
    NoGroups,

    /// The field key list does not have one key per field.
    #[error("expected {expected} field keys, got {actual}")]
    FieldKeyCount {
        /// Number of keys required.
        expected: usize,
        /// Number of keys provided.
        actual: usize,
    },

    /// A field key is blank.
    #[error("empty key for field {0}")]
    EmptyFieldKey(Field),

    /// The debug mask is not a valid combination of flags.
    #[error("invalid debug mask: \"{0}\"")]
    InvalidDebugMask(String),

    /// The heartbeat divider must be at least one.
    #[error("heartbeat divider must be at least 1")]
    ZeroHeartbeatDivider,
}

/// Errors reported by the device-protocol client.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The local key was refused by the device.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The device answer could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The device refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
