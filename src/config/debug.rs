// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host debug verbosity mask.

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use tracing::level_filters::LevelFilter;

use crate::error::ConfigError;

/// Debug verbosity bitmask as configured on the host.
///
/// Flags can be combined. The library itself never installs a `tracing`
/// subscriber; the host shim reads [`DebugMask::level_filter`] to decide how
/// much to record.
///
/// # Examples
///
/// ```
/// use tuya_plug_bridge::config::DebugMask;
/// use tracing::level_filters::LevelFilter;
///
/// let mask: DebugMask = "10".parse().unwrap();
/// assert!(mask.contains(DebugMask::PLUGIN));
/// assert!(mask.contains(DebugMask::DEVICES));
/// assert_eq!(mask.level_filter(), LevelFilter::DEBUG);
///
/// assert_eq!(DebugMask::NONE.level_filter(), LevelFilter::INFO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DebugMask(u8);

impl DebugMask {
    /// All debugging disabled.
    pub const NONE: Self = Self(0);
    /// Everything, very verbose.
    pub const ALL: Self = Self(1);
    /// Plugin debug messages only.
    pub const PLUGIN: Self = Self(2);
    /// High level framework messages.
    pub const FRAMEWORK: Self = Self(4);
    /// Host device object messages.
    pub const DEVICES: Self = Self(8);
    /// Connection messages.
    pub const CONNECTIONS: Self = Self(16);
    /// Image messages.
    pub const IMAGES: Self = Self(32);
    /// Dumps of inbound and outbound data.
    pub const IO: Self = Self(64);
    /// Message queue messages.
    pub const MESSAGE_QUEUE: Self = Self(128);

    /// Creates a mask from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Returns `true` if every bit of `flag` is set.
    #[must_use]
    pub const fn contains(&self, flag: Self) -> bool {
        flag.0 != 0 && self.0 & flag.0 == flag.0
    }

    /// Returns `true` if no flag is set.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }

    /// Maps the mask to the most verbose `tracing` level it enables.
    #[must_use]
    pub fn level_filter(&self) -> LevelFilter {
        if self.is_none() {
            LevelFilter::INFO
        } else if self.contains(Self::ALL) || self.contains(Self::IO) {
            LevelFilter::TRACE
        } else {
            LevelFilter::DEBUG
        }
    }
}

impl BitOr for DebugMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for DebugMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DebugMask {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::NONE);
        }
        trimmed
            .parse::<u8>()
            .map(Self)
            .map_err(|_| ConfigError::InvalidDebugMask(trimmed.to_string()))
    }
}
