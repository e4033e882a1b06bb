// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Data point group index.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Index of one group of data points on the plug.
///
/// A multi-outlet plug exposes one group per outlet. Groups are numbered
/// from 1; there is no group 0.
///
/// # Examples
///
/// ```
/// use tuya_plug_bridge::types::GroupIndex;
///
/// let idx = GroupIndex::new(2).unwrap();
/// assert_eq!(idx.value(), 2);
///
/// assert!(GroupIndex::new(0).is_err());
/// assert_eq!(" 3 ".parse::<GroupIndex>().unwrap().value(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct GroupIndex(u16);

impl GroupIndex {
    /// Creates a new group index.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidGroupIndex` if `index` is zero.
    pub fn new(index: u16) -> Result<Self, ConfigError> {
        if index == 0 {
            return Err(ConfigError::InvalidGroupIndex(index.to_string()));
        }
        Ok(Self(index))
    }

    /// Group 1, the only group of a single-outlet plug.
    #[must_use]
    pub const fn first() -> Self {
        Self(1)
    }

    /// Returns the numeric value of the index.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for GroupIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GroupIndex {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<u16>()
            .ok()
            .filter(|v| *v > 0)
            .map(Self)
            .ok_or_else(|| ConfigError::InvalidGroupIndex(trimmed.to_string()))
    }
}

impl TryFrom<u16> for GroupIndex {
    type Error = ConfigError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GroupIndex> for u16 {
    fn from(value: GroupIndex) -> Self {
        value.0
    }
}
