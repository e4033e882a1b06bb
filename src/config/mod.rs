// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Startup configuration.
//!
//! A [`PluginConfig`] is either built programmatically or converted from the
//! host's flat parameter map ([`HostParameters`]). It is validated once at
//! start and immutable afterwards.
//!
//! # Examples
//!
//! ```
//! use tuya_plug_bridge::config::{DebugMask, DeviceCredentials, FieldKeyMap, PluginConfig};
//! use tuya_plug_bridge::mapping::parse_group_list;
//!
//! let config = PluginConfig::new(DeviceCredentials::new(
//!     "192.168.1.40",
//!     "bf0123456789abcdefgh",
//!     "0123456789abcdef",
//! ))
//! .with_groups(parse_group_list("1;2").unwrap())
//! .with_field_keys("1;4;5;6".parse::<FieldKeyMap>().unwrap())
//! .with_debug(DebugMask::PLUGIN);
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.groups().len(), 2);
//! ```

mod debug;
mod parameters;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub use debug::DebugMask;
pub use parameters::HostParameters;

use crate::error::ConfigError;
use crate::types::{Field, GroupIndex};

/// Connection parameters of the physical plug.
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceCredentials {
    address: String,
    device_id: String,
    local_key: String,
}

impl DeviceCredentials {
    /// Creates credentials for the plug at `address`.
    #[must_use]
    pub fn new(
        address: impl Into<String>,
        device_id: impl Into<String>,
        local_key: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            device_id: device_id.into(),
            local_key: local_key.into(),
        }
    }

    /// Returns the IP address or hostname.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the device identifier.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Returns the shared local key.
    #[must_use]
    pub fn local_key(&self) -> &str {
        &self.local_key
    }
}

// Keeps the local key out of logs.
impl fmt::Debug for DeviceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceCredentials")
            .field("address", &self.address)
            .field("device_id", &self.device_id)
            .field("local_key", &"<redacted>")
            .finish()
    }
}

/// Raw data point keys of each semantic field.
///
/// Parsed from `status;current;energy;voltage`.
///
/// # Examples
///
/// ```
/// use tuya_plug_bridge::config::FieldKeyMap;
/// use tuya_plug_bridge::types::Field;
///
/// let keys: FieldKeyMap = "1;18;17;20".parse().unwrap();
/// assert_eq!(keys.key(Field::Current), "18");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldKeyMap {
    status: String,
    current: String,
    energy: String,
    voltage: String,
}

impl FieldKeyMap {
    /// Creates a key map from explicit keys.
    #[must_use]
    pub fn new(
        status: impl Into<String>,
        current: impl Into<String>,
        energy: impl Into<String>,
        voltage: impl Into<String>,
    ) -> Self {
        Self {
            status: status.into(),
            current: current.into(),
            energy: energy.into(),
            voltage: voltage.into(),
        }
    }

    /// Returns the raw key of `field`.
    #[must_use]
    pub fn key(&self, field: Field) -> &str {
        match field {
            Field::Status => &self.status,
            Field::Current => &self.current,
            Field::Energy => &self.energy,
            Field::Voltage => &self.voltage,
        }
    }

    /// Checks that no key is blank.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyFieldKey` naming the first blank field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match Field::ALL.into_iter().find(|f| self.key(*f).is_empty()) {
            Some(field) => Err(ConfigError::EmptyFieldKey(field)),
            None => Ok(()),
        }
    }
}

impl Default for FieldKeyMap {
    fn default() -> Self {
        Self::new("1", "4", "5", "6")
    }
}

impl FromStr for FieldKeyMap {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let keys: Vec<&str> = s.split(';').map(str::trim).collect();
        let [status, current, energy, voltage] = keys.as_slice() else {
            return Err(ConfigError::FieldKeyCount {
                expected: Field::ALL.len(),
                actual: keys.len(),
            });
        };
        let map = Self::new(*status, *current, *energy, *voltage);
        map.validate()?;
        Ok(map)
    }
}

/// Complete startup configuration of the bridge.
#[derive(Debug, Clone)]
pub struct PluginConfig {
    credentials: DeviceCredentials,
    groups: Vec<GroupIndex>,
    field_keys: FieldKeyMap,
    debug: DebugMask,
    heartbeat_divider: u32,
}

impl PluginConfig {
    /// Heartbeats between two status polls.
    pub const DEFAULT_HEARTBEAT_DIVIDER: u32 = 2;

    /// Creates a configuration with a single group and the default keys.
    #[must_use]
    pub fn new(credentials: DeviceCredentials) -> Self {
        Self {
            credentials,
            groups: vec![GroupIndex::first()],
            field_keys: FieldKeyMap::default(),
            debug: DebugMask::NONE,
            heartbeat_divider: Self::DEFAULT_HEARTBEAT_DIVIDER,
        }
    }

    /// Sets the configured groups. Duplicates are dropped.
    #[must_use]
    pub fn with_groups(mut self, groups: impl IntoIterator<Item = GroupIndex>) -> Self {
        self.groups = groups
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        self
    }

    /// Sets the field key map.
    #[must_use]
    pub fn with_field_keys(mut self, field_keys: FieldKeyMap) -> Self {
        self.field_keys = field_keys;
        self
    }

    /// Sets the debug mask.
    #[must_use]
    pub fn with_debug(mut self, debug: DebugMask) -> Self {
        self.debug = debug;
        self
    }

    /// Sets how many heartbeats elapse between status polls.
    #[must_use]
    pub fn with_heartbeat_divider(mut self, divider: u32) -> Self {
        self.heartbeat_divider = divider;
        self
    }

    /// Returns the device credentials.
    #[must_use]
    pub fn credentials(&self) -> &DeviceCredentials {
        &self.credentials
    }

    /// Returns the configured groups, ascending.
    #[must_use]
    pub fn groups(&self) -> &[GroupIndex] {
        &self.groups
    }

    /// Returns the field key map.
    #[must_use]
    pub fn field_keys(&self) -> &FieldKeyMap {
        &self.field_keys
    }

    /// Returns the debug mask.
    #[must_use]
    pub fn debug(&self) -> DebugMask {
        self.debug
    }

    /// Returns the heartbeat divider.
    #[must_use]
    pub fn heartbeat_divider(&self) -> u32 {
        self.heartbeat_divider
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.credentials.address.is_empty() {
            return Err(ConfigError::MissingParameter(HostParameters::ADDRESS));
        }
        if self.credentials.device_id.is_empty() {
            return Err(ConfigError::MissingParameter(HostParameters::DEVICE_ID));
        }
        if self.credentials.local_key.is_empty() {
            return Err(ConfigError::MissingParameter(HostParameters::LOCAL_KEY));
        }
        if self.groups.is_empty() {
            return Err(ConfigError::NoGroups);
        }
        self.field_keys.validate()?;
        if self.heartbeat_divider == 0 {
            return Err(ConfigError::ZeroHeartbeatDivider);
        }
        Ok(())
    }
}
