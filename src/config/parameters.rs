// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host parameter map.

use std::collections::HashMap;

use serde::Deserialize;

use super::{DebugMask, DeviceCredentials, FieldKeyMap, PluginConfig};
use crate::error::ConfigError;
use crate::mapping::parse_group_list;

/// Raw startup parameters as the host stores them.
///
/// The host keeps plugin settings in generic slots; this struct names them.
///
/// # Examples
///
/// ```
/// use tuya_plug_bridge::config::{HostParameters, PluginConfig};
///
/// let params: HostParameters = serde_json::from_str(r#"{
///     "Address": "192.168.1.40",
///     "Mode1": "bf0123456789abcdefgh",
///     "Mode2": "0123456789abcdef",
///     "Mode3": "1;2",
///     "Mode4": "1;4;5;6",
///     "Mode5": "2"
/// }"#).unwrap();
///
/// let config = PluginConfig::try_from(params).unwrap();
/// assert_eq!(config.groups().len(), 2);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostParameters {
    /// IP address of the plug.
    #[serde(rename = "Address", default)]
    pub address: Option<String>,

    /// Device identifier.
    #[serde(rename = "Mode1", default)]
    pub device_id: Option<String>,

    /// Local key.
    #[serde(rename = "Mode2", default)]
    pub local_key: Option<String>,

    /// `;`-separated group list.
    #[serde(rename = "Mode3", default)]
    pub groups: Option<String>,

    /// `;`-separated field keys: status, current, energy, voltage.
    #[serde(rename = "Mode4", default)]
    pub field_keys: Option<String>,

    /// Debug mask.
    #[serde(rename = "Mode5", default)]
    pub debug: Option<String>,
}

impl HostParameters {
    /// Parameter name of the address.
    pub const ADDRESS: &'static str = "Address";
    /// Parameter name of the device identifier.
    pub const DEVICE_ID: &'static str = "Mode1";
    /// Parameter name of the local key.
    pub const LOCAL_KEY: &'static str = "Mode2";
    /// Parameter name of the group list.
    pub const GROUPS: &'static str = "Mode3";
    /// Parameter name of the field key list.
    pub const FIELD_KEYS: &'static str = "Mode4";
    /// Parameter name of the debug mask.
    pub const DEBUG: &'static str = "Mode5";

    /// Reads the parameters out of a host key/value map.
    #[must_use]
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |name: &str| map.get(name).cloned();
        Self {
            address: get(Self::ADDRESS),
            device_id: get(Self::DEVICE_ID),
            local_key: get(Self::LOCAL_KEY),
            groups: get(Self::GROUPS),
            field_keys: get(Self::FIELD_KEYS),
            debug: get(Self::DEBUG),
        }
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingParameter(name))
}

impl TryFrom<HostParameters> for PluginConfig {
    type Error = ConfigError;

    fn try_from(params: HostParameters) -> Result<Self, Self::Error> {
        let credentials = DeviceCredentials::new(
            required(params.address, HostParameters::ADDRESS)?,
            required(params.device_id, HostParameters::DEVICE_ID)?,
            required(params.local_key, HostParameters::LOCAL_KEY)?,
        );
        let groups = parse_group_list(&required(params.groups, HostParameters::GROUPS)?)?;
        let field_keys: FieldKeyMap =
            required(params.field_keys, HostParameters::FIELD_KEYS)?.parse()?;
        let debug: DebugMask = params.debug.as_deref().unwrap_or_default().parse()?;

        let config = Self::new(credentials)
            .with_groups(groups)
            .with_field_keys(field_keys)
            .with_debug(debug);
        config.validate()?;
        Ok(config)
    }
}

impl PluginConfig {
    /// Builds a configuration from the host's parameter map.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a required parameter is missing or malformed.
    pub fn from_parameters(map: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::try_from(HostParameters::from_map(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, GroupIndex};

    fn parameters() -> HashMap<String, String> {
        [
            ("Address", "192.168.1.40"),
            ("Mode1", "bf0123456789abcdefgh"),
            ("Mode2", "0123456789abcdef"),
            ("Mode3", "2;1"),
            ("Mode4", "1;18;17;20"),
            ("Mode5", "0"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn from_parameters_complete() {
        let config = PluginConfig::from_parameters(&parameters()).unwrap();
        assert_eq!(config.credentials().address(), "192.168.1.40");
        assert_eq!(config.credentials().device_id(), "bf0123456789abcdefgh");
        assert_eq!(config.credentials().local_key(), "0123456789abcdef");
        assert_eq!(
            config.groups(),
            &[GroupIndex::new(1).unwrap(), GroupIndex::new(2).unwrap()]
        );
        assert_eq!(config.field_keys().key(Field::Voltage), "20");
        assert_eq!(config.debug(), DebugMask::NONE);
    }

    #[test]
    fn debug_defaults_to_none() {
        let mut map = parameters();
        map.remove("Mode5");
        let config = PluginConfig::from_parameters(&map).unwrap();
        assert!(config.debug().is_none());
    }

    #[test]
    fn missing_address() {
        let mut map = parameters();
        map.remove("Address");
        assert_eq!(
            PluginConfig::from_parameters(&map).unwrap_err(),
            ConfigError::MissingParameter("Address")
        );
    }

    #[test]
    fn blank_local_key() {
        let mut map = parameters();
        map.insert("Mode2".to_string(), "  ".to_string());
        assert_eq!(
            PluginConfig::from_parameters(&map).unwrap_err(),
            ConfigError::MissingParameter("Mode2")
        );
    }

    #[test]
    fn bad_group_list() {
        let mut map = parameters();
        map.insert("Mode3".to_string(), "1;two".to_string());
        assert_eq!(
            PluginConfig::from_parameters(&map).unwrap_err(),
            ConfigError::InvalidGroupIndex("two".to_string())
        );
    }

    #[test]
    fn bad_debug_mask() {
        let mut map = parameters();
        map.insert("Mode5".to_string(), "full".to_string());
        assert!(matches!(
            PluginConfig::from_parameters(&map),
            Err(ConfigError::InvalidDebugMask(_))
        ));
    }

    #[test]
    fn deserialize_from_json() {
        let params: HostParameters = serde_json::from_value(serde_json::json!({
            "Address": "10.0.0.7",
            "Mode1": "dev",
            "Mode2": "key",
            "Mode3": "1",
            "Mode4": "1;4;5;6"
        }))
        .unwrap();
        assert!(params.debug.is_none());
        assert!(PluginConfig::try_from(params).is_ok());
    }
}
