// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device status payload parsing.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::types::GroupIndex;

/// Data point values of one group, keyed by raw data point number.
pub type DpsMap = HashMap<String, DpsValue>;

/// A single data point value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DpsValue {
    /// Boolean data point (switches).
    Bool(bool),
    /// Integer data point (most measurements).
    Integer(i64),
    /// Floating point data point.
    Float(f64),
    /// Text data point (enums, countdowns on some firmwares).
    Text(String),
    /// Anything else: `null`, lists and objects (schedules, raw blobs).
    Other(serde_json::Value),
}

impl DpsValue {
    /// Interprets the value as an on/off flag.
    ///
    /// Numbers are on when non-zero, text and containers when non-empty,
    /// `null` is off.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Text(s) => !s.is_empty(),
            Self::Other(serde_json::Value::Array(items)) => !items.is_empty(),
            Self::Other(serde_json::Value::Object(map)) => !map.is_empty(),
            Self::Other(_) => false,
        }
    }

    /// Returns the value as a number, if it is one.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Bool(_) | Self::Text(_) | Self::Other(_) => None,
        }
    }
}

impl fmt::Display for DpsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Other(v) => write!(f, "{v}"),
        }
    }
}

/// Group data as reported by the device.
///
/// Single-outlet plugs report one flat map; multi-outlet units report a list
/// with one map per group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DpsPayload {
    /// One map for group 1.
    Single(DpsMap),
    /// One map per group, group 1 first.
    Multi(Vec<DpsMap>),
}

/// Decoded answer to a status request.
///
/// # Examples
///
/// ```
/// use tuya_plug_bridge::protocol::StatusPayload;
///
/// let payload = StatusPayload::from_json(
///     r#"{"devId":"bf01","dps":{"1":true,"4":500,"5":1000,"6":2300}}"#,
/// ).unwrap();
///
/// let groups: Vec<_> = payload.groups().collect();
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].0.value(), 1);
/// assert!(groups[0].1["1"].as_bool());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusPayload {
    /// Device identifier echoed by the plug.
    #[serde(rename = "devId", default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    /// Data point values.
    pub dps: DpsPayload,
}

impl StatusPayload {
    /// Creates a payload reporting a single group.
    #[must_use]
    pub fn single(dps: DpsMap) -> Self {
        Self {
            device_id: None,
            dps: DpsPayload::Single(dps),
        }
    }

    /// Creates a payload reporting several groups, group 1 first.
    #[must_use]
    pub fn multi(dps: Vec<DpsMap>) -> Self {
        Self {
            device_id: None,
            dps: DpsPayload::Multi(dps),
        }
    }

    /// Decodes the JSON status document returned by the device client.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Decode` if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, TransportError> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Iterates the reported groups as `(group, values)`, numbered from 1.
    pub fn groups(&self) -> impl Iterator<Item = (GroupIndex, &DpsMap)> {
        let maps: &[DpsMap] = match &self.dps {
            DpsPayload::Single(map) => std::slice::from_ref(map),
            DpsPayload::Multi(maps) => maps,
        };
        maps.iter().enumerate().filter_map(|(i, map)| {
            let index = u16::try_from(i + 1).ok()?;
            GroupIndex::new(index).ok().map(|group| (group, map))
        })
    }

    /// Returns the number of groups reported.
    #[must_use]
    pub fn group_count(&self) -> usize {
        match &self.dps {
            DpsPayload::Single(_) => 1,
            DpsPayload::Multi(maps) => maps.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_group() {
        let payload = StatusPayload::from_json(
            r#"{"devId":"bf01","dps":{"1":true,"4":500,"5":1000,"6":2300}}"#,
        )
        .unwrap();

        assert_eq!(payload.device_id.as_deref(), Some("bf01"));
        assert_eq!(payload.group_count(), 1);
        let (group, dps) = payload.groups().next().unwrap();
        assert_eq!(group, GroupIndex::first());
        assert_eq!(dps["1"], DpsValue::Bool(true));
        assert_eq!(dps["4"], DpsValue::Integer(500));
    }

    #[test]
    fn parse_group_list() {
        let payload =
            StatusPayload::from_json(r#"{"dps":[{"1":true},{"1":false},{"1":1}]}"#).unwrap();

        let groups: Vec<u16> = payload.groups().map(|(g, _)| g.value()).collect();
        assert_eq!(groups, vec![1, 2, 3]);
        assert_eq!(payload.device_id, None);
    }

    #[test]
    fn parse_mixed_value_types() {
        let payload =
            StatusPayload::from_json(r#"{"dps":{"1":false,"9":0.5,"14":"memory","4":0}}"#)
                .unwrap();
        let (_, dps) = payload.groups().next().unwrap();

        assert_eq!(dps["9"], DpsValue::Float(0.5));
        assert_eq!(dps["14"], DpsValue::Text("memory".to_string()));
        assert_eq!(dps["4"].as_f64(), Some(0.0));
    }

    #[test]
    fn parse_keeps_null_and_structured_values() {
        let payload = StatusPayload::from_json(
            r#"{"dps":[{"1":true,"4":500},{"1":true,"9":null,"38":{"a":1}}]}"#,
        )
        .unwrap();
        let groups: Vec<_> = payload.groups().collect();

        assert_eq!(groups[0].1["4"], DpsValue::Integer(500));
        assert_eq!(groups[1].1["9"], DpsValue::Other(serde_json::Value::Null));
        assert_eq!(groups[1].1["38"].to_string(), r#"{"a":1}"#);
        assert_eq!(groups[1].1["38"].as_f64(), None);
    }

    #[test]
    fn parse_rejects_missing_dps() {
        let result = StatusPayload::from_json(r#"{"devId":"bf01"}"#);
        assert!(matches!(result, Err(TransportError::Decode(_))));
    }

    #[test]
    fn truthiness() {
        assert!(DpsValue::Bool(true).as_bool());
        assert!(!DpsValue::Bool(false).as_bool());
        assert!(DpsValue::Integer(2).as_bool());
        assert!(!DpsValue::Integer(0).as_bool());
        assert!(!DpsValue::Float(0.0).as_bool());
        assert!(DpsValue::Text("on".to_string()).as_bool());
        assert!(!DpsValue::Text(String::new()).as_bool());
        assert!(!DpsValue::Other(serde_json::Value::Null).as_bool());
        assert!(DpsValue::Other(serde_json::json!({"a": 1})).as_bool());
        assert!(!DpsValue::Other(serde_json::json!([])).as_bool());
    }

    #[test]
    fn numbers_only() {
        assert_eq!(DpsValue::Integer(2300).as_f64(), Some(2300.0));
        assert_eq!(DpsValue::Bool(true).as_f64(), None);
        assert_eq!(DpsValue::Text("12".to_string()).as_f64(), None);
    }
}
