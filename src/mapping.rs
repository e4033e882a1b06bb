// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mapping between data point groups and host sensor units.
//!
//! Every configured group owns four consecutive host units starting at
//! `group * 10`:
//!
//! | Unit | Role |
//! |------|------|
//! | `g0` | [`SensorRole::Switch`] |
//! | `g1` | [`SensorRole::Current`] |
//! | `g2` | [`SensorRole::Energy`] |
//! | `g3` | [`SensorRole::Voltage`] |
//!
//! # Examples
//!
//! ```
//! use tuya_plug_bridge::mapping::{group_index_of, parse_group_list, sensor_id};
//! use tuya_plug_bridge::types::SensorRole;
//!
//! let groups = parse_group_list("2;1;2").unwrap();
//! assert_eq!(groups.len(), 2);
//!
//! let id = sensor_id(groups[1], SensorRole::Energy);
//! assert_eq!(id.value(), 22);
//! assert_eq!(group_index_of(id), Some(groups[1]));
//! ```

use std::collections::BTreeSet;

use crate::error::ConfigError;
use crate::types::{GroupIndex, SensorId, SensorRole, VirtualSensor};

/// Units per group block.
const GROUP_STRIDE: u32 = 10;

/// Parses a `;`-separated group list.
///
/// Entries are trimmed, duplicates are dropped and the result is sorted
/// ascending.
///
/// # Errors
///
/// Returns `ConfigError::InvalidGroupIndex` for any entry that is not a
/// positive integer, and `ConfigError::NoGroups` when nothing is listed.
pub fn parse_group_list(list: &str) -> Result<Vec<GroupIndex>, ConfigError> {
    if list.trim().is_empty() {
        return Err(ConfigError::NoGroups);
    }
    let groups = list
        .split(';')
        .map(str::parse::<GroupIndex>)
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(groups.into_iter().collect())
}

/// Returns the host unit of `role` in `group`.
#[must_use]
pub fn sensor_id(group: GroupIndex, role: SensorRole) -> SensorId {
    SensorId::from_unit(u32::from(group.value()) * GROUP_STRIDE + role.offset())
}

/// Returns the group owning a host unit, discarding the role offset.
///
/// Units below 10 belong to no group.
#[must_use]
pub fn group_index_of(id: SensorId) -> Option<GroupIndex> {
    u16::try_from(id.value() / GROUP_STRIDE)
        .ok()
        .and_then(|v| GroupIndex::new(v).ok())
}

/// Returns the role of a host unit, if its offset names one.
#[must_use]
pub fn role_of(id: SensorId) -> Option<SensorRole> {
    SensorRole::from_offset(id.value() % GROUP_STRIDE)
}

/// Resolves a host unit back into its `(group, role)` pair.
#[must_use]
pub fn resolve(id: SensorId) -> Option<VirtualSensor> {
    Some(VirtualSensor {
        group: group_index_of(id)?,
        role: role_of(id)?,
        id,
    })
}

/// Lists every virtual sensor to provision for `groups`, by group then role.
pub fn provision(groups: &[GroupIndex]) -> impl Iterator<Item = VirtualSensor> + '_ {
    groups.iter().flat_map(|&group| {
        SensorRole::ALL.into_iter().map(move |role| VirtualSensor {
            group,
            role,
            id: sensor_id(group, role),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(v: u16) -> GroupIndex {
        GroupIndex::new(v).unwrap()
    }

    #[test]
    fn parse_single_group() {
        assert_eq!(parse_group_list("1").unwrap(), vec![group(1)]);
    }

    #[test]
    fn parse_dedupes_and_sorts() {
        assert_eq!(
            parse_group_list("3;1;3").unwrap(),
            vec![group(1), group(3)]
        );
    }

    #[test]
    fn parse_trims_entries() {
        assert_eq!(
            parse_group_list(" 2 ; 4").unwrap(),
            vec![group(2), group(4)]
        );
    }

    #[test]
    fn parse_rejects_bad_entries() {
        assert_eq!(
            parse_group_list("1;x"),
            Err(ConfigError::InvalidGroupIndex("x".to_string()))
        );
        assert_eq!(
            parse_group_list("0"),
            Err(ConfigError::InvalidGroupIndex("0".to_string()))
        );
        assert_eq!(
            parse_group_list("1;"),
            Err(ConfigError::InvalidGroupIndex(String::new()))
        );
    }

    #[test]
    fn parse_rejects_empty_list() {
        assert_eq!(parse_group_list(""), Err(ConfigError::NoGroups));
        assert_eq!(parse_group_list("  "), Err(ConfigError::NoGroups));
    }

    #[test]
    fn sensor_ids_follow_role_offsets() {
        let g = group(1);
        assert_eq!(sensor_id(g, SensorRole::Switch).value(), 10);
        assert_eq!(sensor_id(g, SensorRole::Current).value(), 11);
        assert_eq!(sensor_id(g, SensorRole::Energy).value(), 12);
        assert_eq!(sensor_id(g, SensorRole::Voltage).value(), 13);
    }

    #[test]
    fn group_index_of_inverts_sensor_id() {
        for g in [1, 2, 9, 25, u16::MAX] {
            for role in SensorRole::ALL {
                let id = sensor_id(group(g), role);
                assert_eq!(group_index_of(id), Some(group(g)));
                assert_eq!(role_of(id), Some(role));
            }
        }
    }

    #[test]
    fn units_below_ten_have_no_group() {
        assert_eq!(group_index_of(SensorId::from_unit(0)), None);
        assert_eq!(group_index_of(SensorId::from_unit(9)), None);
    }

    #[test]
    fn resolve_rejects_unused_offsets() {
        assert_eq!(resolve(SensorId::from_unit(14)), None);
        let sensor = resolve(SensorId::from_unit(23)).unwrap();
        assert_eq!(sensor.group, group(2));
        assert_eq!(sensor.role, SensorRole::Voltage);
    }

    #[test]
    fn provision_lists_four_sensors_per_group() {
        let groups = parse_group_list("3;1").unwrap();
        let units: Vec<u32> = provision(&groups).map(|s| s.id.value()).collect();
        assert_eq!(units, vec![10, 11, 12, 13, 30, 31, 32, 33]);
    }
}
