// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Virtual sensor identity types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::GroupIndex;

/// Role of a virtual sensor within its group.
///
/// Each group exposes exactly one sensor per role. The role offset is the
/// last decimal digit of the sensor's host unit number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SensorRole {
    /// Outlet on/off switch.
    Switch,
    /// Current draw in amperes.
    Current,
    /// Energy counter in kWh.
    Energy,
    /// Mains voltage in volts.
    Voltage,
}

impl SensorRole {
    /// All roles in offset order.
    pub const ALL: [Self; 4] = [Self::Switch, Self::Current, Self::Energy, Self::Voltage];

    /// Returns the unit offset of this role within a group.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        match self {
            Self::Switch => 0,
            Self::Current => 1,
            Self::Energy => 2,
            Self::Voltage => 3,
        }
    }

    /// Returns the role for a unit offset, if any.
    #[must_use]
    pub const fn from_offset(offset: u32) -> Option<Self> {
        match offset {
            0 => Some(Self::Switch),
            1 => Some(Self::Current),
            2 => Some(Self::Energy),
            3 => Some(Self::Voltage),
            _ => None,
        }
    }

    /// Returns the device name shown by the host.
    #[must_use]
    pub const fn device_name(&self) -> &'static str {
        match self {
            Self::Switch => "Tuya SmartPlug (Switch)",
            Self::Current => "Tuya SmartPlug (A)",
            Self::Energy => "Tuya SmartPlug (kWh)",
            Self::Voltage => "Tuya SmartPlug (V)",
        }
    }

    /// Returns the host device type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Switch => "Switch",
            Self::Current => "Current (Single)",
            Self::Energy => "kWh",
            Self::Voltage => "Voltage",
        }
    }
}

impl fmt::Display for SensorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Switch => "switch",
            Self::Current => "current",
            Self::Energy => "energy",
            Self::Voltage => "voltage",
        };
        f.write_str(name)
    }
}

/// Host unit number of a virtual sensor.
///
/// Built as `group * 10 + role offset`; see [`crate::mapping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorId(u32);

impl SensorId {
    /// Wraps a raw host unit number.
    #[must_use]
    pub const fn from_unit(unit: u32) -> Self {
        Self(unit)
    }

    /// Returns the raw host unit number.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SensorId {
    fn from(unit: u32) -> Self {
        Self(unit)
    }
}

/// A host-visible data channel derived from one group's data points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualSensor {
    /// Owning group.
    pub group: GroupIndex,
    /// Role within the group.
    pub role: SensorRole,
    /// Host unit number.
    pub id: SensorId,
}

/// Semantic field looked up in a status payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Switch state.
    Status,
    /// Current in milliamps.
    Current,
    /// Energy in tenths.
    Energy,
    /// Voltage in decivolts.
    Voltage,
}

impl Field {
    /// All fields in configuration order.
    pub const ALL: [Self; 4] = [Self::Status, Self::Current, Self::Energy, Self::Voltage];

    /// Returns the sensor role fed by this field.
    #[must_use]
    pub const fn role(&self) -> SensorRole {
        match self {
            Self::Status => SensorRole::Switch,
            Self::Current => SensorRole::Current,
            Self::Energy => SensorRole::Energy,
            Self::Voltage => SensorRole::Voltage,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Status => "status",
            Self::Current => "current",
            Self::Energy => "energy",
            Self::Voltage => "voltage",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_offsets_round_trip() {
        for role in SensorRole::ALL {
            assert_eq!(SensorRole::from_offset(role.offset()), Some(role));
        }
        assert_eq!(SensorRole::from_offset(4), None);
        assert_eq!(SensorRole::from_offset(9), None);
    }

    #[test]
    fn role_host_names() {
        assert_eq!(SensorRole::Current.type_name(), "Current (Single)");
        assert_eq!(SensorRole::Energy.device_name(), "Tuya SmartPlug (kWh)");
    }

    #[test]
    fn field_roles() {
        assert_eq!(Field::Status.role(), SensorRole::Switch);
        assert_eq!(Field::Voltage.role(), SensorRole::Voltage);
        assert_eq!(Field::Energy.to_string(), "energy");
    }

    #[test]
    fn sensor_id_display() {
        assert_eq!(SensorId::from_unit(21).to_string(), "21");
        assert_eq!(SensorId::from(13).value(), 13);
    }
}
