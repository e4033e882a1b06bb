// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Seam to the host's device registry.
//!
//! The host persists one device per virtual sensor, keyed by unit number.
//! Each device holds an integer value (`n_value`) and a string value
//! (`s_value`); what they mean depends on the device type:
//!
//! | Role | `n_value` | `s_value` |
//! |------|-----------|-----------|
//! | Switch | `1`/`0` | `"On"`/`"Off"` |
//! | Current | switch flag | amperes, e.g. `"0.5"` |
//! | Energy | switch flag | `"<power>;<total>"`, e.g. `"100.0;0"` |
//! | Voltage | switch flag | volts, e.g. `"230.0"` |

mod memory;

pub use memory::{MemoryRegistry, SensorRecord};

use crate::error::Result;
use crate::types::{SensorId, SwitchState, VirtualSensor};

/// A single write to a host device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorUpdate {
    /// Integer value.
    pub n_value: i32,
    /// String value.
    pub s_value: String,
}

impl SensorUpdate {
    /// Creates an update from raw values.
    #[must_use]
    pub fn new(n_value: i32, s_value: impl Into<String>) -> Self {
        Self {
            n_value,
            s_value: s_value.into(),
        }
    }

    /// Creates the update of a switch device.
    ///
    /// # Examples
    ///
    /// ```
    /// use tuya_plug_bridge::host::SensorUpdate;
    /// use tuya_plug_bridge::types::SwitchState;
    ///
    /// let update = SensorUpdate::switch(SwitchState::On);
    /// assert_eq!(update, SensorUpdate::new(1, "On"));
    /// ```
    #[must_use]
    pub fn switch(state: SwitchState) -> Self {
        Self::new(state.n_value(), state.as_str())
    }

    /// Creates the update of a measurement device tagged with its outlet state.
    #[must_use]
    pub fn reading(state: SwitchState, s_value: impl Into<String>) -> Self {
        Self::new(state.n_value(), s_value)
    }
}

/// The host's store of plugin devices.
pub trait DeviceRegistry: Send {
    /// Returns `true` if the plugin owns no device yet.
    fn is_empty(&self) -> bool;

    /// Returns `true` if a device exists for `id`.
    fn contains(&self, id: SensorId) -> bool;

    /// Creates the device backing `sensor`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Host` if the host refuses the device.
    fn create(&mut self, sensor: &VirtualSensor) -> Result<()>;

    /// Returns the stored integer value of `id`.
    fn n_value(&self, id: SensorId) -> Option<i32>;

    /// Writes new values to the device `id`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownSensor` if no device exists for `id`.
    fn update(&mut self, id: SensorId, update: SensorUpdate) -> Result<()>;
}
