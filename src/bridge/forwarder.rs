// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host commands to device requests.

use crate::error::{Error, Result};
use crate::host::{DeviceRegistry, SensorUpdate};
use crate::mapping::{group_index_of, sensor_id};
use crate::protocol::DeviceClient;
use crate::types::{GroupIndex, SensorId, SensorRole, SwitchState};

/// Forwards host switch commands to the plug.
///
/// After the device accepts the request, the group's switch sensor is
/// updated right away. The next poll reconciles it with what the device
/// actually reports.
#[derive(Debug, Clone, Copy)]
pub struct CommandForwarder<'a> {
    groups: &'a [GroupIndex],
}

impl<'a> CommandForwarder<'a> {
    /// Creates a forwarder for the configured groups.
    #[must_use]
    pub fn new(groups: &'a [GroupIndex]) -> Self {
        Self { groups }
    }

    /// Handles `command` sent by the host for `unit`.
    ///
    /// `level` is only logged; on/off commands carry no level.
    ///
    /// # Errors
    ///
    /// - `Error::UnsupportedCommand` if `command` is not `On` or `Off`
    /// - `Error::UnknownSensor` if `unit` belongs to no configured group
    /// - `Error::Transport` if the device request fails; the switch sensor
    ///   is left untouched
    pub async fn forward<C, R>(
        &self,
        client: &C,
        registry: &mut R,
        unit: SensorId,
        command: &str,
        level: i32,
    ) -> Result<SwitchState>
    where
        C: DeviceClient,
        R: DeviceRegistry,
    {
        tracing::debug!(unit = %unit, command = %command, level, "Command received");

        let state: SwitchState = command.parse().inspect_err(|_| {
            tracing::error!(unit = %unit, command = %command, "Undefined command");
        })?;

        let group = group_index_of(unit)
            .filter(|g| self.groups.contains(g))
            .ok_or(Error::UnknownSensor(unit.value()))?;

        client.set_status(group, state.is_on()).await?;

        let switch = sensor_id(group, SensorRole::Switch);
        registry.update(switch, SensorUpdate::switch(state))?;
        tracing::debug!(unit = %switch, state = %state, "Switch set");
        Ok(state)
    }
}
