// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory device registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::{DeviceRegistry, SensorUpdate};
use crate::error::{Error, Result};
use crate::types::{SensorId, VirtualSensor};

/// State of one host device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorRecord {
    /// Display name.
    pub name: String,
    /// Host device type name.
    pub type_name: String,
    /// Integer value.
    pub n_value: i32,
    /// String value.
    pub s_value: String,
    /// Number of writes since creation.
    pub writes: u32,
    /// Time of the last write.
    pub last_update: Option<DateTime<Utc>>,
}

/// Device registry kept in memory.
///
/// Clones share the same store, so one handle can be moved into a plugin
/// while another inspects the values.
///
/// # Examples
///
/// ```
/// use tuya_plug_bridge::host::{DeviceRegistry, MemoryRegistry, SensorUpdate};
/// use tuya_plug_bridge::mapping::provision;
/// use tuya_plug_bridge::types::{GroupIndex, SensorId};
///
/// let mut registry = MemoryRegistry::new();
/// for sensor in provision(&[GroupIndex::first()]) {
///     registry.create(&sensor).unwrap();
/// }
///
/// let viewer = registry.clone();
/// registry.update(SensorId::from_unit(13), SensorUpdate::new(1, "230.0")).unwrap();
///
/// let record = viewer.record(SensorId::from_unit(13)).unwrap();
/// assert_eq!(record.s_value, "230.0");
/// assert_eq!(record.writes, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    records: Arc<RwLock<BTreeMap<SensorId, SensorRecord>>>,
}

impl MemoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the device `id`.
    #[must_use]
    pub fn record(&self, id: SensorId) -> Option<SensorRecord> {
        self.records.read().get(&id).cloned()
    }

    /// Returns all unit numbers, ascending.
    #[must_use]
    pub fn units(&self) -> Vec<SensorId> {
        self.records.read().keys().copied().collect()
    }

    /// Returns the number of devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns the write count of `id`, zero for unknown devices.
    #[must_use]
    pub fn writes(&self, id: SensorId) -> u32 {
        self.records.read().get(&id).map_or(0, |r| r.writes)
    }
}

impl DeviceRegistry for MemoryRegistry {
    fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn contains(&self, id: SensorId) -> bool {
        self.records.read().contains_key(&id)
    }

    fn create(&mut self, sensor: &VirtualSensor) -> Result<()> {
        let mut records = self.records.write();
        if records.contains_key(&sensor.id) {
            return Err(Error::Host(format!("unit {} already exists", sensor.id)));
        }
        records.insert(
            sensor.id,
            SensorRecord {
                name: sensor.role.device_name().to_string(),
                type_name: sensor.role.type_name().to_string(),
                n_value: 0,
                s_value: String::new(),
                writes: 0,
                last_update: None,
            },
        );
        Ok(())
    }

    fn n_value(&self, id: SensorId) -> Option<i32> {
        self.records.read().get(&id).map(|r| r.n_value)
    }

    fn update(&mut self, id: SensorId, update: SensorUpdate) -> Result<()> {
        let mut records = self.records.write();
        let record = records
            .get_mut(&id)
            .ok_or(Error::UnknownSensor(id.value()))?;
        record.n_value = update.n_value;
        record.s_value = update.s_value;
        record.writes += 1;
        record.last_update = Some(Utc::now());
        Ok(())
    }
}
