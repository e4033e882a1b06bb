// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status payload to sensor updates.

use crate::config::FieldKeyMap;
use crate::error::Error;
use crate::host::{DeviceRegistry, SensorUpdate};
use crate::mapping::sensor_id;
use crate::protocol::{DpsMap, DpsValue, StatusPayload};
use crate::types::{Field, GroupIndex, SensorId, SensorRole, SwitchState};

/// Measurement fields with their raw divisor and value suffix.
///
/// Raw current is in milliamps, voltage in decivolts. The energy field is
/// written as `<raw / 10>;0`, the host's `power;total` pair with no total.
const READINGS: [(Field, f64, &str); 3] = [
    (Field::Current, 1000.0, ""),
    (Field::Energy, 10.0, ";0"),
    (Field::Voltage, 10.0, ""),
];

/// Outcome of one poll tick.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Groups processed with no failures.
    pub updated: Vec<GroupIndex>,
    /// Switch units that were written because their state changed.
    pub switch_writes: Vec<SensorId>,
    /// Per-group failures, in the order they occurred.
    pub failures: Vec<(GroupIndex, Error)>,
}

impl DispatchReport {
    /// Returns `true` if no group failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the failures of `group`.
    pub fn failures_of(&self, group: GroupIndex) -> impl Iterator<Item = &Error> {
        self.failures
            .iter()
            .filter(move |(g, _)| *g == group)
            .map(|(_, e)| e)
    }

    fn fail(&mut self, group: GroupIndex, error: Error) {
        tracing::warn!(group = %group, error = %error, "Skipping group update");
        self.failures.push((group, error));
    }
}

/// Applies device status payloads to the host's sensors.
///
/// Groups are processed independently: a bad payload for one group never
/// prevents its siblings from updating.
#[derive(Debug, Clone, Copy)]
pub struct StatusDispatcher<'a> {
    groups: &'a [GroupIndex],
    keys: &'a FieldKeyMap,
}

impl<'a> StatusDispatcher<'a> {
    /// Creates a dispatcher for the configured groups and keys.
    #[must_use]
    pub fn new(groups: &'a [GroupIndex], keys: &'a FieldKeyMap) -> Self {
        Self { groups, keys }
    }

    /// Applies `payload` to `registry`.
    ///
    /// The switch sensor is only written when its state changed; the three
    /// measurement sensors are written on every call.
    pub fn dispatch<R: DeviceRegistry>(
        &self,
        registry: &mut R,
        payload: &StatusPayload,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        for (group, dps) in payload.groups() {
            self.dispatch_group(registry, group, dps, &mut report);
        }
        report
    }

    fn dispatch_group<R: DeviceRegistry>(
        &self,
        registry: &mut R,
        group: GroupIndex,
        dps: &DpsMap,
        report: &mut DispatchReport,
    ) {
        if !self.groups.contains(&group) {
            report.fail(group, Error::UnknownGroup(group));
            return;
        }

        // Every measurement is tagged with the outlet state, so nothing is
        // written without it.
        let state = match self.lookup(group, dps, Field::Status) {
            Ok(value) => SwitchState::from(value.as_bool()),
            Err(e) => {
                report.fail(group, e);
                return;
            }
        };

        let switch = sensor_id(group, SensorRole::Switch);
        if registry.n_value(switch) != Some(state.n_value()) {
            if let Err(e) = registry.update(switch, SensorUpdate::switch(state)) {
                report.fail(group, e);
                return;
            }
            tracing::debug!(unit = %switch, state = %state, "Synced switch");
            report.switch_writes.push(switch);
        }

        let mut complete = true;
        for (field, divisor, suffix) in READINGS {
            let written = self
                .lookup(group, dps, field)
                .and_then(|value| reading(group, field, value, divisor, suffix))
                .and_then(|s_value| {
                    let unit = sensor_id(group, field.role());
                    tracing::debug!(unit = %unit, value = %s_value, "Updated {field}");
                    registry.update(unit, SensorUpdate::reading(state, s_value))
                });
            if let Err(e) = written {
                report.fail(group, e);
                complete = false;
            }
        }

        if complete {
            report.updated.push(group);
        }
    }

    fn lookup<'d>(
        &self,
        group: GroupIndex,
        dps: &'d DpsMap,
        field: Field,
    ) -> Result<&'d DpsValue, Error> {
        let key = self.keys.key(field);
        dps.get(key).ok_or_else(|| Error::FieldMissing {
            group,
            field,
            key: key.to_string(),
        })
    }
}

fn reading(
    group: GroupIndex,
    field: Field,
    value: &DpsValue,
    divisor: f64,
    suffix: &str,
) -> Result<String, Error> {
    let raw = value.as_f64().ok_or_else(|| Error::InvalidValue {
        group,
        field,
        value: value.to_string(),
    })?;
    Ok(format!("{}{suffix}", format_decimal(raw / divisor)))
}

/// Renders a reading with at least one fractional digit (`100.0`, `0.5`).
fn format_decimal(value: f64) -> String {
    let rendered = value.to_string();
    if value.is_finite() && !rendered.contains('.') {
        format!("{rendered}.0")
    } else {
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryRegistry;
    use crate::mapping::{parse_group_list, provision};
    use serde_json::json;

    fn setup(groups: &str) -> (Vec<GroupIndex>, MemoryRegistry) {
        let groups = parse_group_list(groups).unwrap();
        let mut registry = MemoryRegistry::new();
        for sensor in provision(&groups) {
            registry.create(&sensor).unwrap();
        }
        (groups, registry)
    }

    fn payload(value: serde_json::Value) -> StatusPayload {
        serde_json::from_value(value).unwrap()
    }

    fn s_value(registry: &MemoryRegistry, unit: u32) -> String {
        registry.record(SensorId::from_unit(unit)).unwrap().s_value
    }

    fn group(v: u16) -> GroupIndex {
        GroupIndex::new(v).unwrap()
    }

    #[test]
    fn format_decimal_keeps_a_fraction() {
        assert_eq!(format_decimal(0.5), "0.5");
        assert_eq!(format_decimal(100.0), "100.0");
        assert_eq!(format_decimal(230.0), "230.0");
        assert_eq!(format_decimal(123.4), "123.4");
        assert_eq!(format_decimal(0.0), "0.0");
    }

    #[test]
    fn single_group_payload() {
        let (groups, mut registry) = setup("1");
        let keys = FieldKeyMap::default();
        let dispatcher = StatusDispatcher::new(&groups, &keys);

        let report = dispatcher.dispatch(
            &mut registry,
            &payload(json!({"dps": {"1": true, "4": 500, "5": 1000, "6": 2300}})),
        );

        assert!(report.is_clean());
        assert_eq!(report.updated, vec![group(1)]);
        assert_eq!(report.switch_writes, vec![SensorId::from_unit(10)]);
        assert_eq!(registry.n_value(SensorId::from_unit(10)), Some(1));
        assert_eq!(s_value(&registry, 10), "On");
        assert_eq!(s_value(&registry, 11), "0.5");
        assert_eq!(s_value(&registry, 12), "100.0;0");
        assert_eq!(s_value(&registry, 13), "230.0");
    }

    #[test]
    fn readings_carry_the_switch_flag() {
        let (groups, mut registry) = setup("1");
        let keys = FieldKeyMap::default();
        StatusDispatcher::new(&groups, &keys).dispatch(
            &mut registry,
            &payload(json!({"dps": {"1": false, "4": 0, "5": 0, "6": 2290}})),
        );

        for unit in 11..=13 {
            assert_eq!(registry.n_value(SensorId::from_unit(unit)), Some(0));
        }
        assert_eq!(s_value(&registry, 13), "229.0");
    }

    #[test]
    fn unchanged_switch_is_not_rewritten() {
        let (groups, mut registry) = setup("1");
        let keys = FieldKeyMap::default();
        let dispatcher = StatusDispatcher::new(&groups, &keys);
        let status = payload(json!({"dps": {"1": true, "4": 500, "5": 1000, "6": 2300}}));

        dispatcher.dispatch(&mut registry, &status);
        let second = dispatcher.dispatch(&mut registry, &status);

        assert!(second.switch_writes.is_empty());
        assert_eq!(second.updated, vec![group(1)]);
        assert_eq!(registry.writes(SensorId::from_unit(10)), 1);
        for unit in 11..=13 {
            assert_eq!(registry.writes(SensorId::from_unit(unit)), 2);
        }
    }

    #[test]
    fn missing_field_does_not_block_siblings() {
        let (groups, mut registry) = setup("1;2;3");
        let keys = FieldKeyMap::default();
        let report = StatusDispatcher::new(&groups, &keys).dispatch(
            &mut registry,
            &payload(json!({"dps": [
                {"1": true, "4": 100, "5": 10, "6": 2300},
                {"1": true, "4": 200, "5": 20},
                {"1": false, "4": 300, "5": 30, "6": 2310}
            ]})),
        );

        assert_eq!(report.updated, vec![group(1), group(3)]);
        let failures: Vec<_> = report.failures_of(group(2)).collect();
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            failures[0],
            Error::FieldMissing { field: Field::Voltage, key, .. } if key == "6"
        ));

        assert_eq!(s_value(&registry, 20), "On");
        assert_eq!(s_value(&registry, 21), "0.2");
        assert_eq!(s_value(&registry, 22), "2.0;0");
        assert_eq!(registry.writes(SensorId::from_unit(23)), 0);
        assert_eq!(s_value(&registry, 33), "231.0");
    }

    #[test]
    fn missing_status_skips_whole_group() {
        let (groups, mut registry) = setup("1");
        let keys = FieldKeyMap::default();
        let report = StatusDispatcher::new(&groups, &keys).dispatch(
            &mut registry,
            &payload(json!({"dps": {"4": 500, "5": 1000, "6": 2300}})),
        );

        assert!(report.updated.is_empty());
        assert!(matches!(
            report.failures[0].1,
            Error::FieldMissing {
                field: Field::Status,
                ..
            }
        ));
        assert!(registry.units().iter().all(|u| registry.writes(*u) == 0));
    }

    #[test]
    fn non_numeric_reading() {
        let (groups, mut registry) = setup("1");
        let keys = FieldKeyMap::default();
        let report = StatusDispatcher::new(&groups, &keys).dispatch(
            &mut registry,
            &payload(json!({"dps": {"1": true, "4": "n/a", "5": 1000, "6": 2300}})),
        );

        assert!(matches!(
            report.failures[0].1,
            Error::InvalidValue {
                field: Field::Current,
                ..
            }
        ));
        assert_eq!(s_value(&registry, 12), "100.0;0");
    }

    #[test]
    fn null_data_point_stays_with_its_group() {
        let (groups, mut registry) = setup("1;2");
        let keys = FieldKeyMap::default();
        let report = StatusDispatcher::new(&groups, &keys).dispatch(
            &mut registry,
            &payload(json!({"dps": [
                {"1": true, "4": 500, "5": 1000, "6": 2300},
                {"1": true, "4": null, "5": 20, "6": 2310, "9": null, "38": {"a": 1}}
            ]})),
        );

        assert_eq!(report.updated, vec![group(1)]);
        assert_eq!(s_value(&registry, 11), "0.5");
        assert_eq!(s_value(&registry, 13), "230.0");

        let failures: Vec<_> = report.failures_of(group(2)).collect();
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            failures[0],
            Error::InvalidValue { field: Field::Current, value, .. } if value == "null"
        ));
        assert_eq!(registry.writes(SensorId::from_unit(21)), 0);
        assert_eq!(s_value(&registry, 22), "2.0;0");
        assert_eq!(s_value(&registry, 23), "231.0");
    }

    #[test]
    fn unconfigured_group_is_reported() {
        let (groups, mut registry) = setup("1");
        let keys = FieldKeyMap::default();
        let report = StatusDispatcher::new(&groups, &keys).dispatch(
            &mut registry,
            &payload(json!({"dps": [
                {"1": true, "4": 0, "5": 0, "6": 2300},
                {"1": true, "4": 0, "5": 0, "6": 2300}
            ]})),
        );

        assert_eq!(report.updated, vec![group(1)]);
        assert!(matches!(report.failures[0], (g, Error::UnknownGroup(_)) if g == group(2)));
    }

    #[test]
    fn custom_field_keys() {
        let (groups, mut registry) = setup("1");
        let keys: FieldKeyMap = "1;18;17;20".parse().unwrap();
        let report = StatusDispatcher::new(&groups, &keys).dispatch(
            &mut registry,
            &payload(json!({"dps": {"1": 1, "18": 1250, "17": 55, "20": 2371}})),
        );

        assert!(report.is_clean());
        assert_eq!(s_value(&registry, 10), "On");
        assert_eq!(s_value(&registry, 11), "1.25");
        assert_eq!(s_value(&registry, 12), "5.5;0");
        assert_eq!(s_value(&registry, 13), "237.1");
    }
}
