// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the bridge.
//!
//! # Types
//!
//! - [`GroupIndex`] - Data point group of one outlet (1-based)
//! - [`SensorRole`] - Switch/Current/Energy/Voltage slot within a group
//! - [`SensorId`] - Host unit number of a virtual sensor
//! - [`VirtualSensor`] - A `(group, role)` pair with its unit number
//! - [`Field`] - Semantic field looked up in a status payload
//! - [`SwitchState`] - On/Off state and host command

mod group;
mod sensor;
mod switch;

pub use group::GroupIndex;
pub use sensor::{Field, SensorId, SensorRole, VirtualSensor};
pub use switch::SwitchState;
