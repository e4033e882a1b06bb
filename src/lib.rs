// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tuya Plug Bridge - expose a Tuya Wi-Fi smart plug to a home-automation host.
//!
//! The plug multiplexes its readings onto numbered data points. This library
//! maps them onto four virtual sensors per outlet group and keeps them in sync
//! with the host:
//!
//! - **Switch** (unit `g0`): outlet on/off, controllable
//! - **Current** (unit `g1`): amperes
//! - **Energy** (unit `g2`): power reading in the host's `power;total` format
//! - **Voltage** (unit `g3`): volts
//!
//! where `g` is the group index. The device-protocol client and the host's
//! device store are plugged in through the [`DeviceConnector`] and
//! [`DeviceRegistry`] traits.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::collections::HashMap;
//!
//! use tuya_plug_bridge::{MemoryRegistry, PluginCallbacks, PluginConfig, SensorId, SmartPlug};
//! # use tuya_plug_bridge::{DeviceClient, DeviceConnector, DeviceCredentials, GroupIndex, StatusPayload, TransportError};
//! # struct Client;
//! # impl DeviceClient for Client {
//! #     async fn status(&self) -> Result<StatusPayload, TransportError> { unimplemented!() }
//! #     async fn set_status(&self, _: GroupIndex, _: bool) -> Result<(), TransportError> { unimplemented!() }
//! # }
//! # struct TuyaConnector;
//! # impl DeviceConnector for TuyaConnector {
//! #     type Client = Client;
//! #     fn open(&self, _: &DeviceCredentials) -> Result<Client, TransportError> { Ok(Client) }
//! # }
//!
//! #[tokio::main]
//! async fn main() -> tuya_plug_bridge::Result<()> {
//!     let parameters: HashMap<String, String> = [
//!         ("Address", "192.168.1.40"),
//!         ("Mode1", "bf0123456789abcdefgh"),
//!         ("Mode2", "0123456789abcdef"),
//!         ("Mode3", "1"),
//!         ("Mode4", "1;4;5;6"),
//!     ]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v.to_string()))
//!     .collect();
//!
//!     let mut plug = SmartPlug::new(TuyaConnector, MemoryRegistry::new());
//!     plug.on_start(PluginConfig::from_parameters(&parameters)?)?;
//!
//!     // Host heartbeat: polls the plug every second call
//!     plug.on_heartbeat().await?;
//!
//!     // Host command on the switch of group 1
//!     plug.on_command(SensorId::from_unit(10), "On", 0).await?;
//!
//!     plug.on_stop();
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod host;
pub mod mapping;
pub mod plugin;
pub mod protocol;
pub mod types;

pub use bridge::{CommandForwarder, DispatchReport, StatusDispatcher};
pub use config::{DebugMask, DeviceCredentials, FieldKeyMap, HostParameters, PluginConfig};
pub use error::{ConfigError, Error, Result, TransportError};
pub use host::{DeviceRegistry, MemoryRegistry, SensorRecord, SensorUpdate};
pub use plugin::{DeviceSession, PluginCallbacks, PluginHandle, SmartPlug};
pub use protocol::{DeviceClient, DeviceConnector, DpsMap, DpsValue, StatusPayload};
pub use types::{Field, GroupIndex, SensorId, SensorRole, SwitchState, VirtualSensor};
