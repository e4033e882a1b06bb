// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Seam to the device-protocol client.
//!
//! The local Tuya protocol (transport, encryption, framing) lives in an
//! external client library. The bridge only needs two requests from it,
//! expressed by [`DeviceClient`], and a way to open a client from
//! credentials, expressed by [`DeviceConnector`].
//!
//! # Examples
//!
//! ```
//! use tuya_plug_bridge::config::DeviceCredentials;
//! use tuya_plug_bridge::error::TransportError;
//! use tuya_plug_bridge::protocol::{DeviceClient, DeviceConnector, StatusPayload};
//! use tuya_plug_bridge::types::GroupIndex;
//!
//! struct LoopbackPlug;
//!
//! impl DeviceClient for LoopbackPlug {
//!     async fn status(&self) -> Result<StatusPayload, TransportError> {
//!         StatusPayload::from_json(r#"{"dps":{"1":false}}"#)
//!     }
//!
//!     async fn set_status(&self, _group: GroupIndex, _on: bool) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//! }
//!
//! struct LoopbackConnector;
//!
//! impl DeviceConnector for LoopbackConnector {
//!     type Client = LoopbackPlug;
//!
//!     fn open(&self, _credentials: &DeviceCredentials) -> Result<LoopbackPlug, TransportError> {
//!         Ok(LoopbackPlug)
//!     }
//! }
//! ```

mod status;

pub use status::{DpsMap, DpsPayload, DpsValue, StatusPayload};

use std::future::Future;

use crate::config::DeviceCredentials;
use crate::error::TransportError;
use crate::types::GroupIndex;

/// Requests the bridge sends to the plug.
///
/// Futures are `Send` so a plugin can run on a multi-threaded runtime.
pub trait DeviceClient: Send + Sync {
    /// Reads the current data point values.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the device cannot be reached or answers
    /// with something that is not a status document.
    fn status(&self) -> impl Future<Output = Result<StatusPayload, TransportError>> + Send;

    /// Switches the outlet of `group` on or off.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the request fails.
    fn set_status(
        &self,
        group: GroupIndex,
        on: bool,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Opens device clients.
pub trait DeviceConnector: Send {
    /// The client type produced.
    type Client: DeviceClient;

    /// Opens a client for the plug described by `credentials`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the client cannot be created.
    fn open(&self, credentials: &DeviceCredentials) -> Result<Self::Client, TransportError>;
}
