// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Live device handle.

use crate::config::DeviceCredentials;
use crate::error::TransportError;
use crate::protocol::{DeviceClient, DeviceConnector, StatusPayload};
use crate::types::GroupIndex;

/// The single open connection to the plug.
///
/// Opened at start, dropped at stop.
#[derive(Debug)]
pub struct DeviceSession<C> {
    credentials: DeviceCredentials,
    client: C,
}

impl<C: DeviceClient> DeviceSession<C> {
    /// Opens a session through `connector`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the connector cannot create a client.
    pub fn open<K>(connector: &K, credentials: &DeviceCredentials) -> Result<Self, TransportError>
    where
        K: DeviceConnector<Client = C>,
    {
        let client = connector.open(credentials).inspect_err(|e| {
            tracing::warn!(address = %credentials.address(), error = %e, "Failed to open device");
        })?;
        tracing::debug!(
            address = %credentials.address(),
            device_id = %credentials.device_id(),
            "Device session opened"
        );
        Ok(Self {
            credentials: credentials.clone(),
            client,
        })
    }
}

impl<C> Drop for DeviceSession<C> {
    fn drop(&mut self) {
        tracing::debug!(address = %self.credentials.address(), "Device session closed");
    }
}

impl<C: DeviceClient> DeviceClient for DeviceSession<C> {
    async fn status(&self) -> Result<StatusPayload, TransportError> {
        let payload = self.client.status().await?;
        tracing::trace!(?payload, "Status received");
        Ok(payload)
    }

    async fn set_status(&self, group: GroupIndex, on: bool) -> Result<(), TransportError> {
        tracing::trace!(group = %group, on, "Sending set status");
        self.client.set_status(group, on).await
    }
}
