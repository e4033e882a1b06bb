// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The plugin context and its host callbacks.
//!
//! The host drives a plugin through four callbacks, one at a time:
//!
//! ```text
//! on_start(config) ─► on_heartbeat() / on_command(..) ... ─► on_stop()
//!                          │                 │
//!                 every Nth heartbeat        │
//!                          ▼                 ▼
//!                  StatusDispatcher   CommandForwarder
//! ```
//!
//! [`SmartPlug`] owns everything a callback needs: the connector used to
//! open the device, the host registry, and (while started) the configuration
//! and live [`DeviceSession`]. Callbacks take `&mut self`, so they are
//! serialized by construction. Hosts that call in from several tasks go
//! through a [`PluginHandle`], which queues callbacks to a single worker.

mod session;
mod worker;

pub use session::DeviceSession;
pub use worker::PluginHandle;

use std::future::Future;

use crate::bridge::{CommandForwarder, DispatchReport, StatusDispatcher};
use crate::config::PluginConfig;
use crate::error::{Error, Result};
use crate::host::DeviceRegistry;
use crate::mapping::provision;
use crate::protocol::{DeviceClient, DeviceConnector};
use crate::types::{SensorId, SwitchState};

/// Callbacks a host invokes on a plugin.
pub trait PluginCallbacks: Send {
    /// Validates `config`, provisions host devices and opens the device.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for bad parameters, `Error::Host` if a device
    /// cannot be created, `Error::Transport` if the device cannot be opened.
    fn on_start(&mut self, config: PluginConfig) -> Result<()>;

    /// Handles a periodic heartbeat.
    ///
    /// Returns the dispatch report when this heartbeat triggered a poll.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotStarted` outside start/stop, or the poll error.
    fn on_heartbeat(&mut self) -> impl Future<Output = Result<Option<DispatchReport>>> + Send;

    /// Handles a command sent to host device `unit`.
    ///
    /// # Errors
    ///
    /// See [`CommandForwarder::forward`].
    fn on_command(
        &mut self,
        unit: SensorId,
        command: &str,
        level: i32,
    ) -> impl Future<Output = Result<SwitchState>> + Send;

    /// Releases the device.
    fn on_stop(&mut self);
}

struct Running<C> {
    config: PluginConfig,
    session: DeviceSession<C>,
    heartbeats_left: u32,
}

/// Bridge between one Tuya smart plug and the host.
///
/// # Examples
///
/// ```no_run
/// use tuya_plug_bridge::config::PluginConfig;
/// use tuya_plug_bridge::host::MemoryRegistry;
/// use tuya_plug_bridge::plugin::{PluginCallbacks, SmartPlug};
/// use tuya_plug_bridge::protocol::DeviceConnector;
/// use tuya_plug_bridge::types::SensorId;
///
/// async fn run<K>(connector: K, config: PluginConfig) -> tuya_plug_bridge::Result<()>
/// where
///     K: DeviceConnector,
/// {
///     let mut plug = SmartPlug::new(connector, MemoryRegistry::new());
///     plug.on_start(config)?;
///
///     plug.on_command(SensorId::from_unit(10), "On", 0).await?;
///     let report = plug.poll_tick().await?;
///     assert!(report.is_clean());
///
///     plug.on_stop();
///     Ok(())
/// }
/// ```
pub struct SmartPlug<K: DeviceConnector, R> {
    connector: K,
    registry: R,
    running: Option<Running<K::Client>>,
}

impl<K, R> SmartPlug<K, R>
where
    K: DeviceConnector,
    R: DeviceRegistry,
{
    /// Creates a stopped plugin.
    #[must_use]
    pub fn new(connector: K, registry: R) -> Self {
        Self {
            connector,
            registry,
            running: None,
        }
    }

    /// Returns the host registry.
    #[must_use]
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Returns the active configuration, if started.
    #[must_use]
    pub fn config(&self) -> Option<&PluginConfig> {
        self.running.as_ref().map(|r| &r.config)
    }

    /// Returns `true` between start and stop.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Reads the device status and applies it to the host sensors.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotStarted` outside start/stop, or `Error::Transport`
    /// if the status request fails. Per-group problems are not errors; they
    /// are listed in the report.
    pub async fn poll_tick(&mut self) -> Result<DispatchReport> {
        let running = self.running.as_ref().ok_or(Error::NotStarted)?;
        let payload = running.session.status().await.inspect_err(|e| {
            tracing::warn!(error = %e, "Status request failed");
        })?;

        let config = &running.config;
        let dispatcher = StatusDispatcher::new(config.groups(), config.field_keys());
        Ok(dispatcher.dispatch(&mut self.registry, &payload))
    }

    fn provision(&mut self, config: &PluginConfig) -> Result<()> {
        if self.registry.is_empty() {
            tracing::info!(groups = config.groups().len(), "Creating host devices");
        }
        for sensor in provision(config.groups()) {
            if self.registry.contains(sensor.id) {
                continue;
            }
            self.registry.create(&sensor)?;
            tracing::info!(unit = %sensor.id, "{} #{}", sensor.role.device_name(), sensor.group);
        }
        Ok(())
    }
}

impl<K, R> PluginCallbacks for SmartPlug<K, R>
where
    K: DeviceConnector,
    R: DeviceRegistry,
{
    fn on_start(&mut self, config: PluginConfig) -> Result<()> {
        config.validate()?;
        tracing::debug!(
            debug = %config.debug(),
            level = %config.debug().level_filter(),
            "on_start called"
        );

        if self.running.take().is_some() {
            tracing::debug!("Restarting running plugin");
        }

        self.provision(&config)?;
        let session = DeviceSession::open(&self.connector, config.credentials())?;
        self.running = Some(Running {
            heartbeats_left: config.heartbeat_divider(),
            config,
            session,
        });
        Ok(())
    }

    async fn on_heartbeat(&mut self) -> Result<Option<DispatchReport>> {
        let running = self.running.as_mut().ok_or(Error::NotStarted)?;
        tracing::debug!(heartbeats_left = running.heartbeats_left, "on_heartbeat called");

        running.heartbeats_left = running.heartbeats_left.saturating_sub(1);
        if running.heartbeats_left > 0 {
            return Ok(None);
        }
        // Rearm first: a failed poll must not stop the countdown.
        running.heartbeats_left = running.config.heartbeat_divider();

        tracing::debug!("Updating status");
        self.poll_tick().await.map(Some)
    }

    async fn on_command(
        &mut self,
        unit: SensorId,
        command: &str,
        level: i32,
    ) -> Result<SwitchState> {
        let running = self.running.as_ref().ok_or(Error::NotStarted)?;
        CommandForwarder::new(running.config.groups())
            .forward(&running.session, &mut self.registry, unit, command, level)
            .await
    }

    fn on_stop(&mut self) {
        tracing::debug!("on_stop called");
        self.running = None;
    }
}
