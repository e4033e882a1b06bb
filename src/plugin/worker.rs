// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-worker callback queue.

use tokio::sync::{mpsc, oneshot};

use super::PluginCallbacks;
use crate::bridge::DispatchReport;
use crate::config::PluginConfig;
use crate::error::{Error, Result};
use crate::types::{SensorId, SwitchState};

/// Default number of callbacks that can wait in the queue.
const DEFAULT_QUEUE_CAPACITY: usize = 32;

enum Request {
    Start {
        config: PluginConfig,
        reply: oneshot::Sender<Result<()>>,
    },
    Heartbeat {
        reply: oneshot::Sender<Result<Option<DispatchReport>>>,
    },
    Command {
        unit: SensorId,
        command: String,
        level: i32,
        reply: oneshot::Sender<Result<SwitchState>>,
    },
    Stop {
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable handle to a plugin running on its own task.
///
/// Every callback goes through one queue and is handled to completion
/// before the next one starts, in arrival order, no matter how many tasks
/// hold a handle.
///
/// # Examples
///
/// ```no_run
/// use tuya_plug_bridge::config::PluginConfig;
/// use tuya_plug_bridge::host::MemoryRegistry;
/// use tuya_plug_bridge::plugin::{PluginHandle, SmartPlug};
/// use tuya_plug_bridge::protocol::DeviceConnector;
/// use tuya_plug_bridge::types::SensorId;
///
/// async fn run<K>(connector: K, config: PluginConfig) -> tuya_plug_bridge::Result<()>
/// where
///     K: DeviceConnector + 'static,
/// {
///     let handle = PluginHandle::spawn(SmartPlug::new(connector, MemoryRegistry::new()));
///     handle.start(config).await?;
///
///     let ticker = handle.clone();
///     tokio::spawn(async move {
///         let _ = ticker.heartbeat().await;
///     });
///     handle.command(SensorId::from_unit(10), "Off", 0).await?;
///
///     handle.stop().await
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PluginHandle {
    sender: mpsc::Sender<Request>,
}

impl PluginHandle {
    /// Moves `plugin` onto a new tokio task and returns a handle to it.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn<P>(plugin: P) -> Self
    where
        P: PluginCallbacks + 'static,
    {
        Self::spawn_with_capacity(plugin, DEFAULT_QUEUE_CAPACITY)
    }

    /// Like [`spawn`](Self::spawn) with a custom queue capacity.
    #[must_use]
    pub fn spawn_with_capacity<P>(plugin: P, capacity: usize) -> Self
    where
        P: PluginCallbacks + 'static,
    {
        let (sender, receiver) = mpsc::channel(capacity);
        tokio::spawn(run(plugin, receiver));
        Self { sender }
    }

    /// Returns `true` once the worker has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Queues `on_start`.
    ///
    /// # Errors
    ///
    /// Returns the plugin's start error, or `Error::WorkerClosed`.
    pub async fn start(&self, config: PluginConfig) -> Result<()> {
        self.request(|reply| Request::Start { config, reply }).await?
    }

    /// Queues `on_heartbeat`.
    ///
    /// # Errors
    ///
    /// Returns the plugin's heartbeat error, or `Error::WorkerClosed`.
    pub async fn heartbeat(&self) -> Result<Option<DispatchReport>> {
        self.request(|reply| Request::Heartbeat { reply }).await?
    }

    /// Queues `on_command`.
    ///
    /// # Errors
    ///
    /// Returns the plugin's command error, or `Error::WorkerClosed`.
    pub async fn command(
        &self,
        unit: SensorId,
        command: impl Into<String>,
        level: i32,
    ) -> Result<SwitchState> {
        let command = command.into();
        self.request(|reply| Request::Command {
            unit,
            command,
            level,
            reply,
        })
        .await?
    }

    /// Queues `on_stop` and shuts the worker down.
    ///
    /// Callbacks queued behind the stop fail with `Error::WorkerClosed`.
    ///
    /// # Errors
    ///
    /// Returns `Error::WorkerClosed` if the worker already stopped.
    pub async fn stop(&self) -> Result<()> {
        self.request(|reply| Request::Stop { reply }).await
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Request) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(make(reply))
            .await
            .map_err(|_| Error::WorkerClosed)?;
        response.await.map_err(|_| Error::WorkerClosed)
    }
}

async fn run<P: PluginCallbacks>(mut plugin: P, mut receiver: mpsc::Receiver<Request>) {
    tracing::debug!("Plugin worker started");
    while let Some(request) = receiver.recv().await {
        tracing::trace!(?request, "Handling request");
        match request {
            Request::Start { config, reply } => {
                let _ = reply.send(plugin.on_start(config));
            }
            Request::Heartbeat { reply } => {
                let _ = reply.send(plugin.on_heartbeat().await);
            }
            Request::Command {
                unit,
                command,
                level,
                reply,
            } => {
                let _ = reply.send(plugin.on_command(unit, &command, level).await);
            }
            Request::Stop { reply } => {
                plugin.on_stop();
                let _ = reply.send(());
                break;
            }
        }
    }
    tracing::debug!("Plugin worker stopped");
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Start { .. } => "Start",
            Self::Heartbeat { .. } => "Heartbeat",
            Self::Command { .. } => "Command",
            Self::Stop { .. } => "Stop",
        };
        f.write_str(name)
    }
}
