// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Translation between device data points and host sensors.
//!
//! - [`StatusDispatcher`]: status payload in, sensor writes out
//! - [`CommandForwarder`]: host command in, device request and switch write out

mod dispatcher;
mod forwarder;

pub use dispatcher::{DispatchReport, StatusDispatcher};
pub use forwarder::CommandForwarder;
