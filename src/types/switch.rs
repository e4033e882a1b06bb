// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Switch state and host commands.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// On/off state of a plug outlet.
///
/// # Examples
///
/// ```
/// use tuya_plug_bridge::types::SwitchState;
///
/// assert_eq!(SwitchState::On.as_str(), "On");
/// assert_eq!(SwitchState::Off.n_value(), 0);
/// assert_eq!(SwitchState::from(true), SwitchState::On);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchState {
    /// Outlet is off.
    Off,
    /// Outlet is on.
    On,
}

impl SwitchState {
    /// Returns the host label for the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::On => "On",
        }
    }

    /// Returns the integer value the host stores for the state.
    #[must_use]
    pub const fn n_value(&self) -> i32 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }

    /// Returns `true` for [`SwitchState::On`].
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<bool> for SwitchState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

/// Parses a host command name.
///
/// Only the exact names `On` and `Off` are accepted; the host delivers
/// them capitalized.
impl FromStr for SwitchState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "On" => Ok(Self::On),
            "Off" => Ok(Self::Off),
            other => Err(Error::UnsupportedCommand(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_state_as_str() {
        assert_eq!(SwitchState::On.as_str(), "On");
        assert_eq!(SwitchState::Off.as_str(), "Off");
    }

    #[test]
    fn switch_state_n_value() {
        assert_eq!(SwitchState::On.n_value(), 1);
        assert_eq!(SwitchState::Off.n_value(), 0);
    }

    #[test]
    fn switch_state_from_command() {
        assert_eq!("On".parse::<SwitchState>().unwrap(), SwitchState::On);
        assert_eq!("Off".parse::<SwitchState>().unwrap(), SwitchState::Off);
    }

    #[test]
    fn switch_state_from_unsupported_command() {
        for command in ["Blink", "Toggle", "on", "Set Level", ""] {
            let result = command.parse::<SwitchState>();
            assert!(
                matches!(result, Err(Error::UnsupportedCommand(ref c)) if c == command),
                "{command:?} should be rejected"
            );
        }
    }

    #[test]
    fn switch_state_from_bool() {
        assert_eq!(SwitchState::from(true), SwitchState::On);
        assert_eq!(SwitchState::from(false), SwitchState::Off);
        assert!(SwitchState::On.is_on());
    }
}
