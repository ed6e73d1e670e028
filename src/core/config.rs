// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! CTC configuration
//!
//! A configuration describes the clock, the diagnostics switch and an
//! optional program for each channel. It is normally loaded from TOML:
//!
//! ```toml
//! clock_frequency_hz = 4000000
//! enable_diagnostics = false
//!
//! [[channels]]
//! index = 0
//! control = 0x86
//! time_constant = 100
//! vector = 0x10
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ctc::CHANNEL_COUNT;
use super::error::{CtcError, Result};

/// CTC configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CtcConfig {
    /// System clock frequency in Hz (informational)
    pub clock_frequency_hz: u32,

    /// Emit a state report on every zero-crossing
    pub enable_diagnostics: bool,

    /// Channel programs, applied in order
    pub channels: Vec<ChannelPreset>,
}

/// Program for one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPreset {
    /// Channel number (0-3)
    pub index: usize,

    /// Control word
    pub control: u8,

    /// Time constant; the channel stays stopped without one
    #[serde(default)]
    pub time_constant: Option<u8>,

    /// Interrupt vector
    #[serde(default)]
    pub vector: Option<u8>,
}

impl CtcConfig {
    /// Default system clock (4 MHz)
    pub const DEFAULT_CLOCK_HZ: u32 = 4_000_000;

    /// Parse a configuration from TOML text
    ///
    /// # Example
    ///
    /// ```
    /// use z80_ctc::core::config::CtcConfig;
    ///
    /// let config = CtcConfig::from_toml_str("clock_frequency_hz = 2500000").unwrap();
    /// assert_eq!(config.clock_frequency_hz, 2_500_000);
    /// assert!(config.channels.is_empty());
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;

        log::info!("Loaded CTC config from {}", path.display());
        Ok(config)
    }

    /// Check the configuration for values the CTC cannot represent
    ///
    /// # Errors
    ///
    /// - `CtcError::InvalidConfig` for a zero clock frequency
    /// - `CtcError::InvalidChannel` for a preset outside channels 0-3
    pub fn validate(&self) -> Result<()> {
        if self.clock_frequency_hz == 0 {
            return Err(CtcError::InvalidConfig(
                "clock_frequency_hz must be non-zero".to_string(),
            ));
        }

        if let Some(preset) = self.channels.iter().find(|p| p.index >= CHANNEL_COUNT) {
            return Err(CtcError::InvalidChannel {
                index: preset.index,
            });
        }

        Ok(())
    }
}

impl Default for CtcConfig {
    fn default() -> Self {
        Self {
            clock_frequency_hz: Self::DEFAULT_CLOCK_HZ,
            enable_diagnostics: false,
            channels: Vec::new(),
        }
    }
}
