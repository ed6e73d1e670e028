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

//! Z80 CTC (Counter/Timer Circuit) Implementation
//!
//! The CTC has 4 independent channels. Each channel is an 8-bit down-counter
//! that either counts prescaled system clock ticks (timer mode) or edges on
//! its trigger input (counter mode). When a channel reaches zero it reloads
//! from its time constant, optionally latches an interrupt and calls its
//! expiration callback.
//!
//! ## Channel Programming
//!
//! A channel is programmed with a control word followed by a time constant:
//!
//! ```text
//! write_control(n, word)        configure mode, prescaler, edge, interrupt enable
//! write_time_constant(n, tc)    load counter (tc=0 means 256) and start counting
//! ```
//!
//! The interrupt vector is set per channel with `set_interrupt_vector`.
//!
//! ## Interrupt Priority
//!
//! Channel 0 has the highest priority and channel 3 the lowest. Each
//! acknowledge services exactly one channel.
//!
//! ## Timing
//!
//! There is no wall-clock timing. A timer-mode channel with prescaler `P`
//! and reload value `R` reaches zero once every `P * R` calls to
//! `clock_tick`. The system clock frequency is kept for reference only.

mod channel;

#[cfg(test)]
mod tests;

pub use channel::{Channel, ChannelMode, ControlWord, ExpirationCallback, Prescaler, TriggerEdge};

use super::config::CtcConfig;
use super::diagnostics::{ChannelSnapshot, DiagnosticSink, LogSink};
use super::error::{CtcError, Result};

/// Number of channels on the chip
pub const CHANNEL_COUNT: usize = 4;

/// Global interrupt handler
///
/// Receives the index of the channel being acknowledged; the returned byte
/// becomes the acknowledge result.
pub type InterruptHandler = Box<dyn FnMut(usize) -> u8 + 'static>;

/// Z80 Counter/Timer Circuit
///
/// Out-of-range channel indices are ignored by every operation: writes do
/// nothing and reads return zero.
///
/// # Example
///
/// ```
/// use z80_ctc::core::ctc::Ctc;
///
/// let mut ctc = Ctc::new(4_000_000);
///
/// // Channel 0: interrupts on, timer mode, prescaler 16
/// ctc.write_control(0, 0x85);
/// ctc.set_interrupt_vector(0, 0x10);
/// ctc.write_time_constant(0, 2);
///
/// // 16 * 2 ticks to the first zero count
/// ctc.tick_n(32);
///
/// assert!(ctc.has_pending_interrupt());
/// assert_eq!(ctc.acknowledge_interrupt(), 0x10);
/// assert!(!ctc.has_pending_interrupt());
/// ```
pub struct Ctc {
    /// The 4 channels (index 0 has the highest priority)
    channels: [Channel; CHANNEL_COUNT],

    /// System clock frequency in Hz (informational)
    system_clock_frequency: u32,

    /// Overrides vector lookup on acknowledge
    interrupt_handler: Option<InterruptHandler>,

    /// Emit a state report on every zero-crossing
    diagnostics_enabled: bool,

    /// Destination for state reports
    diagnostic_sink: Box<dyn DiagnosticSink>,
}

impl Ctc {
    /// Create a new CTC
    ///
    /// All channels start stopped in timer mode with prescaler 16, falling
    /// edge and interrupts disabled.
    ///
    /// # Arguments
    ///
    /// * `system_clock_frequency` - System clock in Hz (not used for timing)
    pub fn new(system_clock_frequency: u32) -> Self {
        log::debug!("CTC created ({} Hz system clock)", system_clock_frequency);

        Self {
            channels: std::array::from_fn(Channel::new),
            system_clock_frequency,
            interrupt_handler: None,
            diagnostics_enabled: false,
            diagnostic_sink: Box::new(LogSink),
        }
    }

    /// Build a CTC from a configuration
    ///
    /// Each channel preset is applied in hardware programming order:
    /// interrupt vector, control word, then time constant.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn from_config(config: &CtcConfig) -> Result<Self> {
        config.validate()?;

        let mut ctc = Self::new(config.clock_frequency_hz);
        ctc.set_diagnostics(config.enable_diagnostics);

        for preset in &config.channels {
            let index = ctc.checked_channel(preset.index)?;
            if let Some(vector) = preset.vector {
                ctc.set_interrupt_vector(index, vector);
            }
            ctc.write_control(index, preset.control);
            if let Some(time_constant) = preset.time_constant {
                ctc.write_time_constant(index, time_constant);
            }
        }

        log::info!(
            "CTC configured: {} Hz, {} channel preset(s)",
            config.clock_frequency_hz,
            config.channels.len()
        );

        Ok(ctc)
    }

    /// Validate a channel index
    ///
    /// # Errors
    ///
    /// Returns `CtcError::InvalidChannel` if `index` is not in 0-3.
    pub fn checked_channel(&self, index: usize) -> Result<usize> {
        if index < CHANNEL_COUNT {
            Ok(index)
        } else {
            Err(CtcError::InvalidChannel { index })
        }
    }

    /// Get a reference to a channel
    ///
    /// # Returns
    ///
    /// `None` if `index` is out of range
    #[inline(always)]
    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    /// System clock frequency in Hz
    pub fn system_clock_frequency(&self) -> u32 {
        self.system_clock_frequency
    }

    /// Write a control word to a channel
    pub fn write_control(&mut self, index: usize, value: u8) {
        if let Some(channel) = self.channels.get_mut(index) {
            channel.write_control(value);
        }
    }

    /// Write a time constant to a channel, starting it
    pub fn write_time_constant(&mut self, index: usize, value: u8) {
        if let Some(channel) = self.channels.get_mut(index) {
            channel.write_time_constant(value);
        }
    }

    /// Install a channel's zero-crossing callback
    ///
    /// The closure carries its own context.
    pub fn set_callback<F>(&mut self, index: usize, callback: F)
    where
        F: FnMut() + 'static,
    {
        if let Some(channel) = self.channels.get_mut(index) {
            channel.set_callback(callback);
        }
    }

    /// Remove a channel's zero-crossing callback
    pub fn clear_callback(&mut self, index: usize) {
        if let Some(channel) = self.channels.get_mut(index) {
            channel.clear_callback();
        }
    }

    /// Drive a channel's trigger input
    ///
    /// Only counter-mode channels count; callbacks run before this returns.
    pub fn trigger_input(&mut self, index: usize, level: bool) {
        let Some(channel) = self.channels.get_mut(index) else {
            return;
        };

        if channel.trigger(level) {
            self.report_zero_crossing(index);
        }
    }

    /// Advance every timer-mode channel by one system clock tick
    ///
    /// Channels are processed in index order, so callbacks fire in
    /// channel order when several channels cross zero on the same tick.
    pub fn clock_tick(&mut self) {
        for index in 0..CHANNEL_COUNT {
            if self.channels[index].tick() {
                self.report_zero_crossing(index);
            }
        }
    }

    /// Advance by `count` system clock ticks
    pub fn tick_n(&mut self, count: u64) {
        for _ in 0..count {
            self.clock_tick();
        }
    }

    /// Set a channel's interrupt vector
    pub fn set_interrupt_vector(&mut self, index: usize, vector: u8) {
        if let Some(channel) = self.channels.get_mut(index) {
            channel.set_interrupt_vector(vector);
        }
    }

    /// Get a channel's interrupt vector (0 for an invalid index)
    pub fn interrupt_vector(&self, index: usize) -> u8 {
        self.channels
            .get(index)
            .map_or(0, Channel::interrupt_vector)
    }

    /// Install the global interrupt handler, replacing any previous one
    ///
    /// While installed, the handler's return value is the result of
    /// `acknowledge_interrupt` instead of the channel's vector.
    pub fn set_global_interrupt_handler<F>(&mut self, handler: F)
    where
        F: FnMut(usize) -> u8 + 'static,
    {
        self.interrupt_handler = Some(Box::new(handler));
    }

    /// Remove the global interrupt handler
    pub fn clear_global_interrupt_handler(&mut self) {
        self.interrupt_handler = None;
    }

    /// Check if any channel has an enabled interrupt pending
    pub fn has_pending_interrupt(&self) -> bool {
        self.channels.iter().any(Channel::irq_active)
    }

    /// Acknowledge the highest priority pending interrupt
    ///
    /// Clears the pending flag of the first channel (0-3) with an enabled
    /// interrupt pending.
    ///
    /// # Returns
    ///
    /// The global handler's result if one is installed, otherwise the
    /// channel's vector. 0 if nothing is pending.
    pub fn acknowledge_interrupt(&mut self) -> u8 {
        let Some(index) = self.channels.iter().position(Channel::irq_active) else {
            return 0;
        };

        let channel = &mut self.channels[index];
        channel.ack_irq();
        log::trace!("CTC {} interrupt acknowledged", index);

        match self.interrupt_handler.as_mut() {
            Some(handler) => handler(index),
            None => channel.interrupt_vector(),
        }
    }

    /// Enable or disable zero-crossing state reports
    pub fn set_diagnostics(&mut self, enabled: bool) {
        self.diagnostics_enabled = enabled;
    }

    /// Check whether zero-crossing state reports are enabled
    pub fn diagnostics_enabled(&self) -> bool {
        self.diagnostics_enabled
    }

    /// Replace the destination for state reports
    pub fn set_diagnostic_sink<S>(&mut self, sink: S)
    where
        S: DiagnosticSink + 'static,
    {
        self.diagnostic_sink = Box::new(sink);
    }

    /// Snapshot one channel (`None` for an invalid index)
    pub fn snapshot(&self, index: usize) -> Option<ChannelSnapshot> {
        self.channel(index).map(ChannelSnapshot::from)
    }

    /// Snapshot all 4 channels
    pub fn snapshots(&self) -> [ChannelSnapshot; CHANNEL_COUNT] {
        std::array::from_fn(|index| ChannelSnapshot::from(&self.channels[index]))
    }

    /// Hardware reset
    ///
    /// Returns every channel to its power-on state, vectors included.
    /// Callbacks, the interrupt handler and diagnostics settings are kept.
    pub fn reset(&mut self) {
        for channel in &mut self.channels {
            channel.reset();
        }
        log::debug!("CTC reset");
    }

    fn report_zero_crossing(&mut self, index: usize) {
        if !self.diagnostics_enabled {
            return;
        }
        let report = ChannelSnapshot::from(&self.channels[index]).render();
        self.diagnostic_sink.emit(&report);
    }
}

impl Default for Ctc {
    fn default() -> Self {
        Self::new(CtcConfig::DEFAULT_CLOCK_HZ)
    }
}
