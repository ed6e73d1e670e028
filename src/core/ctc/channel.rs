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

//! A single CTC counter/timer channel
//!
//! ## Control Word Format (8 bits)
//!
//! ```text
//! 7: Interrupt enable
//! 6: Mode (0=timer, 1=counter)
//! 5: Prescaler (0=16, 1=256), timer mode only
//! 4: Trigger edge (0=falling, 1=rising)
//! 3: Timer trigger (stored, not interpreted)
//! 2: Time constant follows
//! 1: Software reset
//! 0: Control word flag (stored, not interpreted)
//! ```

use std::fmt;

use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Bits of the channel control word
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControlWord: u8 {
        /// Latch an interrupt on zero-crossing (bit 7)
        const INTERRUPT_ENABLE = 0x80;
        /// Count external trigger edges instead of prescaled clock ticks (bit 6)
        const COUNTER_MODE = 0x40;
        /// Divide the clock by 256 instead of 16 (bit 5)
        const PRESCALER_256 = 0x20;
        /// Trigger on the rising edge instead of the falling edge (bit 4)
        const RISING_EDGE = 0x10;
        /// Timer trigger detail (bit 3)
        const TRIGGER_MODE = 0x08;
        /// The next write to the channel is a time constant (bit 2)
        const TIME_CONSTANT_FOLLOWS = 0x04;
        /// Software reset (bit 1)
        const SOFTWARE_RESET = 0x02;
        /// Control word flag (bit 0)
        const CONTROL = 0x01;
    }
}

/// Channel operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ChannelMode {
    /// Count prescaled system clock ticks
    #[default]
    Timer,
    /// Count external trigger edges
    Counter,
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelMode::Timer => write!(f, "Timer"),
            ChannelMode::Counter => write!(f, "Counter"),
        }
    }
}

/// Timer-mode clock divisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Prescaler {
    #[default]
    Div16,
    Div256,
}

impl Prescaler {
    /// Number of clock ticks per count
    #[inline(always)]
    pub fn divisor(self) -> u16 {
        match self {
            Prescaler::Div16 => 16,
            Prescaler::Div256 => 256,
        }
    }
}

impl fmt::Display for Prescaler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.divisor())
    }
}

/// Active edge of the trigger input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TriggerEdge {
    #[default]
    Falling,
    Rising,
}

impl TriggerEdge {
    /// Check whether a `last` -> `level` transition is this edge
    #[inline(always)]
    pub fn matches(self, last: bool, level: bool) -> bool {
        match self {
            TriggerEdge::Rising => !last && level,
            TriggerEdge::Falling => last && !level,
        }
    }
}

impl fmt::Display for TriggerEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerEdge::Falling => write!(f, "Falling"),
            TriggerEdge::Rising => write!(f, "Rising"),
        }
    }
}

/// Callback invoked on every zero-crossing of a channel
pub type ExpirationCallback = Box<dyn FnMut() + 'static>;

/// A single CTC channel
pub struct Channel {
    /// Channel number (0-3)
    channel_id: usize,

    /// Operating mode
    mode: ChannelMode,

    /// Timer-mode prescaler
    prescaler: Prescaler,

    /// Counter-mode active edge
    trigger_edge: TriggerEdge,

    /// Zero-crossings latch an interrupt
    interrupt_enabled: bool,

    /// Vector returned on acknowledge
    interrupt_vector: u8,

    /// Last written control word
    control_register: u8,

    /// Time constant (0 means 256)
    time_constant: u8,

    /// Live down-counter (0-256)
    current_count: u16,

    /// Counting enabled (set by a time constant write)
    is_running: bool,

    /// Interrupt latched and not yet acknowledged
    interrupt_pending: bool,

    /// Last trigger input level (for edge detection)
    last_trigger_state: bool,

    /// Prescaler accumulator
    trigger_count: u16,

    /// Zero-crossing callback
    expiration_callback: Option<ExpirationCallback>,
}

impl Channel {
    /// Create a new channel in its power-on state
    ///
    /// # Arguments
    ///
    /// * `channel_id` - The channel number (0-3)
    ///
    /// # Example
    ///
    /// ```
    /// use z80_ctc::core::ctc::{Channel, ChannelMode};
    ///
    /// let channel = Channel::new(0);
    /// assert_eq!(channel.mode(), ChannelMode::Timer);
    /// assert!(!channel.is_running());
    /// ```
    pub fn new(channel_id: usize) -> Self {
        Self {
            channel_id,
            mode: ChannelMode::Timer,
            prescaler: Prescaler::Div16,
            trigger_edge: TriggerEdge::Falling,
            interrupt_enabled: false,
            interrupt_vector: 0,
            control_register: 0,
            time_constant: 0,
            current_count: 0,
            is_running: false,
            interrupt_pending: false,
            last_trigger_state: false,
            trigger_count: 0,
            expiration_callback: None,
        }
    }

    /// Write control word
    ///
    /// Mode, prescaler, edge and interrupt enable are decoded from every
    /// write. The reset bit stops the channel and clears the count and any
    /// pending interrupt; the time-constant-follows bit stops the channel
    /// until the next time constant write.
    ///
    /// # Arguments
    ///
    /// * `value` - Control word to write
    pub fn write_control(&mut self, value: u8) {
        let word = ControlWord::from_bits_retain(value);

        self.control_register = value;
        self.interrupt_enabled = word.contains(ControlWord::INTERRUPT_ENABLE);
        self.mode = if word.contains(ControlWord::COUNTER_MODE) {
            ChannelMode::Counter
        } else {
            ChannelMode::Timer
        };
        self.prescaler = if word.contains(ControlWord::PRESCALER_256) {
            Prescaler::Div256
        } else {
            Prescaler::Div16
        };
        self.trigger_edge = if word.contains(ControlWord::RISING_EDGE) {
            TriggerEdge::Rising
        } else {
            TriggerEdge::Falling
        };

        if word.contains(ControlWord::SOFTWARE_RESET) {
            self.current_count = 0;
            self.is_running = false;
            self.interrupt_pending = false;
        }

        if word.contains(ControlWord::TIME_CONSTANT_FOLLOWS) {
            self.is_running = false;
        }

        log::debug!(
            "CTC {} control=0x{:02X}: mode={} prescaler={} edge={} irq={}",
            self.channel_id,
            value,
            self.mode,
            self.prescaler,
            self.trigger_edge,
            self.interrupt_enabled
        );
    }

    /// Write time constant
    ///
    /// Loads the counter from the new constant and starts the channel.
    ///
    /// # Arguments
    ///
    /// * `value` - Time constant (0 means 256)
    pub fn write_time_constant(&mut self, value: u8) {
        self.time_constant = value;
        self.current_count = self.reload_value();
        self.is_running = true;
        self.interrupt_pending = false;

        log::debug!(
            "CTC {} time constant = {} (count {})",
            self.channel_id,
            value,
            self.current_count
        );
    }

    /// Counter reload value (a time constant of 0 reloads 256)
    #[inline(always)]
    pub fn reload_value(&self) -> u16 {
        if self.time_constant == 0 {
            256
        } else {
            u16::from(self.time_constant)
        }
    }

    /// Feed the trigger input
    ///
    /// Counter-mode channels count down on the configured edge. The level
    /// is remembered in every mode.
    ///
    /// # Arguments
    ///
    /// * `level` - New trigger input level
    ///
    /// # Returns
    ///
    /// `true` if the channel reached zero, `false` otherwise
    pub fn trigger(&mut self, level: bool) -> bool {
        let edge = self.trigger_edge.matches(self.last_trigger_state, level);
        self.last_trigger_state = level;

        if self.mode != ChannelMode::Counter || !edge || !self.is_running {
            return false;
        }

        self.count_down()
    }

    /// Advance the channel by one system clock tick
    ///
    /// Only running timer-mode channels are affected. The counter moves
    /// once every `prescaler` ticks.
    ///
    /// # Returns
    ///
    /// `true` if the channel reached zero, `false` otherwise
    pub fn tick(&mut self) -> bool {
        if self.mode != ChannelMode::Timer || !self.is_running {
            return false;
        }

        self.trigger_count += 1;
        if self.trigger_count < self.prescaler.divisor() {
            return false;
        }
        self.trigger_count = 0;

        self.count_down()
    }

    /// Decrement the counter and handle the zero-crossing
    fn count_down(&mut self) -> bool {
        self.current_count = self.current_count.saturating_sub(1);
        if self.current_count != 0 {
            return false;
        }

        self.current_count = self.reload_value();

        if self.interrupt_enabled {
            self.interrupt_pending = true;
        }

        log::trace!(
            "CTC {} zero count (reload {}, irq pending={})",
            self.channel_id,
            self.current_count,
            self.interrupt_pending
        );

        if let Some(callback) = self.expiration_callback.as_mut() {
            callback();
        }

        true
    }

    /// Install the zero-crossing callback, replacing any previous one
    pub fn set_callback<F>(&mut self, callback: F)
    where
        F: FnMut() + 'static,
    {
        self.expiration_callback = Some(Box::new(callback));
    }

    /// Remove the zero-crossing callback
    pub fn clear_callback(&mut self) {
        self.expiration_callback = None;
    }

    /// Check whether a zero-crossing callback is installed
    pub fn has_callback(&self) -> bool {
        self.expiration_callback.is_some()
    }

    /// Interrupt enabled and latched
    #[inline(always)]
    pub fn irq_active(&self) -> bool {
        self.interrupt_enabled && self.interrupt_pending
    }

    /// Acknowledge IRQ
    ///
    /// Clears the pending flag.
    pub fn ack_irq(&mut self) {
        self.interrupt_pending = false;
    }

    /// Return to the power-on state
    ///
    /// The callback is host wiring, not chip state, and survives the reset.
    pub fn reset(&mut self) {
        let callback = self.expiration_callback.take();
        *self = Self::new(self.channel_id);
        self.expiration_callback = callback;
    }

    pub fn channel_id(&self) -> usize {
        self.channel_id
    }

    pub fn mode(&self) -> ChannelMode {
        self.mode
    }

    pub fn prescaler(&self) -> Prescaler {
        self.prescaler
    }

    pub fn trigger_edge(&self) -> TriggerEdge {
        self.trigger_edge
    }

    pub fn interrupt_enabled(&self) -> bool {
        self.interrupt_enabled
    }

    pub fn interrupt_pending(&self) -> bool {
        self.interrupt_pending
    }

    pub fn interrupt_vector(&self) -> u8 {
        self.interrupt_vector
    }

    pub fn set_interrupt_vector(&mut self, vector: u8) {
        self.interrupt_vector = vector;
    }

    pub fn control_register(&self) -> u8 {
        self.control_register
    }

    pub fn time_constant(&self) -> u8 {
        self.time_constant
    }

    #[inline(always)]
    pub fn current_count(&self) -> u16 {
        self.current_count
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn last_trigger_state(&self) -> bool {
        self.last_trigger_state
    }

    pub fn trigger_count(&self) -> u16 {
        self.trigger_count
    }
}
