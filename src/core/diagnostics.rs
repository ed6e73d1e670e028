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

//! Channel state diagnostics
//!
//! When diagnostics are enabled on a [`Ctc`](super::ctc::Ctc), every
//! zero-crossing renders the state of the channel that crossed and hands
//! the text to a [`DiagnosticSink`]. The default sink forwards to the
//! `log` facade at debug level.

use serde::Serialize;

use super::ctc::{Channel, ChannelMode, Prescaler, TriggerEdge};

/// Point-in-time copy of a channel's registers and counting state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelSnapshot {
    pub channel: usize,
    pub mode: ChannelMode,
    pub prescaler: Prescaler,
    pub trigger_edge: TriggerEdge,
    pub interrupt_enabled: bool,
    pub interrupt_pending: bool,
    pub is_running: bool,
    pub control_register: u8,
    pub time_constant: u8,
    pub current_count: u16,
    pub trigger_count: u16,
    pub last_trigger_state: bool,
    pub interrupt_vector: u8,
}

impl ChannelSnapshot {
    /// Render the multi-line state report
    ///
    /// # Example
    ///
    /// ```
    /// use z80_ctc::core::ctc::Channel;
    /// use z80_ctc::core::diagnostics::ChannelSnapshot;
    ///
    /// let report = ChannelSnapshot::from(&Channel::new(2)).render();
    /// assert!(report.starts_with("CTC Channel 2 State:"));
    /// ```
    pub fn render(&self) -> String {
        format!(
            "CTC Channel {} State:\n\
             \x20 Mode: {}\n\
             \x20 Prescaler: {}\n\
             \x20 Trigger Edge: {}\n\
             \x20 Interrupt Enabled: {}\n\
             \x20 Interrupt Pending: {}\n\
             \x20 Running: {}\n\
             \x20 Control Register: 0x{:02X}\n\
             \x20 Time Constant: {}\n\
             \x20 Current Count: {}\n\
             \x20 Trigger Count: {}\n\
             \x20 Last Trigger State: {}\n\
             \x20 Interrupt Vector: 0x{:02X}\n",
            self.channel,
            self.mode,
            self.prescaler,
            self.trigger_edge,
            yes_no(self.interrupt_enabled),
            yes_no(self.interrupt_pending),
            yes_no(self.is_running),
            self.control_register,
            self.time_constant,
            self.current_count,
            self.trigger_count,
            if self.last_trigger_state { "High" } else { "Low" },
            self.interrupt_vector
        )
    }
}

impl From<&Channel> for ChannelSnapshot {
    fn from(channel: &Channel) -> Self {
        Self {
            channel: channel.channel_id(),
            mode: channel.mode(),
            prescaler: channel.prescaler(),
            trigger_edge: channel.trigger_edge(),
            interrupt_enabled: channel.interrupt_enabled(),
            interrupt_pending: channel.interrupt_pending(),
            is_running: channel.is_running(),
            control_register: channel.control_register(),
            time_constant: channel.time_constant(),
            current_count: channel.current_count(),
            trigger_count: channel.trigger_count(),
            last_trigger_state: channel.last_trigger_state(),
            interrupt_vector: channel.interrupt_vector(),
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Destination for rendered diagnostic reports
pub trait DiagnosticSink {
    /// Receive one rendered report
    fn emit(&mut self, message: &str);
}

impl<F> DiagnosticSink for F
where
    F: FnMut(&str),
{
    fn emit(&mut self, message: &str) {
        self(message)
    }
}

/// Sink that forwards each report line to `log::debug!`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, message: &str) {
        for line in message.lines() {
            log::debug!("{}", line);
        }
    }
}
