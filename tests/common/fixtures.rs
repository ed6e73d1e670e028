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

//! Test fixtures for common test scenarios

use std::cell::Cell;
use std::rc::Rc;
use z80_ctc::core::ctc::{Ctc, CHANNEL_COUNT};

/// Create a CTC with channel 0 as a prescaler-16 timer and channel 1 as a
/// falling-edge counter, both with interrupts enabled
#[allow(dead_code)]
pub fn create_timer_and_counter() -> Ctc {
    let mut ctc = Ctc::new(4_000_000);

    ctc.set_interrupt_vector(0, 0x10);
    ctc.write_control(0, 0x86);
    ctc.write_time_constant(0, 100);

    ctc.set_interrupt_vector(1, 0x20);
    ctc.write_control(1, 0xC4);
    ctc.write_time_constant(1, 10);

    ctc
}

/// Install a counting callback on every channel
#[allow(dead_code)]
pub fn count_all_expirations(ctc: &mut Ctc) -> [Rc<Cell<u32>>; CHANNEL_COUNT] {
    let counters: [Rc<Cell<u32>>; CHANNEL_COUNT] = Default::default();
    for (index, counter) in counters.iter().enumerate() {
        let counter = Rc::clone(counter);
        ctc.set_callback(index, move || counter.set(counter.get() + 1));
    }
    counters
}

/// Drive `count` low/high pulses into a channel
#[allow(dead_code)]
pub fn pulse_n(ctc: &mut Ctc, index: usize, count: u32) {
    for _ in 0..count {
        ctc.trigger_input(index, false);
        ctc.trigger_input(index, true);
    }
}

/// Acknowledge until nothing is pending, returning the results in order
#[allow(dead_code)]
pub fn drain_interrupts(ctc: &mut Ctc) -> Vec<u8> {
    let mut vectors = Vec::new();
    while ctc.has_pending_interrupt() {
        vectors.push(ctc.acknowledge_interrupt());
    }
    vectors
}
