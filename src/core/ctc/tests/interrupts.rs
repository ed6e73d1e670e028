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

//! Interrupt arbitration tests (priority, vectors, global handler)

use super::super::*;
use super::helpers::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Program `index` as an interrupting counter that expires on every rising edge
fn arm_single_edge_irq(ctc: &mut Ctc, index: usize, vector: u8) {
    ctc.write_control(index, 0xD5);
    ctc.set_interrupt_vector(index, vector);
    ctc.write_time_constant(index, 1);
}

#[test]
fn test_no_pending_after_init() {
    let mut ctc = Ctc::new(4_000_000);

    assert!(!ctc.has_pending_interrupt());
    assert_eq!(ctc.acknowledge_interrupt(), 0);
}

#[test]
fn test_acknowledge_honors_priority() {
    let mut ctc = Ctc::new(4_000_000);
    arm_single_edge_irq(&mut ctc, 0, 0x10);
    arm_single_edge_irq(&mut ctc, 2, 0x14);

    // Channel 2 expires first; priority still goes to channel 0
    ctc.trigger_input(2, true);
    ctc.trigger_input(0, true);
    assert!(pending(&ctc, 0));
    assert!(pending(&ctc, 2));

    assert_eq!(ctc.acknowledge_interrupt(), 0x10);
    assert!(!pending(&ctc, 0));
    assert!(pending(&ctc, 2));
    assert!(ctc.has_pending_interrupt());

    assert_eq!(ctc.acknowledge_interrupt(), 0x14);
    assert!(!pending(&ctc, 2));
    assert!(!ctc.has_pending_interrupt());

    assert_eq!(ctc.acknowledge_interrupt(), 0);
}

#[test]
fn test_disabled_channel_never_latches() {
    let mut ctc = Ctc::new(4_000_000);
    let expirations = count_expirations(&mut ctc, 1);

    // Counter, rising edge, interrupts off
    ctc.write_control(1, 0x55);
    ctc.write_time_constant(1, 1);
    ctc.trigger_input(1, true);

    assert_eq!(expirations.get(), 1);
    assert!(!pending(&ctc, 1));
    assert!(!ctc.has_pending_interrupt());
}

#[test]
fn test_masked_pending_is_not_acknowledged() {
    let mut ctc = Ctc::new(4_000_000);
    arm_single_edge_irq(&mut ctc, 0, 0x10);
    ctc.trigger_input(0, true);

    // Interrupts off without reset: flag stays latched but is not visible
    ctc.write_control(0, 0x50);
    assert!(pending(&ctc, 0));
    assert!(!ctc.has_pending_interrupt());
    assert_eq!(ctc.acknowledge_interrupt(), 0);
    assert!(pending(&ctc, 0));

    // Re-enabling makes it visible again
    ctc.write_control(0, 0xD0);
    assert!(ctc.has_pending_interrupt());
    assert_eq!(ctc.acknowledge_interrupt(), 0x10);
}

#[test]
fn test_one_acknowledge_per_call() {
    let mut ctc = Ctc::new(4_000_000);
    for (i, vector) in [0x10, 0x12, 0x14, 0x16].into_iter().enumerate() {
        arm_single_edge_irq(&mut ctc, i, vector);
        ctc.trigger_input(i, true);
    }

    let vectors: Vec<u8> = (0..5).map(|_| ctc.acknowledge_interrupt()).collect();
    assert_eq!(vectors, vec![0x10, 0x12, 0x14, 0x16, 0]);
}

#[test]
fn test_global_handler_overrides_vector() {
    let mut ctc = Ctc::new(4_000_000);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    ctc.set_global_interrupt_handler(move |channel| {
        log.borrow_mut().push(channel);
        0x40 + channel as u8 * 2
    });

    arm_single_edge_irq(&mut ctc, 1, 0x20);
    arm_single_edge_irq(&mut ctc, 3, 0x30);
    ctc.trigger_input(3, true);
    ctc.trigger_input(1, true);

    assert_eq!(ctc.acknowledge_interrupt(), 0x42);
    assert_eq!(ctc.acknowledge_interrupt(), 0x46);
    assert_eq!(*seen.borrow(), vec![1, 3]);
    assert!(!ctc.has_pending_interrupt());
}

#[test]
fn test_handler_not_called_without_pending() {
    let mut ctc = Ctc::new(4_000_000);
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    ctc.set_global_interrupt_handler(move |_| {
        *counter.borrow_mut() += 1;
        0xFF
    });

    assert_eq!(ctc.acknowledge_interrupt(), 0);
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn test_handler_replace_and_clear() {
    let mut ctc = Ctc::new(4_000_000);
    arm_single_edge_irq(&mut ctc, 0, 0x10);

    ctc.set_global_interrupt_handler(|_| 0xAA);
    ctc.set_global_interrupt_handler(|_| 0xBB);
    ctc.trigger_input(0, true);
    assert_eq!(ctc.acknowledge_interrupt(), 0xBB);

    ctc.clear_global_interrupt_handler();
    pulse(&mut ctc, 0);
    assert_eq!(ctc.acknowledge_interrupt(), 0x10);
}

#[test]
fn test_vector_accessors() {
    let mut ctc = Ctc::new(4_000_000);

    for i in 0..CHANNEL_COUNT {
        ctc.set_interrupt_vector(i, 0x80 | (i as u8) << 1);
    }

    assert_eq!(ctc.interrupt_vector(0), 0x80);
    assert_eq!(ctc.interrupt_vector(1), 0x82);
    assert_eq!(ctc.interrupt_vector(2), 0x84);
    assert_eq!(ctc.interrupt_vector(3), 0x86);

    // Control words do not touch the vector
    ctc.write_control(2, 0xFF);
    assert_eq!(ctc.interrupt_vector(2), 0x84);
}

#[test]
fn test_time_constant_write_clears_pending() {
    let mut ctc = Ctc::new(4_000_000);
    arm_single_edge_irq(&mut ctc, 0, 0x10);
    ctc.trigger_input(0, true);
    assert!(ctc.has_pending_interrupt());

    ctc.write_time_constant(0, 1);

    assert!(!ctc.has_pending_interrupt());
    assert_eq!(ctc.acknowledge_interrupt(), 0);
}
