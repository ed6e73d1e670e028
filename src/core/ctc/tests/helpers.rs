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

//! Shared helpers for CTC unit tests

use super::super::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Install a callback on `index` that counts zero-crossings
pub fn count_expirations(ctc: &mut Ctc, index: usize) -> Rc<Cell<u32>> {
    let expirations = Rc::new(Cell::new(0));
    let counter = Rc::clone(&expirations);
    ctc.set_callback(index, move || counter.set(counter.get() + 1));
    expirations
}

/// Install callbacks on every channel that record the channel index in firing order
pub fn record_expiration_order(ctc: &mut Ctc) -> Rc<RefCell<Vec<usize>>> {
    let order = Rc::new(RefCell::new(Vec::new()));
    for index in 0..CHANNEL_COUNT {
        let order = Rc::clone(&order);
        ctc.set_callback(index, move || order.borrow_mut().push(index));
    }
    order
}

/// Drive one low/high pulse into a channel's trigger input
pub fn pulse(ctc: &mut Ctc, index: usize) {
    ctc.trigger_input(index, false);
    ctc.trigger_input(index, true);
}

/// Current count of a valid channel
pub fn count_of(ctc: &Ctc, index: usize) -> u16 {
    ctc.channel(index).unwrap().current_count()
}

/// Pending flag of a valid channel
pub fn pending(ctc: &Ctc, index: usize) -> bool {
    ctc.channel(index).unwrap().interrupt_pending()
}
