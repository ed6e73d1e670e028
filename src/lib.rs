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

//! Zilog Z80 CTC emulator core library
//!
//! This library emulates the Z80 CTC (Counter/Timer Circuit): four
//! programmable down-counters driven by a system clock or external trigger
//! edges, with vectored interrupts in fixed channel priority.
//!
//! # Example
//!
//! ```
//! use z80_ctc::core::ctc::Ctc;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let mut ctc = Ctc::new(4_000_000);
//! let expired = Rc::new(Cell::new(0));
//!
//! // Channel 1: counter mode, rising edge, time constant 10
//! ctc.write_control(1, 0x55);
//! ctc.write_time_constant(1, 10);
//! let counter = Rc::clone(&expired);
//! ctc.set_callback(1, move || counter.set(counter.get() + 1));
//!
//! for _ in 0..10 {
//!     ctc.trigger_input(1, false);
//!     ctc.trigger_input(1, true);
//! }
//!
//! assert_eq!(expired.get(), 1);
//! ```

pub mod core;
