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

//! Custom assertions for CTC testing

use z80_ctc::core::ctc::Ctc;

/// Assert a channel's current count
#[allow(dead_code)]
pub fn assert_count(ctc: &Ctc, index: usize, expected: u16) {
    let actual = ctc
        .channel(index)
        .map(|channel| channel.current_count())
        .expect("invalid channel index");
    assert_eq!(
        actual, expected,
        "Channel {} count mismatch: expected {}, got {}",
        index, expected, actual
    );
}

/// Assert a channel's pending flag
#[allow(dead_code)]
pub fn assert_pending(ctc: &Ctc, index: usize, expected: bool) {
    let actual = ctc
        .channel(index)
        .map(|channel| channel.interrupt_pending())
        .expect("invalid channel index");
    assert_eq!(
        actual, expected,
        "Channel {} pending mismatch: expected {}, got {}",
        index, expected, actual
    );
}

/// Assert a channel is running or stopped
#[allow(dead_code)]
pub fn assert_running(ctc: &Ctc, index: usize, expected: bool) {
    let actual = ctc
        .channel(index)
        .map(|channel| channel.is_running())
        .expect("invalid channel index");
    assert_eq!(
        actual, expected,
        "Channel {} running mismatch: expected {}, got {}",
        index, expected, actual
    );
}
