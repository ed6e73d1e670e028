// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Unit tests for the CTC organized by category

mod helpers;
mod interrupts;
