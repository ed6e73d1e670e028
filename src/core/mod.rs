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

//! Core emulation components
//!
//! This module contains the CTC emulation and its supporting layers:
//! - CTC (4 counter/timer channels with interrupt arbitration)
//! - Configuration (TOML channel programs)
//! - Diagnostics (channel state reports)
//! - Error types

pub mod config;
pub mod ctc;
pub mod diagnostics;
pub mod error;

// Re-export commonly used types
pub use config::{ChannelPreset, CtcConfig};
pub use ctc::{Channel, ChannelMode, Ctc, Prescaler, TriggerEdge};
pub use diagnostics::{ChannelSnapshot, DiagnosticSink, LogSink};
pub use error::{CtcError, Result};
