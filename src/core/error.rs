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

/// CTC error types
///
/// Register-level operations on the CTC never fail; these errors are only
/// produced by the checked/configuration layer built on top of them.
use thiserror::Error;

/// Result type for CTC operations
pub type Result<T> = std::result::Result<T, CtcError>;

/// Main error type for the CTC emulator
#[derive(Error, Debug)]
pub enum CtcError {
    #[error("Invalid channel index: {index} (valid range: 0-3)")]
    InvalidChannel { index: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
