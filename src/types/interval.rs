// Copyright 2025 Fernando Borretti
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

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// How often autoplay advances the card. Always a positive number of
/// milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct AutoplayInterval(u64);

impl AutoplayInterval {
    /// The intervals offered by the interval selector.
    pub const CHOICES: [AutoplayInterval; 4] = [
        AutoplayInterval(2000),
        AutoplayInterval(3000),
        AutoplayInterval(5000),
        AutoplayInterval(8000),
    ];

    pub fn millis(self) -> u64 {
        self.0
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for AutoplayInterval {
    fn default() -> Self {
        AutoplayInterval(3000)
    }
}

impl TryFrom<u64> for AutoplayInterval {
    type Error = ErrorReport;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value == 0 {
            fail("autoplay interval must be positive")
        } else {
            Ok(AutoplayInterval(value))
        }
    }
}

impl From<AutoplayInterval> for u64 {
    fn from(value: AutoplayInterval) -> Self {
        value.0
    }
}
