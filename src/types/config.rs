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

use crate::types::orientation::Orientation;

pub const DEFAULT_TITLE: &str = "Greeting Card";

pub const DEFAULT_VOLUME: f32 = 0.35;

/// A loaded card configuration. Immutable once loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct CardConfiguration {
    /// The scene orientation.
    pub orientation: Orientation,
    /// Page images in order. Index 0 is the cover, the last index is the
    /// back. Never empty.
    pub images: Vec<String>,
    /// The ambient audio track, if any.
    pub audio: Option<String>,
    /// Title used for the page and when sharing.
    pub title: String,
    /// Playback volume in `[0, 1]`.
    pub volume: f32,
}

impl CardConfiguration {
    pub fn page_count(&self) -> usize {
        self.images.len()
    }
}
