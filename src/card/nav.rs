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

//! Pure page-navigation transitions.
//!
//! Every function here takes a [`NavigationState`] and returns the next one.
//! Out-of-range moves are clamped, never errors.

use serde::Serialize;

/// Where the card is in its page sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    page_count: usize,
    current_page: usize,
    is_open: bool,
}

/// The coarse state of an initialized card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    ClosedAtCover,
    Open,
    OpenAtBack,
}

impl NavigationState {
    /// A closed card of `page_count` pages. A zero page count is clamped to
    /// one; empty image lists are rejected before this point.
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count: page_count.max(1),
            current_page: 0,
            is_open: false,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn last_page(&self) -> usize {
        self.page_count - 1
    }

    pub fn at_last_page(&self) -> bool {
        self.current_page == self.last_page()
    }

    pub fn phase(&self) -> Phase {
        if !self.is_open {
            Phase::ClosedAtCover
        } else if self.at_last_page() {
            Phase::OpenAtBack
        } else {
            Phase::Open
        }
    }

    /// Opens the cover, revealing the next page. Only valid when closed.
    pub fn open(self) -> Self {
        if self.is_open {
            return self;
        }
        Self {
            is_open: true,
            current_page: (self.current_page + 1).min(self.last_page()),
            ..self
        }
    }

    /// Moves forward one page. On the closed cover this opens the card,
    /// unless the cover is also the last page.
    pub fn next(self) -> Self {
        if self.at_last_page() {
            return self;
        }
        if !self.is_open {
            return self.open();
        }
        Self {
            current_page: (self.current_page + 1).min(self.last_page()),
            ..self
        }
    }

    /// Moves back one page. Going back from page 1 closes the card, same as
    /// [`NavigationState::reset`].
    pub fn prev(self) -> Self {
        match self.current_page {
            0 => self,
            1 => self.reset(),
            page => Self {
                current_page: page - 1,
                ..self
            },
        }
    }

    /// Back to the closed cover.
    pub fn reset(self) -> Self {
        Self::new(self.page_count)
    }
}
