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

//! The capabilities a card controller is built with. The controller never
//! touches a clock, a speaker or a clipboard directly.

use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use serde::Serialize;

static NEXT_TIMER: AtomicU64 = AtomicU64::new(1);

/// Identifies one autoplay timer. Ticks carry the id of the timer that
/// produced them, so a tick from a cancelled timer can be told apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TimerId(pub u64);

impl TimerId {
    /// A fresh id, unique for the life of the process. Ids are never reused,
    /// even across controllers, so a tick queued before a reload can't be
    /// mistaken for one from the reloaded card's timer.
    pub fn fresh() -> Self {
        Self(NEXT_TIMER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Schedules repeating ticks. Each tick is delivered back to the controller
/// through [`crate::card::controller::CardController::tick`].
pub trait Scheduler {
    fn start(&mut self, id: TimerId, interval: Duration);

    /// Cancelling an unknown or already-cancelled timer does nothing.
    fn cancel(&mut self, id: TimerId);
}

#[derive(Clone, Debug, PartialEq)]
pub enum AudioError {
    /// Playback was refused, e.g. by an autoplay policy.
    Rejected(String),
}

impl Display for AudioError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::Rejected(reason) => write!(f, "playback rejected: {reason}"),
        }
    }
}

pub trait AudioSink {
    fn load(&mut self, source: Option<&str>, volume: f32);

    fn play(&mut self) -> Result<(), AudioError>;

    /// Pause and rewind to the start.
    fn stop(&mut self);

    fn set_muted(&mut self, muted: bool);
}

#[derive(Clone, Debug, PartialEq)]
pub enum ShareError {
    /// There is no location to share.
    NoLocation,
    /// The native share sheet failed.
    ShareFailed(String),
    /// Copying the link failed.
    CopyFailed(String),
}

impl Display for ShareError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ShareError::NoLocation => write!(f, "nothing to share: the card has no address"),
            ShareError::ShareFailed(reason) => write!(f, "sharing failed: {reason}"),
            ShareError::CopyFailed(reason) => write!(f, "could not copy the link: {reason}"),
        }
    }
}

impl std::error::Error for ShareError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Handed off to the platform share sheet.
    Shared,
    /// Copied to the clipboard.
    Copied,
}

pub trait ShareTarget {
    fn has_native_share(&self) -> bool;

    fn share_native(&mut self, title: &str, url: &str) -> Result<(), ShareError>;

    fn copy(&mut self, text: &str) -> Result<(), ShareError>;
}
