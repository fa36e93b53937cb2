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

//! Browser-backed capabilities. The server can't play sound or touch the
//! clipboard itself, so these record what the page should do and the page
//! script carries it out.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tokio::time::interval_at;

use crate::card::platform::AudioError;
use crate::card::platform::AudioSink;
use crate::card::platform::Scheduler;
use crate::card::platform::ShareError;
use crate::card::platform::ShareTarget;
use crate::card::platform::TimerId;

/// The desired state of the page's audio element.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAudio {
    pub source: Option<String>,
    pub volume: f32,
    pub playing: bool,
    pub muted: bool,
}

impl AudioSink for PageAudio {
    fn load(&mut self, source: Option<&str>, volume: f32) {
        self.source = source.map(String::from);
        self.volume = volume;
        self.playing = false;
    }

    fn play(&mut self) -> Result<(), AudioError> {
        if self.source.is_none() {
            return Err(AudioError::Rejected("no audio track".to_string()));
        }
        self.playing = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.playing = false;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

/// A tick from a card's autoplay timer.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub card: String,
    pub timer: TimerId,
}

/// Runs each autoplay timer as a tokio task that sends [`Tick`]s to the
/// server's tick driver.
pub struct TokioScheduler {
    card: String,
    ticks: UnboundedSender<Tick>,
    tasks: HashMap<TimerId, AbortHandle>,
}

impl TokioScheduler {
    pub fn new(card: impl Into<String>, ticks: UnboundedSender<Tick>) -> Self {
        Self {
            card: card.into(),
            ticks,
            tasks: HashMap::new(),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn start(&mut self, id: TimerId, period: Duration) {
        let ticks = self.ticks.clone();
        let card = self.card.clone();
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                let tick = Tick {
                    card: card.clone(),
                    timer: id,
                };
                if ticks.send(tick).is_err() {
                    break;
                }
            }
        });
        if let Some(previous) = self.tasks.insert(id, handle.abort_handle()) {
            previous.abort();
        }
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(handle) = self.tasks.remove(&id) {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

/// What the page should do to share the card.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ShareRequest {
    Native { title: String, url: String },
    Copy { url: String },
}

impl ShareRequest {
    pub fn url(&self) -> &str {
        match self {
            ShareRequest::Native { url, .. } => url,
            ShareRequest::Copy { url } => url,
        }
    }
}

/// Queues a share request for the page to carry out on its next render.
#[derive(Default)]
pub struct PageShare {
    /// Whether the browser reported a native share sheet with this request.
    pub native: bool,
    pending: Option<ShareRequest>,
}

impl PageShare {
    pub fn take_pending(&mut self) -> Option<ShareRequest> {
        self.pending.take()
    }

    /// The browser reports that a request it was handed failed. Which error
    /// that is depends on whether it had a native share sheet.
    pub fn report_failure(&mut self, reason: &str) -> ShareError {
        self.pending = None;
        let reason = reason.to_string();
        if self.native {
            ShareError::ShareFailed(reason)
        } else {
            ShareError::CopyFailed(reason)
        }
    }
}

impl ShareTarget for PageShare {
    fn has_native_share(&self) -> bool {
        self.native
    }

    fn share_native(&mut self, title: &str, url: &str) -> Result<(), ShareError> {
        self.pending = Some(ShareRequest::Native {
            title: title.to_string(),
            url: url.to_string(),
        });
        Ok(())
    }

    fn copy(&mut self, text: &str) -> Result<(), ShareError> {
        self.pending = Some(ShareRequest::Copy {
            url: text.to_string(),
        });
        Ok(())
    }
}
