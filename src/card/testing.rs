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

//! In-memory capabilities for driving a controller without a browser.

use std::time::Duration;

use crate::card::controller::CardController;
use crate::card::platform::AudioError;
use crate::card::platform::AudioSink;
use crate::card::platform::Scheduler;
use crate::card::platform::ShareError;
use crate::card::platform::ShareTarget;
use crate::card::platform::TimerId;
use crate::types::config::CardConfiguration;
use crate::types::orientation::Orientation;

pub type TestController = CardController<RecordingAudio, ManualScheduler, RecordingShare>;

#[derive(Default)]
pub struct RecordingAudio {
    pub source: Option<String>,
    pub volume: f32,
    pub playing: bool,
    pub muted: bool,
    pub play_calls: usize,
    pub stop_calls: usize,
    /// Refuse playback, like a browser autoplay policy would.
    pub reject: bool,
}

impl AudioSink for RecordingAudio {
    fn load(&mut self, source: Option<&str>, volume: f32) {
        self.source = source.map(String::from);
        self.volume = volume;
    }

    fn play(&mut self) -> Result<(), AudioError> {
        self.play_calls += 1;
        if self.reject {
            return Err(AudioError::Rejected("autoplay policy".to_string()));
        }
        self.playing = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.stop_calls += 1;
        self.playing = false;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

/// Records live timers. Tests deliver ticks by hand.
#[derive(Default)]
pub struct ManualScheduler {
    pub live: Vec<(TimerId, Duration)>,
    pub started: usize,
    pub cancelled: usize,
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, id: TimerId, interval: Duration) {
        self.started += 1;
        self.live.push((id, interval));
    }

    fn cancel(&mut self, id: TimerId) {
        let before = self.live.len();
        self.live.retain(|(live, _)| *live != id);
        if self.live.len() < before {
            self.cancelled += 1;
        }
    }
}

#[derive(Default)]
pub struct RecordingShare {
    pub native: bool,
    pub fail: bool,
    pub shared: Vec<(String, String)>,
    pub copied: Vec<String>,
}

impl ShareTarget for RecordingShare {
    fn has_native_share(&self) -> bool {
        self.native
    }

    fn share_native(&mut self, title: &str, url: &str) -> Result<(), ShareError> {
        if self.fail {
            return Err(ShareError::ShareFailed("cancelled".to_string()));
        }
        self.shared.push((title.to_string(), url.to_string()));
        Ok(())
    }

    fn copy(&mut self, text: &str) -> Result<(), ShareError> {
        if self.fail {
            return Err(ShareError::CopyFailed("permission denied".to_string()));
        }
        self.copied.push(text.to_string());
        Ok(())
    }
}

pub fn config_with_pages(page_count: usize) -> CardConfiguration {
    CardConfiguration {
        orientation: Orientation::Landscape,
        images: (0..page_count).map(|i| format!("page{i}.png")).collect(),
        audio: Some("song.mp3".to_string()),
        title: "Happy Birthday".to_string(),
        volume: 0.35,
    }
}

pub fn controller() -> TestController {
    CardController::new(
        RecordingAudio::default(),
        ManualScheduler::default(),
        RecordingShare::default(),
    )
}

/// A controller initialized with `page_count` pages.
pub fn ready_controller(page_count: usize) -> TestController {
    let mut controller = controller();
    let result = controller.initialize(&config_with_pages(page_count));
    assert!(result.is_ok());
    controller
}
