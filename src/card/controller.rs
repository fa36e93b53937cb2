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

use crate::card::nav::NavigationState;
use crate::card::nav::Phase;
use crate::card::platform::AudioSink;
use crate::card::platform::Scheduler;
use crate::card::platform::ShareError;
use crate::card::platform::ShareOutcome;
use crate::card::platform::ShareTarget;
use crate::card::platform::TimerId;
use crate::card::view::ViewInput;
use crate::card::view::ViewState;
use crate::card::view::derive_view;
use crate::loader::ConfigError;
use crate::types::config::CardConfiguration;
use crate::types::config::DEFAULT_TITLE;
use crate::types::interval::AutoplayInterval;

#[derive(Clone, Debug, PartialEq)]
pub enum Lifecycle {
    Uninitialized,
    Ready(NavigationState),
    /// Terminal. Holds the reason, for diagnostics.
    Failed(String),
}

/// Owns one card's navigation state, autoplay timer and audio.
///
/// Every operation is synchronous and clamps out-of-range requests to a
/// no-op. After each operation the derived [`ViewState`] is recomputed.
pub struct CardController<A, S, H> {
    lifecycle: Lifecycle,
    title: String,
    muted: bool,
    /// The live autoplay timer. At most one at a time.
    autoplay: Option<TimerId>,
    interval: AutoplayInterval,
    audio: A,
    scheduler: S,
    share: H,
    view: ViewState,
}

impl<A, S, H> CardController<A, S, H>
where
    A: AudioSink,
    S: Scheduler,
    H: ShareTarget,
{
    pub fn new(audio: A, scheduler: S, share: H) -> Self {
        Self {
            lifecycle: Lifecycle::Uninitialized,
            title: DEFAULT_TITLE.to_string(),
            muted: false,
            autoplay: None,
            interval: AutoplayInterval::default(),
            audio,
            scheduler,
            share,
            view: derive_view(ViewInput {
                navigation: None,
                failure: None,
                autoplay_active: false,
                autoplay_interval: AutoplayInterval::default().millis(),
                muted: false,
            }),
        }
    }

    /// Sets up the card from a loaded configuration. Only valid once, from
    /// the uninitialized state. An empty image list fails the card.
    pub fn initialize(&mut self, config: &CardConfiguration) -> Result<(), ConfigError> {
        if self.lifecycle != Lifecycle::Uninitialized {
            log::error!("Initializing a card that is already initialized.");
            return Ok(());
        }
        if config.images.is_empty() {
            let error = ConfigError::Invalid("images is empty".to_string());
            self.fail(error.to_string());
            return Err(error);
        }
        self.title = config.title.clone();
        self.audio.load(config.audio.as_deref(), config.volume);
        self.muted = false;
        self.audio.set_muted(false);
        self.lifecycle = Lifecycle::Ready(NavigationState::new(config.page_count()));
        log::debug!("Card initialized with {} pages.", config.page_count());
        self.refresh();
        Ok(())
    }

    /// Enters the terminal failed state. Only valid before initialization.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if self.lifecycle != Lifecycle::Uninitialized {
            log::error!("Failing a card that is already initialized.");
            return;
        }
        let reason = reason.into();
        log::info!("Fallback activated: {reason}");
        self.lifecycle = Lifecycle::Failed(reason);
        self.refresh();
    }

    pub fn open(&mut self) {
        let Some(nav) = self.navigation() else {
            return;
        };
        if nav.phase() != Phase::ClosedAtCover {
            return;
        }
        self.set_navigation(nav.open());
        self.start_audio();
        self.refresh();
    }

    /// Manual forward navigation. Interrupts autoplay.
    pub fn next(&mut self) {
        let Some(nav) = self.navigation() else {
            return;
        };
        self.stop_autoplay();
        if nav.at_last_page() {
            self.refresh();
            return;
        }
        if nav.phase() == Phase::ClosedAtCover {
            self.open();
            return;
        }
        self.set_navigation(nav.next());
        self.refresh();
    }

    /// Manual backward navigation. Interrupts autoplay. From page 1 this is a
    /// full [`CardController::reset`].
    pub fn prev(&mut self) {
        let Some(nav) = self.navigation() else {
            return;
        };
        self.stop_autoplay();
        if nav.current_page() == 1 {
            self.reset();
            return;
        }
        self.set_navigation(nav.prev());
        self.refresh();
    }

    pub fn reset(&mut self) {
        let Some(nav) = self.navigation() else {
            return;
        };
        self.stop_autoplay();
        self.audio.stop();
        self.set_navigation(nav.reset());
        self.refresh();
    }

    pub fn toggle_mute(&mut self) {
        if self.navigation().is_none() {
            return;
        }
        self.muted = !self.muted;
        self.audio.set_muted(self.muted);
        self.refresh();
    }

    /// Starts autoplay at `interval` if it is stopped, stops it otherwise.
    pub fn toggle_autoplay(&mut self, interval: AutoplayInterval) {
        if self.navigation().is_none() {
            return;
        }
        if self.autoplay.is_some() {
            self.stop_autoplay();
        } else {
            self.interval = interval;
            self.start_autoplay();
        }
        self.refresh();
    }

    /// Changes the interval. A running timer restarts from zero.
    pub fn change_autoplay_interval(&mut self, interval: AutoplayInterval) {
        if self.navigation().is_none() {
            return;
        }
        self.interval = interval;
        if self.autoplay.is_some() {
            self.stop_autoplay();
            self.start_autoplay();
        }
        self.refresh();
    }

    /// Delivers an autoplay tick. Ticks from any timer other than the live
    /// one are ignored.
    pub fn tick(&mut self, id: TimerId) {
        if self.autoplay != Some(id) {
            log::debug!("Ignoring tick from stale timer {}.", id.0);
            return;
        }
        let Some(nav) = self.navigation() else {
            return;
        };
        match nav.phase() {
            _ if nav.at_last_page() => {
                log::debug!("Autoplay reached the back.");
                self.stop_autoplay();
            }
            Phase::ClosedAtCover => {
                self.set_navigation(nav.open());
                self.start_audio();
            }
            Phase::Open | Phase::OpenAtBack => {
                self.set_navigation(nav.next());
            }
        }
        self.refresh();
    }

    /// Shares `location`, preferring the platform share sheet and falling
    /// back to the clipboard. Navigation is never affected.
    pub fn share(&mut self, location: &str) -> Result<ShareOutcome, ShareError> {
        if location.trim().is_empty() {
            return Err(ShareError::NoLocation);
        }
        if self.share.has_native_share() {
            self.share.share_native(&self.title, location)?;
            Ok(ShareOutcome::Shared)
        } else {
            self.share.copy(location)?;
            Ok(ShareOutcome::Copied)
        }
    }

    /// Releases the timer and the audio. Navigation is left as is.
    pub fn teardown(&mut self) {
        self.stop_autoplay();
        self.audio.stop();
        self.refresh();
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn navigation(&self) -> Option<NavigationState> {
        match &self.lifecycle {
            Lifecycle::Ready(nav) => Some(*nav),
            _ => None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn interval(&self) -> AutoplayInterval {
        self.interval
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn share_target_mut(&mut self) -> &mut H {
        &mut self.share
    }

    fn set_navigation(&mut self, nav: NavigationState) {
        self.lifecycle = Lifecycle::Ready(nav);
    }

    fn start_audio(&mut self) {
        // Autoplay policies commonly refuse playback; that's expected.
        if let Err(e) = self.audio.play() {
            log::debug!("Audio playback did not start: {e}");
        }
    }

    fn start_autoplay(&mut self) {
        self.stop_autoplay();
        let id = TimerId::fresh();
        self.scheduler.start(id, self.interval.as_duration());
        self.autoplay = Some(id);
        log::debug!("Autoplay started every {}ms.", self.interval.millis());
    }

    fn stop_autoplay(&mut self) {
        if let Some(id) = self.autoplay.take() {
            self.scheduler.cancel(id);
            log::debug!("Autoplay stopped.");
        }
    }

    fn refresh(&mut self) {
        let failure = match &self.lifecycle {
            Lifecycle::Failed(reason) => Some(reason.as_str()),
            _ => None,
        };
        self.view = derive_view(ViewInput {
            navigation: self.navigation(),
            failure,
            autoplay_active: self.autoplay.is_some(),
            autoplay_interval: self.interval.millis(),
            muted: self.muted,
        });
    }
}

#[cfg(test)]
impl<A, S, H> CardController<A, S, H> {
    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn autoplay_active(&self) -> bool {
        self.autoplay.is_some()
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn share_target(&self) -> &H {
        &self.share
    }
}
