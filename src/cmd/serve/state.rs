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

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

use crate::card::controller::CardController;
use crate::card::view::ViewState;
use crate::cmd::serve::platform::PageAudio;
use crate::cmd::serve::platform::PageShare;
use crate::cmd::serve::platform::ShareRequest;
use crate::cmd::serve::platform::Tick;
use crate::cmd::serve::platform::TokioScheduler;
use crate::diagnostics::DiagnosticLog;
use crate::loader::ConfigError;
use crate::loader::ConfigLoader;
use crate::loader::Source;
use crate::media::MediaLoader;
use crate::types::config::CardConfiguration;
use crate::types::orientation::Orientation;

pub type WebController = CardController<PageAudio, TokioScheduler, PageShare>;

#[derive(Clone)]
pub struct ServerState {
    pub source: Arc<Source>,
    pub media: Arc<MediaLoader>,
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
    pub ticks: UnboundedSender<Tick>,
}

/// One card, as seen by everyone who opens it on this server.
pub struct Session {
    pub name: String,
    pub config: Option<CardConfiguration>,
    pub controller: WebController,
    pub diagnostics: DiagnosticLog,
    /// A one-shot message for the user, e.g. a failed share.
    pub notice: Option<String>,
}

/// What the page script receives after each action.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub name: String,
    pub title: String,
    pub orientation: Orientation,
    pub view: ViewState,
    pub audio: PageAudio,
    pub share: Option<ShareRequest>,
    pub notice: Option<String>,
    pub diagnostics: Vec<String>,
}

impl ServerState {
    pub fn lock_sessions(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` on the session for `name`, resolving its configuration if
    /// this is the first time it's been asked for.
    ///
    /// Cards whose configuration couldn't be loaded at all are not kept: `f`
    /// sees a throwaway failed session, so arbitrary names can't grow the
    /// session map.
    pub async fn with_session<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut Session) -> R,
    ) -> R {
        {
            let mut sessions = self.lock_sessions();
            if let Some(session) = sessions.get_mut(name) {
                return f(session);
            }
        }
        let result = self.source.resolve(name).await;
        let mut session = Session::new(name, self.ticks.clone());
        let keep = match result {
            Ok(config) => {
                match session.controller.initialize(&config) {
                    Ok(()) => {
                        session.diagnostics.loaded(name);
                        session.config = Some(config);
                    }
                    Err(e) => session.diagnostics.fallback(&e.to_string()),
                }
                true
            }
            Err(e) => {
                let reason = e.to_string();
                session.controller.fail(reason.clone());
                session.diagnostics.fallback(&reason);
                !matches!(e, ConfigError::Load(_))
            }
        };
        if !keep {
            log::debug!("Card {name} could not be loaded, so its session is not kept.");
            let output = f(&mut session);
            session.controller.teardown();
            return output;
        }
        let mut sessions = self.lock_sessions();
        let session = sessions.entry(name.to_string()).or_insert(session);
        f(session)
    }

    /// Runs `f` on the session for `name`, if one is already live.
    pub fn existing_session<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Option<R> {
        self.lock_sessions().get_mut(name).map(f)
    }

    /// Discards a session so the next request resolves it again.
    pub fn discard_session(&self, name: &str) {
        if let Some(mut session) = self.lock_sessions().remove(name) {
            log::debug!("Discarding session {name}.");
            session.controller.teardown();
        }
    }

    pub fn apply_tick(&self, tick: Tick) {
        let mut sessions = self.lock_sessions();
        if let Some(session) = sessions.get_mut(&tick.card) {
            session.controller.tick(tick.timer);
        }
    }

    pub fn teardown_all(&self) {
        for session in self.lock_sessions().values_mut() {
            session.controller.teardown();
        }
    }
}

impl Session {
    pub fn new(name: &str, ticks: UnboundedSender<Tick>) -> Self {
        Self {
            name: name.to_string(),
            config: None,
            controller: CardController::new(
                PageAudio::default(),
                TokioScheduler::new(name, ticks),
                PageShare::default(),
            ),
            diagnostics: DiagnosticLog::new(),
            notice: None,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.config
            .as_ref()
            .map(|config| config.orientation)
            .unwrap_or_default()
    }

    /// Builds a snapshot, consuming any pending share request and notice.
    pub fn snapshot(&mut self) -> Snapshot {
        Snapshot {
            name: self.name.clone(),
            title: self.controller.title().to_string(),
            orientation: self.orientation(),
            view: self.controller.view().clone(),
            audio: self.controller.audio().clone(),
            share: self.controller.share_target_mut().take_pending(),
            notice: self.notice.take(),
            diagnostics: self
                .diagnostics
                .entries()
                .iter()
                .map(|entry| entry.render())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc::unbounded_channel;

    use super::*;
    use crate::card::view::Status;
    use crate::error::Fallible;
    use crate::helper::create_card_directory;
    use crate::loader::DirectoryLoader;

    fn server_state() -> Fallible<ServerState> {
        let directory = create_card_directory()?;
        let (ticks, _receiver) = unbounded_channel();
        Ok(ServerState {
            source: Arc::new(Source::Directory(DirectoryLoader::new(directory.clone()))),
            media: Arc::new(MediaLoader::new(directory)),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ticks,
        })
    }

    #[tokio::test]
    async fn test_unknown_names_are_not_kept() -> Fallible<()> {
        let state = server_state()?;
        for i in 0..100 {
            let name = format!("junk-{i}");
            let status = state
                .with_session(&name, |session| session.controller.view().status)
                .await;
            assert_eq!(status, Status::Failed);
        }
        assert!(state.lock_sessions().is_empty());
        assert!(state.existing_session("junk-0", |_| ()).is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_found_cards_are_kept() -> Fallible<()> {
        let state = server_state()?;
        state
            .with_session("birthday", |session| session.controller.open())
            .await;
        // The broken card exists, so its failure is kept for the diagnostics.
        let status = state
            .with_session("broken", |session| session.controller.view().status)
            .await;
        assert_eq!(status, Status::Failed);
        assert_eq!(state.lock_sessions().len(), 2);

        let page = state.existing_session("birthday", |session| {
            session.controller.view().visible_page
        });
        assert_eq!(page, Some(Some(1)));

        state.discard_session("birthday");
        assert!(state.existing_session("birthday", |_| ()).is_none());
        Ok(())
    }
}
