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

use axum::Form;
use axum::Json;
use axum::extract::OriginalUri;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::Uri;
use axum::http::header::ACCEPT;
use axum::http::header::HOST;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use serde::Deserialize;

use crate::cmd::serve::get::PageQuery;
use crate::cmd::serve::naming::config_name;
use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::state::Session;
use crate::types::interval::AutoplayInterval;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub enum Action {
    Open,
    Next,
    Prev,
    Reset,
    Mute,
    Autoplay,
    Interval,
    Share,
    /// Sent by the page script when the share it was handed didn't work.
    ShareFailed,
    Reload,
}

#[derive(Debug, Deserialize)]
pub struct ActionForm {
    action: Action,
    interval: Option<u64>,
    /// Set by the page script when the browser has a native share sheet.
    native: Option<String>,
    /// Why the browser couldn't share, with `ShareFailed`.
    reason: Option<String>,
}

pub async fn post_root(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Form(form): Form<ActionForm>,
) -> Response {
    action_handler(state, None, query, uri, headers, form).await
}

pub async fn post_page(
    State(state): State<ServerState>,
    Path(page): Path<String>,
    Query(query): Query<PageQuery>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Form(form): Form<ActionForm>,
) -> Response {
    action_handler(state, Some(page), query, uri, headers, form).await
}

async fn action_handler(
    state: ServerState,
    page: Option<String>,
    query: PageQuery,
    uri: Uri,
    headers: HeaderMap,
    form: ActionForm,
) -> Response {
    let name = config_name(page.as_deref(), query.cfg.as_deref());
    log::debug!("Action {:?} on card {name}.", form.action);
    if form.action == Action::Reload {
        state.discard_session(&name);
    }
    let location = share_location(&headers, &uri);
    let json = wants_json(&headers);
    let snapshot = state
        .with_session(&name, |session| {
            if form.action != Action::Reload {
                apply_action(session, &form, &location);
            }
            json.then(|| session.snapshot())
        })
        .await;
    match snapshot {
        Some(snapshot) => Json(snapshot).into_response(),
        None => Redirect::to(&uri.to_string()).into_response(),
    }
}

fn apply_action(session: &mut Session, form: &ActionForm, location: &str) {
    let controller = &mut session.controller;
    match form.action {
        Action::Open => controller.open(),
        Action::Next => controller.next(),
        Action::Prev => controller.prev(),
        Action::Reset => controller.reset(),
        Action::Mute => controller.toggle_mute(),
        Action::Autoplay => {
            let interval = match form.interval.map(AutoplayInterval::try_from) {
                Some(Ok(interval)) => interval,
                _ => controller.interval(),
            };
            controller.toggle_autoplay(interval);
        }
        Action::Interval => match form.interval.map(AutoplayInterval::try_from) {
            Some(Ok(interval)) => controller.change_autoplay_interval(interval),
            Some(Err(e)) => session.notice = Some(e.message().to_string()),
            None => session.notice = Some("No interval given.".to_string()),
        },
        Action::Share => {
            controller.share_target_mut().native = form.native.is_some();
            match controller.share(location) {
                Ok(outcome) => log::debug!("Share queued: {outcome:?}"),
                Err(e) => {
                    log::warn!("Share failed: {e}");
                    session.notice = Some(e.to_string());
                }
            }
        }
        Action::ShareFailed => {
            let share = controller.share_target_mut();
            share.native = form.native.is_some();
            let reason = form.reason.as_deref().unwrap_or("unknown error");
            let error = share.report_failure(reason);
            log::warn!("Share failed: {error}");
            session.notice = Some(error.to_string());
        }
        Action::Reload => {}
    }
}

/// The address of the card being viewed, as the browser sees it.
fn share_location(headers: &HeaderMap, uri: &Uri) -> String {
    match headers.get(HOST).and_then(|host| host.to_str().ok()) {
        Some(host) => format!("http://{host}{uri}"),
        None => String::new(),
    }
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|accept| accept.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}
