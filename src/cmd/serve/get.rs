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

use axum::Json;
use axum::extract::OriginalUri;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use maud::Markup;
use maud::html;
use serde::Deserialize;

use crate::card::nav::Phase;
use crate::cmd::serve::naming::config_name;
use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::state::Session;
use crate::cmd::serve::template::page_template;
use crate::media::media_url;
use crate::types::interval::AutoplayInterval;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub cfg: Option<String>,
    /// Present (with any value, or none) to show the diagnostic overlay.
    pub debug: Option<String>,
}

pub async fn get_root(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
    OriginalUri(uri): OriginalUri,
) -> (StatusCode, Html<String>) {
    page_handler(state, None, query, uri).await
}

pub async fn get_page(
    State(state): State<ServerState>,
    Path(page): Path<String>,
    Query(query): Query<PageQuery>,
    OriginalUri(uri): OriginalUri,
) -> (StatusCode, Html<String>) {
    page_handler(state, Some(page), query, uri).await
}

/// The JSON snapshot the page script polls while autoplay runs.
pub async fn get_state(State(state): State<ServerState>, Path(name): Path<String>) -> Response {
    match state.existing_session(&name, |session| session.snapshot()) {
        Some(snapshot) => Json(snapshot).into_response(),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn page_handler(
    state: ServerState,
    page: Option<String>,
    query: PageQuery,
    uri: Uri,
) -> (StatusCode, Html<String>) {
    let name = config_name(page.as_deref(), query.cfg.as_deref());
    let html = state
        .with_session(&name, |session| {
            let body = render_session(session, &uri.to_string(), query.debug.is_some());
            page_template(session.controller.title(), body)
        })
        .await;
    (StatusCode::OK, Html(html.into_string()))
}

fn phase_class(phase: Option<Phase>) -> &'static str {
    match phase {
        Some(Phase::ClosedAtCover) => "show-front",
        Some(Phase::Open) => "show-inside",
        Some(Phase::OpenAtBack) => "show-back",
        None => "closed",
    }
}

fn page_alt(index: usize, count: usize) -> String {
    if index == 0 {
        "Front of the card".to_string()
    } else if index + 1 == count {
        "Back of the card".to_string()
    } else {
        format!("Page {} of the card", index + 1)
    }
}

/// Renders a card. `action` is the URL the controls post to.
pub fn render_session(session: &mut Session, action: &str, debug: bool) -> Markup {
    let snapshot = session.snapshot();
    let snapshot_json = match serde_json::to_string(&snapshot) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Failed to serialize snapshot: {e}");
            String::from("{}")
        }
    };
    let images: &[String] = match &session.config {
        Some(config) => &config.images,
        None => &[],
    };
    let view = &snapshot.view;
    let controls = view.controls;
    let state_url = format!("/state/{}", snapshot.name);
    html! {
        div #card .scene .(snapshot.orientation.as_str())
            data-name=(snapshot.name)
            data-status=(view.status.as_str())
            data-state-url=(state_url)
            data-snapshot=(snapshot_json) {
            @if controls.fallback {
                div #errorPage .error-page {
                    h1 { "Sorry, this card couldn't be opened." }
                    p { "Please try again in a little while." }
                    form .action action=(action) method="post" {
                        button #reload type="submit" name="action" value="Reload" { "Reload" }
                    }
                }
            } @else {
                div #book .book .(phase_class(view.phase)) {
                    @for (index, image) in images.iter().enumerate() {
                        img .page .visible[view.visible_page == Some(index)]
                            data-page=(index)
                            src=(media_url(image))
                            alt=(page_alt(index, images.len()));
                    }
                }
                @if let Some(source) = &snapshot.audio.source {
                    audio #ambientAudio
                        src=(media_url(source))
                        preload="auto"
                        muted[snapshot.audio.muted]
                        autoplay[snapshot.audio.playing] {}
                }
                form #controls .action .controls action=(action) method="post" {
                    button #open type="submit" name="action" value="Open" hidden[!controls.open] {
                        "Open"
                    }
                    button #prev type="submit" name="action" value="Prev" hidden[!controls.prev] disabled[!controls.prev_enabled] {
                        "Previous"
                    }
                    button #next type="submit" name="action" value="Next" hidden[!controls.next] {
                        "Next"
                    }
                    button #reset type="submit" name="action" value="Reset" hidden[!controls.reset] {
                        "Start over"
                    }
                    span #autoplayControls hidden[!controls.autoplay] {
                        button #autoplay type="submit" name="action" value="Autoplay" {
                            @if view.autoplay_active { "Stop" } @else { "Autoplay" }
                        }
                        select #interval name="interval" {
                            @for choice in AutoplayInterval::CHOICES {
                                option value=(choice.millis()) selected[choice.millis() == view.autoplay_interval] {
                                    (format!("{}s", choice.millis() / 1000))
                                }
                            }
                        }
                        button #setInterval type="submit" name="action" value="Interval" {
                            "Set"
                        }
                    }
                    button #mute type="submit" name="action" value="Mute" hidden[!controls.mute] {
                        @if view.muted { "Unmute" } @else { "Mute" }
                    }
                    button #share type="submit" name="action" value="Share" hidden[!controls.share] {
                        "Share"
                    }
                }
            }
            div #notice .notice hidden[snapshot.notice.is_none()] {
                @if let Some(notice) = &snapshot.notice {
                    (notice)
                }
            }
            @if let Some(share) = &snapshot.share {
                div #sharePanel .share-panel {
                    "Share this card: "
                    input type="text" readonly value=(share.url());
                }
            }
            @if debug {
                div #debugBox .debug-box {
                    @for line in &snapshot.diagnostics {
                        div .line { (line) }
                    }
                }
            }
        }
    }
}
