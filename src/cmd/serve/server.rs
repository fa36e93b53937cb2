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
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Router;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::unbounded_channel;
use tokio::time::sleep;

use crate::cmd::serve::get::get_page;
use crate::cmd::serve::get::get_root;
use crate::cmd::serve::get::get_state;
use crate::cmd::serve::platform::Tick;
use crate::cmd::serve::post::post_page;
use crate::cmd::serve::post::post_root;
use crate::cmd::serve::state::ServerState;
use crate::error::Fallible;
use crate::error::fail;
use crate::loader::DirectoryLoader;
use crate::loader::HttpLoader;
use crate::loader::Source;
use crate::media::MediaLoader;
use crate::media::content_type;

pub struct ServeOptions {
    /// The card directory. Media is always served from here.
    pub directory: PathBuf,
    /// Fetch configurations from this base URL instead of the directory.
    pub config_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub open_browser: bool,
}

pub async fn start_server(options: ServeOptions) -> Fallible<()> {
    if !options.directory.exists() {
        return fail("directory does not exist.");
    }
    let directory = options.directory.canonicalize()?;

    let source = match &options.config_url {
        Some(url) => {
            log::debug!("Loading configurations from {url}.");
            Source::Http(HttpLoader::new(url.as_str()))
        }
        None => {
            log::debug!("Loading configurations from {}.", directory.display());
            Source::Directory(DirectoryLoader::new(directory.clone()))
        }
    };

    let (ticks, receiver) = unbounded_channel();
    let state = ServerState {
        source: Arc::new(source),
        media: Arc::new(MediaLoader::new(directory)),
        sessions: Arc::new(Mutex::new(HashMap::new())),
        ticks,
    };
    tokio::spawn(drive_ticks(state.clone(), receiver));

    let app = Router::new();
    let app = app.route("/", get(get_root).post(post_root));
    let app = app.route("/script.js", get(script));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.route("/state/{name}", get(get_state));
    let app = app.route("/media/{*path}", get(media_handler));
    let app = app.route("/{page}", get(get_page).post(post_page));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state.clone());
    let bind = format!("{}:{}", options.host, options.port);

    if options.open_browser {
        // Start a separate task to open the browser.
        let bind = bind.clone();
        let url = format!("http://{bind}/");
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&bind).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            let _ = open::that(url);
        });
    }

    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::debug!("Server stopped.");
    state.teardown_all();
    Ok(())
}

/// Feeds autoplay ticks to their cards, one at a time.
async fn drive_ticks(state: ServerState, mut receiver: UnboundedReceiver<Tick>) {
    while let Some(tick) = receiver.recv().await {
        state.apply_tick(tick);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown: {e}");
        std::future::pending::<()>().await;
    }
}

async fn media_handler(State(state): State<ServerState>, Path(path): Path<String>) -> Response {
    let validated = match state.media.validate(&path) {
        Ok(validated) => validated,
        Err(e) => {
            log::debug!("Rejected media path {path:?}: {e:?}");
            return (StatusCode::NOT_FOUND, "Not Found").into_response();
        }
    };
    match tokio::fs::read(&validated).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(CONTENT_TYPE, content_type(&validated))],
            bytes,
        )
            .into_response(),
        Err(e) => {
            log::error!("Failed to read {}: {e}", validated.display());
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}

async fn script() -> (StatusCode, [(HeaderName, &'static str); 1], &'static str) {
    let content = include_str!("script.js");
    (StatusCode::OK, [(CONTENT_TYPE, "text/javascript")], content)
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}
