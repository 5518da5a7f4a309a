// Copyright 2026 the cardbattle authors
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

use std::fs::read_to_string;
use std::sync::Arc;
use std::sync::Mutex;

use axum::Router;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_DISPOSITION;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::select;
use tokio::signal;
use tokio::sync::oneshot::Receiver;
use tokio::sync::oneshot::channel;

use crate::cmd::play::get::get_handler;
use crate::cmd::play::post::post_handler;
use crate::cmd::play::state::AppState;
use crate::cmd::play::state::ServerState;
use crate::controller::Controller;
use crate::deck::export_deck;
use crate::deck::parse_deck;
use crate::error::Fallible;
use crate::error::fail;
use crate::rng::TinyRng;
use crate::utils::CACHE_CONTROL_IMMUTABLE;

pub struct ServerConfig {
    /// Deck file to import and study straight away. `None` starts on the
    /// editor flow instead.
    pub deck_path: Option<String>,
    pub host: String,
    pub port: u16,
}

pub async fn start_server(config: ServerConfig) -> Fallible<()> {
    let mut app_state = AppState::new(Controller::new(TinyRng::from_entropy()));

    if let Some(path) = &config.deck_path {
        let text = match read_to_string(path) {
            Ok(text) => text,
            Err(_) => return fail(format!("cannot read deck file: {path}")),
        };
        let cards = parse_deck(&text)?;
        // The import replaces the editing set and starts a shuffled
        // session over it right away.
        app_state.import_deck(cards.clone());
        if !app_state.start_session(cards) {
            return fail(format!("deck file contains no cards: {path}"));
        }
    }

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = channel();

    let state = ServerState {
        inner: Arc::new(Mutex::new(app_state)),
        shutdown_tx: Arc::new(Mutex::new(Some(shutdown_tx))),
    };
    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/style.css", get(style_handler));
    let app = app.route("/script.js", get(script_handler));
    let app = app.route("/deck.json", get(export_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("{}:{}", config.host, config.port);

    // Start the server with graceful shutdown on Ctrl+C or the quit action.
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await?;
    Ok(())
}

async fn style_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        bytes,
    )
}

async fn script_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("script.js");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/javascript"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        bytes,
    )
}

/// Offer the workbench as a pretty-printed `deck.json` download.
async fn export_handler(
    State(state): State<ServerState>,
) -> (StatusCode, [(HeaderName, &'static str); 2], String) {
    let body = {
        let inner = state.inner.lock().unwrap();
        export_deck(&inner.workbench)
    };
    match body {
        Ok(json) => (
            StatusCode::OK,
            [
                (CONTENT_TYPE, "application/json"),
                (CONTENT_DISPOSITION, "attachment; filename=\"deck.json\""),
            ],
            json,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [
                (CONTENT_TYPE, "text/plain"),
                (CONTENT_DISPOSITION, "inline"),
            ],
            e.to_string(),
        ),
    }
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}

async fn shutdown_signal(shutdown_rx: Receiver<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let shutdown = async {
        shutdown_rx.await.ok();
    };

    select! {
        _ = ctrl_c => {
            log::debug!("Received Ctrl+C, shutting down gracefully");
        },
        _ = shutdown => {
            log::debug!("Received shutdown signal, shutting down gracefully");
        },
    }
}
