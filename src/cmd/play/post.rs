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

use std::time::Duration;

use axum::Form;
use axum::extract::State;
use axum::response::Html;
use serde::Deserialize;
use tokio::spawn;
use tokio::time::sleep;

use crate::cmd::play::get::render_page;
use crate::cmd::play::state::ServerState;
use crate::controller::SettleTicket;
use crate::error::Fallible;
use crate::gesture::Point;

/// How long the fly-off animation runs before the gesture settles.
const EXIT_ANIMATION_MS: u64 = 400;

/// Extra delay between the settle and the Results screen.
const RESULTS_DELAY_MS: u64 = 300;

#[derive(Deserialize)]
pub struct ActionForm {
    action: String,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    dx: Option<String>,
    #[serde(default)]
    dy: Option<String>,
    #[serde(default)]
    id: Option<u64>,
}

impl ActionForm {
    fn offset(&self) -> Fallible<Point> {
        let dx: f64 = self.dx.as_deref().unwrap_or("0").parse()?;
        let dy: f64 = self.dy.as_deref().unwrap_or("0").parse()?;
        Ok(Point::new(dx, dy))
    }
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<ActionForm>,
) -> Html<String> {
    apply_action(&state, &form);
    Html(render_page(&state).into_string())
}

/// Apply one user action, then let the caller render whatever screen the
/// controller landed on. Unknown or out-of-place actions fall through as
/// no-ops; the controller declines transitions that make no sense.
fn apply_action(state: &ServerState, form: &ActionForm) {
    let mut inner = state.inner.lock().unwrap();
    match form.action.as_str() {
        "Draw" => inner.controller.draw(),
        "Release" => match form.offset() {
            Ok(offset) => {
                if let Some(ticket) = inner.controller.release(offset) {
                    schedule_settle(state.clone(), ticket);
                }
            }
            Err(e) => log::warn!("ignoring malformed release: {e}"),
        },
        "Finish" => inner.controller.finish_early(),
        "NewDeck" => inner.controller.open_editor(),
        "CloseEditor" => inner.controller.close_editor(),
        "AddCard" => {
            let question = form.question.clone().unwrap_or_default();
            let category = form.category.clone().unwrap_or_default();
            inner.add_card(&question, &category, form.image.clone());
        }
        "RemoveCard" => {
            if let Some(id) = form.id {
                inner.remove_card(id);
            }
        }
        "SetCardBack" => {
            inner.card_back = form.image.clone().filter(|uri| !uri.is_empty());
        }
        "ClearCardBack" => inner.card_back = None,
        "SetTableTexture" => {
            inner.table_texture = form.image.clone().filter(|uri| !uri.is_empty());
        }
        "ClearTableTexture" => inner.table_texture = None,
        "Start" => {
            let cards = inner.workbench.clone();
            // Declined on an empty workbench; the editor disables the
            // button in that case anyway.
            inner.start_session(cards);
        }
        "Restart" => inner.restart(),
        "RepeatErrors" => inner.repeat_errors(),
        "Home" => inner.controller.home(),
        "Quit" => {
            if let Some(tx) = state.shutdown_tx.lock().unwrap().take() {
                let _ = tx.send(());
            }
        }
        other => log::warn!("ignoring unknown action: {other}"),
    }
}

/// The deferred continuations behind a committed swipe: settle the gesture
/// after the exit animation, then show the results if the deck is done.
/// Both are no-ops if the screen has changed in the meantime; the ticket
/// carries the epoch that decides.
fn schedule_settle(state: ServerState, ticket: SettleTicket) {
    spawn(async move {
        sleep(Duration::from_millis(EXIT_ANIMATION_MS)).await;
        {
            let mut inner = state.inner.lock().unwrap();
            inner.controller.settle(ticket);
        }
        if ticket.exhausted {
            sleep(Duration::from_millis(RESULTS_DELAY_MS)).await;
            let mut inner = state.inner.lock().unwrap();
            inner.controller.present_results(ticket);
        }
    });
}
