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

use axum::extract::State;
use axum::response::Html;
use chrono::Utc;
use maud::Markup;
use maud::html;

use crate::cmd::play::state::AppState;
use crate::cmd::play::state::ServerState;
use crate::cmd::play::template::page_template;
use crate::controller::Screen;
use crate::stats::needs_attention;

pub async fn get_handler(State(state): State<ServerState>) -> Html<String> {
    Html(render_page(&state).into_string())
}

/// Render the screen the controller is currently on. Shared by the GET and
/// POST handlers; a POST applies its transition first and then renders.
pub fn render_page(state: &ServerState) -> Markup {
    let inner = state.inner.lock().unwrap();
    let body = match inner.controller.screen() {
        Screen::Start => start_screen(),
        Screen::Editing => editor_screen(&inner),
        Screen::Playing => game_screen(&inner),
        Screen::Results => results_screen(&inner),
    };
    page_template(body)
}

fn start_screen() -> Markup {
    html! {
        main .screen .start {
            h1 { "Card " b { "Battle" } }
            p .tagline { "Build a deck, swipe through it, see what stuck." }
            form method="post" action="/" {
                input type="hidden" name="action" value="NewDeck";
                button .primary type="submit" { "Create a deck" }
            }
            p .hint { "Have a deck file? Start with " code { "cardbattle play deck.json" } "." }
        }
    }
}

fn editor_screen(inner: &AppState) -> Markup {
    let count = inner.workbench.len();
    html! {
        main .screen .editor {
            header {
                form method="post" action="/" {
                    input type="hidden" name="action" value="CloseEditor";
                    button type="submit" { "Back" }
                }
                h2 { "Deck editor" }
            }
            section .panel {
                h3 { "New card" }
                form method="post" action="/" {
                    input type="hidden" name="action" value="AddCard";
                    input type="hidden" name="image" id="card-image-data";
                    label { "Image"
                        input type="file" accept="image/*" data-target="card-image-data";
                    }
                    label { "Question"
                        textarea name="question" placeholder="Enter the question..." {}
                    }
                    label { "Category"
                        input name="category" placeholder="e.g. Math, History...";
                    }
                    button .primary type="submit" { "Add card" }
                }
            }
            section .panel {
                h3 { "Card back" }
                form method="post" action="/" {
                    input type="hidden" name="action" value="SetCardBack";
                    input type="hidden" name="image" id="card-back-data";
                    label { "Back design"
                        input type="file" accept="image/*" data-target="card-back-data";
                    }
                    button type="submit" { "Set card back" }
                }
                @if inner.card_back.is_some() {
                    form method="post" action="/" {
                        input type="hidden" name="action" value="ClearCardBack";
                        button type="submit" { "Remove card back" }
                    }
                }
            }
            section .panel {
                h3 { "Table texture" }
                form method="post" action="/" {
                    input type="hidden" name="action" value="SetTableTexture";
                    input type="hidden" name="image" id="table-texture-data";
                    label { "Texture"
                        input type="file" accept="image/*" data-target="table-texture-data";
                    }
                    button type="submit" { "Set texture" }
                }
                @if inner.table_texture.is_some() {
                    form method="post" action="/" {
                        input type="hidden" name="action" value="ClearTableTexture";
                        button type="submit" { "Remove texture" }
                    }
                }
            }
            section .panel .deck-list {
                h3 { "Deck (" (count) ")" }
                @if count == 0 {
                    p .hint { "Add the first card." }
                } @else {
                    ul {
                        @for card in &inner.workbench {
                            li {
                                @if let Some(uri) = &card.image {
                                    img .thumb src=(uri) alt="";
                                }
                                span .category { (card.category) }
                                span .question { (card.question) }
                                form method="post" action="/" {
                                    input type="hidden" name="action" value="RemoveCard";
                                    input type="hidden" name="id" value=(card.id);
                                    button .remove type="submit" { "x" }
                                }
                            }
                        }
                    }
                    a href="/deck.json" download="deck.json" { "Export" }
                    form method="post" action="/" {
                        input type="hidden" name="action" value="Start";
                        button .primary type="submit" { "Start studying" }
                    }
                }
            }
        }
    }
}

fn game_screen(inner: &AppState) -> Markup {
    let session = inner.controller.session();
    let position = (session.card_index() + 1).min(session.deck_len());
    let table_style = inner
        .table_texture
        .as_ref()
        .map(|uri| format!("background-image: url({uri});"));
    let overlay_style = inner
        .controller
        .gesture()
        .feedback()
        .map(|tint| format!("background-color: {};", tint.css()));
    html! {
        main .screen .game style=[table_style] {
            header {
                span .progress { (position) " / " (session.deck_len()) }
                span .counter { "Known: " (session.known_pile().len()) }
                span .counter { "Repeat: " (session.repeat_pile().len()) }
                form method="post" action="/" {
                    input type="hidden" name="action" value="Finish";
                    button type="submit" { "Finish" }
                }
            }
            section .table {
                div .pile .repeat-pile {
                    h4 { "To repeat" }
                    span .count { (session.repeat_pile().len()) }
                }
                div .center {
                    @if let Some(card) = session.current_card() {
                        div #card .card {
                            div #overlay .overlay style=[overlay_style.clone()] {}
                            @if let Some(uri) = &card.image {
                                img src=(uri) alt="";
                            }
                            span .category { (card.category) }
                            p .question { (card.question) }
                            p .hint { "left: repeat, right: know" }
                        }
                        form #release-form method="post" action="/" {
                            input type="hidden" name="action" value="Release";
                            input type="hidden" name="dx" id="release-dx" value="0";
                            input type="hidden" name="dy" id="release-dy" value="0";
                        }
                    } @else if !session.is_exhausted() {
                        form method="post" action="/" {
                            input type="hidden" name="action" value="Draw";
                            button .primary .draw type="submit" { "Draw a card" }
                        }
                    } @else {
                        // Exhausted and settling: the results transition is
                        // a few hundred milliseconds away.
                        p .hint data-refresh="results" { "Done." }
                    }
                }
                div .pile .deck-pile {
                    h4 { "Deck" }
                    @if session.remaining() > 0 {
                        @if let Some(uri) = &inner.card_back {
                            img .back src=(uri) alt="";
                        }
                        span .count { (session.remaining()) }
                    } @else {
                        span .count .empty { "0" }
                    }
                }
            }
        }
    }
}

fn results_screen(inner: &AppState) -> Markup {
    let session = inner.controller.session();
    let stats = inner.controller.statistics();
    let percentage = stats.percentage();
    let verdict = if percentage >= 80 {
        "Excellent result"
    } else if percentage >= 60 {
        "Good work"
    } else {
        "Keep practicing"
    };
    let attention = needs_attention(session.repeat_pile());
    let elapsed = (Utc::now() - inner.session_started_at).num_seconds().max(0);
    html! {
        main .screen .results {
            h2 { "Session complete" }
            p .verdict { (verdict) }
            div .summary {
                span .percentage { (percentage) "%" }
                span { "Correct: " (stats.correct) }
                span { "Mistakes: " (session.repeat_pile().len()) }
                span { "Elapsed: " (elapsed / 60) "m " (elapsed % 60) "s" }
            }
            @if !stats.strong_sides.is_empty() {
                section .panel {
                    h3 { "Strong sides" }
                    ul .chips {
                        @for category in &stats.strong_sides {
                            li { (category) }
                        }
                    }
                }
            }
            @if !attention.is_empty() {
                section .panel {
                    h3 { "Needs attention" }
                    ul .chips {
                        @for category in &attention {
                            li { (category) }
                        }
                    }
                }
            }
            @if !session.repeat_pile().is_empty() {
                form method="post" action="/" {
                    input type="hidden" name="action" value="RepeatErrors";
                    button .primary type="submit" {
                        "Repeat mistakes (" (session.repeat_pile().len()) ")"
                    }
                }
            }
            form method="post" action="/" {
                input type="hidden" name="action" value="Restart";
                button type="submit" { "Start over" }
            }
            form method="post" action="/" {
                input type="hidden" name="action" value="Home";
                button type="submit" { "New deck" }
            }
        }
    }
}
