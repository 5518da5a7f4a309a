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

use std::sync::Arc;
use std::sync::Mutex;

use chrono::DateTime;
use chrono::Utc;
use tokio::sync::oneshot::Sender;

use crate::controller::Controller;
use crate::controller::Screen;
use crate::deck::Card;

/// Shared server state. The controller is the sole writer of session
/// state; handlers take the lock, apply one transition, and render.
#[derive(Clone)]
pub struct ServerState {
    pub inner: Arc<Mutex<AppState>>,
    pub shutdown_tx: Arc<Mutex<Option<Sender<()>>>>,
}

pub struct AppState {
    pub controller: Controller,
    /// The editor's preview list: cards built but not yet in a session.
    pub workbench: Vec<Card>,
    next_id: u64,
    /// When the current session entered Playing. Reset on every session
    /// start so the results screen reports session time, not uptime.
    pub session_started_at: DateTime<Utc>,
    /// Session skin, kept as opaque data URIs.
    pub card_back: Option<String>,
    pub table_texture: Option<String>,
}

impl AppState {
    pub fn new(controller: Controller) -> Self {
        AppState {
            controller,
            workbench: Vec::new(),
            next_id: 1,
            session_started_at: Utc::now(),
            card_back: None,
            table_texture: None,
        }
    }

    /// Replace the editing set with an imported deck. ID assignment
    /// continues past the highest imported id so later editor additions
    /// never collide.
    pub fn import_deck(&mut self, cards: Vec<Card>) {
        let max_id = cards.iter().map(|card| card.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_id + 1);
        self.workbench = cards;
    }

    /// Start a session and stamp its start time. Declined sessions (an
    /// empty deck) leave the stamp alone.
    pub fn start_session(&mut self, cards: Vec<Card>) -> bool {
        let started = self.controller.start_session(cards);
        if started {
            self.session_started_at = Utc::now();
        }
        started
    }

    pub fn restart(&mut self) {
        let was_playing = self.controller.screen() == Screen::Playing;
        self.controller.restart();
        if !was_playing && self.controller.screen() == Screen::Playing {
            self.session_started_at = Utc::now();
        }
    }

    pub fn repeat_errors(&mut self) {
        let was_playing = self.controller.screen() == Screen::Playing;
        self.controller.repeat_errors();
        if !was_playing && self.controller.screen() == Screen::Playing {
            self.session_started_at = Utc::now();
        }
    }

    /// Add a card to the workbench. Declined when the question or the
    /// category is blank; IDs are assigned here and never reused.
    pub fn add_card(&mut self, question: &str, category: &str, image: Option<String>) -> bool {
        let question = question.trim();
        let category = category.trim();
        if question.is_empty() || category.is_empty() {
            return false;
        }
        let image = image.filter(|uri| !uri.is_empty());
        self.workbench.push(Card {
            image,
            question: question.to_string(),
            category: category.to_string(),
            id: self.next_id,
        });
        self.next_id += 1;
        true
    }

    pub fn remove_card(&mut self, id: u64) {
        self.workbench.retain(|card| card.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::make_card;
    use crate::rng::TinyRng;

    fn app_state() -> AppState {
        AppState::new(Controller::new(TinyRng::from_seed(3)))
    }

    #[test]
    fn test_add_card_requires_question_and_category() {
        let mut state = app_state();
        assert!(!state.add_card("", "Math", None));
        assert!(!state.add_card("2 + 2?", "   ", None));
        assert!(state.workbench.is_empty());
        assert!(state.add_card("2 + 2?", "Math", None));
        assert_eq!(state.workbench.len(), 1);
    }

    #[test]
    fn test_card_ids_are_never_reused() {
        let mut state = app_state();
        state.add_card("q1", "Math", None);
        state.add_card("q2", "Math", None);
        state.remove_card(2);
        state.add_card("q3", "Math", None);
        let ids: Vec<u64> = state.workbench.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_import_replaces_the_workbench() {
        let mut state = app_state();
        state.add_card("old", "Math", None);
        state.import_deck(vec![
            make_card(4, "q4", "Math"),
            make_card(9, "q9", "History"),
        ]);
        assert_eq!(state.workbench.len(), 2);
        // New ids continue past the highest imported one.
        state.add_card("fresh", "Math", None);
        assert_eq!(state.workbench.last().unwrap().id, 10);
    }

    #[test]
    fn test_starting_a_session_resets_the_start_time() {
        let mut state = app_state();
        let stale = Utc::now() - chrono::Duration::hours(1);
        state.session_started_at = stale;
        assert!(state.start_session(vec![make_card(1, "q1", "Math")]));
        assert!(state.session_started_at > stale);
        assert!(Utc::now() - state.session_started_at < chrono::Duration::minutes(1));
    }

    #[test]
    fn test_declined_session_keeps_the_start_time() {
        let mut state = app_state();
        let stale = Utc::now() - chrono::Duration::hours(1);
        state.session_started_at = stale;
        assert!(!state.start_session(Vec::new()));
        assert_eq!(state.session_started_at, stale);
    }

    #[test]
    fn test_restart_and_repeat_errors_reset_the_start_time() {
        use crate::gesture::Point;

        let mut state = app_state();
        state.start_session(vec![make_card(1, "q1", "Math"), make_card(2, "q2", "Math")]);
        for offset in [Point::new(150.0, 0.0), Point::new(-150.0, 0.0)] {
            state.controller.draw();
            let ticket = state.controller.release(offset).unwrap();
            state.controller.settle(ticket);
            state.controller.present_results(ticket);
        }
        assert_eq!(state.controller.screen(), Screen::Results);

        let stale = Utc::now() - chrono::Duration::hours(1);
        state.session_started_at = stale;
        state.restart();
        assert_eq!(state.controller.screen(), Screen::Playing);
        assert!(state.session_started_at > stale);

        // A restart posted while already playing does not bump the stamp.
        let mid_session = state.session_started_at;
        state.restart();
        assert_eq!(state.session_started_at, mid_session);
    }

    #[test]
    fn test_repeat_errors_noop_keeps_the_start_time() {
        use crate::gesture::Point;

        let mut state = app_state();
        state.start_session(vec![make_card(1, "q1", "Math")]);
        state.controller.draw();
        let ticket = state.controller.release(Point::new(150.0, 0.0)).unwrap();
        state.controller.settle(ticket);
        state.controller.present_results(ticket);
        assert_eq!(state.controller.screen(), Screen::Results);

        // Nothing was missed, so there is nothing to repeat.
        let stale = Utc::now() - chrono::Duration::hours(1);
        state.session_started_at = stale;
        state.repeat_errors();
        assert_eq!(state.controller.screen(), Screen::Results);
        assert_eq!(state.session_started_at, stale);
    }

    #[test]
    fn test_blank_image_is_dropped() {
        let mut state = app_state();
        state.add_card("q1", "Math", Some(String::new()));
        assert_eq!(state.workbench[0].image, None);
        state.add_card("q2", "Math", Some("data:image/png;base64,AA".to_string()));
        assert!(state.workbench[1].image.is_some());
    }
}
