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

//! The screen-level state machine. The controller is the sole writer of
//! session state; everything else reads snapshots.

use crate::deck::Card;
use crate::gesture::Direction;
use crate::gesture::Gesture;
use crate::gesture::Point;
use crate::gesture::Release;
use crate::rng::TinyRng;
use crate::session::Decision;
use crate::session::Session;
use crate::stats;
use crate::stats::Statistics;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Screen {
    Start,
    Editing,
    Playing,
    Results,
}

/// A handle for the deferred continuations that follow a committed swipe:
/// first the gesture settle after the exit animation, then (on exhaustion)
/// the transition to Results. The ticket is stamped with the controller
/// epoch at commit time; if the screen has moved on since, the
/// continuation is a no-op rather than a mutation of torn-down state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SettleTicket {
    epoch: u64,
    /// Whether this commit emptied the deck.
    pub exhausted: bool,
}

pub struct Controller {
    screen: Screen,
    session: Session,
    gesture: Gesture,
    rng: TinyRng,
    /// Bumped on every screen change; stale tickets compare unequal.
    epoch: u64,
}

impl Controller {
    pub fn new(rng: TinyRng) -> Self {
        Controller {
            screen: Screen::Start,
            session: Session::new(),
            gesture: Gesture::Idle,
            rng,
            epoch: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn open_editor(&mut self) {
        if self.screen == Screen::Start {
            self.change_screen(Screen::Editing);
        }
    }

    pub fn close_editor(&mut self) {
        if self.screen == Screen::Editing {
            self.change_screen(Screen::Start);
        }
    }

    /// Start a shuffled session over `cards`. Declined (returns false,
    /// nothing changes) when the deck would be empty; the boundary is
    /// supposed to disable the action rather than let this fire.
    pub fn start_session(&mut self, cards: Vec<Card>) -> bool {
        if cards.is_empty() {
            return false;
        }
        if !matches!(self.screen, Screen::Start | Screen::Editing) {
            return false;
        }
        self.session.start(cards, &mut self.rng);
        self.gesture = Gesture::Idle;
        self.change_screen(Screen::Playing);
        true
    }

    /// The explicit per-card draw step.
    pub fn draw(&mut self) {
        if self.screen == Screen::Playing {
            self.session.draw();
        }
    }

    pub fn drag_start(&mut self, origin: Point) {
        if self.screen == Screen::Playing {
            let drawn = self.session.current_card().is_some();
            self.gesture = self.gesture.drag_start(origin, drawn);
        }
    }

    pub fn drag_move(&mut self, point: Point) {
        if self.screen == Screen::Playing {
            self.gesture = self.gesture.drag_move(point);
        }
    }

    /// End the drag. On a crossed threshold the pile mutation happens here,
    /// immediately; the returned ticket schedules the visual settle and the
    /// eventual Results transition.
    pub fn drag_end(&mut self) -> Option<SettleTicket> {
        if self.screen != Screen::Playing {
            return None;
        }
        let (gesture, release) = self.gesture.drag_end();
        self.gesture = gesture;
        match release {
            Release::Commit(direction) => {
                let decision = match direction {
                    Direction::Right => Decision::Known,
                    Direction::Left => Decision::Repeat,
                };
                self.session.commit(decision);
                log::debug!(
                    "committed {decision:?}: {} known, {} repeat",
                    self.session.known_pile().len(),
                    self.session.repeat_pile().len()
                );
                Some(SettleTicket {
                    epoch: self.epoch,
                    exhausted: self.session.is_exhausted(),
                })
            }
            Release::Cancel | Release::Ignored => None,
        }
    }

    /// Run a whole drag in one step from a reported end offset. This is
    /// what the web shell calls when the client posts the release.
    pub fn release(&mut self, offset: Point) -> Option<SettleTicket> {
        self.drag_start(Point::ZERO);
        self.drag_move(offset);
        self.drag_end()
    }

    /// Deferred continuation: the exit animation finished. No-op when the
    /// ticket is stale.
    pub fn settle(&mut self, ticket: SettleTicket) {
        if ticket.epoch != self.epoch {
            return;
        }
        self.gesture = self.gesture.settled();
    }

    /// Deferred continuation: show the results once the deck is exhausted
    /// and the settle animation is done. No-op when the ticket is stale or
    /// cards remain.
    pub fn present_results(&mut self, ticket: SettleTicket) {
        if ticket.epoch != self.epoch {
            return;
        }
        if self.screen == Screen::Playing && self.session.is_exhausted() {
            self.change_screen(Screen::Results);
        }
    }

    /// User-triggered abandon: straight back to Start, piles discarded.
    pub fn finish_early(&mut self) {
        if self.screen == Screen::Playing {
            self.session = Session::new();
            self.gesture = Gesture::Idle;
            self.change_screen(Screen::Start);
        }
    }

    /// Leave the results screen for the start screen.
    pub fn home(&mut self) {
        if self.screen == Screen::Results {
            self.session = Session::new();
            self.change_screen(Screen::Start);
        }
    }

    /// Study the same full deck again, in a fresh random order.
    pub fn restart(&mut self) {
        if self.screen == Screen::Results {
            self.session.restart(&mut self.rng);
            self.gesture = Gesture::Idle;
            self.change_screen(Screen::Playing);
        }
    }

    /// Study only the cards missed last time. Stays on Results when there
    /// were no misses.
    pub fn repeat_errors(&mut self) {
        if self.screen == Screen::Results && !self.session.repeat_pile().is_empty() {
            self.session.repeat_errors(&mut self.rng);
            self.gesture = Gesture::Idle;
            self.change_screen(Screen::Playing);
        }
    }

    pub fn statistics(&self) -> Statistics {
        stats::compute(self.session.known_pile(), self.session.repeat_pile())
    }

    fn change_screen(&mut self, screen: Screen) {
        log::debug!("screen: {:?} -> {:?}", self.screen, screen);
        self.screen = screen;
        self.epoch += 1;
    }
}
