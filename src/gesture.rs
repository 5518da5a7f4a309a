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

//! The drag-gesture state machine: a value type plus pure transitions, so
//! the swipe decision logic is testable without a rendering surface.

/// The horizontal drag distance separating "cancel" from "commit", in
/// device-independent units. The decision requires strictly more than this.
pub const SWIPE_THRESHOLD: f64 = 100.0;

/// Degrees of card tilt per unit of horizontal displacement.
const ROTATION_FACTOR: f64 = 0.1;

/// Peak opacity of the feedback overlay at or beyond the threshold.
const FEEDBACK_MAX_ALPHA: f64 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Which way a committed swipe went. Right means "know", left means
/// "repeat"; the mapping to a pile decision lives in the controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Direction {
    Left,
    Right,
}

/// The drag lifecycle. `Settling` is the brief fly-off phase after a
/// committed swipe, before the tracker returns to `Idle`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    Idle,
    Dragging { origin: Point, offset: Point },
    Settling { direction: Direction },
}

/// What a drag release resolved to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Release {
    /// The drag crossed the threshold; commit in this direction.
    Commit(Direction),
    /// The drag fell short; offset and rotation snap back to zero.
    Cancel,
    /// There was no drag in progress.
    Ignored,
}

/// The progress-scaled overlay tint shown while dragging.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Feedback {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f64,
}

impl Feedback {
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.red, self.green, self.blue, self.alpha)
    }
}

impl Gesture {
    /// Begin a drag at `origin`. Only valid from `Idle`, and only while a
    /// card is drawn; anything else leaves the state untouched.
    pub fn drag_start(self, origin: Point, card_drawn: bool) -> Gesture {
        match self {
            Gesture::Idle if card_drawn => Gesture::Dragging {
                origin,
                offset: Point::ZERO,
            },
            other => other,
        }
    }

    /// Track a pointer move. Ignored unless a drag is in progress.
    pub fn drag_move(self, point: Point) -> Gesture {
        match self {
            Gesture::Dragging { origin, .. } => Gesture::Dragging {
                origin,
                offset: Point::new(point.x - origin.x, point.y - origin.y),
            },
            other => other,
        }
    }

    /// End the drag. Horizontal displacement alone gates the decision;
    /// strictly more than [`SWIPE_THRESHOLD`] commits, anything else
    /// cancels back to neutral.
    pub fn drag_end(self) -> (Gesture, Release) {
        match self {
            Gesture::Dragging { offset, .. } => {
                if offset.x.abs() > SWIPE_THRESHOLD {
                    let direction = if offset.x > 0.0 {
                        Direction::Right
                    } else {
                        Direction::Left
                    };
                    (Gesture::Settling { direction }, Release::Commit(direction))
                } else {
                    (Gesture::Idle, Release::Cancel)
                }
            }
            other => (other, Release::Ignored),
        }
    }

    /// The exit animation finished; return to `Idle`. No-op elsewhere.
    pub fn settled(self) -> Gesture {
        match self {
            Gesture::Settling { .. } => Gesture::Idle,
            other => other,
        }
    }

    /// The current drag offset, `(0, 0)` outside a drag.
    pub fn offset(&self) -> Point {
        match self {
            Gesture::Dragging { offset, .. } => *offset,
            _ => Point::ZERO,
        }
    }

    /// Card tilt in degrees: linear in the horizontal displacement,
    /// independent of the vertical one.
    pub fn rotation(&self) -> f64 {
        self.offset().x * ROTATION_FACTOR
    }

    /// The overlay tint: green scaling toward the right, red toward the
    /// left, nothing while the drag is horizontally centered.
    pub fn feedback(&self) -> Option<Feedback> {
        let offset = match self {
            Gesture::Dragging { offset, .. } => offset,
            _ => return None,
        };
        if offset.x == 0.0 {
            return None;
        }
        let progress = (offset.x.abs() / SWIPE_THRESHOLD).min(1.0);
        let alpha = progress * FEEDBACK_MAX_ALPHA;
        let feedback = if offset.x > 0.0 {
            Feedback {
                red: 34,
                green: 197,
                blue: 94,
                alpha,
            }
        } else {
            Feedback {
                red: 239,
                green: 68,
                blue: 68,
                alpha,
            }
        };
        Some(feedback)
    }
}
