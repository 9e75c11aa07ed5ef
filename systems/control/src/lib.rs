#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure control system that turns pointer input into tower placement and removal commands.

use std::collections::VecDeque;

use logistico_core::{Command, PlacementBounds, TowerId, Waypoint, WorldPoint};

/// Mouse button that places a tower.
pub const PLACE_BUTTON: u8 = 1;

/// Mouse button that removes the towers under the cursor.
pub const REMOVE_BUTTON: u8 = 3;

/// Raw input event observed by an adapter during a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// A mouse button was pressed.
    MouseButtonDown {
        /// Platform button number; 1 is left, 3 is right.
        button: u8,
    },
    /// A keyboard key was pressed.
    KeyDown,
    /// The player asked to close the game.
    Quit,
    /// Any other event the controller ignores.
    Other,
}

/// Input snapshot gathered by an adapter for a single frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ControlInput {
    /// Events queued since the previous frame, oldest first.
    pub events: Vec<InputEvent>,
    /// Cursor position in floor pixels.
    pub cursor: Waypoint,
}

impl ControlInput {
    /// Creates a new input snapshot.
    #[must_use]
    pub fn new(events: Vec<InputEvent>, cursor: Waypoint) -> Self {
        Self { events, cursor }
    }

    /// Reports whether the frame carries a quit request.
    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.events.contains(&InputEvent::Quit)
    }
}

/// Capability that yields one [`ControlInput`] per frame.
pub trait InputSource {
    /// Retrieves the input observed since the previous poll.
    fn poll(&mut self) -> ControlInput;
}

/// Input source replaying a fixed queue of frames, then reporting idle frames.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<ControlInput>,
}

impl ScriptedInput {
    /// Creates a source that replays `frames` in order.
    #[must_use]
    pub fn new(frames: impl IntoIterator<Item = ControlInput>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Creates a source that left-clicks each of `points` on consecutive frames.
    #[must_use]
    pub fn clicks_at(points: impl IntoIterator<Item = Waypoint>) -> Self {
        Self::new(points.into_iter().map(|point| {
            ControlInput::new(
                vec![InputEvent::MouseButtonDown {
                    button: PLACE_BUTTON,
                }],
                point,
            )
        }))
    }

    /// Number of frames that still carry scripted input.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> ControlInput {
        self.frames.pop_front().unwrap_or_default()
    }
}

/// Parameters applied to every tower the controller places.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerBlueprint {
    /// Configured ticks between captures.
    pub rate: u32,
    /// Capture radius in world units.
    pub radius: f64,
}

impl Default for TowerBlueprint {
    fn default() -> Self {
        Self {
            rate: 300,
            radius: 100.0,
        }
    }
}

/// Control system translating clicks into factory commands.
#[derive(Clone, Debug, Default)]
pub struct Control {
    blueprint: TowerBlueprint,
}

impl Control {
    /// Creates a controller placing towers built from `blueprint`.
    #[must_use]
    pub const fn new(blueprint: TowerBlueprint) -> Self {
        Self { blueprint }
    }

    /// Blueprint used for placements.
    #[must_use]
    pub const fn blueprint(&self) -> TowerBlueprint {
        self.blueprint
    }

    /// Returns the button of the first mouse press in `events`, or `0` when none.
    #[must_use]
    pub fn detect_click(events: &[InputEvent]) -> u8 {
        events
            .iter()
            .find_map(|event| match event {
                InputEvent::MouseButtonDown { button } => Some(*button),
                _ => None,
            })
            .unwrap_or(0)
    }

    /// Consumes one frame of input and emits placement or removal commands.
    ///
    /// Only the first click of the frame is acted upon. The `towers_at`
    /// closure should mirror the factory's `query::towers_at` hit test.
    pub fn handle<F>(
        &self,
        input: &ControlInput,
        placement_bounds: PlacementBounds,
        mut towers_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(Waypoint) -> Vec<TowerId>,
    {
        match Self::detect_click(&input.events) {
            PLACE_BUTTON => {
                if placement_bounds.contains(input.cursor) {
                    out.push(Command::PlaceTower {
                        location: WorldPoint::from(input.cursor),
                        rate: self.blueprint.rate,
                        radius: self.blueprint.radius,
                    });
                }
            }
            REMOVE_BUTTON => {
                out.extend(
                    towers_at(input.cursor)
                        .into_iter()
                        .map(|tower| Command::RemoveTower { tower }),
                );
            }
            _ => {}
        }
    }
}
