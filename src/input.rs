//! Directional input → row navigation binding.
//!
//! The DOM adapter turns `keydown`/`wheel` events into a [`DirectionalInput`]
//! and applies the returned [`NavigationOutcome`] to the event. Everything in
//! between is plain Rust so it can be exercised without a browser.

use crate::debug::{self, cat};
use crate::navigator::{Direction, Row, RowNavigator};

/// What produced the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    ArrowKey,
    WheelTick,
}

/// One directional step request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionalInput {
    pub kind: InputKind,
    /// Ctrl (zoom) held during a wheel tick.
    pub modifier_held: bool,
    pub direction: Direction,
}

impl DirectionalInput {
    /// `ArrowUp` / `ArrowDown`; every other key is ignored.
    pub fn from_key(key: &str) -> Option<Self> {
        let direction = match key {
            "ArrowUp" => Direction::Backward,
            "ArrowDown" => Direction::Forward,
            _ => return None,
        };
        Some(Self {
            kind: InputKind::ArrowKey,
            modifier_held: false,
            direction,
        })
    }

    pub fn from_wheel(delta_y: f64, ctrl: bool) -> Self {
        Self {
            kind: InputKind::WheelTick,
            modifier_held: ctrl,
            direction: if delta_y > 0.0 {
                Direction::Forward
            } else {
                Direction::Backward
            },
        }
    }
}

/// What the caller should do with the triggering event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationOutcome {
    pub suppress_default: bool,
    pub stop_propagation: bool,
}

impl NavigationOutcome {
    /// Let the browser handle the event.
    pub const PASS: NavigationOutcome = NavigationOutcome {
        suppress_default: false,
        stop_propagation: false,
    };
}

/// Live layout the navigator reads from and scrolls.
pub trait Viewport {
    /// Current vertical scroll offset.
    fn scroll_position(&self) -> f64;

    /// Fresh snapshot of the navigable rows, ordered by `top`.
    fn rows(&mut self) -> Vec<Row>;

    /// Align the top of row `index` (from the last `rows()` snapshot) with
    /// the top of the viewport.
    fn scroll_to_row(&mut self, index: usize);
}

/// Run one navigation step for `input` against `viewport`.
pub fn handle_directional_input<V: Viewport + ?Sized>(
    navigator: &RowNavigator,
    viewport: &mut V,
    input: DirectionalInput,
) -> NavigationOutcome {
    if input.kind == InputKind::WheelTick && input.modifier_held {
        return NavigationOutcome::PASS;
    }

    let rows = viewport.rows();
    let scroll_position = viewport.scroll_position();

    match navigator.plan(&rows, input.direction, scroll_position) {
        Ok(index) => {
            debug::log(
                cat::NAV,
                format!("{:?} {:?} at {scroll_position} -> row {index}", input.kind, input.direction),
            );
            viewport.scroll_to_row(index);
            NavigationOutcome {
                suppress_default: true,
                stop_propagation: input.kind == InputKind::WheelTick,
            }
        }
        Err(reason) => {
            debug::log(
                cat::NAV,
                format!("{:?} {:?} at {scroll_position} declined: {reason}", input.kind, input.direction),
            );
            NavigationOutcome::PASS
        }
    }
}

/// In-memory viewport over a fixed row list.
///
/// Used by the native CLI dry run and by tests.
#[derive(Debug, Clone, Default)]
pub struct StaticViewport {
    pub rows: Vec<Row>,
    pub scroll_position: f64,
}

impl StaticViewport {
    pub fn new(rows: Vec<Row>, scroll_position: f64) -> Self {
        Self {
            rows,
            scroll_position,
        }
    }
}

impl Viewport for StaticViewport {
    fn scroll_position(&self) -> f64 {
        self.scroll_position
    }

    fn rows(&mut self) -> Vec<Row> {
        self.rows.clone()
    }

    fn scroll_to_row(&mut self, index: usize) {
        if let Some(row) = self.rows.get(index) {
            self.scroll_position = row.top;
        }
    }
}
