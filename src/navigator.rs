//! Row-snapping scroll navigation for grid layouts
//!
//! Maps a single directional step (arrow key or wheel tick) to the next row
//! boundary in a variable-height grid. Rows are plain layout snapshots
//! (`top`, `height`) so the search runs without a rendering engine.
//!
//! ## Algorithm
//!
//! 1. Forward steps from above the content are declined (jumping straight to
//!    the first row is jarring).
//! 2. A direction-specific monotonic predicate is bisected to find the row
//!    the viewport is currently "on".
//! 3. From there we step in the requested direction, skipping rows that share
//!    the same `top` (several grid items per visual row).
//! 4. Running off either end is declined so native scrolling can take over.

/// One horizontal band of a grid layout.
///
/// `top` is measured in the scroll container's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row {
    pub top: f64,
    pub height: f64,
}

impl Row {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Direction of a single navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Down (+1)
    Forward,
    /// Up (-1)
    Backward,
}

impl Direction {
    #[inline]
    pub fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Why a navigation step was declined.
///
/// Declining is a normal outcome: the caller lets the browser's native
/// scroll proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOp {
    /// Forward step while the first row is still well below the viewport.
    AboveContent,
    /// The next row group would be outside the row sequence.
    OutOfBounds,
    /// Nothing to navigate between.
    NoRows,
}

impl std::fmt::Display for NoOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoOp::AboveContent => write!(f, "above content"),
            NoOp::OutOfBounds => write!(f, "out of bounds"),
            NoOp::NoRows => write!(f, "no rows"),
        }
    }
}

/// Pixel tolerances used by the navigator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// How far below the scroll position the first row may start before a
    /// forward step is declined.
    pub edge_slack: f64,
    /// Absorbs sub-pixel rounding at row boundaries.
    pub boundary_slack: f64,
}

pub const DEFAULT_EDGE_SLACK: f64 = 100.0;
pub const DEFAULT_BOUNDARY_SLACK: f64 = 5.0;

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            edge_slack: DEFAULT_EDGE_SLACK,
            boundary_slack: DEFAULT_BOUNDARY_SLACK,
        }
    }
}

/// Bisect-left: smallest index where `predicate` holds, or `rows.len()`.
///
/// `predicate` must be monotonic over `rows` (false…false, true…true).
/// This is not verified.
pub fn locate_boundary<T, F>(rows: &[T], mut predicate: F) -> usize
where
    F: FnMut(&T) -> bool,
{
    let mut lo = 0;
    let mut hi = rows.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if predicate(&rows[mid]) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

/// Row not yet fully scrolled past.
#[inline]
pub fn is_not_scrolled_past(row: &Row, scroll_position: f64, slack: f64) -> bool {
    row.bottom() - slack > scroll_position
}

/// Row top at, or within `slack` above, the scroll position (or further down).
#[inline]
pub fn is_at_or_below(row: &Row, scroll_position: f64, slack: f64) -> bool {
    row.top + slack > scroll_position
}

/// Stateless navigator parameterised by its tolerances.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowNavigator {
    pub tolerance: Tolerance,
}

impl RowNavigator {
    pub fn new(tolerance: Tolerance) -> Self {
        Self { tolerance }
    }

    /// Target row index for one step, or the reason the step was declined.
    pub fn plan(&self, rows: &[Row], direction: Direction, scroll_position: f64) -> Result<usize, NoOp> {
        let first = rows.first().ok_or(NoOp::NoRows)?;
        let slack = self.tolerance.boundary_slack;

        if direction == Direction::Forward && first.top > scroll_position + self.tolerance.edge_slack {
            return Err(NoOp::AboveContent);
        }

        let current = match direction {
            Direction::Forward => {
                locate_boundary(rows, |r| is_not_scrolled_past(r, scroll_position, slack))
            }
            Direction::Backward => {
                locate_boundary(rows, |r| is_at_or_below(r, scroll_position, slack))
            }
        };
        // Every row failed the predicate.
        let current = current.min(rows.len() - 1);

        let current_top = rows[current].top;
        let step = direction.step();
        let mut i = current as isize + step;
        while i >= 0 && (i as usize) < rows.len() && rows[i as usize].top == current_top {
            i += step;
        }

        if i < 0 || i as usize >= rows.len() {
            return Err(NoOp::OutOfBounds);
        }
        Ok(i as usize)
    }

    /// Target row index for one step; `None` means let native scroll proceed.
    pub fn navigate(&self, rows: &[Row], direction: Direction, scroll_position: f64) -> Option<usize> {
        self.plan(rows, direction, scroll_position).ok()
    }
}

/// `navigate` with the default tolerances.
pub fn navigate(rows: &[Row], direction: Direction, scroll_position: f64) -> Option<usize> {
    RowNavigator::default().navigate(rows, direction, scroll_position)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stacked(heights: &[f64]) -> Vec<Row> {
        let mut top = 0.0;
        heights
            .iter()
            .map(|&h| {
                let row = Row::new(top, h);
                top += h;
                row
            })
            .collect()
    }

    fn grid(tops: &[f64], height: f64) -> Vec<Row> {
        tops.iter().map(|&t| Row::new(t, height)).collect()
    }

    #[test]
    fn test_bisect_matches_linear_scan() {
        // Every monotonic bool sequence up to length 8.
        for len in 0..=8usize {
            for first_true in 0..=len {
                let seq: Vec<bool> = (0..len).map(|i| i >= first_true).collect();
                let linear = seq.iter().position(|&b| b).unwrap_or(seq.len());
                assert_eq!(locate_boundary(&seq, |&b| b), linear, "len={len} first_true={first_true}");
            }
        }
    }

    #[test]
    fn test_forward_from_top() {
        let rows = stacked(&[100.0, 100.0, 100.0]);
        assert_eq!(navigate(&rows, Direction::Forward, 0.0), Some(1));
    }

    #[test]
    fn test_forward_past_last_row_declines() {
        let rows = stacked(&[100.0, 100.0, 100.0]);
        let nav = RowNavigator::default();
        assert_eq!(nav.plan(&rows, Direction::Forward, 250.0), Err(NoOp::OutOfBounds));
    }

    #[test]
    fn test_backward_from_middle_snaps_to_partial_row() {
        // Predicate selects row 2 (top 200 + 5 > 150), one step back is row 1.
        let rows = stacked(&[100.0, 100.0, 100.0]);
        assert_eq!(navigate(&rows, Direction::Backward, 150.0), Some(1));
    }

    #[test]
    fn test_backward_from_row_start() {
        let rows = stacked(&[100.0, 100.0, 100.0]);
        assert_eq!(navigate(&rows, Direction::Backward, 100.0), Some(0));
    }

    #[test]
    fn test_backward_at_top_declines() {
        let rows = stacked(&[100.0, 100.0, 100.0]);
        let nav = RowNavigator::default();
        assert_eq!(nav.plan(&rows, Direction::Backward, 0.0), Err(NoOp::OutOfBounds));
    }

    #[test]
    fn test_edge_guard_only_forward() {
        let rows = grid(&[500.0, 600.0, 700.0], 100.0);
        let nav = RowNavigator::default();
        assert_eq!(nav.plan(&rows, Direction::Forward, 0.0), Err(NoOp::AboveContent));
        // Within the slack the guard does not apply.
        assert_eq!(nav.plan(&rows, Direction::Forward, 400.0), Ok(1));
    }

    #[test]
    fn test_slack_keeps_flush_row() {
        // Within 5px of row 1 the viewport counts as already on row 1.
        let rows = stacked(&[100.0, 100.0, 100.0]);
        assert_eq!(navigate(&rows, Direction::Forward, 94.0), Some(1));
        assert_eq!(navigate(&rows, Direction::Forward, 97.0), Some(2));
        assert_eq!(navigate(&rows, Direction::Forward, 103.0), Some(2));
    }

    #[test]
    fn test_same_top_rows_are_one_step() {
        let rows = grid(&[0.0, 0.0, 0.0, 120.0, 120.0, 120.0, 240.0], 120.0);
        assert_eq!(navigate(&rows, Direction::Forward, 0.0), Some(3));
        assert_eq!(navigate(&rows, Direction::Forward, 120.0), Some(6));
        let back = navigate(&rows, Direction::Backward, 240.0).unwrap();
        assert_eq!(rows[back].top, 120.0);
    }

    #[test]
    fn test_empty_rows() {
        let nav = RowNavigator::default();
        assert_eq!(nav.plan(&[], Direction::Forward, 0.0), Err(NoOp::NoRows));
        assert_eq!(nav.plan(&[], Direction::Backward, 0.0), Err(NoOp::NoRows));
    }

    #[test]
    fn test_custom_tolerance() {
        let nav = RowNavigator::new(Tolerance {
            edge_slack: 10.0,
            boundary_slack: 0.0,
        });
        let rows = grid(&[50.0, 150.0], 100.0);
        assert_eq!(nav.plan(&rows, Direction::Forward, 0.0), Err(NoOp::AboveContent));
        assert_eq!(nav.plan(&rows, Direction::Forward, 45.0), Ok(1));
    }
}
